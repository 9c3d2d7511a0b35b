//! Source composition for [`LighthouseConfig`](super::LighthouseConfig).

pub mod merge_policy;
pub mod service;
