//! Integration tests for the Lighthouse property store

mod cli_contracts;
mod format_fixtures;
mod populate_query;
mod support;
