//! Allow/deny lists: one entry per line.

use super::{ListKind, Malformed};
use crate::types::PropertyMap;

pub(crate) fn normalize_whitelist(content: &str, out: &mut PropertyMap) -> Result<(), Malformed> {
    normalize(ListKind::Whitelist, content, out)
}

pub(crate) fn normalize_blacklist(content: &str, out: &mut PropertyMap) -> Result<(), Malformed> {
    normalize(ListKind::Blacklist, content, out)
}

fn normalize(kind: ListKind, content: &str, out: &mut PropertyMap) -> Result<(), Malformed> {
    for entry in content.lines().map(str::trim) {
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        out.insert(entry.to_string(), kind.name().to_string());
    }
    Ok(())
}
