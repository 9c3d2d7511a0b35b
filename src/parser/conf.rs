//! ini-style `.conf` / `.cfg` / `.config` files.

use super::{is_comment, list_literal, qualify, split_pair, Malformed};
use crate::types::PropertyMap;

const COMMENT_MARKERS: &[char] = &['#', ';'];

pub(crate) fn normalize(content: &str, out: &mut PropertyMap) -> Result<(), Malformed> {
    let mut grouping: Option<String> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || is_comment(line, COMMENT_MARKERS) {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let end = rest
                .find(']')
                .ok_or_else(|| Malformed::at(idx + 1, "unterminated section header"))?;
            grouping = Some(rest[..end].trim().to_string());
            continue;
        }

        let (key, value) = split_pair(line, &['='])
            .ok_or_else(|| Malformed::at(idx + 1, "expected `key = value`"))?;
        if key.is_empty() {
            return Err(Malformed::at(idx + 1, "empty key"));
        }
        out.insert(qualify(grouping.as_deref(), key), list_literal(value));
    }

    Ok(())
}
