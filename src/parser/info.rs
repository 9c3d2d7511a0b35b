//! `.info` files: `key: value` or `key = value`, with `section:` headers.

use super::{is_comment, list_literal, qualify, Malformed};
use crate::types::PropertyMap;

pub(crate) fn normalize(content: &str, out: &mut PropertyMap) -> Result<(), Malformed> {
    let mut section: Option<String> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || is_comment(line, &['#']) {
            continue;
        }

        let sep = line
            .find([':', '='])
            .ok_or_else(|| Malformed::at(idx + 1, "expected `key: value` or `key = value`"))?;
        let key = line[..sep].trim();
        let value = line[sep + 1..].trim();
        if key.is_empty() {
            return Err(Malformed::at(idx + 1, "empty key"));
        }

        if value.is_empty() && line[sep..].starts_with(':') {
            section = Some(key.to_string());
            continue;
        }
        out.insert(qualify(section.as_deref(), key), list_literal(value));
    }
    Ok(())
}
