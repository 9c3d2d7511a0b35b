//! Java-style `.properties` files.

use super::{list_literal, Malformed};
use crate::types::PropertyMap;

pub(crate) fn normalize(content: &str, out: &mut PropertyMap) -> Result<(), Malformed> {
    let mut logical = String::new();
    let mut start_line = 0;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim_start();
        if logical.is_empty() {
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            start_line = idx + 1;
        }

        let line = line.trim_end_matches('\r');
        if continues(line) {
            logical.push_str(&line[..line.len() - 1]);
            continue;
        }
        logical.push_str(line);
        insert_logical_line(&logical, start_line, out)?;
        logical.clear();
    }

    if !logical.is_empty() {
        insert_logical_line(&logical, start_line, out)?;
    }
    Ok(())
}

/// An odd number of trailing backslashes continues the line.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn insert_logical_line(line: &str, line_no: usize, out: &mut PropertyMap) -> Result<(), Malformed> {
    let mut key_end = line.len();
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if c.is_whitespace() => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = unescape(&line[..key_end], line_no)?;
    if key.is_empty() {
        return Err(Malformed::at(line_no, "empty key"));
    }

    let mut rest = line[key_end..].trim_start();
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start();
    }
    let value = unescape(rest.trim_end(), line_no)?;
    out.insert(key, list_literal(&value));
    Ok(())
}

fn unescape(text: &str, line_no: usize) -> Result<String, Malformed> {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => result.push('\t'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('f') => result.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| {
                        Malformed::at(line_no, format!("invalid unicode escape \\u{}", hex))
                    })?;
                result.push(decoded);
            }
            Some(other) => result.push(other),
            None => {}
        }
    }
    Ok(result)
}
