//! `hosts` files: `<address> <name> [aliases...]`.

use super::Malformed;
use crate::types::PropertyMap;
use std::net::IpAddr;

pub(crate) fn normalize(content: &str, out: &mut PropertyMap) -> Result<(), Malformed> {
    for (idx, raw) in content.lines().enumerate() {
        let data = raw.split('#').next().unwrap_or_default();
        let mut fields = data.split_whitespace();
        let Some(address) = fields.next() else {
            continue;
        };
        // Link-local IPv6 entries may carry a `%zone` suffix.
        let bare = address.split_once('%').map_or(address, |(ip, _)| ip);
        bare.parse::<IpAddr>()
            .map_err(|_| Malformed::at(idx + 1, format!("invalid address `{}`", address)))?;

        let mut names = fields.peekable();
        if names.peek().is_none() {
            return Err(Malformed::at(idx + 1, "address without host names"));
        }
        for name in names {
            out.insert(name.to_string(), address.to_string());
        }
    }
    Ok(())
}
