//! YAML files, flattened to dotted keys.

use super::{list_literal, Malformed};
use crate::types::PropertyMap;
use serde::Deserialize;
use serde_yaml::Value;

pub(crate) fn normalize(content: &str, out: &mut PropertyMap) -> Result<(), Malformed> {
    for document in serde_yaml::Deserializer::from_str(content) {
        let value = Value::deserialize(document).map_err(|e| Malformed::new(e.to_string()))?;
        match untag(&value) {
            Value::Null => {}
            mapping @ Value::Mapping(_) => flatten("", mapping, out)?,
            _ => return Err(Malformed::new("top-level value must be a mapping")),
        }
    }
    Ok(())
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut PropertyMap) -> Result<(), Malformed> {
    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                let segment = scalar_text(k)
                    .ok_or_else(|| Malformed::new(format!("unsupported key under `{}`", prefix)))?;
                flatten(&join(prefix, &segment), v, out)?;
            }
        }
        Value::Sequence(items) => {
            if items.iter().all(|item| scalar_text(item).is_some()) {
                let joined: Vec<String> = items.iter().filter_map(scalar_text).collect();
                out.insert(prefix.to_string(), format!("[{}]", joined.join(",")));
            } else {
                for (i, item) in items.iter().enumerate() {
                    flatten(&join(prefix, &i.to_string()), item, out)?;
                }
            }
        }
        Value::Tagged(tagged) => flatten(prefix, &tagged.value, out)?,
        Value::String(text) => {
            out.insert(prefix.to_string(), list_literal(text));
        }
        scalar => {
            if let Some(text) = scalar_text(scalar) {
                out.insert(prefix.to_string(), text);
            }
        }
    }
    Ok(())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}
