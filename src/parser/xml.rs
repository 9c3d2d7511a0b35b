//! XML documents, flattened by element path.

use super::Malformed;
use crate::types::PropertyMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub(crate) fn normalize(content: &str, out: &mut PropertyMap) -> Result<(), Malformed> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut saw_root = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            Malformed::new(format!("at byte {}: {}", reader.buffer_position(), e))
        })?;
        match event {
            Event::Start(start) => {
                stack.push(element_name(&start));
                saw_root = true;
                insert_attributes(&stack, &start, out)?;
            }
            Event::Empty(start) => {
                stack.push(element_name(&start));
                saw_root = true;
                if start.attributes().next().is_none() {
                    out.insert(stack.join("."), String::new());
                } else {
                    insert_attributes(&stack, &start, out)?;
                }
                stack.pop();
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| Malformed::new(e.to_string()))?;
                insert_text(&stack, text.trim(), out)?;
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                let text = String::from_utf8_lossy(&bytes);
                insert_text(&stack, text.trim(), out)?;
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Malformed::new(format!("unclosed element `{}`", stack.join("."))));
    }
    if !saw_root {
        return Err(Malformed::new("no root element"));
    }
    Ok(())
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn insert_attributes(
    stack: &[String],
    start: &BytesStart<'_>,
    out: &mut PropertyMap,
) -> Result<(), Malformed> {
    let path = stack.join(".");
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Malformed::new(e.to_string()))?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Malformed::new(e.to_string()))?;
        out.insert(format!("{}.@{}", path, name), value.into_owned());
    }
    Ok(())
}

fn insert_text(stack: &[String], text: &str, out: &mut PropertyMap) -> Result<(), Malformed> {
    if text.is_empty() {
        return Ok(());
    }
    if stack.is_empty() {
        return Err(Malformed::new("text outside the root element"));
    }
    out.insert(stack.join("."), text.to_string());
    Ok(())
}
