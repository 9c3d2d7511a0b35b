//! Format query results as text.

use super::{StoreSummary, Structure, StructureLevel};
use crate::types::{PropertyRecord, HIERARCHY};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;
use std::collections::BTreeSet;

/// Column at which `VALUE:` starts when the path is short enough.
const VALUE_COLUMN: usize = 50;
const MIN_GAP: usize = 5;

const BRANCH: &str = "> ";
const LEAF: &str = "- ";

/// Format a section heading with bold/underline. Respects NO_COLOR and TTY.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// `PATH: env/fabric/node/file/` padded to [`VALUE_COLUMN`], then the value.
pub fn format_location_line(record: &PropertyRecord) -> String {
    let mut path = String::from("PATH: ");
    for field in HIERARCHY {
        path.push_str(&record.get(field));
        path.push('/');
    }
    let width = path.chars().count();
    let gap = if width < VALUE_COLUMN {
        VALUE_COLUMN - width
    } else {
        MIN_GAP
    };
    format!("{}{}VALUE: {}", path, " ".repeat(gap), record.value)
}

/// Hierarchy down to `level`; siblings sorted, the lowest printed level
/// marked as leaves.
pub fn format_structure(structure: &Structure, level: StructureLevel) -> String {
    let token = |at: StructureLevel| if at == level { LEAF } else { BRANCH };
    let mut out = format!("DATABASE STRUCTURE @ {} LEVEL\n", level.name());
    for (env, fabrics) in structure {
        out.push_str(env);
        out.push('\n');
        if level == StructureLevel::Environment {
            continue;
        }
        for (fabric, nodes) in fabrics {
            out.push_str(&format!("  {}{}\n", token(StructureLevel::Fabric), fabric));
            if level == StructureLevel::Fabric {
                continue;
            }
            for (node, files) in nodes {
                out.push_str(&format!("    {}{}\n", token(StructureLevel::Node), node));
                if level == StructureLevel::Node {
                    continue;
                }
                for file in files {
                    out.push_str(&format!("      {}{}\n", LEAF, file));
                }
            }
        }
    }
    out
}

pub fn format_find_result(key: &str, lines: &[String]) -> String {
    if lines.is_empty() {
        return format!("Key {} not found in database\n", key);
    }
    let mut out = format!("Locations of key {}\n", key);
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

pub fn format_grep_result(pattern: &str, keys: &BTreeSet<String>) -> String {
    if keys.is_empty() {
        return format!("No keys containing {} in database\n", pattern);
    }
    let mut out = format!("Keys containing {}\n", pattern);
    for key in keys {
        out.push_str(&format!("- {}\n", key));
    }
    out
}

/// Counts and per-environment breakdown.
pub fn format_summary_text(summary: &StoreSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_section_heading("Count")));
    out.push_str(&format!(
        "{} properties currently in database\n\n",
        summary.properties
    ));
    out.push_str(&format!("{}\n", format_section_heading("Environments")));
    if summary.environments.is_empty() {
        out.push_str("No environments.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Environment", "Fabrics", "Nodes", "Files"]);
    for env in &summary.environments {
        table.add_row(vec![
            env.name.clone(),
            env.fabrics.to_string(),
            env.nodes.to_string(),
            env.files.to_string(),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!(
        "Total: {} environments, {} fabrics, {} nodes, {} files.\n",
        summary.environments.len(),
        summary.fabrics,
        summary.nodes,
        summary.files
    ));
    out
}

pub fn format_summary_json(summary: &StoreSummary) -> String {
    let environments: Vec<serde_json::Value> = summary
        .environments
        .iter()
        .map(|env| {
            json!({
                "name": env.name,
                "fabrics": env.fabrics,
                "nodes": env.nodes,
                "files": env.files,
            })
        })
        .collect();
    let value = json!({
        "properties": summary.properties,
        "fabrics": summary.fabrics,
        "nodes": summary.nodes,
        "files": summary.files,
        "environments": environments,
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}
