//! Format variants and the selection table.

use super::{conf, hosts, info, list, properties, xml, yaml, Malformed, NormalizeFn};
use crate::types::PropertyMap;
use std::path::Path;

/// Allow/deny list flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Whitelist,
    Blacklist,
}

impl ListKind {
    pub fn name(self) -> &'static str {
        match self {
            ListKind::Whitelist => "whitelist",
            ListKind::Blacklist => "blacklist",
        }
    }
}

/// Supported configuration syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Conf,
    Yaml,
    Properties,
    Hosts,
    Xml,
    Info,
    List(ListKind),
}

/// How a table row recognises a file.
enum Selector {
    Extension(&'static [&'static str]),
    FileName(&'static str),
}

impl Selector {
    fn matches(&self, extension: Option<&str>, file_name: Option<&str>) -> bool {
        match self {
            Selector::Extension(exts) => extension
                .map(|ext| exts.iter().any(|e| e.eq_ignore_ascii_case(ext)))
                .unwrap_or(false),
            Selector::FileName(name) => file_name
                .map(|n| n.eq_ignore_ascii_case(name))
                .unwrap_or(false),
        }
    }
}

/// Evaluated top to bottom; first match wins.
const DISPATCH: &[(Selector, Format)] = &[
    (Selector::Extension(&["config", "conf", "cfg"]), Format::Conf),
    (Selector::Extension(&["yaml", "yml"]), Format::Yaml),
    (Selector::Extension(&["properties", "prop"]), Format::Properties),
    (Selector::FileName("hosts"), Format::Hosts),
    (Selector::Extension(&["xml"]), Format::Xml),
    (Selector::Extension(&["info"]), Format::Info),
    (
        Selector::Extension(&["whitelist"]),
        Format::List(ListKind::Whitelist),
    ),
    (
        Selector::Extension(&["blacklist"]),
        Format::List(ListKind::Blacklist),
    ),
];

impl Format {
    /// Select a format from the path's extension or file name.
    pub fn detect(path: &Path) -> Option<Format> {
        let extension = path.extension().and_then(|e| e.to_str());
        let file_name = path.file_name().and_then(|n| n.to_str());
        DISPATCH
            .iter()
            .find(|(selector, _)| selector.matches(extension, file_name))
            .map(|(_, format)| *format)
    }

    /// Human-readable format name used in error descriptions.
    pub fn name(self) -> &'static str {
        match self {
            Format::Conf => ".config",
            Format::Yaml => "YAML",
            Format::Properties => ".properties",
            Format::Hosts => "hosts",
            Format::Xml => "XML",
            Format::Info => ".info",
            Format::List(ListKind::Whitelist) => ".whitelist",
            Format::List(ListKind::Blacklist) => ".blacklist",
        }
    }

    /// Normalize file contents into `out`.
    pub fn normalize(self, content: &str, out: &mut PropertyMap) -> Result<(), Malformed> {
        let normalize: NormalizeFn = match self {
            Format::Conf => conf::normalize,
            Format::Yaml => yaml::normalize,
            Format::Properties => properties::normalize,
            Format::Hosts => hosts::normalize,
            Format::Xml => xml::normalize,
            Format::Info => info::normalize,
            Format::List(ListKind::Whitelist) => list::normalize_whitelist,
            Format::List(ListKind::Blacklist) => list::normalize_blacklist,
        };
        normalize(content, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(name: &str) -> Option<Format> {
        Format::detect(Path::new(name))
    }

    #[test]
    fn detects_by_extension_case_insensitively() {
        assert_eq!(detect("/a/b/app.CONF"), Some(Format::Conf));
        assert_eq!(detect("app.config"), Some(Format::Conf));
        assert_eq!(detect("app.cfg"), Some(Format::Conf));
        assert_eq!(detect("app.Yml"), Some(Format::Yaml));
        assert_eq!(detect("app.yaml"), Some(Format::Yaml));
        assert_eq!(detect("sth2.prop"), Some(Format::Properties));
        assert_eq!(detect("app.properties"), Some(Format::Properties));
        assert_eq!(detect("pom.xml"), Some(Format::Xml));
        assert_eq!(detect("build.info"), Some(Format::Info));
        assert_eq!(detect("ip.whitelist"), Some(Format::List(ListKind::Whitelist)));
        assert_eq!(detect("ip.BLACKLIST"), Some(Format::List(ListKind::Blacklist)));
    }

    #[test]
    fn hosts_matches_on_exact_file_name() {
        assert_eq!(detect("/etc/hosts"), Some(Format::Hosts));
        assert_eq!(detect("HOSTS"), Some(Format::Hosts));
        assert_eq!(detect("hosts.conf"), Some(Format::Conf));
        assert_eq!(detect("myhosts"), None);
    }

    #[test]
    fn unknown_files_have_no_format() {
        assert_eq!(detect("README.md"), None);
        assert_eq!(detect("Makefile"), None);
        assert_eq!(detect("archive.tar.gz"), None);
    }
}
