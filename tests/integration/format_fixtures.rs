use lighthouse::parser::{FileParser, Format};
use lighthouse::types::PropertyMap;
use std::path::Path;
use tempfile::TempDir;

use crate::integration::support::write;

fn parse(dir: &Path, name: &str, content: &str) -> PropertyMap {
    write(dir, name, content);
    let mut parser = FileParser::new(&dir.join(name));
    assert!(
        parser.parse_file(),
        "{} failed: {:?}",
        name,
        parser.error_description()
    );
    parser.into_data()
}

fn get<'a>(map: &'a PropertyMap, key: &str) -> Option<&'a str> {
    map.get(key).map(String::as_str)
}

#[test]
fn every_supported_format_normalizes() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    let conf = parse(dir, "app.conf", "# c\n[server]\nport = 80\n");
    assert_eq!(get(&conf, "server.port"), Some("80"));

    let yaml = parse(dir, "app.yml", "db:\n  hosts: [a, b]\n");
    assert_eq!(get(&yaml, "db.hosts"), Some("[a,b]"));

    let props = parse(dir, "app.properties", "a.b=c\nlist=x,y\n");
    assert_eq!(get(&props, "a.b"), Some("c"));
    assert_eq!(get(&props, "list"), Some("[x,y]"));

    let hosts = parse(dir, "hosts", "127.0.0.1 localhost # loop\n");
    assert_eq!(get(&hosts, "localhost"), Some("127.0.0.1"));

    let xml = parse(dir, "app.xml", "<cfg><db port=\"5432\">main</db></cfg>");
    assert_eq!(get(&xml, "cfg.db"), Some("main"));
    assert_eq!(get(&xml, "cfg.db.@port"), Some("5432"));

    let info = parse(dir, "node.info", "os: linux\n");
    assert_eq!(get(&info, "os"), Some("linux"));

    let list = parse(dir, "ips.whitelist", "10.0.0.1\n");
    assert_eq!(get(&list, "10.0.0.1"), Some("whitelist"));
}

#[test]
fn malformed_and_unsupported_are_reported() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    write(dir, "broken.xml", "<cfg><open></cfg>");
    let mut parser = FileParser::new(&dir.join("broken.xml"));
    assert_eq!(parser.format(), Some(Format::Xml));
    assert!(!parser.parse_file());
    let message = parser.error_description().unwrap();
    assert!(message.contains("broken.xml"));

    write(dir, "notes.txt", "hello");
    let mut parser = FileParser::new(&dir.join("notes.txt"));
    assert_eq!(parser.format(), None);
    assert!(!parser.parse_file());
    assert!(parser.data().is_none());
    assert!(parser.error_description().unwrap().starts_with("unsupported: "));
}
