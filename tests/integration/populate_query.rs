use lighthouse::query::{QueryEngine, StructureLevel};
use lighthouse::store::open_store;
use lighthouse::walker::DirectoryWalker;
use lighthouse::populate::populate;
use std::time::Duration;
use tempfile::TempDir;

use crate::integration::support::{sample_tree, BACKENDS};

#[test]
fn populate_and_query_both_backends() {
    for backend in BACKENDS {
        let temp = TempDir::new().unwrap();
        let (rwc, tree) = sample_tree(&temp);
        let mut store = open_store(backend, &temp.path().join("db"), Duration::from_secs(5)).unwrap();

        let first = populate(store.as_mut(), &DirectoryWalker::new(&rwc).unwrap(), 3).unwrap();
        assert_eq!(first.properties_added, 3, "{:?}", backend);
        let second = populate(store.as_mut(), &DirectoryWalker::new(&tree).unwrap(), 3).unwrap();
        assert_eq!(second.properties_added, 2, "{:?}", backend);
        assert_eq!(second.unsupported.len(), 1);

        let engine = QueryEngine::new(store.as_ref());

        let hit = engine
            .find_prop("testk", Some("Redwood-City/storm/h2/*"))
            .unwrap();
        assert_eq!(hit.len(), 1);
        assert!(hit[0].contains("testv"));
        assert!(hit[0].starts_with("PATH: Redwood-City/storm/h2/sth2.prop/"));

        let dev = engine.find_prop("testk", Some("developer1/*/*/*")).unwrap();
        assert_eq!(dev.len(), 1);
        assert!(dev[0].contains("devv"));

        let all = engine.find_prop("testk", None).unwrap();
        assert_eq!(all.len(), 2);
        assert!(hit.iter().chain(&dev).all(|line| all.contains(line)));

        assert!(engine.find_prop("testk", Some("developer8/*/*/*")).unwrap().is_empty());
        assert!(engine.find_prop("missing", None).unwrap().is_empty());
    }
}

#[test]
fn redwood_city_alone_has_no_developer_hits() {
    let temp = TempDir::new().unwrap();
    let (rwc, _) = sample_tree(&temp);
    let mut store = open_store(
        Default::default(),
        &temp.path().join("db"),
        Duration::from_secs(5),
    )
    .unwrap();
    populate(store.as_mut(), &DirectoryWalker::new(&rwc).unwrap(), 100).unwrap();

    let engine = QueryEngine::new(store.as_ref());
    assert!(engine
        .find_prop("testk", Some("developer1/*/*/*"))
        .unwrap()
        .is_empty());
}

#[test]
fn structure_grep_and_environments() {
    let temp = TempDir::new().unwrap();
    let (rwc, tree) = sample_tree(&temp);
    let mut store = open_store(
        Default::default(),
        &temp.path().join("db"),
        Duration::from_secs(5),
    )
    .unwrap();
    populate(store.as_mut(), &DirectoryWalker::new(&rwc).unwrap(), 100).unwrap();
    populate(store.as_mut(), &DirectoryWalker::new(&tree).unwrap(), 100).unwrap();
    let engine = QueryEngine::new(store.as_ref());

    let text = engine.print_structure(StructureLevel::Environment).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "DATABASE STRUCTURE @ ENVIRONMENT LEVEL",
            "Redwood-City",
            "developer1"
        ]
    );

    let text = engine.print_structure(StructureLevel::File).unwrap();
    assert!(text.contains("  > storm\n    > h2\n      - sth2.prop\n"));

    let keys = engine.grep("mongo").unwrap();
    assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["mongo.port"]);

    let first = engine.environments().unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(engine.environments().unwrap(), first);
}

#[test]
fn path_index_reflects_store() {
    let temp = TempDir::new().unwrap();
    let (_, tree) = sample_tree(&temp);
    let mut store = open_store(
        Default::default(),
        &temp.path().join("db"),
        Duration::from_secs(5),
    )
    .unwrap();
    populate(store.as_mut(), &DirectoryWalker::new(&tree).unwrap(), 100).unwrap();

    let index = QueryEngine::new(store.as_ref()).path_index().unwrap();
    assert!(index.has_key("developer1/elastic/h3/es.yaml"));
    assert_eq!(index.len(), 2);
    let mut fabrics = index.children("developer1").unwrap();
    fabrics.sort();
    assert_eq!(fabrics, vec!["elastic", "storm"]);
    let root = index.root().unwrap();
    assert_eq!(index.count_nodes(root, 3, true), 2);
}
