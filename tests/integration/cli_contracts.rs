use clap::Parser;
use lighthouse::store::StoreBackend;
use lighthouse::tooling::cli::{
    Cli, CliContext, Commands, EMPTY_STORE, POPULATE_USAGE, STRUCTURE_USAGE,
};
use std::fs;
use tempfile::TempDir;

use crate::integration::support::{context, sample_tree, with_xdg_env, BACKENDS};

fn populate_cmd(root: std::path::PathBuf) -> Commands {
    Commands::Populate {
        root,
        format: "text".to_string(),
    }
}

#[test]
fn find_output_contract() {
    for backend in BACKENDS {
        let temp = TempDir::new().unwrap();
        let (rwc, _) = sample_tree(&temp);
        let mut cli = context(&temp, backend);

        let out = cli
            .execute(&Commands::Find {
                key: "testk".to_string(),
                location: None,
            })
            .unwrap();
        assert_eq!(out, EMPTY_STORE);

        let out = cli.execute(&populate_cmd(rwc)).unwrap();
        assert!(out.starts_with("Added 3 properties to database"), "{}", out);

        let out = cli
            .execute(&Commands::Find {
                key: "testk".to_string(),
                location: Some("Redwood-City/storm/h2/*".to_string()),
            })
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Locations of key testk");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with("VALUE: testv"));

        let out = cli
            .execute(&Commands::Find {
                key: "nope".to_string(),
                location: None,
            })
            .unwrap();
        assert_eq!(out.trim_end(), "Key nope not found in database");
    }
}

#[test]
fn structure_usage_and_levels() {
    let temp = TempDir::new().unwrap();
    let (rwc, tree) = sample_tree(&temp);
    let mut cli = context(&temp, StoreBackend::Sqlite);

    let out = cli
        .execute(&Commands::Structure {
            level: "4".to_string(),
        })
        .unwrap();
    assert_eq!(out, EMPTY_STORE);

    cli.execute(&populate_cmd(rwc)).unwrap();
    cli.execute(&populate_cmd(tree)).unwrap();

    for bad in ["0", "5", "two", ""] {
        let out = cli
            .execute(&Commands::Structure {
                level: bad.to_string(),
            })
            .unwrap();
        assert_eq!(out, STRUCTURE_USAGE, "level {:?}", bad);
    }

    let out = cli
        .execute(&Commands::Structure {
            level: "3".to_string(),
        })
        .unwrap();
    assert!(out.starts_with("DATABASE STRUCTURE @ FABRIC LEVEL\n"));
    assert!(out.contains("Redwood-City\n  - storm\n  - zookeeper\n"));
    assert!(out.contains("developer1\n  - elastic\n  - storm\n"));
    assert!(!out.contains("h2"));
}

#[test]
fn grep_tree_info_and_clear() {
    let temp = TempDir::new().unwrap();
    let (rwc, _) = sample_tree(&temp);
    let mut cli = context(&temp, StoreBackend::Sled);
    cli.execute(&populate_cmd(rwc)).unwrap();

    let out = cli
        .execute(&Commands::Grep {
            pattern: "mongo".to_string(),
        })
        .unwrap();
    assert_eq!(out.trim_end(), "Keys containing mongo\n- mongo.port");

    let out = cli
        .execute(&Commands::Tree {
            path: "Redwood-City".to_string(),
            depth: 1,
        })
        .unwrap();
    assert_eq!(out, "Redwood-City\n | storm\n | zookeeper\n");

    let out = cli
        .execute(&Commands::Info {
            format: "text".to_string(),
        })
        .unwrap();
    assert!(out.contains("3 properties currently in database"));
    assert!(out.contains("Redwood-City"));

    let out = cli.execute(&Commands::Clear { yes: true }).unwrap();
    assert_eq!(out, "Cleared 3 properties");
    assert_eq!(cli.store().count().unwrap(), 0);
}

#[test]
fn populate_missing_root_prints_usage() {
    let temp = TempDir::new().unwrap();
    let mut cli = context(&temp, StoreBackend::Sled);
    let out = cli
        .execute(&populate_cmd(temp.path().join("missing")))
        .unwrap();
    assert!(out.starts_with("cannot resolve root"));
    assert!(out.ends_with(POPULATE_USAGE));
}

#[test]
fn config_file_and_flags_select_the_store() {
    let temp = TempDir::new().unwrap();
    with_xdg_env(&temp, || {
        let config_dir = temp.path().join("config").join("lighthouse");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(
            config_dir.join("config.toml"),
            "[storage]\nbackend = \"sqlite\"\nbatch_size = 7\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from(["lighthouse", "info"]).unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.storage.backend, StoreBackend::Sqlite);
        assert_eq!(config.storage.batch_size, 7);
        assert!(config
            .storage
            .resolve_path()
            .unwrap()
            .starts_with(temp.path().join("data")));

        let store = temp.path().join("explicit");
        let cli = Cli::try_parse_from([
            "lighthouse",
            "--backend",
            "sled",
            "--store",
            store.to_str().unwrap(),
            "--log-level",
            "debug",
            "info",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.storage.backend, StoreBackend::Sled);
        assert_eq!(config.storage.path.as_deref(), Some(store.as_path()));
        assert_eq!(config.logging.level, "debug");

        let ctx = CliContext::new(config).unwrap();
        assert_eq!(ctx.store_path(), store.as_path());
    });
}
