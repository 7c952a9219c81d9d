//! Integration tests for filememo

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Command isolated from the user's config and cache
    fn filememo(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("filememo");
        cmd.env("FILEMEMO_CONFIG", temp.path().join("config.toml"))
            .env("FILEMEMO_DIR", temp.path().join("cache"))
            .env_remove("FILEMEMO_VERSION");
        cmd
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        filememo(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("filesystem memoization cache"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        filememo(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("filememo"));
    }

    #[test]
    fn path_uses_dir_and_version() {
        let temp = TempDir::new().unwrap();
        let expected = temp.path().join("cache").join("v9");
        filememo(&temp)
            .args(["path", "--cache-version", "v9"])
            .assert()
            .success()
            .stdout(predicate::str::contains(expected.display().to_string()));
    }

    #[test]
    fn key_prints_identity() {
        let temp = TempDir::new().unwrap();
        let identity = filememo::compute_identity("user").unwrap();
        filememo(&temp)
            .args(["key", "user"])
            .assert()
            .success()
            .stdout(predicate::str::contains(identity));
    }

    #[test]
    fn set_get_rm_roundtrip() {
        let temp = TempDir::new().unwrap();

        filememo(&temp)
            .args(["set", "user", r#"{"name":"ada","langs":["rust"]}"#])
            .assert()
            .success()
            .stdout(predicate::str::contains("Stored entry"));

        filememo(&temp)
            .args(["get", "user"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"{"name":"ada","langs":["rust"]}"#));

        filememo(&temp)
            .args(["rm", "user"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed entry"));

        filememo(&temp)
            .args(["get", "user"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No cached entry"));
    }

    #[test]
    fn cli_reads_library_entries() {
        let temp = TempDir::new().unwrap();
        let memo = filememo::Memo::with_dir(temp.path().join("cache"));
        memo.store(&("page", 2), "<html>page two</html>").unwrap();
        memo.store("ids", &vec![1u64, 2]).unwrap();

        filememo(&temp)
            .args(["get", r#"["page", 2]"#])
            .assert()
            .success()
            .stdout(predicate::str::contains("<html>page two</html>"));

        filememo(&temp)
            .args(["get", "ids"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("non-string value"));
    }

    #[test]
    fn key_rejects_path_separator_version() {
        let temp = TempDir::new().unwrap();
        filememo(&temp)
            .args(["--cache-version", "a/b", "key", "user"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid cache version"))
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn disabled_get_misses() {
        let temp = TempDir::new().unwrap();
        filememo(&temp).args(["set", "k", "v"]).assert().success();

        filememo(&temp)
            .args(["--disabled", "get", "k"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No cached entry"));
    }

    #[test]
    fn list_and_clear() {
        let temp = TempDir::new().unwrap();
        filememo(&temp).args(["set", "a", "1"]).assert().success();
        filememo(&temp).args(["set", "b", "2"]).assert().success();

        filememo(&temp)
            .args(["list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                filememo::compute_identity("a").unwrap(),
            ));

        filememo(&temp)
            .args(["clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed 2 entries"));

        filememo(&temp)
            .args(["list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn clear_without_yes_is_cancelled_non_interactive() {
        let temp = TempDir::new().unwrap();
        filememo(&temp).args(["set", "a", "1"]).assert().success();

        filememo(&temp)
            .arg("clear")
            .assert()
            .success()
            .stdout(predicate::str::contains("Clear cancelled"));
    }

    #[test]
    fn invalid_version_shows_hint() {
        let temp = TempDir::new().unwrap();
        filememo(&temp)
            .args(["--cache-version", "a/b", "set", "k", "v"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid cache version"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn config_init_and_show() {
        let temp = TempDir::new().unwrap();
        filememo(&temp)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration initialized"));

        filememo(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"));

        filememo(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_version_is_used() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.toml"),
            "[cache]\nversion = \"from-config\"\n",
        )
        .unwrap();

        filememo(&temp)
            .arg("path")
            .assert()
            .success()
            .stdout(predicate::str::contains("from-config"));
    }
}

mod protocol_tests {
    use filememo::{Decision, Lookup, Memo, MemoError};
    use serde::{Deserialize, Serialize};
    use std::cell::Cell;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn upper_all(memo: &Memo, items: &[&str]) -> Vec<String> {
        memo.with_cache(
            "q",
            BTreeMap::new(),
            |mut seen: BTreeMap<String, String>| {
                let out: Vec<String> = items
                    .iter()
                    .map(|item| {
                        seen.entry(item.to_string())
                            .or_insert_with(|| item.to_uppercase())
                            .clone()
                    })
                    .collect();
                Decision::PartialCache {
                    store: seen,
                    value: out,
                }
            },
        )
        .unwrap()
    }

    fn stored_map(memo: &Memo) -> BTreeMap<String, String> {
        match memo.fetch("q").unwrap() {
            Lookup::Hit(map) => map,
            Lookup::Miss => panic!("accumulator was not persisted"),
        }
    }

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn accumulator_scenario() {
        let temp = TempDir::new().unwrap();
        let memo = Memo::with_dir(temp.path());

        assert_eq!(upper_all(&memo, &["a", "b"]), vec!["A", "B"]);
        assert_eq!(stored_map(&memo), map(&[("a", "A"), ("b", "B")]));

        assert_eq!(upper_all(&memo, &["a", "c"]), vec!["A", "C"]);
        assert_eq!(
            stored_map(&memo),
            map(&[("a", "A"), ("b", "B"), ("c", "C")])
        );
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Report {
        totals: BTreeMap<String, u32>,
        generated_at: String,
    }

    #[test]
    fn partial_cache_keeps_ephemeral_fields_out() {
        let temp = TempDir::new().unwrap();
        let memo = Memo::with_dir(temp.path());
        let run = |stamp: &str| -> Report {
            memo.with_cache("report", BTreeMap::new(), |mut totals: BTreeMap<String, u32>| {
                *totals.entry("runs".to_string()).or_insert(0) += 1;
                Decision::PartialCache {
                    store: totals.clone(),
                    value: Report {
                        totals,
                        generated_at: stamp.to_string(),
                    },
                }
            })
            .unwrap()
        };

        assert_eq!(run("t0").totals["runs"], 1);
        let second = run("t1");
        assert_eq!(second.totals["runs"], 2);
        assert_eq!(second.generated_at, "t1");

        let raw: Lookup<BTreeMap<String, u32>> = memo.fetch("report").unwrap();
        let expected: BTreeMap<String, u32> = [("runs".to_string(), 2)].into_iter().collect();
        assert_eq!(raw, Lookup::Hit(expected));
    }

    #[test]
    fn entries_survive_new_handles() {
        let temp = TempDir::new().unwrap();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            Decision::Cache(vec![1u64, 1, 2, 3, 5, 8])
        };

        let first: Vec<u64> = Memo::with_dir(temp.path()).cached("fib", compute).unwrap();
        let second: Vec<u64> = Memo::with_dir(temp.path()).cached("fib", compute).unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn version_bump_recomputes() {
        let temp = TempDir::new().unwrap();
        let v1 = Memo::with_dir(temp.path()).with_version(1u64);
        let v2 = v1.clone().with_version(2u64);

        let a: String = v1.cached("k", || Decision::Cache("old".to_string())).unwrap();
        let b: String = v2.cached("k", || Decision::Cache("new".to_string())).unwrap();
        let c: String = v1.cached("k", || Decision::Cache("unused".to_string())).unwrap();

        assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("old", "new", "old"));
        assert!(temp.path().join("1").is_dir());
        assert!(temp.path().join("2").is_dir());
    }

    #[test]
    fn disabled_handle_ignores_existing_entries() {
        let temp = TempDir::new().unwrap();
        let memo = Memo::with_dir(temp.path());
        memo.store("k", "on disk").unwrap();

        let disabled = memo.with_enabled(false);
        let value = disabled
            .with_cache("k", "default".to_string(), |current| {
                Decision::Cache(format!("{}+", current))
            })
            .unwrap();

        assert_eq!(value, "default+");
        let untouched: Lookup<String> = Memo::with_dir(temp.path()).fetch("k").unwrap();
        assert_eq!(untouched, Lookup::Hit("on disk".to_string()));
    }

    #[test]
    fn corrupted_entry_is_regenerated() {
        let temp = TempDir::new().unwrap();
        let memo = Memo::with_dir(temp.path());
        let path = memo.location_of("k").unwrap();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{truncated").unwrap();

        let value: u32 = memo.cached("k", || Decision::Cache(42)).unwrap();

        assert_eq!(value, 42);
        assert_eq!(memo.fetch::<u32, _>("k").unwrap(), Lookup::Hit(42));
    }

    #[test]
    fn protocol_violation_is_returned_not_raised() {
        let temp = TempDir::new().unwrap();
        let memo = Memo::with_dir(temp.path());

        let err = memo
            .cached("k", || Decision::PartialCache {
                store: "s".to_string(),
                value: "r".to_string(),
            })
            .unwrap_err();

        assert!(matches!(err, MemoError::ProtocolViolation { .. }));
        assert!(err.is_programmer_error());
        assert!(err.to_string().contains("\"store\":\"s\""));
    }
}

mod default_dir_tests {
    use filememo::Memo;
    use serial_test::serial;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    #[serial]
    fn default_base_dir_follows_tmpdir() {
        let temp = TempDir::new().unwrap();
        let previous = std::env::var_os("TMPDIR");
        std::env::set_var("TMPDIR", temp.path());

        let memo = Memo::new();

        match previous {
            Some(value) => std::env::set_var("TMPDIR", value),
            None => std::env::remove_var("TMPDIR"),
        }
        assert_eq!(memo.base_dir(), temp.path().join("filememo"));
    }
}
