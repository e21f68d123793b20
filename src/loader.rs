//! Bulk loading of stub definitions from a directory.
//!
//! Each file holds one stub document (JSON by default, YAML by
//! extension) that deserializes straight to [`Stub`]. Malformed files
//! are skipped with a warning; they never abort the load.

use crate::storage::StubStore;
use crate::stub::Stub;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Read every stub file under `dir` (non-recursive) and register it with
/// the store. Returns the number of stubs registered.
pub fn load_dir(store: &StubStore, dir: &Path) -> Result<usize> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("can't read stubs from {}", dir.display()))?;

    let mut loaded = 0;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        match read_stub(&path) {
            Ok(stub) => {
                store.register(stub);
                loaded += 1;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping stub file");
            }
        }
    }

    info!(count = loaded, dir = %dir.display(), "loaded stubs");
    Ok(loaded)
}

fn read_stub(path: &Path) -> Result<Stub> {
    let content = fs::read_to_string(path)?;
    let stub = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    Ok(stub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{FindQuery, Meta};
    use serde_json::json;

    #[test]
    fn test_load_dir_registers_stubs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("hello.json"),
            r#"{
                "service": "Greeter",
                "method": "Hello",
                "input": { "equals": { "name": "Ann" } },
                "output": { "data": { "message": "Hi Ann" } }
            }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("goodbye.yaml"),
            "service: Greeter\nmethod: Goodbye\ninput:\n  contains:\n    name: Ann\noutput:\n  data:\n    message: Bye Ann\n",
        )
        .unwrap();

        let store = StubStore::new();
        let loaded = load_dir(&store, dir.path()).unwrap();
        assert_eq!(loaded, 2);

        let output = store
            .resolve(&FindQuery {
                service: "Greeter".to_string(),
                method: "Goodbye".to_string(),
                data: json!({"name": "Ann"}).as_object().unwrap().clone(),
                meta: Meta::new(),
            })
            .unwrap();
        assert_eq!(output.data["message"], "Bye Ann");
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        fs::write(
            dir.path().join("ok.json"),
            r#"{"service": "S", "method": "M", "input": {"equals": {}}}"#,
        )
        .unwrap();

        let store = StubStore::new();
        let loaded = load_dir(&store, dir.path()).unwrap();
        assert_eq!(loaded, 1);
        assert!(store.list().contains_key("S"));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let store = StubStore::new();
        let err = load_dir(&store, Path::new("/nonexistent/stub/dir")).unwrap_err();
        assert!(err.to_string().contains("can't read stubs"));
    }
}
