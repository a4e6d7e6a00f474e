//! Telop definition loading
//!
//! Definitions live in TOML files under a directory (any nesting), each file
//! holding one or more `[[telop]]` entries. A broken file costs only that
//! file; duplicate ids keep the first definition seen.

use std::fs;
use std::path::Path;

use hashbrown::HashSet;
use tracing::warn;

use super::definition::{TelopConfig, TelopDefinition};
use super::error::TelopError;

/// Load telop definitions from a single TOML file.
pub fn load_telops_from_file(path: &Path) -> Result<Vec<TelopDefinition>, TelopError> {
    let content = fs::read_to_string(path).map_err(|source| TelopError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let config: TelopConfig = toml::from_str(&content).map_err(|source| TelopError::ParseToml {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;

    Ok(config.telops)
}

/// Load all telop definitions from a directory (recursive).
///
/// Unreadable or unparseable files are logged and skipped. A missing
/// directory is an empty definition set, not an error.
pub fn load_telops_from_dir(dir: &Path) -> Result<Vec<TelopDefinition>, TelopError> {
    let mut telops = Vec::new();

    if !dir.exists() {
        return Ok(telops);
    }

    load_recursive(dir, &mut telops)?;
    dedup_by_id(&mut telops);
    Ok(telops)
}

fn load_recursive(dir: &Path, telops: &mut Vec<TelopDefinition>) -> Result<(), TelopError> {
    let entries = fs::read_dir(dir).map_err(|source| TelopError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_dir() {
            load_recursive(&path, telops)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match load_telops_from_file(&path) {
                Ok(file_telops) => telops.extend(file_telops),
                Err(e) => warn!(error = %e, "skipping telop file"),
            }
        }
    }

    Ok(())
}

fn dedup_by_id(telops: &mut Vec<TelopDefinition>) {
    let mut seen = HashSet::new();
    telops.retain(|telop| {
        if seen.insert(telop.id) {
            true
        } else {
            warn!(telop_id = telop.id, title = %telop.title, "duplicate telop id, keeping the first definition");
            false
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn loads_recursively_and_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("raids");
        fs::create_dir(&nested).unwrap();

        write_file(
            dir.path(),
            "general.toml",
            r#"
[[telop]]
id = 1
title = "One"
keyword = "one"
"#,
        );
        write_file(
            &nested,
            "raid.toml",
            r#"
[[telop]]
id = 2
title = "Two"
keyword = "two"

[[telop]]
id = 3
title = "Three"
keyword = "three"
"#,
        );
        write_file(&nested, "broken.toml", "[[telop]\nnot toml");
        write_file(&nested, "notes.txt", "ignored entirely");

        let mut telops = load_telops_from_dir(dir.path()).unwrap();
        telops.sort_by_key(|t| t.id);

        let ids: Vec<i64> = telops.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn duplicate_ids_keep_the_first_definition() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "a.toml",
            r#"
[[telop]]
id = 1
title = "First"
keyword = "first"

[[telop]]
id = 1
title = "Second"
keyword = "second"
"#,
        );

        let telops = load_telops_from_dir(dir.path()).unwrap();
        assert_eq!(telops.len(), 1);
        assert_eq!(telops[0].title, "First");
    }

    #[test]
    fn missing_directory_is_an_empty_set() {
        let telops = load_telops_from_dir(Path::new("/nonexistent/telops")).unwrap();
        assert!(telops.is_empty());
    }
}
