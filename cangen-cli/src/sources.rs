//! Schema document discovery.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Extension of schema documents inside a directory.
pub const SCHEMA_EXTENSION: &str = "json";

/// One schema document read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Path the document was read from.
    pub path: PathBuf,
    /// Document text.
    pub text: String,
}

/// Expands paths into schema files.
///
/// A file is taken as is; a directory contributes its `*.json` files in
/// sorted order. Subdirectories are not searched.
pub fn collect_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut entries = Vec::new();
            for entry in std::fs::read_dir(path)
                .with_context(|| format!("read schema dir: {}", path.display()))?
            {
                let entry_path = entry
                    .with_context(|| format!("read schema dir: {}", path.display()))?
                    .path();
                if entry_path.is_file()
                    && entry_path.extension().is_some_and(|ext| ext == SCHEMA_EXTENSION)
                {
                    entries.push(entry_path);
                }
            }
            entries.sort();
            tracing::debug!("{}: {} schema file(s)", path.display(), entries.len());
            files.append(&mut entries);
        } else {
            files.push(path.clone());
        }
    }

    Ok(files)
}

/// Reads every schema document named by `paths`.
pub fn load(paths: &[PathBuf]) -> Result<Vec<Source>> {
    collect_paths(paths)?
        .into_iter()
        .map(|path| {
            let text = read(&path)?;
            Ok(Source { path, text })
        })
        .collect()
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read schema: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_paths_sorts_directory_entries() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.json", "a.json", "notes.txt"] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.json")).unwrap();

        let files = collect_paths(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.json", "b.json"]);
    }

    #[test]
    fn test_load_keeps_argument_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("z.json");
        let second = dir.path().join("a.json");
        std::fs::write(&first, "first").unwrap();
        std::fs::write(&second, "second").unwrap();

        let sources = load(&[first.clone(), second]).unwrap();
        assert_eq!(sources[0].path, first);
        assert_eq!(sources[0].text, "first");
        assert_eq!(sources[1].text, "second");
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = load(&[PathBuf::from("/nonexistent/cangen.json")]).unwrap_err();
        assert!(format!("{err:#}").contains("read schema: /nonexistent/cangen.json"));
    }
}
