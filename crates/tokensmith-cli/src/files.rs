//! Reading documents and store snapshots from disk.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tokensmith::MemoryStore;

/// Document formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Format::Yaml
            }
            _ => Format::Json,
        }
    }
}

/// Parses a JSON or YAML document, picking the format from the extension.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;

    match Format::for_path(path) {
        Format::Yaml => serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse YAML document {}", path.display())),
        Format::Json => serde_json::from_str(&text)
            .with_context(|| format!("failed to parse JSON document {}", path.display())),
    }
}

/// Loads a store snapshot; a missing file yields an empty store.
pub fn load_store(path: &Path) -> Result<MemoryStore> {
    match fs::read_to_string(path) {
        Ok(text) => serde_json::from_str(&text)
            .with_context(|| format!("failed to parse store snapshot {}", path.display())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no snapshot found, starting empty");
            Ok(MemoryStore::new())
        }
        Err(e) => {
            Err(e).with_context(|| format!("failed to read store snapshot {}", path.display()))
        }
    }
}

pub fn save_store(path: &Path, store: &MemoryStore) -> Result<()> {
    let text = serde_json::to_string_pretty(store).context("failed to serialize store")?;
    fs::write(path, text + "\n")
        .with_context(|| format!("failed to write store snapshot {}", path.display()))?;
    tracing::info!(path = %path.display(), "snapshot written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokensmith::TokenDocument;

    #[test]
    fn test_format_by_extension() {
        assert_eq!(Format::for_path(Path::new("a.yaml")), Format::Yaml);
        assert_eq!(Format::for_path(Path::new("a.YML")), Format::Yaml);
        assert_eq!(Format::for_path(Path::new("a.json")), Format::Json);
        assert_eq!(Format::for_path(Path::new("tokens")), Format::Json);
    }

    #[test]
    fn test_missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_store(&dir.path().join("absent.json")).unwrap();
        assert!(tokensmith::list_collections(&store).is_empty());
    }

    #[test]
    fn test_yaml_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.yaml");
        fs::write(
            &path,
            "- name: Palette\n  modes: [Default]\n  variables:\n    red:\n      type: color\n      Default: '#FF0000'\n",
        )
        .unwrap();

        let doc: TokenDocument = load_document(&path).unwrap();
        let collections = doc.into_collections().unwrap();
        assert_eq!(collections[0].name, "Palette");
        assert_eq!(
            collections[0].variables["red"].value_for("Default").and_then(|v| v.as_str()),
            Some("#FF0000")
        );
    }

    #[test]
    fn test_parse_failure_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_document::<TokenDocument>(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }
}
