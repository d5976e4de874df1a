//! Optional TOML configuration file.
//!
//! ```toml
//! [engine]
//! workers = 4
//! ```
//!
//! Missing tables and keys fall back to their defaults. Command-line flags
//! override values from the file.

use std::path::Path;

use anyhow::{Context, Result};
use centra_core::CentralityConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub engine: CentralityConfig,
}

pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<FileConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Merge the config file (if any) with command-line overrides.
pub fn resolve_engine_config(
    path: Option<&Path>,
    workers: Option<usize>,
) -> Result<CentralityConfig> {
    let mut engine = match path {
        Some(path) => load_file_config(path)?.engine,
        None => CentralityConfig::default(),
    };

    if let Some(workers) = workers {
        engine.workers = workers;
    }

    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn defaults_without_file() {
        let engine = resolve_engine_config(None, None).expect("defaults");
        assert_eq!(engine, CentralityConfig::default());
    }

    #[test]
    fn file_values_are_used() {
        let file = write_config("[engine]\nworkers = 3\n");
        let engine = resolve_engine_config(Some(file.path()), None).expect("valid config");
        assert_eq!(engine.workers, 3);
    }

    #[test]
    fn flag_overrides_file() {
        let file = write_config("[engine]\nworkers = 3\n");
        let engine = resolve_engine_config(Some(file.path()), Some(1)).expect("valid config");
        assert_eq!(engine.workers, 1);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let file = write_config("");
        let engine = resolve_engine_config(Some(file.path()), None).expect("valid config");
        assert_eq!(engine, CentralityConfig::default());
    }

    #[test]
    fn unknown_table_is_rejected() {
        let file = write_config("[search]\nsemantic = true\n");
        let err = resolve_engine_config(Some(file.path()), None).expect_err("unknown table");
        assert!(format!("{err:#}").contains("Failed to parse"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = resolve_engine_config(Some(Path::new("/nonexistent/centra.toml")), None)
            .expect_err("missing file");
        assert!(err.to_string().contains("Failed to read"));
    }
}
