use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::CovstatConfig;
use crate::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".covstat.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse config from a TOML string
pub fn parse_config(contents: &str) -> Result<CovstatConfig> {
    let config = toml::from_str::<CovstatConfig>(contents)
        .map_err(|e| Error::Configuration(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e)))?;

    if config
        .root_module
        .as_deref()
        .is_some_and(|m| m.trim().is_empty())
    {
        return Err(Error::Configuration(
            "root_module must not be empty".to_string(),
        ));
    }

    Ok(config)
}

/// Try loading config from a specific path, logging anything but "not found"
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<CovstatConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Directory ancestors of `start`, `start` included, up to `max_depth` entries
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for the nearest config file
pub fn load_config_from(start: PathBuf) -> CovstatConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            CovstatConfig::default()
        })
}

pub fn load_config() -> CovstatConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            CovstatConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config_full() {
        let config = parse_config(
            r#"
root_module = "github.com/acme/project"
format = "json"
sort = true
"#,
        )
        .unwrap();

        assert_eq!(config.root_module.as_deref(), Some("github.com/acme/project"));
        assert_eq!(config.format(), OutputFormat::Json);
        assert!(config.sort());
    }

    #[test]
    fn test_parse_config_empty_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, CovstatConfig::default());
        assert_eq!(config.format(), OutputFormat::Terminal);
        assert!(!config.sort());
    }

    #[test]
    fn test_parse_config_rejects_unknown_and_empty() {
        assert!(parse_config("colour = true").is_err());
        assert!(parse_config("root_module = \"  \"").is_err());
    }

    #[test]
    fn test_load_config_from_ancestor() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join(CONFIG_FILE_NAME), "sort = true\n").unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let config = load_config_from(nested);
        assert_eq!(config.sort, Some(true));
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join(CONFIG_FILE_NAME), "format = \"xml\"\n").unwrap();

        assert!(try_load_config_from_path(&root.path().join(CONFIG_FILE_NAME)).is_none());
    }

    #[test]
    fn test_directory_ancestors_respects_depth() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c"), PathBuf::from("/a/b")]);
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let file = CovstatConfig {
            root_module: Some("from/file".into()),
            format: Some(OutputFormat::Json),
            sort: None,
        };
        let cli = CovstatConfig {
            root_module: Some("from/cli".into()),
            ..Default::default()
        };

        let merged = file.merge(cli);
        assert_eq!(merged.root_module.as_deref(), Some("from/cli"));
        assert_eq!(merged.format, Some(OutputFormat::Json));
    }
}
