use anyhow::{Context, Result};
use richtext_editor::EditorConfig;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "richtext.config.json";

/// Load the editor configuration
///
/// An explicit path must exist. Otherwise `richtext.config.json` in `cwd` is
/// used when present, and the defaults when not.
pub fn load(cwd: &Path, explicit: Option<&Path>) -> Result<EditorConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_path(cwd);
            if !path.exists() {
                return Ok(EditorConfig::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Cannot read config {}", path.display()))?;
    let config = EditorConfig::from_json(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

pub fn default_path(cwd: &Path) -> PathBuf {
    cwd.join(DEFAULT_CONFIG_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use richtext_editor::ContentFormat;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(dir.path(), None).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_config_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "contentFormat": "html", "fontSizes": [10, 20] }"#,
        )
        .unwrap();

        let config = load(dir.path(), None).unwrap();
        assert_eq!(config.content_format, ContentFormat::Html);
        assert_eq!(config.style_vocabulary().font_sizes, vec![10, 20]);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(load(dir.path(), Some(&missing)).is_err());
    }
}
