use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

/// Wrap width used when neither the command line nor a config file sets one.
pub const DEFAULT_WIDTH: i64 = 80;

/// Config file names looked up in the working directory, first match wins.
pub const CONFIG_CANDIDATES: &[&str] = &["cable2text.yml", "cable2text.yaml"];

/// Optional YAML config (`cable2text.yml` / `cable2text.yaml`)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Default wrap width; `-s` on the command line overrides it.
    #[serde(default)]
    pub width: Option<i64>,
    /// Files whose path contains any of these substrings are skipped.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

/// Settings threaded through one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Wrap column; zero or negative writes the body unwrapped.
    pub width: i64,
    pub ignore_patterns: Vec<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            ignore_patterns: Vec::new(),
        }
    }
}

impl ConvertOptions {
    /// Combine the command-line width with an optional config file.
    pub fn resolve(cli_width: Option<i64>, file: Option<FileConfig>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            width: cli_width.or(file.width).unwrap_or(DEFAULT_WIDTH),
            ignore_patterns: file.ignore_patterns,
        }
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        let pstr = path.to_string_lossy();
        self.ignore_patterns
            .iter()
            .any(|pat| !pat.is_empty() && pstr.contains(pat.as_str()))
    }
}

/// Load the first config file found in `dir`, or `None` if there is none.
pub fn load_config_file(dir: &Path) -> Result<Option<FileConfig>> {
    for candidate in CONFIG_CANDIDATES {
        let path = dir.join(candidate);
        if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config: FileConfig = serde_yaml::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            info!(path = %path.display(), "loaded config");
            return Ok(Some(config));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_width_beats_config_beats_default() {
        let file = || FileConfig {
            width: Some(60),
            ignore_patterns: vec![],
        };
        assert_eq!(ConvertOptions::resolve(Some(0), Some(file())).width, 0);
        assert_eq!(ConvertOptions::resolve(None, Some(file())).width, 60);
        assert_eq!(ConvertOptions::resolve(None, None).width, DEFAULT_WIDTH);
    }

    #[test]
    fn ignore_patterns_match_substrings() {
        let opts = ConvertOptions {
            width: 80,
            ignore_patterns: vec![".DS_Store".into(), "/drafts/".into(), String::new()],
        };
        assert!(opts.is_ignored(Path::new("/data/cable/2010/.DS_Store")));
        assert!(opts.is_ignored(Path::new("/data/cable/drafts/01/x.html")));
        assert!(!opts.is_ignored(Path::new("/data/cable/2010/01/x.html")));
    }

    #[test]
    fn loads_first_candidate() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("cable2text.yml"),
            "width: 72\nignore_patterns:\n  - index.html\n",
        )
        .unwrap();
        fs::write(tmp.path().join("cable2text.yaml"), "width: 10\n").unwrap();

        let config = load_config_file(tmp.path()).unwrap().unwrap();
        assert_eq!(config.width, Some(72));
        assert_eq!(config.ignore_patterns, vec!["index.html".to_string()]);
    }

    #[test]
    fn missing_config_is_none_and_bad_yaml_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_config_file(tmp.path()).unwrap().is_none());

        fs::write(tmp.path().join("cable2text.yaml"), "width: [not a number\n").unwrap();
        assert!(load_config_file(tmp.path()).is_err());
    }
}
