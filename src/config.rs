//! Loading link/merge configuration from TOML.
//!
//! Lookup order: explicit path (CLI `--config`), then `CHART_LINKS_CONFIG`.
//! `CHART_LINKS_BASE_URL` overrides `base_url` on top of whatever was loaded.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5173";
pub const DEFAULT_CATALOG_PATH: &str = "../src/locales/ro/messages.po";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinkConfig {
  /// Origin of the web app links point at, without trailing slash.
  pub base_url: String,
  /// When set, chart URLs longer than this are rejected instead of returned.
  pub max_url_len: Option<usize>,
  pub translations: TranslationsConfig,
}

impl Default for LinkConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.into(),
      max_url_len: None,
      translations: TranslationsConfig::default(),
    }
  }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationsConfig {
  /// Catalog updated by `merge-translations`.
  pub catalog_path: PathBuf,
}

impl Default for TranslationsConfig {
  fn default() -> Self {
    Self { catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH) }
  }
}

impl LinkConfig {
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self.normalize();
    self
  }

  fn normalize(&mut self) {
    let trimmed = self.base_url.trim().trim_end_matches('/');
    self.base_url = trimmed.to_string();
  }

  pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
    let mut cfg: LinkConfig = toml::from_str(s)?;
    cfg.normalize();
    Ok(cfg)
  }
}

/// Attempt to load `LinkConfig` from a TOML file. On any read/parse error, returns None.
pub fn load_config_file(path: &Path) -> Option<LinkConfig> {
  match std::fs::read_to_string(path) {
    Ok(s) => match LinkConfig::from_toml_str(&s) {
      Ok(cfg) => {
        info!(target: "chart_links", path = %path.display(), "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "chart_links", path = %path.display(), error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "chart_links", path = %path.display(), error = %e, "Failed to read TOML config file");
      None
    }
  }
}

/// Resolve the effective config: file (explicit or from env), defaults, then env overrides.
pub fn load_config(explicit: Option<&Path>) -> LinkConfig {
  let env_path = std::env::var_os("CHART_LINKS_CONFIG").map(PathBuf::from);
  let env_base_url = std::env::var("CHART_LINKS_BASE_URL").ok();
  resolve_config(explicit, env_path.as_deref(), env_base_url.as_deref())
}

/// `explicit` wins over `env_path`; a non-blank `env_base_url` replaces whatever base URL was loaded.
pub fn resolve_config(explicit: Option<&Path>, env_path: Option<&Path>, env_base_url: Option<&str>) -> LinkConfig {
  let cfg = explicit.or(env_path).and_then(load_config_file).unwrap_or_default();

  match env_base_url {
    Some(url) if !url.trim().is_empty() => cfg.with_base_url(url),
    _ => cfg,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_toml_gives_defaults() {
    let cfg = LinkConfig::from_toml_str("").unwrap();
    assert_eq!(cfg, LinkConfig::default());
    assert_eq!(cfg.base_url, "http://localhost:5173");
    assert_eq!(cfg.translations.catalog_path, PathBuf::from(DEFAULT_CATALOG_PATH));
  }

  #[test]
  fn parses_all_fields_and_trims_slash() {
    let cfg = LinkConfig::from_toml_str(
      r#"
base_url = "https://transparenta.example/"
max_url_len = 8000

[translations]
catalog_path = "locales/ro/messages.po"
"#,
    )
    .unwrap();
    assert_eq!(cfg.base_url, "https://transparenta.example");
    assert_eq!(cfg.max_url_len, Some(8000));
    assert_eq!(cfg.translations.catalog_path, PathBuf::from("locales/ro/messages.po"));
  }

  #[test]
  fn rejects_wrong_types() {
    assert!(LinkConfig::from_toml_str("max_url_len = \"lots\"").is_err());
  }

  #[test]
  fn unreadable_file_yields_none() {
    let path = std::env::temp_dir().join("chart-links-config-does-not-exist.toml");
    assert!(load_config_file(&path).is_none());
  }

  fn temp_config(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("chart-links-config-{}.toml", uuid::Uuid::new_v4()));
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[test]
  fn explicit_path_wins_over_env_path() {
    let explicit = temp_config("base_url = \"https://explicit.example\"\n");
    let from_env = temp_config("base_url = \"https://env.example\"\nmax_url_len = 10\n");

    let cfg = resolve_config(Some(explicit.as_path()), Some(from_env.as_path()), None);
    let env_only = resolve_config(None, Some(from_env.as_path()), None);
    std::fs::remove_file(&explicit).ok();
    std::fs::remove_file(&from_env).ok();

    assert_eq!(cfg.base_url, "https://explicit.example");
    assert_eq!(cfg.max_url_len, None);
    assert_eq!(env_only.base_url, "https://env.example");
    assert_eq!(env_only.max_url_len, Some(10));
  }

  #[test]
  fn env_base_url_overrides_file_and_is_trimmed() {
    let path = temp_config("base_url = \"https://file.example\"\nmax_url_len = 500\n");
    let cfg = resolve_config(Some(path.as_path()), None, Some("https://override.example/"));
    let blank = resolve_config(Some(path.as_path()), None, Some("   "));
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.base_url, "https://override.example");
    assert_eq!(cfg.max_url_len, Some(500));
    assert_eq!(blank.base_url, "https://file.example");
  }

  #[test]
  fn no_sources_gives_defaults() {
    assert_eq!(resolve_config(None, None, None), LinkConfig::default());
  }

  #[test]
  fn load_config_reads_explicit_path() {
    let path = temp_config("max_url_len = 1234\n");
    let cfg = load_config(Some(path.as_path()));
    std::fs::remove_file(&path).ok();
    assert_eq!(cfg.max_url_len, Some(1234));
  }

  #[test]
  fn readable_file_is_loaded() {
    let path = std::env::temp_dir().join(format!("chart-links-config-{}.toml", uuid::Uuid::new_v4()));
    std::fs::write(&path, "base_url = \"https://a.example\"\n").unwrap();
    let cfg = load_config_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(cfg.base_url, "https://a.example");
  }
}
