use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use crate::constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_CSV_PATH, DEFAULT_TABLE, DEFAULT_TIMEOUT_SECONDS, PLACEHOLDER_KEY,
    PLACEHOLDER_URL,
};
use crate::error::{ImportError, Result};

/// Layered configuration: optional `import.toml`, then environment, then CLI flags
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupabaseConfig {
    /// e.g. https://xyzcompany.supabase.co
    pub url: Option<String>,
    /// Used to derive `url` when no url is given
    pub project_ref: Option<String>,
    pub key: Option<String>,
    pub table: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportConfig {
    pub csv_path: Option<PathBuf>,
}

/// Validated connection settings for the record store
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub url: String,
    pub key: String,
    pub table: String,
    pub timeout_seconds: u64,
}

impl Config {
    /// Load from `path`, or from `import.toml` in the working directory if it exists.
    /// An explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        if !config_path.exists() {
            if required {
                return Err(ImportError::Config(format!(
                    "Config file '{}' does not exist",
                    config_path.display()
                )));
            }
            return Ok(Config::default());
        }

        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ImportError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary variable lookup.
    ///
    /// Recognized names: `SUPABASE_URL`, `SUPABASE_PROJECT_REF`,
    /// `SUPABASE_SERVICE_ROLE_KEY` (falling back to `SUPABASE_KEY`),
    /// `SUPABASE_TABLE`, `SUPABASE_TIMEOUT_SECONDS`, `TOX_IMPORT_CSV`.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("SUPABASE_URL") {
            self.supabase.url = Some(url);
        }
        if let Some(project_ref) = get("SUPABASE_PROJECT_REF") {
            self.supabase.project_ref = Some(project_ref);
        }
        if let Some(key) = get("SUPABASE_SERVICE_ROLE_KEY").or_else(|| get("SUPABASE_KEY")) {
            self.supabase.key = Some(key);
        }
        if let Some(table) = get("SUPABASE_TABLE") {
            self.supabase.table = Some(table);
        }
        if let Some(timeout) = get("SUPABASE_TIMEOUT_SECONDS").and_then(|v| v.parse().ok()) {
            self.supabase.timeout_seconds = Some(timeout);
        }
        if let Some(csv) = get("TOX_IMPORT_CSV") {
            self.import.csv_path = Some(PathBuf::from(csv));
        }
    }

    pub fn csv_path(&self) -> PathBuf {
        self.import
            .csv_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_PATH))
    }

    pub fn table(&self) -> String {
        self.supabase
            .table
            .clone()
            .unwrap_or_else(|| DEFAULT_TABLE.to_string())
    }

    /// Validate the store connection settings. Missing or placeholder
    /// credentials are a precondition failure.
    pub fn store_settings(&self) -> Result<StoreSettings> {
        let url = match (&self.supabase.url, &self.supabase.project_ref) {
            (Some(url), _) => url.clone(),
            (None, Some(project_ref)) => format!("https://{}.supabase.co", project_ref),
            (None, None) => {
                return Err(ImportError::Precondition(
                    "Supabase URL is not configured (set SUPABASE_URL or SUPABASE_PROJECT_REF)"
                        .into(),
                ))
            }
        };
        if url.trim() == PLACEHOLDER_URL {
            return Err(ImportError::Precondition(
                "Supabase URL still holds the placeholder value".into(),
            ));
        }

        let key = self.supabase.key.clone().ok_or_else(|| {
            ImportError::Precondition(
                "Supabase key is not configured (set SUPABASE_SERVICE_ROLE_KEY or SUPABASE_KEY)"
                    .into(),
            )
        })?;
        if key.trim() == PLACEHOLDER_KEY {
            return Err(ImportError::Precondition(
                "Supabase key still holds the placeholder value".into(),
            ));
        }

        Ok(StoreSettings {
            url: base_url(&url),
            key,
            table: self.table(),
            timeout_seconds: self.supabase.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        })
    }
}

/// Project base URL without a trailing slash or REST suffix
fn base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    trimmed
        .strip_suffix("/rest/v1")
        .unwrap_or(trimmed)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            [supabase]
            url = "https://abc.supabase.co/"
            key = "service-key"
            table = "ld50"

            [import]
            csv_path = "data/ld50.csv"
            "#,
        )
        .unwrap();

        let settings = config.store_settings().unwrap();
        assert_eq!(settings.url, "https://abc.supabase.co");
        assert_eq!(settings.table, "ld50");
        assert_eq!(settings.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.csv_path(), PathBuf::from("data/ld50.csv"));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config: Config =
            toml::from_str("[supabase]\nurl = \"https://old.supabase.co\"\n").unwrap();
        config.apply_env_from(env(&[
            ("SUPABASE_PROJECT_REF", "ihkgojiseqpw"),
            ("SUPABASE_KEY", "anon"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
            ("SUPABASE_TIMEOUT_SECONDS", "5"),
        ]));

        let settings = config.store_settings().unwrap();
        // an explicit url still wins over the project ref
        assert_eq!(settings.url, "https://old.supabase.co");
        assert_eq!(settings.key, "service");
        assert_eq!(settings.table, DEFAULT_TABLE);
        assert_eq!(settings.timeout_seconds, 5);
    }

    #[test]
    fn test_project_ref_builds_url() {
        let mut config = Config::default();
        config.apply_env_from(env(&[("SUPABASE_PROJECT_REF", "xyz"), ("SUPABASE_KEY", "k")]));
        assert_eq!(config.store_settings().unwrap().url, "https://xyz.supabase.co");
    }

    #[test]
    fn test_rest_suffix_is_stripped() {
        assert_eq!(base_url("https://a.supabase.co/rest/v1/"), "https://a.supabase.co");
    }

    #[test]
    fn test_missing_or_placeholder_credentials_are_preconditions() {
        let config = Config::default();
        assert!(matches!(config.store_settings(), Err(ImportError::Precondition(_))));

        let mut config = Config::default();
        config.apply_env_from(env(&[("SUPABASE_URL", PLACEHOLDER_URL), ("SUPABASE_KEY", "k")]));
        assert!(matches!(config.store_settings(), Err(ImportError::Precondition(_))));

        let mut config = Config::default();
        config.apply_env_from(env(&[
            ("SUPABASE_URL", "https://a.supabase.co"),
            ("SUPABASE_KEY", PLACEHOLDER_KEY),
        ]));
        assert!(matches!(config.store_settings(), Err(ImportError::Precondition(_))));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/import.toml"))).unwrap_err();
        assert!(matches!(err, ImportError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.toml");
        fs::write(&path, "[supabase]\ntable = \"custom\"\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.table(), "custom");
    }
}
