use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for the catalog.
///
/// This holds View Layer conventions, most importantly the suggested
/// category set. Categories remain free strings; the store never enforces
/// membership in this list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The suggested categories, in display order.
    ///
    /// The first entry doubles as the default category when adding a case
    /// without one.
    categories: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content
    /// is invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML
    /// or if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the suggested categories, in display order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The default category for new cases.
    #[must_use]
    pub fn default_category(&self) -> &str {
        self.categories.first().map_or("UI设计", String::as_str)
    }

    /// Checks whether a category is in the suggested set.
    ///
    /// This is advisory only. An unlisted category is still accepted
    /// everywhere.
    #[must_use]
    pub fn is_suggested(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

fn default_categories() -> Vec<String> {
    [
        "UI设计",
        "UX设计",
        "品牌设计",
        "插画",
        "排版",
        "图标",
        "动效",
        "3D设计",
        "网页设计",
        "移动端设计",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the
/// domain type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_categories")]
        categories: Vec<String>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 { categories } => Self { categories },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            categories: config.categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\ncategories = [\"UI\", \"UX\"]\n")
            .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.categories(), &["UI".to_string(), "UX".to_string()]);
        assert_eq!(config.default_category(), "UI");
        assert!(config.is_suggested("UX"));
        assert!(!config.is_suggested("插画"));
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\ncategories = 3\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        // Deserialising a file with only the version tag yields the default
        // suggested set.
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
        assert_eq!(actual.default_category(), "UI设计");
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("casebook.toml");

        let config = Config::default();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
