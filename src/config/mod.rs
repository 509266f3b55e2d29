//! Project configuration from `nextra-codemods.toml`.
//!
//! Every section and field is optional; a missing file is the same as an
//! empty one. Command-line flags are applied on top with
//! [`CodemodConfig::with_overrides`].

mod loader;

pub use loader::{load_config, parse_config, CONFIG_FILE};

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CodemodConfig {
    pub migration: MigrationConfig,
    pub versions: VersionsConfig,
    pub install: InstallConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MigrationConfig {
    /// Move `pages/` aside before building `app/`.
    pub auto_rename: bool,
    /// Answer every confirmation prompt with yes.
    pub assume_yes: bool,
}

/// Version constraints written into package.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionsConfig {
    pub nextra: String,
    pub pagefind: String,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            nextra: "^4.0.0".to_string(),
            pagefind: "^1.0.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    pub skip: bool,
    /// Tried in order until one install succeeds.
    pub package_managers: Vec<String>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            skip: false,
            package_managers: vec!["pnpm".to_string(), "npm".to_string()],
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigOverrides {
    pub auto_rename: bool,
    pub assume_yes: bool,
    pub skip_install: bool,
}

impl CodemodConfig {
    /// Flags can only switch behaviour on; an unset flag keeps the file value.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.migration.auto_rename |= overrides.auto_rename;
        self.migration.assume_yes |= overrides.assume_yes;
        self.install.skip |= overrides.skip_install;
        self
    }
}
