use super::CodemodConfig;
use crate::errors::MigrateError;
use crate::io::FileSystem;
use std::path::Path;

pub const CONFIG_FILE: &str = "nextra-codemods.toml";

/// Parse config from a TOML string
pub fn parse_config(contents: &str, path: &Path) -> Result<CodemodConfig, MigrateError> {
    let config = toml::from_str::<CodemodConfig>(contents)
        .map_err(|e| MigrateError::config(path, e.message()))?;

    if config.install.package_managers.is_empty() {
        return Err(MigrateError::config(
            path,
            "install.package_managers must name at least one package manager",
        ));
    }

    Ok(config)
}

/// Load `nextra-codemods.toml` from the project root.
///
/// A missing file yields defaults silently; an unreadable or invalid file
/// logs a warning and yields defaults.
pub fn load_config(fs: &dyn FileSystem, project_root: &Path) -> CodemodConfig {
    let path = project_root.join(CONFIG_FILE);
    if !fs.is_file(&path) {
        log::debug!("No {} found. Using default config.", CONFIG_FILE);
        return CodemodConfig::default();
    }

    let loaded = fs
        .read_to_string(&path)
        .and_then(|contents| parse_config(&contents, &path));

    match loaded {
        Ok(config) => {
            log::debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            CodemodConfig::default()
        }
    }
}
