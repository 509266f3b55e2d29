//! Name → unit lookup.
//!
//! The process-wide registry is built once on first use and never changes.
//! Names are exact and case-sensitive.

use super::code_hike::SetupCodeHike;
use super::mdx_components::MigrateMdxComponents;
use super::meta_files::MigrateMetaFiles;
use super::next_config::UpdateNextConfig;
use super::pages_to_app::MigratePagesToApp;
use super::setup_search::SetupSearch;
use super::theme_config::MigrateThemeConfig;
use super::Transform;
use crate::errors::{MigrateError, Result};
use crate::fixes::{
    Backup, FixAllStyles, FixCodeHike, FixConflicts, FixNextConfig, FixNextra, FixTailwind,
    InstallDependencies, UpdateDependencies,
};
use once_cell::sync::Lazy;

static REGISTRY: Lazy<TransformRegistry> = Lazy::new(TransformRegistry::builtin);

/// The registry of built-in transforms.
pub fn registry() -> &'static TransformRegistry {
    &REGISTRY
}

/// Every registered name, in registration order.
pub fn available_transforms() -> Vec<&'static str> {
    registry().names()
}

#[derive(Default)]
pub struct TransformRegistry {
    units: Vec<Box<dyn Transform>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn builtin() -> Self {
        let units: Vec<Box<dyn Transform>> = vec![
            Box::new(MigrateThemeConfig),
            Box::new(MigratePagesToApp),
            Box::new(SetupSearch),
            Box::new(MigrateMetaFiles),
            Box::new(MigrateMdxComponents),
            Box::new(UpdateNextConfig),
            Box::new(SetupCodeHike),
            Box::new(Backup),
            Box::new(FixAllStyles),
            Box::new(FixTailwind),
            Box::new(FixNextConfig),
            Box::new(FixConflicts),
            Box::new(FixNextra),
            Box::new(FixCodeHike),
            Box::new(UpdateDependencies),
            Box::new(InstallDependencies),
        ];

        let mut registry = Self::new();
        for unit in units {
            if let Err(e) = registry.register(unit) {
                log::error!("{}", e);
            }
        }
        registry
    }

    /// Add `unit` under its own name.
    ///
    /// # Errors
    ///
    /// `DuplicateTransform` when the name is already taken.
    pub fn register(&mut self, unit: Box<dyn Transform>) -> Result<()> {
        if self.get(unit.name()).is_some() {
            return Err(MigrateError::DuplicateTransform(unit.name().to_string()));
        }
        self.units.push(unit);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Transform> {
        self.units
            .iter()
            .find(|unit| unit.name() == name)
            .map(|unit| unit.as_ref())
    }

    /// Look `name` up.
    ///
    /// # Errors
    ///
    /// `UnknownTransform` carrying every registered name.
    pub fn resolve(&self, name: &str) -> Result<&dyn Transform> {
        self.get(name).ok_or_else(|| MigrateError::UnknownTransform {
            name: name.to_string(),
            available: self.names().iter().map(|n| n.to_string()).collect(),
        })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.units.iter().map(|unit| unit.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Transform> {
        self.units.iter().map(|unit| unit.as_ref())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
