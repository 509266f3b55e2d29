//! `package.json` read-modify-write.
//!
//! The document is kept as an ordered JSON map so untouched keys keep their
//! position, and it is always written back with 2-space indentation and a
//! trailing newline. Every mutation is idempotent: applying it to its own
//! output changes nothing.

use crate::errors::{MigrateError, Result};
use crate::io::FileSystem;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

static VERSION_FLOOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").unwrap());

pub const MANIFEST_FILE: &str = "package.json";

/// Dependency table inside the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dependencies,
    DevDependencies,
}

impl Section {
    pub fn key(self) -> &'static str {
        match self {
            Self::Dependencies => "dependencies",
            Self::DevDependencies => "devDependencies",
        }
    }

    const ALL: [Section; 2] = [Section::Dependencies, Section::DevDependencies];
}

/// What a dependency mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyChange {
    Added,
    Bumped { from: String },
    Unchanged,
}

impl DependencyChange {
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    path: PathBuf,
    root: Map<String, Value>,
}

impl Manifest {
    /// Read and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// `MigrateError::Io` when the file cannot be read, `MigrateError::Manifest`
    /// when it is not a JSON object.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let text = fs.read_to_string(path)?;
        Self::parse(path, &text)
    }

    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let root = serde_json::from_str::<Map<String, Value>>(text)
            .map_err(|e| MigrateError::manifest(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            root,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, fs: &dyn FileSystem) -> Result<()> {
        fs.write(&self.path, &self.to_json_string()?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(&self.root)
            .map_err(|e| MigrateError::manifest(&self.path, e))?;
        text.push('\n');
        Ok(text)
    }

    /// Declared in `dependencies` or `devDependencies`.
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependency_version(name).is_some()
    }

    pub fn dependency_version(&self, name: &str) -> Option<&str> {
        Section::ALL
            .iter()
            .find_map(|section| self.section(*section)?.get(name)?.as_str())
    }

    /// Raise `name` to `target` in whichever sections declare it.
    ///
    /// Entries already at or above `target`, and entries whose constraint
    /// carries no version number (`latest`, `workspace:*`), are left alone.
    pub fn bump_if_present(&mut self, name: &str, target: &str) -> DependencyChange {
        let mut change = DependencyChange::Unchanged;
        for section in Section::ALL {
            let Some(table) = self.section_mut_existing(section) else {
                continue;
            };
            let Some(current) = table.get(name).and_then(Value::as_str).map(str::to_string) else {
                continue;
            };
            if needs_bump(&current, target) {
                table.insert(name.to_string(), Value::String(target.to_string()));
                change = DependencyChange::Bumped { from: current };
            }
        }
        change
    }

    /// Make sure `name` is declared at `target` or newer: bump it where it is
    /// declared, otherwise add it to `section`.
    pub fn ensure_dependency(&mut self, section: Section, name: &str, target: &str) -> DependencyChange {
        if self.has_dependency(name) {
            return self.bump_if_present(name, target);
        }
        match self.section_mut(section) {
            Some(table) => {
                table.insert(name.to_string(), Value::String(target.to_string()));
                DependencyChange::Added
            }
            None => DependencyChange::Unchanged,
        }
    }

    /// Add `name` to `section` only when no section declares it yet.
    pub fn add_if_absent(&mut self, section: Section, name: &str, version: &str) -> bool {
        if self.has_dependency(name) {
            return false;
        }
        match self.section_mut(section) {
            Some(table) => table
                .insert(name.to_string(), Value::String(version.to_string()))
                .is_none(),
            None => false,
        }
    }

    pub fn script(&self, name: &str) -> Option<&str> {
        self.root.get("scripts")?.as_object()?.get(name)?.as_str()
    }

    pub fn set_script(&mut self, name: &str, command: &str) {
        if let Some(scripts) = object_entry(&mut self.root, "scripts") {
            scripts.insert(name.to_string(), Value::String(command.to_string()));
        }
    }

    fn section(&self, section: Section) -> Option<&Map<String, Value>> {
        self.root.get(section.key())?.as_object()
    }

    fn section_mut_existing(&mut self, section: Section) -> Option<&mut Map<String, Value>> {
        self.root.get_mut(section.key())?.as_object_mut()
    }

    fn section_mut(&mut self, section: Section) -> Option<&mut Map<String, Value>> {
        object_entry(&mut self.root, section.key())
    }
}

/// The object stored under `key`, created (or replacing a non-object) as needed.
fn object_entry<'m>(
    root: &'m mut Map<String, Value>,
    key: &str,
) -> Option<&'m mut Map<String, Value>> {
    let entry = root
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        log::warn!("package.json \"{}\" is not an object; replacing it", key);
        *entry = Value::Object(Map::new());
    }
    entry.as_object_mut()
}

/// Lowest concrete version a constraint admits, as `(major, minor, patch)`.
pub fn version_floor(constraint: &str) -> Option<(u64, u64, u64)> {
    let caps = VERSION_FLOOR.captures(constraint)?;
    let part = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    Some((part(1), part(2), part(3)))
}

fn needs_bump(current: &str, target: &str) -> bool {
    match (version_floor(current), version_floor(target)) {
        (Some(have), Some(want)) => have < want,
        _ => {
            log::info!("Leaving unversioned constraint \"{}\" as-is", current);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn manifest(text: &str) -> Manifest {
        Manifest::parse(Path::new("package.json"), text).unwrap()
    }

    #[test]
    fn bumps_framework_dependency() {
        let mut m = manifest(r#"{"dependencies":{"nextra":"^3.0.0"}}"#);
        let change = m.bump_if_present("nextra", "^4.0.0");

        assert_eq!(change, DependencyChange::Bumped { from: "^3.0.0".into() });
        assert_eq!(
            m.to_json_string().unwrap(),
            "{\n  \"dependencies\": {\n    \"nextra\": \"^4.0.0\"\n  }\n}\n"
        );
    }

    #[test]
    fn bump_is_idempotent() {
        let mut m = manifest(r#"{"dependencies":{"nextra":"^3.1.0","nextra-theme-docs":"3.1.0"}}"#);
        m.bump_if_present("nextra", "^4.0.0");
        m.bump_if_present("nextra-theme-docs", "^4.0.0");
        let once = m.to_json_string().unwrap();

        assert_eq!(m.bump_if_present("nextra", "^4.0.0"), DependencyChange::Unchanged);
        assert_eq!(m.bump_if_present("nextra-theme-docs", "^4.0.0"), DependencyChange::Unchanged);
        assert_eq!(m.to_json_string().unwrap(), once);
    }

    #[test]
    fn newer_and_unversioned_constraints_are_left_alone() {
        let mut m = manifest(r#"{"dependencies":{"nextra":"^4.2.1","nextra-theme-docs":"latest"}}"#);
        assert_eq!(m.bump_if_present("nextra", "^4.0.0"), DependencyChange::Unchanged);
        assert_eq!(m.bump_if_present("nextra-theme-docs", "^4.0.0"), DependencyChange::Unchanged);
        assert_eq!(m.dependency_version("nextra-theme-docs"), Some("latest"));
    }

    #[test]
    fn absent_dependency_is_not_bumped() {
        let mut m = manifest(r#"{"dependencies":{"next":"14.0.0"}}"#);
        assert_eq!(m.bump_if_present("nextra-theme-blog", "^4.0.0"), DependencyChange::Unchanged);
        assert!(!m.has_dependency("nextra-theme-blog"));
    }

    #[test]
    fn ensure_dependency_adds_to_requested_section() {
        let mut m = manifest("{}");
        assert_eq!(
            m.ensure_dependency(Section::DevDependencies, "pagefind", "^1.0.0"),
            DependencyChange::Added
        );
        assert_eq!(
            m.ensure_dependency(Section::DevDependencies, "pagefind", "^1.0.0"),
            DependencyChange::Unchanged
        );
        assert_eq!(m.dependency_version("pagefind"), Some("^1.0.0"));
    }

    #[test]
    fn key_order_is_preserved() {
        let mut m = manifest(r#"{"name":"docs","version":"1.0.0","scripts":{"dev":"next"}}"#);
        m.set_script("postbuild", "pagefind");
        let text = m.to_json_string().unwrap();
        let name = text.find("\"name\"").unwrap();
        let version = text.find("\"version\"").unwrap();
        let scripts = text.find("\"scripts\"").unwrap();
        assert!(name < version && version < scripts);
        assert_eq!(m.script("postbuild"), Some("pagefind"));
    }

    #[test]
    fn malformed_json_is_a_manifest_error() {
        let err = Manifest::parse(Path::new("package.json"), "{ \"name\": ").unwrap_err();
        assert!(matches!(err, MigrateError::Manifest { .. }));
    }

    #[test]
    fn version_floor_reads_partial_versions() {
        assert_eq!(version_floor("^3"), Some((3, 0, 0)));
        assert_eq!(version_floor("~4.1"), Some((4, 1, 0)));
        assert_eq!(version_floor(">=2.3.4 <3"), Some((2, 3, 4)));
        assert_eq!(version_floor("latest"), None);
    }
}
