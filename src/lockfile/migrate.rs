use super::{Comver, DependencyField, ImporterRecord, Lockfile, PackageSnapshots, ResolvedDependencies};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Pre-workspace lockfile shape: the root project's specifiers and
/// dependency maps sit at the document root instead of under `importers["."]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyLockfileFile {
    #[serde(default)]
    pub lockfile_version: Comver,
    pub specifiers: BTreeMap<String, String>,
    #[serde(default)]
    pub dependencies: Option<ResolvedDependencies>,
    #[serde(default)]
    pub dev_dependencies: Option<ResolvedDependencies>,
    #[serde(default)]
    pub optional_dependencies: Option<ResolvedDependencies>,
    #[serde(default)]
    pub dependencies_meta: Option<serde_yaml::Value>,
    #[serde(default)]
    pub packages: Option<PackageSnapshots>,
}

impl LegacyLockfileFile {
    fn root_field(&mut self, field: DependencyField) -> Option<ResolvedDependencies> {
        match field {
            DependencyField::Dependencies => self.dependencies.take(),
            DependencyField::DevDependencies => self.dev_dependencies.take(),
            DependencyField::OptionalDependencies => self.optional_dependencies.take(),
        }
    }
}

/// A parsed lockfile in either schema. A root-level `specifiers` key selects the legacy shape.
#[derive(Debug, Clone, PartialEq)]
pub enum LockfileDocument {
    Legacy(LegacyLockfileFile),
    Current(Lockfile),
}

impl From<LegacyLockfileFile> for Lockfile {
    fn from(mut legacy: LegacyLockfileFile) -> Self {
        let mut root = ImporterRecord {
            specifiers: std::mem::take(&mut legacy.specifiers),
            dependencies_meta: legacy.dependencies_meta.take(),
            ..ImporterRecord::default()
        };
        for field in DependencyField::ALL {
            if let Some(deps) = legacy.root_field(field) {
                *root.field_mut(field) = deps;
            }
        }
        Lockfile {
            lockfile_version: legacy.lockfile_version,
            importers: BTreeMap::from([(".".to_string(), root)]),
            packages: legacy.packages,
        }
    }
}

impl LockfileDocument {
    /// Pick the schema from the root keys, then deserialize into that shape only,
    /// so a bad field is reported against the shape the document claims to be.
    pub fn from_value(value: serde_yaml::Value) -> Result<Self, serde_yaml::Error> {
        if value.get("specifiers").is_some() {
            serde_yaml::from_value(value).map(Self::Legacy)
        } else {
            serde_yaml::from_value(value).map(Self::Current)
        }
    }

    pub fn is_legacy(&self) -> bool { matches!(self, Self::Legacy(_)) }
}

/// Normalize a parsed document into the current shape. Already-current documents pass through untouched.
pub fn migrate(doc: LockfileDocument) -> Lockfile {
    match doc {
        LockfileDocument::Legacy(legacy) => legacy.into(),
        LockfileDocument::Current(lockfile) => lockfile,
    }
}
