use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod branch_merge;
mod comver;
mod conflict;
mod git_branch;
mod migrate;
mod read;
mod write;

pub use branch_merge::merge_git_branch_lockfiles;
pub use comver::{comver_to_semver, Comver};
pub use conflict::{autofix_merge_conflicts, is_diff, merge_lockfile_changes, split_merge_file};
pub use git_branch::{current_branch, get_git_branch_lockfile_names, git_branch_lockfile_name, wanted_lockfile_name};
pub use migrate::{migrate, LegacyLockfileFile, LockfileDocument};
pub use read::{
    read_current, read_wanted, read_wanted_and_autofix_conflicts, ReadOptions, ReadResult,
    ReadWantedOptions,
};
pub use write::{is_empty_lockfile, write_current, write_wanted, WriteOptions};

pub const WANTED_LOCKFILE: &str = "pacm-lock.yaml";
pub const CURRENT_LOCKFILE: &str = "lock.yaml";
pub const LOCKFILE_VERSION: &str = "5.4";

pub type ResolvedDependencies = BTreeMap<String, String>;

/// Dependency kinds that live both in importers and, for legacy lockfiles, at the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyField {
    Dependencies,
    DevDependencies,
    OptionalDependencies,
}

impl DependencyField {
    pub const ALL: [DependencyField; 3] =
        [Self::Dependencies, Self::DevDependencies, Self::OptionalDependencies];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dependencies => "dependencies",
            Self::DevDependencies => "devDependencies",
            Self::OptionalDependencies => "optionalDependencies",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImporterRecord {
    #[serde(default)]
    pub specifiers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: ResolvedDependencies,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dev_dependencies: ResolvedDependencies,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub optional_dependencies: ResolvedDependencies,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub peer_dependencies: ResolvedDependencies,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies_meta: Option<serde_yaml::Value>,
}

impl ImporterRecord {
    pub fn field(&self, field: DependencyField) -> &ResolvedDependencies {
        match field {
            DependencyField::Dependencies => &self.dependencies,
            DependencyField::DevDependencies => &self.dev_dependencies,
            DependencyField::OptionalDependencies => &self.optional_dependencies,
        }
    }

    pub fn field_mut(&mut self, field: DependencyField) -> &mut ResolvedDependencies {
        match field {
            DependencyField::Dependencies => &mut self.dependencies,
            DependencyField::DevDependencies => &mut self.dev_dependencies,
            DependencyField::OptionalDependencies => &mut self.optional_dependencies,
        }
    }
}

/// Resolved metadata for one package. Fields this engine does not interpret are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: ResolvedDependencies,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub optional_dependencies: ResolvedDependencies,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

pub type PackageSnapshots = BTreeMap<String, PackageSnapshot>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lockfile {
    #[serde(default)]
    pub lockfile_version: Comver,
    #[serde(default)]
    pub importers: BTreeMap<String, ImporterRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages: Option<PackageSnapshots>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateEmptyOptions {
    pub lockfile_version: Option<String>,
}

impl Lockfile {
    /// A lockfile with one empty importer per id.
    pub fn create_empty<I, S>(importer_ids: I, opts: CreateEmptyOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let importers = importer_ids
            .into_iter()
            .map(|id| (id.into(), ImporterRecord::default()))
            .collect();
        Self {
            lockfile_version: Comver::new(opts.lockfile_version.unwrap_or_else(|| LOCKFILE_VERSION.into())),
            importers,
            packages: None,
        }
    }

    pub fn packages_len(&self) -> usize {
        self.packages.as_ref().map(BTreeMap::len).unwrap_or(0)
    }
}
