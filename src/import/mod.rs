//! Seed version preferences from another package manager's lockfile.
//!
//! `yarn.lock` wins when present; otherwise `package-lock.json` or
//! `npm-shrinkwrap.json` is used. Every exact version found becomes a
//! preference for the resolver.

use crate::error::{LockfileError, Result};
use crate::fsutil::{exists, first_found, read_optional, strip_bom};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

mod npm;
mod yarn;

pub use npm::{collect_npm_versions, NpmLockNode, NpmPackageEntry, NpmPackageLock, MAX_NPM_DEPTH};
pub use yarn::{parse_yarn_lock, YarnLockEntry, YarnLockObject, YarnLockParse, YarnParseKind};

pub const YARN_LOCKFILE: &str = "yarn.lock";
pub const NPM_LOCKFILE: &str = "package-lock.json";
pub const NPM_SHRINKWRAP: &str = "npm-shrinkwrap.json";

pub type VersionsByPackageName = BTreeMap<String, BTreeSet<String>>;

/// How a preferred version entry should be matched by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionSelectorType {
    Version,
    Range,
    Tag,
}

pub type PreferredVersions = BTreeMap<String, BTreeMap<String, VersionSelectorType>>;

enum ForeignLockfile {
    Yarn(YarnLockObject),
    Npm(NpmPackageLock),
}

pub fn extract_preferred_versions(project_dir: &Path) -> Result<PreferredVersions> {
    let versions = match read_foreign_lockfile(project_dir)? {
        ForeignLockfile::Yarn(object) => versions_from_yarn(&object),
        ForeignLockfile::Npm(lock) => {
            let mut versions = VersionsByPackageName::new();
            collect_npm_versions(&lock, &mut versions);
            versions
        }
    };
    Ok(preferred_versions(versions))
}

fn read_foreign_lockfile(dir: &Path) -> Result<ForeignLockfile> {
    if exists(&dir.join(YARN_LOCKFILE)) {
        debug!(dir = %dir.display(), "importing from {YARN_LOCKFILE}");
        return read_yarn_lockfile(dir).map(ForeignLockfile::Yarn);
    }
    if exists(&dir.join(NPM_LOCKFILE)) || exists(&dir.join(NPM_SHRINKWRAP)) {
        debug!(dir = %dir.display(), "importing from npm lockfile");
        return read_npm_lockfile(dir).map(ForeignLockfile::Npm);
    }
    Err(LockfileError::LockfileNotFound)
}

pub fn read_yarn_lockfile(dir: &Path) -> Result<YarnLockObject> {
    let Some(raw) = read_optional(&dir.join(YARN_LOCKFILE))? else {
        return Err(LockfileError::YarnLockfileNotFound);
    };
    let parsed = parse_yarn_lock(strip_bom(&raw))
        .map_err(|message| LockfileError::YarnLockfileParse { kind: format!("malformed: {message}") })?;
    match parsed.kind {
        YarnParseKind::Success => Ok(parsed.object),
        kind => Err(LockfileError::YarnLockfileParse { kind: kind.to_string() }),
    }
}

pub fn read_npm_lockfile(dir: &Path) -> Result<NpmPackageLock> {
    let candidates = [NPM_LOCKFILE, NPM_SHRINKWRAP].map(|name| {
        let path = dir.join(name);
        move || -> Result<Option<NpmPackageLock>> {
            let Some(raw) = read_optional(&path)? else {
                return Ok(None);
            };
            serde_json::from_str(strip_bom(&raw))
                .map(Some)
                .map_err(|e| LockfileError::NpmLockfileParse { path, message: e.to_string() })
        }
    });
    first_found(candidates)?.ok_or(LockfileError::NpmLockfileNotFound)
}

/// Collect versions per package from yarn keys of the form `<name>@<range>`.
pub fn versions_from_yarn(object: &YarnLockObject) -> VersionsByPackageName {
    let mut versions = VersionsByPackageName::new();
    for (key, entry) in object {
        let (Some(name), Some(version)) = (package_name_from_yarn_key(key), &entry.version) else {
            continue;
        };
        versions.entry(name.to_string()).or_default().insert(version.clone());
    }
    versions
}

/// Everything before the last `@`; `@scope/pkg@^1` yields `@scope/pkg`.
pub fn package_name_from_yarn_key(key: &str) -> Option<&str> {
    match key.rfind('@') {
        Some(idx) if idx > 0 => Some(&key[..idx]),
        _ => None,
    }
}

pub fn preferred_versions(versions: VersionsByPackageName) -> PreferredVersions {
    versions
        .into_iter()
        .map(|(name, set)| {
            let prefs: BTreeMap<_, _> = set.into_iter().map(|v| (v, VersionSelectorType::Version)).collect();
            (name, prefs)
        })
        .collect()
}
