use super::read::parse_document;
use super::{migrate, DependencyField, ImporterRecord, Lockfile, PackageSnapshot, ResolvedDependencies};
use crate::error::{LockfileError, Result};
use semver::Version;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

const OURS_MARKER: &str = "<<<<<<<";
const BASE_MARKER: &str = "|||||||";
const SEPARATOR: &str = "=======";
const THEIRS_MARKER: &str = ">>>>>>>";

/// True when the text carries all three git conflict markers, each at the start of its own line.
pub fn is_diff(content: &str) -> bool {
    let (mut ours, mut separator, mut theirs) = (false, false, false);
    for line in content.lines().map(|l| l.trim_end_matches('\r')) {
        ours |= line.starts_with(OURS_MARKER);
        separator |= line == SEPARATOR;
        theirs |= line.starts_with(THEIRS_MARKER);
    }
    ours && separator && theirs
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Both,
    Ours,
    Base,
    Theirs,
}

/// Split conflicted text into the "ours" and "theirs" documents.
/// Unconflicted lines go to both; diff3 base sections are dropped.
pub fn split_merge_file(content: &str) -> (String, String) {
    let mut ours = Vec::new();
    let mut theirs = Vec::new();
    let mut side = Side::Both;
    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if line.starts_with(BASE_MARKER) {
            side = Side::Base;
            continue;
        }
        if line.starts_with(OURS_MARKER) {
            side = Side::Ours;
            continue;
        }
        if line == SEPARATOR {
            side = Side::Theirs;
            continue;
        }
        if line.starts_with(THEIRS_MARKER) {
            side = Side::Both;
            continue;
        }
        if matches!(side, Side::Both | Side::Ours) {
            ours.push(line);
        }
        if matches!(side, Side::Both | Side::Theirs) {
            theirs.push(line);
        }
    }
    (ours.join("\n"), theirs.join("\n"))
}

/// Resolve a conflicted lockfile by parsing both sides and merging them.
pub fn autofix_merge_conflicts(path: &Path, content: &str) -> Result<Lockfile> {
    let (ours, theirs) = split_merge_file(content);
    let ours = parse_side(path, &ours, "ours")?;
    let theirs = parse_side(path, &theirs, "theirs")?;
    Ok(merge_lockfile_changes(ours, theirs))
}

fn parse_side(path: &Path, text: &str, label: &str) -> Result<Lockfile> {
    match parse_document(text) {
        Ok(Some(doc)) => Ok(migrate(doc)),
        Ok(None) => Err(LockfileError::broken(path, format!("{label} side of the merge conflict is empty"))),
        Err(msg) => Err(LockfileError::broken(path, format!("cannot resolve merge conflict ({label}): {msg}"))),
    }
}

/// Superset merge of two lockfiles. Keys from either side are kept; on
/// collision the higher resolved version wins, specifiers prefer theirs.
pub fn merge_lockfile_changes(ours: Lockfile, theirs: Lockfile) -> Lockfile {
    let lockfile_version = std::cmp::max(ours.lockfile_version, theirs.lockfile_version);

    let empty = ImporterRecord::default();
    let importer_ids: BTreeSet<&String> = ours.importers.keys().chain(theirs.importers.keys()).collect();
    let mut importers = BTreeMap::new();
    for id in importer_ids {
        let our = ours.importers.get(id).unwrap_or(&empty);
        let their = theirs.importers.get(id).unwrap_or(&empty);
        let mut merged = ImporterRecord {
            specifiers: merge_dict(&our.specifiers, &their.specifiers, take_changed_value),
            peer_dependencies: merge_dict(&our.peer_dependencies, &their.peer_dependencies, merge_versions),
            dependencies_meta: their.dependencies_meta.clone().or_else(|| our.dependencies_meta.clone()),
            ..ImporterRecord::default()
        };
        for field in DependencyField::ALL {
            *merged.field_mut(field) = merge_dict(our.field(field), their.field(field), merge_versions);
        }
        importers.insert(id.clone(), merged);
    }

    let packages = match (ours.packages, theirs.packages) {
        (None, None) => None,
        (our_pkgs, their_pkgs) => {
            let mut our_pkgs = our_pkgs.unwrap_or_default();
            let mut their_pkgs = their_pkgs.unwrap_or_default();
            let keys: BTreeSet<String> = our_pkgs.keys().chain(their_pkgs.keys()).cloned().collect();
            let mut merged = BTreeMap::new();
            for key in keys {
                let pkg = merge_package(our_pkgs.remove(&key), their_pkgs.remove(&key));
                merged.insert(key, pkg);
            }
            Some(merged)
        }
    };

    Lockfile { lockfile_version, importers, packages }
}

fn merge_package(ours: Option<PackageSnapshot>, theirs: Option<PackageSnapshot>) -> PackageSnapshot {
    match (ours, theirs) {
        (Some(p), None) | (None, Some(p)) => p,
        (None, None) => PackageSnapshot::default(),
        (Some(our), Some(their)) => {
            let mut extra = our.extra;
            extra.extend(their.extra);
            PackageSnapshot {
                version: their.version.or(our.version),
                resolution: their.resolution.or(our.resolution),
                dependencies: merge_dict(&our.dependencies, &their.dependencies, merge_versions),
                optional_dependencies: merge_dict(
                    &our.optional_dependencies,
                    &their.optional_dependencies,
                    merge_versions,
                ),
                extra,
            }
        }
    }
}

fn merge_dict<F>(ours: &ResolvedDependencies, theirs: &ResolvedDependencies, merge_value: F) -> ResolvedDependencies
where
    F: Fn(Option<&str>, Option<&str>) -> Option<String>,
{
    let keys: BTreeSet<&String> = ours.keys().chain(theirs.keys()).collect();
    keys.into_iter()
        .filter_map(|key| {
            merge_value(ours.get(key).map(String::as_str), theirs.get(key).map(String::as_str))
                .map(|v| (key.clone(), v))
        })
        .collect()
}

fn take_changed_value(ours: Option<&str>, theirs: Option<&str>) -> Option<String> {
    match theirs {
        Some(t) if ours != Some(t) => Some(t.to_string()),
        _ => ours.map(str::to_string),
    }
}

fn merge_versions(ours: Option<&str>, theirs: Option<&str>) -> Option<String> {
    let (our, their) = match (ours, theirs) {
        (o, None) => return o.map(str::to_string),
        (None, Some(t)) => return Some(t.to_string()),
        (Some(o), Some(t)) if o == t => return Some(o.to_string()),
        (Some(o), Some(t)) => (o, t),
    };
    match (bare_version(our), bare_version(their)) {
        (Some(a), Some(b)) if a > b => Some(our.to_string()),
        _ => Some(their.to_string()),
    }
}

// Drops peer suffixes: `1.0.0_react@17.0.2` and `1.0.0(react@17.0.2)` compare as `1.0.0`.
fn bare_version(resolved: &str) -> Option<Version> {
    let end = resolved.find(['_', '(']).unwrap_or(resolved.len());
    Version::parse(&resolved[..end]).ok()
}
