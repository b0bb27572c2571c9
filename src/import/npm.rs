use super::VersionsByPackageName;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Nesting deeper than this is not followed. Real trees stay far below it.
pub const MAX_NPM_DEPTH: usize = 256;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NpmLockNode {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, NpmLockNode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NpmPackageEntry {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub link: bool,
}

/// `package-lock.json` / `npm-shrinkwrap.json`. v1 carries the nested
/// `dependencies` tree, v3 only the flat `packages` map, v2 both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpmPackageLock {
    #[serde(default)]
    pub lockfile_version: Option<u32>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, NpmLockNode>,
    #[serde(default)]
    pub packages: BTreeMap<String, NpmPackageEntry>,
}

pub fn collect_npm_versions(lock: &NpmPackageLock, versions: &mut VersionsByPackageName) {
    let mut stack = vec![(&lock.dependencies, 0usize)];
    while let Some((deps, depth)) = stack.pop() {
        for (name, node) in deps {
            if let Some(version) = &node.version {
                versions.entry(name.clone()).or_default().insert(version.clone());
            }
            if !node.dependencies.is_empty() && depth < MAX_NPM_DEPTH {
                stack.push((&node.dependencies, depth + 1));
            }
        }
    }

    for (path, entry) in &lock.packages {
        if entry.link {
            continue;
        }
        let (Some(name), Some(version)) = (package_name_from_path(path), &entry.version) else {
            continue;
        };
        versions.entry(name.to_string()).or_default().insert(version.clone());
    }
}

// `node_modules/a/node_modules/@s/b` -> `@s/b`; the root entry and workspace paths have no name.
fn package_name_from_path(path: &str) -> Option<&str> {
    let (_, name) = path.rsplit_once("node_modules/")?;
    if name.is_empty() { None } else { Some(name) }
}
