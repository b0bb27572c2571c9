use super::{current_branch, wanted_lockfile_name, Lockfile, CURRENT_LOCKFILE};
use crate::error::Result;
use crate::fsutil::{remove_if_exists, write_atomic};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    pub use_git_branch_lockfile: bool,
    pub git_branch: Option<String>,
}

/// A lockfile whose importers declare nothing is not worth keeping on disk.
pub fn is_empty_lockfile(lockfile: &Lockfile) -> bool {
    lockfile.importers.values().all(|importer| importer.specifiers.is_empty())
}

/// Write the wanted lockfile into `project_dir`, returning the path written (or removed).
pub fn write_wanted(project_dir: &Path, lockfile: &Lockfile, opts: &WriteOptions) -> Result<PathBuf> {
    let name = if opts.use_git_branch_lockfile {
        let branch = opts.git_branch.clone().or_else(|| current_branch(project_dir));
        wanted_lockfile_name(branch.as_deref())
    } else {
        wanted_lockfile_name(None)
    };
    let path = project_dir.join(name);
    write_lockfile(&path, lockfile)?;
    Ok(path)
}

pub fn write_current(store_dir: &Path, lockfile: &Lockfile) -> Result<PathBuf> {
    let path = store_dir.join(CURRENT_LOCKFILE);
    write_lockfile(&path, lockfile)?;
    Ok(path)
}

fn write_lockfile(path: &Path, lockfile: &Lockfile) -> Result<()> {
    if is_empty_lockfile(lockfile) {
        return remove_if_exists(path);
    }
    let data = serde_yaml::to_string(lockfile)?;
    write_atomic(path, &data)
}
