use super::read::{read_lockfile, ReadOptions};
use super::{get_git_branch_lockfile_names, Lockfile};
use crate::error::Result;
use rayon::prelude::*;
use std::path::Path;
use tracing::debug;

/// Fold the `packages` of every branch lockfile in `lockfile_dir` into `lockfile`.
///
/// Branch files are read in parallel but applied in file-name order, so a
/// later file wins on key collision regardless of which read finished first.
/// Importers are never taken from branch files.
pub fn merge_git_branch_lockfiles(
    lockfile: Option<Lockfile>,
    lockfile_dir: &Path,
    opts: &ReadOptions,
) -> Result<Option<Lockfile>> {
    let Some(mut base) = lockfile else {
        return Ok(None);
    };
    let names = get_git_branch_lockfile_names(lockfile_dir)?;
    let branch_lockfiles = names
        .par_iter()
        .map(|name| read_lockfile(&lockfile_dir.join(name), lockfile_dir, opts, false))
        .collect::<Result<Vec<_>>>()?;

    for (name, result) in names.iter().zip(branch_lockfiles) {
        let Some(packages) = result.lockfile.and_then(|l| l.packages) else {
            continue;
        };
        debug!(file = %name, count = packages.len(), "merging branch lockfile packages");
        base.packages.get_or_insert_with(Default::default).extend(packages);
    }
    Ok(Some(base))
}
