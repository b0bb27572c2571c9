use super::{
    autofix_merge_conflicts, comver_to_semver, current_branch, is_diff, merge_git_branch_lockfiles, migrate,
    wanted_lockfile_name, Lockfile, LockfileDocument, CURRENT_LOCKFILE, WANTED_LOCKFILE,
};
use crate::error::{LockfileError, Result};
use crate::fsutil::{first_found, read_optional, strip_bom};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Schema version this build writes. `None` accepts any lockfile version.
    pub wanted_version: Option<String>,
    pub ignore_incompatible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ReadWantedOptions {
    pub read: ReadOptions,
    pub use_git_branch_lockfile: bool,
    pub merge_git_branch_lockfiles: bool,
    /// Overrides branch detection via git.
    pub git_branch: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadResult {
    pub lockfile: Option<Lockfile>,
    pub had_conflicts: bool,
}

/// Read `lock.yaml` from the internal store directory.
pub fn read_current(store_dir: &Path, opts: &ReadOptions) -> Result<Option<Lockfile>> {
    let path = store_dir.join(CURRENT_LOCKFILE);
    Ok(read_lockfile(&path, store_dir, opts, false)?.lockfile)
}

/// Read the project's wanted lockfile. Conflict markers are reported as a broken lockfile.
pub fn read_wanted(project_dir: &Path, opts: &ReadWantedOptions) -> Result<Option<Lockfile>> {
    Ok(read_wanted_inner(project_dir, opts, false)?.lockfile)
}

/// Like [`read_wanted`] but resolves git merge conflicts inside the lockfile.
pub fn read_wanted_and_autofix_conflicts(project_dir: &Path, opts: &ReadWantedOptions) -> Result<ReadResult> {
    read_wanted_inner(project_dir, opts, true)
}

fn read_wanted_inner(project_dir: &Path, opts: &ReadWantedOptions, autofix: bool) -> Result<ReadResult> {
    let mut names = vec![WANTED_LOCKFILE.to_string()];
    if opts.use_git_branch_lockfile {
        let branch = opts.git_branch.clone().or_else(|| current_branch(project_dir));
        let branch_name = wanted_lockfile_name(branch.as_deref());
        if branch_name != WANTED_LOCKFILE {
            names.insert(0, branch_name);
        }
    }

    let found = first_found(names.iter().map(move |name| {
        move || -> Result<Option<(Lockfile, bool)>> {
            let path = project_dir.join(name);
            debug!(path = %path.display(), "probing lockfile");
            let result = read_lockfile(&path, project_dir, &opts.read, autofix)?;
            Ok(result.lockfile.map(|lockfile| (lockfile, result.had_conflicts)))
        }
    }))?;

    let Some((lockfile, had_conflicts)) = found else {
        return Ok(ReadResult::default());
    };
    let lockfile = if opts.merge_git_branch_lockfiles {
        merge_git_branch_lockfiles(Some(lockfile), project_dir, &opts.read)?
    } else {
        Some(lockfile)
    };
    Ok(ReadResult { lockfile, had_conflicts })
}

/// Shared read path: load, strip BOM, parse (resolving conflicts when allowed), migrate, check version.
pub(super) fn read_lockfile(path: &Path, prefix: &Path, opts: &ReadOptions, autofix: bool) -> Result<ReadResult> {
    let Some(raw) = read_optional(path)? else {
        return Ok(ReadResult::default());
    };
    let content = strip_bom(&raw);

    let (document, had_conflicts) = match parse_document(content) {
        Ok(doc) => (doc.map(migrate), false),
        Err(message) => {
            if !autofix || !is_diff(content) {
                return Err(LockfileError::broken(path, message));
            }
            let merged = autofix_merge_conflicts(path, content)?;
            let file_name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            info!(prefix = %prefix.display(), "Merge conflict detected in {file_name} and successfully merged");
            (Some(merged), true)
        }
    };

    if let Some(lockfile) = document {
        if is_compatible(&lockfile, prefix, opts) {
            return Ok(ReadResult { lockfile: Some(lockfile), had_conflicts });
        }
    }

    if opts.ignore_incompatible {
        warn!(prefix = %prefix.display(), "Ignoring not compatible lockfile at {}", path.display());
        return Ok(ReadResult::default());
    }
    Err(LockfileError::LockfileBreakingChange { path: path.to_path_buf() })
}

/// Parse lockfile text into either schema. `Ok(None)` means the document is empty.
pub(super) fn parse_document(content: &str) -> std::result::Result<Option<LockfileDocument>, String> {
    if content.trim().is_empty() {
        return Ok(None);
    }
    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    if value.is_null() {
        return Ok(None);
    }
    LockfileDocument::from_value(value).map(Some).map_err(|e| e.to_string())
}

fn is_compatible(lockfile: &Lockfile, prefix: &Path, opts: &ReadOptions) -> bool {
    let Some(wanted) = opts.wanted_version.as_deref() else {
        return true;
    };
    let (Some(actual), Some(expected)) = (lockfile.lockfile_version.to_semver(), comver_to_semver(wanted)) else {
        return false;
    };
    if actual.major != expected.major {
        return false;
    }
    if actual > expected {
        warn!(
            prefix = %prefix.display(),
            "Your {WANTED_LOCKFILE} was generated by a newer version of pacm. \
             It is a compatible version but it might get downgraded to version {wanted}"
        );
    }
    true
}
