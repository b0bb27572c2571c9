use super::WANTED_LOCKFILE;
use crate::error::{LockfileError, Result};
use std::path::Path;
use std::process::Command;
use walkdir::WalkDir;

const PREFIX: &str = "pacm-lock.";
const SUFFIX: &str = ".yaml";

/// `feature/login` becomes `pacm-lock.feature!login.yaml`.
pub fn git_branch_lockfile_name(branch: &str) -> String {
    format!("{PREFIX}{}{SUFFIX}", branch.replace('/', "!"))
}

/// Lockfile name to use for the given branch, falling back to the standard name when no branch is known.
pub fn wanted_lockfile_name(branch: Option<&str>) -> String {
    match branch {
        Some(b) if !b.trim().is_empty() => git_branch_lockfile_name(b.trim()),
        _ => WANTED_LOCKFILE.to_string(),
    }
}

/// Current branch of the repository containing `dir`, or `None` when detached or not in a repository.
pub fn current_branch(dir: &Path) -> Option<String> {
    let output = Command::new("git")
        .args(["symbolic-ref", "--short", "HEAD"])
        .current_dir(dir)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if name.is_empty() { None } else { Some(name) }
}

/// All branch lockfile variants directly inside `dir`, sorted by file name.
pub fn get_git_branch_lockfile_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                let io = e.into_io_error().unwrap_or_else(|| std::io::Error::other("walk failed"));
                if io.kind() == std::io::ErrorKind::NotFound {
                    return Ok(names);
                }
                return Err(LockfileError::io(dir, io));
            }
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else { continue };
        if is_git_branch_lockfile_name(name) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

fn is_git_branch_lockfile_name(name: &str) -> bool {
    name != WANTED_LOCKFILE
        && name.len() > PREFIX.len() + SUFFIX.len()
        && name.starts_with(PREFIX)
        && name.ends_with(SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_names_are_flattened() {
        assert_eq!(git_branch_lockfile_name("main"), "pacm-lock.main.yaml");
        assert_eq!(git_branch_lockfile_name("feat/a/b"), "pacm-lock.feat!a!b.yaml");
        assert_eq!(wanted_lockfile_name(None), WANTED_LOCKFILE);
        assert_eq!(wanted_lockfile_name(Some("")), WANTED_LOCKFILE);
    }

    #[test]
    fn recognizes_branch_variants_only() {
        assert!(is_git_branch_lockfile_name("pacm-lock.main.yaml"));
        assert!(!is_git_branch_lockfile_name("pacm-lock.yaml"));
        assert!(!is_git_branch_lockfile_name("pacm-lock.main.yml"));
        assert!(!is_git_branch_lockfile_name("lock.yaml"));
    }

    #[test]
    fn enumerates_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["pacm-lock.zeta.yaml", "pacm-lock.yaml", "pacm-lock.alpha.yaml", "other.yaml"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let names = get_git_branch_lockfile_names(dir.path()).unwrap();
        assert_eq!(names, vec!["pacm-lock.alpha.yaml", "pacm-lock.zeta.yaml"]);
    }

    #[test]
    fn missing_dir_has_no_variants() {
        let dir = tempfile::tempdir().unwrap();
        let names = get_git_branch_lockfile_names(&dir.path().join("nope")).unwrap();
        assert!(names.is_empty());
    }
}
