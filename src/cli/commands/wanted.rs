use super::print_summary;
use crate::colors::*;
use crate::lockfile::{
    read_wanted, read_wanted_and_autofix_conflicts, write_wanted, ReadOptions, ReadResult, ReadWantedOptions,
    WriteOptions,
};
use anyhow::Result;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct WantedOptions {
    pub read: ReadOptions,
    pub git_branch_lockfile: bool,
    pub merge_git_branch_lockfiles: bool,
    pub autofix: bool,
    pub fix: bool,
}

pub fn cmd_wanted(dir: &Path, opts: WantedOptions) -> Result<()> {
    let read_opts = ReadWantedOptions {
        read: opts.read,
        use_git_branch_lockfile: opts.git_branch_lockfile,
        merge_git_branch_lockfiles: opts.merge_git_branch_lockfiles,
        git_branch: None,
    };
    let ReadResult { lockfile, had_conflicts } = if opts.autofix {
        read_wanted_and_autofix_conflicts(dir, &read_opts)?
    } else {
        ReadResult { lockfile: read_wanted(dir, &read_opts)?, had_conflicts: false }
    };

    let Some(lockfile) = lockfile else {
        println!("{C_GRAY}[pacm]{C_RESET} {C_DIM}no lockfile in {}{C_RESET}", dir.display());
        return Ok(());
    };
    if had_conflicts {
        println!("{C_GRAY}[pacm]{C_RESET} {C_YELLOW}note{C_RESET}: merge conflicts were resolved automatically");
    }
    print_summary("wanted", &lockfile);

    if opts.fix && (had_conflicts || opts.merge_git_branch_lockfiles) {
        let write_opts = WriteOptions { use_git_branch_lockfile: opts.git_branch_lockfile, git_branch: None };
        let path = write_wanted(dir, &lockfile, &write_opts)?;
        println!("{C_GRAY}[pacm]{C_RESET} {C_GREEN}wrote{C_RESET} {}", path.display());
    }
    Ok(())
}
