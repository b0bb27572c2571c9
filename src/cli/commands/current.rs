use super::print_summary;
use crate::colors::*;
use crate::lockfile::{read_current, ReadOptions};
use anyhow::Result;
use std::path::Path;

pub fn cmd_current(store_dir: &Path, opts: &ReadOptions) -> Result<()> {
    match read_current(store_dir, opts)? {
        Some(lockfile) => print_summary("current", &lockfile),
        None => println!("{C_GRAY}[pacm]{C_RESET} {C_DIM}no current lockfile in {}{C_RESET}", store_dir.display()),
    }
    Ok(())
}
