mod current;
mod import;
mod wanted;

pub(crate) use current::cmd_current;
pub(crate) use import::cmd_import;
pub(crate) use wanted::{cmd_wanted, WantedOptions};

use crate::colors::*;
use crate::lockfile::Lockfile;

pub(crate) fn print_summary(label: &str, lockfile: &Lockfile) {
    println!(
        "{gray}[pacm]{reset} {label}: lockfileVersion {ver}, {imp} importers, {pkgs} packages",
        gray = C_GRAY,
        reset = C_RESET,
        ver = lockfile.lockfile_version,
        imp = lockfile.importers.len(),
        pkgs = lockfile.packages_len()
    );
    for (id, importer) in &lockfile.importers {
        println!(
            "{gray}[pacm]{reset}  {dim}-{reset} {id} ({count} specifiers)",
            gray = C_GRAY,
            dim = C_DIM,
            reset = C_RESET,
            count = importer.specifiers.len()
        );
    }
}
