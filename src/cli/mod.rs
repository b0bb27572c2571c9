use crate::lockfile::{ReadOptions, LOCKFILE_VERSION};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "pacm-lock",
    version,
    about = "Inspect, repair and import pacm lockfiles",
    long_about = "pacm-lock — read, migrate and merge pacm lockfiles.\n\nExamples:\n  pacm-lock wanted\n  pacm-lock wanted --merge-git-branch-lockfiles --fix\n  pacm-lock current --store-dir node_modules/.pacm\n  pacm-lock import --dir ../legacy-app"
)]
pub struct PacmLockCli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version preferences taken from yarn.lock or package-lock.json
    Import {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Read the project's wanted lockfile
    Wanted {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        #[command(flatten)]
        version: VersionArgs,
        #[arg(long)]
        git_branch_lockfile: bool,
        #[arg(long)]
        merge_git_branch_lockfiles: bool,
        /// Treat merge conflicts as a broken lockfile instead of resolving them
        #[arg(long)]
        no_autofix: bool,
        /// Write the lockfile back after resolving conflicts or merging branches
        #[arg(long)]
        fix: bool,
    },
    /// Read the current lockfile from the store directory
    Current {
        #[arg(long, default_value = "node_modules/.pacm")]
        store_dir: PathBuf,
        #[command(flatten)]
        version: VersionArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct VersionArgs {
    /// Lockfile schema version this run expects
    #[arg(long, default_value = LOCKFILE_VERSION)]
    pub wanted_version: String,
    /// Accept any lockfile version
    #[arg(long, conflicts_with = "wanted_version")]
    pub any_version: bool,
    /// Skip incompatible lockfiles instead of failing
    #[arg(long)]
    pub ignore_incompatible: bool,
}

impl VersionArgs {
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            wanted_version: (!self.any_version).then(|| self.wanted_version.clone()),
            ignore_incompatible: self.ignore_incompatible,
        }
    }
}

impl PacmLockCli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.command {
            None => {
                self.print_help();
                Ok(())
            }
            Some(Commands::Import { dir }) => commands::cmd_import(dir),
            Some(Commands::Wanted {
                dir,
                version,
                git_branch_lockfile,
                merge_git_branch_lockfiles,
                no_autofix,
                fix,
            }) => commands::cmd_wanted(
                dir,
                commands::WantedOptions {
                    read: version.read_options(),
                    git_branch_lockfile: *git_branch_lockfile,
                    merge_git_branch_lockfiles: *merge_git_branch_lockfiles,
                    autofix: !*no_autofix,
                    fix: *fix,
                },
            ),
            Some(Commands::Current { store_dir, version }) => {
                commands::cmd_current(store_dir, &version.read_options())
            }
        }
    }

    fn print_help(&self) {
        println!("pacm-lock - pacm lockfile tools\n");
        println!(
            "Commands:\n  wanted [--dir] [--wanted-version|--any-version] [--ignore-incompatible] [--git-branch-lockfile] [--merge-git-branch-lockfiles] [--no-autofix] [--fix]\n  current [--store-dir]\n  import [--dir]"
        );
    }
}
