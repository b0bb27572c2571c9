use anyhow::Result;
use pacm_lockfile::cli::PacmLockCli;
use pacm_lockfile::error::LockfileError;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    if let Err(e) = real_main() {
        match e.downcast_ref::<LockfileError>() {
            Some(lock_err) => eprintln!("pacm error [{}]: {:#}", lock_err.code(), e),
            None => eprintln!("pacm error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn real_main() -> Result<()> {
    let cli = PacmLockCli::parse();
    cli.run()
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("PACM_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
