pub mod cli;
pub mod colors;
pub mod error;
pub mod fsutil;
pub mod import;
pub mod lockfile;
#[cfg(test)]
pub mod tests;
