mod common;
mod foreign_import;
mod migrate;
