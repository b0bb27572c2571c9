use crate::lockfile::{ReadOptions, ReadWantedOptions};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

pub const CONFLICTED_LOCKFILE: &str = "lockfileVersion: 5.4

importers:

  .:
    specifiers:
<<<<<<< HEAD
      foo: ^1.0.0
    dependencies:
      foo: 1.0.0
=======
      foo: ^1.1.0
      bar: ^2.0.0
    dependencies:
      foo: 1.1.0
      bar: 2.0.0
>>>>>>> feature

packages:

  /foo/1.0.0:
    resolution: {integrity: sha512-foo100}
";

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(&path, content).expect("write fixture");
    path
}

pub fn lockfile_yaml(version: &str, packages: &[(&str, &str)]) -> String {
    let mut out = format!("lockfileVersion: '{version}'\nimporters:\n  .:\n    specifiers:\n      a: ^1.0.0\n");
    if !packages.is_empty() {
        out.push_str("packages:\n");
        for (key, version) in packages {
            out.push_str(&format!("  {key}:\n    version: {version}\n"));
        }
    }
    out
}

pub fn wanted_opts(version: Option<&str>, ignore_incompatible: bool) -> ReadWantedOptions {
    ReadWantedOptions {
        read: ReadOptions { wanted_version: version.map(str::to_string), ignore_incompatible },
        ..ReadWantedOptions::default()
    }
}

/// In-memory sink for formatted tracing output.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer { self.clone() }
}

/// Run `f` with a thread-local subscriber and return its result plus everything it logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs.contents())
}
