use super::common::{wanted_opts, write_file};
use crate::lockfile::{
    migrate, read_wanted, Comver, CreateEmptyOptions, DependencyField, Lockfile, LockfileDocument, WANTED_LOCKFILE,
};

const LEGACY: &str = "lockfileVersion: 5.1
specifiers:
  foo: ^1.0.0
  dev-only: ^3.0.0
dependencies:
  foo: 1.2.0
devDependencies:
  dev-only: 3.1.0
dependenciesMeta:
  foo:
    injected: true
packages:
  /foo/1.2.0:
    resolution: {integrity: sha512-foo}
";

fn parse(text: &str) -> LockfileDocument {
    let value: serde_yaml::Value = serde_yaml::from_str(text).expect("parse yaml");
    LockfileDocument::from_value(value).expect("parse lockfile document")
}

fn broken_message(text: &str) -> String {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), WANTED_LOCKFILE, text);
    let err = read_wanted(dir.path(), &wanted_opts(None, false)).unwrap_err();
    assert_eq!(err.code(), "BROKEN_LOCKFILE");
    err.to_string()
}

#[test]
fn legacy_document_with_bad_field_is_broken_not_current() {
    let text = "lockfileVersion: 5.4
specifiers:
  foo: [1]
dependencies:
  foo: 1.0.0
packages:
  /foo/1.0.0:
    resolution: {integrity: sha512-foo}
";
    let message = broken_message(text);
    assert!(message.contains("invalid type"), "{message}");
    assert!(!message.contains("untagged"), "{message}");
}

#[test]
fn current_document_with_bad_field_reports_serde_error() {
    let text = "lockfileVersion: 5.4
importers:
  .:
    specifiers:
      foo: [1]
";
    let message = broken_message(text);
    assert!(message.contains("invalid type"), "{message}");
    assert!(!message.contains("untagged"), "{message}");
}

#[test]
fn root_specifiers_select_legacy_shape() {
    let doc = parse("specifiers: {}\nimporters: {}\n");
    assert!(doc.is_legacy());
    assert!(!parse("importers: {}\n").is_legacy());
}

#[test]
fn legacy_root_fields_move_into_root_importer() {
    let doc = parse(LEGACY);
    assert!(doc.is_legacy());
    let lockfile = migrate(doc);
    assert_eq!(lockfile.lockfile_version, Comver::new("5.1"));
    let root = &lockfile.importers["."];
    assert_eq!(root.specifiers["foo"], "^1.0.0");
    assert_eq!(root.field(DependencyField::Dependencies)["foo"], "1.2.0");
    assert_eq!(root.field(DependencyField::DevDependencies)["dev-only"], "3.1.0");
    assert!(root.optional_dependencies.is_empty());
    assert!(root.dependencies_meta.is_some());
    assert_eq!(lockfile.packages_len(), 1);
}

#[test]
fn migration_is_idempotent() {
    let once = migrate(parse(LEGACY));
    let written = serde_yaml::to_string(&once).unwrap();
    let reparsed = parse(&written);
    assert!(!reparsed.is_legacy());
    let twice = migrate(reparsed);
    assert_eq!(once, twice);
}

#[test]
fn current_shape_passes_through() {
    let text = "lockfileVersion: '6.0'\nimporters:\n  packages/a:\n    specifiers:\n      x: ^1.0.0\n";
    let doc = parse(text);
    assert!(!doc.is_legacy());
    let lockfile = migrate(doc);
    assert_eq!(lockfile.lockfile_version.as_str(), "6.0");
    assert!(lockfile.importers.contains_key("packages/a"));
    assert!(lockfile.packages.is_none());
}

#[test]
fn written_lockfile_has_no_legacy_root_fields() {
    let lockfile = migrate(parse(LEGACY));
    let value: serde_yaml::Value = serde_yaml::to_value(&lockfile).unwrap();
    for key in ["specifiers", "dependencies", "devDependencies", "dependenciesMeta"] {
        assert!(value.get(key).is_none(), "unexpected root key {key}");
    }
}

#[test]
fn create_empty_has_one_importer_per_id() {
    let lockfile = Lockfile::create_empty([".", "packages/a"], CreateEmptyOptions::default());
    assert_eq!(lockfile.importers.len(), 2);
    assert!(lockfile.importers.values().all(|i| i.specifiers.is_empty() && i.dependencies.is_empty()));
    assert_eq!(lockfile.lockfile_version.as_str(), crate::lockfile::LOCKFILE_VERSION);

    let custom = Lockfile::create_empty(["."], CreateEmptyOptions { lockfile_version: Some("6.0".into()) });
    assert_eq!(custom.lockfile_version.as_str(), "6.0");
}

#[test]
fn comver_converts_to_semver() {
    assert_eq!(crate::lockfile::comver_to_semver("5.4").unwrap().to_string(), "5.4.0");
    assert_eq!(crate::lockfile::comver_to_semver("5").unwrap().to_string(), "5.0.0");
    assert!(crate::lockfile::comver_to_semver("five").is_none());
    assert!(Comver::new("5.10") > Comver::new("5.4"));
}
