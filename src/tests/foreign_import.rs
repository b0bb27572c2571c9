use super::common::write_file;
use crate::import::{extract_preferred_versions, VersionSelectorType};
use std::collections::BTreeMap;

fn prefs(pairs: &[(&str, &str)]) -> BTreeMap<String, BTreeMap<String, VersionSelectorType>> {
    let mut out: BTreeMap<String, BTreeMap<String, VersionSelectorType>> = BTreeMap::new();
    for (name, version) in pairs {
        out.entry(name.to_string()).or_default().insert(version.to_string(), VersionSelectorType::Version);
    }
    out
}

#[test]
fn npm_nested_tree_scenario() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "package-lock.json",
        r#"{"dependencies": {"lodash": {"version": "4.17.0", "dependencies": {"debug": {"version": "1.0.0"}}}}}"#,
    );
    let preferred = extract_preferred_versions(dir.path()).unwrap();
    assert_eq!(preferred, prefs(&[("lodash", "4.17.0"), ("debug", "1.0.0")]));
}

#[test]
fn npm_versions_collapse_across_tree_positions() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "package-lock.json",
        r#"{"dependencies": {
            "a": {"version": "1.0.0", "dependencies": {"ms": {"version": "2.0.0"}}},
            "b": {"version": "1.0.0", "dependencies": {"ms": {"version": "2.1.0"}}},
            "ms": {"version": "2.0.0"}
        }}"#,
    );
    let preferred = extract_preferred_versions(dir.path()).unwrap();
    assert_eq!(preferred["ms"].len(), 2);
    assert!(preferred["ms"].contains_key("2.0.0") && preferred["ms"].contains_key("2.1.0"));
}

#[test]
fn npm_v3_packages_map() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "package-lock.json",
        r#"{"lockfileVersion": 3, "packages": {
            "": {"name": "app", "version": "0.1.0"},
            "node_modules/@scope/x": {"version": "1.2.3"},
            "node_modules/a/node_modules/@scope/x": {"version": "1.0.0"},
            "node_modules/linked": {"link": true, "resolved": "packages/linked"}
        }}"#,
    );
    let preferred = extract_preferred_versions(dir.path()).unwrap();
    assert_eq!(preferred, prefs(&[("@scope/x", "1.0.0"), ("@scope/x", "1.2.3")]));
}

#[test]
fn shrinkwrap_is_used_without_package_lock() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "npm-shrinkwrap.json", r#"{"dependencies": {"a": {"version": "1.0.0"}}}"#);
    let preferred = extract_preferred_versions(dir.path()).unwrap();
    assert_eq!(preferred, prefs(&[("a", "1.0.0")]));
}

#[test]
fn yarn_takes_priority_over_npm() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "package-lock.json", r#"{"dependencies": {"npm-only": {"version": "1.0.0"}}}"#);
    write_file(
        dir.path(),
        "yarn.lock",
        "# yarn lockfile v1\n\n\"@babel/core@^7.0.0\", \"@babel/core@^7.1.0\":\n  version \"7.2.0\"\n\nlodash@^4.0.0:\n  version \"4.17.21\"\n\nlodash@^3.0.0:\n  version \"3.10.1\"\n",
    );
    let preferred = extract_preferred_versions(dir.path()).unwrap();
    assert_eq!(
        preferred,
        prefs(&[("@babel/core", "7.2.0"), ("lodash", "3.10.1"), ("lodash", "4.17.21")])
    );
}

#[test]
fn conflicted_yarn_lock_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "yarn.lock",
        "lodash@^4.0.0:\n<<<<<<< HEAD\n  version \"4.17.20\"\n=======\n  version \"4.17.21\"\n>>>>>>> other\n",
    );
    let err = extract_preferred_versions(dir.path()).unwrap_err();
    assert_eq!(err.code(), "YARN_LOCKFILE_PARSE_FAILED");
    assert!(err.to_string().contains("merge"));
}

#[test]
fn invalid_npm_json_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "package-lock.json", "{ not json");
    let err = extract_preferred_versions(dir.path()).unwrap_err();
    assert_eq!(err.code(), "NPM_LOCKFILE_PARSE_FAILED");
}

#[test]
fn no_foreign_lockfile_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = extract_preferred_versions(dir.path()).unwrap_err();
    assert_eq!(err.code(), "LOCKFILE_NOT_FOUND");
}
