use crate::lockfile::{is_diff, split_merge_file};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YarnLockEntry {
    pub version: Option<String>,
    pub resolved: Option<String>,
    pub integrity: Option<String>,
}

pub type YarnLockObject = BTreeMap<String, YarnLockEntry>;

/// Outcome discriminant, mirroring how yarn reports a lockfile that had to be merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YarnParseKind {
    Success,
    Merge,
    Conflict,
}

impl fmt::Display for YarnParseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Merge => "merge",
            Self::Conflict => "conflict",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YarnLockParse {
    pub kind: YarnParseKind,
    pub object: YarnLockObject,
}

/// Parse a `yarn.lock` in either the classic v1 format or the berry YAML format.
pub fn parse_yarn_lock(content: &str) -> Result<YarnLockParse, String> {
    if !is_diff(content) {
        return parse_object(content).map(|object| YarnLockParse { kind: YarnParseKind::Success, object });
    }
    let (ours, theirs) = split_merge_file(content);
    match (parse_object(&ours), parse_object(&theirs)) {
        (Ok(mut object), Ok(theirs)) => {
            object.extend(theirs);
            Ok(YarnLockParse { kind: YarnParseKind::Merge, object })
        }
        _ => Ok(YarnLockParse { kind: YarnParseKind::Conflict, object: YarnLockObject::new() }),
    }
}

fn parse_object(content: &str) -> Result<YarnLockObject, String> {
    if content.lines().any(|l| l.trim_end() == "__metadata:") {
        parse_berry(content)
    } else {
        parse_classic(content)
    }
}

fn parse_classic(content: &str) -> Result<YarnLockObject, String> {
    let mut object = YarnLockObject::new();
    let mut keys: Vec<String> = Vec::new();
    let mut entry = YarnLockEntry::default();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = line.len() - line.trim_start().len();
        if indent == 0 {
            flush(&mut object, &mut keys, &mut entry);
            let Some(header) = trimmed.strip_suffix(':') else {
                return Err(format!("line {}: expected entry header ending with ':'", idx + 1));
            };
            keys = header.split(',').map(|k| unquote(k.trim()).to_string()).filter(|k| !k.is_empty()).collect();
            continue;
        }
        if keys.is_empty() {
            return Err(format!("line {}: field outside of an entry", idx + 1));
        }
        // Nested blocks such as `dependencies:` are not needed for version extraction.
        if indent > 2 || trimmed.ends_with(':') {
            continue;
        }
        let Some((field, value)) = split_field(trimmed) else {
            return Err(format!("line {}: malformed field '{trimmed}'", idx + 1));
        };
        let value = Some(unquote(value).to_string());
        match field {
            "version" => entry.version = value,
            "resolved" => entry.resolved = value,
            "integrity" => entry.integrity = value,
            _ => {}
        }
    }
    flush(&mut object, &mut keys, &mut entry);
    Ok(object)
}

fn flush(object: &mut YarnLockObject, keys: &mut Vec<String>, entry: &mut YarnLockEntry) {
    let entry = std::mem::take(entry);
    for key in keys.drain(..) {
        object.insert(key, entry.clone());
    }
}

fn split_field(line: &str) -> Option<(&str, &str)> {
    if let Some(rest) = line.strip_prefix('"') {
        let end = rest.find('"')?;
        return Some((&rest[..end], rest[end + 1..].trim()));
    }
    let (field, value) = line.split_once(char::is_whitespace)?;
    Some((field, value.trim()))
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(s)
}

fn parse_berry(content: &str) -> Result<YarnLockObject, String> {
    let doc: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    let mut object = YarnLockObject::new();
    for (header, value) in doc {
        if header == "__metadata" {
            continue;
        }
        let entry = YarnLockEntry {
            version: scalar(&value, "version"),
            resolved: scalar(&value, "resolution"),
            integrity: scalar(&value, "checksum"),
        };
        for key in header.split(',').map(str::trim).filter_map(berry_registry_key) {
            object.insert(key, entry.clone());
        }
    }
    Ok(object)
}

/// `name@npm:range` becomes `name@range`. Descriptors with any other protocol
/// (`patch:`, `workspace:`, `portal:`, `link:`, ...) are not registry versions and yield `None`.
fn berry_registry_key(key: &str) -> Option<String> {
    let at = key.get(1..)?.find('@')? + 1;
    let (name, range) = (&key[..at], &key[at + 1..]);
    if let Some(range) = range.strip_prefix("npm:") {
        return Some(format!("{name}@{range}"));
    }
    let is_protocol = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric() || c == '+');
    match range.split_once(':') {
        Some((protocol, _)) if is_protocol(protocol) => None,
        _ => Some(key.to_string()),
    }
}

fn scalar(value: &serde_yaml::Value, field: &str) -> Option<String> {
    match value.get(field)? {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
