use semver::Version;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Lockfile schema version in compact `major.minor` form (`5.4`, `6.0`, `5`).
///
/// YAML may store it either as a number or as a string. An unquoted number is
/// read through YAML float parsing, so `5.10` arrives as `5.1`; only a quoted
/// `'5.10'` keeps its minor. Versions are always written quoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comver(String);

impl Comver {
    pub fn new(raw: impl Into<String>) -> Self { Self(raw.into().trim().to_string()) }

    pub fn as_str(&self) -> &str { &self.0 }

    /// `5` becomes `5.0.0`, `5.4` becomes `5.4.0`.
    pub fn to_semver(&self) -> Option<Version> {
        comver_to_semver(&self.0)
    }

    pub fn major(&self) -> Option<u64> { self.to_semver().map(|v| v.major) }
}

pub fn comver_to_semver(comver: &str) -> Option<Version> {
    let s = comver.trim();
    let full = if s.contains('.') { format!("{s}.0") } else { format!("{s}.0.0") };
    Version::parse(&full).ok()
}

impl Default for Comver {
    fn default() -> Self { Self("0".into()) }
}

impl fmt::Display for Comver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for Comver {
    fn from(s: &str) -> Self { Self::new(s) }
}

impl PartialOrd for Comver {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Comver {
    // Unparsable versions sort below every valid one.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.to_semver(), other.to_semver()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl Serialize for Comver {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Comver {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ComverVisitor;

        impl Visitor<'_> for ComverVisitor {
            type Value = Comver;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a lockfile version number or string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Comver, E> { Ok(Comver(v.to_string())) }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Comver, E> { Ok(Comver(v.to_string())) }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Comver, E> { Ok(Comver(v.to_string())) }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Comver, E> { Ok(Comver::new(v)) }
        }

        deserializer.deserialize_any(ComverVisitor)
    }
}
