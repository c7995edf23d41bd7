//! # Names, Domain Types, and Fully-Qualified Names
//!
//! A registration is keyed by a [`FullyQualifiedName`]: a base [`Label`]
//! (`"fer"`) joined to a [`DomainType`] suffix (`"lac"`) with a single dot,
//! giving `"fer.lac"`.
//!
//! Neither half may contain a dot, so the join is unambiguous and two
//! different `(label, domain type)` pairs can never collide on the same
//! key. Both halves are case-sensitive.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum accepted base-name length in bytes.
pub const MAX_LABEL_LEN: usize = 253;

/// Maximum accepted domain-type length in bytes.
pub const MAX_DOMAIN_TYPE_LEN: usize = 63;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Shared character rules for both halves of a fully-qualified name.
fn segment_violation(value: &str, max_len: usize) -> Option<&'static str> {
    if value.is_empty() {
        Some("must not be empty")
    } else if value.len() > max_len {
        Some("too long")
    } else if value.contains('.') {
        Some("must not contain '.'")
    } else if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        Some("must not contain whitespace or control characters")
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

/// The human-chosen base name, e.g. `"fer"` in `"fer.lac"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Validate and wrap a base name.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        match segment_violation(&value, MAX_LABEL_LEN) {
            Some(reason) => Err(ValidationError::InvalidLabel { value, reason }),
            None => Ok(Self(value)),
        }
    }

    /// Borrow the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters (Unicode scalar values), which selects the
    /// price tier. `"ñandú"` is five characters even though it is seven bytes.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Label {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl_validating_deserialize!(Label);

// ---------------------------------------------------------------------------
// DomainType
// ---------------------------------------------------------------------------

/// An administrator-controlled registrable suffix, e.g. `"lac"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DomainType(String);

impl DomainType {
    /// Validate and wrap a domain type identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        match segment_violation(&value, MAX_DOMAIN_TYPE_LEN) {
            Some(reason) => Err(ValidationError::InvalidDomainType { value, reason }),
            None => Ok(Self(value)),
        }
    }

    /// Borrow the domain type as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DomainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DomainType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl_validating_deserialize!(DomainType);

// ---------------------------------------------------------------------------
// FullyQualifiedName
// ---------------------------------------------------------------------------

/// The registry's primary key: `label + "." + domain_type`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FullyQualifiedName {
    label: Label,
    domain_type: DomainType,
}

impl FullyQualifiedName {
    /// Join an already-validated label and domain type.
    pub fn new(label: Label, domain_type: DomainType) -> Self {
        Self { label, domain_type }
    }

    /// The base name half.
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// The suffix half.
    pub fn domain_type(&self) -> &DomainType {
        &self.domain_type
    }
}

impl std::fmt::Display for FullyQualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.label, self.domain_type)
    }
}

impl std::str::FromStr for FullyQualifiedName {
    type Err = ValidationError;

    /// Split at the last `.`. Because neither half may contain a dot, any
    /// input with zero or several dots is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFullyQualifiedName {
            value: s.to_string(),
        };
        let (label, domain_type) = s.rsplit_once('.').ok_or_else(invalid)?;
        let label = Label::new(label).map_err(|_| invalid())?;
        let domain_type = DomainType::new(domain_type).map_err(|_| invalid())?;
        Ok(Self::new(label, domain_type))
    }
}

impl Serialize for FullyQualifiedName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl_validating_deserialize!(FullyQualifiedName);

#[cfg(test)]
mod tests {
    use super::*;

    fn fqn(s: &str) -> FullyQualifiedName {
        s.parse().unwrap()
    }

    #[test]
    fn label_char_len_counts_scalars() {
        assert_eq!(Label::new("fer").unwrap().char_len(), 3);
        assert_eq!(Label::new("ñandú").unwrap().char_len(), 5);
    }

    #[test]
    fn label_rejects_dot_and_empty() {
        assert!(Label::new("").is_err());
        assert!(Label::new("fer.lac").is_err());
        assert!(Label::new("fe r").is_err());
    }

    #[test]
    fn domain_type_is_case_sensitive() {
        let upper = DomainType::new("LAC").unwrap();
        let lower = DomainType::new("lac").unwrap();
        assert_ne!(upper, lower);
    }

    #[test]
    fn domain_type_length_limit() {
        assert!(DomainType::new("a".repeat(MAX_DOMAIN_TYPE_LEN)).is_ok());
        assert!(DomainType::new("a".repeat(MAX_DOMAIN_TYPE_LEN + 1)).is_err());
    }

    #[test]
    fn fqn_display_joins_with_dot() {
        let name = FullyQualifiedName::new(
            Label::new("fer").unwrap(),
            DomainType::new("lac").unwrap(),
        );
        assert_eq!(name.to_string(), "fer.lac");
    }

    #[test]
    fn fqn_parse_splits_halves() {
        let name = fqn("ferna.ripio");
        assert_eq!(name.label().as_str(), "ferna");
        assert_eq!(name.domain_type().as_str(), "ripio");
    }

    #[test]
    fn fqn_parse_rejects_bad_shapes() {
        for bad in ["fer", ".lac", "fer.", "a.b.c", "", "."] {
            assert!(
                bad.parse::<FullyQualifiedName>().is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn same_label_different_domains_are_distinct() {
        assert_ne!(fqn("ferna.ripio"), fqn("ferna.lac"));
    }

    #[test]
    fn fqn_serde_as_string() {
        let name = fqn("fer.lac");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"fer.lac\"");
        let parsed: FullyQualifiedName = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, name);
        assert!(serde_json::from_str::<FullyQualifiedName>("\"fer\"").is_err());
    }

    #[test]
    fn label_deserialize_validates() {
        assert!(serde_json::from_str::<Label>("\"a.b\"").is_err());
        assert!(serde_json::from_str::<DomainType>("\"\"").is_err());
    }
}
