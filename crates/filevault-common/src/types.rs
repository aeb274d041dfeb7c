//! Core domain types shared across filevault.
//!
//! Includes the stored file record referenced by lifecycle hooks, the image
//! version spec loaded from configuration and the comparison types used by
//! dimension constraints.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::ids::FileId;

// ============================================================================
// Stored file record
// ============================================================================

/// One persisted file or image, as seen by filevault.
///
/// Owned by the host persistence layer; filevault only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFileRecord {
    /// Opaque identifier.
    pub id: FileId,
    /// Logical owner name; groups the version configuration.
    pub model: String,
    /// Tag of the storage backend holding the bytes.
    pub adapter: String,
}

impl StoredFileRecord {
    /// Create a record from its identity fields.
    pub fn new(id: FileId, model: impl Into<String>, adapter: impl Into<String>) -> Self {
        Self {
            id,
            model: model.into(),
            adapter: adapter.into(),
        }
    }
}

// ============================================================================
// Comparisons
// ============================================================================

/// Numeric comparison operator used by dimension constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
}

impl Operator {
    /// Apply the operator as `actual <op> expected`.
    pub fn compare(self, actual: u32, expected: u32) -> bool {
        match self {
            Self::Eq => actual == expected,
            Self::Ne => actual != expected,
            Self::Gt => actual > expected,
            Self::Ge => actual >= expected,
            Self::Lt => actual < expected,
            Self::Le => actual <= expected,
        }
    }

    /// The textual symbol for this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "==" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            other => Err(Error::invalid_argument(format!(
                "unknown comparison operator: {other}"
            ))),
        }
    }
}

/// An `(operator, value)` pair, written `["<=", 150]` in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison(pub Operator, pub u32);

impl Comparison {
    pub fn new(operator: Operator, value: u32) -> Self {
        Self(operator, value)
    }

    pub fn operator(&self) -> Operator {
        self.0
    }

    pub fn value(&self) -> u32 {
        self.1
    }

    /// Check a measured value against this comparison.
    pub fn matches(&self, actual: u32) -> bool {
        self.0.compare(actual, self.1)
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.1)
    }
}

/// Parses `OP:VALUE` or `OP VALUE`, e.g. `<=:150` or `== 100`.
impl std::str::FromStr for Comparison {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| Error::invalid_argument(format!("missing value in comparison: {s}")))?;
        let (op, value) = s.split_at(split);
        let op = op.trim().trim_end_matches(':');
        let value = value
            .trim()
            .parse::<u32>()
            .map_err(|e| Error::invalid_argument(format!("bad comparison value {value:?}: {e}")))?;
        Ok(Self(op.parse()?, value))
    }
}

// ============================================================================
// Dimensions and versions
// ============================================================================

/// Measured pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Per-axis constraints; an absent axis is unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Comparison>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Comparison>,
}

impl DimensionConstraints {
    pub fn width(comparison: Comparison) -> Self {
        Self {
            width: Some(comparison),
            height: None,
        }
    }

    pub fn height(comparison: Comparison) -> Self {
        Self {
            width: None,
            height: Some(comparison),
        }
    }

    pub fn with_width(mut self, comparison: Comparison) -> Self {
        self.width = Some(comparison);
        self
    }

    pub fn with_height(mut self, comparison: Comparison) -> Self {
        self.height = Some(comparison);
        self
    }

    /// True when neither axis is constrained.
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}

/// One named image variant configured for a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSpec {
    /// Version label, e.g. `thumbnail`.
    pub label: String,
    /// Size constraints of the variant, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<DimensionConstraints>,
    /// Salt mixed into the `{hash}` path token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_salt: Option<String>,
}

impl VersionSpec {
    /// A spec with no constraints and no salt.
    pub fn bare(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            constraints: None,
            hash_salt: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_compare() {
        assert!(Operator::Eq.compare(100, 100));
        assert!(!Operator::Eq.compare(50, 100));
        assert!(Operator::Ne.compare(50, 100));
        assert!(Operator::Gt.compare(101, 100));
        assert!(!Operator::Gt.compare(100, 100));
        assert!(Operator::Ge.compare(100, 100));
        assert!(Operator::Lt.compare(99, 100));
        assert!(Operator::Le.compare(100, 100));
        assert!(!Operator::Le.compare(101, 100));
    }

    #[test]
    fn test_operator_from_str() {
        assert_eq!("==".parse::<Operator>().unwrap(), Operator::Eq);
        assert_eq!(" <= ".parse::<Operator>().unwrap(), Operator::Le);
        assert!("=~".parse::<Operator>().is_err());
    }

    #[test]
    fn test_operator_display_roundtrips_symbol() {
        for op in [
            Operator::Eq,
            Operator::Ne,
            Operator::Gt,
            Operator::Ge,
            Operator::Lt,
            Operator::Le,
        ] {
            assert_eq!(op.to_string().parse::<Operator>().unwrap(), op);
        }
    }

    #[test]
    fn test_comparison_from_str() {
        assert_eq!(
            "<=:150".parse::<Comparison>().unwrap(),
            Comparison::new(Operator::Le, 150)
        );
        assert_eq!(
            "== 100".parse::<Comparison>().unwrap(),
            Comparison::new(Operator::Eq, 100)
        );
        assert_eq!(
            ">=640".parse::<Comparison>().unwrap(),
            Comparison::new(Operator::Ge, 640)
        );
        assert!("<=".parse::<Comparison>().is_err());
        assert!("~ 5".parse::<Comparison>().is_err());
    }

    #[test]
    fn test_comparison_serde_as_pair() {
        let c = Comparison::new(Operator::Ge, 10);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"[">=",10]"#);
        let parsed: Comparison = serde_json::from_str(r#"["!=", 3]"#).unwrap();
        assert_eq!(parsed, Comparison::new(Operator::Ne, 3));
    }

    #[test]
    fn test_constraints_builders() {
        let c = DimensionConstraints::width(Comparison::new(Operator::Le, 150))
            .with_height(Comparison::new(Operator::Le, 100));
        assert!(!c.is_empty());
        assert_eq!(c.height.unwrap().value(), 100);
        assert!(DimensionConstraints::default().is_empty());
    }

    #[test]
    fn test_record_new() {
        let record = StoredFileRecord::new(FileId::from("7"), "Avatar", "Local");
        assert_eq!(record.model, "Avatar");
        assert_eq!(record.adapter, "Local");
    }
}
