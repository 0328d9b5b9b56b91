//! Parsed line types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Version comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    /// Compatible release (`~=`).
    #[serde(rename = "~=")]
    Compatible,
    #[serde(rename = "!=")]
    Ne,
}

impl Operator {
    /// Every recognized operator.
    pub const ALL: [Operator; 7] = [
        Operator::Eq,
        Operator::Ge,
        Operator::Le,
        Operator::Gt,
        Operator::Lt,
        Operator::Compatible,
        Operator::Ne,
    ];

    /// The operator token as written in a requirements file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Compatible => "~=",
            Self::Ne => "!=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token that is not one of the recognized operators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported operator '{0}', expected one of ==, >=, <=, >, <, ~=, !=")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

/// An operator bound to a version, e.g. `>=1.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraint {
    pub operator: Operator,
    pub version: String,
}

impl Constraint {
    pub fn new(operator: Operator, version: impl Into<String>) -> Self {
        Self {
            operator,
            version: version.into(),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}

/// Normalize a package name for comparison (PEP 503).
///
/// Lowercases and collapses every run of `-`, `_` and `.` into a single `-`.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
            }
            in_separator = true;
        } else {
            out.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    out
}

/// A requirement line that parsed into a package and optional constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementEntry {
    /// Package name as written.
    pub name: String,

    /// Normalized comparison key (see [`normalize_name`]).
    pub key: String,

    /// Bracketed extras, in the order written.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<String>,

    /// None for a bare package name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,

    /// Source line with surrounding whitespace stripped.
    pub raw_line: String,

    /// Index of the input this line came from.
    pub source_index: usize,

    /// 1-based line number within that input.
    pub line_number: usize,
}

impl RequirementEntry {
    pub fn is_constrained(&self) -> bool {
        self.constraint.is_some()
    }

    /// Render back to requirements syntax: `name[extras]<op><version>`.
    pub fn render(&self) -> String {
        let mut out = self.name.clone();
        if !self.extras.is_empty() {
            out.push('[');
            out.push_str(&self.extras.join(","));
            out.push(']');
        }
        if let Some(constraint) = &self.constraint {
            out.push_str(&constraint.to_string());
        }
        out
    }

    /// Short description of the constraint for messages: `==1.0` or `(any)`.
    pub fn constraint_label(&self) -> String {
        match &self.constraint {
            Some(c) => c.to_string(),
            None => "(any)".to_string(),
        }
    }
}

impl fmt::Display for RequirementEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A comment, blank or unparseable line carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassThroughLine {
    pub text: String,
    pub source_index: usize,
    pub line_number: usize,
}

impl PassThroughLine {
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Result of parsing one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsedLine {
    Requirement(RequirementEntry),
    PassThrough(PassThroughLine),
}

impl ParsedLine {
    pub fn as_requirement(&self) -> Option<&RequirementEntry> {
        match self {
            Self::Requirement(entry) => Some(entry),
            Self::PassThrough(_) => None,
        }
    }

    pub fn as_pass_through(&self) -> Option<&PassThroughLine> {
        match self {
            Self::Requirement(_) => None,
            Self::PassThrough(line) => Some(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_round_trip_tokens() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
        }
    }

    #[test]
    fn test_unknown_operator() {
        let err = "===".parse::<Operator>().unwrap_err();
        assert_eq!(err, UnknownOperator("===".to_string()));
        assert!(err.to_string().contains("==="));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("My-Package"), "my-package");
        assert_eq!(normalize_name("my_package"), "my-package");
        assert_eq!(normalize_name("zope.interface"), "zope-interface");
        assert_eq!(normalize_name("Foo__Bar-.baz"), "foo-bar-baz");
    }

    #[test]
    fn test_render_with_extras_and_constraint() {
        let entry = RequirementEntry {
            name: "uvicorn".to_string(),
            key: "uvicorn".to_string(),
            extras: vec!["standard".to_string()],
            constraint: Some(Constraint::new(Operator::Ge, "0.20")),
            raw_line: "uvicorn[standard]>=0.20".to_string(),
            source_index: 0,
            line_number: 1,
        };
        assert_eq!(entry.render(), "uvicorn[standard]>=0.20");
        assert_eq!(entry.constraint_label(), ">=0.20");
    }

    #[test]
    fn test_render_bare() {
        let entry = RequirementEntry {
            name: "wandb".to_string(),
            key: "wandb".to_string(),
            extras: vec![],
            constraint: None,
            raw_line: "wandb".to_string(),
            source_index: 2,
            line_number: 7,
        };
        assert_eq!(entry.render(), "wandb");
        assert_eq!(entry.constraint_label(), "(any)");
    }

    #[test]
    fn test_operator_serializes_as_token() {
        let json = serde_json::to_string(&Constraint::new(Operator::Compatible, "1.4")).unwrap();
        assert_eq!(json, r#"{"operator":"~=","version":"1.4"}"#);
    }
}
