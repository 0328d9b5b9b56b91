//! Conflict rule between a canonical entry and a later entry for the same package.

use reqfuse_parser::{Constraint, RequirementEntry};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Where a conflicting constraint was declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintOrigin {
    pub constraint: Constraint,
    pub source_index: usize,
    pub line_number: usize,
}

impl ConstraintOrigin {
    fn from_entry(entry: &RequirementEntry, constraint: &Constraint) -> Self {
        Self {
            constraint: constraint.clone(),
            source_index: entry.source_index,
            line_number: entry.line_number,
        }
    }

    /// Names the input by path when `inputs` has one for it, by index otherwise.
    fn write_to(&self, f: &mut fmt::Formatter<'_>, inputs: &[&Path]) -> fmt::Result {
        match inputs.get(self.source_index) {
            Some(path) => write!(f, "'{}' in {}:{}", self.constraint, path.display(), self.line_number),
            None => write!(
                f,
                "'{}' (input #{}, line {})",
                self.constraint, self.source_index, self.line_number
            ),
        }
    }
}

impl fmt::Display for ConstraintOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, &[])
    }
}

/// Two incompatible constraints for one normalized package name.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub struct ConflictError {
    /// Package name as first written.
    pub package: String,
    /// The constraint already held by the canonical entry.
    pub first: ConstraintOrigin,
    /// The later constraint that disagrees with it.
    pub second: ConstraintOrigin,
}

impl ConflictError {
    /// Render the conflict with input paths instead of indices.
    pub fn describe<P: AsRef<Path>>(&self, inputs: &[P]) -> String {
        Message {
            conflict: self,
            inputs: inputs.iter().map(AsRef::as_ref).collect(),
        }
        .to_string()
    }
}

impl fmt::Display for ConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = Message {
            conflict: self,
            inputs: Vec::new(),
        };
        fmt::Display::fmt(&message, f)
    }
}

/// The one conflict message, with or without input paths.
struct Message<'a> {
    conflict: &'a ConflictError,
    inputs: Vec<&'a Path>,
}

impl fmt::Display for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dependency conflict for package '{}': ", self.conflict.package)?;
        self.conflict.first.write_to(f, &self.inputs)?;
        f.write_str(" vs ")?;
        self.conflict.second.write_to(f, &self.inputs)
    }
}

/// What to do with a later entry for a package that already has a canonical entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Incoming entry is bare; the canonical constraint stands.
    Absorb,
    /// Same operator and version.
    Duplicate,
    /// Canonical entry is bare; the incoming constraint replaces it.
    Upgrade,
}

/// Apply the conflict rule.
///
/// Never attempts range intersection: two constraints that differ in
/// operator or version are always a conflict.
pub fn resolve(canonical: &RequirementEntry, incoming: &RequirementEntry) -> Result<Resolution, ConflictError> {
    match (&canonical.constraint, &incoming.constraint) {
        (_, None) => Ok(Resolution::Absorb),
        (None, Some(_)) => Ok(Resolution::Upgrade),
        (Some(held), Some(new)) if held == new => Ok(Resolution::Duplicate),
        (Some(held), Some(new)) => Err(ConflictError {
            package: canonical.name.clone(),
            first: ConstraintOrigin::from_entry(canonical, held),
            second: ConstraintOrigin::from_entry(incoming, new),
        }),
    }
}
