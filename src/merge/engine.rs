//! Merge accumulator.
//!
//! [`MergeState`] holds the canonical entry per normalized package name and
//! the retained pass-through lines for one merge invocation. It is owned by
//! the caller and consumed by [`MergeState::finish`].

use std::collections::{HashMap, HashSet};

use reqfuse_parser::{normalize_name, parse_blob, ParsedLine, PassThroughLine, RequirementEntry};
use tracing::debug;

use super::conflict::{resolve, ConflictError, Resolution};
use super::outcome::{MergeOutcome, PassThroughPlacement};

/// Options for one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Keep canonical entries in first-seen order instead of sorting by name.
    pub order_preserving: bool,
    pub pass_through: PassThroughPlacement,
}

/// Accumulated merge state.
#[derive(Debug, Default)]
pub struct MergeState {
    /// Canonical entries in first-seen order.
    entries: Vec<RequirementEntry>,
    /// Normalized name -> position in `entries`.
    by_key: HashMap<String, usize>,
    pass_through: Vec<PassThroughLine>,
    seen_text: HashSet<String>,
    header_len: usize,
    seen_requirement: bool,
}

impl MergeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct packages so far.
    pub fn package_count(&self) -> usize {
        self.entries.len()
    }

    /// Parse and absorb one whole input.
    pub fn absorb_blob(&mut self, blob: &str, source_index: usize) -> Result<(), ConflictError> {
        for line in parse_blob(blob, source_index) {
            self.absorb(line)?;
        }
        Ok(())
    }

    /// Absorb one parsed line.
    pub fn absorb(&mut self, line: ParsedLine) -> Result<(), ConflictError> {
        match line {
            ParsedLine::Requirement(entry) => self.absorb_requirement(entry),
            ParsedLine::PassThrough(line) => {
                self.absorb_pass_through(line);
                Ok(())
            }
        }
    }

    fn absorb_requirement(&mut self, incoming: RequirementEntry) -> Result<(), ConflictError> {
        self.seen_requirement = true;

        let Some(&slot) = self.by_key.get(&incoming.key) else {
            self.by_key.insert(incoming.key.clone(), self.entries.len());
            self.entries.push(incoming);
            return Ok(());
        };

        let canonical = &self.entries[slot];
        let merged = match resolve(canonical, &incoming)? {
            Resolution::Absorb | Resolution::Duplicate => RequirementEntry {
                extras: union_extras(&canonical.extras, &incoming.extras),
                ..canonical.clone()
            },
            Resolution::Upgrade => {
                debug!(
                    package = %canonical.name,
                    constraint = %incoming.constraint_label(),
                    source_index = incoming.source_index,
                    "Constraint upgrades bare requirement"
                );
                RequirementEntry {
                    name: canonical.name.clone(),
                    extras: union_extras(&canonical.extras, &incoming.extras),
                    ..incoming
                }
            }
        };
        self.entries[slot] = merged;
        Ok(())
    }

    fn absorb_pass_through(&mut self, line: PassThroughLine) {
        if line.is_blank() {
            return;
        }
        let in_header = line.source_index == 0 && !self.seen_requirement;
        if !self.seen_text.insert(line.text.clone()) {
            debug!(text = %line.text, source_index = line.source_index, "Dropping repeated pass-through line");
            return;
        }
        if in_header {
            self.header_len += 1;
        }
        self.pass_through.push(line);
    }

    /// Order the canonical entries and produce the outcome.
    pub fn finish(self, options: MergeOptions) -> MergeOutcome {
        let mut entries = self.entries;
        if !options.order_preserving {
            entries.sort_by(|a, b| a.key.cmp(&b.key));
        }
        MergeOutcome::new(entries, self.pass_through, self.header_len, options.pass_through)
    }
}

/// Extras of `held` followed by those of `incoming` not already present.
fn union_extras(held: &[String], incoming: &[String]) -> Vec<String> {
    let mut extras = held.to_vec();
    for extra in incoming {
        let key = normalize_name(extra);
        if !extras.iter().any(|e| normalize_name(e) == key) {
            extras.push(extra.clone());
        }
    }
    extras
}
