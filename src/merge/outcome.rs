//! Merged result and its text rendering.

use reqfuse_parser::{PassThroughLine, RequirementEntry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where retained pass-through lines go relative to the merged entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassThroughPlacement {
    /// All pass-through lines after the entries.
    #[default]
    Bottom,
    /// Lines preceding the first requirement of the first input go on top,
    /// the rest after the entries.
    Header,
    /// All pass-through lines before the entries.
    Top,
}

impl PassThroughPlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bottom => "bottom",
            Self::Header => "header",
            Self::Top => "top",
        }
    }
}

impl fmt::Display for PassThroughPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassThroughPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bottom" => Ok(Self::Bottom),
            "header" => Ok(Self::Header),
            "top" => Ok(Self::Top),
            other => Err(format!(
                "invalid pass-through placement '{}'. valid: bottom, header, top",
                other
            )),
        }
    }
}

/// Successful merge: ordered canonical entries plus retained pass-through lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    entries: Vec<RequirementEntry>,
    pass_through: Vec<PassThroughLine>,
    /// Number of leading `pass_through` lines that form the first input's header.
    #[serde(skip)]
    header_len: usize,
    placement: PassThroughPlacement,
}

impl MergeOutcome {
    pub(crate) fn new(
        entries: Vec<RequirementEntry>,
        pass_through: Vec<PassThroughLine>,
        header_len: usize,
        placement: PassThroughPlacement,
    ) -> Self {
        Self {
            entries,
            pass_through,
            header_len,
            placement,
        }
    }

    /// Canonical entries in output order.
    pub fn entries(&self) -> &[RequirementEntry] {
        &self.entries
    }

    /// Retained pass-through lines in first-seen order.
    pub fn pass_through(&self) -> &[PassThroughLine] {
        &self.pass_through
    }

    pub fn placement(&self) -> PassThroughPlacement {
        self.placement
    }

    /// Output lines in final order.
    pub fn lines(&self) -> Vec<String> {
        let split = match self.placement {
            PassThroughPlacement::Bottom => 0,
            PassThroughPlacement::Header => self.header_len,
            PassThroughPlacement::Top => self.pass_through.len(),
        };
        let (above, below) = self.pass_through.split_at(split);

        let mut lines = Vec::with_capacity(self.entries.len() + self.pass_through.len());
        lines.extend(above.iter().map(|l| l.text.clone()));
        lines.extend(self.entries.iter().map(RequirementEntry::render));
        lines.extend(below.iter().map(|l| l.text.clone()));
        lines
    }

    /// Output text, lines joined by `\n`.
    pub fn render(&self, trailing_newline: bool) -> String {
        let mut text = self.lines().join("\n");
        if trailing_newline && !text.is_empty() {
            text.push('\n');
        }
        text
    }
}
