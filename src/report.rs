//! Machine-readable merge report (`--json`).

use chrono::{DateTime, Utc};
use reqfuse_parser::Constraint;
use serde::Serialize;

use crate::config::ConfigSource;
use crate::merge::PassThroughPlacement;
use crate::pipeline::FuseRun;

/// Schema version for the merge report
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "reqfuse/merge_report@1";

/// An input file with provenance.
#[derive(Debug, Clone, Serialize)]
pub struct InputSummary {
    pub index: usize,
    pub path: String,
    pub lines: usize,
    /// SHA-256 of the raw file bytes
    pub digest: String,
}

/// A canonical entry and where its constraint came from.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub key: String,
    /// Rendered requirement line
    pub requirement: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
    pub source: String,
    pub line: usize,
}

/// A retained pass-through line.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPassThrough {
    pub text: String,
    pub source: String,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub schema_version: u32,
    pub schema_id: String,
    pub created_at: DateTime<Utc>,
    pub inputs: Vec<InputSummary>,
    pub config_sources: Vec<ConfigSource>,
    pub pass_through_placement: PassThroughPlacement,
    pub entries: Vec<ReportEntry>,
    pub pass_through: Vec<ReportPassThrough>,
    /// Output lines in final order
    pub output: Vec<String>,
}

impl MergeReport {
    pub fn build(run: &FuseRun, config_sources: &[ConfigSource]) -> Self {
        let source_name = |index: usize| {
            run.inputs
                .get(index)
                .map(|i| i.path.display().to_string())
                .unwrap_or_else(|| format!("#{}", index))
        };

        let inputs = run
            .inputs
            .iter()
            .enumerate()
            .map(|(index, input)| InputSummary {
                index,
                path: input.path.display().to_string(),
                lines: input.contents.lines().count(),
                digest: input.digest.clone(),
            })
            .collect();

        let entries = run
            .outcome
            .entries()
            .iter()
            .map(|e| ReportEntry {
                name: e.name.clone(),
                key: e.key.clone(),
                requirement: e.render(),
                extras: e.extras.clone(),
                constraint: e.constraint.clone(),
                source: source_name(e.source_index),
                line: e.line_number,
            })
            .collect();

        let pass_through = run
            .outcome
            .pass_through()
            .iter()
            .map(|p| ReportPassThrough {
                text: p.text.clone(),
                source: source_name(p.source_index),
                line: p.line_number,
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            inputs,
            config_sources: config_sources.to_vec(),
            pass_through_placement: run.outcome.placement(),
            entries,
            pass_through,
            output: run.outcome.lines(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
