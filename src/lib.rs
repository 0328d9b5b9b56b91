//! reqfuse - fuse Python requirements files
//!
//! Merges several requirements files into one deterministic list and stops
//! with a clear error when two inputs pin the same package differently.

pub mod config;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod report;

pub use config::{CliOverrides, EffectiveConfig, FuseConfig};
pub use error::{FuseError, FuseResult};
pub use merge::{merge, ConflictError, MergeOptions, MergeOutcome, Merger, PassThroughPlacement};
pub use pipeline::{FuseRequest, FuseRun};
pub use report::MergeReport;
pub use reqfuse_parser::{parse_line, normalize_name, Constraint, Operator, ParsedLine, PassThroughLine, RequirementEntry};
