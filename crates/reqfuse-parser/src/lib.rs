//! Line parser for pip-style requirements files.
//!
//! Turns one raw line into either a structured [`RequirementEntry`] or a
//! [`PassThroughLine`] that is carried into the merged output untouched.
//! Parsing never fails: anything the grammar does not recognize is a
//! pass-through line.

mod entry;
mod parser;

pub use entry::{
    normalize_name, Constraint, Operator, ParsedLine, PassThroughLine, RequirementEntry,
    UnknownOperator,
};
pub use parser::{parse_blob, parse_line, parse_line_at, strip_inline_comment};
