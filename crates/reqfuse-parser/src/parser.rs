//! Requirements line parser.
//!
//! Recognizes `name`, `name[extras]` and `name[extras]<op><version>` with an
//! optional inline comment. Everything else passes through.

use crate::entry::{normalize_name, Constraint, Operator, ParsedLine, PassThroughLine, RequirementEntry};
use regex_lite::Regex;
use std::sync::OnceLock;

/// Prefixes of lines that are pip options or direct references, never requirements.
const PASS_THROUGH_PREFIXES: &[&str] = &["-", "git+", "hg+", "svn+", "bzr+"];

/// Requirement grammar, applied after the inline comment is stripped.
///
/// `===` is captured so it can be rejected explicitly instead of being read
/// as `==` followed by a version starting with `=`. The version group takes
/// the whole specifier set, so `>=2.0,<3.0` is one constraint with operator
/// `>=` and version `2.0,<3.0`.
const REQUIREMENT_PATTERN: &str = r"^(?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[(?P<extras>[^\[\]]*)\])?\s*(?:(?P<op>===|==|~=|!=|>=|<=|>|<)\s*(?P<version>[A-Za-z0-9*+!._-]+(?:\s*,\s*(?:===|==|~=|!=|>=|<=|>|<)\s*[A-Za-z0-9*+!._-]+)*))?$";

/// Byte-order mark some editors put at the start of a file.
const BOM: char = '\u{feff}';

/// Valid extra name.
const EXTRA_PATTERN: &str = r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?$";

fn requirement_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(REQUIREMENT_PATTERN).expect("requirement pattern compiles"))
}

fn extra_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EXTRA_PATTERN).expect("extra pattern compiles"))
}

/// Return `line` up to the first `#` that is not inside single or double quotes.
pub fn strip_inline_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    for (i, c) in line.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '#') => return &line[..i],
            (None, _) => {}
        }
    }
    line
}

/// Parse a single line as line 1 of input `source_index`.
pub fn parse_line(text: &str, source_index: usize) -> ParsedLine {
    parse_line_at(text, source_index, 1)
}

/// Parse a single line with its position in the input.
pub fn parse_line_at(text: &str, source_index: usize, line_number: usize) -> ParsedLine {
    let stripped = text.trim();

    let pass_through = || {
        ParsedLine::PassThrough(PassThroughLine {
            text: stripped.to_string(),
            source_index,
            line_number,
        })
    };

    if stripped.is_empty() || stripped.starts_with('#') {
        return pass_through();
    }

    // pip options (-e, -r, --index-url) and VCS/URL references
    if PASS_THROUGH_PREFIXES.iter().any(|p| stripped.starts_with(p)) || stripped.contains("://") {
        return pass_through();
    }

    let body = strip_inline_comment(stripped).trim();
    let Some(caps) = requirement_re().captures(body) else {
        return pass_through();
    };

    let name = &caps["name"];

    let extras = match caps.name("extras") {
        Some(m) => match parse_extras(m.as_str()) {
            Some(extras) => extras,
            None => return pass_through(),
        },
        None => Vec::new(),
    };

    let constraint = match (caps.name("op"), caps.name("version")) {
        (Some(op), Some(version)) => match op.as_str().parse::<Operator>() {
            Ok(operator) => Some(Constraint::new(operator, compact(version.as_str()))),
            Err(_) => return pass_through(),
        },
        _ => None,
    };

    ParsedLine::Requirement(RequirementEntry {
        name: name.to_string(),
        key: normalize_name(name),
        extras,
        constraint,
        raw_line: stripped.to_string(),
        source_index,
        line_number,
    })
}

/// Drop the whitespace a specifier set may carry around its commas.
fn compact(version: &str) -> String {
    version.split_whitespace().collect()
}

/// Split a bracketed extras list. Returns None if any extra is malformed.
fn parse_extras(list: &str) -> Option<Vec<String>> {
    let mut extras = Vec::new();
    for part in list.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if !extra_re().is_match(part) {
            return None;
        }
        extras.push(part.to_string());
    }
    Some(extras)
}

/// Parse every line of one input file. A leading byte-order mark is ignored.
pub fn parse_blob(blob: &str, source_index: usize) -> Vec<ParsedLine> {
    let blob = blob.strip_prefix(BOM).unwrap_or(blob);
    blob.lines()
        .enumerate()
        .map(|(i, line)| parse_line_at(line, source_index, i + 1))
        .collect()
}
