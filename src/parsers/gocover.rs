//! A parser for Go's statement coverage profile format, as written by
//! `go test -coverprofile`.
//!
//! A profile starts with a header declaring the counting mode:
//!
//! ```text
//! mode: set
//! ```
//!
//! and is followed by one line per measured block:
//!
//! ```text
//! example.com/mod/pkg/file.go:12.34,15.2 3 1
//! ```
//!
//! which reads as `file:startLine.startCol,endLine.endCol numStatements
//! hitCount`. The file name is everything up to the last `:` on the line, so
//! names containing colons survive.
//!
//! Concatenating the output of several test binaries repeats the header. A
//! repeated header is skipped as long as it declares the same mode as the
//! first one.
//!
//! Any non-empty mode name is accepted here. Whether the mode is usable is
//! decided later by [`CoverageCollector::validate`](crate::collector::CoverageCollector::validate).

use std::str::FromStr;

use tracing::debug;
use winnow::{
    combinator::{eof, separated_pair, terminated},
    token::take_while,
    PResult, Parser,
};

use super::{parse_u32, parse_u64};
use crate::report::models::{Block, CoverMode, CoverageRecord, Profile};

const MODE_HEADER_PREFIX: &str = "mode:";

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ProfileParseError {
    #[error("profile is not valid UTF-8")]
    InvalidUtf8,
    #[error("missing 'mode:' header")]
    MissingModeHeader,
    #[error("line {line}: invalid 'mode:' header")]
    InvalidModeHeader { line: usize },
    #[error("line {line}: inconsistent mode '{found}', profile started with '{expected}'")]
    InconsistentMode {
        line: usize,
        expected: CoverMode,
        found: CoverMode,
    },
    #[error(
        "line {line}: malformed block record '{record}', expected \
         'file:startLine.startCol,endLine.endCol numStatements hitCount'"
    )]
    InvalidBlock { line: usize, record: String },
}

/// Parses a `startLine.startCol` position.
pub fn position(buf: &mut &str) -> PResult<(u32, u32)> {
    separated_pair(parse_u32, '.', parse_u32).parse_next(buf)
}

/// Parses everything after the file name's `:` on a block line, returning a
/// [`Block`]. The whole input must be consumed.
///
/// ```
/// # use covpkg_rs::parsers::gocover::block;
/// # use winnow::Parser;
/// let parsed = block.parse_peek("12.34,15.2 3 1").unwrap().1;
/// assert_eq!((parsed.start_line, parsed.start_col), (12, 34));
/// assert_eq!((parsed.num_statements, parsed.hit_count), (3, 1));
/// ```
pub fn block(buf: &mut &str) -> PResult<Block> {
    terminated(
        (
            terminated(position, ','),
            terminated(position, ' '),
            terminated(parse_u64, ' '),
            parse_u64,
        ),
        eof,
    )
    .map(
        |((start_line, start_col), (end_line, end_col), num_statements, hit_count)| Block {
            start_line,
            start_col,
            end_line,
            end_col,
            num_statements,
            hit_count,
        },
    )
    .parse_next(buf)
}

/// Parses the value of a `mode:` header line, e.g. `mode: set`. The mode must
/// be a single non-empty word.
pub fn mode_header(buf: &mut &str) -> PResult<CoverMode> {
    (
        MODE_HEADER_PREFIX,
        take_while(0.., ' '),
        take_while(1.., |c: char| !c.is_whitespace()).try_map(CoverMode::from_str),
        take_while(0.., ' '),
        eof,
    )
        .map(|(_, _, mode, _, _)| mode)
        .parse_next(buf)
}

/// Parses one block line into a [`CoverageRecord`]. `line_no` is only used
/// for error reporting.
pub fn coverage_record(line: &str, line_no: usize) -> Result<CoverageRecord, ProfileParseError> {
    let invalid = || ProfileParseError::InvalidBlock {
        line: line_no,
        record: line.into(),
    };

    let (file, span) = line.rsplit_once(':').ok_or_else(invalid)?;
    if file.is_empty() {
        return Err(invalid());
    }
    let block = block.parse(span).map_err(|_| invalid())?;

    Ok(CoverageRecord {
        file: file.into(),
        block,
    })
}

/// Parses a whole profile.
///
/// Empty lines are skipped and a trailing `\r` is stripped from every line.
pub fn parse_profile(input: &str) -> Result<Profile, ProfileParseError> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.strip_suffix('\r').unwrap_or(line)))
        .filter(|(_, line)| !line.is_empty());

    let (header_line, header) = lines.next().ok_or(ProfileParseError::MissingModeHeader)?;
    if !header.starts_with(MODE_HEADER_PREFIX) {
        return Err(ProfileParseError::MissingModeHeader);
    }
    let mode = mode_header
        .parse(header)
        .map_err(|_| ProfileParseError::InvalidModeHeader { line: header_line })?;

    let mut profile = Profile::new(mode);
    for (line_no, line) in lines {
        if line.starts_with(MODE_HEADER_PREFIX) {
            let found = mode_header
                .parse(line)
                .map_err(|_| ProfileParseError::InvalidModeHeader { line: line_no })?;
            if found != profile.mode {
                return Err(ProfileParseError::InconsistentMode {
                    line: line_no,
                    expected: profile.mode,
                    found,
                });
            }
            continue;
        }

        profile.records.push(coverage_record(line, line_no)?);
    }

    debug!(
        mode = %profile.mode,
        records = profile.records.len(),
        "parsed coverage profile"
    );
    Ok(profile)
}

/// Parses a profile from raw bytes, e.g. a memory-mapped file.
pub fn parse_profile_bytes(input: &[u8]) -> Result<Profile, ProfileParseError> {
    let input = std::str::from_utf8(input).map_err(|_| ProfileParseError::InvalidUtf8)?;
    parse_profile(input)
}
