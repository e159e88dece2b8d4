/*!
 * Models for statement coverage data, from the raw records of a parsed
 * profile up to the per-package aggregates printed in a report.
 *
 * ## Data model overview
 *
 * ### [`Profile`]
 * One parsed coverage profile: the [`CoverMode`] declared by its header and
 * every [`CoverageRecord`] it contains, in the order they appeared.
 *
 * ### [`CoverageRecord`] and [`Block`]
 * A `CoverageRecord` is a [`Block`] (a source span with statement and hit
 * counts) tagged with the path of the file it was measured in. Records are
 * never modified after parsing.
 *
 * ### [`FileCoverage`]
 * All records for one file path, in arrival order. Re-instrumented or re-run
 * code may produce several records for the same span; they are merged when
 * the file's unique blocks are computed, see
 * [`unique_blocks`](crate::report::blocks::unique_blocks).
 *
 * ### [`PackageCoverage`]
 * The files that live in one package (the directory of their path), kept
 * sorted by path after every insertion.
 *
 * ### [`CoverageTotals`]
 * (Not built from records directly)
 * Covered and total statement counts for a file or package.
 */

use std::fmt;

use strum_macros::EnumString;

use super::blocks::unique_blocks;

/// The counting mode declared by a profile's `mode:` header.
///
/// Only [`CoverMode::Set`] is meaningful to the aggregation; any other mode is
/// still parsed so that it can be rejected with a clear error.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CoverMode {
    /// Hit counts are 0 or 1: a block either ran or it didn't.
    Set,

    /// Hit counts are execution frequencies.
    Count,

    /// Like `Count`, but updated atomically by concurrent tests.
    Atomic,

    /// A mode this tool has no name for, kept as written.
    #[strum(default)]
    Other(String),
}

impl fmt::Display for CoverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set => f.write_str("set"),
            Self::Count => f.write_str("count"),
            Self::Atomic => f.write_str("atomic"),
            Self::Other(mode) => f.write_str(mode),
        }
    }
}

/// A measured source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,

    /// The number of statements inside the span.
    pub num_statements: u64,

    /// The number of times the span ran. Anything above 0 means covered.
    pub hit_count: u64,
}

impl Block {
    /// Blocks are identified by where they start. The end of the span is not
    /// part of the key.
    pub fn key(&self) -> (u32, u32) {
        (self.start_line, self.start_col)
    }

    pub fn is_covered(&self) -> bool {
        self.hit_count > 0
    }
}

/// A [`Block`] measured in a specific file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageRecord {
    /// Path of the source file, as written in the profile.
    pub file: String,

    pub block: Block,
}

/// A single parsed profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub mode: CoverMode,
    pub records: Vec<CoverageRecord>,
}

impl Profile {
    pub fn new(mode: CoverMode) -> Self {
        Self {
            mode,
            records: Vec::new(),
        }
    }
}

/// Statement counts for a file or a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoverageTotals {
    /// Statements in blocks that ran at least once.
    pub covered_statements: u64,

    /// All statements tracked.
    pub total_statements: u64,
}

// Counts saturate at `u64::MAX`. `covered_statements` never exceeds
// `total_statements`, so the ratio stays within `[0, 1]` either way.
impl CoverageTotals {
    pub fn add_block(&mut self, block: &Block) {
        self.total_statements = self.total_statements.saturating_add(block.num_statements);
        if block.is_covered() {
            self.covered_statements = self
                .covered_statements
                .saturating_add(block.num_statements);
        }
    }

    /// Covered statements as a fraction of all statements, in `[0, 1]`.
    ///
    /// Returns `None` when nothing is tracked, where the ratio is undefined.
    pub fn ratio(&self) -> Option<f64> {
        if self.total_statements == 0 {
            return None;
        }
        Some(self.covered_statements as f64 / self.total_statements as f64)
    }
}

impl std::ops::AddAssign for CoverageTotals {
    fn add_assign(&mut self, other: Self) {
        self.covered_statements = self
            .covered_statements
            .saturating_add(other.covered_statements);
        self.total_statements = self.total_statements.saturating_add(other.total_statements);
    }
}

/// Every record for one file path, in the order they were collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCoverage {
    pub path: String,
    pub blocks: Vec<Block>,
}

impl FileCoverage {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.into(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// The file's blocks with duplicate spans merged, sorted by start
    /// position.
    pub fn unique_blocks(&self) -> Vec<Block> {
        unique_blocks(&self.blocks)
    }

    pub fn totals(&self) -> CoverageTotals {
        let mut totals = CoverageTotals::default();
        for block in self.unique_blocks() {
            totals.add_block(&block);
        }
        totals
    }
}

/// The files of one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageCoverage {
    /// Directory shared by every file in the package.
    pub package: String,

    /// Always sorted by [`FileCoverage::path`].
    files: Vec<FileCoverage>,
}

impl PackageCoverage {
    pub fn new(package: &str) -> Self {
        Self {
            package: package.into(),
            files: Vec::new(),
        }
    }

    pub fn files(&self) -> &[FileCoverage] {
        &self.files
    }

    /// Returns the [`FileCoverage`] for `path`, inserting an empty one in
    /// sorted position if the package doesn't have it yet.
    pub fn file_mut(&mut self, path: &str) -> &mut FileCoverage {
        let index = match self
            .files
            .binary_search_by(|file| file.path.as_str().cmp(path))
        {
            Ok(index) => index,
            Err(index) => {
                self.files.insert(index, FileCoverage::new(path));
                index
            }
        };
        &mut self.files[index]
    }

    /// Sums the totals of every file's unique blocks.
    pub fn totals(&self) -> CoverageTotals {
        let mut totals = CoverageTotals::default();
        for file in &self.files {
            totals += file.totals();
        }
        totals
    }

    /// Fraction of the package's statements that were covered. `None` if the
    /// package has no statements at all.
    pub fn coverage(&self) -> Option<f64> {
        self.totals().ratio()
    }
}
