use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use memmap2::Mmap;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::{
    collector::CoverageCollector,
    error::{CovpkgError, Result},
    parsers::gocover,
    report::{self, models::Profile},
};

/// Report formats the CLI can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned `coverage (NN.N)%` lines.
    #[default]
    Text,

    /// A JSON array with one object per package.
    Json,
}

/// Everything a run needs, independent of how it was configured.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub profiles: Vec<PathBuf>,
    pub format: OutputFormat,
}

/// Turns a profile path into a parsed [`Profile`].
#[cfg_attr(test, automock)]
pub trait ProfileReader {
    fn read_profile(&self, path: &Path) -> Result<Profile>;
}

/// Reads profiles from disk by memory-mapping them.
#[derive(Debug, Default)]
pub struct MmapProfileReader;

impl ProfileReader for MmapProfileReader {
    fn read_profile(&self, path: &Path) -> Result<Profile> {
        let read_error = |source| CovpkgError::ProfileRead {
            path: path.to_owned(),
            source,
        };

        let file = File::open(path).map_err(read_error)?;
        // Mapping an empty file fails on some platforms, and an empty file is
        // just a profile with a missing header.
        let profile = if file.metadata().map_err(read_error)?.len() == 0 {
            gocover::parse_profile("")
        } else {
            // The profile is only read for the lifetime of the map.
            let mmap_handle = unsafe { Mmap::map(&file) }.map_err(read_error)?;
            gocover::parse_profile_bytes(&mmap_handle)
        };

        profile.map_err(|source| CovpkgError::ProfileError {
            path: path.to_owned(),
            source,
        })
    }
}

/// Reads, validates and aggregates the configured profiles, then writes the
/// report to `out`.
///
/// Nothing is written unless every step succeeds.
pub fn run(config: &Config, reader: &impl ProfileReader, out: &mut impl Write) -> Result<()> {
    let profiles = config
        .profiles
        .iter()
        .map(|path| {
            debug!(path = %path.display(), "reading profile");
            reader.read_profile(path)
        })
        .collect::<Result<Vec<_>>>()?;

    let collector = CoverageCollector::new(profiles);
    collector.validate()?;
    debug!(profiles = collector.profiles().len(), "profiles validated");

    let packages = collector.collect_packages();
    let summaries = report::summarize(&packages);
    match config.format {
        OutputFormat::Text => report::write_text(out, &summaries),
        OutputFormat::Json => report::write_json(out, &summaries),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use tempfile::TempDir;

    use super::*;
    use crate::{
        collector::ValidationError,
        parsers::gocover::ProfileParseError,
        report::models::{Block, CoverMode, CoverageRecord},
    };

    fn record(file: &str, start_line: u32, num_statements: u64, hit_count: u64) -> CoverageRecord {
        CoverageRecord {
            file: file.into(),
            block: Block {
                start_line,
                start_col: 1,
                end_line: start_line + 1,
                end_col: 1,
                num_statements,
                hit_count,
            },
        }
    }

    fn config(profiles: &[&str], format: OutputFormat) -> Config {
        Config {
            profiles: profiles.iter().map(PathBuf::from).collect(),
            format,
        }
    }

    #[test]
    fn test_run_text() {
        let mut reader = MockProfileReader::new();
        reader
            .expect_read_profile()
            .withf(|path| path.ends_with("cover.out"))
            .times(1)
            .returning(|_| {
                Ok(Profile {
                    mode: CoverMode::Set,
                    records: vec![
                        record("pkg/a.go", 1, 10, 1),
                        record("pkg/b.go", 1, 5, 0),
                        record("a/x.go", 1, 3, 1),
                        record("a/x.go", 1, 3, 2),
                    ],
                })
            });

        let mut out = Vec::new();
        run(&config(&["cover.out"], OutputFormat::Text), &reader, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a   coverage (100.0)%\npkg coverage (66.7)%\n"
        );
    }

    #[test]
    fn test_run_json() {
        let mut reader = MockProfileReader::new();
        reader.expect_read_profile().returning(|_| {
            Ok(Profile {
                mode: CoverMode::Set,
                records: vec![record("pkg/a.go", 1, 4, 1), record("pkg/a.go", 3, 4, 0)],
            })
        });

        let mut out = Vec::new();
        run(&config(&["cover.out"], OutputFormat::Json), &reader, &mut out).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["package"], "pkg");
        assert_eq!(parsed[0]["coverage"], 50.0);
    }

    #[test]
    fn test_run_without_profiles() {
        let mut reader = MockProfileReader::new();
        reader.expect_read_profile().never();

        let mut out = Vec::new();
        let err = run(&config(&[], OutputFormat::Text), &reader, &mut out).unwrap_err();
        assert!(matches!(
            err,
            CovpkgError::ValidationError(ValidationError::NoProfiles)
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_too_many_profiles() {
        let mut reader = MockProfileReader::new();
        reader
            .expect_read_profile()
            .times(2)
            .returning(|_| Ok(Profile::new(CoverMode::Set)));

        let mut out = Vec::new();
        let err = run(&config(&["a.out", "b.out"], OutputFormat::Text), &reader, &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            CovpkgError::ValidationError(ValidationError::TooManyProfiles(2))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_stops_at_first_read_error() {
        let mut reader = MockProfileReader::new();
        reader
            .expect_read_profile()
            .withf(|path| path.ends_with("bad.out"))
            .times(1)
            .returning(|path| {
                Err(CovpkgError::ProfileError {
                    path: path.to_owned(),
                    source: ProfileParseError::MissingModeHeader,
                })
            });
        reader
            .expect_read_profile()
            .withf(|path| path.ends_with("good.out"))
            .never();

        let mut out = Vec::new();
        let err = run(&config(&["bad.out", "good.out"], OutputFormat::Text), &reader, &mut out)
            .unwrap_err();
        assert_eq!(err.to_string(), "bad.out: missing 'mode:' header");
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_rejects_count_mode() {
        let mut reader = MockProfileReader::new();
        reader
            .expect_read_profile()
            .returning(|_| Ok(Profile::new(CoverMode::Count)));

        let mut out = Vec::new();
        let err = run(&config(&["cover.out"], OutputFormat::Text), &reader, &mut out).unwrap_err();
        assert!(matches!(
            err,
            CovpkgError::ValidationError(ValidationError::InvalidMode(CoverMode::Count))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_mmap_reader() {
        let temp_dir = TempDir::new().unwrap();

        let path = temp_dir.path().join("cover.out");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "mode: set").unwrap();
        writeln!(file, "pkg/a.go:1.1,2.1 3 1").unwrap();
        drop(file);

        let profile = MmapProfileReader.read_profile(&path).unwrap();
        assert_eq!(profile.mode, CoverMode::Set);
        assert_eq!(profile.records, vec![record("pkg/a.go", 1, 3, 1)]);

        let empty = temp_dir.path().join("empty.out");
        File::create(&empty).unwrap();
        assert!(matches!(
            MmapProfileReader.read_profile(&empty),
            Err(CovpkgError::ProfileError {
                source: ProfileParseError::MissingModeHeader,
                ..
            })
        ));

        let missing = temp_dir.path().join("missing.out");
        assert!(matches!(
            MmapProfileReader.read_profile(&missing),
            Err(CovpkgError::ProfileRead { .. })
        ));
    }
}
