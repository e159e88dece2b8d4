//! Groups the records of a validated profile into per-package coverage.

use std::{
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use crate::report::models::{CoverMode, PackageCoverage, Profile};

/// Reasons a set of profiles can't be aggregated.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no cover profiles provided")]
    NoProfiles,

    // Merging profiles needs a merge policy for blocks that both profiles
    // measured, which doesn't exist yet.
    #[error("only one cover profile is supported, got {0}")]
    TooManyProfiles(usize),

    #[error("coverage collector only supports 'set' mode, found '{0}'")]
    InvalidMode(CoverMode),
}

/// Holds every parsed profile of one run.
#[derive(Debug, Default)]
pub struct CoverageCollector {
    profiles: Vec<Profile>,
}

impl CoverageCollector {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Checks that there is exactly one profile and that every profile uses
    /// [`CoverMode::Set`]. Any other mode, including ones this tool has no
    /// name for, is rejected. The coverage ratio only makes sense when hit
    /// counts mean "ran or didn't".
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.profiles.len() {
            0 => return Err(ValidationError::NoProfiles),
            1 => {}
            n => return Err(ValidationError::TooManyProfiles(n)),
        }

        if let Some(profile) = self.profiles.iter().find(|p| p.mode != CoverMode::Set) {
            return Err(ValidationError::InvalidMode(profile.mode.clone()));
        }

        Ok(())
    }

    /// Groups every record by package and then by file, returning the
    /// packages sorted by name. Records keep their arrival order within a
    /// file; duplicates are merged later when coverage is computed.
    pub fn collect_packages(&self) -> Vec<PackageCoverage> {
        let mut packages: BTreeMap<String, PackageCoverage> = BTreeMap::new();
        for record in self.profiles.iter().flat_map(|p| &p.records) {
            let package = package_of(&record.file);
            packages
                .entry(package.clone())
                .or_insert_with(|| PackageCoverage::new(&package))
                .file_mut(&record.file)
                .push(record.block);
        }

        debug!(packages = packages.len(), "collected packages");
        packages.into_values().collect()
    }
}

/// The package a file belongs to: the directory part of its path, or `"."`
/// for a bare file name. `.` components are dropped first, so `./pkg/a.go`
/// and `pkg/b.go` share the package `pkg`.
pub fn package_of(file: &str) -> String {
    let path: PathBuf = Path::new(file)
        .components()
        .filter(|component| *component != Component::CurDir)
        .collect();
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_string_lossy().into_owned(),
        _ => ".".into(),
    }
}
