use std::path::{Path, PathBuf};

pub fn sample_data_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/common/sample_data")
}

pub fn sample_file(path: &Path) -> PathBuf {
    sample_data_path().join(path)
}
