//! Store configuration and shard path derivation

use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};

/// Largest supported partition count
pub const MAX_PARTITIONS: usize = 1000;

/// Shard file stem used when the base path is a directory
const DEFAULT_STEM: &str = "shardlog_data";

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base path: a directory to create shard files in, or a file path whose
    /// stem and parent directory are reused for shard filenames
    pub base_path: PathBuf,

    /// Number of shards; fixed for the lifetime of the store
    pub partitions: usize,

    /// Enable WAL mode for better concurrency
    pub wal_mode: bool,

    /// Busy timeout in milliseconds
    pub busy_timeout_ms: u32,
}

impl StoreConfig {
    /// Create a configuration with default pragmas
    pub fn new<P: AsRef<Path>>(base_path: P, partitions: usize) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            partitions,
            wal_mode: true,
            busy_timeout_ms: 5000,
        }
    }

    /// Check the partition count is within the supported range
    pub fn validate(&self) -> StoreResult<()> {
        if self.partitions < 1 || self.partitions > MAX_PARTITIONS {
            return Err(StoreError::Config(format!(
                "partition count must be in 1..={MAX_PARTITIONS}, got {}",
                self.partitions
            )));
        }
        Ok(())
    }

    /// Derive the shard database paths.
    ///
    /// An existing directory keeps shard files inside it, and the
    /// single-shard case uses an unsuffixed filename. Any other base is
    /// treated as a file path whose parent directory and stem (text before
    /// the first `.`) are reused, always with the `_<shard:03>_<count:03>`
    /// suffix.
    pub fn shard_paths(&self) -> StoreResult<Vec<PathBuf>> {
        self.validate()?;
        let n = self.partitions;

        if self.base_path.is_dir() {
            if n == 1 {
                return Ok(vec![self.base_path.join(format!("{DEFAULT_STEM}.db"))]);
            }
            return Ok((0..n)
                .map(|i| self.base_path.join(format!("{DEFAULT_STEM}_{i:03}_{n:03}.db")))
                .collect());
        }

        let parent = self
            .base_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let stem = self
            .base_path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.split('.').next())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| {
                StoreError::Config(format!(
                    "unusable base path: {}",
                    self.base_path.display()
                ))
            })?
            .to_string();

        Ok((0..n)
            .map(|i| parent.join(format!("{stem}_{i:03}_{n:03}.db")))
            .collect())
    }
}
