//! File system storage for site snapshots

use gc_core::comment::{InMemoryStore, SiteSnapshot};
use gc_core::error::{GradeCommentsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// On-disk format: the snapshot plus its schema version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteFile {
    /// Schema version for migration
    pub schema_version: String,
    /// When the file was written
    pub saved_at: chrono::DateTime<chrono::Utc>,
    /// The site data
    pub site: SiteSnapshot,
    /// Extra fields for forward compatibility
    #[serde(flatten, default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl SiteFile {
    pub fn new(site: SiteSnapshot) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            saved_at: chrono::Utc::now(),
            site,
            extra: HashMap::new(),
        }
    }

    /// Major version of the schema, if it parses
    fn major_version(&self) -> Option<u32> {
        let (major, minor) = self.schema_version.split_once('.')?;
        minor.parse::<u32>().ok()?;
        major.parse().ok()
    }

    /// Reject files written by an incompatible version
    pub fn check_version(&self) -> Result<()> {
        let current_major = CURRENT_SCHEMA_VERSION
            .split('.')
            .next()
            .and_then(|m| m.parse::<u32>().ok());
        match self.major_version() {
            Some(major) if Some(major) == current_major => Ok(()),
            _ => Err(GradeCommentsError::UnsupportedSchemaVersion(
                self.schema_version.clone(),
            )),
        }
    }
}

/// Keeps one site snapshot in a JSON file
pub struct FileSystemStorage {
    /// Snapshot file
    path: PathBuf,
}

impl FileSystemStorage {
    /// Create storage for the given file, creating its directory
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let storage = Self { path: path.into() };
        storage.ensure_dir()?;
        Ok(storage)
    }

    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    GradeCommentsError::Io(std::io::Error::new(
                        e.kind(),
                        format!("Failed to create data directory: {}", e),
                    ))
                })?;
                debug!("Created data directory: {:?}", parent);
            }
        }
        Ok(())
    }

    /// Temporary path for atomic writes
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("site.json");
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the snapshot atomically (write to temp, then rename)
    pub fn save(&self, site: &SiteSnapshot) -> Result<()> {
        let temp_path = self.temp_path();
        let file = SiteFile::new(site.clone());

        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            GradeCommentsError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        serde_json::to_writer_pretty(&mut writer, &file)?;
        writer.flush()?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            GradeCommentsError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!(
            "Saved {} comments and {} posts to {:?}",
            site.comments.len(),
            site.posts.len(),
            self.path
        );
        Ok(())
    }

    /// Read the snapshot; a missing file is an empty site
    pub fn load(&self) -> Result<SiteSnapshot> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No data file at {:?}, starting empty", self.path);
                return Ok(SiteSnapshot::default());
            }
            Err(e) => return Err(GradeCommentsError::Io(e)),
        };

        let site_file: SiteFile = serde_json::from_reader(BufReader::new(file))?;
        site_file.check_version()?;
        Ok(site_file.site)
    }

    /// Load straight into a host store
    pub fn open_store(&self) -> Result<InMemoryStore> {
        InMemoryStore::from_snapshot(self.load()?)
            .map_err(|e| e.with_context(format!("Invalid data in {}", self.path.display())))
    }

    /// Persist the current contents of a host store
    pub fn save_store(&self, store: &InMemoryStore) -> Result<()> {
        self.save(&store.snapshot())
    }
}
