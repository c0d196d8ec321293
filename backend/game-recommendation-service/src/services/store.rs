/// Artifact persistence
///
/// The on-disk format is chosen by file extension:
/// - `.json`: serde_json (inspectable)
/// - `.bin` / `.bincode`: bincode (compact, default)
use crate::error::{AppError, Result};
use crate::services::bundle::ArtifactBundle;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Bincode,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        match extension {
            "json" => Ok(ArtifactFormat::Json),
            "bin" | "bincode" => Ok(ArtifactFormat::Bincode),
            other => Err(AppError::Artifact(format!(
                "unknown artifact format '{}' for {}",
                other,
                path.display()
            ))),
        }
    }
}

/// Where trained bundles live
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactStore: Send + Sync {
    /// Load and validate the current bundle
    fn load(&self) -> Result<ArtifactBundle>;

    /// Persist a bundle, replacing the previous one
    fn save(&self, bundle: &ArtifactBundle) -> Result<()>;

    /// Human-readable location for logs
    fn location(&self) -> String;
}

/// Single-file store
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    path: PathBuf,
}

impl FileArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling of the target named `<file name>.tmp`
    pub fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_staged(
        &self,
        staging: &Path,
        format: ArtifactFormat,
        bundle: &ArtifactBundle,
    ) -> Result<()> {
        let mut writer = BufWriter::new(File::create(staging)?);
        match format {
            ArtifactFormat::Json => serde_json::to_writer(&mut writer, bundle)?,
            ArtifactFormat::Bincode => bincode::serialize_into(&mut writer, bundle)?,
        }
        writer.flush()?;
        drop(writer);
        fs::rename(staging, &self.path)?;
        Ok(())
    }
}

impl ArtifactStore for FileArtifactStore {
    fn load(&self) -> Result<ArtifactBundle> {
        let format = ArtifactFormat::from_path(&self.path)?;
        let file = File::open(&self.path).map_err(|e| {
            AppError::Artifact(format!("cannot open {}: {}", self.path.display(), e))
        })?;
        let reader = BufReader::new(file);

        let bundle: ArtifactBundle = match format {
            ArtifactFormat::Json => serde_json::from_reader(reader)?,
            ArtifactFormat::Bincode => bincode::deserialize_from(reader)?,
        };

        info!(
            path = %self.path.display(),
            generation = %bundle.generation(),
            items = bundle.len(),
            "Loaded artifact bundle"
        );
        Ok(bundle)
    }

    fn save(&self, bundle: &ArtifactBundle) -> Result<()> {
        let format = ArtifactFormat::from_path(&self.path)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write next to the target and rename so readers never see a partial file
        let staging = self.staging_path();
        if let Err(e) = self.write_staged(&staging, format, bundle) {
            if let Err(cleanup) = fs::remove_file(&staging) {
                warn!(
                    path = %staging.display(),
                    error = %cleanup,
                    "Failed to remove staging file"
                );
            }
            return Err(e);
        }

        info!(
            path = %self.path.display(),
            generation = %bundle.generation(),
            format = ?format,
            "Saved artifact bundle"
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
