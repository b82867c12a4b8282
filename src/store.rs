// 🗄️ Profile Store - the whole collection as one JSON document
//
// The file holds a JSON array of profiles in insertion order. It is read in
// full at the start of every operation and rewritten in full on save.
//
// Create is a load-modify-save sequence with no lock around it. Two processes
// sharing one file can lose each other's appends.

use crate::profile::Profile;
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The document exists but is not a valid profile list
    #[error("profile store {} is corrupt: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize profiles: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// LOAD REPORT
// ============================================================================

/// A corrupt document that `load` replaced with an empty collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corruption {
    pub reason: String,
    /// Where the unreadable file was moved, if the rename succeeded
    pub backup: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub profiles: Vec<Profile>,
    pub corruption: Option<Corruption>,
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        ProfileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the collection without any recovery.
    ///
    /// A missing file is an empty collection. Malformed JSON, unknown or
    /// missing fields, negative amounts and blank names are all `Corrupt`.
    pub fn read_strict(&self) -> Result<Vec<Profile>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let profiles: Vec<Profile> =
            serde_json::from_slice(&bytes).map_err(|e| self.corrupt(e.to_string()))?;

        for (index, profile) in profiles.iter().enumerate() {
            profile
                .validate()
                .map_err(|e| self.corrupt(format!("record {}: {}", index, e)))?;
        }

        Ok(profiles)
    }

    /// Read the collection, replacing a corrupt document with an empty one.
    ///
    /// The unreadable file is renamed aside so its content survives the next
    /// save. I/O failures other than "not found" are still returned as errors.
    pub fn load(&self) -> Result<LoadReport, StoreError> {
        match self.read_strict() {
            Ok(profiles) => {
                tracing::debug!("Loaded {} profiles from {}", profiles.len(), self.path.display());
                Ok(LoadReport {
                    profiles,
                    corruption: None,
                })
            }
            Err(StoreError::Corrupt { reason, .. }) => {
                tracing::warn!(
                    "Profile store {} is corrupt ({reason}); continuing with an empty collection",
                    self.path.display()
                );
                let backup = self.move_aside();
                Ok(LoadReport {
                    profiles: Vec::new(),
                    corruption: Some(Corruption { reason, backup }),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Overwrite the document with the full collection.
    ///
    /// Writes a sibling temp file and renames it over the target, so readers
    /// see either the old or the new document.
    pub fn save(&self, profiles: &[Profile]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        profiles.serialize(&mut serializer)?;
        buf.push(b'\n');

        let tmp_path = self.sibling("tmp");
        let written = fs::File::create(&tmp_path).and_then(|mut file| {
            file.write_all(&buf)?;
            file.sync_all()
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Io {
                path: tmp_path,
                source: e,
            });
        }

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            self.io_error(e)
        })?;

        tracing::debug!("Saved {} profiles to {}", profiles.len(), self.path.display());
        Ok(())
    }

    /// Load, push one profile, save. Returns the new collection size.
    pub fn append(&self, profile: Profile) -> Result<(usize, Option<Corruption>), StoreError> {
        let LoadReport {
            mut profiles,
            corruption,
        } = self.load()?;
        profiles.push(profile);
        self.save(&profiles)?;
        Ok((profiles.len(), corruption))
    }

    // ------------------------------------------------------------------------
    // helpers
    // ------------------------------------------------------------------------

    fn move_aside(&self) -> Option<PathBuf> {
        let stamp = Local::now().format("%Y%m%dT%H%M%S").to_string();
        let mut backup = self.sibling(&format!("corrupt-{}", stamp));
        let mut attempt = 1;
        while backup.exists() {
            backup = self.sibling(&format!("corrupt-{}-{}", stamp, attempt));
            attempt += 1;
        }

        match fs::rename(&self.path, &backup) {
            Ok(()) => {
                tracing::warn!("Unreadable profile store preserved at {}", backup.display());
                Some(backup)
            }
            Err(e) => {
                tracing::error!(
                    "Could not move corrupt store {} aside: {e}",
                    self.path.display()
                );
                None
            }
        }
    }

    /// `<file>.<suffix>` next to the store file
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "profiles.json".into());
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn corrupt(&self, reason: String) -> StoreError {
        StoreError::Corrupt {
            path: self.path.clone(),
            reason,
        }
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
