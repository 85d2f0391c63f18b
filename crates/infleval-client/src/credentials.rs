//! On-disk persistence of the session credential between CLI invocations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::session::Credential;

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored credential. A missing or blank file means no credential.
    ///
    /// # Errors
    ///
    /// Returns any I/O error other than `NotFound`.
    pub fn load(&self) -> io::Result<Option<Credential>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| Credential::new(token)))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Writes the credential, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub fn save(&self, credential: &Credential) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, credential.expose())?;
        tracing::debug!(path = %self.path.display(), "credential saved");
        Ok(())
    }

    /// Removes the stored credential. Returns `true` if a file was removed.
    ///
    /// # Errors
    ///
    /// Returns any I/O error other than `NotFound`.
    pub fn clear(&self) -> io::Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
