//! The credential slot.
//!
//! Exactly one bearer credential may be active at a time. It lives behind
//! [`CredentialStore`] so where it is kept (memory, a file, an OS keychain)
//! never leaks into the gateway or the session manager.
//!
//! Every outbound request reads the slot once at issuance. Writers are the
//! session manager (login, logout, failed identity check) and the gateway's
//! teardown path. Each read and write swaps a single value, so there is no
//! multi-step invariant to lock around.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use rand::Rng;

/// An opaque bearer token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Errors from persisting the credential.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential storage failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Accessor for the single credential slot.
pub trait CredentialStore: Send + Sync + 'static {
    /// The current credential, or `None` when anonymous.
    fn get(&self) -> Option<Credential>;

    /// Replaces the credential. Readers see either the old or the new
    /// value, never a mix.
    ///
    /// # Errors
    /// Returns [`CredentialError`] if the slot could not be written; the
    /// previous value is then still in place.
    fn set(&self, credential: Credential) -> Result<(), CredentialError>;

    /// Empties the slot.
    ///
    /// # Errors
    /// Returns [`CredentialError`] if a persisted slot could not be removed.
    /// The in-memory view is cleared regardless.
    fn clear(&self) -> Result<(), CredentialError>;

    /// `true` when a credential is present.
    fn is_present(&self) -> bool {
        self.get().is_some()
    }
}

// ---------------------------------------------------------------------------
// MemoryCredentialStore
// ---------------------------------------------------------------------------

/// Process-local slot. Gone when the process exits.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: RwLock<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `credential`.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: RwLock::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.slot.read().clone()
    }

    fn set(&self, credential: Credential) -> Result<(), CredentialError> {
        *self.slot.write() = Some(credential);
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        *self.slot.write() = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileCredentialStore
// ---------------------------------------------------------------------------

/// A slot persisted to one file so the credential survives restarts.
///
/// The file holds the bare token. A missing or empty file means anonymous.
/// Writes go to a randomly named sibling and are renamed over the target,
/// so a crash mid-write leaves either the old token or the new one.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    cached: RwLock<Option<Credential>>,
}

impl FileCredentialStore {
    /// Opens the slot at `path`, loading any credential already stored.
    ///
    /// # Errors
    /// Returns [`CredentialError::Io`] if the file exists but can't be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CredentialError> {
        let path = path.into();
        let cached = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| Credential::new(token))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), present = cached.is_some(), "credential slot opened");
        Ok(Self {
            path,
            cached: RwLock::new(cached),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomically(&self, token: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let suffix: u32 = rand::rng().random();
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(format!(".{suffix:08x}.tmp"));
        let tmp = PathBuf::from(tmp);

        let result = (|| {
            let mut file = std::fs::File::create(&tmp)?;
            restrict_permissions(&file)?;
            file.write_all(token.as_bytes())?;
            file.sync_all()?;
            std::fs::rename(&tmp, &self.path)
        })();
        if result.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        result
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.cached.read().clone()
    }

    fn set(&self, credential: Credential) -> Result<(), CredentialError> {
        // Hold the write lock across the file write so two setters can't
        // leave the cache and the file disagreeing.
        let mut cached = self.cached.write();
        self.write_atomically(credential.expose())?;
        *cached = Some(credential);
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let mut cached = self.cached.write();
        *cached = None;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
