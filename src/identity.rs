use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Email of the signed-in user, used to scope backend requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(String);

impl Identity {
    /// Blank values are not an identity.
    pub fn new(email: impl Into<String>) -> Option<Self> {
        let email = email.into();
        let trimmed = email.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("failed to write identity file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Identity persisted as a single line in a local file.
#[derive(Debug, Clone)]
pub struct IdentityFile {
    path: PathBuf,
}

impl IdentityFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the current identity. A missing or unreadable file counts as
    /// signed out.
    pub fn read(&self) -> Option<Identity> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Identity::new(contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "Could not read identity file");
                None
            }
        }
    }

    pub fn write(&self, identity: &Identity) -> Result<(), IdentityError> {
        let to_error = |source| IdentityError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(to_error)?;
        }
        fs::write(&self.path, identity.as_str()).map_err(to_error)?;
        Ok(())
    }
}

/// Remembers the last identity seen so the page can reload when the user
/// signs in, out, or as someone else.
#[derive(Debug, Default)]
pub struct SessionWatcher {
    last: Option<Identity>,
}

impl SessionWatcher {
    /// Records `current` and reports whether it differs from the previous one.
    pub fn observe(&mut self, current: Option<Identity>) -> bool {
        if self.last == current {
            return false;
        }
        self.last = current;
        true
    }
}
