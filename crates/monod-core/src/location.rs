//! Browser location snapshots and document paths.
//!
//! Paths follow two shapes: `/{uuid}#{secret}` for full access and
//! `/r/{uuid}#{secret}` for read-only sessions. The fragment carries the
//! secret and is never sent to the document store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DocumentId, LocationError, Secret};

/// Path prefix marking a read-only session.
pub const READ_ONLY_PREFIX: &str = "/r";

/// Full-access path for a document: `/{uuid}#{secret}`.
pub fn document_path(uuid: &DocumentId, secret: &Secret) -> String {
    format!("/{uuid}#{secret}")
}

/// Prefix `path` with [`READ_ONLY_PREFIX`] when `read_only` is set.
pub fn scoped_path(path: &str, read_only: bool) -> String {
    if read_only { format!("{READ_ONLY_PREFIX}{path}") } else { path.to_owned() }
}

/// Snapshot of the current location: path plus fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    path: String,
    fragment: String,
}

impl Location {
    /// Build a location from its parts. An empty path becomes `/`.
    pub fn new(path: impl Into<String>, fragment: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.is_empty() { "/".to_owned() } else { path };
        Self { path, fragment: fragment.into() }
    }

    /// The root location `/`.
    pub fn root() -> Self {
        Self::new("/", "")
    }

    /// Parse `"/path#fragment"`.
    ///
    /// # Errors
    ///
    /// [`LocationError::NotAbsolute`] if the path does not start with `/`.
    pub fn parse(target: &str) -> Result<Self, LocationError> {
        let (path, fragment) = target.split_once('#').unwrap_or((target, ""));
        if !path.starts_with('/') {
            return Err(LocationError::NotAbsolute(target.to_owned()));
        }
        Ok(Self::new(path, fragment))
    }

    /// Path component (always starts with `/`).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fragment component, without the `#`.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Secret carried in the fragment.
    pub fn secret(&self) -> Secret {
        Secret::new(self.fragment.clone())
    }

    /// True when the path starts with [`READ_ONLY_PREFIX`].
    pub fn is_read_only(&self) -> bool {
        self.path.starts_with(READ_ONLY_PREFIX)
    }

    /// True for `/`, where there is no document to share yet.
    pub fn is_root(&self) -> bool {
        self.path.len() <= 1
    }

    /// Document requested by the path, if any.
    ///
    /// `/abc` and `/r/abc` both request `abc`; `/` and `/r` request nothing,
    /// which means "create a new document".
    pub fn requested_document(&self) -> Option<DocumentId> {
        let mut segments = self.path.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let id = if self.is_read_only() && first == "r" { segments.next()? } else { first };
        Some(DocumentId::new(id))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fragment.is_empty() {
            f.write_str(&self.path)
        } else {
            write!(f, "{}#{}", self.path, self.fragment)
        }
    }
}
