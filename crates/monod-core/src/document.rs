//! Documents and the secrets that unlock them.
//!
//! A [`Document`] is always replaced wholesale, never patched. The [`Secret`]
//! travels out-of-band in the URL fragment and is never stored inside the
//! document; [`DocumentAccess`] keeps the two paired.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Template assigned to documents that do not name one.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Stable unique identifier of a document.
///
/// Opaque to the client. The controller usually hands out UUIDs, but nothing
/// here depends on that shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the placeholder id of the session-start document.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_owned()
}

/// A document as held by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier.
    pub uuid: DocumentId,
    /// Raw text content.
    #[serde(default)]
    pub content: String,
    /// Named rendering mode.
    #[serde(default = "default_template")]
    pub template: String,
}

impl Document {
    /// Create a document with the default template.
    pub fn new(uuid: impl Into<DocumentId>, content: impl Into<String>) -> Self {
        Self { uuid: uuid.into(), content: content.into(), template: default_template() }
    }

    /// Replace the template.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }
}

impl Default for Document {
    /// The empty document every session starts with.
    fn default() -> Self {
        Self::new(DocumentId::default(), String::new())
    }
}

/// Opaque access token for a document.
///
/// `Debug` never prints the token, so secrets do not leak into logs. Use
/// [`Secret::expose`] or `Display` when building access URLs.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True when no token is held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() { f.write_str("Secret(<empty>)") } else { f.write_str("Secret(***)") }
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Secret {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Secret {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// A document together with the secret that unlocked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAccess {
    /// The document.
    pub document: Document,
    /// Secret paired with `document`.
    pub secret: Secret,
}

impl DocumentAccess {
    /// Pair a document with its secret.
    pub fn new(document: Document, secret: impl Into<Secret>) -> Self {
        Self { document, secret: secret.into() }
    }

    /// Full-access path `/{uuid}#{secret}`.
    pub fn path(&self) -> String {
        crate::document_path(&self.document.uuid, &self.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_start_document_is_empty() {
        let doc = Document::default();
        assert!(doc.uuid.is_empty());
        assert!(doc.content.is_empty());
        assert_eq!(doc.template, DEFAULT_TEMPLATE);
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = Secret::new("hunter2");
        assert_eq!(format!("{secret:?}"), "Secret(***)");
        assert_eq!(secret.to_string(), "hunter2");
        assert_eq!(format!("{:?}", Secret::default()), "Secret(<empty>)");
    }

    #[test]
    fn missing_template_falls_back_to_default() {
        let doc: Document =
            serde_json::from_str(r#"{"uuid":"abc","content":"hi"}"#).expect("valid document json");
        assert_eq!(doc, Document::new("abc", "hi"));
    }

    #[test]
    fn secret_from_owned_token() {
        let token = format!("s{}", 1);
        let access = DocumentAccess::new(Document::new("A", ""), token);
        assert_eq!(access.secret, Secret::new("s1"));
    }

    #[test]
    fn access_path_uses_paired_secret() {
        let access = DocumentAccess::new(Document::new("A", ""), "s1");
        assert_eq!(access.path(), "/A#s1");
    }
}
