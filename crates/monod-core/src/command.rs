//! Commands dispatched to the external document controller.

use serde::{Deserialize, Serialize};

use crate::{DocumentId, Secret};

/// A dispatch to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Load (or create) the session document. Issued once at startup.
    #[serde(rename = "action:init")]
    Init {
        /// Requested document. `None` asks the controller for a new one.
        id: Option<DocumentId>,
        /// Secret from the location fragment.
        secret: Secret,
    },

    /// Push new local content. Debounced by the session.
    #[serde(rename = "action:update-content")]
    UpdateContent {
        /// Full document content.
        content: String,
    },

    /// Switch the rendering template.
    #[serde(rename = "action:update-template")]
    UpdateTemplate {
        /// Template name.
        template: String,
    },
}

impl Command {
    /// Wire name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init { .. } => "action:init",
            Self::UpdateContent { .. } => "action:update-content",
            Self::UpdateTemplate { .. } => "action:update-template",
        }
    }
}
