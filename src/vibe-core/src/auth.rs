//! Credential-popup contract. The flow itself is a future host feature;
//! only the entry shape and the failure kinds plugins must branch on are
//! defined today. [`crate::VibeEvent::AuthStarted`] and
//! [`crate::VibeEvent::AuthEnded`] bracket the flow once a host implements
//! it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One field of a credentials form ("E-mail", "Password", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEntry {
    /// Plugin-chosen key to tell entries apart when the form comes back.
    pub id: String,
    /// Label shown to the user.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub optional: bool,
    /// What the user typed, filled in on the way back.
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("the credentials popup was rejected by the user")]
    RejectedByUser,
    #[error("the credentials were rejected by the plugin")]
    RejectedByPlugin,
}
