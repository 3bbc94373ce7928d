//! Error kinds for the four interactive operations.
//!
//! Each enum pairs the local short-circuit checks (no network call is made)
//! with a single remote variant carrying the backend's reason verbatim, or
//! the fixed generic message when the backend supplied none. Remote and
//! transport failures are deliberately indistinguishable here; the transport
//! detail goes to the log, not to the user.

use thiserror::Error;

/// Login and teacher-password failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Local: no password entered at all.
    #[error("Enter the teacher password.")]
    EmptyPassword,

    /// Local: the panel is not sitting at the password prompt.
    #[error("Teacher tools are not waiting for a password.")]
    NotAtPasswordPrompt,

    /// Backend declined, or the request never completed.
    #[error("{0}")]
    Rejected(String),
}

impl AuthError {
    /// Backend-supplied reason, else the fixed generic login message.
    pub fn rejected(reason: Option<String>) -> Self {
        AuthError::Rejected(reason.unwrap_or_else(|| "Login failed".to_string()))
    }
}

/// Guess submission failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Local: empty or whitespace-only guess.
    #[error("Enter your predicted metal first!")]
    EmptyGuess,

    /// Local: no active session to submit against.
    #[error("Log in before submitting a guess.")]
    NotLoggedIn,

    /// Local: a submission is already outstanding.
    #[error("A submission is already in flight.")]
    InFlight,

    /// Backend declined, or the request never completed.
    #[error("{0}")]
    Rejected(String),
}

impl SubmitError {
    /// Backend-supplied reason, else the fixed generic submit message.
    pub fn rejected(reason: Option<String>) -> Self {
        SubmitError::Rejected(reason.unwrap_or_else(|| "Submit failed".to_string()))
    }
}

/// Results export failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// Local: the panel is not unlocked.
    #[error("Unlock teacher tools first.")]
    NotAuthorized,

    /// Local: an export is already outstanding.
    #[error("An export is already in progress.")]
    InFlight,

    /// The export endpoint declined or the request never completed. The
    /// payload is a byte stream, so there is no backend reason to surface.
    #[error("Download failed (check password / server).")]
    Failed,

    /// The payload arrived but could not be written to disk.
    #[error("Could not save results: {0}")]
    Save(String),
}

/// Destructive reset failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResetError {
    /// Local: the mandatory second confirmation has not been given.
    #[error("Reset requires confirmation.")]
    NotConfirmed,

    /// Local: a reset is already outstanding.
    #[error("A reset is already in progress.")]
    InFlight,

    /// Backend declined, or the request never completed.
    #[error("{0}")]
    Rejected(String),
}

impl ResetError {
    /// Backend-supplied reason, else the fixed generic reset message.
    pub fn rejected(reason: Option<String>) -> Self {
        ResetError::Rejected(reason.unwrap_or_else(|| "Reset failed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_variants_fall_back_to_generic_messages() {
        assert_eq!(AuthError::rejected(None).to_string(), "Login failed");
        assert_eq!(SubmitError::rejected(None).to_string(), "Submit failed");
        assert_eq!(ResetError::rejected(None).to_string(), "Reset failed");
    }

    #[test]
    fn remote_variants_surface_backend_reasons_verbatim() {
        assert_eq!(
            AuthError::rejected(Some("Invalid password".to_string())).to_string(),
            "Invalid password"
        );
        assert_eq!(
            SubmitError::rejected(Some("Invalid token".to_string())).to_string(),
            "Invalid token"
        );
        assert_eq!(
            ResetError::rejected(Some("Unauthorized".to_string())).to_string(),
            "Unauthorized"
        );
    }
}
