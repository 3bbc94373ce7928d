//! Teacher panel state machine.
//!
//! The panel is a privilege-gated side channel, orthogonal to the student
//! session. The backend contract is password-per-request, not a bearer
//! token: every privileged call carries the plaintext password, so the panel
//! holds it in memory for as long as it is open and hands it to the
//! transport layer one operation at a time.

use crate::error::{AuthError, ExportError, ResetError};

/// Panel states. `Exporting` and `Resetting` exist to make the privileged
/// calls non-reentrant while a request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    PasswordEntry,
    Authorized,
    Exporting,
    ConfirmingReset,
    Resetting,
}

#[derive(Debug)]
pub struct TeacherPanel {
    state: PanelState,
    password: String,
}

impl TeacherPanel {
    pub fn new() -> Self {
        Self {
            state: PanelState::Closed,
            password: String::new(),
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != PanelState::Closed
    }

    /// Open (or reopen) the panel. Authorization never survives a
    /// close/reopen cycle: the panel always comes up locked. The password
    /// text is kept for re-entry.
    pub fn open(&mut self) {
        self.state = PanelState::PasswordEntry;
    }

    /// Close the panel from any state. The next open requires
    /// re-authentication.
    pub fn close(&mut self) {
        self.state = PanelState::Closed;
    }

    pub fn set_password(&mut self, password: &str) {
        self.password = password.to_string();
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Password to send for the unlock check. Refused locally when the panel
    /// is not at the password prompt or the field is empty; neither case
    /// reaches the network.
    pub fn begin_authenticate(&self) -> Result<String, AuthError> {
        if self.state != PanelState::PasswordEntry {
            return Err(AuthError::NotAtPasswordPrompt);
        }
        if self.password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        Ok(self.password.clone())
    }

    /// Outcome of the unlock check. Failure keeps the panel at the password
    /// prompt, password retained for re-entry.
    pub fn authenticated(&mut self, ok: bool) {
        if self.state == PanelState::PasswordEntry && ok {
            self.state = PanelState::Authorized;
        }
    }

    /// Arm the export and return the password for the authenticated request.
    /// Only reachable from `Authorized`.
    pub fn begin_export(&mut self) -> Result<String, ExportError> {
        match self.state {
            PanelState::Authorized => {
                self.state = PanelState::Exporting;
                Ok(self.password.clone())
            }
            PanelState::Exporting => Err(ExportError::InFlight),
            _ => Err(ExportError::NotAuthorized),
        }
    }

    /// The export resolved, successfully or not; the panel stays unlocked.
    pub fn export_finished(&mut self) {
        if self.state == PanelState::Exporting {
            self.state = PanelState::Authorized;
        }
    }

    /// Ask for a reset: opens the mandatory confirmation step. Returns false
    /// when the panel is not unlocked.
    pub fn request_reset(&mut self) -> bool {
        match self.state {
            PanelState::Authorized | PanelState::ConfirmingReset => {
                self.state = PanelState::ConfirmingReset;
                true
            }
            _ => false,
        }
    }

    /// Back out of the confirmation step.
    pub fn cancel_reset(&mut self) {
        if self.state == PanelState::ConfirmingReset {
            self.state = PanelState::Authorized;
        }
    }

    /// The explicit second confirmation. The destructive call is unreachable
    /// without first entering `ConfirmingReset`; returns the password for the
    /// request and closes the confirmation step.
    pub fn confirm_reset(&mut self) -> Result<String, ResetError> {
        match self.state {
            PanelState::ConfirmingReset => {
                self.state = PanelState::Resetting;
                Ok(self.password.clone())
            }
            PanelState::Resetting => Err(ResetError::InFlight),
            _ => Err(ResetError::NotConfirmed),
        }
    }

    /// The reset resolved. Success and failure both land back at
    /// `Authorized` with the confirmation closed; the user may retry.
    pub fn reset_finished(&mut self) {
        if self.state == PanelState::Resetting {
            self.state = PanelState::Authorized;
        }
    }
}

impl Default for TeacherPanel {
    fn default() -> Self {
        Self::new()
    }
}
