//! MX Lab assessment client core.
//!
//! The session, trial-reveal, and teacher-panel state machines, kept free of
//! transport and rendering concerns so they can be driven directly by unit
//! tests and by whatever front end wraps them. All backend traffic lives in
//! the `mxlab_client` crate; this crate only decides what is allowed to
//! happen next and what the user is allowed to see.

pub mod error;
pub mod session;
pub mod teacher;
pub mod trial;

pub use error::{AuthError, ExportError, ResetError, SubmitError};
pub use session::{AppState, PendingGuess, Phase, RevealState, Session};
pub use teacher::{PanelState, TeacherPanel};
pub use trial::{ReagentCell, TrialContent, REAGENT_CATALOGUE};
