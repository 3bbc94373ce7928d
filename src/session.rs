//! Student session state: login phase, trial reveal store, submission gate.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::SubmitError;
use crate::trial::{ReagentCell, TrialContent, REAGENT_CATALOGUE};

/// One student session as granted by the backend on login.
///
/// The metal name is carried only as passthrough; the client never interprets
/// it. Dropped in full when the session ends.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub metal: String,
    pub trials: BTreeMap<String, TrialContent>,
}

/// Which trials and reagents have been unmasked so far.
///
/// Reveal is monotonic within a session: once a flag is set it is never
/// cleared until the whole session is discarded. Re-opening or re-clicking is
/// a no-op, not a toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealState {
    opened: BTreeSet<String>,
    clicked: BTreeMap<String, BTreeSet<String>>,
}

impl RevealState {
    pub fn is_opened(&self, trial: &str) -> bool {
        self.opened.contains(trial)
    }

    pub fn is_clicked(&self, trial: &str, reagent: &str) -> bool {
        self.clicked
            .get(trial)
            .is_some_and(|set| set.contains(reagent))
    }

    fn open(&mut self, trial: &str) {
        self.opened.insert(trial.to_string());
    }

    fn click(&mut self, trial: &str, reagent: &str) {
        self.clicked
            .entry(trial.to_string())
            .or_default()
            .insert(reagent.to_string());
    }
}

/// Coarse application phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No session; the credential gate is showing.
    Login,
    /// A session is live; trials and the submission gate are available.
    Trials,
}

/// A validated guess on its way to the backend.
///
/// Only [`AppState::begin_submit`] hands these out, so holding one proves the
/// local checks passed and the in-flight guard is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGuess {
    pub token: String,
    pub guess: String,
}

#[derive(Debug)]
struct ActiveSession {
    session: Session,
    reveal: RevealState,
    /// Trial currently shown in the detail view.
    selected: Option<String>,
    submit_in_flight: bool,
}

/// The client-side state machine.
///
/// Owns the session, reveal state, and submission gate as disjoint fields;
/// every transition happens through the methods here so the whole flow is
/// testable without a rendering layer or a live backend.
#[derive(Debug, Default)]
pub struct AppState {
    active: Option<ActiveSession>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.active.is_some() {
            Phase::Trials
        } else {
            Phase::Login
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.active.as_ref().map(|a| &a.session)
    }

    pub fn reveal(&self) -> Option<&RevealState> {
        self.active.as_ref().map(|a| &a.reveal)
    }

    /// Trial currently designated for detail display.
    pub fn selected(&self) -> Option<&str> {
        self.active.as_ref().and_then(|a| a.selected.as_deref())
    }

    /// Trial keys in stable order, with their opened flags.
    pub fn trial_list(&self) -> Vec<(&str, bool)> {
        let Some(active) = self.active.as_ref() else {
            return Vec::new();
        };
        active
            .session
            .trials
            .keys()
            .map(|k| (k.as_str(), active.reveal.is_opened(k)))
            .collect()
    }

    /// Materialize a fresh session and an empty reveal state; the application
    /// moves to the trial-browsing phase. Any previous session is discarded.
    pub fn begin_session(&mut self, session: Session) {
        self.active = Some(ActiveSession {
            session,
            reveal: RevealState::default(),
            selected: None,
            submit_in_flight: false,
        });
    }

    /// Open a trial: mark it opened (monotonic) and make it the active detail
    /// view. Re-opening changes no reveal state but still re-activates the
    /// view. `None` for unknown trial keys.
    pub fn open(&mut self, trial: &str) -> Option<&TrialContent> {
        let active = self.active.as_mut()?;
        if !active.session.trials.contains_key(trial) {
            return None;
        }
        active.reveal.open(trial);
        active.selected = Some(trial.to_string());
        active.session.trials.get(trial)
    }

    /// Click one reagent row of an opened reagent-table trial, revealing its
    /// observation: the backend text, or empty when the backend map lacks the
    /// reagent. Idempotent. `None` when the trial is unknown, not opened, not
    /// a table, or the label is outside the fixed catalogue.
    pub fn click_reagent(&mut self, trial: &str, reagent: &str) -> Option<&str> {
        let active = self.active.as_mut()?;
        if !REAGENT_CATALOGUE.contains(&reagent) {
            return None;
        }
        if !active.reveal.is_opened(trial) {
            return None;
        }
        if !active.session.trials.get(trial)?.is_table() {
            return None;
        }
        active.reveal.click(trial, reagent);
        active.session.trials.get(trial)?.observation(reagent)
    }

    /// What a reagent row should display right now. The real value is already
    /// in memory, but until the row has been clicked only the placeholder may
    /// be shown; a local secrecy contract, not a security boundary.
    pub fn reagent_cell(&self, trial: &str, reagent: &str) -> ReagentCell<'_> {
        let Some(active) = self.active.as_ref() else {
            return ReagentCell::Hidden;
        };
        if !active.reveal.is_clicked(trial, reagent) {
            return ReagentCell::Hidden;
        }
        match active
            .session
            .trials
            .get(trial)
            .and_then(|c| c.observation(reagent))
        {
            Some(text) => ReagentCell::Revealed(text),
            None => ReagentCell::Hidden,
        }
    }

    /// Validate a guess and arm the submission gate.
    ///
    /// Empty or whitespace-only guesses are rejected locally without any
    /// network traffic, and a second submission cannot start while one is
    /// outstanding. On success the caller sends the returned [`PendingGuess`]
    /// and reports back via [`AppState::submit_succeeded`] or
    /// [`AppState::submit_failed`].
    pub fn begin_submit(&mut self, guess: &str) -> Result<PendingGuess, SubmitError> {
        let active = self.active.as_mut().ok_or(SubmitError::NotLoggedIn)?;
        let guess = guess.trim();
        if guess.is_empty() {
            return Err(SubmitError::EmptyGuess);
        }
        if active.submit_in_flight {
            return Err(SubmitError::InFlight);
        }
        active.submit_in_flight = true;
        Ok(PendingGuess {
            token: active.session.token.clone(),
            guess: guess.to_string(),
        })
    }

    /// The backend accepted the guess: tear down the entire session. Token,
    /// metal, trials, and all reveal state are dropped; the application
    /// returns to the credential gate. There is no retry within a session.
    pub fn submit_succeeded(&mut self) {
        self.active = None;
    }

    /// The submission was declined or never completed: disarm the gate and
    /// stay in the trial-browsing phase so the user may resubmit.
    pub fn submit_failed(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.submit_in_flight = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> Session {
        let trials = serde_json::from_str(
            r#"{"Trial 1":"clear solution","Trial 2":{"AgNO3":"precipitate"}}"#,
        )
        .unwrap();
        Session {
            token: "t1".to_string(),
            metal: "Au".to_string(),
            trials,
        }
    }

    fn logged_in() -> AppState {
        let mut app = AppState::new();
        app.begin_session(sample_session());
        app
    }

    #[test]
    fn login_materializes_two_unopened_trials() {
        let app = logged_in();
        assert_eq!(app.phase(), Phase::Trials);
        let list = app.trial_list();
        assert_eq!(
            list,
            vec![("Trial 1", false), ("Trial 2", false)]
        );
    }

    #[test]
    fn open_is_idempotent() {
        let mut app = logged_in();
        assert!(app.open("Trial 1").is_some());
        let after_first = app.reveal().unwrap().clone();
        assert!(app.open("Trial 1").is_some());
        assert_eq!(app.reveal().unwrap(), &after_first);
    }

    #[test]
    fn reopen_still_reactivates_detail_view() {
        let mut app = logged_in();
        app.open("Trial 1");
        app.open("Trial 2");
        app.open("Trial 1");
        assert_eq!(app.selected(), Some("Trial 1"));
    }

    #[test]
    fn open_unknown_trial_is_refused() {
        let mut app = logged_in();
        assert!(app.open("Trial 9").is_none());
        assert_eq!(app.selected(), None);
    }

    #[test]
    fn reveal_is_monotonic_and_idempotent() {
        let mut app = logged_in();
        app.open("Trial 2");

        assert_eq!(app.reagent_cell("Trial 2", "AgNO3"), ReagentCell::Hidden);
        assert_eq!(app.click_reagent("Trial 2", "AgNO3"), Some("precipitate"));
        assert_eq!(
            app.reagent_cell("Trial 2", "AgNO3"),
            ReagentCell::Revealed("precipitate")
        );

        let after_first = app.reveal().unwrap().clone();
        assert_eq!(app.click_reagent("Trial 2", "AgNO3"), Some("precipitate"));
        assert_eq!(app.reveal().unwrap(), &after_first);
    }

    #[test]
    fn catalogue_reagent_missing_from_backend_reveals_empty() {
        let mut app = logged_in();
        app.open("Trial 2");
        assert_eq!(app.click_reagent("Trial 2", "KNO3"), Some(""));
        assert_eq!(app.reagent_cell("Trial 2", "KNO3"), ReagentCell::Revealed(""));
    }

    #[test]
    fn label_outside_catalogue_is_ignored() {
        let mut app = logged_in();
        app.open("Trial 2");
        let before = app.reveal().unwrap().clone();
        assert_eq!(app.click_reagent("Trial 2", "NaCl"), None);
        assert_eq!(app.reveal().unwrap(), &before);
    }

    #[test]
    fn clicking_requires_the_trial_to_be_open() {
        let mut app = logged_in();
        assert_eq!(app.click_reagent("Trial 2", "AgNO3"), None);
    }

    #[test]
    fn text_trials_take_no_reagent_clicks() {
        let mut app = logged_in();
        app.open("Trial 1");
        assert_eq!(app.click_reagent("Trial 1", "AgNO3"), None);
    }

    #[test]
    fn empty_guess_is_rejected_locally() {
        let mut app = logged_in();
        assert_eq!(app.begin_submit(""), Err(SubmitError::EmptyGuess));
        assert_eq!(app.begin_submit("   "), Err(SubmitError::EmptyGuess));
        // The gate was never armed.
        assert!(app.begin_submit("Ag").is_ok());
    }

    #[test]
    fn guess_without_session_is_refused() {
        let mut app = AppState::new();
        assert_eq!(app.begin_submit("Ag"), Err(SubmitError::NotLoggedIn));
    }

    #[test]
    fn second_submission_cannot_start_while_one_is_outstanding() {
        let mut app = logged_in();
        let pending = app.begin_submit("Ag").unwrap();
        assert_eq!(pending.token, "t1");
        assert_eq!(pending.guess, "Ag");
        assert_eq!(app.begin_submit("Ag"), Err(SubmitError::InFlight));

        app.submit_failed();
        assert_eq!(app.phase(), Phase::Trials);
        assert!(app.begin_submit("Ag").is_ok());
    }

    #[test]
    fn guess_is_trimmed_before_sending() {
        let mut app = logged_in();
        let pending = app.begin_submit("  Ag  ").unwrap();
        assert_eq!(pending.guess, "Ag");
    }

    #[test]
    fn successful_submission_tears_down_everything() {
        let mut app = logged_in();
        app.open("Trial 2");
        app.click_reagent("Trial 2", "AgNO3");

        app.begin_submit("Ag").unwrap();
        app.submit_succeeded();

        assert_eq!(app.phase(), Phase::Login);
        assert!(app.session().is_none());
        assert!(app.reveal().is_none());
        assert_eq!(app.selected(), None);

        // A fresh login starts from an empty reveal state.
        app.begin_session(sample_session());
        assert_eq!(
            app.trial_list(),
            vec![("Trial 1", false), ("Trial 2", false)]
        );
        assert_eq!(app.reagent_cell("Trial 2", "AgNO3"), ReagentCell::Hidden);
    }
}
