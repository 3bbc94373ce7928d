//! HTTP driver for the assessment backend.
//!
//! One method per backend operation, all against a single base URL. Every
//! failure path is mapped onto the core error kinds before it leaves this
//! module: the backend's reason travels verbatim, transport failures become
//! the same generic message the user would see for a declined request, and
//! the transport detail goes to the log instead.

use std::collections::BTreeMap;
use std::time::Duration;

use mxlab::error::{AuthError, ExportError, ResetError, SubmitError};
use mxlab::session::{PendingGuess, Session};
use mxlab::trial::TrialContent;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5001";

/// Raw credential fields, exactly as the student typed them. No local shape
/// validation; the backend is authoritative (the 8-digit id950 rule is an
/// input hint, not a client check).
#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub id950: String,
    pub period: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    ok: bool,
    #[serde(default)]
    token: String,
    #[serde(default)]
    metal: String,
    #[serde(default)]
    trials: BTreeMap<String, TrialContent>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    token: &'a str,
    guess: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    ok: bool,
    #[serde(default)]
    result: String,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct TeacherAuthRequest<'a> {
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ResetRequest<'a> {
    password: &'a str,
    confirm: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ResetFailure {
    #[serde(default)]
    error: Option<String>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, String> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange credentials for a session. The backend's rejection reason is
    /// surfaced verbatim; a missing reason and any transport failure both
    /// fall back to the generic login message.
    pub async fn login(&self, form: &LoginForm) -> Result<Session, AuthError> {
        let res = self
            .http
            .post(self.url("/api/login"))
            .json(form)
            .send()
            .await
            .map_err(|e| {
                warn!("login transport failure: {e}");
                AuthError::rejected(None)
            })?;
        // Rejections arrive as non-2xx with an {ok:false, error} body, so the
        // body is parsed regardless of status.
        let body: LoginResponse = res.json().await.map_err(|e| {
            warn!("login: malformed response: {e}");
            AuthError::rejected(None)
        })?;
        if !body.ok {
            return Err(AuthError::rejected(body.error));
        }
        Ok(Session {
            token: body.token,
            metal: body.metal,
            trials: body.trials,
        })
    }

    /// Send the single guess for this session; the returned text is the
    /// backend's verdict, to be displayed verbatim.
    pub async fn submit(&self, pending: &PendingGuess) -> Result<String, SubmitError> {
        let res = self
            .http
            .post(self.url("/api/submit"))
            .json(&SubmitRequest {
                token: &pending.token,
                guess: &pending.guess,
            })
            .send()
            .await
            .map_err(|e| {
                warn!("submit transport failure: {e}");
                SubmitError::rejected(None)
            })?;
        let body: SubmitResponse = res.json().await.map_err(|e| {
            warn!("submit: malformed response: {e}");
            SubmitError::rejected(None)
        })?;
        if !body.ok {
            return Err(SubmitError::rejected(body.error));
        }
        Ok(body.result)
    }

    /// Teacher password check. Success is any 2xx; no body is required.
    pub async fn teacher_auth(&self, password: &str) -> Result<(), AuthError> {
        let res = self
            .http
            .post(self.url("/api/auth"))
            .json(&TeacherAuthRequest { password })
            .send()
            .await
            .map_err(|e| {
                warn!("teacher auth transport failure: {e}");
                AuthError::Rejected("Wrong password.".to_string())
            })?;
        if res.status().is_success() {
            Ok(())
        } else {
            Err(AuthError::Rejected("Wrong password.".to_string()))
        }
    }

    /// Fetch the accumulated results as a CSV byte stream. The password rides
    /// in the query string; that is the fixed contract of this endpoint.
    pub async fn export_results(&self, password: &str) -> Result<Vec<u8>, ExportError> {
        let res = self
            .http
            .get(self.url("/api/results"))
            .query(&[("password", password)])
            .send()
            .await
            .map_err(|e| {
                warn!("export transport failure: {e}");
                ExportError::Failed
            })?;
        if !res.status().is_success() {
            warn!("export declined: HTTP {}", res.status());
            return Err(ExportError::Failed);
        }
        let bytes = res.bytes().await.map_err(|e| {
            warn!("export: truncated body: {e}");
            ExportError::Failed
        })?;
        Ok(bytes.to_vec())
    }

    /// Clear all results and release every active identifier assignment. The
    /// explicit confirm flag is part of the wire contract; the two-step user
    /// confirmation happens in the panel state machine before this is called.
    pub async fn reset_all(&self, password: &str) -> Result<(), ResetError> {
        let res = self
            .http
            .post(self.url("/api/reset"))
            .json(&ResetRequest {
                password,
                confirm: true,
            })
            .send()
            .await
            .map_err(|e| {
                warn!("reset transport failure: {e}");
                ResetError::rejected(None)
            })?;
        if res.status().is_success() {
            return Ok(());
        }
        let failure: ResetFailure = res.json().await.unwrap_or_default();
        Err(ResetError::rejected(failure.error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_form_serializes_with_wire_field_names() {
        let form = LoginForm {
            full_name: "A B".to_string(),
            id950: "12345678".to_string(),
            period: "2".to_string(),
            password: "x".to_string(),
        };
        let v = serde_json::to_value(&form).unwrap();
        assert_eq!(v["fullName"], "A B");
        assert_eq!(v["id950"], "12345678");
        assert_eq!(v["period"], "2");
        assert_eq!(v["password"], "x");
    }

    #[test]
    fn login_response_parses_mixed_trial_shapes() {
        let body: LoginResponse = serde_json::from_str(
            r#"{"ok":true,"token":"t1","metal":"Au",
                "trials":{"Trial 1":"clear solution","Trial 2":{"AgNO3":"precipitate"}}}"#,
        )
        .unwrap();
        assert!(body.ok);
        assert_eq!(body.token, "t1");
        assert_eq!(body.trials.len(), 2);
        assert!(body.trials["Trial 2"].is_table());
    }

    #[test]
    fn login_rejection_carries_the_reason() {
        let body: LoginResponse =
            serde_json::from_str(r#"{"ok":false,"error":"950 number already in use"}"#).unwrap();
        assert!(!body.ok);
        assert_eq!(body.error.as_deref(), Some("950 number already in use"));
    }

    #[test]
    fn trial_of_the_wrong_shape_fails_the_parse() {
        let body: Result<LoginResponse, _> = serde_json::from_str(
            r#"{"ok":true,"token":"t","metal":"Au","trials":{"Trial 1":42}}"#,
        );
        assert!(body.is_err());
    }

    #[test]
    fn submit_request_serializes_token_and_guess() {
        let v = serde_json::to_value(SubmitRequest {
            token: "t1",
            guess: "Ag",
        })
        .unwrap();
        assert_eq!(v["token"], "t1");
        assert_eq!(v["guess"], "Ag");
    }

    #[test]
    fn reset_request_carries_the_confirm_flag() {
        let v = serde_json::to_value(ResetRequest {
            password: "pw",
            confirm: true,
        })
        .unwrap();
        assert_eq!(v["confirm"], true);
    }

    #[test]
    fn reset_failure_body_is_optional() {
        let empty: ResetFailure = serde_json::from_str("{}").unwrap();
        assert!(empty.error.is_none());
        let with_reason: ResetFailure =
            serde_json::from_str(r#"{"error":"Unauthorized"}"#).unwrap();
        assert_eq!(with_reason.error.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn base_url_trailing_slashes_are_normalized() {
        let api = ApiClient::new("http://127.0.0.1:5001//").unwrap();
        assert_eq!(api.url("/api/login"), "http://127.0.0.1:5001/api/login");
    }
}
