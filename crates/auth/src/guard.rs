//! Request-time authorization guard.
//!
//! - No IO
//! - No panics
//! - Stateless: every decision is a pure function of (path, credential)

use serde::Serialize;
use url::form_urlencoded;

use crate::credential::SessionCredential;
use crate::route::{RouteClass, RouteClassifier, RouteConfigError, strip_query_and_fragment};

/// Default login endpoint used for redirects.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Query parameter carrying the original path to the login flow.
pub const RETURN_PATH_PARAM: &str = "redirect";

/// Outcome of evaluating a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    RedirectToLogin { return_path: String },
}

impl GuardDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Composes the route classifier with the credential presence check.
#[derive(Debug, Clone)]
pub struct AuthorizationGuard {
    classifier: RouteClassifier,
    login_path: String,
}

impl AuthorizationGuard {
    pub fn new(classifier: RouteClassifier) -> Self {
        Self {
            classifier,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }

    /// Override the login endpoint. It must be an absolute, public path;
    /// a protected login path would redirect to itself.
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Result<Self, RouteConfigError> {
        let login_path = login_path.into();
        if login_path.is_empty() {
            return Err(RouteConfigError::Empty);
        }
        if !login_path.starts_with('/') {
            return Err(RouteConfigError::NotAbsolute(login_path));
        }
        if self.classifier.classify(&login_path) == RouteClass::Protected {
            return Err(RouteConfigError::LoginPathProtected(login_path));
        }
        self.login_path = login_path;
        Ok(self)
    }

    pub fn classifier(&self) -> &RouteClassifier {
        &self.classifier
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Decide whether a request may proceed.
    ///
    /// `credential` is the raw session value as received; empty counts as
    /// absent. Its value is never logged. The return path on a redirect is
    /// the path alone, without query or fragment.
    pub fn evaluate(&self, path: &str, credential: Option<&str>) -> GuardDecision {
        let class = self.classifier.classify(path);
        let credential_present = SessionCredential::from_raw(credential).is_some();

        let decision = match (class, credential_present) {
            (RouteClass::Public, _) | (RouteClass::Protected, true) => GuardDecision::Allow,
            (RouteClass::Protected, false) => GuardDecision::RedirectToLogin {
                return_path: strip_query_and_fragment(path).to_string(),
            },
        };

        tracing::debug!(
            path,
            route_class = ?class,
            credential_present,
            allowed = decision.is_allow(),
            "authorization guard decision"
        );

        decision
    }

    /// Redirect target for the login flow, e.g. `/login?redirect=%2Fdashboard`.
    pub fn login_location(&self, return_path: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(RETURN_PATH_PARAM, return_path)
            .finish();
        format!("{}?{}", self.login_path, query)
    }

    /// Where to send the client, if anywhere.
    pub fn redirect_location(&self, decision: &GuardDecision) -> Option<String> {
        match decision {
            GuardDecision::Allow => None,
            GuardDecision::RedirectToLogin { return_path } => Some(self.login_location(return_path)),
        }
    }
}
