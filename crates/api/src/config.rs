//! Server configuration (environment-driven).

use std::net::SocketAddr;

use thiserror::Error;

use dashgate_auth::{ACCESS_TOKEN_COOKIE, AuthorizationGuard, DEFAULT_LOGIN_PATH, RouteClassifier, RouteConfigError};

pub const BIND_ADDR_ENV: &str = "DASHGATE_BIND_ADDR";
pub const PROTECTED_PREFIXES_ENV: &str = "DASHGATE_PROTECTED_PREFIXES";
pub const LOGIN_PATH_ENV: &str = "DASHGATE_LOGIN_PATH";
pub const SESSION_COOKIE_ENV: &str = "DASHGATE_SESSION_COOKIE";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PROTECTED_PREFIX: &str = "/dashboard";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DASHGATE_BIND_ADDR: invalid socket address '{value}': {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("DASHGATE_SESSION_COOKIE must not be empty")]
    EmptyCookieName,

    #[error("invalid route configuration: {0}")]
    Routes(#[from] RouteConfigError),
}

#[derive(Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub protected_prefixes: Vec<String>,
    pub login_path: String,
    pub session_cookie: String,
    pub jwt_secret: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (used by `from_env` and tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::BindAddr {
                value: bind_raw.clone(),
                source,
            })?;

        let protected_prefixes: Vec<String> = lookup(PROTECTED_PREFIXES_ENV)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_else(|| vec![DEFAULT_PROTECTED_PREFIX.to_string()]);

        let login_path = lookup(LOGIN_PATH_ENV).unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string());

        let session_cookie = lookup(SESSION_COOKIE_ENV).unwrap_or_else(|| ACCESS_TOKEN_COOKIE.to_string());
        if session_cookie.trim().is_empty() {
            return Err(ConfigError::EmptyCookieName);
        }

        let jwt_secret = lookup(JWT_SECRET_ENV).unwrap_or_else(|| {
            tracing::warn!("{JWT_SECRET_ENV} not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let config = Self {
            bind_addr,
            protected_prefixes,
            login_path,
            session_cookie: session_cookie.trim().to_string(),
            jwt_secret,
        };

        // Surface pattern mistakes at startup, not on the first request.
        config.build_guard()?;
        Ok(config)
    }

    pub fn build_guard(&self) -> Result<AuthorizationGuard, RouteConfigError> {
        let classifier = RouteClassifier::new(&self.protected_prefixes)?;
        AuthorizationGuard::new(classifier).with_login_path(self.login_path.clone())
    }
}

impl core::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("protected_prefixes", &self.protected_prefixes)
            .field("login_path", &self.login_path)
            .field("session_cookie", &self.session_cookie)
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(cfg.protected_prefixes, vec!["/dashboard"]);
        assert_eq!(cfg.login_path, "/login");
        assert_eq!(cfg.session_cookie, "access_token");
        assert_eq!(cfg.jwt_secret, "dev-secret");
    }

    #[test]
    fn prefix_list_is_split_and_trimmed() {
        let cfg = config(&[(PROTECTED_PREFIXES_ENV, " /dashboard, /admin ,,")]).unwrap();
        assert_eq!(cfg.protected_prefixes, vec!["/dashboard", "/admin"]);

        let guard = cfg.build_guard().unwrap();
        assert_eq!(guard.classifier().prefixes().len(), 2);
    }

    #[test]
    fn misconfiguration_fails_at_startup() {
        assert!(matches!(
            config(&[(PROTECTED_PREFIXES_ENV, "dashboard")]),
            Err(ConfigError::Routes(RouteConfigError::NotAbsolute(_)))
        ));
        assert!(matches!(
            config(&[(LOGIN_PATH_ENV, "login")]),
            Err(ConfigError::Routes(_))
        ));
        assert!(matches!(
            config(&[(BIND_ADDR_ENV, "nowhere")]),
            Err(ConfigError::BindAddr { .. })
        ));
        assert!(matches!(
            config(&[(SESSION_COOKIE_ENV, "  ")]),
            Err(ConfigError::EmptyCookieName)
        ));
    }

    #[test]
    fn blank_prefix_list_fails_at_startup() {
        for raw in ["", ",", " , ,"] {
            assert!(matches!(
                config(&[(PROTECTED_PREFIXES_ENV, raw)]),
                Err(ConfigError::Routes(RouteConfigError::NoPrefixes))
            ));
        }
    }

    #[test]
    fn login_path_inside_protected_prefix_fails_at_startup() {
        assert!(matches!(
            config(&[(LOGIN_PATH_ENV, "/dashboard/login")]),
            Err(ConfigError::Routes(RouteConfigError::LoginPathProtected(_)))
        ));
        assert!(matches!(
            config(&[(PROTECTED_PREFIXES_ENV, "/")]),
            Err(ConfigError::Routes(RouteConfigError::LoginPathProtected(_)))
        ));
    }

    #[test]
    fn debug_hides_secret() {
        let cfg = config(&[(JWT_SECRET_ENV, "hunter2")]).unwrap();
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }
}
