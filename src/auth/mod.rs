//! GUI credential checks and HTTP Basic header decoding.

use base64::Engine;

use crate::config::RuntimeConfig;

/// Exact match against the resolved GUI user and password.
pub fn check_auth(config: &RuntimeConfig, user: &str, password: &str) -> bool {
    user == config.gui_user && password == config.gui_password
}

/// User/password pair taken from a request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("user", &self.user).finish_non_exhaustive()
    }
}

impl Credentials {
    /// Parse an `Authorization: Basic <base64(user:password)>` header value.
    pub fn from_basic_header(value: &str) -> Option<Self> {
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }
        let decoded = base64::engine::general_purpose::STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (user, password) = decoded.split_once(':')?;
        Some(Self { user: user.to_string(), password: password.to_string() })
    }

    pub fn to_basic_header(&self) -> String {
        let raw = format!("{}:{}", self.user, self.password);
        format!("Basic {}", base64::engine::general_purpose::STANDARD.encode(raw))
    }

    pub fn matches(&self, config: &RuntimeConfig) -> bool {
        check_auth(config, &self.user, &self.password)
    }
}
