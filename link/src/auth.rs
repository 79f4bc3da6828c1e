//! Authentication for engine-link requests.
//!
//! Static header injection only: the provider turns credentials into an
//! `Authorization` header that is attached to every request of a session.

use base64::{engine::general_purpose, Engine as _};

/// Authentication credentials sent to the engine.
///
/// # Examples
///
/// ```rust
/// use engine_link::AuthProvider;
///
/// // HTTP Basic Auth
/// let auth = AuthProvider::basic_auth("username".to_string(), "password".to_string());
///
/// // Bearer token
/// let auth = AuthProvider::jwt_token("eyJhbGc...".to_string());
///
/// // No authentication (the user header alone identifies the caller)
/// let auth = AuthProvider::none();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthProvider {
    /// HTTP Basic Auth (username, password)
    BasicAuth(String, String),

    /// Bearer token authentication
    JwtToken(String),

    /// No authentication
    #[default]
    None,
}

impl AuthProvider {
    /// Create HTTP Basic Auth.
    ///
    /// Encodes username:password as base64 for the Authorization: Basic header
    /// following RFC 7617.
    pub fn basic_auth(username: String, password: String) -> Self {
        Self::BasicAuth(username, password)
    }

    /// Create bearer token authentication
    pub fn jwt_token(token: String) -> Self {
        Self::JwtToken(token)
    }

    pub fn none() -> Self {
        Self::None
    }

    /// Value of the `Authorization` header for these credentials
    ///
    /// - BasicAuth: `Basic <base64(username:password)>`
    /// - JwtToken: `Bearer <token>`
    /// - None: no header
    pub fn authorization_header(&self) -> Option<String> {
        match self {
            Self::BasicAuth(username, password) => {
                let credentials = format!("{}:{}", username, password);
                let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                Some(format!("Basic {}", encoded))
            },
            Self::JwtToken(token) => Some(format!("Bearer {}", token)),
            Self::None => None,
        }
    }

    /// Check if authentication is configured
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }
}
