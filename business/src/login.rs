//! Sign-in flow.
//!
//! Form validation happens before any request is made. A successful sign-in stores the
//! issued token in the [`Session`]; a failed one leaves whatever token was there untouched.

use log::{info, warn};

use crate::directory::{ApiError, DirectoryClient};
use crate::notify::Notifier;
use crate::session::{Session, SessionError};

/// Minimum password length accepted by the login form.
pub const MIN_PASSWORD_LEN: usize = 6;

pub const LOGIN_SUCCESSFUL: &str = "Login successful!";

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Per-field validation messages. A `None` field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginFormErrors {
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl LoginFormErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

impl std::fmt::Display for LoginFormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.email.iter().chain(self.password.iter()).copied().collect();
        f.write_str(&messages.join("; "))
    }
}

pub fn validate_email(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        Some("Email is required")
    } else if !email.contains('@') {
        Some("Email must contain @ symbol")
    } else if !email.contains('.') {
        Some("Email must contain a domain (e.g., .com)")
    } else {
        None
    }
}

pub fn validate_password(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some("Password is required")
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        Some("Password must be at least 6 characters")
    } else {
        None
    }
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), LoginFormErrors> {
        let errors = LoginFormErrors {
            email: validate_email(&self.email),
            password: validate_password(&self.password),
        };
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("{0}")]
    Invalid(LoginFormErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Represents the current authentication state of the user.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    /// Where the login form currently is.
    pub status: AuthStatus,
    /// Email of the signed-in user.
    pub email: Option<String>,
    /// Error message if login failed.
    pub error: Option<String>,
}

/// Authentication status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthStatus {
    /// No token held.
    #[default]
    LoggedOut,
    /// Credentials sent, waiting for the directory.
    LoggingIn,
    /// A token is held.
    LoggedIn,
    /// The last attempt was rejected; any earlier token is still held.
    LoginFailed,
}

impl AuthState {
    /// Signed-out state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the user is logged in.
    pub fn is_logged_in(&self) -> bool {
        self.status == AuthStatus::LoggedIn
    }

    /// Returns true if a login attempt is in progress.
    pub fn is_logging_in(&self) -> bool {
        self.status == AuthStatus::LoggingIn
    }

    /// Enter `LoggingIn` and clear the previous error.
    pub fn start_login(&mut self) {
        self.status = AuthStatus::LoggingIn;
        self.error = None;
    }

    /// Record a successful login for `email`.
    pub fn login_success(&mut self, email: String) {
        self.status = AuthStatus::LoggedIn;
        self.email = Some(email);
        self.error = None;
    }

    /// Record a rejected login.
    ///
    /// Keeps `email` so a restored session stays identifiable after a failed re-login.
    pub fn login_failed(&mut self, error: String) {
        self.status = AuthStatus::LoginFailed;
        self.error = Some(error);
    }

    /// Back to the signed-out state.
    pub fn logout(&mut self) {
        self.status = AuthStatus::LoggedOut;
        self.email = None;
        self.error = None;
    }
}

/// Validate `credentials`, exchange them for a token and store it.
///
/// Publishes "Login successful!" on success and the failure reason otherwise.
pub async fn sign_in(
    client: &DirectoryClient,
    session: &Session,
    credentials: &Credentials,
    notifier: &Notifier,
) -> Result<(), LoginError> {
    if let Err(errors) = credentials.validate() {
        // Form errors are shown next to the fields, not as notices.
        return Err(LoginError::Invalid(errors));
    }

    let response = match client.authenticate(credentials).await {
        Ok(response) => response,
        Err(err) => {
            warn!("sign_in: rejected for {}", credentials.email);
            notifier.error(err.message());
            return Err(err.into());
        }
    };

    if let Err(err) = session.set_token(response.token) {
        notifier.error(err.to_string());
        return Err(err.into());
    }

    info!("sign_in: signed in as {}", credentials.email);
    notifier.success(LOGIN_SUCCESSFUL);
    Ok(())
}

pub fn sign_out(session: &Session) -> Result<(), SessionError> {
    session.clear_token()?;
    info!("sign_out: session cleared");
    Ok(())
}
