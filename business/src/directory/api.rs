//! Directory API client.
//!
//! One remote call per operation, no retries. Every request carries the session token
//! as a bearer credential when one is present, plus `x-api-key` when configured.
//! Failures are classified per operation so callers can tell a rejected login from a
//! failed list or mutation.

use log::{debug, warn};

use crate::BusinessConfig;
use crate::http::{Client, RequestBuilder, Response};
use crate::login::Credentials;
use crate::session::Session;

use super::types::{
    ErrorBody, LoginRequest, LoginResponse, UpdateReceipt, UserPage, UserUpdate,
};

/// Fallback shown when a rejected login carries no message.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Login rejected.
    #[error("{0}")]
    Auth(String),
    #[error("Failed to fetch users: {0}")]
    Fetch(String),
    #[error("Failed to update user: {0}")]
    Update(String),
    #[error("Failed to delete user: {0}")]
    Delete(String),
}

impl ApiError {
    /// The underlying reason, without the operation prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Auth(m) | Self::Fetch(m) | Self::Update(m) | Self::Delete(m) => m,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

fn http_status_error(response: &Response) -> String {
    match response.json::<ErrorBody>().ok().and_then(ErrorBody::into_message) {
        Some(message) => format!("API returned status {}: {message}", response.status),
        None => format!("API returned status: {}", response.status),
    }
}

/// Client for the user directory, bound to one [`Session`].
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    config: BusinessConfig,
    session: Session,
    http: Client,
}

impl DirectoryClient {
    pub fn new(config: &BusinessConfig, session: Session) -> Self {
        Self {
            config: config.clone(),
            session,
            http: Client::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match self.config.api_key() {
            Some(key) => request.header("x-api-key", key),
            None => request,
        };
        match self.session.get_token() {
            Some(token) => request.bearer_auth(&token),
            None => request,
        }
    }

    /// POST `/login`
    ///
    /// Returns the issued token; storing it is the caller's job.
    pub async fn authenticate(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        let body = LoginRequest {
            email: &credentials.email,
            password: &credentials.password,
        };
        let response = self
            .decorate(self.http.post(&self.config.login_url()))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("authenticate: transport failure: {e}");
                ApiError::Auth(INVALID_CREDENTIALS.to_owned())
            })?;

        if !response.is_success() {
            let message = response
                .json::<ErrorBody>()
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| INVALID_CREDENTIALS.to_owned());
            debug!("authenticate: rejected with status {}", response.status);
            return Err(ApiError::Auth(message));
        }

        response
            .json::<LoginResponse>()
            .map_err(|_missing_token| ApiError::Auth(INVALID_CREDENTIALS.to_owned()))
    }

    /// GET `/users?page={page}&per_page={page_size}`
    pub async fn list_users(&self, page: u32, page_size: u32) -> ApiResult<UserPage> {
        let url = format!(
            "{}?page={page}&per_page={page_size}",
            self.config.users_url()
        );

        let response = self
            .decorate(self.http.get(&url))
            .send()
            .await
            .map_err(|e| ApiError::Fetch(e.to_string()))?;

        if !response.is_success() {
            return Err(ApiError::Fetch(http_status_error(&response)));
        }

        response
            .json()
            .map_err(|e| ApiError::Fetch(format!("Failed to parse user page: {e}")))
    }

    /// PUT `/users/{id}`
    pub async fn update_user(&self, id: u64, fields: &UserUpdate) -> ApiResult<UpdateReceipt> {
        let response = self
            .decorate(self.http.put(&self.config.user_url(id)))
            .json(fields)
            .send()
            .await
            .map_err(|e| ApiError::Update(e.to_string()))?;

        if !response.is_success() {
            return Err(ApiError::Update(http_status_error(&response)));
        }

        // 204 or an unrelated body; missing fields are filled from the request later
        Ok(response.json().unwrap_or_default())
    }

    /// DELETE `/users/{id}`
    pub async fn delete_user(&self, id: u64) -> ApiResult<()> {
        let response = self
            .decorate(self.http.delete(&self.config.user_url(id)))
            .send()
            .await
            .map_err(|e| ApiError::Delete(e.to_string()))?;

        if !response.is_success() {
            return Err(ApiError::Delete(http_status_error(&response)));
        }

        Ok(())
    }
}
