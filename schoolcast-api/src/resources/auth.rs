//! `/auth`: login and the current user
//!
//! Logout is client-side only: the stored session is cleared.

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::{ApiError, ApiFailure};
use crate::models::{Envelope, User};
use crate::session::Session;

const LOGIN_PATH: &str = "/auth/login";
const ME_PATH: &str = "/auth/me";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
    user: User,
}

/// Exchange credentials for a token and persist the session.
pub async fn login(client: &ApiClient, credentials: &Credentials) -> Result<Session, ApiFailure> {
    const FALLBACK: &str = "Login failed";

    let envelope: Envelope<LoginData> = client
        .post(LOGIN_PATH, credentials)
        .await
        .map_err(|e| e.into_failure(FALLBACK))?;
    let data = envelope
        .into_data(LOGIN_PATH)
        .map_err(|e| e.into_failure(FALLBACK))?;

    let session = Session {
        token: data.token,
        user: data.user,
    };
    client
        .session()
        .save(&session)
        .map_err(|e| ApiError::from(e).into_failure("Failed to save session"))?;
    tracing::info!(user = %session.user.email, "signed in");
    Ok(session)
}

/// The account the current token belongs to.
pub async fn me(client: &ApiClient) -> Result<User, ApiFailure> {
    const FALLBACK: &str = "Failed to fetch current user";

    let envelope: Envelope<User> = client
        .get(ME_PATH, &[])
        .await
        .map_err(|e| e.into_failure(FALLBACK))?;
    envelope
        .into_data(ME_PATH)
        .map_err(|e| e.into_failure(FALLBACK))
}

/// Forget the stored session.
pub fn logout(client: &ApiClient) -> Result<(), ApiFailure> {
    client
        .session()
        .clear()
        .map_err(|e| ApiError::from(e).into_failure("Failed to clear session"))?;
    tracing::info!("signed out");
    Ok(())
}
