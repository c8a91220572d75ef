//! Account flows: login, registration, logout and profile.
//!
//! Login and registration talk to the API directly, outside the refresh
//! pipeline, since a 401 there means bad credentials rather than an
//! expired token. Everything that needs an authenticated user goes through
//! [`ApiClient::request`].

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use sunulek_core::error::InvalidInputError;
use sunulek_core::models::{Notice, PublicProfile, Registration, UserSummary};
use sunulek_core::{
    AccessToken, Credentials, MultipartForm, OutboundRequest, RefreshToken, Result, Session,
};

use crate::client::ApiClient;
use crate::endpoints;

/// Length of the emailed confirmation code.
const VERIFICATION_CODE_LEN: usize = 6;

/// Request body for login.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Response from login.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    access: String,
    refresh: String,
    user: UserSummary,
}

/// New account details.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub password: String,
    pub password_confirm: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct VerifyEmailRequest<'a> {
    code: &'a str,
}

#[derive(Debug, Serialize)]
struct ResendVerificationRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct LogoutRequest<'a> {
    refresh: &'a str,
}

#[derive(Serialize)]
struct ChangePasswordRequest<'a> {
    old_password: &'a str,
    new_password: &'a str,
    new_password_confirm: &'a str,
}

impl ApiClient {
    /// Log in and install the resulting session.
    ///
    /// # Errors
    ///
    /// Returns [`sunulek_core::Error::Request`] with the server's message on
    /// bad credentials.
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: Credentials) -> Result<Session> {
        info!("Logging in");

        let request = OutboundRequest::post(endpoints::LOGIN).json(&LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
        })?;

        let response: LoginResponse = self.transport().call_json(&request, None).await?;

        let session = Session::new(
            AccessToken::new(response.access),
            RefreshToken::new(response.refresh),
            Some(response.user),
        )?;
        self.sessions().set_session(session.clone());

        Ok(session)
    }

    /// Create an account. No session is created; the account confirms its
    /// email with [`ApiClient::verify_email`] and then logs in.
    #[instrument(skip(self, account), fields(email = %account.email))]
    pub async fn register(&self, account: &RegisterRequest) -> Result<Registration> {
        if account.password != account.password_confirm {
            return Err(InvalidInputError::Other {
                message: "passwords do not match".to_string(),
            }
            .into());
        }

        let request = OutboundRequest::post(endpoints::REGISTER).json(account)?;
        self.transport().call_json(&request, None).await
    }

    /// Confirm an account's email with the emailed code.
    #[instrument(skip(self, code))]
    pub async fn verify_email(&self, user_id: u64, code: &str) -> Result<Notice> {
        let code = code.trim();
        if code.chars().count() != VERIFICATION_CODE_LEN {
            return Err(InvalidInputError::Other {
                message: format!(
                    "verification code must be {} characters",
                    VERIFICATION_CODE_LEN
                ),
            }
            .into());
        }

        let request = OutboundRequest::post(endpoints::verify_email(user_id))
            .json(&VerifyEmailRequest { code })?;
        self.transport().call_json(&request, None).await
    }

    /// Ask for a new confirmation code.
    #[instrument(skip(self))]
    pub async fn resend_verification(&self, email: &str) -> Result<Notice> {
        let request = OutboundRequest::post(endpoints::RESEND_VERIFICATION)
            .json(&ResendVerificationRequest { email })?;
        self.transport().call_json(&request, None).await
    }

    /// Log out: revoke the refresh token server-side, then clear the local
    /// session. The session is cleared even if the server call fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let Some(session) = self.sessions().current() else {
            return Ok(());
        };

        let request = OutboundRequest::post(endpoints::LOGOUT).json(&LogoutRequest {
            refresh: session.refresh_token().as_str(),
        })?;

        if let Err(e) = self.request(request).await {
            warn!(error = %e, "Server-side logout failed");
        }

        self.sessions().clear_session();
        info!("Logged out");
        Ok(())
    }

    /// Fetch the current user's profile and update the session copy.
    pub async fn profile(&self) -> Result<UserSummary> {
        let user: UserSummary = self.get_json(endpoints::PROFILE).await?;
        self.sessions().set_user(user.clone());
        Ok(user)
    }

    /// Update profile fields (and optionally the avatar) from a multipart
    /// form.
    pub async fn update_profile(&self, form: MultipartForm) -> Result<UserSummary> {
        let user: UserSummary = self
            .send_json(OutboundRequest::patch(endpoints::PROFILE).multipart(form))
            .await?;
        self.sessions().set_user(user.clone());
        Ok(user)
    }

    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        new_password_confirm: &str,
    ) -> Result<Notice> {
        let request =
            OutboundRequest::post(endpoints::CHANGE_PASSWORD).json(&ChangePasswordRequest {
                old_password,
                new_password,
                new_password_confirm,
            })?;
        self.send_json(request).await
    }

    /// Another account's public profile.
    pub async fn public_profile(&self, user_id: u64) -> Result<PublicProfile> {
        self.get_json(&endpoints::public_profile(user_id)).await
    }
}
