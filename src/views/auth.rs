use crate::api::types::{LoginRequest, RegisterRequest};
use crate::api::BookingApi;
use crate::error::ApiError;
use crate::models::{Session, User};
use crate::session::SessionContext;
use crate::views::Navigate;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

const LOGIN_FAILED: &str = "Login failed. Please try again.";
const LOGIN_OFFLINE: &str = "Network error. Please check your connection and try again.";
const SIGNUP_FAILED: &str = "Registration failed. Please try again.";
const SIGNUP_OFFLINE: &str =
    "Unable to connect to server. Please check your internet connection and try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignupValidation {
    #[error("Passwords do not match!")]
    PasswordMismatch,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Name must be at least 2 characters long")]
    NameTooShort,
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// Checked in order; the first failure is reported
    pub fn validate(&self) -> Result<(), SignupValidation> {
        if self.password != self.confirm_password {
            return Err(SignupValidation::PasswordMismatch);
        }
        if self.password.chars().count() < 6 {
            return Err(SignupValidation::PasswordTooShort);
        }
        if self.name.chars().count() < 2 {
            return Err(SignupValidation::NameTooShort);
        }
        Ok(())
    }
}

/// Login and signup
pub struct AuthView {
    api: Arc<dyn BookingApi>,
    session: SessionContext,
}

impl AuthView {
    pub fn new(api: Arc<dyn BookingApi>, session: SessionContext) -> Self {
        Self { api, session }
    }

    /// On success the session is persisted; `Err` carries the message to show
    pub async fn login(&self, email: &str, password: &str) -> Result<(Navigate, Option<User>), String> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let data = self.api.login(&request).await.map_err(|err| {
            error!(error = %err, "Login failed");
            login_message(&err)
        })?;

        let user = data.user.clone();
        self.session
            .establish(Session { token: data.token, user: data.user })
            .await
            .map_err(|err| {
                error!(error = %err, "Could not persist session");
                format!("Signed in, but the session could not be saved: {err}")
            })?;

        info!(email = %request.email, "Signed in");
        Ok((Navigate::Home, user))
    }

    pub async fn signup(&self, form: &SignupForm) -> Result<Navigate, String> {
        form.validate().map_err(|invalid| invalid.to_string())?;

        let request = RegisterRequest {
            name: form.name.clone(),
            email: form.email.clone(),
            password: form.password.clone(),
        };

        match self.api.register(&request).await {
            Ok(()) => {
                info!(email = %request.email, "Registered");
                Ok(Navigate::Login)
            }
            Err(err) => {
                error!(error = %err, "Registration failed");
                Err(err.user_message(SIGNUP_FAILED, SIGNUP_OFFLINE))
            }
        }
    }

    pub async fn logout(&self) -> anyhow::Result<Navigate> {
        self.session.sign_out().await?;
        info!("Signed out");
        Ok(Navigate::Login)
    }
}

fn login_message(err: &ApiError) -> String {
    err.user_message(LOGIN_FAILED, LOGIN_OFFLINE)
}
