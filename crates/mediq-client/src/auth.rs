//! `/auth/*` endpoints.

use mediq_core::entities::{AuthTokens, DoctorProfile, PatientProfile, UserProfile};
use mediq_core::Role;
use reqwest::header::COOKIE;
use serde::{Deserialize, Serialize};

use crate::http::check_response;
use crate::{AuthStyle, BackendClient, ClientError, SessionContext};

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`. Exactly one profile is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_profile: Option<PatientProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_profile: Option<DoctorProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl RegisterRequest {
    #[must_use]
    pub fn patient(email: String, password: String, profile: PatientProfile) -> Self {
        Self {
            email,
            password,
            patient_profile: Some(profile),
            doctor_profile: None,
            role: Some(Role::Patient),
        }
    }

    #[must_use]
    pub fn doctor(email: String, password: String, profile: DoctorProfile) -> Self {
        Self {
            email,
            password,
            patient_profile: None,
            doctor_profile: Some(profile),
            role: Some(Role::Doctor),
        }
    }
}

/// Result of a successful login or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    pub tokens: AuthTokens,
    /// Value of the `session` cookie the backend set, or the access token
    /// when no cookie came back.
    pub session_token: String,
    /// Value of the `refresh` cookie, or the body's refresh token.
    pub refresh_token: String,
}

impl LoginSession {
    fn from_response(
        headers: &reqwest::header::HeaderMap,
        cookies: (&str, &str),
        tokens: AuthTokens,
    ) -> Self {
        let (session_cookie, refresh_cookie) = cookies;
        let session_token = mediq_session::cookie::from_set_cookie_headers(headers, session_cookie)
            .unwrap_or_else(|| tokens.access_token.clone());
        let refresh_token = mediq_session::cookie::from_set_cookie_headers(headers, refresh_cookie)
            .unwrap_or_else(|| tokens.refresh_token.clone());
        Self {
            tokens,
            session_token,
            refresh_token,
        }
    }

    #[must_use]
    pub fn context(&self) -> SessionContext {
        SessionContext::with_token(self.session_token.clone())
    }
}

impl BackendClient {
    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`]; a 401 means bad credentials.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginSession, ClientError> {
        let resp = self
            .http
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await?;
        let resp = check_response(resp).await?;

        let headers = resp.headers().clone();
        let tokens: AuthTokens = resp.json().await?;
        tracing::info!("logged in");
        Ok(LoginSession::from_response(
            &headers,
            (&self.session_cookie, &self.refresh_cookie),
            tokens,
        ))
    }

    /// `POST /auth/register` (201).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`]; a 409 means the email is taken, a 422 carries
    /// field messages.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthTokens, ClientError> {
        let resp = self
            .http
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let tokens = resp.json().await?;
        tracing::info!("registered");
        Ok(tokens)
    }

    /// `POST /auth/refresh` with the refresh token in `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`]; a 401 means the refresh token is no longer valid.
    pub async fn refresh(&self, refresh: &SessionContext) -> Result<LoginSession, ClientError> {
        let mut builder = self.http.post(self.url("/auth/refresh"));
        if let Some(token) = refresh.token() {
            builder = builder.header(COOKIE, format!("{}={token}", self.refresh_cookie));
        }
        let resp = check_response(builder.send().await?).await?;

        let headers = resp.headers().clone();
        let tokens: AuthTokens = resp.json().await?;
        Ok(LoginSession::from_response(
            &headers,
            (&self.session_cookie, &self.refresh_cookie),
            tokens,
        ))
    }

    /// `POST /auth/logout` (204).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a non-success status.
    pub async fn logout(&self, ctx: &SessionContext) -> Result<(), ClientError> {
        let builder = self.authorized(self.http.post(self.url("/auth/logout")), ctx, AuthStyle::Cookie);
        check_response(builder.send().await?).await?;
        Ok(())
    }

    /// `GET /auth/me`, cookie auth.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`]; a 401 means the session is missing or expired.
    pub async fn me(&self, ctx: &SessionContext) -> Result<UserProfile, ClientError> {
        let builder = self.authorized(self.http.get(self.url("/auth/me")), ctx, AuthStyle::Cookie);
        let resp = check_response(builder.send().await?).await?;
        Ok(resp.json().await?)
    }
}
