use crate::api::traits::BookingApi;
use crate::api::types::{
    BookingData, BookingsData, Envelope, ErrorBody, LoginData, LoginRequest, NewBooking,
    PaymentUpdate, PropertiesData, PropertyData, RegisterRequest, SecretResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::models::{Booking, Property};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Backend client over HTTP + JSON
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("staybook/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        let base = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL {base_url:?}"))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("API base URL {base_url:?} cannot carry a path");
        }

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Endpoint under the base path; each segment is percent-encoded, so an
    /// id can never reach another route
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send once and return the body of a 2xx response
    async fn execute(&self, request: RequestBuilder) -> ApiResult<String> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| ApiError::Connectivity(err.to_string()))?;

        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;
        debug!(%status, path = %url, bytes = body.len(), "Backend responded");

        check_status(status, &body)?;
        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<Option<T>> {
        let body = self.execute(request).await?;
        unwrap_envelope(&body)
    }
}

/// Map a non-2xx status to the error taxonomy, keeping the server's message
pub(crate) fn check_status(status: StatusCode, body: &str) -> ApiResult<()> {
    if status.is_success() {
        return Ok(());
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .unwrap_or_default()
        .message;
    warn!(%status, message = message.as_deref().unwrap_or(""), "Backend request failed");

    if status == StatusCode::UNAUTHORIZED {
        Err(ApiError::Unauthorized { message })
    } else {
        Err(ApiError::Server { status: status.as_u16(), message })
    }
}

/// Decode a 2xx body, turning `success: false` into `Rejected`
pub(crate) fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> ApiResult<Option<T>> {
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    if !envelope.success {
        return Err(ApiError::Rejected { message: envelope.message });
    }
    Ok(envelope.data)
}

fn require_booking(data: Option<BookingData>) -> ApiResult<Booking> {
    data.and_then(|d| d.booking)
        .ok_or_else(|| ApiError::Decode("response is missing the booking".into()))
}

#[async_trait]
impl BookingApi for HttpApi {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginData> {
        debug!(email = %request.email, "Logging in");
        let data: Option<LoginData> = self
            .fetch(self.client.post(self.url(&["api", "auth", "login"])).json(request))
            .await?;
        data.ok_or_else(|| ApiError::Decode("login response is missing the token".into()))
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<()> {
        debug!(email = %request.email, "Registering");
        let _: Option<serde_json::Value> = self
            .fetch(self.client.post(self.url(&["api", "auth", "register"])).json(request))
            .await?;
        Ok(())
    }

    async fn list_properties(&self) -> ApiResult<Vec<Property>> {
        let data: Option<PropertiesData> =
            self.fetch(self.client.get(self.url(&["api", "properties"]))).await?;
        Ok(data.unwrap_or_default().properties)
    }

    async fn get_property(&self, id: &str) -> ApiResult<Option<Property>> {
        let data: Option<PropertyData> = self
            .fetch(self.client.get(self.url(&["api", "properties", id])))
            .await?;
        Ok(data.and_then(|d| d.property))
    }

    async fn create_booking(&self, token: &str, request: &NewBooking) -> ApiResult<Booking> {
        let data: Option<BookingData> = self
            .fetch(
                self.client
                    .post(self.url(&["api", "bookings"]))
                    .bearer_auth(token)
                    .json(request),
            )
            .await?;
        require_booking(data)
    }

    async fn get_booking(&self, token: &str, id: &str) -> ApiResult<Option<Booking>> {
        let data: Option<BookingData> = self
            .fetch(
                self.client
                    .get(self.url(&["api", "bookings", id]))
                    .bearer_auth(token),
            )
            .await?;
        Ok(data.and_then(|d| d.booking))
    }

    async fn my_bookings(&self, token: &str) -> ApiResult<Vec<Booking>> {
        let data: Option<BookingsData> = self
            .fetch(
                self.client
                    .get(self.url(&["api", "bookings", "my-bookings"]))
                    .bearer_auth(token),
            )
            .await?;
        Ok(data.unwrap_or_default().bookings)
    }

    async fn update_payment(
        &self,
        token: &str,
        id: &str,
        update: &PaymentUpdate,
    ) -> ApiResult<Option<Booking>> {
        let data: Option<BookingData> = self
            .fetch(
                self.client
                    .patch(self.url(&["api", "bookings", id]))
                    .bearer_auth(token)
                    .json(update),
            )
            .await?;
        Ok(data.and_then(|d| d.booking))
    }

    async fn confirm_booking(&self, token: &str, id: &str) -> ApiResult<Option<Booking>> {
        let data: Option<BookingData> = self
            .fetch(
                self.client
                    .post(self.url(&["api", "bookings", id, "confirm"]))
                    .bearer_auth(token)
                    .json(&serde_json::json!({})),
            )
            .await?;
        Ok(data.and_then(|d| d.booking))
    }

    async fn payment_intent_secret(
        &self,
        token: &str,
        booking_id: &str,
        payment_intent_id: &str,
    ) -> ApiResult<String> {
        let body = self
            .execute(
                self.client
                    .get(self.url(&["api", "bookings", booking_id, "payment-intent-secret"]))
                    .bearer_auth(token)
                    .query(&[("paymentIntentId", payment_intent_id)]),
            )
            .await?;

        let response: SecretResponse = serde_json::from_str(&body)?;
        match response.client_secret {
            Some(secret) if response.success && !secret.is_empty() => Ok(secret),
            _ => Err(ApiError::Rejected { message: response.message }),
        }
    }
}
