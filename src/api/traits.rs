use crate::api::types::{LoginData, LoginRequest, NewBooking, PaymentUpdate, RegisterRequest};
use crate::error::ApiResult;
use crate::models::{Booking, Property};
use async_trait::async_trait;

/// Every backend operation the client performs.
///
/// Authenticated calls take the bearer token explicitly; callers read it
/// from their `SessionContext`. Each call is a single attempt.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginData>;

    async fn register(&self, request: &RegisterRequest) -> ApiResult<()>;

    async fn list_properties(&self) -> ApiResult<Vec<Property>>;

    /// `Ok(None)` when the backend answered without a property
    async fn get_property(&self, id: &str) -> ApiResult<Option<Property>>;

    async fn create_booking(&self, token: &str, request: &NewBooking) -> ApiResult<Booking>;

    async fn get_booking(&self, token: &str, id: &str) -> ApiResult<Option<Booking>>;

    async fn my_bookings(&self, token: &str) -> ApiResult<Vec<Booking>>;

    async fn update_payment(
        &self,
        token: &str,
        id: &str,
        update: &PaymentUpdate,
    ) -> ApiResult<Option<Booking>>;

    /// The updated booking when the backend echoes it back
    async fn confirm_booking(&self, token: &str, id: &str) -> ApiResult<Option<Booking>>;

    /// Raw client secret for `payment_intent_id`; shape is checked by the caller
    async fn payment_intent_secret(
        &self,
        token: &str,
        booking_id: &str,
        payment_intent_id: &str,
    ) -> ApiResult<String>;
}
