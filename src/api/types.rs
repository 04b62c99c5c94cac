use crate::models::{stay_date, Booking, PaymentStatus, Property, User};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Response wrapper used by every backend endpoint
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "assume_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

fn assume_success() -> bool {
    true
}

/// Body of a non-2xx response; only the message matters
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PropertiesData {
    #[serde(default)]
    pub properties: Vec<Property>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PropertyData {
    #[serde(default)]
    pub property: Option<Property>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookingData {
    #[serde(default)]
    pub booking: Option<Booking>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookingsData {
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

/// Body of `POST /api/bookings`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub property_id: String,
    #[serde(with = "stay_date")]
    pub check_in: NaiveDate,
    #[serde(with = "stay_date")]
    pub check_out: NaiveDate,
    pub guests: u32,
}

/// Body of `PATCH /api/bookings/:id` after a successful charge
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    pub payment_status: PaymentStatus,
    pub stripe_payment_intent_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretResponse {
    #[serde(default = "assume_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}
