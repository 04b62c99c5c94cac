use crate::models::Booking;
use crate::payment::secret::ClientSecret;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Card data collected for one payment attempt
#[derive(Clone)]
pub struct CardDetails {
    pub number: String,
    pub exp_month: u32,
    pub exp_year: u32,
    pub cvc: String,
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last4 = self
            .number
            .get(self.number.len().saturating_sub(4)..)
            .unwrap_or("");
        f.debug_struct("CardDetails")
            .field("number", &format!("**** {last4}"))
            .field("exp_month", &self.exp_month)
            .field("exp_year", &self.exp_year)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingDetails {
    pub name: String,
    pub email: String,
}

impl BillingDetails {
    /// Billing identity from the booking's user, with placeholders otherwise
    pub fn for_booking(booking: &Booking) -> Self {
        let user = booking.user.as_ref();
        let pick = |value: Option<&String>, fallback: &str| {
            value
                .filter(|v| !v.is_empty())
                .cloned()
                .unwrap_or_else(|| fallback.to_string())
        };
        Self {
            name: pick(user.map(|u| &u.name), "Customer"),
            email: pick(user.map(|u| &u.email), "customer@example.com"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    Succeeded,
    Processing,
    RequiresAction,
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresCapture,
    Canceled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: IntentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessorError {
    /// The processor refused the card or the request; message is user-facing
    #[error("{message}")]
    Declined { code: Option<String>, message: String },

    #[error("payment processor unreachable: {0}")]
    Transport(String),
}

/// Confirms a payment intent with card data on the processor's side
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn confirm_card_payment(
        &self,
        secret: &ClientSecret,
        card: &CardDetails,
        billing: &BillingDetails,
    ) -> Result<PaymentIntent, ProcessorError>;
}
