use crate::payment::{
    BillingDetails, CardDetails, ClientSecret, IntentStatus, PaymentIntent, PaymentProcessor,
    ProcessorError,
};
use tracing::{info, warn};

const PROCESSING_FAILED: &str = "Payment processing failed. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Charge went through; hand the intent to the success callback
    Succeeded(PaymentIntent),
    /// Shown inline; the modal stays open for another attempt
    Declined(String),
    /// Processor finished without charging (e.g. extra authentication needed)
    Incomplete(IntentStatus),
}

/// Card entry for one booking, only constructed with a well-formed secret
#[derive(Debug)]
pub struct PaymentModal {
    booking_id: String,
    amount: f64,
    secret: ClientSecret,
    billing: BillingDetails,
    error: Option<String>,
}

impl PaymentModal {
    pub(crate) fn new(
        booking_id: String,
        amount: f64,
        secret: ClientSecret,
        billing: BillingDetails,
    ) -> Self {
        Self { booking_id, amount, secret, billing, error: None }
    }

    pub fn booking_id(&self) -> &str {
        &self.booking_id
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn billing(&self) -> &BillingDetails {
        &self.billing
    }

    /// Inline error from the last attempt
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn submit(&mut self, processor: &dyn PaymentProcessor, card: &CardDetails) -> SubmitOutcome {
        self.error = None;

        match processor.confirm_card_payment(&self.secret, card, &self.billing).await {
            Ok(intent) if intent.status == IntentStatus::Succeeded => {
                info!(booking = %self.booking_id, intent = %intent.id, "Payment succeeded");
                SubmitOutcome::Succeeded(intent)
            }
            Ok(intent) => {
                warn!(booking = %self.booking_id, status = ?intent.status, "Payment not completed");
                SubmitOutcome::Incomplete(intent.status)
            }
            Err(err) => {
                warn!(booking = %self.booking_id, error = %err, "Payment error");
                let message = match err {
                    ProcessorError::Declined { message, .. } => message,
                    ProcessorError::Transport(_) => PROCESSING_FAILED.to_string(),
                };
                self.error = Some(message.clone());
                SubmitOutcome::Declined(message)
            }
        }
    }
}
