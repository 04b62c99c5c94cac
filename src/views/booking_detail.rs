use crate::api::types::PaymentUpdate;
use crate::api::BookingApi;
use crate::models::{Booking, PaymentStatus};
use crate::payment::{BillingDetails, ClientSecret, PaymentIntent};
use crate::session::SessionContext;
use crate::views::{expire_if_unauthorized, is_not_found, Loaded, Navigate, PaymentModal};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

const LOAD_FAILED: &str = "Unable to load booking details. Please try again later.";

/// Why the payment modal could not be opened
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentSetupError {
    #[error("This booking has no outstanding payment")]
    NotPayable,
    #[error("Please login to continue")]
    NotSignedIn,
    #[error("Failed to initialize payment. Contact support.")]
    SecretUnavailable,
    #[error("Invalid payment configuration. Please try again.")]
    MalformedSecret,
}

/// A single booking and the way to pay for it
pub struct BookingDetailView {
    api: Arc<dyn BookingApi>,
    session: SessionContext,
    booking: Booking,
}

impl BookingDetailView {
    pub async fn load(
        api: Arc<dyn BookingApi>,
        session: SessionContext,
        booking_id: &str,
    ) -> Loaded<Self> {
        let Some(token) = session.token().await else {
            return Loaded::Redirect(Navigate::Login);
        };

        match api.get_booking(&token, booking_id).await {
            Ok(Some(booking)) => {
                debug!(booking = %booking.id, status = %booking.status, payment = %booking.payment_status, "Loaded booking");
                Loaded::Ready(Self { api, session, booking })
            }
            Ok(None) => Loaded::NotFound,
            Err(err) if is_not_found(&err) => Loaded::NotFound,
            Err(err) => {
                error!(error = %err, booking = booking_id, "Error fetching booking");
                if expire_if_unauthorized(&session, &err).await {
                    Loaded::Redirect(Navigate::Login)
                } else {
                    Loaded::Failed(LOAD_FAILED.to_string())
                }
            }
        }
    }

    pub fn booking(&self) -> &Booking {
        &self.booking
    }

    /// Pay button is offered only for unpaid bookings with an intent
    pub fn can_pay(&self) -> bool {
        self.booking.awaits_payment()
    }

    /// Fetch and check the client secret, then open card entry
    pub async fn open_payment(&self) -> Result<PaymentModal, PaymentSetupError> {
        let intent_id = match self.booking.stripe_payment_intent_id.as_deref() {
            Some(id) if self.can_pay() => id,
            _ => return Err(PaymentSetupError::NotPayable),
        };
        let token = self.session.token().await.ok_or(PaymentSetupError::NotSignedIn)?;

        let raw = self
            .api
            .payment_intent_secret(&token, &self.booking.id, intent_id)
            .await
            .map_err(|err| {
                error!(error = %err, booking = %self.booking.id, "Failed to fetch client secret");
                PaymentSetupError::SecretUnavailable
            })?;

        let secret = ClientSecret::parse(&raw).map_err(|_| {
            warn!(booking = %self.booking.id, "Backend returned a malformed client secret");
            PaymentSetupError::MalformedSecret
        })?;

        Ok(PaymentModal::new(
            self.booking.id.clone(),
            self.booking.total_amount,
            secret,
            BillingDetails::for_booking(&self.booking),
        ))
    }

    /// Record a successful charge: mark paid, confirm, then reload.
    ///
    /// Returns true when both backend updates went through and the modal can
    /// close. Failures are logged only and the shown booking is left as is.
    pub async fn complete_payment(&mut self, intent: &PaymentIntent) -> bool {
        let Some(token) = self.session.token().await else {
            error!(booking = %self.booking.id, "No session while recording payment");
            return false;
        };
        let id = self.booking.id.clone();

        let update = PaymentUpdate {
            payment_status: PaymentStatus::Paid,
            stripe_payment_intent_id: intent.id.clone(),
        };
        if let Err(err) = self.api.update_payment(&token, &id, &update).await {
            error!(error = %err, booking = %id, "Error marking booking as paid");
            return false;
        }

        if let Err(err) = self.api.confirm_booking(&token, &id).await {
            error!(error = %err, booking = %id, "Error confirming booking");
            return false;
        }
        info!(booking = %id, intent = %intent.id, "Booking paid and confirmed");

        match self.api.get_booking(&token, &id).await {
            Ok(Some(booking)) => self.booking = booking,
            Ok(None) => warn!(booking = %id, "Booking vanished after confirmation"),
            Err(err) => error!(error = %err, booking = %id, "Error refreshing booking"),
        }
        true
    }
}
