//! Screen-level state. Each view owns its data, reaches the backend through
//! an injected [`BookingApi`], reads the shared [`SessionContext`], and
//! reports where to go next instead of routing itself.

pub mod auth;
pub mod availability;
pub mod booking_detail;
pub mod bookings;
pub mod listing;
pub mod notice;
pub mod payment;
pub mod scope;

pub use auth::{AuthView, SignupForm, SignupValidation};
pub use availability::{AvailabilityView, BookOutcome, BookingValidation};
pub use booking_detail::{BookingDetailView, PaymentSetupError};
pub use bookings::BookingListView;
pub use listing::ListingView;
pub use notice::Notice;
pub use payment::{PaymentModal, SubmitOutcome};
pub use scope::ViewScope;

use crate::error::ApiError;
use crate::session::SessionContext;

/// Where the user should be taken next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigate {
    Login,
    Home,
    Payment { booking_id: String },
}

/// Outcome of a view's initial fetch
#[derive(Debug)]
pub enum Loaded<T> {
    Ready(T),
    NotFound,
    Failed(String),
    Redirect(Navigate),
}

impl<T> Loaded<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Loaded::Ready(view) => Some(view),
            _ => None,
        }
    }
}

/// Drop the session on 401; true when the caller should send the user to login
async fn expire_if_unauthorized(session: &SessionContext, err: &ApiError) -> bool {
    if err.is_unauthorized() {
        session.invalidate().await;
        true
    } else {
        false
    }
}

fn is_not_found(err: &ApiError) -> bool {
    matches!(err, ApiError::Server { status: 404, .. })
}
