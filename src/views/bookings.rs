use crate::api::BookingApi;
use crate::models::Booking;
use crate::session::SessionContext;
use crate::views::{expire_if_unauthorized, Loaded, Navigate};
use tracing::{error, info};

const LOAD_FAILED: &str = "Unable to load bookings. Please try again later.";

/// The signed-in user's bookings
#[derive(Debug)]
pub struct BookingListView {
    bookings: Vec<Booking>,
}

impl BookingListView {
    pub async fn load(api: &dyn BookingApi, session: &SessionContext) -> Loaded<Self> {
        let Some(token) = session.token().await else {
            return Loaded::Redirect(Navigate::Login);
        };

        match api.my_bookings(&token).await {
            Ok(bookings) => {
                info!(count = bookings.len(), "Loaded bookings");
                Loaded::Ready(Self { bookings })
            }
            Err(err) => {
                error!(error = %err, "Error fetching bookings");
                if expire_if_unauthorized(session, &err).await {
                    Loaded::Redirect(Navigate::Login)
                } else {
                    Loaded::Failed(LOAD_FAILED.to_string())
                }
            }
        }
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}
