use crate::api::types::NewBooking;
use crate::api::BookingApi;
use crate::error::{ApiError, CONNECTIVITY_MESSAGE};
use crate::models::{Booking, Property};
use crate::session::SessionContext;
use crate::stay::{CalendarMonth, DateSelection, GuestCounter, Quote, SelectionError};
use crate::views::{expire_if_unauthorized, is_not_found, Loaded, Navigate, Notice};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

const LOAD_FAILED: &str = "Unable to load property details. Please try again later.";
const BOOKING_FAILED: &str = "Booking failed. Please try again.";
const BOOKING_REFUSED: &str = "Failed to create booking";
const BOOKING_CREATED: &str = "Booking created successfully";

/// Why "Book Now" was refused before contacting the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingValidation {
    #[error("Please select check-in and check-out dates")]
    MissingDates,
    #[error("Number of guests must be at least 1")]
    TooFewGuests,
    #[error("Maximum guests allowed for this property: {max}")]
    TooManyGuests { max: u32 },
    #[error("Please login to book a property")]
    NotSignedIn,
}

#[derive(Debug)]
pub enum BookOutcome {
    Created { booking: Booking, next: Navigate },
    /// `next` is set when the user has to leave the page
    Rejected { message: String, next: Option<Navigate> },
}

/// One property: pick dates and guests, see the price, book
pub struct AvailabilityView {
    api: Arc<dyn BookingApi>,
    session: SessionContext,
    property: Property,
    month: CalendarMonth,
    selection: DateSelection,
    guests: GuestCounter,
    notice: Notice,
}

impl AvailabilityView {
    pub async fn load(
        api: Arc<dyn BookingApi>,
        session: SessionContext,
        property_id: &str,
    ) -> Loaded<Self> {
        match api.get_property(property_id).await {
            Ok(Some(property)) => {
                debug!(property = %property.id, "Loaded property");
                Loaded::Ready(Self::with_property(api, session, property))
            }
            Ok(None) => Loaded::NotFound,
            Err(err) if is_not_found(&err) => Loaded::NotFound,
            Err(err) => {
                error!(error = %err, property = property_id, "Error fetching property");
                if expire_if_unauthorized(&session, &err).await {
                    Loaded::Redirect(Navigate::Login)
                } else {
                    Loaded::Failed(LOAD_FAILED.to_string())
                }
            }
        }
    }

    pub fn with_property(api: Arc<dyn BookingApi>, session: SessionContext, property: Property) -> Self {
        let guests = GuestCounter::new(property.max_guests);
        Self {
            api,
            session,
            property,
            month: CalendarMonth::default(),
            selection: DateSelection::new(),
            guests,
            notice: Notice::new(),
        }
    }

    /// Show a different month in the grid; the selection is kept
    pub fn with_month(mut self, month: CalendarMonth) -> Self {
        self.month = month;
        self
    }

    pub fn property(&self) -> &Property {
        &self.property
    }

    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    pub fn selection(&self) -> &DateSelection {
        &self.selection
    }

    pub fn guests(&self) -> u32 {
        self.guests.count()
    }

    pub fn notice(&self) -> &Notice {
        &self.notice
    }

    fn surface<T>(&self, result: Result<T, SelectionError>) -> Result<T, SelectionError> {
        if let Err(err) = &result {
            debug!(error = %err, "Date selection rejected");
            self.notice.show(err.to_string());
        }
        result
    }

    fn day(&self, day: u32) -> Result<chrono::NaiveDate, SelectionError> {
        self.month
            .date(day)
            .ok_or_else(|| SelectionError::InvalidDate(format!("{} has no day {day}", self.month)))
    }

    /// Grid click, interpreted by the current selecting mode
    pub fn pick_day(&mut self, day: u32) -> Result<(), SelectionError> {
        let result = self.day(day).and_then(|date| self.selection.pick(date));
        self.surface(result)
    }

    /// Click in the check-out grid
    pub fn pick_check_out_day(&mut self, day: u32) -> Result<(), SelectionError> {
        let result = self.day(day).and_then(|date| self.selection.pick_check_out(date));
        self.surface(result)
    }

    pub fn set_check_in(&mut self, raw: &str) -> Result<(), SelectionError> {
        let result = self.selection.set_check_in(raw);
        self.surface(result)
    }

    pub fn set_check_out(&mut self, raw: &str) -> Result<(), SelectionError> {
        let result = self.selection.set_check_out(raw);
        self.surface(result)
    }

    pub fn add_guest(&mut self) -> bool {
        self.guests.increment()
    }

    pub fn remove_guest(&mut self) -> bool {
        self.guests.decrement()
    }

    /// Typed guest count; range is checked by [`Self::draft`]
    pub fn set_guests(&mut self, count: u32) {
        self.guests.set(count);
    }

    /// Recomputed from the current dates on every call
    pub fn quote(&self) -> Option<Quote> {
        self.selection.quote(self.property.price_per_night)
    }

    /// Request body, if the form passes the local checks
    pub fn draft(&self) -> Result<NewBooking, BookingValidation> {
        let (check_in, check_out) = self
            .selection
            .range()
            .ok_or(BookingValidation::MissingDates)?;

        let guests = self.guests.count();
        if guests < 1 {
            return Err(BookingValidation::TooFewGuests);
        }
        if guests > self.property.max_guests {
            return Err(BookingValidation::TooManyGuests { max: self.property.max_guests });
        }

        Ok(NewBooking {
            property_id: self.property.id.clone(),
            check_in,
            check_out,
            guests,
        })
    }

    fn reject(&self, message: String, next: Option<Navigate>) -> BookOutcome {
        self.notice.show(message.clone());
        BookOutcome::Rejected { message, next }
    }

    /// "Book Now"
    pub async fn book(&self) -> BookOutcome {
        let request = match self.draft() {
            Ok(request) => request,
            Err(invalid) => return self.reject(invalid.to_string(), None),
        };

        let Some(token) = self.session.token().await else {
            return self.reject(BookingValidation::NotSignedIn.to_string(), Some(Navigate::Login));
        };

        match self.api.create_booking(&token, &request).await {
            Ok(booking) => {
                info!(booking = %booking.id, property = %request.property_id, "Booking created");
                self.notice.show(BOOKING_CREATED);
                let next = Navigate::Payment { booking_id: booking.id.clone() };
                BookOutcome::Created { booking, next }
            }
            Err(err) => {
                error!(error = %err, "Booking error");
                let fallback = if matches!(err, ApiError::Rejected { .. }) {
                    BOOKING_REFUSED
                } else {
                    BOOKING_FAILED
                };
                let message = err.user_message(fallback, CONNECTIVITY_MESSAGE);
                let next = expire_if_unauthorized(&self.session, &err)
                    .await
                    .then_some(Navigate::Login);
                self.reject(message, next)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{booking, date, property, FakeApi};
    use crate::models::Session;

    fn signed_in() -> SessionContext {
        SessionContext::in_memory(Some(Session { token: "tok".into(), user: None }))
    }

    fn view_with(api: Arc<FakeApi>, session: SessionContext) -> AvailabilityView {
        AvailabilityView::with_property(api, session, property("p1", "Ocean View", 100.0, 3))
    }

    #[tokio::test]
    async fn grid_and_text_paths_price_the_same() {
        let api = Arc::new(FakeApi::new());
        let mut grid = view_with(api.clone(), signed_in());
        grid.pick_day(5).unwrap();
        grid.pick_day(8).unwrap();

        let mut typed = view_with(api, signed_in());
        typed.set_check_in("2025-09-05").unwrap();
        typed.set_check_out("2025-09-08").unwrap();

        let quote = grid.quote().unwrap();
        assert_eq!(quote, typed.quote().unwrap());
        assert_eq!(quote.nights, 3);
        assert_eq!(quote.total, 300.0);
    }

    #[tokio::test]
    async fn rejected_pick_raises_notice_and_changes_nothing() {
        let mut view = view_with(Arc::new(FakeApi::new()), signed_in());
        view.pick_day(10).unwrap();
        let before = view.selection().clone();

        assert!(view.pick_day(10).is_err());
        assert_eq!(view.selection(), &before);
        assert_eq!(
            view.notice().current().as_deref(),
            Some("Check-out date must be after check-in date")
        );
    }

    #[tokio::test]
    async fn day_outside_month_is_rejected() {
        let mut view = view_with(Arc::new(FakeApi::new()), signed_in());
        assert!(matches!(view.pick_day(31), Err(SelectionError::InvalidDate(_))));
        assert_eq!(view.selection(), &DateSelection::new());
    }

    #[tokio::test]
    async fn guests_are_clamped() {
        let mut view = view_with(Arc::new(FakeApi::new()), signed_in());
        assert_eq!(view.guests(), 1);
        assert!(!view.remove_guest());
        assert!(view.add_guest());
        assert!(view.add_guest());
        assert!(!view.add_guest());
        assert_eq!(view.guests(), 3);
    }

    #[tokio::test]
    async fn missing_dates_block_booking_without_request() {
        let api = Arc::new(FakeApi::new());
        let view = view_with(api.clone(), signed_in());
        match view.book().await {
            BookOutcome::Rejected { message, next } => {
                assert_eq!(message, "Please select check-in and check-out dates");
                assert_eq!(next, None);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn typed_guest_count_outside_capacity_is_refused() {
        let api = Arc::new(FakeApi::new());
        let mut view = view_with(api.clone(), signed_in());
        view.pick_day(5).unwrap();
        view.pick_day(8).unwrap();

        for (typed, expected) in [
            (9, "Maximum guests allowed for this property: 3"),
            (0, "Number of guests must be at least 1"),
        ] {
            view.set_guests(typed);
            assert_eq!(view.guests(), typed);
            match view.book().await {
                BookOutcome::Rejected { message, next } => {
                    assert_eq!(message, expected);
                    assert_eq!(next, None);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(api.calls().is_empty());
        assert!(api.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_capacity_property_fails_guest_check() {
        let api = Arc::new(FakeApi::new());
        let mut view = AvailabilityView::with_property(
            api,
            signed_in(),
            property("p0", "Closed", 50.0, 0),
        );
        view.pick_day(1).unwrap();
        view.pick_day(2).unwrap();
        assert_eq!(view.draft(), Err(BookingValidation::TooFewGuests));
    }

    #[tokio::test]
    async fn signed_out_user_is_sent_to_login() {
        let api = Arc::new(FakeApi::new());
        let mut view = view_with(api.clone(), SessionContext::in_memory(None));
        view.pick_day(5).unwrap();
        view.pick_day(8).unwrap();

        match view.book().await {
            BookOutcome::Rejected { message, next } => {
                assert_eq!(message, "Please login to book a property");
                assert_eq!(next, Some(Navigate::Login));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn successful_booking_goes_to_payment() {
        let api = Arc::new(
            FakeApi::new().on_create(Ok(booking("b1", "2025-09-05", "2025-09-08", 300.0))),
        );
        let mut view = view_with(api.clone(), signed_in());
        view.pick_day(5).unwrap();
        view.pick_day(8).unwrap();
        view.add_guest();

        match view.book().await {
            BookOutcome::Created { booking, next } => {
                assert_eq!(booking.id, "b1");
                assert_eq!(next, Navigate::Payment { booking_id: "b1".into() });
            }
            other => panic!("unexpected {other:?}"),
        }

        let sent = api.created.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![NewBooking {
                property_id: "p1".into(),
                check_in: date("2025-09-05"),
                check_out: date("2025-09-08"),
                guests: 2,
            }]
        );
    }

    #[tokio::test]
    async fn server_message_is_shown_verbatim() {
        let api = Arc::new(FakeApi::new().on_create(Err(ApiError::Server {
            status: 409,
            message: Some("Dates unavailable".into()),
        })));
        let mut view = view_with(api, signed_in());
        view.pick_day(5).unwrap();
        view.pick_day(8).unwrap();

        match view.book().await {
            BookOutcome::Rejected { message, next } => {
                assert_eq!(message, "Dates unavailable");
                assert_eq!(next, None);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(view.notice().current().as_deref(), Some("Dates unavailable"));
    }

    #[tokio::test]
    async fn unauthorized_booking_expires_session() {
        let api = Arc::new(
            FakeApi::new().on_create(Err(ApiError::Unauthorized { message: None })),
        );
        let session = signed_in();
        let mut view = view_with(api, session.clone());
        view.pick_day(5).unwrap();
        view.pick_day(8).unwrap();

        match view.book().await {
            BookOutcome::Rejected { message, next } => {
                assert_eq!(message, BOOKING_FAILED);
                assert_eq!(next, Some(Navigate::Login));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!session.is_signed_in().await);
    }

    #[tokio::test]
    async fn offline_booking_stays_on_page() {
        let api = Arc::new(
            FakeApi::new().on_create(Err(ApiError::Connectivity("refused".into()))),
        );
        let mut view = view_with(api, signed_in());
        view.set_check_in("2025-09-05").unwrap();
        view.set_check_out("2025-09-06").unwrap();

        match view.book().await {
            BookOutcome::Rejected { message, next } => {
                assert_eq!(message, CONNECTIVITY_MESSAGE);
                assert_eq!(next, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_maps_absence_and_auth() {
        let api = Arc::new(
            FakeApi::new()
                .on_property(Ok(None))
                .on_property(Err(ApiError::Server { status: 404, message: None }))
                .on_property(Err(ApiError::Unauthorized { message: None })),
        );
        let session = signed_in();

        assert!(matches!(
            AvailabilityView::load(api.clone(), session.clone(), "p1").await,
            Loaded::NotFound
        ));
        assert!(matches!(
            AvailabilityView::load(api.clone(), session.clone(), "p1").await,
            Loaded::NotFound
        ));
        assert!(matches!(
            AvailabilityView::load(api, session.clone(), "p1").await,
            Loaded::Redirect(Navigate::Login)
        ));
        assert!(!session.is_signed_in().await);
    }
}
