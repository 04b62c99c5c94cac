//! Scripted in-memory backend for view tests.

use crate::api::traits::BookingApi;
use crate::api::types::{LoginData, LoginRequest, NewBooking, PaymentUpdate, RegisterRequest};
use crate::error::ApiResult;
use crate::models::{Address, Booking, BookingStatus, PaymentStatus, Property, PropertyRef};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::VecDeque;
use std::sync::Mutex;

type Script<T> = Mutex<VecDeque<ApiResult<T>>>;

/// Each operation answers from its own queue, in push order
#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<String>>,
    login: Script<LoginData>,
    register: Script<()>,
    properties: Script<Vec<Property>>,
    property: Script<Option<Property>>,
    create: Script<Booking>,
    booking: Script<Option<Booking>>,
    bookings: Script<Vec<Booking>>,
    update: Script<Option<Booking>>,
    confirm: Script<Option<Booking>>,
    secret: Script<String>,
    pub created: Mutex<Vec<NewBooking>>,
    pub updates: Mutex<Vec<PaymentUpdate>>,
}

fn next<T>(script: &Script<T>, what: &str) -> ApiResult<T> {
    script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| panic!("unexpected call: {what}"))
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn on_login(self, result: ApiResult<LoginData>) -> Self {
        self.login.lock().unwrap().push_back(result);
        self
    }

    pub fn on_register(self, result: ApiResult<()>) -> Self {
        self.register.lock().unwrap().push_back(result);
        self
    }

    pub fn on_properties(self, result: ApiResult<Vec<Property>>) -> Self {
        self.properties.lock().unwrap().push_back(result);
        self
    }

    pub fn on_property(self, result: ApiResult<Option<Property>>) -> Self {
        self.property.lock().unwrap().push_back(result);
        self
    }

    pub fn on_create(self, result: ApiResult<Booking>) -> Self {
        self.create.lock().unwrap().push_back(result);
        self
    }

    pub fn on_booking(self, result: ApiResult<Option<Booking>>) -> Self {
        self.booking.lock().unwrap().push_back(result);
        self
    }

    pub fn on_bookings(self, result: ApiResult<Vec<Booking>>) -> Self {
        self.bookings.lock().unwrap().push_back(result);
        self
    }

    pub fn on_update(self, result: ApiResult<Option<Booking>>) -> Self {
        self.update.lock().unwrap().push_back(result);
        self
    }

    pub fn on_confirm(self, result: ApiResult<Option<Booking>>) -> Self {
        self.confirm.lock().unwrap().push_back(result);
        self
    }

    pub fn on_secret(self, result: ApiResult<String>) -> Self {
        self.secret.lock().unwrap().push_back(result);
        self
    }
}

#[async_trait]
impl BookingApi for FakeApi {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginData> {
        self.record(format!("POST /api/auth/login {}", request.email));
        next(&self.login, "login")
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<()> {
        self.record(format!("POST /api/auth/register {}", request.email));
        next(&self.register, "register")
    }

    async fn list_properties(&self) -> ApiResult<Vec<Property>> {
        self.record("GET /api/properties".into());
        next(&self.properties, "list_properties")
    }

    async fn get_property(&self, id: &str) -> ApiResult<Option<Property>> {
        self.record(format!("GET /api/properties/{id}"));
        next(&self.property, "get_property")
    }

    async fn create_booking(&self, _token: &str, request: &NewBooking) -> ApiResult<Booking> {
        self.record("POST /api/bookings".into());
        self.created.lock().unwrap().push(request.clone());
        next(&self.create, "create_booking")
    }

    async fn get_booking(&self, _token: &str, id: &str) -> ApiResult<Option<Booking>> {
        self.record(format!("GET /api/bookings/{id}"));
        next(&self.booking, "get_booking")
    }

    async fn my_bookings(&self, _token: &str) -> ApiResult<Vec<Booking>> {
        self.record("GET /api/bookings/my-bookings".into());
        next(&self.bookings, "my_bookings")
    }

    async fn update_payment(
        &self,
        _token: &str,
        id: &str,
        update: &PaymentUpdate,
    ) -> ApiResult<Option<Booking>> {
        self.record(format!("PATCH /api/bookings/{id}"));
        self.updates.lock().unwrap().push(update.clone());
        next(&self.update, "update_payment")
    }

    async fn confirm_booking(&self, _token: &str, id: &str) -> ApiResult<Option<Booking>> {
        self.record(format!("POST /api/bookings/{id}/confirm"));
        next(&self.confirm, "confirm_booking")
    }

    async fn payment_intent_secret(
        &self,
        _token: &str,
        booking_id: &str,
        payment_intent_id: &str,
    ) -> ApiResult<String> {
        self.record(format!(
            "GET /api/bookings/{booking_id}/payment-intent-secret?paymentIntentId={payment_intent_id}"
        ));
        next(&self.secret, "payment_intent_secret")
    }
}

pub fn property(id: &str, title: &str, price_per_night: f64, max_guests: u32) -> Property {
    Property {
        id: id.into(),
        title: title.into(),
        description: String::new(),
        price_per_night,
        address: Address::default(),
        max_guests,
        images: Vec::new(),
        amenities: Vec::new(),
    }
}

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

pub fn booking(id: &str, check_in: &str, check_out: &str, total_amount: f64) -> Booking {
    Booking {
        id: id.into(),
        property: Some(PropertyRef::Id("p1".into())),
        check_in: date(check_in),
        check_out: date(check_out),
        guests: 2,
        total_amount,
        status: BookingStatus::Pending,
        payment_status: PaymentStatus::Pending,
        stripe_payment_intent_id: Some("pi_123".into()),
        user: None,
    }
}
