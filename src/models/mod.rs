use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod stay_date;

/// Postal location of a listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Address {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [&self.city, &self.state, &self.country]
            .into_iter()
            .map(String::as_str)
            .filter(|part| !part.is_empty())
            .collect();
        f.write_str(&parts.join(", "))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyImage {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// A bookable listing as served by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price_per_night: f64,
    #[serde(default)]
    pub address: Address,
    #[serde(default = "default_max_guests")]
    pub max_guests: u32,
    #[serde(default)]
    pub images: Vec<PropertyImage>,
    #[serde(default)]
    pub amenities: Vec<String>,
}

fn default_max_guests() -> u32 {
    1
}

impl Property {
    /// URL of the first image with a non-empty url, if any
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(|image| image.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

/// Profile snapshot returned on login and embedded in bookings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bookings carry either the property id or the populated property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PropertyRef {
    Id(String),
    Embedded(Box<Property>),
}

impl PropertyRef {
    pub fn id(&self) -> &str {
        match self {
            PropertyRef::Id(id) => id,
            PropertyRef::Embedded(property) => &property.id,
        }
    }

    pub fn property(&self) -> Option<&Property> {
        match self {
            PropertyRef::Id(_) => None,
            PropertyRef::Embedded(property) => Some(property),
        }
    }
}

/// A reservation of a property for a date range
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub property: Option<PropertyRef>,
    #[serde(with = "stay_date")]
    pub check_in: NaiveDate,
    #[serde(with = "stay_date")]
    pub check_out: NaiveDate,
    pub guests: u32,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub stripe_payment_intent_id: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

impl Booking {
    /// Same rounding as the price quote; not positive for a reversed stay
    pub fn nights(&self) -> i64 {
        crate::stay::pricing::nights_between(self.check_in, self.check_out)
    }

    /// Payment can be started only for an unpaid booking that has an intent
    pub fn awaits_payment(&self) -> bool {
        self.payment_status == PaymentStatus::Pending
            && self
                .stripe_payment_intent_id
                .as_deref()
                .is_some_and(|id| !id.is_empty())
    }

    pub fn is_confirmed(&self) -> bool {
        self.payment_status == PaymentStatus::Paid && self.status == BookingStatus::Confirmed
    }

    pub fn property_title(&self) -> Option<&str> {
        self.property
            .as_ref()
            .and_then(PropertyRef::property)
            .map(|property| property.title.as_str())
    }
}

/// Authenticated identity persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn property_decodes_backend_shape() {
        let property: Property = serde_json::from_value(json!({
            "_id": "p1",
            "title": "Ocean View",
            "description": "Sea breeze",
            "pricePerNight": 100,
            "address": { "city": "Lisbon", "state": "LX", "country": "PT" },
            "maxGuests": 4,
            "images": [{ "url": "https://img/1.jpg", "alt": "front" }],
            "amenities": ["Wifi", "Parking"]
        }))
        .unwrap();

        assert_eq!(property.id, "p1");
        assert_eq!(property.price_per_night, 100.0);
        assert_eq!(property.max_guests, 4);
        assert_eq!(property.primary_image(), Some("https://img/1.jpg"));
        assert_eq!(property.address.to_string(), "Lisbon, LX, PT");
    }

    #[test]
    fn booking_decodes_iso_datetimes_and_embedded_property() {
        let booking: Booking = serde_json::from_value(json!({
            "_id": "b1",
            "property": { "_id": "p1", "title": "City Loft", "pricePerNight": 80, "maxGuests": 2 },
            "checkIn": "2025-09-05T00:00:00.000Z",
            "checkOut": "2025-09-08",
            "guests": 2,
            "totalAmount": 240,
            "status": "pending",
            "paymentStatus": "pending",
            "stripePaymentIntentId": "pi_123"
        }))
        .unwrap();

        assert_eq!(booking.nights(), 3);
        assert_eq!(booking.property_title(), Some("City Loft"));
        assert_eq!(booking.property.as_ref().map(PropertyRef::id), Some("p1"));
        assert!(booking.awaits_payment());
        assert!(!booking.is_confirmed());
    }

    #[test]
    fn reversed_stay_has_no_nights() {
        let booking: Booking = serde_json::from_value(json!({
            "_id": "b2",
            "property": "p1",
            "checkIn": "2025-09-08",
            "checkOut": "2025-09-05",
            "guests": 1,
            "totalAmount": 0,
            "status": "pending",
            "paymentStatus": "pending"
        }))
        .unwrap();

        assert_eq!(booking.nights(), -3);
    }

    #[test]
    fn booking_with_plain_property_id() {
        let booking: Booking = serde_json::from_value(json!({
            "_id": "b2",
            "property": "p9",
            "checkIn": "2025-09-01",
            "checkOut": "2025-09-02",
            "guests": 1,
            "status": "confirmed",
            "paymentStatus": "paid"
        }))
        .unwrap();

        assert_eq!(booking.property, Some(PropertyRef::Id("p9".into())));
        assert!(booking.is_confirmed());
        assert!(!booking.awaits_payment());
    }
}
