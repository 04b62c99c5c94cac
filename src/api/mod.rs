pub mod client;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use client::HttpApi;
pub use traits::BookingApi;
