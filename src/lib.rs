//! Client library for the staybook property-booking backend: typed API
//! access, a persisted session, stay selection and pricing, card payment
//! through a processor, and per-screen view state.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod payment;
pub mod session;
pub mod stay;
pub mod views;
