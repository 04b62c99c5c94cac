pub mod processor;
pub mod secret;
pub mod stripe;

pub use processor::{
    BillingDetails, CardDetails, IntentStatus, PaymentIntent, PaymentProcessor, ProcessorError,
};
pub use secret::{ClientSecret, MalformedSecret};
pub use stripe::StripeProcessor;
