use crate::payment::processor::{
    BillingDetails, CardDetails, PaymentIntent, PaymentProcessor, ProcessorError,
};
use crate::payment::secret::ClientSecret;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const DECLINED_FALLBACK: &str = "Your card could not be charged.";

#[derive(Debug, Default, Deserialize)]
struct StripeErrorBody {
    #[serde(default)]
    error: StripeError,
}

#[derive(Debug, Default, Deserialize)]
struct StripeError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaymentMethod {
    id: String,
}

/// Client-side confirmation against Stripe's API using a publishable key
pub struct StripeProcessor {
    client: Client,
    api_base: String,
    publishable_key: String,
}

impl StripeProcessor {
    pub fn new(api_base: &str, publishable_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create payment processor client")?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            publishable_key: publishable_key.to_string(),
        })
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<T, ProcessorError> {
        let response = self
            .client
            .post(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.publishable_key)
            .form(form)
            .send()
            .await
            .map_err(|err| ProcessorError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ProcessorError::Transport(err.to_string()))?;
        debug!(%status, path, "Payment processor responded");

        if !status.is_success() {
            return Err(declined(&body));
        }
        serde_json::from_str(&body).map_err(|err| ProcessorError::Transport(err.to_string()))
    }
}

fn declined(body: &str) -> ProcessorError {
    let error = serde_json::from_str::<StripeErrorBody>(body)
        .unwrap_or_default()
        .error;
    warn!(code = error.code.as_deref().unwrap_or(""), "Payment declined");
    ProcessorError::Declined {
        code: error.code,
        message: error
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DECLINED_FALLBACK.to_string()),
    }
}

#[async_trait]
impl PaymentProcessor for StripeProcessor {
    async fn confirm_card_payment(
        &self,
        secret: &ClientSecret,
        card: &CardDetails,
        billing: &BillingDetails,
    ) -> Result<PaymentIntent, ProcessorError> {
        let method: PaymentMethod = self
            .post_form(
                "/v1/payment_methods",
                &[
                    ("type", "card".to_string()),
                    ("card[number]", card.number.clone()),
                    ("card[exp_month]", card.exp_month.to_string()),
                    ("card[exp_year]", card.exp_year.to_string()),
                    ("card[cvc]", card.cvc.clone()),
                    ("billing_details[name]", billing.name.clone()),
                    ("billing_details[email]", billing.email.clone()),
                ],
            )
            .await?;

        let intent: PaymentIntent = self
            .post_form(
                &format!("/v1/payment_intents/{}/confirm", secret.intent_id()),
                &[
                    ("client_secret", secret.expose().to_string()),
                    ("payment_method", method.id),
                ],
            )
            .await?;

        info!(intent = %intent.id, status = ?intent.status, "Payment intent confirmed");
        Ok(intent)
    }
}
