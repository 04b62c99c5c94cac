use std::fmt;
use thiserror::Error;

const MARKER: &str = "_secret_";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed client secret")]
pub struct MalformedSecret;

/// Short-lived token authorizing completion of one payment intent.
///
/// Shaped `<intent id>_secret_<suffix>`; anything else is rejected before it
/// can reach the processor.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret {
    raw: String,
    split: usize,
}

impl ClientSecret {
    pub fn parse(raw: &str) -> Result<Self, MalformedSecret> {
        let raw = raw.trim();
        let split = raw.find(MARKER).ok_or(MalformedSecret)?;
        let suffix = &raw[split + MARKER.len()..];
        if split == 0 || suffix.is_empty() || raw.chars().any(char::is_whitespace) {
            return Err(MalformedSecret);
        }
        Ok(Self { raw: raw.to_string(), split })
    }

    /// Payment intent this secret belongs to
    pub fn intent_id(&self) -> &str {
        &self.raw[..self.split]
    }

    pub fn expose(&self) -> &str {
        &self.raw
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientSecret({}{MARKER}***)", self.intent_id())
    }
}
