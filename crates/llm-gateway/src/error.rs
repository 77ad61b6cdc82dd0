use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The provider rejected the credential (401/403), or none was available.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("rate limited by provider{}", retry_hint(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    /// Connect failure, timeout, or a body that could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// Any other non-2xx status, or a 2xx body with no usable completion.
    #[error("provider error{}: {message}", status_suffix(.status))]
    Provider { status: Option<u16>, message: String },
}

impl GatewayError {
    /// Whether trying the same request again later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Network(_))
    }

    /// Stable snake_case name, used in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::RateLimited { .. } => "rate_limited",
            Self::Network(_) => "network",
            Self::Provider { .. } => "provider",
        }
    }

    pub(crate) fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            status: None,
            message: message.into(),
        }
    }
}

fn retry_hint(secs: &Option<u64>) -> String {
    match secs {
        Some(s) => format!(" (retry after {s}s)"),
        None => String::new(),
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}
