//! Classification of gateway-reported transaction statuses.

use serde::{Deserialize, Serialize};

/// Coarse classification of a gateway `transaction_status`.
///
/// Only `Settled` and `Captured` grant access. Everything else, including
/// denial, expiry and cancellation, collapses into `Pending` or `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionOutcome {
    Settled,
    Captured,
    Pending,
    Other(String),
}

impl TransactionOutcome {
    pub fn from_status(status: &str) -> Self {
        match status {
            "settlement" => TransactionOutcome::Settled,
            "capture" => TransactionOutcome::Captured,
            "pending" => TransactionOutcome::Pending,
            other => TransactionOutcome::Other(other.to_string()),
        }
    }

    pub fn is_authorizing(&self) -> bool {
        matches!(
            self,
            TransactionOutcome::Settled | TransactionOutcome::Captured
        )
    }
}

impl std::fmt::Display for TransactionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionOutcome::Settled => write!(f, "settlement"),
            TransactionOutcome::Captured => write!(f, "capture"),
            TransactionOutcome::Pending => write!(f, "pending"),
            TransactionOutcome::Other(status) => write!(f, "{}", status),
        }
    }
}
