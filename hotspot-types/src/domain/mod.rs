//! Domain models for the hotspot portal.

pub mod fee;
pub mod method;
pub mod money;
pub mod order;
pub mod outcome;
pub mod token;

pub use fee::{Charges, FeeVatCalculator, VatRate};
pub use method::{FeePolicy, PaymentMethod};
pub use money::Money;
pub use order::{LineItem, OrderId, PaymentOrder};
pub use outcome::TransactionOutcome;
pub use token::{SessionToken, TokenWindow, parse_timestamp};
