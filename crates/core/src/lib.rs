//! Domain types shared by every restock crate. No I/O lives here.

pub mod error;
pub mod id;
pub mod urgency;

pub use error::{DomainError, DomainResult, ErrorKind};
pub use id::{CycleId, Sku, VendorId};
pub use urgency::UrgencyLevel;
