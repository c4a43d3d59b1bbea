//! Inventory snapshot model.
//!
//! Read-only views of inventory rows and vendor offers, as fetched from an
//! upstream data source once per evaluation cycle. Pure data plus validation
//! (no IO, no HTTP, no storage).

pub mod item;
pub mod offer;

pub use item::InventoryItem;
pub use offer::VendorOffer;
