//! Domain models

pub mod image;
pub mod portfolio;
pub mod record;

pub use image::{ImageEntry, PendingId, PendingPayload};
pub use portfolio::{PortfolioDraft, PortfolioRecord};
pub use record::Record;
