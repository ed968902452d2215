//! Folio Admin Library
//!
//! The operator side of the portfolio console: an [`EditSession`] holds one
//! add/edit form, the [`SubmissionCoordinator`] saves it, and the
//! [`PortfolioCatalog`] lists and deletes what was saved.

pub mod catalog;
pub mod coordinator;
pub mod error;
pub mod session;
mod uploads;

pub use catalog::{CatalogSubscription, PortfolioCatalog};
pub use coordinator::{SaveState, SubmissionCoordinator};
pub use error::{CatalogError, SubmitError};
pub use session::{EditSession, SessionMode};
