//! Platform-independent core of the school admin panels.
//!
//! Everything here compiles for both native targets and `wasm32`, so the
//! browser frontend and the native unit tests share one implementation of
//! the envelope, the endpoint table, the modal and table state machines, the
//! score rules and the bulk results upload flow.

pub mod bulk;
pub mod config;
pub mod csrf;
pub mod envelope;
pub mod form;
pub mod modal;
pub mod models;
pub mod resource;
pub mod score;
pub mod submit;
pub mod table;
pub mod term_dates;
pub mod upload;
pub mod validation;

pub use envelope::{ApiError, ListPage, MutationResult, Pagination};
pub use models::Entity;
pub use resource::{Action, EntityKind, HttpMethod};

#[cfg(test)]
pub(crate) mod test_support;
