//! Bindings for the catch-prediction HTTP API and the map server's point
//! query, plus the `{data, error, is_loading}` state the UI renders from.

pub mod client;
pub mod error;
pub mod query;
pub mod state;
pub mod types;

pub use client::*;
pub use error::*;
pub use query::*;
pub use state::*;
pub use types::*;
