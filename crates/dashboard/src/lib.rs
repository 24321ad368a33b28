//! Application state for the catch dashboard: the active tab and its query,
//! selected layers, time steps and the player driving them.

pub mod config;
pub mod player;
pub mod species;
pub mod state;
pub mod time_steps;
pub mod toolbar;

pub use config::{ConfigError, DashboardConfig};
pub use player::{PlayState, TimeStepPlayer};
pub use state::{AppState, Derivation, Tab};
pub use time_steps::DateError;
