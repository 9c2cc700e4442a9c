//! State encodings consumed by external learning agents
//!
//! Provides:
//! - 3-channel grid observations (body, head, food)
//! - 11-element danger / heading / food-direction feature vectors
//! - A headless environment wrapper stepping one tick per action

pub mod environment;
pub mod observation;

pub use environment::{RelativeAction, SnakeEnvironment, Transition};
pub use observation::{DangerFeatures, GridObservation};
