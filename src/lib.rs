//! Snake Env - a grid Snake game exposing its state to learning agents
//!
//! This library provides:
//! - Core game engine (game module)
//! - Grid and feature-vector state encodings plus a headless driver (rl module)
//! - TUI rendering and keyboard input (render, input modules)
//! - Session statistics (metrics module)
//! - The human play loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
