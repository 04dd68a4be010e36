//! Four-lane falling-note rhythm engine.
//!
//! The engine is the judgment and scoring core of a lane-based rhythm game:
//! a tick-driven simulation of falling notes, timing-window classification
//! against a judgment line, and a combo-scored ledger. Rendering, audio,
//! input devices, and note charts are the host's business; it drives the
//! engine through [`game::gameplay::GameState`] and reads snapshots back.

pub mod app;
pub mod config;
pub mod game;
