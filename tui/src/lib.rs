//! Ticklist TUI - Terminal surface for the ticklist engine
//!
//! Full-screen rendering of a [`ticklist_core::Session`]: a bordered task
//! list with per-row check-off and deletion animations, live countdowns,
//! and ten switchable color themes.
//!
//! # Architecture
//!
//! - **App**: `tokio::select!` loop over terminal events and the tick deadline
//! - **Input**: crossterm key events to [`ticklist_core::KeyInput`]
//! - **Theme**: Palette catalog and style mapping
//! - **View**: Pure drawing of the session into a frame

pub mod app;
pub mod input;
pub mod theme;
pub mod view;

pub use app::App;
