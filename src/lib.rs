//! Ocean Snake: a tick-driven grid snake engine and the terminal front end
//! that plays it.
//!
//! [`engine::SnakeEngine`] is the embeddable core. It owns one round, arms a
//! [`ticker::Ticker`] while running and reports every change to a
//! [`listener::Listener`] as an owned [`engine::Snapshot`].

pub mod app;
pub mod config;
pub mod engine;
pub mod food;
pub mod game;
pub mod input;
pub mod listener;
pub mod logging;
pub mod recorder;
pub mod renderer;
pub mod session;
pub mod snake;
pub mod terminal_runtime;
pub mod theme;
pub mod ticker;
pub mod ui;
