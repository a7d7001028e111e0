//! Arena Server - authoritative simulation for a real-time arena shooter
//!
//! - `game`: the simulation, its tick scheduler and snapshot types
//! - `ws`: WebSocket gateway and wire protocol
//! - `http`: router with the health and WebSocket endpoints

pub mod app;
pub mod config;
pub mod game;
pub mod http;
pub mod util;
pub mod ws;
