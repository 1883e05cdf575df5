//! KrishiMitra - Farmer Assistance Backend
//!
//! Model-backed crop tools (market analysis, disease diagnosis, crop
//! recommendation, schemes, e-learning, chatbot), a static weather tool,
//! voice input, read-aloud and farmer profile storage behind an axum API.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
