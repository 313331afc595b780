//! Chat companion: lexicon sentiment, rule-based intent matching and
//! per-session conversation tracking behind a small web API.

pub mod artifacts;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod intent;
pub mod orchestrator;
pub mod sentiment;
pub mod tokenizer;
pub mod web;
