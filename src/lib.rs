//! NVC Facilitator - Conversational Nonviolent Communication guidance
//!
//! This crate walks a person through the four NVC components (observation,
//! feeling, need, request) one message at a time, using keyword detection
//! and, when configured, an LLM that labels the stage and writes the reply.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
