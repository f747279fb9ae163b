//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `nvc` - NVC stages, keyword classification, completion and summaries

pub mod nvc;
