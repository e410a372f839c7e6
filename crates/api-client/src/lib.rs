//! Typed async client for the MarketMate backend.
//!
//! Wraps the four remote endpoints the session store and campaign wizard
//! depend on (`/login`, `/signup`, `/generate_email`, `/send_email`) and
//! normalizes every failure — transport error, non-2xx status, undecodable
//! body — into [`marketmate_core::MarketMateError::Remote`].

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{GenerateRequest, SendRequest};
