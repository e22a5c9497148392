//! HTTP Adapter
//!
//! reqwest-backed [`HttpGateway`](crate::ports::HttpGateway) plus the shared
//! JSON decoding step that turns any provider reply into a
//! [`UnitOutcome`](crate::domain::UnitOutcome).

mod client;
pub mod lenient;

pub use client::{fetch_json, HttpConfig, ReqwestGateway};
