//! Inbound HTTP Adapter
//!
//! Thin axum endpoint exposing the cached snapshot as JSON.

mod routes;
mod server;

pub use routes::{create_router, TokensApiResponse, ERROR_LIMITATIONS, FETCH_ERROR, LIMITATIONS};
pub use server::{serve, ServerError};
