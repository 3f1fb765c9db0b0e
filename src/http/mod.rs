//! HTTP transport for the JSON-RPC engine
//!
//! One request per `POST /rpc` body, one response per HTTP response body. Protocol errors travel
//! with status 200; only failures before dispatch use transport-level statuses.

pub mod client;
pub mod handlers;
