//! HTTP transport shared by the probe, the resolver and the webhook notifier.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])

mod client;
mod error;
mod request;


pub use client::{MAX_BODY_BYTES, ReqwestClient};
pub use error::HttpError;
pub use request::{HttpClient, HttpRequest, HttpResponse};
