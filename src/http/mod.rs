//! HTTP plumbing: transport seam, authenticated client and token refresh.
//!
//! - `transport`: request/response types, [`Transport`] trait, `reqwest` implementation
//! - `client`: [`ApiClient`] with bearer auth and refresh-and-retry on 401
//! - `refresh`: [`TokenRefresher`]

pub mod client;
pub mod refresh;
pub mod transport;

pub use client::{ApiClient, ApiResponse, AuthPolicy, BIKES_PATH};
pub use refresh::{TokenRefresher, REFRESH_PATH};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport, TransportError};
