//! HTTP layer for the SES outbound call.
//!
//! - [`SesRequest`]: a fully built and signed request (method, URL, headers, body)
//! - [`SesResponse`]: the raw reply (status, headers, body), never interpreted
//! - [`Transport`]: the seam between the client and the network, with
//!   [`ReqwestTransport`] as the default implementation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   SesClient     │  - builds the payload
//! │                 │  - signs the request
//! └────────┬────────┘
//!          │ SesRequest
//!          ▼
//! ┌─────────────────┐
//! │   Transport     │  - one POST, no retry
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   reqwest       │  - TLS, timeouts
//! └─────────────────┘
//! ```

mod request;
mod response;
mod transport;

pub use request::SesRequest;
pub use response::SesResponse;
pub use transport::{ReqwestTransport, Transport};
