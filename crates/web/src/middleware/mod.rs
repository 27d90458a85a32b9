//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions) - added in `main`
//! 2. `TraceLayer` (request span, carries `request_id`)
//! 3. Request ID (read or assign `x-request-id`)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
