//! # API Module
//!
//! HTTP endpoints of the `artistscope serve` front end. The server accepts a
//! CSV upload, runs the same enrichment pipeline as the `collect` command and
//! answers with the resolved artists as JSON.
//!
//! ## Endpoints
//!
//! - [`collect`] - `POST /artists` with a `multipart/form-data` CSV upload in
//!   the `file` field; returns the resolved artist records. Uploads are rate
//!   limited per client IP, see [`rate_limit`]
//! - [`health`] - `GET /health`; returns status, service name and version
//!
//! ## Usage Example
//!
//! ```bash
//! curl -F file=@bandname.csv http://127.0.0.1:5000/artists
//! ```
//!
//! ## Related Modules
//!
//! - [`crate::server`] - router construction and binding
//! - [`crate::pipeline`] - the enrichment pipeline

mod collect;
mod health;
pub mod rate_limit;

pub use collect::ApiState;
pub use collect::collect;
pub use health::health;
pub use rate_limit::UploadLimits;
