//! Request handler module
//!
//! Responsible for request routing dispatch and the file-serving pipeline:
//! path resolution against the allowed roots, content transformation, and
//! error classification.

pub mod error;
pub mod resolve;
pub mod router;
pub mod transform;

// Re-export main entry point
pub use router::handle_request;
