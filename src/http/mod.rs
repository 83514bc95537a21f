//! HTTP protocol layer module
//!
//! Response builders, MIME detection and conditional-request helpers,
//! decoupled from the chat and static-file handlers that use them.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    apply_common_headers, build_304_response, build_404_response, build_405_response,
    build_file_response, build_options_response, json_error, json_response,
};
