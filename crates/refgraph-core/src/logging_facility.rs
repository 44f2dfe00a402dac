//! Structured logging facility
//!
//! - Single initialization point via `init(profile)` or `init_from_config`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! Boundary ownership: only `apply` emits start/end lines. Graph, version and
//! propagation code below it logs at debug/trace level.
//!
//! ```rust
//! use refgraph_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, init_from_config, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
