//! # Cerberus Client
//!
//! The client-side half of the Cerberus validation gate.
//!
//! A client bundle ships the [`RouteMetadata`] exported at route
//! registration: a `{body, query}` pair of portable JSON Schema
//! documents. This crate compiles those documents once, at bundle-load
//! time, and checks every outgoing call against them before the calling
//! layer transmits anything. It is a fail-fast optimization, never a
//! substitute for server-side enforcement. Calls whose route has no
//! metadata pass through untouched; stale or absent metadata must not
//! block a call the server would arbitrate.
//!
//! Compiled validators are read-only and `Send + Sync`; one
//! [`PreflightRegistry`] is built at startup and shared for the process
//! lifetime.
//!
//! ```
//! use cerberus_client::{OutgoingCall, PreflightValidator};
//! use cerberus_core::ClientValidators;
//! use serde_json::json;
//!
//! let bundle = ClientValidators::new(
//!     Some(json!({
//!         "type": "object",
//!         "properties": {"age": {"type": "number"}},
//!         "required": ["age"],
//!     })),
//!     None,
//! );
//! let validator = PreflightValidator::compile(&bundle).unwrap();
//!
//! let call = OutgoingCall::new("createUser", json!({"age": "x"}), json!({}));
//! assert!(validator.check(&call).is_err());
//! ```
//!
//! [`RouteMetadata`]: cerberus_core::RouteMetadata

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod preflight;
pub mod registry;

pub use preflight::{OutgoingCall, PreflightValidator};
pub use registry::PreflightRegistry;
