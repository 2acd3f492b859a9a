//! # Cerberus Core
//!
//! Shared types for the Cerberus validation gate: the [`GateError`]
//! error enum with its HTTP status mapping and serializable envelope,
//! and the client-visible route metadata ([`ClientValidators`],
//! [`RouteMetadata`]) that carries JSON Schema projections to client
//! bundles.
//!
//! Both the server interceptor (`cerberus-server`) and the client
//! pre-flight validator (`cerberus-client`) depend on this crate; it is
//! the only type vocabulary the two sides share.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod route;

pub use error::{ErrorDetail, ErrorEnvelope, ErrorKind, GateError, GateResult};
pub use route::{ClientValidators, RouteMetadata};
