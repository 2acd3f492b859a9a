//! # Cerberus Schema
//!
//! The native schema language for the Cerberus validation gate.
//!
//! A [`Schema`] is authored once, server-side, and used in two ways:
//!
//! - **Validation**: [`Schema::validate`] walks a `serde_json::Value` and
//!   collects every violation with its field path.
//! - **Projection**: [`Schema::to_json_schema`] converts the same schema
//!   into a portable JSON Schema (draft-07) document that a generic
//!   evaluator can apply without this crate.
//!
//! The two representations are joined by a pure, deterministic
//! conversion: for any schema `S` and value `V`, `S.validate(V)`
//! succeeds exactly when a conforming JSON Schema evaluator accepts `V`
//! against `S.to_json_schema()`. Routes rely on this so that client-side
//! pre-flight checks and server-side enforcement reject the same
//! payloads.
//!
//! ## Example
//!
//! ```
//! use cerberus_schema::Schema;
//!
//! let schema = Schema::object(vec![
//!     ("name", Schema::string().required()),
//!     ("age", Schema::number().required()),
//! ]);
//!
//! let ok = serde_json::json!({"name": "Alice", "age": 30});
//! assert!(schema.validate(&ok).is_ok());
//!
//! let bad = serde_json::json!({"name": 1});
//! let violations = schema.validate(&bad).unwrap_err();
//! assert_eq!(
//!     violations.to_string(),
//!     "Expected string, received number (name), Required (age)"
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod json_schema;
pub mod schema;
pub mod violation;

pub use schema::{Pattern, Schema, SchemaKind};
pub use violation::{Violation, Violations};
