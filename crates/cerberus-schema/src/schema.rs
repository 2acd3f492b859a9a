//! The native schema type.
//!
//! Schemas are authored with builder-style constructors and refined with
//! chained methods:
//!
//! ```
//! use cerberus_schema::Schema;
//!
//! let create_user = Schema::object(vec![
//!     ("name", Schema::string().min_length(1).required()),
//!     ("email", Schema::string().required()),
//!     ("age", Schema::integer().minimum_int(0)),
//! ]);
//! assert!(create_user.validate(&serde_json::json!({
//!     "name": "Alice",
//!     "email": "alice@example.com",
//! })).is_ok());
//! ```
//!
//! Validation collects every violation; see [`crate::violation`] for how
//! they are reported. The portable projection lives in
//! [`crate::json_schema`].

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::violation::{Violation, Violations};

/// A compiled string pattern, applied as an unanchored search the way
/// JSON Schema's `pattern` keyword is.
///
/// Equality compares the pattern source text, so schemas carrying
/// patterns stay comparable.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Returns the pattern source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether the pattern matches anywhere in `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self(regex)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

/// A declarative description of an expected data shape.
///
/// `required` only has meaning for schemas used as object properties:
/// it controls whether the property may be absent. A property that is
/// present always type-checks strictly, so a `null` value fails a
/// non-null schema regardless of optionality. This matches what the
/// JSON Schema projection enforces (`required` governs absence, `type`
/// governs present values), which is what keeps the two representations
/// behaviorally identical.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    kind: SchemaKind,
    required: bool,
}

/// The shape a [`Schema`] describes.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// A UTF-8 string, with optional length bounds (in characters, to
    /// match JSON Schema's `minLength`/`maxLength` semantics).
    String {
        /// Minimum length in characters.
        min_length: Option<usize>,
        /// Maximum length in characters.
        max_length: Option<usize>,
        /// Pattern the string must match.
        pattern: Option<Pattern>,
    },
    /// An integer. Accepts any JSON number with a zero fractional part,
    /// as draft-07 `"type": "integer"` does.
    Integer {
        /// Inclusive minimum.
        minimum: Option<i64>,
        /// Inclusive maximum.
        maximum: Option<i64>,
    },
    /// Any JSON number.
    Number {
        /// Inclusive minimum.
        minimum: Option<f64>,
        /// Inclusive maximum.
        maximum: Option<f64>,
    },
    /// A boolean.
    Boolean,
    /// An array with a uniform item schema.
    Array {
        /// Schema every element must satisfy.
        items: Box<Schema>,
        /// Minimum number of elements.
        min_items: Option<usize>,
        /// Maximum number of elements.
        max_items: Option<usize>,
    },
    /// An object with named properties. Property declaration order is
    /// preserved; it determines violation reporting order and the key
    /// order of the JSON Schema projection.
    Object {
        /// Declared properties, in declaration order.
        properties: IndexMap<String, Schema>,
        /// Whether keys outside `properties` are permitted.
        additional_properties: bool,
    },
    /// A string-keyed map with a uniform value schema. This is the shape
    /// query-parameter maps validate against.
    Record {
        /// Schema every value must satisfy.
        values: Box<Schema>,
    },
    /// Accepts any value.
    Any,
    /// Accepts only `null`.
    Null,
}

impl Schema {
    fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            required: false,
        }
    }

    /// Creates a string schema.
    #[must_use]
    pub fn string() -> Self {
        Self::new(SchemaKind::String {
            min_length: None,
            max_length: None,
            pattern: None,
        })
    }

    /// Creates an integer schema.
    #[must_use]
    pub fn integer() -> Self {
        Self::new(SchemaKind::Integer {
            minimum: None,
            maximum: None,
        })
    }

    /// Creates a number schema.
    #[must_use]
    pub fn number() -> Self {
        Self::new(SchemaKind::Number {
            minimum: None,
            maximum: None,
        })
    }

    /// Creates a boolean schema.
    #[must_use]
    pub fn boolean() -> Self {
        Self::new(SchemaKind::Boolean)
    }

    /// Creates an array schema with the given item schema.
    #[must_use]
    pub fn array(items: Schema) -> Self {
        Self::new(SchemaKind::Array {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        })
    }

    /// Creates an object schema from `(name, schema)` pairs.
    ///
    /// Declaration order is preserved. A property marked with
    /// [`Schema::required`] must be present in validated values.
    #[must_use]
    pub fn object(properties: Vec<(&str, Schema)>) -> Self {
        Self::new(SchemaKind::Object {
            properties: properties
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect(),
            additional_properties: true,
        })
    }

    /// Creates a record schema: a string-keyed map whose values all
    /// satisfy `values`.
    #[must_use]
    pub fn record(values: Schema) -> Self {
        Self::new(SchemaKind::Record {
            values: Box::new(values),
        })
    }

    /// Creates a schema that accepts any value.
    #[must_use]
    pub fn any() -> Self {
        Self::new(SchemaKind::Any)
    }

    /// Creates a schema that accepts only `null`.
    #[must_use]
    pub fn null() -> Self {
        Self::new(SchemaKind::Null)
    }

    /// Marks this schema as a required object property.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns whether this schema is marked required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the shape this schema describes.
    #[must_use]
    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    /// Sets the minimum length for string schemas. No-op for other kinds.
    #[must_use]
    pub fn min_length(mut self, len: usize) -> Self {
        if let SchemaKind::String { min_length, .. } = &mut self.kind {
            *min_length = Some(len);
        }
        self
    }

    /// Sets the maximum length for string schemas. No-op for other kinds.
    #[must_use]
    pub fn max_length(mut self, len: usize) -> Self {
        if let SchemaKind::String { max_length, .. } = &mut self.kind {
            *max_length = Some(len);
        }
        self
    }

    /// Sets the match pattern for string schemas. No-op for other kinds.
    ///
    /// The pattern is applied as an unanchored search, matching JSON
    /// Schema's `pattern` keyword; anchor explicitly for full-string
    /// matches.
    #[must_use]
    pub fn pattern(mut self, regex: Regex) -> Self {
        if let SchemaKind::String { pattern, .. } = &mut self.kind {
            *pattern = Some(Pattern::from(regex));
        }
        self
    }

    /// Sets the inclusive minimum for integer schemas. No-op for other kinds.
    #[must_use]
    pub fn minimum_int(mut self, min: i64) -> Self {
        if let SchemaKind::Integer { minimum, .. } = &mut self.kind {
            *minimum = Some(min);
        }
        self
    }

    /// Sets the inclusive maximum for integer schemas. No-op for other kinds.
    #[must_use]
    pub fn maximum_int(mut self, max: i64) -> Self {
        if let SchemaKind::Integer { maximum, .. } = &mut self.kind {
            *maximum = Some(max);
        }
        self
    }

    /// Sets the inclusive minimum for number schemas. No-op for other kinds.
    #[must_use]
    pub fn minimum(mut self, min: f64) -> Self {
        if let SchemaKind::Number { minimum, .. } = &mut self.kind {
            *minimum = Some(min);
        }
        self
    }

    /// Sets the inclusive maximum for number schemas. No-op for other kinds.
    #[must_use]
    pub fn maximum(mut self, max: f64) -> Self {
        if let SchemaKind::Number { maximum, .. } = &mut self.kind {
            *maximum = Some(max);
        }
        self
    }

    /// Sets the minimum element count for array schemas. No-op for other kinds.
    #[must_use]
    pub fn min_items(mut self, min: usize) -> Self {
        if let SchemaKind::Array { min_items, .. } = &mut self.kind {
            *min_items = Some(min);
        }
        self
    }

    /// Sets the maximum element count for array schemas. No-op for other kinds.
    #[must_use]
    pub fn max_items(mut self, max: usize) -> Self {
        if let SchemaKind::Array { max_items, .. } = &mut self.kind {
            *max_items = Some(max);
        }
        self
    }

    /// Rejects object keys outside the declared properties. No-op for
    /// non-object kinds.
    #[must_use]
    pub fn deny_unknown(mut self) -> Self {
        if let SchemaKind::Object {
            additional_properties,
            ..
        } = &mut self.kind
        {
            *additional_properties = false;
        }
        self
    }

    /// Validates a JSON value against this schema, collecting every
    /// violation in reporting order.
    ///
    /// For objects, violations surface in property declaration order: a
    /// present but mistyped property reports its type error, an absent
    /// required property reports `Required`, then unknown keys (when
    /// denied) are reported in value order.
    pub fn validate(&self, value: &Value) -> Result<(), Violations> {
        let mut violations = Vec::new();
        self.check(value, "", &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Violations::new(violations))
        }
    }

    /// Converts this schema into its portable JSON Schema (draft-07)
    /// projection. Pure and deterministic; see [`crate::json_schema`].
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        crate::json_schema::to_json_schema(self)
    }

    fn check(&self, value: &Value, path: &str, out: &mut Vec<Violation>) {
        match &self.kind {
            SchemaKind::String {
                min_length,
                max_length,
                pattern,
            } => {
                let Some(s) = value.as_str() else {
                    out.push(type_mismatch(path, "string", value));
                    return;
                };
                // Length in characters, matching JSON Schema semantics.
                let len = s.chars().count();
                if let Some(min) = min_length {
                    if len < *min {
                        out.push(Violation::new(
                            path,
                            format!("String must contain at least {min} character(s)"),
                        ));
                    }
                }
                if let Some(max) = max_length {
                    if len > *max {
                        out.push(Violation::new(
                            path,
                            format!("String must contain at most {max} character(s)"),
                        ));
                    }
                }
                if let Some(p) = pattern {
                    if !p.is_match(s) {
                        out.push(Violation::new(
                            path,
                            format!("String must match pattern '{}'", p.as_str()),
                        ));
                    }
                }
            }

            SchemaKind::Integer { minimum, maximum } => {
                // Draft-07 "integer" accepts any number with a zero
                // fractional part, e.g. 2.0.
                let Some(n) = integral_value(value) else {
                    out.push(type_mismatch(path, "integer", value));
                    return;
                };
                if let Some(min) = minimum {
                    if n < i128::from(*min) {
                        out.push(Violation::new(
                            path,
                            format!("Number must be greater than or equal to {min}"),
                        ));
                    }
                }
                if let Some(max) = maximum {
                    if n > i128::from(*max) {
                        out.push(Violation::new(
                            path,
                            format!("Number must be less than or equal to {max}"),
                        ));
                    }
                }
            }

            SchemaKind::Number { minimum, maximum } => {
                let Some(n) = value.as_f64() else {
                    out.push(type_mismatch(path, "number", value));
                    return;
                };
                if let Some(min) = minimum {
                    if n < *min {
                        out.push(Violation::new(
                            path,
                            format!("Number must be greater than or equal to {min}"),
                        ));
                    }
                }
                if let Some(max) = maximum {
                    if n > *max {
                        out.push(Violation::new(
                            path,
                            format!("Number must be less than or equal to {max}"),
                        ));
                    }
                }
            }

            SchemaKind::Boolean => {
                if !value.is_boolean() {
                    out.push(type_mismatch(path, "boolean", value));
                }
            }

            SchemaKind::Array {
                items,
                min_items,
                max_items,
            } => {
                let Some(arr) = value.as_array() else {
                    out.push(type_mismatch(path, "array", value));
                    return;
                };
                if let Some(min) = min_items {
                    if arr.len() < *min {
                        out.push(Violation::new(
                            path,
                            format!("Array must contain at least {min} element(s)"),
                        ));
                    }
                }
                if let Some(max) = max_items {
                    if arr.len() > *max {
                        out.push(Violation::new(
                            path,
                            format!("Array must contain at most {max} element(s)"),
                        ));
                    }
                }
                for (idx, item) in arr.iter().enumerate() {
                    items.check(item, &join_path(path, &idx.to_string()), out);
                }
            }

            SchemaKind::Object {
                properties,
                additional_properties,
            } => {
                let Some(obj) = value.as_object() else {
                    out.push(type_mismatch(path, "object", value));
                    return;
                };
                for (name, prop) in properties {
                    let prop_path = join_path(path, name);
                    match obj.get(name) {
                        Some(prop_value) => prop.check(prop_value, &prop_path, out),
                        None if prop.required => {
                            out.push(Violation::new(prop_path, "Required"));
                        }
                        None => {}
                    }
                }
                if !additional_properties {
                    for name in obj.keys() {
                        if !properties.contains_key(name) {
                            out.push(Violation::new(
                                join_path(path, name),
                                format!("Unrecognized key '{name}'"),
                            ));
                        }
                    }
                }
            }

            SchemaKind::Record { values } => {
                let Some(obj) = value.as_object() else {
                    out.push(type_mismatch(path, "object", value));
                    return;
                };
                for (name, entry) in obj {
                    values.check(entry, &join_path(path, name), out);
                }
            }

            SchemaKind::Any => {}

            SchemaKind::Null => {
                if !value.is_null() {
                    out.push(type_mismatch(path, "null", value));
                }
            }
        }
    }
}

/// Exact integral value of a JSON number, or `None` when it has a
/// fractional part.
///
/// Bound checks must not round through `f64`: an `i64` near the 2^53
/// precision limit would compare equal to its neighbors there, while a
/// generic JSON Schema evaluator compares the projected `minimum` and
/// `maximum` exactly. `i128` covers the full `i64` and `u64` ranges,
/// and integral floats within them convert losslessly.
fn integral_value(value: &Value) -> Option<i128> {
    if let Some(i) = value.as_i64() {
        return Some(i128::from(i));
    }
    if let Some(u) = value.as_u64() {
        return Some(i128::from(u));
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 {
        // Out-of-range floats saturate, which preserves ordering
        // against any i64 bound.
        Some(f as i128)
    } else {
        None
    }
}

fn type_mismatch(path: &str, expected: &str, value: &Value) -> Violation {
    Violation::new(
        path,
        format!("Expected {expected}, received {}", value_type_name(value)),
    )
}

fn join_path(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{base}/{segment}")
    }
}

/// Returns a human-readable name for a JSON value type.
fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
