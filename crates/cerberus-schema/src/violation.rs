//! Violation reporting for schema validation.
//!
//! Validation collects every failed rule rather than stopping at the
//! first, so a single round trip tells the caller everything that is
//! wrong with a payload.

use std::fmt;

/// A single failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// `/`-joined path to the offending field. Empty at the root.
    pub path: String,
    /// Human-readable rule description, e.g. `Expected string, received number`.
    pub message: String,
}

impl Violation {
    /// Creates a violation at the given path.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.path)
    }
}

/// An ordered, non-empty list of violations.
///
/// Order is reporting order: callers see violations in the sequence the
/// schema walk produced them, which for objects is property declaration
/// order. `Display` joins each violation as `"<message> (<path>)"` with
/// `", "` separators; this is the text that ends up in error envelopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Wraps a list of violations. Callers must guarantee it is non-empty.
    #[must_use]
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self(violations)
    }

    /// Returns the violations in reporting order.
    #[must_use]
    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    /// Returns the number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a `Violations` is never constructed empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, violation) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
