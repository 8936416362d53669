//! Builder for filter expressions in the remote store's query language.
//!
//! The language is owned by the store; this module only *produces*
//! expressions for the queries the crate issues itself (dashboard metrics,
//! connection checks). Expressions that arrive from the planner are never
//! parsed or rewritten.
//!
//! Predicates are joined with `^`:
//!
//! ```text
//! active=true^assigned_toISEMPTY^orderbydesc:sys_created_on
//! ```

use std::fmt;

/// Predicate separator.
pub const CONJUNCTION: &str = "^";

/// Begin/end-of-day macro pair selecting records created today.
pub const CREATED_TODAY: &str =
    "sys_created_onONToday@javascript:gs.beginningOfToday()@javascript:gs.endOfToday()";

/// An ordered conjunction of predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    predicates: Vec<String>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `field=value`
    pub fn equals(self, field: &str, value: impl fmt::Display) -> Self {
        self.raw(format!("{field}={value}"))
    }

    /// `fieldLIKEvalue`
    pub fn like(self, field: &str, value: impl fmt::Display) -> Self {
        self.raw(format!("{field}LIKE{value}"))
    }

    /// `fieldISEMPTY`
    pub fn empty(self, field: &str) -> Self {
        self.raw(format!("{field}ISEMPTY"))
    }

    /// Records created since the beginning of today.
    pub fn created_today(self) -> Self {
        self.raw(CREATED_TODAY)
    }

    /// `orderby:field`
    pub fn order_by(self, field: &str) -> Self {
        self.raw(format!("orderby:{field}"))
    }

    /// `orderbydesc:field`
    pub fn order_by_desc(self, field: &str) -> Self {
        self.raw(format!("orderbydesc:{field}"))
    }

    /// Append a predicate verbatim.
    pub fn raw(mut self, predicate: impl Into<String>) -> Self {
        self.predicates.push(predicate.into());
        self
    }

    pub fn build(&self) -> String {
        self.predicates.join(CONJUNCTION)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}
