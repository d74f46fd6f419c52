//! Transformation module.
//!
//! This module turns raw CSV rows into normalized documents:
//! - Coerce: Raw cell text to typed JSON values
//! - Unflatten: Dotted column names to nested objects
//! - Rules: Ordered field normalization rules
//! - Pipeline: Per-row and per-file conversion

pub mod coerce;
pub mod pipeline;
pub mod rules;
pub mod unflatten;

pub use coerce::{coerce_record, coerce_value};
pub use pipeline::*;
pub use rules::{Finding, Rule, RuleContext, WarningKind};
pub use unflatten::{flatten, unflatten, KeyConflict, Unflattened};
