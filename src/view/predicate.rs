//! Narrowing predicates

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::selector::Selector;

/// Producer of a selector, evaluated at call time
pub type PredicateFn = dyn Fn() -> Selector + Send + Sync;

/// A view's narrowing predicate.
///
/// `Dynamic` producers run on every operation and are never cached, so
/// the narrowing can follow external state.
#[derive(Clone)]
pub enum Predicate {
    Static(Selector),
    Dynamic(Arc<PredicateFn>),
}

impl Predicate {
    /// Wraps a zero-argument producer
    pub fn dynamic<F, S>(producer: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Into<Selector>,
    {
        Predicate::Dynamic(Arc::new(move || producer().into()))
    }

    /// Evaluates the predicate now
    pub fn resolve(&self) -> Selector {
        match self {
            Predicate::Static(selector) => selector.clone(),
            Predicate::Dynamic(producer) => (**producer)(),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Predicate::Dynamic(_))
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Static(selector) => f.debug_tuple("Static").field(selector).finish(),
            Predicate::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<Selector> for Predicate {
    fn from(selector: Selector) -> Self {
        Predicate::Static(selector)
    }
}

impl From<Value> for Predicate {
    fn from(value: Value) -> Self {
        Predicate::Static(Selector::from(value))
    }
}
