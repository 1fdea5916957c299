//! Call normalization: positional/keyword calls rewritten to all-keyword form.
//!
//! The parameter names a callable declares are fixed on the normalizer up
//! front; at call time the positional values are paired with those names in
//! declaration order and the keyword pairs are overlaid on top. The result is
//! a single mapping in which every argument is addressable by name.

use std::collections::BTreeMap;

use thiserror::Error;

/// All-keyword form of a call: parameter name to argument value.
pub type NormalizedCall<V> = BTreeMap<String, V>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("call supplies {supplied} positional arguments but only {declared} parameters are declared")]
    TooManyPositional { supplied: usize, declared: usize },
}

/// Rewrites a callable's positional/keyword invocation into all-keyword form.
///
/// Holds the callable's declared parameter names in declaration order.
#[derive(Debug, Clone)]
pub struct CallNormalizer {
    names: Vec<String>,
}

impl CallNormalizer {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Declared parameter names, in declaration order.
    pub fn params(&self) -> &[String] {
        &self.names
    }

    /// Build the all-keyword mapping for one invocation.
    ///
    /// Positional values are paired with the declared names in order, then
    /// the keyword pairs are merged on top; keyword values win on collision.
    /// Keyword names outside the declared list pass through unchanged.
    /// Supplying more positional values than declared parameters is an error.
    pub fn normalize<V>(
        &self,
        positional: Vec<V>,
        keyword: Vec<(String, V)>,
    ) -> Result<NormalizedCall<V>, CallError> {
        if positional.len() > self.names.len() {
            return Err(CallError::TooManyPositional {
                supplied: positional.len(),
                declared: self.names.len(),
            });
        }
        let mut call: NormalizedCall<V> = self.names.iter().cloned().zip(positional).collect();
        for (name, value) in keyword {
            call.insert(name, value);
        }
        Ok(call)
    }
}
