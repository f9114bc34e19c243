//! Expression Evaluation
//!
//! Parameters may carry an expression instead of a literal value. The loader
//! stores expressions for deferred evaluation; the [`ExpressionEvaluator`] is
//! only called at load time when a parameter's shape depends on the result
//! (`<param type="collection" expression="..."/>`).

use serde_json::{Map, Value};
use thiserror::Error;

/// Failure to evaluate an expression
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to evaluate expression '{expression}': {reason}")]
pub struct ExpressionError {
    pub expression: String,
    pub reason: String,
}

impl ExpressionError {
    pub fn new(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            reason: reason.into(),
        }
    }
}

/// Variables visible to an expression
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpressionContext {
    variables: Map<String, Value>,
}

impl ExpressionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}

/// Evaluates parameter expressions
pub trait ExpressionEvaluator: Send + Sync {
    fn evaluate(&self, expression: &str, context: &ExpressionContext)
        -> Result<Value, ExpressionError>;
}

/// Evaluator for JSON literals and context variable lookups
///
/// `locales` resolves to the context variable of that name; `["a", "b"]`
/// resolves to the literal array. Anything else is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExpressionEvaluator;

impl ExpressionEvaluator for JsonExpressionEvaluator {
    fn evaluate(
        &self,
        expression: &str,
        context: &ExpressionContext,
    ) -> Result<Value, ExpressionError> {
        let expression = expression.trim();
        if let Some(value) = context.get(expression) {
            return Ok(value.clone());
        }

        serde_json::from_str(expression)
            .map_err(|err| ExpressionError::new(expression, err.to_string()))
    }
}
