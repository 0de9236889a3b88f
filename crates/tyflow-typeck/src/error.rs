//! Errors that stop an inference run.

use std::fmt;

use tyflow_parser::ParseError;

/// Failure of an inference run. Inference itself never fails: anything it
/// cannot work out is reported as `unknown`. Only unparsable input stops a
/// run.
#[derive(Clone, Debug)]
pub enum InferError {
    /// The source did not parse. Carries the parser's errors (at most one
    /// today, since the parser stops at the first error).
    Syntax(Vec<ParseError>),
}

impl InferError {
    /// The first syntax error, for rendering.
    pub fn first(&self) -> Option<&ParseError> {
        match self {
            InferError::Syntax(errors) => errors.first(),
        }
    }
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::Syntax(errors) => match errors.first() {
                Some(err) => write!(
                    f,
                    "syntax error at {}..{}: {}",
                    err.span.start, err.span.end, err.message
                ),
                None => write!(f, "syntax error"),
            },
        }
    }
}

impl std::error::Error for InferError {}
