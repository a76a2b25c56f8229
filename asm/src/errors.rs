use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AssemblerError {
    #[error("Syntax Error: {0}")]
    PestError(#[from] pest::error::Error<crate::parser::Rule>),

    #[error("Syntax Error on line {line}: {reason}")]
    SyntaxError { line: usize, reason: String },

    #[error("Resolution Error on line {line}: {reason}")]
    ResolutionError { line: usize, reason: String },

    #[error("Encoding Error on line {line}: {reason}")]
    EncodingError { line: usize, reason: String },
}
