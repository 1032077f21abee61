use thiserror::Error;

/// Failures that abort a translation run. No recovery is attempted;
/// nothing is written on error.
#[derive(Debug, Error)]
pub enum AsmError {
    #[error("syntax error:\n{0}")]
    Parse(String),
    #[error("label ({label}) defined twice, first bound to instruction {first}")]
    DuplicateLabel { label: String, first: u16 },
}
