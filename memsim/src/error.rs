use std::fmt;

/// the errors that can be caught before the simulator is built
/// - all of them are recoverable, the caller can fix the input and try again
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// a field of the cache parameters is not a power of two or not in range
    Configuration {
        field: &'static str,
        value: u64,
        reason: String,
    },
    /// the address of a reference is not inside the main memory
    OutOfRangeReference {
        line: usize,
        address: u64,
        memory_size: u64,
    },
    /// the trace file cannot be understood
    MalformedTrace { line: usize, reason: String },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Configuration {
                field,
                value,
                reason,
            } => write!(f, "invalid {field} = {value}: {reason}"),
            InputError::OutOfRangeReference {
                line,
                address,
                memory_size,
            } => write!(
                f,
                "line {line}: address {address} is outside of main memory [0, {memory_size})"
            ),
            InputError::MalformedTrace { line, reason } => write!(f, "line {line}: {reason}"),
        }
    }
}

impl std::error::Error for InputError {}
