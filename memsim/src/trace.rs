//! the trace file of memory references.
//!
//! the first token is the number of references, then one `R <addr>` or `W <addr>`
//! pair per reference, e.g.
//! ```text
//! 3
//! R 0
//! W 2
//! R 0
//! ```

use std::{fs, path::Path};

use eyre::{Result, WrapErr};

use crate::{
    cache::{MemoryReference, Operation},
    error::InputError,
};

fn malformed(line: usize, reason: impl Into<String>) -> InputError {
    InputError::MalformedTrace {
        line,
        reason: reason.into(),
    }
}

/// parse the trace, every address must be in `[0, memory_size)`
pub fn parse_trace(text: &str, memory_size: u64) -> Result<Vec<MemoryReference>, InputError> {
    let mut tokens = text
        .lines()
        .enumerate()
        .flat_map(|(i, line)| line.split_whitespace().map(move |token| (i + 1, token)));

    let num_references = match tokens.next() {
        Some((_, token)) => token.parse::<usize>().ok().filter(|&n| n >= 1),
        None => None,
    }
    .ok_or_else(|| malformed(1, "trace must contain at least 1 memory reference"))?;

    // the count is untrusted, grow with the pairs actually read
    let mut references = Vec::new();
    let mut last_line = 1;
    for _ in 0..num_references {
        let (line, op) = tokens.next().ok_or_else(|| {
            malformed(
                last_line,
                format!("expected {num_references} references, found {}", references.len()),
            )
        })?;
        let operation = match op {
            "R" | "r" => Operation::Read,
            "W" | "w" => Operation::Write,
            _ => return Err(malformed(line, format!("invalid operation {op:?}"))),
        };
        let (line, address) = tokens
            .next()
            .ok_or_else(|| malformed(line, "missing memory address"))?;
        let address = address
            .parse::<u64>()
            .map_err(|_| malformed(line, format!("invalid memory address {address:?}")))?;
        if address >= memory_size {
            return Err(InputError::OutOfRangeReference {
                line,
                address,
                memory_size,
            });
        }
        last_line = line;
        references.push(MemoryReference { operation, address });
    }
    Ok(references)
}

pub fn load_trace(path: impl AsRef<Path>, memory_size: u64) -> Result<Vec<MemoryReference>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read trace file {}", path.display()))?;
    let references = parse_trace(&text, memory_size)
        .wrap_err_with(|| format!("invalid trace file {}", path.display()))?;
    tracing::info!(references = references.len(), "trace loaded");
    Ok(references)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        let refs = parse_trace("3\nR 0\nw 2\nR 15\n", 16).unwrap();
        assert_eq!(
            refs,
            vec![
                MemoryReference::read(0),
                MemoryReference::write(2),
                MemoryReference::read(15)
            ]
        );
        // line breaks do not matter and extra content is ignored
        let refs = parse_trace("2 R 1 W 3 R 4", 16).unwrap();
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn test_bad_count() {
        for text in ["", "0\n", "-1\n", "abc\nR 0\n"] {
            let err = parse_trace(text, 16).unwrap_err();
            assert!(matches!(err, InputError::MalformedTrace { line: 1, .. }));
        }
    }

    #[test]
    fn test_bad_operation() {
        let err = parse_trace("2\nR 0\nX 1\n", 16).unwrap_err();
        assert!(matches!(err, InputError::MalformedTrace { line: 3, .. }));
    }

    #[test]
    fn test_bad_address() {
        let err = parse_trace("2\nR 0\nR -1\n", 16).unwrap_err();
        assert!(matches!(err, InputError::MalformedTrace { line: 3, .. }));
        let err = parse_trace("2\nR 0\nR 16\n", 16).unwrap_err();
        assert_eq!(
            err,
            InputError::OutOfRangeReference {
                line: 3,
                address: 16,
                memory_size: 16
            }
        );
    }

    #[test]
    fn test_too_few_references() {
        let err = parse_trace("3\nR 0\nR 1\n", 16).unwrap_err();
        assert!(matches!(err, InputError::MalformedTrace { line: 3, .. }));
        let err = parse_trace("1\nR\n", 16).unwrap_err();
        assert!(matches!(err, InputError::MalformedTrace { line: 2, .. }));
    }

    #[test]
    fn test_huge_count() {
        for count in ["18446744073709551615", "1000000000000"] {
            let err = parse_trace(&format!("{count}\nR 0\n"), 16).unwrap_err();
            assert!(matches!(err, InputError::MalformedTrace { line: 2, .. }));
        }
    }

    #[test]
    fn test_load_trace() {
        let path = std::env::temp_dir().join(format!("memsim_test_trace_{}.txt", std::process::id()));
        fs::write(&path, "1\nW 7\n").unwrap();
        let refs = load_trace(&path, 8).unwrap();
        assert_eq!(refs, vec![MemoryReference::write(7)]);
        let report = load_trace(&path, 4).unwrap_err();
        assert!(matches!(
            report.downcast_ref::<InputError>(),
            Some(InputError::OutOfRangeReference { address: 7, .. })
        ));
        fs::remove_file(&path).unwrap();
    }
}
