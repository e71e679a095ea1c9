//! The factorial computations behind the fixture programs.
//!
//! Both programs compute `10!` and print `factorial(10)=3628800`. One uses
//! recursion, the other a counting loop; the annotated C sources they mirror
//! live in `fixtures/`.

use thiserror::Error;

/// The input both fixture programs are hardcoded to.
pub const FIXTURE_INPUT: i32 = 10;

/// Largest input whose factorial fits in an `i32`.
pub const MAX_INPUT: i32 = 12;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FactorialError {
    #[error("factorial is not defined for negative input {0}")]
    Negative(i32),
    #[error("factorial({0}) overflows a 32-bit integer")]
    Overflow(i32),
}

/// Computes `n!` by recursion: `1` for `n <= 1`, else `n * recursive(n - 1)`.
///
/// Inputs above [`MAX_INPUT`] are rejected before recursing, so the depth
/// never exceeds a dozen frames.
pub fn recursive(n: i32) -> Result<i32, FactorialError> {
    if n < 0 {
        return Err(FactorialError::Negative(n));
    }
    if n > MAX_INPUT {
        return Err(FactorialError::Overflow(n));
    }
    if n > 1 {
        let rest = recursive(n - 1)?;
        return n.checked_mul(rest).ok_or(FactorialError::Overflow(n));
    }
    Ok(1)
}

/// Computes `n!` with an accumulator multiplied by `2..=n`.
pub fn iterative(n: i32) -> Result<i32, FactorialError> {
    if n < 0 {
        return Err(FactorialError::Negative(n));
    }
    let mut acc: i32 = 1;
    for i in 2..=n {
        acc = acc.checked_mul(i).ok_or(FactorialError::Overflow(n))?;
    }
    Ok(acc)
}

/// The line the fixture programs print, without any trailing newline.
pub fn report(n: i32, value: i32) -> String {
    format!("factorial({n})={value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const REFERENCE: [i32; 13] = [
        1, 1, 2, 6, 24, 120, 720, 5040, 40320, 362880, 3628800, 39916800, 479001600,
    ];

    #[test]
    fn recursive_matches_reference() {
        for (n, expected) in REFERENCE.iter().enumerate() {
            assert_eq!(recursive(n as i32), Ok(*expected), "{n}!");
        }
    }

    #[test]
    fn iterative_matches_recursive() {
        for n in 0..=MAX_INPUT {
            assert_eq!(iterative(n), recursive(n));
        }
    }

    #[test_case(5, 120 ; "five")]
    #[test_case(10, 3628800 ; "ten")]
    #[test_case(0, 1 ; "zero")]
    #[test_case(1, 1 ; "one")]
    fn known_values(n: i32, expected: i32) {
        assert_eq!(recursive(n), Ok(expected));
        assert_eq!(iterative(n), Ok(expected));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(recursive(13), Err(FactorialError::Overflow(13)));
        assert_eq!(iterative(13), Err(FactorialError::Overflow(13)));
    }

    #[test_case(100_000_000 ; "hundred million")]
    #[test_case(i32::MAX ; "max")]
    fn large_input_overflows_without_recursing(n: i32) {
        assert_eq!(recursive(n), Err(FactorialError::Overflow(n)));
        assert_eq!(iterative(n), Err(FactorialError::Overflow(n)));
    }

    #[test]
    fn negative_input_is_rejected() {
        assert_eq!(recursive(-1), Err(FactorialError::Negative(-1)));
        assert_eq!(iterative(-4), Err(FactorialError::Negative(-4)));
    }

    #[test]
    fn report_line() {
        assert_eq!(
            report(FIXTURE_INPUT, iterative(FIXTURE_INPUT).unwrap()),
            "factorial(10)=3628800"
        );
    }
}
