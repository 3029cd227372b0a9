//! Canonical text serialisation grammar (spec §4.8, §6.4).
//!
//! `(v1 v2 ... vk)` for parameter/status blocks, `[name params status]` for
//! whole engines. Every engine's `FromStr` impl parses into a fresh local
//! value first and only assigns `self` once the entire block has parsed
//! successfully — the source of the "a partial or failed read leaves the
//! target unchanged" guarantee, mirrored from the `operator>>` overloads in
//! the original C++ (which parse into a `_new` local for the same reason).

use crate::error::{Result, TrngError};
use std::fmt::Write as _;

/// Render `values` as `(v1 v2 ... vk)`.
pub fn format_tuple(values: &[i64]) -> String {
    let mut s = String::new();
    s.push('(');
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        let _ = write!(s, "{v}");
    }
    s.push(')');
    s
}

/// Parse a `(v1 v2 ... vN)` block, returning the parsed values and the
/// remainder of `s` following the closing paren.
pub fn parse_tuple<const N: usize>(s: &str) -> Result<([i64; N], &str)> {
    let s = s.trim_start();
    let s = s
        .strip_prefix('(')
        .ok_or_else(|| TrngError::serialization_failure(format!("expected '(' at {s:?}")))?;
    let mut values = [0i64; N];
    let mut rest = s;
    for slot in values.iter_mut() {
        rest = rest.trim_start();
        let end = rest.find([' ', ')']).ok_or_else(|| {
            TrngError::serialization_failure("unterminated tuple".to_string())
        })?;
        *slot = rest[..end]
            .parse::<i64>()
            .map_err(|e| TrngError::serialization_failure(format!("bad integer: {e}")))?;
        rest = &rest[end..];
    }
    let rest = rest.trim_start();
    let rest = rest
        .strip_prefix(')')
        .ok_or_else(|| TrngError::serialization_failure(format!("expected ')' at {rest:?}")))?;
    Ok((values, rest))
}

/// Render a whole-engine block: `[name params status]`.
pub fn format_engine(name: &str, params: &str, status: &str) -> String {
    format!("[{name} {params} {status}]")
}

/// Parse a `[name ` header, checking the engine name token, and return the
/// remainder (params block onward, still unparsed).
pub fn parse_engine_header<'a>(s: &'a str, expected_name: &str) -> Result<&'a str> {
    let s = s.trim_start();
    let s = s
        .strip_prefix('[')
        .ok_or_else(|| TrngError::serialization_failure(format!("expected '[' at {s:?}")))?;
    let s = s.strip_prefix(expected_name).ok_or_else(|| {
        TrngError::serialization_failure(format!("expected engine name {expected_name:?} at {s:?}"))
    })?;
    s.strip_prefix(' ').ok_or_else(|| {
        TrngError::serialization_failure("missing separator after engine name".to_string())
    })
}

/// Consume the closing `]` of an engine block and confirm nothing but
/// trailing whitespace follows it.
pub fn parse_engine_footer(s: &str) -> Result<()> {
    let s = s.trim_start();
    let s = s
        .strip_prefix(']')
        .ok_or_else(|| TrngError::serialization_failure(format!("expected ']' at {s:?}")))?;
    if s.trim().is_empty() {
        Ok(())
    } else {
        Err(TrngError::serialization_failure(format!(
            "unexpected trailing input after ']': {s:?}"
        )))
    }
}
