//! Utility functions and types.

use std::fmt::{Debug, Display, Formatter};

/// Redact hides secret material in logs and `Debug` output.
///
/// - Empty input renders as `EMPTY`.
/// - Input shorter than 12 bytes renders as `***`.
/// - Longer input keeps its first and last three characters, so two different
///   access key ids can still be told apart.
#[derive(Clone, Copy)]
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl Display for Redact<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = self.0;
        if s.is_empty() {
            return f.write_str("EMPTY");
        }
        if s.len() < 12 {
            return f.write_str("***");
        }

        // Cut on char boundaries so multi-byte input can't panic.
        let head = s.char_indices().nth(3).map(|(i, _)| i).unwrap_or(s.len());
        let tail = s
            .char_indices()
            .rev()
            .nth(2)
            .map(|(i, _)| i)
            .unwrap_or_default();
        write!(f, "{}***{}", &s[..head], &s[tail..])
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
