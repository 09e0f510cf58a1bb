use std::{fmt, ops::Deref};

/// UTF-8 text limited to `CAP` bytes.
///
/// Input longer than `CAP` is truncated at the last char boundary that fits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundedString<const CAP: usize>(String);

impl<const CAP: usize> BoundedString<CAP> {
    /// Maximum length in bytes.
    pub const CAPACITY: usize = CAP;

    /// Build from `text`, truncating to the byte capacity.
    pub fn new(text: &str) -> Self {
        if text.len() <= CAP {
            return Self(text.to_string());
        }

        let mut end = CAP;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        Self(text[..end].to_string())
    }

    /// Borrow the stored text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<const CAP: usize> Deref for BoundedString<CAP> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl<const CAP: usize> fmt::Display for BoundedString<CAP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
