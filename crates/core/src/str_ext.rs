//! Extension traits for `str` handling of optional JSON string fields.
//!
//! Incoming fields arrive as `Option<String>` where both an absent key and an
//! empty string mean "no value".

/// Extension trait for `str` to handle empty-as-none semantics.
pub trait StrExt {
    /// Returns `Some(&str)` if non-empty, `None` if empty.
    #[must_use]
    fn non_empty(&self) -> Option<&str>;

    /// Returns self if non-empty, otherwise returns `default`.
    #[must_use]
    fn or_str<'a>(&'a self, default: &'a str) -> &'a str;
}

impl StrExt for str {
    #[inline]
    fn non_empty(&self) -> Option<&str> {
        (!self.is_empty()).then_some(self)
    }

    #[inline]
    fn or_str<'a>(&'a self, default: &'a str) -> &'a str {
        if self.is_empty() { default } else { self }
    }
}

/// Extension trait for `Option<String>` request fields.
pub trait OptionStrExt {
    /// Borrow the inner value if present and non-empty.
    ///
    /// # Example
    /// ```
    /// use cleanse_core::OptionStrExt;
    ///
    /// let some: Option<String> = Some("value".to_string());
    /// let empty: Option<String> = Some(String::new());
    ///
    /// assert_eq!(some.non_empty(), Some("value"));
    /// assert_eq!(empty.non_empty(), None);
    /// ```
    #[must_use]
    fn non_empty(&self) -> Option<&str>;

    /// Borrow the inner value, or `""` when absent.
    #[must_use]
    fn as_str_or_empty(&self) -> &str;
}

impl OptionStrExt for Option<String> {
    #[inline]
    fn non_empty(&self) -> Option<&str> {
        self.as_deref().and_then(|s| s.non_empty())
    }

    #[inline]
    fn as_str_or_empty(&self) -> &str {
        self.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_not_empty() {
        assert_eq!("  ".non_empty(), Some("  "));
        assert_eq!("".non_empty(), None);
    }

    #[test]
    fn or_str_falls_back_on_empty() {
        assert_eq!("".or_str("US"), "US");
        assert_eq!("GB".or_str("US"), "GB");
    }

    #[test]
    fn option_helpers() {
        let none: Option<String> = None;
        assert_eq!(none.non_empty(), None);
        assert_eq!(none.as_str_or_empty(), "");
        assert_eq!(Some("x".to_string()).as_str_or_empty(), "x");
    }
}
