use alloc::sync::Arc;

use crate::types::ErrorLocationProvider;

/// A span of the original input. The input is shared between every token
/// lexed from it, so cloning a location is cheap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    /// The whole input string the span points into
    pub input: Arc<str>,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

impl SourceLocation {
    /// Bytes `start..end` of `input`.
    #[must_use]
    pub const fn new(input: Arc<str>, start: usize, end: usize) -> Self {
        Self { input, start, end }
    }

    /// The whole input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Merge two optional spans into one covering both. Spans taken from
    /// different inputs cannot be merged.
    #[must_use]
    pub fn range(first: Option<Self>, second: Option<Self>) -> Option<Self> {
        first.as_ref().range_ref(second.as_ref())
    }
}

/// Merging of borrowed spans, used when building group nodes from their
/// opening and closing tokens.
pub trait SourceRangeRef {
    #[must_use]
    fn range_ref(self, second: Self) -> Option<SourceLocation>;
}

impl SourceRangeRef for Option<&SourceLocation> {
    fn range_ref(self, second: Self) -> Option<SourceLocation> {
        match (self, second) {
            (Some(first), None) => Some(first.clone()),
            (None, Some(second)) => Some(second.clone()),
            (Some(first), Some(second)) => {
                if !Arc::ptr_eq(&first.input, &second.input) {
                    return None;
                }
                Some(SourceLocation {
                    input: Arc::clone(&first.input),
                    start: first.start,
                    end: second.end,
                })
            }
            (None, None) => None,
        }
    }
}

impl ErrorLocationProvider for SourceLocation {
    fn loc(&self) -> Option<&SourceLocation> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_spans_of_the_same_input() {
        let input: Arc<str> = Arc::from("\\frac{a}{b}");
        let open = SourceLocation::new(Arc::clone(&input), 5, 6);
        let close = SourceLocation::new(Arc::clone(&input), 7, 8);
        let merged = SourceLocation::range(Some(open), Some(close)).unwrap();
        assert_eq!((merged.start, merged.end), (5, 8));
    }

    #[test]
    fn keeps_the_single_side_present() {
        let loc = SourceLocation::new(Arc::from("x"), 0, 1);
        assert_eq!(SourceLocation::range(None, Some(loc.clone())), Some(loc));
        assert_eq!(SourceLocation::range(None, None), None);
    }

    #[test]
    fn refuses_spans_from_different_inputs() {
        let a = SourceLocation::new(Arc::from("abc"), 0, 1);
        let b = SourceLocation::new(Arc::from("abc"), 1, 2);
        assert!(SourceLocation::range(Some(a), Some(b)).is_none());
    }
}
