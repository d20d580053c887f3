use std::ops::Range;

/// A pair of T and the span in the template source
pub type Spanned<T> = (T, Span);

/// A byte range representing a location in the template source
pub type Span = Range<usize>;

/// A span representing no location in the template source
pub const NO_SPAN: Span = 0..0;

/// Slice the source covered by `span`, or an empty string if it falls outside.
pub fn slice<'a>(source: &'a str, span: &Span) -> &'a str {
    source.get(span.clone()).unwrap_or_default()
}
