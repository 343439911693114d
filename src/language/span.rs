use miette::SourceSpan;

/// Byte offsets into the loaded source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Zero-width span at the end of `self`.
    pub fn after(&self) -> Span {
        Span::new(self.end, self.end)
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.len()).into()
    }
}
