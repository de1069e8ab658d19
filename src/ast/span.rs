/// Byte range inside a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn whole(text: &str) -> Self {
        Self::new(0, text.len())
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(span: pest::Span<'_>) -> Self {
        Span::new(span.start(), span.end())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorData {
    pub location: Span,
    pub message: String,
}

impl ErrorData {
    pub fn new(location: Span, message: String) -> ErrorData {
        ErrorData { location, message }
    }
}
