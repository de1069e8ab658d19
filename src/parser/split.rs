/// One instruction cut out of a larger script, with its byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub offset: usize,
    pub text: &'a str,
}

/// Splits a script into instructions on newlines and on `;` outside quotes
/// and brackets. A quote only opens at the start of a word, so apostrophes
/// inside words are plain text. Blank pieces and `#` comment lines are
/// dropped.
pub fn split_instructions(source: &str) -> Vec<SourceLine<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut previous: Option<char> = None;

    for (position, ch) in source.char_indices() {
        let word_start = previous.map_or(true, |p| p.is_whitespace() || "[({,:".contains(p));
        previous = Some(ch);
        match (quote, ch) {
            (Some(open), _) if ch == open => quote = None,
            (Some(_), '\n') => {
                quote = None;
                push_piece(&mut lines, source, start, position);
                start = position + 1;
            }
            (Some(_), _) => {}
            (None, '\'' | '"') if word_start => quote = Some(ch),
            (None, '[' | '{' | '(') => depth += 1,
            (None, ']' | '}' | ')') => depth = depth.saturating_sub(1),
            (None, '\n') => {
                depth = 0;
                push_piece(&mut lines, source, start, position);
                start = position + 1;
            }
            (None, ';') if depth == 0 => {
                push_piece(&mut lines, source, start, position);
                start = position + 1;
            }
            _ => {}
        }
    }
    push_piece(&mut lines, source, start, source.len());
    lines
}

fn push_piece<'a>(lines: &mut Vec<SourceLine<'a>>, source: &'a str, start: usize, end: usize) {
    let piece = &source[start..end];
    let trimmed = piece.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return;
    }
    let lead = piece.len() - piece.trim_start().len();
    lines.push(SourceLine {
        offset: start + lead,
        text: trimmed,
    });
}
