/// Returns the character offsets of every backtick that opens a code span.
///
/// A backtick opens a span when it is not escaped (preceded by an odd run of
/// backslashes) and another backtick follows it later in the text. Spans are
/// matched left to right without overlapping, so the closing backtick of one
/// span is never an opener. Escapes are not interpreted inside a span.
pub fn find_code_span_openers(text: &str) -> Vec<usize> {
    let chars: Vec<char> = text.chars().collect();
    code_span_openers(&chars)
}

pub(crate) fn code_span_openers(chars: &[char]) -> Vec<usize> {
    let mut openers = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '`' && !is_escaped(chars, i) {
            match find_closing_backtick(chars, i) {
                Some(close) => {
                    openers.push(i);
                    i = close + 1;
                    continue;
                }
                // No backtick left anywhere after this one.
                None => break,
            }
        }
        i += 1;
    }
    openers
}

/// Offset of the first backtick after `open`.
pub(crate) fn find_closing_backtick(chars: &[char], open: usize) -> Option<usize> {
    chars[open + 1..]
        .iter()
        .position(|&ch| ch == '`')
        .map(|offset| open + 1 + offset)
}

fn is_escaped(chars: &[char], index: usize) -> bool {
    let backslashes = chars[..index]
        .iter()
        .rev()
        .take_while(|&&ch| ch == '\\')
        .count();
    backslashes % 2 == 1
}
