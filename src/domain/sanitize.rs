use std::borrow::Cow;

/// Characters that would break the one-record-per-line, tab-separated layout
fn is_layout_breaking(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
}

/// Collapse free text onto a single line.
///
/// Every tab, line feed and carriage return is replaced by one space in a
/// single pass. Text that is already clean is returned borrowed.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    if !text.contains(is_layout_breaking) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| if is_layout_breaking(c) { ' ' } else { c })
            .collect(),
    )
}
