//! Caption cleanup for board text content.

const PARAGRAPH_OPEN: &str = "<p>";
const PARAGRAPH_CLOSE: &str = "</p>";

/// Strip paragraph markup (`<p>`, `</p>`) from board text.
///
/// Any other markup is left untouched. Removal repeats until no paragraph
/// tag remains, so input like `<<p>p>` cannot leave a tag behind and the
/// result is stable under a second pass.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    let mut cleaned = raw.to_owned();
    while cleaned.contains(PARAGRAPH_OPEN) || cleaned.contains(PARAGRAPH_CLOSE) {
        cleaned = cleaned.replace(PARAGRAPH_OPEN, "").replace(PARAGRAPH_CLOSE, "");
    }
    cleaned
}

#[cfg(test)]
#[path = "sanitize_test.rs"]
mod tests;
