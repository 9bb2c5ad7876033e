/// A run of authored text with its emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub bold: bool,
}

impl TextSpan {
    fn new(text: &str, bold: bool) -> Self {
        Self {
            text: text.to_owned(),
            bold,
        }
    }
}

/// Split authored text on `**bold**` markers.
///
/// An unmatched trailing marker is kept literally.
#[must_use]
pub fn parse_bold(text: &str) -> Vec<TextSpan> {
    let parts: Vec<&str> = text.split("**").collect();
    let closed = if parts.len() % 2 == 1 {
        parts.len()
    } else {
        parts.len() - 1
    };

    let mut spans: Vec<TextSpan> = parts[..closed]
        .iter()
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(i, part)| TextSpan::new(part, i % 2 == 1))
        .collect();

    if closed < parts.len() {
        let tail = format!("**{}", parts[closed]);
        match spans.last_mut() {
            Some(last) if !last.bold => last.text.push_str(&tail),
            _ => spans.push(TextSpan::new(&tail, false)),
        }
    }
    spans
}
