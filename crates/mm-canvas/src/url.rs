//! URL-shape recognition for pasted and dropped text.
//!
//! Built on `winnow` 0.7. A single token counts as a link when it carries
//! an explicit scheme or reads like a bare domain (`docs.rs/serde`,
//! `www.example.com`). This is cheap shape detection, not validation: the
//! final label must merely start with a letter, which keeps decimals like
//! `3.14` and bare IP addresses as ordinary text.

use winnow::ascii::Caseless;
use winnow::combinator::alt;
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_while;

#[derive(Debug, Clone, Copy, PartialEq)]
enum UrlShape {
    /// Carries its own scheme; kept verbatim.
    Explicit,
    /// Scheme-less domain shape; gets `http://` prepended.
    Bare,
}

/// Recognize a URL shape in `text`, returning the normalized address.
/// `None` means the text should stay an ordinary text node.
#[must_use]
pub fn normalize_url(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return None;
    }
    let mut input = trimmed;
    let shape = parse_url_shape.parse_next(&mut input).ok()?;
    // The whole token must match, not just a prefix.
    if !input.is_empty() {
        return None;
    }
    match shape {
        UrlShape::Explicit => Some(trimmed.to_string()),
        UrlShape::Bare => Some(format!("http://{trimmed}")),
    }
}

fn parse_url_shape(input: &mut &str) -> ModalResult<UrlShape> {
    alt((parse_explicit_scheme, parse_bare_domain)).parse_next(input)
}

fn parse_explicit_scheme(input: &mut &str) -> ModalResult<UrlShape> {
    let _ = alt((
        Caseless("https://"),
        Caseless("http://"),
        Caseless("file://"),
        Caseless("ftp://"),
    ))
    .parse_next(input)?;
    let _ = take_while(1.., |c: char| !c.is_whitespace()).parse_next(input)?;
    Ok(UrlShape::Explicit)
}

fn parse_label<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-').parse_next(input)
}

fn parse_bare_domain(input: &mut &str) -> ModalResult<UrlShape> {
    let _ = parse_label.parse_next(input)?;
    let _ = '.'.parse_next(input)?;
    let mut last = parse_label.parse_next(input)?;
    while input.starts_with('.') {
        let checkpoint = *input;
        *input = &input[1..];
        match parse_label.parse_next(input) {
            Ok(label) => last = label,
            Err(_) => {
                *input = checkpoint;
                break;
            }
        }
    }
    if !last.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(winnow::error::ErrMode::Backtrack(ContextError::new()));
    }
    // Optional port.
    if input.starts_with(':') {
        *input = &input[1..];
        let _ = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    }
    // A path, query, or fragment swallows the rest of the token.
    if input.starts_with(['/', '?', '#']) {
        let _ = take_while::<_, _, ContextError>(0.., |c: char| !c.is_whitespace())
            .parse_next(input);
    }
    Ok(UrlShape::Bare)
}
