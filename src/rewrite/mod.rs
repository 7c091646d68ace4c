//! Sentence rewrite rules.
//!
//! Each rule works on one annotated [`Sentence`] and returns `None` when it
//! does not apply. Callers turn `None` into "return the input unchanged".
//!
//! - [`not_only`]: "not only X but also Y" into "both X and Y".
//! - [`causal`]: "X makes Y feel Z" into "Y feel(s) Z with X".
//! - [`suggest`]: affirmative and conjunction substitutions.
//! - [`conjugation`]: verb inflection used by [`causal`].

pub mod causal;
pub mod conjugation;
pub mod not_only;
pub mod suggest;

use crate::annotation::{Sentence, Token};

/// Concatenate tokens with their trailing text.
///
/// `substitute` replaces the surface text of the token at that position in
/// `tokens`.
pub(crate) fn render_tokens(
    tokens: &[Token],
    substitute: Option<(usize, &str)>,
    trim: bool,
) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        match substitute {
            Some((at, replacement)) if at == i => out.push_str(replacement),
            _ => out.push_str(&token.text),
        }
        out.push_str(&token.after);
    }
    if trim {
        out.trim().to_string()
    } else {
        out
    }
}

/// Concatenate the tokens at sorted `indices`, trimmed.
pub(crate) fn render_selected(
    tokens: &[Token],
    indices: &[usize],
    substitute: Option<(usize, &str)>,
) -> String {
    let mut out = String::new();
    for &i in indices {
        let Some(token) = tokens.get(i) else {
            continue;
        };
        match substitute {
            Some((at, replacement)) if at == i => out.push_str(replacement),
            _ => out.push_str(&token.text),
        }
        out.push_str(&token.after);
    }
    out.trim().to_string()
}

/// Uppercase the first character.
#[must_use]
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character.
#[must_use]
pub fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Give `text` the case of `original` on its first character.
#[must_use]
pub fn match_first_case(text: &str, original: char) -> String {
    if original.is_uppercase() {
        capitalize_first(text)
    } else if original.is_lowercase() {
        lowercase_first(text)
    } else {
        text.to_string()
    }
}

/// Append a period unless `text` already ends in `.`, `!` or `?`.
#[must_use]
pub fn ensure_terminal_punctuation(text: &str) -> String {
    if text.ends_with(['.', '!', '?']) {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

/// Apply a per-sentence rule across annotated text.
///
/// Sentences the rule rewrites are replaced in place; everything else,
/// including the text between sentences, is copied from `text`. Returns
/// `None` if no sentence changed.
pub(crate) fn rewrite_sentences<F>(text: &str, sentences: &[Sentence], rule: F) -> Option<String>
where
    F: Fn(&Sentence) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut changed = false;

    for sentence in sentences {
        match text.get(cursor..sentence.begin) {
            Some(gap) => out.push_str(gap),
            None if !out.is_empty() => out.push(' '),
            None => {}
        }
        if let Some(rewritten) = rule(sentence) {
            changed = true;
            out.push_str(&rewritten);
        } else {
            match text.get(sentence.begin..sentence.end) {
                Some(original) => out.push_str(original),
                None => out.push_str(&sentence.text()),
            }
        }
        cursor = cursor.max(sentence.end);
    }
    if let Some(tail) = text.get(cursor..) {
        out.push_str(tail);
    }

    changed.then_some(out)
}
