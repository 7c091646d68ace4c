//! Softening substitutions.
//!
//! [`replace_injunctions`] swaps negative contractions for their affirmative
//! form and drops bare negative adverbs. [`replace_conjunctions`] swaps "but"
//! for "and". Both rebuild the text from tokens and their trailing
//! whitespace, and return `None` when nothing was substituted.

use crate::annotation::Token;
use crate::lexicon::{
    affirmative_after, expand_contraction, is_conjunction_match, is_negative_adverb, normalize,
};

use super::{capitalize_first, match_first_case};

fn is_split_negation(token: &Token) -> bool {
    normalize(&token.text) == "n't"
}

/// Replace negations with affirmatives and omit negative adverbs.
///
/// A split contraction (`ca` + `n't`) is looked up as a whole; if the whole
/// is unknown, the host's full form is kept and `n't` dropped.
#[must_use]
pub fn replace_injunctions(tokens: &[Token]) -> Option<String> {
    let mut out = String::new();
    let mut changed = false;
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        let lower = normalize(&token.text);
        let first = token.text.chars().next().unwrap_or(' ');
        let previous = i.checked_sub(1).map(|p| tokens[p].text.as_str());

        if let Some(next) = tokens.get(i + 1).filter(|t| is_split_negation(t)) {
            let affirmative = affirmative_after(&format!("{lower}n't"), previous)
                .or_else(|| expand_contraction(&lower))
                .map_or_else(|| token.text.clone(), |word| match_first_case(word, first));
            out.push_str(&affirmative);
            out.push_str(&next.after);
            changed = true;
            i += 2;
            continue;
        }

        if let Some(affirmative) = affirmative_after(&lower, previous) {
            out.push_str(&match_first_case(affirmative, first));
            out.push_str(&token.after);
            changed = true;
        } else if is_negative_adverb(&lower) || is_split_negation(token) {
            // Keep words apart when the omitted token was glued to its host ("can|not").
            if !out.is_empty() && !out.ends_with(char::is_whitespace) {
                out.push_str(&token.after);
            }
            changed = true;
        } else {
            out.push_str(&token.text);
            out.push_str(&token.after);
        }
        i += 1;
    }

    changed.then(|| capitalize_first(out.trim()))
}

/// Replace adversative conjunctions with "and".
#[must_use]
pub fn replace_conjunctions(tokens: &[Token]) -> Option<String> {
    let mut out = String::new();
    let mut changed = false;

    for token in tokens {
        if is_conjunction_match(&token.text) {
            let first = token.text.chars().next().unwrap_or(' ');
            out.push_str(&match_first_case("and", first));
            changed = true;
        } else {
            out.push_str(&token.text);
        }
        out.push_str(&token.after);
    }

    changed.then(|| capitalize_first(out.trim()))
}

/// Check if any token is an adversative conjunction.
#[must_use]
pub fn has_conjunction(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| is_conjunction_match(&t.text))
}
