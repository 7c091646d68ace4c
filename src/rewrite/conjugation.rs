//! Verb inflection for rewritten clauses.

use crate::lexicon::{irregular_past_of, irregular_present_of, normalize};

/// Tense of the clause being rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tense {
    /// Present tense.
    Present,
    /// Past tense.
    Past,
}

/// Grammatical person and number of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Person {
    /// "I".
    FirstSingular,
    /// "he", "she", "it".
    ThirdSingular,
    /// "you", "we", "they".
    Plural,
    /// Any other subject, such as a noun phrase.
    Other,
}

impl Person {
    /// Classify a subject by its text.
    #[must_use]
    pub fn of(subject: &str) -> Self {
        match normalize(subject).as_str() {
            "i" => Self::FirstSingular,
            "he" | "she" | "it" => Self::ThirdSingular,
            "you" | "we" | "they" => Self::Plural,
            _ => Self::Other,
        }
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Check if `lemma` ends in a consonant followed by "y".
fn ends_in_consonant_y(lemma: &str) -> bool {
    let mut chars = lemma.chars().rev();
    matches!((chars.next(), chars.next()), (Some('y'), Some(c)) if !is_vowel(c))
}

/// Past tense: irregular table first, then regular suffixation.
#[must_use]
pub fn past(lemma: &str) -> String {
    if let Some(irregular) = irregular_past_of(lemma) {
        return irregular.to_string();
    }
    if lemma.ends_with('e') {
        format!("{lemma}d")
    } else if ends_in_consonant_y(lemma) {
        format!("{}ied", &lemma[..lemma.len() - 1])
    } else {
        format!("{lemma}ed")
    }
}

/// Third-person singular present: irregular table first, then regular suffixation.
#[must_use]
pub fn third_person(lemma: &str) -> String {
    if let Some(irregular) = irregular_present_of(lemma) {
        return irregular.to_string();
    }
    if ends_in_consonant_y(lemma) {
        format!("{}ies", &lemma[..lemma.len() - 1])
    } else if ["s", "sh", "ch", "x", "z"].iter().any(|s| lemma.ends_with(s)) {
        format!("{lemma}es")
    } else {
        format!("{lemma}s")
    }
}

/// Present tense for `person`; only "he", "she" and "it" inflect.
#[must_use]
pub fn present(lemma: &str, person: Person) -> String {
    if person == Person::ThirdSingular {
        third_person(lemma)
    } else {
        lemma.to_string()
    }
}

/// Inflect `lemma` for tense and person.
#[must_use]
pub fn conjugate(lemma: &str, tense: Tense, person: Person) -> String {
    if normalize(lemma) == "be" {
        return to_be(tense, person).to_string();
    }
    match tense {
        Tense::Past => past(lemma),
        Tense::Present => present(lemma, person),
    }
}

/// Finite form of "to be".
#[must_use]
pub fn to_be(tense: Tense, person: Person) -> &'static str {
    match (tense, person) {
        (Tense::Present, Person::FirstSingular) => "am",
        (Tense::Present, Person::ThirdSingular | Person::Other) => "is",
        (Tense::Present, Person::Plural) => "are",
        (Tense::Past, Person::FirstSingular | Person::ThirdSingular | Person::Other) => "was",
        (Tense::Past, Person::Plural) => "were",
    }
}

/// Negated "do" auxiliary for a clause without a modal.
#[must_use]
pub fn negated_do(tense: Tense, person: Person) -> &'static str {
    match (tense, person) {
        (Tense::Past, _) => "didn't",
        (Tense::Present, Person::ThirdSingular) => "doesn't",
        (Tense::Present, _) => "don't",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_past() {
        assert_eq!(past("feel"), "felt");
        assert_eq!(past("smile"), "smiled");
        assert_eq!(past("worry"), "worried");
        assert_eq!(past("play"), "played");
        assert_eq!(past("work"), "worked");
    }

    #[test]
    fn test_third_person() {
        assert_eq!(third_person("feel"), "feels");
        assert_eq!(third_person("try"), "tries");
        assert_eq!(third_person("stay"), "stays");
        assert_eq!(third_person("push"), "pushes");
        assert_eq!(third_person("watch"), "watches");
        assert_eq!(third_person("fix"), "fixes");
        assert_eq!(third_person("have"), "has");
        assert_eq!(third_person("go"), "goes");
    }

    #[test]
    fn test_present_only_inflects_third_singular() {
        assert_eq!(present("feel", Person::ThirdSingular), "feels");
        assert_eq!(present("feel", Person::FirstSingular), "feel");
        assert_eq!(present("feel", Person::Plural), "feel");
        assert_eq!(present("feel", Person::Other), "feel");
    }

    #[test]
    fn test_to_be() {
        assert_eq!(to_be(Tense::Present, Person::FirstSingular), "am");
        assert_eq!(to_be(Tense::Present, Person::ThirdSingular), "is");
        assert_eq!(to_be(Tense::Present, Person::Plural), "are");
        assert_eq!(to_be(Tense::Past, Person::FirstSingular), "was");
        assert_eq!(to_be(Tense::Past, Person::Plural), "were");
        assert_eq!(conjugate("be", Tense::Past, Person::ThirdSingular), "was");
    }

    #[test]
    fn test_person_of() {
        assert_eq!(Person::of("I"), Person::FirstSingular);
        assert_eq!(Person::of("She"), Person::ThirdSingular);
        assert_eq!(Person::of("they"), Person::Plural);
        assert_eq!(Person::of("the team"), Person::Other);
    }

    #[test]
    fn test_negated_do() {
        assert_eq!(negated_do(Tense::Past, Person::ThirdSingular), "didn't");
        assert_eq!(negated_do(Tense::Present, Person::ThirdSingular), "doesn't");
        assert_eq!(negated_do(Tense::Present, Person::FirstSingular), "don't");
    }
}
