//! Causal-complement transform.
//!
//! Rewrites a main clause of the shape "Subject Verb Object Complement" in
//! which the object is the (implicit) subject of the complement clause, so
//! that the object owns the feeling:
//!
//! ```text
//! She makes me feel happy.           ->  I feel happy with her.
//! She made me feel happy.            ->  I felt happy with her.
//! He will make me feel proud.        ->  I will feel proud with him.
//! She doesn't make me feel sad.      ->  I don't feel sad with her.
//! She encourages him to be confident ->  He is confident of her.
//! ```
//!
//! Tense comes from the main verb (or its first non-modal auxiliary), and a
//! modal or negation on the main clause carries over to the new clause.
//! Sentences whose complement subject is reflexive are left alone.

use std::collections::{HashSet, VecDeque};

use crate::annotation::{DependencyRelation, PosTag, Sentence};
use crate::lexicon::{
    affirmative_of, expand_contraction, is_reflexive, normalize, object_to_subject,
    subject_to_object,
};

use super::conjugation::{self, Person, Tense};
use super::{capitalize_first, lowercase_first, render_selected};

/// Main-clause roles collected in one pass over the edges.
#[derive(Debug, Default)]
struct ClauseRoles {
    subject: Option<usize>,
    object: Option<usize>,
    complement: Option<usize>,
    modal: Option<usize>,
    auxiliaries: Vec<usize>,
    modifiers: Vec<usize>,
    negated: bool,
}

impl ClauseRoles {
    fn collect(sentence: &Sentence, root: usize) -> Self {
        let mut roles = Self::default();
        let edges = sentence.graph.edges();
        for edge in edges.iter().filter(|e| e.governor == root) {
            let dependent = edge.dependent;
            match edge.relation {
                r if r.is_subject() => {
                    roles.subject.get_or_insert(dependent);
                }
                r if r.is_object() => {
                    roles.object.get_or_insert(dependent);
                }
                r if r.is_clausal_complement() => {
                    roles.complement.get_or_insert(dependent);
                }
                r if r.is_auxiliary() => {
                    if sentence.tokens[dependent].tag == PosTag::Modal {
                        roles.modal.get_or_insert(dependent);
                    }
                    roles.auxiliaries.push(dependent);
                }
                DependencyRelation::Negation => roles.negated = true,
                r if r.is_modifier() => roles.modifiers.push(dependent),
                _ => {}
            }
        }
        // Some parsers hang the negation on the auxiliary instead of the verb.
        if !roles.negated {
            roles.negated = edges.iter().any(|e| {
                e.relation == DependencyRelation::Negation && roles.auxiliaries.contains(&e.governor)
            });
        }
        roles
    }

    fn tense(&self, sentence: &Sentence, root: usize) -> Tense {
        let tokens = &sentence.tokens;
        let finite = self
            .auxiliaries
            .iter()
            .find(|&&aux| tokens[aux].tag != PosTag::Modal)
            .map_or(tokens[root].tag, |&aux| tokens[aux].tag);
        if tokens[root].tag == PosTag::VerbPast || finite == PosTag::VerbPast {
            Tense::Past
        } else {
            Tense::Present
        }
    }
}

fn decline(reason: &str) -> Option<String> {
    tracing::debug!(reason, "causal transform declined");
    None
}

/// Render the phrase headed by `head`, lowercasing a sentence-initial
/// common word.
fn phrase_text(sentence: &Sentence, head: usize) -> (String, bool) {
    let tokens = &sentence.tokens;
    let indices = if tokens[head].tag == PosTag::Pronoun {
        vec![head]
    } else {
        sentence.graph.subtree(head)
    };
    let text = render_selected(tokens, &indices, None);
    let first = indices.first().copied().unwrap_or(head);
    let text = if first == 0 && !tokens[0].tag.is_proper_noun() && tokens[0].text != "I" {
        lowercase_first(&text)
    } else {
        text
    };
    (text, indices.len() == 1)
}

/// Transform one sentence, or `None` if the pattern does not apply.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn transform(sentence: &Sentence) -> Option<String> {
    let tokens = &sentence.tokens;
    let graph = &sentence.graph;
    if sentence.validate().is_err() {
        return decline("malformed graph");
    }
    let Some(root) = graph.root() else {
        return decline("no root");
    };

    let mut roles = ClauseRoles::collect(sentence, root);
    let Some(complement) = roles.complement else {
        return decline("no clausal complement");
    };
    let Some(subject) = roles.subject else {
        return decline("no main subject");
    };
    let marker = graph
        .outgoing(complement)
        .find(|e| {
            matches!(
                e.relation,
                DependencyRelation::Marker | DependencyRelation::Auxiliary
            ) && normalize(&tokens[e.dependent].text) == "to"
        })
        .map(|e| e.dependent);
    let Some(complement_subject) = graph
        .outgoing(complement)
        .find(|e| e.relation.is_subject())
        .map(|e| e.dependent)
        .or(roles.object)
    else {
        return decline("no complement subject");
    };
    if is_reflexive(&tokens[complement_subject].text) {
        return decline("reflexive complement subject");
    }

    // Pronoun swap.
    let (object_phrase, object_single) = phrase_text(sentence, complement_subject);
    let new_subject = capitalize_first(&if object_single {
        object_to_subject(&object_phrase)
    } else {
        object_phrase
    });
    let (subject_phrase, subject_single) = phrase_text(sentence, subject);
    let new_object = if subject_single {
        subject_to_object(&subject_phrase)
    } else {
        subject_phrase
    };
    let person = match Person::of(&new_subject) {
        Person::Other
            if matches!(
                tokens[complement_subject].tag,
                PosTag::PluralNoun | PosTag::PluralProperNoun
            ) =>
        {
            Person::Plural
        }
        person => person,
    };

    // Modal, with contracted forms spelled out.
    let modal = roles.modal.map(|m| {
        let text = normalize(&tokens[m].text);
        if let Some(affirmative) = affirmative_of(&text) {
            roles.negated = true;
            affirmative.to_string()
        } else {
            expand_contraction(&text).map_or(text, str::to_string)
        }
    });
    let negated = roles.negated;
    let tense = roles.tense(sentence, root);

    // Complement phrase with the verb re-inflected.
    let excluded: HashSet<usize> = std::iter::once(complement_subject).chain(marker).collect();
    let mut phrase: Vec<usize> = graph
        .subtree(complement)
        .into_iter()
        .filter(|i| !excluded.contains(i))
        .collect();
    while phrase
        .last()
        .is_some_and(|&i| tokens[i].tag == PosTag::Punctuation)
    {
        phrase.pop();
    }

    let lemma = normalize(&tokens[complement].lemma);
    let is_be = lemma == "be";
    let mut verb = if modal.is_some() || (negated && !is_be) {
        lemma.clone()
    } else {
        conjugation::conjugate(&lemma, tense, person)
    };
    if is_be && negated && modal.is_none() {
        verb.push_str(" not");
    }
    let complement_text = render_selected(tokens, &phrase, Some((complement, &verb)));

    // Modifiers and subordinate clauses outside the complement phrase.
    let in_phrase: HashSet<usize> = phrase.iter().copied().collect();
    let mut seen: HashSet<usize> = HashSet::new();
    let mut queue: VecDeque<usize> = graph
        .outgoing(complement)
        .map(|e| e.dependent)
        .chain(roles.modifiers.iter().copied())
        .collect();
    while let Some(current) = queue.pop_front() {
        if in_phrase.contains(&current) || excluded.contains(&current) || !seen.insert(current) {
            continue;
        }
        queue.extend(graph.outgoing(current).map(|e| e.dependent));
    }
    let mut additional: Vec<usize> = seen.into_iter().collect();
    additional.sort_unstable();
    while additional
        .last()
        .is_some_and(|&i| tokens[i].tag == PosTag::Punctuation)
    {
        additional.pop();
    }
    let mut additional_text = render_selected(tokens, &additional, None);
    if additional.first() == Some(&0) && !tokens[0].tag.is_proper_noun() {
        additional_text = lowercase_first(&additional_text);
    }

    let preposition = if is_be && marker.is_some() { "of" } else { "with" };

    let mut parts: Vec<String> = vec![new_subject];
    match &modal {
        Some(modal) => {
            parts.push(modal.clone());
            if negated {
                parts.push("not".to_string());
            }
        }
        None if negated && !is_be => {
            parts.push(conjugation::negated_do(tense, person).to_string());
        }
        None => {}
    }
    parts.push(complement_text);
    if !additional_text.is_empty() {
        parts.push(additional_text);
    }
    parts.push(preposition.to_string());
    parts.push(new_object);

    let rewritten = format!("{}.", parts.join(" "));
    tracing::debug!(rewritten = %rewritten, "causal transform applied");
    Some(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{
        Annotator, DependencyGraph, RuleBasedAnnotator, Token,
    };

    fn run(text: &str) -> Option<String> {
        let sentences = RuleBasedAnnotator::new().annotate(text).unwrap();
        transform(&sentences[0])
    }

    #[test]
    fn test_present() {
        assert_eq!(
            run("She makes me feel happy.").as_deref(),
            Some("I feel happy with her.")
        );
    }

    #[test]
    fn test_third_person_new_subject() {
        assert_eq!(
            run("He makes her feel small.").as_deref(),
            Some("She feels small with him.")
        );
    }

    #[test]
    fn test_past() {
        assert_eq!(
            run("She made me feel happy.").as_deref(),
            Some("I felt happy with her.")
        );
        assert_eq!(
            run("They made us feel welcome.").as_deref(),
            Some("We felt welcome with them.")
        );
    }

    #[test]
    fn test_modal() {
        assert_eq!(
            run("He will make me feel proud.").as_deref(),
            Some("I will feel proud with him.")
        );
    }

    #[test]
    fn test_negation() {
        assert_eq!(
            run("She doesn't make me feel sad.").as_deref(),
            Some("I don't feel sad with her.")
        );
        assert_eq!(
            run("She didn't make me feel sad.").as_deref(),
            Some("I didn't feel sad with her.")
        );
        assert_eq!(
            run("He won't make me feel bad.").as_deref(),
            Some("I will not feel bad with him.")
        );
    }

    #[test]
    fn test_infinitival_be() {
        assert_eq!(
            run("She encourages him to be confident.").as_deref(),
            Some("He is confident of her.")
        );
    }

    #[test]
    fn test_reflexive_declined() {
        assert!(run("She makes herself feel happy.").is_none());
    }

    #[test]
    fn test_additional_clause() {
        assert_eq!(
            run("He will make me feel proud when he works hard.").as_deref(),
            Some("I will feel proud when he works hard with him.")
        );
        assert_eq!(
            run("When she smiles, she makes me feel happy.").as_deref(),
            Some("I feel happy when she smiles with her.")
        );
    }

    #[test]
    fn test_noun_subjects() {
        assert_eq!(
            run("Mary makes me feel confident.").as_deref(),
            Some("I feel confident with Mary.")
        );
        assert_eq!(
            run("The manager makes me feel small.").as_deref(),
            Some("I feel small with the manager.")
        );
    }

    #[test]
    fn test_sentence_initial_common_noun_subjects() {
        assert_eq!(
            run("Music makes me feel alive.").as_deref(),
            Some("I feel alive with music.")
        );
        assert_eq!(
            run("Work makes me feel tired.").as_deref(),
            Some("I feel tired with work.")
        );
    }

    #[test]
    fn test_no_pattern() {
        assert!(run("She is kind.").is_none());
        assert!(run("This is a clean sentence.").is_none());
        assert!(run("I can't do this anymore.").is_none());
    }

    #[test]
    fn test_out_of_range_edge_declined() {
        let mut graph = DependencyGraph::new().with_root(1);
        graph.add_edge(1, 0, DependencyRelation::NominalSubject);
        graph.add_edge(1, 7, DependencyRelation::Auxiliary);
        let sentence = Sentence {
            tokens: vec![Token::new("They", 0).with_after(" "), Token::new("go", 5)],
            graph,
            begin: 0,
            end: 7,
        };
        assert!(transform(&sentence).is_none());
    }

    #[test]
    fn test_main_clause_adverb_kept() {
        let words = [
            ("She", "she", "PRP", " "),
            ("always", "always", "RB", " "),
            ("makes", "make", "VBZ", " "),
            ("me", "I", "PRP", " "),
            ("feel", "feel", "VB", " "),
            ("happy", "happy", "JJ", ""),
            (".", ".", ".", ""),
        ];
        let mut begin = 0;
        let tokens = words
            .iter()
            .map(|(text, lemma, tag, after)| {
                let token = Token::new(text, begin)
                    .with_lemma(lemma)
                    .with_tag(PosTag::from_tag(tag))
                    .with_after(after);
                begin += text.len() + after.len();
                token
            })
            .collect();
        let mut graph = DependencyGraph::new().with_root(2);
        graph.add_labeled_edge(2, 0, "nsubj", "she");
        graph.add_labeled_edge(2, 1, "advmod", "always");
        graph.add_labeled_edge(2, 3, "obj", "I");
        graph.add_labeled_edge(2, 4, "xcomp", "feel");
        graph.add_labeled_edge(4, 5, "xcomp", "happy");
        graph.add_labeled_edge(2, 6, "punct", ".");
        let sentence = Sentence::new(tokens, graph).unwrap();
        assert_eq!(
            transform(&sentence).as_deref(),
            Some("I feel happy always with her.")
        );
    }

    #[test]
    fn test_rootless_graph() {
        let tokens = vec![Token::new("Hmm", 0)];
        let sentence = Sentence::new(tokens, DependencyGraph::new()).unwrap();
        assert!(transform(&sentence).is_none());
    }

    #[test]
    fn test_external_labels_with_complement_subject() {
        // UD-style graph where the complement carries its own subject.
        let words = [
            ("She", "she", "PRP"),
            ("made", "make", "VBD"),
            ("me", "I", "PRP"),
            ("feel", "feel", "VB"),
            ("happy", "happy", "JJ"),
            (".", ".", "."),
        ];
        let mut offset = 0;
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(i, &(text, lemma, tag))| {
                let after = if i + 2 < words.len() { " " } else { "" };
                let token = Token::new(text, offset)
                    .with_lemma(lemma)
                    .with_tag(PosTag::from_tag(tag))
                    .with_after(after);
                offset += text.len() + after.len();
                token
            })
            .collect();
        let mut graph = DependencyGraph::new().with_root(1);
        graph.add_labeled_edge(1, 0, "nsubj", "she");
        graph.add_labeled_edge(1, 3, "ccomp", "feel");
        graph.add_labeled_edge(3, 2, "nsubj", "I");
        graph.add_labeled_edge(3, 4, "xcomp", "happy");
        graph.add_labeled_edge(1, 5, "punct", ".");
        let sentence = Sentence::new(tokens, graph).unwrap();

        assert_eq!(
            transform(&sentence).as_deref(),
            Some("I felt happy with her.")
        );
    }
}
