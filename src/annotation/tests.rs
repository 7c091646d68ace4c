//! Tests for the annotation module.

use std::sync::Arc;

use super::*;

fn annotate(text: &str) -> Vec<Sentence> {
    RuleBasedAnnotator::new().annotate(text).unwrap()
}

fn single(text: &str) -> Sentence {
    let mut sentences = annotate(text);
    assert_eq!(sentences.len(), 1, "expected one sentence in {text:?}");
    sentences.remove(0)
}

fn texts(sentence: &Sentence) -> Vec<&str> {
    sentence.tokens.iter().map(|t| t.text.as_str()).collect()
}

fn tags(sentence: &Sentence) -> Vec<&'static str> {
    sentence.tokens.iter().map(|t| t.tag.as_tag()).collect()
}

fn position(sentence: &Sentence, word: &str) -> usize {
    sentence
        .tokens
        .iter()
        .position(|t| t.text == word)
        .unwrap_or_else(|| panic!("no token {word:?}"))
}

fn has_edge(sentence: &Sentence, governor: &str, dependent: &str, relation: DependencyRelation) -> bool {
    let governor = position(sentence, governor);
    let dependent = position(sentence, dependent);
    sentence
        .graph
        .edges()
        .iter()
        .any(|e| e.governor == governor && e.dependent == dependent && e.relation == relation)
}

// =========================================================================
// DependencyRelation tests
// =========================================================================

#[test]
fn test_dependency_relation_from_label() {
    assert_eq!(
        DependencyRelation::from_label("nsubj"),
        DependencyRelation::NominalSubject
    );
    assert_eq!(
        DependencyRelation::from_label("dobj"),
        DependencyRelation::DirectObject
    );
    assert_eq!(
        DependencyRelation::from_label("obj"),
        DependencyRelation::DirectObject
    );
    assert_eq!(
        DependencyRelation::from_label("XCOMP"),
        DependencyRelation::OpenClausalComplement
    );
    assert_eq!(
        DependencyRelation::from_label("aux:pass"),
        DependencyRelation::PassiveAuxiliary
    );
    assert_eq!(
        DependencyRelation::from_label("unknown_rel"),
        DependencyRelation::Unknown
    );
}

#[test]
fn test_dependency_relation_negation_from_advmod() {
    assert_eq!(
        DependencyRelation::from_label_with_lemma("advmod", "not"),
        DependencyRelation::Negation
    );
    assert_eq!(
        DependencyRelation::from_label_with_lemma("advmod", "N'T"),
        DependencyRelation::Negation
    );
    assert_eq!(
        DependencyRelation::from_label_with_lemma("advmod", "really"),
        DependencyRelation::AdverbialModifier
    );
    assert_eq!(
        DependencyRelation::from_label_with_lemma("neg", "not"),
        DependencyRelation::Negation
    );
}

#[test]
fn test_dependency_relation_as_label() {
    assert_eq!(DependencyRelation::NominalSubject.as_label(), "nsubj");
    assert_eq!(DependencyRelation::OpenClausalComplement.as_label(), "xcomp");
    assert_eq!(DependencyRelation::Unknown.as_label(), "dep");
    assert_eq!(DependencyRelation::Root.as_label(), "root");
}

#[test]
fn test_dependency_relation_groups() {
    assert!(DependencyRelation::PassiveNominalSubject.is_subject());
    assert!(DependencyRelation::IndirectObject.is_object());
    assert!(DependencyRelation::ClausalComplement.is_clausal_complement());
    assert!(DependencyRelation::PassiveAuxiliary.is_auxiliary());
    assert!(DependencyRelation::AdverbialClause.is_modifier());
    assert!(!DependencyRelation::Marker.is_modifier());
}

// =========================================================================
// PosTag tests
// =========================================================================

#[test]
fn test_pos_tag_from_tag() {
    assert_eq!(PosTag::from_tag("NN"), PosTag::Noun);
    assert_eq!(PosTag::from_tag("vbd"), PosTag::VerbPast);
    assert_eq!(PosTag::from_tag("VBZ"), PosTag::VerbThirdSingular);
    assert_eq!(PosTag::from_tag("PRP$"), PosTag::PossessivePronoun);
    assert_eq!(PosTag::from_tag("PROPN"), PosTag::ProperNoun);
    assert_eq!(PosTag::from_tag("???"), PosTag::Unknown);
}

#[test]
fn test_pos_tag_round_trip_labels() {
    for tag in ["NN", "NNS", "PRP", "MD", "VB", "VBD", "VBG", "VBN", "VBP", "VBZ", "JJ", "RB"] {
        assert_eq!(PosTag::from_tag(tag).as_tag(), tag);
    }
}

#[test]
fn test_pos_tag_predicates() {
    assert!(PosTag::VerbPast.is_verb());
    assert!(!PosTag::Modal.is_verb());
    assert!(PosTag::VerbPastParticiple.is_past());
    assert!(!PosTag::VerbThirdSingular.is_past());
    assert!(PosTag::Pronoun.is_nominal());
    assert!(!PosTag::Determiner.is_nominal());
    assert!(PosTag::PluralProperNoun.is_proper_noun());
}

// =========================================================================
// Graph and sentence tests
// =========================================================================

#[test]
fn test_graph_subtree_and_children() {
    let mut graph = DependencyGraph::new().with_root(1);
    graph.add_edge(1, 0, DependencyRelation::NominalSubject);
    graph.add_edge(1, 3, DependencyRelation::OpenClausalComplement);
    graph.add_edge(3, 2, DependencyRelation::NominalSubject);
    graph.add_edge(3, 4, DependencyRelation::AdjectivalComplement);

    assert_eq!(graph.root(), Some(1));
    assert_eq!(graph.len(), 4);
    assert_eq!(graph.subtree(3), vec![2, 3, 4]);
    assert_eq!(graph.subtree(4), vec![4]);
    assert_eq!(
        graph.children_with_relation(1, DependencyRelation::NominalSubject),
        vec![0]
    );
    assert_eq!(graph.outgoing(3).count(), 2);
}

#[test]
fn test_graph_subtree_tolerates_cycles() {
    let mut graph = DependencyGraph::new();
    graph.add_edge(0, 1, DependencyRelation::Unknown);
    graph.add_edge(1, 0, DependencyRelation::Unknown);
    assert_eq!(graph.subtree(0), vec![0, 1]);
}

#[test]
fn test_graph_labeled_edge() {
    let mut graph = DependencyGraph::new();
    graph.add_labeled_edge(1, 2, "advmod", "never");
    assert_eq!(graph.edges()[0].relation, DependencyRelation::Negation);
}

#[test]
fn test_sentence_rejects_out_of_range_edges() {
    let tokens = vec![Token::new("Hi", 0), Token::new("!", 2)];
    let mut graph = DependencyGraph::new().with_root(0);
    graph.add_edge(0, 5, DependencyRelation::Punctuation);
    let result = Sentence::new(tokens.clone(), graph);
    assert!(matches!(
        result,
        Err(AnnotationError::MalformedGraph { index: 5, len: 2 })
    ));

    let graph = DependencyGraph::new().with_root(9);
    assert!(Sentence::new(tokens, graph).is_err());
}

#[test]
fn test_validate_sentence_built_from_fields() {
    let mut graph = DependencyGraph::new().with_root(1);
    graph.add_edge(1, 7, DependencyRelation::Auxiliary);
    let sentence = Sentence {
        tokens: vec![Token::new("They", 0).with_after(" "), Token::new("go", 5)],
        graph,
        begin: 0,
        end: 7,
    };
    assert!(matches!(
        sentence.validate(),
        Err(AnnotationError::MalformedGraph { index: 7, len: 2 })
    ));

    let sentence = Sentence::new(sentence.tokens, DependencyGraph::new().with_root(1)).unwrap();
    assert!(sentence.validate().is_ok());
}

#[test]
fn test_sentence_render() {
    let tokens = vec![
        Token::new("Hello", 0).with_after(", "),
        Token::new("big", 7).with_after(" "),
        Token::new("world", 11).with_after(""),
    ];
    let sentence = Sentence::new(tokens, DependencyGraph::new()).unwrap();
    assert_eq!(sentence.begin, 0);
    assert_eq!(sentence.end, 16);
    assert_eq!(sentence.text(), "Hello, big world");
    assert!(sentence.root_token().is_none());
}

#[test]
fn test_token_builder() {
    let token = Token::new("Made", 4)
        .with_lemma("make")
        .with_tag(PosTag::VerbPast)
        .with_after(" ");
    assert_eq!(token.end, 8);
    assert_eq!(token.lemma, "make");
    assert!(token.tag.is_past());
}

// =========================================================================
// Tokenization tests
// =========================================================================

#[test]
fn test_empty_text() {
    assert!(annotate("").is_empty());
    assert!(annotate("   \n\t").is_empty());
}

#[test]
fn test_negative_contractions_split() {
    let sentence = single("I can't do this anymore.");
    assert_eq!(texts(&sentence), ["I", "ca", "n't", "do", "this", "anymore", "."]);

    let sentence = single("She won’t go.");
    assert_eq!(texts(&sentence), ["She", "wo", "n’t", "go", "."]);

    let sentence = single("I cannot stop.");
    assert_eq!(texts(&sentence), ["I", "can", "not", "stop", "."]);
}

#[test]
fn test_clitics_split() {
    let sentence = single("He's sure they're right.");
    assert_eq!(
        texts(&sentence),
        ["He", "'s", "sure", "they", "'re", "right", "."]
    );
}

#[test]
fn test_trailing_whitespace_preserved() {
    let sentence = single("Hello,  world.");
    assert_eq!(texts(&sentence), ["Hello", ",", "world", "."]);
    assert_eq!(sentence.tokens[1].after, "  ");
    assert_eq!(sentence.tokens[0].after, "");
}

#[test]
fn test_ellipsis_is_one_token() {
    let sentence = single("Well...");
    assert_eq!(texts(&sentence), ["Well", "..."]);
}

// =========================================================================
// Sentence splitting tests
// =========================================================================

#[test]
fn test_sentence_offsets() {
    let text = "First done. Second unfinished";
    let sentences = annotate(text);
    assert_eq!(sentences.len(), 2);
    assert_eq!((sentences[0].begin, sentences[0].end), (0, 11));
    assert_eq!((sentences[1].begin, sentences[1].end), (12, 29));
    assert_eq!(&text[sentences[0].begin..sentences[0].end], "First done.");
}

#[test]
fn test_abbreviations_do_not_split() {
    let sentences = annotate("Mr. Smith left. He smiled!");
    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[0].tokens[0].text, "Mr.");
    assert_eq!(sentences[1].text(), "He smiled!");
}

#[test]
fn test_closing_quote_stays_with_sentence() {
    let sentences = annotate("\"Stop.\" She left.");
    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[0].text(), "\"Stop.\"");
    assert_eq!(sentences[1].text(), "She left.");
}

// =========================================================================
// Tagging and lemmatization tests
// =========================================================================

#[test]
fn test_causative_tags() {
    assert_eq!(
        tags(&single("She makes me feel happy.")),
        ["PRP", "VBZ", "PRP", "VB", "JJ", "."]
    );
    assert_eq!(
        tags(&single("She made me feel happy.")),
        ["PRP", "VBD", "PRP", "VB", "JJ", "."]
    );
    assert_eq!(
        tags(&single("He will make me feel proud.")),
        ["PRP", "MD", "VB", "PRP", "VB", "JJ", "."]
    );
}

#[test]
fn test_participle_after_have() {
    let sentence = single("I have made it.");
    assert_eq!(sentence.tokens[1].tag, PosTag::VerbPresent);
    assert_eq!(sentence.tokens[2].tag, PosTag::VerbPastParticiple);
}

#[test]
fn test_participle_after_linking_verb_is_adjective() {
    let sentence = single("I feel loved.");
    assert_eq!(sentence.tokens[2].tag, PosTag::Adjective);
}

#[test]
fn test_her_object_or_possessive() {
    let sentence = single("He makes her happy.");
    assert_eq!(sentence.tokens[2].tag, PosTag::Pronoun);

    let sentence = single("I like her dog.");
    assert_eq!(sentence.tokens[2].tag, PosTag::PossessivePronoun);
}

#[test]
fn test_lemmas() {
    let sentence = single("She encourages him to be confident.");
    assert_eq!(sentence.tokens[1].lemma, "encourage");

    let sentence = single("I can't do this anymore.");
    assert_eq!(sentence.tokens[1].lemma, "can");
    assert_eq!(sentence.tokens[2].lemma, "not");

    let sentence = single("The dogs barked.");
    assert_eq!(sentence.tokens[1].lemma, "dog");
    assert_eq!(sentence.tokens[2].lemma, "bark");

    let sentence = single("Stop fucking around.");
    assert_eq!(sentence.tokens[1].lemma, "fuck");
}

#[test]
fn test_sentence_initial_capitals() {
    let sentence = single("Bastards left.");
    assert_eq!(sentence.tokens[0].tag, PosTag::PluralNoun);
    assert_eq!(sentence.tokens[0].lemma, "bastard");

    let sentence = single("Music makes me feel alive.");
    assert_eq!(sentence.tokens[0].tag, PosTag::Noun);

    let sentence = single("Work makes me feel tired.");
    assert_eq!(sentence.tokens[0].tag, PosTag::Noun);
    assert!(has_edge(&sentence, "makes", "Work", DependencyRelation::NominalSubject));

    // Names keep their reading at the start and inside a sentence.
    let sentence = single("James makes me laugh.");
    assert_eq!(sentence.tokens[0].tag, PosTag::ProperNoun);
    let sentence = single("I met Anna.");
    assert_eq!(sentence.tokens[2].tag, PosTag::ProperNoun);
}

// =========================================================================
// Dependency parsing tests
// =========================================================================

#[test]
fn test_parse_causative() {
    let sentence = single("She makes me feel happy.");
    assert_eq!(sentence.root_token().map(|t| t.text.as_str()), Some("makes"));
    assert!(has_edge(&sentence, "makes", "She", DependencyRelation::NominalSubject));
    assert!(has_edge(&sentence, "makes", "me", DependencyRelation::DirectObject));
    assert!(has_edge(&sentence, "makes", "feel", DependencyRelation::OpenClausalComplement));
    assert!(has_edge(&sentence, "feel", "happy", DependencyRelation::AdjectivalComplement));
    assert!(has_edge(&sentence, "makes", ".", DependencyRelation::Punctuation));
}

#[test]
fn test_parse_negated_auxiliary() {
    let sentence = single("She doesn't make me feel sad.");
    assert_eq!(sentence.root_token().map(|t| t.text.as_str()), Some("make"));
    assert!(has_edge(&sentence, "make", "does", DependencyRelation::Auxiliary));
    assert!(has_edge(&sentence, "make", "n't", DependencyRelation::Negation));
    assert!(has_edge(&sentence, "make", "me", DependencyRelation::DirectObject));
}

#[test]
fn test_parse_modal() {
    let sentence = single("He will make me feel proud.");
    assert!(has_edge(&sentence, "make", "will", DependencyRelation::Auxiliary));
    assert!(has_edge(&sentence, "make", "He", DependencyRelation::NominalSubject));
}

#[test]
fn test_parse_infinitival_complement() {
    let sentence = single("She encourages him to be confident.");
    assert!(has_edge(&sentence, "encourages", "him", DependencyRelation::DirectObject));
    assert!(has_edge(&sentence, "encourages", "be", DependencyRelation::OpenClausalComplement));
    assert!(has_edge(&sentence, "be", "to", DependencyRelation::Marker));
    assert!(has_edge(&sentence, "be", "confident", DependencyRelation::AdjectivalComplement));
}

#[test]
fn test_parse_subordinate_clause() {
    let sentence = single("He will make me feel proud when he works hard.");
    assert!(has_edge(&sentence, "make", "works", DependencyRelation::AdverbialClause));
    assert!(has_edge(&sentence, "works", "when", DependencyRelation::Marker));
    assert!(has_edge(&sentence, "works", "he", DependencyRelation::NominalSubject));
    assert!(has_edge(&sentence, "works", "hard", DependencyRelation::AdverbialModifier));
}

#[test]
fn test_parse_leading_subordinate_clause() {
    let sentence = single("When she smiles, she makes me feel happy.");
    assert_eq!(sentence.root_token().map(|t| t.text.as_str()), Some("makes"));
    assert!(has_edge(&sentence, "makes", "smiles", DependencyRelation::AdverbialClause));
    assert!(has_edge(&sentence, "smiles", "When", DependencyRelation::Marker));
}

#[test]
fn test_parse_modal_with_negation() {
    let sentence = single("I can't do this anymore.");
    assert_eq!(sentence.root_token().map(|t| t.text.as_str()), Some("do"));
    assert!(has_edge(&sentence, "do", "ca", DependencyRelation::Auxiliary));
    assert!(has_edge(&sentence, "do", "n't", DependencyRelation::Negation));
    assert!(has_edge(&sentence, "do", "this", DependencyRelation::DirectObject));
    assert!(has_edge(&sentence, "do", "anymore", DependencyRelation::AdverbialModifier));
}

#[test]
fn test_parse_copula() {
    let sentence = single("She is not only talented but also hardworking.");
    assert_eq!(sentence.root_token().map(|t| t.text.as_str()), Some("is"));
    assert!(has_edge(&sentence, "is", "not", DependencyRelation::Negation));
    assert!(has_edge(&sentence, "is", "talented", DependencyRelation::AdjectivalComplement));
    assert!(has_edge(&sentence, "is", "but", DependencyRelation::CoordinatingConjunction));
}

#[test]
fn test_parse_fragment_without_verb() {
    let sentence = single("Great job!");
    assert_eq!(sentence.root_token().map(|t| t.text.as_str()), Some("job"));
}

#[test]
fn test_every_token_attached_once() {
    for text in [
        "She makes me feel happy when he works hard.",
        "The butterfly is beautiful.",
        "I can't do this anymore, but I will try again tomorrow.",
    ] {
        for sentence in annotate(text) {
            let root = sentence.graph.root().unwrap();
            for i in 0..sentence.len() {
                let heads = sentence
                    .graph
                    .edges()
                    .iter()
                    .filter(|e| e.dependent == i)
                    .count();
                let expected = usize::from(i != root);
                assert_eq!(heads, expected, "token {i} in {text:?}");
            }
            assert_eq!(sentence.graph.subtree(root).len(), sentence.len());
        }
    }
}

#[test]
fn test_shared_annotator() {
    let annotator: Arc<dyn Annotator> = Arc::new(RuleBasedAnnotator::new());
    let shared = Arc::clone(&annotator);
    let sentences = shared.annotate("Hi there. Bye.").unwrap();
    assert_eq!(sentences.len(), 2);
}
