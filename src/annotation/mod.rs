//! Annotated-sentence data model and the annotator seam.
//!
//! Every rule in this crate operates on the structures defined here: a
//! [`Sentence`] is an ordered token sequence plus a labeled
//! [`DependencyGraph`]. Where those structures come from is abstracted
//! behind the [`Annotator`] trait so a production tagger/parser can be
//! plugged in. Relation labels and part-of-speech tags from any pipeline are
//! funneled through [`DependencyRelation::from_label`] and
//! [`PosTag::from_tag`], so the rules never see a pipeline's raw vocabulary.
//!
//! [`RuleBasedAnnotator`] is a small heuristic implementation that covers
//! the constructions the rewrite rules reason about.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::AnnotationError;

mod rule_based;

#[cfg(test)]
mod tests;

pub use rule_based::RuleBasedAnnotator;

/// Grammatical relations between a governor and a dependent token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyRelation {
    /// Nominal subject (nsubj).
    NominalSubject,
    /// Passive nominal subject (nsubjpass).
    PassiveNominalSubject,
    /// Direct object (dobj/obj).
    DirectObject,
    /// Indirect object (iobj).
    IndirectObject,
    /// Open clausal complement (xcomp).
    OpenClausalComplement,
    /// Closed clausal complement (ccomp).
    ClausalComplement,
    /// Adjectival complement (acomp).
    AdjectivalComplement,
    /// Predicate nominal after a copula (attr).
    Attribute,
    /// Auxiliary verb (aux).
    Auxiliary,
    /// Passive auxiliary (auxpass).
    PassiveAuxiliary,
    /// Copula (cop).
    Copula,
    /// Negation modifier (neg).
    Negation,
    /// Marker introducing a clause (mark), including infinitival "to".
    Marker,
    /// Adverbial clause (advcl).
    AdverbialClause,
    /// Adverbial modifier (advmod).
    AdverbialModifier,
    /// Adjectival modifier (amod).
    AdjectivalModifier,
    /// Prepositional modifier (prep/case).
    PrepositionalModifier,
    /// Object of preposition (pobj).
    PrepositionalObject,
    /// Nominal or oblique modifier (nmod/obl).
    NominalModifier,
    /// Determiner (det).
    Determiner,
    /// Possessive modifier (poss).
    Possessive,
    /// Compound (compound).
    Compound,
    /// Conjunct (conj).
    Conjunct,
    /// Coordinating conjunction (cc).
    CoordinatingConjunction,
    /// Phrasal-verb particle (prt).
    Particle,
    /// Relative clause modifier (relcl).
    RelativeClause,
    /// Punctuation.
    Punctuation,
    /// Root of the sentence.
    Root,
    /// Unknown or unspecified relation (dep).
    Unknown,
}

impl DependencyRelation {
    /// Parse a dependency relation from a Stanford or Universal Dependencies label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "nsubj" => Self::NominalSubject,
            "nsubjpass" | "nsubj:pass" => Self::PassiveNominalSubject,
            "dobj" | "obj" => Self::DirectObject,
            "iobj" => Self::IndirectObject,
            "xcomp" => Self::OpenClausalComplement,
            "ccomp" => Self::ClausalComplement,
            "acomp" => Self::AdjectivalComplement,
            "attr" => Self::Attribute,
            "aux" => Self::Auxiliary,
            "auxpass" | "aux:pass" => Self::PassiveAuxiliary,
            "cop" => Self::Copula,
            "neg" => Self::Negation,
            "mark" => Self::Marker,
            "advcl" => Self::AdverbialClause,
            "advmod" => Self::AdverbialModifier,
            "amod" => Self::AdjectivalModifier,
            "prep" | "case" => Self::PrepositionalModifier,
            "pobj" => Self::PrepositionalObject,
            "nmod" | "obl" | "npadvmod" | "obl:npmod" | "obl:tmod" | "tmod" => {
                Self::NominalModifier
            }
            "det" | "predet" => Self::Determiner,
            "poss" | "nmod:poss" => Self::Possessive,
            "compound" | "nn" => Self::Compound,
            "conj" => Self::Conjunct,
            "cc" => Self::CoordinatingConjunction,
            "prt" | "compound:prt" => Self::Particle,
            "relcl" | "rcmod" | "acl:relcl" => Self::RelativeClause,
            "punct" => Self::Punctuation,
            "root" => Self::Root,
            _ => Self::Unknown,
        }
    }

    /// Parse a relation label, taking the dependent's lemma into account.
    ///
    /// Universal Dependencies has no `neg` label; negation particles arrive
    /// as `advmod`. They are folded into [`DependencyRelation::Negation`]
    /// here so every pipeline looks the same to the rewrite rules.
    #[must_use]
    pub fn from_label_with_lemma(label: &str, dependent_lemma: &str) -> Self {
        let relation = Self::from_label(label);
        if relation == Self::AdverbialModifier
            && matches!(
                dependent_lemma.to_lowercase().as_str(),
                "not" | "n't" | "n’t" | "never"
            )
        {
            return Self::Negation;
        }
        relation
    }

    /// Convert the relation to its Stanford label.
    #[must_use]
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::NominalSubject => "nsubj",
            Self::PassiveNominalSubject => "nsubjpass",
            Self::DirectObject => "dobj",
            Self::IndirectObject => "iobj",
            Self::OpenClausalComplement => "xcomp",
            Self::ClausalComplement => "ccomp",
            Self::AdjectivalComplement => "acomp",
            Self::Attribute => "attr",
            Self::Auxiliary => "aux",
            Self::PassiveAuxiliary => "auxpass",
            Self::Copula => "cop",
            Self::Negation => "neg",
            Self::Marker => "mark",
            Self::AdverbialClause => "advcl",
            Self::AdverbialModifier => "advmod",
            Self::AdjectivalModifier => "amod",
            Self::PrepositionalModifier => "prep",
            Self::PrepositionalObject => "pobj",
            Self::NominalModifier => "nmod",
            Self::Determiner => "det",
            Self::Possessive => "poss",
            Self::Compound => "compound",
            Self::Conjunct => "conj",
            Self::CoordinatingConjunction => "cc",
            Self::Particle => "prt",
            Self::RelativeClause => "relcl",
            Self::Punctuation => "punct",
            Self::Root => "root",
            Self::Unknown => "dep",
        }
    }

    /// Check if this relation marks a nominal subject (active or passive).
    #[must_use]
    pub fn is_subject(&self) -> bool {
        matches!(self, Self::NominalSubject | Self::PassiveNominalSubject)
    }

    /// Check if this relation marks a direct or indirect object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::DirectObject | Self::IndirectObject)
    }

    /// Check if this relation marks an open or closed clausal complement.
    #[must_use]
    pub fn is_clausal_complement(&self) -> bool {
        matches!(self, Self::OpenClausalComplement | Self::ClausalComplement)
    }

    /// Check if this relation marks an auxiliary (active or passive).
    #[must_use]
    pub fn is_auxiliary(&self) -> bool {
        matches!(self, Self::Auxiliary | Self::PassiveAuxiliary)
    }

    /// Check if this relation attaches an adverbial or prepositional modifier
    /// or a subordinate clause.
    #[must_use]
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Self::AdverbialClause
                | Self::AdverbialModifier
                | Self::PrepositionalModifier
                | Self::NominalModifier
        )
    }
}

/// Penn Treebank part-of-speech tags.
///
/// The fine-grained verb tags are kept apart because tense and person drive
/// the conjugation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosTag {
    /// Singular or mass noun (NN).
    Noun,
    /// Plural noun (NNS).
    PluralNoun,
    /// Singular proper noun (NNP).
    ProperNoun,
    /// Plural proper noun (NNPS).
    PluralProperNoun,
    /// Personal pronoun (PRP).
    Pronoun,
    /// Possessive pronoun (PRP$).
    PossessivePronoun,
    /// Determiner (DT, PDT).
    Determiner,
    /// Preposition or subordinating conjunction (IN).
    Preposition,
    /// Infinitival or prepositional "to" (TO).
    To,
    /// Coordinating conjunction (CC).
    CoordinatingConjunction,
    /// Adverb (RB, RBR, RBS).
    Adverb,
    /// Adjective (JJ, JJR, JJS).
    Adjective,
    /// Modal auxiliary (MD).
    Modal,
    /// Verb, base form (VB).
    VerbBase,
    /// Verb, past tense (VBD).
    VerbPast,
    /// Verb, gerund or present participle (VBG).
    VerbGerund,
    /// Verb, past participle (VBN).
    VerbPastParticiple,
    /// Verb, non-third-person singular present (VBP).
    VerbPresent,
    /// Verb, third-person singular present (VBZ).
    VerbThirdSingular,
    /// Particle (RP).
    Particle,
    /// Wh-determiner, wh-pronoun or wh-adverb (WDT, WP, WP$, WRB).
    WhWord,
    /// Existential "there" (EX).
    Existential,
    /// Possessive ending (POS).
    PossessiveEnding,
    /// Cardinal number (CD).
    Number,
    /// Interjection (UH).
    Interjection,
    /// Punctuation.
    Punctuation,
    /// Symbol (SYM, $, #).
    Symbol,
    /// Unknown tag.
    Unknown,
}

impl PosTag {
    /// Parse a Penn Treebank tag, falling back to Universal Dependencies coarse tags.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_uppercase().as_str() {
            "NN" | "NOUN" => Self::Noun,
            "NNS" => Self::PluralNoun,
            "NNP" | "PROPN" => Self::ProperNoun,
            "NNPS" => Self::PluralProperNoun,
            "PRP" | "PRON" => Self::Pronoun,
            "PRP$" => Self::PossessivePronoun,
            "DT" | "PDT" | "DET" => Self::Determiner,
            "IN" | "ADP" | "SCONJ" => Self::Preposition,
            "TO" => Self::To,
            "CC" | "CCONJ" => Self::CoordinatingConjunction,
            "RB" | "RBR" | "RBS" | "ADV" => Self::Adverb,
            "JJ" | "JJR" | "JJS" | "ADJ" => Self::Adjective,
            "MD" => Self::Modal,
            "VB" | "VERB" | "AUX" => Self::VerbBase,
            "VBD" => Self::VerbPast,
            "VBG" => Self::VerbGerund,
            "VBN" => Self::VerbPastParticiple,
            "VBP" => Self::VerbPresent,
            "VBZ" => Self::VerbThirdSingular,
            "RP" | "PART" => Self::Particle,
            "WDT" | "WP" | "WP$" | "WRB" => Self::WhWord,
            "EX" => Self::Existential,
            "POS" => Self::PossessiveEnding,
            "CD" | "NUM" => Self::Number,
            "UH" | "INTJ" => Self::Interjection,
            "." | "," | ":" | "``" | "''" | "-LRB-" | "-RRB-" | "HYPH" | "NFP" | "PUNCT" => {
                Self::Punctuation
            }
            "SYM" | "$" | "#" => Self::Symbol,
            _ => Self::Unknown,
        }
    }

    /// Convert the tag to its Penn Treebank label.
    #[must_use]
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Noun => "NN",
            Self::PluralNoun => "NNS",
            Self::ProperNoun => "NNP",
            Self::PluralProperNoun => "NNPS",
            Self::Pronoun => "PRP",
            Self::PossessivePronoun => "PRP$",
            Self::Determiner => "DT",
            Self::Preposition => "IN",
            Self::To => "TO",
            Self::CoordinatingConjunction => "CC",
            Self::Adverb => "RB",
            Self::Adjective => "JJ",
            Self::Modal => "MD",
            Self::VerbBase => "VB",
            Self::VerbPast => "VBD",
            Self::VerbGerund => "VBG",
            Self::VerbPastParticiple => "VBN",
            Self::VerbPresent => "VBP",
            Self::VerbThirdSingular => "VBZ",
            Self::Particle => "RP",
            Self::WhWord => "WP",
            Self::Existential => "EX",
            Self::PossessiveEnding => "POS",
            Self::Number => "CD",
            Self::Interjection => "UH",
            Self::Punctuation => ".",
            Self::Symbol => "SYM",
            Self::Unknown => "XX",
        }
    }

    /// Check if this tag represents any verb form (modals excluded).
    #[must_use]
    pub fn is_verb(&self) -> bool {
        matches!(
            self,
            Self::VerbBase
                | Self::VerbPast
                | Self::VerbGerund
                | Self::VerbPastParticiple
                | Self::VerbPresent
                | Self::VerbThirdSingular
        )
    }

    /// Check if this tag is a finite or non-finite past form (VBD, VBN).
    #[must_use]
    pub fn is_past(&self) -> bool {
        matches!(self, Self::VerbPast | Self::VerbPastParticiple)
    }

    /// Check if this tag represents a nominal (noun or pronoun).
    #[must_use]
    pub fn is_nominal(&self) -> bool {
        matches!(
            self,
            Self::Noun
                | Self::PluralNoun
                | Self::ProperNoun
                | Self::PluralProperNoun
                | Self::Pronoun
                | Self::Number
                | Self::Existential
        )
    }

    /// Check if this tag represents a proper noun.
    #[must_use]
    pub fn is_proper_noun(&self) -> bool {
        matches!(self, Self::ProperNoun | Self::PluralProperNoun)
    }
}

/// A single token produced by an annotation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text.
    pub text: String,
    /// Dictionary form.
    pub lemma: String,
    /// Part-of-speech tag.
    pub tag: PosTag,
    /// Text between this token and the next one (usually whitespace).
    pub after: String,
    /// Byte offset of the token start in the annotated text.
    pub begin: usize,
    /// Byte offset one past the token end in the annotated text.
    pub end: usize,
}

impl Token {
    /// Create a new token spanning `text` at byte offset `begin`.
    #[must_use]
    pub fn new(text: &str, begin: usize) -> Self {
        Self {
            text: text.to_string(),
            lemma: text.to_lowercase(),
            tag: PosTag::Unknown,
            after: String::new(),
            begin,
            end: begin + text.len(),
        }
    }

    /// Set the lemma.
    #[must_use]
    pub fn with_lemma(mut self, lemma: &str) -> Self {
        self.lemma = lemma.to_string();
        self
    }

    /// Set the POS tag.
    #[must_use]
    pub fn with_tag(mut self, tag: PosTag) -> Self {
        self.tag = tag;
        self
    }

    /// Set the trailing text.
    #[must_use]
    pub fn with_after(mut self, after: &str) -> Self {
        self.after = after.to_string();
        self
    }
}

/// A labeled edge from a governor token to a dependent token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Index of the governing token.
    pub governor: usize,
    /// Index of the dependent token.
    pub dependent: usize,
    /// Grammatical relation.
    pub relation: DependencyRelation,
}

/// Directed dependency graph over a sentence's token indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    edges: Vec<Edge>,
    root: Option<usize>,
}

impl DependencyGraph {
    /// Create an empty graph with no root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root token.
    #[must_use]
    pub fn with_root(mut self, root: usize) -> Self {
        self.root = Some(root);
        self
    }

    /// Set the root token in place.
    pub fn set_root(&mut self, root: usize) {
        self.root = Some(root);
    }

    /// Add an edge.
    pub fn add_edge(&mut self, governor: usize, dependent: usize, relation: DependencyRelation) {
        self.edges.push(Edge {
            governor,
            dependent,
            relation,
        });
    }

    /// Add an edge from a raw pipeline label.
    pub fn add_labeled_edge(
        &mut self,
        governor: usize,
        dependent: usize,
        label: &str,
        dependent_lemma: &str,
    ) {
        self.add_edge(
            governor,
            dependent,
            DependencyRelation::from_label_with_lemma(label, dependent_lemma),
        );
    }

    /// Index of the root token, if one was discovered.
    #[must_use]
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// All edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges leaving `governor`.
    pub fn outgoing(&self, governor: usize) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.governor == governor)
    }

    /// Dependents of `governor` attached with `relation`, in insertion order.
    #[must_use]
    pub fn children_with_relation(
        &self,
        governor: usize,
        relation: DependencyRelation,
    ) -> Vec<usize> {
        self.outgoing(governor)
            .filter(|e| e.relation == relation)
            .map(|e| e.dependent)
            .collect()
    }

    /// Every token reachable from `index`, including `index`, sorted by position.
    #[must_use]
    pub fn subtree(&self, index: usize) -> Vec<usize> {
        let mut seen = HashSet::from([index]);
        let mut queue = VecDeque::from([index]);
        while let Some(current) = queue.pop_front() {
            for edge in self.outgoing(current) {
                if seen.insert(edge.dependent) {
                    queue.push_back(edge.dependent);
                }
            }
        }
        let mut indices: Vec<usize> = seen.into_iter().collect();
        indices.sort_unstable();
        indices
    }

    /// Check if the graph has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }
}

/// One annotated sentence: tokens plus their dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Tokens in sentence order.
    pub tokens: Vec<Token>,
    /// Dependency graph over `tokens`.
    pub graph: DependencyGraph,
    /// Byte offset of the sentence start in the annotated text.
    pub begin: usize,
    /// Byte offset one past the sentence end in the annotated text.
    pub end: usize,
}

impl Sentence {
    /// Build a sentence, checking that every edge refers to an existing token.
    ///
    /// Offsets are taken from the first and last token.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotationError::MalformedGraph`] if an edge or the root
    /// points past the end of `tokens`.
    pub fn new(tokens: Vec<Token>, graph: DependencyGraph) -> Result<Self, AnnotationError> {
        let begin = tokens.first().map_or(0, |t| t.begin);
        let end = tokens.last().map_or(begin, |t| t.end);
        let sentence = Self {
            tokens,
            graph,
            begin,
            end,
        };
        sentence.validate()?;
        Ok(sentence)
    }

    /// Check that every edge and the root refer to an existing token.
    ///
    /// The fields are public, so sentences built without [`Sentence::new`]
    /// are checked again before any rewrite reads them.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotationError::MalformedGraph`] with the first index that
    /// points past the end of `tokens`.
    pub fn validate(&self) -> Result<(), AnnotationError> {
        let len = self.tokens.len();
        let out_of_range = self
            .graph
            .edges()
            .iter()
            .flat_map(|e| [e.governor, e.dependent])
            .chain(self.graph.root())
            .find(|&i| i >= len);
        match out_of_range {
            Some(index) => Err(AnnotationError::MalformedGraph { index, len }),
            None => Ok(()),
        }
    }

    /// The root token, if the graph has one.
    #[must_use]
    pub fn root_token(&self) -> Option<&Token> {
        self.graph.root().and_then(|i| self.tokens.get(i))
    }

    /// Reconstruct the sentence text from its tokens, without trailing whitespace.
    #[must_use]
    pub fn text(&self) -> String {
        crate::rewrite::render_tokens(&self.tokens, None, true)
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the sentence has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// An external syntactic annotation pipeline.
///
/// Implementations tokenize, split sentences, tag, lemmatize and parse.
/// They must be shareable across threads; every rewrite operation asks for
/// a fresh annotation of its own input.
pub trait Annotator: Send + Sync {
    /// Annotate `text` into sentences.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline fails. Callers in this crate log the
    /// failure and treat it as an empty annotation.
    fn annotate(&self, text: &str) -> Result<Vec<Sentence>, AnnotationError>;
}

impl<A: Annotator + ?Sized> Annotator for std::sync::Arc<A> {
    fn annotate(&self, text: &str) -> Result<Vec<Sentence>, AnnotationError> {
        (**self).annotate(text)
    }
}
