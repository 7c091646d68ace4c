//! Heuristic annotator for English text.
//!
//! Tokenizes Penn-Treebank style (negative contractions split into host and
//! `n't`, clitics split off), splits sentences on terminal punctuation, tags
//! with closed-class tables plus suffix heuristics, and builds a dependency
//! graph clause by clause. It does not attempt general parsing; it covers
//! verb groups, subjects, objects, causative and control complements,
//! adjectival complements, prepositional phrases and subordinate clauses.

use std::collections::{HashMap, HashSet};

use super::{Annotator, DependencyGraph, DependencyRelation, PosTag, Sentence, Token};
use crate::error::AnnotationError;

/// Verb paradigms: base, third-person singular, past, past participle, gerund.
const VERBS: &[(&str, &str, &str, &str, &str)] = &[
    ("be", "is", "was", "been", "being"),
    ("have", "has", "had", "had", "having"),
    ("do", "does", "did", "done", "doing"),
    ("make", "makes", "made", "made", "making"),
    ("let", "lets", "let", "let", "letting"),
    ("help", "helps", "helped", "helped", "helping"),
    ("get", "gets", "got", "gotten", "getting"),
    ("cause", "causes", "caused", "caused", "causing"),
    ("force", "forces", "forced", "forced", "forcing"),
    ("encourage", "encourages", "encouraged", "encouraged", "encouraging"),
    ("want", "wants", "wanted", "wanted", "wanting"),
    ("tell", "tells", "told", "told", "telling"),
    ("ask", "asks", "asked", "asked", "asking"),
    ("allow", "allows", "allowed", "allowed", "allowing"),
    ("inspire", "inspires", "inspired", "inspired", "inspiring"),
    ("motivate", "motivates", "motivated", "motivated", "motivating"),
    ("push", "pushes", "pushed", "pushed", "pushing"),
    ("remind", "reminds", "reminded", "reminded", "reminding"),
    ("teach", "teaches", "taught", "taught", "teaching"),
    ("expect", "expects", "expected", "expected", "expecting"),
    ("need", "needs", "needed", "needed", "needing"),
    ("drive", "drives", "drove", "driven", "driving"),
    ("lead", "leads", "led", "led", "leading"),
    ("enable", "enables", "enabled", "enabled", "enabling"),
    ("invite", "invites", "invited", "invited", "inviting"),
    ("urge", "urges", "urged", "urged", "urging"),
    ("persuade", "persuades", "persuaded", "persuaded", "persuading"),
    ("convince", "convinces", "convinced", "convinced", "convincing"),
    ("feel", "feels", "felt", "felt", "feeling"),
    ("go", "goes", "went", "gone", "going"),
    ("see", "sees", "saw", "seen", "seeing"),
    ("watch", "watches", "watched", "watched", "watching"),
    ("hear", "hears", "heard", "heard", "hearing"),
    ("work", "works", "worked", "worked", "working"),
    ("smile", "smiles", "smiled", "smiled", "smiling"),
    ("try", "tries", "tried", "tried", "trying"),
    ("think", "thinks", "thought", "thought", "thinking"),
    ("know", "knows", "knew", "known", "knowing"),
    ("become", "becomes", "became", "become", "becoming"),
    ("seem", "seems", "seemed", "seemed", "seeming"),
    ("look", "looks", "looked", "looked", "looking"),
    ("sound", "sounds", "sounded", "sounded", "sounding"),
    ("appear", "appears", "appeared", "appeared", "appearing"),
    ("remain", "remains", "remained", "remained", "remaining"),
    ("stay", "stays", "stayed", "stayed", "staying"),
    ("grow", "grows", "grew", "grown", "growing"),
    ("keep", "keeps", "kept", "kept", "keeping"),
    ("leave", "leaves", "left", "left", "leaving"),
    ("give", "gives", "gave", "given", "giving"),
    ("take", "takes", "took", "taken", "taking"),
    ("come", "comes", "came", "come", "coming"),
    ("say", "says", "said", "said", "saying"),
    ("like", "likes", "liked", "liked", "liking"),
    ("love", "loves", "loved", "loved", "loving"),
    ("hate", "hates", "hated", "hated", "hating"),
    ("talk", "talks", "talked", "talked", "talking"),
    ("listen", "listens", "listened", "listened", "listening"),
    ("laugh", "laughs", "laughed", "laughed", "laughing"),
    ("cry", "cries", "cried", "cried", "crying"),
    ("fail", "fails", "failed", "failed", "failing"),
    ("succeed", "succeeds", "succeeded", "succeeded", "succeeding"),
    ("win", "wins", "won", "won", "winning"),
    ("lose", "loses", "lost", "lost", "losing"),
    ("believe", "believes", "believed", "believed", "believing"),
    ("understand", "understands", "understood", "understood", "understanding"),
    ("find", "finds", "found", "found", "finding"),
    ("call", "calls", "called", "called", "calling"),
    ("treat", "treats", "treated", "treated", "treating"),
    ("support", "supports", "supported", "supported", "supporting"),
    ("criticize", "criticizes", "criticized", "criticized", "criticizing"),
    ("ignore", "ignores", "ignored", "ignored", "ignoring"),
    ("run", "runs", "ran", "run", "running"),
    ("stop", "stops", "stopped", "stopped", "stopping"),
    ("start", "starts", "started", "started", "starting"),
    ("change", "changes", "changed", "changed", "changing"),
    ("finish", "finishes", "finished", "finished", "finishing"),
    ("play", "plays", "played", "played", "playing"),
    ("read", "reads", "read", "read", "reading"),
    ("write", "writes", "wrote", "written", "writing"),
    ("speak", "speaks", "spoke", "spoken", "speaking"),
    ("sleep", "sleeps", "slept", "slept", "sleeping"),
    ("eat", "eats", "ate", "eaten", "eating"),
    ("live", "lives", "lived", "lived", "living"),
    ("study", "studies", "studied", "studied", "studying"),
    ("worry", "worries", "worried", "worried", "worrying"),
    ("care", "cares", "cared", "cared", "caring"),
    ("bring", "brings", "brought", "brought", "bringing"),
    ("buy", "buys", "bought", "bought", "buying"),
    ("pay", "pays", "paid", "paid", "paying"),
    ("spend", "spends", "spent", "spent", "spending"),
    ("meet", "meets", "met", "met", "meeting"),
    ("use", "uses", "used", "used", "using"),
    ("learn", "learns", "learned", "learned", "learning"),
    ("trust", "trusts", "trusted", "trusted", "trusting"),
    ("blame", "blames", "blamed", "blamed", "blaming"),
    ("forgive", "forgives", "forgave", "forgiven", "forgiving"),
    ("hurt", "hurts", "hurt", "hurt", "hurting"),
    ("put", "puts", "put", "put", "putting"),
    ("wait", "waits", "waited", "waited", "waiting"),
    ("exercise", "exercises", "exercised", "exercised", "exercising"),
    ("relax", "relaxes", "relaxed", "relaxed", "relaxing"),
    ("handle", "handles", "handled", "handled", "handling"),
    ("manage", "manages", "managed", "managed", "managing"),
];

/// Forms not covered by the paradigm table.
const EXTRA_VERB_FORMS: &[(&str, &str, PosTag)] = &[
    ("am", "be", PosTag::VerbPresent),
    ("are", "be", PosTag::VerbPresent),
    ("were", "be", PosTag::VerbPast),
];

/// Verbs whose object doubles as the subject of a following complement.
const CONTROL_VERBS: &[&str] = &[
    "make", "let", "help", "have", "get", "cause", "force", "encourage", "want", "tell", "ask",
    "allow", "inspire", "motivate", "push", "remind", "teach", "expect", "need", "drive", "lead",
    "enable", "invite", "urge", "persuade", "convince", "watch", "see", "hear",
];

/// Verbs that take an adjectival complement.
const LINKING_VERBS: &[&str] = &[
    "be", "feel", "seem", "become", "look", "sound", "get", "stay", "remain", "appear", "grow",
];

/// Words that open an adverbial subordinate clause.
const SUBORDINATORS: &[&str] = &[
    "when", "whenever", "because", "if", "while", "since", "although", "though", "unless",
    "until", "till", "whereas", "once", "after", "before", "as",
];

const MODALS: &[(&str, &str)] = &[
    ("can", "can"),
    ("could", "could"),
    ("will", "will"),
    ("would", "would"),
    ("shall", "shall"),
    ("should", "should"),
    ("may", "may"),
    ("might", "might"),
    ("must", "must"),
    ("ought", "ought"),
    ("ca", "can"),
    ("wo", "will"),
    ("sha", "shall"),
];

const SUBJECT_PRONOUNS: &[&str] = &["i", "you", "he", "she", "it", "we", "they"];
const OBJECT_PRONOUNS: &[&str] = &["me", "him", "us", "them"];
const REFLEXIVE_PRONOUNS: &[&str] = &[
    "myself", "yourself", "himself", "herself", "itself", "ourselves", "yourselves", "themselves",
];
const POSSESSIVE_PRONOUNS: &[&str] = &["my", "your", "his", "its", "our", "their"];
const INDEFINITE_PRONOUNS: &[&str] = &[
    "someone", "somebody", "everyone", "everybody", "anyone", "anybody", "nobody", "nothing",
    "something", "everything", "anything", "none",
];
const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "some", "any", "no", "every", "each", "all",
    "another", "either", "neither", "both", "such",
];
const PREPOSITIONS: &[&str] = &[
    "in", "on", "at", "for", "with", "by", "from", "of", "about", "into", "onto", "through",
    "during", "above", "below", "between", "under", "over", "around", "without", "within",
    "against", "toward", "towards", "near", "across", "behind", "beside", "besides", "upon", "off",
    "out", "up", "down", "along", "among", "past", "beyond", "despite", "except", "per", "via",
];
const WH_WORDS: &[&str] = &[
    "who", "whom", "whose", "which", "what", "where", "why", "how", "when", "whenever",
];
const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor"];
const ADVERBS: &[&str] = &[
    "very", "also", "too", "always", "often", "never", "just", "only", "still", "even", "already",
    "almost", "really", "quite", "rather", "so", "anymore", "again", "here", "now", "then", "soon",
    "sometimes", "usually", "ever", "not", "hardly", "barely", "scarcely", "rarely", "seldom",
    "merely", "simply", "maybe", "perhaps", "together", "away", "back", "well", "yet", "today",
    "tomorrow", "yesterday", "however", "instead", "much", "more", "most", "less", "least",
];
const ADJECTIVES: &[&str] = &[
    "happy", "sad", "proud", "angry", "confident", "bad", "good", "great", "guilty", "small",
    "stupid", "worthless", "anxious", "nervous", "calm", "safe", "afraid", "tired", "hardworking",
    "talented", "clean", "beautiful", "better", "worse", "important", "useless", "lonely", "alone",
    "scared", "upset", "strong", "weak", "brave", "lazy", "ashamed", "excited", "grateful",
    "special", "smart", "bored", "awful", "terrible", "wonderful", "amazing", "free", "sick",
    "ugly", "fine", "glad", "sorry", "insecure", "secure", "inferior", "superior", "jealous",
    "embarrassed", "frustrated", "overwhelmed", "stressed", "depressed", "miserable", "content",
    "comfortable", "uncomfortable", "dumb", "crazy", "capable", "incapable", "able", "unable",
    "responsible", "kind", "nice", "rude", "clever", "funny", "silly", "serious", "sure", "unsure",
    "certain", "relaxed", "energetic", "brilliant", "dirty", "new", "old", "big", "little",
    "young", "whole", "hard", "easy", "difficult", "possible", "impossible", "real", "true",
    "false", "right", "wrong", "wise", "creative", "worthy", "unworthy", "loved", "valued",
    "respected", "appreciated", "heard", "seen", "enough", "ready", "busy", "late", "early",
];
/// Words ending in "-ing" that are not gerunds.
const ING_NOUNS: &[&str] = &[
    "thing", "nothing", "something", "anything", "everything", "morning", "evening", "king",
    "ring", "spring", "string", "wedding", "building", "ceiling", "sibling", "darling", "during",
];
/// Common nouns that open sentences often enough to matter when capitalized.
const COMMON_NOUNS: &[&str] = &[
    "music", "life", "love", "money", "school", "family", "people", "stress", "anxiety", "fear",
    "pain", "noise", "news", "food", "art", "nature", "weather", "time", "home", "job", "sport",
    "exercise", "sleep", "rain", "coffee", "failure", "success", "criticism", "praise", "silence",
    "history", "math", "science", "homework", "traffic", "society",
];
const ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "vs.", "etc.", "e.g.", "i.e.",
    "approx.", "dept.", "inc.", "ltd.", "co.", "mt.",
];
const OPENING_PUNCT: &[char] = &['"', '\'', '“', '‘', '(', '[', '{'];
const CLOSING_PUNCT: &[char] = &[
    '.', ',', '!', '?', ';', ':', '"', '\'', '”', '’', ')', ']', '}', '…',
];
const TERMINAL_PUNCT: &[char] = &['.', '!', '?', '…'];
const NEGATION_LEMMAS: &[&str] = &["not", "never"];

/// A tokenized-but-untagged span.
#[derive(Debug, Clone, Copy)]
struct Span {
    begin: usize,
    end: usize,
}

/// Heuristic English annotator.
///
/// This annotator uses tables and heuristics to approximate a tagger and a
/// dependency parser without requiring external NLP libraries. Relation
/// labels follow Stanford conventions.
pub struct RuleBasedAnnotator {
    /// Inflected verb form to lemma and tag.
    verb_forms: HashMap<String, (String, PosTag)>,
    /// Verb forms whose past tense and past participle coincide.
    ambiguous_past: HashSet<String>,
    /// Lowercased abbreviations that keep their period.
    abbreviations: HashSet<&'static str>,
}

impl Default for RuleBasedAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBasedAnnotator {
    /// Create a new rule-based annotator.
    #[must_use]
    pub fn new() -> Self {
        let mut verb_forms = HashMap::new();
        let mut ambiguous_past = HashSet::new();
        for &(base, third, past, participle, gerund) in VERBS {
            let mut insert = |form: &str, tag: PosTag| {
                verb_forms.insert(form.to_string(), (base.to_string(), tag));
            };
            insert(gerund, PosTag::VerbGerund);
            insert(participle, PosTag::VerbPastParticiple);
            insert(past, PosTag::VerbPast);
            insert(third, PosTag::VerbThirdSingular);
            // Base last: "read", "let", "put" keep the base reading.
            insert(base, PosTag::VerbBase);
            if past == participle && past != base {
                ambiguous_past.insert(past.to_string());
            }
        }
        for &(form, lemma, tag) in EXTRA_VERB_FORMS {
            verb_forms.insert(form.to_string(), (lemma.to_string(), tag));
        }

        Self {
            verb_forms,
            ambiguous_past,
            abbreviations: ABBREVIATIONS.iter().copied().collect(),
        }
    }

    // ---------------------------------------------------------------------
    // Tokenization
    // ---------------------------------------------------------------------

    /// Split text into token spans.
    fn tokenize(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut chunk_start = None;
        for (i, c) in text.char_indices() {
            if c.is_whitespace() {
                if let Some(start) = chunk_start.take() {
                    self.split_chunk(text, start, i, &mut spans);
                }
            } else if chunk_start.is_none() {
                chunk_start = Some(i);
            }
        }
        if let Some(start) = chunk_start {
            self.split_chunk(text, start, text.len(), &mut spans);
        }
        spans
    }

    /// Split one whitespace-delimited chunk into spans.
    fn split_chunk(&self, text: &str, start: usize, end: usize, out: &mut Vec<Span>) {
        let mut begin = start;
        while let Some(c) = text[begin..end].chars().next() {
            if OPENING_PUNCT.contains(&c) && begin + c.len_utf8() < end {
                out.push(Span {
                    begin,
                    end: begin + c.len_utf8(),
                });
                begin += c.len_utf8();
            } else {
                break;
            }
        }

        let mut core_end = end;
        let mut trailing: Vec<Span> = Vec::new();
        while core_end > begin {
            let Some(c) = text[begin..core_end].chars().next_back() else {
                break;
            };
            if !CLOSING_PUNCT.contains(&c) {
                break;
            }
            let char_start = core_end - c.len_utf8();
            if c == '.' && trailing.is_empty() && self.keeps_period(&text[begin..char_start]) {
                break;
            }
            match trailing.last_mut() {
                // Runs of periods form one token ("...").
                Some(last) if c == '.' && text[last.begin..last.end].starts_with('.') => {
                    last.begin = char_start;
                }
                _ => trailing.push(Span {
                    begin: char_start,
                    end: core_end,
                }),
            }
            core_end = char_start;
        }

        if core_end > begin {
            Self::split_contractions(text, begin, core_end, out);
        }
        out.extend(trailing.into_iter().rev());
    }

    /// Check if `core` followed by a period is an abbreviation or an initial.
    fn keeps_period(&self, core: &str) -> bool {
        if core.is_empty() {
            return false;
        }
        let mut chars = core.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && c.is_uppercase()
            && c != 'I'
        {
            return true;
        }
        let candidate = format!("{}.", core.to_lowercase());
        self.abbreviations.contains(candidate.as_str())
    }

    /// Split negative contractions and clitics off a word.
    fn split_contractions(text: &str, begin: usize, end: usize, out: &mut Vec<Span>) {
        let word = &text[begin..end];
        let ends_with = |suffix: &str| {
            word.len() > suffix.len()
                && word
                    .get(word.len() - suffix.len()..)
                    .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
        };

        let split_at = if word.eq_ignore_ascii_case("cannot") {
            Some(begin + 3)
        } else if let Some(suffix) = ["n't", "n’t"].into_iter().find(|s| ends_with(s)) {
            Some(end - suffix.len())
        } else {
            [
                "'s", "'re", "'ve", "'ll", "'d", "'m", "’s", "’re", "’ve", "’ll", "’d", "’m",
            ]
            .into_iter()
            .find(|s| ends_with(s))
            .map(|suffix| end - suffix.len())
            .filter(|&at| text[begin..at].chars().all(char::is_alphabetic))
        };

        match split_at {
            Some(at) if at > begin => {
                out.push(Span { begin, end: at });
                out.push(Span { begin: at, end });
            }
            _ => out.push(Span { begin, end }),
        }
    }

    /// Group token spans into sentences; returns index ranges into `spans`.
    fn split_sentences(text: &str, spans: &[Span]) -> Vec<std::ops::Range<usize>> {
        let mut ranges = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i < spans.len() {
            let word = &text[spans[i].begin..spans[i].end];
            if word.chars().all(|c| TERMINAL_PUNCT.contains(&c)) {
                // Absorb closing quotes and brackets glued to the terminator.
                while i + 1 < spans.len() && spans[i + 1].begin == spans[i].end {
                    let next = &text[spans[i + 1].begin..spans[i + 1].end];
                    if next
                        .chars()
                        .all(|c| CLOSING_PUNCT.contains(&c) && !matches!(c, ',' | ';' | ':'))
                    {
                        i += 1;
                    } else {
                        break;
                    }
                }
                ranges.push(start..i + 1);
                start = i + 1;
            }
            i += 1;
        }
        if start < spans.len() {
            ranges.push(start..spans.len());
        }
        ranges
    }

    // ---------------------------------------------------------------------
    // Tagging and lemmatization
    // ---------------------------------------------------------------------

    /// Tag and lemmatize a sentence's words.
    fn tag_sentence(&self, words: &[&str]) -> Vec<(PosTag, String)> {
        let lowers: Vec<String> = words
            .iter()
            .map(|w| w.to_lowercase().replace('’', "'"))
            .collect();
        let mut tagged: Vec<(PosTag, String)> = Vec::with_capacity(words.len());
        for i in 0..words.len() {
            let entry = self.tag_word(i, words, &lowers, &tagged);
            tagged.push(entry);
        }
        tagged
    }

    #[allow(clippy::too_many_lines)]
    fn tag_word(
        &self,
        i: usize,
        words: &[&str],
        lowers: &[String],
        done: &[(PosTag, String)],
    ) -> (PosTag, String) {
        let surface = words[i];
        let lower = lowers[i].as_str();
        let next = lowers.get(i + 1).map(String::as_str);
        let prev = done.last();
        let prev_content = done.iter().rev().find(|(tag, _)| *tag != PosTag::Adverb);
        let prev_is = |f: &dyn Fn(&PosTag, &str) -> bool| {
            prev_content.is_some_and(|(tag, lemma)| f(tag, lemma))
        };
        let after_linking = prev_is(&|tag, lemma| tag.is_verb() && LINKING_VERBS.contains(&lemma));
        let initial = done.iter().all(|(tag, _)| *tag == PosTag::Punctuation);
        let next_finite = next.and_then(|n| self.verb_forms.get(n)).map(|(_, tag)| *tag);
        let next_singular = next_finite == Some(PosTag::VerbThirdSingular) || next == Some("was");

        if !surface.chars().any(char::is_alphanumeric) {
            return (PosTag::Punctuation, lower.to_string());
        }

        match lower {
            "n't" => return (PosTag::Adverb, "not".to_string()),
            "'ll" => return (PosTag::Modal, "will".to_string()),
            "'d" => return (PosTag::Modal, "would".to_string()),
            "'m" | "'re" => return (PosTag::VerbPresent, "be".to_string()),
            "'ve" => return (PosTag::VerbPresent, "have".to_string()),
            "'s" => {
                return if prev.is_some_and(|(tag, _)| *tag == PosTag::Pronoun) {
                    (PosTag::VerbThirdSingular, "be".to_string())
                } else {
                    (PosTag::PossessiveEnding, "'s".to_string())
                };
            }
            "to" => return (PosTag::To, lower.to_string()),
            "her" => {
                let tag = if self.starts_nominal(lowers, i + 1) {
                    PosTag::PossessivePronoun
                } else {
                    PosTag::Pronoun
                };
                return (tag, lower.to_string());
            }
            "that" => {
                let tag = if next.is_some_and(|n| {
                    SUBJECT_PRONOUNS.contains(&n) || DETERMINERS.contains(&n)
                }) {
                    PosTag::Preposition
                } else {
                    PosTag::Determiner
                };
                return (tag, lower.to_string());
            }
            "there" => {
                let tag = if next.is_some_and(|n| {
                    self.verb_forms
                        .get(n)
                        .is_some_and(|(lemma, _)| lemma == "be")
                }) {
                    PosTag::Existential
                } else {
                    PosTag::Adverb
                };
                return (tag, lower.to_string());
            }
            "like" if after_linking => return (PosTag::Preposition, lower.to_string()),
            _ => {}
        }

        if let Some((_, lemma)) = MODALS.iter().find(|(form, _)| *form == lower) {
            return (PosTag::Modal, (*lemma).to_string());
        }
        if SUBJECT_PRONOUNS.contains(&lower)
            || OBJECT_PRONOUNS.contains(&lower)
            || REFLEXIVE_PRONOUNS.contains(&lower)
        {
            return (PosTag::Pronoun, lower.to_string());
        }
        if POSSESSIVE_PRONOUNS.contains(&lower) {
            return (PosTag::PossessivePronoun, lower.to_string());
        }
        if INDEFINITE_PRONOUNS.contains(&lower) {
            return (PosTag::Noun, lower.to_string());
        }
        if DETERMINERS.contains(&lower) {
            return (PosTag::Determiner, lower.to_string());
        }
        if CONJUNCTIONS.contains(&lower) {
            return (PosTag::CoordinatingConjunction, lower.to_string());
        }
        if WH_WORDS.contains(&lower) {
            return (PosTag::WhWord, lower.to_string());
        }
        if PREPOSITIONS.contains(&lower) || SUBORDINATORS.contains(&lower) {
            return (PosTag::Preposition, lower.to_string());
        }
        if ADVERBS.contains(&lower) {
            return (PosTag::Adverb, lower.to_string());
        }

        if let Some((lemma, tag)) = self.verb_forms.get(lower) {
            let mut tag = *tag;
            let after_aux = prev_is(&|tag, lemma| {
                matches!(tag, PosTag::Modal | PosTag::To) || (tag.is_verb() && lemma == "do")
            });
            let after_have_or_be =
                prev_is(&|tag, lemma| tag.is_verb() && (lemma == "have" || lemma == "be"));
            let after_object = prev.is_some_and(|(tag, lemma)| {
                *tag == PosTag::Pronoun
                    && (OBJECT_PRONOUNS.contains(&lemma.as_str())
                        || REFLEXIVE_PRONOUNS.contains(&lemma.as_str())
                        || lemma == "her")
            });

            // "Work makes me tired": a bare verb form followed by a finite verb is its subject.
            if tag == PosTag::VerbBase
                && initial
                && matches!(
                    next_finite,
                    Some(PosTag::VerbThirdSingular | PosTag::VerbPast)
                )
            {
                return (PosTag::Noun, lower.to_string());
            }
            if tag == PosTag::VerbBase && !after_aux && !after_object && i > 0 {
                if prev_is(&|tag, _| tag.is_nominal()) {
                    tag = PosTag::VerbPresent;
                }
            } else if tag == PosTag::VerbPast
                && self.ambiguous_past.contains(lower)
                && after_have_or_be
            {
                tag = PosTag::VerbPastParticiple;
            }
            if after_linking && lemma != "be" && tag.is_past() {
                return (PosTag::Adjective, lower.to_string());
            }
            return (tag, lemma.clone());
        }

        if lower.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            return (PosTag::Number, lower.to_string());
        }
        if ADJECTIVES.contains(&lower) {
            return (PosTag::Adjective, lower.to_string());
        }
        if COMMON_NOUNS.contains(&lower) {
            return (PosTag::Noun, lower.to_string());
        }
        if surface.chars().next().is_some_and(char::is_uppercase) {
            if !initial {
                return (PosTag::ProperNoun, lower.to_string());
            }
            // Sentence-initial capitals only mark a name when nothing else explains the word.
            if is_plural(lower) && !next_singular {
                return (PosTag::PluralNoun, singular(lower));
            }
            if !looks_derived(lower) {
                return (PosTag::ProperNoun, lower.to_string());
            }
        }
        if lower.len() > 4 && lower.ends_with("ing") && !ING_NOUNS.contains(&lower) {
            return (PosTag::VerbGerund, strip_ing(lower));
        }
        if lower.len() > 3 && lower.ends_with("ed") {
            if after_linking {
                return (PosTag::Adjective, lower.to_string());
            }
            let tag = if prev_is(&|tag, lemma| tag.is_verb() && (lemma == "have" || lemma == "be"))
            {
                PosTag::VerbPastParticiple
            } else if prev_is(&|tag, _| tag.is_nominal()) {
                PosTag::VerbPast
            } else {
                PosTag::VerbPastParticiple
            };
            return (tag, strip_ed(lower));
        }
        if prev.is_some_and(|(tag, _)| {
            matches!(tag, PosTag::Determiner | PosTag::PossessivePronoun)
        }) && !self.starts_nominal(lowers, i + 1)
        {
            return if is_plural(lower) {
                (PosTag::PluralNoun, singular(lower))
            } else {
                (PosTag::Noun, lower.to_string())
            };
        }
        if lower.ends_with("ly") {
            return (PosTag::Adverb, lower.to_string());
        }
        if ["tion", "ness", "ment", "ity", "ence", "ance", "ship", "hood"]
            .iter()
            .any(|s| lower.ends_with(s))
        {
            return (PosTag::Noun, lower.to_string());
        }
        if ["ful", "less", "ous", "ive", "able", "ible", "ic", "ish"]
            .iter()
            .any(|s| lower.ends_with(s))
            || after_linking
        {
            return (PosTag::Adjective, lower.to_string());
        }
        if lower.len() > 3
            && lower.ends_with('s')
            && prev.is_some_and(|(tag, lemma)| {
                *tag == PosTag::Pronoun && matches!(lemma.as_str(), "he" | "she" | "it")
            })
        {
            return (PosTag::VerbThirdSingular, singular(lower));
        }
        if is_plural(lower) {
            return (PosTag::PluralNoun, singular(lower));
        }
        (PosTag::Noun, lower.to_string())
    }

    /// Check if the word at `i` plausibly opens a noun phrase ("her dog").
    fn starts_nominal(&self, lowers: &[String], i: usize) -> bool {
        let Some(word) = lowers.get(i).map(String::as_str) else {
            return false;
        };
        let closed = |w: &str| {
            self.verb_forms.contains_key(w)
                || !w.chars().any(char::is_alphanumeric)
                || PREPOSITIONS.contains(&w)
                || SUBORDINATORS.contains(&w)
                || ADVERBS.contains(&w)
                || CONJUNCTIONS.contains(&w)
                || DETERMINERS.contains(&w)
                || SUBJECT_PRONOUNS.contains(&w)
                || OBJECT_PRONOUNS.contains(&w)
                || w == "to"
                || w.starts_with('\'')
                || w == "n't"
        };
        if closed(word) {
            return false;
        }
        if ADJECTIVES.contains(&word) {
            return lowers
                .get(i + 1)
                .is_some_and(|w| !closed(w) && !ADJECTIVES.contains(&w.as_str()));
        }
        true
    }

    // ---------------------------------------------------------------------
    // Dependency parsing
    // ---------------------------------------------------------------------

    /// Build the dependency graph of one tagged sentence.
    fn parse(tokens: &[Token]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        if tokens.is_empty() {
            return graph;
        }

        let mut parser = ClauseParser::new(tokens);
        let clauses = parser.split_clauses();
        let Some(main) = clauses.iter().find(|c| c.kind == ClauseKind::Main) else {
            return graph;
        };
        let root = parser.clause(main.start, main.end);
        graph.set_root(root);

        for clause in clauses.iter().filter(|c| c.kind != ClauseKind::Main) {
            if clause.start >= clause.end {
                continue;
            }
            let head = parser.clause(clause.start, clause.end);
            match clause.kind {
                ClauseKind::Subordinate => {
                    if let Some(marker) = clause.connective {
                        parser.attach(marker, head, DependencyRelation::Marker);
                    }
                    parser.attach(head, root, DependencyRelation::AdverbialClause);
                }
                ClauseKind::Coordinate => {
                    if let Some(cc) = clause.connective {
                        parser.attach(cc, root, DependencyRelation::CoordinatingConjunction);
                    }
                    parser.attach(head, root, DependencyRelation::Conjunct);
                }
                ClauseKind::Main => {}
            }
        }

        for (i, token) in tokens.iter().enumerate() {
            if i == root {
                continue;
            }
            let relation = if token.tag == PosTag::Punctuation {
                DependencyRelation::Punctuation
            } else {
                DependencyRelation::Unknown
            };
            parser.attach(i, root, relation);
        }

        for (dependent, head) in parser.heads.iter().enumerate() {
            if let Some((governor, relation)) = head {
                graph.add_edge(*governor, dependent, *relation);
            }
        }
        graph
    }
}

impl Annotator for RuleBasedAnnotator {
    fn annotate(&self, text: &str) -> Result<Vec<Sentence>, AnnotationError> {
        let spans = self.tokenize(text);
        let mut sentences = Vec::new();

        for range in Self::split_sentences(text, &spans) {
            let sentence_spans = &spans[range.clone()];
            let words: Vec<&str> = sentence_spans
                .iter()
                .map(|s| &text[s.begin..s.end])
                .collect();
            let tagged = self.tag_sentence(&words);

            let tokens: Vec<Token> = sentence_spans
                .iter()
                .zip(tagged)
                .enumerate()
                .map(|(k, (span, (tag, lemma)))| {
                    let next_begin = spans.get(range.start + k + 1).map_or(text.len(), |s| s.begin);
                    Token::new(&text[span.begin..span.end], span.begin)
                        .with_lemma(&lemma)
                        .with_tag(tag)
                        .with_after(&text[span.end..next_begin])
                })
                .collect();

            let graph = Self::parse(&tokens);
            sentences.push(Sentence::new(tokens, graph)?);
        }

        tracing::trace!(
            sentences = sentences.len(),
            tokens = spans.len(),
            "annotated text"
        );
        Ok(sentences)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClauseKind {
    Main,
    Subordinate,
    Coordinate,
}

/// A token range forming one clause, with the word that introduced it.
#[derive(Debug, Clone, Copy)]
struct Clause {
    start: usize,
    end: usize,
    kind: ClauseKind,
    connective: Option<usize>,
}

/// Attaches tokens of one sentence to their heads.
struct ClauseParser<'a> {
    tokens: &'a [Token],
    heads: Vec<Option<(usize, DependencyRelation)>>,
}

impl<'a> ClauseParser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            heads: vec![None; tokens.len()],
        }
    }

    fn attach(&mut self, dependent: usize, governor: usize, relation: DependencyRelation) {
        if dependent != governor && self.heads[dependent].is_none() {
            self.heads[dependent] = Some((governor, relation));
        }
    }

    fn tag(&self, i: usize) -> PosTag {
        self.tokens[i].tag
    }

    fn lemma(&self, i: usize) -> &str {
        &self.tokens[i].lemma
    }

    fn is_verbal(&self, i: usize) -> bool {
        let tag = self.tag(i);
        tag.is_verb() || tag == PosTag::Modal
    }

    fn is_subordinator(&self, i: usize) -> bool {
        matches!(self.tag(i), PosTag::Preposition | PosTag::WhWord)
            && SUBORDINATORS.contains(&self.lemma(i))
    }

    /// Check if `start..end` holds a nominal followed by a verb.
    fn has_clause(&self, start: usize, end: usize) -> bool {
        let Some(verb) = (start..end).find(|&i| self.is_verbal(i)) else {
            return false;
        };
        (start..verb).any(|i| self.tag(i).is_nominal())
    }

    fn next_comma(&self, from: usize) -> usize {
        (from..self.tokens.len())
            .find(|&i| self.tokens[i].text == "," || self.tokens[i].text == ";")
            .unwrap_or(self.tokens.len())
    }

    /// Split the sentence into a main clause plus subordinate and coordinate clauses.
    fn split_clauses(&self) -> Vec<Clause> {
        let n = self.tokens.len();
        let mut clauses = Vec::new();
        let Some(first) = (0..n).find(|&i| self.tag(i) != PosTag::Punctuation) else {
            return vec![Clause {
                start: 0,
                end: n,
                kind: ClauseKind::Main,
                connective: None,
            }];
        };

        let mut start = first;
        if self.is_subordinator(first) {
            let comma = self.next_comma(first + 1);
            if comma < n && self.has_clause(first + 1, comma) {
                clauses.push(Clause {
                    start: first + 1,
                    end: comma,
                    kind: ClauseKind::Subordinate,
                    connective: Some(first),
                });
                start = comma + 1;
            }
        }

        let mut main_end = n;
        let mut k = start;
        while k < n {
            let opens_subordinate = self.is_subordinator(k);
            let opens_coordinate = self.tag(k) == PosTag::CoordinatingConjunction;
            if (opens_subordinate || opens_coordinate) && (start..k).any(|i| self.is_verbal(i)) {
                let end = self.next_comma(k + 1);
                if self.has_clause(k + 1, end) {
                    if main_end == n {
                        main_end = k;
                    }
                    clauses.push(Clause {
                        start: k + 1,
                        end,
                        kind: if opens_subordinate {
                            ClauseKind::Subordinate
                        } else {
                            ClauseKind::Coordinate
                        },
                        connective: Some(k),
                    });
                    k = end;
                    continue;
                }
            }
            k += 1;
        }

        clauses.push(Clause {
            start,
            end: main_end,
            kind: ClauseKind::Main,
            connective: None,
        });
        clauses
    }

    /// Parse one clause and return its head.
    fn clause(&mut self, start: usize, end: usize) -> usize {
        let idx: Vec<usize> = (start..end)
            .filter(|&i| self.tag(i) != PosTag::Punctuation)
            .collect();
        let Some(group_start) = idx.iter().position(|&i| self.is_verbal(i)) else {
            return self.fragment(&idx, start);
        };

        // Verb group: modals, auxiliaries and adverbs ending in the main verb.
        let mut auxiliaries = Vec::new();
        let mut adverbs = Vec::new();
        let mut main = idx[group_start];
        let mut k = group_start;
        while k < idx.len() {
            let i = idx[k];
            if self.is_verbal(i) {
                let next_content = idx[k + 1..]
                    .iter()
                    .copied()
                    .find(|&j| self.tag(j) != PosTag::Adverb);
                let followed_by_verb = next_content.is_some_and(|j| self.tag(j).is_verb());
                let auxiliary_capable = self.tag(i) == PosTag::Modal
                    || matches!(self.lemma(i), "be" | "have" | "do");
                main = i;
                if auxiliary_capable && followed_by_verb {
                    auxiliaries.push(i);
                    k += 1;
                    continue;
                }
                break;
            } else if self.tag(i) == PosTag::Adverb {
                adverbs.push(i);
                k += 1;
            } else {
                break;
            }
        }

        for aux in auxiliaries {
            self.attach(aux, main, DependencyRelation::Auxiliary);
        }
        for adverb in adverbs {
            let relation = if NEGATION_LEMMAS.contains(&self.lemma(adverb)) {
                DependencyRelation::Negation
            } else {
                DependencyRelation::AdverbialModifier
            };
            self.attach(adverb, main, relation);
        }

        self.subject(&idx[..group_start], main);
        let rest_start = idx.iter().position(|&i| i == main).map_or(idx.len(), |p| p + 1);
        self.predicate(main, &idx[rest_start..]);
        main
    }

    /// A clause without a verb: the first nominal heads it.
    fn fragment(&mut self, idx: &[usize], fallback: usize) -> usize {
        let head = idx
            .iter()
            .copied()
            .find(|&i| self.tag(i).is_nominal())
            .or_else(|| idx.first().copied())
            .unwrap_or(fallback.min(self.tokens.len().saturating_sub(1)));
        for &i in idx {
            self.attach(i, head, DependencyRelation::Unknown);
        }
        head
    }

    /// Attach the material before the verb group.
    fn subject(&mut self, before: &[usize], verb: usize) {
        let head = before
            .iter()
            .rposition(|&i| self.tag(i).is_nominal())
            .or_else(|| {
                before.iter().rposition(|&i| {
                    matches!(
                        self.tag(i),
                        PosTag::Determiner | PosTag::PossessivePronoun
                    )
                })
            });
        let Some(pos) = head else {
            for &i in before {
                self.attach_loose(i, verb);
            }
            return;
        };
        let subject = before[pos];
        self.attach(subject, verb, DependencyRelation::NominalSubject);
        for &i in &before[..pos] {
            match self.tag(i) {
                PosTag::Determiner | PosTag::Number => {
                    self.attach(i, subject, DependencyRelation::Determiner);
                }
                PosTag::PossessivePronoun | PosTag::PossessiveEnding => {
                    self.attach(i, subject, DependencyRelation::Possessive);
                }
                PosTag::Adjective => self.attach(i, subject, DependencyRelation::AdjectivalModifier),
                tag if tag.is_nominal() => {
                    self.attach(i, subject, DependencyRelation::Compound);
                }
                _ => self.attach_loose(i, verb),
            }
        }
        for &i in &before[pos + 1..] {
            self.attach_loose(i, verb);
        }
    }

    fn attach_loose(&mut self, i: usize, governor: usize) {
        let relation = match self.tag(i) {
            PosTag::Adverb if NEGATION_LEMMAS.contains(&self.lemma(i)) => {
                DependencyRelation::Negation
            }
            PosTag::Adverb => DependencyRelation::AdverbialModifier,
            PosTag::CoordinatingConjunction => DependencyRelation::CoordinatingConjunction,
            _ => DependencyRelation::Unknown,
        };
        self.attach(i, governor, relation);
    }

    fn starts_noun_phrase(&self, rest: &[usize], at: usize) -> bool {
        match self.tag(rest[at]) {
            PosTag::Determiner | PosTag::PossessivePronoun | PosTag::Number => true,
            PosTag::Adjective => rest[at + 1..]
                .iter()
                .find(|&&j| self.tag(j) != PosTag::Adjective)
                .is_some_and(|&j| self.tag(j).is_nominal()),
            tag => tag.is_nominal(),
        }
    }

    /// Consume a noun phrase starting at `rest[at]`; returns its head and the
    /// position after it.
    fn noun_phrase(&mut self, rest: &[usize], at: usize) -> (Option<usize>, usize) {
        let mut members = Vec::new();
        let mut j = at;
        while j < rest.len() {
            let i = rest[j];
            match self.tag(i) {
                PosTag::Pronoun => {
                    if members.is_empty() {
                        members.push(i);
                        j += 1;
                    }
                    break;
                }
                PosTag::Determiner
                | PosTag::PossessivePronoun
                | PosTag::PossessiveEnding
                | PosTag::Number
                | PosTag::Noun
                | PosTag::PluralNoun
                | PosTag::ProperNoun
                | PosTag::PluralProperNoun => members.push(i),
                PosTag::Adjective if self.starts_noun_phrase(rest, j) => members.push(i),
                _ => break,
            }
            j += 1;
        }
        let Some(&head) = members
            .iter()
            .rev()
            .find(|&&i| self.tag(i).is_nominal())
            .or_else(|| members.last())
        else {
            return (None, at);
        };
        for &m in members.iter().filter(|&&m| m != head) {
            let relation = match self.tag(m) {
                PosTag::Determiner => DependencyRelation::Determiner,
                PosTag::PossessivePronoun | PosTag::PossessiveEnding => {
                    DependencyRelation::Possessive
                }
                PosTag::Adjective => DependencyRelation::AdjectivalModifier,
                tag if tag.is_nominal() => DependencyRelation::Compound,
                _ => DependencyRelation::Unknown,
            };
            self.attach(m, head, relation);
        }
        (Some(head), j)
    }

    /// Attach the material after a verb, descending into complements.
    fn predicate(&mut self, verb: usize, rest: &[usize]) {
        let mut governor = verb;
        let mut objects = 0;
        let mut k = 0;
        while k < rest.len() {
            let i = rest[k];
            let next_is_verb = rest.get(k + 1).is_some_and(|&j| self.tag(j).is_verb());
            match self.tag(i) {
                PosTag::To if next_is_verb => {
                    let complement = rest[k + 1];
                    self.attach(i, complement, DependencyRelation::Marker);
                    self.attach(complement, governor, DependencyRelation::OpenClausalComplement);
                    governor = complement;
                    objects = 0;
                    k += 2;
                }
                PosTag::To | PosTag::Preposition => {
                    self.attach(i, governor, DependencyRelation::PrepositionalModifier);
                    if k + 1 < rest.len() && self.starts_noun_phrase(rest, k + 1) {
                        let (head, next) = self.noun_phrase(rest, k + 1);
                        if let Some(head) = head {
                            self.attach(head, i, DependencyRelation::PrepositionalObject);
                        }
                        k = next;
                    } else {
                        k += 1;
                    }
                }
                _ if self.starts_noun_phrase(rest, k) => {
                    let (head, next) = self.noun_phrase(rest, k);
                    let Some(head) = head else {
                        self.attach_loose(i, governor);
                        k += 1;
                        continue;
                    };
                    let controls = CONTROL_VERBS.contains(&self.lemma(governor));
                    let bare_complement = rest.get(next).copied().filter(|&j| {
                        matches!(self.tag(j), PosTag::VerbBase | PosTag::VerbPresent)
                    });
                    let to_complement = rest
                        .get(next)
                        .copied()
                        .filter(|&j| self.tag(j) == PosTag::To)
                        .and_then(|to| {
                            rest.get(next + 1)
                                .copied()
                                .filter(|&j| self.tag(j).is_verb())
                                .map(|verb| (to, verb))
                        });

                    if controls && (bare_complement.is_some() || to_complement.is_some()) {
                        self.attach(head, governor, DependencyRelation::DirectObject);
                        let complement = if let Some((to, complement)) = to_complement {
                            self.attach(to, complement, DependencyRelation::Marker);
                            k = next + 2;
                            complement
                        } else {
                            k = next + 1;
                            rest[next]
                        };
                        self.attach(
                            complement,
                            governor,
                            DependencyRelation::OpenClausalComplement,
                        );
                        governor = complement;
                        objects = 0;
                        continue;
                    }

                    let relation = if self.lemma(governor) == "be" {
                        DependencyRelation::Attribute
                    } else if objects == 0
                        && next < rest.len()
                        && self.starts_noun_phrase(rest, next)
                    {
                        DependencyRelation::IndirectObject
                    } else {
                        DependencyRelation::DirectObject
                    };
                    self.attach(head, governor, relation);
                    objects += 1;
                    k = next;
                }
                PosTag::Adjective => {
                    let relation = if LINKING_VERBS.contains(&self.lemma(governor)) {
                        DependencyRelation::AdjectivalComplement
                    } else {
                        DependencyRelation::AdverbialModifier
                    };
                    self.attach(i, governor, relation);
                    k += 1;
                }
                tag if tag.is_verb() => {
                    self.attach(i, governor, DependencyRelation::OpenClausalComplement);
                    governor = i;
                    objects = 0;
                    k += 1;
                }
                _ => {
                    self.attach_loose(i, governor);
                    k += 1;
                }
            }
        }
    }
}

fn is_plural(word: &str) -> bool {
    word.len() > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
}

/// Strip a plural or third-person "-s" ending.
fn singular(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies")
        && stem.len() > 1
    {
        return format!("{stem}y");
    }
    for sibilant in ["sses", "ches", "shes", "xes", "zes"] {
        if word.ends_with(sibilant) {
            return word[..word.len() - 2].to_string();
        }
    }
    if is_plural(word) {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Undo consonant doubling left behind by "-ed"/"-ing" ("stopp" -> "stop").
fn undouble(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n > 2
        && bytes[n - 1] == bytes[n - 2]
        && !matches!(
            bytes[n - 1],
            b'l' | b's' | b'z' | b'f' | b'a' | b'e' | b'i' | b'o' | b'u'
        )
    {
        return stem[..n - 1].to_string();
    }
    stem.to_string()
}

/// Check for an inflectional or derivational ending that names rarely carry.
fn looks_derived(word: &str) -> bool {
    (word.len() > 4 && word.ends_with("ing") && !ING_NOUNS.contains(&word))
        || (word.len() > 3 && word.ends_with("ed"))
        || word.ends_with("ly")
        || [
            "tion", "ness", "ment", "ity", "ence", "ance", "ship", "hood", "ful", "less", "ous",
            "ive", "able", "ible",
        ]
        .iter()
        .any(|s| word.ends_with(s))
}

fn strip_ed(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ied") {
        return format!("{stem}y");
    }
    word.strip_suffix("ed")
        .map_or_else(|| word.to_string(), undouble)
}

fn strip_ing(word: &str) -> String {
    word.strip_suffix("ing")
        .map_or_else(|| word.to_string(), undouble)
}
