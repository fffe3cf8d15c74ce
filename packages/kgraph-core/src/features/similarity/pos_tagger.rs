//! Part-of-speech tagging for entity names
//!
//! Word readings come from the `layered-part-of-speech` resolver, run as a
//! layer over the name. The resolver is dictionary based and may give a word
//! several readings ("plus" is a noun, a preposition and a conjunction), so
//! one tag per token is chosen by [`select_tag`]. Tags are written with Penn
//! Treebank codes, which is what configuration files use.

use std::fmt;
use std::str::FromStr;

use layered_nlp::{create_line_from_string, x, LToken};
use layered_part_of_speech::{POSTagResolver, Tag};

use crate::config::ConfigError;

thread_local! {
    static RESOLVER: POSTagResolver = POSTagResolver::default();
}

/// Coarse part-of-speech tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    CoordinatingConjunction,
    CardinalNumber,
    Determiner,
    Preposition,
    Adjective,
    Noun,
    ProperNoun,
    Pronoun,
    Adverb,
    Particle,
    Symbol,
    To,
    Interjection,
    Verb,
}

const ALL_TAGS: &[PosTag] = &[
    PosTag::CoordinatingConjunction,
    PosTag::CardinalNumber,
    PosTag::Determiner,
    PosTag::Preposition,
    PosTag::Adjective,
    PosTag::Noun,
    PosTag::ProperNoun,
    PosTag::Pronoun,
    PosTag::Adverb,
    PosTag::Particle,
    PosTag::Symbol,
    PosTag::To,
    PosTag::Interjection,
    PosTag::Verb,
];

impl PosTag {
    /// Penn Treebank code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoordinatingConjunction => "CC",
            Self::CardinalNumber => "CD",
            Self::Determiner => "DT",
            Self::Preposition => "IN",
            Self::Adjective => "JJ",
            Self::Noun => "NN",
            Self::ProperNoun => "NNP",
            Self::Pronoun => "PRP",
            Self::Adverb => "RB",
            Self::Particle => "RP",
            Self::Symbol => "SYM",
            Self::To => "TO",
            Self::Interjection => "UH",
            Self::Verb => "VB",
        }
    }

    /// Nouns and adjectives, the readings that can head or modify a name
    fn is_nominal(&self) -> bool {
        matches!(self, Self::Noun | Self::ProperNoun | Self::Adjective)
    }

    /// Reading of a resolver tag, matched on its label
    fn from_resolver(tag: &Tag) -> Option<Self> {
        let tag = match format!("{tag:?}").as_str() {
            "Determiner" | "Article" => Self::Determiner,
            "Preposition" | "Postposition" => Self::Preposition,
            "Conjunction" => Self::CoordinatingConjunction,
            "Particle" => Self::Particle,
            "Pronoun" => Self::Pronoun,
            "Noun" => Self::Noun,
            "ProperNoun" => Self::ProperNoun,
            "Verb" => Self::Verb,
            "Adjective" => Self::Adjective,
            "Adverb" => Self::Adverb,
            "Numeral" | "Number" => Self::CardinalNumber,
            "Interjection" => Self::Interjection,
            _ => return None,
        };
        Some(tag)
    }
}

impl FromStr for PosTag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        ALL_TAGS
            .iter()
            .copied()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| ConfigError::UnknownPosTag(s.to_string()))
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assigns one tag per token
pub trait PosTagger: Send + Sync {
    fn tag(&self, tokens: &[&str]) -> Vec<PosTag>;
}

/// Pick one tag from the readings of the token at `position` of a
/// `len`-token name
///
/// Determiners win outright. A conjunction or preposition reading loses to
/// a nominal one at the start of a multi-word name, where it cannot join
/// or relate anything. Otherwise function readings beat content readings,
/// and a word without readings is a noun.
pub fn select_tag(readings: &[PosTag], position: usize, len: usize) -> PosTag {
    const FUNCTION_ORDER: &[PosTag] = &[
        PosTag::Preposition,
        PosTag::CoordinatingConjunction,
        PosTag::Pronoun,
        PosTag::Particle,
    ];
    const CONTENT_ORDER: &[PosTag] = &[
        PosTag::Noun,
        PosTag::ProperNoun,
        PosTag::Adjective,
        PosTag::Verb,
        PosTag::Adverb,
        PosTag::CardinalNumber,
        PosTag::Interjection,
    ];

    let has = |tag: &PosTag| readings.contains(tag);

    if has(&PosTag::Determiner) {
        return PosTag::Determiner;
    }
    let leading = position == 0 && len > 1;
    let content = CONTENT_ORDER.iter().copied().find(|t| has(t));
    if leading {
        if let Some(nominal) = content.filter(PosTag::is_nominal) {
            return nominal;
        }
    }
    FUNCTION_ORDER
        .iter()
        .copied()
        .find(|t| has(t))
        .or(content)
        .unwrap_or(PosTag::Noun)
}

/// Tagger backed by the `layered-part-of-speech` resolver
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredTagger;

impl LayeredTagger {
    pub fn new() -> Self {
        Self
    }

    /// Resolver readings per input token
    ///
    /// The tokens are joined with single spaces and run as one line. The
    /// line splits words more finely than the tokenizer ("o-ring" becomes
    /// three pieces), so consecutive pieces are folded back onto the token
    /// they spell.
    fn readings(&self, tokens: &[&str]) -> Vec<Vec<PosTag>> {
        let text = tokens.join(" ").to_lowercase();
        let line = RESOLVER.with(|resolver| create_line_from_string(&text).run(resolver));

        let pieces = line.ll_tokens();
        let mut piece_tags: Vec<Vec<PosTag>> = vec![Vec::new(); pieces.len()];
        for found in line.find(&x::attr::<Tag>()) {
            let (start, end) = found.range();
            if let Some(tag) = PosTag::from_resolver(found.attr()) {
                for slot in piece_tags.iter_mut().take(end + 1).skip(start) {
                    slot.push(tag);
                }
            }
        }

        let mut readings = vec![Vec::new(); tokens.len()];
        let mut current = 0;
        let mut spelled = 0;
        for (piece, tags) in pieces.iter().zip(piece_tags) {
            let LToken::Text(piece_text, _) = piece.get_token() else {
                continue;
            };
            if piece_text.trim().is_empty() {
                continue;
            }
            let Some(token) = tokens.get(current) else {
                break;
            };
            readings[current].extend(tags);
            spelled += piece_text.chars().count();
            if spelled >= token.to_lowercase().chars().count() {
                current += 1;
                spelled = 0;
            }
        }
        readings
    }
}

impl PosTagger for LayeredTagger {
    fn tag(&self, tokens: &[&str]) -> Vec<PosTag> {
        if tokens.is_empty() {
            return Vec::new();
        }
        let len = tokens.len();
        self.readings(tokens)
            .iter()
            .zip(tokens)
            .enumerate()
            .map(|(position, (readings, token))| {
                if token.eq_ignore_ascii_case("to") {
                    PosTag::To
                } else if is_number(token) {
                    PosTag::CardinalNumber
                } else if !token.chars().any(char::is_alphanumeric) {
                    PosTag::Symbol
                } else {
                    select_tag(readings, position, len)
                }
            })
            .collect()
    }
}

fn is_number(token: &str) -> bool {
    token.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false)
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}
