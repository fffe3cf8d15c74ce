//! Text similarity scorers
//!
//! Every scorer is total over arbitrary input (including empty strings) and
//! returns a value in `[0.0, 1.0]`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::pos_tagger::{LayeredTagger, PosTag, PosTagger};
use super::sequence_matcher::sequence_ratio;
use super::tokenizer::tokenize;
use crate::config::ConfigError;

/// Scores how similar two names are
pub trait TextSimilarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

impl<F> TextSimilarity for F
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    fn similarity(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

/// Character-level sequence ratio, case-insensitive
pub fn char_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    sequence_ratio(&a, &b)
}

/// Sequence ratio over word tokens
pub fn token_similarity(a: &str, b: &str) -> f64 {
    sequence_ratio(&tokenize(a), &tokenize(b))
}

/// Shared-token ratio after dropping tokens tagged with an ignored tag
///
/// `|common tokens| / max(|kept tokens of a|, |kept tokens of b|)`, comparing
/// tokens case-insensitively as multisets. Returns `0.0` when neither side
/// keeps a token.
pub fn overlap_similarity(a: &str, b: &str, ignored_tags: &[PosTag]) -> f64 {
    overlap_similarity_with(&LayeredTagger, a, b, ignored_tags)
}

pub fn overlap_similarity_with(
    tagger: &dyn PosTagger,
    a: &str,
    b: &str,
    ignored_tags: &[PosTag],
) -> f64 {
    let kept_a = kept_tokens(tagger, a, ignored_tags);
    let kept_b = kept_tokens(tagger, b, ignored_tags);

    let denominator = kept_a.len().max(kept_b.len());
    if denominator == 0 {
        return 0.0;
    }

    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for token in &kept_a {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    let mut common = 0usize;
    for token in &kept_b {
        if let Some(count) = counts.get_mut(token.as_str()) {
            if *count > 0 {
                *count -= 1;
                common += 1;
            }
        }
    }

    common as f64 / denominator as f64
}

fn kept_tokens(tagger: &dyn PosTagger, text: &str, ignored_tags: &[PosTag]) -> Vec<String> {
    let tokens = tokenize(text);
    let tags = tagger.tag(&tokens);
    tokens
        .iter()
        .zip(tags)
        .filter(|(_, tag)| !ignored_tags.contains(tag))
        .map(|(token, _)| token.to_lowercase())
        .collect()
}

/// Overlap similarity bound to an ignore list and tagger
#[derive(Clone)]
pub struct OverlapSimilarity {
    ignored_tags: Vec<PosTag>,
    tagger: Arc<dyn PosTagger>,
}

impl OverlapSimilarity {
    pub fn new(ignored_tags: Vec<PosTag>) -> Self {
        Self::with_tagger(ignored_tags, Arc::new(LayeredTagger))
    }

    pub fn with_tagger(ignored_tags: Vec<PosTag>, tagger: Arc<dyn PosTagger>) -> Self {
        Self {
            ignored_tags,
            tagger,
        }
    }

    pub fn ignored_tags(&self) -> &[PosTag] {
        &self.ignored_tags
    }
}

impl fmt::Debug for OverlapSimilarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlapSimilarity")
            .field("ignored_tags", &self.ignored_tags)
            .finish_non_exhaustive()
    }
}

impl TextSimilarity for OverlapSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        overlap_similarity_with(self.tagger.as_ref(), a, b, &self.ignored_tags)
    }
}

/// Named choice of similarity function (config and CLI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityKind {
    Character,
    Token,
    Overlap,
}

impl SimilarityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Token => "token",
            Self::Overlap => "overlap",
        }
    }

    /// Scorer for this kind; `ignored_tags` only affects `Overlap`
    pub fn scorer(&self, ignored_tags: &[PosTag]) -> Arc<dyn TextSimilarity> {
        match self {
            Self::Character => Arc::new(char_similarity),
            Self::Token => Arc::new(token_similarity),
            Self::Overlap => Arc::new(OverlapSimilarity::new(ignored_tags.to_vec())),
        }
    }
}

impl FromStr for SimilarityKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "character" | "char" => Ok(Self::Character),
            "token" => Ok(Self::Token),
            "overlap" => Ok(Self::Overlap),
            _ => Err(ConfigError::UnknownSimilarity(s.to_string())),
        }
    }
}

impl fmt::Display for SimilarityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
