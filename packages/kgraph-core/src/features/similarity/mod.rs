//! String similarity for entity names
//!
//! - `char_similarity`: longest-matching-block ratio over characters
//! - `token_similarity`: the same ratio over word tokens
//! - `overlap_similarity`: shared tokens after dropping ignored parts of speech

pub mod metrics;
pub mod pos_tagger;
pub mod sequence_matcher;
pub mod tokenizer;

pub use metrics::{
    char_similarity, overlap_similarity, overlap_similarity_with, token_similarity,
    OverlapSimilarity, SimilarityKind, TextSimilarity,
};
pub use pos_tagger::{select_tag, LayeredTagger, PosTag, PosTagger};
pub use sequence_matcher::{matching_blocks, sequence_ratio, MatchingBlock};
pub use tokenizer::tokenize;
