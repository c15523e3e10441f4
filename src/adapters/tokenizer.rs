use crate::domain::ports::Tokenizer;
use crate::utils::error::{Result, SavingsError};
use std::collections::HashMap;
use tiktoken_rs::CoreBPE;

pub const DEFAULT_ENCODING: &str = "cl100k_base";

/// Selects the character-count estimate instead of a BPE vocabulary.
pub const HEURISTIC_ENCODING: &str = "heuristic";

const BASE_ENCODINGS: [&str; 4] = ["cl100k_base", "o200k_base", "p50k_base", "r50k_base"];

/// BPE token counting backed by tiktoken vocabularies.
///
/// Vocabularies are loaded once in `new`; counting against an encoding that
/// was not loaded is a `TokenizerError`.
pub struct TiktokenTokenizer {
    encodings: HashMap<String, CoreBPE>,
}

impl TiktokenTokenizer {
    /// Accepts base encoding names (`cl100k_base`, `o200k_base`, ...) or a
    /// model name such as `gpt-4o`.
    pub fn new(encoding_names: &[&str]) -> Result<Self> {
        let mut encodings = HashMap::new();
        for name in encoding_names {
            encodings.insert(name.to_string(), load_bpe(name)?);
        }
        Ok(Self { encodings })
    }

    pub fn encodings(&self) -> impl Iterator<Item = &str> {
        self.encodings.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for TiktokenTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenTokenizer")
            .field("encodings", &self.encodings.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn load_bpe(name: &str) -> Result<CoreBPE> {
    let loaded: anyhow::Result<CoreBPE> = match name {
        "cl100k_base" => tiktoken_rs::cl100k_base(),
        "o200k_base" => tiktoken_rs::o200k_base(),
        "p50k_base" => tiktoken_rs::p50k_base(),
        "r50k_base" => tiktoken_rs::r50k_base(),
        model => tiktoken_rs::get_bpe_from_model(model),
    };

    loaded.map_err(|e| SavingsError::TokenizerError {
        encoding: name.to_string(),
        message: e.to_string(),
    })
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str, encoding_name: &str) -> Result<usize> {
        let bpe = self
            .encodings
            .get(encoding_name)
            .ok_or_else(|| SavingsError::TokenizerError {
                encoding: encoding_name.to_string(),
                message: "encoding was not loaded".to_string(),
            })?;

        if text.is_empty() {
            return Ok(0);
        }
        Ok(bpe.encode_ordinary(text).len())
    }
}

/// Rough estimate of ~4 characters per token.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenizer;

impl Tokenizer for HeuristicTokenizer {
    fn count_tokens(&self, text: &str, _encoding_name: &str) -> Result<usize> {
        Ok(text.chars().count().div_ceil(4))
    }
}

/// Tokenizer chosen at startup from an encoding name.
#[derive(Debug)]
pub enum TokenCounter {
    Tiktoken(TiktokenTokenizer),
    Heuristic(HeuristicTokenizer),
}

impl TokenCounter {
    /// `heuristic` selects the estimate directly. A base encoding whose tables
    /// fail to load degrades to the estimate with a warning; an unknown name is
    /// a `TokenizerError`.
    pub fn for_encoding(encoding_name: &str) -> Result<Self> {
        if encoding_name == HEURISTIC_ENCODING {
            return Ok(Self::Heuristic(HeuristicTokenizer));
        }

        match TiktokenTokenizer::new(&[encoding_name]) {
            Ok(tokenizer) => Ok(Self::Tiktoken(tokenizer)),
            Err(e) if BASE_ENCODINGS.contains(&encoding_name) => {
                tracing::warn!("⚠️ {}, falling back to ~4 chars per token", e);
                Ok(Self::Heuristic(HeuristicTokenizer))
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_estimate(&self) -> bool {
        matches!(self, Self::Heuristic(_))
    }
}

impl Tokenizer for TokenCounter {
    fn count_tokens(&self, text: &str, encoding_name: &str) -> Result<usize> {
        match self {
            Self::Tiktoken(tokenizer) => tokenizer.count_tokens(text, encoding_name),
            Self::Heuristic(tokenizer) => tokenizer.count_tokens(text, encoding_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_rounds_up() {
        let tokenizer = HeuristicTokenizer;
        assert_eq!(tokenizer.count_tokens("", DEFAULT_ENCODING).unwrap(), 0);
        assert_eq!(tokenizer.count_tokens("abc", DEFAULT_ENCODING).unwrap(), 1);
        assert_eq!(tokenizer.count_tokens("abcd", DEFAULT_ENCODING).unwrap(), 1);
        assert_eq!(tokenizer.count_tokens("abcde", DEFAULT_ENCODING).unwrap(), 2);
        // 以字元而非位元組計算
        assert_eq!(tokenizer.count_tokens("名稱名稱", DEFAULT_ENCODING).unwrap(), 1);
    }

    #[test]
    fn test_tiktoken_counts_are_deterministic() {
        let tokenizer = TiktokenTokenizer::new(&[DEFAULT_ENCODING]).unwrap();
        let text = "{\n  \"name\": \"Alice\",\n  \"age\": 30\n}";

        let first = tokenizer.count_tokens(text, DEFAULT_ENCODING).unwrap();
        let second = tokenizer.count_tokens(text, DEFAULT_ENCODING).unwrap();
        assert_eq!(first, second);
        assert!(first > 0);
        assert_eq!(tokenizer.count_tokens("", DEFAULT_ENCODING).unwrap(), 0);
    }

    #[test]
    fn test_tiktoken_rejects_unloaded_encoding() {
        let tokenizer = TiktokenTokenizer::new(&[DEFAULT_ENCODING]).unwrap();
        let err = tokenizer.count_tokens("hello", "o200k_base").unwrap_err();
        assert!(matches!(err, SavingsError::TokenizerError { .. }));
    }

    #[test]
    fn test_unknown_encoding_is_an_error() {
        let err = TokenCounter::for_encoding("no-such-encoding").unwrap_err();
        assert!(matches!(err, SavingsError::TokenizerError { .. }));
    }

    #[test]
    fn test_heuristic_selection() {
        let counter = TokenCounter::for_encoding(HEURISTIC_ENCODING).unwrap();
        assert!(counter.is_estimate());
        assert_eq!(counter.count_tokens("12345678", HEURISTIC_ENCODING).unwrap(), 2);
    }
}
