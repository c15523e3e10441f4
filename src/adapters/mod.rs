// Adapters: 具體的編碼器與 tokenizer 實作

pub mod tokenizer;
pub mod toon;

pub use tokenizer::{HeuristicTokenizer, TiktokenTokenizer, TokenCounter, DEFAULT_ENCODING};
pub use toon::ToonCodec;
