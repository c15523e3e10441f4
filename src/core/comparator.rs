use crate::domain::model::{
    CompactEncoding, ComparisonResult, EncodingResult, StructuredRecord, HIERARCHICAL_FORMAT,
};
use crate::domain::ports::{CompactCodec, Tokenizer};
use crate::utils::error::Result;

/// Encodes one record both ways and reports the token difference.
///
/// The hierarchical side is pretty-printed JSON with two-space indentation.
/// A compact-side encoding failure does not fail the comparison; it is
/// reported as `CompactEncoding::Unavailable` alongside the JSON result.
pub struct FormatComparator<C: CompactCodec, T: Tokenizer> {
    codec: C,
    tokenizer: T,
    encoding_name: String,
}

impl<C: CompactCodec, T: Tokenizer> FormatComparator<C, T> {
    pub fn new(codec: C, tokenizer: T, encoding_name: impl Into<String>) -> Self {
        Self {
            codec,
            tokenizer,
            encoding_name: encoding_name.into(),
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn encoding_name(&self) -> &str {
        &self.encoding_name
    }

    pub fn compare(&self, record: &StructuredRecord) -> Result<ComparisonResult> {
        let hierarchical_text = serde_json::to_string_pretty(record)?;
        let hierarchical = self.measure(HIERARCHICAL_FORMAT, hierarchical_text)?;

        let compact = match self.codec.encode(record) {
            Ok(text) => CompactEncoding::Available(self.measure(self.codec.format_name(), text)?),
            Err(e) => CompactEncoding::Unavailable {
                reason: e.to_string(),
            },
        };

        let savings_percent = compact
            .result()
            .map(|c| savings_percent(hierarchical.token_count, c.token_count));

        Ok(ComparisonResult {
            hierarchical,
            compact,
            savings_percent,
        })
    }

    fn measure(&self, format_name: &str, encoded_text: String) -> Result<EncodingResult> {
        let token_count = self
            .tokenizer
            .count_tokens(&encoded_text, &self.encoding_name)?;
        Ok(EncodingResult {
            format_name: format_name.to_string(),
            encoded_text,
            token_count,
        })
    }
}

/// Percentage of hierarchical tokens saved by the compact form. Zero when
/// there is nothing to save from; negative when the compact form is larger.
pub fn savings_percent(hierarchical_tokens: usize, compact_tokens: usize) -> f64 {
    if hierarchical_tokens == 0 {
        return 0.0;
    }
    (hierarchical_tokens as f64 - compact_tokens as f64) * 100.0 / hierarchical_tokens as f64
}
