use crate::domain::model::{ComparisonResult, ModelProfile, ProjectionResult};

/// Projects one comparison onto every profile, in the order given.
///
/// Profiles are expected to come from a validated `ModelCatalog`.
pub fn project(comparison: &ComparisonResult, profiles: &[ModelProfile]) -> Vec<ProjectionResult> {
    profiles
        .iter()
        .map(|profile| project_profile(comparison, profile))
        .collect()
}

pub fn project_profile(comparison: &ComparisonResult, profile: &ModelProfile) -> ProjectionResult {
    let hierarchical_tokens = comparison.hierarchical.token_count;
    let compact_tokens = comparison.compact_tokens();
    let window = profile.context_window_tokens;
    let price = profile.input_price_per_1k_tokens;

    ProjectionResult {
        model_name: profile.name.clone(),
        context_window_tokens: window,
        hierarchical_usage_fraction: usage_fraction(hierarchical_tokens, window),
        compact_usage_fraction: compact_tokens.map(|tokens| usage_fraction(tokens, window)),
        cost_per_request_hierarchical: request_cost(hierarchical_tokens, price),
        cost_per_request_compact: compact_tokens.map(|tokens| request_cost(tokens, price)),
        // (h - c) / 1000 * price * 1000 requests
        cost_savings_per_1000_requests: compact_tokens
            .map(|tokens| (hierarchical_tokens as f64 - tokens as f64) * price),
        capacity_multiplier: compact_tokens
            .filter(|&tokens| tokens > 0)
            .map(|tokens| hierarchical_tokens as f64 / tokens as f64),
    }
}

/// Share of the context window consumed, capped at 1.0.
///
/// Catalog loading rejects a zero window; a hand-built profile with one is
/// treated as already full.
pub fn usage_fraction(tokens: usize, context_window_tokens: u64) -> f64 {
    debug_assert!(context_window_tokens > 0, "context window must be positive");
    if context_window_tokens == 0 {
        return 1.0;
    }
    (tokens as f64 / context_window_tokens as f64).min(1.0)
}

pub fn request_cost(tokens: usize, price_per_1k_tokens: f64) -> f64 {
    tokens as f64 * price_per_1k_tokens / 1000.0
}
