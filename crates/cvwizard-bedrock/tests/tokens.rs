use cvwizard_bedrock::tokens::get_pricing;
use cvwizard_core::models::usage::{TokenCount, TokenUsage};

#[test]
fn known_models_are_priced() {
    let sonnet = get_pricing("us.anthropic.claude-sonnet-4-20250514-v1:0").unwrap();
    assert_eq!(sonnet.input_per_million, 3.0);
    assert_eq!(sonnet.output_per_million, 15.0);

    let opus = get_pricing("us.anthropic.claude-opus-4-1-20250805-v1:0").unwrap();
    assert_eq!(opus.output_per_million, 75.0);
}

#[test]
fn unknown_model_costs_nothing() {
    assert!(get_pricing("amazon.titan-text-express-v1").is_none());

    let usage = TokenUsage::priced(
        TokenCount {
            input: 1_000,
            output: 500,
        },
        None,
    );
    assert_eq!(usage.cost_usd, 0.0);
    assert_eq!(usage.tokens.total(), 1_500);
}

#[test]
fn cost_scales_per_million() {
    let pricing = get_pricing("anthropic.claude-sonnet-4-5").unwrap();
    let usage = TokenUsage::priced(
        TokenCount {
            input: 1_000_000,
            output: 200_000,
        },
        Some(&pricing),
    );
    assert!((usage.cost_usd - 6.0).abs() < 1e-9);
}
