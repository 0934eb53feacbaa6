//! Property-based tests for the migration engine
//!
//! These verify key invariants that should hold for all valid inputs:
//! the structural tokenizer never splits inside a bracketed group, and
//! the pipeline's diagnostic sequence is independent of transformer
//! registration order.


use proptest::prelude::*;
use xamlport_core::migration::tokenizer::split_top_level;
use xamlport_core::migration::transformers::default_transformers;
use xamlport_core::{migrate_with, Diagnostic, TransformerPipeline};

// Strategy functions for property testing

/// Strategy for a bracket-free identifier
fn identifier_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{0,8}"
}

/// Strategy for a type token, possibly with a nested argument list
fn type_token_strategy() -> impl Strategy<Value = String> {
    let leaf = identifier_strategy();
    leaf.prop_recursive(3, 12, 3, |inner| {
        (identifier_strategy(), prop::collection::vec(inner, 1..3)).prop_map(|(name, args)| {
            format!("{}({})", name, args.join(", "))
        })
    })
}

fn balanced(token: &str) -> bool {
    let mut depth: i32 = 0;
    for c in token.chars() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

proptest! {
    /// Joining tokens and splitting again recovers the original list
    #[test]
    fn prop_tokenizer_round_trips(tokens in prop::collection::vec(type_token_strategy(), 1..5)) {
        let joined = tokens.join(", ");
        let split = split_top_level(&joined, ',');
        prop_assert_eq!(split, tokens);
    }

    /// Every token the splitter returns has balanced brackets — it never
    /// cut inside a group
    #[test]
    fn prop_tokenizer_never_splits_inside_groups(
        tokens in prop::collection::vec(type_token_strategy(), 1..5)
    ) {
        let joined = tokens.join(",");
        for token in split_top_level(&joined, ',') {
            prop_assert!(balanced(&token), "unbalanced token: {:?}", token);
        }
    }

    /// Registration order never changes the diagnostic sequence
    #[test]
    fn prop_registration_order_is_irrelevant(
        order in Just((0..9usize).collect::<Vec<_>>()).prop_shuffle()
    ) {
        let baseline = run_with_order(&(0..9).collect::<Vec<_>>());
        let shuffled = run_with_order(&order);
        prop_assert_eq!(baseline, shuffled);
    }
}

fn run_with_order(order: &[usize]) -> Vec<Diagnostic> {
    let mut doc = test_support::sample_window();
    let mut transformers: Vec<Option<Box<dyn xamlport_core::Transformer>>> =
        default_transformers().into_iter().map(Some).collect();

    let mut pipeline = TransformerPipeline::new();
    for &index in order {
        if let Some(transformer) = transformers[index].take() {
            pipeline.register_boxed(transformer);
        }
    }
    let report = migrate_with(&mut doc, &test_support::default_options(), &mut pipeline)
        .expect("Optional policy never raises");
    report.diagnostics.iter().cloned().collect()
}
