use loreroll::line::{parse_line, parse_ranges, LineKind};
use loreroll::normal::{sample, select_range};
use loreroll::random::{ScriptedRandom, SeededRandom};
use loreroll::*;
use proptest::prelude::*;
use std::sync::Arc;

fn fraction_digits(text: &str) -> usize {
    text.split_once('.').map(|(_, frac)| frac.len()).unwrap_or(0)
}

proptest! {
    /// Property: a valid number line parses back to the bounds it was written with
    #[test]
    fn prop_number_line_parses(
        min in -10_000i32..10_000,
        span in 0i32..10_000,
        decimals in 0usize..6
    ) {
        let max = min + span;
        let line = format!("number::{min}_{max}_{decimals}");
        match parse_line(&line) {
            Ok(LineKind::Number(spec)) => {
                prop_assert_eq!(spec.min, min as f64);
                prop_assert_eq!(spec.max, max as f64);
                prop_assert_eq!(spec.decimals, decimals);
            }
            other => prop_assert!(false, "unexpected parse of {}: {:?}", line, other),
        }
    }

    /// Property: a sampled value stays within its range and has exactly `decimals` digits
    #[test]
    fn prop_sample_in_bounds_with_fixed_digits(
        min in -10_000i32..10_000,
        span in 0i32..10_000,
        decimals in 0usize..6,
        draw in 0.0f64..1.0
    ) {
        let max = min + span;
        let ranges = parse_ranges(&[format!("number::{min}_{max}_{decimals}")]).ranges;
        let picked = sample(&ranges, &ScriptedRandom::new([0.0, draw])).unwrap();

        let value: f64 = picked.text.parse().unwrap();
        prop_assert!(
            value >= min as f64 && value <= max as f64,
            "{} not in {}..={}",
            value,
            min,
            max
        );
        prop_assert_eq!(fraction_digits(&picked.text), decimals);
        prop_assert_eq!(picked.text.contains('.'), decimals > 0);
    }

    /// Property: positive weights never reach the first-range fallback
    #[test]
    fn prop_positive_weights_select_without_fallback(
        weights in prop::collection::vec(0.001f64..10.0, 1..8),
        draw in 0.0f64..1.0
    ) {
        let lines: Vec<String> = weights
            .iter()
            .flat_map(|weight| ["number::0_1_0".to_string(), format!("weight::{weight}")])
            .collect();
        let ranges = parse_ranges(&lines).ranges;
        prop_assert_eq!(ranges.len(), weights.len());

        let (index, fallback) = select_range(&ranges, draw).unwrap();
        prop_assert!(index < ranges.len());
        prop_assert!(!fallback);
    }

    /// Property: resolving through the engine stays within the configured range
    #[test]
    fn prop_engine_resolution_in_bounds(
        seed in any::<u64>(),
        min in -500i32..500,
        span in 0i32..500
    ) {
        let max = min + span;
        let engine = VariableEngine::new().with_random(Arc::new(SeededRandom::from_seed(seed)));
        engine.reload(ConfigTree::new().with_variable(
            "roll",
            VariableSection::normal([format!("number::{min}_{max}_0"), "weight::1.0".to_string()]),
        ));

        let value: i64 = engine
            .resolve("roll", &ResolutionContext::for_player("p"))
            .parse()
            .unwrap();
        prop_assert!(value >= min as i64 && value <= max as i64);
    }
}
