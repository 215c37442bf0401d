//! Basic example: Loading variables and resolving them for a player
//!
//! This example demonstrates:
//! - Loading `variable.yml` and `config.yml` style documents
//! - Weighted random ranges (normal mode)
//! - Reading a number from item lore (elite mode)
//! - Diagnostics routed through `tracing`
//!
//! Run with `RUST_LOG=loreroll=debug` to see every decision point.

use loreroll::random::SeededRandom;
use loreroll::*;
use std::sync::Arc;

const VARIABLES: &str = r#"
enable: true
atk_bonus:
  mode: normal
  values:
    - number::10_20_0
    - weight::0.7
    - number::20_50_1
    - weight::0.3
crit:
  mode: elite
  prefix: "§7Crit: "
"bad-name":
  mode: elite
  prefix: "X"
"#;

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = EngineSettings::from_yaml_str("debug: true")?;
    let engine = VariableEngine::new()
        .with_settings(settings)
        .with_random(Arc::new(SeededRandom::from_seed(2024)));

    println!("Loading variables...");
    let diagnostics = engine.reload(ConfigTree::from_yaml_str(VARIABLES)?);
    for diagnostic in &diagnostics {
        println!("  {diagnostic}");
    }

    let ctx = ResolutionContext::for_player("Steve")
        .holding(HeldItem::with_lore(["§6Blade of Dawn", "§7Crit: §c+12.5%"]));

    println!("\n=== Normal mode ===");
    for _ in 0..5 {
        let resolution = engine.resolve_detailed("atk_bonus", &ctx);
        match resolution {
            Ok(resolution) => println!(
                "atk_bonus = {} (range #{})",
                resolution.value,
                resolution.range_index.unwrap_or_default()
            ),
            Err(miss) => println!("atk_bonus missed: {miss}"),
        }
    }

    println!("\n=== Elite mode ===");
    println!("crit = {}", engine.resolve("crit", &ctx));
    println!(
        "crit (empty hand) = {}",
        engine.resolve("crit", &ResolutionContext::for_player("Steve"))
    );

    println!("\n=== Placeholders ===");
    let bridge = PlaceholderBridge::new(Arc::new(engine));
    for name in ["atk_bonus", "crit", "bad-name"] {
        let placeholder = bridge.full_placeholder(name);
        let params = format!("{}{}", bridge.engine().settings().variable_prefix, name);
        println!("{placeholder} -> {:?}", bridge.request(&params, &ctx));
    }

    Ok(())
}
