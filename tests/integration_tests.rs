use loreroll::random::{ScriptedRandom, SeededRandom};
use loreroll::*;
use std::sync::Arc;
use std::thread;

const VARIABLES: &str = r#"
enable: true
atk_bonus:
  mode: normal
  values:
    - number::10_20_0
    - weight::0.25
    - number::20_30_1
    - weight::0.25
    - number::30_40_2
    - weight::0.5
flat:
  mode: normal
  values:
    - number::10_20_0
    - weight::1.0
broken:
  mode: normal
  values:
    - number::10_20
    - number::x_1_0
atk:
  mode: elite
  prefix: "ATK: "
def:
  mode: Elite
  prefix: "DEF: "
"#;

fn load(random: Arc<dyn random::RandomSource>) -> (VariableEngine, Vec<Diagnostic>) {
    let engine = VariableEngine::new().with_random(random);
    let tree = ConfigTree::from_yaml_str(VARIABLES).unwrap();
    let diagnostics = engine.reload(tree);
    (engine, diagnostics)
}

fn player() -> ResolutionContext {
    ResolutionContext::for_player("Steve")
}

/// Test that the sample document loads with only the expected warnings.
#[test]
fn test_yaml_load_and_validate() {
    let (engine, diagnostics) = load(Arc::new(SeededRandom::from_seed(1)));

    // Two malformed number lines plus the zero weight total of `broken`.
    assert_eq!(diagnostics.len(), 3, "{diagnostics:?}");
    assert!(diagnostics
        .iter()
        .all(|d| d.variable.as_ref().map(VarName::as_str) == Some("broken")));

    let names: Vec<String> = engine
        .variable_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["atk_bonus", "flat", "broken", "atk", "def"]);
}

/// Test that a single-range integer variable always stays in bounds.
#[test]
fn test_normal_integer_range() {
    let (engine, _) = load(Arc::new(SeededRandom::from_seed(42)));

    for _ in 0..500 {
        let value = engine.resolve("flat", &player());
        assert!(!value.contains('.'), "{value}");
        let value: i64 = value.parse().unwrap();
        assert!((10..=20).contains(&value));
    }
}

/// Test that range selection follows cumulative weight shares exactly.
#[test]
fn test_selection_boundaries() {
    let steps = 400;
    let mut draws = Vec::new();
    for step in 0..steps {
        draws.push(step as f64 / steps as f64);
        draws.push(0.5);
    }
    let (engine, _) = load(Arc::new(ScriptedRandom::new(draws)));

    let mut picked = Vec::new();
    for _ in 0..steps {
        let resolution = engine.resolve_detailed("atk_bonus", &player()).unwrap();
        picked.push(resolution.range_index.unwrap());
    }

    // [0, 0.25] -> 0, (0.25, 0.5] -> 1, (0.5, 1) -> 2
    assert!(picked[..=100].iter().all(|&idx| idx == 0));
    assert!(picked[101..=200].iter().all(|&idx| idx == 1));
    assert!(picked[201..].iter().all(|&idx| idx == 2));
}

/// Test that each range is formatted with its own decimal count.
#[test]
fn test_decimals_follow_selected_range() {
    let (engine, _) = load(Arc::new(ScriptedRandom::new([0.1, 0.5, 0.4, 0.5, 0.9, 0.5])));

    assert_eq!(engine.resolve("atk_bonus", &player()), "15");
    assert_eq!(engine.resolve("atk_bonus", &player()), "25.0");
    assert_eq!(engine.resolve("atk_bonus", &player()), "35.00");
}

/// Test elite extraction against the held item's lore.
#[test]
fn test_elite_prefix_lookup() {
    let (engine, _) = load(Arc::new(SeededRandom::from_seed(1)));
    let ctx = player().holding(HeldItem::with_lore(["ATK: 50", "Rarity: Legendary"]));

    assert_eq!(engine.resolve("atk", &ctx), "50");
    assert_eq!(engine.resolve("def", &ctx), "0");
    assert_eq!(
        engine.resolve_detailed("def", &ctx),
        Err(ResolutionMiss::PrefixNotFound {
            prefix: "DEF: ".to_string()
        })
    );
}

/// Test that elite resolution sees through color codes.
#[test]
fn test_elite_with_decorated_lore() {
    let (engine, _) = load(Arc::new(SeededRandom::from_seed(1)));
    let ctx = player().holding(HeldItem::with_lore(["§7ATK: §c-12.5 §8(base)"]));
    assert_eq!(engine.resolve("atk", &ctx), "-12.5");
}

/// Test that elite needs a held item with lore.
#[test]
fn test_elite_without_lore() {
    let (engine, _) = load(Arc::new(SeededRandom::from_seed(1)));

    assert_eq!(engine.resolve("atk", &player()), "0");
    assert_eq!(engine.resolve("atk", &player().holding(HeldItem::plain())), "0");
    assert_eq!(
        engine.resolve("atk", &player().holding(HeldItem::with_lore(Vec::<String>::new()))),
        "0"
    );
}

/// Test that a variable whose lines are all malformed resolves to the sentinel.
#[test]
fn test_all_lines_malformed() {
    let (engine, _) = load(Arc::new(SeededRandom::from_seed(1)));
    assert_eq!(engine.resolve("broken", &player()), SENTINEL);
    assert_eq!(
        engine.resolve_detailed("broken", &player()),
        Err(ResolutionMiss::NoValidRanges)
    );
}

/// Test that a missing player short-circuits every variable.
#[test]
fn test_missing_player() {
    let (engine, _) = load(Arc::new(SeededRandom::from_seed(1)));
    for name in ["atk_bonus", "flat", "atk"] {
        assert_eq!(engine.resolve(name, &ResolutionContext::new()), "0");
    }
}

/// Test the global switch.
#[test]
fn test_disabled_system() {
    let engine = VariableEngine::new();
    let source = format!("{}\nenable: false\n", VARIABLES.replace("enable: true\n", ""));
    let diagnostics = engine.reload(ConfigTree::from_yaml_str(&source).unwrap());

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Info);

    let ctx = player().holding(HeldItem::with_lore(["ATK: 50"]));
    for name in ["atk_bonus", "flat", "atk"] {
        assert_eq!(engine.resolve(name, &ctx), "0");
    }
}

/// Test that the second of two same-named entries is rejected.
#[test]
fn test_duplicate_names() {
    let engine = VariableEngine::new();
    let diagnostics = engine.reload(
        ConfigTree::new()
            .with_variable("hp", VariableSection::elite("HP: "))
            .with_variable("hp", VariableSection::normal(["number::1_1_0", "weight::1"])),
    );

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);

    let ctx = player().holding(HeldItem::with_lore(["HP: 30"]));
    assert_eq!(engine.resolve("hp", &ctx), "30");
}

/// Test that a key repeated in the YAML document only loses its second entry.
#[test]
fn test_duplicate_yaml_key() {
    let engine = VariableEngine::new();
    let tree = ConfigTree::from_yaml_str(
        r#"
atk:
  mode: elite
  prefix: "ATK: "
hp:
  mode: elite
  prefix: "HP: "
hp:
  mode: normal
  values: ["number::1_1_0", "weight::1"]
"#,
    )
    .unwrap();
    let diagnostics = engine.reload(tree);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(
        diagnostics[0].message,
        DefinitionError::DuplicateName("hp".to_string()).to_string()
    );

    let ctx = player().holding(HeldItem::with_lore(["ATK: 4", "HP: 30"]));
    assert_eq!(engine.resolve("atk", &ctx), "4");
    assert_eq!(engine.resolve("hp", &ctx), "30");
}

/// Test that validating the same tree twice gives the same diagnostics.
#[test]
fn test_validate_idempotent() {
    let tree = ConfigTree::from_yaml_str(VARIABLES).unwrap();
    let first = validate(&tree);
    let second = validate(&tree);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

/// Test that naming rules apply to YAML keys of any scalar type.
#[test]
fn test_yaml_key_rules() {
    let tree = ConfigTree::from_yaml_str(
        r#"
123:
  mode: elite
  prefix: "A"
"bad-name":
  mode: elite
  prefix: "A"
good_1:
  mode: wizard
"#,
    )
    .unwrap();
    let diagnostics = validate(&tree);
    assert_eq!(diagnostics.len(), 3);
    assert!(diagnostics.iter().all(|d| d.severity == Severity::Error));
}

/// Test that resolutions stay consistent while another thread reloads.
#[test]
fn test_concurrent_resolve_and_reload() {
    let engine = Arc::new(VariableEngine::new().with_random(Arc::new(SeededRandom::from_seed(9))));
    engine.reload(ConfigTree::new().with_variable("v", VariableSection::normal(["number::1_1_0"])));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..500 {
                    let value = engine.resolve("v", &ResolutionContext::for_player("p"));
                    assert!(value == "1" || value == "2", "{value}");
                }
            })
        })
        .collect();

    for round in 0..100 {
        let line = if round % 2 == 0 { "number::2_2_0" } else { "number::1_1_0" };
        engine.reload(ConfigTree::new().with_variable("v", VariableSection::normal([line])));
    }

    for reader in readers {
        reader.join().unwrap();
    }
}

/// Test the inspect report against the loaded document.
#[test]
fn test_inspect_loaded_variable() {
    let (engine, _) = load(Arc::new(SeededRandom::from_seed(1)));

    let report = engine.inspect("broken").unwrap();
    assert_eq!(report.len(), 2);
    assert!(report.iter().all(|line| line.is_malformed()));

    assert!(matches!(engine.inspect("atk"), Err(InspectError::NotNormal(_))));
    assert!(matches!(engine.inspect("nope"), Err(InspectError::NotFound(_))));
}

/// Test placeholder routing end to end.
#[test]
fn test_placeholder_bridge() {
    let (engine, _) = load(Arc::new(SeededRandom::from_seed(1)));
    let bridge = PlaceholderBridge::new(Arc::new(engine));
    let ctx = player().holding(HeldItem::with_lore(["ATK: 7"]));

    assert_eq!(bridge.request("ph_var_atk", &ctx).as_deref(), Some("7"));
    assert_eq!(
        bridge.request("ph_var_def", &ctx).as_deref(),
        Some("0(variable misconfigured, check variable.yml)")
    );
    assert_eq!(bridge.request("something_else", &ctx), None);
}
