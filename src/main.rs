//! Azoth - autopilot demo.
//!
//! Deals a seeded game from the built-in cards and lets both players play it
//! out with a greedy strategy, logging what the engine does.
//!
//! ## Usage
//!
//! ```text
//! azoth_rules [OPTIONS]
//!
//! Options:
//!   --config <file>   JSON engine configuration
//!   --seed <n>        Shuffle seed
//!   --turns <n>       Stop after this many turns
//! ```
//!
//! Each deck holds two copies of every built-in card. `RUST_LOG=debug` shows
//! every rule that fires.

use std::env;
use std::process::ExitCode;

use azoth_rules::rules::combat::can_attack;
use azoth_rules::{
    Action, Card, CardInstance, CardRegistry, EffectDescriptor, EffectKind, EffectTiming,
    EngineConfig, EngineEvent, EventKind, GameSetup, InstanceId, Phase, PlayerIndex, RulesEngine,
    TargetRef, TargetRequest, TargetRestriction,
};
use tracing_subscriber::EnvFilter;

struct GameArgs {
    config: Option<String>,
    seed: u64,
    turns: u32,
}

/// Parse command-line arguments.
fn parse_args() -> GameArgs {
    let args: Vec<String> = env::args().collect();
    let mut parsed = GameArgs {
        config: None,
        seed: 0,
        turns: 20,
    };

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--config", Some(value)) => {
                parsed.config = Some(value.clone());
                i += 2;
            }
            ("--seed", Some(value)) => {
                match value.parse() {
                    Ok(seed) => parsed.seed = seed,
                    Err(_) => eprintln!("Error: --seed expects a number, got '{value}'"),
                }
                i += 2;
            }
            ("--turns", Some(value)) => {
                match value.parse() {
                    Ok(turns) => parsed.turns = turns,
                    Err(_) => eprintln!("Error: --turns expects a number, got '{value}'"),
                }
                i += 2;
            }
            ("--help" | "-h", _) => {
                println!("Azoth - autopilot demo");
                println!();
                println!("Usage: azoth_rules [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --config <file>   JSON engine configuration");
                println!("  --seed <n>        Shuffle seed (default 0)");
                println!("  --turns <n>       Turn limit (default 20)");
                println!("  --help, -h        Show this help message");
                std::process::exit(0);
            }
            (flag @ ("--config" | "--seed" | "--turns"), None) => {
                eprintln!("Error: {flag} requires a value");
                i += 1;
            }
            (other, _) => {
                eprintln!("Unknown argument: {other}");
                i += 1;
            }
        }
    }
    parsed
}

/// Two copies of every built-in card.
fn build_deck(registry: &CardRegistry) -> Vec<Card> {
    registry
        .all()
        .flat_map(|card| [card.clone(), card.clone()])
        .collect()
}

/// Effects that help whatever they target.
fn is_friendly(kind: &EffectKind) -> bool {
    matches!(kind, EffectKind::Buff { .. } | EffectKind::Heal)
}

/// First legal target, the opponent's side preferred for harmful effects.
/// `None` when a chosen target is needed and there is none.
fn pick_targets(
    engine: &RulesEngine,
    source: &CardInstance,
    player: PlayerIndex,
    effect: Option<&EffectDescriptor>,
) -> Option<Vec<TargetRef>> {
    let Some(effect) = effect else {
        return Some(Vec::new());
    };
    let request =
        TargetRequest::new(source, player, effect.target).restricted(effect.target_restriction);
    let legal = engine.legal_targets(&request);
    let state = engine.game_state();
    let ours = |target: &TargetRef| match target {
        TargetRef::Player(p) => *p == player,
        TargetRef::Card(id) => state.instance(*id).is_some_and(|i| i.controller() == player),
        TargetRef::StackItem(id) => state.stack_item(*id).is_some_and(|i| i.controller == player),
    };
    let wanted = is_friendly(&effect.kind) || effect.target_restriction == TargetRestriction::Own;
    legal
        .iter()
        .find(|t| ours(t) == wanted)
        .copied()
        .map(|t| vec![t])
}

/// Play cards from hand until nothing else is playable.
fn play_main_phase(engine: &mut RulesEngine) {
    loop {
        let state = engine.game_state();
        let player = state.active_player;
        let candidate = state.player(player).hand.iter().find_map(|inst| {
            let chosen = inst
                .card
                .effects
                .iter()
                .find(|e| e.timing == EffectTiming::OnPlay && e.target.is_chosen());
            let targets = pick_targets(engine, inst, player, chosen)?;
            let action = Action::PlayCard {
                player,
                card: inst.instance_id,
                targets,
            };
            engine.validate_action(&action).valid.then_some(action)
        });
        let Some(action) = candidate else {
            break;
        };
        if engine.execute_action(action).is_none() {
            break;
        }
        while engine.resolve_stack() {}
        if engine.game_state().is_game_over() {
            break;
        }
    }
}

/// Attack with everything that can. Defenders do not block.
fn play_combat(engine: &mut RulesEngine) {
    let state = engine.game_state();
    let player = state.active_player;
    let attackers: Vec<InstanceId> = state
        .player(player)
        .field
        .iter()
        .filter(|inst| inst.power > 0)
        .filter(|inst| can_attack(engine.book(), engine.config(), state, inst).is_ok())
        .map(|inst| inst.instance_id)
        .collect();
    if !attackers.is_empty() {
        engine.execute_action(Action::Attack { player, attackers });
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args();
    let config = match &args.config {
        Some(path) => match EngineConfig::from_path(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    println!("========================================");
    println!("   Azoth - autopilot");
    println!("========================================\n");

    let registry = CardRegistry::with_builtin_cards();
    let state = GameSetup::new("Alice", "Bob")
        .deck(PlayerIndex::FIRST, build_deck(&registry))
        .deck(PlayerIndex::SECOND, build_deck(&registry))
        .seed(args.seed)
        .build(&config);

    let mut engine = RulesEngine::with_config(config, state);
    engine.on(EventKind::ActionFailed, |event| {
        if let EngineEvent::ActionFailed { message, .. } = event {
            tracing::warn!(%message, "action failed");
        }
        Ok(())
    });
    engine.on(EventKind::StackItemResolved, |event| {
        if let EngineEvent::StackItemResolved { fizzled: true, item, .. } = event {
            tracing::info!(item = item.0, "stack item fizzled");
        }
        Ok(())
    });
    engine.begin_game();

    while !engine.game_state().is_game_over() && engine.game_state().turn <= args.turns {
        let phase = engine.game_state().phase;
        if phase.is_main() {
            play_main_phase(&mut engine);
        } else if phase == Phase::Combat {
            play_combat(&mut engine);
        }
        while engine.resolve_stack() {}
        if engine.game_state().is_game_over() || engine.next_phase().is_none() {
            break;
        }
    }

    let state = engine.game_state();
    for player in &state.players {
        println!(
            "{}: {} life cards, {} in hand, {} on the field",
            player.name,
            player.life_cards.len(),
            player.hand.len(),
            player.field.len()
        );
    }
    match state.winner {
        Some(winner) => println!("\n{} wins on turn {}.", state.player(winner).name, state.turn),
        None => println!("\nNo winner after {} turns.", state.turn),
    }

    ExitCode::SUCCESS
}
