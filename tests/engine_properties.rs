//! Property-based tests for engine invariants.
//!
//! Random play from random seeds must keep every card in exactly one place,
//! leave the board stable after each install, resolve the stack last-in
//! first-out and never let a refused action change anything.

#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;

use azoth_rules::cards::definitions::{growth_spell, scholar_sprite};
use azoth_rules::{
    Action, BlockAssignment, CardRegistry, EffectTiming, EngineConfig, EngineEvent, EventKind,
    GameSetup, GameState, InstanceId, Phase, PlayerIndex, RulesEngine, TargetRef, TargetRequest,
    Zone, run_fixpoint,
};

const ALICE: PlayerIndex = PlayerIndex::FIRST;
const BOB: PlayerIndex = PlayerIndex::SECOND;

fn seeded_engine(seed: u64) -> RulesEngine {
    let registry = CardRegistry::with_builtin_cards();
    let deck: Vec<_> = registry
        .all()
        .flat_map(|c| [c.clone(), c.clone()])
        .collect();
    let config = EngineConfig::default();
    let state = GameSetup::new("Alice", "Bob")
        .deck(ALICE, deck.clone())
        .deck(BOB, deck)
        .seed(seed)
        .build(&config);
    RulesEngine::with_config(config, state)
}

/// Plays the `pick`-th card in the active player's hand with its first legal target.
fn play_from_hand(engine: &mut RulesEngine, pick: usize) {
    let state = engine.game_state();
    let player = state.active_player;
    let hand = &state.player(player).hand;
    if hand.is_empty() {
        return;
    }
    let inst = &hand[pick % hand.len()];
    let chosen = inst
        .card
        .effects
        .iter()
        .find(|e| e.timing == EffectTiming::OnPlay && e.target.is_chosen());
    let targets = match chosen {
        Some(effect) => {
            let request = TargetRequest::new(inst, player, effect.target)
                .restricted(effect.target_restriction);
            engine.legal_targets(&request).into_iter().take(1).collect()
        }
        None => Vec::new(),
    };
    let action = Action::PlayCard {
        player,
        card: inst.instance_id,
        targets,
    };
    engine.execute_action(action);
}

#[derive(Debug, Clone)]
enum Op {
    NextPhase,
    Play(usize),
    Resolve,
    AttackWithAll,
    Bogus(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::NextPhase),
        3 => any::<usize>().prop_map(Op::Play),
        2 => Just(Op::Resolve),
        1 => Just(Op::AttackWithAll),
        1 => (1_000u64..2_000).prop_map(Op::Bogus),
    ]
}

fn apply(engine: &mut RulesEngine, op: &Op) {
    match op {
        Op::NextPhase => {
            engine.next_phase();
        }
        Op::Play(pick) => play_from_hand(engine, *pick),
        Op::Resolve => {
            engine.resolve_stack();
        }
        Op::AttackWithAll => {
            let state = engine.game_state();
            let player = state.active_player;
            let attackers = state
                .player(player)
                .field
                .iter()
                .map(|inst| inst.instance_id)
                .collect();
            engine.execute_action(Action::Attack { player, attackers });
        }
        Op::Bogus(raw) => {
            let player = engine.game_state().active_player;
            engine.execute_action(Action::PlayCard {
                player,
                card: InstanceId::from_raw(*raw),
                targets: vec![],
            });
        }
    }
}

/// Actions built from arbitrary ids, mostly nonsense.
fn any_action() -> impl Strategy<Value = Action> {
    let player = (0u8..2).prop_map(PlayerIndex::from_index);
    let id = (0u64..40).prop_map(InstanceId::from_raw);
    let phase = prop_oneof![
        Just(Phase::Start),
        Just(Phase::Main),
        Just(Phase::Combat),
        Just(Phase::PostCombat),
        Just(Phase::End),
    ];
    prop_oneof![
        (player.clone(), id.clone(), proptest::collection::vec(id.clone(), 0..3)).prop_map(
            |(player, card, targets)| Action::PlayCard {
                player,
                card,
                targets: targets.into_iter().map(TargetRef::Card).collect(),
            }
        ),
        (player.clone(), proptest::collection::vec(id.clone(), 0..3))
            .prop_map(|(player, attackers)| Action::Attack { player, attackers }),
        (player.clone(), id.clone(), id.clone()).prop_map(|(player, attacker, blocker)| {
            Action::Block {
                player,
                blocks: vec![BlockAssignment { attacker, blocker }],
            }
        }),
        (player.clone(), id.clone(), 0usize..3).prop_map(|(player, card, ability)| {
            Action::ActivateAbility {
                player,
                card,
                ability,
                targets: vec![],
            }
        }),
        phase.prop_map(|new_phase| Action::ChangePhase { new_phase }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every card stays in exactly one zone and none appear or vanish.
    #[test]
    fn prop_cards_stay_in_one_zone(
        seed in any::<u64>(),
        ops in proptest::collection::vec(op(), 1..60)
    ) {
        let mut engine = seeded_engine(seed);
        let total = engine.game_state().zone_census().len();
        for op in &ops {
            apply(&mut engine, op);
            let census = engine.game_state().zone_census();
            prop_assert!(engine.game_state().check_zone_exclusivity().is_ok(), "after {:?}", op);
            prop_assert_eq!(census.len(), total);
        }
    }

    /// An installed state is already stable: one more fixpoint run changes nothing.
    #[test]
    fn prop_installed_state_is_stable(
        seed in any::<u64>(),
        ops in proptest::collection::vec(op(), 1..40)
    ) {
        let mut engine = seeded_engine(seed);
        for op in &ops {
            apply(&mut engine, op);
            let mut again = engine.game_state().clone();
            let passes = run_fixpoint(engine.book(), engine.config(), &mut again);
            prop_assert_eq!(passes, 1);
            prop_assert_eq!(&again, engine.game_state());
        }
    }

    /// A refused action leaves the installed state exactly as it was.
    #[test]
    fn prop_refused_actions_change_nothing(
        seed in any::<u64>(),
        warmup in proptest::collection::vec(op(), 0..20),
        action in any_action()
    ) {
        let mut engine = seeded_engine(seed);
        for op in &warmup {
            apply(&mut engine, op);
        }
        let before = engine.game_state().clone();
        let history = engine.game_history().len();
        if !engine.validate_action(&action).valid {
            prop_assert!(engine.execute_action(action).is_none());
            prop_assert_eq!(engine.game_state(), &before);
            prop_assert_eq!(engine.game_history().len(), history);
        }
    }

    /// Bursts cast in response to each other resolve newest first.
    #[test]
    fn prop_stack_resolves_last_in_first_out(count in 1usize..6) {
        let mut state = GameState::new("Alice", "Bob");
        for player in [ALICE, BOB] {
            for _ in 0..4 {
                state.add_card(player, Zone::LifeCards, scholar_sprite());
                state.add_card(player, Zone::Deck, scholar_sprite());
            }
        }
        let target = state.add_card(ALICE, Zone::Field, scholar_sprite());
        let bursts: Vec<_> = (0..count)
            .map(|_| state.add_card(ALICE, Zone::Hand, growth_spell()))
            .collect();
        state.player_mut(ALICE).azoth_available = count as u32;
        state.phase = Phase::Main;

        let mut engine = RulesEngine::new(state);
        let added = Rc::new(RefCell::new(Vec::new()));
        let resolved = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&added);
        engine.on(EventKind::StackItemAdded, move |event| {
            if let EngineEvent::StackItemAdded { item, .. } = event {
                sink.borrow_mut().push(*item);
            }
            Ok(())
        });
        let sink = Rc::clone(&resolved);
        engine.on(EventKind::StackItemResolved, move |event| {
            if let EngineEvent::StackItemResolved { item, .. } = event {
                sink.borrow_mut().push(*item);
            }
            Ok(())
        });

        for burst in bursts {
            let played = engine.execute_action(Action::PlayCard {
                player: ALICE,
                card: burst,
                targets: vec![TargetRef::Card(target)],
            });
            prop_assert!(played.is_some());
        }
        while engine.resolve_stack() {}

        let mut expected = added.borrow().clone();
        expected.reverse();
        prop_assert_eq!(resolved.borrow().clone(), expected);
        let sprite = engine.game_state().instance(target).unwrap();
        prop_assert_eq!(sprite.power, 1 + 2 * count as i32);
    }
}
