//! Integration test framework for simulating gameplay.
//!
//! A [`GameScript`] sets up both sides of the table by card name, then feeds
//! a list of [`Step`]s through a [`RulesEngine`], the same way a client would.
//!
//! # Example
//!
//! ```ignore
//! let engine = GameScript::new()
//!     .player("Alice", |p| p.hand(&["Scholar Sprite"]).azoth(1))
//!     .player("Bob", |p| p)
//!     .step(Step::PlayCard("Scholar Sprite"))
//!     .step(Step::ResolveStack)
//!     .run()?;
//! ```

#![allow(dead_code)]

use crate::action::{Action, ActionError};
use crate::card::Card;
use crate::cards::CardRegistry;
use crate::effect::TargetRef;
use crate::engine::RulesEngine;
use crate::game_state::{BlockAssignment, GameState, Phase};
use crate::ids::{InstanceId, PlayerIndex};
use crate::zone::Zone;

/// A scripted move.
#[derive(Debug, Clone)]
pub enum Step {
    /// Play a card by name. The active player's hand is searched first.
    PlayCard(&'static str),

    /// Play a card with chosen targets.
    PlayCardTargeting {
        card: &'static str,
        targets: Vec<TargetChoice>,
    },

    /// Activate an ability of a card on a field. Its controller activates it.
    Activate {
        source: &'static str,
        ability: usize,
        targets: Vec<TargetChoice>,
    },

    /// The active player attacks with these Familiars.
    Attack(Vec<&'static str>),

    /// The defending player blocks: (blocker, attacker) pairs.
    Block(Vec<(&'static str, &'static str)>),

    ResolveStack,

    /// Resolve until the stack is empty.
    ResolveAll,

    NextPhase,

    /// Advance phases until the game is in `Phase`.
    AdvanceTo(Phase),

    /// The named player concedes.
    Concede(&'static str),
}

/// A target choice, resolved from the acting player's point of view.
#[derive(Debug, Clone)]
pub enum TargetChoice {
    /// A player by name.
    Player(&'static str),
    /// A Familiar by name, the opponent's side searched first.
    Familiar(&'static str),
    /// The item on top of the stack.
    TopOfStack,
}

/// Error type for script execution.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// A card name was not found in the registry.
    CardNotFound(String),
    /// The named card is not where the step needs it.
    NotFound(String),
    /// The engine refused the step.
    Rejected { step: String, reason: ActionError },
    /// The engine accepted the step but could not perform it.
    ActionFailed(String),
    EmptyStack,
    /// `AdvanceTo` never reached its phase.
    Stuck(Phase),
}

/// One side of the table.
#[derive(Debug, Clone, Default)]
pub struct Seat {
    name: &'static str,
    hand: Vec<&'static str>,
    field: Vec<&'static str>,
    graveyard: Vec<&'static str>,
    azoth: u32,
    deck: usize,
    life_cards: usize,
}

impl Seat {
    pub fn hand(mut self, cards: &[&'static str]) -> Self {
        self.hand.extend_from_slice(cards);
        self
    }

    /// Cards already on the field since an earlier turn.
    pub fn field(mut self, cards: &[&'static str]) -> Self {
        self.field.extend_from_slice(cards);
        self
    }

    pub fn graveyard(mut self, cards: &[&'static str]) -> Self {
        self.graveyard.extend_from_slice(cards);
        self
    }

    /// Azoth available right now.
    pub fn azoth(mut self, amount: u32) -> Self {
        self.azoth = amount;
        self
    }

    /// Deck size, filled with Scholar Sprites.
    pub fn deck(mut self, size: usize) -> Self {
        self.deck = size;
        self
    }

    pub fn life_cards(mut self, count: usize) -> Self {
        self.life_cards = count;
        self
    }
}

/// Builder for a scripted game.
pub struct GameScript {
    seats: Vec<Seat>,
    extra_cards: Vec<Card>,
    phase: Phase,
    steps: Vec<Step>,
}

impl GameScript {
    /// Alice to act, in her main phase of turn 1.
    pub fn new() -> Self {
        Self {
            seats: Vec::new(),
            extra_cards: Vec::new(),
            phase: Phase::Main,
            steps: Vec::new(),
        }
    }

    /// Adds a seat. The first seat added is player 0 and starts active.
    /// Every seat starts with four life cards and a deck of three.
    pub fn player(mut self, name: &'static str, setup: impl FnOnce(Seat) -> Seat) -> Self {
        let seat = Seat {
            name,
            deck: 3,
            life_cards: 4,
            ..Seat::default()
        };
        self.seats.push(setup(seat));
        self
    }

    /// Makes a card template available by name.
    pub fn card(mut self, card: Card) -> Self {
        self.extra_cards.push(card);
        self
    }

    pub fn phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    fn build_state(&self, registry: &CardRegistry) -> Result<GameState, ScriptError> {
        let name = |i: usize, default: &'static str| self.seats.get(i).map_or(default, |s| s.name);
        let mut state = GameState::new(name(0, "Alice"), name(1, "Bob"));
        let template = |name: &str| {
            registry
                .get_by_name(name)
                .cloned()
                .ok_or_else(|| ScriptError::CardNotFound(name.to_string()))
        };
        let filler = template("Scholar Sprite")?;

        for (index, seat) in self.seats.iter().take(2).enumerate() {
            let player = PlayerIndex::from_index(index as u8);
            for _ in 0..seat.life_cards {
                state.add_card(player, Zone::LifeCards, filler.clone());
            }
            for _ in 0..seat.deck {
                state.add_card(player, Zone::Deck, filler.clone());
            }
            for card in &seat.hand {
                state.add_card(player, Zone::Hand, template(card)?);
            }
            for card in &seat.graveyard {
                state.add_card(player, Zone::Graveyard, template(card)?);
            }
            for card in &seat.field {
                let id = state.add_card(player, Zone::Field, template(card)?);
                if let Some(inst) = state.instance_mut(id) {
                    inst.summoning_sickness = false;
                }
            }
            state.player_mut(player).azoth_available = seat.azoth;
        }
        state.phase = self.phase;
        Ok(state)
    }

    /// Runs every step and returns the engine for inspection.
    pub fn run(self) -> Result<RulesEngine, ScriptError> {
        let mut registry = CardRegistry::with_builtin_cards();
        for card in &self.extra_cards {
            registry.register(card.clone());
        }
        let state = self.build_state(&registry)?;
        let mut engine = RulesEngine::new(state);
        for step in &self.steps {
            perform(&mut engine, step)?;
        }
        Ok(engine)
    }
}

impl Default for GameScript {
    fn default() -> Self {
        Self::new()
    }
}

fn player_named(state: &GameState, name: &str) -> Result<PlayerIndex, ScriptError> {
    [PlayerIndex::FIRST, PlayerIndex::SECOND]
        .into_iter()
        .find(|p| state.player(*p).name == name)
        .ok_or_else(|| ScriptError::NotFound(format!("player {name}")))
}

/// A card by name in one zone of `player`, skipping ids already used.
fn find_in(
    state: &GameState,
    player: PlayerIndex,
    zone: Zone,
    name: &str,
    used: &[InstanceId],
) -> Option<InstanceId> {
    state
        .player(player)
        .zone(zone)
        .iter()
        .find(|inst| inst.card.name == name && !used.contains(&inst.instance_id))
        .map(|inst| inst.instance_id)
}

/// The first player, active first, holding `name` in `zone`.
fn locate(state: &GameState, zone: Zone, name: &str) -> Result<(PlayerIndex, InstanceId), ScriptError> {
    let active = state.active_player;
    [active, active.opponent()]
        .into_iter()
        .find_map(|p| find_in(state, p, zone, name, &[]).map(|id| (p, id)))
        .ok_or_else(|| ScriptError::NotFound(format!("{name} in {zone:?}")))
}

fn resolve_targets(
    state: &GameState,
    actor: PlayerIndex,
    choices: &[TargetChoice],
) -> Result<Vec<TargetRef>, ScriptError> {
    choices
        .iter()
        .map(|choice| match choice {
            TargetChoice::Player(name) => player_named(state, name).map(TargetRef::Player),
            TargetChoice::Familiar(name) => [actor.opponent(), actor]
                .into_iter()
                .find_map(|p| find_in(state, p, Zone::Field, name, &[]))
                .map(TargetRef::Card)
                .ok_or_else(|| ScriptError::NotFound(format!("{name} on a field"))),
            TargetChoice::TopOfStack => state
                .stack
                .last()
                .map(|item| TargetRef::StackItem(item.id))
                .ok_or(ScriptError::EmptyStack),
        })
        .collect()
}

fn to_action(state: &GameState, step: &Step) -> Result<Option<Action>, ScriptError> {
    let action = match step {
        Step::PlayCard(card) => {
            let (player, id) = locate(state, Zone::Hand, card)?;
            Action::PlayCard {
                player,
                card: id,
                targets: vec![],
            }
        }
        Step::PlayCardTargeting { card, targets } => {
            let (player, id) = locate(state, Zone::Hand, card)?;
            Action::PlayCard {
                player,
                card: id,
                targets: resolve_targets(state, player, targets)?,
            }
        }
        Step::Activate {
            source,
            ability,
            targets,
        } => {
            let (player, id) = locate(state, Zone::Field, source)?;
            Action::ActivateAbility {
                player,
                card: id,
                ability: *ability,
                targets: resolve_targets(state, player, targets)?,
            }
        }
        Step::Attack(names) => {
            let player = state.active_player;
            let mut attackers = Vec::new();
            for name in names {
                let id = find_in(state, player, Zone::Field, name, &attackers)
                    .ok_or_else(|| ScriptError::NotFound(format!("attacker {name}")))?;
                attackers.push(id);
            }
            Action::Attack { player, attackers }
        }
        Step::Block(pairs) => {
            let attacking = state.active_player;
            let player = attacking.opponent();
            let mut used = Vec::new();
            let mut blocks = Vec::new();
            for (blocker, attacker) in pairs {
                let blocker = find_in(state, player, Zone::Field, blocker, &used)
                    .ok_or_else(|| ScriptError::NotFound(format!("blocker {blocker}")))?;
                used.push(blocker);
                let attacker = find_in(state, attacking, Zone::Field, attacker, &[])
                    .ok_or_else(|| ScriptError::NotFound(format!("attacker {attacker}")))?;
                blocks.push(BlockAssignment { attacker, blocker });
            }
            Action::Block { player, blocks }
        }
        Step::NextPhase => Action::ChangePhase {
            new_phase: state.phase.next(),
        },
        Step::Concede(name) => Action::Concede {
            player: player_named(state, name)?,
        },
        Step::ResolveStack | Step::ResolveAll | Step::AdvanceTo(_) => return Ok(None),
    };
    Ok(Some(action))
}

fn submit(engine: &mut RulesEngine, step: &Step, action: Action) -> Result<(), ScriptError> {
    let validation = engine.validate_action(&action);
    if let Some(reason) = validation.details {
        return Err(ScriptError::Rejected {
            step: format!("{step:?}"),
            reason,
        });
    }
    engine
        .execute_action(action)
        .map(|_| ())
        .ok_or_else(|| ScriptError::ActionFailed(format!("{step:?}")))
}

fn perform(engine: &mut RulesEngine, step: &Step) -> Result<(), ScriptError> {
    match step {
        Step::ResolveStack => {
            if engine.resolve_stack() {
                Ok(())
            } else {
                Err(ScriptError::EmptyStack)
            }
        }
        Step::ResolveAll => {
            while engine.resolve_stack() {}
            Ok(())
        }
        Step::AdvanceTo(phase) => {
            // A full turn is five phases; two turns is plenty.
            for _ in 0..10 {
                if engine.game_state().phase == *phase {
                    return Ok(());
                }
                let new_phase = engine.game_state().phase.next();
                submit(engine, step, Action::ChangePhase { new_phase })?;
            }
            Err(ScriptError::Stuck(*phase))
        }
        _ => match to_action(engine.game_state(), step)? {
            Some(action) => submit(engine, step, action),
            None => Ok(()),
        },
    }
}

// === Assertion helpers ===

fn zone_names(engine: &RulesEngine, player: PlayerIndex, zone: Zone) -> Vec<String> {
    engine
        .game_state()
        .player(player)
        .zone(zone)
        .iter()
        .map(|inst| inst.card.name.clone())
        .collect()
}

fn on_field(engine: &RulesEngine, player: PlayerIndex, name: &str) -> bool {
    zone_names(engine, player, Zone::Field).iter().any(|n| n == name)
}

fn in_graveyard(engine: &RulesEngine, player: PlayerIndex, name: &str) -> bool {
    zone_names(engine, player, Zone::Graveyard)
        .iter()
        .any(|n| n == name)
}

fn life_cards(engine: &RulesEngine, player: PlayerIndex) -> usize {
    engine.game_state().player(player).life_cards.len()
}

const ALICE: PlayerIndex = PlayerIndex::FIRST;
const BOB: PlayerIndex = PlayerIndex::SECOND;

mod scenarios {
    use super::*;
    use crate::card::CardBuilder;
    use crate::effect::{EffectDescriptor, EffectKind, TargetSpec};
    use crate::targeting::TargetingInvalidReason;
    use crate::types::CardType;

    #[test]
    fn test_scholar_sprite_draws_on_entry() {
        let engine = GameScript::new()
            .player("Alice", |p| p.hand(&["Scholar Sprite"]).azoth(1))
            .player("Bob", |p| p)
            .step(Step::PlayCard("Scholar Sprite"))
            .step(Step::ResolveStack)
            .run()
            .unwrap();

        let alice = engine.game_state().player(ALICE);
        assert!(on_field(&engine, ALICE, "Scholar Sprite"));
        assert_eq!(alice.hand.len(), 1);
        assert_eq!(alice.deck.len(), 2);
        assert_eq!(alice.azoth_available, 0);
        assert!(engine.game_state().stack.is_empty());
        assert!(engine.game_state().check_zone_exclusivity().is_ok());
    }

    #[test]
    fn test_counterspell_stops_bolt() {
        let engine = GameScript::new()
            .player("Alice", |p| p.hand(&["Lightning Bolt"]).azoth(1))
            .player("Bob", |p| p.hand(&["Counterspell"]).azoth(2))
            .steps([
                Step::PlayCardTargeting {
                    card: "Lightning Bolt",
                    targets: vec![TargetChoice::Player("Bob")],
                },
                Step::PlayCardTargeting {
                    card: "Counterspell",
                    targets: vec![TargetChoice::TopOfStack],
                },
                Step::ResolveAll,
            ])
            .run()
            .unwrap();

        assert_eq!(life_cards(&engine, BOB), 4);
        assert!(in_graveyard(&engine, ALICE, "Lightning Bolt"));
        assert!(in_graveyard(&engine, BOB, "Counterspell"));
        assert!(engine.game_state().stack.is_empty());
        assert!(engine.game_state().check_zone_exclusivity().is_ok());
    }

    #[test]
    fn test_bolt_removes_three_life_cards() {
        let engine = GameScript::new()
            .player("Alice", |p| p.hand(&["Lightning Bolt"]).azoth(1))
            .player("Bob", |p| p)
            .step(Step::PlayCardTargeting {
                card: "Lightning Bolt",
                targets: vec![TargetChoice::Player("Bob")],
            })
            .step(Step::ResolveStack)
            .run()
            .unwrap();

        assert_eq!(life_cards(&engine, BOB), 1);
        assert_eq!(engine.game_state().player(BOB).graveyard.len(), 3);
        assert!(!engine.game_state().is_game_over());
    }

    #[test]
    fn test_reach_blocks_dragon() {
        let engine = GameScript::new()
            .player("Alice", |p| p.field(&["Dragon"]))
            .player("Bob", |p| p.field(&["Thornback Sentry"]))
            .steps([
                Step::NextPhase,
                Step::Attack(vec!["Dragon"]),
                Step::Block(vec![("Thornback Sentry", "Dragon")]),
                Step::NextPhase,
            ])
            .run()
            .unwrap();

        assert_eq!(engine.game_state().phase, Phase::PostCombat);
        assert!(in_graveyard(&engine, BOB, "Thornback Sentry"));
        assert!(on_field(&engine, ALICE, "Dragon"));
        assert_eq!(life_cards(&engine, BOB), 4);
        assert!(engine.game_state().attackers.is_empty());
    }

    #[test]
    fn test_grounded_familiar_cannot_block_dragon() {
        let result = GameScript::new()
            .player("Alice", |p| p.field(&["Dragon"]))
            .player("Bob", |p| p.field(&["Scholar Sprite"]))
            .steps([
                Step::NextPhase,
                Step::Attack(vec!["Dragon"]),
                Step::Block(vec![("Scholar Sprite", "Dragon")]),
            ])
            .run();

        assert!(matches!(
            result,
            Err(ScriptError::Rejected {
                reason: ActionError::CannotBlock { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_unblocked_attacker_hits_life_cards() {
        let engine = GameScript::new()
            .player("Alice", |p| p.field(&["Cinder Imp", "Scholar Sprite"]))
            .player("Bob", |p| p)
            .steps([
                Step::NextPhase,
                Step::Attack(vec!["Cinder Imp", "Scholar Sprite"]),
                Step::NextPhase,
            ])
            .run()
            .unwrap();

        assert_eq!(life_cards(&engine, BOB), 2);
        let alice = engine.game_state().player(ALICE);
        assert!(alice.field.iter().all(|inst| inst.tapped));
    }

    #[test]
    fn test_defender_cannot_attack() {
        let result = GameScript::new()
            .player("Alice", |p| p.field(&["Thornback Sentry"]))
            .player("Bob", |p| p)
            .steps([Step::NextPhase, Step::Attack(vec!["Thornback Sentry"])])
            .run();

        assert!(matches!(
            result,
            Err(ScriptError::Rejected {
                reason: ActionError::CannotAttack { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_growth_spell_wins_combat_on_opponents_turn() {
        let engine = GameScript::new()
            .player("Alice", |p| p.field(&["Cinder Imp"]))
            .player("Bob", |p| {
                p.field(&["Scholar Sprite"]).hand(&["Growth Spell"]).azoth(1)
            })
            .steps([
                Step::NextPhase,
                Step::Attack(vec!["Cinder Imp"]),
                Step::Block(vec![("Scholar Sprite", "Cinder Imp")]),
                Step::PlayCardTargeting {
                    card: "Growth Spell",
                    targets: vec![TargetChoice::Familiar("Scholar Sprite")],
                },
                Step::ResolveStack,
                Step::NextPhase,
            ])
            .run()
            .unwrap();

        assert!(in_graveyard(&engine, ALICE, "Cinder Imp"));
        let sprite = &engine.game_state().player(BOB).field[0];
        assert_eq!((sprite.power, sprite.toughness), (3, 2));
        assert_eq!(life_cards(&engine, BOB), 4);
    }

    #[test]
    fn test_buff_expires_at_end_of_turn() {
        let engine = GameScript::new()
            .player("Alice", |p| {
                p.field(&["Scholar Sprite"]).hand(&["Growth Spell"]).azoth(1)
            })
            .player("Bob", |p| p)
            .steps([
                Step::PlayCardTargeting {
                    card: "Growth Spell",
                    targets: vec![TargetChoice::Familiar("Scholar Sprite")],
                },
                Step::ResolveStack,
                Step::AdvanceTo(Phase::End),
            ])
            .run()
            .unwrap();

        let sprite = &engine.game_state().player(ALICE).field[0];
        assert_eq!((sprite.power, sprite.toughness), (1, 1));
    }

    #[test]
    fn test_hexproof_refuses_opposing_bolt() {
        let result = GameScript::new()
            .player("Alice", |p| p.hand(&["Lightning Bolt"]).azoth(1))
            .player("Bob", |p| p.field(&["Veilstalker"]))
            .step(Step::PlayCardTargeting {
                card: "Lightning Bolt",
                targets: vec![TargetChoice::Familiar("Veilstalker")],
            })
            .run();

        assert!(matches!(
            result,
            Err(ScriptError::Rejected {
                reason: ActionError::IllegalTarget {
                    reason: TargetingInvalidReason::HasHexproof,
                    ..
                },
                ..
            })
        ));
    }

    #[test]
    fn test_aegis_sentinel_taps_instead_of_destroy() {
        let doom = CardBuilder::new("doom-bolt", "Doom Bolt", CardType::Spell)
            .cost(1)
            .effect(EffectDescriptor::on_play(
                EffectKind::Destroy,
                TargetSpec::TargetFamiliar,
            ))
            .build();
        let engine = GameScript::new()
            .card(doom)
            .player("Alice", |p| p.hand(&["Doom Bolt"]).azoth(1))
            .player("Bob", |p| p.field(&["Aegis Sentinel", "Scholar Sprite"]))
            .step(Step::PlayCardTargeting {
                card: "Doom Bolt",
                targets: vec![TargetChoice::Familiar("Scholar Sprite")],
            })
            .step(Step::ResolveStack)
            .run()
            .unwrap();

        let bob = engine.game_state().player(BOB);
        let sprite = bob
            .field
            .iter()
            .find(|inst| inst.card.name == "Scholar Sprite")
            .unwrap();
        assert!(sprite.tapped);
        assert!(in_graveyard(&engine, ALICE, "Doom Bolt"));
    }

    #[test]
    fn test_banner_refunds_azoth_on_cast() {
        let engine = GameScript::new()
            .player("Alice", |p| {
                p.hand(&["Banner of the Tides", "Lightning Bolt"]).azoth(2)
            })
            .player("Bob", |p| p)
            .steps([
                Step::PlayCard("Banner of the Tides"),
                Step::PlayCardTargeting {
                    card: "Lightning Bolt",
                    targets: vec![TargetChoice::Player("Bob")],
                },
            ])
            .run()
            .unwrap();

        // The banner's trigger sits on top of the bolt.
        let stack = &engine.game_state().stack;
        assert_eq!(stack.len(), 2);
        assert_eq!(stack[1].source.card.name, "Banner of the Tides");
        assert!(engine.game_state().player(ALICE).flag_card.is_some());

        let mut engine = engine;
        assert!(engine.resolve_stack());
        assert_eq!(engine.game_state().player(ALICE).azoth_available, 1);
        assert!(engine.resolve_stack());
        assert_eq!(life_cards(&engine, BOB), 1);
    }

    #[test]
    fn test_healing_spring_heals_and_restores() {
        let engine = GameScript::new()
            .player("Alice", |p| {
                p.field(&["Aegis Sentinel"])
                    .hand(&["Healing Spring"])
                    .graveyard(&["Scholar Sprite"])
                    .azoth(2)
            })
            .player("Bob", |p| p.field(&["Cinder Imp"]).azoth(1))
            .steps([
                Step::Activate {
                    source: "Cinder Imp",
                    ability: 0,
                    targets: vec![TargetChoice::Familiar("Aegis Sentinel")],
                },
                Step::ResolveStack,
                Step::PlayCard("Healing Spring"),
                Step::ResolveStack,
            ])
            .run()
            .unwrap();

        let alice = engine.game_state().player(ALICE);
        assert_eq!(alice.field[0].toughness, 3);
        assert_eq!(alice.life_cards.len(), 5);
        assert_eq!(alice.graveyard.len(), 1);
        assert!(in_graveyard(&engine, ALICE, "Healing Spring"));
        assert!(engine.game_state().player(BOB).field[0].tapped);
    }

    #[test]
    fn test_ashen_wisp_draws_when_it_dies() {
        let engine = GameScript::new()
            .player("Alice", |p| p.hand(&["Lightning Bolt"]).azoth(1))
            .player("Bob", |p| p.field(&["Ashen Wisp"]))
            .step(Step::PlayCardTargeting {
                card: "Lightning Bolt",
                targets: vec![TargetChoice::Familiar("Ashen Wisp")],
            })
            .step(Step::ResolveStack)
            .run()
            .unwrap();

        assert!(in_graveyard(&engine, BOB, "Ashen Wisp"));
        assert_eq!(engine.game_state().player(BOB).hand.len(), 1);
    }

    #[test]
    fn test_turn_passes_and_next_player_draws() {
        let engine = GameScript::new()
            .player("Alice", |p| p)
            .player("Bob", |p| p)
            .step(Step::AdvanceTo(Phase::Start))
            .run()
            .unwrap();

        let game = engine.game_state();
        assert_eq!(game.active_player, BOB);
        assert_eq!(game.turn, 1);
        assert_eq!(game.player(BOB).hand.len(), 1);
        assert_eq!(game.player(ALICE).hand.len(), 0);
    }

    #[test]
    fn test_drawing_from_empty_deck_loses() {
        let result = GameScript::new()
            .player("Alice", |p| p)
            .player("Bob", |p| p.deck(0))
            .step(Step::AdvanceTo(Phase::Start))
            .step(Step::NextPhase)
            .run();

        assert!(matches!(
            result,
            Err(ScriptError::Rejected {
                reason: ActionError::GameOver,
                ..
            })
        ));
    }

    #[test]
    fn test_sorcery_speed_on_opponents_turn_rejected() {
        let result = GameScript::new()
            .player("Alice", |p| p)
            .player("Bob", |p| p.hand(&["Lightning Bolt"]).azoth(1))
            .step(Step::PlayCardTargeting {
                card: "Lightning Bolt",
                targets: vec![TargetChoice::Player("Alice")],
            })
            .run();

        assert!(matches!(
            result,
            Err(ScriptError::Rejected {
                reason: ActionError::NotActivePlayer(_),
                ..
            })
        ));
    }

    #[test]
    fn test_concede_ends_the_game() {
        let engine = GameScript::new()
            .player("Alice", |p| p)
            .player("Bob", |p| p)
            .step(Step::Concede("Bob"))
            .run()
            .unwrap();
        assert_eq!(engine.game_state().winner, Some(ALICE));
    }
}
