//! Validation and action rules for playing cards, activating abilities,
//! changing phase and conceding.
//!
//! Each action kind has a validator bound to [`RuleBinding::Validate`] and an
//! action rule bound to [`RuleBinding::Action`]. Attacks and blocks live in
//! [`super::combat`].

use crate::action::{Action, ActionError, ActionKind};
use crate::card::{Card, CardInstance};
use crate::cards::play_destination;
use crate::cost::calculate_cost;
use crate::effect::{EffectDescriptor, EffectKind, EffectTiming};
use crate::game_state::{GameState, StackItemKind};
use crate::ids::{InstanceId, PlayerIndex};
use crate::targeting::{TargetRequest, validate_targets};
use crate::types::CardType;
use crate::zone::Zone;

use super::{
    CardHook, RuleBinding, RuleBuilder, RuleContext, RuleError, RuleOutcome, RuleType,
    apply_holding,
};

fn validate_rule(kind: ActionKind) -> RuleBuilder {
    RuleBuilder::new(format!("validate_{kind}"))
        .rule_type(RuleType::TurnStructure)
        .binding(RuleBinding::Validate(kind))
}

fn action_rule(kind: ActionKind) -> RuleBuilder {
    RuleBuilder::new(format!("action_{kind}"))
        .rule_type(RuleType::TurnStructure)
        .binding(RuleBinding::Action(kind))
        .condition(move |_, ctx| ctx.action.is_some_and(|a| a.kind() == kind))
}

fn missing_action(kind: ActionKind) -> RuleError {
    RuleError::MissingContext {
        rule: format!("action_{kind}"),
        what: "a matching action",
    }
}

fn hand_card(
    state: &GameState,
    player: PlayerIndex,
    id: InstanceId,
) -> Result<&CardInstance, ActionError> {
    state
        .player(player)
        .hand
        .iter()
        .find(|inst| inst.instance_id == id)
        .ok_or(ActionError::CardNotInHand(id))
}

/// The on-play effect whose targets the player chooses when playing `card`.
fn chosen_effect(card: &Card) -> Option<&EffectDescriptor> {
    card.effects_with_timing(EffectTiming::OnPlay)
        .find(|effect| effect.target.is_chosen())
}

/// How many targets an effect may be given.
fn max_targets(effect: &EffectDescriptor) -> usize {
    match effect.kind {
        EffectKind::DamageDivided(total) => total.max(1) as usize,
        _ => 1,
    }
}

fn validate_play_card(state: &GameState, ctx: &RuleContext<'_>) -> Result<(), ActionError> {
    let Some(Action::PlayCard {
        player,
        card,
        targets,
    }) = ctx.action
    else {
        return Err(ActionError::Rejected("not a play_card action".into()));
    };
    if state.is_game_over() {
        return Err(ActionError::GameOver);
    }
    let inst = hand_card(state, *player, *card)?;
    let card_type = inst.card.card_type;

    if !card_type.is_instant_speed() {
        if *player != state.active_player {
            return Err(ActionError::NotActivePlayer(*player));
        }
        if !state.phase.is_main() {
            return Err(ActionError::WrongPhase {
                kind: ActionKind::PlayCard,
                phase: state.phase,
            });
        }
        if !state.stack.is_empty() {
            return Err(ActionError::StackNotEmpty);
        }
    }

    if card_type == CardType::Azoth {
        if state.player(*player).azoth_placed_this_turn {
            return Err(ActionError::AzothAlreadyPlaced);
        }
        if !targets.is_empty() {
            return Err(ActionError::TooManyTargets { max: 0 });
        }
        return Ok(());
    }

    if card_type.uses_stack() && inst.card.effects_with_timing(EffectTiming::OnPlay).next().is_none() {
        return Err(ActionError::Rejected(format!("{} has no effect", inst.card.name)));
    }

    let cost = calculate_cost(ctx.book, ctx.config, state, &inst.card, *player);
    let available = state.player(*player).azoth_available;
    if available < cost {
        return Err(ActionError::InsufficientAzoth {
            needed: cost,
            available,
        });
    }

    match chosen_effect(&inst.card) {
        Some(effect) => {
            let request = TargetRequest::new(inst, *player, effect.target)
                .restricted(effect.target_restriction);
            validate_targets(
                ctx.book,
                ctx.config,
                state,
                &request,
                targets,
                max_targets(effect),
            )
        }
        None if targets.is_empty() => Ok(()),
        None => Err(ActionError::TooManyTargets { max: 0 }),
    }
}

fn play_card(state: &mut GameState, ctx: &RuleContext<'_>) -> Result<RuleOutcome, RuleError> {
    let Some(Action::PlayCard {
        player,
        card,
        targets,
    }) = ctx.action
    else {
        return Err(missing_action(ActionKind::PlayCard));
    };
    let (player, id) = (*player, *card);
    let template = state
        .instance(id)
        .map(|inst| inst.card.clone())
        .ok_or(RuleError::State(crate::game_state::StateError::InstanceNotFound(id)))?;

    if template.card_type == CardType::Azoth {
        state.move_instance(id, Zone::AzothRow)?;
        let p = state.player_mut(player);
        p.azoth_placed_this_turn = true;
        p.azoth_available += template.azoth_value;
        tracing::debug!(%player, card = %template.name, "placed azoth");
        return Ok(RuleOutcome::Changed);
    }

    let cost = calculate_cost(ctx.book, ctx.config, state, &template, player);
    if !state.player_mut(player).spend_azoth(cost) {
        return Err(RuleError::Action(ActionError::InsufficientAzoth {
            needed: cost,
            available: state.player(player).azoth_available,
        }));
    }

    match play_destination(&template) {
        Some(zone) => {
            state.move_instance(id, zone)?;
            tracing::debug!(%player, card = %template.name, ?zone, cost, "played permanent");
            let Some(entered) = state.instance(id).cloned() else {
                return Ok(RuleOutcome::Changed);
            };
            for effect in entered.card.effects_with_timing(EffectTiming::OnPlay) {
                let chosen = if effect.target.is_chosen() {
                    targets.clone()
                } else {
                    Vec::new()
                };
                state.push_stack(
                    StackItemKind::Triggered,
                    entered.clone(),
                    effect.clone(),
                    player,
                    chosen,
                );
            }
            let hook_ctx = ctx.with_source(&entered);
            let hooks = ctx.book.registry.rules_bound(&RuleBinding::Card {
                card: entered.card_id().clone(),
                hook: CardHook::OnPlay,
            });
            apply_holding(&hooks, state, &hook_ctx)?;
        }
        None => {
            let (_, spell) = state.take_instance(id)?;
            let Some(effect) = spell
                .card
                .effects_with_timing(EffectTiming::OnPlay)
                .next()
                .cloned()
            else {
                state.put_instance(spell, Zone::Graveyard);
                return Ok(RuleOutcome::Changed);
            };
            let name = spell.card.name.clone();
            let item = state.push_stack(StackItemKind::Spell, spell, effect, player, targets.clone());
            tracing::debug!(%player, card = %name, stack_item = item.0, cost, "cast spell");
        }
    }
    Ok(RuleOutcome::Changed)
}

fn validate_activate_ability(
    state: &GameState,
    ctx: &RuleContext<'_>,
) -> Result<(), ActionError> {
    let Some(Action::ActivateAbility {
        player,
        card,
        ability,
        ..
    }) = ctx.action
    else {
        return Err(ActionError::Rejected("not an activate_ability action".into()));
    };
    if state.is_game_over() {
        return Err(ActionError::GameOver);
    }
    let source = state
        .player(*player)
        .field
        .iter()
        .find(|inst| inst.instance_id == *card)
        .ok_or(ActionError::CardNotOnField(*card))?;
    let rules = ctx.book.registry.rules_bound(&RuleBinding::Card {
        card: source.card_id().clone(),
        hook: CardHook::Activated(*ability),
    });
    let Some(rule) = rules.first() else {
        return Err(ActionError::NoSuchAbility {
            card: *card,
            index: *ability,
        });
    };
    let ability_ctx = ctx.with_source(source);
    if rule.condition(state, &ability_ctx) {
        return Ok(());
    }
    Err(rule
        .rejection(state, &ability_ctx)
        .unwrap_or_else(|| ActionError::AbilityUnavailable(rule.id().to_string())))
}

fn activate_ability(state: &mut GameState, ctx: &RuleContext<'_>) -> Result<RuleOutcome, RuleError> {
    let Some(Action::ActivateAbility { card, ability, .. }) = ctx.action else {
        return Err(missing_action(ActionKind::ActivateAbility));
    };
    let Some(source) = state.instance(*card).cloned() else {
        return Err(RuleError::State(crate::game_state::StateError::InstanceNotFound(*card)));
    };
    let rules = ctx.book.registry.rules_bound(&RuleBinding::Card {
        card: source.card_id().clone(),
        hook: CardHook::Activated(*ability),
    });
    let Some(rule) = rules.first() else {
        return Err(RuleError::Action(ActionError::NoSuchAbility {
            card: *card,
            index: *ability,
        }));
    };
    rule.apply(state, &ctx.with_source(&source))
}

fn validate_change_phase(state: &GameState, ctx: &RuleContext<'_>) -> Result<(), ActionError> {
    let Some(Action::ChangePhase { new_phase }) = ctx.action else {
        return Err(ActionError::Rejected("not a change_phase action".into()));
    };
    if state.is_game_over() {
        return Err(ActionError::GameOver);
    }
    if !state.stack.is_empty() {
        return Err(ActionError::StackNotEmpty);
    }
    if *new_phase != state.phase.next() {
        return Err(ActionError::IllegalPhaseChange {
            from: state.phase,
            to: *new_phase,
        });
    }
    Ok(())
}

/// Moves the game into `new_phase` and runs that phase's entry rules.
/// Leaving End passes the turn; the turn number grows when player 0 is active again.
fn change_phase(state: &mut GameState, ctx: &RuleContext<'_>) -> Result<RuleOutcome, RuleError> {
    let Some(Action::ChangePhase { new_phase }) = ctx.action else {
        return Err(missing_action(ActionKind::ChangePhase));
    };
    let new_phase = *new_phase;
    if state.phase == crate::game_state::Phase::End {
        state.active_player = state.active_player.opponent();
        if state.active_player == PlayerIndex::FIRST {
            state.turn += 1;
        }
    }
    state.phase = new_phase;
    tracing::debug!(turn = state.turn, player = %state.active_player, phase = %new_phase, "phase change");

    let entry = ctx.book.registry.rules_bound(&RuleBinding::PhaseEntry(new_phase));
    apply_holding(&entry, state, ctx)?;
    Ok(RuleOutcome::Changed)
}

fn validate_concede(state: &GameState, ctx: &RuleContext<'_>) -> Result<(), ActionError> {
    if !matches!(ctx.action, Some(Action::Concede { .. })) {
        return Err(ActionError::Rejected("not a concede action".into()));
    }
    if state.is_game_over() {
        return Err(ActionError::GameOver);
    }
    Ok(())
}

fn concede(state: &mut GameState, ctx: &RuleContext<'_>) -> Result<RuleOutcome, RuleError> {
    let Some(Action::Concede { player }) = ctx.action else {
        return Err(missing_action(ActionKind::Concede));
    };
    tracing::info!(%player, "player concedes");
    Ok(RuleOutcome::from_changed(
        state.declare_winner(player.opponent()),
    ))
}

pub(crate) fn rules() -> Vec<RuleBuilder> {
    vec![
        validate_rule(ActionKind::PlayCard).validator(validate_play_card),
        action_rule(ActionKind::PlayCard).apply(play_card),
        validate_rule(ActionKind::ActivateAbility).validator(validate_activate_ability),
        action_rule(ActionKind::ActivateAbility).apply(activate_ability),
        validate_rule(ActionKind::ChangePhase).validator(validate_change_phase),
        action_rule(ActionKind::ChangePhase).apply(change_phase),
        validate_rule(ActionKind::Concede).validator(validate_concede),
        action_rule(ActionKind::Concede).apply(concede),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::definitions::{
        counterspell, fire_elemental, lightning_bolt, mana_crystal, scholar_sprite,
    };
    use crate::config::EngineConfig;
    use crate::effect::TargetRef;
    use crate::game_state::Phase;
    use crate::rules::{Rule, RuleBook};

    struct Table {
        book: RuleBook,
        config: EngineConfig,
        state: GameState,
    }

    impl Table {
        fn new() -> Self {
            let mut state = GameState::new("Alice", "Bob");
            state.phase = Phase::Main;
            Self {
                book: RuleBook::builtin(),
                config: EngineConfig::default(),
                state,
            }
        }

        fn validate(&self, action: &Action) -> Result<(), ActionError> {
            let ctx = RuleContext::new(&self.book, &self.config).with_action(action);
            let rule = self
                .book
                .registry
                .rules_bound(&RuleBinding::Validate(action.kind()))
                .into_iter()
                .next()
                .unwrap();
            match rule.rejection(&self.state, &ctx) {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        fn apply(&mut self, action: &Action) -> Result<RuleOutcome, RuleError> {
            let ctx = RuleContext::new(&self.book, &self.config).with_action(action);
            let rules = self.book.registry.rules_bound(&RuleBinding::Action(action.kind()));
            let rule: &dyn Rule = rules[0];
            rule.apply(&mut self.state, &ctx)
        }
    }

    fn play(player: PlayerIndex, card: InstanceId, targets: Vec<TargetRef>) -> Action {
        Action::PlayCard {
            player,
            card,
            targets,
        }
    }

    #[test]
    fn test_azoth_once_per_turn() {
        let mut t = Table::new();
        let first = t.state.add_card(PlayerIndex::FIRST, Zone::Hand, mana_crystal());
        let second = t.state.add_card(PlayerIndex::FIRST, Zone::Hand, mana_crystal());

        let action = play(PlayerIndex::FIRST, first, vec![]);
        assert_eq!(t.validate(&action), Ok(()));
        t.apply(&action).unwrap();
        assert_eq!(t.state.player(PlayerIndex::FIRST).azoth_available, 2);
        assert_eq!(
            t.validate(&play(PlayerIndex::FIRST, second, vec![])),
            Err(ActionError::AzothAlreadyPlaced)
        );
    }

    #[test]
    fn test_sorcery_speed_and_cost() {
        let mut t = Table::new();
        let elemental = t.state.add_card(PlayerIndex::FIRST, Zone::Hand, fire_elemental());
        let action = play(PlayerIndex::FIRST, elemental, vec![]);
        assert_eq!(
            t.validate(&action),
            Err(ActionError::InsufficientAzoth {
                needed: 3,
                available: 0
            })
        );

        t.state.player_mut(PlayerIndex::FIRST).azoth_available = 3;
        t.state.phase = Phase::Combat;
        assert!(matches!(t.validate(&action), Err(ActionError::WrongPhase { .. })));

        t.state.phase = Phase::Main;
        assert_eq!(t.validate(&action), Ok(()));
        t.apply(&action).unwrap();
        assert!(t.state.is_on_field(elemental));
        assert!(t.state.instance(elemental).unwrap().summoning_sickness);
        assert_eq!(t.state.player(PlayerIndex::FIRST).azoth_available, 0);
    }

    #[test]
    fn test_spell_goes_on_stack_with_targets() {
        let mut t = Table::new();
        let bolt = t.state.add_card(PlayerIndex::FIRST, Zone::Hand, lightning_bolt());
        t.state.player_mut(PlayerIndex::FIRST).azoth_available = 1;

        assert_eq!(
            t.validate(&play(PlayerIndex::FIRST, bolt, vec![])),
            Err(ActionError::MissingTarget)
        );
        let action = play(PlayerIndex::FIRST, bolt, vec![TargetRef::Player(PlayerIndex::SECOND)]);
        assert_eq!(t.validate(&action), Ok(()));
        t.apply(&action).unwrap();

        assert!(t.state.player(PlayerIndex::FIRST).hand.is_empty());
        let item = t.state.stack.last().unwrap();
        assert!(item.is_spell());
        assert_eq!(item.source.instance_id, bolt);
        assert_eq!(item.targets, vec![TargetRef::Player(PlayerIndex::SECOND)]);
        assert!(t.state.check_zone_exclusivity().is_ok());
    }

    #[test]
    fn test_burst_on_opponents_turn() {
        let mut t = Table::new();
        let sprite = t.state.add_card(PlayerIndex::FIRST, Zone::Hand, scholar_sprite());
        let counter = t.state.add_card(PlayerIndex::SECOND, Zone::Hand, counterspell());
        t.state.player_mut(PlayerIndex::FIRST).azoth_available = 1;
        t.state.player_mut(PlayerIndex::SECOND).azoth_available = 2;

        // Bob may not play a Familiar on Alice's turn.
        let bob_sprite = t.state.add_card(PlayerIndex::SECOND, Zone::Hand, scholar_sprite());
        assert_eq!(
            t.validate(&play(PlayerIndex::SECOND, bob_sprite, vec![])),
            Err(ActionError::NotActivePlayer(PlayerIndex::SECOND))
        );

        let bolt = t.state.add_card(PlayerIndex::FIRST, Zone::Hand, lightning_bolt());
        t.state.player_mut(PlayerIndex::FIRST).azoth_available = 2;
        t.apply(&play(PlayerIndex::FIRST, bolt, vec![TargetRef::Player(PlayerIndex::SECOND)]))
            .unwrap();
        let spell = t.state.stack[0].id;

        assert_eq!(
            t.validate(&play(PlayerIndex::FIRST, sprite, vec![])),
            Err(ActionError::StackNotEmpty)
        );
        let answer = play(PlayerIndex::SECOND, counter, vec![TargetRef::StackItem(spell)]);
        assert_eq!(t.validate(&answer), Ok(()));
    }

    #[test]
    fn test_change_phase_must_follow_order() {
        let mut t = Table::new();
        t.state.phase = Phase::End;
        let skip = Action::ChangePhase {
            new_phase: Phase::Main,
        };
        assert_eq!(
            t.validate(&skip),
            Err(ActionError::IllegalPhaseChange {
                from: Phase::End,
                to: Phase::Main
            })
        );

        let next = Action::ChangePhase {
            new_phase: Phase::Start,
        };
        t.apply(&next).unwrap();
        assert_eq!(t.state.active_player, PlayerIndex::SECOND);
        assert_eq!(t.state.turn, 1);

        t.state.phase = Phase::End;
        t.apply(&next).unwrap();
        assert_eq!(t.state.active_player, PlayerIndex::FIRST);
        assert_eq!(t.state.turn, 2);
    }

    #[test]
    fn test_concede() {
        let mut t = Table::new();
        let action = Action::Concede {
            player: PlayerIndex::FIRST,
        };
        t.apply(&action).unwrap();
        assert_eq!(t.state.winner, Some(PlayerIndex::SECOND));
        assert_eq!(t.validate(&action), Err(ActionError::GameOver));
    }
}
