//! The rules engine.
//!
//! [`RulesEngine`] owns the installed [`GameState`], the [`RuleBook`] and the
//! [`EventBus`]. Every state change goes through [`RulesEngine::set_game_state`],
//! which runs the static/state-based fixpoint, destroy hooks and trigger
//! detection before the new state becomes visible.
//!
//! Actions are applied to a clone of the installed state; a rejected or
//! failing action leaves the installed state untouched.

use std::collections::VecDeque;

use crate::action::{Action, ActionError, ActionKind, Validation};
use crate::card::{Card, CardInstance};
use crate::cards::{ActivatedAbility, CardRules};
use crate::config::EngineConfig;
use crate::cost;
use crate::effect::{EffectDescriptor, EffectTiming, TargetRef};
use crate::events::{EngineEvent, EventBus, EventKind, ListenerError, ListenerId};
use crate::game_state::{GameState, Phase, StackItem, StackItemKind, TurnAction};
use crate::ids::{CardId, PlayerIndex};
use crate::keywords::KeywordRules;
use crate::rules::effects::{resolution_targets, resolve_effect};
use crate::rules::{
    CardHook, KeywordHook, Rule, RuleBinding, RuleBook, RuleBuilder, RuleContext, RuleError,
    RuleOutcome, RuleType, apply_holding, first_rejection,
};
use crate::targeting::{self, TargetRequest};
use crate::triggers::TriggerContext;
use crate::zone::Zone;

/// Static rules the fixpoint runs: global ones and card/keyword static hooks.
/// Restriction and targeting checks typed `Static` are consulted elsewhere.
fn is_fixpoint_static(binding: &RuleBinding) -> bool {
    match binding {
        RuleBinding::Unbound => true,
        RuleBinding::Card { hook, .. } => *hook == CardHook::Static,
        RuleBinding::Keyword { hook, .. } => *hook == KeywordHook::Static,
        _ => false,
    }
}

fn apply_logged(rule: &dyn Rule, state: &mut GameState, ctx: &RuleContext<'_>) -> RuleOutcome {
    match rule.apply(state, ctx) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(rule = rule.id(), error = %err, "rule failed");
            RuleOutcome::Unchanged
        }
    }
}

/// Applies static and state-based rules until a pass changes nothing, at
/// most `max_sba_iterations` passes. Returns the number of passes run.
pub fn run_fixpoint(book: &RuleBook, config: &EngineConfig, state: &mut GameState) -> usize {
    let ctx = RuleContext::new(book, config);
    let statics: Vec<&dyn Rule> = book
        .registry
        .rules_of_type(RuleType::Static)
        .into_iter()
        .filter(|rule| is_fixpoint_static(rule.binding()))
        .collect();
    let state_based = book.registry.rules_of_type(RuleType::StateBased);

    for pass in 1..=config.max_sba_iterations {
        let mut outcome = RuleOutcome::Unchanged;
        for rule in statics.iter().chain(state_based.iter()) {
            if rule.condition(state, &ctx) {
                outcome = outcome.or(apply_logged(*rule, state, &ctx));
            }
        }
        if !outcome.changed() {
            return pass;
        }
    }
    tracing::warn!(
        cap = config.max_sba_iterations,
        "state-based actions still changing at the iteration cap"
    );
    config.max_sba_iterations
}

/// Instances that went from a field in `previous` to a graveyard in `state`.
fn destroyed_since(state: &GameState, previous: &GameState) -> Vec<CardInstance> {
    previous
        .players
        .iter()
        .flat_map(|p| p.field.iter())
        .filter_map(|old| match state.find_instance(old.instance_id) {
            Some((Zone::Graveyard, inst)) => Some(inst.clone()),
            _ => None,
        })
        .collect()
}

/// Runs the on-destroy hooks of every card destroyed since `previous`.
fn run_destroy_hooks(
    book: &RuleBook,
    config: &EngineConfig,
    state: &mut GameState,
    previous: &GameState,
) -> RuleOutcome {
    let mut outcome = RuleOutcome::Unchanged;
    for dead in destroyed_since(state, previous) {
        let hooks = book.registry.rules_bound(&RuleBinding::Card {
            card: dead.card_id().clone(),
            hook: CardHook::OnDestroy,
        });
        if hooks.is_empty() {
            continue;
        }
        let ctx = RuleContext::new(book, config)
            .with_player(dead.owner)
            .with_source(&dead);
        match apply_holding(&hooks, state, &ctx) {
            Ok(o) => outcome = outcome.or(o),
            Err(err) => {
                tracing::error!(card = %dead.card.name, error = %err, "destroy hook failed")
            }
        }
    }
    outcome
}

/// A triggered effect that fired and is ready to go on the stack.
struct Firing {
    source: CardInstance,
    effect: EffectDescriptor,
    targets: Vec<TargetRef>,
}

fn condition_holds(
    book: &RuleBook,
    name: &str,
    state: &GameState,
    previous: &GameState,
    ctx: &TriggerContext<'_>,
) -> bool {
    match book.trigger_condition(name) {
        Some(condition) => condition.check(state, previous, ctx),
        None => {
            tracing::warn!(trigger = name, "unknown trigger condition");
            false
        }
    }
}

/// Triggered effects fired by the transition `previous -> state`, active player first.
fn detect_triggers(
    book: &RuleBook,
    config: &EngineConfig,
    state: &GameState,
    previous: &GameState,
) -> Vec<Firing> {
    let mut firings = Vec::new();
    for source in state.triggerable_instances() {
        let ctx = TriggerContext::for_source(source);
        for effect in source.card.effects_with_timing(EffectTiming::Triggered) {
            let Some(trigger) = effect.trigger.as_deref() else {
                continue;
            };
            if !condition_holds(book, trigger, state, previous, &ctx) {
                continue;
            }
            if let Some(extra) = effect.condition.as_deref()
                && !condition_holds(book, extra, state, previous, &ctx)
            {
                continue;
            }

            let targets = if effect.target.is_chosen() {
                let request = TargetRequest::new(source, ctx.controller, effect.target)
                    .restricted(effect.target_restriction);
                match targeting::legal_targets(book, config, state, &request).first() {
                    Some(target) => vec![*target],
                    None => {
                        tracing::debug!(card = %source.card.name, trigger, "trigger has no legal target");
                        continue;
                    }
                }
            } else {
                Vec::new()
            };

            firings.push(Firing {
                source: source.clone(),
                effect: effect.clone(),
                targets,
            });
        }
    }
    firings
}

/// Resolves a popped stack item into `state`. Returns true if it fizzled.
fn resolve_item(
    book: &RuleBook,
    config: &EngineConfig,
    state: &mut GameState,
    item: &StackItem,
) -> Result<bool, RuleError> {
    let legal_chosen = if item.targets.is_empty() {
        Vec::new()
    } else {
        let request = TargetRequest::new(&item.source, item.controller, item.effect.target)
            .restricted(item.effect.target_restriction);
        targeting::still_legal_targets(book, config, state, &request, &item.targets)
    };

    if !item.targets.is_empty() && legal_chosen.is_empty() {
        tracing::debug!(stack_item = item.id.0, card = %item.source.card.name, "fizzled");
        if item.is_spell() {
            state.put_instance(item.source.clone(), Zone::Graveyard);
        }
        return Ok(true);
    }

    if !item.is_spell() {
        let targets = resolution_targets(state, item, &item.effect, &legal_chosen);
        resolve_effect(book, config, state, item, &item.effect, &targets)?;
        return Ok(false);
    }

    let effects: Vec<EffectDescriptor> = item
        .source
        .card
        .effects_with_timing(EffectTiming::OnPlay)
        .cloned()
        .collect();
    for effect in &effects {
        let targets = resolution_targets(state, item, effect, &legal_chosen);
        resolve_effect(book, config, state, item, effect, &targets)?;
    }

    let hooks = book.registry.rules_bound(&RuleBinding::Card {
        card: item.source.card_id().clone(),
        hook: CardHook::OnPlay,
    });
    let ctx = RuleContext::new(book, config).with_stack_item(item);
    apply_holding(&hooks, state, &ctx)?;

    state.put_instance(item.source.clone(), Zone::Graveyard);
    Ok(false)
}

fn to_action_error(err: RuleError) -> ActionError {
    match err {
        RuleError::Action(err) => err,
        other => ActionError::Rejected(other.to_string()),
    }
}

/// Deterministic rules engine for one game.
#[derive(Debug)]
pub struct RulesEngine {
    config: EngineConfig,
    book: RuleBook,
    game_state: GameState,
    previous_state: GameState,
    state_history: VecDeque<GameState>,
    events: EventBus,
}

impl RulesEngine {
    /// An engine with the default config and every built-in rule.
    pub fn new(state: GameState) -> Self {
        Self::with_config(EngineConfig::default(), state)
    }

    pub fn with_config(config: EngineConfig, state: GameState) -> Self {
        Self::with_book(config, RuleBook::builtin(), state)
    }

    pub fn with_book(config: EngineConfig, book: RuleBook, state: GameState) -> Self {
        Self {
            config,
            book,
            previous_state: state.clone(),
            game_state: state,
            state_history: VecDeque::new(),
            events: EventBus::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn book(&self) -> &RuleBook {
        &self.book
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    /// The state the current one replaced.
    pub fn previous_state(&self) -> &GameState {
        &self.previous_state
    }

    /// Replaced states, oldest first, at most `max_history_length` of them.
    pub fn game_history(&self) -> &VecDeque<GameState> {
        &self.state_history
    }

    pub fn turn_history(&self) -> &[TurnAction] {
        &self.game_state.turn_history
    }

    /// Installs `state`.
    ///
    /// Runs the static/state-based fixpoint, then on-destroy hooks (and the
    /// fixpoint again if they changed anything), then puts every triggered
    /// effect the transition fired on the stack.
    pub fn set_game_state(&mut self, state: GameState) {
        let previous = std::mem::replace(&mut self.game_state, state);
        self.state_history.push_back(previous.clone());
        while self.state_history.len() > self.config.max_history_length {
            self.state_history.pop_front();
        }

        let (book, config) = (&self.book, &self.config);
        let state = &mut self.game_state;
        run_fixpoint(book, config, state);
        if run_destroy_hooks(book, config, state, &previous).changed() {
            run_fixpoint(book, config, state);
        }

        for firing in detect_triggers(book, config, state, &previous) {
            let controller = firing.source.controller();
            let item = state.push_stack(
                StackItemKind::Triggered,
                firing.source,
                firing.effect,
                controller,
                firing.targets,
            );
            tracing::debug!(stack_item = item.0, %controller, "trigger put on the stack");
        }

        // Spells and abilities pushed by the action, then the triggers, bottom to top.
        let added: Vec<EngineEvent> = state
            .stack
            .iter()
            .filter(|item| previous.stack_item(item.id).is_none())
            .map(|item| EngineEvent::StackItemAdded {
                item: item.id,
                kind: item.kind,
                source: item.source.instance_id,
                controller: item.controller,
            })
            .collect();

        self.previous_state = previous;
        for event in &added {
            self.events.emit(event);
        }
    }

    fn check_action(&self, action: &Action) -> Result<(), ActionError> {
        if let Some(player) = action.player().filter(|p| !p.is_seated()) {
            return Err(ActionError::UnknownPlayer(player));
        }
        let kind = action.kind();
        let validators = self
            .book
            .registry
            .rules_bound(&RuleBinding::Validate(kind));
        if validators.is_empty() {
            return Err(ActionError::NoValidator(kind));
        }
        let ctx = RuleContext::new(&self.book, &self.config).with_action(action);
        if validators
            .iter()
            .any(|rule| rule.condition(&self.game_state, &ctx))
        {
            return Ok(());
        }
        Err(first_rejection(&validators, &self.game_state, &ctx)
            .unwrap_or(ActionError::NoValidator(kind)))
    }

    /// Dry-run legality check. Never changes anything.
    pub fn validate_action(&self, action: &Action) -> Validation {
        match self.check_action(action) {
            Ok(()) => Validation::ok(),
            Err(err) => Validation::rejected(err),
        }
    }

    /// Applies `action` to a clone of the installed state.
    fn perform(&self, action: &Action) -> Result<GameState, ActionError> {
        self.check_action(action)?;
        let kind: ActionKind = action.kind();
        let mut next = self.game_state.clone();
        let ctx = RuleContext::new(&self.book, &self.config).with_action(action);
        let rule = self
            .book
            .registry
            .rules_bound(&RuleBinding::Action(kind))
            .into_iter()
            .find(|rule| rule.condition(&next, &ctx))
            .ok_or_else(|| ActionError::Rejected(format!("no rule performs {kind}")))?;
        rule.apply(&mut next, &ctx).map_err(to_action_error)?;
        next.record_action(action.clone());
        Ok(next)
    }

    fn fail(&mut self, action: Action, error: ActionError) {
        let message = error.to_string();
        tracing::debug!(action = %action.kind(), %message, "action rejected");
        self.events.emit(&EngineEvent::ActionFailed {
            action,
            error,
            message,
        });
    }

    /// Validates and performs `action`. Returns the new state, or `None` if
    /// the action was refused; an `ActionFailed` event then says why.
    pub fn execute_action(&mut self, action: Action) -> Option<&GameState> {
        match self.perform(&action) {
            Ok(next) => {
                tracing::debug!(action = %action.kind(), turn = next.turn, "action executed");
                self.set_game_state(next);
                self.events.emit(&EngineEvent::ActionExecuted { action });
                Some(&self.game_state)
            }
            Err(error) => {
                self.fail(action, error);
                None
            }
        }
    }

    /// Advances to the next phase, passing the turn after End.
    pub fn next_phase(&mut self) -> Option<&GameState> {
        let new_phase = self.game_state.phase.next();
        self.execute_action(Action::ChangePhase { new_phase })
    }

    /// Runs the Start-phase entry rules for the opening turn, which no phase
    /// change precedes. Returns `None` once the game is under way.
    pub fn begin_game(&mut self) -> Option<&GameState> {
        let state = &self.game_state;
        if state.turn != 1
            || state.phase != Phase::Start
            || !state.turn_history.is_empty()
            || state.is_game_over()
        {
            tracing::warn!(turn = state.turn, phase = %state.phase, "game already begun");
            return None;
        }
        let mut next = state.clone();
        let ctx = RuleContext::new(&self.book, &self.config);
        let entry = self
            .book
            .registry
            .rules_bound(&RuleBinding::PhaseEntry(Phase::Start));
        if let Err(err) = apply_holding(&entry, &mut next, &ctx) {
            tracing::error!(error = %err, "opening start phase failed");
            return None;
        }
        next.record_action(Action::ChangePhase {
            new_phase: Phase::Start,
        });
        tracing::info!(player = %next.active_player, "game begins");
        self.set_game_state(next);
        Some(&self.game_state)
    }

    /// Resolves the top of the stack. Returns false if the stack was empty.
    pub fn resolve_stack(&mut self) -> bool {
        let mut next = self.game_state.clone();
        let Some(item) = next.stack.pop() else {
            return false;
        };

        let fizzled = match resolve_item(&self.book, &self.config, &mut next, &item) {
            Ok(fizzled) => fizzled,
            Err(err) => {
                tracing::error!(stack_item = item.id.0, card = %item.source.card.name, error = %err, "resolution failed, item discarded");
                next = self.game_state.clone();
                next.stack.retain(|i| i.id != item.id);
                if item.is_spell() {
                    next.put_instance(item.source.clone(), Zone::Graveyard);
                }
                true
            }
        };
        tracing::debug!(stack_item = item.id.0, card = %item.source.card.name, fizzled, "resolved");

        self.events.emit(&EngineEvent::StackItemResolved {
            item: item.id,
            source: item.source.instance_id,
            fizzled,
        });
        self.set_game_state(next);
        true
    }

    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&EngineEvent) -> Result<(), ListenerError> + 'static,
    {
        self.events.on(kind, listener)
    }

    pub fn off(&mut self, kind: EventKind, id: ListenerId) -> bool {
        self.events.off(kind, id)
    }

    pub fn card_rules(&self, card: &CardId) -> Option<&CardRules> {
        self.book.card_rules(card)
    }

    pub fn keyword_rules(&self, keyword: &str) -> Option<&KeywordRules> {
        self.book.keyword_rules(keyword)
    }

    /// Registers a card's rules, replacing any it had.
    pub fn add_card_rules(&mut self, rules: CardRules) {
        self.book.add_card_rules(rules);
    }

    /// Inserts a rule, replacing one with the same id.
    pub fn add_rule(&mut self, rule: Box<dyn Rule>) -> Option<Box<dyn Rule>> {
        self.book.registry.add_rule(rule)
    }

    /// Builds and inserts a rule. A malformed rule is logged and dropped.
    pub fn register_rule(&mut self, rule: RuleBuilder) -> bool {
        self.book.registry.register(rule)
    }

    pub fn remove_rule(&mut self, id: &str) -> bool {
        self.book.registry.remove_rule(id).is_some()
    }

    pub fn is_valid_target(&self, request: &TargetRequest<'_>, target: TargetRef) -> bool {
        targeting::is_valid_target(&self.book, &self.config, &self.game_state, request, target)
    }

    pub fn legal_targets(&self, request: &TargetRequest<'_>) -> Vec<TargetRef> {
        targeting::legal_targets(&self.book, &self.config, &self.game_state, request)
    }

    pub fn calculate_cost(&self, card: &Card, player: PlayerIndex) -> u32 {
        cost::calculate_cost(&self.book, &self.config, &self.game_state, card, player)
    }

    /// Activated abilities of a card template, by index.
    pub fn activated_abilities(&self, card: &CardId) -> &[ActivatedAbility] {
        self.book
            .card_rules(card)
            .map(|rules| rules.activated_abilities.as_slice())
            .unwrap_or(&[])
    }

    /// A fresh game with the same player names. History and listeners are cleared.
    pub fn reset(&mut self) {
        let [first, second] = &self.game_state.players;
        let state = GameState::new(first.name.clone(), second.name.clone());
        self.previous_state = state.clone();
        self.game_state = state;
        self.state_history.clear();
        self.events.clear();
        tracing::info!("engine reset");
    }
}
