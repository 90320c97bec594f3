//! Keyword abilities.
//!
//! A keyword is a name printed on (or granted to) a card. Its behaviour lives
//! in rules bound to [`RuleBinding::Keyword`], which the engine runs for every
//! instance carrying the keyword at the matching [`KeywordHook`]. A few
//! keywords act elsewhere: Indestructible is a replacement on destroy effects,
//! Deathtouch a state-based action and Trample part of combat damage.

use crate::action::ActionError;
use crate::card::CardInstance;
use crate::effect::{EffectType, TargetRef};
use crate::game_state::GameState;
use crate::rules::effects::DEATHTOUCH_COUNTER;
use crate::rules::{KeywordHook, RuleBinding, RuleBuilder, RuleContext, RuleOutcome, RuleType};
use crate::targeting::TargetingInvalidReason;
use crate::zone::Zone;

pub const FLYING: &str = "Flying";
pub const REACH: &str = "Reach";
pub const VIGILANCE: &str = "Vigilance";
pub const HASTE: &str = "Haste";
pub const DEFENDER: &str = "Defender";
pub const HEXPROOF: &str = "Hexproof";
pub const SHROUD: &str = "Shroud";
pub const PROTECTION: &str = "Protection";
pub const INDESTRUCTIBLE: &str = "Indestructible";
pub const UNBLOCKABLE: &str = "Unblockable";
pub const SHADOW: &str = "Shadow";
pub const FLANKING: &str = "Flanking";
pub const TRAMPLE: &str = "Trample";
pub const DEATHTOUCH: &str = "Deathtouch";

/// The rules one keyword contributes.
#[derive(Debug, Clone)]
pub struct KeywordRules {
    pub keyword: String,
    pub description: String,
    pub rules: Vec<RuleBuilder>,
}

impl KeywordRules {
    pub fn new(keyword: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            description: description.into(),
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, rule: RuleBuilder) -> Self {
        self.rules.push(rule);
        self
    }
}

fn hook_name(hook: KeywordHook) -> &'static str {
    match hook {
        KeywordHook::Static => "static",
        KeywordHook::OnAttack => "on_attack",
        KeywordHook::OnBlocked => "on_blocked",
        KeywordHook::AttackRestriction => "attack_restriction",
        KeywordHook::BlockRestriction => "block_restriction",
        KeywordHook::Targeting => "targeting",
    }
}

/// A rule builder bound to `keyword` at `hook`.
pub fn keyword_rule(keyword: &str, hook: KeywordHook, rule_type: RuleType) -> RuleBuilder {
    RuleBuilder::new(format!(
        "keyword:{}:{}",
        keyword.to_ascii_lowercase(),
        hook_name(hook)
    ))
    .rule_type(rule_type)
    .binding(RuleBinding::keyword(keyword, hook))
}

/// The targeted card of a targeting rule.
fn targeted<'s>(state: &'s GameState, ctx: &RuleContext<'_>) -> Option<&'s CardInstance> {
    match ctx.target {
        Some(TargetRef::Card(id)) => state.instance(id),
        _ => None,
    }
}

fn illegal(ctx: &RuleContext<'_>, reason: TargetingInvalidReason) -> ActionError {
    ActionError::IllegalTarget {
        target: ctx.target.unwrap_or(TargetRef::Player(crate::ids::PlayerIndex::FIRST)),
        reason,
    }
}

/// The attacker and blocker of a block restriction check.
fn block_pair<'s>(
    state: &'s GameState,
    ctx: &RuleContext<'s>,
) -> Option<(&'s CardInstance, &'s CardInstance)> {
    let blocker = ctx.source?;
    let attacker = match ctx.target {
        Some(TargetRef::Card(id)) => state.instance(id)?,
        _ => return None,
    };
    Some((attacker, blocker))
}

fn cannot_block(attacker: &CardInstance, blocker: &CardInstance, reason: &str) -> ActionError {
    ActionError::CannotBlock {
        blocker: blocker.instance_id,
        attacker: attacker.instance_id,
        reason: reason.to_string(),
    }
}

fn protection() -> KeywordRules {
    KeywordRules::new(
        PROTECTION,
        "Can't be targeted by sources of the protected type or element.",
    )
    .rule(
        keyword_rule(PROTECTION, KeywordHook::Targeting, RuleType::Targeting)
            .priority(30)
            .validator(|state, ctx| {
                let (Some(target), Some(source)) = (targeted(state, ctx), ctx.source) else {
                    return Ok(());
                };
                let protected = target
                    .card
                    .protection_from
                    .iter()
                    .any(|p| p.matches(source.card.card_type, &source.card.elements));
                if protected {
                    return Err(illegal(ctx, TargetingInvalidReason::HasProtection));
                }
                Ok(())
            }),
    )
}

fn hexproof() -> KeywordRules {
    KeywordRules::new(HEXPROOF, "Can't be targeted by opponents.").rule(
        keyword_rule(HEXPROOF, KeywordHook::Targeting, RuleType::Targeting)
            .priority(20)
            .validator(|state, ctx| {
                let Some(target) = targeted(state, ctx) else {
                    return Ok(());
                };
                if ctx.player != Some(target.controller()) {
                    return Err(illegal(ctx, TargetingInvalidReason::HasHexproof));
                }
                Ok(())
            }),
    )
}

fn shroud() -> KeywordRules {
    KeywordRules::new(SHROUD, "Can't be targeted.").rule(
        keyword_rule(SHROUD, KeywordHook::Targeting, RuleType::Targeting)
            .priority(10)
            .validator(|_, ctx| Err(illegal(ctx, TargetingInvalidReason::HasShroud))),
    )
}

fn flying() -> KeywordRules {
    KeywordRules::new(FLYING, "Can only be blocked by Familiars with Flying or Reach.").rule(
        keyword_rule(FLYING, KeywordHook::BlockRestriction, RuleType::Static).validator(
            |state, ctx| {
                let Some((attacker, blocker)) = block_pair(state, ctx) else {
                    return Ok(());
                };
                if attacker.has_keyword(FLYING)
                    && !blocker.has_keyword(FLYING)
                    && !blocker.has_keyword(REACH)
                {
                    return Err(cannot_block(attacker, blocker, "attacker has flying"));
                }
                Ok(())
            },
        ),
    )
}

fn reach() -> KeywordRules {
    KeywordRules::new(REACH, "Can block Familiars with Flying.")
}

fn unblockable() -> KeywordRules {
    KeywordRules::new(UNBLOCKABLE, "Can't be blocked.").rule(
        keyword_rule(UNBLOCKABLE, KeywordHook::BlockRestriction, RuleType::Static).validator(
            |state, ctx| match block_pair(state, ctx) {
                Some((attacker, blocker)) if attacker.has_keyword(UNBLOCKABLE) => {
                    Err(cannot_block(attacker, blocker, "attacker is unblockable"))
                }
                _ => Ok(()),
            },
        ),
    )
}

fn shadow() -> KeywordRules {
    KeywordRules::new(
        SHADOW,
        "Can only block or be blocked by Familiars with Shadow.",
    )
    .rule(
        keyword_rule(SHADOW, KeywordHook::BlockRestriction, RuleType::Static).validator(
            |state, ctx| match block_pair(state, ctx) {
                Some((attacker, blocker))
                    if attacker.has_keyword(SHADOW) != blocker.has_keyword(SHADOW) =>
                {
                    Err(cannot_block(attacker, blocker, "shadow mismatch"))
                }
                _ => Ok(()),
            },
        ),
    )
}

fn defender() -> KeywordRules {
    KeywordRules::new(DEFENDER, "Can't attack.").rule(
        keyword_rule(DEFENDER, KeywordHook::AttackRestriction, RuleType::Static).validator(
            |_, ctx| match ctx.source {
                Some(card) => Err(ActionError::CannotAttack {
                    card: card.instance_id,
                    reason: "defender".to_string(),
                }),
                None => Ok(()),
            },
        ),
    )
}

fn vigilance() -> KeywordRules {
    KeywordRules::new(VIGILANCE, "Attacking doesn't cause this Familiar to tap.").rule(
        keyword_rule(VIGILANCE, KeywordHook::OnAttack, RuleType::Triggered)
            .condition(|_, ctx| ctx.source.is_some())
            .apply(|state, ctx| {
                let Some(id) = ctx.source.map(|s| s.instance_id) else {
                    return Ok(RuleOutcome::Unchanged);
                };
                match state.instance_mut(id) {
                    Some(inst) if inst.tapped => {
                        inst.tapped = false;
                        Ok(RuleOutcome::Changed)
                    }
                    _ => Ok(RuleOutcome::Unchanged),
                }
            }),
    )
}

fn flanking() -> KeywordRules {
    KeywordRules::new(
        FLANKING,
        "Blockers without Flanking get -1/-1 until end of turn.",
    )
    .rule(
        keyword_rule(FLANKING, KeywordHook::OnBlocked, RuleType::Triggered)
            .condition(|state, ctx| match ctx.target {
                Some(TargetRef::Card(id)) => state
                    .instance(id)
                    .is_some_and(|blocker| !blocker.has_keyword(FLANKING)),
                _ => false,
            })
            .apply(|state, ctx| {
                let Some(TargetRef::Card(id)) = ctx.target else {
                    return Ok(RuleOutcome::Unchanged);
                };
                match state.instance_mut(id) {
                    Some(blocker) => {
                        blocker.add_temp_bonus(-1, -1);
                        Ok(RuleOutcome::Changed)
                    }
                    None => Ok(RuleOutcome::Unchanged),
                }
            }),
    )
}

fn hasty_and_sick(state: &GameState) -> Vec<crate::ids::InstanceId> {
    state
        .field_instances()
        .filter(|inst| inst.summoning_sickness && inst.has_keyword(HASTE))
        .map(|inst| inst.instance_id)
        .collect()
}

fn haste() -> KeywordRules {
    KeywordRules::new(HASTE, "Can attack and tap the turn it enters.").rule(
        keyword_rule(HASTE, KeywordHook::Static, RuleType::Static)
            .condition(|state, _| !hasty_and_sick(state).is_empty())
            .apply(|state, _| {
                let ids = hasty_and_sick(state);
                for id in &ids {
                    if let Some(inst) = state.instance_mut(*id) {
                        inst.summoning_sickness = false;
                    }
                }
                Ok(RuleOutcome::from_changed(!ids.is_empty()))
            }),
    )
}

fn indestructible() -> KeywordRules {
    KeywordRules::new(INDESTRUCTIBLE, "Destroy effects do nothing to this Familiar.").rule(
        RuleBuilder::new("keyword:indestructible:ignore_destroy")
            .rule_type(RuleType::Replacement)
            .binding(RuleBinding::Effect(EffectType::Destroy))
            .priority(100)
            .condition(|state, ctx| {
                targeted(state, ctx).is_some_and(|card| card.has_keyword(INDESTRUCTIBLE))
            })
            .apply(|_, ctx| {
                tracing::debug!(target = ?ctx.target, "indestructible ignores destroy");
                Ok(RuleOutcome::Unchanged)
            }),
    )
}

fn trample() -> KeywordRules {
    KeywordRules::new(
        TRAMPLE,
        "Combat damage beyond the blocker's toughness is dealt to the defending player.",
    )
}

fn deathtouched(state: &GameState) -> Vec<crate::ids::InstanceId> {
    state
        .field_instances()
        .filter(|inst| inst.counters.get(DEATHTOUCH_COUNTER).is_some_and(|n| *n > 0))
        .filter(|inst| !inst.has_keyword(INDESTRUCTIBLE))
        .map(|inst| inst.instance_id)
        .collect()
}

fn deathtouch() -> KeywordRules {
    KeywordRules::new(DEATHTOUCH, "Any damage this deals to a Familiar destroys it.").rule(
        RuleBuilder::new("keyword:deathtouch:sba")
            .rule_type(RuleType::StateBased)
            .priority(5)
            .condition(|state, _| !deathtouched(state).is_empty())
            .apply(|state, _| {
                let ids = deathtouched(state);
                for id in &ids {
                    state.move_instance(*id, Zone::Graveyard)?;
                }
                Ok(RuleOutcome::from_changed(!ids.is_empty()))
            }),
    )
}

/// Every built-in keyword.
pub fn builtin_keyword_rules() -> Vec<KeywordRules> {
    vec![
        flying(),
        reach(),
        vigilance(),
        haste(),
        defender(),
        hexproof(),
        shroud(),
        protection(),
        indestructible(),
        unblockable(),
        shadow(),
        flanking(),
        trample(),
        deathtouch(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardBuilder;
    use crate::config::EngineConfig;
    use crate::ids::PlayerIndex;
    use crate::rules::RuleBook;
    use crate::types::CardType;

    fn familiar(id: &str, keywords: &[&str]) -> crate::card::Card {
        let mut builder = CardBuilder::new(id, id, CardType::Familiar).power_toughness(2, 2);
        for kw in keywords {
            builder = builder.keyword(*kw);
        }
        builder.build()
    }

    fn block_allowed(state: &GameState, attacker: crate::ids::InstanceId, blocker: crate::ids::InstanceId) -> bool {
        let book = RuleBook::builtin();
        let config = EngineConfig::default();
        let attacking = state.instance(attacker).unwrap();
        let blocking = state.instance(blocker).unwrap();
        let ctx = RuleContext::new(&book, &config)
            .with_source(blocking)
            .with_target(TargetRef::Card(attacker));
        let mut rules = book.registry.keyword_rules_for(KeywordHook::BlockRestriction, attacking);
        rules.extend(book.registry.keyword_rules_for(KeywordHook::BlockRestriction, blocking));
        rules.iter().all(|rule| rule.condition(state, &ctx))
    }

    #[test]
    fn test_every_keyword_has_an_entry() {
        let keywords: Vec<String> = builtin_keyword_rules().into_iter().map(|k| k.keyword).collect();
        for kw in [
            FLYING, REACH, VIGILANCE, HASTE, DEFENDER, HEXPROOF, SHROUD, PROTECTION,
            INDESTRUCTIBLE, UNBLOCKABLE, SHADOW, FLANKING, TRAMPLE, DEATHTOUCH,
        ] {
            assert!(keywords.iter().any(|k| k == kw), "{kw}");
        }
    }

    #[test]
    fn test_flying_blocked_by_flying_or_reach_only() {
        let mut state = GameState::new("Alice", "Bob");
        let flyer = state.add_card(PlayerIndex::FIRST, Zone::Field, familiar("flyer", &[FLYING]));
        let ground = state.add_card(PlayerIndex::SECOND, Zone::Field, familiar("ground", &[]));
        let archer = state.add_card(PlayerIndex::SECOND, Zone::Field, familiar("archer", &[REACH]));
        let bird = state.add_card(PlayerIndex::SECOND, Zone::Field, familiar("bird", &[FLYING]));

        assert!(!block_allowed(&state, flyer, ground));
        assert!(block_allowed(&state, flyer, archer));
        assert!(block_allowed(&state, flyer, bird));
        // A flyer may block a ground attacker.
        let walker = state.add_card(PlayerIndex::FIRST, Zone::Field, familiar("walker", &[]));
        assert!(block_allowed(&state, walker, bird));
    }

    #[test]
    fn test_shadow_only_blocks_shadow() {
        let mut state = GameState::new("Alice", "Bob");
        let shade = state.add_card(PlayerIndex::FIRST, Zone::Field, familiar("shade", &[SHADOW]));
        let other_shade = state.add_card(PlayerIndex::SECOND, Zone::Field, familiar("shade2", &[SHADOW]));
        let plain = state.add_card(PlayerIndex::SECOND, Zone::Field, familiar("plain", &[]));
        let plain_attacker = state.add_card(PlayerIndex::FIRST, Zone::Field, familiar("plain2", &[]));

        assert!(block_allowed(&state, shade, other_shade));
        assert!(!block_allowed(&state, shade, plain));
        assert!(!block_allowed(&state, plain_attacker, other_shade));
    }

    #[test]
    fn test_unblockable() {
        let mut state = GameState::new("Alice", "Bob");
        let sneak = state.add_card(PlayerIndex::FIRST, Zone::Field, familiar("sneak", &[UNBLOCKABLE]));
        let wall = state.add_card(PlayerIndex::SECOND, Zone::Field, familiar("wall", &[REACH]));
        assert!(!block_allowed(&state, sneak, wall));
    }

    #[test]
    fn test_haste_clears_summoning_sickness() {
        let book = RuleBook::builtin();
        let config = EngineConfig::default();
        let mut state = GameState::new("Alice", "Bob");
        let id = state.add_card(PlayerIndex::FIRST, Zone::Field, familiar("runner", &[HASTE]));
        let rule = book.registry.get("keyword:haste:static").unwrap();
        let ctx = RuleContext::new(&book, &config);
        assert!(rule.condition(&state, &ctx));
        assert_eq!(rule.apply(&mut state, &ctx), Ok(RuleOutcome::Changed));
        assert!(!state.instance(id).unwrap().summoning_sickness);
        assert!(!rule.condition(&state, &ctx));
    }

    #[test]
    fn test_deathtouch_sba_spares_indestructible() {
        let book = RuleBook::builtin();
        let config = EngineConfig::default();
        let mut state = GameState::new("Alice", "Bob");
        let victim = state.add_card(PlayerIndex::SECOND, Zone::Field, familiar("victim", &[]));
        let tough = state.add_card(PlayerIndex::SECOND, Zone::Field, familiar("tough", &[INDESTRUCTIBLE]));
        for id in [victim, tough] {
            state.instance_mut(id).unwrap().add_counters(DEATHTOUCH_COUNTER, 1);
        }
        let rule = book.registry.get("keyword:deathtouch:sba").unwrap();
        let ctx = RuleContext::new(&book, &config);
        assert_eq!(rule.apply(&mut state, &ctx), Ok(RuleOutcome::Changed));
        assert!(!state.is_on_field(victim));
        assert!(state.is_on_field(tough));
        assert!(!rule.condition(&state, &ctx));
    }
}
