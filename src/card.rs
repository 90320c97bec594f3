use std::collections::BTreeMap;

use crate::effect::{EffectDescriptor, EffectTiming};
use crate::ids::{CardId, InstanceId, PlayerIndex};
use crate::types::{CardType, Element, ProtectionFrom};

/// Static, immutable card template.
/// This represents the printed characteristics of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub card_type: CardType,
    pub elements: Vec<Element>,
    pub cost: u32,
    pub power: Option<i32>,
    pub toughness: Option<i32>,
    pub loyalty: Option<u32>,
    pub effects: Vec<EffectDescriptor>,
    pub keywords: Vec<String>,
    pub protection_from: Vec<ProtectionFrom>,
    /// Azoth produced while this card sits untapped in the azoth row.
    pub azoth_value: u32,
}

impl Card {
    /// Returns true if the printed keyword list contains `keyword` (case-insensitive).
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword))
    }

    pub fn is_familiar(&self) -> bool {
        self.card_type == CardType::Familiar
    }

    /// Effects with the given timing, in printed order.
    pub fn effects_with_timing(
        &self,
        timing: EffectTiming,
    ) -> impl Iterator<Item = &EffectDescriptor> + '_ {
        self.effects.iter().filter(move |e| e.timing == timing)
    }
}

/// Builder for constructing Card templates.
#[derive(Debug, Clone)]
pub struct CardBuilder {
    card: Card,
}

impl CardBuilder {
    pub fn new(id: impl Into<String>, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            card: Card {
                id: CardId::new(id),
                name: name.into(),
                card_type,
                elements: Vec::new(),
                cost: 0,
                power: None,
                toughness: None,
                loyalty: None,
                effects: Vec::new(),
                keywords: Vec::new(),
                protection_from: Vec::new(),
                azoth_value: 1,
            },
        }
    }

    pub fn cost(mut self, cost: u32) -> Self {
        self.card.cost = cost;
        self
    }

    pub fn elements(mut self, elements: Vec<Element>) -> Self {
        self.card.elements = elements;
        self
    }

    pub fn power_toughness(mut self, power: i32, toughness: i32) -> Self {
        self.card.power = Some(power);
        self.card.toughness = Some(toughness);
        self
    }

    pub fn loyalty(mut self, loyalty: u32) -> Self {
        self.card.loyalty = Some(loyalty);
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.card.keywords.push(keyword.into());
        self
    }

    pub fn effect(mut self, effect: EffectDescriptor) -> Self {
        self.card.effects.push(effect);
        self
    }

    pub fn protection_from(mut self, quality: ProtectionFrom) -> Self {
        self.card.protection_from.push(quality);
        self
    }

    pub fn azoth_value(mut self, value: u32) -> Self {
        self.card.azoth_value = value;
        self
    }

    pub fn build(self) -> Card {
        self.card
    }
}

/// A card template in a game, with its transient state.
///
/// Controller is always the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct CardInstance {
    pub instance_id: InstanceId,
    pub owner: PlayerIndex,
    pub card: Card,
    pub tapped: bool,
    pub summoning_sickness: bool,
    /// Current power, including bonuses.
    pub power: i32,
    /// Current toughness, including bonuses and minus damage.
    pub toughness: i32,
    pub counters: BTreeMap<String, u32>,
    /// A frozen card does not untap during its controller's next Start phase.
    pub frozen: bool,
    /// Bonus currently granted by static rules, recomputed every pass.
    pub static_power: i32,
    pub static_toughness: i32,
    /// Until-end-of-turn bonus.
    pub temp_power: i32,
    pub temp_toughness: i32,
    /// Keywords granted by static rules.
    pub granted_keywords: Vec<String>,
}

impl CardInstance {
    pub fn new(instance_id: InstanceId, owner: PlayerIndex, card: Card) -> Self {
        let power = card.power.unwrap_or(0);
        let toughness = card.toughness.unwrap_or(0);
        Self {
            instance_id,
            owner,
            card,
            tapped: false,
            summoning_sickness: true,
            power,
            toughness,
            counters: BTreeMap::new(),
            frozen: false,
            static_power: 0,
            static_toughness: 0,
            temp_power: 0,
            temp_toughness: 0,
            granted_keywords: Vec::new(),
        }
    }

    pub fn controller(&self) -> PlayerIndex {
        self.owner
    }

    pub fn card_id(&self) -> &CardId {
        &self.card.id
    }

    /// Printed or granted keyword.
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.card.has_keyword(keyword)
            || self
                .granted_keywords
                .iter()
                .any(|k| k.eq_ignore_ascii_case(keyword))
    }

    /// Toughness with no damage marked.
    pub fn max_toughness(&self) -> i32 {
        self.card.toughness.unwrap_or(0) + self.static_toughness + self.temp_toughness
    }

    /// Marks damage by lowering current toughness.
    pub fn take_damage(&mut self, amount: u32) {
        self.toughness -= amount as i32;
    }

    pub fn heal(&mut self) -> bool {
        let max = self.max_toughness();
        if self.toughness < max {
            self.toughness = max;
            true
        } else {
            false
        }
    }

    /// Sets the static bonus, adjusting current stats by the delta.
    /// Returns true if anything changed.
    pub fn set_static_bonus(&mut self, power: i32, toughness: i32) -> bool {
        let dp = power - self.static_power;
        let dt = toughness - self.static_toughness;
        if dp == 0 && dt == 0 {
            return false;
        }
        self.power += dp;
        self.toughness += dt;
        self.static_power = power;
        self.static_toughness = toughness;
        true
    }

    pub fn add_temp_bonus(&mut self, power: i32, toughness: i32) {
        self.power += power;
        self.toughness += toughness;
        self.temp_power += power;
        self.temp_toughness += toughness;
    }

    /// Removes the until-end-of-turn bonus. Returns true if there was one.
    pub fn expire_temp_bonus(&mut self) -> bool {
        if self.temp_power == 0 && self.temp_toughness == 0 {
            return false;
        }
        self.power -= self.temp_power;
        self.toughness -= self.temp_toughness;
        self.temp_power = 0;
        self.temp_toughness = 0;
        true
    }

    /// Grants a keyword. Returns true if it was not already granted.
    pub fn grant_keyword(&mut self, keyword: &str) -> bool {
        if self
            .granted_keywords
            .iter()
            .any(|k| k.eq_ignore_ascii_case(keyword))
        {
            return false;
        }
        self.granted_keywords.push(keyword.to_string());
        true
    }

    pub fn add_counters(&mut self, name: &str, amount: u32) {
        *self.counters.entry(name.to_string()).or_insert(0) += amount;
    }

    /// Resets everything that only exists while the card is in play.
    pub fn reset_transient(&mut self) {
        self.tapped = false;
        self.summoning_sickness = true;
        self.power = self.card.power.unwrap_or(0);
        self.toughness = self.card.toughness.unwrap_or(0);
        self.counters.clear();
        self.frozen = false;
        self.static_power = 0;
        self.static_toughness = 0;
        self.temp_power = 0;
        self.temp_toughness = 0;
        self.granted_keywords.clear();
    }
}
