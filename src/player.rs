use crate::card::CardInstance;
use crate::ids::InstanceId;
use crate::zone::Zone;

/// Complete player state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Player {
    pub name: String,

    // Zones. The deck draws from its end.
    pub deck: Vec<CardInstance>,
    pub hand: Vec<CardInstance>,
    pub field: Vec<CardInstance>,
    pub azoth_row: Vec<CardInstance>,
    pub life_cards: Vec<CardInstance>,
    pub graveyard: Vec<CardInstance>,
    pub removed_zone: Vec<CardInstance>,
    pub flag_card: Option<CardInstance>,

    // Resources
    pub azoth_available: u32,
    pub azoth_used_this_turn: u32,

    // Per-turn tracking
    pub azoth_placed_this_turn: bool,
    pub cards_drawn: u32,

    /// Set when a draw was attempted with an empty deck. Checked by state-based actions.
    pub drew_from_empty_deck: bool,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Instances in a zone, in zone order.
    pub fn zone(&self, zone: Zone) -> &[CardInstance] {
        match zone {
            Zone::Deck => &self.deck,
            Zone::Hand => &self.hand,
            Zone::Field => &self.field,
            Zone::AzothRow => &self.azoth_row,
            Zone::LifeCards => &self.life_cards,
            Zone::Graveyard => &self.graveyard,
            Zone::Removed => &self.removed_zone,
            Zone::Flag => self.flag_card.as_slice(),
        }
    }

    fn zone_vec_mut(&mut self, zone: Zone) -> Option<&mut Vec<CardInstance>> {
        match zone {
            Zone::Deck => Some(&mut self.deck),
            Zone::Hand => Some(&mut self.hand),
            Zone::Field => Some(&mut self.field),
            Zone::AzothRow => Some(&mut self.azoth_row),
            Zone::LifeCards => Some(&mut self.life_cards),
            Zone::Graveyard => Some(&mut self.graveyard),
            Zone::Removed => Some(&mut self.removed_zone),
            Zone::Flag => None,
        }
    }

    /// Every instance this player holds, with its zone.
    pub fn instances(&self) -> impl Iterator<Item = (Zone, &CardInstance)> + '_ {
        const ZONES: [Zone; 8] = [
            Zone::Deck,
            Zone::Hand,
            Zone::Field,
            Zone::AzothRow,
            Zone::LifeCards,
            Zone::Graveyard,
            Zone::Removed,
            Zone::Flag,
        ];
        ZONES
            .into_iter()
            .flat_map(move |zone| self.zone(zone).iter().map(move |inst| (zone, inst)))
    }

    pub fn find(&self, id: InstanceId) -> Option<(Zone, &CardInstance)> {
        self.instances().find(|(_, inst)| inst.instance_id == id)
    }

    pub fn find_mut(&mut self, id: InstanceId) -> Option<&mut CardInstance> {
        if let Some(flag) = self.flag_card.as_mut().filter(|f| f.instance_id == id) {
            return Some(flag);
        }
        [
            &mut self.deck,
            &mut self.hand,
            &mut self.field,
            &mut self.azoth_row,
            &mut self.life_cards,
            &mut self.graveyard,
            &mut self.removed_zone,
        ]
        .into_iter()
        .flat_map(|zone| zone.iter_mut())
        .find(|inst| inst.instance_id == id)
    }

    /// Removes an instance from whichever zone holds it.
    pub fn take(&mut self, id: InstanceId) -> Option<(Zone, CardInstance)> {
        let (zone, _) = self.find(id)?;
        if zone == Zone::Flag {
            return self.flag_card.take().map(|inst| (zone, inst));
        }
        let cards = self.zone_vec_mut(zone)?;
        let pos = cards.iter().position(|inst| inst.instance_id == id)?;
        Some((zone, cards.remove(pos)))
    }

    /// Puts an instance into a zone. Returns the flag it displaced, if any.
    pub fn put(&mut self, zone: Zone, instance: CardInstance) -> Option<CardInstance> {
        match self.zone_vec_mut(zone) {
            Some(cards) => {
                cards.push(instance);
                None
            }
            None => self.flag_card.replace(instance),
        }
    }

    /// Draws the top card of the deck. Records an empty-deck draw instead of failing.
    pub fn draw(&mut self) -> Option<InstanceId> {
        match self.deck.pop() {
            Some(card) => {
                let id = card.instance_id;
                self.hand.push(card);
                self.cards_drawn += 1;
                Some(id)
            }
            None => {
                self.drew_from_empty_deck = true;
                None
            }
        }
    }

    /// Moves one life card to the graveyard.
    pub fn lose_life_card(&mut self) -> Option<InstanceId> {
        let card = self.life_cards.pop()?;
        let id = card.instance_id;
        self.graveyard.push(card);
        Some(id)
    }

    /// Moves the most recent graveyard card back to the life cards.
    pub fn restore_life_card(&mut self) -> Option<InstanceId> {
        let mut card = self.graveyard.pop()?;
        card.reset_transient();
        let id = card.instance_id;
        self.life_cards.push(card);
        Some(id)
    }

    /// Azoth produced by untapped azoth-row cards.
    pub fn azoth_production(&self) -> u32 {
        self.azoth_row
            .iter()
            .filter(|inst| !inst.tapped)
            .map(|inst| inst.card.azoth_value)
            .sum()
    }

    /// Pays `amount` azoth. Returns false without paying if short.
    pub fn spend_azoth(&mut self, amount: u32) -> bool {
        if self.azoth_available < amount {
            return false;
        }
        self.azoth_available -= amount;
        self.azoth_used_this_turn += amount;
        true
    }

    /// Called at the beginning of this player's turn.
    pub fn begin_turn(&mut self) {
        self.azoth_available = self.azoth_production();
        self.azoth_used_this_turn = 0;
        self.azoth_placed_this_turn = false;
    }

    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }
}
