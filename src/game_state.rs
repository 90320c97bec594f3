//! The complete state of one game.
//!
//! Every zone operation lives here so that the one-zone-per-instance
//! invariant is maintained in a single place.

use std::collections::BTreeMap;

use crate::action::Action;
use crate::card::{Card, CardInstance};
use crate::effect::{EffectDescriptor, TargetRef};
use crate::ids::{InstanceId, PlayerIndex, StackItemId};
use crate::player::Player;
use crate::zone::Zone;

/// Game phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Phase {
    Start,
    Main,
    Combat,
    PostCombat,
    End,
}

impl Phase {
    /// The phase that follows this one. `End` wraps to `Start` of the next turn.
    pub fn next(self) -> Phase {
        match self {
            Phase::Start => Phase::Main,
            Phase::Main => Phase::Combat,
            Phase::Combat => Phase::PostCombat,
            Phase::PostCombat => Phase::End,
            Phase::End => Phase::Start,
        }
    }

    /// Main phases allow sorcery-speed plays.
    pub fn is_main(self) -> bool {
        matches!(self, Phase::Main | Phase::PostCombat)
    }
}

/// How a stack item got onto the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum StackItemKind {
    /// A played Spell or Burst card. The item owns the card while it waits.
    Spell,
    Triggered,
    Activated,
}

/// A pending effect awaiting resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct StackItem {
    pub id: StackItemId,
    pub kind: StackItemKind,
    /// The source card. For abilities this is a snapshot; the card itself stays where it is.
    pub source: CardInstance,
    pub effect: EffectDescriptor,
    pub controller: PlayerIndex,
    pub targets: Vec<TargetRef>,
    pub timestamp: u64,
}

impl StackItem {
    pub fn is_spell(&self) -> bool {
        self.kind == StackItemKind::Spell
    }
}

/// A blocker assigned to an attacker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BlockAssignment {
    pub attacker: InstanceId,
    pub blocker: InstanceId,
}

/// One entry of the append-only action log.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct TurnAction {
    pub turn: u32,
    pub phase: Phase,
    pub action: Action,
    pub timestamp: u64,
}

/// Errors raised by zone operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("card instance {0} not found")]
    InstanceNotFound(InstanceId),
    #[error("card instance {0} appears in more than one zone")]
    DuplicateInstance(InstanceId),
    #[error("card instance {0} is in no zone")]
    OrphanedInstance(InstanceId),
}

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct GameState {
    pub players: [Player; 2],
    pub active_player: PlayerIndex,
    pub turn: u32,
    pub phase: Phase,
    /// LIFO: the last item is the top.
    pub stack: Vec<StackItem>,
    pub attackers: Vec<InstanceId>,
    pub blockers: Vec<BlockAssignment>,
    pub winner: Option<PlayerIndex>,
    pub turn_history: Vec<TurnAction>,
    /// Logical clock for stack and history timestamps.
    pub clock: u64,
    next_instance_id: u64,
    next_stack_id: u64,
}

impl GameState {
    /// A fresh game: Start phase of turn 1, player 0 active, all zones empty.
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            players: [Player::new(first), Player::new(second)],
            active_player: PlayerIndex::FIRST,
            turn: 1,
            phase: Phase::Start,
            stack: Vec::new(),
            attackers: Vec::new(),
            blockers: Vec::new(),
            winner: None,
            turn_history: Vec::new(),
            clock: 0,
            next_instance_id: 1,
            next_stack_id: 1,
        }
    }

    pub fn player(&self, index: PlayerIndex) -> &Player {
        &self.players[index.index()]
    }

    pub fn player_mut(&mut self, index: PlayerIndex) -> &mut Player {
        &mut self.players[index.index()]
    }

    pub fn active(&self) -> &Player {
        self.player(self.active_player)
    }

    /// Derived from `winner`, so the two can never disagree.
    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Ends the game. The first declared winner stands.
    pub fn declare_winner(&mut self, winner: PlayerIndex) -> bool {
        if self.winner.is_some() {
            return false;
        }
        tracing::info!(%winner, turn = self.turn, "game over");
        self.winner = Some(winner);
        true
    }

    /// Advances and returns the logical clock.
    pub fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Allocates a new instance of `card` without placing it anywhere.
    pub fn instantiate(&mut self, owner: PlayerIndex, card: Card) -> CardInstance {
        let id = InstanceId(self.next_instance_id);
        self.next_instance_id += 1;
        CardInstance::new(id, owner, card)
    }

    /// Creates an instance of `card` in `zone` of its owner.
    pub fn add_card(&mut self, owner: PlayerIndex, zone: Zone, card: Card) -> InstanceId {
        let instance = self.instantiate(owner, card);
        let id = instance.instance_id;
        if let Some(displaced) = self.player_mut(owner).put(zone, instance) {
            self.player_mut(owner).put(Zone::Graveyard, displaced);
        }
        id
    }

    pub fn find_instance(&self, id: InstanceId) -> Option<(Zone, &CardInstance)> {
        self.players.iter().find_map(|p| p.find(id))
    }

    pub fn instance(&self, id: InstanceId) -> Option<&CardInstance> {
        self.find_instance(id).map(|(_, inst)| inst)
    }

    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut CardInstance> {
        let [first, second] = &mut self.players;
        match first.find_mut(id) {
            Some(inst) => Some(inst),
            None => second.find_mut(id),
        }
    }

    /// Returns true if the instance is on a field.
    pub fn is_on_field(&self, id: InstanceId) -> bool {
        matches!(self.find_instance(id), Some((Zone::Field, _)))
    }

    /// Moves an instance to `to` of its owner. Leaving play resets its transient state.
    /// A flag displaced from the flag slot goes to the graveyard.
    pub fn move_instance(&mut self, id: InstanceId, to: Zone) -> Result<Zone, StateError> {
        let owner = self
            .instance(id)
            .map(|inst| inst.owner)
            .ok_or(StateError::InstanceNotFound(id))?;
        let (from, mut instance) = self
            .player_mut(owner)
            .take(id)
            .ok_or(StateError::InstanceNotFound(id))?;
        if from.is_in_play() && !to.is_in_play() {
            instance.reset_transient();
        }
        if from == Zone::Field {
            self.attackers.retain(|a| *a != id);
            self.blockers
                .retain(|b| b.attacker != id && b.blocker != id);
        }
        if let Some(mut displaced) = self.player_mut(owner).put(to, instance) {
            displaced.reset_transient();
            self.player_mut(owner).put(Zone::Graveyard, displaced);
        }
        tracing::debug!(instance = %id, ?from, ?to, "moved card");
        Ok(from)
    }

    /// Places an instance that is in no zone, e.g. a resolved spell leaving the stack.
    pub fn put_instance(&mut self, mut instance: CardInstance, to: Zone) {
        if !to.is_in_play() {
            instance.reset_transient();
        }
        let owner = instance.owner;
        if let Some(mut displaced) = self.player_mut(owner).put(to, instance) {
            displaced.reset_transient();
            self.player_mut(owner).put(Zone::Graveyard, displaced);
        }
    }

    /// Removes an instance from its zone. The caller becomes responsible for it.
    pub fn take_instance(&mut self, id: InstanceId) -> Result<(Zone, CardInstance), StateError> {
        let owner = self
            .instance(id)
            .map(|inst| inst.owner)
            .ok_or(StateError::InstanceNotFound(id))?;
        self.player_mut(owner)
            .take(id)
            .ok_or(StateError::InstanceNotFound(id))
    }

    pub fn draw_card(&mut self, player: PlayerIndex) -> Option<InstanceId> {
        let drawn = self.player_mut(player).draw();
        match drawn {
            Some(id) => tracing::debug!(%player, instance = %id, "drew card"),
            None => tracing::debug!(%player, "drew from empty deck"),
        }
        drawn
    }

    /// Damage to a player removes one life card per point. Returns life cards lost.
    pub fn damage_player(&mut self, player: PlayerIndex, amount: u32) -> u32 {
        let mut lost = 0;
        for _ in 0..amount {
            if self.player_mut(player).lose_life_card().is_none() {
                break;
            }
            lost += 1;
        }
        lost
    }

    /// Pushes a new item on top of the stack.
    pub fn push_stack(
        &mut self,
        kind: StackItemKind,
        source: CardInstance,
        effect: EffectDescriptor,
        controller: PlayerIndex,
        targets: Vec<TargetRef>,
    ) -> StackItemId {
        let id = StackItemId(self.next_stack_id);
        self.next_stack_id += 1;
        let timestamp = self.tick();
        self.stack.push(StackItem {
            id,
            kind,
            source,
            effect,
            controller,
            targets,
            timestamp,
        });
        id
    }

    pub fn stack_item(&self, id: StackItemId) -> Option<&StackItem> {
        self.stack.iter().find(|item| item.id == id)
    }

    pub fn record_action(&mut self, action: Action) {
        let timestamp = self.tick();
        self.turn_history.push(TurnAction {
            turn: self.turn,
            phase: self.phase,
            action,
            timestamp,
        });
    }

    /// Field instances of both players, active player first.
    pub fn field_instances(&self) -> impl Iterator<Item = &CardInstance> + '_ {
        let active = self.active_player;
        [active, active.opponent()]
            .into_iter()
            .flat_map(move |p| self.player(p).field.iter())
    }

    /// Instances whose triggered effects are live: fields and flags, active player first.
    pub fn triggerable_instances(&self) -> Vec<&CardInstance> {
        let active = self.active_player;
        [active, active.opponent()]
            .into_iter()
            .flat_map(|p| {
                let player = self.player(p);
                player.field.iter().chain(player.flag_card.iter())
            })
            .collect()
    }

    /// Number of zones each instance appears in. Spells on the stack count as one zone.
    pub fn zone_census(&self) -> BTreeMap<InstanceId, usize> {
        let mut census = BTreeMap::new();
        for player in &self.players {
            for (_, inst) in player.instances() {
                *census.entry(inst.instance_id).or_insert(0) += 1;
            }
        }
        for item in self.stack.iter().filter(|item| item.is_spell()) {
            *census.entry(item.source.instance_id).or_insert(0) += 1;
        }
        census
    }

    /// Checks that every allocated instance lives in exactly one zone.
    pub fn check_zone_exclusivity(&self) -> Result<(), StateError> {
        let census = self.zone_census();
        if let Some((id, _)) = census.iter().find(|(_, count)| **count > 1) {
            return Err(StateError::DuplicateInstance(*id));
        }
        for raw in 1..self.next_instance_id {
            let id = InstanceId(raw);
            if !census.contains_key(&id) {
                return Err(StateError::OrphanedInstance(id));
            }
        }
        Ok(())
    }
}
