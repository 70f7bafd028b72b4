//! Party
//!
//! An ordered group of agents of one faction. List order is the turn order
//! within the party. Every mutation that can kill goes through the party so it
//! can announce its own defeat the moment its last member dies.

use bevy::log::info;

use crate::config::AgentConfig;

use super::actions::StatKind;
use super::agent::{Agent, AgentId};
use super::events::BattleEvent;
use super::faction::Faction;
use super::rng::BattleRng;

#[derive(Debug, Clone)]
pub struct Party {
    name: String,
    faction: Faction,
    agents: Vec<Agent>,
    /// Set once `PartyDefeated` has been raised
    defeat_announced: bool,
}

impl Party {
    pub fn new(faction: Faction) -> Self {
        Self {
            name: faction.party_name().to_string(),
            faction,
            agents: Vec::new(),
            defeat_announced: false,
        }
    }

    /// Replace all members with freshly initialised agents, one per config.
    pub fn initialize(&mut self, configs: &[AgentConfig]) {
        self.agents = configs
            .iter()
            .enumerate()
            .map(|(index, config)| {
                let mut agent = Agent::from_config(AgentId::new(self.faction, index), config);
                agent.initialize();
                agent
            })
            .collect();
        self.defeat_announced = false;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_alive()).count()
    }

    pub fn has_alive_agents(&self) -> bool {
        self.agents.iter().any(Agent::is_alive)
    }

    /// Whether the party-defeat notification has fired
    pub fn is_defeated(&self) -> bool {
        self.defeat_announced
    }

    // ------------------------------------------------------------------------
    // Target queries
    // ------------------------------------------------------------------------

    /// Uniform pick among living members
    pub fn random_alive_agent(&self, rng: &mut BattleRng) -> Option<AgentId> {
        let alive: Vec<AgentId> = self
            .agents
            .iter()
            .filter(|a| a.is_alive())
            .map(Agent::id)
            .collect();
        rng.choose(&alive).copied()
    }

    /// Uniform pick among living members other than `excluded`
    pub fn random_alive_agent_excluding(
        &self,
        excluded: AgentId,
        rng: &mut BattleRng,
    ) -> Option<AgentId> {
        let candidates: Vec<AgentId> = self
            .agents
            .iter()
            .filter(|a| a.is_alive() && a.id() != excluded)
            .map(Agent::id)
            .collect();
        rng.choose(&candidates).copied()
    }

    /// Living member with the lowest health fraction; ties go to the first in
    /// list order.
    pub fn lowest_health_agent(&self) -> Option<AgentId> {
        let mut lowest: Option<&Agent> = None;
        for agent in self.agents.iter().filter(|a| a.is_alive()) {
            match lowest {
                Some(current) if agent.health_fraction() >= current.health_fraction() => {}
                _ => lowest = Some(agent),
            }
        }
        lowest.map(Agent::id)
    }

    /// Most injured living member other than `excluded` that is below full
    /// health.
    pub fn most_injured_excluding(&self, excluded: AgentId) -> Option<AgentId> {
        let mut lowest: Option<&Agent> = None;
        for agent in self
            .agents
            .iter()
            .filter(|a| a.is_alive() && a.id() != excluded && a.is_injured())
        {
            match lowest {
                Some(current) if agent.health_fraction() >= current.health_fraction() => {}
                _ => lowest = Some(agent),
            }
        }
        lowest.map(Agent::id)
    }

    /// Whether any member, living or dead, is below `fraction` of max health.
    /// A fallen member counts as zero health.
    pub fn any_below_fraction(&self, fraction: f32) -> bool {
        self.agents.iter().any(|a| a.health_fraction() < fraction)
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Advance one member by `dt`. Returns whether it is ready to act.
    pub(crate) fn update_agent(
        &mut self,
        index: usize,
        dt: f32,
        events: &mut Vec<BattleEvent>,
    ) -> bool {
        let Some(agent) = self.agents.get_mut(index) else {
            return false;
        };
        let was_alive = agent.is_alive();
        let ready = agent.update(dt, events);
        let died = was_alive && !agent.is_alive();
        if died {
            self.handle_agent_death(events);
        }
        ready
    }

    pub(crate) fn reset_action_timer(&mut self, index: usize) {
        if let Some(agent) = self.agents.get_mut(index) {
            agent.reset_action_timer();
        }
    }

    /// Damage a member. Returns the damage dealt after mitigation.
    pub fn damage_agent(
        &mut self,
        index: usize,
        amount: f32,
        source: Option<AgentId>,
        events: &mut Vec<BattleEvent>,
    ) -> f32 {
        let Some(agent) = self.agents.get_mut(index) else {
            return 0.0;
        };
        let was_alive = agent.is_alive();
        let dealt = agent.take_damage(amount, source, events);
        let died = was_alive && !agent.is_alive();
        if died {
            self.handle_agent_death(events);
        }
        dealt
    }

    /// Heal a member. Returns the health restored.
    pub fn heal_agent(&mut self, index: usize, amount: f32, events: &mut Vec<BattleEvent>) -> f32 {
        match self.agents.get_mut(index) {
            Some(agent) => agent.heal(amount, events),
            None => 0.0,
        }
    }

    pub fn buff_agent(
        &mut self,
        index: usize,
        stat: StatKind,
        amount: f32,
        duration: f32,
        events: &mut Vec<BattleEvent>,
    ) {
        if let Some(agent) = self.agents.get_mut(index) {
            agent.apply_buff(stat, amount, duration, events);
        }
    }

    pub fn debuff_agent(
        &mut self,
        index: usize,
        stat: StatKind,
        amount: f32,
        duration: f32,
        events: &mut Vec<BattleEvent>,
    ) {
        if let Some(agent) = self.agents.get_mut(index) {
            agent.apply_debuff(stat, amount, duration, events);
        }
    }

    pub fn apply_damage_over_time(
        &mut self,
        index: usize,
        per_tick: f32,
        tick_interval: f32,
        duration: f32,
    ) {
        if let Some(agent) = self.agents.get_mut(index) {
            agent.apply_damage_over_time(per_tick, tick_interval, duration);
        }
    }

    pub fn apply_heal_over_time(
        &mut self,
        index: usize,
        per_tick: f32,
        tick_interval: f32,
        duration: f32,
    ) {
        if let Some(agent) = self.agents.get_mut(index) {
            agent.apply_heal_over_time(per_tick, tick_interval, duration);
        }
    }

    /// Runs after every member death. Announces the defeat once, when the
    /// death left no living members.
    fn handle_agent_death(&mut self, events: &mut Vec<BattleEvent>) {
        if self.defeat_announced || self.has_alive_agents() {
            return;
        }
        self.defeat_announced = true;
        info!("{} has been defeated", self.name);
        events.push(BattleEvent::PartyDefeated {
            faction: self.faction,
        });
    }
}
