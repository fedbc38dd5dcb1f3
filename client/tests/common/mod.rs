//! Shared fixtures: a small deterministic engine and two ready-made teams.

#![allow(dead_code)]

use std::collections::BTreeMap;

use versus_battle::{
    Action, BattlePokemon, BattleState, BattleTeam, Phase, ResolutionEngine, Resolved, Species,
    TurnActions,
};
use versus_client::{BattleSync, MemoryStore};

pub const HOST: &str = "alice";
pub const GUEST: &str = "bob";
pub const ROOM: &str = "room-1";
pub const BATTLE: &str = "battle-1";
pub const SEED: u64 = 42;

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

fn mon(name: &str, max_hp: u32, moves: &[(&str, u8)]) -> BattlePokemon {
    let species = Species::new(name).with_abilities([format!("{name}-ability")]);
    moves
        .iter()
        .fold(BattlePokemon::new(species, 50, max_hp), |p, (id, pp)| {
            p.with_move(*id, *pp)
        })
}

pub fn host_team() -> BattleTeam {
    BattleTeam::new(vec![
        mon("pikachu", 95, &[("thunderbolt", 15), ("quick-attack", 30)]),
        mon("snorlax", 220, &[("body-slam", 15)]),
    ])
}

pub fn guest_team() -> BattleTeam {
    BattleTeam::new(vec![
        mon("bulbasaur", 105, &[("tackle", 35)]),
        mon("tauros", 150, &[("earthquake", 10)]),
    ])
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Fixed-damage engine: switches first, then moves in host-first order
#[derive(Debug, Clone)]
pub struct DuelEngine {
    damage: BTreeMap<String, u32>,
    default_damage: u32,
}

impl DuelEngine {
    pub fn new() -> Self {
        Self {
            damage: BTreeMap::new(),
            default_damage: 20,
        }
    }

    pub fn with_damage(mut self, move_id: &str, damage: u32) -> Self {
        self.damage.insert(move_id.to_string(), damage);
        self
    }

    fn damage_of(&self, move_id: &str) -> u32 {
        self.damage.get(move_id).copied().unwrap_or(self.default_damage)
    }
}

fn next_seed(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

impl ResolutionEngine for DuelEngine {
    fn resolve(
        &self,
        mut state: BattleState,
        actions: &TurnActions,
        seed: u64,
    ) -> Resolved {
        let mut log = Vec::new();
        let queue = actions.queue();

        for queued in &queue {
            if let Action::Switch { index } = queued.action {
                let team = state.team_mut(queued.side);
                if team.switch_to(index) {
                    let name = team.active().map(|p| p.name().to_string()).unwrap_or_default();
                    log.push(format!("{} sent out {name}", queued.side));
                }
            }
        }

        if state.phase == Phase::Choice {
            for queued in &queue {
                let Action::Move { move_id, .. } = &queued.action else {
                    continue;
                };
                let attacker_side = queued.side;
                let Some(attacker) = state.team_mut(attacker_side).active_mut() else {
                    continue;
                };
                if attacker.is_fainted() {
                    continue;
                }
                attacker.use_move(move_id);
                let attacker_name = attacker.name().to_string();
                log.push(format!("{attacker_name} used {move_id}"));

                let defender_team = state.team_mut(attacker_side.other());
                if let Some(defender) = defender_team.active_mut() {
                    defender.apply_damage(self.damage_of(move_id));
                    if defender.is_fainted() {
                        log.push(format!("{} fainted", defender.name()));
                    }
                }
                defender_team.recount_fainted();
            }
        }

        state.rng = next_seed(seed);
        if let Some(winner) = state.decided_winner() {
            log.push(format!("{winner} won"));
            state.finish(Some(winner));
        } else {
            state.phase = if state.sides_needing_replacement().is_empty() {
                Phase::Choice
            } else {
                Phase::Replacement
            };
            state.turn += 1;
        }

        Resolved { state, log }
    }
}

/// Engine that must never be called
pub fn unreachable_engine(
    _: BattleState,
    _: &TurnActions,
    _: u64,
) -> Resolved {
    panic!("engine should not run")
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// Host and guest clients sharing `store`, with a started battle
pub async fn started_battle(
    store: &MemoryStore,
) -> (BattleSync<MemoryStore>, BattleSync<MemoryStore>) {
    let host = BattleSync::new(store.clone()).with_user(HOST);
    let guest = BattleSync::new(store.clone()).with_user(GUEST);

    host.create_room(ROOM).await.expect("create room");
    guest.join_room(ROOM).await.expect("join room");
    host.start_battle(ROOM, BATTLE, &host_team(), &guest_team(), SEED)
        .await
        .expect("start battle");

    (host, guest)
}
