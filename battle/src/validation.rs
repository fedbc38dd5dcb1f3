//! Consistency checks for a [`BattleState`] before it is committed

use crate::types::{BattlePokemon, BattleState, BattleTeam, Phase, Side, Status, MAX_TEAM_SIZE};

/// Maximum number of known moves
const MAX_MOVES: usize = 4;

/// Problems found in a battle state
///
/// Errors make the state unfit to commit; warnings are suspicious but legal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "no errors");
        }
        write!(f, "{}", self.errors.join("; "))
    }
}

/// Validate a whole battle state
pub fn validate_state(state: &BattleState) -> ValidationReport {
    let mut report = ValidationReport::default();

    for side in Side::BOTH {
        validate_team(state.team(side), side, state.phase, &mut report);
    }

    if state.turn < 1 {
        report.error(format!("Invalid turn: {}", state.turn));
    }

    if state.is_complete != (state.phase == Phase::Ended) {
        report.error(format!(
            "Completion flag ({}) disagrees with phase {}",
            state.is_complete, state.phase
        ));
    }
    if state.winner.is_some() && !state.is_complete {
        report.error("Winner set on a battle that is not complete".to_string());
    }

    report
}

fn validate_team(team: &BattleTeam, side: Side, phase: Phase, report: &mut ValidationReport) {
    if team.pokemon.is_empty() {
        report.error(format!("{side} team has no Pokemon"));
    } else if team.pokemon.len() > MAX_TEAM_SIZE {
        report.error(format!(
            "{side} team has too many Pokemon ({})",
            team.pokemon.len()
        ));
    }

    if team.current_index >= team.pokemon.len() {
        report.error(format!(
            "{side} team has invalid current index: {}",
            team.current_index
        ));
    }

    let fainted = team.pokemon.iter().filter(|p| p.is_fainted()).count();
    if team.fainted_count != fainted {
        report.error(format!(
            "{side} team fainted count mismatch: expected {fainted}, got {}",
            team.fainted_count
        ));
    }

    for (index, poke) in team.pokemon.iter().enumerate() {
        validate_pokemon(poke, &format!("{side}.pokemon[{index}]"), report);
    }

    let active_fainted = team.active().is_some_and(|p| p.is_fainted());
    if active_fainted && !matches!(phase, Phase::Replacement | Phase::Ended) {
        report.warn(format!("{side} active Pokemon is fainted outside replacement"));
    }
}

fn validate_pokemon(poke: &BattlePokemon, context: &str, report: &mut ValidationReport) {
    if poke.max_hp == 0 {
        report.error(format!("{context} has invalid max HP: 0"));
    }
    if poke.current_hp > poke.max_hp {
        report.error(format!(
            "{context} current HP ({}) exceeds max HP ({})",
            poke.current_hp, poke.max_hp
        ));
    }

    if !(1..=100).contains(&poke.level) {
        report.error(format!("{context} has invalid level: {}", poke.level));
    }

    if poke.moves.is_empty() {
        report.warn(format!("{context} has no moves"));
    } else if poke.moves.len() > MAX_MOVES {
        report.error(format!("{context} has too many moves: {}", poke.moves.len()));
    }
    for slot in &poke.moves {
        if slot.pp > slot.max_pp {
            report.error(format!(
                "{context} move {} has {} PP out of {}",
                slot.id, slot.pp, slot.max_pp
            ));
        }
    }

    if !poke.stat_modifiers.in_range() {
        report.error(format!(
            "{context} has stat modifiers out of range: {:?}",
            poke.stat_modifiers
        ));
    }

    if poke.status.is_some() && poke.status_turns.is_none() {
        report.warn(format!("{context} has status but no status turns"));
    }
    // CNF is published but loads back as no status
    if poke.status == Some(Status::Confused) {
        report.warn(format!(
            "{context} is confused through its status; it will not survive a commit"
        ));
    }
}
