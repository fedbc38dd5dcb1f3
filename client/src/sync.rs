//! Turn coordination on top of the store, the guard and the projection.
//!
//! A [`BattleSync`] is one signed-in client. Every operation follows the
//! same pipeline:
//!
//! ```text
//! intent -> guard -> retry(read) -> projection::load -> engine
//!        -> validate -> projection::commit -> retry(compare-and-set write)
//! ```
//!
//! Both clients may try to resolve the same turn. The store's
//! compare-and-set on `meta.version` lets exactly one of them win; the
//! loser's commit is rejected with the newer version, which it reports as
//! [`TurnOutcome::AlreadyCommitted`] without reading or retrying.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use versus_battle::projection::{self, create_snapshot, phase_from_wire, side_of, slot_of};
use versus_battle::{
    validate_state, Action, AdapterError, BattleState, BattleTeam, MissingPart, Phase,
    ResolutionEngine, Side, TurnActions,
};
use versus_protocol::{Choice, ChoiceAction, Meta, RoomRecord, RoomStatus, Snapshot};

use crate::config::SyncConfig;
use crate::error::{StoreError, SyncError};
use crate::guard::{
    check_authentication, check_battle_action_permission, check_battle_participation,
    check_battle_start_permission, check_replacement_permission, check_room_creation_permission,
    check_room_join_permission, BattleParticipants, DenialCode, PermissionCheck, Role,
};
use crate::retry::{Retry, RetryConfig};
use crate::store::SnapshotStore;
use crate::subscription::Subscription;

/// Result of submitting a choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Submitted { turn: u32 },

    /// A choice for this turn was already on record; nothing was written
    AlreadySubmitted { turn: u32 },
}

/// Result of resolving a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Committed { version: u64, turn: u32, phase: Phase },

    /// Another client committed this turn first
    AlreadyCommitted { version: u64 },
}

/// A client's view of rooms and battles in a shared store
pub struct BattleSync<S> {
    store: Arc<S>,
    user: Option<String>,
    config: SyncConfig,
    battle_retry: Retry<StoreError>,
    room_retry: Retry<StoreError>,
}

impl<S: SnapshotStore + 'static> BattleSync<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, SyncConfig::default())
    }

    pub fn with_config(store: S, config: SyncConfig) -> Self {
        let battle_retry = Retry::new(RetryConfig::battle_with(config.battle_retry));
        let room_retry = Retry::new(RetryConfig::room_with(config.room_retry));
        Self {
            store: Arc::new(store),
            user: None,
            config,
            battle_retry,
            room_retry,
        }
    }

    /// Act as an authenticated user
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user = Some(user_id.into());
        self
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Create a room with the current user as host
    pub async fn create_room(&self, room_id: &str) -> Result<RoomRecord, SyncError> {
        let host = self.permitted(check_room_creation_permission(self.user()))?;

        let room = RoomRecord::new(room_id, host);
        self.room_call(|| self.store.write_room(room.clone())).await?;

        tracing::info!(room_id, host, "Created room");
        Ok(room)
    }

    /// Take the guest seat of a room, or re-enter a room already joined
    pub async fn join_room(&self, room_id: &str) -> Result<RoomRecord, SyncError> {
        let user = self.permitted(check_authentication(self.user()))?;

        let mut room = self.room_call(|| self.store.read_room(room_id)).await?;
        check_room_join_permission(Some(user), &room).into_result()?;

        if room.is_member(user) {
            tracing::debug!(room_id, user, "Re-entered room");
            return Ok(room);
        }

        room.guest_id = Some(user.to_string());
        room.current_players += 1;
        if room.is_full() {
            room.status = RoomStatus::Ready;
        }
        self.room_call(|| self.store.write_room(room.clone())).await?;

        tracing::info!(room_id, guest = user, "Joined room");
        Ok(room)
    }

    /// Create the battle document for a ready room
    ///
    /// Only the host may start. The host's team plays slot `p1`.
    pub async fn start_battle(
        &self,
        room_id: &str,
        battle_id: &str,
        host_team: &BattleTeam,
        guest_team: &BattleTeam,
        seed: u64,
    ) -> Result<Snapshot, SyncError> {
        let user = self.permitted(check_authentication(self.user()))?;

        let mut room = self.room_call(|| self.store.read_room(room_id)).await?;
        let participants = BattleParticipants::from_room(&room);
        check_battle_start_permission(Some(user), Some(&participants)).into_result()?;

        let guest = match (&room.guest_id, room.status) {
            (Some(guest), RoomStatus::Waiting | RoomStatus::Ready) => guest.clone(),
            _ => return Err(DenialCode::InvalidPhase.into()),
        };

        let initial = BattleState::new(host_team.clone(), guest_team.clone(), seed);
        let report = validate_state(&initial);
        if !report.is_valid() {
            return Err(SyncError::InvalidState(report));
        }

        let snapshot = create_snapshot(&room.host_id, &guest, host_team, guest_team, seed);
        self.battle_call(|| self.store.create_battle(battle_id, snapshot.clone()))
            .await?;

        room.status = RoomStatus::Battling;
        room.battle_id = Some(battle_id.to_string());
        self.room_call(|| self.store.write_room(room.clone())).await?;

        tracing::info!(room_id, battle_id, host = %room.host_id, guest = %guest, "Battle started");
        Ok(snapshot)
    }

    /// Read a battle document through the battle retry profile
    pub async fn load_battle(&self, battle_id: &str) -> Result<Snapshot, SyncError> {
        self.battle_call(|| self.store.read_battle(battle_id)).await
    }

    /// Read a battle and rebuild its symmetric state
    pub async fn load_state(&self, battle_id: &str) -> Result<BattleState, SyncError> {
        let snapshot = self.load_battle(battle_id).await?;
        Ok(projection::load(&snapshot)?)
    }

    /// Submit the current user's choice for the current turn
    ///
    /// During the replacement phase only switches are accepted, and only
    /// from a side whose active Pokemon fainted.
    pub async fn submit_choice(
        &self,
        battle_id: &str,
        mut choice: Choice,
    ) -> Result<Submission, SyncError> {
        let user = self.permitted(check_authentication(self.user()))?;
        if !choice.is_well_formed() {
            return Err(SyncError::InvalidChoice(format!(
                "{:?} choice is missing its payload",
                choice.action
            )));
        }

        let snapshot = self.load_battle(battle_id).await?;
        let meta = battle_meta(&snapshot)?;
        let participants = BattleParticipants::from_meta(meta);
        check_battle_participation(Some(user), Some(&participants)).into_result()?;

        let state = projection::load(&snapshot)?;
        if state.phase == Phase::Replacement {
            let participants = match state.sides_needing_replacement()[..] {
                [side] => participants.with_current_turn(Role::from_slot(slot_of(side))),
                _ => participants,
            };
            check_replacement_permission(Some(user), Some(&participants)).into_result()?;
            if choice.action != ChoiceAction::Switch {
                return Err(SyncError::InvalidChoice(
                    "only switches are accepted during replacement".to_string(),
                ));
            }
        } else {
            check_battle_action_permission(Some(user), Some(&participants)).into_result()?;
        }

        let slot = meta
            .players
            .slot_of(user)
            .ok_or(SyncError::Denied(DenialCode::NotParticipant))?;
        check_choice(state.team(side_of(slot)), &choice)?;

        let turn = meta.turn;
        if snapshot
            .current_choices()
            .is_some_and(|choices| choices.contains_key(user))
        {
            tracing::debug!(battle_id, user, turn, "Choice already on record");
            return Ok(Submission::AlreadySubmitted { turn });
        }

        choice.client_version = meta.version;
        self.battle_call(|| {
            self.store
                .write_choice(battle_id, turn, user, choice.clone())
        })
        .await?;

        tracing::info!(battle_id, user, turn, action = ?choice.action, "Choice submitted");
        Ok(Submission::Submitted { turn })
    }

    /// Resolve the current turn and commit it
    ///
    /// Needs a choice from every side that has to act, unless one of them
    /// forfeited. A forfeit ends the battle without running the engine.
    pub async fn resolve_turn<E>(
        &self,
        battle_id: &str,
        engine: &E,
    ) -> Result<TurnOutcome, SyncError>
    where
        E: ResolutionEngine + ?Sized,
    {
        let snapshot = self.load_battle(battle_id).await?;
        let meta = battle_meta(&snapshot)?;
        let participants = BattleParticipants::from_meta(meta);
        check_battle_participation(self.user(), Some(&participants)).into_result()?;
        if meta.is_ended() {
            return Err(AdapterError::BattleEnded.into());
        }

        let expected = snapshot.version();
        let next = resolve(&snapshot, engine)?;

        let result = self
            .battle_call(|| self.store.commit(battle_id, expected, next.clone()))
            .await;

        match result {
            Ok(version) => {
                let turn = next.current_turn();
                let phase = next
                    .meta
                    .as_ref()
                    .map_or(Phase::Ended, |m| phase_from_wire(m.phase));
                tracing::debug!(battle_id, version, turn, phase = %phase, "Committed resolution");
                Ok(TurnOutcome::Committed {
                    version,
                    turn,
                    phase,
                })
            }
            // A newer version on record means the other client got there first
            Err(SyncError::Store(StoreError::Aborted { actual, .. })) if actual > expected => {
                tracing::info!(
                    battle_id,
                    expected,
                    version = actual,
                    "Turn already committed by another client"
                );
                Ok(TurnOutcome::AlreadyCommitted { version: actual })
            }
            Err(e) => Err(e),
        }
    }

    /// Follow a battle document as it changes
    pub fn watch(&self, battle_id: &str) -> Subscription {
        Subscription::spawn(
            Arc::clone(&self.store),
            battle_id,
            self.battle_retry.clone(),
            self.config.poll_interval(),
        )
    }

    /// The signed-in user, if `check` passed
    fn permitted(&self, check: PermissionCheck) -> Result<&str, SyncError> {
        check.into_result()?;
        self.user()
            .ok_or(SyncError::Denied(DenialCode::Unauthenticated))
    }

    async fn battle_call<T, F, Fut>(&self, operation: F) -> Result<T, SyncError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        call(&self.battle_retry, self.config.operation_timeout(), operation).await
    }

    async fn room_call<T, F, Fut>(&self, operation: F) -> Result<T, SyncError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        call(&self.room_retry, self.config.operation_timeout(), operation).await
    }
}

async fn call<T, F, Fut>(
    retry: &Retry<StoreError>,
    deadline: Option<Duration>,
    operation: F,
) -> Result<T, SyncError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    match deadline {
        Some(deadline) => Ok(retry.execute_within(deadline, operation).await?),
        None => Ok(retry.execute(operation).await?),
    }
}

fn battle_meta(snapshot: &Snapshot) -> Result<&Meta, SyncError> {
    snapshot
        .meta
        .as_ref()
        .ok_or(SyncError::Denied(DenialCode::NoBattleData))
}

/// Compute the next snapshot for the turn recorded in `snapshot`
fn resolve<E>(snapshot: &Snapshot, engine: &E) -> Result<Snapshot, SyncError>
where
    E: ResolutionEngine + ?Sized,
{
    let meta = snapshot
        .meta
        .as_ref()
        .ok_or(AdapterError::IncompleteSnapshot(MissingPart::Meta))?;
    let state = projection::load(snapshot)?;
    let actions = collect_actions(snapshot, meta, &state)?;

    let next = match actions.forfeiting_side() {
        Some(side) => {
            let who = meta
                .players
                .id(slot_of(side))
                .map_or_else(|| side.to_string(), str::to_string);
            let mut next = state.clone();
            next.battle_log = vec![format!("{who} forfeited")];
            next.finish(Some(side.other()));
            next
        }
        None => {
            let resolved = engine.resolve(state.clone(), &actions, meta.rng);
            let mut next = resolved.state;
            next.battle_log = resolved.log;
            next
        }
    };

    let mut report = validate_state(&next);
    if !next.is_complete && next.turn != state.turn + 1 {
        report.errors.push(format!(
            "Turn must advance from {} to {}, got {}",
            state.turn,
            state.turn + 1,
            next.turn
        ));
    }
    if !report.is_valid() {
        return Err(SyncError::InvalidState(report));
    }
    for warning in &report.warnings {
        tracing::debug!(warning = %warning, "Resolved state warning");
    }

    if !state.phase.can_resolve_to(next.phase) {
        return Err(SyncError::IllegalTransition {
            from: state.phase,
            to: next.phase,
        });
    }

    Ok(projection::commit(snapshot, &next)?)
}

/// Gather the choices of every side that has to act this turn
fn collect_actions(
    snapshot: &Snapshot,
    meta: &Meta,
    state: &BattleState,
) -> Result<TurnActions, SyncError> {
    let required = if state.phase == Phase::Replacement {
        state.sides_needing_replacement()
    } else {
        Side::BOTH.to_vec()
    };

    let choices = snapshot.current_choices();
    let mut actions = TurnActions::default();
    let mut pending = Vec::new();

    for side in required {
        let slot = slot_of(side);
        let id = meta
            .players
            .id(slot)
            .ok_or(AdapterError::IncompleteSnapshot(MissingPart::Player(slot)))?;
        match choices.and_then(|c| c.get(id)) {
            Some(choice) => actions.set(side, action_of(choice)?),
            None => pending.push(id.to_string()),
        }
    }

    if !pending.is_empty() && actions.forfeiting_side().is_none() {
        return Err(SyncError::ChoicesPending(pending));
    }
    Ok(actions)
}

fn action_of(choice: &Choice) -> Result<Action, SyncError> {
    let missing = || SyncError::InvalidChoice(format!("{:?} choice is missing its payload", choice.action));
    Ok(match choice.action {
        ChoiceAction::Move => Action::Move {
            move_id: choice.payload.move_id.clone().ok_or_else(missing)?,
            target: choice.payload.target.clone(),
        },
        ChoiceAction::Switch => Action::Switch {
            index: choice.payload.switch_to_index.ok_or_else(missing)?,
        },
        ChoiceAction::Forfeit => Action::Forfeit,
    })
}

/// Check a choice against the chooser's own team
fn check_choice(team: &BattleTeam, choice: &Choice) -> Result<(), SyncError> {
    match action_of(choice)? {
        Action::Move { move_id, .. } => {
            let active = team
                .active()
                .filter(|p| p.is_alive())
                .ok_or_else(|| SyncError::InvalidChoice("no active Pokemon can move".to_string()))?;
            match active.find_move(&move_id) {
                Some(slot) if slot.usable() => Ok(()),
                Some(_) => Err(SyncError::InvalidChoice(format!(
                    "{move_id} cannot be used right now"
                ))),
                None => Err(SyncError::InvalidChoice(format!(
                    "{} does not know {move_id}",
                    active.name()
                ))),
            }
        }
        Action::Switch { index } if team.can_switch_to(index) => Ok(()),
        Action::Switch { index } => Err(SyncError::InvalidChoice(format!(
            "cannot switch to team slot {index}"
        ))),
        Action::Forfeit => Ok(()),
    }
}
