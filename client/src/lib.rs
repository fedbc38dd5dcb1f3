//! Retrying, permission-gated synchronization of two-player battles.
//!
//! # Overview
//!
//! `versus-client` keeps two independently polling clients in step on one
//! battle stored in a replicated, eventually consistent document store:
//!
//! ```text
//! versus-protocol (snapshot shapes)
//!        │
//!        ▼
//! versus-battle (domain types + projection)
//!        │
//!        ▼
//! versus-client ← THIS CRATE
//!   ├── guard         who may do what, and when
//!   ├── retry         backoff around every store call
//!   ├── store         the store contract and an in-memory store
//!   ├── subscription  polling watchers publishing whole snapshots
//!   └── sync          BattleSync, the turn coordinator
//! ```
//!
//! # Example Usage
//!
//! ```ignore
//! use versus_client::{BattleSync, MemoryStore, TurnOutcome};
//! use versus_protocol::Choice;
//!
//! let store = MemoryStore::new();
//! let host = BattleSync::new(store.clone()).with_user("alice");
//! let guest = BattleSync::new(store).with_user("bob");
//!
//! host.create_room("room-1").await?;
//! guest.join_room("room-1").await?;
//! host.start_battle("room-1", "battle-1", &alice_team, &bob_team, 42).await?;
//!
//! host.submit_choice("battle-1", Choice::use_move("thunderbolt")).await?;
//! guest.submit_choice("battle-1", Choice::use_move("tackle")).await?;
//!
//! if let TurnOutcome::Committed { turn, phase, .. } = host.resolve_turn("battle-1", &engine).await? {
//!     println!("now on turn {turn} ({phase})");
//! }
//! ```

pub mod config;
pub mod error;
pub mod guard;
pub mod retry;
pub mod store;
pub mod subscription;
pub mod sync;

pub use config::SyncConfig;
pub use error::{StoreError, SyncError};
pub use guard::{BattleParticipants, DenialCode, PermissionCheck, Role};
pub use retry::{Retry, RetryConfig, RetryError, RetrySettings};
pub use store::{MemoryStore, SnapshotStore};
pub use subscription::Subscription;
pub use sync::{BattleSync, Submission, TurnOutcome};
