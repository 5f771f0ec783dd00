//! Per-peer session drivers.
//!
//! - `combat`: turn flow for one combat
//! - `draft`: arbiter and client glue for the draft
//! - `observer`: callbacks the UI implements

pub mod observer;
pub mod combat;
pub mod draft;

pub use observer::{NullObserver, ObservedEvent, RecordingObserver, SessionObserver};
pub use combat::{CombatOutcome, CombatSession};
pub use draft::DraftSession;
