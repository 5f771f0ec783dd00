//! Synchronization between peers.
//!
//! Two channels keep peers in step:
//!
//! - point-to-point `PeerMessage`s for combat changes, queued in an
//!   `Outbox` by the `Replicator` and applied on arrival by `apply_inbound`
//! - the versioned `SharedSnapshot` for state any peer may read later,
//!   written through a compare-and-swap `PropertyStore`

pub mod message;
pub mod transport;
pub mod replicator;
pub mod mirror;
pub mod snapshot;

pub use message::{Envelope, PeerMessage};
pub use transport::{Outbox, PeerTransport, Recipient};
pub use replicator::{Replicator, SyncRoutes};
pub use mirror::apply_inbound;
pub use snapshot::{
    LocalPropertyStore, PropertyStore, SharedSnapshot, SnapshotEdit, SnapshotPublisher,
};
