//! One peer's side of the draft.
//!
//! Every peer runs a `DraftClient` for its own queue. The elected arbiter
//! also runs the `DraftArbiter` and answers pick requests. Picks apply to
//! the local loadout immediately; a pet health upgrade is republished
//! through the shared snapshot so whoever fights our pet next sees it.

use tracing::{debug, info, warn};

use super::observer::SessionObserver;
use crate::cards::CardRegistry;
use crate::core::{DraftConfig, Error, GameRng, Phase, PlayerId, Result};
use crate::draft::{elect_arbiter, DraftArbiter, DraftClient, DraftPick, Loadout, PackGenerator};
use crate::sync::{
    Envelope, Outbox, PeerMessage, PeerTransport, PropertyStore, Recipient, SharedSnapshot,
    SnapshotEdit, SnapshotPublisher,
};

pub struct DraftSession<'a, O: SessionObserver> {
    registry: &'a CardRegistry,
    config: &'a DraftConfig,
    local: PlayerId,
    arbiter_id: PlayerId,
    arbiter: Option<DraftArbiter>,
    client: DraftClient,
    loadout: Loadout,
    published_pet_health: i32,
    publisher: SnapshotPublisher,
    outbox: Outbox,
    rng: GameRng,
    observer: O,
}

impl<'a, O: SessionObserver> DraftSession<'a, O> {
    /// Join the draft described by `snapshot`.
    ///
    /// The lowest seat becomes arbiter and takes over the published draft
    /// state.
    pub fn join(
        local: PlayerId,
        loadout: Loadout,
        snapshot: &SharedSnapshot,
        registry: &'a CardRegistry,
        config: &'a DraftConfig,
        seed: u64,
        mut observer: O,
    ) -> Result<Self> {
        let arbiter_id = elect_arbiter(PlayerId::all(snapshot.player_count()))
            .ok_or(Error::UnknownPlayer(local))?;
        if !snapshot.scores.contains(local) {
            return Err(Error::UnknownPlayer(local));
        }

        let arbiter = (arbiter_id == local).then(|| DraftArbiter::from_snapshot(snapshot));
        let published_pet_health = snapshot
            .base_pet_max_health
            .get(local)
            .copied()
            .unwrap_or(loadout.pet_max_health);

        info!(%local, arbiter = %arbiter_id, "joined draft");
        observer.on_phase_changed(Phase::Draft);

        let mut session = Self {
            registry,
            config,
            local,
            arbiter_id,
            arbiter,
            client: DraftClient::new(local),
            loadout,
            published_pet_health,
            publisher: SnapshotPublisher::new(),
            outbox: Outbox::new(),
            rng: GameRng::new(seed).for_context("draft"),
            observer,
        };
        session.stage_pet_health();
        session.on_snapshot(snapshot);
        Ok(session)
    }

    #[must_use]
    pub fn is_arbiter(&self) -> bool {
        self.arbiter.is_some()
    }

    #[must_use]
    pub fn arbiter_id(&self) -> PlayerId {
        self.arbiter_id
    }

    #[must_use]
    pub fn client(&self) -> &DraftClient {
        &self.client
    }

    #[must_use]
    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Give up the session, keeping the drafted loadout.
    #[must_use]
    pub fn into_loadout(self) -> Loadout {
        self.loadout
    }

    /// Deal one pack to every player. Only the arbiter deals.
    pub fn deal_round(&mut self) {
        let Some(arbiter) = self.arbiter.as_mut() else {
            debug!(local = %self.local, "not the arbiter, nothing to deal");
            return;
        };
        let generator = PackGenerator::new(self.registry, self.config);
        arbiter.generate_round(&generator, &mut self.rng);
        arbiter.publish(&mut self.publisher);
    }

    /// Pick an option from the pack we hold.
    ///
    /// The choice applies to the loadout right away. The arbiter is asked
    /// to make it official; on the arbiter itself that happens in place.
    pub fn pick(&mut self, option_id: u32) -> Result<DraftPick> {
        let pick = self.client.pick(option_id, &mut self.loadout, self.registry)?;
        self.stage_pet_health();

        if let PeerMessage::DraftPickMade { pack_id, option_id } = pick.message {
            if self.arbiter.is_some() {
                self.arbitrate(self.local, pack_id, option_id);
            } else {
                self.outbox
                    .send(Recipient::Peer(self.arbiter_id), pick.message.clone());
            }
        }
        Ok(pick)
    }

    /// Handle a draft message from another peer.
    ///
    /// Returns whether the message was meant for the draft.
    pub fn handle_message(&mut self, envelope: &Envelope) -> bool {
        match envelope.message {
            PeerMessage::DraftPickMade { pack_id, option_id } => {
                if self.arbiter.is_none() {
                    warn!(from = %envelope.from, "pick request sent to a non-arbiter");
                    return true;
                }
                self.arbitrate(envelope.from, pack_id, option_id);
                true
            }
            PeerMessage::DraftPickRejected { pack_id, option_id } => {
                if envelope.from != self.arbiter_id {
                    warn!(from = %envelope.from, "rejection from a peer that is not the arbiter");
                    return true;
                }
                self.on_rejected(pack_id, option_id);
                true
            }
            _ => false,
        }
    }

    /// Take in a newer shared snapshot.
    pub fn on_snapshot(&mut self, snapshot: &SharedSnapshot) {
        if let Some(pack) = self.client.on_snapshot(snapshot) {
            info!(pack_id = pack.id, options = pack.len(), "draft pack available");
            self.observer.on_draft_pack_available(&pack);
        }
    }

    /// Read the latest snapshot from `store` and take it in.
    pub fn poll<S: PropertyStore>(&mut self, store: &S) -> Result<SharedSnapshot> {
        let snapshot = store.load()?;
        self.on_snapshot(&snapshot);
        Ok(snapshot)
    }

    /// The draft is over once every queue in `snapshot` is empty and we
    /// are not waiting on a pick.
    #[must_use]
    pub fn is_finished(&self, snapshot: &SharedSnapshot) -> bool {
        snapshot.draft.is_complete() && self.client.is_idle()
    }

    /// Send queued messages and publish staged snapshot edits.
    ///
    /// A lost publish race keeps the edits for the next flush.
    pub fn flush<S, T>(&mut self, store: &S, transport: &mut T) -> Result<()>
    where
        S: PropertyStore,
        T: PeerTransport + ?Sized,
    {
        self.outbox.flush_into(transport);
        match self.publisher.flush(store) {
            Ok(Some(snapshot)) => {
                self.on_snapshot(&snapshot);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(Error::SnapshotConflict { expected, found }) => {
                debug!(expected, found, "draft publish raced, retrying on next flush");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn arbitrate(&mut self, player: PlayerId, pack_id: u64, option_id: u32) {
        let Some(arbiter) = self.arbiter.as_mut() else {
            return;
        };
        match arbiter.handle_pick(player, pack_id, option_id) {
            Ok(option) => {
                debug!(%player, pack_id, option_id = option.id, "pick accepted");
                arbiter.publish(&mut self.publisher);
            }
            Err(err) => {
                warn!(%player, pack_id, option_id, %err, "pick rejected");
                if player == self.local {
                    self.on_rejected(pack_id, option_id);
                } else {
                    self.outbox.send(
                        Recipient::Peer(player),
                        PeerMessage::DraftPickRejected { pack_id, option_id },
                    );
                }
            }
        }
    }

    fn on_rejected(&mut self, pack_id: u64, option_id: u32) {
        if let Some(pack) = self.client.on_pick_rejected(pack_id, option_id, &mut self.loadout) {
            self.stage_pet_health();
            self.observer.on_draft_pack_available(&pack);
        }
    }

    fn stage_pet_health(&mut self) {
        if self.loadout.pet_max_health != self.published_pet_health {
            self.published_pet_health = self.loadout.pet_max_health;
            self.publisher.stage(SnapshotEdit::BasePetMaxHealth {
                player: self.local,
                value: self.loadout.pet_max_health,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId};
    use crate::core::CombatConfig;
    use crate::session::{ObservedEvent, RecordingObserver};
    use crate::sync::LocalPropertyStore;

    fn registry() -> CardRegistry {
        CardRegistry::from_cards([
            CardDefinition::new(CardId::new(1), "Strike"),
            CardDefinition::new(CardId::new(2), "Guard"),
        ])
        .unwrap()
    }

    #[test]
    fn test_lowest_seat_arbitrates_and_deals() {
        let registry = registry();
        let config = DraftConfig::default();
        let snapshot = SharedSnapshot::new(2, 40);
        let store = LocalPropertyStore::new(snapshot.clone());
        let loadout = Loadout::new(vec![CardId::new(1)], &CombatConfig::default());

        let mut arbiter = DraftSession::join(
            PlayerId::new(0),
            loadout.clone(),
            &snapshot,
            &registry,
            &config,
            9,
            RecordingObserver::new(),
        )
        .unwrap();
        let follower = DraftSession::join(
            PlayerId::new(1),
            loadout,
            &snapshot,
            &registry,
            &config,
            9,
            RecordingObserver::new(),
        )
        .unwrap();

        assert!(arbiter.is_arbiter());
        assert!(!follower.is_arbiter());
        assert_eq!(follower.arbiter_id(), PlayerId::new(0));

        arbiter.deal_round();
        let mut transport = Outbox::new();
        arbiter.flush(&store, &mut transport).unwrap();

        let published = store.load().unwrap();
        assert_eq!(published.draft.total_packs(), 2);
        assert!(matches!(
            arbiter.observer().events.last(),
            Some(ObservedEvent::DraftPack(_))
        ));
    }

    #[test]
    fn test_unknown_seat_cannot_join() {
        let registry = registry();
        let config = DraftConfig::default();
        let snapshot = SharedSnapshot::new(2, 40);
        let loadout = Loadout::new(Vec::new(), &CombatConfig::default());

        let joined = DraftSession::join(
            PlayerId::new(5),
            loadout,
            &snapshot,
            &registry,
            &config,
            1,
            RecordingObserver::new(),
        );
        assert!(matches!(joined, Err(Error::UnknownPlayer(_))));
    }
}
