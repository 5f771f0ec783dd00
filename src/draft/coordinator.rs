//! Draft coordination between peers.
//!
//! One peer, the arbiter, owns the canonical `DraftState`. Every peer,
//! the arbiter included, runs a `DraftClient` that mirrors its own queue
//! from the shared snapshot:
//!
//! ```text
//! Idle --snapshot with a queued pack--> HasPack
//! HasPack --pick (applied locally)--> AwaitingConfirmation
//! AwaitingConfirmation --snapshot counts the pick--> Idle
//! AwaitingConfirmation --rejected--> HasPack (pick undone)
//! ```

use tracing::{debug, info, warn};

use super::generator::PackGenerator;
use super::loadout::{Loadout, LoadoutChange};
use super::pack::{DraftOption, DraftPack};
use super::state::DraftState;
use crate::cards::CardRegistry;
use crate::core::{Error, GameRng, PlayerId, Result};
use crate::sync::{PeerMessage, SharedSnapshot, SnapshotEdit, SnapshotPublisher};

/// The arbiter is the lowest seat id still in the session.
pub fn elect_arbiter(players: impl IntoIterator<Item = PlayerId>) -> Option<PlayerId> {
    players.into_iter().min()
}

/// Authoritative draft state, run on the arbiter peer.
#[derive(Clone, Debug)]
pub struct DraftArbiter {
    state: DraftState,
    dirty: bool,
}

impl DraftArbiter {
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            state: DraftState::new(player_count),
            dirty: false,
        }
    }

    /// Take over from the last published state, e.g. after re-election.
    #[must_use]
    pub fn from_snapshot(snapshot: &SharedSnapshot) -> Self {
        Self {
            state: snapshot.draft.clone(),
            dirty: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> &DraftState {
        &self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Seed every player's queue with one fresh pack.
    pub fn generate_round(&mut self, generator: &PackGenerator<'_>, rng: &mut GameRng) {
        for player in self.state.player_order.clone() {
            let pack_id = self.state.next_pack_id;
            self.state.next_pack_id += 1;
            let pack = generator.generate(pack_id, rng);
            if let Some(queue) = self.state.queues.get_mut(player) {
                queue.push_back(pack);
            }
        }
        self.dirty = true;
        info!(
            players = self.state.player_order.len(),
            options = self.state.total_options(),
            "draft round generated"
        );
    }

    /// Make a player's pick official.
    ///
    /// The pack must be the head of the player's queue and still hold the
    /// option. The remainder moves to the back of the next player's queue;
    /// an emptied pack leaves circulation.
    pub fn handle_pick(
        &mut self,
        player: PlayerId,
        pack_id: u64,
        option_id: u32,
    ) -> Result<DraftOption> {
        let next = self.state.next_in_order(player);
        let queue = self
            .state
            .queues
            .get_mut(player)
            .ok_or(Error::UnknownPlayer(player))?;

        match queue.front() {
            Some(head) if head.id == pack_id => {
                if head.option(option_id).is_none() {
                    return Err(Error::OptionNotFound { pack_id, option_id });
                }
            }
            _ => return Err(Error::PackNotFound { player, pack_id }),
        }

        let mut pack = queue.pop_front().ok_or(Error::PackNotFound { player, pack_id })?;
        let taken = pack
            .take_option(option_id)
            .ok_or(Error::OptionNotFound { pack_id, option_id })?;

        if let Some(picks) = self.state.picks.get_mut(player) {
            *picks += 1;
        }

        if pack.is_empty() {
            debug!(pack_id, "pack exhausted");
        } else if let Some(next) = next {
            debug!(pack_id, %next, remaining = pack.len(), "passing pack");
            self.state.queues[next].push_back(pack);
        }

        self.dirty = true;
        Ok(taken)
    }

    /// Stage the state for publication if it changed.
    pub fn publish(&mut self, publisher: &mut SnapshotPublisher) {
        if self.dirty {
            publisher.stage(SnapshotEdit::Draft(self.state.clone()));
            self.dirty = false;
        }
    }
}

/// What a peer currently shows for its own draft queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DraftView {
    Idle,
    HasPack(DraftPack),
    AwaitingConfirmation { pack_id: u64, option_id: u32 },
}

#[derive(Clone, Debug)]
struct PendingPick {
    pack: DraftPack,
    option_id: u32,
    change: Option<LoadoutChange>,
    expected_picks: u32,
}

/// Result of a local pick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftPick {
    /// Request for the arbiter.
    pub message: PeerMessage,
    pub option: DraftOption,
    /// Whether the payload changed the loadout.
    pub applied: bool,
}

/// Per-peer mirror of its own draft queue.
#[derive(Clone, Debug)]
pub struct DraftClient {
    local: PlayerId,
    view: DraftView,
    seen_version: Option<u64>,
    known_picks: u32,
    pending: Option<PendingPick>,
}

impl DraftClient {
    #[must_use]
    pub fn new(local: PlayerId) -> Self {
        Self {
            local,
            view: DraftView::Idle,
            seen_version: None,
            known_picks: 0,
            pending: None,
        }
    }

    #[must_use]
    pub fn view(&self) -> &DraftView {
        &self.view
    }

    /// No pack in hand and no pick in flight.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.view == DraftView::Idle
    }

    /// Refresh from a published snapshot.
    ///
    /// Returns a pack that just became available. Stale snapshots are
    /// ignored, and so is everything while a pack waits for our pick or
    /// our last pick is not yet reflected.
    pub fn on_snapshot(&mut self, snapshot: &SharedSnapshot) -> Option<DraftPack> {
        if self.seen_version.is_some_and(|seen| snapshot.version <= seen) {
            return None;
        }
        self.seen_version = Some(snapshot.version);
        let picks = snapshot.draft.picks.get(self.local).copied().unwrap_or(0);

        match &self.view {
            DraftView::HasPack(_) => {
                debug!(version = snapshot.version, "pack awaiting pick, snapshot ignored");
                return None;
            }
            DraftView::AwaitingConfirmation { pack_id, .. } => {
                let expected = self.pending.as_ref().map_or(0, |p| p.expected_picks);
                if picks < expected {
                    debug!(pack_id, "pick not yet confirmed");
                    return None;
                }
                info!(pack_id, "draft pick confirmed");
                self.pending = None;
                self.view = DraftView::Idle;
            }
            DraftView::Idle => {}
        }

        self.known_picks = picks;
        let pack = snapshot.draft.head(self.local)?.clone();
        self.view = DraftView::HasPack(pack.clone());
        Some(pack)
    }

    /// Pick an option from the pack in hand and apply it right away.
    ///
    /// A payload that cannot apply (card missing from the deck, no upgrade)
    /// still consumes the option; the failure is logged.
    pub fn pick(
        &mut self,
        option_id: u32,
        loadout: &mut Loadout,
        registry: &CardRegistry,
    ) -> Result<DraftPick> {
        let DraftView::HasPack(pack) = &self.view else {
            return Err(Error::NoPackAvailable);
        };
        let pack_id = pack.id;
        let option = pack
            .option(option_id)
            .cloned()
            .ok_or(Error::OptionNotFound { pack_id, option_id })?;

        let change = match loadout.apply(option.payload, registry) {
            Ok(change) => Some(change),
            Err(err) => {
                warn!(%err, option_id, "draft choice had no effect");
                None
            }
        };

        self.pending = Some(PendingPick {
            pack: pack.clone(),
            option_id,
            change,
            expected_picks: self.known_picks + 1,
        });
        self.view = DraftView::AwaitingConfirmation { pack_id, option_id };

        Ok(DraftPick {
            message: PeerMessage::DraftPickMade { pack_id, option_id },
            option,
            applied: change.is_some(),
        })
    }

    /// Undo a pick the arbiter refused. Returns the pack to show again.
    pub fn on_pick_rejected(
        &mut self,
        pack_id: u64,
        option_id: u32,
        loadout: &mut Loadout,
    ) -> Option<DraftPack> {
        let matches = self
            .pending
            .as_ref()
            .is_some_and(|p| p.pack.id == pack_id && p.option_id == option_id);
        if !matches {
            warn!(pack_id, option_id, "rejection for a pick we are not waiting on");
            return None;
        }

        let pending = self.pending.take()?;
        if let Some(change) = pending.change {
            loadout.revert(change);
        }
        info!(pack_id, option_id, "draft pick rejected, reverted");
        self.view = DraftView::HasPack(pending.pack.clone());
        Some(pending.pack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId};
    use crate::core::{CombatConfig, DraftConfig};
    use crate::draft::{DraftPayload, StatUpgrade};

    fn registry() -> CardRegistry {
        CardRegistry::from_cards([
            CardDefinition::new(CardId::new(1), "Strike"),
            CardDefinition::new(CardId::new(2), "Guard"),
        ])
        .unwrap()
    }

    fn arbiter_with_round(players: usize) -> DraftArbiter {
        let registry = registry();
        let config = DraftConfig::default();
        let generator = PackGenerator::new(&registry, &config);
        let mut arbiter = DraftArbiter::new(players);
        arbiter.generate_round(&generator, &mut GameRng::new(1));
        arbiter
    }

    fn snapshot_of(arbiter: &DraftArbiter, version: u64) -> SharedSnapshot {
        let mut snapshot = SharedSnapshot::new(arbiter.state().picks.player_count(), 40);
        snapshot.draft = arbiter.state().clone();
        snapshot.version = version;
        snapshot
    }

    #[test]
    fn test_elect_lowest_seat() {
        let players = [PlayerId::new(3), PlayerId::new(1), PlayerId::new(2)];
        assert_eq!(elect_arbiter(players), Some(PlayerId::new(1)));
        assert_eq!(elect_arbiter(Vec::new()), None);
    }

    #[test]
    fn test_round_seeds_one_pack_each() {
        let arbiter = arbiter_with_round(3);
        for player in PlayerId::all(3) {
            assert_eq!(arbiter.state().queues[player].len(), 1);
        }
        assert_eq!(arbiter.state().total_options(), 9);
    }

    #[test]
    fn test_pick_passes_remainder() {
        let mut arbiter = arbiter_with_round(2);
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        let pack = arbiter.state().head(p0).unwrap().clone();
        let option_id = pack.options[0].id;

        arbiter.handle_pick(p0, pack.id, option_id).unwrap();

        assert!(arbiter.state().queues[p0].is_empty());
        assert_eq!(arbiter.state().queues[p1].len(), 2);
        assert_eq!(arbiter.state().queues[p1].back().unwrap().len(), 2);
        assert_eq!(arbiter.state().picks[p0], 1);
        assert_eq!(arbiter.state().total_options(), 5);
    }

    #[test]
    fn test_invalid_picks_change_nothing() {
        let mut arbiter = arbiter_with_round(2);
        let p0 = PlayerId::new(0);
        let pack_id = arbiter.state().head(p0).unwrap().id;
        let before = arbiter.state().clone();

        assert!(matches!(
            arbiter.handle_pick(p0, pack_id + 100, 0),
            Err(Error::PackNotFound { .. })
        ));
        assert!(matches!(
            arbiter.handle_pick(p0, pack_id, 99),
            Err(Error::OptionNotFound { .. })
        ));
        assert!(matches!(
            arbiter.handle_pick(PlayerId::new(9), pack_id, 0),
            Err(Error::UnknownPlayer(_))
        ));
        assert_eq!(arbiter.state(), &before);
    }

    #[test]
    fn test_draft_runs_to_completion() {
        let mut arbiter = arbiter_with_round(3);
        let mut picks = 0;
        while !arbiter.is_complete() {
            let before = arbiter.state().total_options();
            let (player, pack) = PlayerId::all(3)
                .find_map(|p| arbiter.state().head(p).map(|pack| (p, pack.clone())))
                .unwrap();
            arbiter.handle_pick(player, pack.id, pack.options[0].id).unwrap();
            assert_eq!(arbiter.state().total_options(), before - 1);
            picks += 1;
        }
        assert_eq!(picks, 9);
    }

    #[test]
    fn test_publish_only_when_dirty() {
        let mut arbiter = arbiter_with_round(2);
        let mut publisher = SnapshotPublisher::new();

        arbiter.publish(&mut publisher);
        assert!(publisher.has_pending());

        let mut second = SnapshotPublisher::new();
        arbiter.publish(&mut second);
        assert!(!second.has_pending());
    }

    #[test]
    fn test_client_pick_confirm_cycle() {
        let registry = registry();
        let mut arbiter = arbiter_with_round(2);
        let p0 = PlayerId::new(0);
        let mut client = DraftClient::new(p0);
        let mut loadout = Loadout::new(vec![CardId::new(1)], &CombatConfig::default());

        let pack = client.on_snapshot(&snapshot_of(&arbiter, 1)).unwrap();
        let option_id = pack.options[0].id;
        let pick = client.pick(option_id, &mut loadout, &registry).unwrap();
        assert_eq!(pick.message, PeerMessage::DraftPickMade { pack_id: pack.id, option_id });
        assert!(matches!(client.view(), DraftView::AwaitingConfirmation { .. }));

        // A snapshot published before the arbiter saw the pick is ignored.
        assert!(client.on_snapshot(&snapshot_of(&arbiter, 2)).is_none());
        assert!(matches!(client.view(), DraftView::AwaitingConfirmation { .. }));

        arbiter.handle_pick(p0, pack.id, option_id).unwrap();
        assert!(client.on_snapshot(&snapshot_of(&arbiter, 3)).is_none());
        assert_eq!(client.view(), &DraftView::Idle);

        // Player 1 picks and passes the remainder to player 0.
        let p1 = PlayerId::new(1);
        let other = arbiter.state().head(p1).unwrap().clone();
        arbiter.handle_pick(p1, other.id, other.options[0].id).unwrap();
        let passed = client.on_snapshot(&snapshot_of(&arbiter, 4)).unwrap();
        assert_eq!(passed.len(), 2);
    }

    #[test]
    fn test_client_ignores_stale_and_busy_snapshots() {
        let arbiter = arbiter_with_round(2);
        let mut client = DraftClient::new(PlayerId::new(0));

        assert!(client.on_snapshot(&snapshot_of(&arbiter, 5)).is_some());
        assert!(client.on_snapshot(&snapshot_of(&arbiter, 4)).is_none());
        assert!(client.on_snapshot(&snapshot_of(&arbiter, 6)).is_none());
        assert!(matches!(client.view(), DraftView::HasPack(_)));
    }

    #[test]
    fn test_rejected_pick_reverts_loadout() {
        let registry = registry();
        let mut state = DraftState::new(1);
        state.queues[PlayerId::new(0)].push_back(DraftPack::new(
            0,
            [DraftOption::new(0, "+5", DraftPayload::UpgradeStat(StatUpgrade::PetMaxHealth(5)))],
        ));
        let mut snapshot = SharedSnapshot::new(1, 40);
        snapshot.draft = state;
        snapshot.version = 1;

        let mut client = DraftClient::new(PlayerId::new(0));
        let mut loadout = Loadout::new(Vec::new(), &CombatConfig::default());
        client.on_snapshot(&snapshot);

        client.pick(0, &mut loadout, &registry).unwrap();
        assert_eq!(loadout.pet_max_health, 45);

        assert!(client.on_pick_rejected(0, 1, &mut loadout).is_none());
        let pack = client.on_pick_rejected(0, 0, &mut loadout).unwrap();
        assert_eq!(pack.id, 0);
        assert_eq!(loadout.pet_max_health, 40);
        assert!(matches!(client.view(), DraftView::HasPack(_)));
    }

    #[test]
    fn test_pick_without_pack() {
        let registry = registry();
        let mut client = DraftClient::new(PlayerId::new(0));
        let mut loadout = Loadout::new(Vec::new(), &CombatConfig::default());
        assert!(matches!(
            client.pick(0, &mut loadout, &registry),
            Err(Error::NoPackAvailable)
        ));
    }
}
