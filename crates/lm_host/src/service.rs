//! Host-facing command surface.
//!
//! `MatchService` owns the registry, the store and the advisor, and
//! exposes the match lifecycle: create, start, kick, snapshot, end,
//! subscribe, and durable retrieval by id. All per-match mutation goes
//! through the owning actor's command queue; the service never touches
//! an engine directly after spawn.

use std::sync::Arc;

use rand::Rng;
use tokio::sync::{broadcast, oneshot};
use tracing::info;
use uuid::Uuid;

use lm_core::{MatchEngine, MatchId, MatchSnapshot, MatchStateRecord, Tuning};

use crate::actor::{advisor_refresh_loop, MatchActor, MatchCommand, MatchFeed};
use crate::advisor::TacticsAdvisor;
use crate::error::HostError;
use crate::registry::MatchRegistry;
use crate::store::MatchStore;

pub struct MatchService {
    registry: Arc<MatchRegistry>,
    store: Arc<dyn MatchStore>,
    advisor: Arc<dyn TacticsAdvisor>,
    tuning: Tuning,
}

impl MatchService {
    pub fn new(store: Arc<dyn MatchStore>, advisor: Arc<dyn TacticsAdvisor>) -> MatchService {
        MatchService {
            registry: Arc::new(MatchRegistry::new()),
            store,
            advisor,
            tuning: Tuning::default(),
        }
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> MatchService {
        self.tuning = tuning;
        self
    }

    /// Create a match with a random seed and spawn its actor.
    pub fn create_match(&self, home_name: &str, away_name: &str) -> Result<MatchId, HostError> {
        self.create_match_with_seed(home_name, away_name, rand::thread_rng().gen())
    }

    /// Seeded variant for deterministic tests and replays.
    pub fn create_match_with_seed(
        &self,
        home_name: &str,
        away_name: &str,
        seed: u64,
    ) -> Result<MatchId, HostError> {
        let id = Uuid::new_v4();
        let engine = MatchEngine::new(id, home_name, away_name, seed)?
            .with_tuning(self.tuning.clone());
        self.store.save(&engine.to_record())?;

        let (actor, handle) =
            MatchActor::new(engine, self.store.clone(), self.registry.clone());
        let advisor_task = advisor_refresh_loop(
            self.advisor.clone(),
            handle.snapshot_rx.clone(),
            handle.command_tx.clone(),
        );
        self.registry.insert(handle);
        tokio::spawn(actor.run());
        tokio::spawn(advisor_task);

        info!(match_id = %id, home = home_name, away = away_name, "match created");
        Ok(id)
    }

    pub async fn start_match(&self, id: MatchId) -> Result<(), HostError> {
        self.send(id, MatchCommand::Start).await
    }

    /// End the match. The actor persists, stops its ticker and removes
    /// itself from the registry.
    pub async fn end_match(&self, id: MatchId) -> Result<(), HostError> {
        self.send(id, MatchCommand::End).await
    }

    /// Manual velocity injection for demo/debug.
    pub async fn kick_ball(&self, id: MatchId) -> Result<(), HostError> {
        self.send(id, MatchCommand::KickBall).await
    }

    /// Fresh snapshot, serialized through the actor's command queue.
    pub async fn snapshot(&self, id: MatchId) -> Result<MatchSnapshot, HostError> {
        let handle = self.registry.get(id).ok_or(HostError::MatchNotFound(id))?;
        let (reply_tx, reply_rx) = oneshot::channel();
        handle
            .command_tx
            .send(MatchCommand::GetSnapshot(reply_tx))
            .await
            .map_err(|_| HostError::ChannelClosed(id))?;
        reply_rx.await.map_err(|_| HostError::ChannelClosed(id))
    }

    /// Subscribe to the ordered event/snapshot feed of a live match.
    pub fn subscribe(&self, id: MatchId) -> Result<broadcast::Receiver<MatchFeed>, HostError> {
        let handle = self.registry.get(id).ok_or(HostError::MatchNotFound(id))?;
        Ok(handle.feed_tx.subscribe())
    }

    /// Durably persisted state, available across process restarts even
    /// when no actor is live.
    pub fn persisted(&self, id: MatchId) -> Result<MatchStateRecord, HostError> {
        self.store.load(id)?.ok_or(HostError::MatchNotFound(id))
    }

    pub fn active_matches(&self) -> usize {
        self.registry.active_matches()
    }

    async fn send(&self, id: MatchId, command: MatchCommand) -> Result<(), HostError> {
        let handle = self.registry.get(id).ok_or(HostError::MatchNotFound(id))?;
        handle.command_tx.send(command).await.map_err(|_| HostError::ChannelClosed(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::{HeuristicAdvisor, NullAdvisor};
    use crate::store::FileMatchStore;
    use lm_core::{EventKind, MatchStatus};
    use std::time::Duration;
    use tempfile::TempDir;

    fn service(dir: &TempDir, advisor: Arc<dyn TacticsAdvisor>) -> MatchService {
        let store = Arc::new(FileMatchStore::new(dir.path()).unwrap());
        MatchService::new(store, advisor)
    }

    #[tokio::test(start_paused = true)]
    async fn test_match_lifecycle_over_the_command_surface() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, Arc::new(NullAdvisor));

        let id = service.create_match_with_seed("Red", "Blue", 42).unwrap();
        assert_eq!(service.active_matches(), 1);

        let snap = service.snapshot(id).await.unwrap();
        assert_eq!(snap.status, MatchStatus::NotStarted);
        assert_eq!(snap.players.len(), 22);

        service.start_match(id).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1000)).await;

        let snap = service.snapshot(id).await.unwrap();
        assert_eq!(snap.status, MatchStatus::InProgress);
        assert!(snap.simulation_step > 0, "ticks should have run");
        assert!(snap.clock_min > 0.0);

        service.kick_ball(id).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        service.end_match(id).await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(service.active_matches(), 0, "ended match must leave the registry");

        // Durable across actor death.
        let record = service.persisted(id).unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.status, MatchStatus::Ended);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_match_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, Arc::new(NullAdvisor));
        let missing = Uuid::new_v4();

        assert!(matches!(
            service.start_match(missing).await,
            Err(HostError::MatchNotFound(_))
        ));
        assert!(matches!(service.snapshot(missing).await, Err(HostError::MatchNotFound(_))));
        assert!(matches!(service.subscribe(missing), Err(HostError::MatchNotFound(_))));
        assert!(matches!(service.persisted(missing), Err(HostError::MatchNotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_carries_events_and_snapshots() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, Arc::new(NullAdvisor));
        let id = service.create_match_with_seed("Red", "Blue", 7).unwrap();
        let mut feed = service.subscribe(id).unwrap();

        service.start_match(id).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1000)).await;

        let mut saw_game_start = false;
        let mut saw_snapshot = false;
        let mut saw_state_update = false;
        while let Ok(msg) = feed.try_recv() {
            match msg {
                MatchFeed::Event(ev) if ev.kind == EventKind::GameStart => saw_game_start = true,
                MatchFeed::Event(ev) if ev.kind == EventKind::StateUpdate => {
                    saw_state_update = true
                }
                MatchFeed::Snapshot(_) => saw_snapshot = true,
                _ => {}
            }
        }
        assert!(saw_game_start);
        assert!(saw_snapshot);
        assert!(saw_state_update);
    }

    #[tokio::test(start_paused = true)]
    async fn test_advisor_feeds_hints_without_stalling_ticks() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, Arc::new(HeuristicAdvisor));
        let id = service.create_match_with_seed("Red", "Blue", 11).unwrap();
        service.start_match(id).await.unwrap();

        // Several advisor refresh windows elapse; ticks keep flowing.
        tokio::time::sleep(Duration::from_millis(3000)).await;
        let snap = service.snapshot(id).await.unwrap();
        assert!(snap.simulation_step >= 20);
    }
}
