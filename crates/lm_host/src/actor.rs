//! Per-match actor: the authoritative tick loop.
//!
//! One tokio task owns one `MatchEngine` (single-writer). Commands
//! arrive on an mpsc queue and are drained at the top of each loop
//! iteration, so ticks and commands are strictly serialized. Events
//! stream on a broadcast feed; snapshots are published every
//! `SNAPSHOT_EVERY_TICKS` ticks on the feed and mirrored into a watch
//! cell for cheap out-of-band reads (the advisor refresh task).
//!
//! A tick error is logged and the loop simply proceeds to the next
//! interval; there is no missed-tick backlog. Ending the match breaks
//! the loop after a final persist, so no tick runs after cancellation
//! is observed.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use lm_core::engine::constants::clock;
use lm_core::{
    FormationShape, MatchEngine, MatchEvent, MatchId, MatchSnapshot, MatchStatus, PlayerRef,
    TeamSide,
};

use crate::advisor::TacticsAdvisor;
use crate::registry::MatchRegistry;
use crate::store::MatchStore;

/// Command queue depth per match.
const COMMAND_QUEUE_DEPTH: usize = 64;
/// Broadcast feed depth; slow consumers lag, the match does not.
const FEED_DEPTH: usize = 256;
/// Periodic persistence cadence (ticks).
const PERSIST_EVERY_TICKS: u64 = 50;
/// Advisor refresh: every ADVISOR_REFRESH_TICKS ticks of wall time,
/// which also enforces the minimum 1s real-time spacing.
pub(crate) const ADVISOR_REFRESH_TICKS: u64 = 10;
/// Upper bound on one advisor query; beyond this the result is dropped.
const ADVISOR_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub enum MatchCommand {
    Start,
    End,
    KickBall,
    GetSnapshot(oneshot::Sender<MatchSnapshot>),
    SetFormation(TeamSide, FormationShape),
    ApplyHints(TeamSide, HashMap<PlayerRef, (f32, f32)>),
}

/// Everything published by a match, in order.
#[derive(Debug, Clone)]
pub enum MatchFeed {
    Event(MatchEvent),
    Snapshot(MatchSnapshot),
}

/// Cloneable handle to a running match.
#[derive(Clone)]
pub struct MatchHandle {
    pub id: MatchId,
    pub command_tx: mpsc::Sender<MatchCommand>,
    pub feed_tx: broadcast::Sender<MatchFeed>,
    pub snapshot_rx: watch::Receiver<MatchSnapshot>,
}

pub struct MatchActor {
    engine: MatchEngine,
    command_rx: mpsc::Receiver<MatchCommand>,
    feed_tx: broadcast::Sender<MatchFeed>,
    snapshot_tx: watch::Sender<MatchSnapshot>,
    store: Arc<dyn MatchStore>,
    registry: Arc<MatchRegistry>,
}

impl MatchActor {
    pub fn new(
        engine: MatchEngine,
        store: Arc<dyn MatchStore>,
        registry: Arc<MatchRegistry>,
    ) -> (MatchActor, MatchHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (feed_tx, _) = broadcast::channel(FEED_DEPTH);
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

        let handle = MatchHandle {
            id: engine.id(),
            command_tx,
            feed_tx: feed_tx.clone(),
            snapshot_rx,
        };
        let actor = MatchActor { engine, command_rx, feed_tx, snapshot_tx, store, registry };
        (actor, handle)
    }

    /// Run the authoritative tick loop until the match ends.
    pub async fn run(mut self) {
        let match_id = self.engine.id();
        info!(match_id = %match_id, "match actor started");

        let mut interval = tokio::time::interval(Duration::from_millis(clock::TICK_MS));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            // Drain the command queue before simulating.
            let mut stop = false;
            while let Ok(command) = self.command_rx.try_recv() {
                if self.handle_command(command) {
                    stop = true;
                }
            }
            if stop {
                // Cancellation observed: publish what the end command
                // emitted, persist, and never tick again.
                self.publish_events();
                self.persist();
                break;
            }

            // Self-healing tick: an error is tick-local, never retried.
            if let Err(err) = self.engine.tick() {
                error!(match_id = %match_id, error = %err, "tick failed, continuing");
            }

            self.publish_events();

            let step = self.engine.simulation_step();
            if step % clock::SNAPSHOT_EVERY_TICKS == 0 {
                self.publish_snapshot();
            }
            if step % PERSIST_EVERY_TICKS == 0 {
                self.persist();
            }

            if self.engine.status() == MatchStatus::Ended {
                self.publish_snapshot();
                self.persist();
                break;
            }
        }

        self.registry.remove(match_id);
        info!(match_id = %match_id, score = ?self.engine.score(), "match actor stopped");
    }

    /// Returns true when the actor should stop.
    fn handle_command(&mut self, command: MatchCommand) -> bool {
        match command {
            MatchCommand::Start => {
                if let Err(err) = self.engine.start() {
                    warn!(match_id = %self.engine.id(), error = %err, "start ignored");
                }
            }
            MatchCommand::End => {
                if let Err(err) = self.engine.end() {
                    warn!(match_id = %self.engine.id(), error = %err, "end ignored");
                }
                return true;
            }
            MatchCommand::KickBall => {
                if let Err(err) = self.engine.kick_ball() {
                    warn!(match_id = %self.engine.id(), error = %err, "kick ignored");
                }
            }
            MatchCommand::GetSnapshot(reply) => {
                let _ = reply.send(self.engine.snapshot());
            }
            MatchCommand::SetFormation(side, shape) => {
                debug!(match_id = %self.engine.id(), ?side, shape = shape.code(), "formation change");
                self.engine.set_formation(side, shape);
            }
            MatchCommand::ApplyHints(side, hints) => {
                self.engine.apply_hints(side, &hints);
            }
        }
        false
    }

    fn publish_events(&mut self) {
        for event in self.engine.drain_events() {
            let _ = self.feed_tx.send(MatchFeed::Event(event));
        }
    }

    fn publish_snapshot(&mut self) {
        let snapshot = self.engine.snapshot();
        let _ = self.snapshot_tx.send(snapshot.clone());
        // StateUpdate rides the ordered feed next to the snapshot.
        let _ = self.feed_tx.send(MatchFeed::Event(MatchEvent::state_update(
            snapshot.ball,
            snapshot.simulation_step * clock::TICK_MS,
            snapshot.clock_min,
        )));
        let _ = self.feed_tx.send(MatchFeed::Snapshot(snapshot));
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.engine.to_record()) {
            // Persistence trouble must not take the match down.
            warn!(match_id = %self.engine.id(), error = %err, "persist failed");
        }
    }
}

/// Background advisor refresh for one match.
///
/// Reads the latest published snapshot on a throttled cadence, runs
/// the advisor on the blocking pool, clamps nothing itself (the engine
/// clamps on arrival) and feeds results back through the command
/// queue. Exits when the match actor goes away.
pub(crate) async fn advisor_refresh_loop(
    advisor: Arc<dyn TacticsAdvisor>,
    snapshot_rx: watch::Receiver<MatchSnapshot>,
    command_tx: mpsc::Sender<MatchCommand>,
) {
    let refresh = Duration::from_millis(clock::TICK_MS * ADVISOR_REFRESH_TICKS);
    let mut interval = tokio::time::interval(refresh);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if command_tx.is_closed() {
            break;
        }
        let snapshot = snapshot_rx.borrow().clone();
        let match_id = snapshot.match_id;
        let advisor = advisor.clone();

        let query = tokio::task::spawn_blocking(move || {
            let mut batches = Vec::new();
            for side in [TeamSide::Home, TeamSide::Away] {
                let has_possession = snapshot.possession.map(|r| r.side) == Some(side);
                let shape = advisor.suggest_formation(&snapshot, side);
                let hints = advisor.suggest_movements(&snapshot, side, has_possession);
                batches.push((side, shape, hints));
            }
            batches
        });

        let batches = match tokio::time::timeout(ADVISOR_TIMEOUT, query).await {
            Ok(Ok(batches)) => batches,
            Ok(Err(err)) => {
                // Advisor blew up: non-fatal, rule-based movement continues.
                warn!(match_id = %match_id, error = %err, "advisor query failed");
                continue;
            }
            Err(_) => {
                warn!(match_id = %match_id, "advisor query timed out");
                continue;
            }
        };

        for (side, shape, hints) in batches {
            if let Some(shape) = shape {
                if command_tx.send(MatchCommand::SetFormation(side, shape)).await.is_err() {
                    return;
                }
            }
            if !hints.is_empty()
                && command_tx.send(MatchCommand::ApplyHints(side, hints)).await.is_err()
            {
                return;
            }
        }
    }
}
