//! Fixed-rate tick loop that owns the simulation

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::util::time::Timer;
use crate::ws::protocol::ServerMsg;

use super::{SimCommand, Simulation};

const COMMAND_QUEUE_SIZE: usize = 1024;
const SNAPSHOT_QUEUE_SIZE: usize = 64;

/// Handle to the running simulation, cloned into every connection
#[derive(Clone)]
pub struct SimHandle {
    pub command_tx: mpsc::Sender<SimCommand>,
    pub snapshot_tx: broadcast::Sender<ServerMsg>,
    pub player_count: Arc<AtomicUsize>,
    pub tick: Arc<AtomicU64>,
}

impl SimHandle {
    pub fn player_count(&self) -> usize {
        self.player_count.load(Ordering::Relaxed)
    }

    pub fn tick(&self) -> u64 {
        self.tick.load(Ordering::Relaxed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerMsg> {
        self.snapshot_tx.subscribe()
    }

    /// Queue a command for the next tick. Fails only once the loop has stopped.
    pub async fn send(&self, command: SimCommand) -> bool {
        self.command_tx.send(command).await.is_ok()
    }
}

/// Drives `Simulation::tick` and broadcasts a snapshot after every tick
pub struct TickScheduler {
    sim: Simulation,
    command_rx: mpsc::Receiver<SimCommand>,
    snapshot_tx: broadcast::Sender<ServerMsg>,
    tick_duration: Duration,
    player_count: Arc<AtomicUsize>,
    tick: Arc<AtomicU64>,
}

impl TickScheduler {
    pub fn new(sim: Simulation, tick_rate: u32) -> (Self, SimHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_SIZE);
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_QUEUE_SIZE);
        let player_count = Arc::new(AtomicUsize::new(0));
        let tick = Arc::new(AtomicU64::new(0));

        let handle = SimHandle {
            command_tx,
            snapshot_tx: snapshot_tx.clone(),
            player_count: player_count.clone(),
            tick: tick.clone(),
        };

        let scheduler = Self {
            sim,
            command_rx,
            snapshot_tx,
            tick_duration: Duration::from_secs_f64(1.0 / f64::from(tick_rate.max(1))),
            player_count,
            tick,
        };

        (scheduler, handle)
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Run until every command sender is gone. A late tick is not caught up.
    pub async fn run(mut self) {
        info!(
            tick_ms = self.tick_duration.as_secs_f64() * 1000.0,
            "Simulation loop started"
        );

        let mut tick_interval = interval(self.tick_duration);
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tick_interval.tick().await;
            if !self.step() {
                break;
            }
        }

        info!(tick = self.sim.tick_count(), "Simulation loop stopped");
    }

    /// Drain queued commands, tick once, broadcast the snapshot.
    /// Returns false once the command channel is closed.
    pub fn step(&mut self) -> bool {
        let timer = Timer::new();

        let open = self.process_commands();

        let dt = self.sim.config().nominal_dt();
        self.sim.tick(dt);

        let snapshot = self.sim.snapshot();
        self.tick.store(snapshot.tick, Ordering::Relaxed);
        self.player_count
            .store(self.sim.player_count(), Ordering::Relaxed);

        // No receivers is fine
        let _ = self.snapshot_tx.send(ServerMsg::StateUpdate(snapshot));

        let elapsed = timer.elapsed();
        if elapsed > self.tick_duration {
            warn!(
                tick = self.sim.tick_count(),
                elapsed_us = elapsed.as_micros() as u64,
                "Tick overran its interval"
            );
        }

        open
    }

    fn process_commands(&mut self) -> bool {
        loop {
            match self.command_rx.try_recv() {
                Ok(command) => self.apply(command),
                Err(mpsc::error::TryRecvError::Empty) => return true,
                Err(mpsc::error::TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn apply(&mut self, command: SimCommand) {
        match command {
            SimCommand::Connect(id) => {
                if let Err(e) = self.sim.add_player(id) {
                    error!(player_id = %id, error = %e, "Connect for a live player id");
                }
            }
            SimCommand::Disconnect(id) => self.sim.remove_player(id),
            SimCommand::Movement(id, input) => self.sim.set_input(id, input),
            SimCommand::Shoot(id, angle) => {
                if self.sim.spawn_projectile(id, angle).is_none() {
                    debug!(player_id = %id, angle, "Shot dropped");
                }
            }
        }
    }
}
