//! Runs a carousel registry on a single tokio task.
//!
//! Host events arrive over a channel and autoplay deadlines are awaited
//! with `sleep_until`. Only the driver task touches the registry, so
//! events and timer ticks never interleave inside a move.

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::controller::Move;
use crate::host::{HostContainer, HostEvent};
use crate::registry::{CarouselId, CarouselRegistry};

/// Commands accepted by a running driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCommand {
    /// Deliver a host event to a carousel.
    Dispatch { id: CarouselId, event: HostEvent },
    /// Tear everything down and stop.
    Shutdown,
}

/// A move reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveReport {
    pub id: CarouselId,
    pub at: Instant,
    pub movement: Move,
}

/// The driver task has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("carousel driver is no longer running")]
pub struct DriverClosed;

/// Sending half used by hosts to talk to a driver.
#[derive(Debug, Clone)]
pub struct DriverHandle {
    commands: mpsc::Sender<DriverCommand>,
}

impl DriverHandle {
    /// Deliver `event` to carousel `id`.
    pub async fn dispatch(&self, id: CarouselId, event: HostEvent) -> Result<(), DriverClosed> {
        self.commands
            .send(DriverCommand::Dispatch { id, event })
            .await
            .map_err(|_| DriverClosed)
    }

    /// Ask the driver to tear down and stop.
    pub async fn shutdown(&self) -> Result<(), DriverClosed> {
        self.commands
            .send(DriverCommand::Shutdown)
            .await
            .map_err(|_| DriverClosed)
    }
}

/// Owns a registry and drives its timers.
#[derive(Debug)]
pub struct CarouselDriver<H> {
    registry: CarouselRegistry<H>,
    commands: mpsc::Receiver<DriverCommand>,
    reports: mpsc::UnboundedSender<MoveReport>,
}

impl<H: HostContainer> CarouselDriver<H> {
    /// Wrap `registry` in a driver.
    ///
    /// Returns the driver, a handle for sending commands, and the receiver
    /// of move reports. `buffer` bounds the command queue.
    pub fn new(
        registry: CarouselRegistry<H>,
        buffer: usize,
    ) -> (Self, DriverHandle, mpsc::UnboundedReceiver<MoveReport>) {
        let (command_tx, command_rx) = mpsc::channel(buffer.max(1));
        let (report_tx, report_rx) = mpsc::unbounded_channel();
        let driver = Self {
            registry,
            commands: command_rx,
            reports: report_tx,
        };
        (driver, DriverHandle { commands: command_tx }, report_rx)
    }

    /// Run until shutdown, or until every handle is dropped.
    ///
    /// Tears down all carousels on exit and returns their containers.
    pub async fn run(mut self) -> Vec<(CarouselId, H)> {
        tracing::debug!(carousels = self.registry.len(), "carousel driver started");

        loop {
            let wake = self.registry.next_deadline().map(Instant::from_std);

            tokio::select! {
                // Host events win over a tick that is due at the same time.
                biased;

                command = self.commands.recv() => match command {
                    Some(DriverCommand::Dispatch { id, event }) => {
                        let now = Instant::now();
                        if let Some(movement) = self.registry.dispatch(id, event, now.into_std()) {
                            self.report(id, now, movement);
                        }
                    }
                    Some(DriverCommand::Shutdown) | None => break,
                },
                _ = sleep_until(wake.unwrap_or_else(Instant::now)), if wake.is_some() => {
                    let now = Instant::now();
                    for (id, movement) in self.registry.poll(now.into_std()) {
                        self.report(id, now, movement);
                    }
                }
            }
        }

        let hosts = self.registry.teardown_all();
        tracing::debug!(carousels = hosts.len(), "carousel driver stopped");
        hosts
    }

    fn report(&self, id: CarouselId, at: Instant, movement: Move) {
        // Nobody listening is fine.
        let _ = self.reports.send(MoveReport { id, at, movement });
    }
}
