//! CLI command implementations.

pub mod config;
pub mod inspect;
pub mod run;
pub mod simulate;

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Result};
use card_carousel::{CarouselId, CarouselRegistry, HostEvent, Registration, VirtualContainer};
use card_core::ContainerName;
use clap::{Args, Subcommand};

use crate::context::Context;

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Only show this container.
    #[arg(long)]
    pub container: Option<String>,
}

/// Arguments for the simulate command.
#[derive(Args)]
pub struct SimulateArgs {
    /// Virtual time to simulate, in milliseconds.
    #[arg(short, long, default_value = "15000")]
    pub duration: u64,

    /// Host event as `<ms>:<container>:<event>`, e.g. `2500:featured-products:enter`.
    /// Events: enter, leave, prev, next.
    #[arg(short, long = "event")]
    pub events: Vec<ScheduledEvent>,
}

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Stop after this many milliseconds instead of waiting for end of input.
    #[arg(short, long)]
    pub duration: Option<u64>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// A host event scheduled at a point of virtual time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub at: Duration,
    pub container: String,
    pub event: HostEvent,
}

impl FromStr for ScheduledEvent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let (Some(at), Some(container), Some(event)) = (parts.next(), parts.next(), parts.next())
        else {
            bail!("Expected <ms>:<container>:<event>, got '{}'", s);
        };

        let at = at
            .trim()
            .parse::<u64>()
            .map_err(|_| anyhow!("Invalid event time '{}'", at))?;
        let container = container.trim();
        if container.is_empty() {
            bail!("Missing container name in '{}'", s);
        }
        let event =
            HostEvent::from_str(event).ok_or_else(|| anyhow!("Unknown event '{}'", event))?;

        Ok(Self {
            at: Duration::from_millis(at),
            container: container.to_string(),
            event,
        })
    }
}

/// Every configured container registered against one registry.
pub struct Page {
    pub registry: CarouselRegistry<VirtualContainer>,
    /// Registration outcome per container, in config order.
    pub outcomes: Vec<(ContainerName, Registration)>,
}

impl Page {
    /// Run the registration pass over the configured containers.
    pub fn mount(ctx: &Context, now: Instant) -> Result<Self> {
        let base = ctx.base_dir();
        let mut registry = CarouselRegistry::new();
        let mut outcomes = Vec::with_capacity(ctx.config.containers.len());

        for container in &ctx.config.containers {
            let host = container.to_host(&base)?;
            let outcome = match registry.register_one(host, now) {
                Ok(id) => Registration::Mounted(id),
                Err(reason) => Registration::Skipped(reason),
            };
            outcomes.push((container.name.clone(), outcome));
        }

        Ok(Self { registry, outcomes })
    }

    /// Mounted carousel ids by container name.
    pub fn ids(&self) -> BTreeMap<String, CarouselId> {
        self.outcomes
            .iter()
            .filter_map(|(name, outcome)| outcome.id().map(|id| (name.to_string(), id)))
            .collect()
    }

    /// Container name of a mounted carousel.
    pub fn name_of(&self, id: CarouselId) -> &str {
        self.outcomes
            .iter()
            .find(|(_, outcome)| outcome.id() == Some(id))
            .map(|(name, _)| name.as_str())
            .unwrap_or("?")
    }

    /// Resolve a container name to its carousel.
    pub fn lookup(&self, name: &str) -> Result<CarouselId> {
        match self.outcomes.iter().find(|(n, _)| n.as_str() == name) {
            Some((_, Registration::Mounted(id))) => Ok(*id),
            Some((_, Registration::Skipped(reason))) => {
                bail!("Container '{}' has no carousel ({})", name, reason)
            }
            None => bail!("Unknown container '{}'", name),
        }
    }
}
