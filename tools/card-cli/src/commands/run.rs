//! Run command: drive carousels in real time.
//!
//! Each stdin line is `<container> <event>`. End of input (or the optional
//! duration) shuts the driver down.

use anyhow::{anyhow, bail, Context as _, Result};
use card_carousel::{CarouselDriver, CarouselId, HostEvent, MoveReport};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{sleep, Duration, Instant};

use super::{Page, RunArgs};
use crate::context::Context;

/// Run the run command.
pub async fn run(args: RunArgs, ctx: &Context) -> Result<()> {
    let started = Instant::now();
    let page = Page::mount(ctx, started.into_std())?;
    if page.registry.is_empty() {
        ctx.output.warn("No carousel mounted; nothing to run.");
        return Ok(());
    }

    let names: Vec<(CarouselId, String)> = page
        .registry
        .ids()
        .map(|id| (id, page.name_of(id).to_string()))
        .collect();
    let ids = page.ids();

    let Page { registry, .. } = page;
    let (driver, handle, mut reports) = CarouselDriver::new(registry, 32);
    let driver = tokio::spawn(driver.run());

    ctx.output
        .info("Type `<container> <enter|leave|prev|next>` per line; Ctrl-D to stop.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let deadline = sleep(Duration::from_millis(args.duration.unwrap_or(0)));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_line(&line).and_then(|(name, event)| {
                    let id = ids
                        .get(name)
                        .copied()
                        .ok_or_else(|| anyhow!("No carousel named '{}'", name))?;
                    Ok((id, event))
                }) {
                    Ok((id, event)) => handle.dispatch(id, event).await?,
                    Err(e) => ctx.output.warn(&format!("{:#}", e)),
                }
            }
            Some(report) = reports.recv() => print_report(ctx, &names, started, &report),
            _ = &mut deadline, if args.duration.is_some() => break,
        }
    }

    handle.shutdown().await?;
    let hosts = driver.await.context("Carousel driver panicked")?;

    // Moves raised while shutting down.
    while let Ok(report) = reports.try_recv() {
        print_report(ctx, &names, started, &report);
    }

    ctx.output.success(&format!("Stopped {} carousel(s)", hosts.len()));
    for (id, host) in &hosts {
        if let Some(offset) = host.offset() {
            ctx.output.kv(name_for(&names, *id), &offset.css_transform());
        }
    }

    Ok(())
}

/// Split a `<container> <event>` line.
fn parse_line(line: &str) -> Result<(&str, HostEvent)> {
    let mut parts = line.split_whitespace();
    let (Some(name), Some(event), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("Expected `<container> <event>`, got '{}'", line.trim());
    };
    let event = HostEvent::from_str(event).ok_or_else(|| anyhow!("Unknown event '{}'", event))?;
    Ok((name, event))
}

fn name_for(names: &[(CarouselId, String)], id: CarouselId) -> &str {
    names
        .iter()
        .find(|(candidate, _)| *candidate == id)
        .map(|(_, name)| name.as_str())
        .unwrap_or("?")
}

fn print_report(ctx: &Context, names: &[(CarouselId, String)], started: Instant, report: &MoveReport) {
    let name = name_for(names, report.id);
    let at = report.at.saturating_duration_since(started).as_millis();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "at_ms": at,
            "container": name,
            "movement": report.movement,
        }));
        return;
    }

    ctx.output.timeline_row(at, name, "", Some(&report.movement));
}
