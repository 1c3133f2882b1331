//! Simulate command: replay carousels on a virtual clock.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use anyhow::Result;
use card_carousel::{CarouselId, Move};
use serde::Serialize;

use super::{Page, ScheduledEvent, SimulateArgs};
use crate::context::Context;
use crate::output::format_millis;

/// One line of the simulated timeline.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    pub at_ms: u128,
    pub container: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement: Option<Move>,
}

/// Run the simulate command.
pub async fn run(args: SimulateArgs, ctx: &Context) -> Result<()> {
    let base = Instant::now();
    let mut page = Page::mount(ctx, base)?;
    if page.registry.is_empty() {
        ctx.output.warn("No carousel mounted; nothing to simulate.");
        return Ok(());
    }

    let timeline = simulate(
        &mut page,
        base,
        Duration::from_millis(args.duration),
        args.events,
    )?;

    if ctx.output.is_json() {
        ctx.output.json(&timeline);
    } else {
        ctx.output.header(&format!(
            "Timeline ({} simulated)",
            format_millis(args.duration as u128)
        ));
        for entry in &timeline {
            let tag = entry.event.map(|e| format!("[{}]", e)).unwrap_or_default();
            ctx.output
                .timeline_row(entry.at_ms, &entry.container, &tag, entry.movement.as_ref());
        }
    }

    let hosts = page.registry.teardown_all();
    if !ctx.output.is_json() {
        ctx.output.header("Final positions");
        for (id, host) in &hosts {
            let offset = host
                .offset()
                .map(|o| o.css_transform())
                .unwrap_or_else(|| "-".to_string());
            ctx.output.kv(page.name_of(*id), &offset);
        }
    }

    Ok(())
}

/// Advance every mounted carousel from `base` to `base + duration`.
///
/// Autoplay ticks fire at their exact deadlines. A scheduled event that
/// falls on the same instant as a tick is applied first.
pub fn simulate(
    page: &mut Page,
    base: Instant,
    duration: Duration,
    mut events: Vec<ScheduledEvent>,
) -> Result<Vec<TimelineEntry>> {
    let ids: BTreeMap<String, CarouselId> = events
        .iter()
        .map(|e| -> Result<(String, CarouselId)> {
            Ok((e.container.clone(), page.lookup(&e.container)?))
        })
        .collect::<Result<_>>()?;

    events.sort_by_key(|e| e.at);
    let mut events = events.into_iter().peekable();
    let end = base + duration;

    let mut timeline: Vec<TimelineEntry> = page
        .registry
        .ids()
        .map(|id| TimelineEntry {
            at_ms: 0,
            container: page.name_of(id).to_string(),
            event: Some("mount"),
            movement: None,
        })
        .collect();

    loop {
        let tick = page.registry.next_deadline().filter(|t| *t <= end);
        let next_event = events
            .peek()
            .map(|e| base + e.at)
            .filter(|t| *t <= end);

        let event_first = match (tick, next_event) {
            (None, None) => break,
            (Some(tick), Some(event)) => event <= tick,
            (None, Some(_)) => true,
            (Some(_), None) => false,
        };

        if event_first {
            let Some(scheduled) = events.next() else {
                break;
            };
            let id = ids[&scheduled.container];
            let at = base + scheduled.at;
            let movement = page.registry.dispatch(id, scheduled.event, at);
            timeline.push(TimelineEntry {
                at_ms: scheduled.at.as_millis(),
                container: scheduled.container,
                event: Some(scheduled.event.as_str()),
                movement,
            });
        } else if let Some(tick) = tick {
            for (id, movement) in page.registry.poll(tick) {
                timeline.push(TimelineEntry {
                    at_ms: (tick - base).as_millis(),
                    container: page.name_of(id).to_string(),
                    event: None,
                    movement: Some(movement),
                });
            }
        }
    }

    Ok(timeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use crate::output::Output;
    use card_carousel::MoveCause;

    fn context(toml_src: &str) -> Context {
        Context {
            config: toml::from_str::<CliConfig>(toml_src).unwrap(),
            config_path: None,
            output: Output::new(false, true),
            cwd: std::env::temp_dir(),
        }
    }

    const PAGE: &str = r#"
[[containers]]
name = "products"
cards = 10
[containers.attributes]
data-dsi-slider = "true"
data-dsi-items = "3"
data-dsi-interval = "1000"

[[containers]]
name = "grid"
cards = 4
"#;

    fn moves_of(timeline: &[TimelineEntry]) -> Vec<(u128, usize, MoveCause)> {
        timeline
            .iter()
            .filter_map(|e| e.movement.map(|m| (e.at_ms, m.to, m.cause)))
            .collect()
    }

    #[test]
    fn test_autoplay_timeline() {
        let ctx = context(PAGE);
        let base = Instant::now();
        let mut page = Page::mount(&ctx, base).unwrap();

        let timeline = simulate(&mut page, base, Duration::from_millis(3500), Vec::new()).unwrap();
        assert_eq!(timeline[0].event, Some("mount"));
        assert_eq!(
            moves_of(&timeline),
            vec![
                (1000, 3, MoveCause::Autoplay),
                (2000, 6, MoveCause::Autoplay),
                (3000, 0, MoveCause::Autoplay),
            ]
        );
    }

    #[test]
    fn test_events_interleave_with_ticks() {
        let ctx = context(PAGE);
        let base = Instant::now();
        let mut page = Page::mount(&ctx, base).unwrap();

        let events = vec![
            "1500:products:enter".parse().unwrap(),
            "400:products:prev".parse().unwrap(),
            "4000:products:leave".parse().unwrap(),
        ];
        let timeline = simulate(&mut page, base, Duration::from_millis(5000), events).unwrap();

        assert_eq!(
            moves_of(&timeline),
            vec![
                (400, 7, MoveCause::Prev),
                (1400, 0, MoveCause::Autoplay),
                (5000, 3, MoveCause::Autoplay),
            ]
        );
    }

    #[test]
    fn test_event_for_static_grid_is_rejected() {
        let ctx = context(PAGE);
        let base = Instant::now();
        let mut page = Page::mount(&ctx, base).unwrap();

        let events = vec!["100:grid:next".parse().unwrap()];
        let err = simulate(&mut page, base, Duration::from_secs(1), events).unwrap_err();
        assert!(err.to_string().contains("has no carousel"));
    }
}
