//! Inspect command: slider settings and mount outcome per container.

use std::time::Instant;

use anyhow::{bail, Result};
use card_carousel::{Registration, SkipReason};
use card_core::ContainerAttributes;
use serde::Serialize;

use super::{InspectArgs, Page};
use crate::context::Context;
use crate::output::status_badge;

#[derive(Debug, Serialize)]
struct ContainerReport {
    name: String,
    slider: bool,
    items_per_view: usize,
    autoplay_interval_ms: u64,
    cards: usize,
    pages: usize,
    slot_width_percent: f64,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// Run the inspect command.
pub async fn run(args: InspectArgs, ctx: &Context) -> Result<()> {
    if ctx.config.containers.is_empty() {
        ctx.output.warn("No containers configured. Run `cards config init` to create cards.toml.");
        return Ok(());
    }

    if let Some(ref only) = args.container {
        if ctx.config.container(only).is_none() {
            bail!("Unknown container '{}'", only);
        }
    }

    let base = ctx.base_dir();
    let page = Page::mount(ctx, Instant::now())?;

    let mut reports = Vec::new();
    for (container, (_, outcome)) in ctx.config.containers.iter().zip(&page.outcomes) {
        if let Some(ref only) = args.container {
            if container.name.as_str() != only {
                continue;
            }
        }

        let host = container.to_host(&base)?;
        let attributes = ContainerAttributes::read(&host);
        let viewport = attributes.viewport();
        let cards = container.card_count(&base)?;

        let (status, reason) = match outcome {
            Registration::Mounted(_) => ("mounted", None),
            Registration::Skipped(SkipReason::NotSlider) => ("static", None),
            Registration::Skipped(reason) => ("abstained", Some(reason.to_string())),
        };

        reports.push(ContainerReport {
            name: container.name.to_string(),
            slider: attributes.slider,
            items_per_view: viewport.items_per_view(),
            autoplay_interval_ms: viewport.autoplay_interval_ms(),
            cards,
            pages: cards.div_ceil(viewport.items_per_view()),
            slot_width_percent: viewport.slot_width_percent(),
            status,
            reason,
        });
    }

    if ctx.output.is_json() {
        ctx.output.json(&reports);
        return Ok(());
    }

    ctx.output.header("Containers");
    let widths = [22, 10, 6, 9, 6, 6, 8];
    ctx.output.table_row(
        &["NAME", "STATUS", "ITEMS", "INTERVAL", "CARDS", "PAGES", "SLOT"],
        &widths,
    );
    for report in &reports {
        let interval = if report.slider {
            format!("{}ms", report.autoplay_interval_ms)
        } else {
            "-".to_string()
        };
        ctx.output.table_row(
            &[
                &report.name,
                &status_badge(report.status),
                &report.items_per_view.to_string(),
                &interval,
                &report.cards.to_string(),
                &report.pages.to_string(),
                &format!("{:.2}%", report.slot_width_percent),
            ],
            &widths,
        );
        if let Some(ref reason) = report.reason {
            ctx.output.kv("reason", reason);
        }
    }

    Ok(())
}
