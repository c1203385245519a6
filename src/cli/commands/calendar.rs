//! Month grid command handler

use std::fmt::Write;

use crate::calendar::{MonthView, YearMonth, weekday_names};
use crate::config::Config;
use crate::dates::{format_date, today};
use crate::services::SeriesService;
use chrono::Datelike;

const CELL_WIDTH: usize = 6;

pub async fn cmd_calendar(
    config: &Config,
    year: Option<i32>,
    month: Option<u32>,
) -> anyhow::Result<()> {
    let now = today();
    let current = YearMonth::of(now);
    let month = YearMonth::new(
        year.unwrap_or_else(|| current.year()),
        month.unwrap_or_else(|| current.month()),
    )?;

    let service = super::open_service(config);
    let view = service.month_view(month, now).await?;

    print!("{}", render_month(&view));
    Ok(())
}

fn event_marker(count: usize) -> String {
    match count {
        0 => "  ".to_string(),
        1..=9 => format!("*{count}"),
        _ => "*+".to_string(),
    }
}

/// Renders the grid followed by the releases of the displayed month.
fn render_month(view: &MonthView) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", view.month);
    for name in weekday_names() {
        let _ = write!(out, "{name:<CELL_WIDTH$}");
    }
    out.push('\n');

    for week in view.weeks() {
        for cell in week {
            let day = if !cell.in_month {
                "  · ".to_string()
            } else if cell.is_today {
                format!("[{:>2}]", cell.date.day())
            } else {
                format!(" {:>2} ", cell.date.day())
            };
            let _ = write!(out, "{day}{}", event_marker(cell.events.len()));
        }
        out.push('\n');
    }

    let releases: Vec<_> = view
        .cells
        .iter()
        .filter(|cell| cell.in_month)
        .flat_map(|cell| cell.events.iter())
        .collect();

    if !releases.is_empty() {
        out.push('\n');
        for event in releases {
            let mark = if event.is_watched() { "✓" } else { " " };
            let _ = writeln!(
                out,
                "{} [{}] {} {}",
                format_date(event.date),
                mark,
                event.label(),
                event.episode_code()
            );
        }
    }

    out
}
