//! devboard activity command implementation.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};

use crate::activity::{
    bucketize, compute_window, summarize, week_grid, ActivityRecord, ActivitySummary, DaySlot,
    IntensityScale, ViewportClass, Window,
};
use crate::api::ActivitySource;
use crate::cli::Context;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};

const LEVEL_GLYPHS: [char; 5] = ['·', '░', '▒', '▓', '█'];
const WEEKDAY_LABELS: [&str; 7] = ["Sun", "   ", "Tue", "   ", "Thu", "   ", "Sat"];

pub struct ActivityOptions {
    pub user: Option<String>,
    pub input: Option<PathBuf>,
    pub date: Option<String>,
    pub compact: bool,
    pub width: Option<u32>,
}

#[derive(serde::Serialize)]
struct ActivityReport {
    viewport: ViewportClass,
    window: Window,
    summary: ActivitySummary,
    days: Vec<DaySlot>,
}

pub(crate) async fn run(context: &Context, options: ActivityOptions) -> Result<()> {
    let reference = match options.date.as_deref() {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| Error::InvalidDate(raw.to_string()))?,
        None => Local::now().date_naive(),
    };
    let viewport = if options.compact {
        ViewportClass::Compact
    } else {
        options
            .width
            .map(ViewportClass::for_width)
            .unwrap_or(ViewportClass::Full)
    };

    let records = load_records(context, &options).await?;
    let window = compute_window(reference, viewport, context.config.activity.compact_days)?;
    let scale = IntensityScale::new(context.config.activity.thresholds.clone());
    let days = bucketize(&records, window, &scale);
    let summary = summarize(&days);

    let mut human = HumanOutput::new(format!(
        "devboard activity: {} to {}",
        window.start, window.end
    ));
    human.push_summary("contributions", summary.total.to_string());
    human.push_summary("active days", summary.active_days.to_string());
    human.push_summary("longest streak", summary.longest_streak.to_string());
    human.push_summary("current streak", summary.current_streak.to_string());
    human.push_block(render_grid(&days));

    emit_success(
        context.output,
        "activity",
        &ActivityReport {
            viewport,
            window,
            summary,
            days,
        },
        Some(&human),
    )
}

async fn load_records(context: &Context, options: &ActivityOptions) -> Result<Vec<ActivityRecord>> {
    if let Some(path) = &options.input {
        let content = std::fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&content)?);
    }
    let user = options.user.as_deref().ok_or_else(|| {
        Error::InvalidArgument("pass a user handle or --input <FILE>".to_string())
    })?;
    let client = context.client()?;
    client.activity(user).await
}

fn render_grid(days: &[DaySlot]) -> String {
    let weeks = week_grid(days);
    let mut rows = Vec::with_capacity(7);
    for (weekday, label) in WEEKDAY_LABELS.iter().enumerate() {
        let cells: String = weeks
            .iter()
            .map(|week| match &week[weekday] {
                Some(slot) => LEVEL_GLYPHS[usize::from(slot.level).min(LEVEL_GLYPHS.len() - 1)],
                None => ' ',
            })
            .collect();
        rows.push(format!("{label} {cells}"));
    }
    rows.join("\n")
}
