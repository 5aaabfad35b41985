//! The live progress message.
//!
//! [`ProgressSnapshot::capture`] reads every field from a single instant so the
//! sections of one message can never disagree with each other, and
//! [`StatusRenderer`] turns a snapshot into the plain-text message body.

use chrono::{DateTime, FixedOffset, Timelike};

use crate::bar::TextBar;
use crate::progress::{
    MonthInfo, day_progress, format_percent, tick_progress, year_progress,
};
use crate::quotes::quote_for_minute;

/// Interval advertised in the message footer, in seconds.
pub const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 5;

const RULE: &str = "══════════════════════";

/// Every value shown in one progress message.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    /// The instant the snapshot was taken, in the reference zone
    pub at: DateTime<FixedOffset>,
    /// Year progress percentage
    pub year_percent: f64,
    /// Day progress percentage
    pub day_percent: f64,
    /// Sub-minute tick percentage
    pub tick_percent: f64,
    /// Month position
    pub month: MonthInfo,
    /// Quote of the minute
    pub quote: &'static str,
}

impl ProgressSnapshot {
    /// Compute a snapshot for one instant.
    pub fn capture(now: DateTime<FixedOffset>) -> Self {
        Self {
            year_percent: year_progress(&now),
            day_percent: day_progress(&now),
            tick_percent: tick_progress(&now),
            month: MonthInfo::at(&now),
            quote: quote_for_minute(now.minute()),
            at: now,
        }
    }
}

/// Formats snapshots into message text.
#[derive(Debug, Clone)]
pub struct StatusRenderer {
    bar: TextBar,
    update_interval_secs: u64,
}

impl Default for StatusRenderer {
    fn default() -> Self {
        Self {
            bar: TextBar::default(),
            update_interval_secs: DEFAULT_UPDATE_INTERVAL_SECS,
        }
    }
}

impl StatusRenderer {
    /// Create a renderer with the default bar and footer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the update interval advertised in the footer.
    pub fn with_update_interval(mut self, secs: u64) -> Self {
        self.update_interval_secs = secs;
        self
    }

    /// Render the message for an instant.
    pub fn render(&self, now: DateTime<FixedOffset>) -> String {
        self.render_snapshot(&ProgressSnapshot::capture(now))
    }

    /// Render a previously captured snapshot.
    pub fn render_snapshot(&self, snap: &ProgressSnapshot) -> String {
        let at = &snap.at;
        format!(
            "⏰ LIVE TIME PROGRESS ⏰\n\
             {RULE}\n\
             \n\
             📅 YEAR {year} PROGRESS\n\
             {year_bar}\n\
             {year_pct}% completed\n\
             \n\
             🌞 TODAY'S PROGRESS\n\
             {day_bar}\n\
             {day_pct}% completed\n\
             \n\
             ⏱️ SECOND PROGRESS\n\
             {tick_bar}\n\
             {tick_pct}% completed\n\
             \n\
             {RULE}\n\
             🗓️ MONTH INFORMATION\n\
             ├ Current Month: {month}\n\
             ├ Days Remaining: {days_left} days\n\
             └ Months Remaining: {months_left} months\n\
             \n\
             ⏰ CURRENT TIME\n\
             ├ Date: {date}\n\
             ├ Time: {time}\n\
             └ Second: {second}\n\
             {RULE}\n\
             💭 QUOTE OF THE MINUTE\n\
             {quote}\n\
             {RULE}\n\
             🔄 Updates every {interval} seconds",
            year = at.format("%Y"),
            year_bar = self.bar.render(snap.year_percent),
            year_pct = format_percent(snap.year_percent, 6),
            day_bar = self.bar.render(snap.day_percent),
            day_pct = format_percent(snap.day_percent, 6),
            tick_bar = self.bar.render(snap.tick_percent),
            tick_pct = format_percent(snap.tick_percent, 2),
            month = snap.month.name,
            days_left = snap.month.days_left,
            months_left = snap.month.months_left,
            date = at.format("%d %b %Y"),
            time = at.format("%I:%M:%S %p"),
            second = at.second(),
            quote = snap.quote,
            interval = self.update_interval_secs,
        )
    }
}

/// Render the progress message with the default renderer.
pub fn render(now: DateTime<FixedOffset>) -> String {
    StatusRenderer::default().render(now)
}
