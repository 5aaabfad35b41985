//! # tempo-render
//!
//! Pure rendering of the live time progress message.
//!
//! Nothing in this crate reads the clock: callers pass the instant to render,
//! already converted to the reference zone.
//!
//! ```
//! use chrono::{FixedOffset, TimeZone};
//! use tempo_render::render;
//!
//! let now = FixedOffset::east_opt(0).unwrap()
//!     .with_ymd_and_hms(2025, 7, 2, 12, 0, 59).unwrap();
//! let text = render(now);
//! assert!(text.contains("100% completed"));
//! ```

pub mod bar;
pub mod message;
pub mod progress;
pub mod quotes;

pub use bar::TextBar;
pub use message::{DEFAULT_UPDATE_INTERVAL_SECS, ProgressSnapshot, StatusRenderer, render};
pub use progress::{MonthInfo, format_percent};
pub use quotes::QUOTES;
