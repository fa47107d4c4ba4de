//! Markdown reports for token pull requests.
//!
//! - [`render_visual_report`] — per-file tables of changed tokens with color swatches
//! - [`render_removal_report`] — removed files and tokens as review checklists
//! - [`render_deprecation_report`] — deprecated folder layout warnings

pub mod checks;
pub mod swatch;
pub mod visual;

pub use checks::{render_deprecation_report, render_removal_report};
pub use swatch::{contrast_text_color, swatch, DEFAULT_TEXT_COLOR, SWATCH_ENDPOINT};
pub use visual::{render_file, render_row, render_visual_report, VISUAL_HEADING};
