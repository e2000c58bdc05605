//! vialeve-report: screening record persistence and output artifacts.

pub mod record;
pub mod summary;

pub use record::{export_answers, ScreeningRecord};
pub use summary::render_summary;
