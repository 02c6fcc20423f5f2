//! In-memory work log state
//!
//! The state is a plain [`AppState`](tanklog_types::AppState) value. Every
//! change goes through [`reduce`], which takes the previous state by value and
//! returns the next one. Saved snapshots enter through [`normalize`].

mod legacy;
pub mod log_book;
pub mod normalize;
pub mod reducer;
pub mod reference;

pub use log_book::{ensure_work_log, find_work_log, has_log, logs_in_month, upsert_work_log};
pub use normalize::{normalize, normalize_value};
pub use reducer::{reduce, Action, LogEdit, Transition};
pub use reference::{add_driver, add_trailer, add_truck};
