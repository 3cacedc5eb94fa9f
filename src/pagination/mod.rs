//! Pagination module
//!
//! # Overview
//!
//! PCO list endpoints return a page of objects plus a `links.next` URL while
//! more pages remain. `PageSequencer` hides that: it yields objects one at a
//! time, fetching the next page only when the current one is used up.

mod sequencer;
mod types;

pub use sequencer::PageSequencer;
pub use types::{next_link, IterateOptions, Page, Record, DEFAULT_PER_PAGE};
