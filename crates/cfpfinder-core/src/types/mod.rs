//! Domain types for the conference agenda.
//!
//! - [`Timestamp`]: absolute instant, seconds since the Unix epoch
//! - [`DateSpan`]: inclusive `beginning`/`end` pair of instants
//! - [`Conference`]: one parsed agenda entry
//! - [`CfpWindow`]: call-for-papers link with an optional deadline

mod conference;
mod timestamp;

pub use conference::{CfpWindow, Conference, DateSpan};
pub use timestamp::Timestamp;
