//! A headless vertical list virtualizer.
//!
//! Given a large ordered collection and a scrollable viewport, this crate computes the
//! minimal contiguous subset of rows that must be rendered, their vertical offsets, and
//! the total scrollable height, without materializing off-screen rows.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - the viewport height and scroll offset (as events)
//! - a stable per-item key for measurement caching
//! - either a fixed per-index height or an estimate plus dynamic measurements
//!
//! For the viewport bridge and measurement coordinator (the pieces that talk to live
//! scroll containers and rendered row elements), see the `vlist-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod cache;
mod error;
mod layout;
mod options;
mod state;
mod types;
mod virtualizer;


pub use cache::HeightCache;
pub use error::ConfigError;
pub use options::{HeightFn, KeyFn, ListOptions, OnChangeCallback};
pub use state::ViewportState;
pub use types::{Align, ItemKey, Row, RowKey, RowRange};
pub use virtualizer::Virtualizer;
