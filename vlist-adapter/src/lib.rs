//! Adapter utilities for the `vlist` crate.
//!
//! The `vlist` crate is UI-agnostic and focuses on the core math and state. This crate
//! provides the framework-neutral pieces that sit between a real scroll container and the
//! engine:
//!
//! - [`ViewportBridge`]: scroll/resize event delivery, the debounced scrolling flag, and
//!   a bind/unbind lifecycle with a synchronous initial read
//! - [`MeasurementCoordinator`]: reconciles rendered row elements' real sizes against the
//!   geometry cache, with scroll-position compensation for rows above the viewport
//!
//! This crate is intentionally framework-agnostic (no DOM/ratatui/egui bindings); the UI
//! layer implements the [`Viewport`] and [`RowElement`] traits.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod bridge;
mod error;
mod measure;

#[cfg(test)]
mod tests;

pub use bridge::{Viewport, ViewportBridge};
pub use error::MeasureError;
pub use measure::{MeasurementCoordinator, RowElement};
