#![forbid(unsafe_code)]

//! Core types for sheetnav.
//!
//! This crate provides:
//! - [`RouteKey`] / [`NavigationState`] for the declarative stack of routes
//! - [`Descriptor`] / [`DescriptorRegistry`] pairing each route with its
//!   [`Screen`] and [`SheetOptions`]
//! - [`NavAction`] and the [`Dispatch`] seam toward the navigation container
//! - [`Frame`] / [`Canvas`], a headless display list that sheets render into
//! - [`SheetError`], the crate-wide error type

pub mod action;
pub mod color;
pub mod descriptor;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod key;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod options;
pub mod state;

pub use action::{Dispatch, NavAction};
pub use color::Rgba;
pub use descriptor::{Descriptor, DescriptorRegistry, Screen};
pub use error::{Result, SheetError};
pub use frame::{Backdrop, Canvas, Frame, Layer, LayerKind};
pub use geometry::{Rect, Size};
pub use key::{ContainerId, RouteKey};
pub use options::{SheetOptions, SizeSpec};
pub use state::{NavigationState, Route};
