#![forbid(unsafe_code)]

//! sheetnav public facade crate.
//!
//! Stack-style presentation of bottom sheets: a navigation state lists which
//! sheets should be shown, and animated panels follow it in, out, and back
//! again. This crate re-exports the common types of the internal crates and
//! offers a prelude for day-to-day usage.

// --- Core re-exports -------------------------------------------------------

pub use sheetnav_core::{
    Backdrop, Canvas, ContainerId, Descriptor, DescriptorRegistry, Dispatch, Frame, Layer,
    LayerKind, NavAction, NavigationState, Rect, Result, Rgba, Route, RouteKey, Screen,
    SheetError, SheetOptions, Size, SizeSpec,
};

// --- Widget re-exports -----------------------------------------------------

pub use sheetnav_widgets::{
    BaseSurface, DismissOutcome, EventQueue, Panel, ReconcileReport, SheetAnimationConfig,
    SheetEasing, SheetEvent, SheetPhase, SheetView, StackReconciler, Widget,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use sheetnav_runtime::{
    ConfigError, ContainerHandle, NavigatorConfig, ScreenRegistry, SheetNavigator, StackRouter,
    TabPress, TabPressOutcome, TabResetTiming,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Canvas, Dispatch, Frame, NavAction, Result, RouteKey, Screen, SheetError, SheetOptions,
        SizeSpec,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{NavigatorConfig, ScreenRegistry, SheetNavigator, StackRouter, TabPress};

    pub use crate::{core, widgets};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use sheetnav_core as core;
#[cfg(feature = "runtime")]
pub use sheetnav_runtime as runtime;
pub use sheetnav_widgets as widgets;
