#![forbid(unsafe_code)]

//! Runtime for sheetnav: the stack router that owns navigation state, the
//! frame loop that keeps animated sheets in step with it, tab-press resets,
//! and configuration loading.
//!
//! # Example
//!
//! ```ignore
//! use sheetnav_runtime::{ScreenRegistry, SheetNavigator, StackRouter};
//!
//! let registry = ScreenRegistry::new()
//!     .screen("home", home_screen)
//!     .screen("detail", detail_screen);
//! let router = StackRouter::new("root", registry, "home")?;
//! let mut navigator = SheetNavigator::new(router);
//!
//! navigator.push("detail")?;
//! loop {
//!     let frame = navigator.frame(Duration::from_millis(16));
//!     draw(&frame);
//! }
//! ```

pub mod config;
pub mod handle;
pub mod navigator;
pub mod router;
pub mod tab;

pub use config::{AnimationPolicy, ConfigError, Easing, NavigatorConfig};
pub use handle::ContainerHandle;
pub use navigator::SheetNavigator;
pub use router::{ScreenRegistry, StackRouter};
pub use tab::{TabPress, TabPressOutcome, TabResetSkip, TabResetTiming};
