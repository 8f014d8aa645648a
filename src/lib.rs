//! Soft keyboard height detection for Android.
//!
//! A transparent, full-height overlay window is attached to the host
//! activity. Whenever the input method opens or closes, the overlay's
//! visible display frame shrinks or grows; this crate interprets those
//! deltas and reports the keyboard height per orientation.
//!
//! - `geometry` describes what the host platform measures
//! - `interpreter` classifies one measurement (pure, no state of its own)
//! - `provider` owns the cached heights and notifies a single observer
//! - `overlay` and `jni_bridge` connect all of the above to Kotlin/Java

mod config;
mod error;
mod geometry;
mod interpreter;
mod overlay;
mod provider;

pub mod jni_bridge;

pub use config::ProviderConfig;
pub use error::ProviderError;
pub use geometry::{
    GeometrySource, LayoutHandler, Orientation, OverlaySurface, Rect, SampledGeometry,
    ScreenMetrics, SubscriptionId,
};
pub use interpreter::{interpret, Classification, Interpretation, LayoutSample};
pub use overlay::{AndroidOverlay, JavaObserver};
pub use provider::{KeyboardHeightObserver, KeyboardHeightProvider, ProviderSnapshot, ProviderState};

/// Log target shared by every module in this crate.
pub(crate) const LOG_TARGET: &str = "keyboard_height";
