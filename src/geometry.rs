//! Screen geometry as measured by the host platform.
//!
//! The provider never measures anything itself. It asks a `GeometrySource`
//! for the overlay's visible frame and the system bar sizes, and it learns
//! about changes by subscribing a handler that the source calls synchronously.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;

use crate::error::ProviderError;

/// Android `Configuration.ORIENTATION_PORTRAIT`.
pub const ANDROID_ORIENTATION_PORTRAIT: i32 = 1;
/// Android `Configuration.ORIENTATION_LANDSCAPE`.
pub const ANDROID_ORIENTATION_LANDSCAPE: i32 = 2;

/// A visible-frame rectangle in window pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Rect {
    pub fn new(top: i32, bottom: i32, left: i32, right: i32) -> Self {
        Self { top, bottom, left, right }
    }

    /// Wraps on overflow, like the Java `int` it mirrors.
    pub fn height(&self) -> i32 {
        self.bottom.wrapping_sub(self.top)
    }

    pub fn width(&self) -> i32 {
        self.right.wrapping_sub(self.left)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Portrait only when the display is strictly taller than wide.
    pub fn from_display_size(width: i32, height: i32) -> Self {
        if width < height {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    pub fn to_android(self) -> i32 {
        match self {
            Orientation::Portrait => ANDROID_ORIENTATION_PORTRAIT,
            Orientation::Landscape => ANDROID_ORIENTATION_LANDSCAPE,
        }
    }

    pub fn from_android(value: i32) -> Result<Self, ProviderError> {
        match value {
            ANDROID_ORIENTATION_PORTRAIT => Ok(Orientation::Portrait),
            ANDROID_ORIENTATION_LANDSCAPE => Ok(Orientation::Landscape),
            other => Err(ProviderError::UnknownOrientation(other)),
        }
    }
}

/// Identifies one registered layout handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Called on every potential visible-frame change.
pub type LayoutHandler = Rc<dyn Fn()>;

/// Read side of the host's window geometry.
///
/// All methods take `&self`; implementations keep their mutable parts in
/// cells and must not hold a borrow while invoking handlers, because
/// handlers query the source again.
pub trait GeometrySource {
    /// Visible display frame of the overlay surface.
    fn visible_frame(&self) -> Rect;
    /// Full height of the root window.
    fn root_height(&self) -> i32;
    fn orientation(&self) -> Orientation;
    /// 0 when the platform does not report one.
    fn status_bar_height(&self) -> i32;
    /// 0 when the platform does not report one.
    fn navigation_bar_height(&self) -> i32;

    fn subscribe(&self, handler: LayoutHandler) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);
}

/// The overlay window the geometry is read from.
pub trait OverlaySurface: GeometrySource {
    /// Whether the host window can accept an overlay yet (it has a window
    /// token, i.e. the activity has resumed).
    fn is_window_ready(&self) -> bool;
    fn is_attached(&self) -> bool;
    fn attach(&self) -> Result<(), ProviderError>;
    fn detach(&self) -> Result<(), ProviderError>;
}

/// One measurement pushed by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenMetrics {
    pub visible_frame: Rect,
    pub root_height: i32,
    pub display_width: i32,
    pub display_height: i32,
    pub status_bar_height: i32,
    pub navigation_bar_height: i32,
}

impl ScreenMetrics {
    pub fn orientation(&self) -> Orientation {
        Orientation::from_display_size(self.display_width, self.display_height)
    }
}

/// A `GeometrySource` fed by the host: every `update` replaces the stored
/// metrics and then notifies subscribers in registration order.
#[derive(Default)]
pub struct SampledGeometry {
    metrics: Cell<ScreenMetrics>,
    handlers: RefCell<Vec<(SubscriptionId, LayoutHandler)>>,
    next_id: Cell<u64>,
}

impl SampledGeometry {
    pub fn new(metrics: ScreenMetrics) -> Self {
        Self {
            metrics: Cell::new(metrics),
            ..Self::default()
        }
    }

    /// Store `metrics` and fire every handler once.
    pub fn update(&self, metrics: ScreenMetrics) {
        self.metrics.set(metrics);
        let handlers: Vec<(SubscriptionId, LayoutHandler)> = self.handlers.borrow().clone();
        for (id, handler) in handlers {
            // A handler may unsubscribe another one mid-dispatch.
            if self.is_subscribed(id) {
                handler();
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.handlers.borrow().iter().any(|(h, _)| *h == id)
    }
}

impl GeometrySource for SampledGeometry {
    fn visible_frame(&self) -> Rect {
        self.metrics.get().visible_frame
    }

    fn root_height(&self) -> i32 {
        self.metrics.get().root_height
    }

    fn orientation(&self) -> Orientation {
        self.metrics.get().orientation()
    }

    fn status_bar_height(&self) -> i32 {
        self.metrics.get().status_bar_height.max(0)
    }

    fn navigation_bar_height(&self) -> i32 {
        self.metrics.get().navigation_bar_height.max(0)
    }

    fn subscribe(&self, handler: LayoutHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.handlers.borrow_mut().retain(|(h, _)| *h != id);
    }
}
