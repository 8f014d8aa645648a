//! Keyboard height provider: owns the cached heights and the observer slot.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde::Serialize;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::geometry::{Orientation, OverlaySurface, SubscriptionId};
use crate::interpreter::{interpret, Classification, Interpretation, LayoutSample};
use crate::LOG_TARGET;

/// Receives one call per classified layout pass. `height == 0` means the
/// keyboard is hidden.
pub trait KeyboardHeightObserver {
    fn on_keyboard_height_changed(&self, height: i32, orientation: Orientation);
}

/// Mutable state carried between layout passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderState {
    pub keyboard_portrait_height: i32,
    pub keyboard_landscape_height: i32,
    pub navigation_bar_visible: bool,
}

impl ProviderState {
    pub fn cached_height(&self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Portrait => self.keyboard_portrait_height,
            Orientation::Landscape => self.keyboard_landscape_height,
        }
    }

    fn apply(&mut self, out: &Interpretation) {
        self.navigation_bar_visible = out.navigation_bar_visible;
        if let Classification::Keyboard { height } = out.classification {
            match out.orientation {
                Orientation::Portrait => self.keyboard_portrait_height = height,
                Orientation::Landscape => self.keyboard_landscape_height = height,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderSnapshot {
    pub keyboard_portrait_height: i32,
    pub keyboard_landscape_height: i32,
    pub navigation_bar_visible: bool,
    pub orientation: Orientation,
    pub observing: bool,
    pub closed: bool,
}

struct Inner {
    surface: Rc<dyn OverlaySurface>,
    config: ProviderConfig,
    state: Cell<ProviderState>,
    observer: RefCell<Option<Weak<dyn KeyboardHeightObserver>>>,
    subscription: Cell<Option<SubscriptionId>>,
    closed: Cell<bool>,
}

impl Inner {
    fn handle_layout_changed(&self) {
        if self.closed.get() {
            return;
        }

        let screen_height = self.surface.root_height();
        log::info!(target: LOG_TARGET, "screen height: {}", screen_height);

        let sample = LayoutSample {
            visible_frame: self.surface.visible_frame(),
            screen_height,
            status_bar_height: self.surface.status_bar_height(),
            navigation_bar_height: self.surface.navigation_bar_height(),
            orientation: self.surface.orientation(),
        };

        let mut state = self.state.get();
        let out = interpret(&sample, state.navigation_bar_visible, self.config.min_keyboard_height);
        state.apply(&out);
        self.state.set(state);

        log::debug!(
            target: LOG_TARGET,
            "layout {:?} -> {:?} ({:?}, nav bar visible: {})",
            sample.visible_frame,
            out.classification,
            out.orientation,
            out.navigation_bar_visible
        );

        self.notify(out.height(), out.orientation);
    }

    fn notify(&self, height: i32, orientation: Orientation) {
        // Upgrade first so no borrow is held while the observer runs; it may
        // call back into the provider.
        let observer = self.observer.borrow().as_ref().and_then(Weak::upgrade);
        if let Some(observer) = observer {
            observer.on_keyboard_height_changed(height, orientation);
        }
    }
}

/// Detects the soft keyboard height by watching an overlay surface.
///
/// Single-threaded: construct, drive and drop it on the UI thread that
/// delivers layout events.
pub struct KeyboardHeightProvider {
    inner: Rc<Inner>,
}

impl KeyboardHeightProvider {
    /// Subscribe to `surface` with the default config. Layout events are
    /// classified from here on, even before `start`.
    pub fn new(surface: Rc<dyn OverlaySurface>) -> Self {
        Self::build(surface, ProviderConfig::default())
    }

    pub fn with_config(
        surface: Rc<dyn OverlaySurface>,
        config: ProviderConfig,
    ) -> Result<Self, ProviderError> {
        config.validate()?;
        Ok(Self::build(surface, config))
    }

    fn build(surface: Rc<dyn OverlaySurface>, config: ProviderConfig) -> Self {
        let inner = Rc::new(Inner {
            surface,
            config,
            state: Cell::new(ProviderState::default()),
            observer: RefCell::new(None),
            subscription: Cell::new(None),
            closed: Cell::new(false),
        });

        let weak = Rc::downgrade(&inner);
        let id = inner.surface.subscribe(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.handle_layout_changed();
            }
        }));
        inner.subscription.set(Some(id));

        Self { inner }
    }

    /// Attach the overlay. Must be called once the host window has resumed;
    /// before that the call does nothing and the host is expected to call
    /// again later. No-op if already attached or closed.
    pub fn start(&self) -> Result<(), ProviderError> {
        let inner = &self.inner;
        if inner.closed.get() {
            log::debug!(target: LOG_TARGET, "start ignored: provider closed");
            return Ok(());
        }
        if inner.surface.is_attached() {
            return Ok(());
        }
        if !inner.surface.is_window_ready() {
            log::debug!(target: LOG_TARGET, "start ignored: host window not ready");
            return Ok(());
        }
        inner.surface.attach()
    }

    /// Drop the observer, stop listening and detach the overlay. Safe to
    /// call repeatedly.
    pub fn close(&self) {
        let inner = &self.inner;
        *inner.observer.borrow_mut() = None;
        if inner.closed.replace(true) {
            return;
        }
        if let Some(id) = inner.subscription.take() {
            inner.surface.unsubscribe(id);
        }
        if inner.surface.is_attached() {
            if let Err(err) = inner.surface.detach() {
                log::warn!(target: LOG_TARGET, "failed to detach overlay: {}", err);
            }
        }
    }

    /// Replace the observer. The provider only keeps a weak reference; pass
    /// `None` to clear it.
    pub fn set_observer(&self, observer: Option<Weak<dyn KeyboardHeightObserver>>) {
        *self.inner.observer.borrow_mut() = observer;
    }

    /// Run one classification pass against the surface's current geometry.
    pub fn handle_layout_changed(&self) {
        self.inner.handle_layout_changed();
    }

    /// Last keyboard height seen in `orientation`, 0 if none yet.
    pub fn cached_height(&self, orientation: Orientation) -> i32 {
        self.inner.state.get().cached_height(orientation)
    }

    pub fn keyboard_portrait_height(&self) -> i32 {
        self.cached_height(Orientation::Portrait)
    }

    pub fn keyboard_landscape_height(&self) -> i32 {
        self.cached_height(Orientation::Landscape)
    }

    pub fn screen_orientation(&self) -> Orientation {
        self.inner.surface.orientation()
    }

    pub fn is_navigation_bar_visible(&self) -> bool {
        self.inner.state.get().navigation_bar_visible
    }

    pub fn is_observing(&self) -> bool {
        !self.inner.closed.get() && self.inner.surface.is_attached()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }

    pub fn snapshot(&self) -> ProviderSnapshot {
        let state = self.inner.state.get();
        ProviderSnapshot {
            keyboard_portrait_height: state.keyboard_portrait_height,
            keyboard_landscape_height: state.keyboard_landscape_height,
            navigation_bar_visible: state.navigation_bar_visible,
            orientation: self.screen_orientation(),
            observing: self.is_observing(),
            closed: self.is_closed(),
        }
    }
}

impl Drop for KeyboardHeightProvider {
    fn drop(&mut self) {
        self.close();
    }
}
