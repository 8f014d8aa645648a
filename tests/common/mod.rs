#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use keyboard_height::{
    GeometrySource, KeyboardHeightObserver, LayoutHandler, Orientation, OverlaySurface,
    ProviderError, Rect, SampledGeometry, ScreenMetrics, SubscriptionId,
};

pub const SCREEN_HEIGHT: i32 = 1920;
pub const SCREEN_WIDTH: i32 = 1080;
pub const STATUS_BAR: i32 = 24;
pub const NAV_BAR: i32 = 50;

/// In-memory overlay: geometry is pushed by the test, the "window" is ready
/// only once the test says so.
#[derive(Default)]
pub struct FakeOverlay {
    pub geometry: SampledGeometry,
    pub window_ready: Cell<bool>,
    pub attached: Cell<bool>,
    pub attach_calls: Cell<u32>,
    pub detach_calls: Cell<u32>,
}

impl FakeOverlay {
    pub fn ready() -> Rc<Self> {
        let overlay = Rc::new(Self::default());
        overlay.window_ready.set(true);
        overlay
    }

    /// Push a portrait frame and fire the layout handlers.
    pub fn layout(&self, top: i32, bottom: i32) {
        self.geometry.update(portrait(top, bottom));
    }

    pub fn layout_landscape(&self, top: i32, bottom: i32) {
        self.geometry.update(ScreenMetrics {
            visible_frame: Rect::new(top, bottom, 0, SCREEN_HEIGHT),
            root_height: SCREEN_WIDTH,
            display_width: SCREEN_HEIGHT,
            display_height: SCREEN_WIDTH,
            status_bar_height: STATUS_BAR,
            navigation_bar_height: NAV_BAR,
        });
    }
}

pub fn portrait(top: i32, bottom: i32) -> ScreenMetrics {
    ScreenMetrics {
        visible_frame: Rect::new(top, bottom, 0, SCREEN_WIDTH),
        root_height: SCREEN_HEIGHT,
        display_width: SCREEN_WIDTH,
        display_height: SCREEN_HEIGHT,
        status_bar_height: STATUS_BAR,
        navigation_bar_height: NAV_BAR,
    }
}

impl GeometrySource for FakeOverlay {
    fn visible_frame(&self) -> Rect {
        self.geometry.visible_frame()
    }

    fn root_height(&self) -> i32 {
        self.geometry.root_height()
    }

    fn orientation(&self) -> Orientation {
        self.geometry.orientation()
    }

    fn status_bar_height(&self) -> i32 {
        self.geometry.status_bar_height()
    }

    fn navigation_bar_height(&self) -> i32 {
        self.geometry.navigation_bar_height()
    }

    fn subscribe(&self, handler: LayoutHandler) -> SubscriptionId {
        self.geometry.subscribe(handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.geometry.unsubscribe(id)
    }
}

impl OverlaySurface for FakeOverlay {
    fn is_window_ready(&self) -> bool {
        self.window_ready.get()
    }

    fn is_attached(&self) -> bool {
        self.attached.get()
    }

    fn attach(&self) -> Result<(), ProviderError> {
        self.attach_calls.set(self.attach_calls.get() + 1);
        self.attached.set(true);
        Ok(())
    }

    fn detach(&self) -> Result<(), ProviderError> {
        self.detach_calls.set(self.detach_calls.get() + 1);
        self.attached.set(false);
        Ok(())
    }
}

/// Records every notification.
#[derive(Default)]
pub struct Recorder {
    pub events: RefCell<Vec<(i32, Orientation)>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<(i32, Orientation)> {
        self.events.borrow().clone()
    }

    pub fn last(&self) -> Option<(i32, Orientation)> {
        self.events.borrow().last().copied()
    }
}

impl KeyboardHeightObserver for Recorder {
    fn on_keyboard_height_changed(&self, height: i32, orientation: Orientation) {
        self.events.borrow_mut().push((height, orientation));
    }
}

pub fn watch(provider: &keyboard_height::KeyboardHeightProvider, recorder: &Rc<Recorder>) {
    let observer: Rc<dyn KeyboardHeightObserver> = recorder.clone();
    let observer = Rc::downgrade(&observer);
    provider.set_observer(Some(observer));
}
