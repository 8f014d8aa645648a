//! End-to-end scenarios on a 1080x1920 portrait screen.

mod common;

use std::rc::Rc;

use common::{watch, FakeOverlay, Recorder, NAV_BAR, SCREEN_HEIGHT, STATUS_BAR};
use keyboard_height::{interpret, KeyboardHeightProvider, LayoutSample, Orientation, Rect};

#[test]
fn keyboard_open_close_cycle() {
    let overlay = FakeOverlay::ready();
    let provider = KeyboardHeightProvider::new(overlay.clone());
    let recorder = Rc::new(Recorder::default());
    watch(&provider, &recorder);
    provider.start().unwrap();

    overlay.layout(0, SCREEN_HEIGHT);
    overlay.layout(0, SCREEN_HEIGHT - NAV_BAR);
    overlay.layout(STATUS_BAR, 1370);
    overlay.layout(STATUS_BAR, 1810);
    overlay.layout(0, SCREEN_HEIGHT - NAV_BAR);

    assert_eq!(
        recorder.events(),
        vec![
            (0, Orientation::Portrait),
            (0, Orientation::Portrait),
            (500, Orientation::Portrait),
            (0, Orientation::Portrait),
            (0, Orientation::Portrait),
        ]
    );
    assert_eq!(provider.keyboard_portrait_height(), 500);
    assert!(provider.is_navigation_bar_visible());

    provider.close();
    overlay.layout(STATUS_BAR, 1370);
    assert_eq!(recorder.events().len(), 5);
}

#[test]
fn frame_reaching_screen_bottom_is_always_hidden() {
    for top in [0, 24, 300, 1000] {
        for prior in [false, true] {
            let sample = LayoutSample {
                visible_frame: Rect::new(top, SCREEN_HEIGHT, 0, 1080),
                screen_height: SCREEN_HEIGHT,
                status_bar_height: STATUS_BAR,
                navigation_bar_height: NAV_BAR,
                orientation: Orientation::Portrait,
            };
            let out = interpret(&sample, prior, 100);
            assert_eq!(out.height(), 0);
            assert!(!out.navigation_bar_visible);
        }
    }
}

#[test]
fn nav_bar_sized_gap_is_always_hidden() {
    for nav in [1, 48, 50, 126] {
        let sample = LayoutSample {
            visible_frame: Rect::new(0, SCREEN_HEIGHT - nav, 0, 1080),
            screen_height: SCREEN_HEIGHT,
            status_bar_height: STATUS_BAR,
            navigation_bar_height: nav,
            orientation: Orientation::Landscape,
        };
        let out = interpret(&sample, false, 100);
        assert_eq!(out.height(), 0);
        assert!(out.navigation_bar_visible);
    }
}

#[test]
fn reported_heights_are_zero_or_at_least_threshold() {
    let overlay = FakeOverlay::ready();
    let provider = KeyboardHeightProvider::new(overlay.clone());
    let recorder = Rc::new(Recorder::default());
    watch(&provider, &recorder);

    for bottom in (0..=SCREEN_HEIGHT).step_by(7) {
        overlay.layout(STATUS_BAR, bottom.max(STATUS_BAR));
    }
    for (height, _) in recorder.events() {
        assert!(height == 0 || height >= 100, "unexpected height {}", height);
    }
}
