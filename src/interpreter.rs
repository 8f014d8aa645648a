//! Layout-delta interpreter.
//!
//! Turns one visible-frame observation into a keyboard height. Rules are
//! evaluated in order and the first match wins:
//!
//! 1. frame reaches the bottom of the root: nothing is covering it
//! 2. frame plus the navigation bar reaches the bottom: only the nav bar
//! 3. the corrected delta is below the threshold: noise
//! 4. otherwise the corrected delta is the keyboard height
//!
//! The navigation bar correction in rule 3 uses the visibility decided by
//! an earlier observation, never the current one. That flag is passed in
//! and handed back so the interpreter itself stays stateless.

use crate::geometry::{Orientation, Rect};

/// Everything one classification cycle reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSample {
    pub visible_frame: Rect,
    pub screen_height: i32,
    pub status_bar_height: i32,
    pub navigation_bar_height: i32,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Rule 1.
    Unobstructed,
    /// Rule 2.
    NavigationBarOnly,
    /// Rule 3; `delta` is the rejected measurement (may be negative).
    Noise { delta: i32 },
    /// Rule 4.
    Keyboard { height: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interpretation {
    pub classification: Classification,
    /// Navigation bar visibility to carry into the next cycle.
    pub navigation_bar_visible: bool,
    pub orientation: Orientation,
}

impl Interpretation {
    /// Height to report: 0 for everything except a keyboard.
    pub fn height(&self) -> i32 {
        match self.classification {
            Classification::Keyboard { height } => height,
            _ => 0,
        }
    }
}

/// Classify `sample` given the navigation bar visibility from the previous
/// cycle.
pub fn interpret(
    sample: &LayoutSample,
    navigation_bar_visible: bool,
    min_keyboard_height: i32,
) -> Interpretation {
    let frame = sample.visible_frame;
    let done = |classification: Classification, navigation_bar_visible: bool| Interpretation {
        classification,
        navigation_bar_visible,
        orientation: sample.orientation,
    };

    if frame.bottom == sample.screen_height {
        return done(Classification::Unobstructed, false);
    }
    if frame.bottom.wrapping_add(sample.navigation_bar_height) == sample.screen_height {
        return done(Classification::NavigationBarOnly, true);
    }

    let delta = keyboard_delta(sample, navigation_bar_visible);
    if delta < min_keyboard_height {
        return done(Classification::Noise { delta }, false);
    }
    done(Classification::Keyboard { height: delta }, navigation_bar_visible)
}

// Host geometry is untrusted; all arithmetic wraps like Java `int`.
fn keyboard_delta(sample: &LayoutSample, navigation_bar_visible: bool) -> i32 {
    let mut delta = sample.screen_height.wrapping_sub(sample.visible_frame.height());
    if sample.status_bar_height > 0 {
        delta = delta.wrapping_sub(sample.status_bar_height);
    }
    if sample.navigation_bar_height > 0 && navigation_bar_visible {
        delta = delta.wrapping_sub(sample.navigation_bar_height);
    }
    delta
}
