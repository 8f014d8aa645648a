//! JNI-backed collaborators.
//!
//! The Kotlin side owns the actual `PopupWindow` (transparent, zero width,
//! `MATCH_PARENT` height, `SOFT_INPUT_ADJUST_RESIZE`) and its global layout
//! listener. It pushes every measurement into `AndroidOverlay`, and answers
//! the few lifecycle questions the provider asks:
//!
//! - `isWindowReady()Z` – parent view has a window token
//! - `isShowing()Z`
//! - `showOverlay()V` / `dismissOverlay()V`

use jni::objects::{GlobalRef, JObject, JValue};
use jni::{JNIEnv, JavaVM};

use crate::error::ProviderError;
use crate::geometry::{
    GeometrySource, LayoutHandler, Orientation, OverlaySurface, Rect, SampledGeometry,
    ScreenMetrics, SubscriptionId,
};
use crate::provider::KeyboardHeightObserver;
use crate::LOG_TARGET;

/// Clear a pending Java exception so the next JNI call is legal.
fn check<T>(env: &mut JNIEnv, result: jni::errors::Result<T>) -> Result<T, ProviderError> {
    if result.is_err() && env.exception_check().unwrap_or(false) {
        if let Err(err) = env.exception_describe() {
            log::warn!(target: LOG_TARGET, "could not describe pending exception: {}", err);
        }
        if let Err(err) = env.exception_clear() {
            log::warn!(target: LOG_TARGET, "could not clear pending exception: {}", err);
        }
    }
    Ok(result?)
}

pub struct AndroidOverlay {
    vm: JavaVM,
    host: GlobalRef,
    geometry: SampledGeometry,
}

impl AndroidOverlay {
    pub fn new(env: &mut JNIEnv, host: &JObject) -> Result<Self, ProviderError> {
        if host.is_null() {
            return Err(ProviderError::MissingOverlayHost);
        }
        Ok(Self {
            vm: env.get_java_vm()?,
            host: env.new_global_ref(host)?,
            geometry: SampledGeometry::default(),
        })
    }

    /// Called from the host's global layout listener.
    pub fn push_metrics(&self, metrics: ScreenMetrics) {
        self.geometry.update(metrics);
    }

    fn call_bool(&self, name: &str) -> Result<bool, ProviderError> {
        let mut env = self.vm.get_env()?;
        let result = env.call_method(&self.host, name, "()Z", &[]);
        let value = check(&mut env, result)?;
        Ok(value.z()?)
    }

    fn call_void(&self, name: &str) -> Result<(), ProviderError> {
        let mut env = self.vm.get_env()?;
        let result = env.call_method(&self.host, name, "()V", &[]);
        check(&mut env, result)?.v()?;
        Ok(())
    }
}

impl GeometrySource for AndroidOverlay {
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

impl OverlaySurface for AndroidOverlay {
    fn is_window_ready(&self) -> bool {
        self.call_bool("isWindowReady").unwrap_or_else(|err| {
            log::warn!(target: LOG_TARGET, "isWindowReady failed: {}", err);
            false
        })
    }

    fn is_attached(&self) -> bool {
        self.call_bool("isShowing").unwrap_or_else(|err| {
            log::warn!(target: LOG_TARGET, "isShowing failed: {}", err);
            false
        })
    }

    fn attach(&self) -> Result<(), ProviderError> {
        self.call_void("showOverlay")
    }

    fn detach(&self) -> Result<(), ProviderError> {
        self.call_void("dismissOverlay")
    }
}

/// Forwards notifications to a Java object exposing
/// `onKeyboardHeightChanged(int height, int orientation)`.
pub struct JavaObserver {
    vm: JavaVM,
    target: GlobalRef,
}

impl JavaObserver {
    pub fn new(env: &mut JNIEnv, target: &JObject) -> Result<Self, ProviderError> {
        Ok(Self {
            vm: env.get_java_vm()?,
            target: env.new_global_ref(target)?,
        })
    }

    fn call(&self, height: i32, orientation: Orientation) -> Result<(), ProviderError> {
        let mut env = self.vm.get_env()?;
        let result = env.call_method(
            &self.target,
            "onKeyboardHeightChanged",
            "(II)V",
            &[JValue::Int(height), JValue::Int(orientation.to_android())],
        );
        check(&mut env, result)?.v()?;
        Ok(())
    }
}

impl KeyboardHeightObserver for JavaObserver {
    fn on_keyboard_height_changed(&self, height: i32, orientation: Orientation) {
        if let Err(err) = self.call(height, orientation) {
            log::warn!(target: LOG_TARGET, "observer callback failed: {}", err);
        }
    }
}
