//! JNI exports for `dev.keyboardheight.NativeBridge`.
//!
//! Kotlin keeps an opaque `long` handle returned by `nativeCreate` and
//! passes it to every other call. All calls must come from the UI thread
//! that owns the overlay window.
//!
//! Java may re-enter any export (including `nativeDestroy`) from a
//! callback, so no reference into the handle is held across a call that
//! can reach Java: the needed `Rc` is cloned out first.

use std::cell::RefCell;
use std::rc::Rc;

use jni::objects::{JClass, JObject, JString};
use jni::sys::{jint, jlong, jstring};
use jni::JNIEnv;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::geometry::{Orientation, Rect, ScreenMetrics};
use crate::overlay::{AndroidOverlay, JavaObserver};
use crate::provider::{KeyboardHeightObserver, KeyboardHeightProvider};
use crate::LOG_TARGET;

// ── Handle state ────────────────────────────────────────────────

struct NativeProvider {
    provider: Rc<KeyboardHeightProvider>,
    overlay: Rc<AndroidOverlay>,
    /// Strong side of the observer; the provider only holds a weak ref.
    observer: RefCell<Option<Rc<dyn KeyboardHeightObserver>>>,
}

fn create(
    env: &mut JNIEnv,
    host: &JObject,
    config_json: &JString,
) -> Result<NativeProvider, ProviderError> {
    let config = if config_json.is_null() {
        ProviderConfig::default()
    } else {
        let json: String = env.get_string(config_json)?.into();
        ProviderConfig::from_json(&json)?
    };
    let overlay = Rc::new(AndroidOverlay::new(env, host)?);
    let provider = KeyboardHeightProvider::with_config(overlay.clone(), config)?;
    Ok(NativeProvider {
        provider: Rc::new(provider),
        overlay,
        observer: RefCell::new(None),
    })
}

/// Run `f` against the handle, or return `default` for a null handle.
/// `f` must not call into Java.
fn with_native<R>(handle: jlong, default: R, f: impl FnOnce(&NativeProvider) -> R) -> R {
    if handle == 0 {
        return default;
    }
    // Safety: non-zero handles come from nativeCreate and are only used on
    // the UI thread until nativeDestroy; the borrow ends before `f` returns.
    let native = unsafe { &*(handle as *const NativeProvider) };
    f(native)
}

fn provider_of(handle: jlong) -> Option<Rc<KeyboardHeightProvider>> {
    with_native(handle, None, |native| Some(native.provider.clone()))
}

fn exception_class(err: &ProviderError) -> &'static str {
    match err {
        ProviderError::MissingOverlayHost
        | ProviderError::InvalidConfig(_)
        | ProviderError::Json(_)
        | ProviderError::UnknownOrientation(_) => "java/lang/IllegalArgumentException",
        ProviderError::Jni(_) => "java/lang/IllegalStateException",
    }
}

fn throw(env: &mut JNIEnv, err: &ProviderError) {
    // A Java exception raised inside a JNI call is already pending.
    if env.exception_check().unwrap_or(false) {
        return;
    }
    if env.throw_new(exception_class(err), err.to_string()).is_err() {
        log::warn!(target: LOG_TARGET, "could not throw for: {}", err);
    }
}

// ── JNI Exports ─────────────────────────────────────────────────

#[no_mangle]
pub extern "system" fn Java_dev_keyboardheight_NativeBridge_nativeCreate<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    host: JObject<'local>,
    config_json: JString<'local>,
) -> jlong {
    match create(&mut env, &host, &config_json) {
        Ok(native) => Box::into_raw(Box::new(native)) as jlong,
        Err(err) => {
            throw(&mut env, &err);
            0
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_dev_keyboardheight_NativeBridge_nativeStart(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    let Some(provider) = provider_of(handle) else {
        return;
    };
    if let Err(err) = provider.start() {
        log::warn!(target: LOG_TARGET, "start failed: {}", err);
        throw(&mut env, &err);
    }
}

#[no_mangle]
pub extern "system" fn Java_dev_keyboardheight_NativeBridge_nativeClose(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    let Some(provider) = provider_of(handle) else {
        return;
    };
    // Taken before `close` reaches Java, which may destroy the handle.
    let observer = with_native(handle, None, |native| native.observer.borrow_mut().take());
    provider.close();
    drop(observer);
}

#[no_mangle]
pub extern "system" fn Java_dev_keyboardheight_NativeBridge_nativeDestroy(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    if handle == 0 {
        return;
    }
    // Safety: the handle came from nativeCreate and is not used again.
    let native = unsafe { Box::from_raw(handle as *mut NativeProvider) };
    native.provider.close();
}

#[no_mangle]
pub extern "system" fn Java_dev_keyboardheight_NativeBridge_nativeSetObserver<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    observer: JObject<'local>,
) {
    if handle == 0 {
        return;
    }
    let java: Option<Rc<dyn KeyboardHeightObserver>> = if observer.is_null() {
        None
    } else {
        match JavaObserver::new(&mut env, &observer) {
            Ok(java) => {
                let java: Rc<dyn KeyboardHeightObserver> = Rc::new(java);
                Some(java)
            }
            Err(err) => {
                log::warn!(target: LOG_TARGET, "could not register observer: {}", err);
                return;
            }
        }
    };
    let previous = with_native(handle, None, |native| {
        native.provider.set_observer(java.as_ref().map(Rc::downgrade));
        native.observer.replace(java)
    });
    drop(previous);
}

#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub extern "system" fn Java_dev_keyboardheight_NativeBridge_nativeOnGlobalLayout(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    top: jint,
    bottom: jint,
    left: jint,
    right: jint,
    root_height: jint,
    display_width: jint,
    display_height: jint,
    status_bar_height: jint,
    navigation_bar_height: jint,
) {
    // Pushing notifies the Java observer, so hold our own reference.
    let Some(overlay) = with_native(handle, None, |native| Some(native.overlay.clone())) else {
        return;
    };
    overlay.push_metrics(ScreenMetrics {
        visible_frame: Rect::new(top, bottom, left, right),
        root_height,
        display_width,
        display_height,
        status_bar_height,
        navigation_bar_height,
    });
}

#[no_mangle]
pub extern "system" fn Java_dev_keyboardheight_NativeBridge_nativeGetCachedHeight(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    orientation: jint,
) -> jint {
    with_native(handle, 0, |native| match Orientation::from_android(orientation) {
        Ok(orientation) => native.provider.cached_height(orientation),
        Err(err) => {
            log::warn!(target: LOG_TARGET, "{}", err);
            0
        }
    })
}

#[no_mangle]
pub extern "system" fn Java_dev_keyboardheight_NativeBridge_nativeGetKeyboardPortraitHeight(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jint {
    with_native(handle, 0, |native| native.provider.keyboard_portrait_height())
}

#[no_mangle]
pub extern "system" fn Java_dev_keyboardheight_NativeBridge_nativeGetKeyboardLandscapeHeight(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jint {
    with_native(handle, 0, |native| native.provider.keyboard_landscape_height())
}

#[no_mangle]
pub extern "system" fn Java_dev_keyboardheight_NativeBridge_nativeGetScreenOrientation(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jint {
    with_native(handle, 0, |native| native.provider.screen_orientation().to_android())
}

#[no_mangle]
pub extern "system" fn Java_dev_keyboardheight_NativeBridge_nativeSnapshotJson<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
) -> jstring {
    // `snapshot` asks the host whether the overlay is showing.
    let json = match provider_of(handle) {
        Some(provider) => {
            serde_json::to_string(&provider.snapshot()).unwrap_or_else(|_| "null".to_string())
        }
        None => "null".to_string(),
    };
    env.new_string(&json)
        .map(|s| s.into_raw())
        .unwrap_or(std::ptr::null_mut())
}
