//! Timer-driven debouncer for JavaScript callbacks.
//!
//! Wraps the core [`Debouncer`] with a `setTimeout` handle it owns. Each
//! `trigger` clears the pending timer and schedules a new one, so only the
//! last value pushed within the window reaches the callback.
//!
//! # Example
//!
//! ```typescript
//! import { JsDebouncer } from '@imgpress/wasm';
//!
//! const debounced = new JsDebouncer(100, (percent) => compressor.compress(percent));
//! slider.addEventListener('input', (e) => debounced.trigger(Number(e.target.value)));
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use imgpress_core::Debouncer;
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

struct Inner {
    debouncer: Debouncer<JsValue>,
    callback: js_sys::Function,
    timer: Option<i32>,
    tick: Option<Closure<dyn FnMut()>>,
}

impl Inner {
    fn schedule(&mut self, wait_ms: u64) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
        if let Some(id) = self.timer.take() {
            window.clear_timeout_with_handle(id);
        }

        let tick = self
            .tick
            .as_ref()
            .ok_or_else(|| JsValue::from_str("Debouncer timer callback missing"))?;
        let wait = i32::try_from(wait_ms).unwrap_or(i32::MAX);
        let id = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            wait,
        )?;
        self.timer = Some(id);
        Ok(())
    }

    fn clear_timer(&mut self) {
        if let (Some(id), Some(window)) = (self.timer.take(), web_sys::window()) {
            window.clear_timeout_with_handle(id);
        }
    }
}

fn fire(inner: &Rc<RefCell<Inner>>) {
    let now = now_ms();
    let mut state = inner.borrow_mut();
    state.timer = None;

    match state.debouncer.poll(now) {
        Some(value) => {
            let callback = state.callback.clone();
            // The callback may trigger again; release the borrow first
            drop(state);
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                warn!("debounced callback failed: {e:?}");
            }
        }
        None => {
            // Timer fired before the window closed on our clock
            if let Some(deadline) = state.debouncer.deadline_ms() {
                if let Err(e) = state.schedule(deadline.saturating_sub(now)) {
                    warn!("failed to reschedule debounce timer: {e:?}");
                }
            }
        }
    }
}

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Debounces a JavaScript callback by a fixed delay.
#[wasm_bindgen]
pub struct JsDebouncer {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl JsDebouncer {
    /// Create a debouncer calling `callback(value)` once `delay_ms` has
    /// passed without another `trigger`.
    #[wasm_bindgen(constructor)]
    pub fn new(delay_ms: u32, callback: js_sys::Function) -> JsDebouncer {
        let inner = Rc::new(RefCell::new(Inner {
            debouncer: Debouncer::new(u64::from(delay_ms)),
            callback,
            timer: None,
            tick: None,
        }));

        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&inner);
        let tick = Closure::<dyn FnMut()>::new(move || {
            if let Some(inner) = weak.upgrade() {
                fire(&inner);
            }
        });
        inner.borrow_mut().tick = Some(tick);

        JsDebouncer { inner }
    }

    /// Replace the pending value and restart the window.
    pub fn trigger(&self, value: JsValue) -> Result<(), JsValue> {
        let mut state = self.inner.borrow_mut();
        let delay = state.debouncer.delay_ms();
        state.debouncer.push(value, now_ms());
        state.schedule(delay)
    }

    /// Drop the pending value and clear the timer.
    pub fn cancel(&self) {
        let mut state = self.inner.borrow_mut();
        state.debouncer.cancel();
        state.clear_timer();
    }

    /// Whether a value is waiting for its window to close.
    #[wasm_bindgen(getter)]
    pub fn pending(&self) -> bool {
        self.inner.borrow().debouncer.is_pending()
    }

    #[wasm_bindgen(getter)]
    pub fn delay_ms(&self) -> u32 {
        u32::try_from(self.inner.borrow().debouncer.delay_ms()).unwrap_or(u32::MAX)
    }
}

impl Drop for JsDebouncer {
    fn drop(&mut self) {
        if let Ok(mut state) = self.inner.try_borrow_mut() {
            state.clear_timer();
        }
    }
}
