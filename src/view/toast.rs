use gloo::timers::callback::Timeout;
use web_sys::HtmlElement;

use super::timer::TimerSlot;

/// Transient bottom-of-screen message. Showing a new message restarts the
/// dismiss timer.
pub struct Toast {
    el: HtmlElement,
    dismiss_ms: u32,
    timer: TimerSlot<Timeout>,
}

impl Toast {
    pub fn new(el: HtmlElement, dismiss_ms: u32) -> Self {
        Self {
            el,
            dismiss_ms,
            timer: TimerSlot::new(),
        }
    }

    pub fn show(&mut self, message: &str) {
        self.timer.cancel();
        self.el.set_text_content(Some(message));
        self.el.style().set_property("display", "block").ok();
        let el = self.el.clone();
        self.timer.replace(Timeout::new(self.dismiss_ms, move || {
            el.style().set_property("display", "none").ok();
        }));
    }
}
