//! Browser front end (web-sys DOM).
//!
//! Builds (or reuses) the page elements, forwards clicks to the
//! [`GameSession`], and re-renders from the events each action returns. The
//! session is owned by one `Rc<RefCell<WebApp>>` shared with the listeners;
//! there is no global game state.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, FocusEvent, HtmlButtonElement, HtmlElement, HtmlInputElement, MouseEvent,
    Node, window,
};

use crate::catalog::LevelCatalog;
use crate::config::GameConfig;
use crate::engine::{EngineEvent, PuzzleState};
use crate::game::{GameSession, WinHeadline};

pub mod logger;
mod storage;
mod timer;
mod toast;

pub use storage::LocalStorageStore;
pub use timer::TimerSlot;

use toast::Toast;

type AppHandle = Rc<RefCell<WebApp>>;

/// Elements of one rendered cup.
struct CupDom {
    root: HtmlElement,
    water: HtmlElement,
    label: HtmlElement,
}

/// Every element the game touches, looked up or created once at startup.
struct Dom {
    level_title: HtmlElement,
    target: HtmlElement,
    steps: HtmlElement,
    optimal: HtmlElement,
    cups_container: HtmlElement,
    fill_btn: HtmlButtonElement,
    empty_btn: HtmlButtonElement,
    reset_btn: HtmlButtonElement,
    custom_inputs: [HtmlInputElement; 3],
    start_custom_btn: HtmlButtonElement,
    win_modal: HtmlElement,
    win_title: HtmlElement,
    final_steps: HtmlElement,
    win_optimal: HtmlElement,
    replay_btn: HtmlButtonElement,
    next_level_btn: HtmlButtonElement,
    toast: HtmlElement,
}

struct WebApp {
    session: GameSession<LocalStorageStore>,
    dom: Dom,
    cups: Vec<CupDom>,
    toast: Toast,
    win_timer: TimerSlot<Timeout>,
}

/// Builds the page and loads the saved (or first) level.
pub fn start_game() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let config = GameConfig::default();
    let dom = Dom::build(&doc, &config)?;
    let toast = Toast::new(dom.toast.clone(), config.toast_dismiss_ms);
    let session = GameSession::new(LevelCatalog::embedded(), LocalStorageStore::new(), config);

    let app: AppHandle = Rc::new(RefCell::new(WebApp {
        session,
        dom,
        cups: Vec::new(),
        toast,
        win_timer: TimerSlot::new(),
    }));

    install_listeners(&app)?;
    app.borrow_mut().build_level_view(&doc)?;
    let state = app.borrow().session.state().clone();
    app.borrow().render_state(&state);
    Ok(())
}

// Looks up `id`, or creates it under `parent`. Text and style are applied only
// to freshly created elements so a hand-written page keeps its own markup.
fn ensure<T: JsCast>(doc: &Document, parent: &Node, tag: &str, id: &str, text: &str, style: &str) -> Result<T, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el.dyn_into::<T>()?);
    }
    let el = doc.create_element(tag)?;
    el.set_id(id);
    if !text.is_empty() {
        el.set_text_content(Some(text));
    }
    if !style.is_empty() {
        el.set_attribute("style", style)?;
    }
    parent.append_child(&el)?;
    Ok(el.dyn_into::<T>()?)
}

const BUTTON_STYLE: &str = "margin:4px; padding:6px 14px; font-size:15px; border-radius:6px; border:1px solid #333; background:#2b6cb0; color:#fff; cursor:pointer;";

impl Dom {
    fn build(doc: &Document, config: &GameConfig) -> Result<Self, JsValue> {
        let body: Node = doc
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .into();
        let root: HtmlElement = ensure(doc, &body, "div", "wp-root", "", "font-family:sans-serif; max-width:720px; margin:0 auto; text-align:center; color:#222;")?;

        let level_title = ensure(doc, &root, "h2", "wp-level-title", "", "")?;
        let stats: HtmlElement = ensure(doc, &root, "div", "wp-stats", "", "display:flex; gap:18px; justify-content:center; font-size:16px;")?;
        let target = ensure(doc, &stats, "span", "wp-target", "", "")?;
        let steps = ensure(doc, &stats, "span", "wp-steps", "", "")?;
        let optimal = ensure(doc, &stats, "span", "wp-optimal", "", "")?;

        let cups_container = ensure(doc, &root, "div", "wp-cups", "", "display:flex; gap:28px; justify-content:center; align-items:flex-end; min-height:260px; margin:24px 0;")?;

        let controls: HtmlElement = ensure(doc, &root, "div", "wp-controls", "", "")?;
        let fill_btn = ensure(doc, &controls, "button", "wp-fill", "Fill", BUTTON_STYLE)?;
        let empty_btn = ensure(doc, &controls, "button", "wp-empty", "Empty", BUTTON_STYLE)?;
        let reset_btn = ensure(doc, &controls, "button", "wp-reset", "Reset", BUTTON_STYLE)?;

        let custom: HtmlElement = ensure(doc, &root, "div", "wp-custom", "Custom: ", "margin-top:18px;")?;
        let input_style = "width:56px; margin:4px; padding:4px; font-size:15px;";
        let custom_inputs: [HtmlInputElement; 3] = [
            ensure(doc, &custom, "input", "wp-custom-cup1", "", input_style)?,
            ensure(doc, &custom, "input", "wp-custom-cup2", "", input_style)?,
            ensure(doc, &custom, "input", "wp-custom-target", "", input_style)?,
        ];
        for (input, default) in custom_inputs.iter().zip(config.custom_defaults) {
            input.set_type("number");
            input.set_min("1");
            if input.value().is_empty() {
                input.set_value(default);
            }
        }
        let start_custom_btn = ensure(doc, &custom, "button", "wp-start-custom", "Start", BUTTON_STYLE)?;

        let win_modal: HtmlElement = ensure(doc, &body, "div", "wp-win-modal", "", "display:none; position:fixed; inset:0; background:rgba(0,0,0,0.55); align-items:center; justify-content:center; z-index:40;")?;
        let dialog: HtmlElement = ensure(doc, &win_modal, "div", "wp-win-dialog", "", "background:#fff; padding:24px 32px; border-radius:12px; text-align:center; min-width:260px;")?;
        let win_title = ensure(doc, &dialog, "h2", "wp-win-title", "", "")?;
        let final_steps = ensure(doc, &dialog, "p", "wp-final-steps", "", "")?;
        let win_optimal = ensure(doc, &dialog, "p", "wp-win-optimal", "", "")?;
        let replay_btn = ensure(doc, &dialog, "button", "wp-replay", "Play again", BUTTON_STYLE)?;
        let next_level_btn = ensure(doc, &dialog, "button", "wp-next-level", "Next level", BUTTON_STYLE)?;

        let toast = ensure(doc, &body, "div", "wp-toast", "", "display:none; position:fixed; bottom:32px; left:50%; transform:translateX(-50%); padding:8px 16px; background:rgba(0,0,0,0.8); color:#ffd166; border-radius:6px; z-index:50;")?;

        Ok(Self {
            level_title,
            target,
            steps,
            optimal,
            cups_container,
            fill_btn,
            empty_btn,
            reset_btn,
            custom_inputs,
            start_custom_btn,
            win_modal,
            win_title,
            final_steps,
            win_optimal,
            replay_btn,
            next_level_btn,
            toast,
        })
    }
}

impl WebApp {
    /// Rebuilds the per-level parts of the page: title, target, optimal
    /// steps and one element per cup.
    fn build_level_view(&mut self, doc: &Document) -> Result<(), JsValue> {
        let level = self.session.current_level_definition();
        let title = match level.number() {
            Some(n) => format!("Level {n}"),
            None => "Custom Challenge".to_string(),
        };
        self.dom.level_title.set_text_content(Some(&title));
        self.dom
            .target
            .set_text_content(Some(&format!("Target: {}L", level.target)));
        match level.optimal_steps() {
            Some(optimal) => {
                self.dom
                    .optimal
                    .set_text_content(Some(&format!("Optimal: {optimal} steps")));
                self.dom.optimal.style().set_property("display", "inline")?;
            }
            None => self.dom.optimal.style().set_property("display", "none")?,
        }

        self.dom.cups_container.set_inner_html("");
        self.cups.clear();
        let config = self.session.config();
        for (index, &capacity) in level.cups.iter().enumerate() {
            let root: HtmlElement = doc.create_element("div")?.dyn_into()?;
            root.set_class_name("cup");
            root.set_attribute("data-index", &index.to_string())?;
            root.set_attribute("style", "display:flex; flex-direction:column; align-items:center; cursor:pointer; padding:6px; border-radius:10px;")?;

            let (w, h) = config.cup_body_size(capacity);
            let body: HtmlElement = doc.create_element("div")?.dyn_into()?;
            body.set_class_name("cup-body");
            body.set_attribute("style", &format!("position:relative; width:{w}px; height:{h}px; border:3px solid #555; border-top:none; border-radius:0 0 12px 12px; overflow:hidden; background:#f4f8fb;"))?;

            let water: HtmlElement = doc.create_element("div")?.dyn_into()?;
            water.set_class_name("water");
            water.set_attribute("style", "position:absolute; left:0; right:0; bottom:0; height:0%; background:#4aa3df; transition:height 0.3s;")?;
            body.append_child(&water)?;

            let label: HtmlElement = doc.create_element("div")?.dyn_into()?;
            label.set_class_name("cup-label");
            label.set_attribute("style", "margin-top:6px; font-size:14px;")?;

            root.append_child(&body)?;
            root.append_child(&label)?;
            self.dom.cups_container.append_child(&root)?;
            self.cups.push(CupDom { root, water, label });
        }
        Ok(())
    }

    fn render_state(&self, state: &PuzzleState) {
        self.dom
            .steps
            .set_text_content(Some(&format!("Steps: {}", state.steps())));
        let selected = state.selection().index();
        for (index, (cup, dom)) in state.cups().iter().zip(&self.cups).enumerate() {
            dom.water
                .style()
                .set_property("height", &format!("{}%", cup.fill_percent()))
                .ok();
            dom.label.set_text_content(Some(&format!(
                "{}L / {}L",
                cup.current(),
                cup.capacity()
            )));
            let outline = if selected == Some(index) {
                "3px solid #ffd166"
            } else {
                "none"
            };
            dom.root.style().set_property("outline", outline).ok();
        }
        self.dom.fill_btn.set_disabled(selected.is_none());
        self.dom.empty_btn.set_disabled(selected.is_none());

        #[cfg(feature = "serde_json")]
        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(state) {
                log::trace!("state {json}");
            }
        }
    }

    fn show_win_modal(&self) {
        // The player may have moved on during the delay.
        let Some(summary) = self.session.win_summary() else {
            return;
        };
        let title = match summary.headline {
            WinHeadline::Victory => "Victory!",
            WinHeadline::CatalogCleared => "All levels cleared!",
            WinHeadline::CustomCleared => "Challenge complete!",
        };
        self.dom.win_title.set_text_content(Some(title));
        self.dom
            .final_steps
            .set_text_content(Some(&format!("You used {} steps.", summary.steps)));
        let optimal = summary
            .optimal_steps
            .map(|n| format!("The best possible is {n} steps."))
            .unwrap_or_default();
        self.dom.win_optimal.set_text_content(Some(&optimal));
        self.dom
            .next_level_btn
            .set_disabled(!summary.next_level_available);
        self.dom
            .win_modal
            .style()
            .set_property("display", "flex")
            .ok();
    }

    fn hide_win_modal(&self) {
        self.dom
            .win_modal
            .style()
            .set_property("display", "none")
            .ok();
    }
}

// Renders the events of one action, in order.
fn dispatch(app: &AppHandle, events: Vec<EngineEvent>) {
    for event in events {
        match event {
            EngineEvent::StateChanged(state) => app.borrow().render_state(&state),
            EngineEvent::ActionRejected(reason) => {
                log::debug!("action rejected: {reason:?}");
                app.borrow_mut().toast.show(reason.message());
            }
            EngineEvent::Won(_) => schedule_win_modal(app),
        }
    }
}

fn schedule_win_modal(app: &AppHandle) {
    let delay = app.borrow().session.config().win_delay_ms;
    let weak = Rc::downgrade(app);
    let timeout = Timeout::new(delay, move || {
        if let Some(app) = weak.upgrade() {
            app.borrow().show_win_modal();
        }
    });
    app.borrow_mut().win_timer.replace(timeout);
}

// A new level (or the same one restarted): drop any pending win dialog and
// rebuild the cups before rendering.
fn reload(app: &AppHandle, events: Vec<EngineEvent>) {
    {
        let mut a = app.borrow_mut();
        a.win_timer.cancel();
        a.hide_win_modal();
        let Some(doc) = window().and_then(|w| w.document()) else {
            return;
        };
        if let Err(e) = a.build_level_view(&doc) {
            log::error!("failed to build level view: {e:?}");
            return;
        }
    }
    dispatch(app, events);
}

fn on_click(target: &HtmlElement, app: &AppHandle, handler: impl Fn(&AppHandle) + 'static) -> Result<(), JsValue> {
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
        handler(&app);
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn cup_index_from_event(evt: &MouseEvent) -> Option<usize> {
    let target: Element = evt.target()?.dyn_into().ok()?;
    let cup = target.closest("[data-index]").ok()??;
    cup.get_attribute("data-index")?.parse().ok()
}

fn install_listeners(app: &AppHandle) -> Result<(), JsValue> {
    let a = app.borrow();
    let dom = &a.dom;

    // Cup clicks are delegated to the container so rebuilding cups needs no new listeners.
    {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let Some(index) = cup_index_from_event(&evt) else {
                return;
            };
            let events = app.borrow_mut().session.select_cup(index);
            dispatch(&app, events);
        }) as Box<dyn FnMut(_)>);
        dom.cups_container
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    on_click(&dom.fill_btn, app, |app| {
        let events = app.borrow_mut().session.fill();
        dispatch(app, events);
    })?;
    on_click(&dom.empty_btn, app, |app| {
        let events = app.borrow_mut().session.empty();
        dispatch(app, events);
    })?;
    on_click(&dom.reset_btn, app, |app| {
        let events = app.borrow_mut().session.reset();
        reload(app, events);
    })?;
    on_click(&dom.replay_btn, app, |app| {
        let events = app.borrow_mut().session.replay();
        reload(app, events);
    })?;
    on_click(&dom.next_level_btn, app, |app| {
        let events = app.borrow_mut().session.advance_level();
        if events.is_empty() {
            return;
        }
        reload(app, events);
    })?;
    on_click(&dom.start_custom_btn, app, |app| {
        let [cup1, cup2, target] = {
            let a = app.borrow();
            let [c1, c2, t] = &a.dom.custom_inputs;
            [c1.value(), c2.value(), t.value()]
        };
        let result = app.borrow_mut().session.start_custom(&cup1, &cup2, &target);
        match result {
            Ok(events) => reload(app, events),
            Err(e) => {
                log::info!("custom level refused: {e}");
                if let Some(win) = window() {
                    win.alert_with_message(&e.to_string()).ok();
                }
            }
        }
    })?;

    // Clear a default value on focus, restore it on blur if left blank.
    for (input, default) in dom.custom_inputs.iter().zip(a.session.config().custom_defaults) {
        let focused = input.clone();
        let on_focus = Closure::wrap(Box::new(move |_evt: FocusEvent| {
            if focused.value() == default {
                focused.set_value("");
            }
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("focus", on_focus.as_ref().unchecked_ref())?;
        on_focus.forget();

        let blurred = input.clone();
        let on_blur = Closure::wrap(Box::new(move |_evt: FocusEvent| {
            if blurred.value().trim().is_empty() {
                blurred.set_value(default);
            }
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("blur", on_blur.as_ref().unchecked_ref())?;
        on_blur.forget();
    }
    Ok(())
}
