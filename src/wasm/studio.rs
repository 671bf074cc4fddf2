use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use tracing::{debug, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, Document, Event, HtmlInputElement, MutationObserver, MutationObserverInit};

use super::dom::DomHost;
use crate::config::StudioConfig;
use crate::controller::{InjectOutcome, PanelController};
use crate::filter::{FilterParam, FilterState, Preset};
use crate::layout;

type ObserverCallback = Closure<dyn FnMut(Array, MutationObserver)>;

/// DOM glue around [`PanelController`]: mutation observer, settling timer
/// and event listeners.
pub struct Studio {
    document: Document,
    controller: RefCell<PanelController>,
    observer: RefCell<Option<(MutationObserver, ObserverCallback)>>,
}

impl Studio {
    pub fn new(document: Document, config: StudioConfig) -> Rc<Self> {
        Rc::new(Self {
            document,
            controller: RefCell::new(PanelController::new(config)),
            observer: RefCell::new(None),
        })
    }

    /// Create a studio on the current document and start watching it.
    pub fn start(config: StudioConfig) -> Result<Rc<Self>, JsValue> {
        let window = window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let studio = Self::new(document, config);
        studio.watch()?;
        // The video may already be on the page; don't wait for a mutation.
        studio.observe();
        Ok(studio)
    }

    fn host(&self) -> DomHost {
        let controller = self.controller.borrow();
        DomHost::new(self.document.clone(), &controller.config().video_selector)
    }

    pub fn state(&self) -> FilterState {
        *self.controller.borrow().state()
    }

    pub fn is_expanded(&self) -> bool {
        self.controller.borrow().is_expanded()
    }

    pub fn is_watching(&self) -> bool {
        self.observer.borrow().is_some()
    }

    /// Observe `childList` changes across the whole body.
    pub fn watch(self: &Rc<Self>) -> Result<(), JsValue> {
        if self.is_watching() {
            return Ok(());
        }
        let body = self.document.body().ok_or("no body")?;

        let studio = Rc::downgrade(self);
        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |_records: Array, _observer: MutationObserver| {
                if let Some(studio) = studio.upgrade() {
                    studio.observe();
                }
            },
        ) as Box<dyn FnMut(Array, MutationObserver)>);

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer.observe_with_options(&body, &init)?;

        *self.observer.borrow_mut() = Some((observer, callback));
        Ok(())
    }

    /// Disconnect the observer. Pending timers become no-ops.
    pub fn stop(&self) {
        if let Some((observer, _callback)) = self.observer.borrow_mut().take() {
            observer.disconnect();
        }
    }

    /// One observation cycle.
    pub fn observe(self: &Rc<Self>) {
        let mut host = self.host();
        let observation = self.controller.borrow_mut().observe(&mut host);
        if observation.schedule_injection {
            let delay = self.controller.borrow().config().settle_delay_ms;
            if let Err(err) = self.schedule_injection(delay) {
                warn!("could not arm injection timer: {err:?}");
                self.controller.borrow_mut().injection_cancelled();
            }
        }
    }

    fn schedule_injection(self: &Rc<Self>, delay_ms: u32) -> Result<(), JsValue> {
        let window = window().ok_or("no window")?;
        let studio = Rc::clone(self);
        let callback = Closure::once_into_js(move || {
            if studio.is_watching() {
                studio.injection_fired();
            }
        });
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay,
        )?;
        Ok(())
    }

    fn injection_fired(self: &Rc<Self>) {
        let mut host = self.host();
        let outcome = self.controller.borrow_mut().injection_fired(&mut host);
        self.after_inject(outcome);
    }

    /// Inject the panel now, skipping the settling delay.
    pub fn inject(self: &Rc<Self>) -> InjectOutcome {
        let mut host = self.host();
        let outcome = self.controller.borrow_mut().inject(&mut host);
        self.after_inject(outcome)
    }

    fn after_inject(self: &Rc<Self>, outcome: InjectOutcome) -> InjectOutcome {
        if outcome == InjectOutcome::Inserted {
            if let Err(err) = self.bind_events() {
                warn!("binding panel listeners failed: {err:?}");
            }
        } else {
            debug!("injection skipped: {outcome:?}");
        }
        outcome
    }

    fn listen<F>(&self, id: &str, event: &str, handler: F) -> Result<(), JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let el = self
            .document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("#{id} missing from panel")))?;
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        // Listeners live as long as their element; the page drops both on navigation.
        closure.forget();
        Ok(())
    }

    fn bind_events(self: &Rc<Self>) -> Result<(), JsValue> {
        for param in FilterParam::ALL {
            let studio = Rc::downgrade(self);
            self.listen(layout::slider_id(param), "input", move |event| {
                let Some(studio) = studio.upgrade() else {
                    return;
                };
                let Some(input) = event
                    .target()
                    .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                let mut host = studio.host();
                studio
                    .controller
                    .borrow_mut()
                    .slider_input(&mut host, param, input.value_as_number());
            })?;
        }

        let presets = std::iter::once((layout::RESET_ID.to_string(), None)).chain(
            Preset::ALL
                .into_iter()
                .map(|preset| (layout::preset_button_id(preset), Some(preset))),
        );
        for (id, preset) in presets {
            let studio = Rc::downgrade(self);
            self.listen(&id, "click", move |_event| {
                if let Some(studio) = studio.upgrade() {
                    let mut host = studio.host();
                    studio.controller.borrow_mut().reset(&mut host, preset);
                }
            })?;
        }

        let studio = Rc::downgrade(self);
        self.listen(layout::TOGGLE_ID, "click", move |_event| {
            if let Some(studio) = studio.upgrade() {
                let mut host = studio.host();
                studio.controller.borrow_mut().toggle(&mut host);
            }
        })
    }
}
