//! Panel lifecycle and the observation loop, independent of the DOM.
//!
//! The controller talks to the page only through [`PageHost`]. The wasm
//! build supplies a `web-sys` backed host; native tests use an in-memory
//! fake.

use std::fmt::Debug;

use tracing::{debug, info, warn};

use crate::config::StudioConfig;
use crate::filter::{FilterParam, FilterState, FilterStateManager, FilterTarget, Preset};
use crate::layout::{self, ElementSpec};

/// Page access needed by [`PanelController`].
pub trait PageHost {
    type Anchor;
    type Video: FilterTarget;
    type Error: Debug;

    /// The page's video element, if any.
    fn video(&self) -> Option<Self::Video>;
    fn element_exists(&self, id: &str) -> bool;
    fn find_anchor(&self, selector: &str) -> Option<Self::Anchor>;
    /// Insert `panel` as the next sibling of `anchor`.
    fn insert_after(&mut self, anchor: &Self::Anchor, panel: &ElementSpec) -> Result<(), Self::Error>;
    fn set_text(&mut self, id: &str, text: &str);
    fn set_slider(&mut self, id: &str, value: u16);
    fn set_display(&mut self, id: &str, display: &str);
}

/// What one batch of document changes led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Observation {
    /// The caller must arm the settling timer and then call
    /// [`PanelController::injection_fired`].
    pub schedule_injection: bool,
    pub rendered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    /// Panel inserted; the caller binds its event listeners next.
    Inserted,
    AlreadyPresent,
    NoVideo,
    NoAnchor,
    Failed,
}

/// Owns the filter state and drives the ABSENT/PRESENT panel state machine.
#[derive(Debug)]
pub struct PanelController {
    config: StudioConfig,
    filters: FilterStateManager,
    expanded: bool,
    pending_injection: bool,
}

impl PanelController {
    pub fn new(config: StudioConfig) -> Self {
        let expanded = !config.start_collapsed;
        Self {
            config,
            filters: FilterStateManager::new(),
            expanded,
            pending_injection: false,
        }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn state(&self) -> &FilterState {
        self.filters.get()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn injection_pending(&self) -> bool {
        self.pending_injection
    }

    pub fn panel_present<H: PageHost>(&self, host: &H) -> bool {
        host.element_exists(&self.config.panel_id)
    }

    /// Handle one batch of structural changes.
    pub fn observe<H: PageHost>(&mut self, host: &mut H) -> Observation {
        let mut observation = Observation::default();
        let Some(video) = host.video() else {
            return observation;
        };

        if !self.panel_present(host) && !self.pending_injection {
            self.pending_injection = true;
            observation.schedule_injection = true;
            debug!(
                "video found without panel; injecting in {}ms",
                self.config.settle_delay_ms
            );
        }

        // The host may have swapped in a new video element (ad -> content).
        self.filters.render(Some(&video));
        observation.rendered = true;
        observation
    }

    /// Settling timer callback.
    pub fn injection_fired<H: PageHost>(&mut self, host: &mut H) -> InjectOutcome {
        self.pending_injection = false;
        self.inject(host)
    }

    /// The settling timer could not be armed; let the next batch retry.
    pub fn injection_cancelled(&mut self) {
        self.pending_injection = false;
    }

    /// Build and insert the panel unless one already exists.
    pub fn inject<H: PageHost>(&mut self, host: &mut H) -> InjectOutcome {
        if self.panel_present(host) {
            return InjectOutcome::AlreadyPresent;
        }
        let Some(video) = host.video() else {
            return InjectOutcome::NoVideo;
        };
        let Some(anchor) = self
            .config
            .anchor_selectors
            .iter()
            .find_map(|selector| host.find_anchor(selector))
        else {
            debug!("no anchor element yet");
            return InjectOutcome::NoAnchor;
        };

        self.expanded = !self.config.start_collapsed;
        let panel = layout::build_panel(&self.config.panel_id, self.filters.get(), self.expanded);
        if let Err(err) = host.insert_after(&anchor, &panel) {
            warn!("panel insertion failed: {err:?}");
            return InjectOutcome::Failed;
        }

        self.filters.render(Some(&video));
        info!("panel injected");
        InjectOutcome::Inserted
    }

    /// Slider `input` event. Returns the stored value, or `None` when the
    /// raw value was not a number.
    pub fn slider_input<H: PageHost>(
        &mut self,
        host: &mut H,
        param: FilterParam,
        raw: f64,
    ) -> Option<u16> {
        param.clamp(raw)?;
        self.filters.set_param(param, raw);
        let value = self.filters.get().value(param);
        host.set_text(&layout::value_label_id(param), &param.format_value(value));
        self.render(host);
        Some(value)
    }

    /// Reset button (`None`) or a preset button.
    pub fn reset<H: PageHost>(&mut self, host: &mut H, preset: Option<Preset>) {
        self.filters.reset(preset);
        self.sync_sliders(host);
        self.render(host);
    }

    /// Collapse/expand button. Returns the new expanded flag.
    pub fn toggle<H: PageHost>(&mut self, host: &mut H) -> bool {
        self.expanded = !self.expanded;
        let display = if self.expanded { layout::BODY_DISPLAY } else { "none" };
        host.set_display(layout::BODY_ID, display);
        host.set_text(layout::TOGGLE_ID, layout::toggle_label(self.expanded));
        self.expanded
    }

    pub fn render<H: PageHost>(&self, host: &H) {
        self.filters.render(host.video().as_ref());
    }

    fn sync_sliders<H: PageHost>(&self, host: &mut H) {
        let state = *self.filters.get();
        for param in FilterParam::ALL {
            let value = state.value(param);
            host.set_slider(layout::slider_id(param), value);
            host.set_text(&layout::value_label_id(param), &param.format_value(value));
        }
    }
}
