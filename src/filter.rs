//! Visual filter parameters and their composition into a CSS `filter` value.
//!
//! The parameter set is closed: [`FilterParam`] enumerates it and
//! [`FilterState`] stores exactly one value per parameter, so the key set
//! cannot drift at runtime.
//!
//! Out-of-domain writes are clamped, never rejected:
//! - non-finite values are ignored,
//! - finite values are rounded to the nearest integer,
//! - the result is clamped into the parameter's `[min, max]`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::StudioError;

/// One adjustable visual parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterParam {
    Brightness,
    Contrast,
    Saturate,
    Hue,
    Sepia,
    Grayscale,
}

impl FilterParam {
    /// All parameters, in composition order.
    pub const ALL: [FilterParam; 6] = [
        FilterParam::Brightness,
        FilterParam::Contrast,
        FilterParam::Saturate,
        FilterParam::Hue,
        FilterParam::Sepia,
        FilterParam::Grayscale,
    ];

    /// Key used for slider ids and `set` lookups.
    pub const fn name(self) -> &'static str {
        match self {
            FilterParam::Brightness => "brightness",
            FilterParam::Contrast => "contrast",
            FilterParam::Saturate => "saturate",
            FilterParam::Hue => "hue",
            FilterParam::Sepia => "sepia",
            FilterParam::Grayscale => "grayscale",
        }
    }

    /// CSS filter function name.
    pub const fn css_function(self) -> &'static str {
        match self {
            FilterParam::Hue => "hue-rotate",
            other => other.name(),
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            FilterParam::Hue => "deg",
            _ => "%",
        }
    }

    /// Human-readable slider label.
    pub const fn label(self) -> &'static str {
        match self {
            FilterParam::Brightness => "Brightness",
            FilterParam::Contrast => "Contrast",
            FilterParam::Saturate => "Saturation",
            FilterParam::Hue => "Hue Rotate",
            FilterParam::Sepia => "Sepia",
            FilterParam::Grayscale => "Grayscale",
        }
    }

    pub const fn min(self) -> u16 {
        0
    }

    pub const fn max(self) -> u16 {
        match self {
            FilterParam::Brightness | FilterParam::Contrast => 200,
            FilterParam::Saturate => 300,
            FilterParam::Hue => 360,
            FilterParam::Sepia | FilterParam::Grayscale => 100,
        }
    }

    pub const fn default_value(self) -> u16 {
        match self {
            FilterParam::Brightness | FilterParam::Contrast | FilterParam::Saturate => 100,
            FilterParam::Hue | FilterParam::Sepia | FilterParam::Grayscale => 0,
        }
    }

    /// Clamp a raw input into this parameter's domain. `None` for NaN/inf.
    pub fn clamp(self, raw: f64) -> Option<u16> {
        if !raw.is_finite() {
            return None;
        }
        let clamped = raw.round().clamp(f64::from(self.min()), f64::from(self.max()));
        Some(clamped as u16)
    }

    /// On-screen value text, e.g. `150%` or `90deg`.
    pub fn format_value(self, value: u16) -> String {
        format!("{value}{}", self.unit())
    }
}

impl fmt::Display for FilterParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterParam {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterParam::ALL
            .into_iter()
            .find(|param| param.name() == s)
            .ok_or_else(|| StudioError::UnknownParam(s.to_string()))
    }
}

/// Named fixed parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Matrix,
    Warm,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Matrix, Preset::Warm];

    pub const fn name(self) -> &'static str {
        match self {
            Preset::Matrix => "matrix",
            Preset::Warm => "warm",
        }
    }

    /// Button caption.
    pub const fn label(self) -> &'static str {
        match self {
            Preset::Matrix => "Matrix Mode",
            Preset::Warm => "Warm & Cozy",
        }
    }

    pub const fn state(self) -> FilterState {
        match self {
            Preset::Matrix => FilterState {
                brightness: 110,
                contrast: 120,
                saturate: 150,
                hue: 90,
                sepia: 0,
                grayscale: 0,
            },
            Preset::Warm => FilterState {
                brightness: 105,
                contrast: 100,
                saturate: 120,
                hue: 0,
                sepia: 40,
                grayscale: 0,
            },
        }
    }
}

impl FromStr for Preset {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| StudioError::UnknownPreset(s.to_string()))
    }
}

/// Current value of every parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub brightness: u16,
    pub contrast: u16,
    pub saturate: u16,
    pub hue: u16,
    pub sepia: u16,
    pub grayscale: u16,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            brightness: FilterParam::Brightness.default_value(),
            contrast: FilterParam::Contrast.default_value(),
            saturate: FilterParam::Saturate.default_value(),
            hue: FilterParam::Hue.default_value(),
            sepia: FilterParam::Sepia.default_value(),
            grayscale: FilterParam::Grayscale.default_value(),
        }
    }
}

impl FilterState {
    pub fn value(&self, param: FilterParam) -> u16 {
        match param {
            FilterParam::Brightness => self.brightness,
            FilterParam::Contrast => self.contrast,
            FilterParam::Saturate => self.saturate,
            FilterParam::Hue => self.hue,
            FilterParam::Sepia => self.sepia,
            FilterParam::Grayscale => self.grayscale,
        }
    }

    fn slot_mut(&mut self, param: FilterParam) -> &mut u16 {
        match param {
            FilterParam::Brightness => &mut self.brightness,
            FilterParam::Contrast => &mut self.contrast,
            FilterParam::Saturate => &mut self.saturate,
            FilterParam::Hue => &mut self.hue,
            FilterParam::Sepia => &mut self.sepia,
            FilterParam::Grayscale => &mut self.grayscale,
        }
    }

    /// Composed CSS `filter` value, six terms in [`FilterParam::ALL`] order.
    pub fn css(&self) -> String {
        FilterParam::ALL
            .iter()
            .map(|&param| {
                format!(
                    "{}({}{})",
                    param.css_function(),
                    self.value(param),
                    param.unit()
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Anything that can carry a CSS `filter` style.
pub trait FilterTarget {
    fn apply_filter(&self, css: &str);
}

/// Owns the live [`FilterState`].
#[derive(Debug, Default)]
pub struct FilterStateManager {
    state: FilterState,
}

impl FilterStateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &FilterState {
        &self.state
    }

    /// Update one parameter by name. Unknown names and non-finite values are
    /// ignored; everything else is rounded and clamped. Returns whether the
    /// stored value changed.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match name.parse::<FilterParam>() {
            Ok(param) => self.set_param(param, value),
            Err(_) => false,
        }
    }

    pub fn set_param(&mut self, param: FilterParam, value: f64) -> bool {
        let Some(value) = param.clamp(value) else {
            return false;
        };
        let slot = self.state.slot_mut(param);
        let changed = *slot != value;
        *slot = value;
        changed
    }

    /// Replace the state with the defaults or a preset.
    pub fn reset(&mut self, preset: Option<Preset>) {
        self.state = preset.map(Preset::state).unwrap_or_default();
    }

    /// Like [`reset`](Self::reset) but by preset name; unknown names leave
    /// the state untouched.
    pub fn reset_named(&mut self, preset: Option<&str>) -> bool {
        match preset.map(str::parse::<Preset>).transpose() {
            Ok(preset) => {
                self.reset(preset);
                true
            }
            Err(_) => false,
        }
    }

    /// Write the composed filter onto `target`, if there is one.
    pub fn render<T: FilterTarget + ?Sized>(&self, target: Option<&T>) {
        if let Some(target) = target {
            target.apply_filter(&self.state.css());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct Recorder(RefCell<Option<String>>);

    impl FilterTarget for Recorder {
        fn apply_filter(&self, css: &str) {
            *self.0.borrow_mut() = Some(css.to_string());
        }
    }

    fn state(values: [u16; 6]) -> FilterState {
        FilterState {
            brightness: values[0],
            contrast: values[1],
            saturate: values[2],
            hue: values[3],
            sepia: values[4],
            grayscale: values[5],
        }
    }

    #[test]
    fn default_state_renders_six_terms_in_order() {
        assert_eq!(
            FilterState::default().css(),
            "brightness(100%) contrast(100%) saturate(100%) hue-rotate(0deg) sepia(0%) grayscale(0%)"
        );
    }

    #[test]
    fn render_reflects_each_domain_bound() {
        for param in FilterParam::ALL {
            for value in [param.min(), param.max()] {
                let mut manager = FilterStateManager::new();
                manager.set_param(param, f64::from(value));
                let css = manager.get().css();
                let terms: Vec<&str> = css.split(' ').collect();
                assert_eq!(terms.len(), 6);
                let expected = format!("{}({}{})", param.css_function(), value, param.unit());
                assert!(terms.contains(&expected.as_str()), "{css} lacks {expected}");
            }
        }
    }

    #[test]
    fn reset_without_preset_restores_defaults() {
        let mut manager = FilterStateManager::new();
        manager.set("sepia", 70.0);
        manager.set("hue", 200.0);
        manager.reset(None);
        assert_eq!(*manager.get(), state([100, 100, 100, 0, 0, 0]));
    }

    #[test]
    fn presets_match_their_literal_values() {
        let mut manager = FilterStateManager::new();
        manager.reset(Some(Preset::Matrix));
        assert_eq!(*manager.get(), state([110, 120, 150, 90, 0, 0]));
        assert!(manager.reset_named(Some("warm")));
        assert_eq!(*manager.get(), state([105, 100, 120, 0, 40, 0]));
    }

    #[test]
    fn unknown_preset_name_is_ignored() {
        let mut manager = FilterStateManager::new();
        manager.reset(Some(Preset::Warm));
        assert!(!manager.reset_named(Some("noir")));
        assert_eq!(*manager.get(), Preset::Warm.state());
    }

    #[test]
    fn set_clamps_rounds_and_ignores() {
        let mut manager = FilterStateManager::new();
        assert!(manager.set("brightness", 250.0));
        assert_eq!(manager.get().brightness, 200);
        assert!(manager.set("contrast", -5.0));
        assert_eq!(manager.get().contrast, 0);
        assert!(manager.set("hue", 44.6));
        assert_eq!(manager.get().hue, 45);
        assert!(!manager.set("hue", f64::NAN));
        assert!(!manager.set("blur", 10.0));
        assert!(!manager.set("sepia", 0.0));
        assert_eq!(*manager.get(), state([200, 0, 100, 45, 0, 0]));
    }

    #[test]
    fn brightness_change_leaves_other_terms() {
        let mut manager = FilterStateManager::new();
        manager.set("brightness", 150.0);
        assert_eq!(
            manager.get().css(),
            "brightness(150%) contrast(100%) saturate(100%) hue-rotate(0deg) sepia(0%) grayscale(0%)"
        );
        assert_eq!(FilterParam::Brightness.format_value(150), "150%");
        assert_eq!(FilterParam::Hue.format_value(90), "90deg");
    }

    #[test]
    fn render_is_noop_without_target() {
        let manager = FilterStateManager::new();
        manager.render::<Recorder>(None);

        let target = Recorder::default();
        manager.render(Some(&target));
        assert_eq!(target.0.borrow().as_deref(), Some(FilterState::default().css().as_str()));
    }

    #[test]
    fn parse_names() {
        assert_eq!("saturate".parse::<FilterParam>().unwrap(), FilterParam::Saturate);
        assert!(matches!(
            "blur".parse::<FilterParam>(),
            Err(StudioError::UnknownParam(name)) if name == "blur"
        ));
        assert_eq!("matrix".parse::<Preset>().unwrap(), Preset::Matrix);
    }
}
