//! Structured description of the control panel subtree.
//!
//! The panel is built as an [`ElementSpec`] tree and handed to the host to
//! materialise, so no UI state ever round-trips through markup strings.

use crate::filter::{FilterParam, FilterState, Preset};

pub const BODY_ID: &str = "studio-controls-box";
pub const TOGGLE_ID: &str = "studio-toggle-btn";
pub const RESET_ID: &str = "studio-reset";
pub const PANEL_CLASS: &str = "color-studio";

pub const HIDE_LABEL: &str = "Hide Controls";
pub const SHOW_LABEL: &str = "Show Controls";
/// `display` value of the expanded body.
pub const BODY_DISPLAY: &str = "grid";

const STYLESHEET: &str = include_str!("../static/panel.css");

pub fn slider_id(param: FilterParam) -> &'static str {
    param.name()
}

pub fn value_label_id(param: FilterParam) -> String {
    format!("val-{}", param.name())
}

pub fn preset_button_id(preset: Preset) -> String {
    format!("studio-preset-{}", preset.name())
}

pub fn toggle_label(expanded: bool) -> &'static str {
    if expanded { HIDE_LABEL } else { SHOW_LABEL }
}

/// One element of the panel tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpec {
    pub tag: &'static str,
    pub id: Option<String>,
    pub class: Option<&'static str>,
    pub attrs: Vec<(&'static str, String)>,
    pub text: Option<String>,
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            id: None,
            class: None,
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl ToString) -> Self {
        self.attrs.push((name, value.to_string()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ElementSpec>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Depth-first search by id.
    pub fn find(&self, id: &str) -> Option<&ElementSpec> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut ElementSpec> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }
}

fn slider_group(param: FilterParam, value: u16) -> ElementSpec {
    let label = ElementSpec::new("label")
        .text(format!("{} ", param.label()))
        .child(
            ElementSpec::new("span")
                .id(value_label_id(param))
                .text(param.format_value(value)),
        );
    let input = ElementSpec::new("input")
        .id(slider_id(param))
        .attr("type", "range")
        .attr("min", param.min())
        .attr("max", param.max())
        .attr("value", value)
        .attr("data-unit", param.unit());
    ElementSpec::new("div")
        .class("control-group")
        .child(label)
        .child(input)
}

fn button(id: impl Into<String>, class: &'static str, caption: &str) -> ElementSpec {
    ElementSpec::new("button").id(id).class(class).text(caption)
}

/// Full panel tree for `state`. `expanded = false` renders the body hidden.
pub fn build_panel(panel_id: &str, state: &FilterState, expanded: bool) -> ElementSpec {
    let header = ElementSpec::new("div")
        .class("studio-header")
        .child(ElementSpec::new("span").class("studio-title").text("🎨 Color Studio"))
        .child(button(TOGGLE_ID, "studio-btn", toggle_label(expanded)));

    let mut body = ElementSpec::new("div")
        .id(BODY_ID)
        .class("studio-controls")
        .children(
            FilterParam::ALL
                .into_iter()
                .map(|param| slider_group(param, state.value(param))),
        );
    if !expanded {
        body = body.attr("style", "display: none");
    }

    let buttons = ElementSpec::new("div")
        .class("studio-buttons")
        .child(button(RESET_ID, "studio-btn reset", "Reset All"))
        .children(
            Preset::ALL
                .into_iter()
                .map(|preset| button(preset_button_id(preset), "studio-btn", preset.label())),
        );

    ElementSpec::new("div")
        .id(panel_id)
        .class(PANEL_CLASS)
        .child(ElementSpec::new("style").text(STYLESHEET))
        .child(header)
        .child(body)
        .child(buttons)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn panel_has_one_slider_per_param() {
        let panel = build_panel("panel", &FilterState::default(), true);
        assert_eq!(panel.id.as_deref(), Some("panel"));

        let body = panel.find(BODY_ID).unwrap();
        assert_eq!(body.children.len(), 6);
        assert_eq!(body.get_attr("style"), None);

        let saturate = panel.find("saturate").unwrap();
        assert_eq!(saturate.get_attr("type"), Some("range"));
        assert_eq!(saturate.get_attr("min"), Some("0"));
        assert_eq!(saturate.get_attr("max"), Some("300"));
        assert_eq!(saturate.get_attr("value"), Some("100"));
        assert_eq!(saturate.get_attr("data-unit"), Some("%"));

        let hue_label = panel.find("val-hue").unwrap();
        assert_eq!(hue_label.text.as_deref(), Some("0deg"));
    }

    #[test]
    fn panel_buttons() {
        let panel = build_panel("panel", &Preset::Warm.state(), true);
        assert_eq!(panel.find(RESET_ID).unwrap().text.as_deref(), Some("Reset All"));
        assert_eq!(
            panel.find("studio-preset-matrix").unwrap().text.as_deref(),
            Some("Matrix Mode")
        );
        assert_eq!(
            panel.find("studio-preset-warm").unwrap().text.as_deref(),
            Some("Warm & Cozy")
        );
        assert_eq!(panel.find("val-sepia").unwrap().text.as_deref(), Some("40%"));
        assert_eq!(panel.find(TOGGLE_ID).unwrap().text.as_deref(), Some(HIDE_LABEL));
    }

    #[test]
    fn collapsed_panel_hides_body() {
        let panel = build_panel("panel", &FilterState::default(), false);
        assert_eq!(panel.find(BODY_ID).unwrap().get_attr("style"), Some("display: none"));
        assert_eq!(panel.find(TOGGLE_ID).unwrap().text.as_deref(), Some(SHOW_LABEL));
    }
}
