use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use crate::controller::PageHost;
use crate::filter::FilterTarget;
use crate::layout::ElementSpec;

impl FilterTarget for HtmlElement {
    fn apply_filter(&self, css: &str) {
        // Only fails for a read-only declaration, which a video's style is not.
        let _ = self.style().set_property("filter", css);
    }
}

/// [`PageHost`] over the live document.
pub struct DomHost {
    document: Document,
    video_selector: String,
}

impl DomHost {
    pub fn new(document: Document, video_selector: &str) -> Self {
        Self {
            document,
            video_selector: video_selector.to_string(),
        }
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }
}

impl PageHost for DomHost {
    type Anchor = Element;
    type Video = HtmlElement;
    type Error = JsValue;

    fn video(&self) -> Option<HtmlElement> {
        self.document
            .query_selector(&self.video_selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn element_exists(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    fn find_anchor(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn insert_after(&mut self, anchor: &Element, panel: &ElementSpec) -> Result<(), JsValue> {
        let parent = anchor.parent_node().ok_or("anchor is detached")?;
        let node = materialize(&self.document, panel)?;
        parent.insert_before(&node, anchor.next_sibling().as_ref())?;
        Ok(())
    }

    fn set_text(&mut self, id: &str, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_slider(&mut self, id: &str, value: u16) {
        if let Some(input) = self
            .element(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&value.to_string());
        }
    }

    fn set_display(&mut self, id: &str, display: &str) {
        if let Some(el) = self
            .element(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            if let Err(err) = el.style().set_property("display", display) {
                warn!("could not set display on #{id}: {err:?}");
            }
        }
    }
}

/// Create the DOM subtree described by `spec`.
pub fn materialize(document: &Document, spec: &ElementSpec) -> Result<Element, JsValue> {
    let el = document.create_element(spec.tag)?;
    if let Some(id) = &spec.id {
        el.set_id(id);
    }
    if let Some(class) = spec.class {
        el.set_class_name(class);
    }
    for (name, value) in &spec.attrs {
        el.set_attribute(name, value)?;
    }
    if let Some(text) = &spec.text {
        el.append_child(&document.create_text_node(text))?;
    }
    for child in &spec.children {
        el.append_child(&materialize(document, child)?)?;
    }
    Ok(el)
}
