use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, FocusOptions, HtmlElement, Node, NodeList, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition, ScrollToOptions, Window,
};

#[cfg(test)]
pub mod fake;

pub const HIDDEN: &str = "hidden";

/// Where an element should land when it is scrolled into view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    /// Top edge of the viewport.
    Start,
    /// Vertically centred.
    Center,
    /// Horizontally centred inside its scroll container.
    InlineCenter,
}

/// Horizontal extent of a laid-out element, in viewport pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Span {
    pub left: f64,
    pub width: f64,
}

impl Span {
    pub fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// The slice of element behaviour the controllers rely on.
///
/// Implemented for `web_sys::Element` in the browser and for an in-memory
/// node in tests.
pub trait DomNode: Clone {
    fn attr(&self, name: &str) -> Option<String>;
    fn set_attr(&self, name: &str, value: &str);
    fn has_class(&self, class: &str) -> bool;
    fn set_class(&self, class: &str, on: bool);
    fn text(&self) -> Option<String>;
    fn set_text(&self, text: &str);
    fn find(&self, selector: &str) -> Option<Self>;
    fn find_all(&self, selector: &str) -> Vec<Self>;
    fn is_same(&self, other: &Self) -> bool;
    fn scroll_into_view(&self, align: Align);
    fn focus_without_scroll(&self);
    fn span(&self) -> Span;
}

/// Document-level lookups plus the window scroll position.
pub trait Page {
    type Node: DomNode;

    fn by_id(&self, id: &str) -> Option<Self::Node>;
    fn select(&self, selector: &str) -> Option<Self::Node>;
    fn select_all(&self, selector: &str) -> Vec<Self::Node>;
    fn root(&self) -> Option<Self::Node>;
    fn scroll_offset(&self) -> f64;
    fn scroll_to_top(&self);
}

pub fn flag(node: &impl DomNode, name: &str) -> bool {
    node.attr(name).as_deref() == Some("true")
}

pub fn set_flag(node: &impl DomNode, name: &str, on: bool) {
    node.set_attr(name, if on { "true" } else { "false" });
}

fn elements(list: Result<NodeList, wasm_bindgen::JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl DomNode for Element {
    fn attr(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn set_attr(&self, name: &str, value: &str) {
        let _ = self.set_attribute(name, value);
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn set_class(&self, class: &str, on: bool) {
        // DOMTokenList throws on empty tokens
        if class.is_empty() {
            return;
        }
        let _ = self.class_list().toggle_with_force(class, on);
    }

    fn text(&self) -> Option<String> {
        self.text_content()
    }

    fn set_text(&self, text: &str) {
        self.set_text_content(Some(text));
    }

    fn find(&self, selector: &str) -> Option<Self> {
        self.query_selector(selector).ok().flatten()
    }

    fn find_all(&self, selector: &str) -> Vec<Self> {
        elements(self.query_selector_all(selector))
    }

    fn is_same(&self, other: &Self) -> bool {
        let other: &Node = other;
        self.is_same_node(Some(other))
    }

    fn scroll_into_view(&self, align: Align) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        match align {
            Align::Start => options.set_block(ScrollLogicalPosition::Start),
            Align::Center => options.set_block(ScrollLogicalPosition::Center),
            Align::InlineCenter => {
                options.set_inline(ScrollLogicalPosition::Center);
                options.set_block(ScrollLogicalPosition::Nearest);
            }
        }
        self.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn focus_without_scroll(&self) {
        if let Some(element) = self.dyn_ref::<HtmlElement>() {
            let options = FocusOptions::new();
            options.set_prevent_scroll(true);
            let _ = element.focus_with_options(&options);
        }
    }

    fn span(&self) -> Span {
        let rect = self.get_bounding_client_rect();
        Span {
            left: rect.left(),
            width: rect.width(),
        }
    }
}

#[derive(Clone)]
pub struct BrowserPage {
    pub window: Window,
    pub document: Document,
}

impl BrowserPage {
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }
}

impl Page for BrowserPage {
    type Node = Element;

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn select(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn select_all(&self, selector: &str) -> Vec<Element> {
        elements(self.document.query_selector_all(selector))
    }

    fn root(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to_top(&self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn page_with(markup: &str) -> BrowserPage {
        let page = BrowserPage::current().expect("browser page");
        page.document.body().expect("body").set_inner_html(markup);
        page
    }

    #[wasm_bindgen_test]
    fn element_classes_and_flags_round_trip_through_the_dom() {
        let page = page_with(r#"<button id="b" class="hidden" aria-expanded="false"></button>"#);
        let button = page.by_id("b").unwrap();

        assert!(button.has_class(HIDDEN));
        button.set_class(HIDDEN, false);
        assert!(!button.has_class(HIDDEN));

        set_flag(&button, "aria-expanded", true);
        assert!(flag(&button, "aria-expanded"));
    }

    #[wasm_bindgen_test]
    fn select_all_returns_elements_in_document_order() {
        let page = page_with(r#"<i class="c" id="one"></i><i class="c" id="two"></i>"#);
        let ids: Vec<String> = page
            .select_all(".c")
            .iter()
            .map(|el| el.id())
            .collect();

        assert_eq!(ids, vec!["one", "two"]);
        assert!(page.select_all(".c")[0].is_same(&page.by_id("one").unwrap()));
    }
}
