//! In-memory stand-ins for the DOM, used by the host-run unit tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{Align, DomNode, Page, Span};

#[derive(Default)]
struct NodeData {
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    children: Vec<FakeNode>,
    span: Span,
    scrolls: Vec<Align>,
    focused: bool,
}

#[derive(Clone, Default)]
pub struct FakeNode(Rc<RefCell<NodeData>>);

impl FakeNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: &str) -> Self {
        Self::new().with_attr("id", id)
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.0.borrow_mut().attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.set_class(class, true);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_child(self, child: FakeNode) -> Self {
        self.0.borrow_mut().children.push(child);
        self
    }

    pub fn with_span(self, left: f64, width: f64) -> Self {
        self.set_span(left, width);
        self
    }

    pub fn set_span(&self, left: f64, width: f64) {
        self.0.borrow_mut().span = Span { left, width };
    }

    pub fn text_content(&self) -> String {
        self.0.borrow().text.clone()
    }

    pub fn scroll_requests(&self) -> Vec<Align> {
        self.0.borrow().scrolls.clone()
    }

    pub fn is_focused(&self) -> bool {
        self.0.borrow().focused
    }

    fn matches(&self, selector: &str) -> bool {
        if let Some(class) = selector.strip_prefix('.') {
            self.has_class(class)
        } else if let Some(id) = selector.strip_prefix('#') {
            self.attr("id").as_deref() == Some(id)
        } else {
            false
        }
    }

    fn collect(&self, selector: &str, out: &mut Vec<FakeNode>) {
        for child in self.0.borrow().children.iter() {
            if child.matches(selector) {
                out.push(child.clone());
            }
            child.collect(selector, out);
        }
    }
}

impl DomNode for FakeNode {
    fn attr(&self, name: &str) -> Option<String> {
        self.0.borrow().attrs.get(name).cloned()
    }

    fn set_attr(&self, name: &str, value: &str) {
        self.0.borrow_mut().attrs.insert(name.into(), value.into());
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn set_class(&self, class: &str, on: bool) {
        if class.is_empty() {
            return;
        }
        let mut data = self.0.borrow_mut();
        let present = data.classes.iter().any(|c| c == class);
        if on && !present {
            data.classes.push(class.into());
        } else if !on {
            data.classes.retain(|c| c != class);
        }
    }

    fn text(&self) -> Option<String> {
        Some(self.text_content())
    }

    fn set_text(&self, text: &str) {
        self.0.borrow_mut().text = text.into();
    }

    fn find(&self, selector: &str) -> Option<Self> {
        self.find_all(selector).into_iter().next()
    }

    fn find_all(&self, selector: &str) -> Vec<Self> {
        let mut out = Vec::new();
        self.collect(selector, &mut out);
        out
    }

    fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn scroll_into_view(&self, align: Align) {
        self.0.borrow_mut().scrolls.push(align);
    }

    fn focus_without_scroll(&self) {
        self.0.borrow_mut().focused = true;
    }

    fn span(&self) -> Span {
        self.0.borrow().span
    }
}

#[derive(Default)]
pub struct FakePage {
    pub root: FakeNode,
    pub body: FakeNode,
    scroll_y: Cell<f64>,
    top_requests: Cell<usize>,
}

impl FakePage {
    pub fn new(children: Vec<FakeNode>) -> Self {
        let body = children
            .into_iter()
            .fold(FakeNode::new(), |body, child| body.with_child(child));
        Self {
            body,
            ..Self::default()
        }
    }

    pub fn set_scroll(&self, offset: f64) {
        self.scroll_y.set(offset);
    }

    pub fn top_requests(&self) -> usize {
        self.top_requests.get()
    }
}

impl Page for FakePage {
    type Node = FakeNode;

    fn by_id(&self, id: &str) -> Option<FakeNode> {
        self.body.find(&format!("#{id}"))
    }

    fn select(&self, selector: &str) -> Option<FakeNode> {
        self.body.find(selector)
    }

    fn select_all(&self, selector: &str) -> Vec<FakeNode> {
        self.body.find_all(selector)
    }

    fn root(&self) -> Option<FakeNode> {
        Some(self.root.clone())
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_y.get()
    }

    fn scroll_to_top(&self) {
        self.top_requests.set(self.top_requests.get() + 1);
    }
}
