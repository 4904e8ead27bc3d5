use crate::dom::{set_flag, DomNode, Page, HIDDEN};

pub const TAB_SELECTOR: &str = ".pillar-tab";
pub const PANEL_SELECTOR: &str = ".pillar-panel";

fn class_list(node: &impl DomNode, name: &str) -> Vec<String> {
    node.attr(name)
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn set_tab_state(tab: &impl DomNode, active: bool) {
    let active_classes = class_list(tab, "data-active-classes");
    let inactive_classes = class_list(tab, "data-inactive-classes");
    for class in active_classes.iter().chain(&inactive_classes) {
        tab.set_class(class, false);
    }
    let wanted = if active { &active_classes } else { &inactive_classes };
    for class in wanted {
        tab.set_class(class, true);
    }
    set_flag(tab, "aria-selected", active);
}

/// Single-select tab strip: one tab selected, one panel visible.
pub struct Tabs<N> {
    tabs: Vec<N>,
    panels: Vec<N>,
}

impl<N: DomNode> Tabs<N> {
    /// `None` unless there is at least one tab and one panel.
    pub fn new(tabs: Vec<N>, panels: Vec<N>) -> Option<Self> {
        if tabs.is_empty() || panels.is_empty() {
            return None;
        }
        Some(Self { tabs, panels })
    }

    pub fn locate<P: Page<Node = N>>(page: &P) -> Option<Self> {
        Self::new(page.select_all(TAB_SELECTOR), page.select_all(PANEL_SELECTOR))
    }

    pub fn tabs(&self) -> &[N] {
        &self.tabs
    }

    pub fn activate<P: Page<Node = N>>(&self, page: &P, tab: &N) -> bool {
        let Some(panel) = tab.attr("data-target").and_then(|id| page.by_id(&id)) else {
            return false;
        };
        for candidate in &self.tabs {
            set_tab_state(candidate, candidate.is_same(tab));
        }
        for candidate in &self.panels {
            let shown = candidate.is_same(&panel);
            candidate.set_class(HIDDEN, !shown);
            if shown {
                candidate.focus_without_scroll();
            }
        }
        true
    }

    pub fn activate_first<P: Page<Node = N>>(&self, page: &P) -> bool {
        self.activate(page, &self.tabs[0])
    }
}
