use crate::dom::{flag, set_flag, DomNode, Page, HIDDEN};

pub const TOGGLE_SELECTOR: &str = ".toggle-message";
const LABEL_SELECTOR: &str = ".toggle-message-label";
const ICON_SELECTOR: &str = ".toggle-message-icon";
const ICON_OPEN_CLASS: &str = "rotate-45";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labels {
    pub show: String,
    pub hide: String,
}

/// Expands or collapses the panel named by the button's `data-target`.
/// Returns `false` when the panel does not exist.
pub fn toggle<P: Page>(page: &P, button: &P::Node, labels: &Labels) -> bool {
    let Some(panel) = button.attr("data-target").and_then(|id| page.by_id(&id)) else {
        return false;
    };

    let expanded = !flag(button, "aria-expanded");
    set_flag(button, "aria-expanded", expanded);
    panel.set_class(HIDDEN, !expanded);

    if let Some(label) = button.find(LABEL_SELECTOR) {
        let text = if expanded {
            button.attr("data-hide-label").unwrap_or_else(|| labels.hide.clone())
        } else {
            button.attr("data-show-label").unwrap_or_else(|| labels.show.clone())
        };
        label.set_text(&text);
    }
    if let Some(icon) = button.find(ICON_SELECTOR) {
        icon.set_class(ICON_OPEN_CLASS, expanded);
    }
    true
}
