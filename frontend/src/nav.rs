use crate::dom::{set_flag, Align, DomNode, Page, HIDDEN};

pub const MENU_TOGGLE_ID: &str = "mobile-menu-toggle";
pub const MENU_ID: &str = "mobile-menu";
pub const NAV_LINKS: &str = "#main-nav a, .mobile-nav-link";

/// The mobile menu and its burger button. The menu's `hidden` class is the
/// state; `aria-expanded` on the button is always written from it.
pub struct MobileMenu<N> {
    toggle: N,
    menu: N,
}

impl<N: DomNode> MobileMenu<N> {
    pub fn new(toggle: N, menu: N) -> Self {
        Self { toggle, menu }
    }

    pub fn locate<P: Page<Node = N>>(page: &P) -> Option<Self> {
        Some(Self::new(page.by_id(MENU_TOGGLE_ID)?, page.by_id(MENU_ID)?))
    }

    pub fn toggle_control(&self) -> &N {
        &self.toggle
    }

    pub fn is_open(&self) -> bool {
        !self.menu.has_class(HIDDEN)
    }

    pub fn toggle(&self) {
        self.set_open(!self.is_open());
    }

    pub fn close(&self) {
        if self.is_open() {
            self.set_open(false);
        }
    }

    fn set_open(&self, open: bool) {
        self.menu.set_class(HIDDEN, !open);
        set_flag(&self.toggle, "aria-expanded", open);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorAction {
    /// Not an in-page link; let the browser navigate.
    PassThrough,
    /// Handled here; the click's default action must be prevented.
    Suppress,
}

/// Element id named by a same-page fragment link, `Some("")` for a bare `#`.
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#')
}

pub fn follow_anchor<P: Page>(
    page: &P,
    menu: Option<&MobileMenu<P::Node>>,
    href: Option<&str>,
) -> AnchorAction {
    let Some(id) = href.and_then(fragment_id) else {
        return AnchorAction::PassThrough;
    };
    if id.is_empty() {
        return AnchorAction::Suppress;
    }
    if let Some(section) = page.by_id(id) {
        section.scroll_into_view(Align::Start);
        if let Some(menu) = menu {
            menu.close();
        }
    }
    AnchorAction::Suppress
}
