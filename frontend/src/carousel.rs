use std::cell::{Cell, RefCell};

use crate::dom::{set_flag, Align, DomNode, Page, Span};

pub const TRACK_SELECTOR: &str = ".stories-track";
pub const CARD_SELECTOR: &str = ".story-card";
pub const NAV_SELECTOR: &str = ".stories-nav";
pub const DOT_SELECTOR: &str = ".story-dot";

const DOT_ACTIVE: [&str; 2] = ["bg-nuPrimary", "border-nuPrimary/40"];
const DOT_INACTIVE: [&str; 2] = ["bg-white", "border-slate-300"];
const NAV_DISABLED: [&str; 2] = ["pointer-events-none", "opacity-40"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    /// `"prev"` is previous; any other non-empty value moves forward.
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "" => None,
            "prev" => Some(Direction::Prev),
            _ => Some(Direction::Next),
        }
    }
}

/// Index of the span whose centre is nearest `track`'s centre. Ties keep the
/// earlier index.
pub fn closest_to_center(track: Span, cards: impl IntoIterator<Item = Span>) -> Option<usize> {
    let center = track.center();
    let mut closest = None;
    let mut best = f64::INFINITY;
    for (index, card) in cards.into_iter().enumerate() {
        let distance = (card.center() - center).abs();
        if distance < best {
            best = distance;
            closest = Some(index);
        }
    }
    closest
}

/// Parses `data-index` the way `Number(..)` would for integral values. A
/// missing attribute reads as empty, so it also means 0.
fn dot_index(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0);
    }
    let value: f64 = raw.parse().ok()?;
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

/// Stories carousel. `active` is only written by navigation and detection;
/// dots and nav buttons are always re-derived from it.
pub struct Carousel<N> {
    track: N,
    nav: Vec<N>,
    dots: Vec<N>,
    active: Cell<usize>,
}

impl<N: DomNode> Carousel<N> {
    pub fn new(track: N, nav: Vec<N>, dots: Vec<N>) -> Self {
        Self {
            track,
            nav,
            dots,
            active: Cell::new(0),
        }
    }

    pub fn locate<P: Page<Node = N>>(page: &P) -> Option<Self> {
        let track = page.select(TRACK_SELECTOR)?;
        Some(Self::new(track, page.select_all(NAV_SELECTOR), page.select_all(DOT_SELECTOR)))
    }

    pub fn track(&self) -> &N {
        &self.track
    }

    pub fn nav_buttons(&self) -> &[N] {
        &self.nav
    }

    pub fn dots(&self) -> &[N] {
        &self.dots
    }

    pub fn active_index(&self) -> usize {
        self.active.get()
    }

    fn cards(&self) -> Vec<N> {
        self.track.find_all(CARD_SELECTOR)
    }

    /// Clamps `index` into range, centres that card and marks it active
    /// without waiting for the scroll to finish.
    pub fn scroll_to(&self, index: i64) {
        let cards = self.cards();
        let Some(last) = cards.len().checked_sub(1) else {
            return;
        };
        let target = index.clamp(0, last as i64) as usize;
        cards[target].scroll_into_view(Align::InlineCenter);
        self.active.set(target);
        self.sync_controls(cards.len());
    }

    pub fn step(&self, direction: Direction) {
        let total = self.cards().len();
        if total == 0 {
            return;
        }
        let current = self.active_index() as i64;
        let next = match direction {
            Direction::Prev => (current - 1).max(0),
            Direction::Next => (current + 1).min(total as i64 - 1),
        };
        self.scroll_to(next);
    }

    pub fn press(&self, button: &N) {
        if let Some(direction) = button
            .attr("data-direction")
            .as_deref()
            .and_then(Direction::from_attr)
        {
            self.step(direction);
        }
    }

    pub fn select_dot(&self, dot: &N) {
        if let Some(index) = dot_index(&dot.attr("data-index").unwrap_or_default()) {
            self.scroll_to(index);
        }
    }

    /// Re-derives the active card from where the track is scrolled to.
    pub fn detect_position(&self) {
        let cards = self.cards();
        if cards.is_empty() {
            return;
        }
        let track = self.track.span();
        if let Some(index) = closest_to_center(track, cards.iter().map(DomNode::span)) {
            self.active.set(index);
        }
        self.sync_controls(cards.len());
    }

    fn sync_controls(&self, total: usize) {
        let active = self.active_index();
        for dot in &self.dots {
            let on = dot_index(&dot.attr("data-index").unwrap_or_default()) == Some(active as i64);
            for class in DOT_ACTIVE {
                dot.set_class(class, on);
            }
            for class in DOT_INACTIVE {
                dot.set_class(class, !on);
            }
        }
        for button in &self.nav {
            let Some(direction) = button
                .attr("data-direction")
                .as_deref()
                .and_then(Direction::from_attr)
            else {
                continue;
            };
            let disabled = match direction {
                Direction::Prev => active == 0,
                Direction::Next => active + 1 >= total,
            };
            set_flag(button, "aria-disabled", disabled);
            for class in NAV_DISABLED {
                button.set_class(class, disabled);
            }
        }
    }
}

/// Single pending-timer slot. Replacing the handle drops the previous one,
/// which for `gloo_timers::callback::Timeout` cancels it.
pub struct Debounce<H> {
    pending: RefCell<Option<H>>,
}

impl<H> Default for Debounce<H> {
    fn default() -> Self {
        Self {
            pending: RefCell::new(None),
        }
    }
}

impl<H> Debounce<H> {
    pub fn replace(&self, handle: H) {
        let previous = self.pending.replace(Some(handle));
        drop(previous);
    }
}
