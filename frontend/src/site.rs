use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, info, warn};
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlFormElement, MediaQueryListEvent};

use crate::carousel::{Carousel, Debounce};
use crate::config::SiteConfig;
use crate::contact::{self, FEEDBACK_ID, FORM_ID};
use crate::counter::{self, CounterWatch, COUNTER_SELECTOR};
use crate::dom::{BrowserPage, Page};
use crate::listener::Listener;
use crate::nav::{self, AnchorAction, MobileMenu, NAV_LINKS};
use crate::panel::{self, Labels, TOGGLE_SELECTOR};
use crate::scroll::{BackToTop, BACK_TO_TOP_ID};
use crate::tabs::Tabs;
use crate::theme::{LocalStore, ThemeController, DARK_QUERY};
use crate::year::{self, CURRENT_YEAR_ID};

thread_local! {
    static ACTIVE: RefCell<Option<Site>> = const { RefCell::new(None) };
}

/// Every subscription the page made. Dropping it unwires the page.
pub struct Site {
    listeners: Vec<Listener>,
    _counters: Option<CounterWatch>,
}

impl Site {
    pub fn wire(page: &BrowserPage, config: &SiteConfig) -> Self {
        let mut listeners = Vec::new();

        navigation(page, &mut listeners);
        contact_form(page, &mut listeners);
        message_panels(page, config, &mut listeners);
        theme(page, config, &mut listeners);
        pillar_tabs(page, &mut listeners);
        stories(page, config, &mut listeners);
        back_to_top(page, config, &mut listeners);

        let counters = counter::watch(
            page.select_all(COUNTER_SELECTOR),
            config.counter_visibility_threshold,
            config.counter_duration_ms,
        );
        if let Some(node) = page.by_id(CURRENT_YEAR_ID) {
            year::stamp(&node, year::current_year());
        }

        Self {
            listeners,
            _counters: counters,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Wires the page once the document is parsed. Calling it again replaces the
/// previous wiring.
pub fn start() {
    let Some(page) = BrowserPage::current() else {
        warn!("No window or document, interactions disabled");
        return;
    };
    let config = SiteConfig::load(&page);
    let site = Site::wire(&page, &config);
    info!("Site interactions ready ({} listeners)", site.listener_count());
    let previous = ACTIVE.with(|slot| slot.borrow_mut().replace(site));
    drop(previous);
}

/// Removes every listener, observer and pending timer registered by `start`.
#[wasm_bindgen]
pub fn teardown() {
    let site = ACTIVE.with(|slot| slot.borrow_mut().take());
    if site.is_some() {
        debug!("Site interactions torn down");
    }
}

fn navigation(page: &BrowserPage, listeners: &mut Vec<Listener>) {
    let menu = MobileMenu::locate(page).map(Rc::new);
    if let Some(menu) = &menu {
        let handler = menu.clone();
        listeners.extend(Listener::new(menu.toggle_control(), "click", move |_| handler.toggle()));
    } else {
        debug!("No mobile menu on this page");
    }

    for link in page.select_all(NAV_LINKS) {
        let page = page.clone();
        let menu = menu.clone();
        let anchor = link.clone();
        listeners.extend(Listener::new(&link, "click", move |event: Event| {
            let href = anchor.get_attribute("href");
            let action = nav::follow_anchor(&page, menu.as_deref(), href.as_deref());
            if action == AnchorAction::Suppress {
                event.prevent_default();
            }
        }));
    }
}

fn contact_form(page: &BrowserPage, listeners: &mut Vec<Listener>) {
    let form = page
        .by_id(FORM_ID)
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok());
    let (Some(form), Some(feedback)) = (form, page.by_id(FEEDBACK_ID)) else {
        debug!("No contact form on this page");
        return;
    };
    let target = form.clone();
    listeners.extend(Listener::new(&form, "submit", move |event: Event| {
        event.prevent_default();
        let outcome = contact::handle_submit(&target, &feedback);
        debug!("Contact form submit: {:?}", outcome);
    }));
}

fn message_panels(page: &BrowserPage, config: &SiteConfig, listeners: &mut Vec<Listener>) {
    let labels = Rc::new(Labels {
        show: config.show_message_label.clone(),
        hide: config.hide_message_label.clone(),
    });
    for button in page.select_all(TOGGLE_SELECTOR) {
        let page = page.clone();
        let labels = labels.clone();
        let trigger = button.clone();
        listeners.extend(Listener::new(&button, "click", move |_| {
            if !panel::toggle(&page, &trigger, &labels) {
                debug!("Message toggle points at a missing panel");
            }
        }));
    }
}

fn theme(page: &BrowserPage, config: &SiteConfig, listeners: &mut Vec<Listener>) {
    let store = LocalStore::new(config.theme_storage_key.clone());
    let Some(controller) = ThemeController::locate(page, store) else {
        return;
    };
    let controller = Rc::new(controller);

    for toggle in controller.toggles() {
        let handler = controller.clone();
        listeners.extend(Listener::new(toggle, "click", move |_| {
            handler.toggle();
        }));
    }

    let query = page.window.match_media(DARK_QUERY).ok().flatten();
    if let Some(query) = &query {
        let handler = controller.clone();
        listeners.extend(Listener::new(query, "change", move |event: Event| {
            if let Some(change) = event.dyn_ref::<MediaQueryListEvent>() {
                handler.os_preference_changed(change.matches());
            }
        }));
    }

    let applied = controller.init(query.map(|q| q.matches()).unwrap_or(false));
    debug!("Theme initialised as {}", applied.as_str());
}

fn pillar_tabs(page: &BrowserPage, listeners: &mut Vec<Listener>) {
    let Some(tabs) = Tabs::locate(page) else {
        return;
    };
    let tabs = Rc::new(tabs);
    for tab in tabs.tabs() {
        let handler = tabs.clone();
        let page = page.clone();
        let target = tab.clone();
        listeners.extend(Listener::new(tab, "click", move |_| {
            handler.activate(&page, &target);
        }));
    }
    tabs.activate_first(page);
}

fn stories(page: &BrowserPage, config: &SiteConfig, listeners: &mut Vec<Listener>) {
    let Some(carousel) = Carousel::locate(page) else {
        return;
    };
    let carousel = Rc::new(carousel);

    let settle = Rc::new(Debounce::<Timeout>::default());
    let settle_ms = config.story_settle_ms;
    let handler = carousel.clone();
    listeners.extend(Listener::passive(carousel.track(), "scroll", move |_| {
        let handler = handler.clone();
        settle.replace(Timeout::new(settle_ms, move || handler.detect_position()));
    }));

    for button in carousel.nav_buttons() {
        let handler = carousel.clone();
        let pressed = button.clone();
        listeners.extend(Listener::new(button, "click", move |_| handler.press(&pressed)));
    }
    for dot in carousel.dots() {
        let handler = carousel.clone();
        let selected = dot.clone();
        listeners.extend(Listener::new(dot, "click", move |_| handler.select_dot(&selected)));
    }

    carousel.detect_position();
    let handler = carousel.clone();
    listeners.extend(Listener::new(&page.window, "resize", move |_| handler.detect_position()));
}

fn back_to_top(page: &BrowserPage, config: &SiteConfig, listeners: &mut Vec<Listener>) {
    let Some(button) = page.by_id(BACK_TO_TOP_ID) else {
        return;
    };
    let watcher = Rc::new(BackToTop::new(button, config.back_to_top_threshold));

    let target = page.clone();
    listeners.extend(Listener::new(watcher.button(), "click", move |_| target.scroll_to_top()));

    watcher.update(page.scroll_offset());
    let reader = page.clone();
    let handler = watcher.clone();
    listeners.extend(Listener::passive(&page.window, "scroll", move |_| {
        handler.update(reader.scroll_offset())
    }));
}
