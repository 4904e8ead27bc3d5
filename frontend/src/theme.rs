use std::cell::Cell;

use log::warn;
use thiserror::Error;

use crate::dom::{set_flag, DomNode, Page, HIDDEN};

pub const TOGGLE_IDS: [&str; 2] = ["theme-toggle", "theme-toggle-mobile"];
pub const DARK_QUERY: &str = "(prefers-color-scheme: dark)";
const DARK_CLASS: &str = "dark";
const SUN_ICON: &str = ".theme-icon-sun";
const MOON_ICON: &str = ".theme-icon-moon";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Anything other than `"dark"` reads back as light.
    pub fn from_stored(value: &str) -> Self {
        Self::from_dark(value == "dark")
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn toggled(self) -> Self {
        Self::from_dark(!self.is_dark())
    }
}

/// Persisted preference first, then the OS signal, then light.
pub fn initial_theme(stored: Option<&str>, os_prefers_dark: bool) -> Theme {
    match stored {
        Some(value) if !value.is_empty() => Theme::from_stored(value),
        _ => Theme::from_dark(os_prefers_dark),
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
}

pub trait PreferenceStore {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&self, value: &str) -> Result<(), StorageError>;
}

/// `window.localStorage` under a single key.
pub struct LocalStore {
    key: String,
}

impl LocalStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or(StorageError::Unavailable)?
            .local_storage()
            .ok()
            .flatten()
            .ok_or(StorageError::Unavailable)
    }
}

impl PreferenceStore for LocalStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(&self.key)
            .map_err(|err| StorageError::Read {
                key: self.key.clone(),
                reason: format!("{:?}", err),
            })
    }

    fn save(&self, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(&self.key, value)
            .map_err(|err| StorageError::Write {
                key: self.key.clone(),
                reason: format!("{:?}", err),
            })
    }
}

/// Owns the applied theme. The DOM is only ever written from `current`.
pub struct ThemeController<N, S> {
    root: N,
    toggles: Vec<N>,
    store: S,
    current: Cell<Theme>,
    // Last explicit choice, kept for when storage cannot be read back
    session_choice: Cell<Option<Theme>>,
}

impl<N: DomNode, S: PreferenceStore> ThemeController<N, S> {
    pub fn new(root: N, toggles: Vec<N>, store: S) -> Self {
        Self {
            root,
            toggles,
            store,
            current: Cell::new(Theme::Light),
            session_choice: Cell::new(None),
        }
    }

    pub fn locate<P: Page<Node = N>>(page: &P, store: S) -> Option<Self> {
        let toggles = TOGGLE_IDS.iter().filter_map(|id| page.by_id(id)).collect();
        Some(Self::new(page.root()?, toggles, store))
    }

    pub fn toggles(&self) -> &[N] {
        &self.toggles
    }

    pub fn current(&self) -> Theme {
        self.current.get()
    }

    pub fn init(&self, os_prefers_dark: bool) -> Theme {
        let stored = self.stored();
        let theme = initial_theme(stored.as_deref(), os_prefers_dark);
        self.apply(theme);
        theme
    }

    pub fn apply(&self, theme: Theme) {
        self.current.set(theme);
        let dark = theme.is_dark();
        self.root.set_class(DARK_CLASS, dark);
        for toggle in &self.toggles {
            set_flag(toggle, "aria-pressed", dark);
            if let Some(sun) = toggle.find(SUN_ICON) {
                sun.set_class(HIDDEN, dark);
            }
            if let Some(moon) = toggle.find(MOON_ICON) {
                moon.set_class(HIDDEN, !dark);
            }
        }
    }

    pub fn toggle(&self) -> Theme {
        let next = self.current().toggled();
        self.apply(next);
        self.session_choice.set(Some(next));
        if let Err(err) = self.store.save(next.as_str()) {
            warn!("Unable to store theme preference: {}", err);
        }
        next
    }

    /// Follows a live OS change unless the visitor picked a theme themselves.
    /// Returns whether the change was applied.
    pub fn os_preference_changed(&self, prefers_dark: bool) -> bool {
        if self.has_explicit_preference() {
            return false;
        }
        self.apply(Theme::from_dark(prefers_dark));
        true
    }

    fn stored(&self) -> Option<String> {
        match self.store.load() {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(err) => {
                warn!("Unable to read stored theme preference: {}", err);
                None
            }
        }
    }

    fn has_explicit_preference(&self) -> bool {
        match self.store.load() {
            Ok(value) => value.is_some_and(|v| !v.is_empty()),
            Err(err) => {
                warn!("Unable to read stored theme preference: {}", err);
                self.session_choice.get().is_some()
            }
        }
    }
}
