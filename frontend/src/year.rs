use chrono::{Datelike, Local};

use crate::dom::DomNode;

pub const CURRENT_YEAR_ID: &str = "current-year";

pub fn current_year() -> i32 {
    Local::now().year()
}

pub fn stamp(node: &impl DomNode, year: i32) {
    node.set_text(&year.to_string());
}
