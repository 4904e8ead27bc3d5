use crate::dom::{DomNode, HIDDEN};

pub const BACK_TO_TOP_ID: &str = "back-to-top";

pub fn past_threshold(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

/// Floating "return to top" button, shown once the page is scrolled past
/// `threshold`.
pub struct BackToTop<N> {
    button: N,
    threshold: f64,
}

impl<N: DomNode> BackToTop<N> {
    pub fn new(button: N, threshold: f64) -> Self {
        Self { button, threshold }
    }

    pub fn button(&self) -> &N {
        &self.button
    }

    pub fn update(&self, offset: f64) {
        self.button
            .set_class(HIDDEN, !past_threshold(offset, self.threshold));
    }
}
