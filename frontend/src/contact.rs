use web_sys::HtmlFormElement;

use crate::dom::{Align, DomNode, HIDDEN};

pub const FORM_ID: &str = "contact-form";
pub const FEEDBACK_ID: &str = "form-feedback";

/// What the submit handler needs from a form.
pub trait Submittable {
    fn is_valid(&self) -> bool;
    fn report_validity(&self);
    fn reset(&self);
}

impl Submittable for HtmlFormElement {
    fn is_valid(&self) -> bool {
        self.check_validity()
    }

    fn report_validity(&self) {
        HtmlFormElement::report_validity(self);
    }

    fn reset(&self) {
        HtmlFormElement::reset(self);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected,
    Acknowledged,
}

/// Local acknowledgment only: nothing leaves the page.
pub fn handle_submit<F: Submittable, N: DomNode>(form: &F, feedback: &N) -> SubmitOutcome {
    if !form.is_valid() {
        form.report_validity();
        return SubmitOutcome::Rejected;
    }
    feedback.set_class(HIDDEN, false);
    feedback.scroll_into_view(Align::Center);
    form.reset();
    SubmitOutcome::Acknowledged
}
