use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Reflect};
use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom::DomNode;

pub const COUNTER_SELECTOR: &str = ".counter";

/// Cubic ease-out: fast start, decelerating into the final value.
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Parses a `data-count` value the way `parseInt(raw, 10)` would: leading
/// whitespace and an optional sign, then as many digits as are present.
pub fn parse_count(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let value: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Groups digits in threes with `,`, used when the browser locale is unknown.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub value: i64,
    pub finished: bool,
}

/// Progress of one counter. The first frame's timestamp becomes the start.
#[derive(Debug)]
pub struct CountUp {
    target: i64,
    duration_ms: f64,
    started_at: Option<f64>,
}

impl CountUp {
    pub fn new(target: i64, duration_ms: f64) -> Self {
        Self {
            target,
            duration_ms,
            started_at: None,
        }
    }

    pub fn frame(&mut self, timestamp: f64) -> Frame {
        let start = *self.started_at.get_or_insert(timestamp);
        let progress = if self.duration_ms > 0.0 {
            ((timestamp - start) / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };
        if progress >= 1.0 {
            return Frame {
                value: self.target,
                finished: true,
            };
        }
        let value = (ease_out_cubic(progress) * self.target as f64).floor() as i64;
        Frame {
            value,
            finished: false,
        }
    }
}

fn format_count(value: i64) -> String {
    let language = web_sys::window().and_then(|w| w.navigator().language());
    match language {
        Some(locale) => js_sys::Number::from(value as f64)
            .to_locale_string(&locale)
            .into(),
        None => group_thousands(value),
    }
}

/// Runs the count-up on `element`, one animation frame at a time.
pub fn animate(element: Element, duration_ms: f64) {
    let Some(target) = element.attr("data-count").as_deref().and_then(parse_count) else {
        debug!("Skipping counter without a numeric data-count");
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };

    let mut count = CountUp::new(target, duration_ms);
    let step: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = step.clone();
    let frame_window = window.clone();

    *step.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        let frame = count.frame(timestamp);
        element.set_text(&format_count(frame.value));
        if frame.finished {
            // Drops this closure and ends the chain
            let _ = next.borrow_mut().take();
            return;
        }
        if let Some(callback) = next.borrow().as_ref() {
            if frame_window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .is_err()
            {
                warn!("Counter animation stopped: requestAnimationFrame failed");
            }
        }
    }));

    if let Some(callback) = step.borrow().as_ref() {
        if window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .is_err()
        {
            warn!("Counter animation could not start");
        }
    };
}

/// Keeps the visibility observer alive; disconnects it when dropped.
pub struct CounterWatch {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Drop for CounterWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

fn observer_supported() -> bool {
    web_sys::window()
        .map(|w| Reflect::has(&w, &JsValue::from_str("IntersectionObserver")).unwrap_or(false))
        .unwrap_or(false)
}

/// Counters that have not started yet. Each one is let through at most once.
pub struct CounterGate<N> {
    waiting: RefCell<Vec<N>>,
}

impl<N: DomNode> CounterGate<N> {
    pub fn new(counters: Vec<N>) -> Self {
        Self {
            waiting: RefCell::new(counters),
        }
    }

    pub fn waiting(&self) -> Vec<N> {
        self.waiting.borrow().clone()
    }

    /// True the first time `counter` is reported visible.
    pub fn admit(&self, counter: &N, visible: bool) -> bool {
        if !visible {
            return false;
        }
        let mut waiting = self.waiting.borrow_mut();
        match waiting.iter().position(|c| c.is_same(counter)) {
            Some(index) => {
                waiting.remove(index);
                true
            }
            None => false,
        }
    }

    /// Lets every waiting counter through at once.
    pub fn release_all(&self) -> Vec<N> {
        std::mem::take(&mut *self.waiting.borrow_mut())
    }
}

fn start_all(gate: &CounterGate<Element>, duration_ms: f64) {
    for counter in gate.release_all() {
        animate(counter, duration_ms);
    }
}

/// Animates each counter once, the first time enough of it is on screen.
/// Without `IntersectionObserver` every counter starts right away.
pub fn watch(counters: Vec<Element>, threshold: f64, duration_ms: f64) -> Option<CounterWatch> {
    if counters.is_empty() {
        return None;
    }
    let gate = Rc::new(CounterGate::new(counters));
    if !observer_supported() {
        debug!("IntersectionObserver unavailable, starting counters now");
        start_all(&gate, duration_ms);
        return None;
    }

    let admitted = gate.clone();
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                let target = entry.target();
                if admitted.admit(&target, entry.is_intersecting()) {
                    observer.unobserve(&target);
                    animate(target, duration_ms);
                }
            }
        },
    );
    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));

    match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
        Ok(observer) => {
            for counter in gate.waiting() {
                observer.observe(&counter);
            }
            Some(CounterWatch {
                observer,
                _callback: callback,
            })
        }
        Err(err) => {
            warn!("IntersectionObserver rejected, starting counters now: {:?}", err);
            start_all(&gate, duration_ms);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::fake::FakeNode;

    #[test]
    fn easing_hits_both_ends() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn values_climb_monotonically_and_land_on_target() {
        let target = 12_480;
        let mut count = CountUp::new(target, 1500.0);
        let mut last = i64::MIN;

        let mut ts = 1_000.0;
        loop {
            let frame = count.frame(ts);
            assert!(frame.value >= last, "{} dropped below {}", frame.value, last);
            assert!(frame.value <= target);
            last = frame.value;
            if frame.finished {
                break;
            }
            ts += 16.7;
        }
        assert_eq!(last, target);
    }

    #[test]
    fn first_frame_starts_the_clock() {
        let mut count = CountUp::new(100, 1500.0);
        assert_eq!(count.frame(50_000.0), Frame { value: 0, finished: false });
        assert_eq!(count.frame(51_500.0), Frame { value: 100, finished: true });
    }

    #[test]
    fn late_frame_renders_exact_target() {
        let mut count = CountUp::new(7, 1500.0);
        count.frame(0.0);
        assert_eq!(count.frame(9_999.0), Frame { value: 7, finished: true });
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let mut count = CountUp::new(42, 0.0);
        assert_eq!(count.frame(3.0), Frame { value: 42, finished: true });
    }

    #[test]
    fn parses_like_parse_int() {
        assert_eq!(parse_count("250"), Some(250));
        assert_eq!(parse_count("  1200+"), Some(1200));
        assert_eq!(parse_count("-35"), Some(-35));
        assert_eq!(parse_count("1,500"), Some(1));
        assert_eq!(parse_count("abc"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("-"), None);
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-45000), "-45,000");
    }

    #[test]
    fn gate_lets_each_counter_through_once() {
        let first = FakeNode::with_id("members");
        let second = FakeNode::with_id("villages");
        let gate = CounterGate::new(vec![first.clone(), second.clone()]);

        assert!(!gate.admit(&first, false));
        assert!(gate.admit(&first, true));
        assert!(!gate.admit(&first, true));
        assert_eq!(gate.waiting().len(), 1);
        assert!(gate.waiting()[0].is_same(&second));
    }

    #[test]
    fn releasing_all_skips_counters_already_started() {
        let first = FakeNode::with_id("members");
        let second = FakeNode::with_id("villages");
        let gate = CounterGate::new(vec![first.clone(), second.clone()]);
        assert!(gate.admit(&second, true));

        let released = gate.release_all();
        assert_eq!(released.len(), 1);
        assert!(released[0].is_same(&first));
        assert!(!gate.admit(&first, true));
        assert!(gate.release_all().is_empty());
    }

    #[test]
    fn unknown_nodes_are_never_admitted() {
        let gate = CounterGate::new(vec![FakeNode::with_id("members")]);
        assert!(!gate.admit(&FakeNode::with_id("members"), true));
        assert_eq!(gate.waiting().len(), 1);
    }
}
