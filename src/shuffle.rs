//! Text-scramble reveal animation.
//!
//! Hovering a target element scrambles the text of its text child and reveals
//! it left to right. The text to reveal comes from an attribute on the target
//! (`data-text` unless configured otherwise). The same model backs the exported `shuffle.js` and is exercised here
//! against a virtual clock, so the reveal can be tested frame by frame.
//!
//! ## Model
//!
//! ```text
//! Idle ──hover──▶ Revealing(iteration = 0) ──tick──▶ Revealing(iteration + increment)
//!                        │
//!                        └── tick with iteration ≥ len ──▶ Idle (timer cancelled)
//! ```
//!
//! Each tick renders one frame: positions below `floor(iteration)` show their
//! real character, the rest show a random symbol from the configured set, and
//! whitespace is always whitespace. The tick that observes `iteration ≥ len`
//! renders the fully revealed text and is the last one.
//!
//! ## Timers
//!
//! [`EventLoop`] is a single-threaded cooperative scheduler with a virtual
//! millisecond clock. Every started animation owns one periodic task,
//! addressed by a [`TaskHandle`]. Elements animate independently. Hovering a
//! target whose text child is still animating starts a second task that
//! overlaps the first unless [`ShuffleOptions::restart_on_reenter`] is set, in which case
//! the text child's running tasks are cancelled first.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

/// Default symbol set drawn for unrevealed positions.
pub const SHUFFLE_CHARS: &str = "0123456789@#$%&*↗{}[]()!<>_+=";

/// Default attribute holding a hover target's original text.
pub const TEXT_ATTR: &str = "data-text";

/// Default selector for the element inside a hover target that displays the
/// animation.
pub const TEXT_SELECTOR: &str = ".shuffle-text";

#[derive(Debug, Clone, PartialEq)]
pub struct ShuffleOptions {
    pub chars: Vec<char>,
    pub speed_ms: u64,
    pub increment: f64,
    pub restart_on_reenter: bool,
    /// Attribute read from the hover target for the text to reveal.
    pub text_attr: String,
}

impl Default for ShuffleOptions {
    fn default() -> Self {
        Self {
            chars: SHUFFLE_CHARS.chars().collect(),
            speed_ms: 30,
            increment: 0.5,
            restart_on_reenter: false,
            text_attr: TEXT_ATTR.to_string(),
        }
    }
}

/// Render one animation frame of `original` at the given reveal point.
///
/// The output always has as many characters as the input.
pub fn render_frame<R: Rng + ?Sized>(
    original: &[char],
    iteration: f64,
    chars: &[char],
    rng: &mut R,
) -> String {
    let revealed = iteration.floor();
    original
        .iter()
        .enumerate()
        .map(|(index, &c)| {
            if c.is_whitespace() || (index as f64) < revealed {
                c
            } else {
                chars.choose(rng).copied().unwrap_or(c)
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShuffleState {
    Idle,
    Revealing { iteration: f64 },
}

/// The reveal state of a single animation run.
#[derive(Debug, Clone)]
pub struct Shuffle {
    original: Vec<char>,
    increment: f64,
    state: ShuffleState,
}

impl Shuffle {
    pub fn new(original: &str, increment: f64) -> Self {
        Self {
            original: original.chars().collect(),
            increment,
            state: ShuffleState::Revealing { iteration: 0.0 },
        }
    }

    pub fn state(&self) -> ShuffleState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ShuffleState::Idle
    }

    /// Advance one tick and return the frame to display.
    ///
    /// Returns `None` once the animation has finished.
    pub fn tick<R: Rng + ?Sized>(&mut self, chars: &[char], rng: &mut R) -> Option<String> {
        let ShuffleState::Revealing { iteration } = self.state else {
            return None;
        };
        let frame = render_frame(&self.original, iteration, chars, rng);
        self.state = if iteration >= self.original.len() as f64 {
            ShuffleState::Idle
        } else {
            ShuffleState::Revealing {
                iteration: iteration + self.increment,
            }
        };
        Some(frame)
    }
}

// ============================================================================
// Document and event loop
// ============================================================================

pub type ElementId = usize;

/// A document element: the text it displays, its attributes, and the
/// descendant the hover animation writes to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub text: String,
    attributes: BTreeMap<String, String>,
    text_child: Option<ElementId>,
}

impl Element {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Set the element matched by the text selector inside this one.
    pub fn with_text_child(mut self, child: ElementId) -> Self {
        self.text_child = Some(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn text_child(&self) -> Option<ElementId> {
        self.text_child
    }
}

/// The set of elements the animation may write to.
#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: Element) -> ElementId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id)
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|n| n.text.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

struct Task {
    handle: TaskHandle,
    element: ElementId,
    shuffle: Shuffle,
    next_due: u64,
}

/// Single-threaded timer loop driving shuffle animations on a virtual clock.
pub struct EventLoop<R> {
    options: ShuffleOptions,
    rng: R,
    now: u64,
    next_handle: u64,
    tasks: Vec<Task>,
}

impl<R: Rng> EventLoop<R> {
    pub fn new(options: ShuffleOptions, rng: R) -> Self {
        Self {
            options,
            rng,
            now: 0,
            next_handle: 0,
            tasks: Vec::new(),
        }
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    fn period(&self) -> u64 {
        self.options.speed_ms.max(1)
    }

    /// Start revealing `original` on `element`, first tick one period from now.
    ///
    /// Returns `None` without scheduling anything if the element does not exist.
    pub fn shuffle_text(
        &mut self,
        doc: &Document,
        element: ElementId,
        original: &str,
    ) -> Option<TaskHandle> {
        doc.get(element)?;
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.tasks.push(Task {
            handle,
            element,
            shuffle: Shuffle::new(original, self.options.increment),
            next_due: self.now + self.period(),
        });
        Some(handle)
    }

    /// Mouse-enter on `target`: animate its text child toward the original
    /// stored in the target's text attribute.
    ///
    /// A target without a text child is left alone.
    pub fn hover(&mut self, doc: &Document, target: ElementId) -> Option<TaskHandle> {
        let target = doc.get(target)?;
        let text_element = target.text_child()?;
        let original = target
            .attr(&self.options.text_attr)
            .unwrap_or_default()
            .to_string();
        if self.options.restart_on_reenter {
            self.tasks.retain(|t| t.element != text_element);
        }
        self.shuffle_text(doc, text_element, &original)
    }

    /// Cancel a running animation. Returns whether it was still running.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != before
    }

    pub fn is_running(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    /// Number of animations still running.
    pub fn running(&self) -> usize {
        self.tasks.len()
    }

    /// Move the clock forward by `ms`, firing every tick that falls due in
    /// time order. Ticks due at the same instant fire in start order.
    pub fn advance(&mut self, doc: &mut Document, ms: u64) {
        let target = self.now + ms;
        let period = self.period();
        while let Some(idx) = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.next_due <= target)
            .min_by_key(|(_, t)| (t.next_due, t.handle))
            .map(|(i, _)| i)
        {
            let task = &mut self.tasks[idx];
            self.now = task.next_due;
            if let Some(frame) = task.shuffle.tick(&self.options.chars, &mut self.rng)
                && let Some(node) = doc.nodes.get_mut(task.element)
            {
                node.text = frame;
            }
            if task.shuffle.is_done() {
                self.tasks.remove(idx);
            } else {
                task.next_due += period;
            }
        }
        self.now = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    /// Options whose only symbol never appears in test strings, so frames are
    /// fully predictable.
    fn hash_options() -> ShuffleOptions {
        ShuffleOptions {
            chars: vec!['#'],
            ..ShuffleOptions::default()
        }
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    // =========================================================================
    // render_frame
    // =========================================================================

    #[test]
    fn frame_preserves_length_and_spaces() {
        let original = chars("Cell size control");
        let defaults: Vec<char> = SHUFFLE_CHARS.chars().collect();
        let mut rng = rng();
        for step in 0..40 {
            let frame = render_frame(&original, step as f64 * 0.5, &defaults, &mut rng);
            assert_eq!(frame.chars().count(), original.len());
            for (f, o) in frame.chars().zip(&original) {
                if *o == ' ' {
                    assert_eq!(f, ' ');
                }
            }
        }
    }

    #[test]
    fn frame_reveals_below_floor_of_iteration() {
        let original = chars("abcd");
        let mut rng = rng();
        assert_eq!(render_frame(&original, 0.0, &['#'], &mut rng), "####");
        assert_eq!(render_frame(&original, 0.5, &['#'], &mut rng), "####");
        assert_eq!(render_frame(&original, 1.0, &['#'], &mut rng), "a###");
        assert_eq!(render_frame(&original, 2.5, &['#'], &mut rng), "ab##");
        assert_eq!(render_frame(&original, 4.0, &['#'], &mut rng), "abcd");
    }

    #[test]
    fn frame_scrambles_from_symbol_set() {
        let original = chars("xxxxxxxx");
        let frame = render_frame(&original, 0.0, &chars("@%"), &mut rng());
        assert!(frame.chars().all(|c| c == '@' || c == '%'));
    }

    #[test]
    fn frame_keeps_tabs_and_newlines() {
        let frame = render_frame(&chars("a\tb\nc"), 0.0, &['#'], &mut rng());
        assert_eq!(frame, "#\t#\n#");
    }

    #[test]
    fn frame_counts_characters_not_bytes() {
        let frame = render_frame(&chars("Müller"), 2.0, &['#'], &mut rng());
        assert_eq!(frame, "Mü####");
    }

    // =========================================================================
    // Shuffle state machine
    // =========================================================================

    #[test]
    fn shuffle_runs_until_iteration_reaches_length() {
        let mut shuffle = Shuffle::new("abcd", 0.5);
        let mut rng = rng();
        let frames: Vec<String> = std::iter::from_fn(|| shuffle.tick(&['#'], &mut rng)).collect();
        // iterations 0.0, 0.5, ..., 4.0
        assert_eq!(frames.len(), 9);
        assert_eq!(frames.last().unwrap(), "abcd");
        assert_eq!(frames[2], "a###");
        assert!(shuffle.is_done());
    }

    #[test]
    fn shuffle_no_frames_after_done() {
        let mut shuffle = Shuffle::new("ab", 1.0);
        let mut rng = rng();
        while shuffle.tick(&['#'], &mut rng).is_some() {}
        assert_eq!(shuffle.state(), ShuffleState::Idle);
        assert_eq!(shuffle.tick(&['#'], &mut rng), None);
    }

    #[test]
    fn shuffle_state_tracks_iteration() {
        let mut shuffle = Shuffle::new("abc", 0.5);
        assert_eq!(shuffle.state(), ShuffleState::Revealing { iteration: 0.0 });
        shuffle.tick(&['#'], &mut rng());
        assert_eq!(shuffle.state(), ShuffleState::Revealing { iteration: 0.5 });
    }

    #[test]
    fn shuffle_empty_text_finishes_immediately() {
        let mut shuffle = Shuffle::new("", 0.5);
        assert_eq!(shuffle.tick(&['#'], &mut rng()), Some(String::new()));
        assert!(shuffle.is_done());
    }

    // =========================================================================
    // EventLoop
    // =========================================================================

    /// A hover target carrying `text` in its text attribute, with a text child
    /// displaying the same value. Returns `(target, text_child)`.
    fn card(doc: &mut Document, text: &str) -> (ElementId, ElementId) {
        let label = doc.add(Element::new(text));
        let target = doc.add(
            Element::new("")
                .with_attr(TEXT_ATTR, text)
                .with_text_child(label),
        );
        (target, label)
    }

    #[test]
    fn hover_ticks_on_interval_and_finishes() {
        let mut doc = Document::new();
        let (target, el) = card(&mut doc, "ab cd");
        let mut ev = EventLoop::new(hash_options(), rng());

        let handle = ev.hover(&doc, target).unwrap();
        ev.advance(&mut doc, 29);
        assert_eq!(doc.text(el), Some("ab cd"));

        ev.advance(&mut doc, 1);
        assert_eq!(doc.text(el), Some("## ##"));

        // iteration 1.0 at the third tick
        ev.advance(&mut doc, 60);
        assert_eq!(doc.text(el), Some("a# ##"));

        ev.advance(&mut doc, 10_000);
        assert_eq!(doc.text(el), Some("ab cd"));
        assert!(!ev.is_running(handle));
        assert_eq!(ev.running(), 0);
    }

    #[test]
    fn hover_writes_to_text_child_not_target() {
        let mut doc = Document::new();
        let title = doc.add(Element::new("Growth laws"));
        let target = doc.add(
            Element::new("Cell Systems, 2024")
                .with_attr(TEXT_ATTR, "Growth laws")
                .with_text_child(title),
        );
        let mut ev = EventLoop::new(hash_options(), rng());

        ev.hover(&doc, target).unwrap();
        ev.advance(&mut doc, 30);
        assert_eq!(doc.text(title), Some("###### ####"));
        assert_eq!(doc.text(target), Some("Cell Systems, 2024"));

        ev.advance(&mut doc, 10_000);
        assert_eq!(doc.text(title), Some("Growth laws"));
        assert_eq!(doc.text(target), Some("Cell Systems, 2024"));
    }

    #[test]
    fn hover_without_text_child_is_noop() {
        let mut doc = Document::new();
        let target = doc.add(Element::new("plain").with_attr(TEXT_ATTR, "plain"));
        let mut ev = EventLoop::new(hash_options(), rng());
        assert_eq!(ev.hover(&doc, target), None);
        ev.advance(&mut doc, 1_000);
        assert_eq!(ev.running(), 0);
        assert_eq!(doc.text(target), Some("plain"));
    }

    #[test]
    fn hover_reads_configured_attribute() {
        let mut doc = Document::new();
        let label = doc.add(Element::new("Old title"));
        let target = doc.add(
            Element::new("")
                .with_attr(TEXT_ATTR, "wrong")
                .with_attr("data-title", "Right")
                .with_text_child(label),
        );
        let options = ShuffleOptions {
            text_attr: "data-title".to_string(),
            ..hash_options()
        };
        let mut ev = EventLoop::new(options, rng());
        ev.hover(&doc, target).unwrap();
        ev.advance(&mut doc, 10_000);
        assert_eq!(doc.text(label), Some("Right"));
    }

    #[test]
    fn total_duration_matches_tick_count() {
        let mut doc = Document::new();
        let (target, el) = card(&mut doc, "abcd");
        let mut ev = EventLoop::new(hash_options(), rng());
        ev.hover(&doc, target);

        // nine ticks at 30 ms: the last one fires at 270 ms
        ev.advance(&mut doc, 269);
        assert_eq!(ev.running(), 1);
        ev.advance(&mut doc, 1);
        assert_eq!(ev.running(), 0);
        assert_eq!(doc.text(el), Some("abcd"));
        assert_eq!(ev.now(), 270);
    }

    #[test]
    fn finished_animation_leaves_text_alone() {
        let mut doc = Document::new();
        let (target, el) = card(&mut doc, "done");
        let mut ev = EventLoop::new(ShuffleOptions::default(), rng());
        ev.hover(&doc, target);
        ev.advance(&mut doc, 5_000);
        let settled = doc.text(el).unwrap().to_string();
        ev.advance(&mut doc, 5_000);
        assert_eq!(doc.text(el).unwrap(), settled);
        assert_eq!(settled, "done");
    }

    #[test]
    fn hover_on_missing_element_is_noop() {
        let mut doc = Document::new();
        let mut ev = EventLoop::new(ShuffleOptions::default(), rng());
        assert_eq!(ev.hover(&doc, 3), None);
        ev.advance(&mut doc, 1_000);
        assert_eq!(ev.running(), 0);
    }

    #[test]
    fn hover_with_dangling_text_child_is_noop() {
        let mut doc = Document::new();
        let target = doc.add(Element::new("").with_attr(TEXT_ATTR, "x").with_text_child(9));
        let mut ev = EventLoop::new(ShuffleOptions::default(), rng());
        assert_eq!(ev.hover(&doc, target), None);
    }

    #[test]
    fn missing_text_attribute_reveals_empty_string() {
        let mut doc = Document::new();
        let label = doc.add(Element::new("shown"));
        let target = doc.add(Element::new("").with_text_child(label));
        let mut ev = EventLoop::new(ShuffleOptions::default(), rng());
        ev.hover(&doc, target);
        ev.advance(&mut doc, 30);
        assert_eq!(doc.text(label), Some(""));
        assert_eq!(ev.running(), 0);
    }

    #[test]
    fn elements_animate_independently() {
        let mut doc = Document::new();
        let (short_target, short) = card(&mut doc, "ab");
        let (long_target, long) = card(&mut doc, "abcdefgh");
        let mut ev = EventLoop::new(hash_options(), rng());
        let h_short = ev.hover(&doc, short_target).unwrap();
        let h_long = ev.hover(&doc, long_target).unwrap();

        // "ab" needs 5 ticks (150 ms), "abcdefgh" needs 17
        ev.advance(&mut doc, 150);
        assert!(!ev.is_running(h_short));
        assert!(ev.is_running(h_long));
        assert_eq!(doc.text(short), Some("ab"));
        assert_eq!(doc.text(long), Some("ab######"));
    }

    #[test]
    fn reentry_overlaps_by_default() {
        let mut doc = Document::new();
        let (target, el) = card(&mut doc, "abcdef");
        let mut ev = EventLoop::new(hash_options(), rng());
        let first = ev.hover(&doc, target).unwrap();
        ev.advance(&mut doc, 90);
        let second = ev.hover(&doc, target).unwrap();

        assert_ne!(first, second);
        assert_eq!(ev.running(), 2);
        assert!(ev.is_running(first));

        ev.advance(&mut doc, 10_000);
        assert_eq!(ev.running(), 0);
        assert_eq!(doc.text(el), Some("abcdef"));
    }

    #[test]
    fn reentry_restarts_when_configured() {
        let mut doc = Document::new();
        let (target, el) = card(&mut doc, "abcdef");
        let options = ShuffleOptions {
            restart_on_reenter: true,
            ..hash_options()
        };
        let mut ev = EventLoop::new(options, rng());
        let first = ev.hover(&doc, target).unwrap();
        ev.advance(&mut doc, 90);
        let second = ev.hover(&doc, target).unwrap();

        assert!(!ev.is_running(first));
        assert!(ev.is_running(second));
        assert_eq!(ev.running(), 1);

        // the restarted run begins fully scrambled again
        ev.advance(&mut doc, 30);
        assert_eq!(doc.text(el), Some("######"));
    }

    #[test]
    fn restart_only_cancels_same_element() {
        let mut doc = Document::new();
        let (a, _) = card(&mut doc, "aaaa");
        let (b, _) = card(&mut doc, "bbbb");
        let options = ShuffleOptions {
            restart_on_reenter: true,
            ..hash_options()
        };
        let mut ev = EventLoop::new(options, rng());
        let on_b = ev.hover(&doc, b).unwrap();
        ev.hover(&doc, a);
        ev.hover(&doc, a);
        assert!(ev.is_running(on_b));
        assert_eq!(ev.running(), 2);
    }

    #[test]
    fn cancel_freezes_current_frame() {
        let mut doc = Document::new();
        let (target, el) = card(&mut doc, "abcd");
        let mut ev = EventLoop::new(hash_options(), rng());
        let handle = ev.hover(&doc, target).unwrap();
        ev.advance(&mut doc, 90);
        assert_eq!(doc.text(el), Some("a###"));

        assert!(ev.cancel(handle));
        assert!(!ev.cancel(handle));
        ev.advance(&mut doc, 1_000);
        assert_eq!(doc.text(el), Some("a###"));
    }

    #[test]
    fn shuffle_text_uses_given_original() {
        let mut doc = Document::new();
        let el = doc.add(Element::new("old"));
        let mut ev = EventLoop::new(hash_options(), rng());
        ev.shuffle_text(&doc, el, "new text");
        ev.advance(&mut doc, 10_000);
        assert_eq!(doc.text(el), Some("new text"));
    }
}
