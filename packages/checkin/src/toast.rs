//! Toast notifications and their screen anchor.
//!
//! A toast is pinned to at most one vertical edge (`top`/`bottom`) and at
//! most one horizontal edge (`left`/`right`). [`ToastPositionResolver`]
//! tracks the four anchor flags and, before every resolution, disables the
//! opposite of whichever edge was enabled most recently.

use std::time::Duration;

use serde::Deserialize;
use strum_macros::{Display, EnumString, IntoStaticStr};

/// How long a toast stays on screen.
pub const DEFAULT_HIDE_DELAY: Duration = Duration::from_millis(3000);

/// Position reported when no edge is active.
pub const FALLBACK_POSITION: &str = "bottom left";

/// A screen edge a toast can be anchored to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Edge {
    /// Bottom edge.
    Bottom,
    /// Top edge.
    Top,
    /// Left edge.
    Left,
    /// Right edge.
    Right,
}

impl Edge {
    /// All edges in resolution order.
    pub const ALL: [Self; 4] = [Self::Bottom, Self::Top, Self::Left, Self::Right];

    /// The mutually exclusive edge on the same axis.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Bottom => Self::Top,
            Self::Top => Self::Bottom,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    const fn is_vertical(self) -> bool {
        matches!(self, Self::Bottom | Self::Top)
    }
}

/// The four anchor flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Anchors {
    /// Anchored to the bottom edge.
    pub bottom: bool,
    /// Anchored to the top edge.
    pub top: bool,
    /// Anchored to the left edge.
    pub left: bool,
    /// Anchored to the right edge.
    pub right: bool,
}

impl Anchors {
    /// Top-left, the initial toast position.
    pub const TOP_LEFT: Self = Self {
        bottom: false,
        top: true,
        left: true,
        right: false,
    };

    /// Whether `edge` is active.
    #[must_use]
    pub const fn get(&self, edge: Edge) -> bool {
        match edge {
            Edge::Bottom => self.bottom,
            Edge::Top => self.top,
            Edge::Left => self.left,
            Edge::Right => self.right,
        }
    }

    /// Sets the flag for `edge`.
    pub const fn set(&mut self, edge: Edge, enabled: bool) {
        match edge {
            Edge::Bottom => self.bottom = enabled,
            Edge::Top => self.top = enabled,
            Edge::Left => self.left = enabled,
            Edge::Right => self.right = enabled,
        }
    }

    /// Active edges in resolution order.
    pub fn active(&self) -> impl Iterator<Item = Edge> + '_ {
        Edge::ALL.into_iter().filter(|e| self.get(*e))
    }
}

/// Tracks anchor flags and resolves a non-conflicting position string.
#[derive(Debug, Clone)]
pub struct ToastPositionResolver {
    current: Anchors,
    last: Anchors,
    recent_vertical: Option<Edge>,
    recent_horizontal: Option<Edge>,
}

impl Default for ToastPositionResolver {
    fn default() -> Self {
        Self::new(Anchors::TOP_LEFT)
    }
}

impl ToastPositionResolver {
    /// Creates a resolver starting from `initial`. Conflicting initial
    /// pairs keep `top`/`left`.
    #[must_use]
    pub fn new(initial: Anchors) -> Self {
        let mut resolver = Self {
            current: initial,
            last: Anchors::default(),
            recent_vertical: None,
            recent_horizontal: None,
        };
        if initial.top {
            resolver.recent_vertical = Some(Edge::Top);
        }
        if initial.left {
            resolver.recent_horizontal = Some(Edge::Left);
        }
        resolver.sanitize();
        resolver
    }

    /// Updates one anchor flag.
    pub const fn set_anchor(&mut self, edge: Edge, enabled: bool) {
        self.current.set(edge, enabled);
        if enabled {
            if edge.is_vertical() {
                self.recent_vertical = Some(edge);
            } else {
                self.recent_horizontal = Some(edge);
            }
        }
    }

    /// Current (unsanitized) flags.
    #[must_use]
    pub const fn anchors(&self) -> Anchors {
        self.current
    }

    /// Sanitizes the flags and returns the active edges joined by spaces,
    /// e.g. `"top left"`.
    pub fn resolve_position(&mut self) -> String {
        self.sanitize();
        let edges: Vec<&str> = self.current.active().map(<&'static str>::from).collect();
        if edges.is_empty() {
            FALLBACK_POSITION.to_string()
        } else {
            edges.join(" ")
        }
    }

    fn sanitize(&mut self) {
        self.sanitize_axis(Edge::Bottom, Edge::Top, self.recent_vertical);
        self.sanitize_axis(Edge::Left, Edge::Right, self.recent_horizontal);
        self.last = self.current;
    }

    /// Keeps the freshly enabled edge when both edges of an axis are on.
    /// When both were enabled since the last resolution, the most recent
    /// one wins.
    fn sanitize_axis(&mut self, a: Edge, b: Edge, recent: Option<Edge>) {
        if !(self.current.get(a) && self.current.get(b)) {
            return;
        }
        let winner = match (self.last.get(a), self.last.get(b)) {
            (false, true) => a,
            (true, false) => b,
            _ => recent.unwrap_or(a),
        };
        self.current.set(winner.opposite(), false);
    }
}

/// A notification ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Message text.
    pub text: String,
    /// Resolved anchor, e.g. `"top left"`.
    pub position: String,
    /// How long the toast stays visible.
    pub hide_delay: Duration,
}

/// Rendering surface for toasts.
pub trait ToastSink {
    /// Displays `toast`.
    fn display(&mut self, toast: &Toast);

    /// Scrolls the view back to the top.
    fn scroll_to_top(&mut self);
}

/// Shows simple toasts at the resolver's current position.
#[derive(Debug)]
pub struct Toaster<S: ToastSink> {
    resolver: ToastPositionResolver,
    sink: S,
}

impl<S: ToastSink> Toaster<S> {
    /// Creates a toaster rendering to `sink`.
    pub const fn new(resolver: ToastPositionResolver, sink: S) -> Self {
        Self { resolver, sink }
    }

    /// Resolves the position and displays `text`.
    pub fn show_simple_toast(&mut self, text: &str) {
        let toast = Toast {
            text: text.to_string(),
            position: self.resolver.resolve_position(),
            hide_delay: DEFAULT_HIDE_DELAY,
        };
        self.sink.display(&toast);
    }

    /// Scrolls the sink's view to the top.
    pub fn scroll_to_top(&mut self) {
        self.sink.scroll_to_top();
    }

    /// Anchor resolver, for changing the toast position.
    pub const fn resolver_mut(&mut self) -> &mut ToastPositionResolver {
        &mut self.resolver
    }

    /// Rendering sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records everything a [`Toaster`] sends it.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub toasts: Vec<Toast>,
        pub scrolls: usize,
    }

    impl ToastSink for RecordingSink {
        fn display(&mut self, toast: &Toast) {
            self.toasts.push(toast.clone());
        }

        fn scroll_to_top(&mut self) {
            self.scrolls += 1;
        }
    }

    fn assert_no_conflict(position: &str) {
        let edges: Vec<&str> = position.split(' ').collect();
        assert!(
            !(edges.contains(&"top") && edges.contains(&"bottom")),
            "vertical conflict in '{position}'"
        );
        assert!(
            !(edges.contains(&"left") && edges.contains(&"right")),
            "horizontal conflict in '{position}'"
        );
    }

    #[test]
    fn initial_position_is_top_left() {
        assert_eq!(
            ToastPositionResolver::default().resolve_position(),
            "top left"
        );
    }

    #[test]
    fn edge_names_are_lowercase() {
        let names: Vec<&str> = Edge::ALL.into_iter().map(<&'static str>::from).collect();
        assert_eq!(names, vec!["bottom", "top", "left", "right"]);
        assert_eq!("right".parse::<Edge>().ok(), Some(Edge::Right));
    }

    #[test]
    fn newly_enabled_edge_wins() {
        let mut resolver = ToastPositionResolver::default();
        resolver.set_anchor(Edge::Bottom, true);
        assert_eq!(resolver.resolve_position(), "bottom left");
        resolver.set_anchor(Edge::Right, true);
        assert_eq!(resolver.resolve_position(), "bottom right");
        resolver.set_anchor(Edge::Top, true);
        assert_eq!(resolver.resolve_position(), "top right");
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut resolver = ToastPositionResolver::default();
        resolver.set_anchor(Edge::Bottom, true);
        let first = resolver.resolve_position();
        assert_eq!(resolver.resolve_position(), first);
        resolver.set_anchor(Edge::Bottom, true);
        assert_eq!(resolver.resolve_position(), first);
    }

    #[test]
    fn two_fresh_enables_keep_the_latest() {
        let mut resolver = ToastPositionResolver::default();
        resolver.set_anchor(Edge::Top, false);
        resolver.set_anchor(Edge::Left, false);
        assert_eq!(resolver.resolve_position(), FALLBACK_POSITION);

        resolver.set_anchor(Edge::Top, true);
        resolver.set_anchor(Edge::Bottom, true);
        resolver.set_anchor(Edge::Right, true);
        resolver.set_anchor(Edge::Left, true);
        assert_eq!(resolver.resolve_position(), "bottom left");
    }

    #[test]
    fn conflicting_initial_anchors_are_sanitized() {
        let mut resolver = ToastPositionResolver::new(Anchors {
            bottom: true,
            top: true,
            left: true,
            right: true,
        });
        assert_eq!(resolver.resolve_position(), "top left");
    }

    #[test]
    fn no_sequence_produces_a_conflict() {
        // Deterministic walk over many set_anchor sequences.
        let mut resolver = ToastPositionResolver::default();
        let mut seed: u32 = 0x9e37_79b9;
        for _ in 0..2_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let edge = Edge::ALL[(seed % 4) as usize];
            let enabled = (seed >> 8) % 3 != 0;
            resolver.set_anchor(edge, enabled);
            if (seed >> 16) % 2 == 0 {
                assert_no_conflict(&resolver.resolve_position());
            }
        }
        assert_no_conflict(&resolver.resolve_position());
    }

    #[test]
    fn toaster_uses_resolved_position() {
        let mut toaster = Toaster::new(ToastPositionResolver::default(), RecordingSink::default());
        toaster.resolver_mut().set_anchor(Edge::Bottom, true);
        toaster.show_simple_toast("Submitted, thank you.");
        toaster.scroll_to_top();

        let sink = toaster.sink();
        assert_eq!(sink.toasts.len(), 1);
        assert_eq!(sink.toasts[0].position, "bottom left");
        assert_eq!(sink.toasts[0].hide_delay, DEFAULT_HIDE_DELAY);
        assert_eq!(sink.scrolls, 1);
    }
}
