use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cubic ease-in-out on `t` in `[0, 1]`, the default easing of chart transitions.
#[must_use]
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Eased progress of a transition that started at `started_at`.
#[must_use]
pub fn transition_progress(started_at: Duration, duration: Duration, now: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(started_at).as_secs_f64();
    ease_cubic_in_out(elapsed / duration.as_secs_f64())
}

/// Visual emphasis of one mark: radius multiplier and fill opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkEmphasis {
    pub scale: f64,
    pub opacity: f64,
}

impl MarkEmphasis {
    #[must_use]
    pub const fn new(scale: f64, opacity: f64) -> Self {
        Self { scale, opacity }
    }

    fn lerp(self, target: Self, progress: f64) -> Self {
        Self {
            scale: self.scale + (target.scale - self.scale) * progress,
            opacity: self.opacity + (target.opacity - self.opacity) * progress,
        }
    }
}

/// Transient hover label. It lives for a fixed time after creation, whether
/// or not the pointer is still over its mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub mark_index: usize,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub created_at: Duration,
}

impl Tooltip {
    #[must_use]
    pub fn is_alive(&self, timeout: Duration, now: Duration) -> bool {
        now < self.created_at + timeout
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MarkTransition {
    mark_index: usize,
    from: MarkEmphasis,
    to: MarkEmphasis,
    started_at: Duration,
    duration: Duration,
}

impl MarkTransition {
    fn value_at(self, now: Duration) -> MarkEmphasis {
        self.from
            .lerp(self.to, transition_progress(self.started_at, self.duration, now))
    }
}

/// Pointer-driven state of the bubble chart.
///
/// Entering a mark emphasizes it and spawns a tooltip; leaving resets the
/// mark's emphasis but leaves the tooltip to its timeout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleHoverState {
    hovered: Option<usize>,
    transitions: Vec<MarkTransition>,
    tooltips: Vec<Tooltip>,
}

impl BubbleHoverState {
    #[must_use]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    #[must_use]
    pub fn tooltips(&self) -> &[Tooltip] {
        &self.tooltips
    }

    /// Returns `true` while any emphasis transition is still running.
    #[must_use]
    pub fn is_animating(&self, now: Duration) -> bool {
        self.transitions
            .iter()
            .any(|transition| now < transition.started_at + transition.duration)
    }

    /// Current emphasis of `mark_index`, `rest` when no transition touches it.
    #[must_use]
    pub fn emphasis(&self, mark_index: usize, rest: MarkEmphasis, now: Duration) -> MarkEmphasis {
        self.transitions
            .iter()
            .find(|transition| transition.mark_index == mark_index)
            .map_or(rest, |transition| transition.value_at(now))
    }

    pub fn enter(
        &mut self,
        mark_index: usize,
        tooltip: Tooltip,
        rest: MarkEmphasis,
        target: MarkEmphasis,
        transition: Duration,
        now: Duration,
    ) {
        if self.hovered == Some(mark_index) {
            return;
        }
        if self.hovered.is_some() {
            self.leave(rest, transition, now);
        }
        self.start_transition(mark_index, rest, target, transition, now);
        self.hovered = Some(mark_index);
        self.tooltips.push(tooltip);
    }

    pub fn leave(&mut self, rest: MarkEmphasis, transition: Duration, now: Duration) {
        let Some(mark_index) = self.hovered.take() else {
            return;
        };
        self.start_transition(mark_index, rest, rest, transition, now);
    }

    /// Drops tooltips older than `timeout` and finished rest transitions.
    ///
    /// Returns the number of tooltips removed.
    pub fn expire(&mut self, timeout: Duration, now: Duration) -> usize {
        let before = self.tooltips.len();
        self.tooltips.retain(|tooltip| tooltip.is_alive(timeout, now));

        let hovered = self.hovered;
        self.transitions.retain(|transition| {
            Some(transition.mark_index) == hovered
                || now < transition.started_at + transition.duration
        });
        before - self.tooltips.len()
    }

    pub fn reset(&mut self) {
        self.hovered = None;
        self.transitions.clear();
        self.tooltips.clear();
    }

    fn start_transition(
        &mut self,
        mark_index: usize,
        rest: MarkEmphasis,
        to: MarkEmphasis,
        duration: Duration,
        now: Duration,
    ) {
        let from = self.emphasis(mark_index, rest, now);
        self.transitions
            .retain(|transition| transition.mark_index != mark_index);
        self.transitions.push(MarkTransition {
            mark_index,
            from,
            to,
            started_at: now,
            duration,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use approx::assert_relative_eq;

    use super::{BubbleHoverState, MarkEmphasis, Tooltip, ease_cubic_in_out};

    const REST: MarkEmphasis = MarkEmphasis::new(1.0, 0.7);
    const HOVER: MarkEmphasis = MarkEmphasis::new(1.3, 1.0);
    const TRANSITION: Duration = Duration::from_millis(200);
    const TIMEOUT: Duration = Duration::from_millis(3_000);

    fn tooltip(mark_index: usize, at_ms: u64) -> Tooltip {
        Tooltip {
            mark_index,
            text: format!("mark {mark_index}"),
            x: 0.0,
            y: 0.0,
            created_at: Duration::from_millis(at_ms),
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn easing_hits_endpoints_and_midpoint() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_relative_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert_eq!(ease_cubic_in_out(3.0), 1.0);
    }

    #[test]
    fn entering_emphasizes_after_transition() {
        let mut state = BubbleHoverState::default();
        state.enter(2, tooltip(2, 0), REST, HOVER, TRANSITION, ms(0));
        assert_eq!(state.hovered(), Some(2));
        assert_eq!(state.emphasis(2, REST, ms(0)), REST);
        assert!(state.is_animating(ms(100)));
        assert_eq!(state.emphasis(2, REST, ms(200)), HOVER);
        assert!(!state.is_animating(ms(200)));
        assert_eq!(state.emphasis(1, REST, ms(200)), REST);
    }

    #[test]
    fn leaving_resets_mark_but_keeps_tooltip() {
        let mut state = BubbleHoverState::default();
        state.enter(0, tooltip(0, 0), REST, HOVER, TRANSITION, ms(0));
        state.leave(REST, TRANSITION, ms(500));
        assert_eq!(state.hovered(), None);
        assert_eq!(state.emphasis(0, REST, ms(700)), REST);
        assert_eq!(state.tooltips().len(), 1);
    }

    #[test]
    fn tooltips_expire_on_timeout_even_while_hovered() {
        let mut state = BubbleHoverState::default();
        state.enter(0, tooltip(0, 0), REST, HOVER, TRANSITION, ms(0));
        assert_eq!(state.expire(TIMEOUT, ms(2_999)), 0);
        assert_eq!(state.expire(TIMEOUT, ms(3_000)), 1);
        assert!(state.tooltips().is_empty());
        assert_eq!(state.hovered(), Some(0));
        assert_eq!(state.emphasis(0, REST, ms(3_000)), HOVER);
    }

    #[test]
    fn reentering_spawns_another_tooltip() {
        let mut state = BubbleHoverState::default();
        state.enter(0, tooltip(0, 0), REST, HOVER, TRANSITION, ms(0));
        state.enter(0, tooltip(0, 10), REST, HOVER, TRANSITION, ms(10));
        assert_eq!(state.tooltips().len(), 1);

        state.enter(1, tooltip(1, 300), REST, HOVER, TRANSITION, ms(300));
        assert_eq!(state.hovered(), Some(1));
        state.leave(REST, TRANSITION, ms(400));
        state.enter(0, tooltip(0, 600), REST, HOVER, TRANSITION, ms(600));
        assert_eq!(state.tooltips().len(), 3);
    }

    #[test]
    fn interrupted_transition_starts_from_current_emphasis() {
        let mut state = BubbleHoverState::default();
        state.enter(0, tooltip(0, 0), REST, HOVER, TRANSITION, ms(0));
        let midway = state.emphasis(0, REST, ms(100));
        state.leave(REST, TRANSITION, ms(100));
        assert_relative_eq!(state.emphasis(0, REST, ms(100)).scale, midway.scale);
        assert!(midway.scale > REST.scale && midway.scale < HOVER.scale);
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = BubbleHoverState::default();
        state.enter(0, tooltip(0, 0), REST, HOVER, TRANSITION, ms(0));
        state.reset();
        assert_eq!(state, BubbleHoverState::default());
    }
}
