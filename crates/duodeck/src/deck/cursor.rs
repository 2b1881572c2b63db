use std::num::NonZeroUsize;

/// One step of linear navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Back,
    Forward,
}

impl Step {
    /// Interpret a signed delta. Only `-1` and `+1` are steps.
    pub fn from_delta(delta: i32) -> Option<Self> {
        match delta {
            -1 => Some(Self::Back),
            1 => Some(Self::Forward),
            _ => None,
        }
    }
}

/// A successful cursor change, from one 1-based slide to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

impl Move {
    /// Direction of travel. Re-selecting the same slide counts as forward.
    pub fn direction(&self) -> Step {
        if self.to < self.from {
            Step::Back
        } else {
            Step::Forward
        }
    }
}

/// The slide cursor shared by both windows: states `1..=total`, starting at 1.
///
/// Requests that would leave the range are ignored, never clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideCursor {
    current: usize,
    total: NonZeroUsize,
}

impl SlideCursor {
    pub fn new(total: NonZeroUsize) -> Self {
        Self { current: 1, total }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total.get()
    }

    pub fn contains(&self, index: usize) -> bool {
        (1..=self.total()).contains(&index)
    }

    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total()
    }

    /// Fraction of the deck shown so far, `current / total`.
    pub fn progress(&self) -> f32 {
        self.current as f32 / self.total() as f32
    }

    pub fn counter_label(&self) -> String {
        format!("{} / {}", self.current, self.total())
    }

    pub fn go_to(&mut self, index: usize) -> Option<Move> {
        if !self.contains(index) {
            return None;
        }
        let from = self.current;
        self.current = index;
        Some(Move { from, to: index })
    }

    pub fn advance(&mut self, step: Step) -> Option<Move> {
        let target = match step {
            Step::Back => self.current.checked_sub(1)?,
            Step::Forward => self.current + 1,
        };
        self.go_to(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(total: usize) -> SlideCursor {
        SlideCursor::new(NonZeroUsize::new(total).unwrap())
    }

    #[test]
    fn test_starts_at_first_slide() {
        let c = cursor(14);
        assert_eq!(c.current(), 1);
        assert!(c.is_first());
        assert!(!c.is_last());
        assert_eq!(c.counter_label(), "1 / 14");
    }

    #[test]
    fn test_go_to_every_valid_index() {
        let mut c = cursor(14);
        for n in 1..=14 {
            let mv = c.go_to(n).expect("in range");
            assert_eq!(mv.to, n);
            assert_eq!(c.current(), n);
            assert!((c.progress() - n as f32 / 14.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_go_to_out_of_range_is_ignored() {
        let mut c = cursor(14);
        c.go_to(6);
        assert_eq!(c.go_to(0), None);
        assert_eq!(c.go_to(15), None);
        assert_eq!(c.go_to(usize::MAX), None);
        assert_eq!(c.current(), 6);
    }

    #[test]
    fn test_advance_stops_at_both_ends() {
        let mut c = cursor(3);
        assert_eq!(c.advance(Step::Back), None);
        assert_eq!(c.current(), 1);

        c.go_to(3);
        assert!(c.is_last());
        assert_eq!(c.advance(Step::Forward), None);
        assert_eq!(c.current(), 3);
    }

    #[test]
    fn test_single_slide_deck() {
        let mut c = cursor(1);
        assert!(c.is_first() && c.is_last());
        assert_eq!(c.advance(Step::Forward), None);
        assert_eq!(c.advance(Step::Back), None);
        assert!((c.progress() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_scenario_never_reaches_zero() {
        let mut c = cursor(14);
        for _ in 0..3 {
            c.advance(Step::Forward);
        }
        assert_eq!(c.current(), 4);
        c.go_to(1);
        c.advance(Step::Back);
        assert_eq!(c.current(), 1);
        assert!((c.progress() * 100.0 - 7.142_857).abs() < 1e-3);
    }

    #[test]
    fn test_move_direction() {
        assert_eq!(Move { from: 2, to: 3 }.direction(), Step::Forward);
        assert_eq!(Move { from: 3, to: 1 }.direction(), Step::Back);
        assert_eq!(Move { from: 2, to: 2 }.direction(), Step::Forward);
    }

    #[test]
    fn test_step_from_delta() {
        assert_eq!(Step::from_delta(1), Some(Step::Forward));
        assert_eq!(Step::from_delta(-1), Some(Step::Back));
        assert_eq!(Step::from_delta(0), None);
        assert_eq!(Step::from_delta(2), None);
    }
}
