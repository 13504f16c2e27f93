/// Interval searched for the nucleus radius.
///
/// `lower` is the bound pulled in when a candidate deflects at least the target rate and
/// `upper` the one pulled in when it deflects too little. By convention `lower` starts at the
/// interatomic spacing and `upper` at a vanishing floor, so the two are not in numeric order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBracket {
    pub lower: f64,
    pub upper: f64,
}

impl SearchBracket {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        (self.upper - self.lower).abs()
    }

    pub fn contains(&self, radius: f64) -> bool {
        (self.lower.min(self.upper)..=self.lower.max(self.upper)).contains(&radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailureReason {
    NonFiniteRate { radius: f64 },
    IterationBudgetExhausted { iterations: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationState {
    Searching,
    Converged { radius: f64 },
    Failed(FailureReason),
}

impl CalibrationState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CalibrationState::Searching)
    }
}

/// One evaluated candidate and the bracket it left behind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRecord {
    pub iteration: usize,
    pub candidate: f64,
    pub observed_rate: f64,
    pub bracket: SearchBracket,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_geometry_ignores_bound_order() {
        let bracket = SearchBracket::new(4.0, 2.0);
        assert_eq!(bracket.midpoint(), 3.0);
        assert_eq!(bracket.width(), 2.0);
        assert!(bracket.contains(2.0));
        assert!(bracket.contains(3.5));
        assert!(bracket.contains(4.0));
        assert!(!bracket.contains(1.9));
        assert!(!bracket.contains(f64::NAN));
    }

    #[test]
    fn only_searching_is_non_terminal() {
        assert!(!CalibrationState::Searching.is_terminal());
        assert!(CalibrationState::Converged { radius: 1.0 }.is_terminal());
        assert!(
            CalibrationState::Failed(FailureReason::IterationBudgetExhausted { iterations: 3 })
                .is_terminal()
        );
    }
}
