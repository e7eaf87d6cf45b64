use crate::{Error, MAX_DEPTH};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DepthState {
    /// The working depth is applied and at most the baseline
    Settled(u32),

    /// The working depth went past the baseline; deeper data must be
    /// simulated before it can be committed
    PendingConfirmation(u32),

    /// A re-simulation up to this depth has been requested and not answered
    Simulating(u32),
}

/// Outcome of a step on the depth control
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DepthChange {
    /// Already at the bound, nothing moved
    Unchanged,
    Applied(u32),
    NeedsConfirmation(u32),
}

impl DepthChange {
    pub fn new_depth(&self) -> Option<u32> {
        match self {
            DepthChange::Unchanged => None,
            DepthChange::Applied(d) | DepthChange::NeedsConfirmation(d) => Some(*d),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepthControl {
    working: u32,
    baseline: u32,
    last_committed: u32,
    state: DepthState,
}

impl DepthControl {
    /// State right after a load that materialized data up to `baseline`
    pub fn new(baseline: u32) -> DepthControl {
        let working = baseline.min(MAX_DEPTH);
        DepthControl {
            working,
            baseline,
            last_committed: working,
            state: DepthState::Settled(working),
        }
    }

    /// The depth the filter currently applies
    pub fn working_depth(&self) -> u32 {
        self.working
    }

    pub fn baseline(&self) -> u32 {
        self.baseline
    }

    pub fn last_committed(&self) -> u32 {
        self.last_committed
    }

    pub fn state(&self) -> DepthState {
        self.state
    }

    pub fn increase(&mut self) -> Result<DepthChange, Error> {
        let next = self.working.checked_add(1).filter(|d| *d <= MAX_DEPTH);
        self.step(next)
    }

    pub fn decrease(&mut self) -> Result<DepthChange, Error> {
        let next = self.working.checked_sub(1);
        self.step(next)
    }

    fn step(&mut self, next: Option<u32>) -> Result<DepthChange, Error> {
        if let DepthState::Simulating(_) = self.state {
            return Err(Error::Busy);
        }
        let depth = match next {
            None => return Ok(DepthChange::Unchanged),
            Some(d) => d,
        };
        self.working = depth;
        if depth > self.baseline {
            self.state = DepthState::PendingConfirmation(depth);
            Ok(DepthChange::NeedsConfirmation(depth))
        } else {
            self.state = DepthState::Settled(depth);
            self.last_committed = depth;
            Ok(DepthChange::Applied(depth))
        }
    }

    /// Accepts the pending depth, returning the depth to simulate up to
    pub fn confirm(&mut self) -> Result<u32, Error> {
        match self.state {
            DepthState::PendingConfirmation(d) => {
                self.state = DepthState::Simulating(d);
                Ok(d)
            }
            DepthState::Simulating(_) => Err(Error::Busy),
            DepthState::Settled(_) => Err(Error::NotPending),
        }
    }

    /// Drops the pending depth, returning the depth reverted to
    pub fn cancel(&mut self) -> Result<u32, Error> {
        match self.state {
            DepthState::PendingConfirmation(_) => Ok(self.revert()),
            DepthState::Simulating(_) => Err(Error::Busy),
            DepthState::Settled(_) => Err(Error::NotPending),
        }
    }

    /// The re-simulation request failed; go back to the last committed depth
    pub fn simulation_failed(&mut self) -> u32 {
        self.revert()
    }

    fn revert(&mut self) -> u32 {
        self.working = self.last_committed;
        self.state = DepthState::Settled(self.last_committed);
        self.last_committed
    }

    /// Stop positions of the slider gradient, as percentages: up to the
    /// working depth, then up to the baseline
    pub fn gradient(&self) -> (f64, f64) {
        let pct = |d: u32| f64::from(d.min(MAX_DEPTH)) * 100.0 / f64::from(MAX_DEPTH);
        (pct(self.working), pct(self.baseline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_settled_at_baseline() {
        let d = DepthControl::new(3);
        assert_eq!(d.state(), DepthState::Settled(3));
        assert_eq!(d.working_depth(), 3);
        assert_eq!(d.last_committed(), 3);
    }

    #[test]
    fn crossing_baseline_needs_confirmation() {
        let mut d = DepthControl::new(2);
        assert_eq!(d.increase(), Ok(DepthChange::NeedsConfirmation(3)));
        assert_eq!(d.state(), DepthState::PendingConfirmation(3));
        assert_eq!(d.working_depth(), 3);
        assert_eq!(d.last_committed(), 2);

        // further steps past the baseline stay pending
        assert_eq!(d.increase(), Ok(DepthChange::NeedsConfirmation(4)));
        assert_eq!(d.decrease(), Ok(DepthChange::NeedsConfirmation(3)));
        assert_eq!(d.last_committed(), 2);

        // coming back to the baseline settles again
        assert_eq!(d.decrease(), Ok(DepthChange::Applied(2)));
        assert_eq!(d.state(), DepthState::Settled(2));
    }

    #[test]
    fn within_baseline_applies_immediately() {
        let mut d = DepthControl::new(2);
        assert_eq!(d.decrease(), Ok(DepthChange::Applied(1)));
        assert_eq!(d.last_committed(), 1);
        assert_eq!(d.increase(), Ok(DepthChange::Applied(2)));
        assert_eq!(d.state(), DepthState::Settled(2));
    }

    #[test]
    fn cancel_reverts_to_last_committed() {
        let mut d = DepthControl::new(3);
        assert_eq!(d.increase(), Ok(DepthChange::NeedsConfirmation(4)));
        assert_eq!(d.cancel(), Ok(3));
        assert_eq!(d.state(), DepthState::Settled(3));
        assert_eq!(d.working_depth(), 3);
    }

    #[test]
    fn confirm_and_cancel_need_a_pending_change() {
        let mut d = DepthControl::new(3);
        assert_eq!(d.confirm(), Err(Error::NotPending));
        assert_eq!(d.cancel(), Err(Error::NotPending));
    }

    #[test]
    fn controls_are_disabled_while_simulating() {
        let mut d = DepthControl::new(1);
        d.increase().unwrap();
        assert_eq!(d.confirm(), Ok(2));
        assert_eq!(d.state(), DepthState::Simulating(2));
        assert_eq!(d.increase(), Err(Error::Busy));
        assert_eq!(d.decrease(), Err(Error::Busy));
        assert_eq!(d.confirm(), Err(Error::Busy));
        assert_eq!(d.cancel(), Err(Error::Busy));
    }

    #[test]
    fn simulation_outcomes() {
        let mut d = DepthControl::new(1);
        d.increase().unwrap();
        assert_eq!(d.confirm(), Ok(2));
        assert_eq!(d.simulation_failed(), 1);
        assert_eq!(d, DepthControl::new(1));

        let mut d = DepthControl::new(2);
        d.increase().unwrap();
        d.confirm().unwrap();
        assert_eq!(d.simulation_failed(), 2);
        assert_eq!(d.state(), DepthState::Settled(2));
        assert_eq!(d.working_depth(), 2);
    }

    #[test]
    fn clamped_to_slider_range() {
        let mut d = DepthControl::new(0);
        assert_eq!(d.decrease(), Ok(DepthChange::Unchanged));
        assert_eq!(d.state(), DepthState::Settled(0));

        let mut d = DepthControl::new(MAX_DEPTH);
        assert_eq!(d.increase(), Ok(DepthChange::Unchanged));
        assert_eq!(d.working_depth(), MAX_DEPTH);

        // a baseline past the slider still shows the top of the slider
        let d = DepthControl::new(8);
        assert_eq!(d.working_depth(), MAX_DEPTH);
        assert_eq!(d.gradient(), (100.0, 100.0));
    }

    #[test]
    fn gradient_stops() {
        let mut d = DepthControl::new(2);
        assert_eq!(d.gradient(), (40.0, 40.0));
        d.decrease().unwrap();
        assert_eq!(d.gradient(), (20.0, 40.0));
    }
}
