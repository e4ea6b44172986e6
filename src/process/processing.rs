//! Distractor processing: one operation of the concurrent task.

use rand::Rng;

use crate::error::Result;
use crate::process::context::TrialContext;

impl<'p, R: Rng> TrialContext<'p, R> {
    /// Run one processing step and return its duration.
    ///
    /// The duration follows from a processing rate drawn around
    /// `−ln(1 − τOp) / Ta`, clamped to the free time when the free time
    /// includes the operation. A new distractor is bound to the current
    /// position while attention is captured, and every association decays.
    pub fn process(&mut self) -> Result<f64> {
        let rop = self
            .rng
            .rate(self.params.operation_rate_mean(), self.params.rate_std);
        let mut ta = self.params.log_tau_operation() / rop;
        if self.params.free_time_includes_operation && ta > self.params.free_time {
            ta = self.params.free_time;
        }

        let position = self.current_position();
        let distractor = self.encode_distractor(position, ta)?;
        self.advance_clock(ta);
        self.decay(ta, None);

        tracing::debug!(
            clock = self.clock,
            distractor = %distractor,
            duration = ta,
            "processing step"
        );
        Ok(ta)
    }
}
