//! Attentional refreshing of the studied positions during free time.

use rand::Rng;

use crate::memory::retrieval::RetrievalMode;
use crate::process::context::TrialContext;

impl<'p, R: Rng> TrialContext<'p, R> {
    /// Spend up to `time_available` refreshing the studied positions.
    ///
    /// Positions are visited cyclically in windows of
    /// `min(attentional_focus_size, last_position)`. The first position of a
    /// window draws the refresh duration, the others reuse it and share the
    /// learning rate. The budget shrinks by one duration per window while the
    /// clock advances by it for every refreshed position. The cursor restarts
    /// at the first position on every call unless `refresh_last_stopped` is
    /// set.
    pub fn refresh(&mut self, time_available: f64) {
        let last = self.last_position;
        if last == 0 {
            return;
        }
        let window = self.params.attentional_focus_size.min(last);
        let mut cursor = if self.params.refresh_last_stopped && self.refresh_cursor < last {
            self.refresh_cursor
        } else {
            0
        };

        let mut time = time_available;
        let mut steps = 0usize;
        while time > 0.0 {
            let mut step = None;
            for _ in 0..window {
                let retrieval = self.retrieve(cursor, RetrievalMode::Refresh);
                let d = self.reencode(
                    retrieval.item,
                    retrieval.best_wm_item,
                    cursor,
                    time,
                    window,
                    step,
                );
                step.get_or_insert(d);
                cursor = (cursor + 1) % last;
            }
            steps += 1;

            let step = step.unwrap_or(0.0);
            if step <= 0.0 {
                break;
            }
            time = (time - step).max(0.0);
        }

        self.refresh_cursor = cursor;
        tracing::debug!(
            clock = self.clock,
            time_available,
            steps,
            next = cursor,
            "refresh done"
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::process::context::TrialContext;
    use crate::random::RandomSource;
    use crate::representation::item::ItemId;
    use crate::simulation::params::ModelParams;

    fn studied(params: &ModelParams, n: usize, seed: u64) -> TrialContext<'_> {
        let mut ctx = TrialContext::new(params, RandomSource::seeded(seed), None);
        for i in 0..n {
            let p = ctx.open_position();
            ctx.encode_memorandum(ItemId(i), p);
        }
        ctx
    }

    #[test]
    fn test_nothing_to_refresh() {
        let params = ModelParams::default();
        let mut ctx = TrialContext::new(&params, RandomSource::seeded(1), None);
        ctx.refresh(1.0);
        assert_eq!(ctx.clock, 0.0);
        assert_eq!(ctx.associations.total_strength(), 0.0);
    }

    #[test]
    fn test_refresh_consumes_budget() {
        let params = ModelParams {
            rate_std: 0.0,
            ..Default::default()
        };
        let mut ctx = studied(&params, 3, 2);
        let clock = ctx.clock;
        ctx.refresh(1.0);
        // Steps of Tr = 0.08, the last one clamped to what is left.
        assert!((ctx.clock - clock - 1.0).abs() < 1e-9, "{}", ctx.clock - clock);
        // 12.5 steps → 13 visits over 3 positions starting from the first.
        assert_eq!(ctx.refresh_cursor, 13 % 3);
    }

    #[test]
    fn test_zero_budget_is_noop() {
        let params = ModelParams::default();
        let mut ctx = studied(&params, 2, 3);
        let clock = ctx.clock;
        let strength = ctx.associations.total_strength();
        ctx.refresh(0.0);
        assert_eq!(ctx.clock, clock);
        assert_eq!(ctx.associations.total_strength(), strength);
    }

    #[test]
    fn test_refresh_keeps_items_alive() {
        let params = ModelParams {
            rate_std: 0.0,
            sigma: 0.0,
            ..Default::default()
        };
        let mut refreshed = studied(&params, 2, 4);
        let mut idle = studied(&params, 2, 4);

        refreshed.refresh(2.0);
        idle.advance_clock(2.0);
        idle.decay(2.0, None);

        for p in 0..2 {
            let cue = refreshed.positions.get(p);
            let a = refreshed.associations.activation(ItemId(p), cue);
            let b = idle.associations.activation(ItemId(p), idle.positions.get(p));
            assert!(a > b, "position {}: {} <= {}", p, a, b);
        }
    }

    #[test]
    fn test_cursor_restarts_unless_last_stopped() {
        let params = ModelParams {
            rate_std: 0.0,
            ..Default::default()
        };
        let mut ctx = studied(&params, 3, 5);
        ctx.refresh(0.1);
        assert_eq!(ctx.refresh_cursor, 2);
        ctx.refresh(0.05);
        assert_eq!(ctx.refresh_cursor, 1);

        let resume = ModelParams {
            refresh_last_stopped: true,
            ..params.clone()
        };
        let mut ctx = studied(&resume, 3, 5);
        ctx.refresh(0.1);
        assert_eq!(ctx.refresh_cursor, 2);
        ctx.refresh(0.05);
        assert_eq!(ctx.refresh_cursor, 0);
    }

    #[test]
    fn test_focus_window_shares_duration() {
        let params = ModelParams {
            rate_std: 0.0,
            attentional_focus_size: 4,
            ..Default::default()
        };
        let mut ctx = studied(&params, 2, 6);
        let clock = ctx.clock;
        ctx.refresh(0.08);
        // Window clipped to the two studied positions: one step of the budget,
        // but the clock runs once per refreshed position.
        assert!((ctx.clock - clock - 0.16).abs() < 1e-9);
        assert_eq!(ctx.refresh_cursor, 0);
    }
}
