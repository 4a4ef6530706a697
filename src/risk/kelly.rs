//! Kelly criterion stake sizing for parlay tickets

/// Kelly criterion calculator for an all-or-nothing parlay payout
#[derive(Debug, Clone, Copy)]
pub struct KellyCalculator {
    /// Hard cap on the fraction of bankroll (profile `max_kelly`)
    pub max_fraction: f64,
}

impl KellyCalculator {
    /// Create a new Kelly calculator; the cap never exceeds the full bankroll
    pub fn new(max_fraction: f64) -> Self {
        let max_fraction = if max_fraction.is_finite() {
            max_fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { max_fraction }
    }

    /// Optimal fraction of bankroll to stake
    ///
    /// For a ticket paying `net_multiplier` on a win:
    /// - Net odds: b = net_multiplier - 1
    /// - Kelly fraction: f* = (b*p - q) / b, floored at zero
    pub fn fraction(&self, win_probability: f64, net_multiplier: f64) -> f64 {
        let b = net_multiplier - 1.0;
        if !(b > 0.0) || !win_probability.is_finite() {
            return 0.0;
        }

        let p = win_probability.clamp(0.0, 1.0);
        let q = 1.0 - p;
        let kelly = (b * p - q) / b;

        if !kelly.is_finite() {
            return 0.0;
        }
        kelly.max(0.0).min(self.max_fraction)
    }
}

impl Default for KellyCalculator {
    fn default() -> Self {
        Self::new(0.15)
    }
}
