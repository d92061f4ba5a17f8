use serde::Serialize;

use crate::scenario::EconomyConfig;

/// Slack for drift from summing fractional frame lengths.
const CLOCK_EPSILON: f64 = 1e-6;

/// Player purse and round clock. Ticks independently of the flock.
#[derive(Debug, Clone, Serialize)]
pub struct Economy {
    money: f64,
    elapsed: f64,
    income_per_second: f64,
    round_seconds: f64,
}

impl Economy {
    pub fn new(config: &EconomyConfig) -> Self {
        Self {
            money: config.starting_money,
            elapsed: 0.0,
            income_per_second: config.income_per_second,
            round_seconds: config.round_seconds,
        }
    }

    pub fn tick(&mut self, dt: f64) {
        self.money += self.income_per_second * dt;
        self.elapsed += dt;
    }

    /// Deducts `amount` only when the purse covers it.
    pub fn spend(&mut self, amount: f64) -> bool {
        if self.money >= amount {
            self.money -= amount;
            true
        } else {
            false
        }
    }

    pub fn earn(&mut self, amount: f64) {
        self.money += amount;
    }

    pub fn money(&self) -> f64 {
        self.money
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn remaining(&self) -> f64 {
        (self.round_seconds - self.elapsed).max(0.0)
    }

    pub fn money_display(&self) -> i64 {
        self.money.floor() as i64
    }

    pub fn elapsed_display(&self) -> i64 {
        self.elapsed.floor() as i64
    }

    pub fn remaining_display(&self) -> i64 {
        self.remaining().floor() as i64
    }

    pub fn is_over(&self) -> bool {
        self.remaining() <= CLOCK_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn economy() -> Economy {
        Economy::new(&EconomyConfig::default())
    }

    #[test]
    fn accrues_at_rate() {
        let mut e = economy();
        e.tick(2.5);
        assert_eq!(e.money(), 2.5);
        assert_eq!(e.money_display(), 2);
        assert_eq!(e.elapsed_display(), 2);
        assert_eq!(e.remaining(), 97.5);
        assert_eq!(e.remaining_display(), 97);
    }

    #[test]
    fn spend_is_gated() {
        let mut e = economy();
        e.tick(4.0);
        assert!(!e.spend(5.0));
        assert_eq!(e.money(), 4.0);
        e.tick(1.0);
        assert!(e.spend(5.0));
        assert_eq!(e.money(), 0.0);
    }

    #[test]
    fn countdown_floors_at_zero() {
        let mut e = economy();
        e.tick(120.0);
        assert_eq!(e.remaining(), 0.0);
        assert!(e.is_over());
    }

    #[test]
    fn sixtieth_frames_finish_the_round() {
        let mut e = economy();
        for _ in 0..6_000 {
            e.tick(1.0 / 60.0);
        }
        assert!(e.is_over());
        assert_eq!(e.remaining_display(), 0);
    }
}
