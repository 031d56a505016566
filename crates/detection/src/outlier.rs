//! Fast gate counting raw samples above a fixed outlier level.

/// Counts outlier ticks and forces the attack state once the count
/// reaches the start delay.
///
/// Ticks at or below the level bleed the count back toward zero instead
/// of clearing it. While an attack is already running the count is left
/// alone by further outliers.
#[derive(Debug, Clone)]
pub struct OutlierGate {
    threshold: f64,
    start_alarm_delay: u32,
    count: u32,
}

impl OutlierGate {
    pub fn new(threshold: f64, start_alarm_delay: u32) -> Self {
        Self {
            threshold,
            start_alarm_delay,
            count: 0,
        }
    }

    /// Feeds one raw sample. Returns true on the tick the count reaches
    /// the start delay while not already under attack.
    pub fn observe(&mut self, value: f64, under_attack: bool) -> bool {
        if value > self.threshold {
            if under_attack {
                return false;
            }
            self.count += 1;
            if self.count >= self.start_alarm_delay {
                // stays one below the delay for as long as the attack runs
                self.count = self.start_alarm_delay.saturating_sub(1);
                return true;
            }
        } else if self.count > 0 {
            self.count -= 1;
        }
        false
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trips_exactly_at_the_delay() {
        let mut gate = OutlierGate::new(0.65, 4);
        assert!(!gate.observe(0.7, false));
        assert!(!gate.observe(0.7, false));
        assert!(!gate.observe(0.7, false));
        assert!(gate.observe(0.7, false));
        assert_eq!(gate.count(), 3);
    }

    #[test]
    fn quiet_ticks_bleed_the_count() {
        let mut gate = OutlierGate::new(0.65, 4);
        gate.observe(0.7, false);
        gate.observe(0.7, false);
        assert_eq!(gate.count(), 2);
        gate.observe(0.1, false);
        assert_eq!(gate.count(), 1);
        gate.observe(0.1, false);
        gate.observe(0.1, false);
        assert_eq!(gate.count(), 0);
    }

    #[test]
    fn outliers_during_an_attack_leave_the_count_alone() {
        let mut gate = OutlierGate::new(0.65, 2);
        gate.observe(0.9, false);
        assert!(gate.observe(0.9, false));
        assert_eq!(gate.count(), 1);
        assert!(!gate.observe(0.9, true));
        assert_eq!(gate.count(), 1);
    }

    #[test]
    fn quiet_ticks_during_an_attack_still_bleed() {
        let mut gate = OutlierGate::new(0.65, 2);
        gate.observe(0.9, false);
        assert!(gate.observe(0.9, false));
        gate.observe(0.1, true);
        assert_eq!(gate.count(), 0);
    }

    #[test]
    fn values_at_the_threshold_do_not_count() {
        let mut gate = OutlierGate::new(0.65, 1);
        assert!(!gate.observe(0.65, false));
        assert!(gate.observe(0.66, false));
    }
}
