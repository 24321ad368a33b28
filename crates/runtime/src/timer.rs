use foundation::time::Time;

/// One-shot deadline, the frame-driven counterpart of `setTimeout`.
///
/// The owner polls [`Deadline::fire`] with the current time; it returns `true`
/// exactly once per arming.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Deadline {
    due: Option<Time>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, now: Time, delay_s: f64) {
        self.due = Some(now.add_seconds(delay_s));
    }

    /// Arms only if not already pending.
    pub fn arm_if_idle(&mut self, now: Time, delay_s: f64) {
        if self.due.is_none() {
            self.arm(now, delay_s);
        }
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    pub fn due(&self) -> Option<Time> {
        self.due
    }

    /// Disarms and returns `true` if the deadline has passed.
    pub fn fire(&mut self, now: Time) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Deadline;
    use foundation::time::Time;

    #[test]
    fn fires_once_after_delay() {
        let mut d = Deadline::new();
        d.arm(Time(0.0), 0.5);
        assert!(!d.fire(Time(0.49)));
        assert!(d.fire(Time(0.5)));
        assert!(!d.fire(Time(1.0)));
        assert!(!d.is_pending());
    }

    #[test]
    fn cancel_disarms() {
        let mut d = Deadline::new();
        d.arm(Time(0.0), 0.5);
        d.cancel();
        assert!(!d.fire(Time(10.0)));
    }

    #[test]
    fn arm_if_idle_keeps_existing_deadline() {
        let mut d = Deadline::new();
        d.arm(Time(0.0), 0.5);
        d.arm_if_idle(Time(0.4), 0.5);
        assert_eq!(d.due(), Some(Time(0.5)));
    }
}
