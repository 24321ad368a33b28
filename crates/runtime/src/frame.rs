use foundation::time::Time;

/// Metadata for one rendered frame.
///
/// `time` is host wall-clock time (seconds) at the start of the frame, so
/// deadlines compare against it directly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub index: u64,
    /// Seconds since the previous frame.
    pub dt_s: f64,
    pub time: Time,
}

impl Frame {
    /// First frame at host time `time`.
    pub fn first(time: Time) -> Self {
        Self {
            index: 0,
            dt_s: 0.0,
            time,
        }
    }

    /// Next frame at host time `time`. Backwards clocks yield `dt_s == 0`.
    pub fn advance_to(self, time: Time) -> Self {
        Self {
            index: self.index + 1,
            dt_s: time.since(self.time),
            time,
        }
    }
}
