use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

/// One-shot timers whose expiry is delivered to
/// [`CurrentLocation::handle_timeout`](crate::current_location::CurrentLocation::handle_timeout).
pub trait TimerGateway {
    fn schedule(&self, after: Duration) -> TimerId;
    fn cancel(&self, id: TimerId);
}
