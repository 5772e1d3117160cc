use chrono::{FixedOffset, Offset, Utc};

/// Supplies the offset that zone-less datetime parameters are read in.
#[cfg_attr(test, mockall::automock)]
pub trait TimeZoneProvider: Send + Sync {
    fn current_offset(&self) -> FixedOffset;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UtcZone;

impl TimeZoneProvider for UtcZone {
    fn current_offset(&self) -> FixedOffset {
        Utc.fix()
    }
}

impl TimeZoneProvider for FixedOffset {
    fn current_offset(&self) -> FixedOffset {
        *self
    }
}
