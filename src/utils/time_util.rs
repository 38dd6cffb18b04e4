use std::time::{self, Duration, SystemTime, UNIX_EPOCH};
/// represent current time with seconds and fraction of a second in nanoseconds
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeDurationStruct {
    /// seconds
    pub sec: u64,
    /// fraction of a second in nanoseconds
    pub nsec: u32,
}

/// calculate what time is it since `1970-1-1 00:00:00`,named as [UNIX_EPOCH]
pub fn now() -> TimeDurationStruct {
    // a clock set before the epoch reads as the epoch itself
    let now = SystemTime::now()
        .duration_since(time::UNIX_EPOCH)
        .unwrap_or_default();
    TimeDurationStruct {
        sec: now.as_secs(),
        nsec: now.subsec_nanos(),
    }
}

impl TimeDurationStruct {
    /// the zero timestamp carried by unallocated inodes
    pub fn is_zero(&self) -> bool {
        *self == TimeDurationStruct::default()
    }
}

impl From<TimeDurationStruct> for SystemTime {
    fn from(value: TimeDurationStruct) -> Self {
        let duration = Duration::new(value.sec, value.nsec);
        UNIX_EPOCH + duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_after_epoch() {
        let t = now();
        assert!(!t.is_zero());
        assert!(SystemTime::from(t) > UNIX_EPOCH);
    }

    #[test]
    fn test_convert_to_system_time() {
        let t = TimeDurationStruct { sec: 10, nsec: 5 };
        assert_eq!(SystemTime::from(t), UNIX_EPOCH + Duration::new(10, 5));
    }
}
