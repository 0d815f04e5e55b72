use super::PlatformConstants;

/// Targets without `/proc` fall back to the Linux defaults.
pub struct Platform;

impl PlatformConstants for Platform {
    fn page_size_bytes() -> Option<u64> {
        None
    }

    fn clock_ticks_per_second() -> Option<u64> {
        None
    }
}
