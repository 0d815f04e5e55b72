/// Kernel constants needed to scale raw counters.
pub trait PlatformConstants {
    fn page_size_bytes() -> Option<u64>;
    fn clock_ticks_per_second() -> Option<u64>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod fallback;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(not(target_os = "linux"))]
use fallback as platform_impl;

const DEFAULT_PAGE_SIZE: u64 = 4096;
const DEFAULT_CLOCK_TICKS: u64 = 100;

/// Page size in KiB, never below 1.
pub fn page_size_kb() -> u64 {
    let bytes = platform_impl::Platform::page_size_bytes().unwrap_or(DEFAULT_PAGE_SIZE);
    (bytes / 1024).max(1)
}

/// Scheduler ticks per second (USER_HZ), never 0.
pub fn clock_ticks_per_second() -> u64 {
    platform_impl::Platform::clock_ticks_per_second()
        .filter(|&hz| hz > 0)
        .unwrap_or(DEFAULT_CLOCK_TICKS)
}
