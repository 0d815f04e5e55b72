use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width - 1 {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Formats a kB count with a binary unit suffix.
pub fn format_kb(kb: u64) -> String {
    const MB: u64 = 1024;
    const GB: u64 = 1024 * 1024;

    if kb >= GB {
        format!("{:.1}G", kb as f64 / GB as f64)
    } else if kb >= MB {
        format!("{:.1}M", kb as f64 / MB as f64)
    } else {
        format!("{kb}K")
    }
}

/// Cumulative CPU time as `minutes:seconds.hundredths`, like top's TIME+.
pub fn format_cpu_time(ticks: u64, ticks_per_second: u64) -> String {
    let hz = ticks_per_second.max(1);
    let hundredths = ticks.saturating_mul(100) / hz;
    let minutes = hundredths / 6000;
    let seconds = (hundredths / 100) % 60;
    format!("{minutes}:{seconds:02}.{:02}", hundredths % 100)
}

pub fn format_interval(ms: u64) -> String {
    if ms % 1000 == 0 {
        format!("{}s", ms / 1000)
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate_unicode("short", 10), "short");
        assert_eq!(truncate_unicode("/usr/bin/python3", 8), "/usr/bi\u{2026}");
        assert_eq!(truncate_unicode("abc", 0), "");
    }

    #[test]
    fn kb_units() {
        assert_eq!(format_kb(512), "512K");
        assert_eq!(format_kb(1536), "1.5M");
        assert_eq!(format_kb(3 * 1024 * 1024), "3.0G");
    }

    #[test]
    fn cpu_time_like_top() {
        assert_eq!(format_cpu_time(0, 100), "0:00.00");
        assert_eq!(format_cpu_time(12345, 100), "2:03.45");
        assert_eq!(format_cpu_time(250, 250), "0:01.00");
    }

    #[test]
    fn interval_labels() {
        assert_eq!(format_interval(2000), "2s");
        assert_eq!(format_interval(1500), "1.5s");
    }
}
