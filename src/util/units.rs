//! Units formatting and conversion utilities
//!
//! Throughput arithmetic shared by the I/O primitives, plus human-readable
//! formatting for sizes and speeds.

use crate::BYTES_PER_MB;
use std::time::Duration;

/// Payload size in the largest binary unit it reaches
///
/// # Examples
/// ```
/// use diskspeed::util::units::format_bytes;
///
/// assert_eq!(format_bytes(4096), "4.0 KiB");
/// assert_eq!(format_bytes(256 * 1024 * 1024), "256.0 MiB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const SCALES: [(u64, &str); 4] = [
        (1 << 40, "TiB"),
        (1 << 30, "GiB"),
        (1 << 20, "MiB"),
        (1 << 10, "KiB"),
    ];

    SCALES
        .iter()
        .find(|(scale, _)| bytes >= *scale)
        .map(|(scale, unit)| format!("{:.1} {}", bytes as f64 / *scale as f64, unit))
        .unwrap_or_else(|| format!("{} B", bytes))
}

/// Calculate throughput in MB/s from bytes and duration.
/// A zero duration yields `0` instead of infinity.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use diskspeed::util::units::calculate_throughput_mbps;
///
/// let throughput = calculate_throughput_mbps(1048576, Duration::from_secs(1));
/// assert!((throughput - 1.0).abs() < 0.01);
/// ```
pub fn calculate_throughput_mbps(bytes: u64, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 0.0;
    }

    bytes as f64 / duration.as_secs_f64() / BYTES_PER_MB
}

/// Throughput for the results table, in the same MB/s terms as the log.
/// Zero, negative and non-finite speeds render as `0.00 MB/s`.
///
/// # Examples
/// ```
/// use diskspeed::util::units::format_throughput;
///
/// assert_eq!(format_throughput(1536.0), "1.50 GB/s");
/// assert_eq!(format_throughput(87.25), "87.25 MB/s");
/// ```
pub fn format_throughput(mbps: f64) -> String {
    if !mbps.is_finite() || mbps <= 0.0 {
        "0.00 MB/s".to_string()
    } else if mbps >= 1024.0 {
        format!("{:.2} GB/s", mbps / 1024.0)
    } else if mbps >= 1.0 {
        format!("{:.2} MB/s", mbps)
    } else {
        format!("{:.1} KB/s", mbps * 1024.0)
    }
}
