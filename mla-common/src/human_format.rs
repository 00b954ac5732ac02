//! Human-readable formatting for analysis display
//!
//! Provides consistent display strings for file sizes, durations, tempos and
//! percentages across the MLA client.

/// Size units, base 1024
const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const SIZE_BASE: u64 = 1024;

/// Tempo classification ladder: (exclusive upper bound, label)
const TEMPO_LADDER: [(f64, &str); 6] = [
    (60.0, "Very Slow (Largo)"),
    (80.0, "Slow (Adagio)"),
    (100.0, "Moderate (Andante)"),
    (120.0, "Medium (Moderato)"),
    (140.0, "Fast (Allegro)"),
    (180.0, "Very Fast (Presto)"),
];
const TEMPO_CEILING_LABEL: &str = "Extremely Fast";

/// Format a byte count with a binary unit prefix.
///
/// The value is rounded to two decimals and trailing zeros are dropped.
///
/// # Examples
///
/// ```
/// use mla_common::human_format::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// assert_eq!(format_file_size(1048576), "1 MB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = 0usize;
    let mut divisor = 1u64;
    while exponent + 1 < SIZE_UNITS.len() && bytes >= divisor * SIZE_BASE {
        divisor *= SIZE_BASE;
        exponent += 1;
    }

    let scaled = bytes as f64 / divisor as f64;
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", format_number(rounded), SIZE_UNITS[exponent])
}

/// Format a duration in seconds as `M:SS`.
///
/// Fractional seconds are truncated. Zero, negative and non-finite inputs
/// all render as `0:00`.
///
/// # Examples
///
/// ```
/// use mla_common::human_format::format_duration;
///
/// assert_eq!(format_duration(0.0), "0:00");
/// assert_eq!(format_duration(65.0), "1:05");
/// assert_eq!(format_duration(59.0), "0:59");
/// ```
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }

    let whole = seconds.floor() as u64;
    let minutes = whole / 60;
    let remaining = whole % 60;
    format!("{}:{:02}", minutes, remaining)
}

/// Classify a BPM value into a named tempo band.
///
/// Each bound is exclusive, so a value sitting on a boundary belongs to the
/// faster band (60 BPM is "Slow (Adagio)").
pub fn classify_tempo(bpm: f64) -> &'static str {
    TEMPO_LADDER
        .iter()
        .find(|(bound, _)| bpm < *bound)
        .map(|(_, label)| *label)
        .unwrap_or(TEMPO_CEILING_LABEL)
}

/// Format a 0..1 fraction as a whole-number percentage (`0.756` → `"76%"`).
pub fn format_percentage(fraction: f64) -> String {
    format!("{}%", format_number((fraction * 100.0).round()))
}

/// Format a JSON number for display.
///
/// Whole values print without a fractional part (`95.0` → `"95"`); other
/// values use the shortest representation that round-trips.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Collapses -0.0 as well
        return "0".to_string();
    }
    format!("{}", value)
}
