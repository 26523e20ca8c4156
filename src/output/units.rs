//! Human-readable byte and count formatting

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const COUNT_UNITS: [&str; 4] = ["", "k", "M", "B"];

/// Format a byte quantity with binary (1024) steps and two decimals.
///
/// Values below one kilobyte are shown as whole bytes.
pub fn format_bytes(bytes: f64) -> String {
    if !bytes.is_finite() || bytes <= 0.0 {
        return "0 B".to_string();
    }

    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{:.0} {}", value, BYTE_UNITS[unit])
    } else {
        format!("{:.2} {}", value, BYTE_UNITS[unit])
    }
}

/// Format a count with decimal (1000) steps
pub fn format_count(count: f64) -> String {
    if !count.is_finite() || count <= 0.0 {
        return "0".to_string();
    }

    let mut value = count;
    let mut unit = 0;
    while value >= 1000.0 && unit < COUNT_UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}{}", value, COUNT_UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0.0), "0 B");
        assert_eq!(format_bytes(512.0), "512 B");
        assert_eq!(format_bytes(1024.0), "1.00 KB");
        assert_eq!(format_bytes(1536.0), "1.50 KB");
        assert_eq!(format_bytes(5.0 * 1024.0 * 1024.0), "5.00 MB");
        assert_eq!(format_bytes(3.0 * 1024.0 * 1024.0 * 1024.0), "3.00 GB");
    }

    #[test]
    fn test_format_bytes_caps_at_largest_unit() {
        let huge = 2048.0 * 1024f64.powi(4);
        assert_eq!(format_bytes(huge), "2048.00 TB");
    }

    #[test]
    fn test_format_bytes_rejects_nonsense() {
        assert_eq!(format_bytes(-10.0), "0 B");
        assert_eq!(format_bytes(f64::NAN), "0 B");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(12.0), "12");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1500.0), "1.50k");
        assert_eq!(format_count(2_000_000.0), "2.00M");
        assert_eq!(format_count(7_000_000_000.0), "7.00B");
    }
}
