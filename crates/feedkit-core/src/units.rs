//! Unit conversion utilities
//!
//! Handles conversion between Metric (mm, mm/min) and Imperial (in, ipm)
//! systems and formats machining values for display. The remote service
//! always reports lengths in mm and speeds in mm/min.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Display text for a value the server did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// Measurement system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// Kind of quantity being displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// A length in mm (depth of cut, stepover)
    Length,
    /// A speed in mm/min (feed, plunge)
    Speed,
}

/// Convert millimeters to inches
pub fn mm_to_inches(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

/// Convert inches to millimeters
pub fn inches_to_mm(inches: f64) -> f64 {
    inches * MM_PER_INCH
}

/// Convert mm/min to inches/min
pub fn mmpm_to_ipm(mmpm: f64) -> f64 {
    mmpm / MM_PER_INCH
}

/// Convert inches/min to mm/min
pub fn ipm_to_mmpm(ipm: f64) -> f64 {
    ipm * MM_PER_INCH
}

/// Format a raw metric value for display
///
/// * `value` - Value in mm or mm/min, `None` when the server had no value
/// * `quantity` - Whether the value is a length or a speed
/// * `system` - Target measurement system
///
/// `None` always renders as `"N/A"` and is never converted.
pub fn format_value(value: Option<f64>, quantity: Quantity, system: MeasurementSystem) -> String {
    let Some(value) = value else {
        return NOT_AVAILABLE.to_string();
    };

    match (quantity, system) {
        (Quantity::Length, MeasurementSystem::Metric) => format!("{:.2} mm", value),
        (Quantity::Length, MeasurementSystem::Imperial) => {
            format!("{:.3} in", mm_to_inches(value))
        }
        (Quantity::Speed, MeasurementSystem::Metric) => format!("{:.1} mm/min", value),
        (Quantity::Speed, MeasurementSystem::Imperial) => {
            format!("{:.1} ipm", mmpm_to_ipm(value))
        }
    }
}

/// Format a spindle speed with thousands separators (e.g. `18,000`)
pub fn format_rpm(rpm: Option<f64>) -> String {
    let Some(rpm) = rpm else {
        return NOT_AVAILABLE.to_string();
    };

    let rounded = rpm.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Get the length unit label for the given system ("mm" or "in")
pub fn get_unit_label(system: MeasurementSystem) -> &'static str {
    match system {
        MeasurementSystem::Metric => "mm",
        MeasurementSystem::Imperial => "in",
    }
}

/// Get the speed unit label for the given system ("mm/min" or "ipm")
pub fn get_speed_label(system: MeasurementSystem) -> &'static str {
    match system {
        MeasurementSystem::Metric => "mm/min",
        MeasurementSystem::Imperial => "ipm",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_round_trip() {
        for x in [10.0, 0.5, 254.0] {
            assert!((inches_to_mm(mm_to_inches(x)) - x).abs() < 1e-9);
        }
        assert_eq!(mm_to_inches(25.4), 1.0);
    }

    #[test]
    fn test_speed_round_trip() {
        for x in [120.0, 1000.0, 3.5] {
            assert!((ipm_to_mmpm(mmpm_to_ipm(x)) - x).abs() < 1e-9);
        }
    }

    #[test]
    fn test_metric_formatting() {
        assert_eq!(
            format_value(Some(3.175), Quantity::Length, MeasurementSystem::Metric),
            "3.17 mm"
        );
        assert_eq!(
            format_value(Some(120.0), Quantity::Speed, MeasurementSystem::Metric),
            "120.0 mm/min"
        );
    }

    #[test]
    fn test_imperial_formatting() {
        assert_eq!(
            format_value(Some(12.7), Quantity::Length, MeasurementSystem::Imperial),
            "0.500 in"
        );
        // 120 mm/min = 4.724 ipm
        assert_eq!(
            format_value(Some(120.0), Quantity::Speed, MeasurementSystem::Imperial),
            "4.7 ipm"
        );
    }

    #[test]
    fn test_missing_values() {
        for system in [MeasurementSystem::Metric, MeasurementSystem::Imperial] {
            assert_eq!(format_value(None, Quantity::Length, system), "N/A");
            assert_eq!(format_value(None, Quantity::Speed, system), "N/A");
        }
        assert_eq!(format_rpm(None), "N/A");
    }

    #[test]
    fn test_rpm_grouping() {
        assert_eq!(format_rpm(Some(18000.0)), "18,000");
        assert_eq!(format_rpm(Some(999.0)), "999");
        assert_eq!(format_rpm(Some(1234567.4)), "1,234,567");
        assert_eq!(format_rpm(Some(0.0)), "0");
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(get_unit_label(MeasurementSystem::Metric), "mm");
        assert_eq!(get_unit_label(MeasurementSystem::Imperial), "in");
        assert_eq!(get_speed_label(MeasurementSystem::Imperial), "ipm");
    }

    #[test]
    fn test_measurement_system_parsing() {
        assert_eq!("mm".parse::<MeasurementSystem>(), Ok(MeasurementSystem::Metric));
        assert_eq!(
            "Imperial".parse::<MeasurementSystem>(),
            Ok(MeasurementSystem::Imperial)
        );
        assert!("furlongs".parse::<MeasurementSystem>().is_err());
    }

    #[test]
    fn test_default_system_is_metric() {
        assert_eq!(MeasurementSystem::default(), MeasurementSystem::Metric);
    }
}
