//! Derived cut parameters
//!
//! Feed, depth of cut and plunge scale with the multiplier. The profile pass
//! applies a further fixed [`PROFILE_FACTOR`] to model a lighter finishing
//! cut. RPM and stepover are never scaled.

use super::multiplier::Multiplier;
use super::snapshot::ResultSnapshot;
use crate::units::{format_rpm, format_value, MeasurementSystem, Quantity};

/// Fixed reduction applied to feed, DOC and plunge for the profile pass
pub const PROFILE_FACTOR: f64 = 0.9;

/// Cut parameters after applying the multiplier (mm, mm/min)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutParameters {
    /// Spindle speed, unscaled
    pub rpm: Option<f64>,
    /// Feed rate
    pub feed: Option<f64>,
    /// Depth of cut
    pub depth_of_cut: Option<f64>,
    /// Stepover, unscaled
    pub stepover: Option<f64>,
    /// Plunge rate
    pub plunge: Option<f64>,
}

/// One labelled, formatted value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// Row label
    pub label: &'static str,
    /// Formatted value including unit
    pub value: String,
}

impl CutParameters {
    /// Parameters for area clearance (pocketing)
    pub fn area_clearance(snapshot: &ResultSnapshot, multiplier: Multiplier) -> Self {
        Self {
            rpm: snapshot.rpm,
            feed: multiplier.apply(snapshot.feed),
            depth_of_cut: multiplier.apply(snapshot.depth_of_cut),
            stepover: snapshot.stepover,
            plunge: multiplier.apply(snapshot.plunge),
        }
    }

    /// Parameters for the profile (finishing) pass
    pub fn profile(snapshot: &ResultSnapshot, multiplier: Multiplier) -> Self {
        let base = Self::area_clearance(snapshot, multiplier);
        Self {
            feed: base.feed.map(|v| v * PROFILE_FACTOR),
            depth_of_cut: base.depth_of_cut.map(|v| v * PROFILE_FACTOR),
            plunge: base.plunge.map(|v| v * PROFILE_FACTOR),
            ..base
        }
    }

    /// Formatted rows; the profile section omits stepover
    pub fn rows(&self, system: MeasurementSystem, include_stepover: bool) -> Vec<DisplayRow> {
        let mut rows = vec![
            DisplayRow {
                label: "RPM",
                value: format_rpm(self.rpm),
            },
            DisplayRow {
                label: "Feed",
                value: format_value(self.feed, Quantity::Speed, system),
            },
            DisplayRow {
                label: "DOC",
                value: format_value(self.depth_of_cut, Quantity::Length, system),
            },
        ];
        if include_stepover {
            rows.push(DisplayRow {
                label: "Stepover",
                value: format_value(self.stepover, Quantity::Length, system),
            });
        }
        rows.push(DisplayRow {
            label: "Plunge",
            value: format_value(self.plunge, Quantity::Speed, system),
        });
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ResultSnapshot {
        ResultSnapshot {
            rpm: Some(18000.0),
            feed: Some(100.0),
            depth_of_cut: None,
            stepover: Some(2.0),
            plunge: Some(50.0),
            warning: None,
            base_multiplier: 1.0,
        }
    }

    #[test]
    fn test_area_clearance_scales_feed() {
        let params = CutParameters::area_clearance(&snapshot(), Multiplier::new(1.2));
        let rows = params.rows(MeasurementSystem::Metric, true);
        assert_eq!(rows[1].value, "120.0 mm/min");

        let rows = params.rows(MeasurementSystem::Imperial, true);
        assert_eq!(rows[1].value, "4.7 ipm");
    }

    #[test]
    fn test_rpm_and_stepover_never_scaled() {
        let m = Multiplier::new(1.5);
        for params in [
            CutParameters::area_clearance(&snapshot(), m),
            CutParameters::profile(&snapshot(), m),
        ] {
            assert_eq!(params.rpm, Some(18000.0));
            assert_eq!(params.stepover, Some(2.0));
        }
    }

    #[test]
    fn test_profile_applies_fixed_factor() {
        let params = CutParameters::profile(&snapshot(), Multiplier::new(1.2));
        let feed = params.feed.unwrap();
        assert!((feed - 108.0).abs() < 1e-9);
        assert!((params.plunge.unwrap() - 54.0).abs() < 1e-9);
        assert_eq!(params.depth_of_cut, None);
    }

    #[test]
    fn test_rows_render_missing_values() {
        let params = CutParameters::profile(&snapshot(), Multiplier::NEUTRAL);
        let rows = params.rows(MeasurementSystem::Imperial, false);
        let labels: Vec<_> = rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["RPM", "Feed", "DOC", "Plunge"]);
        assert_eq!(rows[0].value, "18,000");
        assert_eq!(rows[2].value, "N/A");
    }
}
