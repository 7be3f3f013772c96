// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roof measurements
//!
//! A roof model carries a small table of named measurements. Each value is
//! tagged with its unit, so a builder can tell an explicit height from a
//! slope angle. Lookups never fail: absent keys, unexpected units and values
//! no roof can have fall back to the caller's default.

use rustc_hash::FxHashMap;
use std::fmt;

/// Named measurement a roof type may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementKey {
    /// Primary roof height or slope
    Height1,
    /// Secondary height, e.g. the lower slope of a mansard roof
    Height2,
    /// Primary horizontal depth
    Length1,
    /// Slope angle, used when `Height1` is absent
    Angle1,
}

impl MeasurementKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementKey::Height1 => "HEIGHT_1",
            MeasurementKey::Height2 => "HEIGHT_2",
            MeasurementKey::Length1 => "LENGTH_1",
            MeasurementKey::Angle1 => "ANGLE_1",
        }
    }
}

impl fmt::Display for MeasurementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementUnit {
    Meters,
    Degrees,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub value: f64,
    pub unit: MeasurementUnit,
}

impl Measurement {
    pub fn new(value: f64, unit: MeasurementUnit) -> Self {
        Self { value, unit }
    }

    pub fn meters(value: f64) -> Self {
        Self::new(value, MeasurementUnit::Meters)
    }

    pub fn degrees(value: f64) -> Self {
        Self::new(value, MeasurementUnit::Degrees)
    }
}

/// Height resolved from a measurement that may be a length or a slope
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeightSpec {
    /// Height in meters
    Height(f64),
    /// Slope in degrees
    Angle(f64),
}

impl HeightSpec {
    /// Height over a horizontal run, for slopes `run * tan(angle)`
    pub fn height_over(&self, run: f64) -> f64 {
        match *self {
            HeightSpec::Height(h) => h,
            HeightSpec::Angle(deg) => run * deg.to_radians().tan(),
        }
    }

    /// A finite height of at least 0 m, or a finite slope in [0°, 90°)
    pub fn is_valid(&self) -> bool {
        match *self {
            HeightSpec::Height(h) => is_valid_length(h),
            HeightSpec::Angle(deg) => (0.0..90.0).contains(&deg),
        }
    }
}

impl fmt::Display for HeightSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeightSpec::Height(h) => write!(f, "{} m", h),
            HeightSpec::Angle(deg) => write!(f, "{}°", deg),
        }
    }
}

/// Finite and not negative
pub fn is_valid_length(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Null-safe unit check: an absent measurement has no unit
pub fn is_unit(measurement: Option<&Measurement>, unit: MeasurementUnit) -> bool {
    measurement.is_some_and(|m| m.unit == unit)
}

/// Immutable lookup table of roof measurements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTable {
    values: FxHashMap<MeasurementKey, Measurement>,
}

impl MeasurementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: MeasurementKey, measurement: Measurement) -> Self {
        self.values.insert(key, measurement);
        self
    }

    pub fn get(&self, key: MeasurementKey) -> Option<&Measurement> {
        self.values.get(&key)
    }

    pub fn is_unit(&self, key: MeasurementKey, unit: MeasurementUnit) -> bool {
        is_unit(self.get(key), unit)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of `key` when it is a length, `default` otherwise
    pub fn height_meters(&self, key: MeasurementKey, default: f64) -> f64 {
        match self.get(key) {
            Some(m) if m.unit == MeasurementUnit::Meters => m.value,
            _ => default,
        }
    }

    /// Length under `key`, `default` when absent.
    ///
    /// An angle or a value that is not a finite, non-negative length also
    /// gives `default`, together with a note saying why.
    pub fn length_meters(&self, key: MeasurementKey, default: f64) -> (f64, Option<String>) {
        let measurement = self.get(key);
        if measurement.is_none() {
            return (default, None);
        }
        if is_unit(measurement, MeasurementUnit::Degrees) {
            let note = format!("{} is an angle, using {} m", key, default);
            return (default, Some(note));
        }
        let value = self.height_meters(key, default);
        if is_valid_length(value) {
            (value, None)
        } else {
            let note = format!("{} of {} m is not a valid length, using {} m", key, value, default);
            (default, Some(note))
        }
    }

    /// Height or slope of a roof: `HEIGHT_1`, else the slope in `ANGLE_1`,
    /// else `Height(default)`.
    ///
    /// A value outside [`HeightSpec::is_valid`] also gives `Height(default)`.
    /// The note is set whenever the default was used.
    pub fn roof_height(&self, default: f64) -> (HeightSpec, Option<String>) {
        let height = self.get(MeasurementKey::Height1);
        let (key, resolved) = match (height, self.get(MeasurementKey::Angle1)) {
            (Some(_), _) => (
                MeasurementKey::Height1,
                self.height_or_angle(MeasurementKey::Height1, default),
            ),
            (None, Some(m)) if m.unit == MeasurementUnit::Degrees => {
                (MeasurementKey::Angle1, HeightSpec::Angle(m.value))
            }
            (None, Some(m)) => {
                let note = format!("ANGLE_1 of {} m is not an angle, using {} m", m.value, default);
                return (HeightSpec::Height(default), Some(note));
            }
            (None, None) => {
                let note = format!("HEIGHT_1 missing, using {} m", default);
                return (HeightSpec::Height(default), Some(note));
            }
        };
        if resolved.is_valid() {
            (resolved, None)
        } else {
            let note = format!("{} of {} is out of range, using {} m", key, resolved, default);
            (HeightSpec::Height(default), Some(note))
        }
    }

    /// Height or slope stored under `key`, `Height(default)` when absent
    pub fn height_or_angle(&self, key: MeasurementKey, default: f64) -> HeightSpec {
        match self.get(key) {
            Some(m) => match m.unit {
                MeasurementUnit::Meters => HeightSpec::Height(m.value),
                MeasurementUnit::Degrees => HeightSpec::Angle(m.value),
            },
            None => HeightSpec::Height(default),
        }
    }
}

impl FromIterator<(MeasurementKey, Measurement)> for MeasurementTable {
    fn from_iter<I: IntoIterator<Item = (MeasurementKey, Measurement)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_height_meters() {
        let table = MeasurementTable::new()
            .with(MeasurementKey::Height1, Measurement::meters(4.0))
            .with(MeasurementKey::Height2, Measurement::degrees(30.0));

        assert_eq!(table.height_meters(MeasurementKey::Height1, 2.5), 4.0);
        // angle is not a length
        assert_eq!(table.height_meters(MeasurementKey::Height2, 2.5), 2.5);
        assert_eq!(table.height_meters(MeasurementKey::Length1, 2.5), 2.5);
    }

    #[test]
    fn test_is_unit_is_null_safe() {
        let table: MeasurementTable = [(MeasurementKey::Angle1, Measurement::degrees(45.0))]
            .into_iter()
            .collect();
        assert!(table.is_unit(MeasurementKey::Angle1, MeasurementUnit::Degrees));
        assert!(!table.is_unit(MeasurementKey::Angle1, MeasurementUnit::Meters));
        assert!(!is_unit(None, MeasurementUnit::Meters));
        assert!(!is_unit(None, MeasurementUnit::Degrees));
    }

    #[test]
    fn test_height_or_angle() {
        let table = MeasurementTable::new().with(MeasurementKey::Height1, Measurement::degrees(45.0));
        let spec = table.height_or_angle(MeasurementKey::Height1, 2.5);
        assert_eq!(spec, HeightSpec::Angle(45.0));
        assert_relative_eq!(spec.height_over(5.0), 5.0, epsilon = 1e-12);

        let fallback = MeasurementTable::new().height_or_angle(MeasurementKey::Height1, 2.5);
        assert_eq!(fallback, HeightSpec::Height(2.5));
        assert_eq!(fallback.height_over(100.0), 2.5);
    }

    #[test]
    fn test_slope_range() {
        assert!(HeightSpec::Angle(0.0).is_valid());
        assert!(HeightSpec::Angle(89.9).is_valid());
        assert!(HeightSpec::Height(0.0).is_valid());
        for bad in [
            HeightSpec::Angle(90.0),
            HeightSpec::Angle(120.0),
            HeightSpec::Angle(-30.0),
            HeightSpec::Angle(f64::NAN),
            HeightSpec::Height(-3.0),
            HeightSpec::Height(f64::NAN),
            HeightSpec::Height(f64::INFINITY),
        ] {
            assert!(!bad.is_valid(), "{:?}", bad);
        }
    }

    #[test]
    fn test_roof_height_falls_back_on_bad_values() {
        for bad in [Measurement::degrees(90.0), Measurement::degrees(-30.0), Measurement::meters(-3.0)] {
            let table = MeasurementTable::new().with(MeasurementKey::Height1, bad);
            let (resolved, note) = table.roof_height(2.5);
            assert_eq!(resolved, HeightSpec::Height(2.5));
            assert!(note.unwrap().starts_with("HEIGHT_1"));
        }

        let table = MeasurementTable::new().with(MeasurementKey::Height1, Measurement::meters(4.0));
        assert_eq!(table.roof_height(2.5), (HeightSpec::Height(4.0), None));
    }

    #[test]
    fn test_angle_1_stands_in_for_height_1() {
        let table = MeasurementTable::new().with(MeasurementKey::Angle1, Measurement::degrees(30.0));
        assert_eq!(table.roof_height(2.5), (HeightSpec::Angle(30.0), None));

        // HEIGHT_1 wins when both are given
        let table = table.with(MeasurementKey::Height1, Measurement::meters(4.0));
        assert_eq!(table.roof_height(2.5).0, HeightSpec::Height(4.0));

        let (resolved, note) = MeasurementTable::new().roof_height(2.5);
        assert_eq!(resolved, HeightSpec::Height(2.5));
        assert!(note.is_some());
    }

    #[test]
    fn test_length_meters() {
        let table = MeasurementTable::new()
            .with(MeasurementKey::Length1, Measurement::meters(f64::NAN))
            .with(MeasurementKey::Height2, Measurement::degrees(10.0))
            .with(MeasurementKey::Height1, Measurement::meters(1.5));
        assert_eq!(table.length_meters(MeasurementKey::Height1, 0.0), (1.5, None));
        assert_eq!(table.length_meters(MeasurementKey::Angle1, 2.0), (2.0, None));

        let (v, note) = table.length_meters(MeasurementKey::Length1, 2.0);
        assert_eq!(v, 2.0);
        assert!(note.is_some());
        let (v, note) = table.length_meters(MeasurementKey::Height2, 2.0);
        assert_eq!(v, 2.0);
        assert!(note.unwrap().contains("angle"));
    }
}
