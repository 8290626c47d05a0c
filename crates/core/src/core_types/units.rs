//! Scalar unit newtypes for the column model.
//!
//! Configuration, surface state and reports pass scalars through these types so
//! Kelvin cannot be mixed with Celsius or Pascals with kilopascals. Vertical
//! profiles use [`super::profile`] instead.
//!
//! All types wrap `f64`, serialize as bare numbers, deref to the raw value and
//! order totally (NaN sorts above every number).
//!
//! # Usage
//! ```
//! use grey_column_core::core_types::units::{Celsius, Kelvin, Pascals};
//!
//! let temp = Kelvin::new(300.0);
//! let celsius: Celsius = temp.into();
//! assert!((*celsius - 26.85).abs() < 0.01);
//!
//! let p = Pascals::new(80_000.0);
//! assert!((p.to_kilopascals() - 80.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Deref, Mul, Sub};

/// Total order on f64, NaN last
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Implements the ordering and deref boilerplate shared by every unit type.
macro_rules! unit_common {
    ($name:ident) => {
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                f64_total_cmp(self.0, other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl From<$name> for f64 {
            fn from(v: $name) -> f64 {
                v.0
            }
        }

        impl $name {
            /// Get the raw f64 value
            #[inline]
            #[must_use]
            pub const fn value(self) -> f64 {
                self.0
            }
        }
    };
}

// ============================================================================
// TEMPERATURE TYPES
// ============================================================================

/// 0 °C in Kelvin
const CELSIUS_KELVIN_OFFSET: f64 = 273.15;

/// Absolute temperature
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kelvin(f64);

unit_common!(Kelvin);

impl Kelvin {
    /// Absolute zero
    pub const ABSOLUTE_ZERO: Kelvin = Kelvin(0.0);

    /// Panics below 0 K; use [`Kelvin::checked`] for untrusted values.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Kelvin::new: value is below absolute zero (0 K)");
        Kelvin(value)
    }

    /// Fallible constructor for computed values: `None` if negative or not finite.
    #[inline]
    #[must_use]
    pub fn checked(value: f64) -> Option<Self> {
        (value.is_finite() && value >= 0.0).then_some(Kelvin(value))
    }

    /// Convert to Celsius
    #[inline]
    #[must_use]
    pub fn to_celsius(self) -> Celsius {
        Celsius(self.0 - CELSIUS_KELVIN_OFFSET)
    }
}

impl From<Kelvin> for Celsius {
    fn from(k: Kelvin) -> Celsius {
        k.to_celsius()
    }
}

// Kelvin - Kelvin = KelvinDelta
impl Sub for Kelvin {
    type Output = KelvinDelta;
    fn sub(self, rhs: Kelvin) -> KelvinDelta {
        KelvinDelta(self.0 - rhs.0)
    }
}

impl fmt::Display for Kelvin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} K", self.0)
    }
}

/// Signed temperature difference (K)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KelvinDelta(f64);

unit_common!(KelvinDelta);

impl KelvinDelta {
    /// Any sign is allowed.
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        KelvinDelta(value)
    }

    /// Magnitude of the difference
    #[inline]
    #[must_use]
    pub fn abs(self) -> Self {
        KelvinDelta(self.0.abs())
    }
}

impl fmt::Display for KelvinDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.3} K", self.0)
    }
}

/// Temperature in degrees Celsius, used for reporting only
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Celsius(f64);

unit_common!(Celsius);

impl Celsius {
    /// Panics below -273.15 °C.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= -CELSIUS_KELVIN_OFFSET,
            "Celsius::new: temperature below -273.15 °C"
        );
        Celsius(value)
    }

    /// Convert to Kelvin
    #[inline]
    #[must_use]
    pub fn to_kelvin(self) -> Kelvin {
        Kelvin(self.0 + CELSIUS_KELVIN_OFFSET)
    }
}

impl From<Celsius> for Kelvin {
    fn from(c: Celsius) -> Kelvin {
        c.to_kelvin()
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°C", self.0)
    }
}

// ============================================================================
// PRESSURE
// ============================================================================

/// Pressure in Pascals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Pascals(f64);

unit_common!(Pascals);

impl Pascals {
    /// Standard surface pressure used by the reference column (100 kPa)
    pub const STANDARD_SURFACE: Pascals = Pascals(100_000.0);

    /// Create a new pressure. Asserts value >= 0.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Pascals::new: negative pressure is invalid");
        Pascals(value)
    }

    /// Create from kilopascals
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn from_kilopascals(kpa: f64) -> Self {
        Self::new(kpa * 1000.0)
    }

    /// Convert to kilopascals
    #[inline]
    #[must_use]
    pub fn to_kilopascals(self) -> f64 {
        self.0 / 1000.0
    }
}

impl fmt::Display for Pascals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} kPa", self.0 / 1000.0)
    }
}

// ============================================================================
// DISTANCE
// ============================================================================

/// Distance in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(f64);

unit_common!(Meters);

impl Meters {
    /// Create a new distance. Heights above the surface are never negative.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Meters::new: height cannot be negative");
        Meters(value)
    }

    /// Convert to kilometers
    #[inline]
    #[must_use]
    pub fn to_kilometers(self) -> f64 {
        self.0 / 1000.0
    }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} m", self.0)
    }
}

// ============================================================================
// TIME
// ============================================================================

/// Seconds per hour
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Seconds per day
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Duration (s)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Seconds(f64);

unit_common!(Seconds);

impl Seconds {
    /// Panics on a negative duration
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Seconds::new: duration cannot be negative");
        Seconds(value)
    }

    /// Create from hours
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn from_hours(hours: f64) -> Self {
        Self::new(hours * SECONDS_PER_HOUR)
    }

    /// Create from days
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn from_days(days: f64) -> Self {
        Self::new(days * SECONDS_PER_DAY)
    }

    /// Convert to hours
    #[inline]
    #[must_use]
    pub fn to_hours(self) -> f64 {
        self.0 / SECONDS_PER_HOUR
    }

    /// Convert to days
    #[inline]
    #[must_use]
    pub fn to_days(self) -> f64 {
        self.0 / SECONDS_PER_DAY
    }
}

impl Mul<f64> for Seconds {
    type Output = Seconds;
    fn mul(self, rhs: f64) -> Seconds {
        Seconds(self.0 * rhs)
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0} s", self.0)
    }
}

// ============================================================================
// ENERGY FLUX
// ============================================================================

/// Radiative flux density and solar irradiance in W/m²
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct WattsPerSquareMeter(f64);

unit_common!(WattsPerSquareMeter);

impl WattsPerSquareMeter {
    /// Globally averaged absorbed solar radiation (≈ 241 W/m²)
    pub const ABSORBED_SOLAR_GLOBAL_MEAN: WattsPerSquareMeter = WattsPerSquareMeter(241.0);

    /// Create a new flux. Asserts value >= 0 (non-negative irradiance).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= 0.0,
            "WattsPerSquareMeter::new: radiative flux cannot be negative"
        );
        WattsPerSquareMeter(value)
    }
}

impl fmt::Display for WattsPerSquareMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} W/m²", self.0)
    }
}
