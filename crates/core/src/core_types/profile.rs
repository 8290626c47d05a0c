//! Level and layer profiles.
//!
//! A column of `N` layers has `N + 1` levels. Index 0 is always the surface and
//! the highest index is the top of the atmosphere, for both kinds of profile.
//! Layer `i` sits between level `i` and level `i + 1`.
//!
//! ```text
//!   level N   ───────────── top of atmosphere
//!   layer N-1
//!   level N-1 ─────────────
//!      ...
//!   level 1   ─────────────
//!   layer 0
//!   level 0   ───────────── surface
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// Quantity defined on layer boundaries: optical depth, flux, height, pressure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelProfile(Vec<f64>);

/// Quantity defined at layer midpoints: temperature, density, heating rate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerProfile(Vec<f64>);

impl LevelProfile {
    /// Wrap level values ordered surface first.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Running sum of per-layer increments, starting from 0 at the surface.
    pub fn cumulative_from_zero(increments: &[f64]) -> Self {
        let mut values = Vec::with_capacity(increments.len() + 1);
        let mut acc = 0.0;
        values.push(acc);
        for inc in increments {
            acc += inc;
            values.push(acc);
        }
        Self(values)
    }

    /// Number of layers this profile bounds (`len - 1`, saturating at 0).
    pub fn num_layers(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Value at the surface (index 0).
    pub fn surface(&self) -> Option<f64> {
        self.0.first().copied()
    }

    /// Value at the top of the atmosphere (index N).
    pub fn top(&self) -> Option<f64> {
        self.0.last().copied()
    }

    /// Difference across each layer: `self[i + 1] - self[i]`.
    pub fn diff(&self) -> LayerProfile {
        LayerProfile(self.0.windows(2).map(|w| w[1] - w[0]).collect())
    }

    /// Mean of the two bounding levels of each layer.
    pub fn midpoints(&self) -> LayerProfile {
        LayerProfile(self.0.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect())
    }

    /// Index of the level whose value is closest to `target`.
    pub fn nearest_index(&self, target: f64) -> Option<usize> {
        self.0
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - target).abs().total_cmp(&(*b - target).abs()))
            .map(|(i, _)| i)
    }

    /// True when each value is at least the one below it.
    pub fn is_non_decreasing(&self) -> bool {
        self.0.windows(2).all(|w| w[1] >= w[0])
    }
}

impl LayerProfile {
    /// Wrap layer values ordered surface first.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Profile with every layer set to `value`.
    pub fn uniform(num_layers: usize, value: f64) -> Self {
        Self(vec![value; num_layers])
    }

    /// Number of layers.
    pub fn num_layers(&self) -> usize {
        self.0.len()
    }

    /// Lowest layer (index 0).
    pub fn lowest(&self) -> Option<f64> {
        self.0.first().copied()
    }
}

impl Deref for LevelProfile {
    type Target = [f64];
    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl DerefMut for LevelProfile {
    fn deref_mut(&mut self) -> &mut [f64] {
        &mut self.0
    }
}

impl Deref for LayerProfile {
    type Target = [f64];
    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl DerefMut for LayerProfile {
    fn deref_mut(&mut self) -> &mut [f64] {
        &mut self.0
    }
}

impl From<Vec<f64>> for LevelProfile {
    fn from(v: Vec<f64>) -> Self {
        Self(v)
    }
}

impl From<Vec<f64>> for LayerProfile {
    fn from(v: Vec<f64>) -> Self {
        Self(v)
    }
}

impl FromIterator<f64> for LevelProfile {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromIterator<f64> for LayerProfile {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
