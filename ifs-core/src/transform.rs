//! Affine transform tables and stochastic selection.
//!
//! A table is the raw configuration every generator shares: an ordered
//! list of weighted affine transforms, optionally carrying a variation
//! vector (fractal flame) and a color weight. Tables validate fail-fast
//! at construction; malformed rows never reach a generator.

use serde::{Deserialize, Serialize};

use crate::variation::VariationVector;

/// A 2D affine map `(x, y) -> (a*x + b*y + e, c*x + d*y + f)` with a
/// selection weight and an optional color weight, both in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub color_weight: f64,
}

impl AffineTransform {
    /// Parse a table row: `[a, b, c, d, e, f]`, optionally followed by a
    /// weight and then a color weight.
    pub fn from_row(row: &[f64]) -> Result<Self, String> {
        let (weight, color_weight) = match row.len() {
            6 => (0.0, 0.0),
            7 => (row[6], 0.0),
            8 => (row[6], row[7]),
            n => {
                return Err(format!(
                    "transform row has {} coefficients, expected 6, 7 or 8",
                    n
                ))
            }
        };
        let transform = Self {
            a: row[0],
            b: row[1],
            c: row[2],
            d: row[3],
            e: row[4],
            f: row[5],
            weight,
            color_weight,
        };
        transform.validate()?;
        Ok(transform)
    }

    pub fn validate(&self) -> Result<(), String> {
        let coeffs = [self.a, self.b, self.c, self.d, self.e, self.f];
        if coeffs.iter().any(|v| !v.is_finite()) {
            return Err("transform coefficients must be finite".into());
        }
        if !(0.0..=1.0).contains(&self.weight) {
            return Err(format!("transform weight {} is outside [0, 1]", self.weight));
        }
        if !(0.0..=1.0).contains(&self.color_weight) {
            return Err(format!(
                "transform color weight {} is outside [0, 1]",
                self.color_weight
            ));
        }
        Ok(())
    }

    /// Apply the map with raw offsets.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.b * y + self.e,
            self.c * x + self.d * y + self.f,
        )
    }

    /// Apply the map with `(e, f)` interpreted as fractions of the canvas,
    /// the convention of the deterministic generators.
    #[inline]
    pub fn apply_scaled(&self, x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
        (
            self.a * x + self.b * y + self.e * width,
            self.c * x + self.d * y + self.f * height,
        )
    }
}

/// One table entry: the affine part plus, for the flame generator, the
/// variation blend applied on top of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub transform: AffineTransform,
    #[serde(default)]
    pub variations: Option<VariationVector>,
}

impl TableEntry {
    pub fn new(transform: AffineTransform) -> Self {
        Self {
            transform,
            variations: None,
        }
    }

    pub fn with_variations(transform: AffineTransform, variations: VariationVector) -> Self {
        Self {
            transform,
            variations: Some(variations),
        }
    }
}

/// Ordered transform table with an optional pixel-space plot offset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformTable {
    entries: Vec<TableEntry>,
    #[serde(default)]
    offset: (f64, f64),
}

impl TransformTable {
    pub fn new(entries: Vec<TableEntry>) -> Result<Self, String> {
        if entries.is_empty() {
            return Err("transform table is empty".into());
        }
        for (i, entry) in entries.iter().enumerate() {
            entry
                .transform
                .validate()
                .map_err(|e| format!("table entry {}: {}", i, e))?;
        }
        Ok(Self {
            entries,
            offset: (0.0, 0.0),
        })
    }

    /// Build from raw coefficient rows (see [`AffineTransform::from_row`]).
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, String> {
        let entries = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                AffineTransform::from_row(row)
                    .map(TableEntry::new)
                    .map_err(|e| format!("table row {}: {}", i, e))
            })
            .collect::<Result<Vec<_>, String>>()?;
        Self::new(entries)
    }

    /// Parse a table from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let table: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Self::new(table.entries).map(|t| t.with_offset(table.offset.0, table.offset.1))
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| e.to_string())
    }

    /// Pixel-space offset added when plotting (randomized IFS).
    pub fn with_offset(mut self, dx: f64, dy: f64) -> Self {
        self.offset = (dx, dy);
        self
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.transform.weight).sum()
    }

    /// Weighted stochastic selection.
    ///
    /// An entry whose weight equals exactly 1 is a deterministic override:
    /// it is always chosen and the scan stops, regardless of `k`; with
    /// several such entries the first in table order wins. Otherwise the
    /// first entry whose running weight sum reaches `k` is chosen. `None`
    /// means the cumulative weights never reached `k` (possible when the
    /// weights are treated as probabilities summing to at most 1, or from
    /// floating-point shortfall).
    pub fn select(&self, k: f64) -> Option<usize> {
        if let Some(idx) = self.entries.iter().position(|e| e.transform.weight == 1.0) {
            return Some(idx);
        }
        let mut sum = 0.0;
        for (i, entry) in self.entries.iter().enumerate() {
            sum += entry.transform.weight;
            if sum >= k {
                return Some(i);
            }
        }
        None
    }

    /// Selection with the flame generator's fallback: a scan that falls
    /// off the end of the table (floating-point shortfall against a draw
    /// over the total weight) lands on the last entry.
    pub fn select_or_last(&self, k: f64) -> usize {
        self.select(k).unwrap_or(self.entries.len() - 1)
    }
}
