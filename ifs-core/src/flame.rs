//! Fractal flame generator.
//!
//! Weighted stochastic selection over the table (the draw runs over the
//! total weight, and a unit weight is a deterministic override), followed
//! by the entry's variation blend, an optional post transform, and a
//! final transform that yields the plotted point plus a color term.
//! Pixels accumulate hits in alpha, one per landing, giving the
//! log-density look; RGB comes from a red ramp over the smoothed color
//! scalar.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::color::flame_ramp;
use crate::history::History;
use crate::raster::PixelBuffer;
use crate::transform::TransformTable;
use crate::variation::VariationVector;

/// Point map applied between the variation blend and the final transform.
pub type PointMap = Box<dyn Fn(f64, f64) -> (f64, f64)>;

/// Final transform: maps the blended point to the plotted point and a
/// color term in `[0, 1]` (values outside are clamped when mixing).
pub type FinalMap = Box<dyn Fn(f64, f64) -> (f64, f64, f64)>;

/// Points plotted per forward step.
pub const DEFAULT_STEP_SIZE: usize = 1_000_000;

/// Canvas pixels per flame-space unit.
pub const DEFAULT_ZOOM: f64 = 50.0;

/// Unplotted points at the start of generation zero.
const BURN_IN: usize = 10;

#[derive(Clone, Copy, Debug)]
pub struct FractalFlameConfig {
    pub step_size: usize,
    pub zoom: f64,
}

impl Default for FractalFlameConfig {
    fn default() -> Self {
        Self {
            step_size: DEFAULT_STEP_SIZE,
            zoom: DEFAULT_ZOOM,
        }
    }
}

pub struct FractalFlame {
    table: TransformTable,
    /// Variation blend per table entry, extracted at construction so the
    /// inner loop never revalidates.
    variations: Vec<VariationVector>,
    step_size: usize,
    zoom: f64,
    offset_x: f64,
    offset_y: f64,
    post: PointMap,
    final_map: FinalMap,
    rng: StdRng,
    x: f64,
    y: f64,
    /// Running color scalar, exponentially smoothed toward the selected
    /// entries' color weights. Stays in `[0, 1]` for the generator's
    /// lifetime.
    color: f64,
    history: History<PixelBuffer>,
}

impl FractalFlame {
    pub fn new(
        width: usize,
        height: usize,
        table: TransformTable,
        config: FractalFlameConfig,
        post: Option<PointMap>,
        final_map: Option<FinalMap>,
    ) -> Result<Self, String> {
        let seed: u64 = rand::thread_rng().gen();
        Self::new_with_seed(width, height, table, config, post, final_map, seed)
    }

    pub fn new_with_seed(
        width: usize,
        height: usize,
        table: TransformTable,
        config: FractalFlameConfig,
        post: Option<PointMap>,
        final_map: Option<FinalMap>,
        seed: u64,
    ) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err("canvas dimensions must be non-zero".into());
        }
        if config.step_size == 0 {
            return Err("step size must be non-zero".into());
        }
        if !config.zoom.is_finite() || config.zoom <= 0.0 {
            return Err(format!("zoom {} must be positive", config.zoom));
        }
        if table.total_weight() <= 0.0 {
            return Err("table weights sum to zero".into());
        }
        let variations = table
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry
                    .variations
                    .ok_or_else(|| format!("table entry {} is missing a variation vector", i))
            })
            .collect::<Result<Vec<_>, String>>()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let color = rng.gen::<f64>();
        Ok(Self {
            table,
            variations,
            step_size: config.step_size,
            zoom: config.zoom,
            offset_x: (width / 2) as f64,
            offset_y: (height / 2) as f64,
            post: post.unwrap_or_else(|| Box::new(|x, y| (x, y))),
            final_map: final_map.unwrap_or_else(|| Box::new(|x, y| (x, y, 0.0))),
            rng,
            x: 0.0,
            y: 0.0,
            color,
            history: History::new(PixelBuffer::new(width, height)),
        })
    }

    /// Compute or replay the next generation.
    pub fn advance(&mut self) {
        let Self {
            table,
            variations,
            step_size,
            zoom,
            offset_x,
            offset_y,
            post,
            final_map,
            rng,
            x,
            y,
            color,
            history,
        } = self;
        let total_weight = table.total_weight();
        let first_generation = history.cursor() == 0;
        let computed = history.advance_with(|prev| {
            let mut next = prev.clone();
            for i in 0..*step_size {
                let k = rng.gen::<f64>() * total_weight;
                let index = table.select_or_last(k);
                let entry = &table.entries()[index];

                let (ax, ay) = entry.transform.apply(*x, *y);
                let (bx, by) = variations[index].blend(ax, ay);
                let (px, py) = post(bx, by);

                *color = (*color + entry.transform.color_weight) / 2.0;
                let (fx, fy, color_term) = final_map(px, py);
                *x = fx;
                *y = fy;
                let final_color = (*color + color_term.clamp(0.0, 1.0)) / 2.0;

                if first_generation && i <= BURN_IN {
                    continue;
                }
                let pixel_x = (*x * *zoom + *offset_x).floor();
                let pixel_y = (*y * *zoom + *offset_y).floor();
                if let Some(pixel) = next.get(pixel_x, pixel_y) {
                    // One hit bumps the density count in alpha.
                    let alpha = pixel[3].saturating_add(1);
                    next.set(pixel_x, pixel_y, flame_ramp(final_color, alpha));
                }
            }
            next
        });
        if computed {
            log::debug!(
                "fractal flame generation {} computed in {:?}",
                self.history.cursor(),
                self.history.last_step_duration()
            );
        }
    }

    pub fn retreat(&mut self) {
        self.history.retreat();
    }

    pub fn current(&self) -> &PixelBuffer {
        self.history.current()
    }

    pub fn iteration(&self) -> usize {
        self.history.cursor()
    }

    /// The running color scalar.
    pub fn color(&self) -> f64 {
        self.color
    }

    pub fn needs_redraw(&self) -> bool {
        self.history.needs_redraw()
    }

    pub fn mark_drawn(&mut self, elapsed: Duration) {
        self.history.mark_drawn(elapsed);
    }

    pub fn last_step_duration(&self) -> Duration {
        self.history.last_step_duration()
    }

    pub fn last_draw_duration(&self) -> Duration {
        self.history.last_draw_duration()
    }
}
