//! Randomized IFS point iteration.
//!
//! Like the chaos game, but the jump target is a full affine transform
//! drawn by weighted stochastic selection, with the table weights treated
//! as probabilities over `[0, 1)`. When the cumulative weights never reach
//! the draw (weights summing below 1, or floating-point shortfall) the
//! point neither moves nor plots for that iteration.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::color::ColorMode;
use crate::history::History;
use crate::raster::{PixelBuffer, Rgba};
use crate::transform::TransformTable;

/// Points plotted per forward step.
pub const DEFAULT_STEP_SIZE: usize = 10_000;

/// Unplotted points at the start of generation zero.
const BURN_IN: usize = 10;

/// Heatmap tint increment per hit.
const HEAT_STEP: u8 = 5;

#[derive(Clone, Copy, Debug)]
pub struct RandomizedIfsConfig {
    pub step_size: usize,
    pub color_mode: ColorMode,
}

impl Default for RandomizedIfsConfig {
    fn default() -> Self {
        Self {
            step_size: DEFAULT_STEP_SIZE,
            color_mode: ColorMode::Plain,
        }
    }
}

pub struct RandomizedIfs {
    table: TransformTable,
    color_mode: ColorMode,
    step_size: usize,
    rng: StdRng,
    x: f64,
    y: f64,
    history: History<PixelBuffer>,
}

impl RandomizedIfs {
    pub fn new(
        width: usize,
        height: usize,
        table: TransformTable,
        config: RandomizedIfsConfig,
    ) -> Result<Self, String> {
        let seed: u64 = rand::thread_rng().gen();
        Self::new_with_seed(width, height, table, config, seed)
    }

    pub fn new_with_seed(
        width: usize,
        height: usize,
        table: TransformTable,
        config: RandomizedIfsConfig,
        seed: u64,
    ) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err("canvas dimensions must be non-zero".into());
        }
        if config.step_size == 0 {
            return Err("step size must be non-zero".into());
        }
        if config.color_mode == ColorMode::Demo {
            return Err("demo coloring is only available on the deterministic pixel generator".into());
        }
        Ok(Self {
            table,
            color_mode: config.color_mode,
            step_size: config.step_size,
            rng: StdRng::seed_from_u64(seed),
            x: 0.0,
            y: 0.0,
            history: History::new(PixelBuffer::new(width, height)),
        })
    }

    /// Compute or replay the next generation.
    pub fn advance(&mut self) {
        let Self {
            table,
            color_mode,
            step_size,
            rng,
            x,
            y,
            history,
        } = self;
        let first_generation = history.cursor() == 0;
        let computed = history.advance_with(|prev| {
            let mut next = prev.clone();
            let (offset_x, offset_y) = table.offset();
            for i in 0..*step_size {
                let k = rng.gen::<f64>();
                let index = match table.select(k) {
                    Some(index) => index,
                    // No row reached the draw: skip this point entirely.
                    None => continue,
                };
                let (nx, ny) = table.entries()[index].transform.apply(*x, *y);
                *x = nx;
                *y = ny;
                if first_generation && i <= BURN_IN {
                    continue;
                }
                let px = *x + offset_x;
                let py = *y + offset_y;
                let rgba = match color_mode {
                    ColorMode::Plain => [0, 0, 0, 255],
                    ColorMode::Heatmap => heat_tint(prev.get(px, py)),
                    ColorMode::ColorByTransform => {
                        let red = (255.0 / table.len() as f64 * index as f64).round() as u8;
                        [red, 0, 0, 255]
                    }
                    // Rejected at construction.
                    ColorMode::Demo => [0, 0, 0, 255],
                };
                next.set(px, py, rgba);
            }
            next
        });
        if computed {
            log::debug!(
                "randomized IFS generation {} computed in {:?}",
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

/// Incremental density tint against the previous generation's pixel:
/// red grows with repeated hits, green once red saturates, and blue runs
/// opposite to red, mapping density to hue.
fn heat_tint(previous: Option<Rgba>) -> Rgba {
    match previous {
        Some(p) if p[3] == 255 => {
            let red = p[0].saturating_add(HEAT_STEP);
            let green = if p[0] == 255 {
                p[1].saturating_add(HEAT_STEP)
            } else {
                0
            };
            [red, green, 255 - p[0], 255]
        }
        _ => [0, 0, 255, 255],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::TransformTable;

    fn contractive_table() -> TransformTable {
        TransformTable::from_rows(&[
            vec![0.5, 0.0, 0.0, 0.5, 0.0, 0.0, 0.5],
            vec![0.5, 0.0, 0.0, 0.5, 40.0, 40.0, 0.5],
        ])
        .unwrap()
    }

    #[test]
    fn demo_mode_is_rejected() {
        let config = RandomizedIfsConfig {
            color_mode: ColorMode::Demo,
            ..Default::default()
        };
        assert!(RandomizedIfs::new_with_seed(80, 80, contractive_table(), config, 1).is_err());
    }

    #[test]
    fn first_hit_of_heatmap_is_blue() {
        assert_eq!(heat_tint(None), [0, 0, 255, 255]);
        assert_eq!(heat_tint(Some([0, 0, 0, 0])), [0, 0, 255, 255]);
    }

    #[test]
    fn heatmap_saturates_into_green() {
        assert_eq!(heat_tint(Some([10, 0, 245, 255])), [15, 0, 245, 255]);
        assert_eq!(heat_tint(Some([255, 20, 0, 255])), [255, 25, 0, 255]);
    }

    #[test]
    fn advance_plots_within_the_canvas() {
        let config = RandomizedIfsConfig {
            step_size: 2_000,
            ..Default::default()
        };
        let mut ifs =
            RandomizedIfs::new_with_seed(80, 80, contractive_table(), config, 11).unwrap();
        ifs.advance();
        let plotted = (0..80)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .filter(|&(x, y)| ifs.current().is_set(x, y))
            .count();
        assert!(plotted > 0);
    }
}
