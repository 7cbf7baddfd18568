//! Deterministic (exhaustive) IFS over pixels and over shapes.
//!
//! Both variants apply every table entry to every input element each
//! generation; weights are ignored. The affine offsets `(e, f)` are
//! fractions of the canvas here, not raw pixels.

use std::time::Duration;

use crate::color::ColorMode;
use crate::history::History;
use crate::raster::PixelBuffer;
use crate::shape::{ShapeInstance, ShapeKind};
use crate::transform::TransformTable;

/// Default seed: a filled square at the origin.
const DEFAULT_SEED_SIDE: f64 = 100.0;

/// Heatmap red increment per generation.
const HEAT_STEP: u8 = 10;

fn default_pixel_seed() -> ShapeInstance {
    ShapeInstance::new(
        ShapeKind::Rectangle,
        0.0,
        0.0,
        DEFAULT_SEED_SIDE,
        DEFAULT_SEED_SIDE,
    )
}

/// Pixel variant: the state is the raster itself. Every set pixel of the
/// previous snapshot is pushed through every transform into a blank
/// buffer.
pub struct DeterministicIfsPixel {
    width: usize,
    height: usize,
    table: TransformTable,
    color_mode: ColorMode,
    history: History<PixelBuffer>,
}

impl DeterministicIfsPixel {
    /// `seed` is rasterized into the initial snapshot; `None` falls back
    /// to a filled 100x100 square at the origin.
    pub fn new(
        width: usize,
        height: usize,
        table: TransformTable,
        color_mode: ColorMode,
        seed: Option<ShapeInstance>,
    ) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err("canvas dimensions must be non-zero".into());
        }
        if color_mode == ColorMode::ColorByTransform {
            return Err(
                "color-by-transform is only available on the randomized generator".into(),
            );
        }
        let mut initial = PixelBuffer::new(width, height);
        seed.unwrap_or_else(default_pixel_seed)
            .fill(&mut initial, [0, 0, 0, 255]);
        Ok(Self {
            width,
            height,
            table,
            color_mode,
            history: History::new(initial),
        })
    }

    /// Compute or replay the next generation.
    ///
    /// Source pixels and table entries are both walked in reverse order,
    /// so on overlapping destinations the lowest-index transform is the
    /// last writer and wins the tie.
    pub fn advance(&mut self) {
        let Self {
            width,
            height,
            table,
            color_mode,
            history,
        } = self;
        let computed = history.advance_with(|prev| {
            let mut next = PixelBuffer::new(*width, *height);
            for x in (0..*width).rev() {
                for y in (0..*height).rev() {
                    if !prev.is_set(x, y) {
                        continue;
                    }
                    let src = prev.at(x, y);
                    for index in (0..table.len()).rev() {
                        let transform = &table.entries()[index].transform;
                        let (nx, ny) = transform.apply_scaled(
                            x as f64,
                            y as f64,
                            *width as f64,
                            *height as f64,
                        );
                        let rgba = match color_mode {
                            // Propagate the source pixel's own color.
                            ColorMode::Plain => [src[0], src[1], src[2], 255],
                            ColorMode::Demo => [
                                if index % 3 == 0 { 255 } else { 0 },
                                if index % 3 == 1 { 255 } else { 0 },
                                if index % 3 == 2 { 255 } else { 0 },
                                255,
                            ],
                            ColorMode::Heatmap => {
                                [src[0].saturating_add(HEAT_STEP), src[1], src[2], 255]
                            }
                            // Rejected at construction.
                            ColorMode::ColorByTransform => [src[0], src[1], src[2], 255],
                        };
                        next.set(nx, ny, rgba);
                    }
                }
            }
            next
        });
        if computed {
            log::debug!(
                "deterministic pixel IFS generation {} computed in {:?}",
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

/// Geometric variant: the state is a list of shape instances. Transform
/// origins go through the full affine map; extents scale only by the
/// diagonal terms.
pub struct DeterministicIfsGeometric {
    width: usize,
    height: usize,
    table: TransformTable,
    history: History<Vec<ShapeInstance>>,
    /// Sub-pixel transition count per generation, aligned with the
    /// history so replay reports the identical number.
    subpixel_counts: Vec<usize>,
}

impl DeterministicIfsGeometric {
    /// `seed` defaults to a canvas-sized rectangle.
    pub fn new(
        width: usize,
        height: usize,
        table: TransformTable,
        seed: Option<ShapeInstance>,
    ) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err("canvas dimensions must be non-zero".into());
        }
        let seed = seed.unwrap_or_else(|| {
            ShapeInstance::new(ShapeKind::Rectangle, 0.0, 0.0, width as f64, height as f64)
        });
        Ok(Self {
            width,
            height,
            table,
            history: History::new(vec![seed]),
            subpixel_counts: vec![0],
        })
    }

    /// Compute or replay the next generation.
    pub fn advance(&mut self) {
        let Self {
            width,
            height,
            table,
            history,
            ..
        } = self;
        let mut subpixel = 0usize;
        let computed = history.advance_with(|prev| {
            let mut next = Vec::with_capacity(prev.len() * table.len());
            for element in prev {
                for entry in table.entries() {
                    let t = &entry.transform;
                    let (nx, ny) = t.apply_scaled(
                        element.x,
                        element.y,
                        *width as f64,
                        *height as f64,
                    );
                    let new_width = element.width * t.a;
                    let new_height = element.height * t.d;
                    // Count elements whose size first drops below a pixel.
                    if (new_width < 1.0 && element.width >= 1.0)
                        || (new_height < 1.0 && element.height >= 1.0)
                    {
                        subpixel += 1;
                    }
                    next.push(ShapeInstance::new(
                        element.kind,
                        nx,
                        ny,
                        new_width,
                        new_height,
                    ));
                }
            }
            next
        });
        if computed {
            self.subpixel_counts.push(subpixel);
            log::debug!(
                "deterministic geometric IFS generation {}: {} elements, {} newly sub-pixel, {:?}",
                self.history.cursor(),
                self.history.current().len(),
                subpixel,
                self.history.last_step_duration()
            );
        }
    }

    pub fn retreat(&mut self) {
        self.history.retreat();
    }

    pub fn current(&self) -> &[ShapeInstance] {
        self.history.current()
    }

    /// Elements the host should actually draw: everything at the cursor
    /// that has not shrunk below one pixel.
    pub fn visible(&self) -> impl Iterator<Item = &ShapeInstance> {
        self.history.current().iter().filter(|s| !s.is_subpixel())
    }

    /// How many elements of the current generation shrank below one pixel
    /// when it was computed. Useful for auto-stopping iteration once
    /// everything is sub-pixel.
    pub fn subpixel_elements(&self) -> usize {
        self.subpixel_counts[self.history.cursor()]
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

#[cfg(test)]
mod tests {
    use super::*;

    fn halving_table() -> TransformTable {
        TransformTable::from_rows(&[
            vec![0.5, 0.0, 0.0, 0.5, 0.0, 0.0],
            vec![0.5, 0.0, 0.0, 0.5, 0.5, 0.0],
            vec![0.5, 0.0, 0.0, 0.5, 0.25, 0.5],
        ])
        .unwrap()
    }

    #[test]
    fn color_by_transform_is_rejected() {
        assert!(DeterministicIfsPixel::new(
            64,
            64,
            halving_table(),
            ColorMode::ColorByTransform,
            None
        )
        .is_err());
    }

    #[test]
    fn geometric_growth_is_table_len_pow_iteration() {
        let mut ifs = DeterministicIfsGeometric::new(100, 100, halving_table(), None).unwrap();
        assert_eq!(ifs.current().len(), 1);
        ifs.advance();
        assert_eq!(ifs.current().len(), 3);
        ifs.advance();
        assert_eq!(ifs.current().len(), 9);
    }

    #[test]
    fn extents_scale_by_diagonal_terms_only() {
        let table = TransformTable::from_rows(&[vec![0.5, 0.9, 0.9, 0.25, 0.0, 0.0]]).unwrap();
        let seed = ShapeInstance::new(ShapeKind::Rectangle, 10.0, 20.0, 8.0, 8.0);
        let mut ifs = DeterministicIfsGeometric::new(100, 100, table, Some(seed)).unwrap();
        ifs.advance();
        let element = ifs.current()[0];
        assert_eq!(element.width, 4.0);
        assert_eq!(element.height, 2.0);
        // The shear terms still moved the origin.
        assert_eq!(element.x, 0.5 * 10.0 + 0.9 * 20.0);
        assert_eq!(element.y, 0.9 * 10.0 + 0.25 * 20.0);
    }

    #[test]
    fn pixel_variant_copies_source_color() {
        let table = TransformTable::from_rows(&[vec![0.5, 0.0, 0.0, 0.5, 0.0, 0.0]]).unwrap();
        let seed = ShapeInstance::new(ShapeKind::Rectangle, 0.0, 0.0, 10.0, 10.0);
        let mut ifs =
            DeterministicIfsPixel::new(32, 32, table, ColorMode::Plain, Some(seed)).unwrap();
        ifs.advance();
        // The seed square halves toward the origin.
        assert!(ifs.current().is_set(0, 0));
        assert!(ifs.current().is_set(4, 4));
        assert!(!ifs.current().is_set(8, 8));
        assert_eq!(ifs.current().at(2, 2), [0, 0, 0, 255]);
    }
}
