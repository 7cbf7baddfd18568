//! Chaos game point iteration over a regular polygon.
//!
//! Each generation jumps the running point `step_size` times a fixed
//! fraction of the way toward a vertex chosen by the selection rule,
//! plotting every landing black. The vertex rule is pluggable, which is
//! how the constrained Sierpinski-like variants (no immediate repeats,
//! no adjacent vertices) are realized on top of the same engine.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::history::History;
use crate::raster::PixelBuffer;

/// Picks a vertex index given the generator's RNG and the vertex count.
/// Rules may keep their own state (e.g. the previously chosen index).
pub type VertexRule = Box<dyn FnMut(&mut StdRng, usize) -> usize>;

/// The default rule: uniform over all vertices, no constraints.
pub fn uniform_rule() -> VertexRule {
    Box::new(|rng, n| rng.gen_range(0..n))
}

/// Rejects the vertex chosen on the previous draw.
pub fn no_repeat_rule() -> VertexRule {
    let mut last: Option<usize> = None;
    Box::new(move |rng, n| loop {
        let pick = rng.gen_range(0..n);
        if n == 1 || Some(pick) != last {
            last = Some(pick);
            return pick;
        }
    })
}

/// Points plotted per forward step.
pub const DEFAULT_STEP_SIZE: usize = 10_000;

/// Plotting starts after this many points of generation zero, once the
/// orbit has settled near the attractor.
const BURN_IN: usize = 20;

/// Margin between the guide polygon and the canvas edge, in pixels.
const POLYGON_MARGIN: f64 = 10.0;

#[derive(Clone, Copy, Debug)]
pub struct ChaosGameConfig {
    pub vertex_count: usize,
    /// Fraction of the distance toward the chosen vertex covered per jump.
    pub fraction: f64,
    pub step_size: usize,
    /// Whether the host should overlay the guide polygon.
    pub draw_guide_figure: bool,
}

impl Default for ChaosGameConfig {
    fn default() -> Self {
        Self {
            vertex_count: 3,
            fraction: 0.5,
            step_size: DEFAULT_STEP_SIZE,
            draw_guide_figure: false,
        }
    }
}

pub struct ChaosGame {
    fraction: f64,
    step_size: usize,
    draw_guide_figure: bool,
    vertices: Vec<(f64, f64)>,
    rule: VertexRule,
    rng: StdRng,
    x: f64,
    y: f64,
    history: History<PixelBuffer>,
}

impl ChaosGame {
    /// Create a generator with a random seed. Use
    /// [`new_with_seed`](Self::new_with_seed) for reproducible runs.
    pub fn new(
        width: usize,
        height: usize,
        config: ChaosGameConfig,
        rule: Option<VertexRule>,
    ) -> Result<Self, String> {
        let seed: u64 = rand::thread_rng().gen();
        Self::new_with_seed(width, height, config, rule, seed)
    }

    pub fn new_with_seed(
        width: usize,
        height: usize,
        config: ChaosGameConfig,
        rule: Option<VertexRule>,
        seed: u64,
    ) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err("canvas dimensions must be non-zero".into());
        }
        if config.vertex_count == 0 {
            return Err("polygon needs at least one vertex".into());
        }
        if !config.fraction.is_finite() || config.fraction <= 0.0 || config.fraction >= 1.0 {
            return Err(format!(
                "step fraction {} is outside (0, 1)",
                config.fraction
            ));
        }
        if config.step_size == 0 {
            return Err("step size must be non-zero".into());
        }

        // Vertices of a regular polygon inscribed in a circle around the
        // canvas center, swept one segment at a time starting from the
        // first segment boundary.
        let center_x = width as f64 / 2.0;
        let center_y = height as f64 / 2.0;
        let radius = center_x.min(center_y) - POLYGON_MARGIN;
        if radius <= 0.0 {
            return Err("canvas is too small for the guide polygon".into());
        }
        let segment = 2.0 * std::f64::consts::PI / config.vertex_count as f64;
        let mut vertices = Vec::with_capacity(config.vertex_count);
        let mut pos = segment;
        for _ in 0..config.vertex_count {
            vertices.push((center_x + radius * pos.sin(), center_y + radius * pos.cos()));
            pos += segment;
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let x = rng.gen_range(0..width) as f64;
        let y = rng.gen_range(0..height) as f64;

        Ok(Self {
            fraction: config.fraction,
            step_size: config.step_size,
            draw_guide_figure: config.draw_guide_figure,
            vertices,
            rule: rule.unwrap_or_else(uniform_rule),
            rng,
            x,
            y,
            history: History::new(PixelBuffer::new(width, height)),
        })
    }

    /// Compute or replay the next generation.
    pub fn advance(&mut self) {
        let Self {
            fraction,
            step_size,
            vertices,
            rule,
            rng,
            x,
            y,
            history,
            ..
        } = self;
        let first_generation = history.cursor() == 0;
        let computed = history.advance_with(|prev| {
            let mut next = prev.clone();
            for i in 0..*step_size {
                let pick = rule(&mut *rng, vertices.len()) % vertices.len();
                let (vx, vy) = vertices[pick];
                // Jump a fraction of the way toward the vertex, truncating
                // to the pixel grid.
                *x = (*x + (vx - *x) * *fraction).floor();
                *y = (*y + (vy - *y) * *fraction).floor();
                if !first_generation || i > BURN_IN {
                    next.set(*x, *y, [0, 0, 0, 255]);
                }
            }
            next
        });
        if computed {
            log::debug!(
                "chaos game generation {} computed in {:?}",
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

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    pub fn draw_guide_figure(&self) -> bool {
        self.draw_guide_figure
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
