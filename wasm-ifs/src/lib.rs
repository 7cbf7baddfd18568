//! WebAssembly bindings for the IFS fractal generators
//!
//! Exposes the `ifs-core` engine to a browser host via `wasm-bindgen`.
//! The host owns the canvas and the repaint loop; these wrappers hand it
//! RGBA snapshot bytes ready for `putImageData`, the redraw flag, and the
//! diagnostic timings. Transform tables cross the boundary as plain JS
//! arrays (`[a, b, c, d, e, f, weight, colorWeight]` rows, flame rows as
//! `{c: [...], vv: [...]}` objects).

use serde::{Deserialize, Serialize};
use std::time::Duration;
use wasm_bindgen::prelude::*;

use ifs_core::chaos_game::{
    no_repeat_rule, uniform_rule, ChaosGame as CoreChaosGame, ChaosGameConfig, VertexRule,
};
use ifs_core::color::ColorMode;
use ifs_core::deterministic_ifs::{
    DeterministicIfsGeometric as CoreGeometric, DeterministicIfsPixel as CorePixel,
};
use ifs_core::flame::{FractalFlame as CoreFlame, FractalFlameConfig};
use ifs_core::randomized_ifs::{RandomizedIfs as CoreRandomized, RandomizedIfsConfig};
use ifs_core::shape::{ShapeInstance, ShapeKind};
use ifs_core::transform::{AffineTransform, TableEntry, TransformTable};
use ifs_core::variation::{VariationVector, VARIATION_COUNT};

/// Shared constants exposed to JavaScript.
#[wasm_bindgen]
pub fn constants() -> JsValue {
    #[derive(Serialize)]
    struct Constants {
        chaos_game_step_size: usize,
        randomized_ifs_step_size: usize,
        flame_step_size: usize,
        flame_zoom: f64,
        variation_count: usize,
    }

    let c = Constants {
        chaos_game_step_size: ifs_core::chaos_game::DEFAULT_STEP_SIZE,
        randomized_ifs_step_size: ifs_core::randomized_ifs::DEFAULT_STEP_SIZE,
        flame_step_size: ifs_core::flame::DEFAULT_STEP_SIZE,
        flame_zoom: ifs_core::flame::DEFAULT_ZOOM,
        variation_count: VARIATION_COUNT,
    };
    serde_wasm_bindgen::to_value(&c).unwrap_or(JsValue::NULL)
}

fn err_to_js(e: String) -> JsValue {
    JsValue::from_str(&e)
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1_000.0
}

fn table_from_js(rows: JsValue) -> Result<TransformTable, JsValue> {
    let rows: Vec<Vec<f64>> = serde_wasm_bindgen::from_value(rows)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    TransformTable::from_rows(&rows).map_err(err_to_js)
}

/// A flame table row: eight coefficients plus the variation vector.
#[derive(Deserialize)]
struct FlameRow {
    c: Vec<f64>,
    vv: Vec<f64>,
}

fn flame_table_from_js(rows: JsValue) -> Result<TransformTable, JsValue> {
    let rows: Vec<FlameRow> = serde_wasm_bindgen::from_value(rows)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let entries = rows
        .iter()
        .map(|row| {
            let transform = AffineTransform::from_row(&row.c)?;
            let variations = VariationVector::new(&row.vv)?;
            Ok(TableEntry::with_variations(transform, variations))
        })
        .collect::<Result<Vec<_>, String>>()
        .map_err(err_to_js)?;
    TransformTable::new(entries).map_err(err_to_js)
}

fn rule_from_name(name: &str) -> Result<VertexRule, JsValue> {
    match name {
        "uniform" => Ok(uniform_rule()),
        "no-repeat" => Ok(no_repeat_rule()),
        other => Err(JsValue::from_str(&format!(
            "unknown vertex rule \"{}\"",
            other
        ))),
    }
}

/// Chaos game over a regular polygon.
#[wasm_bindgen]
pub struct ChaosGame {
    inner: CoreChaosGame,
}

#[wasm_bindgen]
impl ChaosGame {
    /// `rule` is one of `"uniform"` or `"no-repeat"`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: usize,
        height: usize,
        vertex_count: usize,
        fraction: f64,
        step_size: usize,
        draw_guide_figure: bool,
        rule: &str,
        seed: u64,
    ) -> Result<ChaosGame, JsValue> {
        let config = ChaosGameConfig {
            vertex_count,
            fraction,
            step_size,
            draw_guide_figure,
        };
        let rule = rule_from_name(rule)?;
        let inner = CoreChaosGame::new_with_seed(width, height, config, Some(rule), seed)
            .map_err(err_to_js)?;
        Ok(ChaosGame { inner })
    }

    pub fn advance(&mut self) {
        self.inner.advance();
    }

    pub fn retreat(&mut self) {
        self.inner.retreat();
    }

    pub fn iteration(&self) -> usize {
        self.inner.iteration()
    }

    /// RGBA bytes of the current snapshot, ready for `putImageData`.
    pub fn snapshot(&self) -> Vec<u8> {
        self.inner.current().data().to_vec()
    }

    /// Vertex list for the guide overlay, as an array of `[x, y]` pairs.
    pub fn vertices(&self) -> js_sys::Array {
        self.inner
            .vertices()
            .iter()
            .map(|&(x, y)| {
                let pair = js_sys::Array::new();
                pair.push(&JsValue::from_f64(x));
                pair.push(&JsValue::from_f64(y));
                JsValue::from(pair)
            })
            .collect()
    }

    pub fn draw_guide_figure(&self) -> bool {
        self.inner.draw_guide_figure()
    }

    pub fn needs_redraw(&self) -> bool {
        self.inner.needs_redraw()
    }

    pub fn mark_drawn(&mut self, draw_ms: f64) {
        self.inner
            .mark_drawn(Duration::from_secs_f64(draw_ms.max(0.0) / 1_000.0));
    }

    pub fn last_step_ms(&self) -> f64 {
        ms(self.inner.last_step_duration())
    }

    pub fn last_draw_ms(&self) -> f64 {
        ms(self.inner.last_draw_duration())
    }
}

/// Randomized IFS with weighted transform selection.
#[wasm_bindgen]
pub struct RandomizedIfs {
    inner: CoreRandomized,
}

#[wasm_bindgen]
impl RandomizedIfs {
    /// `table` is an array of `[a, b, c, d, e, f, weight]` rows;
    /// `color_mode` is `"plain"`, `"heatmap"` or `"color-by-transform"`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: usize,
        height: usize,
        table: JsValue,
        offset_x: f64,
        offset_y: f64,
        step_size: usize,
        color_mode: &str,
        seed: u64,
    ) -> Result<RandomizedIfs, JsValue> {
        let table = table_from_js(table)?.with_offset(offset_x, offset_y);
        let config = RandomizedIfsConfig {
            step_size,
            color_mode: ColorMode::parse(color_mode).map_err(err_to_js)?,
        };
        let inner = CoreRandomized::new_with_seed(width, height, table, config, seed)
            .map_err(err_to_js)?;
        Ok(RandomizedIfs { inner })
    }

    pub fn advance(&mut self) {
        self.inner.advance();
    }

    pub fn retreat(&mut self) {
        self.inner.retreat();
    }

    pub fn iteration(&self) -> usize {
        self.inner.iteration()
    }

    pub fn snapshot(&self) -> Vec<u8> {
        self.inner.current().data().to_vec()
    }

    pub fn needs_redraw(&self) -> bool {
        self.inner.needs_redraw()
    }

    pub fn mark_drawn(&mut self, draw_ms: f64) {
        self.inner
            .mark_drawn(Duration::from_secs_f64(draw_ms.max(0.0) / 1_000.0));
    }

    pub fn last_step_ms(&self) -> f64 {
        ms(self.inner.last_step_duration())
    }

    pub fn last_draw_ms(&self) -> f64 {
        ms(self.inner.last_draw_duration())
    }
}

fn seed_shape(kind: &str, x: f64, y: f64, width: f64, height: f64) -> Result<ShapeInstance, JsValue> {
    let kind = match kind {
        "rectangle" => ShapeKind::Rectangle,
        "triangle" => ShapeKind::Triangle,
        other => {
            return Err(JsValue::from_str(&format!(
                "unknown shape kind \"{}\"",
                other
            )))
        }
    };
    Ok(ShapeInstance::new(kind, x, y, width, height))
}

/// Deterministic IFS over the pixels of a seed image.
#[wasm_bindgen]
pub struct DeterministicIfsPixel {
    inner: CorePixel,
}

#[wasm_bindgen]
impl DeterministicIfsPixel {
    /// `color_mode` is `"plain"`, `"demo"` or `"heatmap"`; the seed shape
    /// kind is `"rectangle"` or `"triangle"`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: usize,
        height: usize,
        table: JsValue,
        color_mode: &str,
        seed_kind: &str,
        seed_x: f64,
        seed_y: f64,
        seed_width: f64,
        seed_height: f64,
    ) -> Result<DeterministicIfsPixel, JsValue> {
        let table = table_from_js(table)?;
        let mode = ColorMode::parse(color_mode).map_err(err_to_js)?;
        let seed = seed_shape(seed_kind, seed_x, seed_y, seed_width, seed_height)?;
        let inner =
            CorePixel::new(width, height, table, mode, Some(seed)).map_err(err_to_js)?;
        Ok(DeterministicIfsPixel { inner })
    }

    pub fn advance(&mut self) {
        self.inner.advance();
    }

    pub fn retreat(&mut self) {
        self.inner.retreat();
    }

    pub fn iteration(&self) -> usize {
        self.inner.iteration()
    }

    pub fn snapshot(&self) -> Vec<u8> {
        self.inner.current().data().to_vec()
    }

    pub fn needs_redraw(&self) -> bool {
        self.inner.needs_redraw()
    }

    pub fn mark_drawn(&mut self, draw_ms: f64) {
        self.inner
            .mark_drawn(Duration::from_secs_f64(draw_ms.max(0.0) / 1_000.0));
    }

    pub fn last_step_ms(&self) -> f64 {
        ms(self.inner.last_step_duration())
    }

    pub fn last_draw_ms(&self) -> f64 {
        ms(self.inner.last_draw_duration())
    }
}

/// Deterministic IFS over shape instances.
#[wasm_bindgen]
pub struct DeterministicIfsGeometric {
    inner: CoreGeometric,
}

#[wasm_bindgen]
impl DeterministicIfsGeometric {
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: usize,
        height: usize,
        table: JsValue,
        seed_kind: &str,
        seed_x: f64,
        seed_y: f64,
        seed_width: f64,
        seed_height: f64,
    ) -> Result<DeterministicIfsGeometric, JsValue> {
        let table = table_from_js(table)?;
        let seed = seed_shape(seed_kind, seed_x, seed_y, seed_width, seed_height)?;
        let inner = CoreGeometric::new(width, height, table, Some(seed)).map_err(err_to_js)?;
        Ok(DeterministicIfsGeometric { inner })
    }

    pub fn advance(&mut self) {
        self.inner.advance();
    }

    pub fn retreat(&mut self) {
        self.inner.retreat();
    }

    pub fn iteration(&self) -> usize {
        self.inner.iteration()
    }

    /// Every element of the current generation, as an array of
    /// `{kind, x, y, width, height}` objects.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.current().to_vec())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Only the elements large enough to draw.
    pub fn visible(&self) -> Result<JsValue, JsValue> {
        let shapes: Vec<ShapeInstance> = self.inner.visible().copied().collect();
        serde_wasm_bindgen::to_value(&shapes).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn subpixel_elements(&self) -> usize {
        self.inner.subpixel_elements()
    }

    pub fn needs_redraw(&self) -> bool {
        self.inner.needs_redraw()
    }

    pub fn mark_drawn(&mut self, draw_ms: f64) {
        self.inner
            .mark_drawn(Duration::from_secs_f64(draw_ms.max(0.0) / 1_000.0));
    }

    pub fn last_step_ms(&self) -> f64 {
        ms(self.inner.last_step_duration())
    }

    pub fn last_draw_ms(&self) -> f64 {
        ms(self.inner.last_draw_duration())
    }
}

/// Fractal flame with variation blending and density accumulation.
#[wasm_bindgen]
pub struct FractalFlame {
    inner: CoreFlame,
}

#[wasm_bindgen]
impl FractalFlame {
    /// `table` is an array of `{c: [a, b, c, d, e, f, weight, colorWeight],
    /// vv: [...]}` rows. Custom post/final transforms are not exposed over
    /// the boundary; the defaults (identity, zero color term) apply.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: usize,
        height: usize,
        table: JsValue,
        step_size: usize,
        zoom: f64,
        seed: u64,
    ) -> Result<FractalFlame, JsValue> {
        let table = flame_table_from_js(table)?;
        let config = FractalFlameConfig { step_size, zoom };
        let inner = CoreFlame::new_with_seed(width, height, table, config, None, None, seed)
            .map_err(err_to_js)?;
        Ok(FractalFlame { inner })
    }

    pub fn advance(&mut self) {
        self.inner.advance();
    }

    pub fn retreat(&mut self) {
        self.inner.retreat();
    }

    pub fn iteration(&self) -> usize {
        self.inner.iteration()
    }

    pub fn snapshot(&self) -> Vec<u8> {
        self.inner.current().data().to_vec()
    }

    pub fn color(&self) -> f64 {
        self.inner.color()
    }

    pub fn needs_redraw(&self) -> bool {
        self.inner.needs_redraw()
    }

    pub fn mark_drawn(&mut self, draw_ms: f64) {
        self.inner
            .mark_drawn(Duration::from_secs_f64(draw_ms.max(0.0) / 1_000.0));
    }

    pub fn last_step_ms(&self) -> f64 {
        ms(self.inner.last_step_duration())
    }

    pub fn last_draw_ms(&self) -> f64 {
        ms(self.inner.last_draw_duration())
    }
}
