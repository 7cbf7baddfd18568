//! Iterated-function-system fractal engine
//!
//! This crate centralises the algorithmic core shared by the fractal
//! builders:
//!
//! 1. **Transform tables** – ordered, weighted affine transforms with
//!    optional variation vectors and color weights, plus the exhaustive
//!    and weighted-stochastic selection policies over them.
//! 2. **Iteration history** – an append-only, lazily extended sequence of
//!    generation snapshots with a cursor, giving every generator free
//!    undo/redo: retreating is a pointer move and re-advancing replays the
//!    cached snapshot instead of recomputing it.
//! 3. **Generators** – chaos game, randomized IFS, deterministic IFS over
//!    pixels and over shapes, and the fractal flame with non-linear
//!    variation blending and density accumulation.
//!
//! The rendering surface, redraw scheduling and input handling live in
//! the host; the `wasm-ifs` crate exposes this engine to a browser.
//! Stochastic generators own a seedable RNG, so runs are reproducible
//! bit-for-bit via the `new_with_seed` constructors.

pub mod chaos_game;
pub mod color;
pub mod deterministic_ifs;
pub mod flame;
pub mod history;
pub mod randomized_ifs;
pub mod raster;
pub mod shape;
pub mod transform;
pub mod variation;
