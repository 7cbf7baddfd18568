//! RGBA raster buffer shared by the pixel-based generators.
//!
//! The buffer is a flat row-major byte array, four channels per pixel,
//! matching the layout the browser's `ImageData` expects so snapshots can
//! be blitted without conversion. Fractional plot coordinates are floored
//! before addressing; anything outside `[0,width) x [0,height)` is a
//! silent no-op rather than an error, since transformed points routinely
//! land off-canvas.

/// One RGBA sample.
pub type Rgba = [u8; 4];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a fully transparent (zeroed) buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 4],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn offset(&self, x: f64, y: f64) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let xf = x.floor();
        let yf = y.floor();
        if xf < 0.0 || yf < 0.0 || xf >= self.width as f64 || yf >= self.height as f64 {
            return None;
        }
        Some((yf as usize * self.width + xf as usize) * 4)
    }

    /// Sample at a (possibly fractional) coordinate. `None` when the
    /// floored coordinate is outside the buffer.
    pub fn get(&self, x: f64, y: f64) -> Option<Rgba> {
        let i = self.offset(x, y)?;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Write at a (possibly fractional) coordinate. Out-of-range writes
    /// are dropped; returns whether the write landed.
    pub fn set(&mut self, x: f64, y: f64, rgba: Rgba) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                self.data[i..i + 4].copy_from_slice(&rgba);
                true
            }
            None => false,
        }
    }

    /// Sample at an integer coordinate known to be in bounds.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> Rgba {
        let i = (y * self.width + x) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// A pixel counts as set once it is fully opaque.
    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.data[(y * self.width + x) * 4 + 3] == 255
    }
}
