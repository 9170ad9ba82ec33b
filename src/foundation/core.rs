use std::ops::{Add, Mul, Neg, Sub};

use crate::foundation::error::{SymmetraError, SymmetraResult};

/// Point in normalized canvas space, conventionally `[-1, 1] x [-1, 1]` with `+y` pointing down
/// the canvas rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Canvas center.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Build a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Uniformly scale about the origin.
    pub fn scale(self, f: f64) -> Self {
        Self::new(self.x * f, self.y * f)
    }

    /// Rotate counter-clockwise about the origin by `angle` radians.
    pub fn rotate(self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    /// Root-mean-square of the two coordinates.
    pub fn rms(self) -> f64 {
        ((self.x * self.x + self.y * self.y) / 2.0).sqrt()
    }

    /// Euclidean distance from the origin.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Largest absolute coordinate (distance in the square norm).
    pub fn max_norm(self) -> f64 {
        self.x.abs().max(self.y.abs())
    }

    /// `true` when both coordinates are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, o: Self) -> Self {
        Self::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, o: Self) -> Self {
        Self::new(self.x - o.x, self.y - o.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, f: f64) -> Self {
        self.scale(f)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        kurbo::Point::new(p.x, p.y)
    }
}

/// Canvas dimensions: width x height x channels.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Interleaved channels per pixel.
    pub channels: u32,
}

impl Dimensions {
    /// Build dimensions without validation; see [`Dimensions::validate`].
    pub const fn new(width: u32, height: u32, channels: u32) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    /// Reject empty canvases.
    pub fn validate(self) -> SymmetraResult<Self> {
        if self.width == 0 || self.height == 0 || self.channels == 0 {
            return Err(SymmetraError::validation(format!(
                "dimensions must be non-zero, got {}x{}x{}",
                self.width, self.height, self.channels
            )));
        }
        Ok(self)
    }

    /// Number of pixels (`width * height`).
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Number of scalar values (`width * height * channels`).
    pub fn len(self) -> usize {
        self.pixel_count() * (self.channels as usize)
    }

    /// `true` when any extent is zero.
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Same channel count and aspect ratio, resized to `width`.
    pub fn scaled_to_width(self, width: u32) -> Self {
        let aspect = f64::from(self.height) / f64::from(self.width.max(1));
        let height = ((f64::from(width) * aspect).round() as u32).max(1);
        Self::new(width, height, self.channels)
    }

    /// Normalized coordinates of the center of pixel `(x, y)`.
    pub fn pixel_center(self, x: u32, y: u32) -> Point {
        Point::new(
            (f64::from(x) + 0.5) / f64::from(self.width) * 2.0 - 1.0,
            (f64::from(y) + 0.5) / f64::from(self.height) * 2.0 - 1.0,
        )
    }

    /// Nearest pixel to a normalized point, if it lies on the canvas.
    pub fn nearest_pixel(self, p: Point) -> Option<(u32, u32)> {
        let fx = ((p.x + 1.0) * 0.5 * f64::from(self.width) - 0.5).round();
        let fy = ((p.y + 1.0) * 0.5 * f64::from(self.height) - 0.5).round();
        if !(fx.is_finite() && fy.is_finite()) {
            return None;
        }
        if fx < 0.0 || fy < 0.0 || fx >= f64::from(self.width) || fy >= f64::from(self.height) {
            return None;
        }
        Some((fx as u32, fy as u32))
    }
}

/// Resampling filter used between resolutions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resample {
    /// Nearest-neighbour sampling.
    Nearest,
    /// Bilinear (triangle) filtering.
    #[default]
    Bilinear,
}

impl Resample {
    fn filter_type(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Bilinear => image::imageops::FilterType::Triangle,
        }
    }
}

/// Interleaved (row-major, channel-last) `f32` image in display range `[0, 255]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageTensor {
    dims: Dimensions,
    data: Vec<f32>,
}

impl ImageTensor {
    /// Lower bound of the display range.
    pub const VALUE_MIN: f32 = 0.0;
    /// Upper bound of the display range.
    pub const VALUE_MAX: f32 = 255.0;

    /// Wrap an existing buffer; `data.len()` must equal `dims.len()`.
    pub fn new(dims: Dimensions, data: Vec<f32>) -> SymmetraResult<Self> {
        let dims = dims.validate()?;
        if data.len() != dims.len() {
            return Err(SymmetraError::validation(format!(
                "image buffer length {} does not match {}x{}x{}",
                data.len(),
                dims.width,
                dims.height,
                dims.channels
            )));
        }
        Ok(Self { dims, data })
    }

    /// Image filled with a constant value.
    pub fn filled(dims: Dimensions, value: f32) -> SymmetraResult<Self> {
        let dims = dims.validate()?;
        Ok(Self {
            dims,
            data: vec![value; dims.len()],
        })
    }

    /// Image dimensions.
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Interleaved values.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable interleaved values.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consume into the raw buffer.
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Value at pixel `(x, y)`, channel `c`.
    pub fn get(&self, x: u32, y: u32, c: u32) -> f32 {
        let idx = ((y as usize) * (self.dims.width as usize) + (x as usize))
            * (self.dims.channels as usize)
            + (c as usize);
        self.data[idx]
    }

    /// Resample to `target` (same channel count) with the `image` crate's filters.
    ///
    /// Values are normalized against `[min, max]` for resampling, so anything outside that
    /// range is clamped on the way.
    pub fn resize(
        &self,
        target: Dimensions,
        filter: Resample,
        min: f32,
        max: f32,
    ) -> SymmetraResult<Self> {
        let target = target.validate()?;
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(SymmetraError::validation(format!(
                "resize range [{min}, {max}] is empty or not finite"
            )));
        }
        if target.channels != self.dims.channels {
            return Err(SymmetraError::validation(
                "resize cannot change the channel count",
            ));
        }
        if target == self.dims {
            return Ok(self.clone());
        }

        let (lo, span) = (f64::from(min), f64::from(max) - f64::from(min));
        let channels = self.dims.channels as usize;
        let mut out = vec![0.0f32; target.len()];
        for c in 0..channels {
            let plane = self
                .data
                .iter()
                .skip(c)
                .step_by(channels)
                .map(|&v| ((f64::from(v) - lo) / span).clamp(0.0, 1.0) as f32)
                .collect::<Vec<f32>>();
            let buf = image::ImageBuffer::<image::Luma<f32>, Vec<f32>>::from_raw(
                self.dims.width,
                self.dims.height,
                plane,
            )
            .ok_or_else(|| SymmetraError::evaluation("resize plane buffer size mismatch"))?;
            let resized = image::imageops::resize(
                &buf,
                target.width,
                target.height,
                filter.filter_type(),
            );
            for (i, v) in resized.into_raw().into_iter().enumerate() {
                out[i * channels + c] = (lo + f64::from(v) * span) as f32;
            }
        }
        Self::new(target, out)
    }

    /// Quantize to an RGB8 image for snapshots. Single-channel images are shown as gray,
    /// two-channel images leave blue empty, extra channels are dropped.
    pub fn to_rgb8(&self) -> image::RgbImage {
        let channels = self.dims.channels as usize;
        let quantize = |v: f32| v.clamp(Self::VALUE_MIN, Self::VALUE_MAX).round() as u8;
        let mut img = image::RgbImage::new(self.dims.width, self.dims.height);
        for (px, src) in img.pixels_mut().zip(self.data.chunks_exact(channels)) {
            px.0 = match channels {
                1 => [quantize(src[0]); 3],
                2 => [quantize(src[0]), quantize(src[1]), 0],
                _ => [quantize(src[0]), quantize(src[1]), quantize(src[2])],
            };
        }
        img
    }

    /// Lift an RGB8 image into a three-channel tensor.
    pub fn from_rgb8(img: &image::RgbImage) -> SymmetraResult<Self> {
        let dims = Dimensions::new(img.width(), img.height(), 3);
        let data = img.as_raw().iter().map(|&v| f32::from(v)).collect();
        Self::new(dims, data)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
