//! Owned drawing surface.
//!
//! A [`RenderTarget`] is an RGBA pixel buffer sized to the canvas's logical
//! dimensions. Every primitive maps a float [`Rect`] to the same set of pixels
//! through [`RenderTarget::pixel_span`]: a pixel is covered when its center lies
//! inside the rectangle. Hit-testing uses the same rectangles, so what is drawn
//! is exactly what can be grabbed.

use crate::geometry::{CanvasSize, Rect};
use crate::loader::DecodedImage;
use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Background scaled to the canvas, kept until the background changes.
struct ScaledBackground {
    source: DecodedImage,
    pixels: RgbaImage,
}

pub struct RenderTarget {
    pixels: RgbaImage,
    caption: Option<String>,
    background_cache: Option<ScaledBackground>,
}

impl RenderTarget {
    pub fn new(canvas: CanvasSize) -> Self {
        let (width, height) = canvas.pixel_dimensions();
        Self {
            pixels: RgbaImage::from_pixel(width, height, TRANSPARENT),
            caption: None,
            background_cache: None,
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Status text painted over the placeholder. No font is bundled, so the
    /// host is responsible for showing it.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn set_caption(&mut self, caption: Option<String>) {
        self.caption = caption;
    }

    pub fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    /// Fill the whole surface with a diagonal gradient, top-left to bottom-right.
    pub fn fill_linear_gradient(&mut self, stops: &[(f64, Rgba<u8>)]) {
        let width = f64::from(self.pixels.width());
        let height = f64::from(self.pixels.height());
        let length_squared = (width * width + height * height).max(f64::EPSILON);

        for (x, y, pixel) in self.pixels.enumerate_pixels_mut() {
            let projected = (f64::from(x) + 0.5) * width + (f64::from(y) + 0.5) * height;
            *pixel = gradient_at(stops, (projected / length_squared).clamp(0.0, 1.0));
        }
    }

    /// Stretch `image` over the full surface. The scaled copy is reused while
    /// the same decoded image stays in place.
    pub fn draw_background(&mut self, image: &DecodedImage) {
        let (width, height) = self.pixels.dimensions();
        let cached = self
            .background_cache
            .as_ref()
            .is_some_and(|cache| cache.source.same_pixels(image) && cache.pixels.dimensions() == (width, height));

        if !cached {
            let pixels = imageops::resize(image.pixels(), width, height, FilterType::Triangle);
            self.background_cache = Some(ScaledBackground {
                source: image.clone(),
                pixels,
            });
        }

        if let Some(cache) = self.background_cache.as_ref() {
            for (dst, src) in self.pixels.pixels_mut().zip(cache.pixels.pixels()) {
                composite(dst, *src);
            }
        }
    }

    /// Draw `image` scaled into `rect`, alpha-blended over what is there.
    pub fn draw_image(&mut self, image: &DecodedImage, rect: Rect) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(rect) else {
            return;
        };
        let scaled = imageops::resize(image.pixels(), x1 - x0, y1 - y0, FilterType::Triangle);
        for (x, y, src) in scaled.enumerate_pixels() {
            composite(self.pixels.get_pixel_mut(x0 + x, y0 + y), *src);
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                composite(self.pixels.get_pixel_mut(x, y), color);
            }
        }
    }

    /// Stroke centered on the rectangle's edges.
    pub fn stroke_rect(&mut self, rect: Rect, line_width: f64, color: Rgba<u8>) {
        let half = line_width / 2.0;
        self.paint_band(rect.outset(half), rect.outset(-half), color);
    }

    /// Stroke drawn entirely inside the rectangle.
    pub fn outline_rect(&mut self, rect: Rect, line_width: f64, color: Rgba<u8>) {
        self.paint_band(rect, rect.outset(-line_width), color);
    }

    /// Pixels `(x0, y0, x1, y1)`, end-exclusive, whose centers fall inside
    /// `rect`, clipped to the surface. `None` when nothing is covered.
    pub fn pixel_span(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let (x0, x1) = axis_span(rect.left, rect.right(), self.pixels.width());
        let (y0, y1) = axis_span(rect.top, rect.bottom(), self.pixels.height());
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn paint_band(&mut self, outer: Rect, inner: Rect, color: Rgba<u8>) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(outer) else {
            return;
        };
        let hole = if inner.width > 0.0 && inner.height > 0.0 {
            self.pixel_span(inner)
        } else {
            None
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let in_hole = hole.is_some_and(|(hx0, hy0, hx1, hy1)| x >= hx0 && x < hx1 && y >= hy0 && y < hy1);
                if !in_hole {
                    composite(self.pixels.get_pixel_mut(x, y), color);
                }
            }
        }
    }
}

/// Source-over. Opaque and fully transparent sources skip the float math so
/// solid fills land on exact color values.
fn composite(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    match src.0[3] {
        0 => {}
        255 => *dst = src,
        _ if dst.0[3] == 0 => *dst = src,
        _ => dst.blend(&src),
    }
}

/// First and one-past-last pixel index whose center lies in `[start, end)`.
fn axis_span(start: f64, end: f64, limit: u32) -> (u32, u32) {
    let clip = |value: f64| value.clamp(0.0, f64::from(limit)) as u32;
    (clip((start - 0.5).ceil()), clip((end - 0.5).ceil()))
}

fn gradient_at(stops: &[(f64, Rgba<u8>)], t: f64) -> Rgba<u8> {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return TRANSPARENT;
    };
    if t <= first.0 {
        return first.1;
    }

    for pair in stops.windows(2) {
        let ((from_at, from), (to_at, to)) = (pair[0], pair[1]);
        if t <= to_at {
            let span = (to_at - from_at).max(f64::EPSILON);
            return lerp(from, to, (t - from_at) / span);
        }
    }
    last.1
}

fn lerp(from: Rgba<u8>, to: Rgba<u8>, t: f64) -> Rgba<u8> {
    let channel = |i: usize| {
        let (a, b) = (f64::from(from.0[i]), f64::from(to.0[i]));
        (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
    };
    Rgba([channel(0), channel(1), channel(2), channel(3)])
}
