//! Application-wide constants.
//!
//! Centralizes magic numbers and layout values so the renderer and the
//! hit-testing code read the same geometry.

use image::Rgba;

// ============================================================================
// Canvas
// ============================================================================

/// Default logical canvas width in pixels
pub const DEFAULT_CANVAS_WIDTH: f64 = 600.0;

/// Default logical canvas height in pixels
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;

/// Smallest width or height a layer may be resized to
pub const MIN_LAYER_SIZE: f64 = 20.0;

// ============================================================================
// Selection Decoration
// ============================================================================

/// Side length of a square corner handle
pub const HANDLE_SIZE: f64 = 8.0;

/// Distance the selection border sits outside the layer rectangle
pub const SELECTION_OUTSET: f64 = 2.0;

/// Stroke width of the selection border
pub const SELECTION_BORDER_WIDTH: f64 = 3.0;

/// Gold used for the selection border and handle fill
pub const SELECTION_COLOR: Rgba<u8> = Rgba([0xFF, 0xD7, 0x00, 0xFF]);

/// Orange outline around each handle
pub const HANDLE_STROKE_COLOR: Rgba<u8> = Rgba([0xFF, 0xA5, 0x00, 0xFF]);

// ============================================================================
// Placeholder
// ============================================================================

/// Gradient stops painted when no background is loaded
pub const PLACEHOLDER_GRADIENT: [(f64, Rgba<u8>); 3] = [
    (0.0, Rgba([0x66, 0x7E, 0xEA, 0xFF])),
    (0.5, Rgba([0x76, 0x4B, 0xA2, 0xFF])),
    (1.0, Rgba([0xF0, 0x93, 0xFB, 0xFF])),
];

// ============================================================================
// Loading & Access
// ============================================================================

/// Default worker threads for image decoding
pub const DEFAULT_LOADER_THREADS: usize = 2;

/// Token balance required to unlock the editor
pub const DEFAULT_MINIMUM_BALANCE: f64 = 100.0;

/// Decimals assumed when the token contract has not reported its own
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// Default prefix for exported file names
pub const DEFAULT_EXPORT_PREFIX: &str = "overlay-custom";

/// Origin treated as same-origin for pixel readback
pub const DEFAULT_APP_ORIGIN: &str = "http://localhost:3000";

/// Loopback address for the relay started when none is configured
pub const RELAY_BIND_ADDR: &str = "127.0.0.1:0";

/// Relay responses may be cached by clients for a day
pub const RELAY_CACHE_CONTROL: &str = "public, max-age=86400";

/// User agent sent upstream by the relay and HTTP fetcher
pub const HTTP_USER_AGENT: &str = "Mozilla/5.0 (compatible; overlayboard/0.1)";
