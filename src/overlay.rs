// 🖼️ Overlay Renderer - faint full-page background image
//
// Cover-fit: scale = max(page_w / img_w, page_h / img_h) so the image covers
// the whole page (cropping allowed), then center it. Offsets may be negative.
// A missing or unreadable image is a warning, never a failed export.

use crate::document::style::PageGeometry;
use crate::error::CommitteeResult;
use crate::export::ExportWarning;
use image::DynamicImage;
use lopdf::content::Operation;
use lopdf::Object;
use std::path::Path;
use tracing::{debug, warn};

/// Resource names used by page content streams
pub const OVERLAY_XOBJECT: &str = "Im1";
pub const OVERLAY_GSTATE: &str = "GS1";

// ============================================================================
// PLACEMENT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPlacement {
    pub scale: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl OverlayPlacement {
    /// None when either image dimension is zero
    pub fn cover_fit(page_width: f32, page_height: f32, image_width: f32, image_height: f32) -> Option<Self> {
        if image_width <= 0.0 || image_height <= 0.0 {
            return None;
        }

        let scale = (page_width / image_width).max(page_height / image_height);
        let width = image_width * scale;
        let height = image_height * scale;

        Some(OverlayPlacement {
            scale,
            x: (page_width - width) / 2.0,
            y: (page_height - height) / 2.0,
            width,
            height,
        })
    }
}

// ============================================================================
// IMAGE
// ============================================================================

/// Decoded overlay pixels, ready to embed (8-bit RGB + optional alpha plane)
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

impl OverlayImage {
    pub fn open(path: &Path) -> CommitteeResult<Self> {
        let img = image::open(path)?;
        Ok(Self::from_dynamic(&img))
    }

    pub fn from_dynamic(img: &DynamicImage) -> Self {
        let width = img.width();
        let height = img.height();

        if img.color().has_alpha() {
            let rgba = img.to_rgba8().into_raw();
            let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
            let mut alpha = Vec::with_capacity(rgba.len() / 4);
            for px in rgba.chunks_exact(4) {
                rgb.extend_from_slice(&px[..3]);
                alpha.push(px[3]);
            }
            OverlayImage {
                width,
                height,
                rgb,
                alpha: Some(alpha),
            }
        } else {
            OverlayImage {
                width,
                height,
                rgb: img.to_rgb8().into_raw(),
                alpha: None,
            }
        }
    }
}

// ============================================================================
// OVERLAY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub image: OverlayImage,
    pub opacity: f32,
}

impl Overlay {
    pub fn new(image: OverlayImage, opacity: f32) -> Self {
        Overlay {
            image,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    /// Resolve the configured overlay. No path configured = no overlay and no
    /// warning; a configured but missing/unreadable file = no overlay plus a warning.
    pub fn load(path: Option<&Path>, opacity: f32) -> (Option<Overlay>, Option<ExportWarning>) {
        let Some(path) = path else {
            return (None, None);
        };

        if !path.exists() {
            warn!(path = %path.display(), "overlay image not found, rendering without it");
            return (
                None,
                Some(ExportWarning::MissingAsset {
                    path: path.to_path_buf(),
                    reason: "file not found".to_string(),
                }),
            );
        }

        match OverlayImage::open(path) {
            Ok(image) => {
                debug!(path = %path.display(), width = image.width, height = image.height, "overlay image loaded");
                (Some(Overlay::new(image, opacity)), None)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "overlay image unreadable, rendering without it");
                (
                    None,
                    Some(ExportWarning::MissingAsset {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    }),
                )
            }
        }
    }

    pub fn placement(&self, page: &PageGeometry) -> Option<OverlayPlacement> {
        OverlayPlacement::cover_fit(
            page.width,
            page.height,
            self.image.width as f32,
            self.image.height as f32,
        )
    }

    /// Content-stream operations drawing the overlay on one page.
    /// Emitted first so everything else paints on top of it.
    pub fn page_operations(&self, page: &PageGeometry) -> Vec<Operation> {
        let Some(p) = self.placement(page) else {
            return Vec::new();
        };

        vec![
            Operation::new("q", vec![]),
            Operation::new("gs", vec![Object::Name(OVERLAY_GSTATE.as_bytes().to_vec())]),
            Operation::new(
                "cm",
                vec![
                    real(p.width),
                    real(0.0),
                    real(0.0),
                    real(p.height),
                    real(p.x),
                    real(p.y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(OVERLAY_XOBJECT.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]
    }
}

fn real(v: f32) -> Object {
    Object::Real(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// True when the placed image leaves no uncovered strip on the page
    fn covers(p: &OverlayPlacement, page_width: f32, page_height: f32) -> bool {
        const EPS: f32 = 1e-3;
        p.x <= EPS && p.y <= EPS && p.x + p.width >= page_width - EPS && p.y + p.height >= page_height - EPS
    }

    #[test]
    fn test_cover_fit_letter_square_image() {
        let p = OverlayPlacement::cover_fit(612.0, 792.0, 300.0, 300.0).unwrap();

        assert!((p.scale - 2.64).abs() < 1e-5);
        assert!((p.width - 792.0).abs() < 1e-3);
        assert!((p.height - 792.0).abs() < 1e-3);
        assert!((p.x - (-90.0)).abs() < 1e-3);
        assert!(p.y.abs() < 1e-3);
        assert!(covers(&p, 612.0, 792.0));
    }

    #[test]
    fn test_cover_fit_wide_image_crops_sides() {
        let p = OverlayPlacement::cover_fit(612.0, 792.0, 2000.0, 500.0).unwrap();

        // height drives the scale
        assert!((p.scale - 792.0 / 500.0).abs() < 1e-5);
        assert!(p.x < 0.0);
        assert!(covers(&p, 612.0, 792.0));
    }

    #[test]
    fn test_cover_fit_tall_image_crops_top_and_bottom() {
        let p = OverlayPlacement::cover_fit(612.0, 792.0, 100.0, 1000.0).unwrap();

        assert!((p.scale - 6.12).abs() < 1e-5);
        assert!(p.y < 0.0);
        assert!(p.x.abs() < 1e-3);
        assert!(covers(&p, 612.0, 792.0));
    }

    #[test]
    fn test_cover_fit_rejects_empty_image() {
        assert!(OverlayPlacement::cover_fit(612.0, 792.0, 0.0, 10.0).is_none());
    }

    #[test]
    fn test_no_configured_path_means_no_warning() {
        let (overlay, warning) = Overlay::load(None, 0.1);
        assert!(overlay.is_none());
        assert!(warning.is_none());
    }

    #[test]
    fn test_missing_file_is_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seal.jpg");

        let (overlay, warning) = Overlay::load(Some(&path), 0.1);
        assert!(overlay.is_none());
        assert!(matches!(warning, Some(ExportWarning::MissingAsset { .. })));
    }

    #[test]
    fn test_unreadable_file_is_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seal.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let (overlay, warning) = Overlay::load(Some(&path), 0.1);
        assert!(overlay.is_none());
        assert!(warning.is_some());
    }

    #[test]
    fn test_loads_png_and_splits_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seal.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 128]))
            .save(&path)
            .unwrap();

        let (overlay, warning) = Overlay::load(Some(&path), 0.1);
        assert!(warning.is_none());

        let overlay = overlay.unwrap();
        assert_eq!((overlay.image.width, overlay.image.height), (3, 2));
        assert_eq!(overlay.image.rgb.len(), 3 * 2 * 3);
        assert_eq!(&overlay.image.rgb[..3], &[10, 20, 30]);
        assert_eq!(overlay.image.alpha.as_deref(), Some(&[128u8; 6][..]));
        assert_eq!(overlay.opacity, 0.1);
    }

    #[test]
    fn test_page_operations_draw_image_once() {
        let image = OverlayImage {
            width: 300,
            height: 300,
            rgb: vec![0; 300 * 300 * 3],
            alpha: None,
        };
        let overlay = Overlay::new(image, 0.1);

        let ops = overlay.page_operations(&PageGeometry::letter());
        let operators: Vec<&str> = ops.iter().map(|op| op.operator.as_str()).collect();
        assert_eq!(operators, vec!["q", "gs", "cm", "Do", "Q"]);
    }
}
