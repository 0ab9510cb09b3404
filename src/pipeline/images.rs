//! Image export: decoded [`Pixmap`]s → PNG files next to `_index.md`.
//!
//! Gray and RGB samples are encoded as they are. CMYK is converted to RGB
//! first since PNG has no subtractive colour model. Any other colorspace is
//! reported as [`ImageError::UnsupportedColorspace`].
//!
//! Every failure is per image: it is logged, counted, and the remaining
//! images of the page are still exported.

use crate::decoder::PageImage;
use crate::error::ImageError;
use crate::model::{Colorspace, Pixmap};
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Export settings taken from [`crate::config::CrawlConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageOptions {
    /// Minimum `width * height`; smaller images are skipped.
    pub min_pixels: Option<u64>,
    /// Write a description block before each image link.
    pub debug: bool,
}

/// Per-page export counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageSummary {
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl std::ops::AddAssign for ImageSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.saved += rhs.saved;
        self.skipped += rhs.skipped;
        self.failed += rhs.failed;
    }
}

/// `<slug>-p<page:03>-<xref>.png`, with a 1-indexed page.
pub fn image_name(slug: &str, page: usize, xref: u32) -> String {
    format!("{}-p{:03}-{}.png", slug, page, xref)
}

/// Convert a pixmap to an encodable image.
pub fn to_dynamic(xref: u32, pixmap: &Pixmap) -> Result<DynamicImage, ImageError> {
    let bad_samples = || ImageError::BadSamples {
        xref,
        width: pixmap.width,
        height: pixmap.height,
        colorspace: pixmap.colorspace.to_string(),
        len: pixmap.samples.len(),
    };

    match &pixmap.colorspace {
        Colorspace::Gray => GrayImage::from_raw(pixmap.width, pixmap.height, pixmap.samples.clone())
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(bad_samples),
        Colorspace::Rgb => RgbImage::from_raw(pixmap.width, pixmap.height, pixmap.samples.clone())
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(bad_samples),
        Colorspace::Cmyk => {
            if pixmap.samples.len() as u64 != pixmap.area() * 4 {
                return Err(bad_samples());
            }
            RgbImage::from_raw(pixmap.width, pixmap.height, cmyk_to_rgb(&pixmap.samples))
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(bad_samples)
        }
        Colorspace::Other(name) => Err(ImageError::UnsupportedColorspace {
            xref,
            colorspace: name.clone(),
        }),
    }
}

/// Naive subtractive conversion, four CMYK bytes → three RGB bytes.
pub fn cmyk_to_rgb(samples: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(samples.len() / 4 * 3);
    for px in samples.chunks_exact(4) {
        let k = u16::from(px[3]);
        for &ink in &px[..3] {
            rgb.push(255 - (u16::from(ink) + k).min(255) as u8);
        }
    }
    rgb
}

/// Encode `pixmap` as PNG at `path`.
pub fn save_png(xref: u32, pixmap: &Pixmap, path: &Path) -> Result<(), ImageError> {
    let img = to_dynamic(xref, pixmap)?;
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|source| ImageError::Write {
            xref,
            path: path.to_path_buf(),
            source,
        })
}

/// Description block written before an image in debug mode.
pub fn debug_image_text(pixmap: &Pixmap) -> String {
    let stride = pixmap.colorspace.components().unwrap_or(1).max(1);
    let colours = count_colours(&pixmap.samples, stride);
    let monochrome = pixmap.colorspace == Colorspace::Gray
        && pixmap.samples.iter().all(|&v| v == 0 || v == 255);

    format!(
        "\n---\n\
color count = {}  \n\
width = {}; height = {}  \n\
colorspace = {}  \n\
monochrome = {}  \n\
unicolor = {}  \n\
size = {}  \n\n",
        colours,
        pixmap.width,
        pixmap.height,
        pixmap.colorspace,
        monochrome,
        colours <= 1,
        pixmap.samples.len(),
    )
}

/// Distinct pixel values in `samples`, `stride` bytes per pixel.
///
/// Up to three components a presence bitset over the whole value space is
/// enough (2 MiB at most); wider pixels are packed and deduplicated.
fn count_colours(samples: &[u8], stride: usize) -> usize {
    let pack = |px: &[u8]| px.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));

    if stride <= 3 {
        let mut seen = vec![0u64; (1usize << (8 * stride)).div_ceil(64)];
        let mut count = 0;
        for px in samples.chunks(stride) {
            let v = pack(px) as usize;
            let (word, bit) = (v / 64, 1u64 << (v % 64));
            if seen[word] & bit == 0 {
                seen[word] |= bit;
                count += 1;
            }
        }
        return count;
    }

    let mut packed: Vec<u64> = samples.chunks(stride).map(pack).collect();
    packed.sort_unstable();
    packed.dedup();
    packed.len()
}

/// Export one page's images into `folder` and write their links to `out`.
///
/// `page` is 1-indexed. Only errors writing to `out` propagate.
pub fn write_page_images<W: Write>(
    out: &mut W,
    folder: &Path,
    slug: &str,
    page: usize,
    images: Vec<PageImage>,
    options: ImageOptions,
) -> io::Result<ImageSummary> {
    let mut summary = ImageSummary::default();

    for PageImage { xref, pixmap } in images {
        let pixmap = match pixmap {
            Ok(p) => p,
            Err(e) => {
                warn!("Page {}: {}", page, e);
                summary.failed += 1;
                continue;
            }
        };

        if let Some(min) = options.min_pixels {
            if pixmap.area() < min {
                debug!(
                    "Page {}: image {} is {}x{}, below the size hint",
                    page, xref, pixmap.width, pixmap.height
                );
                summary.skipped += 1;
                continue;
            }
        }

        if options.debug {
            out.write_all(debug_image_text(&pixmap).as_bytes())?;
        }

        let name = image_name(slug, page, xref);
        match save_png(xref, &pixmap, &folder.join(&name)) {
            Ok(()) => {
                debug!("Page {}: saved {}", page, name);
                write!(out, "\n[![]({0})]({0})\n", name)?;
                summary.saved += 1;
            }
            Err(e) => {
                warn!("Page {}: {}", page, e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixmap(colorspace: Colorspace, w: u32, h: u32, samples: Vec<u8>) -> Pixmap {
        Pixmap {
            width: w,
            height: h,
            colorspace,
            samples,
        }
    }

    #[test]
    fn names_are_zero_padded() {
        assert_eq!(image_name("paper", 7, 42), "paper-p007-42.png");
        assert_eq!(image_name("paper", 1234, 0), "paper-p1234-0.png");
    }

    #[test]
    fn colour_count_per_colorspace() {
        assert_eq!(count_colours(&[], 1), 0);
        assert_eq!(count_colours(&[0, 255, 0, 7, 255], 1), 3);
        assert_eq!(count_colours(&[1, 2, 3, 1, 2, 3, 3, 2, 1], 3), 2);
        assert_eq!(count_colours(&[255, 255, 255, 0, 0, 0, 0, 0], 4), 2);
    }

    #[test]
    fn large_scan_counts_colours_without_a_set_per_pixel() {
        let (w, h) = (2480u32, 3508u32);
        let mut samples = vec![255u8; (w * h * 3) as usize];
        samples[..3].copy_from_slice(&[10, 20, 30]);
        let px = pixmap(Colorspace::Rgb, w, h, samples);

        let text = debug_image_text(&px);
        assert!(text.starts_with("\n---\ncolor count = 2  \n"), "got: {text}");
        assert!(text.contains("unicolor = false  \n"));
    }

    #[test]
    fn cmyk_conversion() {
        // white, cyan, black, cyan + half black
        let rgb = cmyk_to_rgb(&[0, 0, 0, 0, 255, 0, 0, 0, 0, 0, 0, 255, 200, 0, 0, 100]);
        assert_eq!(
            rgb,
            vec![255, 255, 255, 0, 255, 255, 0, 0, 0, 0, 155, 155]
        );
    }

    #[test]
    fn cmyk_pixmap_becomes_rgb_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let px = pixmap(Colorspace::Cmyk, 2, 1, vec![0, 255, 255, 0, 0, 0, 0, 255]);

        save_png(3, &px, &path).unwrap();

        let img = image::open(&path).unwrap();
        let rgb = img.as_rgb8().expect("stored as 8-bit RGB");
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(rgb.get_pixel(1, 0).0, [0, 0, 0]);
    }

    #[test]
    fn unsupported_colorspace_is_typed() {
        let px = pixmap(Colorspace::Other("Lab".into()), 1, 1, vec![0, 0, 0]);
        assert!(matches!(
            to_dynamic(9, &px),
            Err(ImageError::UnsupportedColorspace { xref: 9, .. })
        ));
    }

    #[test]
    fn short_samples_are_rejected() {
        let px = pixmap(Colorspace::Rgb, 4, 4, vec![0; 10]);
        assert!(matches!(to_dynamic(1, &px), Err(ImageError::BadSamples { len: 10, .. })));
    }

    #[test]
    fn debug_block_describes_image() {
        let px = pixmap(Colorspace::Gray, 2, 2, vec![0, 255, 255, 0]);
        let text = debug_image_text(&px);
        assert!(text.starts_with("\n---\ncolor count = 2  \n"), "got: {text}");
        assert!(text.contains("width = 2; height = 2  \n"));
        assert!(text.contains("colorspace = DeviceGray  \n"));
        assert!(text.contains("monochrome = true  \n"));
        assert!(text.contains("unicolor = false  \n"));
        assert!(text.ends_with("size = 4  \n\n"));
    }

    #[test]
    fn page_export_counts_and_links() {
        let dir = tempfile::tempdir().unwrap();
        let images = vec![
            PageImage {
                xref: 10,
                pixmap: Ok(pixmap(Colorspace::Rgb, 8, 8, vec![128; 8 * 8 * 3])),
            },
            PageImage {
                xref: 11,
                pixmap: Ok(pixmap(Colorspace::Gray, 2, 2, vec![0; 4])),
            },
            PageImage {
                xref: 12,
                pixmap: Err(ImageError::Decode {
                    xref: 12,
                    detail: "filter".into(),
                }),
            },
            PageImage {
                xref: 13,
                pixmap: Ok(pixmap(Colorspace::Other("Indexed".into()), 8, 8, vec![0; 64])),
            },
        ];
        let options = ImageOptions {
            min_pixels: Some(16),
            debug: false,
        };

        let mut out = Vec::new();
        let summary = write_page_images(&mut out, dir.path(), "doc", 2, images, options).unwrap();

        assert_eq!(
            summary,
            ImageSummary {
                saved: 1,
                skipped: 1,
                failed: 2
            }
        );
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\n[![](doc-p002-10.png)](doc-p002-10.png)\n"
        );
        assert!(dir.path().join("doc-p002-10.png").exists());
        assert!(!dir.path().join("doc-p002-11.png").exists());
    }

    #[test]
    fn debug_mode_writes_block_before_link() {
        let dir = tempfile::tempdir().unwrap();
        let images = vec![PageImage {
            xref: 1,
            pixmap: Ok(pixmap(Colorspace::Gray, 1, 1, vec![9])),
        }];
        let options = ImageOptions {
            min_pixels: None,
            debug: true,
        };

        let mut out = Vec::new();
        write_page_images(&mut out, dir.path(), "d", 1, images, options).unwrap();
        let text = String::from_utf8(out).unwrap();

        let block = text.find("color count").unwrap();
        let link = text.find("[![](d-p001-1.png)]").unwrap();
        assert!(block < link);
    }
}
