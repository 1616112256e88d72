//! PNG output and file path generation

use image::imageops::FilterType;
use image::{ImageEncoder, RgbaImage};
use std::io;
use std::path::{Path, PathBuf};

use crate::export::to_image;
use crate::grid::Grid;

/// File name used when saving without an explicit output path.
pub const DEFAULT_FILENAME: &str = "sketch.png";

/// Largest integer upscale factor accepted when saving.
pub const MAX_SCALE: u8 = 16;

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

/// Render the grid to an image, upscaled by `scale`.
pub fn render_grid(grid: &Grid, scale: u8) -> RgbaImage {
    scale_image(to_image(grid), scale)
}

/// Encode the grid as PNG bytes.
pub fn encode_png(grid: &Grid, scale: u8) -> Result<Vec<u8>, OutputError> {
    let image = render_grid(grid, scale);
    let mut png_data = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png_data).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
    )?;
    Ok(png_data)
}

/// Save the grid to a PNG file.
///
/// # Arguments
///
/// * `grid` - The canvas to save
/// * `path` - The output file path; parent directories are created as needed
/// * `scale` - Integer upscale factor (1 keeps one pixel per cell)
pub fn save_png(grid: &Grid, path: &Path, scale: u8) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let bytes = encode_png(grid, scale)?;
    std::fs::write(path, bytes)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This preserves crisp pixel edges for pixel art. Factors above
/// [`MAX_SCALE`] are clamped.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    let factor = factor.min(MAX_SCALE);
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    let new_w = w * factor as u32;
    let new_h = h * factor as u32;
    image::imageops::resize(&image, new_w, new_h, FilterType::Nearest)
}

/// Where to save.
///
/// | `-o` argument | Output |
/// |---------------|--------|
/// | none | `{default_name}` |
/// | `out.png` | `out.png` |
/// | `dir/` or an existing directory | `dir/{default_name}` |
pub fn output_path(output_arg: Option<&Path>, default_name: &str) -> PathBuf {
    match output_arg {
        Some(output) => {
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();
            if is_dir {
                output.join(default_name)
            } else {
                output.to_path_buf()
            }
        }
        None => PathBuf::from(default_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridLimits;
    use image::Rgba;

    fn checker(n: u32) -> Grid {
        let mut grid = Grid::new(n, GridLimits::default()).unwrap();
        for i in 0..grid.len() {
            let (row, col) = grid.row_col(i);
            if (row + col) % 2 == 0 {
                grid.paint(i, Rgba([255, 255, 255, 255])).unwrap();
            }
        }
        grid
    }

    #[test]
    fn test_output_path_default() {
        assert_eq!(output_path(None, DEFAULT_FILENAME), PathBuf::from("sketch.png"));
    }

    #[test]
    fn test_output_path_explicit_file() {
        let path = output_path(Some(Path::new("art/cat.png")), DEFAULT_FILENAME);
        assert_eq!(path, PathBuf::from("art/cat.png"));
    }

    #[test]
    fn test_output_path_directory() {
        let path = output_path(Some(Path::new("out/")), DEFAULT_FILENAME);
        assert_eq!(path, PathBuf::from("out/sketch.png"));

        let dir = tempfile::tempdir().unwrap();
        let path = output_path(Some(dir.path()), DEFAULT_FILENAME);
        assert_eq!(path, dir.path().join("sketch.png"));
    }

    #[test]
    fn test_scale_image_nearest() {
        let image = render_grid(&checker(2), 3);
        assert_eq!(image.dimensions(), (6, 6));
        assert_eq!(*image.get_pixel(2, 2), Rgba([255, 255, 255, 255]));
        assert_eq!(*image.get_pixel(3, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*image.get_pixel(5, 5), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_scale_one_is_identity() {
        let image = render_grid(&checker(5), 1);
        assert_eq!(image.dimensions(), (5, 5));
    }

    #[test]
    fn test_scale_is_clamped() {
        let image = render_grid(&checker(1), 200);
        assert_eq!(image.dimensions(), (16, 16));
    }

    #[test]
    fn test_encode_png_magic_and_roundtrip() {
        let grid = checker(4);
        let bytes = encode_png(&grid, 1).unwrap();
        assert_eq!(&bytes[0..4], &[0x89, 0x50, 0x4E, 0x47]);

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert_eq!(decoded.as_raw(), &crate::export::export_raster(&grid));
    }

    #[test]
    fn test_save_png_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/sketch.png");
        save_png(&checker(3), &path, 2).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (6, 6));
    }
}
