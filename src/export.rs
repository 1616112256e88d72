//! Raster export: grid cells to interleaved RGBA bytes.

use image::RgbaImage;

use crate::grid::Grid;

/// Bytes per exported pixel (R, G, B, A).
pub const BYTES_PER_PIXEL: usize = 4;

/// Flatten the grid into an RGBA8 buffer of `4 * resolution²` bytes.
///
/// Cells are written in row-major order, top-left first, which is the layout
/// image encoders expect for a `resolution` x `resolution` image. Unset cells
/// become `[0, 0, 0, 0]`.
pub fn export_raster(grid: &Grid) -> Vec<u8> {
    let mut data = vec![0u8; grid.len() * BYTES_PER_PIXEL];
    for (pixel, state) in data.chunks_exact_mut(BYTES_PER_PIXEL).zip(grid.cells()) {
        pixel.copy_from_slice(&state.color().0);
    }
    data
}

/// Export the grid as an `RgbaImage` of `resolution` x `resolution` pixels.
pub fn to_image(grid: &Grid) -> RgbaImage {
    let n = grid.resolution();
    RgbaImage::from_raw(n, n, export_raster(grid))
        .unwrap_or_else(|| RgbaImage::new(n, n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridLimits, DEFAULT_MAX_RESOLUTION};
    use image::Rgba;

    #[test]
    fn test_fresh_grid_exports_zeroes() {
        for n in [1, 2, 22, DEFAULT_MAX_RESOLUTION] {
            let grid = Grid::new(n, GridLimits::default()).unwrap();
            let data = export_raster(&grid);
            assert_eq!(data.len(), 4 * (n * n) as usize);
            assert!(data.iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_pixels_land_at_row_major_offsets() {
        let mut grid = Grid::new(3, GridLimits::default()).unwrap();
        // row 1, col 2
        let i = grid.index_of(1, 2).unwrap();
        grid.paint(i, Rgba([10, 20, 30, 40])).unwrap();
        grid.paint(0, Rgba([255, 0, 0, 255])).unwrap();

        let data = export_raster(&grid);
        assert_eq!(&data[0..4], &[255, 0, 0, 255]);
        assert_eq!(&data[4 * 5..4 * 5 + 4], &[10, 20, 30, 40]);
        assert_eq!(data.iter().filter(|&&b| b != 0).count(), 6);
    }

    #[test]
    fn test_erased_cell_exports_transparent() {
        let mut grid = Grid::new(2, GridLimits::default()).unwrap();
        grid.paint(3, Rgba([1, 2, 3, 4])).unwrap();
        grid.erase(3).unwrap();
        assert_eq!(export_raster(&grid), vec![0; 16]);
    }

    #[test]
    fn test_to_image_matches_raster() {
        let mut grid = Grid::new(4, GridLimits::default()).unwrap();
        grid.paint(grid.index_of(2, 1).unwrap(), Rgba([9, 8, 7, 255])).unwrap();

        let image = to_image(&grid);
        assert_eq!(image.dimensions(), (4, 4));
        // image coordinates are (x = col, y = row)
        assert_eq!(*image.get_pixel(1, 2), Rgba([9, 8, 7, 255]));
        assert_eq!(*image.get_pixel(2, 1), Rgba([0, 0, 0, 0]));
        assert_eq!(image.as_raw(), &export_raster(&grid));
    }
}
