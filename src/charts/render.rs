//! Chart rendering
//!
//! Draws the consistency and weight charts with plotters into an RGB buffer
//! and encodes it as PNG.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::prelude::*;
use thiserror::Error;

use super::geometry::{
    area_polygon, indexed_points, smooth_path, weight_y_range, x_extent, CURVE_STEPS,
};
use crate::calendar::day_key_of;
use crate::models::WeightEntry;

pub const DEFAULT_WIDTH: u32 = 900;
pub const DEFAULT_HEIGHT: u32 = 400;

const COLOR_AREA: RGBColor = RGBColor(57, 239, 123);
const COLOR_LINE: RGBColor = RGBColor(112, 48, 160);
const COLOR_GRID: RGBColor = RGBColor(220, 220, 220);

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("No data to chart")]
    NoData,

    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),
}

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

fn encode_png(width: u32, height: u32, buffer: Vec<u8>) -> Result<Vec<u8>, ChartError> {
    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ChartError::Render("Failed to create image from buffer".to_string()))?;

    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(render_err)?;
    Ok(png_bytes)
}

/// Month consistency as a smoothed filled area on a 0..1 scale.
///
/// `ratios` is `None` when there are no habits; the axes are still drawn.
pub fn render_consistency_chart(
    title: &str,
    days: usize,
    ratios: Option<&[f64]>,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, ChartError> {
    if days == 0 {
        return Err(ChartError::NoData);
    }

    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..x_extent(days), 0f64..1f64)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .light_line_style(COLOR_GRID)
            .x_labels(days.min(16))
            .x_label_formatter(&|x| format!("{}", x.round() as i64 + 1))
            .y_label_formatter(&|y| format!("{:.0}%", y * 100.0))
            .y_desc("Habits done")
            .draw()
            .map_err(render_err)?;

        if let Some(ratios) = ratios {
            let path = smooth_path(&indexed_points(ratios), CURVE_STEPS);

            chart
                .draw_series(std::iter::once(Polygon::new(
                    area_polygon(&path, 0.0),
                    COLOR_AREA.mix(0.25),
                )))
                .map_err(render_err)?;

            chart
                .draw_series(LineSeries::new(path, COLOR_AREA.stroke_width(2)))
                .map_err(render_err)?;
        }

        root.present().map_err(render_err)?;
    }

    encode_png(width, height, buffer)
}

/// Weight over time: straight segments with a marker per entry.
/// Entries must be in chronological order.
pub fn render_weight_chart(
    entries: &[WeightEntry],
    width: u32,
    height: u32,
) -> Result<Vec<u8>, ChartError> {
    let weights: Vec<f64> = entries.iter().map(|e| e.weight).collect();
    let (y_min, y_max) = weight_y_range(&weights).ok_or(ChartError::NoData)?;

    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Weight", ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..x_extent(entries.len()), y_min..y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .light_line_style(COLOR_GRID)
            .x_labels(entries.len().clamp(2, 10))
            .x_label_formatter(&|x| {
                let i = x.round();
                if i < 0.0 || (i - x).abs() > 1e-6 {
                    return String::new();
                }
                entries
                    .get(i as usize)
                    .and_then(|e| day_key_of(&e.date))
                    .map(|key| key.split('-').skip(1).collect::<Vec<_>>().join("/"))
                    .unwrap_or_default()
            })
            .y_desc("kg")
            .draw()
            .map_err(render_err)?;

        let points = indexed_points(&weights);

        chart
            .draw_series(LineSeries::new(points.clone(), COLOR_LINE.stroke_width(2)))
            .map_err(render_err)?;

        chart
            .draw_series(points.iter().map(|(x, y)| Circle::new((*x, *y), 4, COLOR_LINE.filled())))
            .map_err(render_err)?;

        chart
            .draw_series(points.iter().map(|(x, y)| {
                Text::new(
                    format!("{}kg", y),
                    (*x, *y + (y_max - y_min) * 0.04),
                    ("sans-serif", 12).into_font().color(&BLACK),
                )
            }))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    encode_png(width, height, buffer)
}

/// Write PNG bytes under `dir`, creating it if needed
pub fn save_png(dir: &Path, file_name: &str, png: &[u8]) -> Result<PathBuf, ChartError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, png)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_weight_series_is_an_error() {
        let err = render_weight_chart(&[], DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap_err();
        assert!(matches!(err, ChartError::NoData));
        assert_eq!(err.to_string(), "No data to chart");
    }

    #[test]
    fn test_zero_day_consistency_is_an_error() {
        let err = render_consistency_chart("Empty", 0, None, DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap_err();
        assert!(matches!(err, ChartError::NoData));
    }

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn weight(id: i64, day: u32, kg: f64) -> WeightEntry {
        WeightEntry {
            id,
            user_id: 1,
            date: format!("2025-03-{:02}T08:00:00.000+00:00", day),
            weight: kg,
        }
    }

    #[test]
    fn test_consistency_chart_renders_with_and_without_habits() {
        let ratios: Vec<f64> = (0..31).map(|d| (d % 5) as f64 / 4.0).collect();
        let png = render_consistency_chart("March 2025", 31, Some(&ratios), DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap();
        assert!(png.starts_with(&PNG_SIGNATURE));

        let axes_only = render_consistency_chart("March 2025", 31, None, DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap();
        assert!(axes_only.starts_with(&PNG_SIGNATURE));
    }

    #[test]
    fn test_weight_chart_renders_single_and_multiple_entries() {
        let single = render_weight_chart(&[weight(1, 1, 80.0)], DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap();
        assert!(single.starts_with(&PNG_SIGNATURE));

        let entries = [weight(1, 1, 80.0), weight(2, 8, 79.4), weight(3, 15, 79.9)];
        let png = render_weight_chart(&entries, DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap();
        assert!(png.starts_with(&PNG_SIGNATURE));
    }

    #[test]
    fn test_encode_png_rejects_short_buffer() {
        assert!(encode_png(4, 4, vec![0u8; 10]).is_err());
        let png = encode_png(2, 2, vec![255u8; 12]).unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_save_png_creates_directory() {
        let dir = std::env::temp_dir().join(format!("lifelog-chart-test-{}", std::process::id()));
        let path = save_png(&dir.join("nested"), "chart.png", b"png").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"png");
        fs::remove_dir_all(&dir).unwrap();
    }
}
