//! ASCII plotting for terminal output.
//!
//! Fixed-size grids with deterministic output, so the golden tests below stay
//! stable. The x axis of a series plot is the date universe by position; each
//! brand gets its own glyph. Where lines cross, the brand listed first wins.

use std::collections::HashMap;

use crate::derive::{BrandSeries, HeatmapGrid, MONTH_LABELS, ShareSeries};

const GLYPHS: [char; 8] = ['*', '+', 'o', 'x', '#', '@', '%', '&'];
const SHADES: [char; 9] = ['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Render per-brand lines against the shared date axis.
pub fn render_series_plot(title: &str, dates: &[String], series: &[BrandSeries], width: usize, height: usize) -> String {
    let lines: Vec<(&str, Vec<(usize, f64)>)> = {
        let slot: HashMap<&str, usize> = dates.iter().enumerate().map(|(i, d)| (d.as_str(), i)).collect();
        series
            .iter()
            .map(|s| {
                let pts = s
                    .points
                    .iter()
                    .filter_map(|p| slot.get(p.date.as_str()).map(|&i| (i, p.value)))
                    .collect();
                (s.brand.as_str(), pts)
            })
            .collect()
    };
    render_lines(title, dates, &lines, width, height)
}

/// Render share-of-search lines; shares are already aligned with `share.dates`.
pub fn render_share_plot(share: &ShareSeries, width: usize, height: usize) -> String {
    let lines: Vec<(&str, Vec<(usize, f64)>)> = share
        .brands
        .iter()
        .map(|b| (b.brand.as_str(), b.shares.iter().copied().enumerate().collect()))
        .collect();
    render_lines("Share of search (%)", &share.dates, &lines, width, height)
}

/// Shade each year × month cell by its mean; blank means no value.
pub fn render_heatmap(grid: &HeatmapGrid) -> String {
    let mut out = String::new();
    let range = grid.value_range();
    match range {
        Some((lo, hi)) => out.push_str(&format!(
            "Heatmap: years={} | mean rsv=[{lo:.2}, {hi:.2}]\n",
            grid.years.len()
        )),
        None => out.push_str(&format!("Heatmap: years={} | no values\n", grid.years.len())),
    }

    out.push_str("     ");
    for label in MONTH_LABELS {
        out.push_str(&format!("{label:>3}"));
    }
    out.push('\n');

    for (year, cells) in grid.years.iter().zip(&grid.cells) {
        out.push_str(&format!("{year:<5}"));
        for cell in cells {
            let shade = match (cell, range) {
                (Some(v), Some((lo, hi))) => {
                    let c = shade_for(*v, lo, hi);
                    format!("{c}{c}")
                }
                _ => String::new(),
            };
            out.push_str(&format!("{shade:>3}"));
        }
        out.push('\n');
    }

    out
}

fn shade_for(v: f64, lo: f64, hi: f64) -> char {
    let u = if hi > lo { ((v - lo) / (hi - lo)).clamp(0.0, 1.0) } else { 1.0 };
    SHADES[(u * (SHADES.len() - 1) as f64).round() as usize]
}

fn render_lines(
    title: &str,
    dates: &[String],
    lines: &[(&str, Vec<(usize, f64)>)],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let x_max = dates.len().saturating_sub(1).max(1) as f64;
    let (y_min, y_max) = y_range(lines).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for (i, (_, pts)) in lines.iter().enumerate() {
        let glyph = GLYPHS[i % GLYPHS.len()];
        let mut prev = None;
        for &(x, y) in pts {
            let cx = map_x(x as f64, x_max, width);
            let cy = map_y(y, y_min, y_max, height);
            let (x0, y0) = prev.unwrap_or((cx, cy));
            draw_line(&mut grid, x0, y0, cx, cy, glyph);
            prev = Some((cx, cy));
        }
    }

    let mut out = String::new();
    let span = match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => format!("[{first} .. {last}]"),
        _ => "[]".to_string(),
    };
    out.push_str(&format!("Plot: {title} | dates={span} | y=[{y_min:.2}, {y_max:.2}]\n"));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    let legend: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(i, (brand, _))| format!("{} {brand}", GLYPHS[i % GLYPHS.len()]))
        .collect();
    if !legend.is_empty() {
        out.push_str(&format!("Legend: {}\n", legend.join("  ")));
    }

    out
}

fn y_range(lines: &[(&str, Vec<(usize, f64)>)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for (_, pts) in lines {
        for &(_, y) in pts {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    (min_y.is_finite() && max_y.is_finite()).then_some((min_y, max_y))
}

/// Widen `[min, max]` by `frac` of its span; a flat range is widened around its value.
fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span > 0.0 {
        span * frac
    } else {
        (min.abs() * frac).max(1.0)
    };
    (min - pad, max + pad)
}

fn map_x(x: f64, x_max: f64, width: usize) -> usize {
    let u = (x / x_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // row 0 is the top
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham); never overwrites a drawn cell.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if let Some(cell) = grid.get_mut(y0 as usize).and_then(|row| row.get_mut(x0 as usize)) {
            if *cell == ' ' {
                *cell = ch;
            }
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::SeriesPoint;
    use crate::domain::{EmptyCell, Metric};

    fn series(brand: &str, values: &[(&str, f64)]) -> BrandSeries {
        BrandSeries {
            brand: brand.to_string(),
            metric: Metric::SearchVolume,
            points: values
                .iter()
                .map(|&(d, v)| SeriesPoint {
                    date: d.to_string(),
                    value: v,
                })
                .collect(),
        }
    }

    #[test]
    fn series_plot_golden_snapshot_small() {
        let dates = vec!["d1".to_string(), "d2".to_string()];
        let lines = vec![
            series("A", &[("d1", 0.0), ("d2", 10.0)]),
            series("B", &[("d1", 10.0), ("d2", 0.0)]),
        ];

        let txt = render_series_plot("Trend", &dates, &lines, 10, 5);
        let expected = concat!(
            "Plot: Trend | dates=[d1 .. d2] | y=[-0.50, 10.50]\n",
            "++      **\n",
            "  ++  **  \n",
            "    **    \n",
            "  **  ++  \n",
            "**      ++\n",
            "Legend: * A  + B\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn points_with_unknown_dates_are_ignored() {
        let dates = vec!["d1".to_string(), "d2".to_string()];
        let lines = vec![series("A", &[("d1", 1.0), ("zz", 99.0), ("d2", 2.0)])];
        let txt = render_series_plot("Trend", &dates, &lines, 10, 5);
        assert!(txt.starts_with("Plot: Trend | dates=[d1 .. d2] | y=[0.95, 2.05]\n"));
    }

    #[test]
    fn flat_series_is_centered_inside_its_range() {
        let dates = vec!["d1".to_string(), "d2".to_string()];
        let lines = vec![series("A", &[("d1", 50.0), ("d2", 50.0)])];

        let txt = render_series_plot("Trend", &dates, &lines, 10, 5);
        let expected = concat!(
            "Plot: Trend | dates=[d1 .. d2] | y=[47.50, 52.50]\n",
            "          \n",
            "          \n",
            "**********\n",
            "          \n",
            "          \n",
            "Legend: * A\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn all_zero_series_gets_a_unit_range() {
        let dates = vec!["d1".to_string()];
        let lines = vec![series("A", &[("d1", 0.0)])];
        let txt = render_series_plot("CPC", &dates, &lines, 10, 5);
        assert!(txt.starts_with("Plot: CPC | dates=[d1 .. d1] | y=[-1.00, 1.00]\n"));
    }

    #[test]
    fn heatmap_golden_snapshot() {
        let mut cells = [None; 12];
        cells[0] = Some(10.0);
        cells[1] = Some(20.0);
        let mut counts = [0; 12];
        counts[0] = 1;
        counts[1] = 1;
        let grid = HeatmapGrid {
            years: vec![2023],
            cells: vec![cells],
            counts: vec![counts],
            empty: EmptyCell::Null,
            skipped: 0,
        };

        let txt = render_heatmap(&grid);
        let expected = format!(
            "Heatmap: years=1 | mean rsv=[10.00, 20.00]\n      01 02 03 04 05 06 07 08 09 10 11 12\n2023  .. @@{}\n",
            " ".repeat(30)
        );
        assert_eq!(txt, expected);
    }
}
