//! ASCII forecast-overlay charts for terminal output.
//!
//! Fixed-size character grid, deterministic output (golden tests rely on it).
//!
//! Plot elements:
//! - actual series: `-` line with `o` at each observed year
//! - forecasts: the window label's first character at each forecast year
//!
//! Forecast markers are drawn last so they stay visible where they overlap the
//! actual series.

use crate::domain::Forecast;

/// Render one variable's actual history with forecasts overlaid.
///
/// `actual` is `(year, value)` in ascending year order. Non-finite values are
/// skipped.
pub fn render_forecast_chart(
    variable: &str,
    actual: &[(i32, f64)],
    forecasts: &[&Forecast],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let points: Vec<(f64, f64)> = actual
        .iter()
        .filter(|(_, v)| v.is_finite())
        .map(|&(year, v)| (year as f64, v))
        .collect();
    let markers: Vec<(f64, f64, char)> = forecasts
        .iter()
        .flat_map(|f| {
            let mark = f.window.chars().next().unwrap_or('*');
            f.years()
                .zip(f.values.iter().copied())
                .filter(|(_, v)| v.is_finite())
                .map(move |(year, v)| (year as f64, v, mark))
        })
        .collect();

    let all_x = points.iter().map(|p| p.0).chain(markers.iter().map(|m| m.0));
    let all_y = points.iter().map(|p| p.1).chain(markers.iter().map(|m| m.1));
    let (x_min, x_max) = span(all_x).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = span(all_y).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    let cells: Vec<(usize, usize)> = points
        .iter()
        .map(|&(x, y)| (map_x(x, x_min, x_max, width), map_y(y, y_min, y_max, height)))
        .collect();
    for pair in cells.windows(2) {
        draw_line(&mut grid, pair[0], pair[1], '-');
    }
    for &(col, row) in &cells {
        grid[row][col] = 'o';
    }
    for &(x, y, mark) in &markers {
        grid[map_y(y, y_min, y_max, height)][map_x(x, x_min, x_max, width)] = mark;
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Chart: {variable} | years=[{:.0}, {:.0}] | y=[{y_min:.2}, {y_max:.2}]",
        x_min, x_max
    ));
    if let Some(first) = forecasts.first() {
        let labels: Vec<&str> = forecasts.iter().map(|f| f.window.as_str()).collect();
        out.push_str(&format!(" | {} forecasts: {}", first.family, labels.join(", ")));
    }
    out.push('\n');

    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn span(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let pad = ((max - min).abs() * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top of the chart.
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Bresenham line between two cells; only fills blanks.
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char) {
    let (mut x0, mut y0) = (from.0 as isize, from.1 as isize);
    let (x1, y1) = (to.0 as isize, to.1 as isize);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if let Some(cell) = grid
            .get_mut(y0 as usize)
            .and_then(|row| row.get_mut(x0 as usize))
            .filter(|c| **c == ' ')
        {
            *cell = ch;
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
