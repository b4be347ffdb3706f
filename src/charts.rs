#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]
use crate::employee::{Employee, STATUS_ACTIVE, STATUS_TERMINATED};
use chrono::Datelike;
use plotters::prelude::*;
use std::error::Error;
use tempfile::NamedTempFile;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

/// Soft categorical palette shared by all renders.
const PALETTE: [RGBColor; 6] = [
    RGBColor(102, 153, 204),
    RGBColor(230, 145, 110),
    RGBColor(135, 190, 140),
    RGBColor(200, 150, 195),
    RGBColor(215, 190, 105),
    RGBColor(150, 150, 150),
];

// The bitmap backend wants a path; a per-call temp file keeps concurrent
// requests from colliding, and dropping it cleans up.
fn png_temp_file() -> Result<NamedTempFile, Box<dyn Error>> {
    Ok(tempfile::Builder::new().suffix(".png").tempfile()?)
}

/// Renders an age histogram over the filtered subset
///
/// Buckets the derived age column into 20 bins across the observed span.
/// Rows without an age value are skipped.
///
/// # Arguments
/// * `rows` - The filtered subset to visualize
///
/// # Returns
/// * A Result containing the PNG image data as bytes or an error
///
/// # Errors
/// * Returns an error when no row carries an age value
///
/// # Examples
/// ```no_run
/// use hr_dashboard::charts::age_histogram;
/// use hr_dashboard::loader::load;
/// use std::path::Path;
///
/// let table = load(None, Path::new("dados_rh.xlsx")).unwrap();
/// match age_histogram(&table.rows) {
///     Ok(png_data) => println!("Histogram created: {} bytes", png_data.len()),
///     Err(e) => eprintln!("Failed to create histogram: {}", e),
/// }
/// ```
pub fn age_histogram(rows: &[Employee]) -> Result<Vec<u8>, Box<dyn Error>> {
    let ages: Vec<i32> = rows.iter().filter_map(|e| e.age).collect();
    if ages.is_empty() {
        return Err("no age data to plot".into());
    }

    let min_age = *ages.iter().min().unwrap();
    let max_age = *ages.iter().max().unwrap();
    let bins = 20usize;
    let span = (max_age - min_age + 1).max(1) as f64;
    let bin_width = span / bins as f64;

    let mut counts = vec![0usize; bins];
    for age in &ages {
        let mut idx = ((*age - min_age) as f64 / bin_width) as usize;
        if idx >= bins {
            idx = bins - 1;
        }
        counts[idx] += 1;
    }
    let max_count = *counts.iter().max().unwrap();

    let tmp = png_temp_file()?;
    {
        let root = BitMapBackend::new(tmp.path(), (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Age Distribution", ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(
                min_age as f64..min_age as f64 + span,
                0f64..max_count as f64 * 1.1 + 1.0,
            )?;

        chart
            .configure_mesh()
            .x_desc("Age (years)")
            .y_desc("Employees")
            .draw()?;

        chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x0 = min_age as f64 + i as f64 * bin_width;
            Rectangle::new(
                [(x0, 0.0), (x0 + bin_width * 0.9, count as f64)],
                PALETTE[0].filled(),
            )
        }))?;

        root.present()?;
    }

    let png_data = std::fs::read(tmp.path())?;
    Ok(png_data)
}

/// Renders a base-salary boxplot over the filtered subset
///
/// Draws the interquartile box, the median line and min/max whiskers,
/// computed with linear interpolation between order statistics.
///
/// # Arguments
/// * `rows` - The filtered subset to visualize
///
/// # Returns
/// * A Result containing the PNG image data as bytes or an error
pub fn salary_boxplot(rows: &[Employee]) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut salaries: Vec<f64> = rows.iter().map(|e| e.base_salary).collect();
    if salaries.is_empty() {
        return Err("no salary data to plot".into());
    }
    salaries.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let min = salaries[0];
    let max = *salaries.last().unwrap();
    let q1 = percentile(&salaries, 0.25);
    let median = percentile(&salaries, 0.50);
    let q3 = percentile(&salaries, 0.75);

    let tmp = png_temp_file()?;
    {
        let root = BitMapBackend::new(tmp.path(), (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Base Salary Distribution", ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..4f64, 0f64..max * 1.1 + 1.0)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .y_desc("Base Salary")
            .draw()?;

        let (left, center, right) = (1.4f64, 2.0f64, 2.6f64);

        // Whiskers first, then the box, then the median on top.
        chart.draw_series(vec![
            PathElement::new(vec![(center, min), (center, q1)], PALETTE[0].stroke_width(2)),
            PathElement::new(vec![(center, q3), (center, max)], PALETTE[0].stroke_width(2)),
            PathElement::new(vec![(left, min), (right, min)], PALETTE[0].stroke_width(2)),
            PathElement::new(vec![(left, max), (right, max)], PALETTE[0].stroke_width(2)),
        ])?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, q1), (right, q3)],
            PALETTE[0].mix(0.35).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, q1), (right, q3)],
            PALETTE[0].stroke_width(2),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(left, median), (right, median)],
            PALETTE[1].stroke_width(3),
        )))?;

        root.present()?;
    }

    let png_data = std::fs::read(tmp.path())?;
    Ok(png_data)
}

/// Renders a headcount-by-area bar chart over the filtered subset
///
/// Areas are ordered by descending count, one bar per area with the count
/// as the y value.
///
/// # Arguments
/// * `rows` - The filtered subset to visualize
///
/// # Returns
/// * A Result containing the PNG image data as bytes or an error
pub fn area_bar_chart(rows: &[Employee]) -> Result<Vec<u8>, Box<dyn Error>> {
    let counts = count_by(rows.iter().filter_map(|e| e.area.as_deref()));
    if counts.is_empty() {
        return Err("no area data to plot".into());
    }
    let labels: Vec<String> = counts.iter().map(|(name, _)| name.clone()).collect();
    let max_count = counts.iter().map(|&(_, n)| n).max().unwrap();

    let tmp = png_temp_file()?;
    {
        let root = BitMapBackend::new(tmp.path(), (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Employees by Area", ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(0f64..counts.len() as f64, 0f64..max_count as f64 * 1.1 + 1.0)?;

        let label_for = |x: &f64| labels.get(x.floor() as usize).cloned().unwrap_or_default();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(counts.len())
            .x_label_formatter(&label_for)
            .y_desc("Employees")
            .draw()?;

        chart.draw_series(counts.iter().enumerate().map(|(i, &(_, count))| {
            Rectangle::new(
                [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, count as f64)],
                PALETTE[i % PALETTE.len()].filled(),
            )
        }))?;

        root.present()?;
    }

    let png_data = std::fs::read(tmp.path())?;
    Ok(png_data)
}

/// Renders a status breakdown pie chart over the filtered subset
///
/// One slice per distinct status value, active first, with percentage
/// labels drawn by plotters' pie element.
///
/// # Arguments
/// * `rows` - The filtered subset to visualize
///
/// # Returns
/// * A Result containing the PNG image data as bytes or an error
pub fn status_pie(rows: &[Employee]) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut counts = count_by(rows.iter().filter_map(|e| e.status.as_deref()));
    if counts.is_empty() {
        return Err("no status data to plot".into());
    }
    // Stable slice order regardless of row order.
    counts.sort_by_key(|(name, _)| match name.as_str() {
        STATUS_ACTIVE => 0,
        STATUS_TERMINATED => 1,
        _ => 2,
    });

    let sizes: Vec<f64> = counts.iter().map(|&(_, n)| n as f64).collect();
    let labels: Vec<String> = counts.iter().map(|(name, _)| name.clone()).collect();
    let colors: Vec<RGBColor> = (0..counts.len())
        .map(|i| PALETTE[i % PALETTE.len()])
        .collect();

    let tmp = png_temp_file()?;
    {
        let root = BitMapBackend::new(tmp.path(), (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;
        root.titled("Status Breakdown", ("sans-serif", 30).into_font())?;

        let dims = root.dim_in_pixel();
        let center = (dims.0 as i32 / 2, dims.1 as i32 / 2);
        let radius = dims.1.min(dims.0) as f64 * 0.32;

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.label_style(("sans-serif", 20).into_font());
        pie.percentages(("sans-serif", 18).into_font());
        root.draw(&pie)?;

        root.present()?;
    }

    let png_data = std::fs::read(tmp.path())?;
    Ok(png_data)
}

/// Renders the headcount-evolution line over the filtered subset
///
/// Rows are sorted by hire date and grouped by hire year-month; the y value
/// is the running count within each month, resetting at month boundaries.
/// Rows without a hire date are skipped.
///
/// # Arguments
/// * `rows` - The filtered subset to visualize
///
/// # Returns
/// * A Result containing the PNG image data as bytes or an error
pub fn headcount_evolution(rows: &[Employee]) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut hired: Vec<&Employee> = rows.iter().filter(|e| e.hire_date.is_some()).collect();
    if hired.is_empty() {
        return Err("no hire-date data to plot".into());
    }
    hired.sort_by_key(|e| e.hire_date);

    let mut points: Vec<(f64, f64)> = Vec::with_capacity(hired.len());
    let mut months: Vec<String> = Vec::with_capacity(hired.len());
    let mut current_month = String::new();
    let mut within_month = 0usize;
    for (i, e) in hired.iter().enumerate() {
        let Some(d) = e.hire_date else { continue };
        let month = format!("{}-{:02}", d.year(), d.month());
        if month != current_month {
            current_month = month.clone();
            within_month = 0;
        }
        within_month += 1;
        points.push((i as f64, within_month as f64));
        months.push(month);
    }
    let max_y = points.iter().map(|&(_, y)| y).fold(1.0f64, f64::max);

    let tmp = png_temp_file()?;
    {
        let root = BitMapBackend::new(tmp.path(), (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Headcount by Hire Month", ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d(0f64..points.len() as f64, 0f64..max_y + 1.0)?;

        let label_for = |x: &f64| months.get(x.floor() as usize).cloned().unwrap_or_default();
        chart
            .configure_mesh()
            .x_label_formatter(&label_for)
            .x_desc("Hire Month")
            .y_desc("Headcount")
            .draw()?;

        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            PALETTE[0].stroke_width(2),
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, PALETTE[0].filled())),
        )?;

        root.present()?;
    }

    let png_data = std::fs::read(tmp.path())?;
    Ok(png_data)
}

// Counts per distinct value, descending; ties keep first-appearance order.
fn count_by<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(name, _)| name == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value.to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}
