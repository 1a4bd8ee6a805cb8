//! Rendering a chart specification with Plotters

use crate::chart::{Annotation, ChartSpec, Orientation};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, FontTransform};
use std::path::Path;
use tracing::info;

/// Raster export size, multiplied by the export scale
pub const EXPORT_WIDTH: u32 = 1200;
pub const EXPORT_HEIGHT: u32 = 800;

/// Used for risk codes that have no color of their own
const FALLBACK_COLOR: RGBColor = RGBColor(127, 127, 127);
const MARKER_OPACITY: f64 = 0.8;
const FONT: &str = "sans-serif";

/// Resolve a CSS color name or `#RRGGBB` string
pub fn named_color(name: &str) -> Option<RGBColor> {
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(RGBColor(channel(0)?, channel(2)?, channel(4)?));
    }

    let rgb = match name {
        "white" => RGBColor(255, 255, 255),
        "black" => RGBColor(0, 0, 0),
        "gray" => RGBColor(128, 128, 128),
        "darkgray" => RGBColor(169, 169, 169),
        "lightgray" => RGBColor(211, 211, 211),
        "lightblue" => RGBColor(173, 216, 230),
        "lightyellow" => RGBColor(255, 255, 224),
        "lightgreen" => RGBColor(144, 238, 144),
        "darkblue" => RGBColor(0, 0, 139),
        "darkgreen" => RGBColor(0, 100, 0),
        _ => return None,
    };
    Some(rgb)
}

fn resolve(name: &str) -> RGBColor {
    named_color(name).unwrap_or(FALLBACK_COLOR)
}

fn text_style(size: u32, bold: bool, color: RGBColor, pos: Pos) -> TextStyle<'static> {
    let style = if bold {
        FontStyle::Bold
    } else {
        FontStyle::Normal
    };
    (FONT, f64::from(size))
        .into_font()
        .style(style)
        .color(&color)
        .pos(pos)
}

fn centered() -> Pos {
    Pos::new(HPos::Center, VPos::Center)
}

/// Tick positions covering `range` at `spacing`
fn ticks(range: [f64; 2], spacing: f64) -> Vec<f64> {
    if spacing <= 0.0 {
        return Vec::new();
    }
    let first = (range[0] / spacing).ceil() as i64;
    let last = (range[1] / spacing).floor() as i64;
    (first..=last).map(|i| i as f64 * spacing).collect()
}

/// Draw the chart onto `root`; `scale` multiplies every pixel measure.
fn draw_chart<DB>(root: &DrawingArea<DB, Shift>, spec: &ChartSpec, scale: u32) -> crate::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let s = scale.max(1) as i32;
    let px = |v: u32| v * scale.max(1);

    root.fill(&WHITE)?;

    let area = root.margin(80 * s, 120 * s, 120 * s, 120 * s);
    let (x_px, y_px) = area.get_pixel_range();
    let [x0, x1] = spec.x_axis.range;
    let [y0, y1] = spec.y_axis.range;
    let plot = area.apply_coord_spec(Cartesian2d::<RangedCoordf64, RangedCoordf64>::new(
        x0..x1,
        y0..y1,
        (x_px.clone(), y_px.clone()),
    ));

    for region in &spec.regions {
        let fill = resolve(region.fill_color).mix(region.opacity);
        plot.draw(&Rectangle::new(
            [(region.x0, region.y0), (region.x1, region.y1)],
            fill.filled(),
        ))?;
    }

    // Grid and tick labels
    let grid = resolve("lightgray").stroke_width(px(1));
    let tick_style = |pos| text_style(px(11), false, BLACK, pos);
    for x in ticks(spec.x_axis.range, spec.x_axis.tick_spacing) {
        plot.draw(&PathElement::new(vec![(x, y0), (x, y1)], grid))?;
        plot.draw(
            &(EmptyElement::at((x, y0))
                + Text::new(format!("{x}"), (0, 8 * s), tick_style(Pos::new(HPos::Center, VPos::Top)))),
        )?;
    }
    for y in ticks(spec.y_axis.range, spec.y_axis.tick_spacing) {
        plot.draw(&PathElement::new(vec![(x0, y), (x1, y)], grid))?;
        plot.draw(
            &(EmptyElement::at((x0, y))
                + Text::new(format!("{y}"), (-8 * s, 0), tick_style(Pos::new(HPos::Right, VPos::Center)))),
        )?;
    }

    for line in &spec.dividers {
        let stroke = resolve(line.color)
            .mix(line.opacity)
            .stroke_width(px(line.width.round() as u32));
        let points = match line.orientation {
            Orientation::Vertical => vec![(line.position, y0), (line.position, y1)],
            Orientation::Horizontal => vec![(x0, line.position), (x1, line.position)],
        };
        plot.draw(&PathElement::new(points, stroke))?;
    }

    // Axis lines
    let axis = BLACK.stroke_width(px(3));
    plot.draw(&PathElement::new(vec![(x0, y0), (x1, y0)], axis))?;
    plot.draw(&PathElement::new(vec![(x0, y0), (x0, y1)], axis))?;

    for point in &spec.points {
        let color = point.color.and_then(named_color).unwrap_or(FALLBACK_COLOR);
        let radius = (point.size / 2.0 * f64::from(s)).round() as i32;
        plot.draw(&Circle::new(
            (point.x, point.y),
            radius,
            color.mix(MARKER_OPACITY).filled(),
        ))?;
        plot.draw(&Circle::new((point.x, point.y), radius, WHITE.stroke_width(px(1))))?;
    }

    for label in spec.quadrant_labels.iter().chain(&spec.corner_labels) {
        draw_annotation(&plot, label, scale)?;
    }

    // Titles live in the margins, in pixel coordinates
    let x_mid = (x_px.start + x_px.end) / 2;
    let y_mid = (y_px.start + y_px.end) / 2;
    let axis_title = text_style(px(12), true, resolve("darkgray"), centered());
    let axis_subtitle = text_style(px(12), false, resolve("darkgray"), centered());

    root.draw(&Text::new(spec.x_axis.title, (x_mid, y_px.end + 50 * s), axis_title.clone()))?;
    root.draw(&Text::new(spec.x_axis.subtitle, (x_mid, y_px.end + 68 * s), axis_subtitle.clone()))?;
    root.draw(&Text::new(
        spec.y_axis.title,
        (x_px.start - 80 * s, y_mid),
        axis_title.transform(FontTransform::Rotate270),
    ))?;
    root.draw(&Text::new(
        spec.y_axis.subtitle,
        (x_px.start - 62 * s, y_mid),
        axis_subtitle.transform(FontTransform::Rotate270),
    ))?;

    let (width, _) = root.dim_in_pixel();
    root.draw(&Text::new(
        spec.title,
        (width as i32 / 2, 35 * s),
        text_style(px(20), true, resolve("darkblue"), centered()),
    ))?;

    // Legend
    let legend_x = x_px.end + 20 * s;
    let mut legend_y = y_px.start;
    root.draw(&Text::new(
        spec.legend.title,
        (legend_x, legend_y),
        text_style(px(12), true, BLACK, Pos::new(HPos::Left, VPos::Center)),
    ))?;
    for entry in &spec.legend.entries {
        legend_y += 22 * s;
        let color = entry.color.and_then(named_color).unwrap_or(FALLBACK_COLOR);
        root.draw(&Circle::new((legend_x + 6 * s, legend_y), 6 * s, color.filled()))?;
        root.draw(&Text::new(
            entry.label.clone(),
            (legend_x + 18 * s, legend_y),
            text_style(px(11), false, BLACK, Pos::new(HPos::Left, VPos::Center)),
        ))?;
    }

    Ok(())
}

fn draw_annotation<DB>(
    plot: &DrawingArea<DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    annotation: &Annotation,
    scale: u32,
) -> crate::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let style = text_style(
        annotation.font_size * scale.max(1),
        annotation.bold,
        resolve(annotation.color),
        centered(),
    );
    plot.draw(&Text::new(
        annotation.text.clone(),
        (annotation.x, annotation.y),
        style,
    ))?;
    Ok(())
}

/// Render to an in-memory SVG document at the chart's own size
pub fn render_svg(spec: &ChartSpec) -> crate::Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (spec.width, spec.height)).into_drawing_area();
        draw_chart(&root, spec, 1)?;
        root.present()?;
    }
    Ok(svg)
}

/// Render to disk; `.svg` paths produce SVG, anything else a PNG at the
/// export size times `scale`.
pub fn render_to_file(spec: &ChartSpec, output_path: &Path, scale: u32) -> crate::Result<()> {
    let is_svg = output_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    if is_svg {
        let root = SVGBackend::new(output_path, (spec.width, spec.height)).into_drawing_area();
        draw_chart(&root, spec, 1)?;
        root.present()?;
    } else {
        let size = (EXPORT_WIDTH * scale, EXPORT_HEIGHT * scale);
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        draw_chart(&root, spec, scale)?;
        root.present()?;
    }

    info!(path = %output_path.display(), "chart rendered");
    Ok(())
}
