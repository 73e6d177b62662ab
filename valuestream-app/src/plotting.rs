//! Diagram and chart rendering for a computed value stream.

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;
use valuestream_core::{
    export::{format_metric, format_seconds},
    layout::{Layout, LayoutEdge, LayoutNode},
    metrics::Metrics,
};
use valuestream_schemas::dataset::Dataset;

const NODE_FILL: RGBColor = RGBColor(224, 236, 248);
const NODE_STROKE: RGBColor = RGBColor(70, 130, 180);
const BOTTLENECK_FILL: RGBColor = RGBColor(253, 226, 226);
const BOTTLENECK_STROKE: RGBColor = RGBColor(200, 40, 40);
const WIP_FILL: RGBColor = RGBColor(255, 214, 102);

fn px(v: f64) -> i32 {
    v.round() as i32
}

/// Writes `vsm.svg` (and `vsm.png` when `png` is set) into `output_dir`.
pub fn render_vsm_diagram(
    output_dir: &Path,
    title: &str,
    dataset: &Dataset,
    layout: &Layout,
    metrics: &Metrics,
    png: bool,
) -> Result<()> {
    let size = (layout.canvas.width as u32, layout.canvas.height as u32);

    let svg_path = output_dir.join("vsm.svg");
    let root = SVGBackend::new(&svg_path, size).into_drawing_area();
    draw_vsm(&root, title, dataset, layout, metrics)?;
    root.present()?;

    if png {
        let png_path = output_dir.join("vsm.png");
        let root = BitMapBackend::new(&png_path, size).into_drawing_area();
        draw_vsm(&root, title, dataset, layout, metrics)?;
        root.present()?;
    }

    info!(dir = %output_dir.display(), nodes = layout.nodes.len(), "value stream diagram written");
    Ok(())
}

fn draw_vsm<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    dataset: &Dataset,
    layout: &Layout,
    metrics: &Metrics,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let title_style = TextStyle::from(("sans-serif", 22).into_font()).color(&BLACK);
    root.draw_text(
        &format!("{} | Takt: {}", title, format_seconds(layout.takt_time_sec)),
        &title_style,
        (20, 16),
    )?;

    if layout.nodes.is_empty() {
        let muted = BLACK.mix(0.6);
        let style = TextStyle::from(("sans-serif", 16).into_font()).color(&muted);
        root.draw_text("No process steps yet", &style, (20, px(layout.canvas.height / 2.0)))?;
        return Ok(());
    }

    for edge in &layout.edges {
        draw_edge(root, edge)?;
    }
    for node in &layout.nodes {
        let is_bottleneck = metrics
            .bottleneck
            .as_ref()
            .map_or(false, |b| b.index == node.process_index);
        draw_node(root, dataset, node, is_bottleneck)?;
    }

    let footer_style = TextStyle::from(("sans-serif", 14).into_font()).color(&BLACK);
    let footer = format!(
        "Lead time: {} days | Total C/T: {} | VA ratio: {}% | Bottleneck: {}",
        format_metric(metrics.inventory_days, 2),
        format_seconds(Some(metrics.total_cycle_time_sec)),
        format_metric(metrics.value_added_ratio_pct, 2),
        metrics.bottleneck.as_ref().map_or("N/A", |b| b.name.as_str()),
    );
    root.draw_text(&footer, &footer_style, (20, px(layout.canvas.height) - 30))?;
    Ok(())
}

fn draw_node<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    dataset: &Dataset,
    node: &LayoutNode,
    is_bottleneck: bool,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (fill, stroke) = if is_bottleneck {
        (BOTTLENECK_FILL, BOTTLENECK_STROKE)
    } else {
        (NODE_FILL, NODE_STROKE)
    };
    let top_left = (px(node.x), px(node.y));
    let bottom_right = (px(node.x + node.width), px(node.y + node.height));
    root.draw(&Rectangle::new([top_left, bottom_right], fill.filled()))?;
    root.draw(&Rectangle::new([top_left, bottom_right], stroke.stroke_width(2)))?;

    let process = &dataset.processes[node.process_index];
    let name_style = TextStyle::from(("sans-serif", 15).into_font()).color(&BLACK);
    let data_style = TextStyle::from(("sans-serif", 12).into_font()).color(&BLACK);
    let text_x = top_left.0 + 8;

    root.draw_text(&node.name, &name_style, (text_x, top_left.1 + 6))?;
    let lines = [
        format!("C/T: {}", format_seconds(process.cycle_time_sec)),
        format!("C/O: {}", format_seconds(process.changeover_sec)),
        format!("Uptime: {}%", format_metric(Some(process.uptime_or_default()), 0)),
    ];
    for (i, line) in lines.iter().enumerate() {
        root.draw_text(line, &data_style, (text_x, top_left.1 + 26 + 16 * i as i32))?;
    }
    Ok(())
}

fn draw_edge<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, edge: &LayoutEdge) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let start = (px(edge.start.x), px(edge.start.y));
    let end = (px(edge.end.x), px(edge.end.y));
    root.draw(&PathElement::new(vec![start, end], BLACK.stroke_width(2)))?;

    let arrowhead_size = 10;
    let arrowhead_points = vec![
        end,
        (end.0 - arrowhead_size, end.1 - arrowhead_size / 2),
        (end.0 - arrowhead_size, end.1 + arrowhead_size / 2),
    ];
    root.draw(&Polygon::new(arrowhead_points, BLACK.filled()))?;

    // Inventory triangle sits above the connector, its label below.
    let mid = edge.midpoint();
    let (mx, my) = (px(mid.x), px(mid.y));
    let triangle = vec![(mx, my - 36), (mx - 12, my - 14), (mx + 12, my - 14)];
    root.draw(&Polygon::new(triangle.clone(), WIP_FILL.filled()))?;
    root.draw(&PathElement::new(
        vec![triangle[0], triangle[1], triangle[2], triangle[0]],
        BLACK.stroke_width(1),
    ))?;

    let label_style = TextStyle::from(("sans-serif", 12).into_font()).color(&BLACK);
    let label = format!("{} WIP", edge.wip);
    root.draw_text(&label, &label_style, (mx - 18, my + 8))?;
    Ok(())
}

/// Bar chart of each step's cycle time against the takt line, saved as `cycle_vs_takt.png`.
pub fn plot_cycle_vs_takt(output_dir: &Path, metrics: &Metrics) -> Result<()> {
    if metrics.processes.is_empty() {
        info!("no process steps, skipping cycle time chart");
        return Ok(());
    }

    let path = output_dir.join("cycle_vs_takt.png");
    let root = BitMapBackend::new(&path, (1024, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let count = metrics.processes.len();
    let max_ct = metrics
        .processes
        .iter()
        .map(|p| p.cycle_time_sec)
        .fold(0.0, f64::max);
    let y_max = match metrics.takt_time_sec {
        Some(takt) => max_ct.max(takt),
        None => max_ct,
    };
    let y_max = if y_max > 0.0 { y_max * 1.2 } else { 1.0 };

    let names: Vec<String> = metrics.processes.iter().map(|p| p.name.clone()).collect();
    let label_for = |x: &f64| {
        let index = x.round();
        if (x - index).abs() < 1e-6 && index >= 0.0 {
            names.get(index as usize).cloned().unwrap_or_default()
        } else {
            String::new()
        }
    };

    let mut chart = ChartBuilder::on(&root)
        .caption("Cycle Time vs Takt Time", ("sans-serif", 36).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(count as f64 - 0.5), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(count.max(2))
        .x_label_formatter(&label_for)
        .x_desc("Process step")
        .y_desc("Seconds")
        .draw()?;

    chart
        .draw_series(metrics.processes.iter().map(|p| {
            let color = if p.exceeds_takt { BOTTLENECK_STROKE } else { NODE_STROKE };
            let i = p.index as f64;
            Rectangle::new([(i - 0.35, 0.0), (i + 0.35, p.cycle_time_sec)], color.filled())
        }))?
        .label("Cycle time")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], NODE_STROKE.filled()));

    if let Some(takt) = metrics.takt_time_sec {
        chart
            .draw_series(LineSeries::new(
                vec![(-0.5, takt), (count as f64 - 0.5, takt)],
                BLACK.stroke_width(2),
            ))?
            .label(format!("Takt ({})", format_seconds(Some(takt))))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    info!(path = %path.display(), "cycle time chart written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use valuestream_core::layout::{layout, Canvas};
    use valuestream_schemas::schedule::WorkSchedule;

    #[test]
    fn empty_dataset_draws_placeholder() {
        let dataset = Dataset::new(Some(480.0), Vec::new());
        let layout = layout(&dataset, Canvas::default()).unwrap();
        let metrics = Metrics::compute(&dataset, &WorkSchedule::default()).unwrap();

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (1200, 420)).into_drawing_area();
            draw_vsm(&root, "Empty", &dataset, &layout, &metrics).unwrap();
            root.present().unwrap();
        }
        assert!(svg.contains("No process steps yet"));
    }
}
