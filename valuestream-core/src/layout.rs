//! Deterministic single-row geometry for a value stream diagram.
//!
//! Nodes sit on one horizontal line, evenly spaced between the left and right
//! padding, all with the same width, height and `y`. Identical datasets (by
//! value) on identical canvases always produce bit-identical coordinates: the
//! engine reads no clock, no ambient randomness and no unordered maps.

use crate::{
    error::VsmError,
    metrics,
    seed::{Seed, UnitRng},
    validation::ensure_well_formed,
};
use serde::Serialize;
use tracing::debug;
use valuestream_schemas::{dataset::Dataset, schedule::WorkSchedule};

pub const DEFAULT_PADDING: f64 = 40.0;
pub const DEFAULT_MIN_NODE_WIDTH: f64 = 140.0;
pub const DEFAULT_NODE_GAP: f64 = 20.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 80.0;

/// Peak-to-peak horizontal jitter in pixels. The RNG is drawn once per node
/// regardless of this value.
const JITTER_PX: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn check(&self) -> Result<(), VsmError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(VsmError::InvalidCanvas {
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(1200.0, 420.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    /// Position of the source process in `Dataset::processes`.
    pub process_index: usize,
    pub process_id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutNode {
    pub fn left_mid(&self) -> Point {
        Point {
            x: self.x,
            y: self.y + self.height / 2.0,
        }
    }

    pub fn right_mid(&self) -> Point {
        Point {
            x: self.x + self.width,
            y: self.y + self.height / 2.0,
        }
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// A flow connector between two adjacent steps.
///
/// `wip` is the inventory of the *downstream* step (`to`), i.e. the buffer the
/// material waits in before entering it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutEdge {
    pub from: String,
    pub to: String,
    pub start: Point,
    pub end: Point,
    pub wip: f64,
}

impl LayoutEdge {
    pub fn midpoint(&self) -> Point {
        Point {
            x: (self.start.x + self.end.x) / 2.0,
            y: (self.start.y + self.end.y) / 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub canvas: Canvas,
    pub seed: Seed,
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    pub takt_time_sec: Option<f64>,
}

/// Geometry parameters for [`Layout`] generation.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    padding: f64,
    min_node_width: f64,
    node_gap: f64,
    node_height: f64,
    schedule: WorkSchedule,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            min_node_width: DEFAULT_MIN_NODE_WIDTH,
            node_gap: DEFAULT_NODE_GAP,
            node_height: DEFAULT_NODE_HEIGHT,
            schedule: WorkSchedule::default(),
        }
    }
}

impl LayoutEngine {
    pub fn builder() -> LayoutEngineBuilder {
        LayoutEngineBuilder::default()
    }

    /// Lays out `dataset` on `canvas`, drawing jitter from a generator seeded with `seed`.
    pub fn layout(&self, dataset: &Dataset, canvas: Canvas, seed: Seed) -> Result<Layout, VsmError> {
        let mut rng = seed.rng();
        self.layout_with_rng(dataset, canvas, seed, &mut rng)
    }

    /// Same as [`LayoutEngine::layout`] with a caller-supplied generator.
    pub fn layout_with_rng<R: UnitRng>(
        &self,
        dataset: &Dataset,
        canvas: Canvas,
        seed: Seed,
        rng: &mut R,
    ) -> Result<Layout, VsmError> {
        ensure_well_formed(dataset)?;
        canvas.check()?;

        let count = dataset.processes.len();
        let available = metrics::available_time_sec(&self.schedule);
        let takt_time_sec = metrics::takt_time_sec(available, dataset.customer_demand_per_day);

        if count == 0 {
            debug!(seed = seed.value(), "empty dataset, empty layout");
            return Ok(Layout {
                canvas,
                seed,
                nodes: Vec::new(),
                edges: Vec::new(),
                takt_time_sec,
            });
        }

        let width = self.node_width(canvas.width, count);
        let height = self.node_height;
        let y = canvas.height / 2.0 - height / 2.0;
        let step = (canvas.width - 2.0 * self.padding - width) / (count.max(2) - 1) as f64;

        let nodes: Vec<LayoutNode> = dataset
            .processes
            .iter()
            .enumerate()
            .map(|(index, process)| {
                let jitter = (rng.next_unit() - 0.5) * JITTER_PX;
                let x = if count == 1 {
                    (canvas.width - width) / 2.0
                } else {
                    self.padding + index as f64 * step
                };
                LayoutNode {
                    process_index: index,
                    process_id: process.id.clone(),
                    name: process.name.clone(),
                    x: x + jitter,
                    y,
                    width,
                    height,
                }
            })
            .collect();

        let edges = nodes
            .windows(2)
            .map(|pair| {
                let (upstream, downstream) = (&pair[0], &pair[1]);
                let wip = dataset.processes[downstream.process_index]
                    .wip_or_default()
                    .max(0.0);
                LayoutEdge {
                    from: upstream.process_id.clone(),
                    to: downstream.process_id.clone(),
                    start: upstream.right_mid(),
                    end: downstream.left_mid(),
                    wip,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            seed = seed.value(),
            nodes = nodes.len(),
            edges = edges.len(),
            node_width = width,
            "layout computed"
        );

        Ok(Layout {
            canvas,
            seed,
            nodes,
            edges,
            takt_time_sec,
        })
    }

    fn node_width(&self, canvas_width: f64, count: usize) -> f64 {
        let share = ((canvas_width - 2.0 * self.padding) / count as f64).floor() - self.node_gap;
        share.max(self.min_node_width)
    }
}

/// A fluent builder for [`LayoutEngine`].
#[derive(Default)]
pub struct LayoutEngineBuilder {
    padding: Option<f64>,
    min_node_width: Option<f64>,
    node_gap: Option<f64>,
    node_height: Option<f64>,
    schedule: Option<WorkSchedule>,
}

impl LayoutEngineBuilder {
    /// Horizontal space kept free at both canvas edges.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn with_min_node_width(mut self, width: f64) -> Self {
        self.min_node_width = Some(width);
        self
    }

    pub fn with_node_gap(mut self, gap: f64) -> Self {
        self.node_gap = Some(gap);
        self
    }

    pub fn with_node_height(mut self, height: f64) -> Self {
        self.node_height = Some(height);
        self
    }

    /// Schedule used for the takt time attached to each layout.
    pub fn with_schedule(mut self, schedule: WorkSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// # Errors
    ///
    /// Returns `VsmError::InvalidLayoutParameter` if a geometry parameter is
    /// negative or not finite, or the node height is zero.
    pub fn build(self) -> Result<LayoutEngine, VsmError> {
        let defaults = LayoutEngine::default();
        let engine = LayoutEngine {
            padding: self.padding.unwrap_or(defaults.padding),
            min_node_width: self.min_node_width.unwrap_or(defaults.min_node_width),
            node_gap: self.node_gap.unwrap_or(defaults.node_gap),
            node_height: self.node_height.unwrap_or(defaults.node_height),
            schedule: self.schedule.unwrap_or(defaults.schedule),
        };

        let params = [
            ("padding", engine.padding),
            ("min_node_width", engine.min_node_width),
            ("node_gap", engine.node_gap),
            ("node_height", engine.node_height),
        ];
        for (name, value) in params {
            if !value.is_finite() || value < 0.0 {
                return Err(VsmError::InvalidLayoutParameter {
                    name,
                    reason: format!("expected a finite, non-negative number, got {}", value),
                });
            }
        }
        if engine.node_height == 0.0 {
            return Err(VsmError::InvalidLayoutParameter {
                name: "node_height",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(engine)
    }
}

/// Lays out `dataset` with default geometry and a seed derived from its canonical form.
pub fn layout(dataset: &Dataset, canvas: Canvas) -> Result<Layout, VsmError> {
    LayoutEngine::default().layout(dataset, canvas, Seed::for_dataset(dataset))
}
