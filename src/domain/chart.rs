// Chart-ready data and display configuration
use serde::Serialize;

/// Positionally aligned labels and values handed to the rendering surface.
///
/// Non-numeric values are `NaN` and serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            labels: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, label: String, value: f64) {
        self.labels.push(label);
        self.values.push(value);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayConfig {
    pub title: TextConfig,
    pub series_label: String,
    pub legend: LegendConfig,
    pub tooltip: TooltipConfig,
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextConfig {
    pub text: String,
    pub font_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendConfig {
    pub display: bool,
    pub position: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipConfig {
    pub mode: &'static str,
    pub intersect: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisConfig {
    pub title: TextConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticks: Option<TickConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickConfig {
    pub max_rotation: u32,
    pub min_rotation: u32,
    pub auto_skip: bool,
    pub max_ticks_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub fill: bool,
    pub tension: f64,
    pub point_radius: u32,
    pub point_hover_radius: u32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            border_color: "rgba(54, 162, 235, 1)",
            background_color: "rgba(54, 162, 235, 0.1)",
            fill: true,
            tension: 0.3,
            point_radius: 0,
            point_hover_radius: 3,
        }
    }
}

/// Output of the series projector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub total_points: usize,
    pub series: ChartSeries,
    pub config: DisplayConfig,
}
