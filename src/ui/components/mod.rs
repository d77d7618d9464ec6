pub mod line_chart;
pub mod metric_card;

pub use line_chart::SeriesChart;
pub use metric_card::MetricCard;
