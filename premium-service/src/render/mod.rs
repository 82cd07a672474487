pub mod charts;
pub mod content;
pub mod format;
pub mod page;

pub use charts::{LineChart, LineSeries, factor_impact_chart};
pub use format::format_rupees;
pub use page::{CalculatorView, render_about, render_calculator, trend_chart};
