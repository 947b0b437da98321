mod chart;
mod loading;
mod terminal;

pub use chart::{TrendChart, TrendSeries, SERIES_COLORS};
pub use loading::{Loading, LoadingWidget};
pub use terminal::Terminal;
