use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};
use rust_decimal::prelude::ToPrimitive;
use time::Date;

use crate::data::HistoryBars;

/// 多标的收盘价走势的折线数据
///
/// 横轴用儒略日对齐不同标的的交易日，停牌日自然留空。
#[derive(Clone, Debug)]
pub struct TrendSeries {
    pub name: String,
    pub color: Color,
    points: Vec<(f64, f64)>,
}

/// 走势线配色按标的顺序循环
pub const SERIES_COLORS: [Color; 6] = [
    Color::LightYellow,
    Color::LightCyan,
    Color::LightMagenta,
    Color::LightBlue,
    Color::LightRed,
    Color::LightGreen,
];

impl TrendSeries {
    pub fn from_bars(name: impl Into<String>, color: Color, bars: &HistoryBars) -> Self {
        let points = bars
            .iter()
            .filter_map(|bar| {
                let close = bar.close.to_f64()?;
                Some((f64::from(bar.date.to_julian_day()), close))
            })
            .collect();
        Self {
            name: name.into(),
            color,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 近 N 天收盘价走势图
pub struct TrendChart<'a> {
    series: &'a [TrendSeries],
    period_days: u16,
}

impl<'a> TrendChart<'a> {
    pub fn new(series: &'a [TrendSeries], period_days: u16) -> Self {
        Self {
            series,
            period_days,
        }
    }

    /// 所有序列的横纵轴范围，纵轴上下各留 2% 余量
    fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut x_min = f64::MAX;
        let mut x_max = f64::MIN;
        let mut y_min = f64::MAX;
        let mut y_max = f64::MIN;

        for series in self.series {
            for &(x, y) in &series.points {
                x_min = x_min.min(x);
                x_max = x_max.max(x);
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
        }
        if x_min > x_max {
            return None;
        }

        let margin = ((y_max - y_min) * 0.02).max(0.01);
        Some(([x_min, x_max], [y_min - margin, y_max + margin]))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn date_label(julian_day: f64) -> String {
    Date::from_julian_day(julian_day.round() as i32)
        .map_or_else(|_| String::from("--"), |d| format!("{:02}-{:02}", d.month() as u8, d.day()))
}

impl Widget for TrendChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" 近{}天股价走势 ", self.period_days))
            .title_style(crate::ui::styles::title())
            .borders(Borders::ALL)
            .border_style(crate::ui::styles::border());

        let Some((x_bounds, y_bounds)) = self.bounds() else {
            // 数据未就绪时只画外框
            block.render(area, buf);
            return;
        };

        let datasets: Vec<Dataset<'_>> = self
            .series
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| {
                Dataset::default()
                    .name(s.name.as_str())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(s.color))
                    .data(&s.points)
            })
            .collect();

        let x_labels = vec![
            Span::styled(date_label(x_bounds[0]), crate::ui::styles::gray()),
            Span::styled(date_label(x_bounds[1]), crate::ui::styles::gray()),
        ];
        let y_mid = (y_bounds[0] + y_bounds[1]) / 2.0;
        let y_labels = vec![
            Span::styled(format!("{:.2}", y_bounds[0]), crate::ui::styles::gray()),
            Span::styled(format!("{y_mid:.2}"), crate::ui::styles::gray()),
            Span::styled(format!("{:.2}", y_bounds[1]), crate::ui::styles::gray()),
        ];

        Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .style(crate::ui::styles::dark_gray())
                    .bounds(x_bounds)
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(crate::ui::styles::dark_gray())
                    .bounds(y_bounds)
                    .labels(y_labels),
            )
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::{TrendChart, TrendSeries};
    use crate::data::HistoryBar;
    use ratatui::style::Color;
    use rust_decimal_macros::dec;
    use time::macros::date;

    fn bar(d: time::Date, close: rust_decimal::Decimal) -> HistoryBar {
        HistoryBar {
            date: d,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
            amount: dec!(1000000),
            pct_change: dec!(0),
            change: dec!(0),
            turnover: dec!(0.5),
        }
    }

    #[test]
    fn series_aligns_on_julian_day() {
        let bars = vec![
            bar(date!(2024 - 01 - 15), dec!(105.00)),
            bar(date!(2024 - 01 - 16), dec!(106.50)),
        ];
        let series = TrendSeries::from_bars("五粮液", Color::LightYellow, &bars);
        assert!(!series.is_empty());
        assert_eq!(series.points.len(), 2);
        // 相隔一天的交易日在横轴上相差 1
        assert!((series.points[1].0 - series.points[0].0 - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bounds_cover_all_series() {
        let a = TrendSeries::from_bars(
            "a",
            Color::LightYellow,
            &vec![bar(date!(2024 - 01 - 15), dec!(100))],
        );
        let b = TrendSeries::from_bars(
            "b",
            Color::LightCyan,
            &vec![bar(date!(2024 - 01 - 20), dec!(200))],
        );
        let series = [a, b];
        let chart = TrendChart::new(&series, 90);
        let (x, y) = chart.bounds().expect("bounds");
        assert!(x[0] < x[1]);
        assert!(y[0] < 100.0 && y[1] > 200.0);
    }

    #[test]
    fn empty_series_has_no_bounds() {
        let series: [TrendSeries; 0] = [];
        let chart = TrendChart::new(&series, 90);
        assert!(chart.bounds().is_none());
    }
}
