use ratatui::{
    prelude::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};

use crate::{app::AppState, ui::styles};

pub fn render(frame: &mut Frame, rect: Rect, state: AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rect);

    let tabs = vec![
        Line::from(" 实时行情 [1] "),
        Line::from(" 持仓监控 [2] "),
        Line::from(" 交易记录 [3] "),
    ];

    let tabs = Tabs::new(tabs)
        .style(styles::text())
        .highlight_style(styles::text_selected())
        .divider("|")
        .select(match state {
            AppState::Holdings => 1,
            AppState::Trades => 2,
            _ => 0,
        });

    let dark_gray_style = styles::dark_gray();
    let brand = Span::styled(
        concat!("财务突破系统 v", env!("CARGO_PKG_VERSION")),
        dark_gray_style,
    );
    let help = Span::styled("[?]帮助", dark_gray_style);
    let refresh = Span::styled("[R]刷新", dark_gray_style);
    let quit = Span::styled("[q]退出", dark_gray_style);
    let right = Paragraph::new(Line::from(vec![
        brand,
        Span::styled(" | ", dark_gray_style),
        help,
        Span::styled(" ", dark_gray_style),
        refresh,
        Span::styled(" ", dark_gray_style),
        quit,
    ]))
    .alignment(Alignment::Right);

    frame.render_widget(tabs, chunks[0]);
    frame.render_widget(right, chunks[1]);
}
