use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::data::{Selection, QUOTES};
use crate::ui::styles;

/// 左侧参数栏：自选勾选、分析周期与展示开关
pub fn render(frame: &mut Frame, rect: Rect, selection: &Selection, cursor: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(5)])
        .split(rect);

    let items: Vec<ListItem<'_>> = selection
        .symbols()
        .iter()
        .map(|symbol| {
            let mark = if selection.is_checked(symbol) {
                "[x]"
            } else {
                "[ ]"
            };
            let name = QUOTES
                .get(symbol)
                .map_or_else(|| symbol.code().to_string(), |q| q.display_name().to_string());
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {mark} "), styles::text()),
                Span::styled(name, styles::text()),
                Span::styled(format!("  {}", symbol.as_str()), styles::dark_gray()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(" 选择股票 ", styles::title()))
                .borders(Borders::ALL)
                .border_style(styles::border()),
        )
        .highlight_style(styles::text_selected());

    let mut state = ListState::default();
    state.select(Some(cursor.min(selection.symbols().len().saturating_sub(1))));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    let toggle = |on: bool| if on { "开" } else { "关" };
    let params = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("分析周期 ", styles::label()),
            Span::styled(format!("{} 天", selection.period_days()), styles::text()),
            Span::styled("  [+/-]", styles::dark_gray()),
        ]),
        Line::from(vec![
            Span::styled("走势图 ", styles::label()),
            Span::styled(toggle(selection.show_chart), styles::text()),
            Span::styled(" [c]   ", styles::dark_gray()),
            Span::styled("明细表 ", styles::label()),
            Span::styled(toggle(selection.show_detail), styles::text()),
            Span::styled(" [d]", styles::dark_gray()),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" 参数设置 ", styles::title()))
            .borders(Borders::ALL)
            .border_style(styles::border()),
    );
    frame.render_widget(params, chunks[1]);
}
