use ratatui::{
    prelude::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

use crate::ui::styles;

const HELP_TIPS: &str = "\
  [1] 实时行情    [2] 持仓监控    [3] 交易记录

  [j/k 或 ↑/↓]  在自选列表中移动
  [空格]        勾选 / 取消勾选标的
  [+/-]         调整分析周期（30 ~ 365 天）
  [c]           显示 / 隐藏走势图
  [d]           显示 / 隐藏明细表
  [R]           手动刷新（清空缓存后重新取数）
  [?]           打开 / 关闭本帮助
  [q 或 Ctrl-C] 退出";

pub fn render(frame: &mut Frame, rect: Rect) {
    let rect = crate::ui::rect::centered(56, 18, rect);

    let mut spans = vec![
        Line::from("\n"),
        Line::styled(
            concat!("  财务突破系统 v", env!("CARGO_PKG_VERSION")),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from("\n"),
    ];
    spans.extend(HELP_TIPS.split('\n').map(Line::from));
    let paragraph = Paragraph::new(spans).style(styles::popup()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border())
            .padding(Padding::horizontal(2))
            .title(Span::styled("快捷键", styles::title())),
    );
    frame.render_widget(Clear, rect);
    frame.render_widget(paragraph, rect);
}
