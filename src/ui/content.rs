use bevy_ecs::prelude::*;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin},
    text::Text,
    widgets::{Paragraph, Widget},
};

/// 整屏提示页：标题 + 正文，垂直居中
/// 用于错误页与"未选择标的"之类的信息提示
#[derive(Clone, Debug, Default, Resource)]
pub struct Content<'a> {
    heading: Text<'a>,
    content: Text<'a>,
}

impl<'a> Content<'a> {
    pub fn new(heading: impl Into<Text<'a>>, content: impl Into<Text<'a>>) -> Self {
        Self {
            heading: heading.into(),
            content: content.into(),
        }
    }
}

impl Widget for Content<'_> {
    fn render(self, rect: ratatui::layout::Rect, buf: &mut ratatui::buffer::Buffer) {
        let heading_len = u16::try_from(self.heading.lines.len()).unwrap_or(5);
        let content_len = u16::try_from(self.content.lines.len()).unwrap_or(10);
        let rect = rect
            .height
            .checked_sub(heading_len + content_len + 2)
            .map_or(rect, |h| {
                rect.inner(&Margin {
                    vertical: h / 2,
                    horizontal: 0,
                })
            });

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(heading_len),
                Constraint::Length(2),
                Constraint::Length(content_len),
            ])
            .split(rect);

        let heading = Paragraph::new(self.heading).alignment(Alignment::Center);
        let content = Paragraph::new(self.content).alignment(Alignment::Center);

        heading.render(chunks[0], buf);
        content.render(chunks[2], buf);
    }
}
