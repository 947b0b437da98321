use std::cmp::Ordering;

use ratatui::style::{Color, Modifier, Style};

#[inline]
pub fn header() -> Style {
    Style::default().fg(Color::Gray)
}

#[inline]
pub fn gray() -> Style {
    Style::default().fg(Color::Gray)
}

#[inline]
pub fn dark_gray() -> Style {
    Style::default().fg(Color::DarkGray)
}

#[inline]
pub fn label() -> Style {
    Style::default().fg(Color::Gray)
}

#[inline]
pub fn text() -> Style {
    Style::default().fg(Color::Reset)
}

#[inline]
pub fn primary() -> Style {
    Style::default().fg(Color::White)
}

#[inline]
pub fn text_selected() -> Style {
    text().add_modifier(Modifier::REVERSED)
}

#[inline]
pub fn popup() -> Style {
    text()
}

#[inline]
pub fn title() -> Style {
    text()
}

#[inline]
pub fn border() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// 涨跌配色，A 股惯例：红涨绿跌
#[inline]
pub fn up(val: Ordering) -> Style {
    match val {
        Ordering::Less => Style::default().fg(Color::LightGreen),
        Ordering::Equal => Style::default().fg(Color::Reset),
        Ordering::Greater => Style::default().fg(Color::LightRed),
    }
}

#[inline]
pub fn warning() -> Style {
    Style::default().fg(Color::Yellow)
}

#[inline]
pub fn fresh() -> Style {
    Style::default().fg(Color::Green)
}

#[inline]
pub fn stale() -> Style {
    Style::default().fg(Color::Red)
}
