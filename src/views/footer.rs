use ratatui::{
    prelude::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use rust_decimal::Decimal;

use crate::data::{Symbol, QUOTES};
use crate::helper::DecimalExt;
use crate::notice::{NoticeLevel, NOTICE_STORE};
use crate::ui::styles;

/// 底部常驻的大盘基准指数
pub fn benchmark_indexes() -> [Symbol; 3] {
    [
        "000001.SH".into(), // 上证指数
        "399001.SZ".into(), // 深证成指
        "399006.SZ".into(), // 创业板指
    ]
}

fn index_display_name(symbol: &Symbol) -> &'static str {
    match symbol.as_str() {
        "000001.SH" => "上证指数",
        "399001.SZ" => "深证成指",
        "399006.SZ" => "创业板指",
        _ => "指数",
    }
}

pub fn render(frame: &mut Frame, rect: Rect, indexes: &[Symbol; 3]) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
        .split(rect);

    // 有未过期提示时优先占用指数区域
    let latest_notice = NOTICE_STORE
        .read()
        .ok()
        .and_then(|store| store.latest().cloned());
    if let Some(notice) = latest_notice {
        let style = match notice.level {
            NoticeLevel::Warning => styles::warning(),
            NoticeLevel::Info => styles::text(),
        };
        let prefix = match notice.level {
            NoticeLevel::Warning => "⚠ ",
            NoticeLevel::Info => "ℹ ",
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("{prefix}{}", notice.message),
                style,
            ))),
            chunks[0],
        );
    } else {
        let mut spans = Vec::with_capacity(6);
        for (symbol, quote) in indexes.iter().zip(QUOTES.mget(indexes)) {
            let (ordering, numbers) = quote
                .as_deref()
                .and_then(|q| q.latest_price.zip(q.change_percent))
                .map_or_else(
                    || (std::cmp::Ordering::Equal, " -- -- ".to_string()),
                    |(latest, pct)| {
                        let numbers =
                            format!(" {} {} ", latest.format_price(), pct.format_signed_percent());
                        (pct.cmp(&Decimal::ZERO), numbers)
                    },
                );
            let color = styles::up(ordering);
            spans.push(Span::styled(index_display_name(symbol), color));
            spans.push(Span::styled(numbers, color));
            spans.push(Span::styled("  ", styles::dark_gray()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);
    }

    // 数据新鲜度：TTL 窗口内实心，过半空心，无数据省略号
    let ttl_secs = crate::provider::snapshot_ttl().as_secs();
    let (status, status_style) = match crate::provider::snapshot_age() {
        Some(age) if age.as_secs() < ttl_secs / 2 => ("■■■", styles::fresh()),
        Some(age) if age.as_secs() < ttl_secs => ("■■□", styles::fresh()),
        Some(_) => ("□□□", styles::stale()),
        None => ("···", styles::text()),
    };
    let age_text = crate::provider::snapshot_age()
        .map_or_else(String::new, |age| format!("{}秒前 ", age.as_secs()));
    let line = Line::from(vec![
        Span::styled(age_text, styles::dark_gray()),
        Span::styled(status, status_style),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), chunks[1]);
}
