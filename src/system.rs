use std::sync::atomic::Ordering;
use std::sync::Mutex;

use atomic::Atomic;
use bevy_ecs::prelude::*;
use bevy_ecs::system::CommandQueue;
use itertools::Itertools;
use ratatui::{
    prelude::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;
use tokio::sync::mpsc;

use crate::app::{AppState, CONFIG, POPUP, RT, SELECTION};
use crate::data::{AdjustType, HistoryBars, Holding, Selection, Symbol, TradeRecord, QUOTES};
use crate::helper::{cycle, format_amount, volume_wan_shou, DecimalExt, Sign};
use crate::history::HISTORY;
use crate::ui::styles;
use crate::widgets::{Loading, LoadingWidget, Terminal, TrendChart, TrendSeries, SERIES_COLORS};

const EMPTY_PLACEHOLDER: &str = "--";
/// 明细表保留的行数（所有标的合并后取最近 N 条）
const DETAIL_TAIL_ROWS: usize = 10;

pub(crate) static SIDEBAR_CURSOR: std::sync::LazyLock<Mutex<Option<usize>>> =
    std::sync::LazyLock::new(Mutex::default);

// 快照刷新的防抖标记
static REFRESH_EXECUTING: Atomic<bool> = Atomic::new(false);

// RAII 守卫，保证 REFRESH_EXECUTING 必被清除
struct RefreshGuard;

impl RefreshGuard {
    fn try_acquire() -> Option<Self> {
        if REFRESH_EXECUTING.swap(true, Ordering::Relaxed) {
            None
        } else {
            Some(RefreshGuard)
        }
    }
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        REFRESH_EXECUTING.store(false, Ordering::Relaxed);
    }
}

#[derive(Event)]
pub enum Key {
    Up,
    Down,
    /// 勾选 / 取消勾选光标所在标的
    Toggle,
    WidenPeriod,
    NarrowPeriod,
    ToggleChart,
    ToggleDetail,
}

#[derive(Clone, Resource)]
pub struct Command(pub mpsc::UnboundedSender<CommandQueue>);

pub fn error(mut terminal: ResMut<Terminal>, err: Res<crate::ui::Content<'static>>) {
    _ = terminal.draw(|frame| {
        frame.render_widget(err.clone(), frame.size());
    });
}

pub fn loading(mut terminal: ResMut<Terminal>, loading: Res<Loading>) {
    _ = terminal.draw(|frame| {
        frame.render_widget(LoadingWidget::from(&*loading), frame.size());
    });
}

/// 进入任一页面时拉一次快照；缓存命中则不会产生网络请求
pub fn refresh_on_enter(command: Res<Command>) {
    refresh_spot(command.0.clone());
}

/// 需要快照的全部标的：观察列表 + 持仓 + 底部基准指数
fn spot_symbols() -> Vec<Symbol> {
    let config = CONFIG.get();
    let watch = config.map(|c| c.watch_list.clone()).unwrap_or_default();
    let holdings = config
        .map(|c| c.holdings.iter().map(|h| h.symbol.clone()).collect())
        .unwrap_or_else(Vec::new);

    watch
        .into_iter()
        .chain(holdings)
        .chain(crate::views::footer::benchmark_indexes())
        .unique()
        .collect()
}

/// 后台刷新行情快照；防抖，同一时刻只有一个任务在途
pub fn refresh_spot(update_tx: mpsc::UnboundedSender<CommandQueue>) {
    let Some(rt) = RT.get() else {
        return;
    };
    rt.spawn(async move {
        let Some(_guard) = RefreshGuard::try_acquire() else {
            tracing::debug!("快照刷新已在进行，跳过本次请求");
            return;
        };

        let symbols = spot_symbols();
        match crate::provider::spot(&symbols).await {
            Ok(records) => {
                tracing::info!("成功获取 {} 条行情快照", records.len());
                for record in records.iter() {
                    QUOTES.insert(record.clone());
                }
                let missing = symbols.len().saturating_sub(records.len());
                if missing > 0 {
                    tracing::warn!("{missing} 个标的未返回行情");
                }
            }
            Err(e) => {
                tracing::error!("获取行情快照失败：{e}");
                crate::notice::warn("获取行情数据失败，稍后自动重试");
            }
        }
        // 空命令队列只为唤醒渲染循环
        _ = update_tx.send(CommandQueue::default());
    });
}

/// 手动刷新：清空全部缓存后重新取数
pub fn refresh_all(update_tx: mpsc::UnboundedSender<CommandQueue>) {
    crate::provider::clear_caches();
    HISTORY.clear();
    if let Ok(mut store) = crate::notice::NOTICE_STORE.write() {
        store.clear();
    }
    refresh_spot(update_tx);
    crate::notice::info("已手动刷新，正在重新获取数据");
}

fn handle_sidebar_keys(events: &mut EventReader<'_, '_, Key>) {
    for event in events.iter() {
        match event {
            Key::Up | Key::Down => {
                let len = SELECTION.read().expect("poison").symbols().len();
                let mut cursor = SIDEBAR_CURSOR.lock().expect("poison");
                *cursor = match event {
                    Key::Up => cycle::prev(*cursor, len),
                    _ => cycle::next(*cursor, len),
                };
            }
            Key::Toggle => {
                let cursor = *SIDEBAR_CURSOR.lock().expect("poison");
                if let Some(idx) = cursor {
                    SELECTION.write().expect("poison").toggle(idx);
                }
            }
            Key::WidenPeriod => SELECTION.write().expect("poison").widen_period(),
            Key::NarrowPeriod => SELECTION.write().expect("poison").narrow_period(),
            Key::ToggleChart => {
                let mut selection = SELECTION.write().expect("poison");
                selection.show_chart = !selection.show_chart;
            }
            Key::ToggleDetail => {
                let mut selection = SELECTION.write().expect("poison");
                selection.show_detail = !selection.show_detail;
            }
        }
    }
}

/// 布局骨架：顶部导航 + 底部状态栏，返回中间内容区
fn chrome(frame: &mut Frame, state: AppState) -> Rect {
    let rect = frame.size();
    let top = Rect { height: 1, ..rect };
    crate::views::navbar::render(frame, top, state);

    let bottom = Rect {
        y: rect.y + rect.height - 1,
        height: 1,
        ..rect
    };
    crate::views::footer::render(frame, bottom, &crate::views::footer::benchmark_indexes());

    Rect {
        y: rect.y + 1,
        height: rect.height - 2,
        ..rect
    }
}

pub fn render_market(
    mut terminal: ResMut<Terminal>,
    mut events: EventReader<Key>,
    command: Res<Command>,
    state: Res<State<AppState>>,
) {
    handle_sidebar_keys(&mut events);

    let selection = SELECTION.read().expect("poison").clone();
    let requests = history_requests(&selection);

    // 勾选标的的历史数据；未就绪的在后台补抓
    let mut series = Vec::with_capacity(requests.len());
    let mut bars_by_symbol = Vec::with_capacity(requests.len());
    for (i, (symbol, days, adjust)) in requests.iter().enumerate() {
        let bars = HISTORY.window(symbol, *days, *adjust, command.0.clone());
        if let Some(ref bars) = bars {
            let name = QUOTES
                .get(symbol)
                .map_or_else(|| symbol.code().to_string(), |q| q.display_name().to_string());
            series.push(TrendSeries::from_bars(
                name,
                SERIES_COLORS[i % SERIES_COLORS.len()],
                bars,
            ));
        }
        bars_by_symbol.push((symbol.clone(), bars));
    }

    let cursor = SIDEBAR_CURSOR.lock().expect("poison").unwrap_or(0);

    _ = terminal.draw(|frame| {
        let rect = chrome(frame, *state.get());

        let chunks = Layout::default()
            .constraints([Constraint::Length(34), Constraint::Min(40)])
            .direction(Direction::Horizontal)
            .split(rect);
        crate::views::sidebar::render(frame, chunks[0], &selection, cursor);

        if requests.is_empty() {
            // 没有勾选标的时不取数，只给提示
            frame.render_widget(
                Paragraph::new("请在左侧选择股票")
                    .style(styles::gray())
                    .alignment(Alignment::Center),
                crate::ui::rect::centered(20, 1, chunks[1]),
            );
            if POPUP.load(Ordering::Relaxed) != 0 {
                crate::views::help::render(frame, rect);
            }
            return;
        }

        let mut constraints = vec![Constraint::Length(metrics_height(requests.len()))];
        if selection.show_chart {
            constraints.push(Constraint::Min(8));
        }
        if selection.show_detail {
            constraints.push(Constraint::Length(DETAIL_TAIL_ROWS as u16 + 3));
        }
        let content = Layout::default()
            .constraints(constraints)
            .direction(Direction::Vertical)
            .split(chunks[1]);

        render_metrics(frame, content[0], &bars_by_symbol);
        let mut next = 1;
        if selection.show_chart {
            frame.render_widget(
                TrendChart::new(&series, selection.period_days()),
                content[next],
            );
            next += 1;
        }
        if selection.show_detail {
            render_detail_table(frame, content[next], &bars_by_symbol);
        }

        if POPUP.load(Ordering::Relaxed) != 0 {
            crate::views::help::render(frame, rect);
        }
    });
}

fn metrics_height(rows: usize) -> u16 {
    #[allow(clippy::cast_possible_truncation)]
    let rows = rows.min(8) as u16;
    rows + 3
}

/// 关键指标：最新价、区间均成交量、日环比
fn render_metrics(
    frame: &mut Frame,
    rect: Rect,
    bars_by_symbol: &[(Symbol, Option<std::sync::Arc<HistoryBars>>)],
) {
    let block = Block::default()
        .title(Span::styled(" 关键指标 ", styles::title()))
        .borders(Borders::ALL)
        .border_style(styles::border());
    let inner = block.inner(rect).inner(&Margin {
        vertical: 0,
        horizontal: 1,
    });
    frame.render_widget(block, rect);

    let header = Row::new(vec![
        Cell::from("标的").style(styles::header()),
        Cell::from(crate::ui::text::align_right("最新价", 10)).style(styles::header()),
        Cell::from(crate::ui::text::align_right("均成交量", 12)).style(styles::header()),
        Cell::from(crate::ui::text::align_right("日环比", 10)).style(styles::header()),
    ]);

    let rows: Vec<Row<'_>> = bars_by_symbol
        .iter()
        .map(|(symbol, bars)| {
            let quote = QUOTES.get(symbol);
            let name = quote
                .as_deref()
                .map_or_else(|| symbol.code().to_string(), |q| q.display_name().to_string());

            let (price_text, price_style) = quote
                .as_deref()
                .and_then(|q| q.latest_price)
                .map_or_else(
                    || (EMPTY_PLACEHOLDER.to_string(), styles::text()),
                    |price| {
                        let pct = quote.as_deref().and_then(|q| q.change_percent);
                        let sign = pct.map_or(std::cmp::Ordering::Equal, |p| p.sign());
                        (format!("¥{}", price.format_price()), styles::up(sign))
                    },
                );

            let volume_text = bars
                .as_deref()
                .and_then(|b| mean_volume(b))
                .map_or_else(
                    || EMPTY_PLACEHOLDER.to_string(),
                    |mean| format!("{}万手", volume_wan_shou(mean)),
                );

            let (dod_text, dod_style) = bars
                .as_deref()
                .and_then(|b| day_over_day(b))
                .map_or_else(
                    || (EMPTY_PLACEHOLDER.to_string(), styles::text()),
                    |pct| (pct.format_signed_percent(), styles::up(pct.sign())),
                );

            Row::new(vec![
                Cell::from(name),
                Cell::from(crate::ui::text::align_right(&price_text, 10)).style(price_style),
                Cell::from(crate::ui::text::align_right(&volume_text, 12)),
                Cell::from(crate::ui::text::align_right(&dod_text, 10)).style(dod_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(10),
    ];
    let table = Table::new(rows)
        .header(header)
        .widths(&widths)
        .column_spacing(2);
    frame.render_widget(table, inner);
}

/// 所有勾选标的合并后的最近几条日线
fn render_detail_table(
    frame: &mut Frame,
    rect: Rect,
    bars_by_symbol: &[(Symbol, Option<std::sync::Arc<HistoryBars>>)],
) {
    let block = Block::default()
        .title(Span::styled(
            format!(" 最近数据（后 {DETAIL_TAIL_ROWS} 条）"),
            styles::title(),
        ))
        .borders(Borders::ALL)
        .border_style(styles::border());
    let inner = block.inner(rect).inner(&Margin {
        vertical: 0,
        horizontal: 1,
    });
    frame.render_widget(block, rect);

    let tail = detail_tail(bars_by_symbol, DETAIL_TAIL_ROWS);
    if tail.is_empty() {
        frame.render_widget(
            Paragraph::new("数据加载中…")
                .style(styles::gray())
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let header = Row::new(
        ["日期", "代码", "开盘", "收盘", "最高", "最低", "成交量"]
            .into_iter()
            .map(|h| Cell::from(h).style(styles::header()))
            .collect::<Vec<_>>(),
    );

    let rows: Vec<Row<'_>> = tail
        .into_iter()
        .map(|(symbol, bar)| {
            let style = styles::up(bar.change.sign());
            Row::new(vec![
                Cell::from(format_date(bar.date)),
                Cell::from(symbol.as_str().to_string()).style(styles::dark_gray()),
                Cell::from(bar.open.format_price()),
                Cell::from(bar.close.format_price()).style(style),
                Cell::from(bar.high.format_price()),
                Cell::from(bar.low.format_price()),
                Cell::from(format!("{}万手", volume_wan_shou(bar.volume))),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(12),
    ];
    let table = Table::new(rows)
        .header(header)
        .widths(&widths)
        .column_spacing(2);
    frame.render_widget(table, inner);
}

pub fn render_holdings(mut terminal: ResMut<Terminal>, state: Res<State<AppState>>) {
    let holdings = CONFIG.get().map(|c| c.holdings.clone()).unwrap_or_default();

    _ = terminal.draw(|frame| {
        let rect = chrome(frame, *state.get());

        let chunks = Layout::default()
            .constraints([Constraint::Min(6), Constraint::Length(3)])
            .direction(Direction::Vertical)
            .split(rect);

        let block = Block::default()
            .title(Span::styled(" 持仓监控 ", styles::title()))
            .borders(Borders::ALL)
            .border_style(styles::border());
        let inner = block.inner(chunks[0]).inner(&Margin {
            vertical: 0,
            horizontal: 1,
        });
        frame.render_widget(block, chunks[0]);

        let header = Row::new(
            ["代码", "名称", "持仓数量", "成本价", "当前价", "持仓市值", "浮盈/亏(%)"]
                .into_iter()
                .map(|h| Cell::from(h).style(styles::header()))
                .collect::<Vec<_>>(),
        );

        let rows: Vec<Row<'_>> = holdings
            .iter()
            .map(|holding| {
                let current = current_price(holding);
                let market_value = holding.market_value(current);
                let (pnl_text, pnl_style) = holding.unrealized_percent(current).map_or_else(
                    || (EMPTY_PLACEHOLDER.to_string(), styles::text()),
                    |pct| (pct.format_signed_percent(), styles::up(pct.sign())),
                );
                Row::new(vec![
                    Cell::from(holding.symbol.as_str().to_string()),
                    Cell::from(holding.name.clone()),
                    Cell::from(crate::ui::text::align_right(
                        &holding.shares.to_string(),
                        8,
                    )),
                    Cell::from(crate::ui::text::align_right(
                        &holding.cost_price.format_price(),
                        8,
                    )),
                    Cell::from(crate::ui::text::align_right(&current.format_price(), 8)),
                    Cell::from(crate::ui::text::align_right(
                        &format_amount(market_value),
                        12,
                    )),
                    Cell::from(crate::ui::text::align_right(&pnl_text, 10)).style(pnl_style),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(10),
        ];
        frame.render_widget(
            Table::new(rows)
                .header(header)
                .widths(&widths)
                .column_spacing(2),
            inner,
        );

        // 总持仓市值
        let total = holdings_total(&holdings);
        let summary = Paragraph::new(Line::from(vec![
            Span::styled("总持仓市值 ", styles::label()),
            Span::styled(format!("¥{}", format_amount(total)), styles::primary()),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border()),
        );
        frame.render_widget(summary, chunks[1]);

        if POPUP.load(Ordering::Relaxed) != 0 {
            crate::views::help::render(frame, rect);
        }
    });
}

pub fn render_trades(mut terminal: ResMut<Terminal>, state: Res<State<AppState>>) {
    let trades = CONFIG.get().map(|c| c.trades.clone()).unwrap_or_default();

    _ = terminal.draw(|frame| {
        let rect = chrome(frame, *state.get());

        let block = Block::default()
            .title(Span::styled(" 交易记录 ", styles::title()))
            .borders(Borders::ALL)
            .border_style(styles::border());
        let inner = block.inner(rect).inner(&Margin {
            vertical: 0,
            horizontal: 1,
        });
        frame.render_widget(block, rect);

        let header = Row::new(
            ["日期", "操作", "股票", "价格", "数量"]
                .into_iter()
                .map(|h| Cell::from(h).style(styles::header()))
                .collect::<Vec<_>>(),
        );

        let rows: Vec<Row<'_>> = trades
            .iter()
            .map(|trade| {
                let action_style = match trade.action {
                    crate::data::TradeAction::Sell => styles::up(std::cmp::Ordering::Less),
                    _ => styles::up(std::cmp::Ordering::Greater),
                };
                Row::new(vec![
                    Cell::from(format_date(trade.date)),
                    Cell::from(trade.action.label()).style(action_style),
                    Cell::from(trade_display(trade)),
                    Cell::from(crate::ui::text::align_right(&trade.price.format_price(), 8)),
                    Cell::from(crate::ui::text::align_right(&trade.shares.to_string(), 8)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(18),
            Constraint::Length(8),
            Constraint::Length(8),
        ];
        frame.render_widget(
            Table::new(rows)
                .header(header)
                .widths(&widths)
                .column_spacing(2),
            inner,
        );

        if POPUP.load(Ordering::Relaxed) != 0 {
            crate::views::help::render(frame, rect);
        }
    });
}

/// 勾选驱动的历史取数请求；没有勾选就没有请求
fn history_requests(selection: &Selection) -> Vec<(Symbol, u16, AdjustType)> {
    selection
        .checked_symbols()
        .into_iter()
        .map(|symbol| (symbol, selection.period_days(), AdjustType::ForwardAdjust))
        .collect()
}

fn trade_display(trade: &TradeRecord) -> String {
    QUOTES.get(&trade.symbol).map_or_else(
        || trade.symbol.as_str().to_string(),
        |q| format!("{} {}", q.display_name(), trade.symbol.as_str()),
    )
}

/// 持仓现价：行情缺失时退回配置里的兜底价
fn current_price(holding: &Holding) -> Decimal {
    QUOTES
        .get(&holding.symbol)
        .and_then(|q| q.latest_price)
        .unwrap_or(holding.fallback_price)
}

fn holdings_total(holdings: &[Holding]) -> Decimal {
    holdings
        .iter()
        .map(|h| h.market_value(current_price(h)))
        .sum()
}

/// 区间平均成交量（手），空表返回 None
fn mean_volume(bars: &HistoryBars) -> Option<u64> {
    if bars.is_empty() {
        return None;
    }
    let sum: u64 = bars.iter().map(|b| b.volume).sum();
    Some(sum / bars.len() as u64)
}

/// 收盘价日环比；不足两条数据时跳过计算
fn day_over_day(bars: &HistoryBars) -> Option<Decimal> {
    if bars.len() < 2 {
        return None;
    }
    let prev = bars[bars.len() - 2].close;
    let last = bars[bars.len() - 1].close;
    if prev.is_zero() {
        return None;
    }
    Some(((last - prev) / prev * Decimal::from(100)).round_dp(2))
}

/// 合并所有标的的日线并按日期取最近 N 条
fn detail_tail(
    bars_by_symbol: &[(Symbol, Option<std::sync::Arc<HistoryBars>>)],
    rows: usize,
) -> Vec<(Symbol, crate::data::HistoryBar)> {
    let mut merged: Vec<(Symbol, crate::data::HistoryBar)> = bars_by_symbol
        .iter()
        .filter_map(|(symbol, bars)| bars.as_deref().map(|b| (symbol, b)))
        .flat_map(|(symbol, bars)| bars.iter().map(|bar| (symbol.clone(), bar.clone())))
        .collect();
    merged.sort_by_key(|(_, bar)| bar.date);
    let skip = merged.len().saturating_sub(rows);
    merged.split_off(skip)
}

fn format_date(date: time::Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month() as u8,
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::{day_over_day, detail_tail, history_requests, holdings_total, mean_volume};
    use crate::data::{HistoryBar, Holding, Selection, Symbol};
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use time::macros::date;

    fn bar(d: time::Date, close: rust_decimal::Decimal, volume: u64) -> HistoryBar {
        HistoryBar {
            date: d,
            open: close,
            high: close,
            low: close,
            close,
            volume,
            amount: dec!(0),
            pct_change: dec!(0),
            change: dec!(0),
            turnover: dec!(0),
        }
    }

    #[test]
    fn no_history_requests_without_checked_symbols() {
        let watch: Vec<Symbol> = vec!["000858.SZ".into(), "600519.SH".into()];

        let selection = Selection::new(watch.clone(), &[]);
        assert!(history_requests(&selection).is_empty());

        let selection = Selection::new(watch, &["600519.SH".into()]);
        let requests = history_requests(&selection);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0.as_str(), "600519.SH");
        assert_eq!(requests[0].1, selection.period_days());
    }

    #[test]
    fn day_over_day_needs_two_rows() {
        assert_eq!(day_over_day(&vec![]), None);
        assert_eq!(
            day_over_day(&vec![bar(date!(2024 - 01 - 15), dec!(100), 1)]),
            None
        );
    }

    #[test]
    fn day_over_day_from_last_two_closes() {
        let bars = vec![
            bar(date!(2024 - 01 - 15), dec!(100), 1),
            bar(date!(2024 - 01 - 16), dec!(103), 1),
        ];
        assert_eq!(day_over_day(&bars), Some(dec!(3.00)));
    }

    #[test]
    fn mean_volume_over_window() {
        let bars = vec![
            bar(date!(2024 - 01 - 15), dec!(100), 10_000),
            bar(date!(2024 - 01 - 16), dec!(100), 30_000),
        ];
        assert_eq!(mean_volume(&bars), Some(20_000));
        assert_eq!(mean_volume(&vec![]), None);
    }

    #[test]
    fn detail_tail_keeps_latest_rows_across_symbols() {
        let a: Symbol = "000858.SZ".into();
        let b: Symbol = "000568.SZ".into();
        let input = vec![
            (
                a.clone(),
                Some(Arc::new(vec![
                    bar(date!(2024 - 01 - 15), dec!(1), 1),
                    bar(date!(2024 - 01 - 17), dec!(1), 1),
                ])),
            ),
            (
                b.clone(),
                Some(Arc::new(vec![bar(date!(2024 - 01 - 16), dec!(2), 1)])),
            ),
        ];
        let tail = detail_tail(&input, 2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].0, b);
        assert_eq!(tail[0].1.date, date!(2024 - 01 - 16));
        assert_eq!(tail[1].0, a);
        assert_eq!(tail[1].1.date, date!(2024 - 01 - 17));
    }

    #[test]
    fn holdings_total_uses_fallback_price_without_quote() {
        let holdings = vec![
            Holding {
                symbol: "000858.SZ".into(),
                name: "五粮液".into(),
                shares: 1000,
                cost_price: dec!(105.00),
                fallback_price: dec!(105.95),
            },
            Holding {
                symbol: "000568.SZ".into(),
                name: "泸州老窖".into(),
                shares: 800,
                cost_price: dec!(117.00),
                fallback_price: dec!(117.79),
            },
        ];
        // 105950 + 94232 = 200182
        assert_eq!(holdings_total(&holdings), dec!(200182.00));
    }
}
