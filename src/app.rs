use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{OnceLock, RwLock};
use std::time::Duration;

use atomic::Atomic;
use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_ecs::system::{CommandQueue, InsertResource, SystemState};
use tokio::sync::mpsc;

use crate::config::DashboardConfig;
use crate::data::Selection;
use crate::render::{DirtyFlags, RenderState};
use crate::system;
use crate::ui::Content;
use crate::widgets::{Loading, Terminal};

pub static RT: OnceLock<tokio::runtime::Handle> = OnceLock::new();
pub static POPUP: AtomicU8 = AtomicU8::new(0);
pub static LAST_STATE: Atomic<AppState> = Atomic::new(AppState::Market);
pub static CONFIG: OnceLock<DashboardConfig> = OnceLock::new();
pub static SELECTION: std::sync::LazyLock<RwLock<Selection>> =
    std::sync::LazyLock::new(Default::default);

pub const POPUP_HELP: u8 = 0b1;

/// 后台快照补拉的间隔；是否真正发起请求由缓存 TTL 决定
const AUTO_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Default, States, strum::EnumIter, bytemuck::NoUninit,
)]
#[repr(u8)]
pub enum AppState {
    Error,
    #[default]
    Loading,
    Market,
    Holdings,
    Trades,
}

impl AppState {
    fn is_tab(self) -> bool {
        matches!(self, Self::Market | Self::Holdings | Self::Trades)
    }

    fn next_tab(self) -> Self {
        let tabs: Vec<Self> = <Self as strum::IntoEnumIterator>::iter()
            .filter(|s| s.is_tab())
            .collect();
        let idx = tabs.iter().position(|&s| s == self).unwrap_or(0);
        tabs[(idx + 1) % tabs.len()]
    }

    fn prev_tab(self) -> Self {
        let tabs: Vec<Self> = <Self as strum::IntoEnumIterator>::iter()
            .filter(|s| s.is_tab())
            .collect();
        let idx = tabs.iter().position(|&s| s == self).unwrap_or(0);
        tabs[(idx + tabs.len() - 1) % tabs.len()]
    }
}

pub async fn run(args: crate::Args) {
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();

    // 配置：文件 < 命令行
    let mut config = DashboardConfig::load(args.config.as_deref());
    if let Some(days) = args.days {
        config.period_days = days.clamp(
            crate::data::MIN_PERIOD_DAYS,
            crate::data::MAX_PERIOD_DAYS,
        );
    }
    if let Some(ttl) = args.ttl_secs {
        config.ttl_secs = ttl;
    }

    crate::provider::init(config.ttl_secs);

    let mut selection = Selection::new(config.watch_list.clone(), &config.default_checked);
    selection.set_period_days(config.period_days);
    *SELECTION.write().expect("poison") = selection;

    let watch_list_empty = config.watch_list.is_empty();
    _ = CONFIG.set(config);

    RT.set(tokio::runtime::Handle::current()).unwrap();
    let mut app = bevy_app::App::new();
    app.add_state::<AppState>()
        .add_event::<system::Key>()
        .init_resource::<Terminal>()
        .init_resource::<Loading>()
        .insert_resource(system::Command(update_tx.clone()))
        .add_systems(Update, system::loading.run_if(in_state(AppState::Loading)))
        .add_systems(Update, system::error.run_if(in_state(AppState::Error)))
        .add_systems(OnEnter(AppState::Market), system::refresh_on_enter)
        .add_systems(OnExit(AppState::Market), exit_market)
        .add_systems(
            Update,
            system::render_market.run_if(in_state(AppState::Market)),
        )
        .add_systems(OnEnter(AppState::Holdings), system::refresh_on_enter)
        .add_systems(OnExit(AppState::Holdings), exit_holdings)
        .add_systems(
            Update,
            system::render_holdings.run_if(in_state(AppState::Holdings)),
        )
        .add_systems(OnEnter(AppState::Trades), system::refresh_on_enter)
        .add_systems(OnExit(AppState::Trades), exit_trades)
        .add_systems(
            Update,
            system::render_trades.run_if(in_state(AppState::Trades)),
        );

    // 启动任务：预热快照后进入行情页
    tokio::spawn({
        let tx = update_tx.clone();
        async move {
            if watch_list_empty {
                tracing::error!("配置中的观察列表为空");
                let mut queue = CommandQueue::default();
                queue.push(InsertResource {
                    resource: Content::new(
                        "配置错误",
                        "观察列表为空，请在配置文件中加入至少一只股票后重启。",
                    ),
                });
                queue.push(InsertResource {
                    resource: NextState(Some(AppState::Error)),
                });
                _ = tx.send(queue);
                return;
            }

            tracing::info!("正在预热行情数据...");
            system::refresh_spot(tx.clone());

            let mut queue = CommandQueue::default();
            queue.push(InsertResource {
                resource: NextState(Some(AppState::Market)),
            });
            _ = tx.send(queue);
        }
    });

    // 周期性补拉快照；TTL 过期后才会真正请求上游
    tokio::spawn({
        let tx = update_tx.clone();
        async move {
            let mut tick = tokio::time::interval(AUTO_REFRESH_INTERVAL);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tick.tick().await;
                if tx.is_closed() {
                    break;
                }
                system::refresh_spot(tx.clone());
            }
        }
    });

    // 固定 30 FPS 渲染，由脏标记决定是否真正绘制
    let render_interval = std::time::Duration::from_millis(33);
    let mut render_tick = tokio::time::interval(render_interval);
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 稍候片刻，确保终端准备就绪
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let mut events = crossterm::event::EventStream::new();
    let mut render_state = RenderState::new();
    render_state.mark_all_dirty();

    loop {
        tokio::select! {
            _ = render_tick.tick() => {
                if render_state.needs_render() {
                    app.update();
                    render_state.clear();
                } else {
                    render_state.skip();
                }
            }
            Some(mut cmd) = update_rx.recv() => {
                cmd.apply(&mut app.world);
                // 资源或状态变化可能影响任意组件
                render_state.mark_dirty(DirtyFlags::ALL);
            }
            Some(event) = tokio_stream::StreamExt::next(&mut events) => {
                let event = match event {
                    Ok(crossterm::event::Event::Key(event)) => event,
                    Ok(crossterm::event::Event::Resize(..)) => {
                        render_state.mark_all_dirty();
                        continue
                    }
                    Ok(_) => continue,
                    Err(err) => {
                        tracing::error!("接收事件失败：{err}");
                        app.world.insert_resource(Content::new(
                            "终端异常",
                            err.to_string(),
                        ));
                        app.world.insert_resource(NextState(Some(AppState::Error)));
                        render_state.mark_dirty(DirtyFlags::ERROR);
                        continue;
                    }
                };

                let popup = POPUP.load(Ordering::Relaxed);
                let state = *app.world.resource::<State<AppState>>().get();

                // 弹窗打开时任意按键关闭
                if popup != 0 {
                    POPUP.store(0, Ordering::Relaxed);
                    render_state.mark_dirty(DirtyFlags::ALL);
                    continue;
                }

                match state {
                    AppState::Error => return,
                    AppState::Loading => {
                        if matches!(event, ctrl!('c') | key!('q')) {
                            return;
                        }
                        continue;
                    }
                    AppState::Market | AppState::Holdings | AppState::Trades => (),
                }

                handle_global_keys(&mut app, event, state, update_tx.clone(), &mut render_state);
            }
        }
    }
}

fn exit_market() {
    LAST_STATE.store(AppState::Market, Ordering::Relaxed);
}

fn exit_holdings() {
    LAST_STATE.store(AppState::Holdings, Ordering::Relaxed);
}

fn exit_trades() {
    LAST_STATE.store(AppState::Trades, Ordering::Relaxed);
}

fn switch_tab(app: &mut bevy_app::App, render_state: &mut RenderState, to: AppState) {
    app.world.insert_resource(NextState(Some(to)));
    render_state.mark_dirty(DirtyFlags::ALL);
}

fn handle_global_keys(
    app: &mut bevy_app::App,
    event: crossterm::event::KeyEvent,
    state: AppState,
    update_tx: mpsc::UnboundedSender<CommandQueue>,
    render_state: &mut RenderState,
) {
    match event {
        ctrl!('c') | key!('q') => {
            tracing::info!("退出，{}", render_state.stats());
            Terminal::graceful_exit(0)
        }
        key!('1') if state != AppState::Market => {
            switch_tab(app, render_state, AppState::Market);
        }
        key!('2') if state != AppState::Holdings => {
            switch_tab(app, render_state, AppState::Holdings);
        }
        key!('3') if state != AppState::Trades => {
            switch_tab(app, render_state, AppState::Trades);
        }
        key!(Tab) => switch_tab(app, render_state, state.next_tab()),
        shift!(BackTab) => switch_tab(app, render_state, state.prev_tab()),
        key!(Esc) => {
            let last_state = LAST_STATE.load(Ordering::Relaxed);
            if last_state != state {
                switch_tab(app, render_state, last_state);
            }
        }
        ::crossterm::event::KeyEvent {
            code: ::crossterm::event::KeyCode::Up | ::crossterm::event::KeyCode::Char('k'),
            modifiers: ::crossterm::event::KeyModifiers::NONE,
            kind: ::crossterm::event::KeyEventKind::Press,
            state: ::crossterm::event::KeyEventState::NONE,
        } => {
            send_evt(system::Key::Up, &mut app.world);
            render_state.mark_dirty(DirtyFlags::MARKET);
        }
        ::crossterm::event::KeyEvent {
            code: ::crossterm::event::KeyCode::Down | ::crossterm::event::KeyCode::Char('j'),
            modifiers: ::crossterm::event::KeyModifiers::NONE,
            kind: ::crossterm::event::KeyEventKind::Press,
            state: ::crossterm::event::KeyEventState::NONE,
        } => {
            send_evt(system::Key::Down, &mut app.world);
            render_state.mark_dirty(DirtyFlags::MARKET);
        }
        key!(' ') => {
            send_evt(system::Key::Toggle, &mut app.world);
            render_state.mark_dirty(DirtyFlags::MARKET | DirtyFlags::CHART);
        }
        ::crossterm::event::KeyEvent {
            code: ::crossterm::event::KeyCode::Char('+' | '='),
            modifiers:
                ::crossterm::event::KeyModifiers::NONE | ::crossterm::event::KeyModifiers::SHIFT,
            kind: ::crossterm::event::KeyEventKind::Press,
            state: ::crossterm::event::KeyEventState::NONE,
        } => {
            send_evt(system::Key::WidenPeriod, &mut app.world);
            render_state.mark_dirty(DirtyFlags::MARKET | DirtyFlags::CHART);
        }
        ::crossterm::event::KeyEvent {
            code: ::crossterm::event::KeyCode::Char('-' | '_'),
            modifiers:
                ::crossterm::event::KeyModifiers::NONE | ::crossterm::event::KeyModifiers::SHIFT,
            kind: ::crossterm::event::KeyEventKind::Press,
            state: ::crossterm::event::KeyEventState::NONE,
        } => {
            send_evt(system::Key::NarrowPeriod, &mut app.world);
            render_state.mark_dirty(DirtyFlags::MARKET | DirtyFlags::CHART);
        }
        key!('c') => {
            send_evt(system::Key::ToggleChart, &mut app.world);
            render_state.mark_dirty(DirtyFlags::MARKET | DirtyFlags::CHART);
        }
        key!('d') => {
            send_evt(system::Key::ToggleDetail, &mut app.world);
            render_state.mark_dirty(DirtyFlags::MARKET | DirtyFlags::CHART);
        }
        ::crossterm::event::KeyEvent {
            code: ::crossterm::event::KeyCode::Char('r' | 'R'),
            modifiers:
                ::crossterm::event::KeyModifiers::NONE | ::crossterm::event::KeyModifiers::SHIFT,
            kind: ::crossterm::event::KeyEventKind::Press,
            state: ::crossterm::event::KeyEventState::NONE,
        } => {
            system::refresh_all(update_tx);
            render_state.mark_dirty(DirtyFlags::ALL);
        }
        ::crossterm::event::KeyEvent {
            code: ::crossterm::event::KeyCode::Char('?'),
            modifiers:
                ::crossterm::event::KeyModifiers::NONE | ::crossterm::event::KeyModifiers::SHIFT,
            kind: ::crossterm::event::KeyEventKind::Press,
            state: ::crossterm::event::KeyEventState::NONE,
        } => {
            POPUP.store(POPUP_HELP, Ordering::Relaxed);
            render_state.mark_dirty(DirtyFlags::POPUP_HELP);
        }
        _ => (),
    }
}

fn send_evt<T: Event>(evt: T, world: &mut World) {
    let mut state = SystemState::<EventWriter<T>>::new(world);
    state.get_mut(world).send(evt);
}

#[cfg(test)]
mod tests {
    use super::AppState;

    #[test]
    fn tab_cycle_covers_three_pages() {
        assert_eq!(AppState::Market.next_tab(), AppState::Holdings);
        assert_eq!(AppState::Holdings.next_tab(), AppState::Trades);
        assert_eq!(AppState::Trades.next_tab(), AppState::Market);

        assert_eq!(AppState::Market.prev_tab(), AppState::Trades);
        assert_eq!(AppState::Trades.prev_tab(), AppState::Holdings);
    }

    #[test]
    fn non_tab_states_fall_back_to_first_tab() {
        assert_eq!(AppState::Loading.next_tab(), AppState::Holdings);
    }
}
