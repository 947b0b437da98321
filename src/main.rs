use crate::widgets::Terminal;
use std::io::{IsTerminal, Write};

#[macro_use]
mod macros;

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod helper;
pub mod history;
pub mod logger;
pub mod notice;
pub mod provider;
pub mod render;
pub mod system;
pub mod ui;
pub mod widgets;

mod views;

pub use cli::Args;

#[tokio::main]
async fn main() {
    let bin_name = std::env::args()
        .next()
        .unwrap_or_else(|| "caitu".to_string());

    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{}", err.message);
            std::process::exit(err.code);
        }
    };

    let args = match command {
        cli::Command::Help => {
            println!("{}", cli::help_text(&bin_name));
            return;
        }
        cli::Command::Version => {
            println!("{}", cli::version_text());
            return;
        }
        cli::Command::Run(args) => args,
    };

    dotenvy::dotenv().ok();

    if !std::io::stdout().is_terminal() {
        eprintln!("财务突破系统 需要在交互式终端（TTY）中运行。");
        std::process::exit(1);
    }

    let _guard = logger::init();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        pid = std::process::id(),
        log_dir = %logger::active_log_dir().display(),
        "应用启动"
    );

    // 崩溃时先恢复终端再打印现场
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        Terminal::exit_full_screen();
        hook(info);
    }));

    let _ = std::io::stdout().write_all(b"\n");
    let _ = std::io::stdout().flush();

    Terminal::enter_full_screen();
    tokio::select! {
        _ = app::run(args) => {
            tracing::info!("应用主循环已退出");
        }
        _ = wait_for_shutdown_signal() => {
            tracing::warn!("收到退出信号，正在退出");
        }
    }
    Terminal::exit_full_screen();
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use std::future::pending;
    use tokio::signal::unix::{signal, Signal, SignalKind};

    async fn recv_or_pending(signal: Option<Signal>) {
        let mut signal = signal;
        if let Some(sig) = signal.as_mut() {
            let _ = sig.recv().await;
            return;
        }
        pending::<()>().await;
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = recv_or_pending(signal(SignalKind::terminate()).ok()) => {}
        _ = recv_or_pending(signal(SignalKind::hangup()).ok()) => {}
        _ = recv_or_pending(signal(SignalKind::interrupt()).ok()) => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
