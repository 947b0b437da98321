use std::path::{Path, PathBuf};

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use time::macros::date;

use crate::data::{Holding, Symbol, TradeAction, TradeRecord, DEFAULT_PERIOD_DAYS};
use crate::provider::DEFAULT_TTL_SECS;

/// 页面配置：观察列表、模拟持仓与交易记录都从这里注入
///
/// 默认配置内置，用户可用 JSON 文件覆盖（`--config` 或 `CAITU_CONFIG`，
/// 否则取各系统的配置目录）。文件损坏时备份后退回默认。
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// 侧栏可选的标的列表
    pub watch_list: Vec<Symbol>,
    /// 启动时默认勾选的标的
    pub default_checked: Vec<Symbol>,
    /// 启动时的分析周期（天）
    pub period_days: u16,
    /// 行情缓存 TTL（秒），超出 [60, 300] 区间会被钳制
    pub ttl_secs: u64,
    /// 持仓监控页数据
    pub holdings: Vec<Holding>,
    /// 交易记录页数据
    pub trades: Vec<TradeRecord>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            watch_list: vec![
                "000858.SZ".into(), // 五粮液
                "000568.SZ".into(), // 泸州老窖
                "600519.SH".into(), // 贵州茅台
            ],
            default_checked: vec!["000858.SZ".into(), "000568.SZ".into()],
            period_days: DEFAULT_PERIOD_DAYS,
            ttl_secs: DEFAULT_TTL_SECS,
            holdings: vec![
                Holding {
                    symbol: "000858.SZ".into(),
                    name: "五粮液".to_string(),
                    shares: 1000,
                    cost_price: dec!(105.00),
                    fallback_price: dec!(105.95),
                },
                Holding {
                    symbol: "000568.SZ".into(),
                    name: "泸州老窖".to_string(),
                    shares: 800,
                    cost_price: dec!(117.00),
                    fallback_price: dec!(117.79),
                },
            ],
            trades: vec![
                TradeRecord {
                    date: date!(2024 - 01 - 15),
                    action: TradeAction::Buy,
                    symbol: "000858.SZ".into(),
                    price: dec!(105.00),
                    shares: 500,
                },
                TradeRecord {
                    date: date!(2024 - 01 - 10),
                    action: TradeAction::Buy,
                    symbol: "000568.SZ".into(),
                    price: dec!(117.00),
                    shares: 800,
                },
                TradeRecord {
                    date: date!(2024 - 01 - 05),
                    action: TradeAction::Open,
                    symbol: "000858.SZ".into(),
                    price: dec!(104.50),
                    shares: 500,
                },
            ],
        }
    }
}

impl DashboardConfig {
    /// 加载配置：显式路径 > 环境变量 > 默认路径 > 内置默认
    pub fn load(explicit_path: Option<&Path>) -> Self {
        let path = explicit_path.map_or_else(config_file_path, Path::to_path_buf);
        match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Self>(&bytes) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "已加载配置文件");
                    config.sanitized()
                }
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "配置文件解析失败，将备份后使用内置默认"
                    );
                    backup_corrupted_file(&path, &bytes);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// 剔除观察列表之外的默认勾选项，周期钳制到合法区间
    fn sanitized(mut self) -> Self {
        self.default_checked
            .retain(|symbol| self.watch_list.contains(symbol));
        self.period_days = self
            .period_days
            .clamp(crate::data::MIN_PERIOD_DAYS, crate::data::MAX_PERIOD_DAYS);
        self
    }
}

#[must_use]
pub fn config_file_path() -> PathBuf {
    if let Ok(value) = std::env::var("CAITU_CONFIG") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    #[cfg(target_os = "macos")]
    {
        let mut path = dirs::home_dir()
            .or_else(dirs::config_local_dir)
            .unwrap_or_else(std::env::temp_dir);
        path.push("Library/Application Support/CaiTu");
        path.push("config.json");
        path
    }
    #[cfg(target_os = "windows")]
    {
        let mut path = dirs::config_local_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(std::env::temp_dir);
        path.push("CaiTu");
        path.push("config.json");
        path
    }
    #[cfg(target_os = "linux")]
    {
        let mut path = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".config")))
            .unwrap_or_else(std::env::temp_dir);
        path.push("caitu");
        path.push("config.json");
        path
    }
}

fn backup_corrupted_file(path: &Path, bytes: &[u8]) {
    let backup_path = path.with_extension(format!("json.corrupt.{}.bak", now_unix()));
    if let Some(parent) = backup_path.parent() {
        _ = std::fs::create_dir_all(parent);
    }
    _ = std::fs::write(backup_path, bytes);
}

fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::DashboardConfig;
    use crate::data::Symbol;
    use std::path::PathBuf;

    struct TempFileGuard {
        path: PathBuf,
    }

    impl Drop for TempFileGuard {
        fn drop(&mut self) {
            _ = std::fs::remove_file(&self.path);
        }
    }

    #[test]
    fn default_config_matches_builtin_demo() {
        let config = DashboardConfig::default();
        assert_eq!(config.watch_list.len(), 3);
        assert_eq!(config.default_checked.len(), 2);
        assert_eq!(config.holdings.len(), 2);
        assert_eq!(config.trades.len(), 3);
        assert_eq!(config.period_days, 90);
    }

    #[test]
    fn loads_and_sanitizes_config_file() {
        let path = std::env::temp_dir().join("caitu_config_load_test.json");
        let _guard = TempFileGuard { path: path.clone() };

        std::fs::write(
            &path,
            r#"{
                "watch_list": ["600519.SH"],
                "default_checked": ["600519.SH", "000001.SZ"],
                "period_days": 10
            }"#,
        )
        .expect("write config");

        let config = DashboardConfig::load(Some(&path));
        // 列表外的勾选项被剔除，周期被钳到下限
        assert_eq!(config.default_checked, vec![Symbol::new("600519.SH")]);
        assert_eq!(config.period_days, crate::data::MIN_PERIOD_DAYS);
        // 未给出的字段落回默认
        assert_eq!(config.holdings.len(), 2);
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let path = std::env::temp_dir().join("caitu_config_missing_test.json");
        let config = DashboardConfig::load(Some(&path));
        assert_eq!(config.watch_list.len(), 3);
    }

    #[test]
    fn corrupted_file_is_backed_up_and_defaulted() {
        let path = std::env::temp_dir().join("caitu_config_corrupt_test.json");
        let _guard = TempFileGuard { path: path.clone() };
        std::fs::write(&path, "not json at all").expect("write config");

        let config = DashboardConfig::load(Some(&path));
        assert_eq!(config.watch_list.len(), 3);

        let backups: Vec<_> = std::fs::read_dir(std::env::temp_dir())
            .expect("read temp dir")
            .filter_map(Result::ok)
            .filter(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with("caitu_config_corrupt_test.json.corrupt.")
            })
            .collect();
        assert!(!backups.is_empty());
        for backup in backups {
            _ = std::fs::remove_file(backup.path());
        }
    }
}
