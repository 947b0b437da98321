use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

/// A 股标的标识
/// 格式：代码.交易所（如 000858.SZ / 600519.SH）
///
/// 配置文件里以纯字符串出现（`"600519.SH"`），经由 [`Symbol::new`]
/// 归一化大小写与空白
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Symbol {
    inner: String,
}

impl Symbol {
    pub fn new(symbol: &str) -> Self {
        Self {
            inner: symbol.trim().to_uppercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// 六位证券代码（去掉交易所后缀）
    pub fn code(&self) -> &str {
        self.as_str()
            .rsplit_once('.')
            .map_or(self.as_str(), |(code, _)| code)
    }

    pub fn exchange(&self) -> Exchange {
        match self.as_str().rsplit_once('.') {
            Some((_, "SH")) => Exchange::SH,
            Some((_, "BJ")) => Exchange::BJ,
            Some((_, "SZ")) => Exchange::SZ,
            // 无后缀时按代码段推断：6 开头为沪市，其余按深市处理
            _ => {
                if self.inner.starts_with('6') {
                    Exchange::SH
                } else {
                    Exchange::SZ
                }
            }
        }
    }

    /// 东方财富接口使用的 secid（市场前缀.代码）
    pub fn secid(&self) -> String {
        format!("{}.{}", self.exchange().market_id(), self.code())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.inner
    }
}

impl std::str::FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// 交易所
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Exchange {
    SH,
    #[default]
    SZ,
    BJ,
}

impl Exchange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SH => "SH",
            Self::SZ => "SZ",
            Self::BJ => "BJ",
        }
    }

    /// 东方财富行情接口的市场编号
    pub fn market_id(self) -> u8 {
        match self {
            Self::SH => 1,
            Self::SZ | Self::BJ => 0,
        }
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 复权方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustType {
    NoAdjust,
    /// 前复权（qfq）
    #[default]
    ForwardAdjust,
}

impl AdjustType {
    /// 东方财富 K 线接口的 fqt 参数
    pub fn fqt(self) -> u8 {
        match self {
            Self::NoAdjust => 0,
            Self::ForwardAdjust => 1,
        }
    }
}

/// 行情快照记录
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub symbol: Symbol,
    pub name: String,
    pub latest_price: Option<Decimal>,
    pub change_amount: Option<Decimal>,
    pub change_percent: Option<Decimal>,
    pub volume: u64, // 单位：手
    pub amount: Decimal,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub open: Option<Decimal>,
    pub prev_close: Option<Decimal>,
    pub turnover_rate: Option<Decimal>,
}

impl QuoteRecord {
    /// 展示名称，名称缺失时退回代码
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.symbol.code()
        } else {
            &self.name
        }
    }
}

/// 日线历史数据，按 (symbol, date) 唯一、日期升序
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryBar {
    pub date: Date,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64, // 单位：手
    pub amount: Decimal,
    pub pct_change: Decimal,
    pub change: Decimal,
    pub turnover: Decimal,
}

/// 历史数据集合
pub type HistoryBars = Vec<HistoryBar>;

/// 模拟持仓记录（来自注入配置，只读展示）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: Symbol,
    pub name: String,
    pub shares: u64,
    pub cost_price: Decimal,
    /// 行情不可用时的兜底现价
    pub fallback_price: Decimal,
}

impl Holding {
    /// 持仓市值 = 现价 × 数量
    pub fn market_value(&self, current: Decimal) -> Decimal {
        current * Decimal::from(self.shares)
    }

    /// 浮动盈亏百分比，成本为零时不计算
    pub fn unrealized_percent(&self, current: Decimal) -> Option<Decimal> {
        if self.cost_price.is_zero() {
            return None;
        }
        Some(((current - self.cost_price) / self.cost_price * Decimal::from(100)).round_dp(2))
    }
}

/// 交易操作类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    Buy,
    Sell,
    Open,
}

impl TradeAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Buy => "买入",
            Self::Sell => "卖出",
            Self::Open => "建仓",
        }
    }
}

/// 模拟交易记录（来自注入配置，只读展示）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TradeRecord {
    pub date: Date,
    pub action: TradeAction,
    pub symbol: Symbol,
    pub price: Decimal,
    pub shares: u64,
}
