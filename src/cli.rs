use std::path::PathBuf;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    /// 启动时的分析周期（天），覆盖配置文件
    pub days: Option<u16>,
    /// 行情缓存 TTL（秒），覆盖配置文件
    pub ttl_secs: Option<u64>,
    /// 配置文件路径，覆盖默认位置
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run(Args),
    Help,
    Version,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: i32,
    pub message: String,
}

#[must_use]
pub fn help_text(bin_name: &str) -> String {
    format!(
        "财务突破系统\n\n用法：\n  {bin_name} [选项]\n\n选项：\n  -h, --help           显示帮助信息\n  -V, --version        显示版本信息\n      --days <天数>    分析周期，30 ~ 365 天\n      --ttl <秒数>     行情缓存 TTL，60 ~ 300 秒\n      --config <路径>  指定配置文件\n"
    )
}

#[must_use]
pub fn version_text() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

pub fn parse_args<I, S>(args: I) -> Result<Command, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parsed = Args::default();
    let mut show_help = false;
    let mut show_version = false;

    let mut iter = args.into_iter().map(Into::into);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => show_help = true,
            "-V" | "--version" => show_version = true,
            "--days" => {
                let value = expect_value(&arg, iter.next())?;
                let days = value.parse::<u16>().map_err(|_| invalid_value(&arg, &value))?;
                parsed.days = Some(days);
            }
            "--ttl" => {
                let value = expect_value(&arg, iter.next())?;
                let secs = value.parse::<u64>().map_err(|_| invalid_value(&arg, &value))?;
                parsed.ttl_secs = Some(secs);
            }
            "--config" => {
                let value = expect_value(&arg, iter.next())?;
                parsed.config = Some(PathBuf::from(value));
            }
            _ if arg.starts_with('-') => {
                return Err(ParseError {
                    code: 2,
                    message: format!("未知选项：{arg}\n\n{}", help_text("caitu")),
                });
            }
            _ => {
                return Err(ParseError {
                    code: 2,
                    message: format!("不支持的位置参数：{arg}\n\n{}", help_text("caitu")),
                });
            }
        }
    }

    if show_help {
        return Ok(Command::Help);
    }

    if show_version {
        return Ok(Command::Version);
    }

    Ok(Command::Run(parsed))
}

fn expect_value(option: &str, value: Option<String>) -> Result<String, ParseError> {
    value.ok_or_else(|| ParseError {
        code: 2,
        message: format!("选项 {option} 缺少参数\n\n{}", help_text("caitu")),
    })
}

fn invalid_value(option: &str, value: &str) -> ParseError {
    ParseError {
        code: 2,
        message: format!("选项 {option} 的参数无效：{value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_args, Command};
    use std::path::PathBuf;

    #[test]
    fn parses_default_run_command() {
        let result = parse_args(Vec::<String>::new());
        assert!(matches!(result, Ok(Command::Run(_))));
    }

    #[test]
    fn parses_help_command() {
        let result = parse_args(["--help"]);
        assert_eq!(result, Ok(Command::Help));
    }

    #[test]
    fn parses_version_command() {
        let result = parse_args(["--version"]);
        assert_eq!(result, Ok(Command::Version));
    }

    #[test]
    fn parses_run_options() {
        let result = parse_args(["--days", "180", "--ttl", "120", "--config", "/tmp/c.json"]);
        match result {
            Ok(Command::Run(args)) => {
                assert_eq!(args.days, Some(180));
                assert_eq!(args.ttl_secs, Some(120));
                assert_eq!(args.config, Some(PathBuf::from("/tmp/c.json")));
            }
            other => panic!("expected run command, got {other:?}"),
        }
    }

    #[test]
    fn fails_on_missing_option_value() {
        let err = parse_args(["--days"]).expect_err("expected parse error");
        assert_eq!(err.code, 2);
        assert!(err.message.contains("缺少参数"));
    }

    #[test]
    fn fails_on_non_numeric_days() {
        let err = parse_args(["--days", "abc"]).expect_err("expected parse error");
        assert_eq!(err.code, 2);
        assert!(err.message.contains("参数无效"));
    }

    #[test]
    fn fails_on_unknown_option() {
        let err = parse_args(["--unknown"]).expect_err("expected parse error");
        assert_eq!(err.code, 2);
        assert!(err.message.contains("未知选项"));
    }

    #[test]
    fn fails_on_positional_argument() {
        let err = parse_args(["abc"]).expect_err("expected parse error");
        assert_eq!(err.code, 2);
        assert!(err.message.contains("不支持的位置参数"));
    }
}
