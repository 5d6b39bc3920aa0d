use crate::appender::LogAppender;
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::io::{self, Write};

/// 输出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, SmartDefault)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Stdout,
    Stderr,
}

/// ConsoleAppender 配置
#[derive(Debug, Clone, Deserialize, SmartDefault, PartialEq)]
#[serde(default)]
pub struct ConsoleAppenderConfig {
    /// 输出目标
    pub target: Target,

    /// 每行写入后是否立即刷新
    #[default = true]
    pub auto_flush: bool,
}

/// 终端输出器
///
/// 将日志输出到标准输出
pub struct ConsoleAppender {
    config: ConsoleAppenderConfig,
}

impl ConsoleAppender {
    pub fn new(config: ConsoleAppenderConfig) -> Self {
        Self { config }
    }

    fn write_line(out: &mut impl Write, line: &str, auto_flush: bool) -> Result<()> {
        writeln!(out, "{}", line)?;
        if auto_flush {
            out.flush()?;
        }
        Ok(())
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new(ConsoleAppenderConfig::default())
    }
}

impl LogAppender for ConsoleAppender {
    fn append(&self, line: &str) -> Result<()> {
        match self.config.target {
            Target::Stdout => Self::write_line(&mut io::stdout().lock(), line, self.config.auto_flush),
            Target::Stderr => Self::write_line(&mut io::stderr().lock(), line, self.config.auto_flush),
        }
    }

    fn flush(&self) -> Result<()> {
        match self.config.target {
            Target::Stdout => io::stdout().lock().flush()?,
            Target::Stderr => io::stderr().lock().flush()?,
        }
        Ok(())
    }
}

crate::impl_from!(ConsoleAppenderConfig => ConsoleAppender);
