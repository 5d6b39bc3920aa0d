//! 配置类型
//!
//! registry 与 logger 的配置都可以从 JSON5 / YAML / TOML 加载

use crate::appender::ConsoleAppenderConfig;
use crate::error::LevelError;
use crate::level::{LevelSpec, Severity};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::fmt;
use std::path::Path;

/// 初始级别的环境变量名
pub const LEVEL_ENV_VAR: &str = "LLT_DEBUG";

/// 缩进：空格个数或原样使用的字符串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Indent {
    Spaces(usize),
    Text(String),
}

impl Indent {
    /// 归一化为字符串：N 个空格，或原字符串
    pub fn to_whitespace(&self) -> String {
        match self {
            Indent::Spaces(n) => " ".repeat(*n),
            Indent::Text(text) => text.clone(),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Text(String::new())
    }
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_whitespace())
    }
}

impl From<usize> for Indent {
    fn from(n: usize) -> Self {
        Indent::Spaces(n)
    }
}

impl From<&str> for Indent {
    fn from(text: &str) -> Self {
        Indent::Text(text.to_string())
    }
}

impl From<String> for Indent {
    fn from(text: String) -> Self {
        Indent::Text(text)
    }
}

impl From<&String> for Indent {
    fn from(text: &String) -> Self {
        Indent::Text(text.clone())
    }
}

/// LevelRegistry 配置
#[derive(Debug, Clone, Deserialize, SmartDefault, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    /// 初始级别，未设置时使用 info
    pub level: Option<LevelSpec>,

    /// ERROR! / WARNING! 标记与级别诊断是否着色
    #[default = false]
    pub colored: bool,

    /// 终端输出器配置，`LevelRegistry::new` 据此创建输出通道
    pub appender: ConsoleAppenderConfig,
}

impl RegistryConfig {
    /// 从 LLT_DEBUG 环境变量读取初始级别
    pub fn from_env() -> Self {
        Self::from_env_var(LEVEL_ENV_VAR)
    }

    /// 从指定环境变量读取初始级别
    pub fn from_env_var(name: &str) -> Self {
        let level = std::env::var(name)
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| LevelSpec::parse_env(&raw));

        Self {
            level,
            ..Self::default()
        }
    }

    pub fn from_json(json_str: &str) -> Result<Self> {
        Ok(json5::from_str(json_str)?)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// 按文件扩展名选择格式加载
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match extension_of(path).as_deref() {
            Some("json") | Some("json5") => Self::from_json(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("toml") => Self::from_toml(&content),
            _ => Err(unsupported_format(path)),
        }
    }
}

/// Logger 配置
#[derive(Debug, Clone, Deserialize, SmartDefault, PartialEq)]
#[serde(default)]
pub struct LoggerConfig {
    /// 标题，非空时输出为 `<title>: ` 前缀
    pub title: String,

    /// 实例自身的缩进前缀
    pub indent: Indent,

    /// `log` 与 `bare` 使用的默认级别
    #[default(Severity::Info)]
    pub default: Severity,
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn indent(mut self, indent: impl Into<Indent>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn default_severity(mut self, severity: Severity) -> Self {
        self.default = severity;
        self
    }

    pub fn from_json(json_str: &str) -> Result<Self> {
        Ok(json5::from_str(json_str)?)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

fn unsupported_format(path: &Path) -> anyhow::Error {
    LevelError::Config(format!(
        "unsupported config format: {}",
        path.display()
    ))
    .into()
}
