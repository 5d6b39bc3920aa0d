use thiserror::Error;

/// 日志模块错误类型
///
/// 只出现在严格解析路径上；设置阈值等日志操作本身从不返回错误
#[derive(Error, Debug)]
pub enum LevelError {
    #[error("unknown log level: {0}")]
    UnknownLevel(String),
    #[error("invalid message pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },
    #[error("config error: {0}")]
    Config(String),
}
