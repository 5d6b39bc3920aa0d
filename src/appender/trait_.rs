use anyhow::Result;

/// 日志输出器 trait
///
/// 所有 logger 共享的按行输出通道，每次调用写入一行
pub trait LogAppender: Send + Sync {
    /// 输出一行日志（由实现负责追加换行）
    fn append(&self, line: &str) -> Result<()>;

    /// 刷新缓冲区（默认实现为空操作）
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
