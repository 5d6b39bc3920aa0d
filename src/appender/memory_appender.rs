use crate::appender::LogAppender;
use anyhow::Result;
use std::sync::Mutex;

/// 内存输出器
///
/// 把每一行保存在内存中，用于测试时替换终端输出
#[derive(Debug, Default)]
pub struct MemoryAppender {
    lines: Mutex<Vec<String>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已输出行的快照
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl LogAppender for MemoryAppender {
    fn append(&self, line: &str) -> Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
        Ok(())
    }
}
