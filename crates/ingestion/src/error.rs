//! Ingestion 错误类型

use thiserror::Error;

/// 读取阶段错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 停止标记发出后仍尝试发送
    #[error("channel '{channel}' is stopped, no more items can be sent")]
    ChannelStopped {
        /// 通道名称
        channel: String,
    },

    /// 所有接收端均已关闭
    #[error("channel '{channel}' has no receivers left")]
    ChannelClosed {
        /// 通道名称
        channel: String,
    },

    /// 读取线程启动失败
    #[error("failed to spawn reader thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
