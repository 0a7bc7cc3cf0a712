//! # 集成测试
//!
//! 轨迹流水线的跨 crate 测试。
//!
//! 覆盖：
//! - 完整流水线中的帧选择（步长、范围、时间截止）
//! - 扇出顺序与帧共享
//! - 背压与故障传播
//! - 从磁盘配置文件出发的端到端运行

#[cfg(test)]
mod support;

#[cfg(test)]
mod selection_tests;

#[cfg(test)]
mod fanout_tests;

#[cfg(test)]
mod failure_tests;

#[cfg(test)]
mod e2e_tests;
