//! PipelineOptions - Config Loader 的输入
//!
//! 配置文件中的原始选项。数值边界以 `-1` 表示"未设置"，
//! 由 `config_loader` 解析为 `PipelineConfig`。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整配置文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 每个帧通道的容量
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// 每读取 N 帧记录一次日志 (0 = 关闭)
    #[serde(default)]
    pub log_interval: u64,

    /// 运行前将解析后的配置以 JSON 写入该文件
    #[serde(default)]
    pub dump_input: Option<PathBuf>,

    /// 轨迹块：文件与帧选择
    pub trajectory: TrajectoryOptions,

    /// 要挂载的消费者
    #[serde(default)]
    pub consumers: Vec<ConsumerConfig>,
}

/// 轨迹块
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryOptions {
    /// 结构、拓扑与轨迹文件，顺序任意。
    /// 轨迹文件按出现顺序读取。
    pub files: Vec<PathBuf>,

    /// 首个接受的帧 (-1 = 不限)
    #[serde(default = "unset_i64")]
    pub first_frame: i64,

    /// 最后读取的帧 (-1 = 不限)
    #[serde(default = "unset_i64")]
    pub last_frame: i64,

    /// 首个接受的时间，ps (-1 = 不限)
    #[serde(default = "unset_f64")]
    pub first_time: f64,

    /// 最后读取的时间，ps (-1 = 不限)
    #[serde(default = "unset_f64")]
    pub last_time: f64,

    /// 每 N 个绝对帧接受一帧 (-1 或 0 = 全部帧)
    #[serde(default = "unset_i64")]
    pub skip: i64,

    /// 以帧数计的窗口大小，透传给消费者 (-1 = 无)
    #[serde(default = "unset_i64")]
    pub window_size_frames: i64,

    /// 以时间计的窗口大小，透传给消费者 (-1 = 无)
    #[serde(default = "unset_f64")]
    pub window_size_time: f64,

    /// 覆盖源时间戳时第 0 帧的时间 (-1 = 关闭)
    #[serde(default = "unset_f64")]
    pub custom_start_time: f64,

    /// 覆盖源时间戳时的时间步长 (-1 = 关闭)
    #[serde(default = "unset_f64")]
    pub custom_dt: f64,
}

impl TrajectoryOptions {
    /// 使用给定文件创建轨迹块，其余选项均未设置
    pub fn with_files(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            first_frame: -1,
            last_frame: -1,
            first_time: -1.0,
            last_time: -1.0,
            skip: -1,
            window_size_frames: -1,
            window_size_time: -1.0,
            custom_start_time: -1.0,
            custom_dt: -1.0,
        }
    }
}

/// 默认通道容量
pub const DEFAULT_BUFFER_SIZE: usize = 10;

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

fn unset_i64() -> i64 {
    -1
}

fn unset_f64() -> f64 {
    -1.0
}

/// 消费者配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerConfig {
    /// 消费者名称
    pub name: String,

    /// 消费者类型
    pub kind: ConsumerKind,

    /// 类型相关参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// 内置消费者类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumerKind {
    /// 记录进度与运行摘要
    Log,
    /// 将逐帧 JSON 行写入文件
    Summary,
}
