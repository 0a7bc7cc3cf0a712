//! Mock 帧数据源
//!
//! 内存中的合成轨迹，用于测试及无轨迹文件时的试运行。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use contracts::{ContractError, FrameSource, PeriodicBox, RawFrame, ReadContent, SourceOpener};
use nalgebra::Vector3;
use tracing::trace;

/// 合成轨迹描述
#[derive(Debug, Clone)]
pub struct MockTrajectory {
    /// 每帧的源时间戳 (ps)
    pub times: Vec<f64>,

    /// 每帧原子数
    pub atoms: usize,

    /// `read` 失败时的局部帧索引
    pub fail_at: Option<usize>,

    /// 返回每帧前的休眠时间
    pub delay: Option<Duration>,
}

impl Default for MockTrajectory {
    fn default() -> Self {
        Self {
            times: Vec::new(),
            atoms: 4,
            fail_at: None,
            delay: None,
        }
    }
}

impl MockTrajectory {
    /// 使用给定时间戳创建轨迹
    pub fn new(times: Vec<f64>) -> Self {
        Self {
            times,
            ..Default::default()
        }
    }

    /// 从 `start` 开始、间隔 `dt` 的 `frames` 帧
    pub fn uniform(frames: usize, start: f64, dt: f64) -> Self {
        Self::new((0..frames).map(|i| start + dt * i as f64).collect())
    }

    /// 设置每帧原子数
    pub fn with_atoms(mut self, atoms: usize) -> Self {
        self.atoms = atoms;
        self
    }

    /// 读取局部索引 `index` 处的帧时失败
    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// 每帧前休眠
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// 基于 `MockTrajectory` 的帧数据源
///
/// 局部帧 `f` 的第 `i` 个原子位于 `(i, f, 0)`。
pub struct MockSource {
    path: PathBuf,
    trajectory: MockTrajectory,
    next: usize,
}

impl MockSource {
    /// 创建 mock 数据源
    pub fn new(path: impl Into<PathBuf>, trajectory: MockTrajectory) -> Self {
        Self {
            path: path.into(),
            trajectory,
            next: 0,
        }
    }
}

impl FrameSource for MockSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read(&mut self, content: ReadContent) -> Result<Option<RawFrame>, ContractError> {
        let index = self.next;

        if self.trajectory.fail_at == Some(index) {
            return Err(ContractError::source_read(
                &self.path,
                index as u64,
                "injected read failure",
            ));
        }

        let Some(&time) = self.trajectory.times.get(index) else {
            return Ok(None);
        };

        if let Some(delay) = self.trajectory.delay {
            std::thread::sleep(delay);
        }

        let coords = if content.trajectory {
            (0..self.trajectory.atoms)
                .map(|i| Vector3::new(i as f32, index as f32, 0.0))
                .collect()
        } else {
            Vec::new()
        };

        self.next += 1;
        trace!(path = %self.path.display(), index, time, "mock frame read");
        Ok(Some(RawFrame::new(
            coords,
            PeriodicBox::orthorhombic(10.0, 10.0, 10.0),
            time,
        )))
    }
}

/// 提供已注册 mock 轨迹的 opener
///
/// 记录每一个被请求打开的路径。
#[derive(Debug, Clone, Default)]
pub struct MockOpener {
    trajectories: HashMap<PathBuf, MockTrajectory>,
    opened: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockOpener {
    /// 创建空 opener
    pub fn new() -> Self {
        Self::default()
    }

    /// 在 `path` 下注册轨迹
    pub fn with(mut self, path: impl Into<PathBuf>, trajectory: MockTrajectory) -> Self {
        self.trajectories.insert(path.into(), trajectory);
        self
    }

    /// 按顺序返回已打开的路径
    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened
            .lock()
            .map(|opened| opened.clone())
            .unwrap_or_default()
    }
}

impl SourceOpener for MockOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, ContractError> {
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(path.to_path_buf());
        }

        let trajectory = self
            .trajectories
            .get(path)
            .cloned()
            .ok_or_else(|| ContractError::source_open(path, "no such mock trajectory"))?;

        Ok(Box::new(MockSource::new(path, trajectory)))
    }
}
