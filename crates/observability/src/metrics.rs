//! 流水线指标
//!
//! 对 `metrics` 宏的薄封装，以及用于运行汇总的内存 Welford 聚合器。

use metrics::{counter, gauge, histogram};

/// 记录从数据源读取的一帧（无论是否被接受）
pub fn record_frame_read() {
    counter!("trajstream_frames_read_total").increment(1);
}

/// 记录通过过滤器的一帧
pub fn record_frame_accepted(absolute_frame: u64) {
    counter!("trajstream_frames_accepted_total").increment(1);
    gauge!("trajstream_last_accepted_frame").set(absolute_frame as f64);
}

/// 记录被过滤器拒绝的一帧
pub fn record_frame_rejected() {
    counter!("trajstream_frames_rejected_total").increment(1);
}

/// 记录消费者的一次 `process` 调用
pub fn record_frame_processed(consumer: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "trajstream_frames_processed_total",
        "consumer" => consumer.to_string(),
        "status" => status
    )
    .increment(1);
}

/// 记录消费者处理一帧的耗时
pub fn record_process_latency_ms(consumer: &str, latency_ms: f64) {
    histogram!(
        "trajstream_process_latency_ms",
        "consumer" => consumer.to_string()
    )
    .record(latency_ms);
}

/// 记录通道当前深度
pub fn record_channel_depth(channel: &str, depth: usize) {
    gauge!(
        "trajstream_channel_depth",
        "channel" => channel.to_string()
    )
    .set(depth as f64);
}

/// 统计摘要
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计 (Welford 算法)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加样本
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// 生成摘要快照
    pub fn summary(&self) -> StatsSummary {
        StatsSummary::from(self)
    }
}
