//! 配置校验
//!
//! 校验规则：
//! - trajectory 块至少包含一个文件
//! - buffer_size >= 1
//! - 消费者名称非空且唯一

use std::collections::HashSet;

use contracts::{ContractError, PipelineOptions};

/// 校验原始配置
///
/// 返回遇到的第一个错误，或 Ok(())。
pub fn validate(options: &PipelineOptions) -> Result<(), ContractError> {
    validate_files(options)?;
    validate_buffer_size(options)?;
    validate_consumers(options)?;
    Ok(())
}

/// trajectory 块必须列出文件
fn validate_files(options: &PipelineOptions) -> Result<(), ContractError> {
    if options.trajectory.files.is_empty() {
        return Err(ContractError::config_validation(
            "trajectory.files",
            "file list cannot be empty",
        ));
    }
    Ok(())
}

/// 通道至少能容纳一帧
fn validate_buffer_size(options: &PipelineOptions) -> Result<(), ContractError> {
    if options.buffer_size == 0 {
        return Err(ContractError::config_validation(
            "buffer_size",
            "buffer_size must be >= 1, got 0",
        ));
    }
    Ok(())
}

/// 消费者名称用于标识线程和日志
fn validate_consumers(options: &PipelineOptions) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, consumer) in options.consumers.iter().enumerate() {
        if consumer.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("consumers[{}].name", idx),
                "consumer name cannot be empty",
            ));
        }
        if !seen.insert(&consumer.name) {
            return Err(ContractError::config_validation(
                format!("consumers[name={}]", consumer.name),
                "duplicate consumer name",
            ));
        }
    }
    Ok(())
}
