//! 配置解析
//!
//! 支持 TOML（主要）与 JSON 格式。

use contracts::{ContractError, PipelineOptions};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML（推荐）
    Toml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// 根据文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 解析 TOML 配置
pub fn parse_toml(content: &str) -> Result<PipelineOptions, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 解析 JSON 配置
pub fn parse_json(content: &str) -> Result<PipelineOptions, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 按指定格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<PipelineOptions, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}
