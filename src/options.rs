use serde::{Deserialize, Serialize};

use crate::error::{QuantError, Result};
use crate::params::{DEFAULT_SAMPLE_RATE, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};

/// 量化配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantizeOptions {
    /// 采样间隔 1..=30；1 表示每个像素都参与训练
    pub sample_rate: u32,
    /// 重映射像素时是否按行并行
    pub parallel: bool,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self { sample_rate: DEFAULT_SAMPLE_RATE, parallel: true }
    }
}

impl QuantizeOptions {
    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self { sample_rate, ..Default::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(QuantError::InvalidParameter(format!(
                "采样率 {} 超出范围 {}..={}",
                self.sample_rate, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
            )));
        }
        Ok(())
    }
}
