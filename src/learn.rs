//! 训练主循环
//!
//! 以固定步长（3 的倍数，且与样本流长度互素）在样本流中取像素，共 N_CYCLES 个周期。
//! 每个周期末衰减 alpha 和半径；半径降到 1 以下后只做单神经元更新。

use tracing::{debug, trace, warn};

use crate::error::{QuantError, Result};
use crate::network::Network;
use crate::options::QuantizeOptions;
use crate::params::*;

/// 训练统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainStats {
    /// 实际使用的采样率（小图强制为 1）
    pub sample_rate: u32,
    /// 取样步长（字节）
    pub step: usize,
    pub alpha_decay: i32,
    /// 参与训练的像素数
    pub samples: usize,
    /// 完成的周期数
    pub cycles: usize,
    pub final_alpha: i32,
}

/// 选取步长：优先使用不能整除长度的素数，小图逐像素
pub fn select_step(len: usize) -> usize {
    if len < MIN_PICTURE_BYTES {
        3
    } else if len % PRIME1 != 0 {
        3 * PRIME1
    } else if len % PRIME2 != 0 {
        3 * PRIME2
    } else if len % PRIME3 != 0 {
        3 * PRIME3
    } else {
        3 * PRIME4
    }
}

/// 采样率越高，学习率退火越慢
pub fn alpha_decay(sample_rate: u32) -> i32 {
    30 + (sample_rate as i32 - 1) / 3
}

/// 样本流必须非空且长度为 3 的倍数，否则步进会落到像素中间并越界
pub(crate) fn check_samples(samples: &[u8]) -> Result<()> {
    if samples.is_empty() { return Err(QuantError::EmptyInput); }
    if samples.len() % 3 != 0 {
        return Err(QuantError::InvalidParameter(format!("样本流长度 {} 不是 3 的倍数", samples.len())));
    }
    Ok(())
}

/// 在 `samples` 上训练网络。参数在改动网络之前校验。
pub(crate) fn learn(net: &mut Network, samples: &[u8], sample_rate: u32) -> Result<TrainStats> {
    QuantizeOptions::with_sample_rate(sample_rate).validate()?;
    check_samples(samples)?;
    let len = samples.len();
    let sample_rate = if len < MIN_PICTURE_BYTES {
        if sample_rate != 1 { warn!(len, requested = sample_rate, "样本过少，采样率强制为 1"); }
        1
    } else {
        sample_rate
    };
    let alpha_dec = alpha_decay(sample_rate);
    let sample_pixels = len / (3 * sample_rate as usize);
    let delta = (sample_pixels / N_CYCLES).max(1);
    let step = select_step(len);

    let mut alpha = INIT_ALPHA;
    let mut radius = INIT_RADIUS;
    let mut rad = (radius >> RADIUS_BIAS_SHIFT) as usize;
    net.set_radpower(alpha, rad);

    debug!(len, sample_rate, step, alpha_dec, sample_pixels, "开始训练: 初始半径={}", rad);

    let mut pix = 0usize;
    let mut cycles = 0usize;
    for i in 1..=sample_pixels {
        let sample = [
            (samples[pix] as i32) << NET_BIAS_SHIFT,
            (samples[pix + 1] as i32) << NET_BIAS_SHIFT,
            (samples[pix + 2] as i32) << NET_BIAS_SHIFT,
        ];
        let winner = net.contest(sample);
        net.alter_single(alpha, winner, sample);
        if rad != 0 { net.alter_neigh(rad, winner, sample); }

        pix += step;
        if pix >= len { pix -= len; }

        if i % delta == 0 {
            alpha -= alpha / alpha_dec;
            radius -= radius / RADIUS_DEC;
            rad = (radius >> RADIUS_BIAS_SHIFT) as usize;
            if rad <= 1 { rad = 0; }
            net.set_radpower(alpha, rad);
            cycles += 1;
            trace!(cycle = cycles, alpha, rad, "周期结束");
        }
    }

    debug!(cycles, final_alpha = alpha, "训练结束");
    Ok(TrainStats { sample_rate, step, alpha_decay: alpha_dec, samples: sample_pixels, cycles, final_alpha: alpha })
}
