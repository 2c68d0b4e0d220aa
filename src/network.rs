//! 网络状态：256 个神经元及其学习统计量
//!
//! 训练期间颜色值带 `NET_BIAS_SHIFT` 位偏置；`unbias` 之后变为 0..255 的最终分量，
//! 并为每个神经元记录最终的调色板序号（tag）。

use crate::params::*;

/// 单个神经元：三通道颜色 + 调色板序号
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neuron {
    pub color: [i32; 3],
    /// `unbias` 之前无意义
    pub tag: u8,
}

/// 训练阶段的网络（可变，独占）
#[derive(Clone)]
pub struct Network {
    pub(crate) neurons: [Neuron; NET_SIZE],
    freq: [i32; NET_SIZE],
    bias: [i32; NET_SIZE],
    radpower: [i32; INIT_RAD],
}

/// 去偏置后、尚未排序的网络
#[derive(Clone, Debug)]
pub struct Unbiased {
    pub(crate) neurons: [Neuron; NET_SIZE],
}

impl Network {
    /// 神经元沿灰度对角线均匀分布，freq = 1/NET_SIZE，bias = 0
    pub(crate) fn new() -> Self {
        let mut neurons = [Neuron::default(); NET_SIZE];
        for (i, n) in neurons.iter_mut().enumerate() {
            let v = ((i as i32) << (NET_BIAS_SHIFT + 8)) / NET_SIZE as i32;
            n.color = [v; 3];
        }
        Self {
            neurons,
            freq: [INT_BIAS / NET_SIZE as i32; NET_SIZE],
            bias: [0; NET_SIZE],
            radpower: [0; INIT_RAD],
        }
    }

    pub fn neurons(&self) -> &[Neuron; NET_SIZE] {
        &self.neurons
    }

    /// 竞争：返回“偏置距离”最小的神经元位置
    ///
    /// 同时更新 freq / bias：被频繁选中的神经元 freq 升高、bias 变负，
    /// 之后更难获胜，从而让网络铺开到整个颜色分布上。
    /// `bias[i] = gamma * ((1/netsize) - freq[i])`
    pub(crate) fn contest(&mut self, sample: [i32; 3]) -> usize {
        let mut best_d = i32::MAX;
        let mut best_bias_d = i32::MAX;
        let mut best_pos = 0usize;
        let mut best_bias_pos = 0usize;

        for i in 0..NET_SIZE {
            let dist = l1(&self.neurons[i].color, &sample);
            if dist < best_d { best_d = dist; best_pos = i; }
            let bias_dist = dist - (self.bias[i] >> (INT_BIAS_SHIFT - NET_BIAS_SHIFT));
            if bias_dist < best_bias_d { best_bias_d = bias_dist; best_bias_pos = i; }
            let beta_freq = self.freq[i] >> BETA_SHIFT;
            self.freq[i] -= beta_freq;
            self.bias[i] += beta_freq << GAMMA_SHIFT;
        }
        self.freq[best_pos] += BETA;
        self.bias[best_pos] -= BETA_GAMMA;
        best_bias_pos
    }

    /// 将神经元 `i` 按 alpha/INIT_ALPHA 的比例拉向样本
    pub(crate) fn alter_single(&mut self, alpha: i32, i: usize, sample: [i32; 3]) {
        nudge(&mut self.neurons[i].color, alpha, INIT_ALPHA, &sample);
    }

    /// 拉动数组位置在 `i` 前后 `rad` 以内的邻居（按数组位置而非颜色距离），
    /// 贡献按 radpower 表随距离衰减
    pub(crate) fn alter_neigh(&mut self, rad: usize, i: usize, sample: [i32; 3]) {
        let i = i as isize;
        let rad = rad as isize;
        let lo = (i - rad).max(-1);
        let hi = (i + rad).min(NET_SIZE as isize);

        let (mut j, mut k, mut m) = (i + 1, i - 1, 1usize);
        while j < hi || k > lo {
            let a = self.radpower[m];
            m += 1;
            if j < hi {
                nudge(&mut self.neurons[j as usize].color, a, ALPHA_RAD_BIAS, &sample);
                j += 1;
            }
            if k > lo {
                nudge(&mut self.neurons[k as usize].color, a, ALPHA_RAD_BIAS, &sample);
                k -= 1;
            }
        }
    }

    /// 半径变化后重新生成 radpower 表
    pub(crate) fn set_radpower(&mut self, alpha: i32, rad: usize) {
        let rad = rad as i32;
        let rad2 = rad * rad;
        for (d, slot) in self.radpower.iter_mut().take(rad as usize).enumerate() {
            let d = d as i32;
            *slot = alpha * (((rad2 - d * d) * RAD_BIAS) / rad2);
        }
    }

    /// 去偏置：颜色右移回 0..255，并把当前位置记作调色板序号。只能在训练结束后调用一次。
    pub(crate) fn unbias(self) -> Unbiased {
        let mut neurons = self.neurons;
        for (i, n) in neurons.iter_mut().enumerate() {
            for c in &mut n.color {
                *c = (*c >> NET_BIAS_SHIFT).clamp(0, 255);
            }
            n.tag = i as u8;
        }
        Unbiased { neurons }
    }
}

impl Unbiased {
    pub fn neurons(&self) -> &[Neuron; NET_SIZE] {
        &self.neurons
    }
}

/// 曼哈顿距离
#[inline]
pub(crate) fn l1(a: &[i32; 3], b: &[i32; 3]) -> i32 {
    (a[0] - b[0]).abs() + (a[1] - b[1]).abs() + (a[2] - b[2]).abs()
}

#[inline]
fn nudge(color: &mut [i32; 3], factor: i32, scale: i32, sample: &[i32; 3]) {
    for (c, s) in color.iter_mut().zip(sample) {
        *c -= factor * (*c - s) / scale;
    }
}
