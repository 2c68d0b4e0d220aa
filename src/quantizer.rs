//! 对外入口：构建（初始化 → 训练 → 去偏置 → 建索引）、取调色板、查询

use tracing::info;

use crate::error::Result;
use crate::index::ColorIndex;
use crate::learn::{check_samples, learn, TrainStats};
use crate::network::Network;
use crate::options::QuantizeOptions;
use crate::params::NET_SIZE;

/// 训练完成并冻结的量化器
///
/// 三个通道的顺序由调用方决定（例如 B,G,R），`palette` / `lookup` 必须使用同样的顺序；
/// 查找索引建立在通道 1 上。构建之后不可变，`lookup` 可并发调用。
#[derive(Clone, Debug)]
pub struct NeuQuant {
    index: ColorIndex,
    stats: TrainStats,
}

impl NeuQuant {
    /// 在交织的三通道样本流上训练 256 色调色板
    pub fn new(samples: &[u8], sample_rate: u32) -> Result<Self> {
        Self::with_options(samples, &QuantizeOptions::with_sample_rate(sample_rate))
    }

    pub fn with_options(samples: &[u8], opts: &QuantizeOptions) -> Result<Self> {
        opts.validate()?;
        check_samples(samples)?;

        let mut net = Network::new();
        let stats = learn(&mut net, samples, opts.sample_rate)?;
        let index = net.unbias().build_index();
        info!(bytes = samples.len(), samples = stats.samples, sample_rate = stats.sample_rate, "量化完成");
        Ok(Self { index, stats })
    }

    /// 按调色板序号排列的 256 个颜色
    pub fn palette(&self) -> [[u8; 3]; NET_SIZE] {
        let mut out = [[0u8; 3]; NET_SIZE];
        for n in self.index.neurons() {
            out[n.tag as usize] = [n.color[0] as u8, n.color[1] as u8, n.color[2] as u8];
        }
        out
    }

    /// 768 字节的颜色表，通道顺序与输入一致
    pub fn color_map(&self) -> Vec<u8> {
        self.palette().iter().flatten().copied().collect()
    }

    /// 最接近的调色板序号
    #[inline]
    pub fn lookup(&self, c0: u8, c1: u8, c2: u8) -> u8 {
        self.index.lookup(c0, c1, c2)
    }

    pub fn lookup_with_distance(&self, c0: u8, c1: u8, c2: u8) -> (u8, u32) {
        self.index.lookup_with_distance(c0, c1, c2)
    }

    pub fn stats(&self) -> &TrainStats {
        &self.stats
    }

    pub fn index(&self) -> &ColorIndex {
        &self.index
    }
}
