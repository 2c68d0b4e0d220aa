//! 索引构建：按通道 1 对神经元做选择排序，并生成 netindex 查找表

use crate::network::{Neuron, Unbiased};
use crate::params::{MAX_NET_POS, NET_SIZE};

/// 冻结后的网络：按通道 1 升序排列的神经元 + 通道 1 取值到数组位置的索引
///
/// 构建后不可变，可在任意多个线程间共享只读查询。
#[derive(Clone, Debug)]
pub struct ColorIndex {
    pub(crate) neurons: [Neuron; NET_SIZE],
    pub(crate) netindex: [usize; 256],
}

impl Unbiased {
    /// 选择排序 + 构建 netindex。消耗去偏置网络，之后只能查询。
    pub(crate) fn build_index(self) -> ColorIndex {
        let mut neurons = self.neurons;
        let mut netindex = [0usize; 256];
        let mut previous_col = 0usize;
        let mut start_pos = 0usize;

        for i in 0..NET_SIZE {
            // 在 i..NET_SIZE 中找通道 1 最小的
            let mut small_pos = i;
            let mut small_val = neurons[i].color[1];
            for (j, n) in neurons.iter().enumerate().skip(i + 1) {
                if n.color[1] < small_val { small_pos = j; small_val = n.color[1]; }
            }
            if i != small_pos { neurons.swap(i, small_pos); }

            let small_val = small_val as usize;
            if small_val != previous_col {
                netindex[previous_col] = (start_pos + i) >> 1;
                for slot in &mut netindex[previous_col + 1..small_val] { *slot = i; }
                previous_col = small_val;
                start_pos = i;
            }
        }
        netindex[previous_col] = (start_pos + MAX_NET_POS) >> 1;
        for slot in &mut netindex[previous_col + 1..] { *slot = MAX_NET_POS; }

        ColorIndex { neurons, netindex }
    }
}

impl ColorIndex {
    /// 按通道 1 排序后的神经元
    pub fn neurons(&self) -> &[Neuron; NET_SIZE] {
        &self.neurons
    }

    pub fn netindex(&self) -> &[usize; 256] {
        &self.netindex
    }
}
