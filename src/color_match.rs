use crate::index::ColorIndex;
use crate::params::NET_SIZE;

// 颜色匹配：在冻结的网络中寻找与目标颜色 L1 距离最小的调色板序号
// 神经元按通道 1 排序，从 netindex[c1] 出发向两侧扫描；
// 一侧的通道 1 差值本身已不小于当前最优距离时，该侧不可能更优，直接停止。

/// L1 距离上界（3 * 255 < 1000）
const MAX_DIST: i32 = 1000;

impl ColorIndex {
    /// 返回最接近 (c0, c1, c2) 的调色板序号
    #[inline]
    pub fn lookup(&self, c0: u8, c1: u8, c2: u8) -> u8 {
        self.lookup_with_distance(c0, c1, c2).0
    }

    /// 同 `lookup`，并返回对应的 L1 距离；距离相等时取先扫描到的
    pub fn lookup_with_distance(&self, c0: u8, c1: u8, c2: u8) -> (u8, u32) {
        let (c0, c1, c2) = (c0 as i32, c1 as i32, c2 as i32);
        let mut best_d = MAX_DIST;
        let mut best = 0u8;

        let mut i = self.netindex[c1 as usize];
        // j 为 i-1，用 isize 以便越过 0
        let mut j = i as isize - 1;

        while i < NET_SIZE || j >= 0 {
            if i < NET_SIZE {
                let p = &self.neurons[i];
                let dist = p.color[1] - c1;
                if dist >= best_d {
                    i = NET_SIZE;
                } else {
                    i += 1;
                    if let Some(d) = finish(p.color, dist.abs(), c0, c2, best_d) { best_d = d; best = p.tag; }
                }
            }
            if j >= 0 {
                let p = &self.neurons[j as usize];
                let dist = c1 - p.color[1];
                if dist >= best_d {
                    j = -1;
                } else {
                    j -= 1;
                    if let Some(d) = finish(p.color, dist.abs(), c0, c2, best_d) { best_d = d; best = p.tag; }
                }
            }
        }
        (best, best_d as u32)
    }
}

/// 在通道 1 的部分距离上补上另外两个通道；超过当前最优时尽早放弃
#[inline]
fn finish(color: [i32; 3], partial: i32, c0: i32, c2: i32, best_d: i32) -> Option<i32> {
    let d = partial + (color[0] - c0).abs();
    if d >= best_d { return None; }
    let d = d + (color[2] - c2).abs();
    if d < best_d { Some(d) } else { None }
}

/// 暴力搜索：在 `palette` 中返回与 `color` L1 距离最小的序号（相等取较小序号）
pub fn best_index_l1(color: [u8; 3], palette: &[[u8; 3]]) -> u8 {
    let mut best = 0u8;
    let mut best_d = u32::MAX;
    for (i, p) in palette.iter().enumerate().take(256) {
        let d = dist_l1(color, *p);
        if d < best_d { best_d = d; best = i as u8; if d == 0 { break; } }
    }
    best
}

#[inline]
pub fn dist_l1(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter().zip(b.iter()).map(|(&x, &y)| x.abs_diff(y) as u32).sum()
}
