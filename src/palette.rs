use std::path::Path;

use image::Rgb;

use crate::color_match::best_index_l1;
use crate::error::{QuantError, Result};
use crate::quantizer::NeuQuant;

/// 256 色 RGB 调色板
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub colors: [Rgb<u8>; 256],
}

impl Palette {
    /// 灰度默认调色板：用于兜底或缺省展示
    pub fn default_grayscale() -> Self {
        let mut arr = [Rgb([0u8; 3]); 256];
        for (i, c) in arr.iter_mut().enumerate() {
            let v = i as u8;
            *c = Rgb([v, v, v]);
        }
        Self { colors: arr }
    }

    /// 量化器以 B,G,R 顺序训练时，把它的颜色表转为 RGB 调色板
    pub fn from_neuquant_bgr(nq: &NeuQuant) -> Self {
        let mut arr = [Rgb([0u8; 3]); 256];
        for (c, [b, g, r]) in arr.iter_mut().zip(nq.palette()) {
            *c = Rgb([r, g, b]);
        }
        Self { colors: arr }
    }

    /// 从 `.pal` 的 768 字节（RGB*256）构建调色板
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 256 * 3 {
            return Err(QuantError::InvalidParameter(format!("PAL字节数不足: {}", bytes.len())));
        }
        let mut arr = [Rgb([0u8; 3]); 256];
        for (i, c) in arr.iter_mut().enumerate() {
            *c = Rgb([bytes[i * 3], bytes[i * 3 + 1], bytes[i * 3 + 2]]);
        }
        Ok(Self { colors: arr })
    }

    /// 转为 `.pal` 字节序列（RGB*256），也可直接作为 GIF 全局颜色表
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(256 * 3);
        for c in &self.colors {
            out.extend_from_slice(&c.0);
        }
        out
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_bytes(&std::fs::read(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_bytes())?;
        Ok(())
    }

    /// 暴力查找最接近的序号（不要求调色板来自量化器）
    pub fn nearest(&self, color: Rgb<u8>) -> u8 {
        best_index_l1(color.0, &self.colors.map(|c| c.0))
    }
}
