//! NeuQuant 神经网络颜色量化
//!
//! 用自组织映射把任意真彩色样本流压缩到 256 色调色板，再把每个像素映射到最近的调色板项。
//!
//! 生命周期：`Network`（训练，可变）→ `unbias` → `Unbiased` → `build_index` → `ColorIndex`（冻结，只读可并发）。
//! 一般直接使用 [`NeuQuant`]：
//!
//! ```
//! use neuquant::NeuQuant;
//!
//! let samples: Vec<u8> = (0..3 * 2000u32).map(|v| (v % 256) as u8).collect();
//! let nq = NeuQuant::new(&samples, 10).unwrap();
//! let idx = nq.lookup(12, 34, 56);
//! let [b, g, r] = nq.palette()[idx as usize];
//! # let _ = (b, g, r);
//! ```

pub mod color_match;
pub mod error;
pub mod gif_out;
pub mod image_io;
pub mod index;
pub mod learn;
pub mod network;
pub mod options;
pub mod palette;
pub mod params;
pub mod quantizer;

pub use error::{QuantError, Result};
pub use index::ColorIndex;
pub use learn::TrainStats;
pub use network::{Network, Neuron, Unbiased};
pub use options::QuantizeOptions;
pub use palette::Palette;
pub use quantizer::NeuQuant;
