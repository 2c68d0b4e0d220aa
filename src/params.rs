//! 定点数调度参数
//!
//! 所有移位常量都表示一个定点缩放因子；训练过程全部使用整数运算（截断除法），
//! 收敛行为依赖于这些精确的数值。

/// 网络中的神经元个数（即调色板大小）
pub const NET_SIZE: usize = 256;
pub const MAX_NET_POS: usize = NET_SIZE - 1;

// 四个接近 500 的素数：假设没有图片长度能同时被这四个数整除
pub const PRIME1: usize = 499;
pub const PRIME2: usize = 491;
pub const PRIME3: usize = 487;
pub const PRIME4: usize = 503;

/// 低于此字节数的样本流强制逐像素采样，步长取 3
pub const MIN_PICTURE_BYTES: usize = 3 * PRIME4;

/// 颜色值的偏置位数
pub const NET_BIAS_SHIFT: u32 = 4;
/// 学习周期数
pub const N_CYCLES: usize = 100;

// freq / bias
pub const INT_BIAS_SHIFT: u32 = 16;
pub const INT_BIAS: i32 = 1 << INT_BIAS_SHIFT;
pub const GAMMA_SHIFT: u32 = 10;
pub const BETA_SHIFT: u32 = 10;
/// beta = 1/1024
pub const BETA: i32 = INT_BIAS >> BETA_SHIFT;
pub const BETA_GAMMA: i32 = INT_BIAS << (GAMMA_SHIFT - BETA_SHIFT);

// 半径：每个周期衰减 1/30
pub const INIT_RAD: usize = NET_SIZE >> 3;
pub const RADIUS_BIAS_SHIFT: u32 = 6;
pub const RADIUS_BIAS: i32 = 1 << RADIUS_BIAS_SHIFT;
pub const INIT_RADIUS: i32 = INIT_RAD as i32 * RADIUS_BIAS;
pub const RADIUS_DEC: i32 = 30;

// alpha 初值为 1.0
pub const ALPHA_BIAS_SHIFT: u32 = 10;
pub const INIT_ALPHA: i32 = 1 << ALPHA_BIAS_SHIFT;

// radpower 预计算用
pub const RAD_BIAS_SHIFT: u32 = 8;
pub const RAD_BIAS: i32 = 1 << RAD_BIAS_SHIFT;
pub const ALPHA_RAD_B_SHIFT: u32 = ALPHA_BIAS_SHIFT + RAD_BIAS_SHIFT;
pub const ALPHA_RAD_BIAS: i32 = 1 << ALPHA_RAD_B_SHIFT;

/// 合法采样率范围
pub const MIN_SAMPLE_RATE: u32 = 1;
pub const MAX_SAMPLE_RATE: u32 = 30;
/// 缺省采样间隔
pub const DEFAULT_SAMPLE_RATE: u32 = 10;
