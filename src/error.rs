//! 量化过程中的错误类型

use thiserror::Error;

/// 量化 / 读写图片时可能出现的错误
#[derive(Debug, Error)]
pub enum QuantError {
    /// 参数不合法（采样率越界、样本流长度不是 3 的倍数等）
    #[error("参数无效: {0}")]
    InvalidParameter(String),

    /// 空输入：没有任何像素可供训练
    #[error("输入为空")]
    EmptyInput,

    #[error("不支持的图片格式: {0}")]
    UnsupportedFormat(String),

    #[error("图片读写失败: {0}")]
    Image(#[from] image::ImageError),

    #[error("GIF解码失败: {0}")]
    GifDecode(#[from] gif::DecodingError),

    #[error("GIF编码失败: {0}")]
    GifEncode(#[from] gif::EncodingError),

    #[error("I/O错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QuantError>;
