use std::io::Read;
use std::path::Path;

use image::{Rgb, RgbImage};
use rayon::prelude::*;
use tracing::info;

use crate::color_match::dist_l1;
use crate::error::{QuantError, Result};
use crate::options::QuantizeOptions;
use crate::palette::Palette;
use crate::quantizer::NeuQuant;

/// 一帧 RGB 图像；delay 单位 1/100 秒（静态图为 0）
#[derive(Clone, Debug)]
pub struct RgbFrame {
    pub image: RgbImage,
    pub delay: u16,
}

/// 调色板索引图
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub delay: u16,
}

/// 从磁盘加载图片为 RGB 帧列表（alpha 丢弃）
/// - png/jpg/jpeg/bmp：返回单帧
/// - gif：返回所有帧，子帧按偏移合成到整幅画布上
pub fn load_rgb_frames(path: &Path) -> Result<Vec<RgbFrame>> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "png" | "jpg" | "jpeg" | "bmp" => {
            let img = image::open(path)?;
            Ok(vec![RgbFrame { image: img.to_rgb8(), delay: 0 }])
        }
        "gif" => decode_gif(std::fs::File::open(path)?),
        _ => Err(QuantError::UnsupportedFormat(ext)),
    }
}

/// 按帧的处置方式（disposal）合成 GIF：
/// `Background` 在显示后把该帧区域清为背景色，`Previous` 恢复到绘制前的画布
pub fn decode_gif<R: Read>(r: R) -> Result<Vec<RgbFrame>> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(r)?;
    let (w, h) = (decoder.width() as u32, decoder.height() as u32);
    let background = match (decoder.bg_color(), decoder.global_palette()) {
        (Some(i), Some(pal)) if pal.len() >= i * 3 + 3 => Rgb([pal[i * 3], pal[i * 3 + 1], pal[i * 3 + 2]]),
        _ => Rgb([0, 0, 0]),
    };
    let mut canvas = RgbImage::from_pixel(w, h, background);
    let mut frames = Vec::new();
    while let Some(frame) = decoder.read_next_frame()? {
        let saved = (frame.dispose == gif::DisposalMethod::Previous).then(|| canvas.clone());
        let (left, top) = (frame.left as u32, frame.top as u32);
        let fw = frame.width as u32;
        for (i, px) in frame.buffer.chunks_exact(4).enumerate() {
            // 透明像素沿用画布上的旧值
            if px[3] == 0 { continue; }
            let x = left + i as u32 % fw;
            let y = top + i as u32 / fw;
            if x < w && y < h { canvas.put_pixel(x, y, Rgb([px[0], px[1], px[2]])); }
        }
        frames.push(RgbFrame { image: canvas.clone(), delay: frame.delay });

        match frame.dispose {
            gif::DisposalMethod::Background => {
                let (x1, y1) = ((left + fw).min(w), (top + frame.height as u32).min(h));
                for y in top.min(y1)..y1 {
                    for x in left.min(x1)..x1 { canvas.put_pixel(x, y, background); }
                }
            }
            gif::DisposalMethod::Previous => {
                if let Some(prev) = saved { canvas = prev; }
            }
            _ => {}
        }
    }
    if frames.is_empty() { return Err(QuantError::EmptyInput); }
    Ok(frames)
}

/// 所有帧的像素按 B,G,R 顺序拼成一条样本流（整个文件共用一个调色板）
pub fn bgr_samples(frames: &[RgbFrame]) -> Vec<u8> {
    let total: usize = frames.iter().map(|f| f.image.as_raw().len()).sum();
    let mut out = Vec::with_capacity(total);
    for f in frames {
        for px in f.image.pixels() {
            out.extend_from_slice(&[px[2], px[1], px[0]]);
        }
    }
    out
}

/// 把 RGB 图逐像素映射到量化器（以 B,G,R 训练）的调色板序号
pub fn remap(nq: &NeuQuant, img: &RgbImage, parallel: bool) -> IndexedImage {
    let (width, height) = img.dimensions();
    let w = width as usize;
    let mut pixels = vec![0u8; w * height as usize];
    if pixels.is_empty() {
        return IndexedImage { width, height, pixels, delay: 0 };
    }
    let raw = img.as_raw();
    let map_row = |(dst, src): (&mut [u8], &[u8])| {
        for (d, px) in dst.iter_mut().zip(src.chunks_exact(3)) {
            *d = nq.lookup(px[2], px[1], px[0]);
        }
    };
    // 查询只读，按行并行与顺序执行结果一致
    if parallel {
        pixels.par_chunks_mut(w).zip(raw.par_chunks(w * 3)).for_each(map_row);
    } else {
        pixels.chunks_mut(w).zip(raw.chunks(w * 3)).for_each(map_row);
    }
    IndexedImage { width, height, pixels, delay: 0 }
}

/// 训练一个全局调色板并映射所有帧
pub fn quantize_frames(frames: &[RgbFrame], opts: &QuantizeOptions) -> Result<(Palette, Vec<IndexedImage>)> {
    let samples = bgr_samples(frames);
    let nq = NeuQuant::with_options(&samples, opts)?;
    let palette = Palette::from_neuquant_bgr(&nq);
    let indexed: Vec<IndexedImage> = frames
        .iter()
        .map(|f| IndexedImage { delay: f.delay, ..remap(&nq, &f.image, opts.parallel) })
        .collect();
    info!(frames = indexed.len(), pixels = samples.len() / 3, "重映射完成");
    Ok((palette, indexed))
}

impl IndexedImage {
    pub fn to_rgb(&self, pal: &Palette) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            pal.colors[self.pixels[(y * self.width + x) as usize] as usize]
        })
    }
}

/// 每像素平均 L1 误差；两张图尺寸必须一致
pub fn mean_abs_error(original: &RgbImage, indexed: &IndexedImage, pal: &Palette) -> Result<f64> {
    if original.dimensions() != (indexed.width, indexed.height)
        || indexed.pixels.len() != (indexed.width * indexed.height) as usize
    {
        return Err(QuantError::InvalidParameter(format!(
            "尺寸不一致: 原图 {:?}，索引图 {}x{}",
            original.dimensions(),
            indexed.width,
            indexed.height
        )));
    }
    if indexed.pixels.is_empty() { return Ok(0.0); }
    let sum: u64 = original
        .pixels()
        .zip(&indexed.pixels)
        .map(|(px, &i)| dist_l1(px.0, pal.colors[i as usize].0) as u64)
        .sum();
    Ok(sum as f64 / indexed.pixels.len() as f64)
}
