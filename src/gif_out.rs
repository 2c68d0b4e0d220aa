use std::borrow::Cow;
use std::io::Write;

use crate::error::{QuantError, Result};
use crate::image_io::IndexedImage;
use crate::palette::Palette;

/// 写出 GIF：量化调色板作为全局颜色表，多帧时无限循环
pub fn write_gif<W: Write>(w: W, frames: &[IndexedImage], pal: &Palette) -> Result<()> {
    let first = frames.first().ok_or(QuantError::EmptyInput)?;
    let width = gif_dim(first.width)?;
    let height = gif_dim(first.height)?;

    let table = pal.to_bytes();
    let mut encoder = gif::Encoder::new(w, width, height, &table)?;
    if frames.len() > 1 { encoder.set_repeat(gif::Repeat::Infinite)?; }

    for f in frames {
        if f.width != first.width || f.height != first.height {
            return Err(QuantError::InvalidParameter("各帧尺寸不一致".into()));
        }
        let frame = gif::Frame {
            width,
            height,
            delay: f.delay,
            buffer: Cow::Borrowed(&f.pixels),
            ..gif::Frame::default()
        };
        encoder.write_frame(&frame)?;
    }
    Ok(())
}

fn gif_dim(v: u32) -> Result<u16> {
    u16::try_from(v).map_err(|_| QuantError::InvalidParameter(format!("GIF尺寸超出 u16: {v}")))
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;
    use crate::image_io::{decode_gif, quantize_frames, RgbFrame};
    use crate::options::QuantizeOptions;

    #[test]
    fn test_gif_frames_and_delay() {
        let a = RgbImage::from_fn(40, 30, |x, y| Rgb([(x * 6) as u8, (y * 8) as u8, 90]));
        let b = RgbImage::from_pixel(40, 30, Rgb([200, 10, 10]));
        let frames = vec![RgbFrame { image: a, delay: 5 }, RgbFrame { image: b, delay: 7 }];
        let (pal, indexed) = quantize_frames(&frames, &QuantizeOptions::with_sample_rate(1)).unwrap();

        let mut buf = Vec::new();
        write_gif(&mut buf, &indexed, &pal).unwrap();
        let decoded = decode_gif(buf.as_slice()).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].delay, 5);
        assert_eq!(decoded[1].delay, 7);
        assert_eq!(decoded[1].image, indexed[1].to_rgb(&pal));
    }

    #[test]
    fn test_empty_and_mismatched() {
        let pal = Palette::default_grayscale();
        assert!(matches!(write_gif(Vec::new(), &[], &pal), Err(QuantError::EmptyInput)));
        let f = |w| IndexedImage { width: w, height: 2, pixels: vec![0; 2 * w as usize], delay: 0 };
        assert!(matches!(write_gif(Vec::new(), &[f(2), f(3)], &pal), Err(QuantError::InvalidParameter(_))));
    }
}
