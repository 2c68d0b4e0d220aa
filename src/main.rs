use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use neuquant::image_io::{self, mean_abs_error};
use neuquant::{gif_out, QuantizeOptions};

/// 把图片量化为 256 色（NeuQuant），输出 GIF 或 PNG，可附带 .pal 调色板
#[derive(Parser, Debug)]
#[command(name = "neuquant", version)]
struct Cli {
    /// 输入图片（png/jpg/jpeg/bmp/gif）
    input: PathBuf,
    /// 输出文件：.gif 写索引图，其他扩展名写还原后的 RGB 图
    #[arg(short, long)]
    output: PathBuf,
    /// 采样间隔 1..=30，越小质量越高
    #[arg(short, long, default_value_t = 10)]
    sample_rate: u32,
    /// 额外导出 768 字节的 .pal 调色板
    #[arg(long)]
    pal: Option<PathBuf>,
    /// 关闭按行并行映射
    #[arg(long)]
    sequential: bool,
}

/// 程序入口：读取 → 训练 → 映射 → 写出
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let opts = QuantizeOptions { sample_rate: cli.sample_rate, parallel: !cli.sequential };

    let frames = image_io::load_rgb_frames(&cli.input)
        .with_context(|| format!("读取失败: {}", cli.input.display()))?;
    let (palette, indexed) = image_io::quantize_frames(&frames, &opts)?;

    let err = mean_abs_error(&frames[0].image, &indexed[0], &palette)?;
    info!(mean_abs_error = err, "首帧平均误差");

    let ext = cli.output.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
    if ext == "gif" {
        let file = std::fs::File::create(&cli.output)
            .with_context(|| format!("无法创建: {}", cli.output.display()))?;
        gif_out::write_gif(std::io::BufWriter::new(file), &indexed, &palette)?;
    } else {
        // 非 GIF 只写首帧
        indexed[0].to_rgb(&palette).save(&cli.output)
            .with_context(|| format!("导出失败: {}", cli.output.display()))?;
    }
    info!("已导出: {}", cli.output.display());

    if let Some(path) = &cli.pal {
        palette.save(path).with_context(|| format!("PAL写入失败: {}", path.display()))?;
        info!("已导出调色板: {}", path.display());
    }
    Ok(())
}
