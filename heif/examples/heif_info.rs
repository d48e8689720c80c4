use anyhow::{Context as _, Result, bail};
use heif::{Channel, Chroma, ColorSpace, Context, DecodingOptions, ReadingOptions};
use std::env;

fn main() -> Result<()> {
    let path = match env::args().nth(1) {
        Some(path) => path,
        None => bail!("usage: heif_info <file.heic>"),
    };

    println!("libheif {}", heif::version());

    let mut ctx = Context::new()?;
    ctx.read_from_file(&path, &ReadingOptions::default())
        .with_context(|| format!("failed to read {path}"))?;

    let ids = ctx.top_level_image_ids();
    println!("{} top-level image(s): {ids:?}", ids.len());

    let primary = ctx.primary_image_handle()?;
    println!(
        "primary: {}x{}, alpha: {}",
        primary.width(),
        primary.height(),
        primary.has_alpha_channel()
    );
    for id in primary.thumbnail_ids() {
        let thumb = primary
            .thumbnail(id)
            .with_context(|| format!("failed to resolve thumbnail {id}"))?;
        println!("  thumbnail {id}: {}x{}", thumb.width(), thumb.height());
    }

    let image = primary.decode(
        ColorSpace::heif_colorspace_undefined,
        Chroma::heif_chroma_undefined,
        &DecodingOptions::default(),
    )?;
    println!(
        "decoded: colorspace {:?}, chroma {:?}",
        image.colorspace(),
        image.chroma_format()
    );
    for channel in [
        Channel::heif_channel_Y,
        Channel::heif_channel_Cb,
        Channel::heif_channel_Cr,
        Channel::heif_channel_R,
        Channel::heif_channel_G,
        Channel::heif_channel_B,
        Channel::heif_channel_Alpha,
        Channel::heif_channel_interleaved,
    ] {
        if let (Some(w), Some(h), Some(bpp)) = (
            image.width(channel),
            image.height(channel),
            image.bits_per_pixel(channel),
        ) {
            println!("  plane {channel:?}: {w}x{h}, {bpp} bpp");
        }
    }

    Ok(())
}
