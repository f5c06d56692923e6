//! Multi-resolution icon preparation.
//!
//! Normalizes an icon source into a Windows `.ico`:
//! - a `.ico` file is used as is
//! - a single image is scaled to every standard size
//! - a directory of `<size>.<ext>` images supplies exact sizes, the biggest
//!   one is scaled for the rest
//!
//! Renditions are written as PNGs next to the assembled `icon.ico`.

use crate::bundler::error::{Error, ErrorExt, Result};
use futures_util::future::try_join_all;
use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use image::imageops::FilterType;
use std::path::{Path, PathBuf};

/// Windows standard icon sizes:
/// - 16x16: window title bars
/// - 24x24: small toolbar icons
/// - 32x32: Explorer
/// - 48x48: Explorer large view
/// - 64x64, 128x128: extra large icons
/// - 256x256: high-res icons
pub const ICON_SIZES: [u32; 7] = [16, 24, 32, 48, 64, 128, 256];

/// File name of the assembled icon inside the output directory.
pub const ICO_NAME: &str = "icon.ico";

/// A source image and the square size it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSource {
    /// Image path
    pub path: PathBuf,
    /// Width for single files, numeric file stem for directory entries
    pub size: u32,
}

/// One rendered size.
#[derive(Debug, Clone)]
struct Rendition {
    size: u32,
    rgba: Vec<u8>,
}

/// Prepare `source` as a `.ico`, writing renditions into `out_dir`.
///
/// Returns the `.ico` path to inject.
///
/// # Errors
///
/// [`Error::IconPrep`] when the source cannot be read, holds no usable
/// image, or encoding fails.
pub async fn prepare_icon(source: &Path, out_dir: &Path) -> Result<PathBuf> {
    if is_ico(source) {
        log::debug!("Using icon {} as is", source.display());
        return Ok(source.to_path_buf());
    }

    log::info!("Preparing icon from {}", source.display());
    let sources = load_sources(source).await?;
    let biggest = sources
        .iter()
        .max_by_key(|s| s.size)
        .cloned()
        .ok_or_else(|| icon_error(source, "no usable images found"))?;

    tokio::fs::create_dir_all(out_dir)
        .await
        .fs_context("creating icon directory", out_dir)?;

    let renders = ICON_SIZES.iter().map(|&size| {
        let input = sources
            .iter()
            .find(|s| s.size == size)
            .unwrap_or(&biggest)
            .path
            .clone();
        let output = out_dir.join(format!("{size}.png"));
        async move {
            tokio::task::spawn_blocking(move || render(&input, size, &output))
                .await
                .map_err(|e| Error::GenericError(format!("icon render task panicked: {e}")))?
        }
    });
    let renditions = try_join_all(renders).await?;

    let ico_path = out_dir.join(ICO_NAME);
    let target = ico_path.clone();
    tokio::task::spawn_blocking(move || write_ico(&renditions, &target))
        .await
        .map_err(|e| Error::GenericError(format!("icon encode task panicked: {e}")))??;

    log::info!("Created ICO file: {}", ico_path.display());
    Ok(ico_path)
}

/// Collect candidate images from a file or directory.
///
/// Directory entries whose stem is not a number are ignored.
pub async fn load_sources(source: &Path) -> Result<Vec<IconSource>> {
    let meta = tokio::fs::metadata(source)
        .await
        .map_err(|e| icon_error(source, e))?;

    if meta.is_file() {
        let path = source.to_path_buf();
        let (width, _) = tokio::task::spawn_blocking(move || image::image_dimensions(&path))
            .await
            .map_err(|e| Error::GenericError(format!("icon probe task panicked: {e}")))?
            .map_err(|e| icon_error(source, e))?;
        return Ok(vec![IconSource {
            path: source.to_path_buf(),
            size: width,
        }]);
    }

    let mut entries = tokio::fs::read_dir(source)
        .await
        .map_err(|e| icon_error(source, e))?;
    let mut sources = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| icon_error(source, e))?
    {
        let path = entry.path();
        let size = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<u32>().ok());
        match size {
            Some(size) if size > 0 && path.is_file() => sources.push(IconSource { path, size }),
            _ => log::debug!("Ignoring icon directory entry {}", path.display()),
        }
    }

    if sources.is_empty() {
        return Err(icon_error(source, "directory has no <size>.<ext> images"));
    }
    sources.sort_by_key(|s| s.size);
    Ok(sources)
}

fn render(input: &Path, size: u32, output: &Path) -> Result<Rendition> {
    let img = image::open(input).map_err(|e| icon_error(input, e))?;
    let img = if img.width() == size && img.height() == size {
        img
    } else {
        log::debug!("Scaling {} to {}x{}", input.display(), size, size);
        img.resize_exact(size, size, FilterType::Lanczos3)
    };
    let rgba = img.to_rgba8();
    rgba.save(output).map_err(|e| icon_error(output, e))?;
    Ok(Rendition {
        size,
        rgba: rgba.into_raw(),
    })
}

fn write_ico(renditions: &[Rendition], output: &Path) -> Result<()> {
    let mut icon_dir = IconDir::new(ResourceType::Icon);
    for r in renditions {
        let image = IconImage::from_rgba_data(r.size, r.size, r.rgba.clone());
        let entry = IconDirEntry::encode(&image)
            .map_err(|e| icon_error(output, format!("encoding {0}x{0}: {e}", r.size)))?;
        icon_dir.add_entry(entry);
    }

    let file = std::fs::File::create(output).fs_context("creating ICO output file", output)?;
    icon_dir
        .write(file)
        .map_err(|e| icon_error(output, format!("writing ICO data: {e}")))
}

fn is_ico(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ico"))
}

fn icon_error(path: &Path, reason: impl std::fmt::Display) -> Error {
    Error::IconPrep {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
