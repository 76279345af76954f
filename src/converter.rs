use crate::error::Result;
use image::ImageFormat;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const PNG_SUFFIX: &[u8] = b".png";

/// `.png`で終わるファイル名なら変換先の`.jpg`パスを返す
///
/// 拡張子の大文字小文字は区別する（`.PNG`は対象外）。
/// UTF-8でないファイル名もバイト列で判定する。
pub fn jpeg_destination(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    if !name.as_encoded_bytes().ends_with(PNG_SUFFIX) {
        return None;
    }
    // ".png"だけの名前は拡張子なし扱いになるので別に組み立てる
    if name.len() == PNG_SUFFIX.len() {
        return Some(path.with_file_name(".jpg"));
    }
    Some(path.with_extension("jpg"))
}

/// PNGを読み込み、RGBのJPEGとして保存してから元のファイルを削除する
pub fn convert_file(png_file: &Path, jpg_file: &Path) -> Result<()> {
    // 拡張子ではなく中身から形式を判定する
    let img = image::io::Reader::open(png_file)?
        .with_guessed_format()?
        .decode()?;
    img.to_rgb8().save_with_format(jpg_file, ImageFormat::Jpeg)?;
    std::fs::remove_file(png_file)?;
    Ok(())
}

/// ディレクトリ直下のPNGをすべてJPEGに変換し、進捗を標準出力に出す
pub fn convert_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let stdout = io::stdout();
    convert_directory_to(dir, &mut stdout.lock())
}

/// ディレクトリ直下のPNGをすべてJPEGに変換し、進捗を`out`に書き出す
///
/// 1ファイルでも失敗したらその時点で中断する。
pub fn convert_directory_to(dir: &Path, out: &mut impl Write) -> Result<Vec<PathBuf>> {
    let mut converted = Vec::new();

    // サブディレクトリは辿らない
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        let png_file = entry.path();
        let Some(jpg_file) = jpeg_destination(png_file) else {
            debug!(path = %png_file.display(), "skipping non-png entry");
            continue;
        };

        convert_file(png_file, &jpg_file)?;
        writeln!(out, "converted: {}", jpg_file.display())?;
        converted.push(jpg_file);
    }

    Ok(converted)
}
