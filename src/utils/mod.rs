// sizetailor/src/utils/mod.rs
use crate::core::OCTET_STREAM;
use image::ImageFormat;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Name for a re-encoded file: `name` with its last `.ext` removed, then
/// `suffix` and the new extension appended. A name without a dot has no stem
/// left and becomes just `suffix.extension`.
pub fn compressed_file_name(name: &str, suffix: &str, extension: &str) -> String {
    let stem = name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or("");
    format!("{}{}.{}", stem, suffix, extension)
}

/// Writes `bytes` to `output` when given, otherwise to `suggested_name` next
/// to the input, and returns the path written.
///
/// Without an explicit output an existing file is never replaced: the name is
/// claimed with `create_new`, and a `_N` counter is added before the extension
/// until a free name is won. Concurrent writers targeting the same name each
/// end up with their own file.
pub fn write_output_file(
    input_path: &Path,
    output: Option<&Path>,
    suggested_name: &str,
    bytes: &[u8],
) -> io::Result<PathBuf> {
    let target_dir = output.unwrap_or(input_path).parent();
    if let Some(dir) = target_dir.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    if let Some(path) = output {
        fs::write(path, bytes)?;
        return Ok(path.to_path_buf());
    }

    for candidate in output_candidates(input_path, suggested_name) {
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut file) => {
                file.write_all(bytes)?;
                return Ok(candidate);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("No free output name for {}", suggested_name),
    ))
}

/// `suggested_name` beside the input, then `stem_1.ext`, `stem_2.ext`, ...
fn output_candidates<'a>(
    input_path: &'a Path,
    suggested_name: &'a str,
) -> impl Iterator<Item = PathBuf> + 'a {
    let (stem, extension) = match suggested_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (suggested_name, None),
    };

    std::iter::once(input_path.with_file_name(suggested_name)).chain((1u64..).map(
        move |counter| {
            let file_name = match extension {
                Some(ext) => format!("{}_{}.{}", stem, counter, ext),
                None => format!("{}_{}", stem, counter),
            };
            input_path.with_file_name(file_name)
        },
    ))
}

/// Media type for a file, from its extension first and its leading bytes
/// second. Unknown content is `application/octet-stream`.
pub fn media_type_for(name: &str, bytes: &[u8]) -> String {
    let extension = get_file_extension(Path::new(name));

    if let Some(ext) = extension.as_deref() {
        if let Some(format) = ImageFormat::from_extension(ext) {
            return format.to_mime_type().to_string();
        }
        if let Some(media_type) = non_image_media_type(ext) {
            return media_type.to_string();
        }
    }

    image::guess_format(bytes)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| OCTET_STREAM.to_string())
}

fn non_image_media_type(extension: &str) -> Option<&'static str> {
    let media_type = match extension {
        "txt" | "log" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => return None,
    };
    Some(media_type)
}

pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
}

/// Size in the largest fitting binary unit, trailing zeros dropped:
/// `1.5 KB`, `50 MB`, `0 Bytes`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut size = bytes as f64;
    let mut exponent = 0;
    while size >= 1024.0 && exponent < UNITS.len() - 1 {
        size /= 1024.0;
        exponent += 1;
    }

    let rounded = format!("{:.2}", size);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[exponent])
}

/// Size shown both in KB and MB: `19.5 KB / 0.02 MB`.
pub fn format_kb_mb(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    let mb = kb / 1024.0;
    format!("{:.1} KB / {:.2} MB", kb, mb)
}
