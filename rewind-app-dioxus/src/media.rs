//! Serving slide media (music, photos, video) from the assets directory to the webview.
//!
//! Catalog paths such as `/music/intro.mp3` are resolved against the configured assets
//! directory and served over a custom protocol, with byte ranges for seeking.

use dioxus::desktop::wry::http::{Request, Response, StatusCode, header};
use std::borrow::Cow;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Protocol name registered with the webview
pub const MEDIA_SCHEME: &str = "media";

/// URL the webview uses to fetch a catalog media path
#[must_use]
pub fn media_url(path: &str) -> String {
    let encoded = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");

    if cfg!(windows) {
        format!("http://{MEDIA_SCHEME}.localhost/{encoded}")
    } else {
        format!("{MEDIA_SCHEME}://localhost/{encoded}")
    }
}

/// Map a catalog media path onto the assets directory, refusing anything that escapes it
#[must_use]
pub fn resolve(root: &Path, path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(path).ok()?;
    let relative = Path::new(decoded.trim_start_matches('/'));

    let mut resolved = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (resolved != root).then_some(resolved)
}

fn content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("wav") => "audio/wav",
        Some("m4a") => "audio/mp4",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Parse a single `bytes=start-end` range against a body of `len` bytes
fn parse_range(value: &str, len: usize) -> Option<(usize, usize)> {
    let bounds = value.strip_prefix("bytes=")?;
    let (start, end) = bounds.split_once('-')?;
    let last = len.checked_sub(1)?;

    let (start, end) = if start.is_empty() {
        let suffix: usize = end.parse().ok()?;
        (len.saturating_sub(suffix), last)
    } else {
        let start: usize = start.parse().ok()?;
        let end = if end.is_empty() {
            last
        } else {
            end.parse::<usize>().ok()?.min(last)
        };
        (start, end)
    };

    (start <= end).then_some((start, end))
}

fn status(code: StatusCode) -> Response<Cow<'static, [u8]>> {
    let mut response = Response::new(Cow::Borrowed(&[][..]));
    *response.status_mut() = code;
    response
}

/// Protocol handler: read the requested file and answer, honoring `Range`
pub fn serve(root: &Path, request: &Request<Vec<u8>>) -> Response<Cow<'static, [u8]>> {
    let Some(path) = resolve(root, request.uri().path()) else {
        warn!("Rejected media request {}", request.uri());
        return status(StatusCode::FORBIDDEN);
    };

    let body = match fs::read(&path) {
        Ok(body) => body,
        Err(e) => {
            debug!("Media {} unavailable: {e}", path.display());
            return status(StatusCode::NOT_FOUND);
        }
    };

    let len = body.len();
    let range = request
        .headers()
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .map(|v| parse_range(v, len));

    let builder = Response::builder()
        .header(header::CONTENT_TYPE, content_type(&path))
        .header(header::ACCEPT_RANGES, "bytes");

    let response = match range {
        Some(Some((start, end))) => builder
            .status(StatusCode::PARTIAL_CONTENT)
            .header(header::CONTENT_RANGE, format!("bytes {start}-{end}/{len}"))
            .body(Cow::Owned(body[start..=end].to_vec())),
        Some(None) => builder
            .status(StatusCode::RANGE_NOT_SATISFIABLE)
            .header(header::CONTENT_RANGE, format!("bytes */{len}"))
            .body(Cow::Borrowed(&[][..])),
        None => builder.status(StatusCode::OK).body(Cow::Owned(body)),
    };

    response.unwrap_or_else(|e| {
        warn!("Failed to build media response: {e}");
        status(StatusCode::INTERNAL_SERVER_ERROR)
    })
}
