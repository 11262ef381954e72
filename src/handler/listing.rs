//! Directory listing module
//!
//! Renders an HTML listing for directories without an index file. Entry
//! names are HTML-escaped for display and percent-encoded in hrefs.

use std::io;
use std::path::Path;
use tokio::fs;

/// Directory entry collected for the listing page
struct Entry {
    name: String,
    is_dir: bool,
}

/// Render the listing page for `dir`, requested as `request_path`
pub async fn render(dir: &Path, request_path: &str) -> io::Result<String> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;

    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
        entries.push(Entry { name, is_dir });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(render_page(request_path, &entries))
}

fn render_page(request_path: &str, entries: &[Entry]) -> String {
    let title = format!("Directory listing for {}", escape_html(request_path));

    let mut items = String::new();
    for entry in entries {
        let suffix = if entry.is_dir { "/" } else { "" };
        items.push_str(&format!(
            "<li><a href=\"{}{suffix}\">{}{suffix}</a></li>\n",
            encode_href(&entry.name),
            escape_html(&entry.name),
        ));
    }

    format!(
        "<!DOCTYPE HTML>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n\
         <hr>\n<ul>\n{items}</ul>\n<hr>\n</body>\n</html>\n"
    )
}

/// Escape special characters for HTML display
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Percent-encode a file name for use in an href
fn encode_href(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for b in name.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char);
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
