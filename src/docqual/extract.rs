//! Text extraction for uploaded documents: plain text with an encoding
//! fallback chain, PDF via `pdf-extract`, DOCX via the zip container.
//!
//! Extracted text is truncated to a bounded length before it goes to the
//! assessor, with a marker so the rationale makes the cut visible.

use std::error::Error;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Maximum characters of document text handed to the assessor.
const MAX_DOC_CHARS: usize = 8000;
const TRUNCATION_MARKER: &str = "\n...(已截断)";

/// Read and extract one document, dispatching on the file extension.
pub fn read_document(root: &Path, path: &str) -> Result<String, Box<dyn Error>> {
    let full = resolve(root, path);
    let ext = full
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let text = match ext.as_str() {
        "pdf" => pdf_extract::extract_text(&full)
            .map_err(|e| format!("PDF extraction failed for {}: {e}", full.display()))?,
        "docx" | "doc" => extract_docx(&full)?,
        _ => {
            let bytes = fs::read(&full)
                .map_err(|e| format!("cannot read {}: {e}", full.display()))?;
            decode_text(&bytes)
        }
    };

    Ok(truncate(text))
}

/// Map a stored document path to a filesystem location: strip the upload
/// prefix, or the path portion of a full URL, then join the docs root.
fn resolve(root: &Path, path: &str) -> PathBuf {
    let trimmed = if let Some(rest) = path.strip_prefix("/media/") {
        rest
    } else if path.starts_with("http://") || path.starts_with("https://") {
        // Keep only the path component, without its upload prefix.
        let after_scheme = path.split_once("//").map(|(_, r)| r).unwrap_or(path);
        let url_path = after_scheme.split_once('/').map(|(_, r)| r).unwrap_or("");
        url_path.strip_prefix("media/").unwrap_or(url_path)
    } else {
        path
    };
    root.join(trimmed)
}

/// Decode bytes as UTF-8, then UTF-16 (BOM-detected), then Latin-1.
/// Undecodable input yields an empty string, which callers treat as an
/// unreadable document.
fn decode_text(bytes: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }
    if bytes.len() >= 2 {
        let units: Option<Vec<u16>> = match (bytes[0], bytes[1]) {
            (0xFF, 0xFE) => Some(
                bytes[2..]
                    .chunks_exact(2)
                    .map(|c| u16::from_le_bytes([c[0], c[1]]))
                    .collect(),
            ),
            (0xFE, 0xFF) => Some(
                bytes[2..]
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect(),
            ),
            _ => None,
        };
        if let Some(units) = units {
            return String::from_utf16_lossy(&units);
        }
    }
    // Latin-1: every byte maps to the code point of the same value.
    bytes.iter().map(|&b| b as char).collect()
}

/// Pull the paragraph text out of a DOCX container's main document part.
fn extract_docx(path: &Path) -> Result<String, Box<dyn Error>> {
    let file = fs::File::open(path).map_err(|e| format!("cannot open {}: {e}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| format!("not a DOCX container {}: {e}", path.display()))?;
    let mut entry = archive
        .by_name("word/document.xml")
        .map_err(|e| format!("no document part in {}: {e}", path.display()))?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    Ok(strip_wordml(&xml))
}

/// Reduce WordprocessingML to plain text: paragraph ends become newlines,
/// all other markup is dropped, basic entities are decoded.
fn strip_wordml(xml: &str) -> String {
    let with_breaks = xml.replace("</w:p>", "\n");
    let mut out = String::with_capacity(with_breaks.len() / 4);
    let mut in_tag = false;
    for ch in with_breaks.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
}

fn truncate(text: String) -> String {
    if text.chars().count() <= MAX_DOC_CHARS {
        return text;
    }
    let mut cut: String = text.chars().take(MAX_DOC_CHARS).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
