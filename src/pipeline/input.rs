//! Input resolution: pasted text, uploads, local paths and URLs → [`Document`].
//!
//! Every entry point validates before any text processing runs: empty
//! input, unsupported extensions and oversize uploads are rejected here.
//! Uploads are held in memory; nothing is written to disk.

use crate::config::{file_extension, SummarizeConfig};
use crate::document::{Document, SourceKind, TextEncoding};
use crate::error::SummarizeError;
use crate::pipeline::extract::{extract_text, extractor_or_default};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// An uploaded file as received from a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Keep only the final path component of a client-supplied file name.
pub fn sanitize_filename(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .trim_start_matches('.')
        .to_string()
}

/// Decode text-file bytes as UTF-8, dropping invalid sequences and a leading BOM.
pub fn decode_text(bytes: &[u8]) -> (String, TextEncoding) {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => (s.to_string(), TextEncoding::Utf8),
        Err(_) => {
            let mut out = String::with_capacity(bytes.len());
            for chunk in bytes.utf8_chunks() {
                out.push_str(chunk.valid());
            }
            (out, TextEncoding::Utf8Lossy)
        }
    }
}

/// A document from pasted text. Whitespace-only text is [`SummarizeError::EmptyInput`].
pub fn document_from_text(text: &str) -> Result<Document, SummarizeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SummarizeError::EmptyInput);
    }
    Ok(Document::pasted(trimmed))
}

/// A document from an uploaded file.
pub async fn document_from_upload(
    filename: &str,
    bytes: Vec<u8>,
    config: &SummarizeConfig,
) -> Result<Document, SummarizeError> {
    let filename = sanitize_filename(filename);
    check_upload(&filename, bytes.len(), config)?;

    let byte_len = bytes.len();
    let document = match file_extension(&filename).as_deref() {
        Some("pdf") => {
            let extractor = extractor_or_default(config.pdf_extractor.as_ref());
            let text = extract_text(extractor, bytes).await?;
            Document {
                text,
                source: SourceKind::Pdf,
                byte_len,
                encoding: TextEncoding::PdfText,
            }
        }
        _ => {
            let (text, encoding) = decode_text(&bytes);
            Document {
                text,
                source: SourceKind::PlainFile,
                byte_len,
                encoding,
            }
        }
    };
    info!(
        "Accepted upload '{}': {} bytes, {} ({})",
        filename, byte_len, document.source, document.encoding
    );
    Ok(document)
}

/// Name and size checks shared by uploads, local files and downloads, run
/// before any bytes are buffered where the size is known up front.
fn check_upload(filename: &str, size: usize, config: &SummarizeConfig) -> Result<(), SummarizeError> {
    if filename.is_empty() {
        return Err(SummarizeError::EmptyInput);
    }
    if !config.accepts_extension(filename) {
        return Err(SummarizeError::UnsupportedFileType {
            filename: filename.to_string(),
        });
    }
    if size > config.max_upload_bytes {
        return Err(SummarizeError::FileTooLarge {
            filename: filename.to_string(),
            size,
            limit: config.max_upload_bytes,
        });
    }
    Ok(())
}

/// The form contract: an upload with a file name wins over pasted text.
pub async fn document_from_request(
    text: Option<&str>,
    upload: Option<Upload>,
    config: &SummarizeConfig,
) -> Result<Document, SummarizeError> {
    if let Some(upload) = upload.filter(|u| !u.filename.trim().is_empty()) {
        return document_from_upload(&upload.filename, upload.bytes, config).await;
    }
    document_from_text(text.unwrap_or_default())
}

/// Resolve a CLI-style input string to a document.
///
/// `-` reads stdin as pasted text, `http(s)://` URLs are downloaded and
/// treated as uploads, anything else is a local file path.
pub async fn resolve_input(input: &str, config: &SummarizeConfig) -> Result<Document, SummarizeError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SummarizeError::InvalidInput {
            input: input.to_string(),
        });
    }
    if input == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .map_err(|e| SummarizeError::Internal(format!("Failed to read stdin: {}", e)))?;
        let (text, _) = decode_text(&buf);
        debug!("Read {} bytes from stdin", buf.len());
        return document_from_text(&text);
    }
    if is_url(input) {
        let bytes = download_url(input, config).await?;
        return document_from_upload(&extract_filename(input), bytes, config).await;
    }
    resolve_local(input, config).await
}

async fn resolve_local(path_str: &str, config: &SummarizeConfig) -> Result<Document, SummarizeError> {
    let path = PathBuf::from(path_str);
    let map_open = |e: std::io::Error, path: PathBuf| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            SummarizeError::PermissionDenied { path }
        } else {
            SummarizeError::FileNotFound { path }
        }
    };
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| map_open(e, path.clone()))?;
    let filename = sanitize_filename(
        &path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    );
    let size = file
        .metadata()
        .await
        .map_err(|e| map_open(e, path.clone()))?
        .len();
    check_upload(&filename, usize::try_from(size).unwrap_or(usize::MAX), config)?;

    // The file may grow between the size check and the read.
    let mut bytes = Vec::with_capacity(size as usize);
    file.take(config.max_upload_bytes as u64 + 1)
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| map_open(e, path.clone()))?;
    debug!("Read local file: {}", path.display());
    document_from_upload(&filename, bytes, config).await
}

/// Download a URL into memory, refusing bodies over the upload limit.
async fn download_url(url: &str, config: &SummarizeConfig) -> Result<Vec<u8>, SummarizeError> {
    info!("Downloading: {}", url);
    let timeout_secs = config.download_timeout_secs;
    let filename = sanitize_filename(&extract_filename(url));
    check_upload(&filename, 0, config)?;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SummarizeError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let map_err = |e: reqwest::Error| {
        if e.is_timeout() {
            SummarizeError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            SummarizeError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let mut response = client.get(url).send().await.map_err(map_err)?;

    if !response.status().is_success() {
        return Err(SummarizeError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    if let Some(len) = response.content_length() {
        check_upload(&filename, usize::try_from(len).unwrap_or(usize::MAX), config)?;
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(map_err)? {
        bytes.extend_from_slice(&chunk);
        check_upload(&filename, bytes.len(), config)?;
    }
    debug!("Downloaded {} bytes", bytes.len());
    Ok(bytes)
}

/// File name for a downloaded URL: its last path segment, or `downloaded.pdf`.
fn extract_filename(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }
    "downloaded.pdf".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extract::PdfTextExtractor;
    use std::sync::Arc;

    struct OnePage;

    impl PdfTextExtractor for OnePage {
        fn extract_pages(&self, _bytes: &[u8]) -> Result<Vec<String>, SummarizeError> {
            Ok(vec!["Page one text.".into(), "Page two text.".into()])
        }
    }

    fn config_with_fake_pdf() -> SummarizeConfig {
        SummarizeConfig::builder()
            .pdf_extractor(Arc::new(OnePage))
            .build()
            .unwrap()
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn filename_is_reduced_to_last_component() {
        assert_eq!(sanitize_filename("../../etc/passwd.txt"), "passwd.txt");
        assert_eq!(sanitize_filename("C:\\Users\\me\\notes.TXT"), "notes.TXT");
        assert_eq!(sanitize_filename(" report.pdf "), "report.pdf");
        assert_eq!(sanitize_filename(".hidden.txt"), "hidden.txt");
        assert_eq!(sanitize_filename("dir/"), "");
    }

    #[test]
    fn url_filename() {
        assert_eq!(extract_filename("https://x.org/papers/a.pdf?dl=1"), "a.pdf");
        assert_eq!(extract_filename("https://x.org/papers/"), "downloaded.pdf");
    }

    #[test]
    fn decode_strips_bom_and_drops_invalid_bytes() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFhello"), ("hello".to_string(), TextEncoding::Utf8));
        let (text, enc) = decode_text(b"caf\xC3\xA9 \xFF\xFEbar");
        assert_eq!(text, "caf\u{e9} bar");
        assert_eq!(enc, TextEncoding::Utf8Lossy);
    }

    #[test]
    fn blank_paste_is_empty_input() {
        assert!(matches!(document_from_text("  \n\t"), Err(SummarizeError::EmptyInput)));
        let d = document_from_text("  Some text.  ").unwrap();
        assert_eq!(d.text, "Some text.");
        assert_eq!(d.source, SourceKind::Pasted);
    }

    #[tokio::test]
    async fn unsupported_extension_rejected() {
        let err = document_from_upload("notes.docx", b"x".to_vec(), &SummarizeConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizeError::UnsupportedFileType { ref filename } if filename == "notes.docx"));
    }

    #[tokio::test]
    async fn oversize_upload_rejected() {
        let config = SummarizeConfig::builder().max_upload_bytes(4).build().unwrap();
        let err = document_from_upload("a.txt", b"12345".to_vec(), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizeError::FileTooLarge { size: 5, limit: 4, .. }));
    }

    #[tokio::test]
    async fn txt_upload_decoded() {
        let d = document_from_upload("Notes.TXT", b"Plain words.".to_vec(), &SummarizeConfig::default())
            .await
            .unwrap();
        assert_eq!(d.text, "Plain words.");
        assert_eq!(d.source, SourceKind::PlainFile);
        assert_eq!(d.byte_len, 12);
    }

    #[tokio::test]
    async fn pdf_upload_uses_extractor() {
        let d = document_from_upload("paper.pdf", b"%PDF-1.4".to_vec(), &config_with_fake_pdf())
            .await
            .unwrap();
        assert_eq!(d.text, "Page one text.\n\nPage two text.");
        assert_eq!(d.source, SourceKind::Pdf);
        assert_eq!(d.encoding, TextEncoding::PdfText);
    }

    #[tokio::test]
    async fn upload_wins_over_text() {
        let config = SummarizeConfig::default();
        let d = document_from_request(
            Some("pasted"),
            Some(Upload::new("f.txt", b"from file".to_vec())),
            &config,
        )
        .await
        .unwrap();
        assert_eq!(d.text, "from file");

        let d = document_from_request(Some("pasted"), Some(Upload::new("", Vec::new())), &config)
            .await
            .unwrap();
        assert_eq!(d.text, "pasted");

        let err = document_from_request(None, None, &config).await.unwrap_err();
        assert!(matches!(err, SummarizeError::EmptyInput));
    }

    #[tokio::test]
    async fn local_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "Local file text.").unwrap();
        let d = resolve_input(path.to_str().unwrap(), &SummarizeConfig::default())
            .await
            .unwrap();
        assert_eq!(d.text, "Local file text.");

        let missing = dir.path().join("missing.txt");
        let err = resolve_input(missing.to_str().unwrap(), &SummarizeConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizeError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn blank_input_string_is_invalid() {
        let err = resolve_input("  ", &SummarizeConfig::default()).await.unwrap_err();
        assert!(matches!(err, SummarizeError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn oversize_local_file_rejected_from_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, "x".repeat(64)).unwrap();
        let config = SummarizeConfig::builder().max_upload_bytes(16).build().unwrap();
        let err = resolve_input(path.to_str().unwrap(), &config).await.unwrap_err();
        assert!(matches!(err, SummarizeError::FileTooLarge { size: 64, limit: 16, .. }), "{err:?}");

        let other = dir.path().join("deck.pptx");
        std::fs::write(&other, "slides").unwrap();
        let err = resolve_input(other.to_str().unwrap(), &config).await.unwrap_err();
        assert!(matches!(err, SummarizeError::UnsupportedFileType { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn url_with_unsupported_extension_is_rejected_before_download() {
        let err = resolve_input("https://example.invalid/slides.pptx", &SummarizeConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizeError::UnsupportedFileType { ref filename } if filename == "slides.pptx"));
    }

    #[tokio::test]
    async fn oversize_download_rejected_from_content_length() {
        use tokio::io::AsyncWriteExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let body = "y".repeat(64);
            let reply = format!("HTTP/1.1 200 OK\r\nContent-Length: 64\r\n\r\n{body}");
            let _ = socket.write_all(reply.as_bytes()).await;
        });

        let config = SummarizeConfig::builder().max_upload_bytes(16).build().unwrap();
        let err = resolve_input(&format!("http://{addr}/notes.txt"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizeError::FileTooLarge { size: 64, limit: 16, .. }), "{err:?}");
    }
}
