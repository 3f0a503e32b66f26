//! Local document loading for the summary step.
//!
//! Plain text formats are read as-is; PDFs go through pdf-extract on a
//! blocking thread.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read document: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to extract text from {}: {message}", path.display())]
    ExtractError { path: PathBuf, message: String },
    #[error("unsupported document type: {}", .0.display())]
    Unsupported(PathBuf),
    #[error("no text found in document: {}", .0.display())]
    Empty(PathBuf),
}

/// A loaded document: its file name and extracted text.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub name: String,
    pub text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Text,
    Pdf,
}

fn kind_of(path: &Path) -> Option<DocumentKind> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "txt" | "md" | "markdown" | "csv" | "json" => Some(DocumentKind::Text),
        "pdf" => Some(DocumentKind::Pdf),
        _ => None,
    }
}

/// Load one document from disk.
pub async fn load_document(path: impl AsRef<Path>) -> Result<Document, DocumentError> {
    let path = path.as_ref().to_path_buf();
    let kind = kind_of(&path).ok_or_else(|| DocumentError::Unsupported(path.clone()))?;

    let text = match kind {
        DocumentKind::Text => tokio::fs::read_to_string(&path).await?,
        DocumentKind::Pdf => {
            let pdf_path = path.clone();
            tokio::task::spawn_blocking(move || pdf_extract::extract_text(&pdf_path))
                .await
                .map_err(|e| DocumentError::ExtractError {
                    path: path.clone(),
                    message: e.to_string(),
                })?
                .map_err(|e| DocumentError::ExtractError {
                    path: path.clone(),
                    message: format!("{e:?}"),
                })?
        }
    };

    if text.trim().is_empty() {
        return Err(DocumentError::Empty(path));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    log::debug!("loaded {} ({} characters)", name, text.len());

    Ok(Document::new(name, text))
}

/// Load several documents, failing on the first unreadable one.
pub async fn load_documents<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Document>, DocumentError> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        documents.push(load_document(path).await?);
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn kinds_follow_extension() {
        assert_eq!(kind_of(Path::new("a/notes.MD")), Some(DocumentKind::Text));
        assert_eq!(kind_of(Path::new("report.pdf")), Some(DocumentKind::Pdf));
        assert_eq!(kind_of(Path::new("deck.pptx")), None);
        assert_eq!(kind_of(Path::new("README")), None);
    }

    #[tokio::test]
    async fn loads_text_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "The moon is 384,400 km away.").unwrap();

        let documents = load_documents(&[&path]).await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].name, "facts.txt");
        assert!(documents[0].text.contains("384,400"));
    }

    #[tokio::test]
    async fn rejects_unsupported_and_empty_documents() {
        let dir = tempfile::tempdir().unwrap();

        let pptx = dir.path().join("deck.pptx");
        std::fs::write(&pptx, b"binary").unwrap();
        assert!(matches!(
            load_document(&pptx).await,
            Err(DocumentError::Unsupported(_))
        ));

        let empty = dir.path().join("empty.md");
        std::fs::write(&empty, "  \n").unwrap();
        assert!(matches!(
            load_document(&empty).await,
            Err(DocumentError::Empty(_))
        ));
    }
}
