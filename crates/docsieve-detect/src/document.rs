/// MIME type strings the dispatcher makes decisions on.
pub mod mime {
    pub const PDF: &str = "application/pdf";
    pub const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
    pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
    pub const PPTX: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation";
    pub const ZIP: &str = "application/zip";

    pub const TEXT_PLAIN: &str = "text/plain";
    pub const TEXT_HTML: &str = "text/html";
    pub const TEXT_XML: &str = "text/xml";
    pub const TEXT_MARKDOWN: &str = "text/markdown";

    pub const EMPTY: &str = "application/x-empty";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// A sniffed MIME type with capability predicates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentType {
    mime_type: String,
}

impl DocumentType {
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn is_text(&self) -> bool {
        self.mime_type.starts_with("text/")
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == mime::PDF
    }

    pub fn is_excel(&self) -> bool {
        self.mime_type == mime::XLSX
    }

    pub fn is_word(&self) -> bool {
        self.mime_type == mime::DOCX
    }

    pub fn is_ppt(&self) -> bool {
        self.mime_type == mime::PPTX
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn is_office_document(&self) -> bool {
        self.is_excel() || self.is_word() || self.is_ppt()
    }

    /// Images count as recognized even though no decoder reads them.
    pub fn is_unsupported(&self) -> bool {
        !(self.is_text() || self.is_pdf() || self.is_office_document() || self.is_image())
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from(self)
    }
}

/// Which decoder family handles a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Text,
    Pdf,
    Spreadsheet,
    Word,
    Presentation,
    Unsupported,
}

impl From<&DocumentType> for DocumentKind {
    fn from(doc: &DocumentType) -> Self {
        if doc.is_text() {
            Self::Text
        } else if doc.is_pdf() {
            Self::Pdf
        } else if doc.is_excel() {
            Self::Spreadsheet
        } else if doc.is_word() {
            Self::Word
        } else if doc.is_ppt() {
            Self::Presentation
        } else {
            Self::Unsupported
        }
    }
}
