//! PDF rasterisation: open a document and render one page at a time.
//!
//! The pipeline only needs four things from a PDF backend: open, page count,
//! render page N, close. [`PdfRasterizer`] and [`PageSource`] express exactly
//! that. Closing is `Drop`: the boxed `PageSource` owns the document, so
//! whichever way the pipeline leaves its loop the document is released once.
//!
//! [`PdfiumRasterizer`] is the production backend. Pages are rendered lazily
//! inside the loop rather than up front, so at most one bitmap is alive at
//! any moment regardless of document length.

use crate::error::ScribeError;
use crate::output::DocumentInfo;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// PDF points per inch. Page geometry is in points; DPI scales from here.
const POINTS_PER_INCH: f32 = 72.0;

/// Opens PDF documents.
pub trait PdfRasterizer {
    /// Open `path`, returning a handle that closes the document when dropped.
    ///
    /// Any failure (corrupt file, wrong password, unsupported format) is a
    /// [`ScribeError::DocumentOpen`].
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn PageSource + 'a>, ScribeError>;
}

/// An opened document.
pub trait PageSource {
    /// Number of pages, fixed at open time.
    fn page_count(&self) -> usize;

    /// Render page `index` (0-based) at `dpi`.
    fn render_page(&mut self, index: usize, dpi: u32) -> Result<DynamicImage, ScribeError>;

    /// Document properties.
    fn info(&self) -> DocumentInfo;
}

/// [`PdfRasterizer`] backed by the pdfium C++ library.
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    /// Bind to a pdfium library.
    ///
    /// Search order: `PDFIUM_LIB_PATH`, the working directory, then the
    /// system library path.
    pub fn new() -> Result<Self, ScribeError> {
        let bindings = bind_pdfium()?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

fn bind_pdfium() -> Result<Box<dyn PdfiumLibraryBindings>, ScribeError> {
    if let Ok(path) = std::env::var("PDFIUM_LIB_PATH") {
        if !path.is_empty() {
            debug!("Binding pdfium from PDFIUM_LIB_PATH={}", path);
            return Pdfium::bind_to_library(&path).map_err(|e| {
                ScribeError::PdfiumBindingFailed(format!("{path}: {e:?}"))
            });
        }
    }

    Pdfium::bind_to_library(&Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| ScribeError::PdfiumBindingFailed(format!("{e:?}")))
}

impl PdfRasterizer for PdfiumRasterizer {
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn PageSource + 'a>, ScribeError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, password)
            .map_err(|e| {
                let err_str = format!("{:?}", e);
                let detail = if err_str.contains("Password") || err_str.contains("password") {
                    if password.is_some() {
                        "wrong password".to_string()
                    } else {
                        "document is encrypted; a password is required".to_string()
                    }
                } else {
                    err_str
                };
                ScribeError::DocumentOpen {
                    path: path.to_path_buf(),
                    detail,
                }
            })?;

        let page_count = document.pages().len() as usize;
        info!("PDF loaded: {} pages", page_count);

        Ok(Box::new(PdfiumPages {
            document,
            path: path.to_path_buf(),
            page_count,
        }))
    }
}

struct PdfiumPages<'a> {
    document: PdfDocument<'a>,
    path: PathBuf,
    page_count: usize,
}

impl PageSource for PdfiumPages<'_> {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn render_page(&mut self, index: usize, dpi: u32) -> Result<DynamicImage, ScribeError> {
        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| ScribeError::RenderFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            })?;

        let render_config =
            PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / POINTS_PER_INCH);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            ScribeError::RenderFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} at {} DPI → {}x{} px",
            index + 1,
            dpi,
            image.width(),
            image.height()
        );
        Ok(image)
    }

    fn info(&self) -> DocumentInfo {
        let metadata = self.document.metadata();
        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata.get(tag).and_then(|t| {
                let v = t.value().to_string();
                if v.is_empty() {
                    None
                } else {
                    Some(v)
                }
            })
        };

        DocumentInfo {
            path: self.path.clone(),
            page_count: self.page_count,
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            producer: get_meta(PdfDocumentMetadataTagType::Producer),
            pdf_version: format!("{:?}", self.document.version()),
        }
    }
}

impl Drop for PdfiumPages<'_> {
    fn drop(&mut self) {
        debug!("Closing PDF {}", self.path.display());
    }
}

