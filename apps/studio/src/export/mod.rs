// Document export: renders finished resume text to a PDF file.
// Layout is CPU-bound and runs inside tokio::task::spawn_blocking, as does the file write.

pub mod font_metrics;
pub mod layout;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use tracing::info;

use crate::errors::AppError;
use crate::export::font_metrics::BaseFont;
use crate::export::layout::{layout_document, PageLayout, PAGE_HEIGHT_PT, PAGE_WIDTH_PT};

const LAYER_NAME: &str = "Layer 1";
const DEFAULT_TITLE: &str = "Resume";

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

/// Writes `text` to `path` as a PDF. The first non-blank line becomes the title.
pub async fn export_pdf(text: &str, path: &Path) -> Result<(), AppError> {
    let text = text.to_string();
    let path: PathBuf = path.to_path_buf();

    let pages = tokio::task::spawn_blocking(move || {
        let pages = layout_document(&text);
        write_pdf(&text, &pages, &path).map(|()| pages.len())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in export: {e}")))??;

    info!("Exported resume PDF ({pages} page(s))");
    Ok(())
}

fn document_title(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(DEFAULT_TITLE)
}

fn write_pdf(text: &str, pages: &[PageLayout], path: &Path) -> Result<(), AppError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        document_title(text),
        mm(PAGE_WIDTH_PT),
        mm(PAGE_HEIGHT_PT),
        LAYER_NAME,
    );

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Export(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::Export(e.to_string()))?;

    for (i, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), LAYER_NAME)
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for line in &page.lines {
            let font: &IndirectFontRef = match line.font {
                BaseFont::Helvetica => &regular,
                BaseFont::HelveticaBold => &bold,
            };
            layer.use_text(
                line.text.clone(),
                line.size_pt,
                mm(line.x_pt),
                mm(line.y_pt),
                font,
            );
        }
    }

    let file = File::create(path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| AppError::Export(e.to_string()))?;
    Ok(())
}
