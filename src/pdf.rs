use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use std::io::{BufWriter, Cursor};

use crate::delivery;
use crate::draw::{self, DrawCommand};
use crate::error::{BackendError, GenerationError};
use crate::font_metrics::FontFace;
use crate::invoice::InvoiceRecord;
use crate::template::InvoiceTemplate;

// ============================================================================
// CONSTANTS
// ============================================================================

const PT_TO_MM: f32 = 0.352_777_78;
/// Segments used to approximate a filled circle
const CIRCLE_SEGMENTS: usize = 32;

// ============================================================================
// PUBLIC API
// ============================================================================

/// A finished PDF together with the file name it should be offered under.
#[derive(Debug, Clone)]
pub struct RenderedInvoice {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Lays out `record` with `template` and serializes the page.
///
/// Any backend fault is logged here, once, and collapsed into
/// `GenerationError`. No partial output is ever returned.
pub fn render_pdf(
    record: &InvoiceRecord,
    template: &dyn InvoiceTemplate,
) -> Result<RenderedInvoice, GenerationError> {
    tracing::debug!(
        invoice = %record.invoice_number,
        template = template.name(),
        "rendering invoice"
    );

    let page = template.render(record);
    let title = format!("Invoice {}", record.invoice_number);

    match write_page(&page, &title) {
        Ok(bytes) => {
            tracing::info!(
                invoice = %record.invoice_number,
                commands = page.commands.len(),
                bytes = bytes.len(),
                "invoice rendered"
            );
            Ok(RenderedInvoice {
                file_name: delivery::file_name(&record.invoice_number),
                bytes,
            })
        }
        Err(err) => {
            tracing::error!(invoice = %record.invoice_number, error = %err, "error generating PDF");
            Err(GenerationError)
        }
    }
}

/// Serializes one page of draw commands into a single-page PDF.
pub fn write_page(page: &draw::Page, title: &str) -> Result<Vec<u8>, BackendError> {
    if let Some(index) = page.commands.iter().position(|c| !c.is_finite()) {
        return Err(BackendError::Drawing { index });
    }

    let (doc, page1, layer1) = PdfDocument::new(
        title,
        Mm(page.width * PT_TO_MM),
        Mm(page.height * PT_TO_MM),
        "Layer 1",
    );
    let fonts = Fonts::load(&doc)?;
    let layer = doc.get_page(page1).get_layer(layer1);

    for command in &page.commands {
        draw_command(&layer, &fonts, command);
    }

    let mut buf = Vec::new();
    {
        let cursor = Cursor::new(&mut buf);
        let mut writer = BufWriter::new(cursor);
        doc.save(&mut writer)
            .map_err(|e| BackendError::Serialization(e.to_string()))?;
    }

    Ok(buf)
}

// ============================================================================
// FONTS
// ============================================================================

struct Fonts {
    helvetica: IndirectFontRef,
    helvetica_bold: IndirectFontRef,
    times_roman: IndirectFontRef,
    times_bold: IndirectFontRef,
    times_italic: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, BackendError> {
        Ok(Fonts {
            helvetica: embed(doc, FontFace::Helvetica)?,
            helvetica_bold: embed(doc, FontFace::HelveticaBold)?,
            times_roman: embed(doc, FontFace::TimesRoman)?,
            times_bold: embed(doc, FontFace::TimesBold)?,
            times_italic: embed(doc, FontFace::TimesItalic)?,
        })
    }

    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Helvetica => &self.helvetica,
            FontFace::HelveticaBold => &self.helvetica_bold,
            FontFace::TimesRoman => &self.times_roman,
            FontFace::TimesBold => &self.times_bold,
            FontFace::TimesItalic => &self.times_italic,
        }
    }
}

fn embed(doc: &PdfDocumentReference, face: FontFace) -> Result<IndirectFontRef, BackendError> {
    let builtin = match face {
        FontFace::Helvetica => BuiltinFont::Helvetica,
        FontFace::HelveticaBold => BuiltinFont::HelveticaBold,
        FontFace::TimesRoman => BuiltinFont::TimesRoman,
        FontFace::TimesBold => BuiltinFont::TimesBold,
        FontFace::TimesItalic => BuiltinFont::TimesItalic,
    };
    doc.add_builtin_font(builtin)
        .map_err(|e| BackendError::FontEmbedding { face, message: e.to_string() })
}

// ============================================================================
// DRAWING
// ============================================================================

fn draw_command(layer: &PdfLayerReference, fonts: &Fonts, command: &DrawCommand) {
    match command {
        DrawCommand::Text { text, x, y, face, size, color } => {
            set_fill_color(layer, *color);
            layer.use_text(text.as_str(), *size, Mm(x * PT_TO_MM), Mm(y * PT_TO_MM), fonts.get(*face));
        }
        DrawCommand::Rect { x, y, width, height, color } => {
            set_fill_color(layer, *color);
            fill_rect(layer, *x, *y, *width, *height);
        }
        DrawCommand::Line { x1, y1, x2, y2, thickness, color } => {
            set_stroke_color(layer, *color);
            layer.set_outline_thickness(*thickness);
            draw_line(layer, *x1, *y1, *x2, *y2);
        }
        DrawCommand::Circle { cx, cy, radius, color } => {
            set_fill_color(layer, *color);
            fill_circle(layer, *cx, *cy, *radius);
        }
    }
}

fn point(x: f32, y: f32) -> (Point, bool) {
    (Point::new(Mm(x * PT_TO_MM), Mm(y * PT_TO_MM)), false)
}

fn draw_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    let line = Line {
        points: vec![point(x1, y1), point(x2, y2)],
        is_closed: false,
    };
    layer.add_line(line);
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32) {
    let points = vec![
        point(x, y),
        point(x + w, y),
        point(x + w, y + h),
        point(x, y + h),
    ];
    fill_polygon(layer, points);
}

fn fill_circle(layer: &PdfLayerReference, cx: f32, cy: f32, r: f32) {
    let points = (0..=CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = 2.0 * std::f32::consts::PI * i as f32 / CIRCLE_SEGMENTS as f32;
            point(cx + r * angle.cos(), cy + r * angle.sin())
        })
        .collect();
    fill_polygon(layer, points);
}

fn fill_polygon(layer: &PdfLayerReference, points: Vec<(Point, bool)>) {
    let polygon = Polygon {
        rings: vec![points],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    };
    layer.add_polygon(polygon);
}

fn set_fill_color(layer: &PdfLayerReference, color: draw::Color) {
    layer.set_fill_color(printpdf::Color::Rgb(Rgb::new(color.r, color.g, color.b, None)));
}

fn set_stroke_color(layer: &PdfLayerReference, color: draw::Color) {
    layer.set_outline_color(printpdf::Color::Rgb(Rgb::new(color.r, color.g, color.b, None)));
}
