use super::document::{Align, DrawOp, FontFace, Paragraph, ProposalDocument, Shade, TableRow, TextLine, TextStyle};
use super::metrics::{text_width_mm, wrap, MM_PER_PT};
use crate::error::RenderError;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Rect, Rgb,
};

/// A4 (mm)
pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 10.0;
/// 自动分页: 内容底边距
pub const BREAK_MARGIN: f32 = 15.0;
/// 单元格内边距
const CELL_PADDING: f32 = 1.0;

const LAYER: &str = "Layer 1";

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Italic => &self.italic,
        }
    }
}

/// 把 [`ProposalDocument`] 排版为 PDF, y 坐标从页面顶部起算
struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: Fonts,
    y: f32,
    pages: usize,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self, RenderError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
        let fonts = Fonts {
            regular: add_font(&doc, BuiltinFont::Helvetica)?,
            bold: add_font(&doc, BuiltinFont::HelveticaBold)?,
            italic: add_font(&doc, BuiltinFont::HelveticaOblique)?,
        };
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            fonts,
            y: MARGIN,
            pages: 1,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = MARGIN;
        self.pages += 1;
    }

    /// 剩余空间不足时换页
    fn ensure_room(&mut self, height: f32) {
        if self.y + height > PAGE_HEIGHT - BREAK_MARGIN && self.y > MARGIN {
            self.new_page();
        }
    }

    fn draw(&mut self, op: &DrawOp) {
        match op {
            DrawOp::Line(line) => self.text_line(line),
            DrawOp::Paragraph(p) => self.paragraph(p),
            DrawOp::Row(row) => self.row(row),
            DrawOp::Gap(mm) => self.y += mm,
            DrawOp::Footer { text, style, from_bottom } => {
                let y = PAGE_HEIGHT - from_bottom;
                self.cell(MARGIN, y, PAGE_WIDTH - 2.0 * MARGIN, 5.0, text, *style, Align::Center);
            }
        }
    }

    fn text_line(&mut self, line: &TextLine) {
        self.ensure_room(line.height);
        let width = PAGE_WIDTH - 2.0 * MARGIN;
        if let Some(shade) = line.fill {
            self.fill_rect(MARGIN, self.y, width, line.height, shade);
        }
        self.cell(MARGIN, self.y, width, line.height, &line.text, line.style, line.align);
        self.y += line.height;
    }

    fn paragraph(&mut self, p: &Paragraph) {
        let width = PAGE_WIDTH - 2.0 * MARGIN;
        for line in wrap(&p.text, p.style.face, p.style.size_pt, width - 2.0 * CELL_PADDING) {
            self.ensure_room(p.line_height);
            self.cell(MARGIN, self.y, width, p.line_height, &line, p.style, Align::Left);
            self.y += p.line_height;
        }
    }

    fn row(&mut self, row: &TableRow) {
        self.ensure_room(row.height);
        let value_x = MARGIN + row.label_width;
        self.stroke_rect(MARGIN, self.y, row.label_width, row.height);
        self.stroke_rect(value_x, self.y, row.value_width, row.height);
        self.cell(MARGIN, self.y, row.label_width, row.height, &row.label, row.label_style, Align::Left);
        self.cell(value_x, self.y, row.value_width, row.height, &row.value, row.value_style, Align::Right);
        self.y += row.height;
    }

    /// 在 (x, y, w, h) 单元格内垂直居中输出单行文本
    #[allow(clippy::too_many_arguments)]
    fn cell(&self, x: f32, y: f32, w: f32, h: f32, text: &str, style: TextStyle, align: Align) {
        if text.is_empty() {
            return;
        }
        let text_w = text_width_mm(text, style.face, style.size_pt);
        let tx = match align {
            Align::Left => x + CELL_PADDING,
            Align::Center => x + (w - text_w) / 2.0,
            Align::Right => x + w - CELL_PADDING - text_w,
        };
        let baseline = y + h / 2.0 + 0.3 * style.size_pt * MM_PER_PT;

        self.layer.set_fill_color(black());
        self.layer
            .use_text(text, style.size_pt, Mm(tx), Mm(PAGE_HEIGHT - baseline), self.fonts.get(style.face));
    }

    fn fill_rect(&self, x: f32, y: f32, w: f32, h: f32, shade: Shade) {
        let Shade(r, g, b) = shade;
        self.layer.set_fill_color(Color::Rgb(Rgb::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            None,
        )));
        self.layer.add_rect(pdf_rect(x, y, w, h).with_mode(PaintMode::Fill));
    }

    fn stroke_rect(&self, x: f32, y: f32, w: f32, h: f32) {
        self.layer.set_outline_color(black());
        self.layer.set_outline_thickness(0.5);
        self.layer.add_rect(pdf_rect(x, y, w, h).with_mode(PaintMode::Stroke));
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        self.doc.save_to_bytes().map_err(|e| RenderError::Pdf(e.to_string()))
    }
}

fn add_font(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef, RenderError> {
    doc.add_builtin_font(font).map_err(|e| RenderError::Pdf(e.to_string()))
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

/// 顶部坐标系 -> PDF 坐标系
fn pdf_rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::new(Mm(x), Mm(PAGE_HEIGHT - y - h), Mm(x + w), Mm(PAGE_HEIGHT - y))
}

impl ProposalDocument {
    /// 序列化为 PDF 字节流
    pub fn to_pdf(&self) -> Result<Vec<u8>, RenderError> {
        let mut writer = PdfWriter::new(&self.title)?;
        for (idx, page) in self.pages.iter().enumerate() {
            if idx > 0 {
                writer.new_page();
            }
            for op in &page.ops {
                writer.draw(op);
            }
        }
        tracing::debug!("PDF laid out on {} page(s)", writer.pages);
        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: TextStyle = TextStyle::new(FontFace::Regular, 10.0);

    #[test]
    fn writes_pdf_header() {
        let doc = ProposalDocument::builder("Uji")
            .banner("JUDUL", TextStyle::new(FontFace::Bold, 16.0), 10.0, Shade(230, 230, 230))
            .paragraph("Isi paragraf", BODY, 5.0)
            .page()
            .footer("alamat", TextStyle::new(FontFace::Italic, 8.0), 20.0)
            .build();
        let bytes = doc.to_pdf().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn long_paragraph_breaks_pages() {
        let text = "kata ".repeat(3000);
        let doc = ProposalDocument::builder("Uji").paragraph(&text, BODY, 5.0).build();
        let mut writer = PdfWriter::new("Uji").unwrap();
        for op in &doc.pages[0].ops {
            writer.draw(op);
        }
        assert!(writer.pages > 1);
        assert!(writer.y <= PAGE_HEIGHT - BREAK_MARGIN);
    }
}
