use super::format::sanitize_latin1;

/// Helvetica 字族
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size_pt: f32,
}

impl TextStyle {
    pub const fn new(face: FontFace, size_pt: f32) -> Self {
        Self { face, size_pt }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// 0-255 RGB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shade(pub u8, pub u8, pub u8);

/// 单行文本, 占满内容区宽度, 绘制后换行
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub style: TextStyle,
    pub height: f32,
    pub align: Align,
    pub fill: Option<Shade>,
}

/// 自动换行文本块
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub style: TextStyle,
    pub line_height: f32,
}

/// 带边框的两列表格行 (标签左对齐, 数值右对齐)
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub label: String,
    pub value: String,
    pub label_width: f32,
    pub value_width: f32,
    pub height: f32,
    pub label_style: TextStyle,
    pub value_style: TextStyle,
}

/// 绘制指令
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Line(TextLine),
    Paragraph(Paragraph),
    Row(TableRow),
    /// 垂直留白 (mm)
    Gap(f32),
    /// 距页面底边固定位置的居中文本
    Footer {
        text: String,
        style: TextStyle,
        from_bottom: f32,
    },
}

impl DrawOp {
    /// 该指令包含的全部文本
    pub fn texts(&self) -> Vec<&str> {
        match self {
            DrawOp::Line(l) => vec![l.text.as_str()],
            DrawOp::Paragraph(p) => vec![p.text.as_str()],
            DrawOp::Row(r) => vec![r.label.as_str(), r.value.as_str()],
            DrawOp::Gap(_) => Vec::new(),
            DrawOp::Footer { text, .. } => vec![text.as_str()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// 分页的绘制指令序列, 由 [`super::pdf`] 序列化为 PDF
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalDocument {
    pub title: String,
    pub pages: Vec<Page>,
}

impl ProposalDocument {
    pub fn builder(title: impl Into<String>) -> DocumentBuilder {
        DocumentBuilder {
            title: title.into(),
            pages: Vec::new(),
        }
    }

    /// 按绘制顺序返回全部文本
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| p.ops.iter()).flat_map(|op| op.texts())
    }
}

/// 文档构建器
///
/// 所有写入的文本都会先转换为 Latin-1 (不支持的字符替换为 `?`)。
#[derive(Debug)]
pub struct DocumentBuilder {
    title: String,
    pages: Vec<Page>,
}

impl DocumentBuilder {
    pub fn page(mut self) -> Self {
        self.pages.push(Page::default());
        self
    }

    fn push(mut self, op: DrawOp) -> Self {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
        self
    }

    pub fn line(self, text: &str, style: TextStyle, height: f32) -> Self {
        self.push(DrawOp::Line(TextLine {
            text: sanitize_latin1(text),
            style,
            height,
            align: Align::Left,
            fill: None,
        }))
    }

    pub fn aligned_line(self, text: &str, style: TextStyle, height: f32, align: Align) -> Self {
        self.push(DrawOp::Line(TextLine {
            text: sanitize_latin1(text),
            style,
            height,
            align,
            fill: None,
        }))
    }

    /// 带底色的居中标题
    pub fn banner(self, text: &str, style: TextStyle, height: f32, fill: Shade) -> Self {
        self.push(DrawOp::Line(TextLine {
            text: sanitize_latin1(text),
            style,
            height,
            align: Align::Center,
            fill: Some(fill),
        }))
    }

    pub fn paragraph(self, text: &str, style: TextStyle, line_height: f32) -> Self {
        self.push(DrawOp::Paragraph(Paragraph {
            text: sanitize_latin1(text),
            style,
            line_height,
        }))
    }

    pub fn row(self, row: TableRow) -> Self {
        self.push(DrawOp::Row(TableRow {
            label: sanitize_latin1(&row.label),
            value: sanitize_latin1(&row.value),
            ..row
        }))
    }

    pub fn gap(self, mm: f32) -> Self {
        self.push(DrawOp::Gap(mm))
    }

    pub fn footer(self, text: &str, style: TextStyle, from_bottom: f32) -> Self {
        self.push(DrawOp::Footer {
            text: sanitize_latin1(text),
            style,
            from_bottom,
        })
    }

    pub fn build(self) -> ProposalDocument {
        ProposalDocument {
            title: self.title,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: TextStyle = TextStyle::new(FontFace::Regular, 10.0);

    #[test]
    fn ops_before_first_page_open_one() {
        let doc = ProposalDocument::builder("t").line("a", BODY, 5.0).gap(2.0).build();
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].ops.len(), 2);
    }

    #[test]
    fn keeps_page_order() {
        let doc = ProposalDocument::builder("t")
            .page()
            .line("first", BODY, 5.0)
            .page()
            .paragraph("second", BODY, 5.0)
            .footer("third", BODY, 20.0)
            .build();
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.texts().collect::<Vec<_>>(), vec!["first", "second", "third"]);
    }

    #[test]
    fn sanitizes_every_text() {
        let doc = ProposalDocument::builder("t")
            .line("Yth. 王小明", BODY, 5.0)
            .row(TableRow {
                label: "Area ≈".to_string(),
                value: "José".to_string(),
                label_width: 60.0,
                value_width: 110.0,
                height: 6.0,
                label_style: BODY,
                value_style: BODY,
            })
            .build();
        assert_eq!(doc.texts().collect::<Vec<_>>(), vec!["Yth. ???", "Area ?", "José"]);
    }
}
