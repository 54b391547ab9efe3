use super::document::FontFace;

/// pt -> mm
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Latin-1 扩展区字符使用的近似宽度
const FALLBACK_WIDTH: u16 = 556;

/// Helvetica AFM 字宽 (0x20..=0x7E, 1/1000 em)
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold AFM 字宽 (0x20..=0x7E)
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn glyph_width(face: FontFace, c: char) -> u16 {
    // Oblique 与 Regular 字宽相同
    let table = match face {
        FontFace::Bold => &HELVETICA_BOLD,
        FontFace::Regular | FontFace::Italic => &HELVETICA,
    };
    match c as u32 {
        code @ 0x20..=0x7E => table[(code - 0x20) as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// 文本宽度 (mm)
pub fn text_width_mm(text: &str, face: FontFace, size_pt: f32) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_width(face, c) as u32).sum();
    units as f32 / 1000.0 * size_pt * MM_PER_PT
}

/// 按宽度贪心折行, 超长单词按字符拆分
pub fn wrap(text: &str, face: FontFace, size_pt: f32, max_width_mm: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for raw_line in text.split('\n') {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if text_width_mm(&candidate, face, size_pt) <= max_width_mm {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width_mm(word, face, size_pt) <= max_width_mm {
                current = word.to_string();
            } else {
                for ch in word.chars() {
                    current.push(ch);
                    if text_width_mm(&current, face, size_pt) > max_width_mm && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::replace(&mut current, ch.to_string()));
                    }
                }
            }
        }
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_follows_afm_tables() {
        // "A" = 667/1000 em, 10pt
        let w = text_width_mm("A", FontFace::Regular, 10.0);
        assert!((w - 0.667 * 10.0 * MM_PER_PT).abs() < 1e-5);
        assert!(text_width_mm("m", FontFace::Bold, 10.0) > text_width_mm("m", FontFace::Regular, 10.0));
        assert_eq!(
            text_width_mm("abc", FontFace::Italic, 9.0),
            text_width_mm("abc", FontFace::Regular, 9.0)
        );
    }

    #[test]
    fn wraps_within_width() {
        let text = "Terima kasih atas ketertarikan Bapak/Ibu terhadap solusi Pembangkit Listrik Tenaga Surya";
        let lines = wrap(text, FontFace::Regular, 10.0, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, FontFace::Regular, 10.0) <= 60.0);
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn splits_overlong_words() {
        let word = "x".repeat(200);
        let lines = wrap(&word, FontFace::Regular, 10.0, 20.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(wrap("", FontFace::Regular, 10.0, 100.0), vec![String::new()]);
    }
}
