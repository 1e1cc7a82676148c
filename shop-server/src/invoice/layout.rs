//! Fixed-width text layout builder
//!
//! Fluent API for column-aligned plain text documents.

/// Fixed-width line builder; the PDF renderer draws its output line by line
pub struct TextBuilder {
    buf: String,
    width: usize,
}

impl TextBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            buf: String::with_capacity(2048),
            width,
        }
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self.buf.push('\n');
        self
    }

    pub fn newline(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// Centered line (left-aligned when wider than the page)
    pub fn center(&mut self, s: &str) -> &mut Self {
        let len = s.chars().count();
        let pad = self.width.saturating_sub(len) / 2;
        self.buf.extend(std::iter::repeat_n(' ', pad));
        self.line(s)
    }

    pub fn sep_double(&mut self) -> &mut Self {
        let sep = "=".repeat(self.width);
        self.line(&sep)
    }

    pub fn sep_single(&mut self) -> &mut Self {
        let sep = "-".repeat(self.width);
        self.line(&sep)
    }

    /// Left text and right text on one line, padded to the full width
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let used = left.chars().count() + right.chars().count();
        let pad = self.width.saturating_sub(used).max(1);
        self.buf.push_str(left);
        self.buf.extend(std::iter::repeat_n(' ', pad));
        self.line(right)
    }

    /// Columns with fixed widths; the first column is left-aligned and
    /// truncated, the rest are right-aligned.
    pub fn columns(&mut self, cells: &[(&str, usize)]) -> &mut Self {
        let mut row = String::new();
        for (i, (text, width)) in cells.iter().enumerate() {
            if i == 0 {
                let cut: String = text.chars().take(*width).collect();
                row.push_str(&format!("{cut:<width$}"));
            } else {
                row.push_str(&format!("{text:>width$}"));
            }
        }
        self.line(row.trim_end())
    }

    pub fn build(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_separators() {
        let mut b = TextBuilder::new(10);
        b.center("abcd").sep_single();
        assert_eq!(b.build(), "   abcd\n----------\n");
    }

    #[test]
    fn test_line_lr_pads_to_width() {
        let mut b = TextBuilder::new(12);
        b.line_lr("Total", "500");
        assert_eq!(b.build(), "Total    500\n");
    }

    #[test]
    fn test_columns_truncate_first_cell() {
        let mut b = TextBuilder::new(20);
        b.columns(&[("Hand-painted vase", 8), ("2", 4), ("300", 6)]);
        assert_eq!(b.build(), "Hand-pai   2   300\n");
    }
}
