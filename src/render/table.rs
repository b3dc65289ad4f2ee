use crate::utils::string::StringUtils;

/// Accumulates rows and lays them out as one left-aligned table, like a tab
/// writer with padding 2: every column but the last is padded to its widest
/// cell plus the padding, the last column is written as is.
pub struct TableWriter {
    padding: usize,
    rows: Vec<Vec<String>>,
}

impl TableWriter {
    pub fn new(padding: usize) -> Self {
        Self {
            padding,
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rows.push(
            cells
                .into_iter()
                .map(|cell| StringUtils::single_line(cell.as_ref()))
                .collect(),
        );
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = Vec::new();
        for row in &self.rows {
            // The trailing cell never contributes to alignment
            for (col, cell) in row.iter().enumerate().take(row.len().saturating_sub(1)) {
                let width = cell.chars().count();
                match widths.get_mut(col) {
                    Some(w) => *w = (*w).max(width),
                    None => widths.push(width),
                }
            }
        }

        let mut out = String::new();
        for row in &self.rows {
            let last = row.len().saturating_sub(1);
            for (col, cell) in row.iter().enumerate() {
                out.push_str(cell);
                if col < last {
                    let pad = widths[col] + self.padding - cell.chars().count();
                    out.extend(std::iter::repeat_n(' ', pad));
                }
            }
            out.push('\n');
        }
        out
    }
}
