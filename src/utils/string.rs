pub struct StringUtils;

impl StringUtils {
    /// Formats an integer with English thousands separators, e.g. `1,048,576`.
    pub fn group_thousands(value: u64) -> String {
        let digits = value.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);

        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }

        out
    }

    /// Flattens a value so it fits in a single table cell.
    pub fn single_line(value: &str) -> String {
        value
            .chars()
            .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
            .collect()
    }
}
