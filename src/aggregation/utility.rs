use std::cmp::Ordering;

/// `part / total`, or `None` when `total` is zero.
pub fn share(part: usize, total: usize) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(part as f64 / total as f64)
    }
}

/// Orders `(name, count)` pairs by count descending, then name ascending.
pub fn by_count_desc<S: AsRef<str>>(a: &(S, usize), b: &(S, usize)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.as_ref().cmp(b.0.as_ref()))
}

/// Formats an integer with comma thousands separators (`1234567` -> `1,234,567`).
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
