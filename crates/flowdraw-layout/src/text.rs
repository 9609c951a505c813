const AVERAGE_ADVANCE: f64 = 0.6;

pub fn approximate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * AVERAGE_ADVANCE
}

pub fn wrap_words<F>(text: &str, max_width: f64, mut measure: F) -> Vec<String>
where
    F: FnMut(&str) -> f64,
{
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if measure(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

pub fn first_baseline(center_y: f64, line_count: usize, font_size: f64, line_height: f64) -> f64 {
    let step = font_size * line_height;
    let block = step * line_count.saturating_sub(1) as f64;
    // Baseline sits roughly a third of the em below the visual middle.
    center_y - block / 2.0 + font_size * 0.35
}
