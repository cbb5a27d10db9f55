/// Greedy word wrap to at most `width` characters per line.
///
/// Words are separated by whitespace; a word longer than `width` is broken
/// into `width`-sized chunks. Returns at least one (possibly empty) line.
pub fn wrap_label(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        let needed = if current_len == 0 {
            chars.len()
        } else {
            current_len + 1 + chars.len()
        };
        if needed <= width {
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(chars.iter());
            current_len += chars.len();
            continue;
        }

        // Fill the remainder of the current line before breaking a long word.
        if chars.len() > width && current_len + 1 < width {
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            let take = width - current_len;
            current.extend(chars.drain(..take));
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        while chars.len() > width {
            lines.push(chars.drain(..width).collect());
        }
        current_len = chars.len();
        current.extend(chars);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
