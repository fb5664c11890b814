/// Greedy word wrap by display columns. Words longer than `width` are split.
/// Blank input lines are kept as empty rows.
pub(in crate::tui_shell) fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw in text.lines() {
        let mut line = String::new();
        let mut line_w = 0;
        for word in raw.split_whitespace() {
            let mut word = word;
            loop {
                let word_w = word.chars().count();
                let sep = usize::from(line_w > 0);
                if line_w + sep + word_w <= width {
                    if sep == 1 {
                        line.push(' ');
                    }
                    line.push_str(word);
                    line_w += sep + word_w;
                    break;
                }
                if line_w > 0 {
                    out.push(std::mem::take(&mut line));
                    line_w = 0;
                    continue;
                }
                let split = word
                    .char_indices()
                    .nth(width)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                out.push(word[..split].to_string());
                word = &word[split..];
                if word.is_empty() {
                    break;
                }
            }
        }
        out.push(line);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}
