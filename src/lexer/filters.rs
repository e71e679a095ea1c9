/// Normalizes source text before it is tokenized.
///
/// Line endings become `\n`, a leading byte order mark and the leading and
/// trailing newlines are removed, tabs are expanded to `tabsize` columns
/// (when non zero), the text ends with exactly one newline, and the first
/// `gobble` characters of every line are dropped.
pub fn prepare(text: &str, gobble: usize, tabsize: usize) -> String {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = text.trim_matches('\n');

    let mut text = if tabsize > 0 {
        expand_tabs(text, tabsize)
    } else {
        text.to_string()
    };
    text.push('\n');

    if gobble > 0 {
        gobble_lines(&text, gobble)
    } else {
        text
    }
}

fn expand_tabs(text: &str, tabsize: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for ch in text.chars() {
        match ch {
            '\t' => {
                let spaces = tabsize - column % tabsize;
                out.extend(std::iter::repeat_n(' ', spaces));
                column += spaces;
            }
            '\n' => {
                out.push(ch);
                column = 0;
            }
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    out
}

fn gobble_lines(text: &str, count: usize) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            let content = line.strip_suffix('\n').unwrap_or(line);
            let cut = content
                .char_indices()
                .nth(count)
                .map_or(content.len(), |(index, _)| index);
            &line[cut..]
        })
        .collect()
}
