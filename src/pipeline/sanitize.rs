//! Best-effort cleanup of raw model output before JSON parsing
//!
//! Chat models wrap their JSON in markdown fences, put a sentence in front of
//! it, append "Let me know if..." after it, and occasionally sprinkle `//`
//! comments into it. [`sanitize`] removes that noise without touching anything
//! inside string literals. It does not parse or repair the JSON itself.

/// Strips fences, surrounding prose and comments from a model response.
///
/// Text that is already valid JSON is returned trimmed and otherwise
/// unchanged. The function is idempotent.
pub fn sanitize(raw: &str) -> String {
    let mut current = sanitize_once(raw);
    // Every pass only removes characters, so this reaches a fixed point.
    loop {
        let next = sanitize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_once(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_json(trimmed) {
        return trimmed.to_string();
    }

    let body = match after_opening_fence(trimmed) {
        Some(rest) if rest.contains(is_document_open) => rest,
        _ => trimmed,
    };
    let unfenced = strip_fence_lines(body);
    if is_json(&unfenced) {
        return unfenced;
    }

    match unfenced.find(is_document_open) {
        Some(start) => extract_document(&unfenced[start..]),
        None => unfenced,
    }
}

fn is_json(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text).is_ok()
}

fn is_document_open(c: char) -> bool {
    c == '{' || c == '['
}

fn is_fence_line(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Text following the first fence line, i.e. past any leading prose and the
/// opening ```json marker. A fence line can never sit inside a JSON string,
/// since JSON strings cannot span lines.
fn after_opening_fence(text: &str) -> Option<&str> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if is_fence_line(line) {
            return Some(if line.ends_with('\n') {
                &text[offset + line.len()..]
            } else {
                let fence = offset + line.len() - line.trim_start().len();
                &text[fence + 3..]
            });
        }
        offset += line.len();
    }
    None
}

fn strip_fence_lines(text: &str) -> String {
    if !text.lines().any(is_fence_line) {
        return text.trim().to_string();
    }
    text.lines()
        .filter(|line| !is_fence_line(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Copies the first balanced object/array out of `text`, dropping comments
/// that sit outside string literals. `text` must start at the opening bracket.
/// An unterminated document is returned as far as it goes.
fn extract_document(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            '{' | '[' => {
                depth += 1;
                out.push(c);
            }
            '}' | ']' => {
                out.push(c);
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
            _ => out.push(c),
        }
    }

    out.trim().to_string()
}
