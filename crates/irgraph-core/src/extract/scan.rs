//! Bracket scanning over raw model output.

/// Finds the first balanced span opened by `open` and closed by `close`.
///
/// Returns byte offsets `(start, end)` with `end` exclusive. Brackets inside
/// JSON string literals are ignored once a span has been entered.
pub fn balanced_span(text: &str, open: u8, close: u8) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut from = 0;

    while let Some(offset) = bytes[from..].iter().position(|&b| b == open) {
        let start = from + offset;
        if let Some(end) = span_end(bytes, start, open, close) {
            return Some((start, end));
        }
        from = start + 1;
    }

    None
}

/// Scans forward from an opener, returning the exclusive end of its span.
fn span_end(bytes: &[u8], start: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            _ if b == open => depth += 1,
            _ if b == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Picks the first complete balanced span.
///
/// When an object span and an array span overlap, the object wins unless
/// the array encloses it (a list of objects).
pub fn first_json_span(text: &str) -> Option<(usize, usize)> {
    let object = balanced_span(text, b'{', b'}');
    let array = balanced_span(text, b'[', b']');

    match (object, array) {
        (Some(obj), Some(arr)) => {
            let overlap = obj.0 < arr.1 && arr.0 < obj.1;
            if !overlap {
                Some(if arr.0 < obj.0 { arr } else { obj })
            } else if arr.0 < obj.0 && arr.1 > obj.1 {
                Some(arr)
            } else {
                Some(obj)
            }
        }
        (Some(obj), None) => Some(obj),
        (None, arr) => arr,
    }
}

/// Removes commas that directly precede a closing `}` or `]`.
///
/// Whitespace between the comma and the closer is kept. String literals are
/// left untouched.
pub fn strip_trailing_commas(candidate: &str) -> String {
    let mut out = String::with_capacity(candidate.len());
    let mut pending_comma: Option<String> = None;
    let mut in_string = false;
    let mut escaped = false;

    for c in candidate.chars() {
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

        if let Some(buffer) = pending_comma.as_mut() {
            if c.is_whitespace() {
                buffer.push(c);
                continue;
            }
            let buffer = pending_comma.take().unwrap_or_default();
            if c == '}' || c == ']' {
                // drop the comma, keep the whitespace
                out.push_str(&buffer[1..]);
            } else {
                out.push_str(&buffer);
            }
        }

        match c {
            ',' => pending_comma = Some(String::from(",")),
            '"' => {
                in_string = true;
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    if let Some(buffer) = pending_comma {
        out.push_str(&buffer);
    }

    out
}
