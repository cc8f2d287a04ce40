//! ANSI control sequence recognition.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiCodeKind {
    Csi,
    Osc,
    Ss3,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiCode {
    pub code: String,
    pub length: usize,
    pub kind: AnsiCodeKind,
}

/// Recognise a control sequence starting at byte offset `pos`.
pub fn extract_ansi_code(input: &str, pos: usize) -> Option<AnsiCode> {
    let bytes = input.as_bytes();
    if pos + 1 >= bytes.len() || bytes[pos] != 0x1b {
        return None;
    }

    match bytes[pos + 1] {
        b'[' => extract_csi(input, pos),
        b']' => extract_osc(input, pos),
        b'O' => extract_ss3(input, pos),
        _ => None,
    }
}

fn extract_csi(input: &str, pos: usize) -> Option<AnsiCode> {
    let bytes = input.as_bytes();
    let end = (pos + 2..bytes.len()).find(|&idx| (0x40..=0x7e).contains(&bytes[idx]))? + 1;
    Some(AnsiCode {
        code: input[pos..end].to_string(),
        length: end - pos,
        kind: AnsiCodeKind::Csi,
    })
}

fn extract_osc(input: &str, pos: usize) -> Option<AnsiCode> {
    let bytes = input.as_bytes();
    let mut idx = pos + 2;
    while idx < bytes.len() {
        let end = if bytes[idx] == 0x07 {
            Some(idx + 1)
        } else if bytes[idx] == 0x1b && bytes.get(idx + 1) == Some(&b'\\') {
            Some(idx + 2)
        } else {
            None
        };
        if let Some(end) = end {
            return Some(AnsiCode {
                code: input[pos..end].to_string(),
                length: end - pos,
                kind: AnsiCodeKind::Osc,
            });
        }
        idx += 1;
    }
    None
}

fn extract_ss3(input: &str, pos: usize) -> Option<AnsiCode> {
    let end = pos + 3;
    if end > input.len() || !input.is_char_boundary(end) {
        return None;
    }
    Some(AnsiCode {
        code: input[pos..end].to_string(),
        length: 3,
        kind: AnsiCodeKind::Ss3,
    })
}
