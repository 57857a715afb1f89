//! Block scanners for the declaration shapes found in the data headers.
//!
//! Three shapes are recognised:
//!
//! * family blocks, bounded by `#if P_FAMILY_<NAME>` and its matching
//!   `#endif`;
//! * designated entries, `[SPECIES_<KEY>] = { ... }`;
//! * array blocks, `static const <type> s<Name><Suffix>[] = { ... }`.
//!
//! Brace-delimited bodies are found by balancing braces rather than by
//! stopping at the first `}`, so nested initialisers such as
//! `.abilities = { ... }` stay inside their entry. Every scanner is a
//! lazy iterator over the borrowed source text.

use std::sync::LazyLock;

use regex::Regex;

static FAMILY_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#[ \t]*if[ \t]+(P_FAMILY_\w+)\b").expect("valid regex"));

static FAMILY_MEMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[SPECIES_(\w+)\]\s*=").expect("valid regex"));

/// Header of a designated species entry. The match ends on the opening brace.
pub static SPECIES_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[SPECIES_(\w+)\]\s*=\s*\{").expect("valid regex"));

/// A brace-delimited block with the identifier captured from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub ident: &'a str,
    pub body: &'a str,
}

/// A `#if P_FAMILY_*` region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyBlock<'a> {
    pub name: &'a str,
    pub body: &'a str,
}

impl<'a> FamilyBlock<'a> {
    /// Species keys designated inside the block, in source order.
    pub fn members(&self) -> impl Iterator<Item = &'a str> + 'a {
        let body = self.body;
        FAMILY_MEMBER
            .captures_iter(body)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
    }
}

/// Iterator over top-level family blocks.
pub struct FamilyBlocks<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> FamilyBlocks<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for FamilyBlocks<'a> {
    type Item = FamilyBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.text.len() {
            let caps = FAMILY_OPEN.captures_at(self.text, self.pos)?;
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str();
            let body_start = line_end(self.text, whole.end());

            match find_matching_endif(self.text, body_start) {
                Some((endif_start, endif_end)) => {
                    self.pos = endif_end;
                    return Some(FamilyBlock {
                        name,
                        body: &self.text[body_start..endif_start],
                    });
                }
                None => {
                    // Unterminated block: skip the opener and keep looking.
                    self.pos = body_start;
                }
            }
        }
        None
    }
}

/// Iterator over brace-delimited blocks introduced by `header`.
///
/// `header` must capture the identifier in group 1 and its match must
/// end on the opening `{`.
pub struct BraceBlocks<'a> {
    text: &'a str,
    header: &'a Regex,
    pos: usize,
}

impl<'a> BraceBlocks<'a> {
    pub fn new(text: &'a str, header: &'a Regex) -> Self {
        Self {
            text,
            header,
            pos: 0,
        }
    }
}

impl<'a> Iterator for BraceBlocks<'a> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.text.len() {
            let caps = self.header.captures_at(self.text, self.pos)?;
            let whole = caps.get(0)?;
            let ident = caps.get(1)?.as_str();
            let open = whole.end() - 1;

            match matching_brace(self.text.as_bytes(), open) {
                Some(close) => {
                    self.pos = close + 1;
                    return Some(Block {
                        ident,
                        body: &self.text[open + 1..close],
                    });
                }
                None => {
                    self.pos = whole.end();
                }
            }
        }
        None
    }
}

/// Designated `[SPECIES_*] = { ... }` entries of a species-info header.
pub fn species_entries(text: &str) -> BraceBlocks<'_> {
    BraceBlocks::new(text, &SPECIES_ENTRY)
}

/// First capture group of `pattern` in `body`.
pub fn first_capture<'a>(pattern: &Regex, body: &'a str) -> Option<&'a str> {
    pattern
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Index just past the end of the line containing `pos`.
fn line_end(text: &str, pos: usize) -> usize {
    text[pos..]
        .find('\n')
        .map(|offset| pos + offset + 1)
        .unwrap_or(text.len())
}

/// Find the `#endif` balancing an `#if` whose body starts at `start`.
///
/// Returns the byte range of the `#endif` line.
fn find_matching_endif(text: &str, start: usize) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut line_start = start;

    while line_start < text.len() {
        let next = line_end(text, line_start);
        let line = text[line_start..next].trim_start();

        if let Some(directive) = line.strip_prefix('#') {
            let directive = directive.trim_start();
            if directive.starts_with("endif") {
                if depth == 0 {
                    return Some((line_start, next));
                }
                depth -= 1;
            } else if directive.starts_with("if") {
                // Covers #if, #ifdef and #ifndef.
                depth += 1;
            }
        }
        line_start = next;
    }
    None
}

/// Index of the `}` that balances the `{` at `open`.
///
/// Braces inside string literals, character literals and comments are
/// ignored.
pub fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_literal(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i += 2;
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Skip a quoted literal starting at `start`, returning the index after it.
fn skip_literal(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            b'\n' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}
