//! Canonical layout for generated Go source.
//!
//! A small, deterministic subset of what `gofmt -s` does, sufficient for
//! the code the Go backend emits:
//!
//! - one tab of indentation per open block, where a line that leaves
//!   several brackets open (`app.Post("/x", func(c *fiber.Ctx) error {`)
//!   still indents by one level only;
//! - struct field blocks aligned into columns (name, type, tag);
//! - trailing whitespace removed, runs of blank lines collapsed, no blank
//!   lines at the start or end of a block, exactly one trailing newline.
//!
//! The laid-out text is then parsed with the tree-sitter Go grammar, and
//! anything that does not parse cleanly (an identifier that is not a Go
//! identifier, a stray token, a missing delimiter) is rejected, as gofmt
//! refuses to print source it cannot parse.

use crate::error::{Error, Result};
use tree_sitter::{Node, Parser};

/// Format Go source text.
pub fn format(source: &str) -> Result<String> {
    let lines = layout(source)?;
    let lines = drop_redundant_blank_lines(lines);
    let mut out = String::new();
    let mut i = 0;
    while i < lines.len() {
        let block = lines[i].field_block;
        if block.is_some() {
            let end = lines[i..]
                .iter()
                .position(|l| l.field_block != block)
                .map_or(lines.len(), |p| i + p);
            write_aligned(&mut out, &lines[i..end]);
            i = end;
        } else {
            write_line(&mut out, lines[i].indent, &lines[i].text);
            i += 1;
        }
    }
    check_syntax(&out)?;
    Ok(out)
}

/// Parse `source` as Go, failing on any ERROR or MISSING node.
pub fn check_syntax(source: &str) -> Result<()> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_go::language().into())
        .map_err(|err| Error::Emit(err.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::Emit("failed to parse generated code".into()))?;

    let root = tree.root_node();
    if !root.has_error() {
        return Ok(());
    }
    let message = match first_error(root) {
        Some(node) => describe_error(node, source),
        None => "syntax error in generated code".to_string(),
    };
    Err(Error::Emit(message))
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .filter(|child| child.has_error())
        .find_map(first_error);
    found
}

fn describe_error(node: Node<'_>, source: &str) -> String {
    let row = node.start_position().row;
    let line = source.lines().nth(row).unwrap_or("").trim();
    if node.is_missing() {
        format!("missing {} on line {}: {}", node.kind(), row + 1, line)
    } else {
        format!("syntax error on line {}: {}", row + 1, line)
    }
}

#[derive(Debug)]
struct Line {
    indent: usize,
    text: String,
    /// Set for the fields of a `struct {` block; consecutive lines with the
    /// same id form one alignment section.
    field_block: Option<usize>,
    opens_block: bool,
}

impl Line {
    fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug)]
struct Open {
    bracket: char,
    line: usize,
    /// Whether this bracket accounts for one level of indentation.
    indents: bool,
    /// Id of the struct field block this bracket opens, if any.
    struct_block: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Literal {
    None,
    Interpreted,
    Rune,
    Raw,
    BlockComment,
}

fn layout(source: &str) -> Result<Vec<Line>> {
    let mut stack: Vec<Open> = Vec::new();
    let mut lines = Vec::new();
    let mut literal = Literal::None;
    let mut next_block = 0;

    for (number, raw_line) in source.lines().enumerate() {
        let line_no = number + 1;

        // Continuation of a multi-line raw string is kept verbatim.
        let verbatim = literal == Literal::Raw;
        let text = if verbatim {
            raw_line.trim_end_matches('\r').to_string()
        } else {
            raw_line.trim().to_string()
        };

        let field_block = match (literal, stack.last()) {
            (Literal::None, Some(top)) if !starts_with_closer(&text) && !text.is_empty() => {
                top.struct_block
            }
            _ => None,
        };

        let mut indent = None;
        let mut leading = true;
        let mut opened_here = Vec::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match literal {
                Literal::Interpreted | Literal::Rune => {
                    let end = if literal == Literal::Interpreted { '"' } else { '\'' };
                    if c == '\\' {
                        chars.next();
                    } else if c == end {
                        literal = Literal::None;
                    }
                    continue;
                }
                Literal::Raw => {
                    if c == '`' {
                        literal = Literal::None;
                    }
                    continue;
                }
                Literal::BlockComment => {
                    if c == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        literal = Literal::None;
                    }
                    continue;
                }
                Literal::None => {}
            }

            let is_closer = matches!(c, '}' | ')' | ']');
            if leading && !is_closer && !c.is_whitespace() {
                leading = false;
                indent = Some(indent_level(&stack));
            }

            match c {
                '"' => literal = Literal::Interpreted,
                '\'' => literal = Literal::Rune,
                '`' => literal = Literal::Raw,
                '/' if chars.peek() == Some(&'/') => break,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    literal = Literal::BlockComment;
                }
                '{' | '(' | '[' => {
                    opened_here.push(stack.len());
                    stack.push(Open {
                        bracket: c,
                        line: line_no,
                        indents: false,
                        struct_block: None,
                    });
                }
                '}' | ')' | ']' => {
                    let expected = match c {
                        '}' => '{',
                        ')' => '(',
                        _ => '[',
                    };
                    match stack.pop() {
                        Some(open) if open.bracket == expected => {
                            opened_here.retain(|&i| i < stack.len());
                        }
                        Some(open) => {
                            return Err(Error::Emit(format!(
                                "'{}' on line {} closed by '{}' on line {}",
                                open.bracket, open.line, c, line_no
                            )));
                        }
                        None => {
                            return Err(Error::Emit(format!(
                                "unexpected '{c}' on line {line_no}"
                            )));
                        }
                    }
                }
                _ => {}
            }
        }

        if matches!(literal, Literal::Interpreted | Literal::Rune) {
            return Err(Error::Emit(format!(
                "unterminated string literal on line {line_no}"
            )));
        }

        let indent = indent.unwrap_or_else(|| indent_level(&stack));

        // Only the innermost bracket left open by this line indents the
        // lines that follow.
        let opens_block = if let Some(&last) = opened_here.last() {
            let open = &mut stack[last];
            open.indents = true;
            if open.bracket == '{' && text.ends_with("struct {") {
                open.struct_block = Some(next_block);
                next_block += 1;
            }
            true
        } else {
            false
        };

        lines.push(Line {
            indent: if verbatim { 0 } else { indent },
            text,
            field_block,
            opens_block,
        });
    }

    if let Some(open) = stack.last() {
        return Err(Error::Emit(format!(
            "unclosed '{}' opened on line {}",
            open.bracket, open.line
        )));
    }
    match literal {
        Literal::None => Ok(lines),
        Literal::Raw => Err(Error::Emit("unterminated raw string literal".to_string())),
        _ => Err(Error::Emit("unterminated comment".to_string())),
    }
}

fn indent_level(stack: &[Open]) -> usize {
    stack.iter().filter(|o| o.indents).count()
}

fn starts_with_closer(text: &str) -> bool {
    text.starts_with(['}', ')', ']'])
}

fn drop_redundant_blank_lines(lines: Vec<Line>) -> Vec<Line> {
    let mut kept: Vec<Line> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.is_blank() {
            let after_opener_or_blank = kept.last().is_none_or(|l| l.is_blank() || l.opens_block);
            if after_opener_or_blank {
                continue;
            }
        } else if starts_with_closer(&line.text) {
            while kept.last().is_some_and(Line::is_blank) {
                kept.pop();
            }
        }
        kept.push(line);
    }
    while kept.last().is_some_and(Line::is_blank) {
        kept.pop();
    }
    kept
}

fn write_line(out: &mut String, indent: usize, text: &str) {
    if !text.is_empty() {
        for _ in 0..indent {
            out.push('\t');
        }
        out.push_str(text);
    }
    out.push('\n');
}

/// Write a run of struct fields with their columns padded to a common width.
fn write_aligned(out: &mut String, lines: &[Line]) {
    let rows: Vec<Vec<String>> = lines.iter().map(|l| split_cells(&l.text)).collect();
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in &rows {
        // The last cell of a row never pads, so it does not widen its column.
        for (i, cell) in row.iter().enumerate().take(row.len().saturating_sub(1)) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    for (line, row) in lines.iter().zip(&rows) {
        let mut text = String::new();
        for (i, cell) in row.iter().enumerate() {
            text.push_str(cell);
            if i + 1 < row.len() {
                let pad = widths[i] + 1 - cell.chars().count();
                text.extend(std::iter::repeat_n(' ', pad));
            }
        }
        write_line(out, line.indent, &text);
    }
}

/// Split a field line into whitespace-separated cells, keeping quoted and
/// backquoted text (struct tags) intact. A trailing comment is one cell.
fn split_cells(text: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == '\\' && q == '"' {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                } else if c == q {
                    quote = None;
                }
            }
            None if c == '/' && chars.peek() == Some(&'/') => {
                if !current.is_empty() {
                    cells.push(std::mem::take(&mut current));
                }
                current.push(c);
                current.extend(chars.by_ref());
            }
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    cells.push(std::mem::take(&mut current));
                }
            }
            None => {
                if c == '"' || c == '`' {
                    quote = Some(c);
                }
                current.push(c);
            }
        }
    }
    if !current.is_empty() {
        cells.push(current);
    }
    cells
}
