//! Template scanning and block parsing.
//!
//! Turns raw template text into a small tree of literal and block nodes.
//! Matching happens structurally, so an `{{else}}` always belongs to its
//! innermost open `{{#if}}` and nested `{{#each}}` blocks pair with their
//! own closers. Unmatched block tags never fail the parse: their raw text
//! is replayed as a literal node and the surrounding content is kept.
//!
//! Variable and helper tokens (`{{name}}`, `{{helper:upper name}}`) are not
//! parsed here. They stay inside [`Node::Text`] and are resolved by the
//! substitution pass, which runs with whichever scope is active at render
//! time.

/// One node of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text, possibly still carrying `{{…}}` substitution tokens
    Text(String),
    /// An `{{#if}}` block with an optional `{{else}}` branch
    If { condition: String, then_branch: Vec<Node>, else_branch: Vec<Node> },
    /// An `{{#each}}` block body repeated per collection item
    Each { path: String, body: Vec<Node> },
}

/// A raw template region produced by the scanner.
#[derive(Debug, PartialEq)]
enum Segment<'a> {
    Text(&'a str),
    IfOpen { raw: &'a str, condition: &'a str },
    Else { raw: &'a str },
    IfClose { raw: &'a str },
    EachOpen { raw: &'a str, path: &'a str },
    EachClose { raw: &'a str },
}

/// Parses template text into a node tree.
///
/// This never fails: syntactically broken block structure degrades to
/// literal text and the parse continues after it.
pub fn parse(template: &str) -> Vec<Node> {
    let segments = scan(template);
    let mut pos = 0;
    let (nodes, _) = parse_nodes(&segments, &mut pos, Enclosing::Top);
    nodes
}

/// Splits template text into literal runs and block tags.
///
/// A tag is a `{{…}}` span whose inner text contains no braces. Tags that
/// are not block markers (plain variables, helper invocations) are left
/// inside the surrounding text run. A `{{` without any `}}` ahead of it
/// makes the rest of the template literal.
fn scan(template: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut search = 0;

    while let Some(rel) = template[search..].find("{{") {
        let open = search + rel;
        let Some(close_rel) = template[open + 2..].find("}}") else {
            break;
        };
        let close = open + 2 + close_rel;
        let inner = &template[open + 2..close];
        if inner.contains('{') || inner.contains('}') {
            // A later "{{" may still start a well-formed tag before this
            // closer, so only move past the first brace pair.
            search = open + 1;
            continue;
        }
        let raw = &template[open..close + 2];
        if let Some(tag) = classify(inner.trim(), raw) {
            if open > text_start {
                segments.push(Segment::Text(&template[text_start..open]));
            }
            segments.push(tag);
            text_start = close + 2;
        }
        search = close + 2;
    }

    if text_start < template.len() {
        segments.push(Segment::Text(&template[text_start..]));
    }
    segments
}

fn classify<'a>(inner: &'a str, raw: &'a str) -> Option<Segment<'a>> {
    if let Some(rest) = inner.strip_prefix("#if ") {
        return Some(Segment::IfOpen { raw, condition: rest.trim() });
    }
    if let Some(rest) = inner.strip_prefix("#each ") {
        return Some(Segment::EachOpen { raw, path: rest.trim() });
    }
    match inner {
        "else" => Some(Segment::Else { raw }),
        "/if" => Some(Segment::IfClose { raw }),
        "/each" => Some(Segment::EachClose { raw }),
        _ => None,
    }
}

/// The block kind currently being filled; decides which closers bind here.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Enclosing {
    Top,
    IfThen,
    IfElse,
    Each,
}

/// Why a `parse_nodes` level returned.
enum Stop<'a> {
    Eof,
    Else { raw: &'a str },
    IfClose,
    EachClose,
}

fn parse_nodes<'a>(
    segments: &[Segment<'a>],
    pos: &mut usize,
    enclosing: Enclosing,
) -> (Vec<Node>, Stop<'a>) {
    let mut nodes = Vec::new();

    while *pos < segments.len() {
        match &segments[*pos] {
            Segment::Text(text) => {
                nodes.push(Node::Text((*text).to_string()));
                *pos += 1;
            }
            Segment::IfOpen { raw, condition } => {
                *pos += 1;
                parse_if(segments, pos, raw, condition, &mut nodes);
            }
            Segment::EachOpen { raw, path } => {
                *pos += 1;
                let (body, stop) = parse_nodes(segments, pos, Enclosing::Each);
                match stop {
                    Stop::EachClose => {
                        nodes.push(Node::Each { path: (*path).to_string(), body });
                    }
                    _ => {
                        // Unterminated loop: replay the opener as literal text.
                        nodes.push(Node::Text((*raw).to_string()));
                        nodes.extend(body);
                    }
                }
            }
            Segment::Else { raw } => {
                *pos += 1;
                if enclosing == Enclosing::IfThen {
                    return (nodes, Stop::Else { raw });
                }
                // An else with no open branch to switch stays literal.
                nodes.push(Node::Text((*raw).to_string()));
            }
            Segment::IfClose { raw } => {
                *pos += 1;
                if matches!(enclosing, Enclosing::IfThen | Enclosing::IfElse) {
                    return (nodes, Stop::IfClose);
                }
                nodes.push(Node::Text((*raw).to_string()));
            }
            Segment::EachClose { raw } => {
                *pos += 1;
                if enclosing == Enclosing::Each {
                    return (nodes, Stop::EachClose);
                }
                nodes.push(Node::Text((*raw).to_string()));
            }
        }
    }

    (nodes, Stop::Eof)
}

fn parse_if<'a>(
    segments: &[Segment<'a>],
    pos: &mut usize,
    raw_open: &'a str,
    condition: &'a str,
    nodes: &mut Vec<Node>,
) {
    let (then_branch, stop) = parse_nodes(segments, pos, Enclosing::IfThen);
    match stop {
        Stop::IfClose => {
            nodes.push(Node::If {
                condition: condition.to_string(),
                then_branch,
                else_branch: Vec::new(),
            });
        }
        Stop::Else { raw: raw_else } => {
            let (else_branch, stop) = parse_nodes(segments, pos, Enclosing::IfElse);
            match stop {
                Stop::IfClose => {
                    nodes.push(Node::If {
                        condition: condition.to_string(),
                        then_branch,
                        else_branch,
                    });
                }
                _ => {
                    // No closer: replay both raw tags around the kept content.
                    nodes.push(Node::Text(raw_open.to_string()));
                    nodes.extend(then_branch);
                    nodes.push(Node::Text(raw_else.to_string()));
                    nodes.extend(else_branch);
                }
            }
        }
        _ => {
            nodes.push(Node::Text(raw_open.to_string()));
            nodes.extend(then_branch);
        }
    }
}
