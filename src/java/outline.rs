//! Structural outline of a Java compilation unit.
//!
//! This is not a parser: it splits the token stream into statements and
//! blocks and recognizes declarations by shape. Expressions are never
//! interpreted.

use super::lexer::{tokenize, LexError, Token, TokenKind};
use serde::Serialize;
use std::fmt::Write as _;

const MODIFIERS: &[&str] = &[
    "public", "protected", "private", "static", "final", "abstract", "native", "synchronized",
    "transient", "volatile", "strictfp", "default",
];

const PRIMITIVES: &[&str] = &["boolean", "byte", "char", "short", "int", "long", "float", "double", "void"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Record => "record",
            TypeKind::Annotation => "annotation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub qualifiers: Vec<String>,
    pub type_name: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Package {
        name: String,
    },
    Import {
        path: String,
        is_static: bool,
    },
    Class {
        kind: TypeKind,
        qualifiers: Vec<String>,
        name: String,
        children: Vec<Node>,
    },
    Method {
        qualifiers: Vec<String>,
        return_type: Option<String>,
        name: String,
        parameters: Vec<Variable>,
        children: Vec<Node>,
    },
    Variable(Variable),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub children: Vec<Node>,
}

impl Outline {
    /// Names of the top-level types.
    pub fn top_level_types(&self) -> Vec<&str> {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Class { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn package(&self) -> Option<&str> {
        self.children.iter().find_map(|node| match node {
            Node::Package { name } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Renders the tree, one node per line, two spaces per level.
    pub fn render(&self) -> String {
        let mut out = String::from("root\n");
        for child in &self.children {
            render_node(child, 1, &mut out);
        }
        out
    }
}

fn bracketed(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}

fn render_variable(var: &Variable, depth: usize, out: &mut String) {
    let _ = writeln!(
        out,
        "{}variable: {} {} {}",
        "  ".repeat(depth),
        bracketed(&var.qualifiers),
        var.type_name,
        var.name
    );
}

fn render_node(node: &Node, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Package { name } => {
            let _ = writeln!(out, "{}package: {}", indent, name);
        }
        Node::Import { path, is_static } => {
            let prefix = if *is_static { "static " } else { "" };
            let _ = writeln!(out, "{}import: {}{}", indent, prefix, path);
        }
        Node::Class {
            kind,
            qualifiers,
            name,
            children,
        } => {
            let _ = writeln!(out, "{}{}: {} {}", indent, kind.as_str(), bracketed(qualifiers), name);
            for child in children {
                render_node(child, depth + 1, out);
            }
        }
        Node::Method {
            qualifiers,
            return_type,
            name,
            parameters,
            children,
        } => {
            let mut words = qualifiers.clone();
            words.extend(return_type.iter().cloned());
            let _ = writeln!(out, "{}method: {} {}", indent, bracketed(&words), name);
            if !parameters.is_empty() {
                let _ = writeln!(out, "{}  parameters", indent);
                for param in parameters {
                    render_variable(param, depth + 2, out);
                }
            }
            for child in children {
                render_node(child, depth + 1, out);
            }
        }
        Node::Variable(var) => render_variable(var, depth, out),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    CompilationUnit,
    ClassBody,
    Block,
}

struct Parser<'a> {
    tokens: Vec<&'a Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).copied()
    }

    /// Skips a balanced `{ ... }` group; the cursor sits on the opening brace.
    fn skip_braces(&mut self) {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            self.pos += 1;
            if tok.is_punct("{") {
                depth += 1;
            } else if tok.is_punct("}") {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
        }
    }

    /// Parses members until the closing brace of the current scope (consumed)
    /// or the end of input.
    fn members(&mut self, scope: Scope) -> Vec<Node> {
        let mut nodes = Vec::new();

        loop {
            let Some(tok) = self.peek() else {
                return nodes;
            };
            if tok.is_punct("}") {
                self.pos += 1;
                return nodes;
            }

            let start = self.pos;
            let mut depth = 0usize;
            let mut assigned = false;

            while let Some(tok) = self.peek() {
                if tok.is_punct("(") || tok.is_punct("[") {
                    depth += 1;
                } else if tok.is_punct(")") || tok.is_punct("]") {
                    depth = depth.saturating_sub(1);
                } else if depth == 0 {
                    if tok.is_punct("=") || tok.is_punct("->") || tok.is_keyword("new") {
                        assigned = true;
                    }
                    if tok.is_punct(";") {
                        let stmt = &self.tokens[start..self.pos];
                        self.pos += 1;
                        nodes.extend(statement(stmt, scope));
                        break;
                    }
                    if tok.is_punct("}") {
                        // Statement without a terminator, such as trailing enum constants.
                        break;
                    }
                    if tok.is_punct("{") {
                        if assigned {
                            self.skip_braces();
                            continue;
                        }
                        let header: Vec<&Token> = self.tokens[start..self.pos].to_vec();
                        self.pos += 1;
                        nodes.extend(self.block(&header, scope));
                        break;
                    }
                }
                self.pos += 1;
            }

            if self.pos == start {
                // Unbalanced input; never spin.
                self.pos += 1;
            }
        }
    }

    fn block(&mut self, header: &[&Token], scope: Scope) -> Vec<Node> {
        if let Some((kind, qualifiers, name)) = type_header(header) {
            let children = self.members(Scope::ClassBody);
            return vec![Node::Class {
                kind,
                qualifiers,
                name,
                children,
            }];
        }

        if scope != Scope::Block {
            if let Some(mut method) = method_header(header) {
                if let Node::Method { children, .. } = &mut method {
                    *children = self.members(Scope::Block);
                }
                return vec![method];
            }
            // Initializer blocks and enum constant bodies.
            self.pos -= 1;
            self.skip_braces();
            return Vec::new();
        }

        // Nested statement block: locals declared inside still belong to the method.
        self.members(Scope::Block)
    }
}

fn statement(stmt: &[&Token], scope: Scope) -> Option<Node> {
    let first = stmt.first()?;

    if scope == Scope::CompilationUnit && first.is_keyword("package") {
        return Some(Node::Package {
            name: join_tokens(&stmt[1..]),
        });
    }

    if scope == Scope::CompilationUnit && first.is_keyword("import") {
        let is_static = stmt.get(1).is_some_and(|t| t.is_keyword("static"));
        let skip = if is_static { 2 } else { 1 };
        return Some(Node::Import {
            path: join_tokens(&stmt[skip..]),
            is_static,
        });
    }

    let has_assignment = stmt.iter().any(|t| t.is_punct("="));
    if scope == Scope::ClassBody && !has_assignment {
        if let Some(method) = method_header(stmt) {
            return Some(method);
        }
    }

    declaration(stmt).map(Node::Variable)
}

fn join_tokens(tokens: &[&Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

/// Splits off leading annotations and modifiers.
fn qualifiers<'t>(tokens: &'t [&'t Token]) -> (Vec<String>, &'t [&'t Token]) {
    let mut quals = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let tok = tokens[i];
        if tok.is_punct("@") && !tokens.get(i + 1).is_some_and(|t| t.is_keyword("interface")) {
            let start = i;
            i += 1;
            while i < tokens.len() && (tokens[i].is_identifier() || tokens[i].is_punct(".")) {
                i += 1;
            }
            if tokens.get(i).is_some_and(|t| t.is_punct("(")) {
                let mut depth = 0usize;
                while i < tokens.len() {
                    if tokens[i].is_punct("(") {
                        depth += 1;
                    } else if tokens[i].is_punct(")") {
                        depth -= 1;
                        if depth == 0 {
                            i += 1;
                            break;
                        }
                    }
                    i += 1;
                }
            }
            quals.push(join_tokens(&tokens[start..i]));
        } else if (tok.kind == TokenKind::Keyword && MODIFIERS.contains(&tok.text.as_str()))
            || (tok.is_identifier() && tok.text == "sealed")
        {
            quals.push(tok.text.clone());
            i += 1;
        } else {
            break;
        }
    }

    (quals, &tokens[i..])
}

fn type_header(header: &[&Token]) -> Option<(TypeKind, Vec<String>, String)> {
    let (quals, rest) = qualifiers(header);
    let mut depth = 0usize;

    for (i, tok) in rest.iter().enumerate() {
        if tok.is_punct("(") {
            depth += 1;
            continue;
        }
        if tok.is_punct(")") {
            depth = depth.saturating_sub(1);
            continue;
        }
        if depth > 0 {
            continue;
        }

        let kind = if tok.is_keyword("class") {
            Some(TypeKind::Class)
        } else if tok.is_keyword("interface") {
            if i > 0 && rest[i - 1].is_punct("@") {
                Some(TypeKind::Annotation)
            } else {
                Some(TypeKind::Interface)
            }
        } else if tok.is_keyword("enum") {
            Some(TypeKind::Enum)
        } else if tok.is_identifier()
            && tok.text == "record"
            && rest.get(i + 1).is_some_and(|t| t.is_identifier())
        {
            Some(TypeKind::Record)
        } else {
            None
        };

        if let Some(kind) = kind {
            let name = rest.get(i + 1).filter(|t| t.is_identifier())?;
            return Some((kind, quals, name.text.clone()));
        }
    }

    None
}

fn method_header(header: &[&Token]) -> Option<Node> {
    let (quals, mut rest) = qualifiers(header);

    // Generic method type parameters.
    if rest.first().is_some_and(|t| t.is_punct("<")) {
        let mut depth = 0usize;
        let mut end = 0;
        for (i, tok) in rest.iter().enumerate() {
            if tok.is_punct("<") {
                depth += 1;
            } else if tok.is_punct(">") {
                depth -= 1;
                if depth == 0 {
                    end = i + 1;
                    break;
                }
            }
        }
        rest = &rest[end..];
    }

    let open = rest.iter().position(|t| t.is_punct("("))?;
    if open == 0 || !rest[open - 1].is_identifier() {
        return None;
    }
    let name = rest[open - 1].text.clone();

    let type_tokens = &rest[..open - 1];
    if !type_tokens.is_empty() && !is_type(type_tokens) {
        return None;
    }
    let return_type = (!type_tokens.is_empty()).then(|| type_name(type_tokens));

    let mut depth = 0usize;
    let mut close = None;
    for (i, tok) in rest.iter().enumerate().skip(open) {
        if tok.is_punct("(") {
            depth += 1;
        } else if tok.is_punct(")") {
            depth -= 1;
            if depth == 0 {
                close = Some(i);
                break;
            }
        }
    }
    let close = close?;

    let parameters = split_top_level(&rest[open + 1..close])
        .into_iter()
        .filter_map(declaration)
        .collect();

    Some(Node::Method {
        qualifiers: quals,
        return_type,
        name,
        parameters,
        children: Vec::new(),
    })
}

/// Splits on commas outside of `<>`, `()` and `[]`.
fn split_top_level<'t>(tokens: &'t [&'t Token]) -> Vec<&'t [&'t Token]> {
    let mut parts = Vec::new();
    let mut depth = 0isize;
    let mut start = 0;

    for (i, tok) in tokens.iter().enumerate() {
        match tok.text.as_str() {
            "<" | "(" | "[" if tok.kind == TokenKind::Punct => depth += 1,
            ">" | ")" | "]" if tok.kind == TokenKind::Punct => depth -= 1,
            "," if depth == 0 => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < tokens.len() {
        parts.push(&tokens[start..]);
    }
    parts
}

fn is_type(tokens: &[&Token]) -> bool {
    let Some(first) = tokens.first() else {
        return false;
    };
    if !(first.is_identifier() || (first.kind == TokenKind::Keyword && PRIMITIVES.contains(&first.text.as_str()))) {
        return false;
    }

    let mut angle = 0isize;
    for tok in tokens {
        let ok = match &tok.kind {
            TokenKind::Identifier => true,
            TokenKind::Keyword => {
                PRIMITIVES.contains(&tok.text.as_str())
                    || (angle > 0 && matches!(tok.text.as_str(), "extends" | "super"))
            }
            TokenKind::Punct => match tok.text.as_str() {
                "<" => {
                    angle += 1;
                    true
                }
                ">" => {
                    angle -= 1;
                    angle >= 0
                }
                "." | "[" | "]" | "..." => true,
                "," | "?" | "&" => angle > 0,
                _ => false,
            },
            _ => false,
        };
        if !ok {
            return false;
        }
    }
    angle == 0
}

fn type_name(tokens: &[&Token]) -> String {
    let mut out = String::new();
    for tok in tokens {
        match tok.text.as_str() {
            "," => out.push_str(", "),
            "&" => out.push_str(" & "),
            "extends" | "super" => {
                out.push(' ');
                out.push_str(&tok.text);
                out.push(' ');
            }
            text => out.push_str(text),
        }
    }
    out
}

/// Recognizes `[qualifiers] Type name [= ...]`, keeping the first declarator.
fn declaration(tokens: &[&Token]) -> Option<Variable> {
    let end = tokens.iter().position(|t| t.is_punct("=")).unwrap_or(tokens.len());
    let (quals, rest) = qualifiers(&tokens[..end]);
    let first = split_top_level(rest).into_iter().next()?;

    let (name, type_tokens) = first.split_last()?;
    if !name.is_identifier() || !is_type(type_tokens) {
        return None;
    }

    Some(Variable {
        qualifiers: quals,
        type_name: type_name(type_tokens),
        name: name.text.clone(),
    })
}

pub fn parse(tokens: &[Token]) -> Outline {
    let mut parser = Parser {
        tokens: tokens.iter().filter(|t| !t.is_comment()).collect(),
        pos: 0,
    };

    let mut children = Vec::new();
    while parser.peek().is_some() {
        children.extend(parser.members(Scope::CompilationUnit));
    }
    Outline { children }
}

pub fn outline(source: &str) -> Result<Outline, LexError> {
    Ok(parse(&tokenize(source)?))
}
