//! Java source handling: escape decoding, tokenizing and a structural outline.

pub mod escape;
pub mod lexer;
pub mod outline;

pub use escape::{unescape, Escape, EscapeError, EscapeKind};
pub use lexer::{tokenize, LexError, Literal, Token, TokenKind};
pub use outline::{outline, Node, Outline};
