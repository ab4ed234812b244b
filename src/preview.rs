//! Syntax coloring for the JSON preview.
//!
//! The tokenizer only has to understand what `serde_json` pretty-prints, but
//! it tolerates arbitrary text: anything it does not recognise is emitted as
//! punctuation.

use clap::ValueEnum;
use colored::{Color as AnsiColor, Colorize};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Punct,
    Key,
    Str,
    Number,
    Bool,
    Null,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Split one line of JSON text into colored tokens.
pub fn tokenize_line(line: &str) -> Vec<Token<'_>> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let kind = match bytes[pos] {
            b' ' | b'\t' => {
                while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t') {
                    pos += 1;
                }
                TokenKind::Space
            }
            b'"' => {
                pos = string_end(bytes, pos);
                if next_non_space(bytes, pos) == Some(b':') {
                    TokenKind::Key
                } else {
                    TokenKind::Str
                }
            }
            b'-' | b'0'..=b'9' => {
                while pos < bytes.len()
                    && matches!(bytes[pos], b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9')
                {
                    pos += 1;
                }
                TokenKind::Number
            }
            _ if line[pos..].starts_with("true") => {
                pos += 4;
                TokenKind::Bool
            }
            _ if line[pos..].starts_with("false") => {
                pos += 5;
                TokenKind::Bool
            }
            _ if line[pos..].starts_with("null") => {
                pos += 4;
                TokenKind::Null
            }
            _ => {
                pos += line[pos..].chars().next().map_or(1, char::len_utf8);
                TokenKind::Punct
            }
        };
        tokens.push(Token {
            kind,
            text: &line[start..pos],
        });
    }

    tokens
}

fn string_end(bytes: &[u8], open: usize) -> usize {
    let mut pos = open + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'"' => return pos + 1,
            _ => pos += 1,
        }
    }
    bytes.len()
}

fn next_non_space(bytes: &[u8], from: usize) -> Option<u8> {
    bytes[from.min(bytes.len())..]
        .iter()
        .copied()
        .find(|b| !matches!(b, b' ' | b'\t'))
}

/// Preview color scheme. Only affects presentation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[clap(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// RGB for a token kind, `None` for the default foreground.
    pub fn rgb(self, kind: TokenKind) -> Option<(u8, u8, u8)> {
        match (self, kind) {
            (_, TokenKind::Space) => None,
            (Self::Light, TokenKind::Punct) => Some((0x38, 0x3a, 0x42)),
            (Self::Light, TokenKind::Key) => Some((0xe4, 0x56, 0x49)),
            (Self::Light, TokenKind::Str) => Some((0x50, 0xa1, 0x4f)),
            (Self::Light, TokenKind::Number) => Some((0x98, 0x68, 0x01)),
            (Self::Light, TokenKind::Bool | TokenKind::Null) => Some((0x01, 0x84, 0xbc)),
            (Self::Dark, TokenKind::Punct) => Some((0xab, 0xb2, 0xbf)),
            (Self::Dark, TokenKind::Key) => Some((0xe0, 0x6c, 0x75)),
            (Self::Dark, TokenKind::Str) => Some((0x98, 0xc3, 0x79)),
            (Self::Dark, TokenKind::Number) => Some((0xd1, 0x9a, 0x66)),
            (Self::Dark, TokenKind::Bool | TokenKind::Null) => Some((0x56, 0xb6, 0xc2)),
        }
    }

    pub fn background(self) -> (u8, u8, u8) {
        match self {
            Self::Light => (0xfa, 0xfa, 0xfa),
            Self::Dark => (0x28, 0x2c, 0x34),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

/// Color JSON text with ANSI escapes. `colored` leaves the text plain when
/// `NO_COLOR` is set.
pub fn highlight_ansi(json: &str, theme: Theme) -> String {
    json.lines()
        .map(|line| {
            tokenize_line(line)
                .into_iter()
                .map(|token| match theme.rgb(token.kind) {
                    Some((r, g, b)) => token
                        .text
                        .color(AnsiColor::TrueColor { r, g, b })
                        .to_string(),
                    None => token.text.to_string(),
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Color JSON text as ratatui lines.
pub fn highlight_lines(json: &str, theme: Theme) -> Vec<Line<'static>> {
    json.lines()
        .map(|line| {
            Line::from(
                tokenize_line(line)
                    .into_iter()
                    .map(|token| {
                        let style = theme
                            .rgb(token.kind)
                            .map(|(r, g, b)| Style::default().fg(Color::Rgb(r, g, b)))
                            .unwrap_or_default();
                        Span::styled(token.text.to_string(), style)
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}
