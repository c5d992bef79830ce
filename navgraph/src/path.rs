//! Interpreter for the subset of SVG path data that describes walls.
//!
//! Only straight strokes are produced. Curves and arcs keep their end point and lose their
//! control parameters, so every drawing command turns into at most one [`Segment`].

use log::debug;

use crate::{
    error::PathError,
    geometry::{Location, Segment, Vector},
};

/// Whether coordinates are read as absolute positions or as offsets from the cursor.
/// Bare coordinate pairs reuse the mode of the last explicit command.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DrawMode {
    Relative,
    Absolute,
}

impl DrawMode {
    fn of(letter: char) -> Self {
        if letter.is_ascii_uppercase() {
            DrawMode::Absolute
        } else {
            DrawMode::Relative
        }
    }

    fn resolve(self, cursor: Location, x: f32, y: f32) -> Location {
        match self {
            DrawMode::Absolute => Location::new(x, y),
            DrawMode::Relative => cursor + Vector::new(x, y),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum CommandKind {
    MoveTo,
    LineTo,
    ClosePath,
    /// A curve degraded to a line, `skip` is the number of control parameters to drop
    Curve { skip: usize },
}

impl CommandKind {
    fn from_letter(letter: char) -> Option<Self> {
        Some(match letter.to_ascii_lowercase() {
            'm' => CommandKind::MoveTo,
            'l' => CommandKind::LineTo,
            'z' => CommandKind::ClosePath,
            'c' => CommandKind::Curve { skip: 4 },
            's' | 'q' => CommandKind::Curve { skip: 2 },
            't' => CommandKind::Curve { skip: 0 },
            'a' => CommandKind::Curve { skip: 5 },
            _ => return None,
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Token<'a> {
    Command(char),
    Number(&'a str),
}

fn is_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

fn starts_number(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | '+' | '.')
}

/// Splits path data into tokens. Only the leading character is inspected here, so a token in a
/// skipped control-parameter slot is never validated.
fn tokenize(path: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();

    for raw in path.split(is_separator).filter(|t| !t.is_empty()) {
        let Some(first) = raw.chars().next() else {
            continue;
        };

        if starts_number(first) {
            tokens.push(Token::Number(raw));
        } else {
            tokens.push(Token::Command(first));

            // a command glued to its first coordinate, e.g. "M10"
            let rest = &raw[first.len_utf8()..];
            if !rest.is_empty() {
                tokens.push(Token::Number(rest));
            }
        }
    }

    tokens
}

/// Walks the token list and keeps the state of the pen
struct Interpreter<'a> {
    path: &'a str,
    tokens: std::vec::IntoIter<Token<'a>>,
    cursor: Location,
    anchor: Location,
    segments: Vec<Segment>,
}

impl<'a> Interpreter<'a> {
    fn new(path: &'a str, tokens: Vec<Token<'a>>) -> Self {
        Self {
            path,
            tokens: tokens.into_iter(),
            cursor: Location::ORIGIN,
            anchor: Location::ORIGIN,
            segments: Vec::new(),
        }
    }

    fn incomplete(&self, command: char) -> PathError {
        PathError::IncompletePath {
            command,
            path: self.path.to_string(),
        }
    }

    fn parse_number(&self, token: &str) -> Result<f32, PathError> {
        match token.parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(PathError::NumberFormat {
                token: token.to_string(),
                path: self.path.to_string(),
            }),
        }
    }

    fn next_number(&mut self, command: char) -> Result<f32, PathError> {
        match self.tokens.next() {
            Some(Token::Number(token)) => self.parse_number(token),
            Some(Token::Command(letter)) => Err(PathError::NumberFormat {
                token: letter.to_string(),
                path: self.path.to_string(),
            }),
            None => Err(self.incomplete(command)),
        }
    }

    /// Reads the pair that completes a coordinate whose first half is `x`
    fn finish_pair(&mut self, command: char, x: f32) -> Result<(f32, f32), PathError> {
        let y = self.next_number(command)?;
        Ok((x, y))
    }

    fn next_pair(&mut self, command: char) -> Result<(f32, f32), PathError> {
        let x = self.next_number(command)?;
        self.finish_pair(command, x)
    }

    /// Applies a coordinate pair to the cursor, rejecting targets that overflow
    fn locate(&self, mode: DrawMode, x: f32, y: f32) -> Result<Location, PathError> {
        let target = mode.resolve(self.cursor, x, y);

        if target.x.is_finite() && target.y.is_finite() {
            Ok(target)
        } else {
            Err(PathError::NumberFormat {
                token: format!("{},{}", x, y),
                path: self.path.to_string(),
            })
        }
    }

    fn line_to(&mut self, target: Location) {
        self.segments.push(Segment::new(self.cursor, target));
        self.cursor = target;
    }

    fn run(mut self) -> Result<Vec<Segment>, PathError> {
        let mut mode = DrawMode::Relative;

        while let Some(token) = self.tokens.next() {
            match token {
                Token::Number(first) => {
                    // implicit command: a bare pair continues as a line in the current mode
                    let letter = match mode {
                        DrawMode::Absolute => 'L',
                        DrawMode::Relative => 'l',
                    };
                    let x = self.parse_number(first)?;
                    let (x, y) = self.finish_pair(letter, x)?;
                    let target = self.locate(mode, x, y)?;
                    self.line_to(target);
                }
                Token::Command(letter) => {
                    let Some(kind) = CommandKind::from_letter(letter) else {
                        return Err(PathError::MalformedCommand {
                            character: letter,
                            path: self.path.to_string(),
                        });
                    };

                    match kind {
                        CommandKind::ClosePath => {
                            let anchor = self.anchor;
                            self.line_to(anchor);
                        }
                        CommandKind::MoveTo => {
                            mode = DrawMode::of(letter);
                            let (x, y) = self.next_pair(letter)?;
                            self.cursor = self.locate(mode, x, y)?;
                            self.anchor = self.cursor;
                        }
                        CommandKind::LineTo => {
                            mode = DrawMode::of(letter);
                            let (x, y) = self.next_pair(letter)?;
                            let target = self.locate(mode, x, y)?;
                            self.line_to(target);
                        }
                        CommandKind::Curve { skip } => {
                            mode = DrawMode::of(letter);
                            for _ in 0..skip {
                                if self.tokens.next().is_none() {
                                    return Err(self.incomplete(letter));
                                }
                            }
                            let (x, y) = self.next_pair(letter)?;
                            let target = self.locate(mode, x, y)?;
                            self.line_to(target);
                        }
                    }
                }
            }
        }

        Ok(self.segments)
    }
}

/// Interprets a path-data string and returns its straight strokes in absolute coordinates.
///
/// Supported commands are `M L Z C S Q T A` in both cases. Tokens are separated by whitespace
/// or commas. A bare coordinate pair repeats a line in the mode of the last command, and the
/// cursor starts at the origin.
pub fn parse_path(path: &str) -> Result<Vec<Segment>, PathError> {
    let tokens = tokenize(path);
    let segments = Interpreter::new(path, tokens).run()?;

    debug!("path yielded {} segments", segments.len());

    Ok(segments)
}
