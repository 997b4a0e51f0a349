// rle.rs - Decoder for RLE pattern files
//
//   #N Glider            comment lines start with '#'
//   x = 3, y = 3, rule = B3/S23
//   bob$2bo$3o!
//
// `b` (or `.`) is a dead cell, `o` (or any other letter) a live one, `$` ends
// a row and `!` ends the pattern. Any tag may be preceded by a repeat count.

use std::path::Path;
use std::str::FromStr;

use crate::error::PatternError;
use crate::grid::{ALIVE, Cell, DEAD};

/// A decoded pattern: declared size, optional rule and the cells as seed rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternFile {
    pub width: usize,
    pub height: usize,
    pub rule: Option<String>,
    pub seed: Vec<Vec<Cell>>,
}

pub fn read(path: impl AsRef<Path>) -> Result<PatternFile, PatternError> {
    std::fs::read_to_string(path)?.parse()
}

impl FromStr for PatternFile {
    type Err = PatternError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (_, header) = lines.next().ok_or(PatternError::MissingHeader)?;
        let mut pattern = parse_header(header)?;

        let (mut x, mut y): (usize, usize) = (0, 0);
        let mut count: Option<usize> = None;

        'body: for (number, line) in lines {
            let too_long = || PatternError::RunTooLong { line: number };
            for token in line.chars() {
                if let Some(digit) = token.to_digit(10) {
                    let next = count.unwrap_or(0).checked_mul(10).and_then(|c| c.checked_add(digit as usize));
                    count = Some(next.ok_or_else(too_long)?);
                    continue;
                }
                let run = count.take().unwrap_or(1);
                match token {
                    'b' | '.' => x = x.checked_add(run).ok_or_else(too_long)?,
                    '$' => {
                        y = y.checked_add(run).ok_or_else(too_long)?;
                        x = 0;
                    }
                    '!' => break 'body,
                    t if t.is_ascii_alphabetic() => {
                        for _ in 0..run {
                            pattern.set_alive(x, y)?;
                            x += 1;
                        }
                    }
                    t if t.is_whitespace() => {}
                    t => return Err(PatternError::InvalidToken { token: t, line: number }),
                }
            }
        }

        Ok(pattern)
    }
}

impl PatternFile {
    fn set_alive(&mut self, x: usize, y: usize) -> Result<(), PatternError> {
        let (width, height) = (self.width, self.height);
        let cell = self
            .seed
            .get_mut(y)
            .and_then(|row| row.get_mut(x))
            .ok_or(PatternError::OutOfBounds { x, y, width, height })?;
        *cell = ALIVE;
        Ok(())
    }
}

fn parse_header(line: &str) -> Result<PatternFile, PatternError> {
    let bad = || PatternError::BadHeader(line.to_string());
    let (mut width, mut height, mut rule) = (None, None, None);

    for field in line.split(',') {
        let (key, value) = field.split_once('=').ok_or_else(bad)?;
        let value = value.trim();
        match key.trim() {
            "x" => width = Some(value.parse::<usize>().map_err(|_| bad())?),
            "y" => height = Some(value.parse::<usize>().map_err(|_| bad())?),
            "rule" => rule = Some(value.to_string()),
            _ => {}
        }
    }

    let (width, height) = (width.ok_or_else(bad)?, height.ok_or_else(bad)?);
    Ok(PatternFile {
        width,
        height,
        rule,
        seed: vec![vec![DEAD; width]; height],
    })
}
