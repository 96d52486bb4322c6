//! Minimal path-data reader for building test outlines.
//!
//! Understands `M L H V A Z` in absolute and relative form, one command
//! per set of arguments.

use std::str::FromStr;

use crate::geometry::{Outline, Point, Segment};
use crate::math::Decimal;

enum Token {
    Command(char),
    Number(Decimal),
}

fn tokenize(data: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut number = String::new();
    let flush = |number: &mut String, tokens: &mut Vec<Token>| {
        if !number.is_empty() {
            tokens.push(Token::Number(Decimal::from_str(number).unwrap()));
            number.clear();
        }
    };
    for c in data.chars() {
        match c {
            '0'..='9' | '.' => number.push(c),
            '-' => {
                flush(&mut number, &mut tokens);
                number.push(c);
            }
            c if c.is_ascii_alphabetic() => {
                flush(&mut number, &mut tokens);
                tokens.push(Token::Command(c));
            }
            _ => flush(&mut number, &mut tokens),
        }
    }
    flush(&mut number, &mut tokens);
    tokens
}

/// Reads a closed outline from path data.
pub(crate) fn outline(data: &str) -> Outline {
    let tokens = tokenize(data);
    let mut segments = Vec::new();
    let mut start = Point::from((0, 0));
    let mut current = Point::from((0, 0));
    let mut i = 0;
    let next = |i: &mut usize| -> Decimal {
        let Token::Number(n) = &tokens[*i] else {
            panic!("expected a number at token {i}");
        };
        *i += 1;
        n.clone()
    };
    while i < tokens.len() {
        let Token::Command(cmd) = tokens[i] else {
            panic!("expected a command at token {i}");
        };
        i += 1;
        let relative = cmd.is_ascii_lowercase();
        let rel = |value: Decimal, base: &Decimal| if relative { value + base } else { value };
        match cmd.to_ascii_uppercase() {
            'M' => {
                let x = rel(next(&mut i), &current.x);
                let y = rel(next(&mut i), &current.y);
                current = Point::new(x, y);
                start = current.clone();
            }
            'L' | 'H' | 'V' => {
                let upper = cmd.to_ascii_uppercase();
                let x = if upper == 'V' {
                    current.x.clone()
                } else {
                    rel(next(&mut i), &current.x)
                };
                let y = if upper == 'H' {
                    current.y.clone()
                } else {
                    rel(next(&mut i), &current.y)
                };
                let to = Point::new(x, y);
                segments.push(Segment::line(current.clone(), to.clone()));
                current = to;
            }
            'A' => {
                let rx = next(&mut i);
                let ry = next(&mut i);
                let rotation = next(&mut i);
                let large_arc = next(&mut i) == Decimal::from(1);
                let sweep = next(&mut i) == Decimal::from(1);
                let x = rel(next(&mut i), &current.x);
                let y = rel(next(&mut i), &current.y);
                let to = Point::new(x, y);
                segments.push(Segment::arc(current.clone(), to.clone(), rx, ry, rotation, large_arc, sweep));
                current = to;
            }
            'Z' => {
                if current != start {
                    segments.push(Segment::line(current.clone(), start.clone()));
                }
                current = start.clone();
            }
            other => panic!("unsupported path command {other}"),
        }
    }
    Outline::new(segments)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::decimal::dec;

    #[test]
    fn relative_and_absolute_commands() {
        let o = outline("M 0 0 h 2 v1 L 0 1 Z");
        assert_eq!(
            o,
            Outline::polygon(&[
                Point::from((0, 0)),
                Point::from((2, 0)),
                Point::from((2, 1)),
                Point::from((0, 1)),
            ])
        );
    }

    #[test]
    fn arcs_keep_their_flags() {
        let o = outline("M 0 0 a 1 1 45 0 1 -1 1 Z");
        assert_eq!(
            o.segments()[0],
            Segment::arc((0, 0), (-1, 1), dec(1), dec(1), dec(45), false, true)
        );
        assert!(o.is_closed());
    }
}
