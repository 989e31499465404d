//! Command keywords and typed coordinates accepted on the command line.

use crate::expr::{EvalError, Evaluator};
use kurbo::{Point, Vec2};

/// Prefix of the message listing available commands.
pub const MSG_AVAILABLE_COMMANDS: &str = "Available commands:";

/// Keyword commands understood by drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Help,
    Angle,
    Length,
}

impl Command {
    pub const ALL: [Command; 3] = [Command::Help, Command::Angle, Command::Length];

    /// Canonical keyword shown to the user.
    pub fn keyword(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Angle => "angle",
            Command::Length => "length",
        }
    }

    /// Accepted spellings, canonical keyword first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Command::Help => &["help", "?"],
            Command::Angle => &["angle", "ang", "a"],
            Command::Length => &["length", "len", "l"],
        }
    }

    /// Match typed text against the keyword table (case-insensitive).
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|command| command.aliases().contains(&text.as_str()))
    }
}

/// Format the "available commands" message.
pub fn available_commands_message(commands: &[Command]) -> String {
    let keywords: Vec<&str> = commands.iter().map(|c| c.keyword()).collect();
    format!("{} {}", MSG_AVAILABLE_COMMANDS, keywords.join(", "))
}

/// Parse a typed coordinate.
///
/// Accepted forms, with every component an expression:
/// - `x,y` absolute
/// - `@dx,dy` relative to `relative_zero`
/// - `r<deg` polar from the origin
/// - `@r<deg` polar from `relative_zero`
///
/// Returns `None` when the text does not look like a coordinate at all and
/// `Some(Err(_))` when it does but a component fails to evaluate.
pub fn parse_coordinate(
    text: &str,
    relative_zero: Point,
    evaluator: &dyn Evaluator,
) -> Option<Result<Point, EvalError>> {
    let text = text.trim();
    let (relative, body) = match text.strip_prefix('@') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let origin = if relative { relative_zero } else { Point::ZERO };

    if let Some((a, b)) = body.split_once(',') {
        let parsed = evaluator
            .eval(a)
            .and_then(|x| evaluator.eval(b).map(|y| origin + Vec2::new(x, y)));
        return Some(parsed);
    }

    if let Some((r, deg)) = body.split_once('<') {
        let parsed = evaluator.eval(r).and_then(|radius| {
            evaluator
                .eval(deg)
                .map(|angle| origin + Vec2::from_angle(angle.to_radians()) * radius)
        });
        return Some(parsed);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::MathEvaluator;

    #[test]
    fn test_keyword_aliases() {
        assert_eq!(Command::parse("angle"), Some(Command::Angle));
        assert_eq!(Command::parse("ANG"), Some(Command::Angle));
        assert_eq!(Command::parse(" l "), Some(Command::Length));
        assert_eq!(Command::parse("?"), Some(Command::Help));
        assert_eq!(Command::parse("45"), None);
        assert_eq!(Command::parse("angles"), None);
    }

    #[test]
    fn test_available_commands_message() {
        let msg = available_commands_message(&[Command::Angle, Command::Length]);
        assert_eq!(msg, "Available commands: angle, length");
    }

    #[test]
    fn test_absolute_coordinate() {
        let p = parse_coordinate("10, 20", Point::new(5.0, 5.0), &MathEvaluator);
        assert_eq!(p, Some(Ok(Point::new(10.0, 20.0))));
    }

    #[test]
    fn test_relative_coordinate() {
        let p = parse_coordinate("@1,-2*2", Point::new(5.0, 5.0), &MathEvaluator);
        assert_eq!(p, Some(Ok(Point::new(6.0, 1.0))));
    }

    #[test]
    fn test_polar_coordinates() {
        let p = parse_coordinate("2<90", Point::ZERO, &MathEvaluator)
            .unwrap()
            .unwrap();
        assert!(p.x.abs() < 1e-12 && (p.y - 2.0).abs() < 1e-12);

        let q = parse_coordinate("@1<180", Point::new(3.0, 3.0), &MathEvaluator)
            .unwrap()
            .unwrap();
        assert!((q.x - 2.0).abs() < 1e-12 && (q.y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_coordinates() {
        assert_eq!(parse_coordinate("45", Point::ZERO, &MathEvaluator), None);
        assert_eq!(parse_coordinate("angle", Point::ZERO, &MathEvaluator), None);
        assert!(matches!(
            parse_coordinate("x,1", Point::ZERO, &MathEvaluator),
            Some(Err(_))
        ));
    }
}
