use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::action::Command;

pub const DELETE_USAGE: &str = "❌ Please specify a file path to delete.\nExample: DELETE /ProjectX/old_report.pdf";
pub const MOVE_USAGE: &str = "❌ Please specify both source and destination paths.\nExample: MOVE /source/file.pdf /destination/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("command not recognized")]
    Unrecognized,

    #[error("{usage}")]
    MissingArgument { usage: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    List,
    Delete,
    Move,
    Summary,
    Help,
}

impl Keyword {
    fn from_token(token: &str) -> Option<Self> {
        let word = token.strip_prefix('/').unwrap_or(token).to_ascii_uppercase();
        match word.as_str() {
            "LIST" => Some(Keyword::List),
            "DELETE" => Some(Keyword::Delete),
            "MOVE" => Some(Keyword::Move),
            "SUMMARY" => Some(Keyword::Summary),
            "HELP" => Some(Keyword::Help),
            _ => None,
        }
    }
}

/// Natural-language triggers, checked in order. Non-destructive first.
const PHRASES: &[(Keyword, &[&str])] = &[
    (Keyword::List, &["SHOW ME", "WHAT'S IN", "WHAT IS IN", "FILES IN", "LIST"]),
    (Keyword::Summary, &["SUMMARIZE", "SUMMARY"]),
    (Keyword::Delete, &["DELETE", "REMOVE"]),
    (Keyword::Help, &["HELP", "WHAT CAN YOU DO"]),
];

static PATH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/[\w.\-/*]*").expect("path pattern is valid"));

pub fn tokenize(input: &str) -> Vec<&str> {
    input.split_whitespace().collect()
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(input: &str) -> Result<Command, ParseError> {
        let input = input.trim();
        let upper = input.to_uppercase();

        if upper == "HELP" || upper == "/HELP" {
            return Ok(Command::Help);
        }

        let tokens = tokenize(input);
        let keyword = tokens.first().and_then(|t| Keyword::from_token(t));

        let result = match keyword {
            Some(Keyword::List) => Ok(Command::List {
                path: path_or_root(tokens.get(1)),
            }),
            Some(Keyword::Summary) => Ok(Command::Summary {
                path: path_or_root(tokens.get(1)),
            }),
            Some(Keyword::Delete) => match tokens.get(1) {
                Some(path) => Ok(Command::Delete {
                    path: path.to_string(),
                    confirm: upper.contains("CONFIRM"),
                }),
                None => Err(ParseError::MissingArgument { usage: DELETE_USAGE }),
            },
            Some(Keyword::Move) => match (tokens.get(1), tokens.get(2)) {
                (Some(source), Some(destination)) => Ok(Command::Move {
                    source: source.to_string(),
                    destination: destination.to_string(),
                }),
                _ => Err(ParseError::MissingArgument { usage: MOVE_USAGE }),
            },
            // "HELP" with trailing words falls through to the phrase scan
            Some(Keyword::Help) | None => Self::parse_natural(input, &upper),
        };

        debug!(input = %input, parsed = ?result, "parsed input");
        result
    }

    fn parse_natural(input: &str, upper: &str) -> Result<Command, ParseError> {
        let keyword = PHRASES
            .iter()
            .find(|(_, phrases)| phrases.iter().any(|p| upper.contains(p)))
            .map(|(keyword, _)| *keyword)
            .ok_or(ParseError::Unrecognized)?;

        let path = extract_path(input);

        match keyword {
            Keyword::List => Ok(Command::List {
                path: path.unwrap_or_else(|| "/".to_string()),
            }),
            Keyword::Summary => Ok(Command::Summary {
                path: path.unwrap_or_else(|| "/".to_string()),
            }),
            Keyword::Delete => path
                .map(|path| Command::Delete {
                    path,
                    confirm: upper.contains("CONFIRM"),
                })
                .ok_or(ParseError::Unrecognized),
            Keyword::Help => Ok(Command::Help),
            Keyword::Move => Err(ParseError::Unrecognized),
        }
    }
}

fn path_or_root(token: Option<&&str>) -> String {
    token.map(|t| t.to_string()).unwrap_or_else(|| "/".to_string())
}

/// First slash-delimited path in free text.
pub fn extract_path(text: &str) -> Option<String> {
    PATH_PATTERN.find(text).map(|m| {
        let path = m.as_str().trim_end_matches(['.', ',']);
        if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        }
    })
}
