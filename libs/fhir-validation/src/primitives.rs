//! Lexical checks for FHIR primitive values.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const MIN_STRING_LENGTH: usize = 1;
/// 1 MiB
pub const MAX_STRING_LENGTH: usize = 1_048_576;
pub const MAX_ID_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("{kind} value length: {len} is greater than maximum allowed length: {max}")]
    TooLong {
        kind: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Trimmed String value length: {len} is less than minimum required length: {min}")]
    TooShort { len: usize, min: usize },

    #[error("String value: '{0}' is not valid with respect to pattern: [\\r\\n\\t\\S]+")]
    IllegalWhitespace(String),

    #[error("String value contains unsupported control characters: decimal range=[\\0000-0008,0011,0012,0014-0031] value=[{0}]")]
    ControlCharacters(String),

    #[error("Code value: '{0}' must begin with a non-whitespace character")]
    CodeLeadingWhitespace(String),

    #[error("Code value: '{0}' must end with a non-whitespace character")]
    CodeTrailingWhitespace(String),

    #[error("Code value: '{0}' must not contain whitespace other than a single space")]
    CodeWhitespace(String),

    #[error("Code value: '{0}' must not contain consecutive spaces")]
    CodeConsecutiveSpaces(String),

    #[error("Id value must not be empty")]
    EmptyId,

    #[error("Id value: '{value}' contain invalid character '{ch}'")]
    IdCharacter { value: String, ch: char },

    #[error("Uri value: '{0}' must not contain whitespace")]
    UriWhitespace(String),

    #[error("Integer value: {value} is less than minimum required value: {min}")]
    BelowMinimum { value: i64, min: i64 },

    #[error("String value: '{value}' is not valid with respect to pattern: {pattern}")]
    Pattern { value: String, pattern: &'static str },

    #[error("Invalid base64 string length: {0}")]
    Base64Length(usize),

    #[error("Invalid base64 character: '{0}'")]
    Base64Character(char),

    #[error("Invalid XHTML content: {0}")]
    Xhtml(String),
}

pub type ValueResult = Result<(), ValueError>;

fn is_unsupported_control(ch: char) -> bool {
    matches!(ch as u32, 0..=8 | 11 | 12 | 14..=31)
}

/// `[ \r\n\t\S]+`, at most 1 MiB, no unsupported control characters.
pub fn check_string(value: &str, check_control_chars: bool) -> ValueResult {
    if value.len() > MAX_STRING_LENGTH {
        return Err(ValueError::TooLong {
            kind: "String",
            len: value.len(),
            max: MAX_STRING_LENGTH,
        });
    }
    let mut count = 0;
    for ch in value.chars() {
        if !ch.is_whitespace() {
            if check_control_chars && is_unsupported_control(ch) {
                return Err(ValueError::ControlCharacters(value.to_string()));
            }
            count += 1;
        } else if !matches!(ch, ' ' | '\t' | '\r' | '\n') {
            return Err(ValueError::IllegalWhitespace(value.to_string()));
        }
    }
    if count < MIN_STRING_LENGTH {
        return Err(ValueError::TooShort {
            len: count,
            min: MIN_STRING_LENGTH,
        });
    }
    Ok(())
}

/// `[^\s]+(\s[^\s]+)*`
pub fn check_code(value: &str, check_control_chars: bool) -> ValueResult {
    match value.chars().next() {
        None => return Err(ValueError::CodeLeadingWhitespace(value.to_string())),
        Some(first) if first.is_whitespace() => {
            return Err(ValueError::CodeLeadingWhitespace(value.to_string()))
        }
        Some(_) => {}
    }
    if value.chars().next_back().is_some_and(char::is_whitespace) {
        return Err(ValueError::CodeTrailingWhitespace(value.to_string()));
    }
    let mut previous_is_space = false;
    for ch in value.chars() {
        if ch.is_whitespace() {
            if ch != ' ' {
                return Err(ValueError::CodeWhitespace(value.to_string()));
            }
            if previous_is_space {
                return Err(ValueError::CodeConsecutiveSpaces(value.to_string()));
            }
            previous_is_space = true;
        } else {
            if check_control_chars && is_unsupported_control(ch) {
                return Err(ValueError::ControlCharacters(value.to_string()));
            }
            previous_is_space = false;
        }
    }
    Ok(())
}

/// `[A-Za-z0-9\-\.]{1,64}`
pub fn check_id(value: &str) -> ValueResult {
    if value.is_empty() {
        return Err(ValueError::EmptyId);
    }
    if value.len() > MAX_ID_LENGTH {
        return Err(ValueError::TooLong {
            kind: "Id",
            len: value.len(),
            max: MAX_ID_LENGTH,
        });
    }
    match value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
    {
        Some(ch) => Err(ValueError::IdCharacter {
            value: value.to_string(),
            ch,
        }),
        None => Ok(()),
    }
}

/// `\S*`
pub fn check_uri(value: &str, check_control_chars: bool) -> ValueResult {
    if value.len() > MAX_STRING_LENGTH {
        return Err(ValueError::TooLong {
            kind: "Uri",
            len: value.len(),
            max: MAX_STRING_LENGTH,
        });
    }
    for ch in value.chars() {
        if check_control_chars && is_unsupported_control(ch) {
            return Err(ValueError::ControlCharacters(value.to_string()));
        }
        if ch.is_whitespace() {
            return Err(ValueError::UriWhitespace(value.to_string()));
        }
    }
    Ok(())
}

pub fn check_min(value: i64, min: i64) -> ValueResult {
    if value < min {
        return Err(ValueError::BelowMinimum { value, min });
    }
    Ok(())
}

const DATE: &str = r"([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1]))?)?";
const DATE_TIME: &str = r"([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1])(T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]{1,9})?(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00)))?)?)?";
const TIME: &str = r"([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]{1,9})?";
const INSTANT: &str = r"([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)-(0[1-9]|1[0-2])-(0[1-9]|[1-2][0-9]|3[0-1])T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]{1,9})?(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00))";

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{})$", pattern)).expect("primitive pattern is valid")
}

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| anchored(DATE));
static DATE_TIME_PATTERN: Lazy<Regex> = Lazy::new(|| anchored(DATE_TIME));
static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| anchored(TIME));
static INSTANT_PATTERN: Lazy<Regex> = Lazy::new(|| anchored(INSTANT));

fn check_pattern(value: &str, regex: &Regex, pattern: &'static str) -> ValueResult {
    if regex.is_match(value) {
        Ok(())
    } else {
        Err(ValueError::Pattern {
            value: value.to_string(),
            pattern,
        })
    }
}

pub fn check_date(value: &str) -> ValueResult {
    check_pattern(value, &DATE_PATTERN, DATE)
}

pub fn check_date_time(value: &str) -> ValueResult {
    check_pattern(value, &DATE_TIME_PATTERN, DATE_TIME)
}

pub fn check_time(value: &str) -> ValueResult {
    check_pattern(value, &TIME_PATTERN, TIME)
}

pub fn check_instant(value: &str) -> ValueResult {
    check_pattern(value, &INSTANT_PATTERN, INSTANT)
}

pub fn check_base64(value: &str) -> ValueResult {
    let stripped: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.len() % 4 != 0 {
        return Err(ValueError::Base64Length(stripped.len()));
    }
    let body = stripped.trim_end_matches('=');
    if stripped.len() - body.len() > 2 {
        return Err(ValueError::Base64Character('='));
    }
    match body
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '+' || *c == '/'))
    {
        Some(ch) => Err(ValueError::Base64Character(ch)),
        None => Ok(()),
    }
}

/// Narrative content must be a single `div` in the XHTML namespace.
pub fn check_xhtml(value: &str) -> ValueResult {
    let trimmed = value.trim();
    if !trimmed.starts_with("<div") {
        return Err(ValueError::Xhtml("root element must be <div>".to_string()));
    }
    if !trimmed.contains("http://www.w3.org/1999/xhtml") {
        return Err(ValueError::Xhtml(
            "root element must declare the XHTML namespace".to_string(),
        ));
    }
    if !(trimmed.ends_with("</div>") || trimmed.ends_with("/>")) {
        return Err(ValueError::Xhtml("root element is not closed".to_string()));
    }
    Ok(())
}
