//! JSON decoding of attribute values
//!
//! Parsing happens in two passes: the text is read into a plain JSON tree
//! that keeps number literals verbatim, then the tree is checked against the
//! tagged attribute value shape.

use attrdoc_core::{AttributeValue, Item};
use base64::Engine;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use thiserror::Error;

/// Decode error types
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// Invalid JSON syntax
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Number text that is not a decimal number
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Invalid base64 in a binary value
    #[error("Invalid base64: {0}")]
    InvalidBase64(String),

    /// Well-formed JSON that is not a tagged attribute value
    #[error("Invalid attribute value: {0}")]
    InvalidAttributeValue(String),

    /// Unexpected end of input
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    /// Unexpected character
    #[error("Unexpected character: {0}")]
    UnexpectedChar(char),
}

/// Decode a single tagged attribute value
pub fn decode_attribute_value(json: &str) -> Result<AttributeValue, DecodeError> {
    attribute_value(&parse(json)?)
}

/// Decode an item: an object of attribute name to tagged attribute value
pub fn decode_item(json: &str) -> Result<Item, DecodeError> {
    match parse(json)? {
        Json::Object(entries) => entries
            .iter()
            .map(|(name, value)| Ok::<_, DecodeError>((name.clone(), attribute_value(value)?)))
            .collect(),
        other => Err(DecodeError::InvalidAttributeValue(format!(
            "item must be an object, found {}",
            other.kind()
        ))),
    }
}

fn parse(json: &str) -> Result<Json, DecodeError> {
    let trimmed = json.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::UnexpectedEnd);
    }

    let mut parser = JsonParser::new(trimmed);
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(value),
        Some(c) => Err(DecodeError::UnexpectedChar(c)),
    }
}

/// Untyped JSON, with number literals kept as text
#[derive(Debug, Clone, PartialEq)]
enum Json {
    Null,
    Bool(bool),
    Number(String),
    String(String),
    Array(Vec<Json>),
    Object(HashMap<String, Json>),
}

impl Json {
    fn kind(&self) -> &'static str {
        match self {
            Json::Null => "null",
            Json::Bool(_) => "boolean",
            Json::Number(_) => "number",
            Json::String(_) => "string",
            Json::Array(_) => "array",
            Json::Object(_) => "object",
        }
    }
}

fn invalid(message: impl Into<String>) -> DecodeError {
    DecodeError::InvalidAttributeValue(message.into())
}

fn attribute_value(json: &Json) -> Result<AttributeValue, DecodeError> {
    let entries = match json {
        Json::Object(entries) => entries,
        other => return Err(invalid(format!("expected tagged object, found {}", other.kind()))),
    };
    let (tag, body) = match entries.iter().next() {
        Some(entry) if entries.len() == 1 => entry,
        _ => {
            return Err(invalid(format!(
                "expected exactly one type tag, found {}",
                entries.len()
            )))
        }
    };

    match tag.as_str() {
        "S" => Ok(AttributeValue::S(string(tag, body)?.to_string())),
        "N" => Ok(AttributeValue::N(number(string(tag, body)?)?)),
        "B" => Ok(AttributeValue::binary(bytes(string(tag, body)?)?)),
        "BOOL" => match body {
            Json::Bool(b) => Ok(AttributeValue::Bool(*b)),
            other => Err(invalid(format!("BOOL expects boolean, found {}", other.kind()))),
        },
        "NULL" => match body {
            Json::Bool(true) => Ok(AttributeValue::Null),
            _ => Err(invalid("NULL must be true")),
        },
        "SS" => {
            let items = set(tag, body)?
                .iter()
                .map(|item| string(tag, item).map(str::to_string))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AttributeValue::Ss(distinct(tag, items)?))
        }
        "NS" => {
            let items = set(tag, body)?
                .iter()
                .map(|item| number(string(tag, item)?))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AttributeValue::Ns(distinct(tag, items)?))
        }
        "BS" => {
            let items = set(tag, body)?
                .iter()
                .map(|item| bytes(string(tag, item)?))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AttributeValue::Bs(distinct(tag, items)?))
        }
        "L" => match body {
            Json::Array(items) => {
                let items = items
                    .iter()
                    .map(attribute_value)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(AttributeValue::list(items))
            }
            other => Err(invalid(format!("L expects array, found {}", other.kind()))),
        },
        "M" => match body {
            Json::Object(entries) => {
                let entries = entries
                    .iter()
                    .map(|(name, value)| Ok((name.clone(), attribute_value(value)?)))
                    .collect::<Result<HashMap<_, _>, DecodeError>>()?;
                Ok(AttributeValue::map(entries))
            }
            other => Err(invalid(format!("M expects object, found {}", other.kind()))),
        },
        other => Err(invalid(format!("unknown type tag {other:?}"))),
    }
}

fn string<'j>(tag: &str, json: &'j Json) -> Result<&'j str, DecodeError> {
    match json {
        Json::String(s) => Ok(s),
        other => Err(invalid(format!("{tag} expects string, found {}", other.kind()))),
    }
}

/// Set members; sets are never empty
fn set<'j>(tag: &str, json: &'j Json) -> Result<&'j [Json], DecodeError> {
    match json {
        Json::Array(items) if items.is_empty() => Err(invalid(format!("{tag} must not be empty"))),
        Json::Array(items) => Ok(items),
        other => Err(invalid(format!("{tag} expects array, found {}", other.kind()))),
    }
}

/// Set members must be unique
fn distinct<T: Eq + Hash>(tag: &str, items: Vec<T>) -> Result<Vec<T>, DecodeError> {
    let unique = {
        let mut seen = HashSet::with_capacity(items.len());
        items.iter().all(|item| seen.insert(item))
    };
    if unique {
        Ok(items)
    } else {
        Err(invalid(format!("{tag} members must be distinct")))
    }
}

fn number(text: &str) -> Result<String, DecodeError> {
    if is_decimal(text) {
        Ok(text.to_string())
    } else {
        Err(DecodeError::InvalidNumber(text.to_string()))
    }
}

fn bytes(b64: &str) -> Result<Vec<u8>, DecodeError> {
    base64::engine::general_purpose::STANDARD
        .decode(b64)
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))
}

/// `-?digits(.digits)?([eE][+-]?digits)?`, with digits optional on one side
/// of the point
fn is_decimal(text: &str) -> bool {
    let text = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(at) => (&text[..at], Some(&text[at + 1..])),
        None => (text, None),
    };
    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (mantissa, ""),
    };
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = digits(whole) && digits(fraction) && !(whole.is_empty() && fraction.is_empty());
    let exponent_ok = match exponent {
        None => true,
        Some(exp) => {
            let exp = exp.strip_prefix(['-', '+']).unwrap_or(exp);
            !exp.is_empty() && digits(exp)
        }
    };
    mantissa_ok && exponent_ok
}

struct JsonParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> JsonParser<'a> {
    fn new(input: &'a str) -> Self {
        JsonParser { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn parse_value(&mut self) -> Result<Json, DecodeError> {
        self.skip_whitespace();

        match self.peek() {
            None => Err(DecodeError::UnexpectedEnd),
            Some('n') => self.parse_literal("null", Json::Null),
            Some('t') => self.parse_literal("true", Json::Bool(true)),
            Some('f') => self.parse_literal("false", Json::Bool(false)),
            Some('"') => self.parse_string().map(Json::String),
            Some('[') => self.parse_array(),
            Some('{') => self.parse_object(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) => Err(DecodeError::UnexpectedChar(c)),
        }
    }

    fn parse_literal(&mut self, literal: &str, value: Json) -> Result<Json, DecodeError> {
        if self.input[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            Ok(value)
        } else {
            Err(DecodeError::InvalidJson(format!("Expected '{}'", literal)))
        }
    }

    fn parse_string(&mut self) -> Result<String, DecodeError> {
        self.advance(); // opening quote
        let mut result = String::new();

        loop {
            match self.peek() {
                None => return Err(DecodeError::UnexpectedEnd),
                Some('"') => {
                    self.advance();
                    return Ok(result);
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('b') => '\x08',
                        Some('f') => '\x0c',
                        Some('u') => {
                            self.advance();
                            result.push(self.parse_unicode_escape()?);
                            continue;
                        }
                        Some(c) => {
                            return Err(DecodeError::InvalidJson(format!(
                                "Invalid escape: \\{}",
                                c
                            )))
                        }
                        None => return Err(DecodeError::UnexpectedEnd),
                    };
                    result.push(escaped);
                    self.advance();
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }
    }

    /// The four hex digits after `\u`, combining surrogate pairs
    fn parse_unicode_escape(&mut self) -> Result<char, DecodeError> {
        let high = self.parse_hex4()?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high)
                .ok_or_else(|| DecodeError::InvalidJson("Invalid unicode codepoint".to_string()));
        }
        if !self.input[self.pos..].starts_with("\\u") {
            return Err(DecodeError::InvalidJson("Unpaired surrogate".to_string()));
        }
        self.pos += 2;
        let low = self.parse_hex4()?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(DecodeError::InvalidJson("Unpaired surrogate".to_string()));
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code)
            .ok_or_else(|| DecodeError::InvalidJson("Invalid unicode codepoint".to_string()))
    }

    fn parse_hex4(&mut self) -> Result<u32, DecodeError> {
        let hex = self
            .input
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| DecodeError::InvalidJson("Invalid unicode escape".to_string()))?;
        let code = u32::from_str_radix(hex, 16)
            .map_err(|_| DecodeError::InvalidJson("Invalid unicode escape".to_string()))?;
        self.pos += 4;
        Ok(code)
    }

    fn parse_number(&mut self) -> Result<Json, DecodeError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                self.advance();
            } else {
                break;
            }
        }

        let num_str = &self.input[start..self.pos];
        if is_decimal(num_str) && !num_str.starts_with('+') {
            Ok(Json::Number(num_str.to_string()))
        } else {
            Err(DecodeError::InvalidNumber(num_str.to_string()))
        }
    }

    fn parse_array(&mut self) -> Result<Json, DecodeError> {
        self.advance(); // '['
        self.skip_whitespace();

        let mut arr = Vec::new();

        if self.peek() == Some(']') {
            self.advance();
            return Ok(Json::Array(arr));
        }

        loop {
            arr.push(self.parse_value()?);
            self.skip_whitespace();

            match self.peek() {
                Some(',') => {
                    self.advance();
                    self.skip_whitespace();
                }
                Some(']') => {
                    self.advance();
                    return Ok(Json::Array(arr));
                }
                Some(c) => return Err(DecodeError::UnexpectedChar(c)),
                None => return Err(DecodeError::UnexpectedEnd),
            }
        }
    }

    fn parse_object(&mut self) -> Result<Json, DecodeError> {
        self.advance(); // '{'
        self.skip_whitespace();

        let mut map = HashMap::new();

        if self.peek() == Some('}') {
            self.advance();
            return Ok(Json::Object(map));
        }

        loop {
            self.skip_whitespace();

            if self.peek() != Some('"') {
                return Err(DecodeError::InvalidJson("Expected string key".to_string()));
            }
            let key = self.parse_string()?;

            self.skip_whitespace();

            if self.peek() != Some(':') {
                return Err(DecodeError::InvalidJson("Expected ':'".to_string()));
            }
            self.advance();

            let value = self.parse_value()?;
            if map.insert(key.clone(), value).is_some() {
                return Err(DecodeError::InvalidJson(format!("Duplicate key: {}", key)));
            }

            self.skip_whitespace();

            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some('}') => {
                    self.advance();
                    return Ok(Json::Object(map));
                }
                Some(c) => return Err(DecodeError::UnexpectedChar(c)),
                None => return Err(DecodeError::UnexpectedEnd),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_scalars() {
        assert_eq!(
            decode_attribute_value(r#"{"S":"hi"}"#).unwrap(),
            AttributeValue::S("hi".into())
        );
        assert_eq!(
            decode_attribute_value(r#" { "N" : "-1.5e3" } "#).unwrap(),
            AttributeValue::N("-1.5e3".into())
        );
        assert_eq!(
            decode_attribute_value(r#"{"BOOL":true}"#).unwrap(),
            AttributeValue::Bool(true)
        );
        assert_eq!(
            decode_attribute_value(r#"{"NULL":true}"#).unwrap(),
            AttributeValue::Null
        );
        assert_eq!(
            decode_attribute_value(r#"{"B":"aGVsbG8="}"#).unwrap(),
            AttributeValue::B(b"hello".to_vec())
        );
    }

    #[test]
    fn test_decode_collections() {
        assert_eq!(
            decode_attribute_value(r#"{"SS":["a","b"]}"#).unwrap(),
            AttributeValue::Ss(vec!["a".into(), "b".into()])
        );
        assert_eq!(
            decode_attribute_value(r#"{"NS":["1","2.5"]}"#).unwrap(),
            AttributeValue::Ns(vec!["1".into(), "2.5".into()])
        );
        assert_eq!(
            decode_attribute_value(r#"{"BS":["AA=="]}"#).unwrap(),
            AttributeValue::Bs(vec![vec![0]])
        );

        let nested = decode_attribute_value(r#"{"M":{"l":{"L":[{"N":"1"},{"S":"x"}]}}}"#).unwrap();
        let list = nested.as_m().unwrap().get("l").unwrap();
        assert_eq!(
            list,
            &AttributeValue::L(vec![AttributeValue::N("1".into()), AttributeValue::S("x".into())])
        );
    }

    #[test]
    fn test_empty_list_and_map_normalize_to_null() {
        assert_eq!(decode_attribute_value(r#"{"L":[]}"#).unwrap(), AttributeValue::Null);
        assert_eq!(decode_attribute_value(r#"{"M":{}}"#).unwrap(), AttributeValue::Null);
        assert_eq!(decode_attribute_value(r#"{"B":""}"#).unwrap(), AttributeValue::Null);
    }

    #[test]
    fn test_rejects_malformed_values() {
        let cases = [
            r#"{"SS":[]}"#,
            r#"{"NS":[]}"#,
            r#"{"BS":[]}"#,
            r#"{"NULL":false}"#,
            r#"{}"#,
            r#"{"S":"a","N":"1"}"#,
            r#"{"X":"a"}"#,
            r#"{"N":1}"#,
            r#"{"S":true}"#,
            r#"{"SS":["a",1]}"#,
            r#"{"SS":["a","b","a"]}"#,
            r#"{"NS":["1","1"]}"#,
            r#"{"BS":["AA==","AA=="]}"#,
            r#""bare""#,
        ];
        for case in cases {
            assert!(
                matches!(
                    decode_attribute_value(case),
                    Err(DecodeError::InvalidAttributeValue(_))
                ),
                "{case}"
            );
        }
    }

    #[test]
    fn test_rejects_bad_number_text_and_base64() {
        for text in ["abc", "", "1.2.3", "1e", "--1", "."] {
            let json = format!(r#"{{"N":"{}"}}"#, text);
            assert!(
                matches!(decode_attribute_value(&json), Err(DecodeError::InvalidNumber(_))),
                "{text}"
            );
        }
        assert!(matches!(
            decode_attribute_value(r#"{"B":"!!"}"#),
            Err(DecodeError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert_eq!(decode_attribute_value(""), Err(DecodeError::UnexpectedEnd));
        assert!(decode_attribute_value(r#"{"S":"a"} trailing"#).is_err());
        assert!(decode_attribute_value(r#"{"S":"a""#).is_err());
        assert!(matches!(
            decode_item(r#"{"a":{"S":"x"},"a":{"S":"y"}}"#),
            Err(DecodeError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_decode_item() {
        let item = decode_item(r##"{"DocName":{"S":"P"},"#item_price":{"N":"9.75"}}"##).unwrap();
        assert_eq!(item.len(), 2);
        assert_eq!(item.get("#item_price"), Some(&AttributeValue::N("9.75".into())));
        assert!(decode_item("{}").unwrap().is_empty());
        assert!(matches!(
            decode_item(r#"[{"S":"x"}]"#),
            Err(DecodeError::InvalidAttributeValue(_))
        ));
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(
            decode_attribute_value(r#"{"S":"\u00e9\ud83d\ude00"}"#).unwrap(),
            AttributeValue::S("é😀".into())
        );
        assert!(decode_attribute_value(r#"{"S":"\ud83d"}"#).is_err());
    }
}
