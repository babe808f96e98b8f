//! Reader and writer for generated search data files.
//!
//! The documentation generator emits one file per index shard:
//!
//! ```text
//! var searchData=
//! [
//!   ['enqueue_177',['Enqueue',['../d7/d7a/classQueue.html#a2293',1,'CKSDK::Queue::Queue']]],
//!   ['enc_176',['Enc',['../d3/df4/structBCD.html#ad6b0',1,'CKSDK::CD::BCD::Enc()'],
//!                     ['../df/d17/structLoc.html#a1cd4',1,'CKSDK::CD::Loc::Enc()']]]
//! ];
//! ```
//!
//! The reader accepts that JavaScript literal as well as a JSON rendition of the
//! same array. A target may also be written as an explicit list of pairs,
//! `[label, [[path, scope], ...]]`.

use crate::error::IndexError;

use super::record::{Location, SearchRecord, Target};

/// Parses a search data file into records, in file order.
pub fn parse_search_data(text: &str) -> Result<Vec<SearchRecord>, IndexError> {
    let mut parser = Parser::new(text);
    parser.skip_assignment()?;
    let value = parser.value()?;
    parser.skip_trivia();
    if parser.peek() == Some(b';') {
        parser.pos += 1;
    }
    parser.skip_trivia();
    if parser.pos < parser.src.len() {
        return Err(parser.error("unexpected trailing content"));
    }

    let Value::Array(entries) = value else {
        return Err(IndexError::Syntax {
            line: 1,
            column: 1,
            message: "search data must be an array".to_string(),
        });
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| record_from_value(position, entry))
        .collect()
}

/// Renders records back into the generator's file format.
pub fn render_search_data(records: &[SearchRecord]) -> String {
    let mut out = String::from("var searchData=\n[\n");

    for (i, record) in records.iter().enumerate() {
        out.push_str("  [");
        push_quoted(&mut out, &record.key);
        out.push_str(",[");
        push_quoted(&mut out, &record.label);
        match &record.target {
            Target::Single(location) => {
                out.push(',');
                push_location(&mut out, location);
            }
            // One location in the list form keeps the variant across a round trip
            Target::Multiple(locations) if locations.len() == 1 => {
                out.push_str(",[");
                push_location(&mut out, &locations[0]);
                out.push(']');
            }
            Target::Multiple(locations) => {
                for location in locations {
                    out.push(',');
                    push_location(&mut out, location);
                }
            }
        }
        out.push_str("]]");
        if i + 1 < records.len() {
            out.push(',');
        }
        out.push('\n');
    }

    out.push_str("];\n");
    out
}

fn push_location(out: &mut String, location: &Location) {
    out.push('[');
    push_quoted(out, &location.path);
    out.push_str(if location.in_frame { ",1," } else { ",0," });
    push_quoted(out, &location.scope);
    out.push(']');
}

fn push_quoted(out: &mut String, text: &str) {
    out.push('\'');
    for c in text.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
}

/// Literal values that appear in search data.
#[derive(Debug)]
enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
    Array(Vec<Value>),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Array(_) => "array",
        }
    }
}

fn record_from_value(position: usize, value: Value) -> Result<SearchRecord, IndexError> {
    let Value::Array(parts) = value else {
        return Err(IndexError::malformed(
            position,
            format!("expected a [key, entry] array, found {}", value.kind()),
        ));
    };

    let mut parts = parts.into_iter();
    let key = match parts.next() {
        Some(Value::Str(key)) if !key.is_empty() => key,
        Some(Value::Str(_)) | None => return Err(IndexError::malformed(position, "missing key")),
        Some(other) => {
            return Err(IndexError::malformed(
                position,
                format!("key must be a string, found {}", other.kind()),
            ));
        }
    };

    let entry = match parts.next() {
        Some(Value::Array(entry)) => entry,
        Some(other) => {
            return Err(IndexError::malformed(
                position,
                format!("entry for '{}' must be an array, found {}", key, other.kind()),
            ));
        }
        None => return Err(IndexError::malformed(position, format!("'{}' has no entry", key))),
    };
    if parts.next().is_some() {
        return Err(IndexError::malformed(
            position,
            format!("'{}' has more than two fields", key),
        ));
    }

    let mut entry = entry.into_iter();
    let label = match entry.next() {
        Some(Value::Str(label)) if !label.is_empty() => label,
        _ => return Err(IndexError::malformed(position, format!("'{}' has no label", key))),
    };

    let mut rest: Vec<Value> = entry.collect();
    // Explicit list form: [label, [[path, scope], ...]]
    let list_form = matches!(
        rest.as_slice(),
        [Value::Array(items)] if matches!(items.first(), Some(Value::Array(_)))
    );

    let target = match rest.pop() {
        Some(Value::Array(items)) if list_form => Target::Multiple(
            items
                .into_iter()
                .map(|item| location_from_value(position, &key, item))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Some(last) => {
            rest.push(last);
            let locations = rest
                .into_iter()
                .map(|item| location_from_value(position, &key, item))
                .collect::<Result<Vec<_>, _>>()?;
            Target::from_locations(locations)
        }
        None => Target::Multiple(Vec::new()),
    };

    if target.is_empty() {
        return Err(IndexError::malformed(position, format!("'{}' has no targets", key)));
    }

    Ok(SearchRecord { key, label, target })
}

fn location_from_value(position: usize, key: &str, value: Value) -> Result<Location, IndexError> {
    let Value::Array(fields) = value else {
        return Err(IndexError::malformed(
            position,
            format!("target of '{}' must be an array, found {}", key, value.kind()),
        ));
    };

    let bad_shape = || {
        IndexError::malformed(
            position,
            format!("target of '{}' must be [path, flag, scope] or [path, scope]", key),
        )
    };

    let (path, in_frame, scope) = match <[Value; 3]>::try_from(fields) {
        Ok([Value::Str(path), flag, Value::Str(scope)]) => {
            let in_frame = match flag {
                Value::Int(n) => n != 0,
                Value::Bool(b) => b,
                _ => return Err(bad_shape()),
            };
            (path, in_frame, scope)
        }
        Ok(_) => return Err(bad_shape()),
        Err(fields) => match <[Value; 2]>::try_from(fields) {
            Ok([Value::Str(path), Value::Str(scope)]) => (path, true, scope),
            _ => return Err(bad_shape()),
        },
    };

    if path.is_empty() {
        return Err(IndexError::malformed(
            position,
            format!("target of '{}' has an empty path", key),
        ));
    }

    Ok(Location {
        path,
        scope,
        in_frame,
    })
}

/// Recursive-descent reader over the raw bytes of a search data file.
/// Deepest array nesting accepted. Records need four levels.
const MAX_DEPTH: usize = 64;

struct Parser<'a> {
    text: &'a str,
    src: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        // Editors sometimes leave a byte-order mark in front
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self {
            text,
            src: text.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn error(&self, message: impl Into<String>) -> IndexError {
        let consumed = &self.text[..self.pos.min(self.text.len())];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rfind('\n')
            .map_or(consumed.chars().count(), |nl| consumed[nl + 1..].chars().count())
            + 1;
        IndexError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match (self.peek(), self.src.get(self.pos + 1).copied()) {
                (Some(b), _) if b.is_ascii_whitespace() => self.pos += 1,
                (Some(b'/'), Some(b'/')) => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                (Some(b'/'), Some(b'*')) => {
                    match self.text[self.pos + 2..].find("*/") {
                        Some(end) => self.pos += end + 4,
                        None => self.pos = self.src.len(),
                    }
                }
                _ => break,
            }
        }
    }

    fn identifier(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        &self.text[start..self.pos]
    }

    /// Skips `var searchData =` (or any `name =`) in front of the literal.
    fn skip_assignment(&mut self) -> Result<(), IndexError> {
        self.skip_trivia();
        if !matches!(self.peek(), Some(b) if b.is_ascii_alphabetic() || b == b'_' || b == b'$') {
            return Ok(());
        }

        let word = self.identifier();
        if matches!(word, "var" | "let" | "const") {
            self.skip_trivia();
            if self.identifier().is_empty() {
                return Err(self.error("expected a variable name"));
            }
        }
        self.skip_trivia();
        if self.peek() != Some(b'=') {
            return Err(self.error("expected '='"));
        }
        self.pos += 1;
        Ok(())
    }

    fn value(&mut self) -> Result<Value, IndexError> {
        self.skip_trivia();
        match self.peek() {
            Some(b'[') => self.array(),
            Some(quote @ (b'\'' | b'"')) => self.string(quote).map(Value::Str),
            Some(b) if b == b'-' || b.is_ascii_digit() => self.integer(),
            Some(b) if b.is_ascii_alphabetic() => match self.identifier() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                other => Err(self.error(format!("unexpected identifier '{}'", other))),
            },
            Some(_) => Err(self.error("expected a value")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn array(&mut self) -> Result<Value, IndexError> {
        if self.depth == MAX_DEPTH {
            return Err(self.error("arrays nested too deeply"));
        }
        self.depth += 1;
        let items = self.array_items();
        self.depth -= 1;
        items.map(Value::Array)
    }

    fn array_items(&mut self) -> Result<Vec<Value>, IndexError> {
        self.pos += 1; // '['
        let mut items = Vec::new();

        loop {
            self.skip_trivia();
            if self.peek() == Some(b']') {
                self.pos += 1;
                return Ok(items);
            }

            items.push(self.value()?);

            self.skip_trivia();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {}
                Some(_) => return Err(self.error("expected ',' or ']'")),
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    fn string(&mut self, quote: u8) -> Result<String, IndexError> {
        self.pos += 1; // opening quote
        let mut out = String::new();

        loop {
            let start = self.pos;
            while let Some(b) = self.peek() {
                if b == quote || b == b'\\' || b == b'\n' {
                    break;
                }
                self.pos += 1;
            }
            out.push_str(&self.text[start..self.pos]);

            match self.peek() {
                Some(b) if b == quote => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    self.pos += 1;
                    self.escape(&mut out)?;
                }
                Some(_) | None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), IndexError> {
        let Some(c) = self.text[self.pos..].chars().next() else {
            return Err(self.error("unterminated escape"));
        };
        self.pos += c.len_utf8();

        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            '0' => out.push('\0'),
            'x' => {
                let code = self.hex_digits(2)?;
                out.push(char::from_u32(code).ok_or_else(|| self.error("invalid \\x escape"))?);
            }
            'u' => {
                let mut code = self.hex_digits(4)?;
                // Surrogate pair written as two \u escapes
                if (0xD800..0xDC00).contains(&code) && self.text[self.pos..].starts_with("\\u") {
                    self.pos += 2;
                    let low = self.hex_digits(4)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(self.error("invalid \\u escape"));
                    }
                    code = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                }
                out.push(char::from_u32(code).ok_or_else(|| self.error("invalid \\u escape"))?);
            }
            // Line continuation
            '\n' => {}
            other => out.push(other),
        }
        Ok(())
    }

    fn hex_digits(&mut self, count: usize) -> Result<u32, IndexError> {
        let digits = self
            .text
            .get(self.pos..self.pos + count)
            .ok_or_else(|| self.error("truncated escape"))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(self.error("invalid hex escape"));
        }
        let code = u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid hex escape"))?;
        self.pos += count;
        Ok(code)
    }

    fn integer(&mut self) -> Result<Value, IndexError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.text[start..self.pos]
            .parse()
            .map(Value::Int)
            .map_err(|_| self.error("invalid number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    const SAMPLE: &str = r"var searchData=
[
  ['elf_2eh_161',['ELF.h',['../db/de5/ELF_8h.html',1,'']]],
  ['enc_176',['Enc',['../d3/df4/structCKSDK_1_1CD_1_1BCD.html#ad6b0',1,'CKSDK::CD::BCD::Enc()'],['../df/d17/structCKSDK_1_1CD_1_1Loc.html#a1cd4',1,'CKSDK::CD::Loc::Enc()']]],
  ['enqueue_177',['Enqueue',['../d7/d7a/classCKSDK_1_1Queue_1_1Queue.html#a2293',1,'CKSDK::Queue::Queue']]]
];
";

    #[test]
    fn parses_generator_output() {
        let_assert!(Ok(records) = parse_search_data(SAMPLE));
        check!(records.len() == 3);

        check!(records[0].key == "elf_2eh_161");
        check!(records[0].label == "ELF.h");
        check!(records[0].target == Target::Single(Location::new("../db/de5/ELF_8h.html", "")));

        let_assert!(Target::Multiple(locations) = &records[1].target);
        check!(locations.len() == 2);
        check!(locations[0].scope == "CKSDK::CD::BCD::Enc()");
        check!(locations[1].path == "../df/d17/structCKSDK_1_1CD_1_1Loc.html#a1cd4");
    }

    #[test]
    fn rendered_output_parses_back() {
        let_assert!(Ok(records) = parse_search_data(SAMPLE));
        let rendered = render_search_data(&records);
        let_assert!(Ok(again) = parse_search_data(&rendered));
        check!(again == records);
    }

    #[test]
    fn single_item_list_form_survives_rendering() {
        let records = vec![SearchRecord::new(
            "x_1",
            "X",
            Target::Multiple(vec![Location::new("x.html", "it's")]),
        )];
        let_assert!(Ok(again) = parse_search_data(&render_search_data(&records)));
        check!(again == records);
    }

    #[test]
    fn accepts_json_and_pair_targets() {
        let json = r#"[["error", ["Error", [["cd.html#a5", "CKSDK::CD"]]]],
                       ["europe", ["Europe", ["cd.html#a9", false, "CKSDK::CD"]]]]"#;
        let_assert!(Ok(records) = parse_search_data(json));
        check!(records.len() == 2);
        check!(records[0].target == Target::Multiple(vec![Location::new("cd.html#a5", "CKSDK::CD")]));
        check!(!records[1].locations()[0].in_frame);
    }

    #[test]
    fn decodes_string_escapes() {
        let_assert!(Ok(records) = parse_search_data(r"[['q_1',['It\'s é\x41',['a.html',1,'']]]]"));
        check!(records[0].label == "It's éA");
    }

    #[test]
    fn missing_targets_is_malformed() {
        let_assert!(
            Err(IndexError::MalformedRecord { position, reason }) =
                parse_search_data("[['ok_1',['Ok',['a.html',1,'']]], ['bad_2',['Bad']]]")
        );
        check!(position == 1);
        check!(reason.contains("no targets"));
    }

    #[test]
    fn empty_key_is_malformed() {
        let_assert!(
            Err(IndexError::MalformedRecord { position: 0, .. }) =
                parse_search_data("[['',['Label',['a.html',1,'']]]]")
        );
    }

    #[test]
    fn reports_syntax_error_position() {
        let_assert!(
            Err(IndexError::Syntax { line, column, .. }) =
                parse_search_data("var searchData=\n[\n  ['a_1' ['A']]\n];")
        );
        check!(line == 3);
        check!(column == 10);
    }

    #[test]
    fn rejects_unterminated_string() {
        let_assert!(Err(IndexError::Syntax { .. }) = parse_search_data("[['abc"));
    }

    #[test]
    fn deep_nesting_is_a_syntax_error() {
        let_assert!(
            Err(IndexError::Syntax { message, .. }) = parse_search_data(&"[".repeat(100_000))
        );
        check!(message.contains("nested too deeply"));
    }

    #[test]
    fn decodes_surrogate_pairs() {
        let_assert!(Ok(records) = parse_search_data(r"[['q_1',['\uD83D\uDC41',['a.html',1,'']]]]"));
        check!(records[0].label == "\u{1F441}");
    }

    #[rstest]
    #[case(r"'\uD83D\u0041'")]
    #[case(r"'\x+1'")]
    #[case(r"'\u+04A'")]
    fn rejects_invalid_escapes(#[case] label: &str) {
        let text = format!("[['q_1',[{label},['a.html',1,'']]]]");
        let_assert!(Err(IndexError::Syntax { message, .. }) = parse_search_data(&text));
        check!(message.starts_with("invalid"));
    }
}
