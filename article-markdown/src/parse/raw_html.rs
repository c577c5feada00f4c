//! Tokenizer for the HTML fragments embedded in markdown.
//!
//! This is deliberately forgiving: anything that does not look like a tag
//! becomes text, comments and declarations disappear, and unterminated
//! constructs never panic.

use html_escape::decode_html_entities;

use super::{AttrValue, Attributes};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Start {
        name: String,
        attrs: Attributes,
        self_closing: bool,
    },
    End {
        name: String,
    },
    Text(String),
}

/// Elements whose content is raw text up to the matching closing tag.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

/// Maps an HTML attribute name onto the prop name the sanitizer checks.
pub fn canonical_attribute_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    match lower.as_str() {
        "class" => "className".to_string(),
        "srcset" => "srcSet".to_string(),
        "for" => "htmlFor".to_string(),
        _ => lower,
    }
}

pub(crate) fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        let Some(lt) = rest.find('<') else {
            push_text(&mut tokens, rest);
            break;
        };
        if lt > 0 {
            push_text(&mut tokens, &rest[..lt]);
            rest = &rest[lt..];
        }

        if let Some(after) = rest.strip_prefix("<!--") {
            rest = match after.find("-->") {
                Some(end) => &after[end + 3..],
                None => "",
            };
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            rest = match rest.find('>') {
                Some(end) => &rest[end + 1..],
                None => "",
            };
        } else if let Some((token, remaining)) = parse_tag(rest) {
            let raw_text = match &token {
                Token::Start {
                    name,
                    self_closing: false,
                    ..
                } if RAW_TEXT_ELEMENTS.contains(&name.as_str()) => {
                    Some(name.clone())
                }
                _ => None,
            };
            tokens.push(token);
            rest = remaining;
            if let Some(name) = raw_text {
                let end = rest
                    .to_ascii_lowercase()
                    .find(&format!("</{name}"))
                    .unwrap_or(rest.len());
                if end > 0 {
                    tokens.push(Token::Text(rest[..end].to_string()));
                }
                rest = &rest[end..];
            }
        } else {
            push_text(&mut tokens, "<");
            rest = &rest[1..];
        }
    }
    tokens
}

fn push_text(tokens: &mut Vec<Token>, raw: &str) {
    tokens.push(Token::Text(decode_html_entities(raw).into_owned()));
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b':' | b'_' | b'.')
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Parses one tag at the start of `input` (which begins with `<`).
///
/// Returns `None` when the tag is not terminated, in which case the `<` is
/// treated as text.
fn parse_tag(input: &str) -> Option<(Token, &str)> {
    let bytes = input.as_bytes();
    let mut pos = 1;
    let closing = bytes.get(pos) == Some(&b'/');
    if closing {
        pos += 1;
    }
    if !bytes.get(pos)?.is_ascii_alphabetic() {
        return None;
    }
    let name_start = pos;
    while pos < bytes.len() && is_name_byte(bytes[pos]) {
        pos += 1;
    }
    let name = input[name_start..pos].to_ascii_lowercase();

    if closing {
        let end = input[pos..].find('>')? + pos;
        return Some((Token::End { name }, &input[end + 1..]));
    }

    let mut attrs = Attributes::new();
    loop {
        pos = skip_whitespace(bytes, pos);
        match bytes.get(pos)? {
            b'>' => {
                let token = Token::Start {
                    name,
                    attrs,
                    self_closing: false,
                };
                return Some((token, &input[pos + 1..]));
            }
            b'/' if bytes.get(pos + 1) == Some(&b'>') => {
                let token = Token::Start {
                    name,
                    attrs,
                    self_closing: true,
                };
                return Some((token, &input[pos + 2..]));
            }
            b'/' => {
                pos += 1;
                continue;
            }
            _ => {}
        }

        let attr_start = pos;
        while pos < bytes.len()
            && !bytes[pos].is_ascii_whitespace()
            && !matches!(bytes[pos], b'=' | b'>' | b'/')
        {
            pos += 1;
        }
        let attr_name = canonical_attribute_name(&input[attr_start..pos]);

        pos = skip_whitespace(bytes, pos);
        let value = if bytes.get(pos) == Some(&b'=') {
            pos = skip_whitespace(bytes, pos + 1);
            match *bytes.get(pos)? {
                quote @ (b'"' | b'\'') => {
                    let start = pos + 1;
                    let end = input[start..].find(quote as char)? + start;
                    pos = end + 1;
                    AttrValue::Str(decode_html_entities(&input[start..end]).into_owned())
                }
                _ => {
                    let start = pos;
                    while pos < bytes.len()
                        && !bytes[pos].is_ascii_whitespace()
                        && bytes[pos] != b'>'
                    {
                        pos += 1;
                    }
                    AttrValue::Str(decode_html_entities(&input[start..pos]).into_owned())
                }
            }
        } else {
            AttrValue::Bool(true)
        };

        // Browsers keep the first occurrence of a repeated attribute.
        if !attr_name.is_empty() {
            attrs.entry(attr_name).or_insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_are_canonicalized_and_decoded() {
        let tokens =
            tokenize(r#"<IMG Class="hero" srcset='a.png 2x' alt="Tom &amp; Jerry" hidden>"#);
        let Token::Start { name, attrs, .. } = &tokens[0] else {
            panic!("expected start tag, got {tokens:?}");
        };
        assert_eq!(name, "img");
        assert_eq!(attrs.get("className"), Some(&"hero".into()));
        assert_eq!(attrs.get("srcSet"), Some(&"a.png 2x".into()));
        assert_eq!(attrs.get("alt"), Some(&"Tom & Jerry".into()));
        assert_eq!(attrs.get("hidden"), Some(&AttrValue::Bool(true)));
    }

    #[test]
    fn test_comments_and_stray_brackets() {
        let tokens = tokenize("1 < 2 <!-- hidden --> done");
        let text: String = tokens
            .iter()
            .map(|token| match token {
                Token::Text(text) => text.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(text, "1 < 2  done");
    }

    #[test]
    fn test_script_body_is_raw_text() {
        let tokens = tokenize("<script>if (a < b) {}</script>");
        assert_eq!(
            tokens,
            vec![
                Token::Start {
                    name: "script".into(),
                    attrs: Attributes::new(),
                    self_closing: false
                },
                Token::Text("if (a < b) {}".into()),
                Token::End {
                    name: "script".into()
                },
            ]
        );
    }

    #[test]
    fn test_unterminated_tag_is_text() {
        let tokens = tokenize("<a href=\"x");
        assert!(tokens.iter().all(|token| matches!(token, Token::Text(_))));
    }
}
