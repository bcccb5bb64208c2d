use logos::{Lexer, Logos, Skip};

/// Token types for HTML markup
///
/// The tokenizer only splits tags from text; attributes are parsed from the
/// start tag slice by [`parse_start_tag`].
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Comments, doctype and processing instructions carry no content
    #[token("<!", skip_declaration)]
    #[token("<?", skip_declaration)]
    Declaration,

    #[regex(r#"<[a-zA-Z]([^>"']|"[^"]*"|'[^']*')*>"#, |lex| lex.slice())]
    StartTag(&'src str),

    #[regex(r"</[a-zA-Z][^>]*>", |lex| lex.slice())]
    EndTag(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    // A `<` that does not open a tag is literal text
    #[token("<", |lex| lex.slice())]
    Lt(&'src str),
}

fn skip_declaration<'src>(lex: &mut Lexer<'src, Token<'src>>) -> Skip {
    let rest = lex.remainder();
    let end = if rest.starts_with("--") {
        rest.find("-->").map(|i| i + 3)
    } else {
        rest.find('>').map(|i| i + 1)
    };
    lex.bump(end.unwrap_or(rest.len()));
    Skip
}

/// Tokenize HTML; unlexable input is kept as text
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push(token),
            Err(()) => tokens.push(Token::Text(lexer.slice())),
        }
    }
    tokens
}

/// A parsed start tag
#[derive(Debug, Clone, PartialEq)]
pub struct StartTag {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub self_closing: bool,
}

/// Parse `<name attr="value" ...>` into a name and attribute list
///
/// Attribute names are lowercased and values are entity-decoded.
pub fn parse_start_tag(slice: &str) -> StartTag {
    let inner = slice.trim_start_matches('<').trim_end_matches('>');
    let self_closing = inner.ends_with('/');
    let inner = inner.trim_end_matches('/');

    let name_end = inner
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();

    let mut attrs = Vec::new();
    let mut rest = &inner[name_end..];
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() {
            break;
        }

        let key_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let key = rest[..key_end].to_ascii_lowercase();
        rest = rest[key_end..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (value, remaining) = match after_eq.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    match body.find(quote) {
                        Some(close) => (&body[..close], &body[close + 1..]),
                        None => (body, ""),
                    }
                }
                _ => {
                    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                    (&after_eq[..end], &after_eq[end..])
                }
            };
            rest = remaining;
            crate::escape::decode_entities(value)
        } else {
            String::new()
        };

        if !key.is_empty() {
            attrs.push((key, value));
        }
    }

    StartTag {
        name,
        attrs,
        self_closing,
    }
}

/// Element name of an end tag slice such as `</p >`
pub fn end_tag_name(slice: &str) -> String {
    slice
        .trim_start_matches("</")
        .trim_end_matches('>')
        .trim()
        .to_ascii_lowercase()
}
