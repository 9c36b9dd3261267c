//! Lexical splitting of an input line into a command token and argument
//! tokens. No type interpretation happens here.

/// A tokenized input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedLine {
    /// The first token. Empty when the line holds no tokens.
    pub command: String,
    /// Remaining tokens, in order.
    pub args: Vec<String>,
}

impl TokenizedLine {
    /// Whether the line held no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.command.is_empty() && self.args.is_empty()
    }
}

/// Tokenize a command line respecting quotes and backslash escapes.
///
/// - Whitespace runs separate tokens.
/// - Single or double quotes group text, whitespace included.
/// - A backslash escapes the next character, inside quotes or out.
/// - `""` and `''` produce an empty token.
/// - An unterminated quote extends to the end of the line.
pub fn tokenize(line: &str) -> TokenizedLine {
    let mut tokens = split_tokens(line).into_iter();
    TokenizedLine {
        command: tokens.next().unwrap_or_default(),
        args: tokens.collect(),
    }
}

fn split_tokens(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Set once a quote opens so that empty quoted strings still count.
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            // A trailing lone backslash is dropped.
            if let Some(next) = chars.next() {
                current.push(next);
                in_token = true;
            }
            continue;
        }
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    in_token = true;
                },
                c if c.is_whitespace() => {
                    if in_token || !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                },
                _ => {
                    current.push(ch);
                    in_token = true;
                },
            },
        }
    }

    if in_token || !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
