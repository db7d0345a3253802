/// A single whitespace-delimited field of a report, with its byte span in the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl Token {
    pub fn new(text: String, pos_start: usize, pos_end: usize) -> Token {
        Token {
            text,
            pos_start,
            pos_end,
        }
    }

    pub fn len(&self) -> usize {
        self.pos_end - self.pos_start
    }

    pub fn is_empty(&self) -> bool {
        self.pos_start == self.pos_end
    }
}

/// Splits a raw report into its fields. Any run of Unicode whitespace
/// (spaces, tabs, newlines) separates two fields.
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    pub fn lex(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }

    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();
        let (start, _) = *self.peek()?;

        let mut end = start;
        while let Some(&(pos, c)) = self.peek() {
            if c.is_whitespace() {
                break;
            }
            end = pos + c.len_utf8();
            self.advance();
        }

        Some(Token::new(self.input[start..end].to_string(), start, end))
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn peek(&mut self) -> Option<&(usize, char)> {
        self.chars.peek()
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }
}
