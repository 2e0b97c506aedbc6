/// Token types for voice notation text
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Raw text between delay runs and separators (`C4+E4`, untrimmed)
    Notes(String),
    /// A run of `_`, carrying its length
    Delay(usize),
    /// `,` between entries
    Separator,
}

/// A token with the byte offset where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedToken {
    pub token: Token,
    pub offset: usize,
}

pub const DELAY_SYMBOL: char = '_';
pub const SEPARATOR: char = ',';

/// Lexer splitting a voice string into notes text, delay runs and separators
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
        }
    }

    fn delay_run(&mut self) -> usize {
        let mut len = 0;
        while let Some(&(_, DELAY_SYMBOL)) = self.chars.peek() {
            self.chars.next();
            len += 1;
        }
        len
    }

    fn notes_text(&mut self) -> String {
        let mut text = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c == DELAY_SYMBOL || c == SEPARATOR {
                break;
            }
            text.push(c);
            self.chars.next();
        }
        text
    }

    pub fn tokenize(&mut self) -> Vec<LocatedToken> {
        let mut tokens = Vec::new();

        while let Some(&(offset, c)) = self.chars.peek() {
            let token = match c {
                DELAY_SYMBOL => Token::Delay(self.delay_run()),
                SEPARATOR => {
                    self.chars.next();
                    Token::Separator
                }
                _ => Token::Notes(self.notes_text()),
            };
            tokens.push(LocatedToken { token, offset });
        }

        tokens
    }
}
