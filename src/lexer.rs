// Word lexer shared by `zone` and `digparser`. The reference implementation
// imports this from a separate `lex` module that wasn't part of the
// retrieved source; there's no teacher equivalent either, so this is a plain
// struct plus `Iterator` impl in the crate's own idiom rather than a ported
// file.
//
// Token contract: whitespace runs collapse to a single `Space`, `;` starts a
// comment that runs to end of line (the leading `;` itself is consumed as the
// comment delimiter and is not part of the token's text, so a `;;` banner
// line's value starts with a single leftover `;`), `"..."` is one atom with
// the quotes kept (callers that want the quoted text strip them, same as the
// char-string escaping helpers in `rdata`), and `(`/`)` are always their own
// one-character atoms so callers can track parenthesized multi-line records.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Atom(String),
    Space,
    Newline,
    Comment(String),
}

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Lexer<'a> {
        Lexer { chars: text.chars().peekable() }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let &c = self.chars.peek()?;

        if c == '\r' {
            self.chars.next();
            return self.next();
        }
        if c == '\n' {
            self.chars.next();
            return Some(Token::Newline);
        }
        if c == ' ' || c == '\t' {
            while matches!(self.chars.peek(), Some(' ') | Some('\t')) {
                self.chars.next();
            }
            return Some(Token::Space);
        }
        if c == ';' {
            self.chars.next();
            let mut text = String::new();
            while let Some(&c) = self.chars.peek() {
                if c == '\n' {
                    break;
                }
                text.push(c);
                self.chars.next();
            }
            return Some(Token::Comment(text));
        }
        if c == '"' {
            let mut text = String::new();
            text.push(c);
            self.chars.next();
            while let Some(&c) = self.chars.peek() {
                text.push(c);
                self.chars.next();
                if c == '\\' {
                    if let Some(&escaped) = self.chars.peek() {
                        text.push(escaped);
                        self.chars.next();
                    }
                    continue;
                }
                if c == '"' {
                    break;
                }
            }
            return Some(Token::Atom(text));
        }
        if c == '(' || c == ')' {
            self.chars.next();
            return Some(Token::Atom(c.to_string()));
        }

        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || c == ';' || c == '"' || c == '(' || c == ')' {
                break;
            }
            text.push(c);
            self.chars.next();
            if c == '\\' {
                if let Some(&escaped) = self.chars.peek() {
                    text.push(escaped);
                    self.chars.next();
                }
            }
        }
        Some(Token::Atom(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<Token> {
        Lexer::new(text).collect()
    }

    #[test]
    fn splits_atoms_on_whitespace() {
        assert_eq!(
            tokens("www IN A"),
            vec![
                Token::Atom("www".to_string()),
                Token::Space,
                Token::Atom("IN".to_string()),
                Token::Space,
                Token::Atom("A".to_string()),
            ]
        );
    }

    #[test]
    fn comment_runs_to_end_of_line_and_drops_the_leading_semicolon() {
        assert_eq!(
            tokens("A ; a comment\nB"),
            vec![
                Token::Atom("A".to_string()),
                Token::Space,
                Token::Comment(" a comment".to_string()),
                Token::Newline,
                Token::Atom("B".to_string()),
            ]
        );
    }

    #[test]
    fn double_semicolon_banner_leaves_one_semicolon_in_the_token() {
        assert_eq!(tokens(";; QUESTION SECTION:"), vec![Token::Comment("; QUESTION SECTION:".to_string())]);
    }

    #[test]
    fn quoted_strings_are_single_atoms_with_quotes_kept() {
        assert_eq!(tokens("\"v=spf1 -all\""), vec![Token::Atom("\"v=spf1 -all\"".to_string())]);
    }

    #[test]
    fn parens_are_their_own_atoms() {
        assert_eq!(
            tokens("(A)"),
            vec![Token::Atom("(".to_string()), Token::Atom("A".to_string()), Token::Atom(")".to_string())]
        );
    }

    #[test]
    fn backslash_escapes_a_following_whitespace_char() {
        assert_eq!(tokens("a\\ b"), vec![Token::Atom("a\\ b".to_string())]);
    }
}
