//! JavaScript Scanner - turns a source buffer into tokens on demand
//!
//! The scanner never guesses whether `/` starts a regular expression or
//! whether `}` resumes a template literal: every request carries a
//! [`LexGoal`] chosen by the grammar engine. A token that was scanned under
//! the wrong goal can be re-scanned from its start position with
//! [`Scanner::rescan`].

use crate::error::{lex_error, ParseResult};
use core_types::SourcePosition;

/// What the grammar expects at the position of the next token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexGoal {
    /// An operand may start here, so `/` begins a regular expression
    RegexAllowed,
    /// An operand just ended, so `/` and `/=` are operators
    DivisionAllowed,
    /// A `}` closes a template substitution and template text resumes
    TemplateContinuation,
}

/// Reserved words of the language.
///
/// Contextual words (`let`, `static`, `async`, `await`, `yield`, `of`,
/// `get`, `set`, ...) are scanned as identifiers; the grammar engine
/// decides what they mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// break keyword
    Break,
    /// case keyword
    Case,
    /// catch keyword
    Catch,
    /// class keyword
    Class,
    /// const keyword
    Const,
    /// continue keyword
    Continue,
    /// debugger keyword
    Debugger,
    /// default keyword
    Default,
    /// delete keyword
    Delete,
    /// do keyword
    Do,
    /// else keyword
    Else,
    /// enum keyword (reserved for future use)
    Enum,
    /// export keyword
    Export,
    /// extends keyword
    Extends,
    /// false keyword
    False,
    /// finally keyword
    Finally,
    /// for keyword
    For,
    /// function keyword
    Function,
    /// if keyword
    If,
    /// import keyword
    Import,
    /// in keyword
    In,
    /// instanceof keyword
    Instanceof,
    /// new keyword
    New,
    /// null keyword
    Null,
    /// return keyword
    Return,
    /// super keyword
    Super,
    /// switch keyword
    Switch,
    /// this keyword
    This,
    /// throw keyword
    Throw,
    /// true keyword
    True,
    /// try keyword
    Try,
    /// typeof keyword
    Typeof,
    /// var keyword
    Var,
    /// void keyword
    Void,
    /// while keyword
    While,
    /// with keyword
    With,
}

impl Keyword {
    /// Look up the keyword spelled by `name`.
    pub fn from_name(name: &str) -> Option<Keyword> {
        let keyword = match name {
            "break" => Keyword::Break,
            "case" => Keyword::Case,
            "catch" => Keyword::Catch,
            "class" => Keyword::Class,
            "const" => Keyword::Const,
            "continue" => Keyword::Continue,
            "debugger" => Keyword::Debugger,
            "default" => Keyword::Default,
            "delete" => Keyword::Delete,
            "do" => Keyword::Do,
            "else" => Keyword::Else,
            "enum" => Keyword::Enum,
            "export" => Keyword::Export,
            "extends" => Keyword::Extends,
            "false" => Keyword::False,
            "finally" => Keyword::Finally,
            "for" => Keyword::For,
            "function" => Keyword::Function,
            "if" => Keyword::If,
            "import" => Keyword::Import,
            "in" => Keyword::In,
            "instanceof" => Keyword::Instanceof,
            "new" => Keyword::New,
            "null" => Keyword::Null,
            "return" => Keyword::Return,
            "super" => Keyword::Super,
            "switch" => Keyword::Switch,
            "this" => Keyword::This,
            "throw" => Keyword::Throw,
            "true" => Keyword::True,
            "try" => Keyword::Try,
            "typeof" => Keyword::Typeof,
            "var" => Keyword::Var,
            "void" => Keyword::Void,
            "while" => Keyword::While,
            "with" => Keyword::With,
            _ => return None,
        };
        Some(keyword)
    }
}

/// Operators and punctuation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuator {
    /// Opening parenthesis
    LParen,
    /// Closing parenthesis
    RParen,
    /// Opening brace
    LBrace,
    /// Closing brace
    RBrace,
    /// Opening bracket
    LBracket,
    /// Closing bracket
    RBracket,
    /// Semicolon
    Semicolon,
    /// Comma
    Comma,
    /// Dot
    Dot,
    /// Spread operator
    Spread,
    /// Optional chaining
    OptionalChain,
    /// Colon
    Colon,
    /// Question mark
    Question,
    /// Assignment
    Assign,
    /// Arrow function
    Arrow,
    /// Plus
    Plus,
    /// Minus
    Minus,
    /// Multiply
    Star,
    /// Divide
    Slash,
    /// Modulo
    Percent,
    /// Exponentiation
    StarStar,
    /// Loose equality
    EqEq,
    /// Strict equality
    EqEqEq,
    /// Loose inequality
    NotEq,
    /// Strict inequality
    NotEqEq,
    /// Less than
    Lt,
    /// Less than or equal
    LtEq,
    /// Greater than
    Gt,
    /// Greater than or equal
    GtEq,
    /// Logical AND
    AndAnd,
    /// Logical OR
    OrOr,
    /// Nullish coalescing
    NullishCoalesce,
    /// Logical NOT
    Not,
    /// Bitwise AND
    And,
    /// Bitwise OR
    Or,
    /// Bitwise XOR
    Xor,
    /// Bitwise NOT
    Tilde,
    /// Left shift
    LtLt,
    /// Signed right shift
    GtGt,
    /// Unsigned right shift
    GtGtGt,
    /// Add assign
    PlusEq,
    /// Subtract assign
    MinusEq,
    /// Multiply assign
    StarEq,
    /// Divide assign
    SlashEq,
    /// Modulo assign
    PercentEq,
    /// Exponentiation assign
    StarStarEq,
    /// Bitwise AND assign
    AndEq,
    /// Bitwise OR assign
    OrEq,
    /// Bitwise XOR assign
    XorEq,
    /// Left shift assign
    LtLtEq,
    /// Signed right shift assign
    GtGtEq,
    /// Unsigned right shift assign
    GtGtGtEq,
    /// Logical AND assign
    AndAndEq,
    /// Logical OR assign
    OrOrEq,
    /// Nullish coalescing assign
    NullishCoalesceEq,
    /// Increment
    PlusPlus,
    /// Decrement
    MinusMinus,
}

impl Punctuator {
    /// Whether this is one of the assignment operators (`=`, `+=`, `??=`, ...).
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            Punctuator::Assign
                | Punctuator::PlusEq
                | Punctuator::MinusEq
                | Punctuator::StarEq
                | Punctuator::SlashEq
                | Punctuator::PercentEq
                | Punctuator::StarStarEq
                | Punctuator::AndEq
                | Punctuator::OrEq
                | Punctuator::XorEq
                | Punctuator::LtLtEq
                | Punctuator::GtGtEq
                | Punctuator::GtGtGtEq
                | Punctuator::AndAndEq
                | Punctuator::OrOrEq
                | Punctuator::NullishCoalesceEq
        )
    }
}

/// Which piece of a template literal a token covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePart {
    /// `` `text` ``
    NoSubstitution,
    /// `` `text${ ``
    Head,
    /// `}text${`
    Middle,
    /// `` }text` ``
    Tail,
}

/// Token categories
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier name and whether it was spelled with escapes
    Identifier(String, bool),
    /// `#name`
    PrivateIdentifier(String),
    /// Reserved word
    Keyword(Keyword),
    /// Operator or punctuation
    Punctuator(Punctuator),
    /// Numeric literal; `legacy_octal` marks `017` and `08` forms
    Number {
        /// Legacy octal or non-octal-decimal integer
        legacy_octal: bool,
    },
    /// Numeric literal with an `n` suffix
    BigInt,
    /// String literal; `legacy_octal_escape` marks `\07` and `\8` escapes
    String {
        /// Contains an escape forbidden in strict mode
        legacy_octal_escape: bool,
    },
    /// Template literal span
    Template {
        /// Which span this is
        part: TemplatePart,
        /// First malformed escape, tolerated only in tagged templates
        invalid_escape: Option<SourcePosition>,
    },
    /// Regular expression literal
    RegExp,
    /// End of input
    EOF,
}

/// A scanned token. The lexeme is recovered from the source by offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Category and payload
    pub kind: TokenKind,
    /// Position of the first character
    pub start: SourcePosition,
    /// Position just past the last character
    pub end: SourcePosition,
    /// A line terminator appeared between the previous token and this one
    pub newline_before: bool,
}

impl Token {
    /// The source text this token covers.
    pub fn lexeme<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.start.offset..self.end.offset).unwrap_or("")
    }

    /// Check for a specific punctuator
    pub fn is_punctuator(&self, punctuator: Punctuator) -> bool {
        matches!(&self.kind, TokenKind::Punctuator(p) if *p == punctuator)
    }

    /// Check for a specific keyword
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.kind, TokenKind::Keyword(k) if *k == keyword)
    }

    /// Check for an unescaped identifier with the given name
    pub fn is_contextual(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Identifier(n, false) if n == name)
    }

    /// Whether this is the end of input
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::EOF)
    }

    /// The goal for the token that follows this one when nothing better is known.
    ///
    /// After a token that can end an operand a `/` is division; anywhere
    /// else it starts a regular expression.
    pub fn goal_after(&self) -> LexGoal {
        let ends_operand = match &self.kind {
            TokenKind::Identifier(..)
            | TokenKind::PrivateIdentifier(_)
            | TokenKind::Number { .. }
            | TokenKind::BigInt
            | TokenKind::String { .. }
            | TokenKind::RegExp => true,
            TokenKind::Template { part, .. } => {
                matches!(part, TemplatePart::NoSubstitution | TemplatePart::Tail)
            }
            TokenKind::Keyword(k) => matches!(
                k,
                Keyword::This | Keyword::Super | Keyword::Null | Keyword::True | Keyword::False
            ),
            TokenKind::Punctuator(p) => matches!(
                p,
                Punctuator::RParen
                    | Punctuator::RBracket
                    | Punctuator::RBrace
                    | Punctuator::PlusPlus
                    | Punctuator::MinusMinus
            ),
            TokenKind::EOF => false,
        };
        if ends_operand {
            LexGoal::DivisionAllowed
        } else {
            LexGoal::RegexAllowed
        }
    }

    /// Short description for error messages
    pub fn describe(&self, source: &str) -> String {
        match self.kind {
            TokenKind::EOF => "end of input".to_string(),
            _ => format!("'{}'", self.lexeme(source)),
        }
    }
}

/// Saved scanner state for a bounded look ahead.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    offset: usize,
    line: u32,
    column: u32,
    eof_position: Option<SourcePosition>,
}

enum Escape {
    Plain,
    LegacyOctal,
}

/// Pull-based scanner over one source buffer.
///
/// A buffer ending in `"\n\0"` is treated as carrying the driver's
/// sentinel: scanning stops at the NUL, and the end-of-input token is
/// positioned where the caller's text ended.
pub struct Scanner<'a> {
    source: &'a str,
    offset: usize,
    line: u32,
    column: u32,
    end: usize,
    logical_end: usize,
    eof_position: Option<SourcePosition>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner positioned at line 1, column 1
    pub fn new(source: &'a str) -> Self {
        let (end, logical_end) = if source.ends_with("\n\0") {
            (source.len() - 1, source.len() - 2)
        } else {
            (source.len(), source.len())
        };
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
            end,
            logical_end,
            eof_position: None,
        }
    }

    /// Current position
    pub fn position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column, self.offset)
    }

    /// Save the current state
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            offset: self.offset,
            line: self.line,
            column: self.column,
            eof_position: self.eof_position,
        }
    }

    /// Return to a saved state
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.offset = checkpoint.offset;
        self.line = checkpoint.line;
        self.column = checkpoint.column;
        self.eof_position = checkpoint.eof_position;
    }

    /// Scan the next token under `goal`.
    pub fn next_token(&mut self, goal: LexGoal) -> ParseResult<Token> {
        let newline_before = if goal == LexGoal::TemplateContinuation {
            false
        } else {
            self.skip_trivia()?
        };
        let start = self.position();
        let kind = match self.peek() {
            None => {
                let at = self.eof_position.unwrap_or(start);
                return Ok(Token {
                    kind: TokenKind::EOF,
                    start: at,
                    end: at,
                    newline_before,
                });
            }
            Some(ch) => self.scan_token(ch, goal, start)?,
        };
        Ok(Token {
            kind,
            start,
            end: self.position(),
            newline_before,
        })
    }

    /// Scan again from the start of `token` under a different goal.
    pub fn rescan(&mut self, token: &Token, goal: LexGoal) -> ParseResult<Token> {
        self.offset = token.start.offset;
        self.line = token.start.line;
        self.column = token.start.column;
        let mut rescanned = self.next_token(goal)?;
        rescanned.newline_before = token.newline_before;
        Ok(rescanned)
    }

    fn scan_token(
        &mut self,
        ch: char,
        goal: LexGoal,
        start: SourcePosition,
    ) -> ParseResult<TokenKind> {
        match ch {
            '}' if goal == LexGoal::TemplateContinuation => {
                self.bump();
                self.scan_template_span(start, false)
            }
            '/' if goal == LexGoal::RegexAllowed => self.scan_regexp(start),
            '"' | '\'' => self.scan_string(ch, start),
            '`' => {
                self.bump();
                self.scan_template_span(start, true)
            }
            '0'..='9' => self.scan_number(start),
            '.' if matches!(self.peek_at(1), Some('0'..='9')) => self.scan_number(start),
            '#' => {
                self.bump();
                match self.peek() {
                    Some(c) if c == '\\' || is_id_start(c) => {
                        let (name, _) = self.scan_identifier_name(start)?;
                        Ok(TokenKind::PrivateIdentifier(name))
                    }
                    _ => Err(lex_error("Invalid or unexpected token '#'", start)),
                }
            }
            c if c == '\\' || is_id_start(c) => {
                let (name, escaped) = self.scan_identifier_name(start)?;
                if !escaped {
                    if let Some(keyword) = Keyword::from_name(&name) {
                        return Ok(TokenKind::Keyword(keyword));
                    }
                }
                Ok(TokenKind::Identifier(name, escaped))
            }
            _ => self.scan_punctuator(ch, start).map(TokenKind::Punctuator),
        }
    }

    fn scan_punctuator(&mut self, ch: char, start: SourcePosition) -> ParseResult<Punctuator> {
        self.bump();
        let punctuator = match ch {
            '(' => Punctuator::LParen,
            ')' => Punctuator::RParen,
            '{' => Punctuator::LBrace,
            '}' => Punctuator::RBrace,
            '[' => Punctuator::LBracket,
            ']' => Punctuator::RBracket,
            ';' => Punctuator::Semicolon,
            ',' => Punctuator::Comma,
            ':' => Punctuator::Colon,
            '~' => Punctuator::Tilde,
            '.' => {
                if self.peek() == Some('.') && self.peek_at(1) == Some('.') {
                    self.bump();
                    self.bump();
                    Punctuator::Spread
                } else {
                    Punctuator::Dot
                }
            }
            '?' => {
                if self.eat('?') {
                    if self.eat('=') {
                        Punctuator::NullishCoalesceEq
                    } else {
                        Punctuator::NullishCoalesce
                    }
                } else if self.peek() == Some('.') && !matches!(self.peek_at(1), Some('0'..='9')) {
                    // `?.5` is a conditional followed by a number
                    self.bump();
                    Punctuator::OptionalChain
                } else {
                    Punctuator::Question
                }
            }
            '=' => {
                if self.eat('>') {
                    Punctuator::Arrow
                } else if self.eat('=') {
                    if self.eat('=') {
                        Punctuator::EqEqEq
                    } else {
                        Punctuator::EqEq
                    }
                } else {
                    Punctuator::Assign
                }
            }
            '!' => {
                if self.eat('=') {
                    if self.eat('=') {
                        Punctuator::NotEqEq
                    } else {
                        Punctuator::NotEq
                    }
                } else {
                    Punctuator::Not
                }
            }
            '+' => {
                if self.eat('+') {
                    Punctuator::PlusPlus
                } else if self.eat('=') {
                    Punctuator::PlusEq
                } else {
                    Punctuator::Plus
                }
            }
            '-' => {
                if self.eat('-') {
                    Punctuator::MinusMinus
                } else if self.eat('=') {
                    Punctuator::MinusEq
                } else {
                    Punctuator::Minus
                }
            }
            '*' => {
                if self.eat('*') {
                    if self.eat('=') {
                        Punctuator::StarStarEq
                    } else {
                        Punctuator::StarStar
                    }
                } else if self.eat('=') {
                    Punctuator::StarEq
                } else {
                    Punctuator::Star
                }
            }
            '/' => {
                if self.eat('=') {
                    Punctuator::SlashEq
                } else {
                    Punctuator::Slash
                }
            }
            '%' => {
                if self.eat('=') {
                    Punctuator::PercentEq
                } else {
                    Punctuator::Percent
                }
            }
            '<' => {
                if self.eat('<') {
                    if self.eat('=') {
                        Punctuator::LtLtEq
                    } else {
                        Punctuator::LtLt
                    }
                } else if self.eat('=') {
                    Punctuator::LtEq
                } else {
                    Punctuator::Lt
                }
            }
            '>' => {
                if self.eat('>') {
                    if self.eat('>') {
                        if self.eat('=') {
                            Punctuator::GtGtGtEq
                        } else {
                            Punctuator::GtGtGt
                        }
                    } else if self.eat('=') {
                        Punctuator::GtGtEq
                    } else {
                        Punctuator::GtGt
                    }
                } else if self.eat('=') {
                    Punctuator::GtEq
                } else {
                    Punctuator::Gt
                }
            }
            '&' => {
                if self.eat('&') {
                    if self.eat('=') {
                        Punctuator::AndAndEq
                    } else {
                        Punctuator::AndAnd
                    }
                } else if self.eat('=') {
                    Punctuator::AndEq
                } else {
                    Punctuator::And
                }
            }
            '|' => {
                if self.eat('|') {
                    if self.eat('=') {
                        Punctuator::OrOrEq
                    } else {
                        Punctuator::OrOr
                    }
                } else if self.eat('=') {
                    Punctuator::OrEq
                } else {
                    Punctuator::Or
                }
            }
            '^' => {
                if self.eat('=') {
                    Punctuator::XorEq
                } else {
                    Punctuator::Xor
                }
            }
            other => {
                return Err(lex_error(
                    format!("Invalid or unexpected token '{}'", other.escape_default()),
                    start,
                ))
            }
        };
        Ok(punctuator)
    }

    fn scan_string(&mut self, quote: char, start: SourcePosition) -> ParseResult<TokenKind> {
        self.bump();
        let mut legacy_octal_escape = false;
        loop {
            match self.peek() {
                None | Some('\n') | Some('\r') => {
                    return Err(lex_error("Unterminated string literal", start));
                }
                Some(c) if c == quote => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    let backslash = self.position();
                    self.bump();
                    if let Escape::LegacyOctal = self.scan_escape(backslash)? {
                        legacy_octal_escape = true;
                    }
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        Ok(TokenKind::String { legacy_octal_escape })
    }

    /// Scan template text after `` ` `` (`opening`) or after a substitution's `}`.
    fn scan_template_span(&mut self, start: SourcePosition, opening: bool) -> ParseResult<TokenKind> {
        let mut invalid_escape = None;
        let part = loop {
            match self.peek() {
                None => return Err(lex_error("Unterminated template literal", start)),
                Some('`') => {
                    self.bump();
                    break if opening {
                        TemplatePart::NoSubstitution
                    } else {
                        TemplatePart::Tail
                    };
                }
                Some('$') if self.peek_at(1) == Some('{') => {
                    self.bump();
                    self.bump();
                    break if opening {
                        TemplatePart::Head
                    } else {
                        TemplatePart::Middle
                    };
                }
                Some('\\') => {
                    let backslash = self.position();
                    self.bump();
                    match self.scan_escape(backslash) {
                        Ok(Escape::Plain) => {}
                        Ok(Escape::LegacyOctal) | Err(_) => {
                            invalid_escape.get_or_insert(backslash);
                        }
                    }
                }
                Some(_) => {
                    self.bump();
                }
            }
        };
        Ok(TokenKind::Template {
            part,
            invalid_escape,
        })
    }

    /// Validate one escape sequence; the backslash is already consumed.
    fn scan_escape(&mut self, backslash: SourcePosition) -> ParseResult<Escape> {
        match self.peek() {
            // the caller reports the unterminated literal
            None => Ok(Escape::Plain),
            Some('x') => {
                self.bump();
                for _ in 0..2 {
                    match self.peek() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            self.bump();
                        }
                        _ => {
                            return Err(lex_error("Invalid hexadecimal escape sequence", backslash))
                        }
                    }
                }
                Ok(Escape::Plain)
            }
            Some('u') => {
                self.bump();
                self.scan_unicode_escape_body(backslash)?;
                Ok(Escape::Plain)
            }
            Some('0') if !matches!(self.peek_at(1), Some('0'..='9')) => {
                self.bump();
                Ok(Escape::Plain)
            }
            Some(first @ '0'..='7') => {
                self.bump();
                let extra = if first <= '3' { 2 } else { 1 };
                for _ in 0..extra {
                    if matches!(self.peek(), Some('0'..='7')) {
                        self.bump();
                    }
                }
                Ok(Escape::LegacyOctal)
            }
            Some('8') | Some('9') => {
                self.bump();
                Ok(Escape::LegacyOctal)
            }
            Some(_) => {
                // includes line continuations; bump keeps CRLF as one line
                if self.bump() == Some('\r')
                    && self.peek() == Some('\n')
                    && self.offset != self.logical_end
                {
                    self.bump();
                }
                Ok(Escape::Plain)
            }
        }
    }

    /// Scan `XXXX` or `{X...}` after `\u`, returning the code point.
    fn scan_unicode_escape_body(&mut self, backslash: SourcePosition) -> ParseResult<u32> {
        let invalid = || lex_error("Invalid Unicode escape sequence", backslash);
        if self.eat('{') {
            let mut value: u32 = 0;
            let mut digits = 0;
            while let Some(c) = self.peek() {
                let Some(digit) = c.to_digit(16) else { break };
                self.bump();
                digits += 1;
                value = value.saturating_mul(16).saturating_add(digit);
            }
            if digits == 0 || !self.eat('}') {
                return Err(invalid());
            }
            if value > 0x10FFFF {
                return Err(lex_error("Undefined Unicode code-point", backslash));
            }
            Ok(value)
        } else {
            let mut value = 0;
            for _ in 0..4 {
                let digit = self.peek().and_then(|c| c.to_digit(16)).ok_or_else(invalid)?;
                self.bump();
                value = value * 16 + digit;
            }
            Ok(value)
        }
    }

    fn scan_regexp(&mut self, start: SourcePosition) -> ParseResult<TokenKind> {
        let unterminated = || lex_error("Unterminated regular expression literal", start);
        self.bump();
        let mut in_class = false;
        loop {
            match self.peek() {
                None => return Err(unterminated()),
                Some(c) if is_line_terminator(c) => return Err(unterminated()),
                Some('\\') => {
                    self.bump();
                    match self.peek() {
                        Some(c) if !is_line_terminator(c) => {
                            self.bump();
                        }
                        _ => return Err(unterminated()),
                    }
                }
                Some('[') => {
                    in_class = true;
                    self.bump();
                }
                Some(']') => {
                    in_class = false;
                    self.bump();
                }
                Some('/') if !in_class => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }

        let flags_start = self.position();
        let mut seen = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                return Err(lex_error("Invalid regular expression flags", flags_start));
            }
            if !is_id_continue(c) {
                break;
            }
            self.bump();
            if !"dgimsuvy".contains(c) || seen.contains(c) {
                return Err(lex_error(
                    format!("Invalid regular expression flag '{}'", c),
                    flags_start,
                ));
            }
            seen.push(c);
        }
        if seen.contains('u') && seen.contains('v') {
            return Err(lex_error("Invalid regular expression flags", flags_start));
        }
        Ok(TokenKind::RegExp)
    }

    fn scan_number(&mut self, start: SourcePosition) -> ParseResult<TokenKind> {
        if self.peek() == Some('.') {
            self.bump();
            self.scan_digits(10, start)?;
            self.scan_exponent(start)?;
            return self.finish_number(start, TokenKind::Number { legacy_octal: false });
        }

        if self.peek() == Some('0') {
            let radix = match self.peek_at(1) {
                Some('x') | Some('X') => Some(16),
                Some('o') | Some('O') => Some(8),
                Some('b') | Some('B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.bump();
                self.bump();
                if self.scan_digits(radix, start)? == 0 {
                    return Err(lex_error(
                        format!("Expected digits after radix {} prefix", radix),
                        start,
                    ));
                }
                let kind = if self.eat('n') {
                    TokenKind::BigInt
                } else {
                    TokenKind::Number { legacy_octal: false }
                };
                return self.finish_number(start, kind);
            }
            match self.peek_at(1) {
                Some('0'..='9') => return self.scan_legacy_octal(start),
                Some('_') => {
                    return Err(lex_error(
                        "Numeric separator can not be used after leading 0",
                        start,
                    ))
                }
                _ => {}
            }
        }

        self.scan_digits(10, start)?;
        let mut integer = true;
        if self.eat('.') {
            integer = false;
            self.scan_digits(10, start)?;
        }
        if self.scan_exponent(start)? {
            integer = false;
        }
        let kind = if integer && self.eat('n') {
            TokenKind::BigInt
        } else {
            TokenKind::Number { legacy_octal: false }
        };
        self.finish_number(start, kind)
    }

    /// `017` (legacy octal) or `089` (non-octal decimal); both are sloppy-only.
    fn scan_legacy_octal(&mut self, start: SourcePosition) -> ParseResult<TokenKind> {
        let mut octal = true;
        while let Some(c @ '0'..='9') = self.peek() {
            if c >= '8' {
                octal = false;
            }
            self.bump();
        }
        if !octal {
            if self.eat('.') {
                self.scan_digits(10, start)?;
            }
            self.scan_exponent(start)?;
        }
        if self.peek() == Some('_') || self.peek() == Some('n') {
            return Err(lex_error("Invalid legacy octal literal", start));
        }
        self.finish_number(start, TokenKind::Number { legacy_octal: true })
    }

    /// Scan digits of `radix` with numeric separators, returning the digit count.
    fn scan_digits(&mut self, radix: u32, start: SourcePosition) -> ParseResult<usize> {
        let mut count = 0;
        let mut after_separator = false;
        loop {
            match self.peek() {
                Some('_') => {
                    if count == 0 || after_separator {
                        return Err(lex_error("Numeric separators are not allowed here", start));
                    }
                    self.bump();
                    after_separator = true;
                }
                Some(c) if c.is_digit(radix) => {
                    self.bump();
                    count += 1;
                    after_separator = false;
                }
                _ => break,
            }
        }
        if after_separator {
            return Err(lex_error(
                "Numeric separators are not allowed at the end of numeric literals",
                start,
            ));
        }
        Ok(count)
    }

    fn scan_exponent(&mut self, start: SourcePosition) -> ParseResult<bool> {
        if !matches!(self.peek(), Some('e') | Some('E')) {
            return Ok(false);
        }
        self.bump();
        if matches!(self.peek(), Some('+') | Some('-')) {
            self.bump();
        }
        if self.scan_digits(10, start)? == 0 {
            return Err(lex_error("Invalid exponent in numeric literal", start));
        }
        Ok(true)
    }

    /// A numeric literal may not run straight into an identifier or digit.
    fn finish_number(&mut self, start: SourcePosition, kind: TokenKind) -> ParseResult<TokenKind> {
        match self.peek() {
            Some(c) if c == '\\' || c.is_ascii_digit() || is_id_start(c) => Err(lex_error(
                "Invalid or unexpected token after numeric literal",
                start,
            )),
            _ => Ok(kind),
        }
    }

    fn scan_identifier_name(&mut self, start: SourcePosition) -> ParseResult<(String, bool)> {
        let mut name = String::new();
        let mut escaped = false;
        loop {
            let first = name.is_empty();
            match self.peek() {
                Some('\\') => {
                    let backslash = self.position();
                    self.bump();
                    if !self.eat('u') {
                        return Err(lex_error("Invalid Unicode escape sequence", backslash));
                    }
                    let code = self.scan_unicode_escape_body(backslash)?;
                    let ch = char::from_u32(code)
                        .filter(|&c| if first { is_id_start(c) } else { is_id_continue(c) })
                        .ok_or_else(|| lex_error("Invalid Unicode escape sequence", backslash))?;
                    name.push(ch);
                    escaped = true;
                }
                Some(c) if (first && is_id_start(c)) || (!first && is_id_continue(c)) => {
                    self.bump();
                    name.push(c);
                }
                _ => break,
            }
        }
        if name.is_empty() {
            return Err(lex_error("Invalid or unexpected token", start));
        }
        Ok((name, escaped))
    }

    /// Skip whitespace and comments, reporting whether a line terminator was crossed.
    fn skip_trivia(&mut self) -> ParseResult<bool> {
        let mut newline = false;
        if self.offset == 0 && self.rest().starts_with("#!") {
            self.skip_line_comment();
        }
        while let Some(ch) = self.peek() {
            match ch {
                c if is_line_terminator(c) => {
                    self.bump();
                    newline = true;
                }
                c if is_whitespace(c) => {
                    self.bump();
                }
                '/' => match self.peek_at(1) {
                    Some('/') => self.skip_line_comment(),
                    Some('*') => newline |= self.skip_block_comment()?,
                    _ => break,
                },
                _ => break,
            }
        }
        Ok(newline)
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if is_line_terminator(c) {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) -> ParseResult<bool> {
        let start = self.position();
        self.bump();
        self.bump();
        let mut newline = false;
        loop {
            match self.peek() {
                None => return Err(lex_error("Unterminated multi-line comment", start)),
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.bump();
                    self.bump();
                    return Ok(newline);
                }
                Some(c) => {
                    newline |= is_line_terminator(c);
                    self.bump();
                }
            }
        }
    }

    fn rest(&self) -> &'a str {
        self.source.get(self.offset..self.end).unwrap_or("")
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume one character, keeping line and column in step.
    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        if self.offset == self.logical_end && self.eof_position.is_none() {
            self.eof_position = Some(self.position());
        }
        self.offset += ch.len_utf8();
        match ch {
            '\n' | '\u{2028}' | '\u{2029}' => {
                self.line += 1;
                self.column = 1;
            }
            // the `\n` of a CRLF pair ends the line, unless it is the sentinel
            '\r' if self.peek() == Some('\n') && self.offset != self.logical_end => {}
            '\r' => {
                self.line += 1;
                self.column = 1;
            }
            _ => self.column += 1,
        }
        Some(ch)
    }
}

/// Line and column of a byte offset, counting terminators the way the scanner does.
pub fn position_at(source: &str, offset: usize) -> SourcePosition {
    let mut scanner = Scanner::new(source);
    while scanner.offset < offset {
        if scanner.bump().is_none() {
            break;
        }
    }
    scanner.position()
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// TAB, VT, FF, ZWNBSP and the Space_Separator category
fn is_whitespace(c: char) -> bool {
    match c {
        '\t' | '\u{000B}' | '\u{000C}' | ' ' | '\u{00A0}' | '\u{FEFF}' => true,
        c if c.is_ascii() => false,
        c => c != '\u{0085}' && !is_line_terminator(c) && c.is_whitespace(),
    }
}

fn is_id_start(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphabetic() || c == '$' || c == '_'
    } else {
        c.is_alphabetic()
    }
}

fn is_id_continue(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphanumeric() || c == '$' || c == '_'
    } else {
        c == '\u{200C}' || c == '\u{200D}' || c.is_alphanumeric() || is_mark_or_connector(c)
    }
}

/// Combining marks and connector punctuation allowed inside identifiers
fn is_mark_or_connector(c: char) -> bool {
    const RANGES: &[(u32, u32)] = &[
        (0x0300, 0x036F),
        (0x0483, 0x0487),
        (0x0591, 0x05C7),
        (0x0610, 0x061A),
        (0x064B, 0x065F),
        (0x0670, 0x0670),
        (0x06D6, 0x06ED),
        (0x0900, 0x0903),
        (0x093A, 0x094F),
        (0x0951, 0x0957),
        (0x0962, 0x0963),
        (0x0E31, 0x0E3A),
        (0x0E47, 0x0E4E),
        (0x1AB0, 0x1AFF),
        (0x1DC0, 0x1DFF),
        (0x203F, 0x2040),
        (0x2054, 0x2054),
        (0x20D0, 0x20FF),
        (0x302A, 0x302F),
        (0x3099, 0x309A),
        (0xFE00, 0xFE0F),
        (0xFE20, 0xFE2F),
        (0xFE33, 0xFE34),
        (0xFE4D, 0xFE4F),
        (0xFF3F, 0xFF3F),
        (0xE0100, 0xE01EF),
    ];
    let code = c as u32;
    RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ErrorKind;

    fn kinds(source: &str, goal: LexGoal) -> Vec<TokenKind> {
        let mut scanner = Scanner::new(source);
        let mut out = Vec::new();
        loop {
            let token = scanner.next_token(goal).unwrap();
            if token.is_eof() {
                break;
            }
            out.push(token.kind);
        }
        out
    }

    fn lex_err(source: &str, goal: LexGoal) -> core_types::JsError {
        let mut scanner = Scanner::new(source);
        loop {
            match scanner.next_token(goal) {
                Ok(token) if token.is_eof() => panic!("expected a lex error in {:?}", source),
                Ok(_) => {}
                Err(e) => return e,
            }
        }
    }

    #[test]
    fn test_scanner_empty_source() {
        let mut scanner = Scanner::new("");
        assert!(scanner.next_token(LexGoal::RegexAllowed).unwrap().is_eof());
    }

    #[test]
    fn test_scanner_identifier() {
        let mut scanner = Scanner::new("foo");
        let token = scanner.next_token(LexGoal::RegexAllowed).unwrap();
        assert!(matches!(token.kind, TokenKind::Identifier(ref s, false) if s == "foo"));
        assert_eq!(token.start, SourcePosition::new(1, 1, 0));
        assert_eq!(token.end, SourcePosition::new(1, 4, 3));
    }

    #[test]
    fn test_scanner_keywords_and_contextual_words() {
        let toks = kinds("if let yield", LexGoal::RegexAllowed);
        assert_eq!(toks[0], TokenKind::Keyword(Keyword::If));
        assert!(matches!(&toks[1], TokenKind::Identifier(s, false) if s == "let"));
        assert!(matches!(&toks[2], TokenKind::Identifier(s, false) if s == "yield"));
    }

    #[test]
    fn test_escaped_keyword_is_an_identifier() {
        let toks = kinds("\\u0069f", LexGoal::RegexAllowed);
        assert!(matches!(&toks[0], TokenKind::Identifier(s, true) if s == "if"));
    }

    #[test]
    fn test_maximal_munch() {
        let toks = kinds(">>>= >>> >> >", LexGoal::DivisionAllowed);
        assert_eq!(
            toks,
            vec![
                TokenKind::Punctuator(Punctuator::GtGtGtEq),
                TokenKind::Punctuator(Punctuator::GtGtGt),
                TokenKind::Punctuator(Punctuator::GtGt),
                TokenKind::Punctuator(Punctuator::Gt),
            ]
        );
    }

    #[test]
    fn test_optional_chain_not_before_digit() {
        let toks = kinds("a?.5:b", LexGoal::DivisionAllowed);
        assert_eq!(toks[1], TokenKind::Punctuator(Punctuator::Question));
        assert_eq!(toks[2], TokenKind::Number { legacy_octal: false });
    }

    #[test]
    fn test_slash_depends_on_goal() {
        let division = kinds("/b/g", LexGoal::DivisionAllowed);
        assert_eq!(division[0], TokenKind::Punctuator(Punctuator::Slash));

        let regex = kinds("/b/g", LexGoal::RegexAllowed);
        assert_eq!(regex, vec![TokenKind::RegExp]);
    }

    #[test]
    fn test_regexp_class_may_contain_slash() {
        assert_eq!(kinds("/[/]+/", LexGoal::RegexAllowed), vec![TokenKind::RegExp]);
    }

    #[test]
    fn test_rescan_slash_as_regexp() {
        let mut scanner = Scanner::new("x /a/i");
        scanner.next_token(LexGoal::RegexAllowed).unwrap();
        let slash = scanner.next_token(LexGoal::DivisionAllowed).unwrap();
        assert!(slash.is_punctuator(Punctuator::Slash));
        let regex = scanner.rescan(&slash, LexGoal::RegexAllowed).unwrap();
        assert_eq!(regex.kind, TokenKind::RegExp);
        assert_eq!(regex.start, slash.start);
        assert!(scanner.next_token(LexGoal::DivisionAllowed).unwrap().is_eof());
    }

    #[test]
    fn test_regexp_flags() {
        let err = lex_err("/a/gg", LexGoal::RegexAllowed);
        assert_eq!(err.kind, ErrorKind::LexError);
        let err = lex_err("/a/uv", LexGoal::RegexAllowed);
        assert_eq!(err.kind, ErrorKind::LexError);
        assert_eq!(kinds("/a/dgimsy", LexGoal::RegexAllowed), vec![TokenKind::RegExp]);
    }

    #[test]
    fn test_unterminated_regexp_reports_opening_slash() {
        let err = lex_err("x = /abc\n", LexGoal::RegexAllowed);
        assert_eq!(err.source_position, Some(SourcePosition::new(1, 5, 4)));
    }

    #[test]
    fn test_numbers() {
        for source in ["0", "123.45", ".5", "1e10", "1E-3", "1_000_000", "0x1F", "0o17", "0b1010", "1.", "5e+2"] {
            assert_eq!(
                kinds(source, LexGoal::RegexAllowed),
                vec![TokenKind::Number { legacy_octal: false }],
                "{}",
                source
            );
        }
    }

    #[test]
    fn test_bigint() {
        for source in ["123n", "0x1Fn", "0b11n", "0o7n"] {
            assert_eq!(kinds(source, LexGoal::RegexAllowed), vec![TokenKind::BigInt], "{}", source);
        }
        assert_eq!(lex_err("1.5n", LexGoal::RegexAllowed).kind, ErrorKind::LexError);
        assert_eq!(lex_err("017n", LexGoal::RegexAllowed).kind, ErrorKind::LexError);
    }

    #[test]
    fn test_legacy_octal_is_flagged() {
        assert_eq!(
            kinds("017 089", LexGoal::RegexAllowed),
            vec![
                TokenKind::Number { legacy_octal: true },
                TokenKind::Number { legacy_octal: true }
            ]
        );
    }

    #[test]
    fn test_bad_numbers() {
        for source in ["0x", "0b2", "1__0", "1_", "3in", "0_1", "1e", "1.toString"] {
            assert_eq!(lex_err(source, LexGoal::RegexAllowed).kind, ErrorKind::LexError, "{}", source);
        }
    }

    #[test]
    fn test_member_access_on_number_with_two_dots() {
        let toks = kinds("1..toString", LexGoal::RegexAllowed);
        assert_eq!(toks[0], TokenKind::Number { legacy_octal: false });
        assert_eq!(toks[1], TokenKind::Punctuator(Punctuator::Dot));
    }

    #[test]
    fn test_strings_and_escapes() {
        let toks = kinds(r#"'a\'b' "\x41A\u{1F600}\n" '\0'"#, LexGoal::RegexAllowed);
        assert_eq!(toks.len(), 3);
        assert!(toks
            .iter()
            .all(|k| *k == TokenKind::String { legacy_octal_escape: false }));
        assert_eq!(
            kinds(r"'\07'", LexGoal::RegexAllowed),
            vec![TokenKind::String { legacy_octal_escape: true }]
        );
    }

    #[test]
    fn test_invalid_escapes() {
        for source in [r"'\x4'", r"'\u00'", r"'\u{110000}'", r"'\u{}'"] {
            assert_eq!(lex_err(source, LexGoal::RegexAllowed).kind, ErrorKind::LexError, "{}", source);
        }
    }

    #[test]
    fn test_string_line_continuation() {
        let mut scanner = Scanner::new("'a\\\r\nb' x");
        scanner.next_token(LexGoal::RegexAllowed).unwrap();
        let x = scanner.next_token(LexGoal::DivisionAllowed).unwrap();
        assert_eq!((x.start.line, x.start.column), (2, 4));
    }

    #[test]
    fn test_unterminated_string_reports_opening_quote() {
        let err = lex_err("var s = 'abc\n", LexGoal::RegexAllowed);
        assert_eq!(err.source_position, Some(SourcePosition::new(1, 9, 8)));
    }

    #[test]
    fn test_template_spans() {
        let mut scanner = Scanner::new("`a${x}b${y}c`");
        let head = scanner.next_token(LexGoal::RegexAllowed).unwrap();
        assert!(matches!(head.kind, TokenKind::Template { part: TemplatePart::Head, .. }));
        scanner.next_token(LexGoal::RegexAllowed).unwrap();
        let brace = scanner.next_token(LexGoal::DivisionAllowed).unwrap();
        assert!(brace.is_punctuator(Punctuator::RBrace));
        let middle = scanner.rescan(&brace, LexGoal::TemplateContinuation).unwrap();
        assert!(matches!(middle.kind, TokenKind::Template { part: TemplatePart::Middle, .. }));
        scanner.next_token(LexGoal::RegexAllowed).unwrap();
        let brace = scanner.next_token(LexGoal::DivisionAllowed).unwrap();
        let tail = scanner.rescan(&brace, LexGoal::TemplateContinuation).unwrap();
        assert!(matches!(tail.kind, TokenKind::Template { part: TemplatePart::Tail, .. }));
        assert!(scanner.next_token(LexGoal::DivisionAllowed).unwrap().is_eof());
    }

    #[test]
    fn test_template_invalid_escape_is_recorded_not_raised() {
        let toks = kinds(r"`\unicode`", LexGoal::RegexAllowed);
        assert!(matches!(
            toks[0],
            TokenKind::Template { part: TemplatePart::NoSubstitution, invalid_escape: Some(_) }
        ));
    }

    #[test]
    fn test_template_spans_lines() {
        let mut scanner = Scanner::new("`a\nb` x");
        scanner.next_token(LexGoal::RegexAllowed).unwrap();
        let x = scanner.next_token(LexGoal::DivisionAllowed).unwrap();
        assert_eq!(x.start.line, 2);
        assert!(!x.newline_before);
    }

    #[test]
    fn test_newline_flag_and_line_terminators() {
        let mut scanner = Scanner::new("a\r\nb\u{2028}c /* x\n */ d // e\nf");
        let a = scanner.next_token(LexGoal::RegexAllowed).unwrap();
        assert!(!a.newline_before);
        let b = scanner.next_token(LexGoal::DivisionAllowed).unwrap();
        assert!(b.newline_before);
        assert_eq!(b.start.line, 2);
        let c = scanner.next_token(LexGoal::DivisionAllowed).unwrap();
        assert_eq!((c.start.line, c.start.column), (3, 1));
        let d = scanner.next_token(LexGoal::DivisionAllowed).unwrap();
        assert!(d.newline_before);
        let f = scanner.next_token(LexGoal::DivisionAllowed).unwrap();
        assert!(f.newline_before);
        assert_eq!(f.start.line, 5);
    }

    #[test]
    fn test_unterminated_comment_reports_comment_start() {
        let err = lex_err("a /* never closed", LexGoal::RegexAllowed);
        assert_eq!(err.source_position, Some(SourcePosition::new(1, 3, 2)));
    }

    #[test]
    fn test_hashbang_is_skipped() {
        let toks = kinds("#!/usr/bin/env node\nfoo", LexGoal::RegexAllowed);
        assert_eq!(toks.len(), 1);
    }

    #[test]
    fn test_private_identifier() {
        let toks = kinds("#x #if", LexGoal::RegexAllowed);
        assert!(matches!(&toks[0], TokenKind::PrivateIdentifier(s) if s == "x"));
        assert!(matches!(&toks[1], TokenKind::PrivateIdentifier(s) if s == "if"));
    }

    #[test]
    fn test_unrecognized_character() {
        let err = lex_err("a @ b", LexGoal::RegexAllowed);
        assert_eq!(err.kind, ErrorKind::LexError);
        assert_eq!(err.source_position, Some(SourcePosition::new(1, 3, 2)));
    }

    #[test]
    fn test_unicode_identifiers_and_whitespace() {
        let toks = kinds("café\u{00A0}π\u{3000}x\u{0301}", LexGoal::RegexAllowed);
        assert_eq!(toks.len(), 3);
    }

    #[test]
    fn test_sentinel_places_eof_at_end_of_input() {
        let mut scanner = Scanner::new("ab \n\0");
        scanner.next_token(LexGoal::RegexAllowed).unwrap();
        let eof = scanner.next_token(LexGoal::DivisionAllowed).unwrap();
        assert!(eof.is_eof());
        assert!(eof.newline_before);
        assert_eq!(eof.start, SourcePosition::new(1, 4, 3));
    }

    #[test]
    fn test_lone_carriage_return_before_sentinel() {
        let mut scanner = Scanner::new("ab\r\n\0");
        scanner.next_token(LexGoal::RegexAllowed).unwrap();
        let eof = scanner.next_token(LexGoal::DivisionAllowed).unwrap();
        assert!(eof.is_eof());
        assert_eq!(eof.start, SourcePosition::new(2, 1, 3));

        let mut scanner = Scanner::new("ab\r\n\n\0");
        scanner.next_token(LexGoal::RegexAllowed).unwrap();
        let eof = scanner.next_token(LexGoal::DivisionAllowed).unwrap();
        assert_eq!(eof.start, SourcePosition::new(2, 1, 4));
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut scanner = Scanner::new("a b");
        scanner.next_token(LexGoal::RegexAllowed).unwrap();
        let saved = scanner.checkpoint();
        let b = scanner.next_token(LexGoal::DivisionAllowed).unwrap();
        scanner.restore(saved);
        assert_eq!(scanner.next_token(LexGoal::DivisionAllowed).unwrap(), b);
    }

    #[test]
    fn test_position_at_counts_crlf_once() {
        assert_eq!(position_at("a\r\nbc", 4), SourcePosition::new(2, 2, 4));
    }

    #[test]
    fn test_goal_after() {
        let mut scanner = Scanner::new(") ( x return");
        let rparen = scanner.next_token(LexGoal::RegexAllowed).unwrap();
        assert_eq!(rparen.goal_after(), LexGoal::DivisionAllowed);
        let lparen = scanner.next_token(LexGoal::RegexAllowed).unwrap();
        assert_eq!(lparen.goal_after(), LexGoal::RegexAllowed);
        let x = scanner.next_token(LexGoal::RegexAllowed).unwrap();
        assert_eq!(x.goal_after(), LexGoal::DivisionAllowed);
        let ret = scanner.next_token(LexGoal::RegexAllowed).unwrap();
        assert_eq!(ret.goal_after(), LexGoal::RegexAllowed);
    }
}
