//! Grammar engine: recursive descent for statements, precedence climbing for
//! binary operators, automatic semicolon insertion.
//!
//! No tree is built. Each expression production returns an [`ExprInfo`]
//! summary that carries just enough to decide, after the fact, whether the
//! expression can serve as an assignment target, an arrow parameter list or
//! a destructuring pattern.

use crate::error::{lex_error, syntax_error, too_deep, unexpected_eof, unexpected_token, ParseResult};
use crate::lexer::{Keyword, LexGoal, Punctuator, Scanner, TemplatePart, Token, TokenKind};
use crate::options::{ParseOptions, SourceType};
use crate::stack::ensure_sufficient_stack;
use core_types::{JsError, SourcePosition};
use tracing::trace;

/// Outcome of the grammar engine: accept, or reject with the first error.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The buffer is a syntactically valid program
    Accept,
    /// The first error that stopped the parse
    Reject(JsError),
}

impl Verdict {
    /// Whether the program was accepted
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Grammar parameters that change inside functions, classes and loops.
#[derive(Debug, Clone, Copy, Default)]
struct Context {
    strict: bool,
    in_function: bool,
    /// `yield` is an operator here
    yield_expr: bool,
    /// `yield` may not be an identifier here
    yield_reserved: bool,
    /// `await` is an operator here
    await_expr: bool,
    /// `await` may not be an identifier here
    await_reserved: bool,
    in_iteration: bool,
    in_breakable: bool,
    super_property: bool,
    super_call: bool,
    new_target: bool,
    /// Field initializer or static block: `arguments` is forbidden
    class_field: bool,
}

#[derive(Debug)]
struct Label {
    name: String,
    iteration: bool,
}

/// Shape of a parsed expression, as far as target checks care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExprKind {
    /// Identifier reference; `assignable` is false for strict `eval`/`arguments`
    Identifier { assignable: bool },
    /// `a.b`, `a[b]`, `super.x`
    Member,
    /// `(a)`
    ParenIdentifier { assignable: bool },
    /// `(a.b)`
    ParenMember,
    /// Object or array literal that also reads as an assignment pattern
    Pattern { binding: bool },
    /// `target = value`
    Assignment { binding: bool },
    Arrow,
    /// Operand of a prefix operator, not allowed left of `**`
    Unary,
    /// `a || b`, `a && b`
    Logical,
    /// `a ?? b`
    Coalesce,
    Other,
}

/// Summary of one parsed expression.
#[derive(Debug, Clone, Copy)]
struct ExprInfo {
    kind: ExprKind,
    start: SourcePosition,
    /// `{ a = 1 }` shorthand seen inside; only legal once the expression
    /// is reinterpreted as a pattern
    cover_init: Option<SourcePosition>,
}

impl ExprInfo {
    fn new(kind: ExprKind, start: SourcePosition) -> Self {
        Self {
            kind,
            start,
            cover_init: None,
        }
    }

    fn other(start: SourcePosition) -> Self {
        Self::new(ExprKind::Other, start)
    }
}

fn is_simple_target(kind: ExprKind) -> bool {
    matches!(
        kind,
        ExprKind::Identifier { assignable: true }
            | ExprKind::ParenIdentifier { assignable: true }
            | ExprKind::Member
            | ExprKind::ParenMember
    )
}

fn is_assign_target(kind: ExprKind) -> bool {
    is_simple_target(kind) || matches!(kind, ExprKind::Pattern { .. })
}

fn is_assignment_element(kind: ExprKind) -> bool {
    is_assign_target(kind) || matches!(kind, ExprKind::Assignment { .. })
}

fn is_binding_target(kind: ExprKind) -> bool {
    matches!(
        kind,
        ExprKind::Identifier { assignable: true } | ExprKind::Pattern { binding: true }
    )
}

fn is_binding_element(kind: ExprKind) -> bool {
    is_binding_target(kind) || kind == (ExprKind::Assignment { binding: true })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindingKind {
    Var,
    Let,
    Const,
}

/// What a declaration list looked like, for `for (... in/of ...)` checks.
#[derive(Debug, Default)]
struct BindingSummary {
    count: usize,
    has_init: bool,
    first_is_pattern: bool,
    missing_init: Option<(SourcePosition, &'static str)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accessor {
    Get,
    Set,
}

/// A parsed property name.
struct PropertyKey {
    /// Plain identifier spelling, usable as a shorthand property
    identifier: Option<(String, bool, SourcePosition)>,
    /// Static name for `constructor`/`prototype` checks
    name: Option<String>,
    private: bool,
}

/// Items of a parenthesized list that may turn out to be arrow parameters.
struct ParenList {
    items: usize,
    last: Option<ExprInfo>,
    all_binding: bool,
    all_identifiers: bool,
    cover_init: Option<SourcePosition>,
    /// `()`, `(a,)` and `(...a)` only make sense before `=>`
    arrow_only: Option<JsError>,
}

const STRICT_RESERVED: &[&str] = &[
    "implements",
    "interface",
    "let",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "yield",
];

/// Recursive descent parser producing only a verdict.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    source: &'a str,
    token: Token,
    prev_end: SourcePosition,
    options: ParseOptions,
    depth: usize,
    ctx: Context,
    labels: Vec<Label>,
    /// Start of the label chain directly enclosing the next statement
    pending_label_start: Option<usize>,
    class_depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser over `source`
    pub fn new(source: &'a str, options: ParseOptions) -> Self {
        let start = SourcePosition::start();
        Self {
            scanner: Scanner::new(source),
            source,
            token: Token {
                kind: TokenKind::EOF,
                start,
                end: start,
                newline_before: false,
            },
            prev_end: start,
            options,
            depth: 0,
            ctx: Context::default(),
            labels: Vec::new(),
            pending_label_start: None,
            class_depth: 0,
        }
    }

    /// Run the parse to completion and report the verdict
    pub fn parse(mut self) -> Verdict {
        match self.parse_program() {
            Ok(()) => Verdict::Accept,
            Err(err) => Verdict::Reject(err),
        }
    }

    /// Parse a whole script or module, stopping at the first error
    #[tracing::instrument(level = "debug", skip_all, fields(source_type = ?self.options.source_type))]
    pub fn parse_program(&mut self) -> ParseResult<()> {
        if self.options.source_type == SourceType::Module {
            self.ctx.strict = true;
            self.ctx.await_expr = true;
            self.ctx.await_reserved = true;
        }
        self.token = self.scanner.next_token(LexGoal::RegexAllowed)?;
        self.parse_statement_list(true, true)?;
        if !self.token.is_eof() {
            return Err(self.unexpected());
        }
        Ok(())
    }

    fn is_module(&self) -> bool {
        self.options.source_type == SourceType::Module
    }

    // ---------------------------------------------------------------------
    // Token plumbing
    // ---------------------------------------------------------------------

    /// Consume the current token; the next one is scanned with the goal the
    /// consumed token implies.
    fn advance(&mut self) -> ParseResult<()> {
        let goal = self.token.goal_after();
        self.advance_with(goal)
    }

    fn advance_with(&mut self, goal: LexGoal) -> ParseResult<()> {
        self.prev_end = self.token.end;
        self.token = self.scanner.next_token(goal)?;
        Ok(())
    }

    fn at(&self, punctuator: Punctuator) -> bool {
        self.token.is_punctuator(punctuator)
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        self.token.is_keyword(keyword)
    }

    fn eat(&mut self, punctuator: Punctuator) -> ParseResult<bool> {
        if self.at(punctuator) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, punctuator: Punctuator) -> ParseResult<()> {
        let goal = self.token.goal_after();
        self.expect_with(punctuator, goal)
    }

    fn expect_with(&mut self, punctuator: Punctuator, goal: LexGoal) -> ParseResult<()> {
        if self.at(punctuator) {
            self.advance_with(goal)
        } else {
            Err(self.unexpected())
        }
    }

    /// Look at the token after the current one without consuming anything.
    fn peek(&mut self) -> ParseResult<Token> {
        let checkpoint = self.scanner.checkpoint();
        let next = self.scanner.next_token(self.token.goal_after());
        self.scanner.restore(checkpoint);
        next
    }

    fn unexpected(&self) -> JsError {
        if self.token.is_eof() {
            unexpected_eof(self.token.start)
        } else {
            syntax_error(
                format!("Unexpected token {}", self.token.describe(self.source)),
                self.token.start,
            )
        }
    }

    fn expected_identifier(&self) -> JsError {
        if self.token.is_eof() {
            unexpected_eof(self.token.start)
        } else {
            unexpected_token(
                "identifier",
                &self.token.describe(self.source),
                self.token.start,
            )
        }
    }

    /// Automatic semicolon insertion.
    ///
    /// An explicit `;` is consumed. Otherwise a semicolon is inserted before
    /// a token preceded by a line terminator, before `}`, and at the end of
    /// input, in that order.
    fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.at(Punctuator::Semicolon) {
            return self.advance_with(LexGoal::RegexAllowed);
        }
        if self.token.newline_before {
            trace!(line = self.token.start.line, column = self.token.start.column, "semicolon inserted at line break");
            return Ok(());
        }
        if self.at(Punctuator::RBrace) || self.token.is_eof() {
            trace!(
                line = self.token.start.line,
                column = self.token.start.column,
                "semicolon inserted before closing brace or end of input"
            );
            return Ok(());
        }
        Err(self.unexpected())
    }

    /// `do ... while (x)` may be followed by anything on the same line.
    fn consume_semicolon_after_do_while(&mut self) -> ParseResult<()> {
        if self.at(Punctuator::Semicolon) {
            self.advance_with(LexGoal::RegexAllowed)
        } else {
            trace!(line = self.token.start.line, column = self.token.start.column, "semicolon inserted after do-while");
            Ok(())
        }
    }

    /// Enter one nesting level, failing once the configured limit is reached.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= self.options.max_depth {
            return Err(too_deep(self.token.start, self.options.max_depth));
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    /// Run `f` in a fresh function context. Labels do not cross function
    /// boundaries.
    fn with_function_context<T>(
        &mut self,
        ctx: Context,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved_ctx = std::mem::replace(&mut self.ctx, ctx);
        let saved_labels = std::mem::take(&mut self.labels);
        let saved_pending = self.pending_label_start.take();
        let result = f(self);
        self.ctx = saved_ctx;
        self.labels = saved_labels;
        self.pending_label_start = saved_pending;
        result
    }

    fn no_cover(&self, info: &ExprInfo) -> ParseResult<()> {
        match info.cover_init {
            Some(position) => Err(syntax_error("Invalid shorthand property initializer", position)),
            None => Ok(()),
        }
    }

    /// Check an expression used as the operand of an operator.
    fn operand(&self, info: ExprInfo) -> ParseResult<ExprInfo> {
        self.no_cover(&info)?;
        if info.kind == ExprKind::Arrow {
            return Err(syntax_error("Malformed arrow function parameter list", info.start));
        }
        Ok(info)
    }

    // ---------------------------------------------------------------------
    // Identifiers
    // ---------------------------------------------------------------------

    /// Early errors shared by identifier references, labels and bindings.
    fn check_identifier(
        &self,
        name: &str,
        escaped: bool,
        position: SourcePosition,
        binding: bool,
    ) -> ParseResult<()> {
        if escaped && Keyword::from_name(name).is_some() {
            return Err(syntax_error("Keyword must not contain escaped characters", position));
        }
        match name {
            "yield" if self.ctx.yield_expr || self.ctx.yield_reserved => {
                return Err(syntax_error("Unexpected identifier 'yield'", position));
            }
            "await" if self.ctx.await_expr || self.ctx.await_reserved => {
                return Err(syntax_error("Unexpected reserved word 'await'", position));
            }
            "arguments" if self.ctx.class_field => {
                return Err(syntax_error(
                    "'arguments' is not allowed in class field initializer or static initialization block",
                    position,
                ));
            }
            _ => {}
        }
        if self.ctx.strict {
            if STRICT_RESERVED.contains(&name) {
                return Err(syntax_error("Unexpected strict mode reserved word", position));
            }
            if binding && (name == "eval" || name == "arguments") {
                return Err(syntax_error("Unexpected eval or arguments in strict mode", position));
            }
        }
        Ok(())
    }

    fn check_binding(
        &self,
        name: &str,
        escaped: bool,
        position: SourcePosition,
        lexical: bool,
    ) -> ParseResult<()> {
        self.check_identifier(name, escaped, position, true)?;
        if lexical && name == "let" {
            return Err(syntax_error(
                "let is disallowed as a lexically bound name",
                position,
            ));
        }
        Ok(())
    }

    fn restricted_in_strict(&self, name: &str) -> bool {
        self.ctx.strict && (name == "eval" || name == "arguments")
    }
}

// -------------------------------------------------------------------------
// Statements
// -------------------------------------------------------------------------

impl<'a> Parser<'a> {
    /// Parse statement list items until `}` or the end of input. Returns
    /// the position of a `"use strict"` directive in the prologue.
    fn parse_statement_list(
        &mut self,
        directives: bool,
        top_level: bool,
    ) -> ParseResult<Option<SourcePosition>> {
        let use_strict = if directives {
            self.parse_directive_prologue()?
        } else {
            None
        };
        while !self.token.is_eof() && !self.at(Punctuator::RBrace) {
            self.parse_statement_list_item(top_level)?;
        }
        Ok(use_strict)
    }

    fn parse_directive_prologue(&mut self) -> ParseResult<Option<SourcePosition>> {
        let mut use_strict = None;
        let mut octal_escape = None;
        while let TokenKind::String { legacy_octal_escape } = self.token.kind {
            let string = self.token.clone();
            self.parse_expression(true)?;
            let whole_statement = self.prev_end.offset == string.end.offset;
            self.consume_semicolon()?;
            if !whole_statement {
                break;
            }
            if legacy_octal_escape && octal_escape.is_none() {
                octal_escape = Some(string.start);
            }
            let raw = string.lexeme(self.source);
            if raw == "\"use strict\"" || raw == "'use strict'" {
                if let Some(position) = octal_escape {
                    return Err(syntax_error(
                        "Octal escape sequences are not allowed in strict mode.",
                        position,
                    ));
                }
                use_strict = use_strict.or(Some(string.start));
                self.ctx.strict = true;
            }
        }
        Ok(use_strict)
    }

    fn parse_statement_list_item(&mut self, top_level: bool) -> ParseResult<()> {
        self.nested(|p| p.parse_statement_list_item_inner(top_level))
    }

    fn parse_statement_list_item_inner(&mut self, top_level: bool) -> ParseResult<()> {
        let start = self.token.start;
        if self.at_keyword(Keyword::Function) {
            self.parse_function_declaration(false)
        } else if self.at_keyword(Keyword::Class) {
            self.parse_class(true, true).map(drop)
        } else if self.at_keyword(Keyword::Const) {
            self.parse_lexical_declaration(BindingKind::Const)
        } else if self.token.is_contextual("let") && self.is_let_declaration()? {
            self.parse_lexical_declaration(BindingKind::Let)
        } else if self.token.is_contextual("async") && self.is_async_function()? {
            self.advance()?;
            self.parse_function_declaration(true)
        } else if self.at_keyword(Keyword::Import) {
            let next = self.peek()?;
            if next.is_punctuator(Punctuator::LParen) || next.is_punctuator(Punctuator::Dot) {
                return self.parse_statement();
            }
            if !self.is_module() || !top_level {
                return Err(syntax_error(
                    "Cannot use import statement outside a module",
                    start,
                ));
            }
            self.parse_import_declaration()
        } else if self.at_keyword(Keyword::Export) {
            if !self.is_module() || !top_level {
                return Err(self.unexpected());
            }
            self.parse_export_declaration()
        } else {
            self.parse_statement()
        }
    }

    /// `let` starts a declaration when a binding follows it. In sloppy code
    /// it is otherwise an ordinary identifier.
    fn is_let_declaration(&mut self) -> ParseResult<bool> {
        let next = self.peek()?;
        Ok(match next.kind {
            TokenKind::Identifier(..) => true,
            TokenKind::Punctuator(Punctuator::LBracket) | TokenKind::Punctuator(Punctuator::LBrace) => true,
            _ => self.ctx.strict,
        })
    }

    fn is_async_function(&mut self) -> ParseResult<bool> {
        let next = self.peek()?;
        Ok(next.is_keyword(Keyword::Function) && !next.newline_before)
    }

    fn parse_statement(&mut self) -> ParseResult<()> {
        self.nested(Self::parse_statement_inner)
    }

    fn parse_statement_inner(&mut self) -> ParseResult<()> {
        let pending_labels = self.pending_label_start.take();
        let start = self.token.start;
        if let TokenKind::Keyword(keyword) = self.token.kind {
            match keyword {
                Keyword::Var => {
                    self.advance()?;
                    self.parse_binding_list(BindingKind::Var, false)?;
                    return self.consume_semicolon();
                }
                Keyword::If => return self.parse_if(),
                Keyword::For => {
                    self.mark_iteration_labels(pending_labels);
                    return self.parse_for();
                }
                Keyword::While => {
                    self.mark_iteration_labels(pending_labels);
                    return self.parse_while();
                }
                Keyword::Do => {
                    self.mark_iteration_labels(pending_labels);
                    return self.parse_do_while();
                }
                Keyword::Continue => return self.parse_continue(),
                Keyword::Break => return self.parse_break(),
                Keyword::Return => return self.parse_return(),
                Keyword::With => return self.parse_with(),
                Keyword::Switch => return self.parse_switch(),
                Keyword::Throw => return self.parse_throw(),
                Keyword::Try => return self.parse_try(),
                Keyword::Debugger => {
                    self.advance()?;
                    return self.consume_semicolon();
                }
                Keyword::Function => {
                    let message = if self.ctx.strict {
                        "In strict mode code, functions can only be declared at top level or inside a block."
                    } else {
                        "In non-strict mode code, functions can only be declared at top level, inside a block, or as the body of an if statement."
                    };
                    return Err(syntax_error(message, start));
                }
                Keyword::Class | Keyword::Const => {
                    return Err(syntax_error(
                        "Lexical declaration cannot appear in a single-statement context",
                        start,
                    ));
                }
                _ => {}
            }
        }
        if self.at(Punctuator::LBrace) {
            return self.parse_block();
        }
        if self.at(Punctuator::Semicolon) {
            return self.advance_with(LexGoal::RegexAllowed);
        }
        if let TokenKind::Identifier(..) = self.token.kind {
            let next = self.peek()?;
            if next.is_punctuator(Punctuator::Colon) {
                return self.parse_labelled_statement(pending_labels);
            }
            if self.token.is_contextual("let") && next.is_punctuator(Punctuator::LBracket) {
                return Err(syntax_error(
                    "Lexical declaration cannot appear in a single-statement context",
                    start,
                ));
            }
            if self.token.is_contextual("async")
                && next.is_keyword(Keyword::Function)
                && !next.newline_before
            {
                return Err(syntax_error(
                    "Async functions can only be declared at the top level or inside a block.",
                    start,
                ));
            }
        }
        self.parse_expression(true)?;
        self.consume_semicolon()
    }

    fn mark_iteration_labels(&mut self, pending: Option<usize>) {
        if let Some(first) = pending {
            for label in &mut self.labels[first..] {
                label.iteration = true;
            }
        }
    }

    fn parse_block(&mut self) -> ParseResult<()> {
        self.expect(Punctuator::LBrace)?;
        self.parse_statement_list(false, false)?;
        self.expect_with(Punctuator::RBrace, LexGoal::RegexAllowed)
    }

    fn parse_lexical_declaration(&mut self, kind: BindingKind) -> ParseResult<()> {
        self.advance()?;
        self.parse_binding_list(kind, false)?;
        self.consume_semicolon()
    }

    fn parse_binding_list(
        &mut self,
        kind: BindingKind,
        in_for_head: bool,
    ) -> ParseResult<BindingSummary> {
        let lexical = kind != BindingKind::Var;
        let mut summary = BindingSummary::default();
        loop {
            let is_pattern = !matches!(self.token.kind, TokenKind::Identifier(..));
            self.parse_binding_target(lexical)?;
            summary.count += 1;
            if summary.count == 1 {
                summary.first_is_pattern = is_pattern;
            }
            if self.at(Punctuator::Assign) {
                self.advance()?;
                self.parse_assignment(!in_for_head)?;
                summary.has_init = true;
            } else if summary.missing_init.is_none() && (kind == BindingKind::Const || is_pattern) {
                let message = if is_pattern {
                    "Missing initializer in destructuring declaration"
                } else {
                    "Missing initializer in const declaration"
                };
                if !in_for_head {
                    return Err(syntax_error(message, self.token.start));
                }
                summary.missing_init = Some((self.token.start, message));
            }
            if !self.eat(Punctuator::Comma)? {
                break;
            }
        }
        Ok(summary)
    }

    fn parse_condition(&mut self) -> ParseResult<()> {
        self.expect(Punctuator::LParen)?;
        self.parse_expression(true)?;
        self.expect_with(Punctuator::RParen, LexGoal::RegexAllowed)
    }

    fn parse_if(&mut self) -> ParseResult<()> {
        self.advance()?;
        self.parse_condition()?;
        self.parse_if_body()?;
        if self.at_keyword(Keyword::Else) {
            self.advance()?;
            self.parse_if_body()?;
        }
        Ok(())
    }

    /// Sloppy code may use a plain function declaration as the body of `if`.
    fn parse_if_body(&mut self) -> ParseResult<()> {
        if self.at_keyword(Keyword::Function) && !self.ctx.strict {
            let next = self.peek()?;
            if !next.is_punctuator(Punctuator::Star) {
                return self.nested(|p| p.parse_function_declaration(false));
            }
        }
        self.parse_statement()
    }

    fn parse_loop_body(&mut self) -> ParseResult<()> {
        let (in_iteration, in_breakable) = (self.ctx.in_iteration, self.ctx.in_breakable);
        self.ctx.in_iteration = true;
        self.ctx.in_breakable = true;
        let result = self.parse_statement();
        self.ctx.in_iteration = in_iteration;
        self.ctx.in_breakable = in_breakable;
        result
    }

    fn parse_while(&mut self) -> ParseResult<()> {
        self.advance()?;
        self.parse_condition()?;
        self.parse_loop_body()
    }

    fn parse_do_while(&mut self) -> ParseResult<()> {
        self.advance()?;
        self.parse_loop_body()?;
        if !self.at_keyword(Keyword::While) {
            return Err(self.unexpected());
        }
        self.advance()?;
        self.parse_condition()?;
        self.consume_semicolon_after_do_while()
    }

    fn parse_for(&mut self) -> ParseResult<()> {
        self.advance()?;
        let mut is_await = false;
        if self.token.is_contextual("await") {
            if !self.ctx.await_expr {
                return Err(self.unexpected());
            }
            is_await = true;
            self.advance()?;
        }
        self.expect(Punctuator::LParen)?;
        let head_start = self.token.start;

        if self.at(Punctuator::Semicolon) {
            if is_await {
                return Err(self.unexpected());
            }
            self.advance()?;
            return self.parse_for_rest();
        }

        let declaration = if self.at_keyword(Keyword::Var) {
            Some(BindingKind::Var)
        } else if self.at_keyword(Keyword::Const) {
            Some(BindingKind::Const)
        } else if self.token.is_contextual("let") && self.is_let_declaration()? {
            Some(BindingKind::Let)
        } else {
            None
        };

        if let Some(kind) = declaration {
            self.advance()?;
            let summary = self.parse_binding_list(kind, true)?;
            let is_of = self.token.is_contextual("of");
            if is_of || self.at_keyword(Keyword::In) {
                let loop_name = if is_of { "for-of" } else { "for-in" };
                if summary.count != 1 {
                    return Err(syntax_error(
                        format!(
                            "Invalid left-hand side in {} loop: Must have a single binding.",
                            loop_name
                        ),
                        head_start,
                    ));
                }
                let legacy_initializer = kind == BindingKind::Var
                    && !is_of
                    && !self.ctx.strict
                    && !summary.first_is_pattern;
                if summary.has_init && !legacy_initializer {
                    return Err(syntax_error(
                        format!("{} loop variable declaration may not have an initializer.", loop_name),
                        head_start,
                    ));
                }
                return self.parse_for_in_of_rest(is_of, is_await);
            }
            if let Some((position, message)) = summary.missing_init {
                return Err(syntax_error(message, position));
            }
        } else {
            let starts_with_let = self.token.is_contextual("let");
            let starts_with_async = self.token.is_contextual("async");
            let head = self.parse_expression_cover(false)?;
            let is_of = self.token.is_contextual("of");
            if is_of || self.at_keyword(Keyword::In) {
                if is_of && starts_with_let {
                    return Err(syntax_error(
                        "The left-hand side of a for-of loop may not be 'let'.",
                        head_start,
                    ));
                }
                if is_of
                    && starts_with_async
                    && !is_await
                    && matches!(head.kind, ExprKind::Identifier { .. })
                {
                    return Err(syntax_error(
                        "The left-hand side of a for-of loop may not be 'async'.",
                        head_start,
                    ));
                }
                if !is_assign_target(head.kind) {
                    return Err(syntax_error("Invalid left-hand side in for-loop", head.start));
                }
                return self.parse_for_in_of_rest(is_of, is_await);
            }
            self.no_cover(&head)?;
        }

        if is_await {
            return Err(self.unexpected());
        }
        self.expect(Punctuator::Semicolon)?;
        self.parse_for_rest()
    }

    fn parse_for_in_of_rest(&mut self, is_of: bool, is_await: bool) -> ParseResult<()> {
        if is_await && !is_of {
            return Err(self.unexpected());
        }
        self.advance()?;
        if is_of {
            self.parse_assignment(true)?;
        } else {
            self.parse_expression(true)?;
        }
        self.expect_with(Punctuator::RParen, LexGoal::RegexAllowed)?;
        self.parse_loop_body()
    }

    /// The test and update clauses of a C-style `for`, after the first `;`.
    fn parse_for_rest(&mut self) -> ParseResult<()> {
        if !self.at(Punctuator::Semicolon) {
            self.parse_expression(true)?;
        }
        self.expect(Punctuator::Semicolon)?;
        if !self.at(Punctuator::RParen) {
            self.parse_expression(true)?;
        }
        self.expect_with(Punctuator::RParen, LexGoal::RegexAllowed)?;
        self.parse_loop_body()
    }

    fn parse_continue(&mut self) -> ParseResult<()> {
        let start = self.token.start;
        self.advance()?;
        if let TokenKind::Identifier(name, _) = &self.token.kind {
            if !self.token.newline_before {
                let target = self.labels.iter().find(|label| &label.name == name);
                match target {
                    Some(label) if label.iteration => {}
                    Some(_) => {
                        return Err(syntax_error(
                            format!(
                                "Illegal continue statement: '{}' does not denote an iteration statement",
                                name
                            ),
                            self.token.start,
                        ));
                    }
                    None => {
                        return Err(syntax_error(
                            format!("Undefined label '{}'", name),
                            self.token.start,
                        ));
                    }
                }
                self.advance()?;
                return self.consume_semicolon();
            }
        }
        if !self.ctx.in_iteration {
            return Err(syntax_error(
                "Illegal continue statement: no surrounding iteration statement",
                start,
            ));
        }
        self.consume_semicolon()
    }

    fn parse_break(&mut self) -> ParseResult<()> {
        let start = self.token.start;
        self.advance()?;
        if let TokenKind::Identifier(name, _) = &self.token.kind {
            if !self.token.newline_before {
                if !self.labels.iter().any(|label| &label.name == name) {
                    return Err(syntax_error(
                        format!("Undefined label '{}'", name),
                        self.token.start,
                    ));
                }
                self.advance()?;
                return self.consume_semicolon();
            }
        }
        if !self.ctx.in_breakable {
            return Err(syntax_error("Illegal break statement", start));
        }
        self.consume_semicolon()
    }

    fn parse_return(&mut self) -> ParseResult<()> {
        if !self.ctx.in_function {
            return Err(syntax_error("Illegal return statement", self.token.start));
        }
        self.advance()?;
        if self.token.newline_before {
            trace!(line = self.token.start.line, "return ended at line break");
        } else if !self.at(Punctuator::Semicolon)
            && !self.at(Punctuator::RBrace)
            && !self.token.is_eof()
        {
            self.parse_expression(true)?;
        }
        self.consume_semicolon()
    }

    fn parse_throw(&mut self) -> ParseResult<()> {
        self.advance()?;
        if self.token.newline_before {
            return Err(syntax_error("Illegal newline after throw", self.token.start));
        }
        self.parse_expression(true)?;
        self.consume_semicolon()
    }

    fn parse_with(&mut self) -> ParseResult<()> {
        if self.ctx.strict {
            return Err(syntax_error(
                "Strict mode code may not include a with statement",
                self.token.start,
            ));
        }
        self.advance()?;
        self.parse_condition()?;
        self.parse_statement()
    }

    fn parse_switch(&mut self) -> ParseResult<()> {
        self.advance()?;
        self.expect(Punctuator::LParen)?;
        self.parse_expression(true)?;
        self.expect(Punctuator::RParen)?;
        self.expect(Punctuator::LBrace)?;

        let in_breakable = self.ctx.in_breakable;
        self.ctx.in_breakable = true;
        let result = self.parse_case_clauses();
        self.ctx.in_breakable = in_breakable;
        result?;

        self.expect_with(Punctuator::RBrace, LexGoal::RegexAllowed)
    }

    fn parse_case_clauses(&mut self) -> ParseResult<()> {
        let mut seen_default = false;
        while !self.at(Punctuator::RBrace) {
            if self.at_keyword(Keyword::Case) {
                self.advance()?;
                self.parse_expression(true)?;
            } else if self.at_keyword(Keyword::Default) {
                if seen_default {
                    return Err(syntax_error(
                        "More than one default clause in switch statement",
                        self.token.start,
                    ));
                }
                seen_default = true;
                self.advance()?;
            } else {
                return Err(self.unexpected());
            }
            self.expect(Punctuator::Colon)?;
            while !self.at(Punctuator::RBrace)
                && !self.at_keyword(Keyword::Case)
                && !self.at_keyword(Keyword::Default)
                && !self.token.is_eof()
            {
                self.parse_statement_list_item(false)?;
            }
        }
        Ok(())
    }

    fn parse_try(&mut self) -> ParseResult<()> {
        self.advance()?;
        self.parse_block()?;
        let mut handled = false;
        if self.at_keyword(Keyword::Catch) {
            self.advance()?;
            if self.eat(Punctuator::LParen)? {
                self.parse_binding_target(false)?;
                self.expect(Punctuator::RParen)?;
            }
            self.parse_block()?;
            handled = true;
        }
        if self.at_keyword(Keyword::Finally) {
            self.advance()?;
            self.parse_block()?;
            handled = true;
        }
        if !handled {
            return Err(syntax_error("Missing catch or finally after try", self.token.start));
        }
        Ok(())
    }

    fn parse_labelled_statement(&mut self, pending: Option<usize>) -> ParseResult<()> {
        let TokenKind::Identifier(name, escaped) = self.token.kind.clone() else {
            return Err(self.expected_identifier());
        };
        self.check_identifier(&name, escaped, self.token.start, false)?;
        if self.labels.iter().any(|label| label.name == name) {
            return Err(syntax_error(
                format!("Label '{}' has already been declared", name),
                self.token.start,
            ));
        }
        let chain_start = pending.unwrap_or(self.labels.len());
        self.labels.push(Label {
            name,
            iteration: false,
        });
        self.advance()?;
        self.expect_with(Punctuator::Colon, LexGoal::RegexAllowed)?;

        self.pending_label_start = Some(chain_start);
        let result = if self.at_keyword(Keyword::Function) && !self.ctx.strict {
            self.pending_label_start = None;
            self.nested(|p| p.parse_function_declaration(false))
        } else {
            self.parse_statement()
        };
        self.pending_label_start = None;
        self.labels.pop();
        result
    }
}

// -------------------------------------------------------------------------
// Expressions
// -------------------------------------------------------------------------

impl<'a> Parser<'a> {
    fn parse_expression(&mut self, allow_in: bool) -> ParseResult<ExprInfo> {
        let info = self.parse_expression_cover(allow_in)?;
        self.no_cover(&info)?;
        Ok(info)
    }

    /// Comma expression. A lone operand keeps its cover so that a
    /// `for (... of ...)` head can still turn it into a pattern.
    fn parse_expression_cover(&mut self, allow_in: bool) -> ParseResult<ExprInfo> {
        let first = self.parse_assignment_cover(allow_in)?;
        if !self.at(Punctuator::Comma) {
            return Ok(first);
        }
        self.no_cover(&first)?;
        while self.eat(Punctuator::Comma)? {
            self.parse_assignment(allow_in)?;
        }
        Ok(ExprInfo::other(first.start))
    }

    fn parse_assignment(&mut self, allow_in: bool) -> ParseResult<ExprInfo> {
        let info = self.parse_assignment_cover(allow_in)?;
        self.no_cover(&info)?;
        Ok(info)
    }

    fn parse_assignment_cover(&mut self, allow_in: bool) -> ParseResult<ExprInfo> {
        self.nested(|p| p.parse_assignment_inner(allow_in))
    }

    fn parse_assignment_inner(&mut self, allow_in: bool) -> ParseResult<ExprInfo> {
        if self.ctx.yield_expr && self.token.is_contextual("yield") {
            return self.parse_yield(allow_in);
        }
        let left = self.parse_conditional(allow_in)?;
        let operator = match self.token.kind {
            TokenKind::Punctuator(p) if p.is_assignment() => p,
            _ => return Ok(left),
        };

        if operator == Punctuator::Assign {
            if !is_assign_target(left.kind) {
                return Err(syntax_error("Invalid left-hand side in assignment", left.start));
            }
            let binding = matches!(
                left.kind,
                ExprKind::Identifier { .. } | ExprKind::Pattern { binding: true }
            );
            self.advance()?;
            self.parse_assignment(allow_in)?;
            return Ok(ExprInfo::new(ExprKind::Assignment { binding }, left.start));
        }

        self.no_cover(&left)?;
        if !is_simple_target(left.kind) {
            return Err(syntax_error("Invalid left-hand side in assignment", left.start));
        }
        self.advance()?;
        self.parse_assignment(allow_in)?;
        Ok(ExprInfo::other(left.start))
    }

    fn parse_yield(&mut self, allow_in: bool) -> ParseResult<ExprInfo> {
        let start = self.token.start;
        self.advance()?;
        if self.token.newline_before {
            return Ok(ExprInfo::other(start));
        }
        if self.eat(Punctuator::Star)? || self.starts_operand() {
            self.parse_assignment(allow_in)?;
        }
        Ok(ExprInfo::other(start))
    }

    /// Whether the current token can begin the operand of `yield`.
    fn starts_operand(&self) -> bool {
        match self.token.kind {
            TokenKind::EOF | TokenKind::Keyword(Keyword::In) => false,
            TokenKind::Punctuator(p) => !matches!(
                p,
                Punctuator::RParen
                    | Punctuator::RBracket
                    | Punctuator::RBrace
                    | Punctuator::Comma
                    | Punctuator::Semicolon
                    | Punctuator::Colon
            ),
            _ => true,
        }
    }

    fn parse_conditional(&mut self, allow_in: bool) -> ParseResult<ExprInfo> {
        let test = self.parse_binary(1, allow_in)?;
        if !self.at(Punctuator::Question) || test.kind == ExprKind::Arrow {
            return Ok(test);
        }
        self.no_cover(&test)?;
        self.advance()?;
        self.parse_assignment(true)?;
        self.expect(Punctuator::Colon)?;
        self.parse_assignment(allow_in)?;
        Ok(ExprInfo::other(test.start))
    }

    fn binary_precedence(&self, allow_in: bool) -> Option<u8> {
        let precedence = match self.token.kind {
            TokenKind::Punctuator(p) => match p {
                Punctuator::NullishCoalesce => 1,
                Punctuator::OrOr => 2,
                Punctuator::AndAnd => 3,
                Punctuator::Or => 4,
                Punctuator::Xor => 5,
                Punctuator::And => 6,
                Punctuator::EqEq | Punctuator::NotEq | Punctuator::EqEqEq | Punctuator::NotEqEq => 7,
                Punctuator::Lt | Punctuator::Gt | Punctuator::LtEq | Punctuator::GtEq => 8,
                Punctuator::LtLt | Punctuator::GtGt | Punctuator::GtGtGt => 9,
                Punctuator::Plus | Punctuator::Minus => 10,
                Punctuator::Star | Punctuator::Slash | Punctuator::Percent => 11,
                Punctuator::StarStar => 12,
                _ => return None,
            },
            TokenKind::Keyword(Keyword::Instanceof) => 8,
            TokenKind::Keyword(Keyword::In) if allow_in => 8,
            _ => return None,
        };
        Some(precedence)
    }

    /// Precedence climbing over binary operators. `**` is right
    /// associative; everything else associates to the left.
    fn parse_binary(&mut self, min_precedence: u8, allow_in: bool) -> ParseResult<ExprInfo> {
        let mut left = self.parse_unary()?;
        while let Some(precedence) = self.binary_precedence(allow_in) {
            if precedence < min_precedence || left.kind == ExprKind::Arrow {
                break;
            }
            let operator_start = self.token.start;
            let operator_text = self.token.describe(self.source);
            let operator = match self.token.kind {
                TokenKind::Punctuator(p) => Some(p),
                _ => None,
            };
            if operator == Some(Punctuator::StarStar) && left.kind == ExprKind::Unary {
                return Err(syntax_error(
                    "Unary operator used immediately before exponentiation expression. Parenthesis must be used to disambiguate operator precedence",
                    operator_start,
                ));
            }
            self.no_cover(&left)?;
            self.advance()?;

            let next_min = if operator == Some(Punctuator::StarStar) {
                precedence
            } else {
                precedence + 1
            };
            let right = self.nested(|p| p.parse_binary(next_min, allow_in))?;
            let right = self.operand(right)?;

            let kind = match operator {
                Some(Punctuator::NullishCoalesce) => {
                    if left.kind == ExprKind::Logical || right.kind == ExprKind::Logical {
                        return Err(syntax_error(
                            format!("Unexpected token {}", operator_text),
                            operator_start,
                        ));
                    }
                    ExprKind::Coalesce
                }
                Some(Punctuator::OrOr) | Some(Punctuator::AndAnd) => {
                    if left.kind == ExprKind::Coalesce || right.kind == ExprKind::Coalesce {
                        return Err(syntax_error(
                            format!("Unexpected token {}", operator_text),
                            operator_start,
                        ));
                    }
                    ExprKind::Logical
                }
                _ => ExprKind::Other,
            };
            left = ExprInfo::new(kind, left.start);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<ExprInfo> {
        let start = self.token.start;
        match self.token.kind {
            TokenKind::Punctuator(
                Punctuator::Plus | Punctuator::Minus | Punctuator::Not | Punctuator::Tilde,
            )
            | TokenKind::Keyword(Keyword::Typeof | Keyword::Void) => {
                self.advance()?;
                let operand = self.nested(Self::parse_unary)?;
                self.operand(operand)?;
                Ok(ExprInfo::new(ExprKind::Unary, start))
            }
            TokenKind::Keyword(Keyword::Delete) => {
                self.advance()?;
                let operand = self.nested(Self::parse_unary)?;
                let operand = self.operand(operand)?;
                if self.ctx.strict
                    && matches!(
                        operand.kind,
                        ExprKind::Identifier { .. } | ExprKind::ParenIdentifier { .. }
                    )
                {
                    return Err(syntax_error(
                        "Delete of an unqualified identifier in strict mode.",
                        start,
                    ));
                }
                Ok(ExprInfo::new(ExprKind::Unary, start))
            }
            TokenKind::Punctuator(Punctuator::PlusPlus | Punctuator::MinusMinus) => {
                self.advance()?;
                let operand = self.nested(Self::parse_unary)?;
                let operand = self.operand(operand)?;
                if !is_simple_target(operand.kind) {
                    return Err(syntax_error(
                        "Invalid left-hand side expression in prefix operation",
                        operand.start,
                    ));
                }
                Ok(ExprInfo::other(start))
            }
            _ if self.ctx.await_expr && self.token.is_contextual("await") => {
                self.advance()?;
                let operand = self.nested(Self::parse_unary)?;
                self.operand(operand)?;
                Ok(ExprInfo::new(ExprKind::Unary, start))
            }
            _ => self.parse_postfix(),
        }
    }

    /// Postfix `++`/`--` is a restricted production: a line break before
    /// the operator ends the expression instead.
    fn parse_postfix(&mut self) -> ParseResult<ExprInfo> {
        let info = self.parse_lhs()?;
        let is_update = self.at(Punctuator::PlusPlus) || self.at(Punctuator::MinusMinus);
        if !is_update || self.token.newline_before {
            return Ok(info);
        }
        let info = self.operand(info)?;
        if !is_simple_target(info.kind) {
            return Err(syntax_error(
                "Invalid left-hand side expression in postfix operation",
                info.start,
            ));
        }
        self.advance()?;
        Ok(ExprInfo::other(info.start))
    }

    fn parse_lhs(&mut self) -> ParseResult<ExprInfo> {
        let info = if self.at_keyword(Keyword::New) {
            self.parse_new()?
        } else if self.at_keyword(Keyword::Super) {
            self.parse_super()?
        } else if self.at_keyword(Keyword::Import) {
            self.parse_import_expression()?
        } else {
            self.parse_primary()?
        };
        self.parse_call_tail(info, true)
    }

    fn parse_new(&mut self) -> ParseResult<ExprInfo> {
        let start = self.token.start;
        self.advance()?;
        if self.at(Punctuator::Dot) {
            self.advance()?;
            if !self.token.is_contextual("target") {
                return Err(self.unexpected());
            }
            if !self.ctx.new_target {
                return Err(syntax_error("new.target expression is not allowed here", start));
            }
            self.advance()?;
            return Ok(ExprInfo::other(start));
        }

        let callee = if self.at_keyword(Keyword::New) {
            self.nested(Self::parse_new)?
        } else if self.at_keyword(Keyword::Super) {
            if self.peek()?.is_punctuator(Punctuator::LParen) {
                return Err(syntax_error("'super' keyword unexpected here", self.token.start));
            }
            self.parse_super()?
        } else if self.at_keyword(Keyword::Import) {
            return Err(syntax_error("Cannot use new with import", self.token.start));
        } else {
            self.parse_primary()?
        };
        let callee = self.operand(callee)?;
        self.parse_call_tail(callee, false)?;
        if self.at(Punctuator::LParen) {
            self.parse_arguments()?;
        }
        Ok(ExprInfo::other(start))
    }

    fn parse_super(&mut self) -> ParseResult<ExprInfo> {
        let start = self.token.start;
        self.advance()?;
        if self.at(Punctuator::LParen) {
            if !self.ctx.super_call {
                return Err(syntax_error("'super' keyword unexpected here", start));
            }
            self.parse_arguments()?;
            return Ok(ExprInfo::other(start));
        }
        if !self.ctx.super_property {
            return Err(syntax_error("'super' keyword unexpected here", start));
        }
        if self.at(Punctuator::Dot) {
            self.advance()?;
            if let TokenKind::PrivateIdentifier(_) = self.token.kind {
                return Err(self.unexpected());
            }
            self.parse_member_name()?;
        } else if self.at(Punctuator::LBracket) {
            self.parse_computed_member()?;
        } else {
            return Err(syntax_error("'super' keyword unexpected here", start));
        }
        Ok(ExprInfo::new(ExprKind::Member, start))
    }

    fn parse_import_expression(&mut self) -> ParseResult<ExprInfo> {
        let start = self.token.start;
        self.advance()?;
        if self.at(Punctuator::Dot) {
            self.advance()?;
            if !self.token.is_contextual("meta") {
                return Err(self.unexpected());
            }
            if !self.is_module() {
                return Err(syntax_error("Cannot use 'import.meta' outside a module", start));
            }
            self.advance()?;
            return Ok(ExprInfo::other(start));
        }
        self.expect(Punctuator::LParen)?;
        self.parse_assignment(true)?;
        if self.eat(Punctuator::Comma)? && !self.at(Punctuator::RParen) {
            self.parse_assignment(true)?;
            self.eat(Punctuator::Comma)?;
        }
        self.expect(Punctuator::RParen)?;
        Ok(ExprInfo::other(start))
    }

    /// Member accesses, calls, optional chains and tagged templates after a
    /// primary expression. `new` callees take no calls and no `?.`.
    fn parse_call_tail(&mut self, info: ExprInfo, allow_call: bool) -> ParseResult<ExprInfo> {
        if info.kind == ExprKind::Arrow {
            return Ok(info);
        }
        let mut info = info;
        let mut in_optional_chain = false;
        loop {
            let kind = if self.at(Punctuator::Dot) {
                self.no_cover(&info)?;
                self.advance()?;
                self.parse_member_name()?;
                ExprKind::Member
            } else if self.at(Punctuator::OptionalChain) {
                if !allow_call {
                    return Err(syntax_error(
                        "Invalid optional chain from new expression",
                        self.token.start,
                    ));
                }
                self.no_cover(&info)?;
                self.advance()?;
                if self.at(Punctuator::LParen) {
                    self.parse_arguments()?;
                } else if self.at(Punctuator::LBracket) {
                    self.parse_computed_member()?;
                } else if let TokenKind::Template { .. } = self.token.kind {
                    return Err(syntax_error(
                        "Invalid tagged template on optional chain",
                        self.token.start,
                    ));
                } else {
                    self.parse_member_name()?;
                }
                in_optional_chain = true;
                ExprKind::Other
            } else if self.at(Punctuator::LBracket) {
                self.no_cover(&info)?;
                self.parse_computed_member()?;
                ExprKind::Member
            } else if allow_call && self.at(Punctuator::LParen) {
                self.no_cover(&info)?;
                self.parse_arguments()?;
                ExprKind::Other
            } else if let TokenKind::Template { .. } = self.token.kind {
                if in_optional_chain {
                    return Err(syntax_error(
                        "Invalid tagged template on optional chain",
                        self.token.start,
                    ));
                }
                self.no_cover(&info)?;
                self.parse_template(true)?;
                ExprKind::Other
            } else {
                break;
            };
            let kind = if in_optional_chain { ExprKind::Other } else { kind };
            info = ExprInfo::new(kind, info.start);
        }
        Ok(info)
    }

    /// The name after `.`: any identifier name, keywords included, or a
    /// private name inside a class body.
    fn parse_member_name(&mut self) -> ParseResult<()> {
        match self.token.kind {
            TokenKind::Identifier(..) | TokenKind::Keyword(_) => {
                self.advance_with(LexGoal::DivisionAllowed)
            }
            TokenKind::PrivateIdentifier(_) => {
                if self.class_depth == 0 {
                    return Err(syntax_error(
                        format!(
                            "Private field '{}' must be declared in an enclosing class",
                            self.token.lexeme(self.source)
                        ),
                        self.token.start,
                    ));
                }
                self.advance_with(LexGoal::DivisionAllowed)
            }
            _ => Err(self.expected_identifier()),
        }
    }

    fn parse_computed_member(&mut self) -> ParseResult<()> {
        self.expect(Punctuator::LBracket)?;
        self.parse_expression(true)?;
        self.expect(Punctuator::RBracket)
    }

    fn parse_arguments(&mut self) -> ParseResult<()> {
        self.expect(Punctuator::LParen)?;
        while !self.at(Punctuator::RParen) {
            self.eat(Punctuator::Spread)?;
            self.parse_assignment(true)?;
            if !self.at(Punctuator::RParen) {
                self.expect(Punctuator::Comma)?;
            }
        }
        self.advance()
    }

    fn parse_primary(&mut self) -> ParseResult<ExprInfo> {
        if self.at(Punctuator::Slash) || self.at(Punctuator::SlashEq) {
            let slash = self.token.clone();
            self.token = self.scanner.rescan(&slash, LexGoal::RegexAllowed)?;
            trace!(
                line = slash.start.line,
                column = slash.start.column,
                "rescanned '/' as a regular expression"
            );
        }
        let start = self.token.start;
        match self.token.kind {
            TokenKind::Identifier(..) => self.parse_identifier_expression(),
            TokenKind::PrivateIdentifier(_) => {
                if self.class_depth == 0 {
                    return Err(syntax_error(
                        format!(
                            "Private field '{}' must be declared in an enclosing class",
                            self.token.lexeme(self.source)
                        ),
                        start,
                    ));
                }
                self.advance()?;
                if !self.at_keyword(Keyword::In) {
                    return Err(self.unexpected());
                }
                Ok(ExprInfo::other(start))
            }
            TokenKind::Number { legacy_octal } => {
                if legacy_octal && self.ctx.strict {
                    return Err(syntax_error(
                        "Octal literals are not allowed in strict mode.",
                        start,
                    ));
                }
                self.advance()?;
                Ok(ExprInfo::other(start))
            }
            TokenKind::String { legacy_octal_escape } => {
                if legacy_octal_escape && self.ctx.strict {
                    return Err(syntax_error(
                        "Octal escape sequences are not allowed in strict mode.",
                        start,
                    ));
                }
                self.advance()?;
                Ok(ExprInfo::other(start))
            }
            TokenKind::BigInt
            | TokenKind::RegExp
            | TokenKind::Keyword(Keyword::This | Keyword::Null | Keyword::True | Keyword::False) => {
                self.advance()?;
                Ok(ExprInfo::other(start))
            }
            TokenKind::Template { .. } => {
                self.parse_template(false)?;
                Ok(ExprInfo::other(start))
            }
            TokenKind::Keyword(Keyword::Function) => self.parse_function(false, false, false),
            TokenKind::Keyword(Keyword::Class) => self.parse_class(false, false),
            TokenKind::Punctuator(Punctuator::LParen) => self.parse_parenthesized(),
            TokenKind::Punctuator(Punctuator::LBracket) => self.parse_array_literal(),
            TokenKind::Punctuator(Punctuator::LBrace) => self.parse_object_literal(),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_identifier_expression(&mut self) -> ParseResult<ExprInfo> {
        let start = self.token.start;
        let TokenKind::Identifier(name, escaped) = self.token.kind.clone() else {
            return Err(self.expected_identifier());
        };

        if !escaped && name == "async" {
            let next = self.peek()?;
            if !next.newline_before {
                if next.is_keyword(Keyword::Function) {
                    self.advance()?;
                    return self.parse_function(true, false, false);
                }
                if let TokenKind::Identifier(..) = next.kind {
                    self.advance()?;
                    return self.parse_async_arrow_with_identifier(start);
                }
            }
            if next.is_punctuator(Punctuator::LParen) {
                self.advance()?;
                return self.parse_async_call_or_arrow(start, next.newline_before);
            }
        }

        self.check_identifier(&name, escaped, start, false)?;
        self.advance()?;
        if self.at(Punctuator::Arrow) && !self.token.newline_before {
            if self.restricted_in_strict(&name) {
                return Err(syntax_error("Unexpected eval or arguments in strict mode", start));
            }
            return self.parse_arrow_body(start, false, true);
        }
        let assignable = !self.restricted_in_strict(&name);
        Ok(ExprInfo::new(ExprKind::Identifier { assignable }, start))
    }

    /// `async x => ...`
    fn parse_async_arrow_with_identifier(&mut self, start: SourcePosition) -> ParseResult<ExprInfo> {
        let TokenKind::Identifier(name, escaped) = self.token.kind.clone() else {
            return Err(self.expected_identifier());
        };
        if name == "await" {
            return Err(syntax_error("Unexpected reserved word 'await'", self.token.start));
        }
        self.check_binding(&name, escaped, self.token.start, false)?;
        self.advance()?;
        if !self.at(Punctuator::Arrow) || self.token.newline_before {
            return Err(self.unexpected());
        }
        self.parse_arrow_body(start, true, true)
    }

    /// `async(...)` is a call unless `=>` follows on the same line.
    fn parse_async_call_or_arrow(
        &mut self,
        start: SourcePosition,
        newline_before_paren: bool,
    ) -> ParseResult<ExprInfo> {
        let list = self.parse_paren_list(true)?;
        if self.at(Punctuator::Arrow) && !self.token.newline_before {
            if newline_before_paren {
                return Err(self.unexpected());
            }
            if !list.all_binding {
                return Err(syntax_error("Malformed arrow function parameter list", start));
            }
            return self.parse_arrow_body(start, true, list.all_identifiers);
        }
        if let Some(position) = list.cover_init {
            return Err(syntax_error("Invalid shorthand property initializer", position));
        }
        Ok(ExprInfo::other(start))
    }

    /// A parenthesized expression, or the parameters of an arrow function.
    fn parse_parenthesized(&mut self) -> ParseResult<ExprInfo> {
        let start = self.token.start;
        let list = self.parse_paren_list(false)?;
        if self.at(Punctuator::Arrow) && !self.token.newline_before {
            if !list.all_binding {
                return Err(syntax_error("Malformed arrow function parameter list", start));
            }
            return self.parse_arrow_body(start, false, list.all_identifiers);
        }
        if let Some(err) = list.arrow_only {
            return Err(err);
        }
        if let Some(position) = list.cover_init {
            return Err(syntax_error("Invalid shorthand property initializer", position));
        }
        let kind = match (list.items, list.last) {
            (1, Some(last)) => match last.kind {
                ExprKind::Identifier { assignable } | ExprKind::ParenIdentifier { assignable } => {
                    ExprKind::ParenIdentifier { assignable }
                }
                ExprKind::Member | ExprKind::ParenMember => ExprKind::ParenMember,
                _ => ExprKind::Other,
            },
            _ => ExprKind::Other,
        };
        Ok(ExprInfo::new(kind, start))
    }

    fn parse_paren_list(&mut self, call: bool) -> ParseResult<ParenList> {
        self.expect(Punctuator::LParen)?;
        let mut list = ParenList {
            items: 0,
            last: None,
            all_binding: true,
            all_identifiers: true,
            cover_init: None,
            arrow_only: None,
        };
        if self.at(Punctuator::RParen) {
            list.arrow_only = Some(self.unexpected());
        }
        while !self.at(Punctuator::RParen) {
            if self.at(Punctuator::Spread) {
                if list.arrow_only.is_none() {
                    list.arrow_only = Some(self.unexpected());
                }
                self.advance()?;
                let rest = self.parse_assignment_cover(true)?;
                list.items += 1;
                list.all_binding &= is_binding_target(rest.kind);
                list.all_identifiers = false;
                list.cover_init = list.cover_init.or(rest.cover_init);
                if self.at(Punctuator::RParen) {
                    break;
                }
                if !call {
                    return Err(syntax_error(
                        "Rest parameter must be last formal parameter",
                        self.token.start,
                    ));
                }
                list.all_binding = false;
                self.expect(Punctuator::Comma)?;
                continue;
            }
            let item = self.parse_assignment_cover(true)?;
            list.items += 1;
            list.all_binding &= is_binding_element(item.kind);
            list.all_identifiers &= matches!(item.kind, ExprKind::Identifier { .. });
            list.cover_init = list.cover_init.or(item.cover_init);
            list.last = Some(item);
            if self.at(Punctuator::RParen) {
                break;
            }
            self.expect(Punctuator::Comma)?;
            if self.at(Punctuator::RParen) && list.arrow_only.is_none() {
                list.arrow_only = Some(self.unexpected());
            }
        }
        self.advance()?;
        Ok(list)
    }

    fn parse_arrow_body(
        &mut self,
        start: SourcePosition,
        is_async: bool,
        simple_params: bool,
    ) -> ParseResult<ExprInfo> {
        self.advance()?;
        let ctx = Context {
            strict: self.ctx.strict,
            in_function: true,
            await_expr: is_async,
            await_reserved: is_async || self.ctx.await_reserved,
            super_property: self.ctx.super_property,
            super_call: self.ctx.super_call,
            new_target: self.ctx.new_target,
            class_field: self.ctx.class_field,
            ..Context::default()
        };
        self.with_function_context(ctx, |p| {
            if p.at(Punctuator::LBrace) {
                p.parse_function_body(simple_params, LexGoal::DivisionAllowed)
            } else {
                p.parse_assignment(true).map(drop)
            }
        })?;
        Ok(ExprInfo::new(ExprKind::Arrow, start))
    }

    /// Template literal spans and their substitutions. Each `}` that closes
    /// a substitution is rescanned as template text.
    fn parse_template(&mut self, tagged: bool) -> ParseResult<()> {
        loop {
            let TokenKind::Template {
                part,
                invalid_escape,
            } = self.token.kind
            else {
                return Err(self.unexpected());
            };
            if let (Some(position), false) = (invalid_escape, tagged) {
                return Err(lex_error("Invalid escape sequence in template literal", position));
            }
            self.advance()?;
            if matches!(part, TemplatePart::NoSubstitution | TemplatePart::Tail) {
                return Ok(());
            }
            self.parse_expression(true)?;
            if !self.at(Punctuator::RBrace) {
                return Err(self.unexpected());
            }
            let brace = self.token.clone();
            self.token = self.scanner.rescan(&brace, LexGoal::TemplateContinuation)?;
            trace!(
                line = brace.start.line,
                column = brace.start.column,
                "resumed template literal after substitution"
            );
        }
    }

    fn literal_info(
        start: SourcePosition,
        assignable: bool,
        binding: bool,
        cover_init: Option<SourcePosition>,
    ) -> ExprInfo {
        let kind = if assignable {
            ExprKind::Pattern { binding }
        } else {
            ExprKind::Other
        };
        ExprInfo {
            kind,
            start,
            cover_init,
        }
    }

    fn parse_array_literal(&mut self) -> ParseResult<ExprInfo> {
        let start = self.token.start;
        self.advance()?;
        let mut assignable = true;
        let mut binding = true;
        let mut cover_init = None;
        while !self.at(Punctuator::RBracket) {
            if self.at(Punctuator::Comma) {
                self.advance()?;
                continue;
            }
            if self.eat(Punctuator::Spread)? {
                let rest = self.parse_assignment_cover(true)?;
                cover_init = cover_init.or(rest.cover_init);
                assignable &= is_assign_target(rest.kind);
                binding &= is_binding_target(rest.kind);
                if !self.at(Punctuator::RBracket) {
                    assignable = false;
                    binding = false;
                }
            } else {
                let element = self.parse_assignment_cover(true)?;
                cover_init = cover_init.or(element.cover_init);
                assignable &= is_assignment_element(element.kind);
                binding &= is_binding_element(element.kind);
            }
            if !self.at(Punctuator::RBracket) {
                self.expect(Punctuator::Comma)?;
            }
        }
        self.advance()?;
        Ok(Self::literal_info(start, assignable, binding, cover_init))
    }

    fn parse_object_literal(&mut self) -> ParseResult<ExprInfo> {
        let start = self.token.start;
        self.advance()?;
        let mut assignable = true;
        let mut binding = true;
        let mut cover_init = None;
        while !self.at(Punctuator::RBrace) {
            if self.eat(Punctuator::Spread)? {
                let rest = self.parse_assignment(true)?;
                assignable &= is_simple_target(rest.kind);
                binding &= rest.kind == (ExprKind::Identifier { assignable: true });
                if !self.at(Punctuator::RBrace) {
                    assignable = false;
                    binding = false;
                }
            } else {
                let member = self.nested(Self::parse_object_member)?;
                cover_init = cover_init.or(member.cover_init);
                match member.kind {
                    ExprKind::Pattern { binding: member_binding } => binding &= member_binding,
                    _ => {
                        assignable = false;
                        binding = false;
                    }
                }
            }
            if !self.at(Punctuator::RBrace) {
                self.expect(Punctuator::Comma)?;
            }
        }
        self.advance()?;
        Ok(Self::literal_info(start, assignable, binding, cover_init))
    }

    /// One property definition. The result is a `Pattern` when the property
    /// can also be read as part of a destructuring pattern.
    fn parse_object_member(&mut self) -> ParseResult<ExprInfo> {
        let start = self.token.start;
        let (is_async, generator, accessor) = self.parse_method_modifiers()?;
        let key = self.parse_property_name(false)?;
        if is_async || generator || accessor.is_some() || self.at(Punctuator::LParen) {
            self.parse_method(generator, is_async, accessor, false)?;
            return Ok(ExprInfo::other(start));
        }

        if self.eat(Punctuator::Colon)? {
            let value = self.parse_assignment_cover(true)?;
            let kind = if is_assignment_element(value.kind) {
                ExprKind::Pattern {
                    binding: is_binding_element(value.kind),
                }
            } else {
                ExprKind::Other
            };
            return Ok(ExprInfo {
                kind,
                start,
                cover_init: value.cover_init,
            });
        }

        let Some((name, escaped, position)) = key.identifier else {
            return Err(self.unexpected());
        };
        self.check_identifier(&name, escaped, position, false)?;
        let kind = if self.restricted_in_strict(&name) {
            ExprKind::Other
        } else {
            ExprKind::Pattern { binding: true }
        };
        if self.at(Punctuator::Assign) {
            let initializer = self.token.start;
            self.advance()?;
            self.parse_assignment(true)?;
            return Ok(ExprInfo {
                kind,
                start,
                cover_init: Some(initializer),
            });
        }
        Ok(ExprInfo::new(kind, start))
    }
}

/// Shape of a formal parameter list.
struct FormalParameters {
    count: usize,
    simple: bool,
    rest: bool,
}

// -------------------------------------------------------------------------
// Functions and classes
// -------------------------------------------------------------------------

impl<'a> Parser<'a> {
    fn parse_function_declaration(&mut self, is_async: bool) -> ParseResult<()> {
        self.parse_function(is_async, true, true).map(drop)
    }

    /// `function`, `function*`, `async function` from the `function` keyword
    /// on; a leading `async` has already been consumed.
    fn parse_function(
        &mut self,
        is_async: bool,
        declaration: bool,
        name_required: bool,
    ) -> ParseResult<ExprInfo> {
        let start = self.token.start;
        self.advance()?;
        let generator = self.eat(Punctuator::Star)?;

        if let TokenKind::Identifier(name, escaped) = self.token.kind.clone() {
            if declaration {
                self.check_binding(&name, escaped, self.token.start, false)?;
            } else {
                // The name of a function expression is bound inside it.
                let outer = self.ctx;
                self.ctx.yield_expr = false;
                self.ctx.yield_reserved = generator;
                self.ctx.await_expr = false;
                self.ctx.await_reserved = is_async || self.is_module();
                let checked = self.check_binding(&name, escaped, self.token.start, false);
                self.ctx = outer;
                checked?;
            }
            self.advance()?;
        } else if name_required {
            return Err(self.expected_identifier());
        }

        let ctx = Context {
            strict: self.ctx.strict,
            in_function: true,
            yield_reserved: generator,
            await_reserved: is_async || self.is_module(),
            new_target: true,
            ..Context::default()
        };
        let close = if declaration {
            LexGoal::RegexAllowed
        } else {
            LexGoal::DivisionAllowed
        };
        self.with_function_context(ctx, |p| {
            p.parse_function_rest(generator, is_async, None, close)
        })?;
        Ok(ExprInfo::other(start))
    }

    /// Object and class methods, accessors and constructors.
    fn parse_method(
        &mut self,
        generator: bool,
        is_async: bool,
        accessor: Option<Accessor>,
        super_call: bool,
    ) -> ParseResult<()> {
        let ctx = Context {
            strict: self.ctx.strict,
            in_function: true,
            yield_reserved: generator,
            await_reserved: is_async || self.is_module(),
            super_property: true,
            super_call,
            new_target: true,
            ..Context::default()
        };
        self.with_function_context(ctx, |p| {
            p.parse_function_rest(generator, is_async, accessor, LexGoal::DivisionAllowed)
        })
    }

    /// Parameters and body, inside the function's own context.
    fn parse_function_rest(
        &mut self,
        generator: bool,
        is_async: bool,
        accessor: Option<Accessor>,
        close: LexGoal,
    ) -> ParseResult<()> {
        let params_start = self.token.start;
        let params = self.parse_formal_parameters()?;
        match accessor {
            Some(Accessor::Get) if params.count != 0 => {
                return Err(syntax_error(
                    "Getter must not have any formal parameters.",
                    params_start,
                ));
            }
            Some(Accessor::Set) if params.count != 1 || params.rest => {
                return Err(syntax_error(
                    "Setter must have exactly one formal parameter.",
                    params_start,
                ));
            }
            _ => {}
        }
        self.ctx.yield_expr = generator;
        self.ctx.await_expr = is_async;
        self.parse_function_body(params.simple, close)
    }

    fn parse_formal_parameters(&mut self) -> ParseResult<FormalParameters> {
        self.expect(Punctuator::LParen)?;
        let mut params = FormalParameters {
            count: 0,
            simple: true,
            rest: false,
        };
        while !self.at(Punctuator::RParen) {
            params.count += 1;
            if self.eat(Punctuator::Spread)? {
                params.rest = true;
                params.simple = false;
                self.parse_binding_target(false)?;
                if !self.at(Punctuator::RParen) {
                    return Err(syntax_error(
                        "Rest parameter must be last formal parameter",
                        self.token.start,
                    ));
                }
                break;
            }
            if !self.parse_binding_element(false)? {
                params.simple = false;
            }
            if !self.at(Punctuator::RParen) {
                self.expect(Punctuator::Comma)?;
            }
        }
        self.expect(Punctuator::RParen)?;
        Ok(params)
    }

    fn parse_function_body(&mut self, simple_params: bool, close: LexGoal) -> ParseResult<()> {
        self.expect(Punctuator::LBrace)?;
        let use_strict = self.parse_statement_list(true, false)?;
        if let (Some(position), false) = (use_strict, simple_params) {
            return Err(syntax_error(
                "Illegal 'use strict' directive in function with non-simple parameter list",
                position,
            ));
        }
        self.expect_with(Punctuator::RBrace, close)
    }

    /// Class declarations and expressions. All parts of a class are strict.
    fn parse_class(&mut self, declaration: bool, name_required: bool) -> ParseResult<ExprInfo> {
        let start = self.token.start;
        let strict = self.ctx.strict;
        self.ctx.strict = true;
        let result = self.parse_class_tail(declaration, name_required);
        self.ctx.strict = strict;
        result?;
        Ok(ExprInfo::other(start))
    }

    fn parse_class_tail(&mut self, declaration: bool, name_required: bool) -> ParseResult<()> {
        self.advance()?;
        if let TokenKind::Identifier(name, escaped) = self.token.kind.clone() {
            self.check_binding(&name, escaped, self.token.start, true)?;
            self.advance()?;
        } else if name_required {
            return Err(self.expected_identifier());
        }

        let derived = if self.at_keyword(Keyword::Extends) {
            self.advance()?;
            let heritage = self.nested(Self::parse_lhs)?;
            self.operand(heritage)?;
            true
        } else {
            false
        };

        self.expect(Punctuator::LBrace)?;
        self.class_depth += 1;
        let result = self.parse_class_body(derived);
        self.class_depth -= 1;
        result?;

        let close = if declaration {
            LexGoal::RegexAllowed
        } else {
            LexGoal::DivisionAllowed
        };
        self.expect_with(Punctuator::RBrace, close)
    }

    fn parse_class_body(&mut self, derived: bool) -> ParseResult<()> {
        let mut has_constructor = false;
        while !self.at(Punctuator::RBrace) {
            if self.token.is_eof() {
                return Err(self.unexpected());
            }
            if self.eat(Punctuator::Semicolon)? {
                continue;
            }
            self.nested(|p| p.parse_class_element(derived, &mut has_constructor))?;
        }
        Ok(())
    }

    fn parse_class_element(&mut self, derived: bool, has_constructor: &mut bool) -> ParseResult<()> {
        let mut is_static = false;
        if self.token.is_contextual("static") {
            let next = self.peek()?;
            if next.is_punctuator(Punctuator::LBrace) {
                self.advance()?;
                return self.parse_static_block();
            }
            if !Self::ends_property_name(&next) {
                is_static = true;
                self.advance()?;
            }
        }

        let (is_async, generator, accessor) = self.parse_method_modifiers()?;
        let key_start = self.token.start;
        let key = self.parse_property_name(true)?;
        let public_name = if key.private { None } else { key.name.as_deref() };

        if key.private && key.name.as_deref() == Some("constructor") {
            return Err(syntax_error(
                "Classes may not have a private field named '#constructor'",
                key_start,
            ));
        }

        if self.at(Punctuator::LParen) {
            let is_constructor = !is_static && public_name == Some("constructor");
            if is_constructor {
                if is_async || generator || accessor.is_some() {
                    return Err(syntax_error(
                        "Class constructor may not be a special method",
                        key_start,
                    ));
                }
                if *has_constructor {
                    return Err(syntax_error("A class may only have one constructor", key_start));
                }
                *has_constructor = true;
            }
            if is_static && public_name == Some("prototype") {
                return Err(syntax_error(
                    "Classes may not have a static property named 'prototype'",
                    key_start,
                ));
            }
            return self.parse_method(generator, is_async, accessor, is_constructor && derived);
        }

        if is_async || generator || accessor.is_some() {
            return Err(self.unexpected());
        }
        if public_name == Some("constructor") || (is_static && public_name == Some("prototype")) {
            return Err(syntax_error(
                format!(
                    "Classes may not have a field named '{}'",
                    public_name.unwrap_or_default()
                ),
                key_start,
            ));
        }
        if self.eat(Punctuator::Assign)? {
            let ctx = Context {
                strict: true,
                await_reserved: self.ctx.await_reserved || self.ctx.await_expr,
                super_property: true,
                new_target: true,
                class_field: true,
                ..Context::default()
            };
            self.with_function_context(ctx, |p| p.parse_assignment(true).map(drop))?;
        }
        self.consume_semicolon()
    }

    fn parse_static_block(&mut self) -> ParseResult<()> {
        let ctx = Context {
            strict: true,
            await_reserved: true,
            super_property: true,
            new_target: true,
            class_field: true,
            ..Context::default()
        };
        self.with_function_context(ctx, |p| {
            p.expect(Punctuator::LBrace)?;
            p.parse_statement_list(false, false)?;
            p.expect_with(Punctuator::RBrace, LexGoal::DivisionAllowed)
        })
    }

    /// `async`, `*`, `get` and `set` before a property name. Each of the
    /// words is itself a property name when followed by `(`, `:`, `=`,
    /// `,`, `;` or `}`.
    fn parse_method_modifiers(&mut self) -> ParseResult<(bool, bool, Option<Accessor>)> {
        let mut is_async = false;
        let mut accessor = None;
        if self.token.is_contextual("async") {
            let next = self.peek()?;
            if !next.newline_before && !Self::ends_property_name(&next) {
                is_async = true;
                self.advance()?;
            }
        } else if self.token.is_contextual("get") || self.token.is_contextual("set") {
            let next = self.peek()?;
            if !Self::ends_property_name(&next) {
                accessor = Some(if self.token.is_contextual("get") {
                    Accessor::Get
                } else {
                    Accessor::Set
                });
                self.advance()?;
            }
        }
        let generator = accessor.is_none() && self.eat(Punctuator::Star)?;
        Ok((is_async, generator, accessor))
    }

    fn ends_property_name(token: &Token) -> bool {
        token.is_eof()
            || matches!(
                token.kind,
                TokenKind::Punctuator(
                    Punctuator::LParen
                        | Punctuator::Colon
                        | Punctuator::Assign
                        | Punctuator::Comma
                        | Punctuator::Semicolon
                        | Punctuator::RBrace
                )
            )
    }

    fn parse_property_name(&mut self, allow_private: bool) -> ParseResult<PropertyKey> {
        let position = self.token.start;
        let mut key = PropertyKey {
            identifier: None,
            name: None,
            private: false,
        };
        match self.token.kind {
            TokenKind::Identifier(ref name, escaped) => {
                key.identifier = Some((name.clone(), escaped, position));
                key.name = Some(name.clone());
            }
            TokenKind::Keyword(_) => {
                key.name = Some(self.token.lexeme(self.source).to_string());
            }
            TokenKind::String { .. } => {
                let raw = self.token.lexeme(self.source);
                if !raw.contains('\\') {
                    key.name = raw.get(1..raw.len().saturating_sub(1)).map(str::to_string);
                }
            }
            TokenKind::Number { legacy_octal } => {
                if legacy_octal && self.ctx.strict {
                    return Err(syntax_error(
                        "Octal literals are not allowed in strict mode.",
                        position,
                    ));
                }
            }
            TokenKind::BigInt => {}
            TokenKind::PrivateIdentifier(ref name) if allow_private => {
                key.private = true;
                key.name = Some(name.clone());
            }
            TokenKind::Punctuator(Punctuator::LBracket) => {
                self.advance()?;
                self.parse_assignment(true)?;
                self.expect_with(Punctuator::RBracket, LexGoal::DivisionAllowed)?;
                return Ok(key);
            }
            _ => return Err(self.unexpected()),
        }
        self.advance_with(LexGoal::DivisionAllowed)?;
        Ok(key)
    }
}

// -------------------------------------------------------------------------
// Binding patterns
// -------------------------------------------------------------------------

impl<'a> Parser<'a> {
    fn parse_binding_target(&mut self, lexical: bool) -> ParseResult<()> {
        self.nested(|p| {
            if p.at(Punctuator::LBracket) {
                p.parse_array_binding(lexical)
            } else if p.at(Punctuator::LBrace) {
                p.parse_object_binding(lexical)
            } else {
                p.parse_binding_identifier(lexical)
            }
        })
    }

    /// A binding target with an optional default. Returns whether it was a
    /// plain identifier without a default.
    fn parse_binding_element(&mut self, lexical: bool) -> ParseResult<bool> {
        let simple = matches!(self.token.kind, TokenKind::Identifier(..));
        self.parse_binding_target(lexical)?;
        if self.eat(Punctuator::Assign)? {
            self.parse_assignment(true)?;
            return Ok(false);
        }
        Ok(simple)
    }

    fn parse_binding_identifier(&mut self, lexical: bool) -> ParseResult<()> {
        let TokenKind::Identifier(name, escaped) = &self.token.kind else {
            return Err(self.expected_identifier());
        };
        self.check_binding(name, *escaped, self.token.start, lexical)?;
        self.advance()
    }

    fn parse_array_binding(&mut self, lexical: bool) -> ParseResult<()> {
        self.advance()?;
        while !self.at(Punctuator::RBracket) {
            if self.at(Punctuator::Comma) {
                self.advance()?;
                continue;
            }
            if self.eat(Punctuator::Spread)? {
                self.parse_binding_target(lexical)?;
                if !self.at(Punctuator::RBracket) {
                    return Err(syntax_error("Rest element must be last element", self.token.start));
                }
                break;
            }
            self.parse_binding_element(lexical)?;
            if !self.at(Punctuator::RBracket) {
                self.expect(Punctuator::Comma)?;
            }
        }
        self.advance()
    }

    fn parse_object_binding(&mut self, lexical: bool) -> ParseResult<()> {
        self.advance()?;
        while !self.at(Punctuator::RBrace) {
            if self.eat(Punctuator::Spread)? {
                self.parse_binding_identifier(lexical)?;
                if !self.at(Punctuator::RBrace) {
                    return Err(syntax_error("Rest element must be last element", self.token.start));
                }
                break;
            }
            let key = self.parse_property_name(false)?;
            if self.eat(Punctuator::Colon)? {
                self.parse_binding_element(lexical)?;
            } else {
                let Some((name, escaped, position)) = key.identifier else {
                    return Err(self.unexpected());
                };
                self.check_binding(&name, escaped, position, lexical)?;
                if self.eat(Punctuator::Assign)? {
                    self.parse_assignment(true)?;
                }
            }
            if !self.at(Punctuator::RBrace) {
                self.expect(Punctuator::Comma)?;
            }
        }
        self.advance()
    }
}

// -------------------------------------------------------------------------
// Modules
// -------------------------------------------------------------------------

impl<'a> Parser<'a> {
    fn expect_contextual(&mut self, word: &str) -> ParseResult<()> {
        if self.token.is_contextual(word) {
            self.advance()
        } else {
            Err(self.unexpected())
        }
    }

    fn parse_module_specifier(&mut self) -> ParseResult<()> {
        match self.token.kind {
            TokenKind::String { .. } => self.advance(),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_module_export_name(&mut self) -> ParseResult<()> {
        match self.token.kind {
            TokenKind::String { .. } | TokenKind::Identifier(..) | TokenKind::Keyword(_) => {
                self.advance_with(LexGoal::DivisionAllowed)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `with { type: "json" }` after a module specifier.
    fn parse_import_attributes(&mut self) -> ParseResult<()> {
        let legacy_assert = self.token.is_contextual("assert") && !self.token.newline_before;
        if !self.at_keyword(Keyword::With) && !legacy_assert {
            return Ok(());
        }
        self.advance()?;
        self.expect(Punctuator::LBrace)?;
        while !self.at(Punctuator::RBrace) {
            self.parse_module_export_name()?;
            self.expect(Punctuator::Colon)?;
            self.parse_module_specifier()?;
            if !self.at(Punctuator::RBrace) {
                self.expect(Punctuator::Comma)?;
            }
        }
        self.advance()
    }

    fn parse_import_declaration(&mut self) -> ParseResult<()> {
        self.advance()?;
        if let TokenKind::String { .. } = self.token.kind {
            self.advance()?;
            self.parse_import_attributes()?;
            return self.consume_semicolon();
        }

        let mut more = true;
        if let TokenKind::Identifier(..) = self.token.kind {
            self.parse_binding_identifier(true)?;
            more = self.eat(Punctuator::Comma)?;
        }
        if more {
            if self.eat(Punctuator::Star)? {
                self.expect_contextual("as")?;
                self.parse_binding_identifier(true)?;
            } else if self.at(Punctuator::LBrace) {
                self.parse_named_imports()?;
            } else {
                return Err(self.unexpected());
            }
        }
        self.expect_contextual("from")?;
        self.parse_module_specifier()?;
        self.parse_import_attributes()?;
        self.consume_semicolon()
    }

    fn parse_named_imports(&mut self) -> ParseResult<()> {
        self.advance()?;
        while !self.at(Punctuator::RBrace) {
            match self.token.kind {
                TokenKind::String { .. } => {
                    self.advance()?;
                    self.expect_contextual("as")?;
                    self.parse_binding_identifier(true)?;
                }
                TokenKind::Identifier(..) | TokenKind::Keyword(_) => {
                    if self.peek()?.is_contextual("as") {
                        self.advance_with(LexGoal::DivisionAllowed)?;
                        self.advance()?;
                    }
                    self.parse_binding_identifier(true)?;
                }
                _ => return Err(self.unexpected()),
            }
            if !self.at(Punctuator::RBrace) {
                self.expect(Punctuator::Comma)?;
            }
        }
        self.advance()
    }

    fn parse_export_declaration(&mut self) -> ParseResult<()> {
        self.advance()?;
        if self.eat(Punctuator::Star)? {
            if self.token.is_contextual("as") {
                self.advance()?;
                self.parse_module_export_name()?;
            }
            self.expect_contextual("from")?;
            self.parse_module_specifier()?;
            self.parse_import_attributes()?;
            return self.consume_semicolon();
        }

        if self.at(Punctuator::LBrace) {
            let not_local = self.parse_export_clause()?;
            if self.token.is_contextual("from") {
                self.advance()?;
                self.parse_module_specifier()?;
                self.parse_import_attributes()?;
            } else if let Some(err) = not_local {
                return Err(err);
            }
            return self.consume_semicolon();
        }

        if self.at_keyword(Keyword::Default) {
            self.advance()?;
            if self.at_keyword(Keyword::Function) {
                return self.parse_function(false, true, false).map(drop);
            }
            if self.token.is_contextual("async") && self.is_async_function()? {
                self.advance()?;
                return self.parse_function(true, true, false).map(drop);
            }
            if self.at_keyword(Keyword::Class) {
                return self.parse_class(true, false).map(drop);
            }
            self.parse_assignment(true)?;
            return self.consume_semicolon();
        }

        if self.at_keyword(Keyword::Var) {
            self.advance()?;
            self.parse_binding_list(BindingKind::Var, false)?;
            return self.consume_semicolon();
        }
        if self.at_keyword(Keyword::Const) {
            return self.parse_lexical_declaration(BindingKind::Const);
        }
        if self.token.is_contextual("let") {
            return self.parse_lexical_declaration(BindingKind::Let);
        }
        if self.at_keyword(Keyword::Function) {
            return self.parse_function_declaration(false);
        }
        if self.token.is_contextual("async") && self.is_async_function()? {
            self.advance()?;
            return self.parse_function_declaration(true);
        }
        if self.at_keyword(Keyword::Class) {
            return self.parse_class(true, true).map(drop);
        }
        Err(self.unexpected())
    }

    /// `{ a, b as c, "d" as e }`. Returns an error for the first name that
    /// can only be exported from another module.
    fn parse_export_clause(&mut self) -> ParseResult<Option<JsError>> {
        self.advance()?;
        let mut not_local = None;
        while !self.at(Punctuator::RBrace) {
            if not_local.is_none() && !matches!(self.token.kind, TokenKind::Identifier(..)) {
                not_local = Some(self.unexpected());
            }
            self.parse_module_export_name()?;
            if self.token.is_contextual("as") {
                self.advance()?;
                self.parse_module_export_name()?;
            }
            if !self.at(Punctuator::RBrace) {
                self.expect(Punctuator::Comma)?;
            }
        }
        self.advance()?;
        Ok(not_local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ErrorKind;

    fn verdict(source: &str, source_type: SourceType) -> Verdict {
        let options = ParseOptions::default().with_source_type(source_type);
        Parser::new(source, options).parse()
    }

    fn accept(source: &str) {
        match verdict(source, SourceType::Script) {
            Verdict::Accept => {}
            Verdict::Reject(err) => panic!("rejected {:?}: {}", source, err),
        }
    }

    fn accept_module(source: &str) {
        match verdict(source, SourceType::Module) {
            Verdict::Accept => {}
            Verdict::Reject(err) => panic!("rejected module {:?}: {}", source, err),
        }
    }

    fn reject(source: &str) -> JsError {
        match verdict(source, SourceType::Script) {
            Verdict::Accept => panic!("accepted {:?}", source),
            Verdict::Reject(err) => err,
        }
    }

    fn reject_module(source: &str) -> JsError {
        match verdict(source, SourceType::Module) {
            Verdict::Accept => panic!("accepted module {:?}", source),
            Verdict::Reject(err) => err,
        }
    }

    fn at(err: &JsError) -> (u32, u32) {
        let position = err.source_position.expect("error without position");
        (position.line, position.column)
    }

    #[test]
    fn test_empty_program() {
        accept("");
        accept("   \n// comment only\n/* block */");
    }

    #[test]
    fn test_semicolon_insertion() {
        accept("a = 1\nb = 2");
        accept("{ a = 1 }");
        accept("a = 1");
        accept("var x = 1\nvar y = 2\n");
    }

    #[test]
    fn test_no_insertion_on_same_line() {
        let err = reject("a = 1 b = 2");
        assert_eq!(err.kind, ErrorKind::SyntaxError);
        assert_eq!(at(&err), (1, 7));
        assert_eq!(err.message, "Unexpected token 'b'");
    }

    #[test]
    fn test_restricted_productions() {
        accept("function f() { return\na + b }");
        accept("a\n++b");
        accept("do {} while (false) foo()");
        accept("x: while (true) { break\nx }");

        let err = reject("throw\nerror");
        assert_eq!(err.message, "Illegal newline after throw");
        assert_eq!(at(&err), (2, 1));

        reject("var a = b\n++");
    }

    #[test]
    fn test_return_outside_function() {
        let err = reject("return 1");
        assert_eq!(err.message, "Illegal return statement");
    }

    #[test]
    fn test_regex_and_division() {
        accept("x = /ab+c/g.test(s)");
        accept("a = b / c / d");
        accept("if (x) /re/.test(y)");
        accept("x = a++ / 2");
        accept("f(/=/)");
        accept("let r = [/a/, /b/]");
    }

    #[test]
    fn test_templates() {
        accept("`plain`");
        accept("`a${b}c${`d${e}`}f`");
        accept("x = `${ {a: 1}.a }`");
        accept("tag`\\unicode`");

        let err = reject("`\\unicode`");
        assert_eq!(err.kind, ErrorKind::LexError);
    }

    #[test]
    fn test_arrow_functions() {
        accept("(a = 1, {b}, [c], ...d) => 0");
        accept("async (x) => await x");
        accept("async x => x");
        accept("x => y => x + y");
        accept("f(() => {})");
        accept("var f = () => ({})");

        let err = reject("(a + b) => 1");
        assert_eq!(err.message, "Malformed arrow function parameter list");
        reject("() \n => 1");
        reject("()");
        reject("(a, b) + 1 => 2");
    }

    #[test]
    fn test_cover_grammar() {
        accept("({a = 1} = x)");
        accept("[a, [b], {c: d}] = x");
        accept("for ({a = 1} of list);");
        accept("[a.b, c[0]] = x");

        let err = reject("({a = 1})");
        assert_eq!(err.message, "Invalid shorthand property initializer");
        assert_eq!(at(&err), (1, 5));

        let err = reject("[a + 1] = x");
        assert_eq!(err.message, "Invalid left-hand side in assignment");
        reject("1 = 2");
        reject("a + b = c");
        reject("++(a + b)");
    }

    #[test]
    fn test_class_declaration() {
        accept(
            "class A extends B {\n\
               #x = 1;\n\
               static y;\n\
               constructor() { super(); this.#x++; }\n\
               get x() { return this.#x; }\n\
               set x(v) { this.#x = v; }\n\
               static { this.y = 1; }\n\
               *gen() { yield 1; }\n\
               async am() { await 1; }\n\
               #priv() {}\n\
               has(o) { return #x in o; }\n\
               static(){}\n\
               get = 2\n\
             }",
        );
        accept("var C = class { method() { return super.method; } }");
    }

    #[test]
    fn test_class_errors() {
        let err = reject("class A { constructor() {} constructor() {} }");
        assert_eq!(err.message, "A class may only have one constructor");

        let err = reject("class A { constructor() { super(); } }");
        assert_eq!(err.message, "'super' keyword unexpected here");

        reject("function f() { super.x; }");
        reject("class A { get constructor() {} }");
        reject("class A { static prototype() {} }");
        reject("class A { #constructor() {} }");
        reject("class A { m() { with (a) {} } }");
        reject("this.#x");
    }

    #[test]
    fn test_strict_mode_rules() {
        let err = reject("'use strict'; with (a) {}");
        assert_eq!(err.message, "Strict mode code may not include a with statement");

        reject("\"use strict\"; 010");
        reject("\"use strict\"; delete x;");
        reject("\"use strict\"; var eval = 1;");
        reject("\"use strict\"; arguments = 1;");
        reject("\"use strict\"; var let = 1;");

        accept("with (a) {}");
        accept("010");
        accept("delete x");
        accept("var eval;");
    }

    #[test]
    fn test_octal_escape_before_use_strict() {
        let err = reject("function f() { \"\\07\"; \"use strict\"; }");
        assert_eq!(err.message, "Octal escape sequences are not allowed in strict mode.");
        assert_eq!(at(&err), (1, 16));
    }

    #[test]
    fn test_use_strict_with_non_simple_parameters() {
        let err = reject("function f(a = 1) { \"use strict\"; }");
        assert_eq!(
            err.message,
            "Illegal 'use strict' directive in function with non-simple parameter list"
        );
        accept("function f(a, b) { \"use strict\"; }");
    }

    #[test]
    fn test_labels() {
        accept("outer: for (;;) { inner: for (;;) { continue outer; } }");
        accept("a: b: while (x) { continue a; }");
        accept("a: { break a; }");
        accept("while (1) { break; }");
        accept("switch (x) { case 1: break; default: }");

        let err = reject("a: { continue a; }");
        assert!(err.message.contains("does not denote an iteration statement"));
        let err = reject("break nope;");
        assert_eq!(err.message, "Undefined label 'nope'");
        reject("a: a: ;");
        reject("break;");
        reject("continue;");
        reject("a: while (1) { (function () { break a; }); }");
    }

    #[test]
    fn test_modules() {
        accept_module(
            "import a, { b as c, default as d } from \"m\";\n\
             import * as ns from 'n';\n\
             import 'side-effect';\n\
             export { c };\n\
             export default function () {}\n\
             export * as all from \"m\";\n\
             export const x = 1;\n\
             export class K {}\n\
             await ns.ready;\n\
             import.meta.url;",
        );
        accept_module("export { a as b } from \"m\";");
        accept_module("import data from './data.json' with { type: 'json' };");

        let err = reject("import a from \"m\";");
        assert_eq!(err.message, "Cannot use import statement outside a module");
        reject("export const x = 1;");
        reject("import.meta");
        reject_module("with (a) {}");
        reject_module("export { \"s\" };");
        reject_module("function f() { import a from 'm'; }");
    }

    #[test]
    fn test_dynamic_import_in_script() {
        accept("import('m').then(f)");
    }

    #[test]
    fn test_operator_mixing() {
        let err = reject("-x ** 2");
        assert!(err.message.starts_with("Unary operator used immediately before exponentiation"));
        accept("(-x) ** 2");
        accept("2 ** -x");
        accept("a ** b ** c");

        reject("a ?? b || c");
        reject("a || b ?? c");
        accept("a ?? (b || c)");
        accept("(a && b) ?? c");
    }

    #[test]
    fn test_optional_chaining() {
        accept("a?.b?.[c]?.(d)");
        reject("a?.b = 1");
        reject("new a?.b()");
        reject("a?.b`t`");
    }

    #[test]
    fn test_nesting_limit() {
        let source = format!("{}x{}", "(".repeat(50), ")".repeat(50));
        let options = ParseOptions::default().with_max_depth(16);
        match Parser::new(&source, options).parse() {
            Verdict::Reject(err) => assert_eq!(err.kind, ErrorKind::TooDeep),
            Verdict::Accept => panic!("nesting limit not enforced"),
        }
        accept(&source);
    }

    #[test]
    fn test_unexpected_end_of_input() {
        let err = reject("function f() { ");
        assert_eq!(err.message, "Unexpected end of input");
        assert_eq!(at(&err), (1, 16));
    }

    #[test]
    fn test_generators_and_async() {
        accept("function* g() { yield; yield* other(); const x = yield 1; }");
        accept("function f() { var yield; }");
        accept("function f() { var await; }");
        accept("async function f() { for await (const x of xs) {} }");
        accept("var o = { async *[Symbol.asyncIterator]() {} }");

        reject("function* g() { var yield; }");
        reject("async function f() { var await; }");
        reject("function f() { for await (x of y); }");
        reject("async () => { var await; }");
    }

    #[test]
    fn test_accessor_arity() {
        let err = reject("({ get a(x) {} })");
        assert_eq!(err.message, "Getter must not have any formal parameters.");
        let err = reject("({ set a() {} })");
        assert_eq!(err.message, "Setter must have exactly one formal parameter.");
        reject("({ set a(...v) {} })");
        accept("({ get a() { return 1; }, set a(v) {} })");
    }

    #[test]
    fn test_new_target() {
        accept("function F() { return new.target; }");
        let err = reject("new.target");
        assert_eq!(err.message, "new.target expression is not allowed here");
    }

    #[test]
    fn test_object_literals() {
        accept(
            "({ a, b: 1, [c]: 2, d() {}, get e() { return 1; }, ...f, 'g': 3, 1: 4, \
             async *h() {}, get: 5, set: 6, async: 7, new: 8 })",
        );
        reject("({ a b })");
        reject("({ 1 })");
    }

    #[test]
    fn test_let_as_identifier() {
        accept("let = 1;");
        accept("var let;");
        accept("let\nx = 1");
        reject("\"use strict\"; let = 1;");
        reject("let let = 1;");
        reject("if (x) let [a] = b;");
    }

    #[test]
    fn test_escaped_keyword_binding() {
        let err = reject("var v\\u0061r = 1;");
        assert_eq!(err.message, "Keyword must not contain escaped characters");
    }

    #[test]
    fn test_declarations() {
        accept("var a, b = 1, [c, ...d] = e, {f, g: h = 2} = i;");
        accept("const { a, ...rest } = obj;");
        reject("const a;");
        reject("let [a];");
        reject("var [...a, b] = c;");
        reject("function f(...a, b) {}");
    }

    #[test]
    fn test_for_heads() {
        accept("for (let x of xs) {}");
        accept("for (var i = 0 in o);");
        accept("for (const k in o) {}");
        accept("for (x of y);");
        accept("for (var i = 0, j = 1; i < j; i++) {}");
        accept("for (;;) break;");

        reject("for (let i = 0 of xs);");
        reject("for (const x;;);");
        reject("for (let a, b of c);");
        reject("for (a + b of c);");
    }

    #[test]
    fn test_statement_positions() {
        accept("if (x) function f() {}");
        reject("\"use strict\"; if (x) function f() {}");
        reject("while (x) function f() {}");
        reject("if (x) const a = 1;");
        reject("while (x) class C {}");
    }

    #[test]
    fn test_switch_and_try() {
        accept("try { a(); } catch { b(); }");
        accept("try { a(); } catch ({ message }) { } finally { c(); }");
        let err = reject("try {}");
        assert_eq!(err.message, "Missing catch or finally after try");
        reject("switch (x) { default: default: }");
    }

    #[test]
    fn test_class_field_arguments() {
        reject("class A { x = arguments; }");
        accept("class A { x = () => this; }");
    }
}
