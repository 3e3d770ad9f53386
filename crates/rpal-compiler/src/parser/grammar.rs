//! Grammar productions.
//!
//! Each method implements one production of the RPAL grammar; the
//! original left-recursive rules are iterated. Reductions append to the
//! post-order node stack via [`Parser::leaf`] and [`Parser::reduce`].

use super::Parser;
use crate::ast::{CompareOp, NodeKind};
use crate::diagnostics::Diagnostic;
use crate::lexer::TokenKind;

type ParseResult = Result<(), Diagnostic>;

impl Parser<'_> {
    /// `E -> 'let' D 'in' E => let | 'fn' Vb+ '.' E => lambda | Ew`
    pub(super) fn parse_expr(&mut self) -> ParseResult {
        self.enter()?;
        match self.peek_kind() {
            Some(TokenKind::Let) => {
                self.bump();
                self.parse_def()?;
                self.expect(TokenKind::In, "`in` after the definitions of `let`")?;
                self.parse_expr()?;
                self.reduce(NodeKind::Let, 2);
            }
            Some(TokenKind::Fn) => {
                self.bump();
                let mut params = 0;
                while self.at_param_start() {
                    self.parse_param()?;
                    params += 1;
                }
                if params == 0 {
                    return Err(self.expected_here("at least one parameter after `fn`"));
                }
                self.expect_op(".", "`.` after the parameters of `fn`")?;
                self.parse_expr()?;
                self.reduce(NodeKind::Lambda, params + 1);
            }
            _ => self.parse_where()?,
        }
        self.leave();
        Ok(())
    }

    /// `Ew -> T 'where' Dr => where | T`
    fn parse_where(&mut self) -> ParseResult {
        self.parse_tuple()?;
        if self.eat(TokenKind::Where) {
            self.parse_def_rec()?;
            self.reduce(NodeKind::Where, 2);
        }
        Ok(())
    }

    /// `T -> Ta (',' Ta)+ => tau | Ta`
    fn parse_tuple(&mut self) -> ParseResult {
        self.parse_aug()?;
        let mut elements = 1;
        while self.eat(TokenKind::Comma) {
            self.parse_aug()?;
            elements += 1;
        }
        if elements > 1 {
            self.reduce(NodeKind::Tau, elements);
        }
        Ok(())
    }

    /// `Ta -> Ta 'aug' Tc => aug | Tc`, iterated left-associatively.
    fn parse_aug(&mut self) -> ParseResult {
        self.parse_cond()?;
        while self.eat(TokenKind::Aug) {
            self.parse_cond()?;
            self.reduce(NodeKind::Aug, 2);
        }
        Ok(())
    }

    /// `Tc -> B '->' Tc '|' Tc => -> | B`
    fn parse_cond(&mut self) -> ParseResult {
        self.enter()?;
        self.parse_or()?;
        if self.eat_op("->") {
            self.parse_cond()?;
            self.expect_op("|", "`|` between the branches of a conditional")?;
            self.parse_cond()?;
            self.reduce(NodeKind::Cond, 3);
        }
        self.leave();
        Ok(())
    }

    /// `B -> B 'or' Bt => or | Bt`
    fn parse_or(&mut self) -> ParseResult {
        self.parse_and()?;
        while self.eat(TokenKind::Or) {
            self.parse_and()?;
            self.reduce(NodeKind::Or, 2);
        }
        Ok(())
    }

    /// `Bt -> Bt '&' Bs => & | Bs`
    fn parse_and(&mut self) -> ParseResult {
        self.parse_not()?;
        while self.eat_op("&") {
            self.parse_not()?;
            self.reduce(NodeKind::Amp, 2);
        }
        Ok(())
    }

    /// `Bs -> 'not' Bp => not | Bp`
    fn parse_not(&mut self) -> ParseResult {
        if self.eat(TokenKind::Not) {
            self.parse_compare()?;
            self.reduce(NodeKind::Not, 1);
        } else {
            self.parse_compare()?;
        }
        Ok(())
    }

    /// `Bp -> A (cmp A)? => compare`. The symbolic spellings normalize to
    /// their keyword forms.
    fn parse_compare(&mut self) -> ParseResult {
        self.parse_arith()?;
        let op = match self.peek_kind() {
            Some(TokenKind::Gr) => Some(CompareOp::Gr),
            Some(TokenKind::Ge) => Some(CompareOp::Ge),
            Some(TokenKind::Ls) => Some(CompareOp::Ls),
            Some(TokenKind::Le) => Some(CompareOp::Le),
            Some(TokenKind::Eq) => Some(CompareOp::Eq),
            Some(TokenKind::Ne) => Some(CompareOp::Ne),
            Some(TokenKind::Op(">")) => Some(CompareOp::Gr),
            Some(TokenKind::Op(">=")) => Some(CompareOp::Ge),
            Some(TokenKind::Op("<")) => Some(CompareOp::Ls),
            Some(TokenKind::Op("<=")) => Some(CompareOp::Le),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            self.parse_arith()?;
            self.reduce(NodeKind::Compare(op), 2);
        }
        Ok(())
    }

    /// `A -> ('+'|'-')? At (('+'|'-') At)*`; unary `-` reduces to `neg`.
    fn parse_arith(&mut self) -> ParseResult {
        if self.eat_op("+") {
            self.parse_term()?;
        } else if self.eat_op("-") {
            self.parse_term()?;
            self.reduce(NodeKind::Neg, 1);
        } else {
            self.parse_term()?;
        }

        loop {
            if self.eat_op("+") {
                self.parse_term()?;
                self.reduce(NodeKind::Add, 2);
            } else if self.eat_op("-") {
                self.parse_term()?;
                self.reduce(NodeKind::Sub, 2);
            } else {
                break;
            }
        }
        Ok(())
    }

    /// `At -> At ('*'|'/') Af | Af`, iterated.
    fn parse_term(&mut self) -> ParseResult {
        self.parse_power()?;
        loop {
            if self.eat_op("*") {
                self.parse_power()?;
                self.reduce(NodeKind::Mul, 2);
            } else if self.eat_op("/") {
                self.parse_power()?;
                self.reduce(NodeKind::Div, 2);
            } else {
                break;
            }
        }
        Ok(())
    }

    /// `Af -> Ap '**' Af => ** | Ap` (right-associative).
    fn parse_power(&mut self) -> ParseResult {
        self.enter()?;
        self.parse_select()?;
        if self.eat_op("**") {
            self.parse_power()?;
            self.reduce(NodeKind::Pow, 2);
        }
        self.leave();
        Ok(())
    }

    /// `Ap -> Ap '@' '<id>' R => @ | R`, iterated.
    fn parse_select(&mut self) -> ParseResult {
        self.parse_app()?;
        while self.eat_op("@") {
            match self.peek_kind() {
                Some(TokenKind::Ident(name)) => {
                    self.leaf(NodeKind::Id(name.to_string()));
                    self.bump();
                }
                _ => return Err(self.expected_here("an identifier after `@`")),
            }
            self.parse_app()?;
            self.reduce(NodeKind::At, 3);
        }
        Ok(())
    }

    /// `R -> R Rn => gamma | Rn`: application by juxtaposition, iterated
    /// left-associatively.
    fn parse_app(&mut self) -> ParseResult {
        self.parse_atom()?;
        while self.at_atom_start() {
            self.parse_atom()?;
            self.reduce(NodeKind::Gamma, 2);
        }
        Ok(())
    }

    fn at_atom_start(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(
                TokenKind::Ident(_)
                    | TokenKind::Int(_)
                    | TokenKind::Str(_)
                    | TokenKind::True
                    | TokenKind::False
                    | TokenKind::Nil
                    | TokenKind::Dummy
                    | TokenKind::LParen
            )
        )
    }

    /// `Rn -> <id> | <int> | <string> | 'true' | 'false' | 'nil' | 'dummy'
    /// | '(' E ')'`
    fn parse_atom(&mut self) -> ParseResult {
        self.enter()?;
        match self.peek_kind() {
            Some(TokenKind::Ident(name)) => {
                self.leaf(NodeKind::Id(name.to_string()));
                self.bump();
            }
            Some(TokenKind::Int(lexeme)) => {
                self.leaf(NodeKind::Int(lexeme.to_string()));
                self.bump();
            }
            Some(TokenKind::Str(lexeme)) => {
                self.leaf(NodeKind::Str(lexeme.to_string()));
                self.bump();
            }
            Some(TokenKind::True) => {
                self.leaf(NodeKind::True);
                self.bump();
            }
            Some(TokenKind::False) => {
                self.leaf(NodeKind::False);
                self.bump();
            }
            Some(TokenKind::Nil) => {
                self.leaf(NodeKind::Nil);
                self.bump();
            }
            Some(TokenKind::Dummy) => {
                self.leaf(NodeKind::Dummy);
                self.bump();
            }
            Some(TokenKind::LParen) => {
                self.bump();
                self.parse_expr()?;
                self.expect(TokenKind::RParen, "`)` to close the parenthesized expression")?;
            }
            _ => return Err(self.expected_here("an expression")),
        }
        self.leave();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Definitions
    // ------------------------------------------------------------------

    /// `D -> Da 'within' D => within | Da`
    pub(super) fn parse_def(&mut self) -> ParseResult {
        self.enter()?;
        self.parse_def_and()?;
        if self.eat(TokenKind::Within) {
            self.parse_def()?;
            self.reduce(NodeKind::Within, 2);
        }
        self.leave();
        Ok(())
    }

    /// `Da -> Dr ('and' Dr)+ => and | Dr`
    fn parse_def_and(&mut self) -> ParseResult {
        self.parse_def_rec()?;
        let mut defs = 1;
        while self.eat(TokenKind::And) {
            self.parse_def_rec()?;
            defs += 1;
        }
        if defs > 1 {
            self.reduce(NodeKind::And, defs);
        }
        Ok(())
    }

    /// `Dr -> 'rec' Db => rec | Db`
    fn parse_def_rec(&mut self) -> ParseResult {
        let is_rec = self.eat(TokenKind::Rec);
        self.parse_def_body()?;
        if is_rec {
            self.reduce(NodeKind::Rec, 1);
        }
        Ok(())
    }

    /// `Db -> '(' D ')' | <id> Vb+ '=' E => fcn_form | <id> '=' E => =
    /// | Vl '=' E`
    ///
    /// The branch is picked from the token after the leading identifier:
    /// another identifier or `(` means a function form, `=` a simple
    /// binding, `,` a variable-list binding.
    fn parse_def_body(&mut self) -> ParseResult {
        self.enter()?;
        match self.peek_kind() {
            Some(TokenKind::LParen) => {
                self.bump();
                self.parse_def()?;
                self.expect(TokenKind::RParen, "`)` to close the grouped definition")?;
            }
            Some(TokenKind::Ident(name)) => match self.nth_kind(1) {
                Some(TokenKind::LParen | TokenKind::Ident(_)) => {
                    self.leaf(NodeKind::Id(name.to_string()));
                    self.bump();
                    let mut params = 1;
                    while self.at_param_start() {
                        self.parse_param()?;
                        params += 1;
                    }
                    self.expect_op("=", "`=` after the parameters of the function form")?;
                    self.parse_expr()?;
                    self.reduce(NodeKind::FcnForm, params + 1);
                }
                Some(TokenKind::Op("=")) => {
                    self.leaf(NodeKind::Id(name.to_string()));
                    self.bump();
                    self.bump();
                    self.parse_expr()?;
                    self.reduce(NodeKind::Bind, 2);
                }
                Some(TokenKind::Comma) => {
                    self.parse_var_list()?;
                    self.expect_op("=", "`=` after the variable list")?;
                    self.parse_expr()?;
                    self.reduce(NodeKind::Bind, 2);
                }
                _ => {
                    return Err(self.expected_here("parameters, `=` or `,` in the definition"));
                }
            },
            _ => return Err(self.expected_here("a definition")),
        }
        self.leave();
        Ok(())
    }

    fn at_param_start(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(TokenKind::Ident(_) | TokenKind::LParen)
        )
    }

    /// `Vb -> <id> | '(' Vl ')' | '(' ')' => ()`
    fn parse_param(&mut self) -> ParseResult {
        match self.peek_kind() {
            Some(TokenKind::Ident(name)) => {
                self.leaf(NodeKind::Id(name.to_string()));
                self.bump();
                Ok(())
            }
            Some(TokenKind::LParen) => {
                self.bump();
                let has_names = matches!(self.peek_kind(), Some(TokenKind::Ident(_)));
                if has_names {
                    self.parse_var_list()?;
                }
                self.expect(TokenKind::RParen, "`)` to close the parameter list")?;
                if !has_names {
                    self.leaf(NodeKind::Unit);
                }
                Ok(())
            }
            _ => Err(self.expected_here("a parameter name or `(`")),
        }
    }

    /// `Vl -> <id> (',' <id>)* => ,` (reduced only for two or more names).
    fn parse_var_list(&mut self) -> ParseResult {
        let mut names = 0;
        loop {
            match self.peek_kind() {
                Some(TokenKind::Ident(name)) => {
                    self.leaf(NodeKind::Id(name.to_string()));
                    self.bump();
                    names += 1;
                }
                _ => return Err(self.expected_here("an identifier in the variable list")),
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        if names > 1 {
            self.reduce(NodeKind::Comma, names);
        }
        Ok(())
    }
}
