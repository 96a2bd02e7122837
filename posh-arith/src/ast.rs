// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2022 the Posh contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Abstract syntax tree parser

use crate::token::Operator;
use crate::token::Term;
use crate::token::Token;
use crate::token::TokenError;
use assert_matches::assert_matches;
use std::iter::Peekable;
use std::ops::Range;

// TODO: POSIX does not require the increment/decrement operators. Maybe we
// should provide an option to reject those non-portable operators.

/// Prefix operator kind
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PrefixOperator {
    /// `++`
    Increment,
    /// `--`
    Decrement,
    /// `+`
    NumericCoercion,
    /// `-`
    NumericNegation,
    /// `!`
    LogicalNegation,
    /// `~`
    BitwiseNegation,
}

/// Postfix operator kind
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PostfixOperator {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

/// Postfix operator kind
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BinaryOperator {
    /// `=`
    Assign,
    /// `||`
    LogicalOr,
    /// `&&`
    LogicalAnd,
    /// `|`
    BitwiseOr,
    /// `|=`
    BitwiseOrAssign,
    /// `^`
    BitwiseXor,
    /// `^=`
    BitwiseXorAssign,
    /// `&`
    BitwiseAnd,
    /// `&=`
    BitwiseAndAssign,
    /// `==`
    EqualTo,
    /// `!=`
    NotEqualTo,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `<=`
    LessThanOrEqualTo,
    /// `>=`
    GreaterThanOrEqualTo,
    /// `<<`
    ShiftLeft,
    /// `<<=`
    ShiftLeftAssign,
    /// `>>`
    ShiftRight,
    /// `>>=`
    ShiftRightAssign,
    /// `+`
    Add,
    /// `+=`
    AddAssign,
    /// `-`
    Subtract,
    /// `-=`
    SubtractAssign,
    /// `*`
    Multiply,
    /// `*=`
    MultiplyAssign,
    /// `/`
    Divide,
    /// `/=`
    DivideAssign,
    /// `%`
    Remainder,
    /// `%=`
    RemainderAssign,
}

/// Associativity kind of binary operators
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum Associativity {
    Left,
    Right,
}

impl Operator {
    fn as_prefix(self) -> Option<PrefixOperator> {
        match self {
            Operator::PlusPlus => Some(PrefixOperator::Increment),
            Operator::MinusMinus => Some(PrefixOperator::Decrement),
            Operator::Plus => Some(PrefixOperator::NumericCoercion),
            Operator::Minus => Some(PrefixOperator::NumericNegation),
            Operator::Bang => Some(PrefixOperator::LogicalNegation),
            Operator::Tilde => Some(PrefixOperator::BitwiseNegation),
            _ => None,
        }
    }

    fn as_postfix(self) -> Option<PostfixOperator> {
        match self {
            Operator::PlusPlus => Some(PostfixOperator::Increment),
            Operator::MinusMinus => Some(PostfixOperator::Decrement),
            _ => None,
        }
    }

    fn as_binary(self) -> Option<(BinaryOperator, Associativity)> {
        use Associativity::*;
        use BinaryOperator::*;
        match self {
            Operator::Equal => Some((Assign, Right)),
            Operator::BarEqual => Some((BitwiseOrAssign, Right)),
            Operator::CaretEqual => Some((BitwiseXorAssign, Right)),
            Operator::AndEqual => Some((BitwiseAndAssign, Right)),
            Operator::LessLessEqual => Some((ShiftLeftAssign, Right)),
            Operator::GreaterGreaterEqual => Some((ShiftRightAssign, Right)),
            Operator::PlusEqual => Some((AddAssign, Right)),
            Operator::MinusEqual => Some((SubtractAssign, Right)),
            Operator::AsteriskEqual => Some((MultiplyAssign, Right)),
            Operator::SlashEqual => Some((DivideAssign, Right)),
            Operator::PercentEqual => Some((RemainderAssign, Right)),
            Operator::BarBar => Some((LogicalOr, Left)),
            Operator::AndAnd => Some((LogicalAnd, Left)),
            Operator::Bar => Some((BitwiseOr, Left)),
            Operator::Caret => Some((BitwiseXor, Left)),
            Operator::And => Some((BitwiseAnd, Left)),
            Operator::EqualEqual => Some((EqualTo, Left)),
            Operator::BangEqual => Some((NotEqualTo, Left)),
            Operator::Less => Some((LessThan, Left)),
            Operator::LessEqual => Some((LessThanOrEqualTo, Left)),
            Operator::Greater => Some((GreaterThan, Left)),
            Operator::GreaterEqual => Some((GreaterThanOrEqualTo, Left)),
            Operator::LessLess => Some((ShiftLeft, Left)),
            Operator::GreaterGreater => Some((ShiftRight, Left)),
            Operator::Plus => Some((Add, Left)),
            Operator::Minus => Some((Subtract, Left)),
            Operator::Asterisk => Some((Multiply, Left)),
            Operator::Slash => Some((Divide, Left)),
            Operator::Percent => Some((Remainder, Left)),
            _ => None,
        }
    }

    /// Returns the precedence of the operator.
    ///
    /// If the operator acts as both a unary and binary operator, the result is
    /// the precedence as a binary operator.
    fn precedence(self) -> u8 {
        use Operator::*;
        match self {
            CloseParen | Colon => 0,
            Equal | BarEqual | CaretEqual | AndEqual | LessLessEqual | GreaterGreaterEqual
            | PlusEqual | MinusEqual | AsteriskEqual | SlashEqual | PercentEqual => 1,
            Question => 2,
            BarBar => 3,
            AndAnd => 4,
            Bar => 5,
            Caret => 6,
            And => 7,
            EqualEqual | BangEqual => 8,
            Less | LessEqual | Greater | GreaterEqual => 9,
            LessLess | GreaterGreater => 10,
            Plus | Minus => 11,
            Asterisk | Slash | Percent => 12,
            Tilde | Bang | PlusPlus | MinusMinus | OpenParen => 13,
        }
    }
}

/// Node of an abstract syntax tree (AST)
///
/// A whole AST is meant to be constructed as a vector of `Ast` nodes. A
/// non-leaf node immediately follows its operand node in the vector. If a node
/// has more than one operand, the first operand immediately precedes the
/// second. This scheme makes up the tree in reverse Polish notation.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Ast<'a> {
    /// Term: a constant value or variable
    Term(Term<'a>),
    /// Prefix operator
    ///
    /// This node immediately follows its operand node.
    Prefix {
        /// Operator
        operator: PrefixOperator,
        /// Range of the substring where the operator occurs in the parsed expression
        location: Range<usize>,
    },
    /// Postfix operator
    ///
    /// This node immediately follows its operand node.
    Postfix {
        /// Operator
        operator: PostfixOperator,
        /// Range of the substring where the operator occurs in the parsed expression
        location: Range<usize>,
    },
    /// Binary operator
    ///
    /// This node immediately follows its right-hand-side operand node. The
    /// right-hand-side operand tree in turn follows the left-hand-side.
    Binary {
        /// Operator
        operator: BinaryOperator,
        /// Length (number of `Ast` nodes) of the right-hand-side operand tree
        rhs_len: usize,
        /// Range of the substring where the operator occurs in the parsed expression
        location: Range<usize>,
    },
    /// Conditional ternary operator
    ///
    /// This node has three child nodes: the condition, the then value, and the
    /// else value. They appear in the `Ast` vector in this order and are
    /// immediately followed by this `Conditional` node.
    Conditional {
        /// Length (number of `Ast` nodes) of the then value tree
        then_len: usize,
        /// Length (number of `Ast` nodes) of the else value tree
        else_len: usize,
    },
}

/// Cause of a syntax error
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SyntaxError {
    /// Error in tokenization
    TokenError(TokenError),
    // TODO
}

impl From<TokenError> for SyntaxError {
    fn from(e: TokenError) -> Self {
        SyntaxError::TokenError(e)
    }
}

/// Description of an error that occurred during expansion
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Error {
    /// Cause of the error
    pub cause: SyntaxError,
    /// Range of the substring in the evaluated expression string where the error occurred
    pub location: Range<usize>,
}

impl From<crate::token::Error> for Error {
    fn from(e: crate::token::Error) -> Self {
        Error {
            cause: e.cause.into(),
            location: e.location,
        }
    }
}

/// Parses postfix operators
fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, result: &mut Vec<Ast<'a>>) -> Result<(), Error>
where
    I: Iterator<Item = Result<Token<'a>, crate::token::Error>>,
{
    while let Some(&Ok(Token::Operator { operator, .. })) = tokens.peek() {
        let operator = match operator.as_postfix() {
            Some(operator) => operator,
            None => break,
        };
        let location =
            assert_matches!(tokens.next(), Some(Ok(Token::Operator { location, .. })) => location);
        result.push(Ast::Postfix { operator, location });
    }
    Ok(())
}

/// Parses a leaf expression.
///
/// A leaf expression is a term or parenthesized expression, optionally modified
/// by unary operators.
fn parse_leaf<'a, I>(tokens: &mut Peekable<I>, result: &mut Vec<Ast<'a>>) -> Result<(), Error>
where
    I: Iterator<Item = Result<Token<'a>, crate::token::Error>>,
{
    let token = tokens
        .next()
        .transpose()?
        .expect("TODO: handle empty expression error");
    match token {
        Token::Term(term) => {
            result.push(Ast::Term(term));
            parse_postfix(tokens, result)
        }

        Token::Operator { operator, .. } if operator == Operator::OpenParen => {
            parse_tree(tokens, 1, result)?;

            // TODO Reject if a closing parenthesis is missing
            tokens.next().transpose()?;

            parse_postfix(tokens, result)
        }

        Token::Operator { operator, location } => {
            let operator = operator.as_prefix().expect("TODO: handle syntax error");
            parse_leaf(tokens, result)?;
            result.push(Ast::Prefix { operator, location });
            Ok(())
        }
    }
}

/// Parses the right-hand-side operand of a binary operation and pushes the
/// operator to the result.
fn parse_binary_rhs<'a, I>(
    tokens: &mut Peekable<I>,
    operator: BinaryOperator,
    location: Range<usize>,
    min_precedence: u8,
    result: &mut Vec<Ast<'a>>,
) -> Result<(), Error>
where
    I: Iterator<Item = Result<Token<'a>, crate::token::Error>>,
{
    let old_len = result.len();
    parse_tree(tokens, min_precedence, result)?;
    result.push(Ast::Binary {
        operator,
        rhs_len: result.len() - old_len,
        location,
    });
    Ok(())
}

/// Parses a expression that may contain binary and ternary operators.
///
/// This function consumes binary operators with precedence equal to or greater
/// than the given minimum precedence, which must be greater than 0.
fn parse_tree<'a, I>(
    tokens: &mut Peekable<I>,
    min_precedence: u8,
    result: &mut Vec<Ast<'a>>,
) -> Result<(), Error>
where
    I: Iterator<Item = Result<Token<'a>, crate::token::Error>>,
{
    parse_leaf(tokens, result)?;

    while let Some(&Ok(Token::Operator { operator, .. })) = tokens.peek() {
        let precedence = operator.precedence();
        if precedence < min_precedence {
            break;
        }

        let location =
            assert_matches!(tokens.next(), Some(Ok(Token::Operator { location, .. })) => location);

        use Operator::*;
        if operator == Question {
            let then_index = result.len();
            parse_tree(tokens, 1, result)?;

            // TODO Reject if a colon is missing
            tokens.next().transpose()?;

            let else_index = result.len();
            parse_tree(tokens, precedence, result)?;

            result.push(Ast::Conditional {
                then_len: else_index - then_index,
                else_len: result.len() - else_index,
            });
            continue;
        }

        let (operator, associativity) = operator.as_binary().expect("TODO: unsupported operator");
        let rhs_precedence = match associativity {
            Associativity::Left => precedence + 1,
            Associativity::Right => precedence,
        };
        parse_binary_rhs(tokens, operator, location, rhs_precedence, result)?
    }
    Ok(())
}

/// Parses the whole expression.
///
/// A successful parse is returned as a non-empty vector of `Ast` nodes, where
/// the last node is the root.
pub fn parse<'a, I>(mut tokens: Peekable<I>) -> Result<Vec<Ast<'a>>, Error>
where
    I: Iterator<Item = Result<Token<'a>, crate::token::Error>>,
{
    let mut result = Vec::new();
    parse_tree(&mut tokens, 1, &mut result)?;
    // TODO Reject if there are unparsed tokens
    Ok(result)
}
