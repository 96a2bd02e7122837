// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2021 the Posh contributors
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

//! Parameter expansion semantics.

use super::Env;
use super::Expand;
use super::Expansion;
use super::Origin;
use super::Output;
use super::Result;
use async_trait::async_trait;
use std::borrow::Cow;
use std::num::IntErrorKind::PosOverflow;
use posh_env::variable::Value;
use posh_syntax::source::Span;
use posh_syntax::syntax::Param;

enum ParamValue<'a> {
    Unset,
    Scalar(Cow<'a, str>),
    Array(Cow<'a, [String]>),
}

impl From<String> for ParamValue<'static> {
    fn from(value: String) -> Self {
        ParamValue::Scalar(Cow::Owned(value))
    }
}

impl<'a> From<&'a str> for ParamValue<'a> {
    fn from(value: &'a str) -> Self {
        ParamValue::Scalar(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for ParamValue<'a> {
    fn from(value: &'a String) -> Self {
        ParamValue::Scalar(Cow::Borrowed(value))
    }
}

impl From<Vec<String>> for ParamValue<'static> {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Array(Cow::Owned(values))
    }
}

impl<'a> From<&'a [String]> for ParamValue<'a> {
    fn from(values: &'a [String]) -> Self {
        ParamValue::Array(Cow::Borrowed(values))
    }
}

impl<'a> From<&'a Vec<String>> for ParamValue<'a> {
    fn from(values: &'a Vec<String>) -> Self {
        ParamValue::Array(Cow::Borrowed(values))
    }
}

impl From<Value> for ParamValue<'static> {
    fn from(value: Value) -> Self {
        match value {
            Value::Scalar(value) => ParamValue::from(value),
            Value::Array(values) => ParamValue::from(values),
        }
    }
}

impl<'a> From<&'a Value> for ParamValue<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Scalar(value) => ParamValue::from(value),
            Value::Array(values) => ParamValue::from(values),
        }
    }
}

/// Expands a special parameter.
///
/// Returns `None` if the `name` is not a special parameter name.
fn expand_special_parameter<'a, E: Env>(env: &'a mut E, name: &str) -> Option<ParamValue<'a>> {
    let mut chars = name.chars();
    let name_char = chars.next()?;
    if chars.next().is_some() {
        // A special parameter's name is always a single character.
        return None;
    }
    match name_char {
        '@' => todo!(),
        '*' => todo!(),
        '#' => todo!(),
        '?' => Some(env.exit_status().to_string().into()),
        '-' => todo!(),
        '$' => todo!(),
        '!' => Some(env.last_async_pid().to_string().into()),
        '0' => todo!(),
        _ => None,
    }
}

/// Expands a positional parameter.
///
/// Returns `None` if the `name` is not a positive integer.
fn expand_positional_param<'a, E: Env>(env: &'a E, name: &str) -> Option<ParamValue<'a>> {
    let index_0 = match name.parse::<usize>() {
        Ok(index_1) if index_1 > 0 => index_1 - 1,
        Err(error) if error.kind() == &PosOverflow => return Some(ParamValue::Unset),
        _ => return None, // Not a positional parameter
    };
    let params = env.positional_params();
    match &params.value {
        Value::Scalar(value) => match index_0 {
            0 => Some(ParamValue::from(value)),
            _ => Some(ParamValue::Unset),
        },
        Value::Array(values) => match values.get(index_0) {
            Some(value) => Some(ParamValue::from(value)),
            None => Some(ParamValue::Unset),
        },
    }
}

fn expand_variable<'a, E: Env>(env: &'a E, name: &str) -> ParamValue<'a> {
    match env.get_variable(name) {
        Some(v) => ParamValue::from(&v.value),
        None => ParamValue::Unset,
    }
}

/// Reference to a `RawParam` or `BracedParam`.
pub struct ParamRef<'a> {
    name: &'a str,
    #[allow(unused)] // TODO Use this
    span: &'a Span,
}

impl<'a> ParamRef<'a> {
    pub fn from_name_and_location(name: &'a str, span: &'a Span) -> Self {
        ParamRef { name, span }
    }
}

impl<'a> From<&'a Param> for ParamRef<'a> {
    fn from(param: &'a Param) -> Self {
        ParamRef {
            name: &param.name,
            span: &param.span,
        }
    }
}

#[async_trait(?Send)]
impl Expand for ParamRef<'_> {
    async fn expand<E: Env>(&self, env: &mut E, output: &mut Output<'_>) -> Result {
        let value = if let Some(value) = expand_special_parameter(env, self.name) {
            value
        } else {
            expand_positional_param(env, self.name)
                .unwrap_or_else(|| expand_variable(env, self.name))
        };
        match value {
            ParamValue::Unset => (),
            ParamValue::Scalar(value) => {
                output.push_str(&value, Origin::SoftExpansion, false, false)
            }
            ParamValue::Array(values) => {
                todo!("expand array values: {:?}", values)
            }
        };
        Ok(())
    }
}
