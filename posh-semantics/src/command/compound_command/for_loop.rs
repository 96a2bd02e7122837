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

//! Execution of the for loop

use crate::assign::Error;
use crate::assign::ErrorCause;
use crate::command::Command;
use crate::expansion::expand_word;
use crate::expansion::expand_words;
use crate::expansion::AssignReadOnlyError;
use crate::xtrace::print;
use crate::xtrace::trace_fields;
use crate::xtrace::XTrace;
use crate::Handle;
use std::fmt::Write;
use std::ops::ControlFlow::{Break, Continue};
use posh_env::semantics::Divert;
use posh_env::semantics::ExitStatus;
use posh_env::semantics::Field;
use posh_env::semantics::Result;
use posh_env::stack::Frame;
use posh_env::variable::Scope;
use posh_env::Env;
use posh_quote::quoted;
use posh_syntax::syntax::List;
use posh_syntax::syntax::Word;

/// Executes the for loop.
pub async fn execute(
    env: &mut Env,
    name: &Word,
    values: &Option<Vec<Word>>,
    body: &List,
) -> Result {
    let (name, _) = match expand_word(env, name).await {
        Ok(word) => word,
        Err(error) => return error.handle(env).await,
    };

    let values = if let Some(words) = values {
        match expand_words(env, words).await {
            Ok((fields, _)) => fields,
            Err(error) => return error.handle(env).await,
        }
    } else {
        env.variables
            .positional_params()
            .values
            .iter()
            .map(|value| Field {
                value: value.clone(),
                origin: name.origin.clone(),
            })
            .collect()
    };

    trace_values(env, &name, &values).await;

    let env = &mut env.push_frame(Frame::Loop);

    if values.is_empty() && !body.0.is_empty() {
        env.exit_status = ExitStatus::SUCCESS;
        return Continue(());
    }

    for Field { value, origin } in values {
        let mut var = env.get_or_create_variable(name.value.clone(), Scope::Global);
        match var.assign(value, origin) {
            Ok(_) => match body.execute(env).await {
                Break(Divert::Break { count: 0 }) => break,
                Break(Divert::Break { count }) => return Break(Divert::Break { count: count - 1 }),
                Break(Divert::Continue { count: 0 }) => continue,
                Break(Divert::Continue { count }) => {
                    return Break(Divert::Continue { count: count - 1 })
                }
                other => other?,
            },
            Err(error) => {
                let cause = ErrorCause::AssignReadOnly(AssignReadOnlyError {
                    name: name.value,
                    new_value: error.new_value,
                    read_only_location: error.read_only_location,
                    vacancy: None,
                });
                let location = name.origin;
                let error = Error { cause, location };
                return error.handle(env).await;
            }
        };
    }

    Continue(())
}

async fn trace_values(env: &mut Env, name: &Field, values: &[Field]) {
    if let Some(mut xtrace) = XTrace::from_options(&env.options) {
        write!(xtrace.words(), "for {} in ", quoted(&name.value)).unwrap();
        trace_fields(Some(&mut xtrace), values);
        print(env, xtrace).await;
    }
}
