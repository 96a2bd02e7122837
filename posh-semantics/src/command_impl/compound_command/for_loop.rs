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
use crate::expansion::expand_word;
use crate::expansion::expand_words;
use crate::Command;
use crate::Handle;
use std::ops::ControlFlow::Continue;
use posh_env::semantics::Field;
use posh_env::semantics::Result;
use posh_env::variable::Scope;
use posh_env::variable::Value::{Array, Scalar};
use posh_env::variable::Variable;
use posh_env::Env;
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
        match env.variables.positional_params().value {
            Scalar(ref value) => vec![Field {
                value: value.clone(),
                origin: name.origin.clone(),
            }],
            Array(ref values) => values
                .iter()
                .map(|value| Field {
                    value: value.clone(),
                    origin: name.origin.clone(),
                })
                .collect(),
        }
    };

    for Field { value, origin } in values {
        let var = Variable {
            value: Scalar(value),
            last_assigned_location: Some(origin),
            is_exported: false,
            read_only_location: None,
        };
        match env.variables.assign(Scope::Global, name.value.clone(), var) {
            Ok(_) => body.execute(env).await?,
            Err(error) => {
                let cause = ErrorCause::AssignReadOnly(error);
                let location = name.origin;
                let error = Error { cause, location };
                return error.handle(env).await;
            }
        };
    }

    Continue(())
}
