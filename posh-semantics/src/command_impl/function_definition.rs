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

//! Implementations of function definition semantics.

use crate::expansion::expand_word;
use crate::expansion::Field;
use crate::Command;
use crate::Handle;
use async_trait::async_trait;
use std::ops::ControlFlow::Continue;
use std::rc::Rc;
use posh_env::function::Function;
use posh_env::function::HashEntry;
use posh_env::semantics::ExitStatus;
use posh_env::semantics::Result;
use posh_env::Env;
use posh_syntax::syntax;

#[async_trait(?Send)]
impl Command for syntax::FunctionDefinition {
    /// Executes the function definition command.
    ///
    /// First, the function name is [expanded](expand_word). If the expansion
    /// fails, the execution ends with a non-zero exit status. Next, the
    /// environment is examined for an existing function having the same name.
    /// If there is such a function that is read-only, the execution ends with a
    /// non-zero exit status. Finally, the function definition is inserted into
    /// the environment, and the execution ends with an exit status of zero.
    async fn execute(&self, env: &mut Env) -> Result {
        // Expand the function name
        let Field {
            value: name,
            origin,
        } = match expand_word(env, &self.name).await {
            Ok(field) => field,
            Err(error) => return error.handle(env).await,
        };

        // Avoid overwriting a read-only function
        if let Some(function) = env.functions.get(name.as_str()) {
            if function.0.is_read_only {
                // TODO Use pretty::Message and annotate_snippet
                env.print_error(format_args!(
                    "cannot re-define read-only function {:?}",
                    name
                ))
                .await;
                env.exit_status = ExitStatus::ERROR;
                return Continue(());
            }
        }

        // Define the function
        let function = Function {
            name,
            body: Rc::clone(&self.body),
            origin,
            is_read_only: false,
        };
        let entry = HashEntry(Rc::new(function));
        env.functions.replace(entry);
        env.exit_status = ExitStatus::SUCCESS;
        Continue(())
    }
}
