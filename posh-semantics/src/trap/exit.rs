// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2023 the Posh contributors
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

//! Running the EXIT trap

use crate::ReadEvalLoop;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use posh_env::semantics::Result;
use posh_env::stack::Frame;
use posh_env::trap::Action;
use posh_env::trap::Condition;
use posh_env::Env;
use posh_syntax::parser::lex::Lexer;
use posh_syntax::source::Source;

/// Executes the EXIT trap.
///
/// If the EXIT trap is not set in the environment, this function does nothing.
/// Otherwise, this function executes the EXIT trap and then executes signal
/// traps that have been queued while the EXIT trap.
///
/// The exit status of the trap is ignored: The exit status is saved on entry to
/// this function and restored when finished.
pub async fn run_exit_trap(env: &mut Env) -> Result {
    if let Some(state) = env.traps.get_state(Condition::Exit).0 {
        if let Action::Command(command) = &state.action {
            let command = Rc::clone(command);

            let condition = Condition::Exit.to_string();
            let origin = state.origin.clone();
            let mut lexer = Lexer::from_memory(&command, Source::Trap { condition, origin });
            let mut env = env.push_frame(Frame::Trap);
            let previous_exit_status = env.exit_status;
            // Boxing needed for recursion
            let future: Pin<Box<dyn Future<Output = Result>>> =
                Box::pin(ReadEvalLoop::new(&mut env, &mut lexer).run());
            let result = future.await;
            env.exit_status = previous_exit_status;
            return result;
        }
    }

    Result::Continue(())
}
