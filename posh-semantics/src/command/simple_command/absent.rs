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

//! Simple command semantics for the absent target

use super::perform_assignments;
use crate::redir::RedirGuard;
use crate::xtrace::print;
use crate::xtrace::XTrace;
use crate::Handle;
use itertools::Itertools;
use std::ops::ControlFlow::{Break, Continue};
use std::rc::Rc;
use posh_env::io::print_error;
use posh_env::job::Job;
use posh_env::job::ProcessResult;
use posh_env::job::ProcessState;
use posh_env::semantics::Divert;
use posh_env::semantics::ExitStatus;
use posh_env::semantics::Result;
use posh_env::subshell::JobControl;
use posh_env::subshell::Subshell;
use posh_env::Env;
use posh_syntax::syntax::Assign;
use posh_syntax::syntax::Redir;

pub async fn execute_absent_target(
    env: &mut Env,
    assigns: &[Assign],
    redirs: &Rc<Vec<Redir>>,
    exit_status: ExitStatus,
) -> Result {
    // Perform redirections in a subshell
    let redir_exit_status = if let Some(redir) = redirs.first() {
        let first_redir_location = redir.body.operand().location.clone();
        let redirs_2 = Rc::clone(redirs);
        let subshell = Subshell::new(move |env, _job_control| {
            Box::pin(async move {
                let env = &mut RedirGuard::new(env);
                let mut xtrace = XTrace::from_options(&env.options);

                let redir_exit_status =
                    match env.perform_redirs(redirs_2.iter(), xtrace.as_mut()).await {
                        Ok(exit_status) => exit_status,
                        Err(e) => {
                            e.handle(env).await?;
                            return Break(Divert::Exit(None));
                        }
                    };

                print(env, xtrace).await;

                env.exit_status = redir_exit_status.unwrap_or(exit_status);
                Continue(())
            })
        })
        .job_control(JobControl::Foreground);

        match subshell.start_and_wait(env).await {
            Ok((pid, state)) => {
                if let ProcessState::Halted(ProcessResult::Stopped(_)) = state {
                    let mut job = Job::new(pid);
                    job.job_controlled = true;
                    job.state = state;
                    job.name = redirs
                        .iter()
                        .format_with(" ", |redir, f| f(&format_args!("{redir}")))
                        .to_string();
                    env.jobs.add(job);
                }

                state.try_into().unwrap()
            }
            Err(errno) => {
                print_error(
                    env,
                    "cannot start subshell to perform redirection".into(),
                    errno.desc().into(),
                    &first_redir_location,
                )
                .await;
                return Break(Divert::Interrupt(Some(ExitStatus::ERROR)));
            }
        }
    } else {
        exit_status
    };

    // Perform assignments in the current shell
    let mut xtrace = XTrace::from_options(&env.options);
    let assignment_exit_status = perform_assignments(env, assigns, false, xtrace.as_mut()).await?;
    print(env, xtrace).await;
    env.exit_status = assignment_exit_status.unwrap_or(redir_exit_status);
    Continue(())
}
