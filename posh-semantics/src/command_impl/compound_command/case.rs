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

//! Execution of the case command

use crate::expansion::expand_word;
use crate::Command;
use std::ops::ControlFlow::Continue;
use posh_env::semantics::ExitStatus;
use posh_env::semantics::Result;
use posh_env::Env;
use posh_fnmatch::without_escape;
use posh_fnmatch::Config;
use posh_fnmatch::Pattern;
use posh_syntax::syntax::CaseItem;
use posh_syntax::syntax::Word;

fn config() -> Config {
    let mut config = Config::default();
    config.anchor_begin = true;
    config.anchor_end = true;
    config
}

/// Executes the case command.
pub async fn execute(env: &mut Env, subject: &Word, items: &[CaseItem]) -> Result {
    let subject = match expand_word(env, subject).await {
        Ok((expansion, _exit_status)) => expansion,
        Err(error) => todo!("{:?}", error), // TODO return error.handle(env).await,
    };

    for item in items {
        for pattern in &item.patterns {
            // TODO Apply quotes in pattern
            let pattern = match expand_word(env, pattern).await {
                Ok((expansion, _exit_status)) => expansion,
                Err(error) => todo!("{:?}", error), // TODO return error.handle(env).await,
            };

            let pattern = match Pattern::parse_with_config(without_escape(&pattern.value), config())
            {
                Ok(parse) => parse,
                Err(error) => todo!("ignore broken pattern: {:?}", error),
            };
            if pattern.is_match(&subject.value) {
                return item.body.execute(env).await;
            }
        }
    }

    env.exit_status = ExitStatus::SUCCESS;
    Continue(())
}
