// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2024 the Posh contributors
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

//! Computation of the new file mode creation mask.
//!
//! This module contains a function that computes a new file mode creation mask
//! from the current mask and a command. It is part of the implementation of the
//! `umask` built-in. (See [`Command::execute`].)

use super::Command;
use super::symbol::{Operator, Permission};

/// Computes a mask to be set.
///
/// This function applies the given command to the current mask and returns the
/// result. The current mask and the result are both given as negative bits of
/// the file mode creation mask.
#[must_use]
pub fn new_mask(current: u16, command: &Command) -> u16 {
    match command {
        Command::Show { .. } => current,

        Command::Set(clauses) => {
            let mut result = current;
            for clause in clauses {
                for action in &clause.actions {
                    let resolution = match action.permission {
                        Permission::CopyUser => copy(current >> 6),
                        Permission::CopyGroup => copy(current >> 3),
                        Permission::CopyOther => copy(current),
                        Permission::Literal {
                            mask,
                            conditional_executable,
                        } => {
                            let add_x = conditional_executable && current & 0o111 != 0;
                            mask | (if add_x { 0o111 } else { 0 })
                        }
                    };
                    let who = clause.who.mask;
                    result = match action.operator {
                        Operator::Add => (resolution & who) | result,
                        Operator::Remove => !(resolution & who) & result,
                        Operator::Set => (resolution & who) | (result & !who),
                    };
                }
            }
            result
        }
    }
}

fn copy(mask: u16) -> u16 {
    let mask = mask & 0o7;
    (mask << 6) | (mask << 3) | mask
}
