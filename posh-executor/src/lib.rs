// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2024 the Posh contributors

#![no_std]
extern crate alloc;

pub fn add(left: u64, right: u64) -> u64 {
    left + right
}
