// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod collaborators;
mod env;

pub(crate) use collaborators::{MonoShaper, SimpleAnalyzer, TestFonts};
pub(crate) use env::{runs_for, style, typeset, typeset_para, CHAR_W, LINE_H, SIZE};
