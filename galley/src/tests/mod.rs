// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod test_breaker;
mod test_typeset;
mod utils;
