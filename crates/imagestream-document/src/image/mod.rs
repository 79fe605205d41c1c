// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — in-memory streams and document image objects.

pub mod object;
pub mod stream;

pub use object::Image;
pub use stream::ImageStream;
