// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::{self, Write};

/// Receives per-row progress from a long-running load.
pub trait ProgressReporter {
    fn start(&mut self, total: usize);
    fn advance(&mut self);
    fn finish(&mut self);
}

/// Discards all progress.
#[derive(Debug, Default)]
pub struct Silent;

impl ProgressReporter for Silent {
    fn start(&mut self, _total: usize) {}
    fn advance(&mut self) {}
    fn finish(&mut self) {}
}

/// Single-line `processed/total (pct%)` counter redrawn in place.
pub struct TerminalProgress<W: Write> {
    out: W,
    total: usize,
    done: usize,
    last_pct: Option<usize>,
}

impl TerminalProgress<io::Stderr> {
    pub fn stderr() -> Self {
        TerminalProgress::new(io::stderr())
    }
}

impl<W: Write> TerminalProgress<W> {
    pub fn new(out: W) -> Self {
        TerminalProgress {
            out,
            total: 0,
            done: 0,
            last_pct: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self) {
        let pct = if self.total == 0 {
            100
        } else {
            self.done * 100 / self.total
        };
        // Redraw only when the percentage moves; large files have many rows.
        if self.last_pct == Some(pct) && self.done != self.total {
            return;
        }
        self.last_pct = Some(pct);
        // Progress output is best effort.
        let _ = write!(self.out, "\r{}/{} rows ({}%)", self.done, self.total, pct);
        let _ = self.out.flush();
    }
}

impl<W: Write> ProgressReporter for TerminalProgress<W> {
    fn start(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
        self.last_pct = None;
        self.draw();
    }

    fn advance(&mut self) {
        self.done += 1;
        self.draw();
    }

    fn finish(&mut self) {
        let _ = writeln!(self.out);
        let _ = self.out.flush();
    }
}
