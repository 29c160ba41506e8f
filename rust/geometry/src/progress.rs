// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Advisory progress reporting for long extraction runs

/// Receives progress of an assembly run
pub trait ProgressSink {
    fn start(&mut self, label: &str, total: usize);

    /// One more element done
    fn advance(&mut self);

    fn finish(&mut self);
}

/// Label shown while `total` elements are extracted
pub fn generating_label(total: usize) -> String {
    format!("Generating {} shapes...", total)
}

/// Discards all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn start(&mut self, _label: &str, _total: usize) {}
    fn advance(&mut self) {}
    fn finish(&mut self) {}
}

/// Emits progress as debug events
#[derive(Debug, Default)]
pub struct LogProgress {
    label: String,
    done: usize,
    total: usize,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn done(&self) -> usize {
        self.done
    }
}

impl ProgressSink for LogProgress {
    fn start(&mut self, label: &str, total: usize) {
        self.label = label.to_string();
        self.done = 0;
        self.total = total;
        tracing::debug!(total, "{}", self.label);
    }

    fn advance(&mut self) {
        self.done += 1;
        tracing::debug!(done = self.done, total = self.total, "{}", self.label);
    }

    fn finish(&mut self) {
        tracing::debug!(done = self.done, total = self.total, "{} done", self.label);
    }
}
