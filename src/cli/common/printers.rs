// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pretty printers for reporting information.

use std::{
    borrow::Cow,
    sync::{Mutex, MutexGuard},
};

const VERTICAL: char = '│';
const UP_AND_RIGHT: char = '└';
const VERTICAL_AND_RIGHT: char = '├';

lazy_static::lazy_static! {
    static ref WARNING_PRINTER: Mutex<BlockPrinter> = Mutex::new(BlockPrinter::default());
}

/// A titled tree of info-level lines.
pub(crate) struct InfoPrinter {
    title: Cow<'static, str>,
    blocks: BlockPrinter,
}

impl InfoPrinter {
    pub(crate) fn new(title: Cow<'static, str>) -> Self {
        Self {
            title,
            blocks: BlockPrinter::default(),
        }
    }

    pub(crate) fn push_line(&mut self, line: Cow<'static, str>) {
        self.blocks.push_line(line);
    }

    pub(crate) fn push_block(&mut self, block: Vec<Cow<'static, str>>) {
        self.blocks.push_block(block);
    }

    pub(crate) fn display(self) {
        log::info!("{}", console::style(self.title).bold());
        self.blocks.lines(|line| log::info!("{line}"));
        log::info!("");
    }
}

#[derive(Default)]
pub(super) struct BlockPrinter {
    blocks: Vec<Vec<Cow<'static, str>>>,
}

impl BlockPrinter {
    pub(super) fn push_line(&mut self, line: Cow<'static, str>) {
        self.blocks.push(vec![line]);
    }

    pub(super) fn push_block(&mut self, block: Vec<Cow<'static, str>>) {
        self.blocks.push(block);
    }

    /// Hand each line, prefixed with its tree symbol, to `f`.
    pub(super) fn lines<F: FnMut(String)>(&self, mut f: F) {
        let num_blocks = self.blocks.len();
        for (i_block, block) in self.blocks.iter().enumerate() {
            let num_lines = block.len();
            for (i_line, line) in block.iter().enumerate() {
                let symbol = match (i_line, i_line + 1 == num_lines, i_block + 1 == num_blocks) {
                    (0, false, _) => VERTICAL_AND_RIGHT,
                    (0, _, false) => VERTICAL_AND_RIGHT,
                    (0, true, true) => UP_AND_RIGHT,
                    _ => VERTICAL,
                };
                f(format!("{symbol} {line}"));
            }
        }
    }
}

fn warnings() -> MutexGuard<'static, BlockPrinter> {
    // A panic while holding the lock can't leave the blocks inconsistent.
    WARNING_PRINTER
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) trait Warn {
    fn warn(self);
}

impl Warn for String {
    fn warn(self) {
        warnings().push_line(self.into());
    }
}

impl Warn for Vec<Cow<'static, str>> {
    fn warn(self) {
        warnings().push_block(self);
    }
}

/// Print out any warnings that have been collected as CLI arguments have been
/// parsed. This should only be called once before all arguments have been
/// parsed into parameters.
pub(crate) fn display_warnings() {
    log::debug!("Displaying warnings");
    let mut printer = warnings();
    if printer.blocks.is_empty() {
        return;
    }

    log::warn!("{}", console::style("Warnings").bold());
    printer.lines(|line| log::warn!("{line}"));
    log::warn!("");
    printer.blocks.clear();
}
