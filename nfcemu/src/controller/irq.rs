// nfcemu-rs/nfcemu/src/controller/irq.rs

use std::cell::RefCell;
use std::rc::Rc;

/// Output interrupt line of a controller.
pub trait IrqLine {
    /// Drive the line high (`true`) or low.
    fn set_level(&mut self, level: bool);
}

/// Line that is not wired to anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIrq;

impl IrqLine for NoIrq {
    fn set_level(&mut self, _level: bool) {}
}

/// Line that records every level change. Clones share the same log so a
/// test can keep one handle and give the other to the controller.
#[derive(Debug, Default, Clone)]
pub struct RecordingIrq {
    levels: Rc<RefCell<Vec<bool>>>,
}

impl RecordingIrq {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every level driven so far, oldest first.
    pub fn levels(&self) -> Vec<bool> {
        self.levels.borrow().clone()
    }

    /// Current level; low if never driven.
    pub fn level(&self) -> bool {
        self.levels.borrow().last().copied().unwrap_or(false)
    }

    /// Number of times the line was driven high.
    pub fn raised(&self) -> usize {
        self.levels.borrow().iter().filter(|l| **l).count()
    }

    pub fn clear(&self) {
        self.levels.borrow_mut().clear();
    }
}

impl IrqLine for RecordingIrq {
    fn set_level(&mut self, level: bool) {
        self.levels.borrow_mut().push(level);
    }
}

impl<T: IrqLine + ?Sized> IrqLine for Box<T> {
    fn set_level(&mut self, level: bool) {
        (**self).set_level(level)
    }
}
