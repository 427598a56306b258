//! Accessors: the read/write bridge to animated attributes
//!
//! A tween never holds the object it animates. It holds an [`Accessor`] that
//! copies the target's current components into a buffer and writes computed
//! components back.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use smallvec::SmallVec;

/// Opaque identity of an animated target, used to find or kill every tween
/// bound to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetId(pub u64);

/// Direction of an accessor call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// Capability to read and write the components of one target.
pub trait Accessor {
    /// Fill `values` with the current components and return how many were
    /// produced. `values` is sized to the configured attribute limit.
    fn read(&mut self, values: &mut [f32]) -> usize;

    /// Apply `values` to the target.
    fn write(&mut self, values: &[f32]);

    /// Identity of the bound target, if the caller wants target-level control.
    fn target_id(&self) -> Option<TargetId> {
        None
    }
}

/// Adapts a single `(mode, buffer) -> count` closure into an [`Accessor`].
///
/// The count returned on [`AccessMode::Write`] is ignored.
pub struct FnAccessor<F> {
    f: F,
    target: Option<TargetId>,
}

impl<F> FnAccessor<F>
where
    F: FnMut(AccessMode, &mut [f32]) -> usize,
{
    pub fn new(f: F) -> Self {
        Self { f, target: None }
    }

    /// Builder: tag the accessor with a target identity
    pub fn with_target(mut self, target: TargetId) -> Self {
        self.target = Some(target);
        self
    }
}

impl<F> Accessor for FnAccessor<F>
where
    F: FnMut(AccessMode, &mut [f32]) -> usize,
{
    fn read(&mut self, values: &mut [f32]) -> usize {
        (self.f)(AccessMode::Read, values)
    }

    fn write(&mut self, values: &[f32]) {
        let mut buffer: SmallVec<[f32; 4]> = SmallVec::from_slice(values);
        (self.f)(AccessMode::Write, &mut buffer);
    }

    fn target_id(&self) -> Option<TargetId> {
        self.target
    }
}

/// A shared scalar.
impl Accessor for Rc<Cell<f32>> {
    fn read(&mut self, values: &mut [f32]) -> usize {
        match values.first_mut() {
            Some(slot) => {
                *slot = self.get();
                1
            }
            None => 0,
        }
    }

    fn write(&mut self, values: &[f32]) {
        if let Some(&value) = values.first() {
            self.set(value);
        }
    }
}

/// A shared component vector; its length is the attribute count.
impl Accessor for Rc<RefCell<Vec<f32>>> {
    fn read(&mut self, values: &mut [f32]) -> usize {
        let source = self.borrow();
        let count = source.len().min(values.len());
        values[..count].copy_from_slice(&source[..count]);
        count
    }

    fn write(&mut self, values: &[f32]) {
        let mut target = self.borrow_mut();
        let count = target.len().min(values.len());
        target[..count].copy_from_slice(&values[..count]);
    }
}
