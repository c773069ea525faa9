//! Render environment: per-type stacks of values shared between render commands.

use crate::error::RenderError;
use std::any::{Any, TypeId};
use std::collections::HashMap;

#[derive(Default)]
pub struct Environment {
    stacks: HashMap<TypeId, Vec<Box<dyn Any>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `value` onto the stack for its type.
    pub fn push<T: 'static>(&mut self, value: T) {
        self.stacks
            .entry(TypeId::of::<T>())
            .or_default()
            .push(Box::new(value));
    }

    /// Top value of type `T`, if any.
    pub fn peek<T: 'static>(&self) -> Option<&T> {
        self.stacks
            .get(&TypeId::of::<T>())
            .and_then(|stack| stack.last())
            .and_then(|top| top.downcast_ref::<T>())
    }

    pub fn peek_required<T: 'static>(&self) -> Result<&T, RenderError> {
        self.peek::<T>()
            .ok_or(RenderError::MissingEnvironmental(std::any::type_name::<T>()))
    }

    pub fn pop<T: 'static>(&mut self) -> Option<T> {
        let stack = self.stacks.get_mut(&TypeId::of::<T>())?;
        let top = stack.pop()?;
        if stack.is_empty() {
            self.stacks.remove(&TypeId::of::<T>());
        }
        top.downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// Drop every stacked value.
    pub fn clear(&mut self) {
        self.stacks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("types", &self.stacks.len())
            .finish()
    }
}
