//! Reference-counted ownership of native resources
//!
//! Native resources are shared through `Rc`. A [`Handle`] owns at most one
//! reference and gives it back when it is released, reassigned or dropped.
//! Factory calls hand out a fresh reference, which is taken over with
//! [`Handle::attach`]; an existing reference is shared with
//! [`Handle::acquire`].

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Owner of one native resource reference
pub struct Handle<T: ?Sized> {
    raw: Option<Rc<T>>,
}

impl<T: ?Sized> Handle<T> {
    pub const fn empty() -> Self {
        Self { raw: None }
    }

    /// Share `raw`, releasing whatever was held before
    pub fn acquire(&mut self, raw: &Rc<T>) {
        self.release();
        self.raw = Some(Rc::clone(raw));
    }

    /// Take over a reference returned by a factory call
    pub fn attach(&mut self, raw: Rc<T>) {
        self.release();
        self.raw = Some(raw);
    }

    /// Give the reference back; safe to call when empty
    pub fn release(&mut self) {
        self.raw = None;
    }

    pub fn is_some(&self) -> bool {
        self.raw.is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.raw.as_deref()
    }

    pub fn raw(&self) -> Option<&Rc<T>> {
        self.raw.as_ref()
    }

    /// Move the reference out, leaving the handle empty
    pub fn take(&mut self) -> Option<Rc<T>> {
        self.raw.take()
    }
}

impl<T: ?Sized> Default for Handle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> From<Rc<T>> for Handle<T> {
    fn from(raw: Rc<T>) -> Self {
        Self { raw: Some(raw) }
    }
}

impl<T: ?Sized> Drop for Handle<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: ?Sized> Deref for Handle<T> {
    type Target = Option<Rc<T>>;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

impl<T: ?Sized> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => f
                .debug_struct("Handle")
                .field("ptr", &Rc::as_ptr(raw).cast::<()>())
                .field("strong", &Rc::strong_count(raw))
                .finish(),
            None => f.write_str("Handle(empty)"),
        }
    }
}
