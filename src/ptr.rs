//!
//! # Shared-Pointer Type
//!
//! [Ptr] is the crate's reference-counted, lock-guarded shared handle,
//! used for the netlist's non-owning reference to the standard-cell library
//! and for externally registered entity properties.
//!
//! Attribute access is forwarded through [Deref] calls,
//! allowing for fairly natural syntax after grabbing `read()` or `write()` access:
//!
//! ```text
//! let data = ptr.read()?;
//! data.some_function();
//! ```
//!
//! [Ptr] uses the [ByAddress] struct to compare and hash *by address*,
//! so two handles are equal iff they share one underlying object.
//!

// Std-lib
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, RwLock};

// Crates.io
use by_address::ByAddress;

#[derive(Debug)]
pub struct Ptr<T: ?Sized>(ByAddress<Arc<RwLock<T>>>);

impl<T> Ptr<T> {
    /// Pointer Constructor
    pub fn new(i: T) -> Self {
        Self(ByAddress(Arc::new(RwLock::new(i))))
    }
}
impl<T: ?Sized> Ptr<T> {
    /// Construct from an already-shared [Arc], e.g. after unsizing to a trait object.
    pub fn from_arc(arc: Arc<RwLock<T>>) -> Self {
        Self(ByAddress(arc))
    }
    /// Get a reference to the underlying [Arc]
    pub fn inner(&self) -> &Arc<RwLock<T>> {
        &self.0 .0
    }
}
impl<T> From<T> for Ptr<T> {
    fn from(t: T) -> Self {
        Self::new(t)
    }
}
impl<T: ?Sized> Deref for Ptr<T> {
    type Target = ByAddress<Arc<RwLock<T>>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<T: ?Sized> DerefMut for Ptr<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
// Having a [Deref] implementation seems to screw with the auto-`derive`d implementations
// of a few key traits. Conveniently, they're all quite short.
impl<T: ?Sized> Clone for Ptr<T> {
    fn clone(&self) -> Self {
        Self(ByAddress::clone(&self.0))
    }
}
impl<T: ?Sized> PartialEq for Ptr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}
impl<T: ?Sized> Eq for Ptr<T> {}
impl<T: ?Sized> Hash for Ptr<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}
