//! Auxiliary per-agent state.
//!
//! External collaborators (controllers, rule layers) attach their own data
//! to an agent through a [`StateBag`]. Each value type names a stable
//! [`AuxState::KEY`]; lookups narrow the stored value with a checked
//! downcast, so a value stored under the same key with a different type
//! reads as absent. The core never traverses the bag.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;

/// A value that can live in a [`StateBag`].
pub trait AuxState: Any + Debug {
    /// Key under which values of this type are stored.
    const KEY: &'static str;
}

/// Object-safe view of a stored value.
trait StateSlot: Debug {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: AuxState> StateSlot for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Type-keyed extension storage carried by every agent.
#[derive(Debug, Default)]
pub struct StateBag {
    slots: HashMap<&'static str, Box<dyn StateSlot>>,
}

impl StateBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, returning the previous value of the same type, if any.
    pub fn set<T: AuxState>(&mut self, value: T) -> Option<T> {
        self.slots
            .insert(T::KEY, Box::new(value))
            .and_then(|old| old.into_any().downcast::<T>().ok())
            .map(|old| *old)
    }

    /// Borrow the stored value of type `T`.
    pub fn get<T: AuxState>(&self) -> Option<&T> {
        self.slots
            .get(T::KEY)
            .and_then(|slot| (**slot).as_any().downcast_ref::<T>())
    }

    /// Mutably borrow the stored value of type `T`.
    pub fn get_mut<T: AuxState>(&mut self) -> Option<&mut T> {
        self.slots
            .get_mut(T::KEY)
            .and_then(|slot| (**slot).as_any_mut().downcast_mut::<T>())
    }

    /// Remove and return the stored value of type `T`.
    ///
    /// A value of another type under the same key is left in place.
    pub fn remove<T: AuxState>(&mut self) -> Option<T> {
        self.get::<T>()?;
        self.slots
            .remove(T::KEY)
            .and_then(|slot| slot.into_any().downcast::<T>().ok())
            .map(|value| *value)
    }

    /// Whether a value of type `T` is stored.
    pub fn contains<T: AuxState>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the bag holds nothing.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
