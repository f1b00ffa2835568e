//! The one-per-base-type component container.

use crate::component::Component;
use crate::error::ComponentError;
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// One occupant of a base slot: the boxed value plus its concrete type.
struct Slot {
    concrete: TypeId,
    value: Box<dyn Any + Send>,
}

impl Slot {
    fn of<C: Component>(component: C) -> Self {
        Self {
            concrete: TypeId::of::<C>(),
            value: Box::new(component),
        }
    }
}

/// Stores components, at most one per base component type.
///
/// The container maps each base type to a single type-erased occupant that
/// remembers its concrete type. Typed access requests a concrete type:
///
/// - an empty slot fails with [`ComponentError::NotFound`] (on [`at`])
/// - an occupant of a *different* concrete type in the requested slot fails
///   with [`ComponentError::Conflict`]
///
/// To evict a slot regardless of which concrete type occupies it, go
/// through the base type with [`remove_any`](Self::remove_any).
///
/// # Example
///
/// ```
/// use ircbus_component::{Component, ComponentContainer, ComponentError};
///
/// #[derive(Debug, PartialEq)]
/// struct Away(String);
/// impl Component for Away { type Base = Away; }
///
/// let mut container = ComponentContainer::new();
/// container.insert(Away("brb".into()))?;
///
/// assert_eq!(container.at::<Away>()?, &Away("brb".into()));
/// assert_eq!(container.insert(Away("again".into())), Err(ComponentError::Conflict));
///
/// assert!(container.remove::<Away>()?);
/// assert_eq!(container.at::<Away>(), Err(ComponentError::NotFound));
/// # Ok::<(), ComponentError>(())
/// ```
///
/// [`at`]: Self::at
#[derive(Default)]
pub struct ComponentContainer {
    slots: HashMap<TypeId, Slot>,
}

impl ComponentContainer {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Inserts a component.
    ///
    /// # Errors
    ///
    /// Fails with [`ComponentError::Conflict`] when the base slot is
    /// already occupied (by any concrete type).
    pub fn insert<C: Component>(&mut self, component: C) -> Result<&mut C, ComponentError> {
        let key = TypeId::of::<C::Base>();
        if self.slots.contains_key(&key) {
            return Err(ComponentError::Conflict);
        }
        self.slots.insert(key, Slot::of(component));
        self.at_mut::<C>()
    }

    /// Fetches the component of type `C`.
    ///
    /// # Errors
    ///
    /// - [`ComponentError::NotFound`] when the base slot is empty
    /// - [`ComponentError::Conflict`] when the slot holds a different
    ///   concrete type
    pub fn at<C: Component>(&self) -> Result<&C, ComponentError> {
        let slot = self
            .slots
            .get(&TypeId::of::<C::Base>())
            .ok_or(ComponentError::NotFound)?;
        slot.value
            .downcast_ref::<C>()
            .ok_or(ComponentError::Conflict)
    }

    /// Mutable variant of [`at`](Self::at).
    pub fn at_mut<C: Component>(&mut self) -> Result<&mut C, ComponentError> {
        let slot = self
            .slots
            .get_mut(&TypeId::of::<C::Base>())
            .ok_or(ComponentError::NotFound)?;
        slot.value
            .downcast_mut::<C>()
            .ok_or(ComponentError::Conflict)
    }

    /// Fetches the component of type `C`, inserting `value` if the slot is
    /// empty.
    ///
    /// # Errors
    ///
    /// Fails with [`ComponentError::Conflict`] when the slot holds a
    /// different concrete type.
    pub fn at_or_insert<C: Component>(&mut self, value: C) -> Result<&mut C, ComponentError> {
        self.at_or_insert_with(move || value)
    }

    /// Like [`at_or_insert`](Self::at_or_insert), constructing the fallback
    /// only when the slot is empty.
    pub fn at_or_insert_with<C, F>(&mut self, make: F) -> Result<&mut C, ComponentError>
    where
        C: Component,
        F: FnOnce() -> C,
    {
        let slot = self
            .slots
            .entry(TypeId::of::<C::Base>())
            .or_insert_with(move || Slot::of(make()));
        slot.value
            .downcast_mut::<C>()
            .ok_or(ComponentError::Conflict)
    }

    /// Fetches the component of type `C` if a compatible one is stored.
    #[must_use]
    pub fn find<C: Component>(&self) -> Option<&C> {
        self.at::<C>().ok()
    }

    /// Mutable variant of [`find`](Self::find).
    pub fn find_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.at_mut::<C>().ok()
    }

    /// Whether a component compatible with `C` is stored.
    #[must_use]
    pub fn has<C: Component>(&self) -> bool {
        self.find::<C>().is_some()
    }

    /// Removes the component of type `C`.
    ///
    /// Returns whether a component was removed; an empty slot is `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Fails with [`ComponentError::Conflict`] when the slot holds a
    /// different concrete type; that occupant stays put, and further
    /// `insert::<C>` calls keep failing. Evict it through the base type
    /// with [`remove_any`](Self::remove_any) instead.
    pub fn remove<C: Component>(&mut self) -> Result<bool, ComponentError> {
        Ok(self.take::<C>()?.is_some())
    }

    /// Removes and returns the component of type `C`.
    ///
    /// Same contract as [`remove`](Self::remove), yielding the owned value.
    pub fn take<C: Component>(&mut self) -> Result<Option<C>, ComponentError> {
        let key = TypeId::of::<C::Base>();
        match self.slots.get(&key) {
            None => Ok(None),
            Some(slot) if slot.concrete != TypeId::of::<C>() => Err(ComponentError::Conflict),
            Some(_) => {
                let slot = self.slots.remove(&key).ok_or(ComponentError::NotFound)?;
                match slot.value.downcast::<C>() {
                    Ok(boxed) => Ok(Some(*boxed)),
                    // concrete id matched above; the downcast cannot fail
                    Err(_) => Err(ComponentError::Conflict),
                }
            }
        }
    }

    /// Evicts whatever occupies the base slot of `C`, regardless of its
    /// concrete type.
    ///
    /// Returns whether a component was removed.
    pub fn remove_any<C: Component>(&mut self) -> bool {
        self.slots.remove(&TypeId::of::<C::Base>()).is_some()
    }
}

impl std::fmt::Debug for ComponentContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentContainer")
            .field("slots", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Channel {
        name: String,
    }

    impl Component for Channel {
        type Base = Channel;
    }

    #[derive(Debug, PartialEq)]
    struct ModeratedChannel {
        name: String,
        voiced_only: bool,
    }

    impl Component for ModeratedChannel {
        type Base = Channel;
    }

    #[derive(Debug, PartialEq)]
    struct Nick(String);

    impl Component for Nick {
        type Base = Nick;
    }

    fn channel() -> Channel {
        Channel {
            name: "#rust".into(),
        }
    }

    fn moderated() -> ModeratedChannel {
        ModeratedChannel {
            name: "#ops".into(),
            voiced_only: true,
        }
    }

    #[test]
    fn insert_and_at() {
        let mut container = ComponentContainer::new();
        container.insert(channel()).unwrap();

        assert_eq!(container.at::<Channel>().unwrap().name, "#rust");
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn insert_into_occupied_slot_conflicts() {
        let mut container = ComponentContainer::new();
        container.insert(channel()).unwrap();

        assert_eq!(container.insert(channel()), Err(ComponentError::Conflict));
        // a different concrete type in the same slot conflicts as well
        assert_eq!(container.insert(moderated()), Err(ComponentError::Conflict));
    }

    #[test]
    fn distinct_bases_coexist() {
        let mut container = ComponentContainer::new();
        container.insert(channel()).unwrap();
        container.insert(Nick("ferris".into())).unwrap();
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn at_on_empty_slot_is_not_found() {
        let container = ComponentContainer::new();
        assert_eq!(container.at::<Channel>(), Err(ComponentError::NotFound));
    }

    #[test]
    fn at_with_mismatched_occupant_conflicts() {
        let mut container = ComponentContainer::new();
        container.insert(moderated()).unwrap();

        assert_eq!(container.at::<Channel>(), Err(ComponentError::Conflict));
        assert!(container.at::<ModeratedChannel>().is_ok());
    }

    #[test]
    fn find_and_has() {
        let mut container = ComponentContainer::new();
        container.insert(moderated()).unwrap();

        assert!(container.find::<Channel>().is_none());
        assert!(container.find::<ModeratedChannel>().is_some());
        assert!(!container.has::<Channel>());
        assert!(container.has::<ModeratedChannel>());
    }

    #[test]
    fn at_or_insert_returns_existing() {
        let mut container = ComponentContainer::new();
        container.insert(Nick("ferris".into())).unwrap();

        let nick = container.at_or_insert(Nick("other".into())).unwrap();
        assert_eq!(nick.0, "ferris");
    }

    #[test]
    fn at_or_insert_fills_empty_slot() {
        let mut container = ComponentContainer::new();
        let nick = container.at_or_insert(Nick("ferris".into())).unwrap();
        assert_eq!(nick.0, "ferris");
        assert!(container.has::<Nick>());
    }

    #[test]
    fn at_or_insert_with_mismatched_occupant_conflicts() {
        let mut container = ComponentContainer::new();
        container.insert(moderated()).unwrap();

        assert_eq!(
            container.at_or_insert(channel()).err(),
            Some(ComponentError::Conflict)
        );
        // the occupant survived the failed request
        assert!(container.has::<ModeratedChannel>());
    }

    #[test]
    fn at_or_insert_with_is_lazy() {
        let mut container = ComponentContainer::new();
        container.insert(Nick("ferris".into())).unwrap();

        let mut built = false;
        let _ = container.at_or_insert_with(|| {
            built = true;
            Nick("other".into())
        });
        assert!(!built);
    }

    #[test]
    fn remove_matching_occupant() {
        let mut container = ComponentContainer::new();
        container.insert(channel()).unwrap();

        assert_eq!(container.remove::<Channel>(), Ok(true));
        assert_eq!(container.remove::<Channel>(), Ok(false));
        assert!(container.is_empty());
    }

    #[test]
    fn remove_mismatched_occupant_conflicts_and_keeps_it() {
        let mut container = ComponentContainer::new();
        container.insert(moderated()).unwrap();

        assert_eq!(container.remove::<Channel>(), Err(ComponentError::Conflict));
        assert!(container.has::<ModeratedChannel>());

        // the base-slot escape hatch always works
        assert!(container.remove_any::<Channel>());
        assert!(container.is_empty());
    }

    #[test]
    fn remove_any_on_empty_slot_is_false() {
        let mut container = ComponentContainer::new();
        assert!(!container.remove_any::<Channel>());
    }

    #[test]
    fn take_yields_the_owned_component() {
        let mut container = ComponentContainer::new();
        container.insert(Nick("ferris".into())).unwrap();

        let taken = container.take::<Nick>().unwrap();
        assert_eq!(taken, Some(Nick("ferris".into())));
        assert!(container.is_empty());
        assert_eq!(container.take::<Nick>(), Ok(None));
    }
}
