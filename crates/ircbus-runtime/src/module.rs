//! Modules and the module container.
//!
//! A module is a pluggable subsystem instance loaded into an IRC context:
//! a connection, a protocol codec, a state tracker, the event manager
//! itself. Every module declares a *base API* type; the context holds at
//! most one module per API slot, so alternative implementations of the
//! same API are mutually exclusive.
//!
//! ```
//! use ircbus_runtime::{Irc, LoadModule, Module, RuntimeError};
//!
//! /// Tracks the channels the client has joined.
//! struct ChannelTracker {
//!     _channels: Vec<String>,
//! }
//!
//! impl Module for ChannelTracker {
//!     type Api = ChannelTracker;
//! }
//!
//! impl LoadModule for ChannelTracker {
//!     fn load(_irc: &Irc) -> Result<Self, RuntimeError> {
//!         Ok(Self { _channels: Vec::new() })
//!     }
//! }
//!
//! let irc = Irc::new();
//! let tracker = irc.load::<ChannelTracker>()?;
//! # drop(tracker);
//! # Ok::<(), RuntimeError>(())
//! ```

use crate::error::RuntimeError;
use crate::manager::EventManager;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// A pluggable subsystem of an IRC context.
///
/// # Declaring the API slot
///
/// `Api` names the slot this module occupies; modules sharing an API are
/// mutually exclusive within one context. Standalone modules are their own
/// API (`type Api = Self`); an implementation of a shared interface names
/// the interface's `dyn` type; the standard event manager declares
/// `type Api = dyn EventManager`.
///
/// Modules are constructed against a context via [`LoadModule`] (or a
/// closure passed to [`Irc::load_with`](crate::Irc::load_with)) and handed
/// out as `Arc` clones.
pub trait Module: Send + Sync + 'static {
    /// The base API type whose slot this module occupies.
    type Api: ?Sized + 'static;

    /// The event manager interface of this module, if it provides one.
    ///
    /// Overridden by event manager implementations so the context can
    /// track the installed manager in its fast-access slot. Everything
    /// else keeps the default.
    fn as_event_manager(self: Arc<Self>) -> Option<Arc<dyn EventManager>>
    where
        Self: Sized,
    {
        None
    }
}

/// A module constructible from a context alone.
///
/// Modules that need extra arguments skip this trait and go through
/// [`Irc::load_with`](crate::Irc::load_with) instead.
pub trait LoadModule: Module + Sized {
    /// Constructs the module against `irc`.
    ///
    /// # Errors
    ///
    /// A failed constructor leaves the context unchanged; the error is
    /// propagated to the `load` caller.
    fn load(irc: &crate::Irc) -> Result<Self, RuntimeError>;
}

/// One occupant of an API slot.
struct ModuleSlot {
    concrete: TypeId,
    name: &'static str,
    module: Arc<dyn Any + Send + Sync>,
}

impl ModuleSlot {
    fn of<M: Module>(module: Arc<M>) -> Self {
        Self {
            concrete: TypeId::of::<M>(),
            name: type_name::<M>(),
            module,
        }
    }
}

/// The module store of an IRC context: one module per base API slot.
///
/// The event manager's slot is tracked separately for O(1) access and is
/// populated for the whole life of the context; teardown unloads every
/// other module first and the event manager last.
pub(crate) struct ModuleContainer {
    slots: RwLock<HashMap<TypeId, ModuleSlot>>,
    manager: RwLock<Option<Arc<dyn EventManager>>>,
}

impl ModuleContainer {
    pub(crate) fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            manager: RwLock::new(None),
        }
    }

    /// Installs the initial event manager. Only valid on a fresh
    /// container, where it cannot conflict.
    pub(crate) fn bootstrap_event_manager(&self, manager: Arc<crate::StandardEventManager>) {
        *self.manager.write() = Some(manager.clone());
        self.slots
            .write()
            .insert(TypeId::of::<dyn EventManager>(), ModuleSlot::of(manager));
    }

    /// Whether the API slot of `M` is occupied.
    pub(crate) fn occupied<M: Module>(&self) -> bool {
        self.slots.read().contains_key(&TypeId::of::<M::Api>())
    }

    /// Stores a constructed module.
    ///
    /// # Errors
    ///
    /// Fails with [`RuntimeError::ModuleConflict`] when the API slot is
    /// occupied; the passed module is dropped in that case.
    pub(crate) fn install<M: Module>(&self, module: Arc<M>) -> Result<(), RuntimeError> {
        let key = TypeId::of::<M::Api>();
        let mut slots = self.slots.write();
        if slots.contains_key(&key) {
            return Err(RuntimeError::ModuleConflict);
        }
        if let Some(manager) = module.clone().as_event_manager() {
            *self.manager.write() = Some(manager);
        }
        debug!(module = type_name::<M>(), "module loaded");
        slots.insert(key, ModuleSlot::of(module));
        Ok(())
    }

    /// Removes the module of concrete type `M`.
    ///
    /// Returns `Ok(false)` for an empty slot. The module serving as the
    /// event manager cannot be unloaded; its slot stays populated until
    /// context teardown.
    ///
    /// # Errors
    ///
    /// Fails with [`RuntimeError::ModuleConflict`] when the slot holds a
    /// different concrete type, or when `M` is the active event manager.
    pub(crate) fn unload<M: Module>(&self) -> Result<bool, RuntimeError> {
        let key = TypeId::of::<M::Api>();
        let mut slots = self.slots.write();
        match slots.get(&key) {
            None => Ok(false),
            Some(slot) if slot.concrete != TypeId::of::<M>() => Err(RuntimeError::ModuleConflict),
            Some(slot) => {
                if key == TypeId::of::<dyn EventManager>() {
                    return Err(RuntimeError::ModuleConflict);
                }
                debug!(module = slot.name, "module unloaded");
                slots.remove(&key);
                Ok(true)
            }
        }
    }

    /// Removes whatever module occupies the API slot `A`, regardless of
    /// its concrete type.
    ///
    /// Returns whether a module was removed. The event manager slot is
    /// exempt, as with [`unload`](Self::unload).
    pub(crate) fn unload_api<A: ?Sized + 'static>(&self) -> Result<bool, RuntimeError> {
        let key = TypeId::of::<A>();
        if key == TypeId::of::<dyn EventManager>() {
            return Err(RuntimeError::ModuleConflict);
        }
        let mut slots = self.slots.write();
        match slots.remove(&key) {
            Some(slot) => {
                debug!(module = slot.name, "module unloaded");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Fetches the module of concrete type `M`.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::ModuleNotFound`] when the API slot is empty
    /// - [`RuntimeError::ModuleConflict`] when the slot holds a different
    ///   concrete type
    pub(crate) fn get<M: Module>(&self) -> Result<Arc<M>, RuntimeError> {
        let slots = self.slots.read();
        let slot = slots
            .get(&TypeId::of::<M::Api>())
            .ok_or(RuntimeError::ModuleNotFound)?;
        slot.module
            .clone()
            .downcast::<M>()
            .map_err(|_| RuntimeError::ModuleConflict)
    }

    /// Fetches the module of concrete type `M` if a compatible one is
    /// loaded.
    pub(crate) fn find<M: Module>(&self) -> Option<Arc<M>> {
        self.get::<M>().ok()
    }

    /// The installed event manager. `None` only before bootstrap or
    /// during teardown.
    pub(crate) fn event_manager(&self) -> Option<Arc<dyn EventManager>> {
        self.manager.read().clone()
    }
}

impl Drop for ModuleContainer {
    fn drop(&mut self) {
        let mut slots = std::mem::take(self.slots.get_mut());
        let manager_slot = slots.remove(&TypeId::of::<dyn EventManager>());
        let unloaded = slots.len();
        // every ordinary module goes first
        drop(slots);
        // the event manager goes last: wake its waiters, then release it
        if let Some(manager) = self.manager.get_mut().take() {
            manager.shutdown();
        }
        drop(manager_slot);
        debug!(unloaded, "context modules unloaded");
    }
}
