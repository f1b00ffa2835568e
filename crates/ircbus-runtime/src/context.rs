//! The IRC context.
//!
//! The context is the composition root of a client: it owns the module
//! set, the context-level component bag, and the event factory. Modules
//! and application code share it through cheap [`Irc`] handle clones.

use crate::error::RuntimeError;
use crate::event::{Event, EventPtr};
use crate::manager::{EventManager, StandardEventManager};
use crate::module::{LoadModule, Module, ModuleContainer};
use ircbus_component::ComponentContainer;
use ircbus_event::{EventError, EventId};
use parking_lot::{Mutex, MutexGuard};
use std::any::type_name;
use std::sync::Arc;
use tracing::debug;

/// The shared state behind [`Irc`] handles.
pub(crate) struct IrcInner {
    components: Mutex<ComponentContainer>,
    pub(crate) modules: ModuleContainer,
}

/// A handle to an IRC context.
///
/// Cloning is cheap and every clone refers to the same context. The
/// context is torn down when the last handle drops: ordinary modules are
/// unloaded first, then the event manager (waking its waiters), last.
///
/// # Example
///
/// ```
/// use ircbus_event::event_kinds;
/// use ircbus_runtime::{EventManager, Irc};
///
/// event_kinds! {
///     enum ClientEvent { Startup }
/// }
///
/// let irc = Irc::new();
/// let event = irc.make_event(ClientEvent::Startup)?;
/// irc.event_manager().post(event);
/// # Ok::<(), ircbus_event::EventError>(())
/// ```
#[derive(Clone)]
pub struct Irc {
    inner: Arc<IrcInner>,
}

impl Irc {
    /// Creates a context with an empty component bag and a default
    /// [`StandardEventManager`] installed.
    #[must_use]
    pub fn new() -> Self {
        let irc = Self {
            inner: Arc::new(IrcInner {
                components: Mutex::new(ComponentContainer::new()),
                modules: ModuleContainer::new(),
            }),
        };
        irc.inner
            .modules
            .bootstrap_event_manager(Arc::new(StandardEventManager::new()));
        debug!("IRC context created");
        irc
    }

    pub(crate) fn from_inner(inner: Arc<IrcInner>) -> Self {
        Self { inner }
    }

    /// Creates an event with the given origin id.
    ///
    /// # Errors
    ///
    /// Fails with [`EventError::InvalidId`] for the invalid sentinel.
    pub fn make_event(&self, id: impl Into<EventId>) -> Result<EventPtr, EventError> {
        Event::new(Arc::downgrade(&self.inner), id.into())
    }

    /// The context-level component bag.
    ///
    /// Holds state shared across modules: configuration, trackers,
    /// anything components can express. The returned guard holds the bag's
    /// lock.
    pub fn components(&self) -> MutexGuard<'_, ComponentContainer> {
        self.inner.components.lock()
    }

    /// The installed event manager.
    ///
    /// O(1); the slot is populated for the whole life of the context.
    #[must_use]
    pub fn event_manager(&self) -> Arc<dyn EventManager> {
        self.inner
            .modules
            .event_manager()
            .expect("an IRC context is never without a loaded event manager module")
    }

    /// Loads the module `M`, constructing it via [`LoadModule::load`].
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::ModuleConflict`] when the API slot is occupied
    /// - whatever the module's constructor reports; the context is left
    ///   unchanged in that case
    pub fn load<M: LoadModule>(&self) -> Result<Arc<M>, RuntimeError> {
        self.load_with(M::load)
    }

    /// Loads the module `M`, constructing it with `construct`.
    ///
    /// For modules whose constructor needs arguments beyond the context:
    ///
    /// ```ignore
    /// let limiter = irc.load_with(|irc| RateLimiter::new(irc, burst, rate))?;
    /// ```
    ///
    /// # Errors
    ///
    /// As for [`load`](Self::load).
    pub fn load_with<M, F>(&self, construct: F) -> Result<Arc<M>, RuntimeError>
    where
        M: Module,
        F: FnOnce(&Irc) -> Result<M, RuntimeError>,
    {
        if self.inner.modules.occupied::<M>() {
            debug!(module = type_name::<M>(), "load rejected: API slot occupied");
            return Err(RuntimeError::ModuleConflict);
        }
        let module = Arc::new(construct(self)?);
        self.inner.modules.install(module.clone())?;
        Ok(module)
    }

    /// Unloads the module of concrete type `M`.
    ///
    /// Returns `Ok(false)` when no module occupies `M`'s API slot.
    ///
    /// # Errors
    ///
    /// Fails with [`RuntimeError::ModuleConflict`] when the slot holds a
    /// different concrete type (unload via the API slot with
    /// [`unload_api`](Self::unload_api) instead), or when `M` is the
    /// active event manager.
    pub fn unload<M: Module>(&self) -> Result<bool, RuntimeError> {
        self.inner.modules.unload::<M>()
    }

    /// Unloads whatever module occupies the API slot `A`.
    ///
    /// Returns whether a module was removed.
    ///
    /// # Errors
    ///
    /// Fails with [`RuntimeError::ModuleConflict`] for the event manager
    /// slot, which stays populated until teardown.
    pub fn unload_api<A: ?Sized + 'static>(&self) -> Result<bool, RuntimeError> {
        self.inner.modules.unload_api::<A>()
    }

    /// Fetches the loaded module of concrete type `M`.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::ModuleNotFound`] when the API slot is empty
    /// - [`RuntimeError::ModuleConflict`] when the slot holds a different
    ///   concrete type
    pub fn get<M: Module>(&self) -> Result<Arc<M>, RuntimeError> {
        self.inner.modules.get::<M>()
    }

    /// Fetches the loaded module of concrete type `M`, if compatible.
    #[must_use]
    pub fn find<M: Module>(&self) -> Option<Arc<M>> {
        self.inner.modules.find::<M>()
    }

    /// Whether two handles refer to the same context.
    #[must_use]
    pub fn ptr_eq(&self, other: &Irc) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Irc {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Irc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Irc")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}
