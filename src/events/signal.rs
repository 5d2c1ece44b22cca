//! Named, ordered multi-listener event channel.
//!
//! A [`Signal`] keeps listeners in connection order and calls them
//! synchronously from [`Signal::emit`]. The same listener may be connected more
//! than once; [`Signal::disconnect`] removes only the first match, compared by
//! identity (the `Rc` allocation), not by behavior.
//!
//! A listener returning `Err` stops the emission: later listeners are not called
//! and the error is handed back to the caller as a [`SignalError`].
//!
//! # Example
//!
//! ```ignore
//! let mut on_hit: Signal<u32> = Signal::new("player_hit");
//! let shake = listener(|damage: &u32| {
//!     log::info!("took {damage}");
//!     Ok(())
//! });
//! on_hit.connect(shake.clone());
//! on_hit.emit(&3)?;
//! on_hit.disconnect(&shake);
//! ```

use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::error::{BoxError, SignalError};

/// Shared handle to a listener; its allocation is its identity.
pub type Listener<A> = Rc<dyn Fn(&A) -> Result<(), BoxError>>;

/// Wrap a closure as a connectable listener.
pub fn listener<A, F>(f: F) -> Listener<A>
where
    F: Fn(&A) -> Result<(), BoxError> + 'static,
{
    Rc::new(f)
}

pub struct Signal<A> {
    name: String,
    listeners: Vec<Listener<A>>,
}

impl<A> Signal<A> {
    pub fn new(name: impl Into<String>) -> Self {
        Signal {
            name: name.into(),
            listeners: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a listener. Duplicates are allowed.
    pub fn connect(&mut self, listener: Listener<A>) {
        self.listeners.push(listener);
    }

    /// Remove the first listener with the same identity. Returns whether one
    /// was removed.
    pub fn disconnect(&mut self, listener: &Listener<A>) -> bool {
        let position = self
            .listeners
            .iter()
            .position(|l| std::ptr::addr_eq(Rc::as_ptr(l), Rc::as_ptr(listener)));
        match position {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Call every listener in connection order with `args`.
    pub fn emit(&self, args: &A) -> Result<(), SignalError> {
        trace!(
            "Emitting \"{}\" to {} listener(s)",
            self.name,
            self.listeners.len()
        );
        for (index, listener) in self.listeners.iter().enumerate() {
            listener(args).map_err(|source| SignalError {
                signal: self.name.clone(),
                index,
                source,
            })?;
        }
        Ok(())
    }
}

impl<A> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
