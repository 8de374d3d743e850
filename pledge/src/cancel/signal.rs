use parking_lot::Mutex;

type Listener = Box<dyn FnOnce() + Send + 'static>;

/// Identifies a registered listener so it can be removed before the signal
/// fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListenerKey(u64);

struct Listeners {
    next_key: u64,
    entries: Vec<(u64, Listener)>,
}

/// A one-shot, multicast "cancellation was requested" notification.
///
/// Listeners run synchronously on the stack of whoever fires the signal,
/// outside of any internal lock, in registration order. The signal fires at
/// most once; a listener added after that runs immediately on the caller's
/// stack.
pub struct CancelSignal {
    /// Pending listeners, or `None` once the signal has fired.
    listeners: Mutex<Option<Listeners>>,
}

impl CancelSignal {
    pub(crate) fn new() -> Self {
        Self {
            listeners: Mutex::new(Some(Listeners {
                next_key: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Registers a listener.
    pub fn add<F>(&self, listener: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let _ = self.register(listener);
    }

    /// Registers a listener and returns its key, or runs it right away and
    /// returns `None` if the signal already fired.
    pub(crate) fn register<F>(&self, listener: F) -> Option<ListenerKey>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut listeners = self.listeners.lock();

        if let Some(pending) = listeners.as_mut() {
            let key = pending.next_key;
            pending.next_key += 1;
            pending.entries.push((key, Box::new(listener)));
            return Some(ListenerKey(key));
        }

        drop(listeners);
        listener();
        None
    }

    /// Drops a listener that has not run yet. Returns `false` if it is gone
    /// already, either removed or run by [`fire`](Self::fire).
    pub(crate) fn remove(&self, key: ListenerKey) -> bool {
        let removed = {
            let mut listeners = self.listeners.lock();

            listeners.as_mut().and_then(|pending| {
                let index = pending.entries.iter().position(|(k, _)| *k == key.0)?;
                Some(pending.entries.remove(index))
            })
        };

        // Dropped here, outside the lock.
        removed.is_some()
    }

    /// Returns `true` once the signal has fired.
    pub fn is_fired(&self) -> bool {
        self.listeners.lock().is_none()
    }

    /// Number of listeners still waiting for the signal.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .as_ref()
            .map_or(0, |pending| pending.entries.len())
    }

    /// Fires the signal.
    ///
    /// Returns `false` if it had already fired, in which case nothing runs.
    pub(crate) fn fire(&self) -> bool {
        let Some(listeners) = self.listeners.lock().take() else {
            return false;
        };

        for (_, listener) in listeners.entries {
            listener();
        }

        true
    }
}

impl std::fmt::Debug for CancelSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelSignal")
            .field("fired", &self.is_fired())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
