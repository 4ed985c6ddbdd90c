//! Ordered, failure-contained observer channels
//!
//! The pipeline exposes observation hooks (resolved certificate, endpoint
//! URL, effective sending time) that must never influence control flow: a
//! failing observer is logged and contained, and every observer runs even
//! when an earlier one fails. Registration order is invocation order.

use std::fmt;
use tracing::warn;

type Observer<T> = Box<dyn Fn(&T) -> anyhow::Result<()> + Send + Sync>;

/// An ordered list of observers for one observation channel
pub struct ObserverList<T: ?Sized> {
    channel: &'static str,
    observers: Vec<Observer<T>>,
}

impl<T: ?Sized> ObserverList<T> {
    pub fn new(channel: &'static str) -> Self {
        Self {
            channel,
            observers: Vec::new(),
        }
    }

    /// Append an observer; it runs after all previously registered ones
    pub fn register(
        &mut self,
        observer: impl Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
    ) {
        self.observers.push(Box::new(observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Invoke every observer in registration order
    ///
    /// Observer failures are logged and contained; they never propagate and
    /// never stop later observers from running.
    pub fn notify(&self, value: &T) {
        for (index, observer) in self.observers.iter().enumerate() {
            if let Err(e) = observer(value) {
                warn!(
                    "{} observer #{} failed (contained): {:#}",
                    self.channel, index, e
                );
            }
        }
    }
}

impl<T: ?Sized> fmt::Debug for ObserverList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("channel", &self.channel)
            .field("len", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_observers_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut list: ObserverList<str> = ObserverList::new("test");

        for tag in 1..=3 {
            let order = order.clone();
            list.register(move |_value| {
                order.lock().unwrap().push(tag);
                Ok(())
            });
        }

        list.notify("value");
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_failure_does_not_stop_later_observers() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut list: ObserverList<u32> = ObserverList::new("test");

        {
            let order = order.clone();
            list.register(move |_| {
                order.lock().unwrap().push("first");
                Err(anyhow::anyhow!("observer blew up"))
            });
        }
        {
            let order = order.clone();
            list.register(move |_| {
                order.lock().unwrap().push("second");
                Ok(())
            });
        }

        // Must not panic or propagate
        list.notify(&42);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_empty_list_notify_is_a_no_op() {
        let list: ObserverList<str> = ObserverList::new("empty");
        assert!(list.is_empty());
        list.notify("nothing happens");
    }
}
