use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

/// Callback invoked with the new console path on every history change.
pub type PathListener = Box<dyn Fn(String) + Send + Sync>;

/// Navigation history consumed by the session: path-change notifications
/// in, pushed paths out.
pub trait NavigationHistory: Send + Sync {
    /// Registers a listener. Dropping the returned guard unsubscribes it,
    /// so a torn-down session cannot leak listeners.
    fn subscribe(&self, listener: PathListener) -> HistorySubscription;

    /// Pushes a new path and notifies all listeners.
    fn push(&self, path: &str);

    fn current_path(&self) -> String;
}

/// RAII guard for a history subscription.
pub struct HistorySubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl HistorySubscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for HistorySubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

struct HistoryInner {
    current: String,
    listeners: HashMap<u64, PathListener>,
    next_id: u64,
}

/// In-memory navigation history for headless drivers and tests. A web
/// front end substitutes its own implementation bridging the browser
/// history.
#[derive(Clone)]
pub struct LocalHistory {
    inner: Arc<Mutex<HistoryInner>>,
}

impl LocalHistory {
    pub fn new(initial_path: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HistoryInner {
                current: initial_path.to_string(),
                listeners: HashMap::new(),
                next_id: 0,
            })),
        }
    }
}

impl NavigationHistory for LocalHistory {
    fn subscribe(&self, listener: PathListener) -> HistorySubscription {
        let id = {
            let mut inner = self.inner.lock().unwrap();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.insert(id, listener);
            id
        };

        let weak: Weak<Mutex<HistoryInner>> = Arc::downgrade(&self.inner);
        HistorySubscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.lock().unwrap().listeners.remove(&id);
            }
        })
    }

    fn push(&self, path: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.current = path.to_string();
        // Notify while holding the lock: listeners only forward into a
        // channel and must not call back into the history.
        for listener in inner.listeners.values() {
            listener(path.to_string());
        }
    }

    fn current_path(&self) -> String {
        self.inner.lock().unwrap().current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn push_notifies_subscribers_and_updates_current() {
        let history = LocalHistory::new("/browser/");
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        let _sub = history.subscribe(Box::new(move |path| {
            seen_clone.lock().unwrap().push(path);
        }));

        history.push("/browser/docs/");
        assert_eq!(history.current_path(), "/browser/docs/");
        assert_eq!(seen.lock().unwrap().as_slice(), ["/browser/docs/"]);
    }

    #[test]
    fn dropping_the_guard_unsubscribes() {
        let history = LocalHistory::new("/browser/");
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        let sub = history.subscribe(Box::new(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        }));

        history.push("/browser/a/");
        drop(sub);
        history.push("/browser/b/");

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
