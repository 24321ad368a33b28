/// Handle returned by [`Event::add_listener`]; pass it back to remove the listener.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Ordered listener registry.
///
/// Listeners run in registration order. Ids are never reused, so a stale
/// handle cannot remove a newer listener.
pub struct Event<A: ?Sized> {
    next_id: u64,
    listeners: Vec<(ListenerId, Box<dyn FnMut(&A)>)>,
}

impl<A: ?Sized> Default for Event<A> {
    fn default() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }
}

impl<A: ?Sized> std::fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<A: ?Sized> Event<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&A) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `true` if a listener was removed.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|(lid, _)| *lid == id)
    }

    pub fn raise(&mut self, args: &A) {
        for (_, listener) in &mut self.listeners {
            listener(args);
        }
    }

    pub fn number_of_listeners(&self) -> usize {
        self.listeners.len()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::Event;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn raises_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut event: Event<u32> = Event::new();

        let a = Rc::clone(&log);
        event.add_listener(move |v| a.borrow_mut().push(("a", *v)));
        let b = Rc::clone(&log);
        event.add_listener(move |v| b.borrow_mut().push(("b", *v)));

        event.raise(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn removed_listener_stops_firing() {
        let hits = Rc::new(RefCell::new(0));
        let mut event: Event<()> = Event::new();
        let h = Rc::clone(&hits);
        let id = event.add_listener(move |_| *h.borrow_mut() += 1);

        event.raise(&());
        assert!(event.remove_listener(id));
        assert!(!event.remove_listener(id));
        event.raise(&());

        assert_eq!(*hits.borrow(), 1);
        assert_eq!(event.number_of_listeners(), 0);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut event: Event<()> = Event::new();
        let first = event.add_listener(|_| {});
        event.remove_listener(first);
        let second = event.add_listener(|_| {});
        assert_ne!(first, second);
        assert!(!event.contains(first));
        assert!(event.contains(second));
    }
}
