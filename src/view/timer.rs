/// Holds at most one pending timer handle. Storing a new handle drops the
/// previous one, and dropping a `gloo` `Timeout` cancels it.
pub struct TimerSlot<H> {
    pending: Option<H>,
}

impl<H> TimerSlot<H> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn replace(&mut self, handle: H) {
        self.pending = Some(handle);
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}

impl<H> Default for TimerSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Handle(Rc<Cell<u32>>);

    impl Drop for Handle {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn replacing_cancels_previous() {
        let cancelled = Rc::new(Cell::new(0));
        let mut slot = TimerSlot::new();
        slot.replace(Handle(cancelled.clone()));
        assert_eq!(cancelled.get(), 0);
        slot.replace(Handle(cancelled.clone()));
        assert_eq!(cancelled.get(), 1);
        assert!(slot.is_armed());
        slot.cancel();
        assert_eq!(cancelled.get(), 2);
        assert!(!slot.is_armed());
    }
}
