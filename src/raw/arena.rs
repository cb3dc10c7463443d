use alloc::vec::Vec;

use super::handle::Handle;

/// One arena slot: a live element, or a link in the free list.
#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<Handle> },
}

/// Growable slot arena with stable handles.
///
/// Freed slots are threaded into an intrusive free list and reused before
/// the backing vector grows again, so a live element's handle stays valid
/// across unrelated alloc/free traffic.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<Handle>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Stores `element` and returns its handle, preferring a recycled slot.
    /// Panics before touching any slot once the handle space is exhausted.
    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        let handle = if let Some(handle) = self.free_head {
            let slot = &mut self.slots[handle.to_index()];
            self.free_head = match slot {
                Slot::Vacant { next_free } => *next_free,
                Slot::Occupied(_) => unreachable!("`Arena::alloc()` - free list points at an occupied slot!"),
            };
            *slot = Slot::Occupied(element);
            handle
        } else {
            // `Handle::MAX` is the largest encodable index, so the push below
            // must land at an index no greater than that.
            assert!(
                self.slots.len() <= Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX + 1
            );
            self.slots.push(Slot::Occupied(element));
            Handle::from_index(self.slots.len() - 1)
        };
        self.len += 1;
        handle
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get()` - `handle` is invalid!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get_mut()` - `handle` is invalid!"),
        }
    }

    /// Returns a reference to an element by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `Arena<T>`.
    #[inline]
    pub(crate) unsafe fn get_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a T {
        // SAFETY: Caller guarantees ptr is valid. Only the slots vector is read.
        match unsafe { &(&(*ptr).slots)[handle.to_index()] } {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get_ptr()` - `handle` is invalid!"),
        }
    }

    /// Returns a mutable reference to an element by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `Arena<T>`.
    /// - The caller must have logical exclusive access to the element at `handle`.
    #[inline]
    pub(crate) unsafe fn get_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut T {
        // SAFETY: Caller guarantees ptr is valid and the element is not aliased.
        match unsafe { &mut (&mut (*ptr).slots)[handle.to_index()] } {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get_mut_ptr()` - `handle` is invalid!"),
        }
    }

    /// Removes and returns the element at `handle`, leaving its slot on the
    /// free list.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let slot = &mut self.slots[handle.to_index()];
        assert!(matches!(slot, Slot::Occupied(_)), "`Arena::take()` - `handle` is invalid!");
        let element = match core::mem::replace(
            slot,
            Slot::Vacant {
                next_free: self.free_head,
            },
        ) {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => unreachable!(),
        };
        self.free_head = Some(handle);
        self.len -= 1;
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}
