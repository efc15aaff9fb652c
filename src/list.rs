use alloc::boxed::Box;
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ptr;

/// A node in the doubly linked list.
///
/// Contains a value and pointers to the previous and next entries.
/// This structure is not meant to be used directly outside of [`KeySet`](crate::key_set).
pub(crate) struct Entry<T> {
    /// The value stored in this entry. Uses MaybeUninit to allow for sigil nodes.
    val: mem::MaybeUninit<T>,
    /// Pointer to the previous entry in the list.
    prev: *mut Entry<T>,
    /// Pointer to the next entry in the list.
    next: *mut Entry<T>,
}

impl<T> Entry<T> {
    fn new(val: T) -> Self {
        Entry {
            val: mem::MaybeUninit::new(val),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Creates a new sigil (sentinel) entry without initializing the value.
    ///
    /// Sigil entries are used as head and tail markers in the list.
    fn new_sigil() -> Self {
        Entry {
            val: mem::MaybeUninit::uninit(),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }
}

/// An unbounded doubly linked list with stable node addresses.
///
/// Every node lives in its own heap allocation, so a `*mut Entry<T>` handed out by
/// [`push_front`](List::push_front) stays valid until that node is removed. This lets an
/// external index jump straight to a node and relink it in O(1). The list uses sentinel
/// nodes (sigils) at the head and tail so that no operation has to special-case the ends.
///
/// Front is the most recently pushed or moved node, back is the least recent one.
pub(crate) struct List<T> {
    /// Current number of items in the list.
    len: usize,
    /// Pointer to the head sentinel node.
    head: *mut Entry<T>,
    /// Pointer to the tail sentinel node.
    tail: *mut Entry<T>,
}

impl<T> List<T> {
    /// Creates an empty list with its two sentinel nodes linked together.
    pub(crate) fn new() -> List<T> {
        let head = Box::into_raw(Box::new(Entry::new_sigil()));
        let tail = Box::into_raw(Box::new(Entry::new_sigil()));

        // SAFETY: head and tail are newly allocated and valid pointers
        unsafe {
            (*head).next = tail;
            (*tail).prev = head;
        }

        List { len: 0, head, tail }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds a value to the front of the list and returns a pointer to its node.
    pub(crate) fn push_front(&mut self, v: T) -> *mut Entry<T> {
        let node = Box::into_raw(Box::new(Entry::new(v)));
        // SAFETY: node is a newly allocated entry that is not part of any list yet
        unsafe { self.attach(node) };
        self.len += 1;
        node
    }

    /// Moves a node to the front of the list without reallocating it.
    ///
    /// # Safety
    ///
    /// `node` must point to a live, non-sigil entry of this list.
    pub(crate) unsafe fn move_to_front(&mut self, node: *mut Entry<T>) {
        // SAFETY: head is valid for the lifetime of the list
        if unsafe { (*self.head).next } == node {
            return;
        }
        // SAFETY: caller guarantees node belongs to this list
        unsafe {
            self.detach(node);
            self.attach(node);
        }
    }

    /// Unlinks a node, frees it and returns the value it held.
    ///
    /// # Safety
    ///
    /// `node` must point to a live, non-sigil entry of this list. The pointer is
    /// dangling once this returns.
    pub(crate) unsafe fn remove(&mut self, node: *mut Entry<T>) -> T {
        // SAFETY: caller guarantees node belongs to this list and was allocated by
        // `push_front`, so it came from `Box::new` and holds an initialized value
        unsafe {
            self.detach(node);
            self.len -= 1;
            let entry = *Box::from_raw(node);
            entry.val.assume_init()
        }
    }

    /// Removes the last (least recently pushed) value from the list.
    pub(crate) fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the node before the tail sentinel is a
        // regular entry owned by this list
        unsafe {
            let last = (*self.tail).prev;
            Some(self.remove(last))
        }
    }

    /// Returns an iterator over the values from front to back.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            // SAFETY: head is valid for the lifetime of the list
            next: unsafe { (*self.head).next },
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Removes and drops every value in the list.
    pub(crate) fn clear(&mut self) {
        while self.pop_back().is_some() {}
    }

    /// Detaches a node from its neighbours without deallocating it.
    ///
    /// # Safety
    ///
    /// `node` must be a valid, non-sigil entry of this list.
    unsafe fn detach(&mut self, node: *mut Entry<T>) {
        // SAFETY: The caller guarantees that node is a valid entry in the list,
        // which means its prev and next pointers are also valid entries.
        unsafe {
            (*(*node).prev).next = (*node).next;
            (*(*node).next).prev = (*node).prev;
        }
    }

    /// Attaches a node right after the head sentinel.
    ///
    /// # Safety
    ///
    /// `node` must be valid and not currently linked into any list.
    unsafe fn attach(&mut self, node: *mut Entry<T>) {
        // SAFETY: head is a valid pointer initialized in `new`, and the caller
        // guarantees that node is a valid entry not already in the list
        unsafe {
            (*node).next = (*self.head).next;
            (*node).prev = self.head;
            (*self.head).next = node;
            (*(*node).next).prev = node;
        }
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();

        // SAFETY: head and tail were allocated in `new` and are only freed here
        unsafe {
            drop(Box::from_raw(self.head));
            drop(Box::from_raw(self.tail));
        }
    }
}

impl<T> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List").field("length", &self.len).finish()
    }
}

/// Front-to-back iterator over a [`List`].
pub(crate) struct Iter<'a, T> {
    next: *mut Entry<T>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: `remaining` counts the regular nodes left before the tail sentinel,
        // and the shared borrow of the list keeps them alive and unmodified
        unsafe {
            let node = self.next;
            self.next = (*node).next;
            self.remaining -= 1;
            Some((*node).val.assume_init_ref())
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish()
    }
}
