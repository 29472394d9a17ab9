use alloc::collections::VecDeque;
use alloc::rc::Rc;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeSet;
#[cfg(feature = "std")]
use std::collections::HashSet;

#[cfg(feature = "std")]
type MemberSet = HashSet<usize>;
#[cfg(not(feature = "std"))]
type MemberSet = BTreeSet<usize>;

// Queued handles keep their allocation alive, so the address identifies an item while it is
// queued.
fn member_key<I: ?Sized>(item: &Rc<I>) -> usize {
    Rc::as_ptr(item).cast::<()>() as usize
}

/// Ordered backlog of items that were appended but not populated yet.
///
/// Insertion order is display order. The queue holds shared handles, never copies, and an item
/// (by pointer identity) appears at most once.
pub struct LazyQueue<I: ?Sized> {
    items: VecDeque<Rc<I>>,
    members: MemberSet,
}

impl<I: ?Sized> Default for LazyQueue<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ?Sized> LazyQueue<I> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
            members: MemberSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &Rc<I>) -> bool {
        self.members.contains(&member_key(item))
    }

    /// Appends `item` at the back.
    ///
    /// Returns `false` (and leaves the queue untouched) when the item is already queued.
    pub fn push_back(&mut self, item: Rc<I>) -> bool {
        if !self.members.insert(member_key(&item)) {
            lwarn!("LazyQueue: item already queued");
            return false;
        }
        self.items.push_back(item);
        true
    }

    pub fn pop_front(&mut self) -> Option<Rc<I>> {
        let item = self.items.pop_front()?;
        self.members.remove(&member_key(&item));
        Some(item)
    }

    /// Removes `item` wherever it is. Returns whether it was queued.
    pub fn remove(&mut self, item: &Rc<I>) -> bool {
        if !self.members.remove(&member_key(item)) {
            return false;
        }
        if let Some(index) = self.items.iter().position(|it| Rc::ptr_eq(it, item)) {
            self.items.remove(index);
        }
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.members.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<I>> {
        self.items.iter()
    }
}

impl<I: ?Sized> core::fmt::Debug for LazyQueue<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LazyQueue")
            .field("len", &self.items.len())
            .finish_non_exhaustive()
    }
}
