use super::handle::Handle;

/// Color tag carried by every tree node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A red-black tree node.
///
/// `key` is `None` only for the shared sentinel in arena slot 0; every real
/// node holds a key plus a handle to its value in the values arena. All
/// three links use [`Handle::NIL`] for "no node".
#[derive(Clone)]
pub(crate) struct Node<K> {
    key: Option<K>,
    value: Handle,
    color: Color,
    parent: Handle,
    left: Handle,
    right: Handle,
}

impl<K> Node<K> {
    /// The shared sentinel: black, keyless, every link pointing back at
    /// itself.
    pub(crate) const fn sentinel() -> Self {
        Self {
            key: None,
            value: Handle::NIL,
            color: Color::Black,
            parent: Handle::NIL,
            left: Handle::NIL,
            right: Handle::NIL,
        }
    }

    /// A detached node ready for attachment: red, with sentinel children and
    /// parent.
    pub(crate) const fn new(key: K, value: Handle) -> Self {
        Self {
            key: Some(key),
            value,
            color: Color::Red,
            parent: Handle::NIL,
            left: Handle::NIL,
            right: Handle::NIL,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        self.key.as_ref().expect("`Node::key()` - the sentinel has no key!")
    }

    /// Removes the key, leaving a hull whose links remain walkable.
    pub(crate) fn take_key(&mut self) -> K {
        self.key.take().expect("`Node::take_key()` - the sentinel has no key!")
    }

    pub(crate) fn into_key(self) -> K {
        self.key.expect("`Node::into_key()` - the sentinel has no key!")
    }

    #[inline]
    pub(crate) const fn value(&self) -> Handle {
        self.value
    }

    #[inline]
    pub(crate) const fn color(&self) -> Color {
        self.color
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Handle {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Handle) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Handle {
        self.left
    }

    pub(crate) fn set_left(&mut self, left: Handle) {
        self.left = left;
    }

    #[inline]
    pub(crate) const fn right(&self) -> Handle {
        self.right
    }

    pub(crate) fn set_right(&mut self, right: Handle) {
        self.right = right;
    }
}
