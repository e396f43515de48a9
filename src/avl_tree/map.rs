use crate::avl_tree::tree;
use crate::bst::{Result, TreeIter};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Borrow;
use std::cmp;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::result;
use std::vec;

/// An ordered map implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of the two child subtrees of any node differ by at most one. Every node keeps a link to
/// its parent and a balance factor, the height of its right subtree minus the height of its left
/// subtree. Insertions and removals update balance factors on the way back up to the root and stop
/// as soon as a subtree is known to keep its height, so rebalancing touches at most the path to
/// the root.
///
/// # Examples
///
/// ```
/// use avl_map::avl_tree::AvlMap;
///
/// let mut map = AvlMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map[&0], 1);
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.min(), Some(&0));
/// assert_eq!(map.ceil(&2), Some(&3));
///
/// map[&0] = 2;
/// assert_eq!(map.remove(&0), Some((0, 2)));
/// assert_eq!(map.remove(&1), None);
/// ```
pub struct AvlMap<T, U> {
    tree: tree::Tree<T, U>,
}

impl<T, U> AvlMap<T, U> {
    /// Constructs a new, empty `AvlMap<T, U>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let map: AvlMap<u32, u32> = AvlMap::new();
    /// ```
    pub fn new() -> Self {
        AvlMap {
            tree: tree::Tree::new(),
        }
    }

    /// Constructs a new, empty `AvlMap<T, U>` that can hold `capacity` entries before its node
    /// storage has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let map: AvlMap<u32, u32> = AvlMap::with_capacity(1024);
    /// assert!(map.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        AvlMap {
            tree: tree::Tree::with_capacity(capacity),
        }
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let map: AvlMap<u32, u32> = AvlMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the map, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the height of the underlying tree. An empty map has height 0 and a map with a
    /// single entry has height 1. The height is recomputed on every call.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// for key in 0..7 {
    ///     map.insert(key, key);
    /// }
    /// assert_eq!(map.height(), 3);
    /// ```
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Returns the minimum key of the map. Returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.tree.first().map(|id| self.tree.key(id))
    }

    /// Returns the maximum key of the map. Returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.tree.last().map(|id| self.tree.key(id))
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs using in-order
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlMapIter<T, U> {
        AvlMapIter {
            tree_iter: self.tree.iter(),
        }
    }
}

impl<T, U> AvlMap<T, U>
where
    T: Ord,
{
    /// Inserts a key-value pair into the map. If the key already exists in the map, its value is
    /// replaced and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// assert_eq!(map.insert(1, 1), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Some(1));
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> Option<U> {
        tree::insert(&mut self.tree, key, value)
    }

    /// Removes a key-value pair from the map. If the key exists in the map, it will return the
    /// associated key-value pair. Otherwise it will return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Option<(T, U)>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::remove(&mut self.tree, key)
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.find(key).is_some()
    }

    /// Returns an immutable reference to the value associated with a particular key. It will
    /// return `None` if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn get<V>(&self, key: &V) -> Option<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.find(key).map(|id| self.tree.value(id))
    }

    /// Returns a mutable reference to the value associated with a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// *map.get_mut(&1).unwrap() = 2;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut<V>(&mut self, key: &V) -> Option<&mut U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let id = self.tree.find(key)?;
        Some(self.tree.value_mut(id))
    }

    /// Returns an immutable reference to the value associated with a particular key, or
    /// `Error::KeyNotFound` if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    /// use avl_map::bst::Error;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.find(&1), Ok(&1));
    /// assert_eq!(map.find(&0), Err(Error::KeyNotFound));
    /// ```
    pub fn find<V>(&self, key: &V) -> Result<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.at(key).map(|id| self.tree.value(id))
    }

    /// Returns a key in the map that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.floor(&0), None);
    /// assert_eq!(map.floor(&2), Some(&1));
    /// ```
    pub fn floor<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.floor(key).map(|id| self.tree.key(id))
    }

    /// Returns a key in the map that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.ceil(&0), Some(&1));
    /// assert_eq!(map.ceil(&2), None);
    /// ```
    pub fn ceil<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.ceil(key).map(|id| self.tree.key(id))
    }

    /// Returns the greatest key in the map that is strictly less than a particular key. Returns
    /// `None` if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.predecessor(&3), Some(&1));
    /// assert_eq!(map.predecessor(&2), Some(&1));
    /// assert_eq!(map.predecessor(&1), None);
    /// ```
    pub fn predecessor<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let id = match self.tree.find(key) {
            Some(id) => self.tree.predecessor(id),
            None => self.tree.floor(key),
        };
        id.map(|id| self.tree.key(id))
    }

    /// Returns the least key in the map that is strictly greater than a particular key. Returns
    /// `None` if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.successor(&1), Some(&3));
    /// assert_eq!(map.successor(&2), Some(&3));
    /// assert_eq!(map.successor(&3), None);
    /// ```
    pub fn successor<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let id = match self.tree.find(key) {
            Some(id) => self.tree.successor(id),
            None => self.tree.ceil(key),
        };
        id.map(|id| self.tree.key(id))
    }

    /// Checks the structure of the underlying tree: key order, parent links, and that every
    /// stored balance factor matches the actual subtree heights and lies in `-1..=1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// for key in 0..100 {
    ///     map.insert(key, key);
    /// }
    /// assert!(map.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()> {
        tree::validate(&self.tree)
    }
}

impl<T, U> AvlMap<T, U>
where
    T: fmt::Display,
{
    /// Renders the shape of the tree sideways, one key per line followed by its balance factor.
    /// Right subtrees are printed above their parent and left subtrees below it.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_map::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, ());
    /// map.insert(2, ());
    /// map.insert(3, ());
    /// assert_eq!(map.render(), "    3 (0)\n2 (0)\n    1 (0)\n");
    /// ```
    pub fn render(&self) -> String {
        self.tree
            .render(|node| format!("{} ({})", node.entry.key, node.aux))
    }
}

impl<T, U> IntoIterator for AvlMap<T, U> {
    type IntoIter = AvlMapIntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            entries: self.tree.into_entries().into_iter(),
        }
    }
}

impl<'a, T, U> IntoIterator for &'a AvlMap<T, U>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = AvlMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `AvlMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields owned entries.
pub struct AvlMapIntoIter<T, U> {
    entries: vec::IntoIter<(T, U)>,
}

impl<T, U> Iterator for AvlMapIntoIter<T, U> {
    type Item = (T, U);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

/// An iterator for `AvlMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields immutable references.
pub struct AvlMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    tree_iter: TreeIter<'a, T, U, i8>,
}

impl<'a, T, U> Iterator for AvlMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        self.tree_iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tree_iter.size_hint()
    }
}

impl<T, U> Default for AvlMap<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> fmt::Debug for AvlMap<T, U>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T, U> PartialEq for AvlMap<T, U>
where
    T: PartialEq,
    U: PartialEq,
{
    fn eq(&self, other: &AvlMap<T, U>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, U> Eq for AvlMap<T, U>
where
    T: Eq,
    U: Eq,
{
}

impl<T, U> FromIterator<(T, U)> for AvlMap<T, U>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
    {
        let mut map = AvlMap::new();
        map.extend(iter);
        map
    }
}

impl<T, U> Extend<(T, U)> for AvlMap<T, U>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (T, U)>,
    {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, T, U, V> Index<&'a V> for AvlMap<T, U>
where
    T: Ord + Borrow<V>,
    V: Ord + ?Sized,
{
    type Output = U;

    fn index(&self, key: &V) -> &Self::Output {
        self.get(key).expect("Error: key does not exist.")
    }
}

impl<'a, T, U, V> IndexMut<&'a V> for AvlMap<T, U>
where
    T: Ord + Borrow<V>,
    V: Ord + ?Sized,
{
    fn index_mut(&mut self, key: &V) -> &mut Self::Output {
        self.get_mut(key).expect("Error: key does not exist.")
    }
}

impl<T, U> Serialize for AvlMap<T, U>
where
    T: Serialize,
    U: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct AvlMapVisitor<T, U> {
    marker: PhantomData<fn() -> AvlMap<T, U>>,
}

impl<'de, T, U> Visitor<'de> for AvlMapVisitor<T, U>
where
    T: Deserialize<'de> + Ord,
    U: Deserialize<'de>,
{
    type Value = AvlMap<T, U>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<M>(self, mut access: M) -> result::Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut map = AvlMap::with_capacity(cmp::min(access.size_hint().unwrap_or(0), 4096));
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, T, U> Deserialize<'de> for AvlMap<T, U>
where
    T: Deserialize<'de> + Ord,
    U: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(AvlMapVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::AvlMap;
    use crate::bst::Error;
    use serde_test::{assert_tokens, Token};

    #[test]
    fn test_len_empty() {
        let map: AvlMap<u32, u32> = AvlMap::new();
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let map: AvlMap<u32, u32> = AvlMap::new();
        assert!(map.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let map: AvlMap<u32, u32> = AvlMap::new();
        assert_eq!(map.min(), None);
        assert_eq!(map.max(), None);
    }

    #[test]
    fn test_insert() {
        let mut map = AvlMap::new();
        assert_eq!(map.insert(1, 1), None);
        assert!(map.contains_key(&1));
        assert_eq!(map.get(&1), Some(&1));
    }

    #[test]
    fn test_insert_replace() {
        let mut map = AvlMap::new();
        for key in 0..15 {
            map.insert(key, key);
        }
        let height = map.height();
        assert_eq!(map.insert(7, 70), Some(7));
        assert_eq!(map.get(&7), Some(&70));
        assert_eq!(map.len(), 15);
        assert_eq!(map.height(), height);
    }

    #[test]
    fn test_remove() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        assert_eq!(map.remove(&1), Some((1, 1)));
        assert!(!map.contains_key(&1));
        assert_eq!(map.remove(&1), None);
    }

    #[test]
    fn test_min_max() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.min(), Some(&1));
        assert_eq!(map.max(), Some(&5));
    }

    #[test]
    fn test_get_mut() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        {
            let value = map.get_mut(&1);
            *value.unwrap() = 3;
        }
        assert_eq!(map.get(&1), Some(&3));
    }

    #[test]
    fn test_find() {
        let mut map = AvlMap::new();
        map.insert(String::from("a"), 1);
        assert_eq!(map.find("a"), Ok(&1));
        assert_eq!(map.find("b"), Err(Error::KeyNotFound));
    }

    #[test]
    fn test_floor_ceil() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.floor(&0), None);
        assert_eq!(map.floor(&2), Some(&1));
        assert_eq!(map.floor(&4), Some(&3));
        assert_eq!(map.floor(&6), Some(&5));

        assert_eq!(map.ceil(&0), Some(&1));
        assert_eq!(map.ceil(&2), Some(&3));
        assert_eq!(map.ceil(&4), Some(&5));
        assert_eq!(map.ceil(&6), None);
    }

    #[test]
    fn test_predecessor_successor() {
        let map: AvlMap<u32, ()> = (0..10).map(|key| (key * 2, ())).collect();

        assert_eq!(map.predecessor(&0), None);
        assert_eq!(map.predecessor(&7), Some(&6));
        assert_eq!(map.predecessor(&8), Some(&6));
        assert_eq!(map.predecessor(&100), Some(&18));

        assert_eq!(map.successor(&18), None);
        assert_eq!(map.successor(&7), Some(&8));
        assert_eq!(map.successor(&8), Some(&10));
        assert_eq!(map.successor(&0), Some(&2));
    }

    #[test]
    fn test_into_iter() {
        let mut map = AvlMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.into_iter().collect::<Vec<(u32, u32)>>(),
            vec![(1, 2), (3, 4), (5, 6)],
        );
    }

    #[test]
    fn test_iter() {
        let mut map = AvlMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.iter().collect::<Vec<(&u32, &u32)>>(),
            vec![(&1, &2), (&3, &4), (&5, &6)],
        );
    }

    #[test]
    fn test_index() {
        let mut map = AvlMap::new();
        map.insert(1, 2);
        map[&1] += 1;
        assert_eq!(map[&1], 3);
    }

    #[test]
    #[should_panic]
    fn test_index_missing() {
        let map: AvlMap<u32, u32> = AvlMap::new();
        let _value = map[&1];
    }

    #[test]
    fn test_debug() {
        let map: AvlMap<u32, char> = vec![(2, 'b'), (1, 'a')].into_iter().collect();
        assert_eq!(format!("{:?}", map), "{1: 'a', 2: 'b'}");
    }

    #[test]
    fn test_render() {
        let map: AvlMap<u32, ()> = vec![1, 3, 5, 10, 6, 11, 8, 4, 7]
            .into_iter()
            .map(|key| (key, ()))
            .collect();
        assert_eq!(
            map.render(),
            concat!(
                "        11 (0)\n",
                "    10 (-1)\n",
                "        8 (-1)\n",
                "            7 (0)\n",
                "6 (0)\n",
                "        5 (-1)\n",
                "            4 (0)\n",
                "    3 (1)\n",
                "        1 (0)\n",
            ),
        );
    }

    #[test]
    fn test_serde_tokens() {
        let mut map = AvlMap::new();
        map.insert(2u32, 'b');
        map.insert(1u32, 'a');

        assert_tokens(
            &map,
            &[
                Token::Map { len: Some(2) },
                Token::U32(1),
                Token::Char('a'),
                Token::U32(2),
                Token::Char('b'),
                Token::MapEnd,
            ],
        );
    }

    #[test]
    fn test_bincode() {
        let map: AvlMap<u32, u64> = (0..100).map(|key| (key, u64::from(key) * 3)).collect();
        let bytes = bincode::serialize(&map).unwrap();
        let decoded: AvlMap<u32, u64> = bincode::deserialize(&bytes).unwrap();
        decoded.validate().unwrap();
        assert_eq!(decoded, map);
    }

    #[test]
    fn test_bincode_oversized_length() {
        let bytes = (1u64 << 40).to_le_bytes();
        let decoded: bincode::Result<AvlMap<u32, u32>> = bincode::deserialize(&bytes);
        assert!(decoded.is_err());
    }
}
