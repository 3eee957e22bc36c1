// MIT License
//
// Copyright (c) 2019 Gregory Meyer
//
// Permission is hereby granted, free of charge, to any person
// obtaining a copy of this software and associated documentation files
// (the "Software"), to deal in the Software without restriction,
// including without limitation the rights to use, copy, modify, merge,
// publish, distribute, sublicense, and/or sell copies of the Software,
// and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS
// BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN
// ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! A concurrent hash map implemented with separate chaining under a single
//! reader-writer lock.

mod bucket;


use bucket::BucketArray;

use std::{
    borrow::Borrow,
    hash::{BuildHasher, Hash, Hasher},
};

use ahash::RandomState;
use parking_lot::RwLock;

/// Default hasher for `HashMap`.
///
/// This is currently [aHash], a hashing algorithm designed around
/// acceleration by the [AES-NI] instruction set on x86 processors. aHash is
/// not cryptographically secure, but is fast and resistant to DoS attacks.
///
/// [aHash]: https://docs.rs/ahash
/// [AES-NI]: https://en.wikipedia.org/wiki/AES_instruction_set
pub type DefaultHashBuilder = RandomState;

/// A concurrent hash map implemented with separate chaining under a single
/// reader-writer lock.
///
/// The bucket array, together with its entry chains and length counter, is
/// guarded as one unit by a [`RwLock`]. Read-only operations
/// ([`len`], [`is_empty`], [`get`], [`get_and`], [`contains_key`],
/// [`contains_value`]) acquire it in shared mode and may run concurrently
/// with each other; mutating operations ([`insert`], [`remove`], [`clear`])
/// acquire it exclusively. Every operation is therefore atomic with respect
/// to every other, but sequences of operations are not: checking
/// [`contains_key`] and then calling [`insert`] is two critical sections,
/// and another thread may write in between.
///
/// The table starts with 16 buckets and doubles whenever an insertion fills
/// it to three quarters of its bucket count, relinking existing entries by
/// their stored hashes. Removal never shrinks the table; [`clear`] replaces
/// it with a fresh one of the default size.
///
/// Key types must implement [`Hash`] and [`Eq`]. Keys are hashed with
/// [aHash] via [`DefaultHashBuilder`]; there is one hashing strategy per
/// map, seeded at construction. Operations that return a previously stored
/// value ([`insert`] and [`remove`]) move it out of the table, since the
/// exclusive lock guarantees no other thread holds a reference to it.
/// [`get`] instead requires `V: Clone`, as a reference into the table
/// cannot outlive the shared lock; [`get_and`] can be used to borrow the
/// value without cloning it.
///
/// [`RwLock`]: https://docs.rs/parking_lot/latest/parking_lot/type.RwLock.html
/// [aHash]: https://docs.rs/ahash
/// [`Hash`]: https://doc.rust-lang.org/std/hash/trait.Hash.html
/// [`Eq`]: https://doc.rust-lang.org/std/cmp/trait.Eq.html
/// [`len`]: #method.len
/// [`is_empty`]: #method.is_empty
/// [`get`]: #method.get
/// [`get_and`]: #method.get_and
/// [`contains_key`]: #method.contains_key
/// [`contains_value`]: #method.contains_value
/// [`insert`]: #method.insert
/// [`remove`]: #method.remove
/// [`clear`]: #method.clear
pub struct HashMap<K: Hash + Eq, V> {
    buckets: RwLock<BucketArray<K, V>>,
    hash_builder: DefaultHashBuilder,
}

impl<K: Hash + Eq, V> HashMap<K, V> {
    /// Creates an empty `HashMap` with the default number of buckets (16).
    ///
    /// Construction takes no parameters and cannot fail.
    pub fn new() -> HashMap<K, V> {
        HashMap {
            buckets: RwLock::new(BucketArray::new()),
            hash_builder: DefaultHashBuilder::default(),
        }
    }

    /// Returns the number of key-value pairs in the map.
    pub fn len(&self) -> usize {
        self.buckets.read().len()
    }

    /// Returns true if the map contains no key-value pairs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a clone of the value associated with `key`, or [`None`] if
    /// there is no such value.
    ///
    /// `Q` can be any borrowed form of `K`, but [`Hash`] and [`Eq`] on `Q`
    /// *must* match that of `K`. `V` must implement [`Clone`], as a
    /// reference into the table cannot outlive the shared lock; use
    /// [`get_and`] to borrow the value instead.
    ///
    /// [`None`]: https://doc.rust-lang.org/std/option/enum.Option.html#variant.None
    /// [`Hash`]: https://doc.rust-lang.org/std/hash/trait.Hash.html
    /// [`Eq`]: https://doc.rust-lang.org/std/cmp/trait.Eq.html
    /// [`Clone`]: https://doc.rust-lang.org/std/clone/trait.Clone.html
    /// [`get_and`]: #method.get_and
    pub fn get<Q: ?Sized + Hash + Eq>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        V: Clone,
    {
        self.get_and(key, V::clone)
    }

    /// Invokes `func` with a reference to the value associated with `key`,
    /// returning its result.
    ///
    /// `func` is only invoked if there is a value associated with `key`, and
    /// it runs while the shared lock is held: invoking a mutating operation
    /// on the same map from within `func` will deadlock. Nested read-side
    /// calls such as [`get`] or [`contains_key`] can deadlock too, as the
    /// shared lock is not recursion-safe once a writer is waiting for it.
    ///
    /// `Q` can be any borrowed form of `K`, but [`Hash`] and [`Eq`] on `Q`
    /// *must* match that of `K`.
    ///
    /// [`get`]: #method.get
    /// [`contains_key`]: #method.contains_key
    /// [`Hash`]: https://doc.rust-lang.org/std/hash/trait.Hash.html
    /// [`Eq`]: https://doc.rust-lang.org/std/cmp/trait.Eq.html
    pub fn get_and<Q: ?Sized + Hash + Eq, F: FnOnce(&V) -> T, T>(
        &self,
        key: &Q,
        func: F,
    ) -> Option<T>
    where
        K: Borrow<Q>,
    {
        let hash = self.get_hash(key);

        self.buckets.read().get(hash, key).map(func)
    }

    /// Returns true if the map contains a value for `key`.
    ///
    /// This is defined as the corresponding lookup succeeding: it delegates
    /// to [`get_and`] and acquires no lock of its own. It does not require
    /// `V: Clone`.
    ///
    /// `Q` can be any borrowed form of `K`, but [`Hash`] and [`Eq`] on `Q`
    /// *must* match that of `K`.
    ///
    /// [`get_and`]: #method.get_and
    /// [`Hash`]: https://doc.rust-lang.org/std/hash/trait.Hash.html
    /// [`Eq`]: https://doc.rust-lang.org/std/cmp/trait.Eq.html
    pub fn contains_key<Q: ?Sized + Hash + Eq>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.get_and(key, |_| ()).is_some()
    }

    /// Returns true if any value in the map compares equal to `value`.
    ///
    /// Walks every bucket chain under the shared lock, so this is linear in
    /// the size of the map.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.buckets.read().contains_value(value)
    }

    /// Inserts a key-value pair into the map, returning the value previously
    /// associated with `key` if there was one.
    ///
    /// If `key` was already present, its value is replaced in place and the
    /// previous value is moved out and returned; the key stored in the map
    /// is kept and the one passed here is dropped. If `key` was absent, a
    /// new entry is appended to its bucket's chain, [`None`] is returned,
    /// and the table doubles if the insertion filled it to three quarters of
    /// its bucket count.
    ///
    /// [`None`]: https://doc.rust-lang.org/std/option/enum.Option.html#variant.None
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        let hash = self.get_hash(&key);

        self.buckets.write().insert(hash, key, value)
    }

    /// Removes the value associated with `key` from the map, returning it if
    /// there was one.
    ///
    /// The entry is unlinked from its chain and its value moved out. The
    /// table never shrinks on removal.
    ///
    /// `Q` can be any borrowed form of `K`, but [`Hash`] and [`Eq`] on `Q`
    /// *must* match that of `K`.
    ///
    /// [`Hash`]: https://doc.rust-lang.org/std/hash/trait.Hash.html
    /// [`Eq`]: https://doc.rust-lang.org/std/cmp/trait.Eq.html
    pub fn remove<Q: ?Sized + Hash + Eq>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
    {
        let hash = self.get_hash(key);

        self.buckets.write().remove(hash, key)
    }

    /// Removes all key-value pairs from the map, as if it were freshly
    /// constructed.
    ///
    /// The table is replaced with an empty one of the default size; every
    /// entry is dropped before the exclusive lock is released.
    pub fn clear(&self) {
        *self.buckets.write() = BucketArray::new();
    }

    fn get_hash<Q: ?Sized + Hash + Eq>(&self, key: &Q) -> u64 {
        let mut hasher = self.hash_builder.build_hasher();
        key.hash(&mut hasher);
        let hash = hasher.finish();

        // spread the high bits down into the range the bucket mask keeps
        hash ^ (hash >> 16)
    }
}

impl<K: Hash + Eq, V> Default for HashMap<K, V> {
    fn default() -> HashMap<K, V> {
        HashMap::new()
    }
}
