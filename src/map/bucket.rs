// MIT License
//
// Copyright (c) 2020 Gregory Meyer
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

use std::{borrow::Borrow, iter, mem};

pub(crate) const DEFAULT_LENGTH: usize = 16;

const MAX_LOAD_FACTOR: f64 = 0.75;

/// A fixed-length array of singly linked entry chains, indexed by
/// precomputed hash.
///
/// Hashing and locking are the caller's concern: every operation takes the
/// key's already-derived hash, and the caller must hold its lock in the
/// appropriate mode. The array length is always a power of two, so a bucket
/// index is a bitwise mask of the hash.
pub(crate) struct BucketArray<K, V> {
    buckets: Box<[Option<Box<Node<K, V>>>]>,
    len: usize,
}

struct Node<K, V> {
    hash: u64,
    key: K,
    value: V,
    next: Option<Box<Node<K, V>>>,
}

impl<K, V> BucketArray<K, V> {
    pub(crate) fn new() -> BucketArray<K, V> {
        BucketArray::with_length(DEFAULT_LENGTH)
    }

    fn with_length(length: usize) -> BucketArray<K, V> {
        assert!(length.is_power_of_two());

        BucketArray {
            buckets: iter::repeat_with(|| None).take(length).collect(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub(crate) fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_index(&self, hash: u64) -> usize {
        hash as usize & (self.buckets.len() - 1)
    }

    pub(crate) fn get<Q: ?Sized + Eq>(&self, hash: u64, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        let mut next = &self.buckets[self.bucket_index(hash)];

        while let Some(node) = next {
            if node.hash == hash && node.key.borrow() == key {
                return Some(&node.value);
            }

            next = &node.next;
        }

        None
    }

    pub(crate) fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        for mut next in self.buckets.iter() {
            while let Some(node) = next {
                if node.value == *value {
                    return true;
                }

                next = &node.next;
            }
        }

        false
    }

    pub(crate) fn insert(&mut self, hash: u64, key: K, value: V) -> Option<V>
    where
        K: Eq,
    {
        let index = self.bucket_index(hash);
        let mut next = &mut self.buckets[index];

        loop {
            match next {
                Some(node) if node.hash == hash && node.key == key => {
                    // the node keeps its original key; the caller's copy is
                    // dropped
                    return Some(mem::replace(&mut node.value, value));
                }
                Some(node) => next = &mut node.next,
                None => {
                    *next = Some(Box::new(Node {
                        hash,
                        key,
                        value,
                        next: None,
                    }));

                    self.len += 1;

                    if self.len as f64 >= self.buckets.len() as f64 * MAX_LOAD_FACTOR {
                        self.grow();
                    }

                    return None;
                }
            }
        }
    }

    pub(crate) fn remove<Q: ?Sized + Eq>(&mut self, hash: u64, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
    {
        let index = self.bucket_index(hash);
        let mut next = &mut self.buckets[index];

        loop {
            match next {
                Some(node) if node.hash == hash && node.key.borrow() == key => {
                    let unlinked = node.next.take();
                    self.len -= 1;

                    return mem::replace(next, unlinked).map(|node| node.value);
                }
                Some(node) => next = &mut node.next,
                None => return None,
            }
        }
    }

    fn grow(&mut self) {
        let new_length = self.buckets.len() * 2;
        let mut new_buckets: Box<[Option<Box<Node<K, V>>>]> =
            iter::repeat_with(|| None).take(new_length).collect();

        for bucket in self.buckets.iter_mut() {
            let mut next = bucket.take();

            // relink each node by its stored hash; chains may end up
            // reversed
            while let Some(mut node) = next {
                next = node.next.take();

                let index = node.hash as usize & (new_length - 1);
                node.next = new_buckets[index].take();
                new_buckets[index] = Some(node);
            }
        }

        self.buckets = new_buckets;
    }
}
