//! An extendible hash map.
//!
//! A directory of power-of-two size holds bucket references; every bucket
//! carries a local modulus dividing the directory size, and all directory
//! slots whose index agrees modulo that local modulus point at the same
//! bucket. An overflowing bucket splits in two; when the bucket already
//! uses every directory bit, the directory itself doubles first. Evicted
//! pairs are re-inserted through the ordinary `put` path, which may cascade
//! into further splits.
//!
//! Keys whose hashes collide in more than [`SLOTS`] entries at every depth
//! drive unbounded splitting; this is a known limitation of the structure.
//!
//! [`SLOTS`]: struct.ExtHashMap.html#associatedconstant.SLOTS

use log::debug;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::{iter::Entries, Index};
use crate::{keys::IndexKey, values::IndexValue};

#[derive(Debug)]
struct Bucket<K, V> {
    local_mod: usize,
    entries: Vec<(K, V)>,
}

/// A hashed index: an extendible hash table for point lookups.
///
/// [`size`] reports the slot capacity `SLOTS × nBuckets`, an upper bound on
/// the number of stored pairs; use [`population`] for the exact pair count.
///
/// [`size`]: trait.Index.html#tymethod.size
/// [`population`]: #method.population
#[derive(Debug)]
pub struct ExtHashMap<K, V> {
    directory: Vec<usize>,
    pool: Vec<Bucket<K, V>>,
    population: usize,
}

impl<K, V> ExtHashMap<K, V> {
    /// Number of key-value pairs a bucket can hold.
    pub const SLOTS: usize = 4;

    /// Creates a map whose directory starts with `initial_size` slots, each
    /// backed by its own bucket.
    ///
    /// # Panics
    ///
    /// Panics unless `initial_size` is a power of two (which includes 1).
    pub fn new(initial_size: usize) -> Self {
        assert!(
            initial_size.is_power_of_two(),
            "directory size must be a power of two"
        );
        let pool = (0..initial_size)
            .map(|_| Bucket {
                local_mod: initial_size,
                entries: Vec::new(),
            })
            .collect();
        Self {
            directory: (0..initial_size).collect(),
            pool,
            population: 0,
        }
    }

    /// Returns the number of stored pairs.
    pub fn population(&self) -> usize {
        self.population
    }

    /// Returns the current directory size.
    pub fn directory_size(&self) -> usize {
        self.directory.len()
    }

    /// Returns the number of allocated buckets.
    pub fn bucket_count(&self) -> usize {
        self.pool.len()
    }

    fn alloc_bucket(&mut self, local_mod: usize) -> usize {
        self.pool.push(Bucket {
            local_mod,
            entries: Vec::new(),
        });
        self.pool.len() - 1
    }
}

impl<K: IndexKey, V: IndexValue> ExtHashMap<K, V> {
    fn hash_of(key: &K) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    // Unsigned reduction: the hash is never negative, so `%` alone keeps the
    // slot in range.
    fn slot_of(key: &K, modulus: usize) -> usize {
        (Self::hash_of(key) % modulus as u64) as usize
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &K) -> Option<&V> {
        let bucket_id = self.directory[Self::slot_of(key, self.directory.len())];
        self.pool[bucket_id]
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Inserts `key` with `value`, replacing the stored value when the key
    /// is already present. Never fails; an overflowing bucket splits, which
    /// may double the directory.
    pub fn put(&mut self, key: K, value: V) {
        if self.insert_pair(key, value) {
            self.population += 1;
        }
    }

    /// Inserts one pair and reports whether it added a new key. Re-inserts
    /// of evicted pairs discard the report so the population only moves for
    /// the caller's pair.
    fn insert_pair(&mut self, key: K, value: V) -> bool {
        let slot = Self::slot_of(&key, self.directory.len());
        let bucket_id = self.directory[slot];
        let bucket = &mut self.pool[bucket_id];
        if let Some(entry) = bucket.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
            return false;
        }
        if bucket.entries.len() < Self::SLOTS {
            bucket.entries.push((key, value));
            return true;
        }
        let evicted = self.split(bucket_id, slot);
        for (k, v) in evicted {
            self.insert_pair(k, v);
        }
        self.insert_pair(key, value)
    }

    /// Splits the overfull bucket reached through `slot` and returns its
    /// evicted pairs. The bucket keeps its pool position as the first half;
    /// the second half is freshly allocated.
    fn split(&mut self, bucket_id: usize, slot: usize) -> Vec<(K, V)> {
        let local_mod = self.pool[bucket_id].local_mod;
        let global_mod = self.directory.len();
        let evicted = std::mem::take(&mut self.pool[bucket_id].entries);
        if local_mod == global_mod {
            // The bucket already consumes every directory bit.
            debug!(
                "doubling hash directory from {} to {} slots",
                global_mod,
                global_mod * 2
            );
            let copy = self.directory.clone();
            self.directory.extend(copy);
            let new_mod = global_mod * 2;
            self.pool[bucket_id].local_mod = new_mod;
            let second = self.alloc_bucket(new_mod);
            // The doubled directory maps `slot` and its high image to the
            // old bucket; point the high image at the second half.
            self.directory[slot + global_mod] = second;
        } else {
            let first = slot % local_mod;
            let new_local = local_mod * 2;
            self.pool[bucket_id].local_mod = new_local;
            let second = self.alloc_bucket(new_local);
            // Walk the slots sharing the bucket, alternating the halves.
            let mut step = 0;
            let mut index = first;
            while index < self.directory.len() {
                self.directory[index] = if step % 2 == 0 { bucket_id } else { second };
                step += 1;
                index += local_mod;
            }
        }
        evicted
    }

    /// Returns a snapshot of all entries by sweeping the bucket pool, so
    /// each pair is reported once regardless of directory aliasing.
    pub fn entries(&self) -> Entries<K, V> {
        Entries::new(
            self.pool
                .iter()
                .flat_map(|bucket| bucket.entries.iter().cloned())
                .collect(),
        )
    }

    /// Checks the directory and bucket invariants: power-of-two sizes,
    /// every bucket referenced by exactly `directory / local_mod` slots
    /// agreeing modulo the local modulus, no overfull buckets and every key
    /// stored in the bucket its hash selects. Intended for tests.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let global_mod = self.directory.len();
        if !global_mod.is_power_of_two() {
            return Err(format!("directory size {} is not a power of two", global_mod));
        }
        if self.directory.iter().any(|&b| b >= self.pool.len()) {
            return Err("directory references a bucket outside the pool".to_owned());
        }
        let mut referenced = vec![false; self.pool.len()];
        for &bucket_id in &self.directory {
            referenced[bucket_id] = true;
        }
        if !referenced.iter().all(|&r| r) {
            return Err("orphan bucket in the pool".to_owned());
        }

        let mut population = 0;
        for (bucket_id, bucket) in self.pool.iter().enumerate() {
            let local_mod = bucket.local_mod;
            if !local_mod.is_power_of_two() || local_mod > global_mod {
                return Err(format!(
                    "bucket {} has local modulus {} under directory size {}",
                    bucket_id, local_mod, global_mod
                ));
            }
            let slots: Vec<usize> = self
                .directory
                .iter()
                .enumerate()
                .filter(|&(_, &b)| b == bucket_id)
                .map(|(slot, _)| slot)
                .collect();
            if slots.len() != global_mod / local_mod {
                return Err(format!(
                    "bucket {} is referenced by {} slots, expected {}",
                    bucket_id,
                    slots.len(),
                    global_mod / local_mod
                ));
            }
            let residue = slots[0] % local_mod;
            if slots.iter().any(|&slot| slot % local_mod != residue) {
                return Err(format!("slots of bucket {} disagree modulo {}", bucket_id, local_mod));
            }
            if bucket.entries.len() > Self::SLOTS {
                return Err(format!("bucket {} holds {} entries", bucket_id, bucket.entries.len()));
            }
            for (key, _) in &bucket.entries {
                let slot = Self::slot_of(key, global_mod);
                if self.directory[slot] != bucket_id {
                    return Err(format!("key {:?} lives outside its hash bucket", key));
                }
            }
            population += bucket.entries.len();
        }
        if population != self.population {
            return Err(format!(
                "population {} but buckets hold {} pairs",
                self.population, population
            ));
        }
        Ok(())
    }
}

impl<K, V> Default for ExtHashMap<K, V> {
    /// Creates a map with a directory of two slots.
    fn default() -> Self {
        Self::new(2)
    }
}

impl<K: IndexKey, V: IndexValue> Index<K, V> for ExtHashMap<K, V> {
    fn get(&self, key: &K) -> Option<&V> {
        ExtHashMap::get(self, key)
    }

    fn put(&mut self, key: K, value: V) {
        ExtHashMap::put(self, key, value);
    }

    fn entries(&self) -> Entries<K, V> {
        ExtHashMap::entries(self)
    }

    /// The slot capacity `SLOTS × nBuckets`, not the number of stored pairs.
    fn size(&self) -> usize {
        Self::SLOTS * self.pool.len()
    }
}
