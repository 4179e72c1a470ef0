//! Per-generation resolution cache.
//!
//! # Role
//!
//! Wraps a [`RuleRegistry`] and remembers results keyed by `(family, query)`. The cache
//! belongs to one generation: the first lookup that sees a newer snapshot drops every
//! entry. Resolution is pure per snapshot, so a cached answer always equals a fresh one.
//!
//! Within a generation the cache holds at most `capacity` entries. Inserting past the
//! bound drops every entry and starts over.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use pickwise_descriptor::Descriptor;
use rustc_hash::FxHashMap;

use crate::candidate::Family;
use crate::error::ResolutionError;
use crate::index::RuleRegistry;

type Key = (Family, Descriptor);

/// Entry bound used by [`MemoResolver::new`].
pub const DEFAULT_CAPACITY: usize = 4096;

struct MemoState<H> {
	generation: u64,
	entries: FxHashMap<Key, Result<H, ResolutionError<H>>>,
}

/// Hit and miss counters plus the current entry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoStats {
	pub hits: u64,
	pub misses: u64,
	pub entries: usize,
	pub generation: u64,
}

/// Caching front for a shared [`RuleRegistry`].
pub struct MemoResolver<H> {
	registry: Arc<RuleRegistry<H>>,
	capacity: usize,
	state: RwLock<MemoState<H>>,
	hits: AtomicU64,
	misses: AtomicU64,
}

impl<H: Clone> MemoResolver<H> {
	pub fn new(registry: Arc<RuleRegistry<H>>) -> Self {
		Self::with_capacity(registry, DEFAULT_CAPACITY)
	}

	/// Creates a cache holding at most `capacity` entries (at least one).
	pub fn with_capacity(registry: Arc<RuleRegistry<H>>, capacity: usize) -> Self {
		let generation = registry.generation();
		Self {
			registry,
			capacity: capacity.max(1),
			state: RwLock::new(MemoState {
				generation,
				entries: FxHashMap::default(),
			}),
			hits: AtomicU64::new(0),
			misses: AtomicU64::new(0),
		}
	}

	/// Resolves through the cache.
	pub fn resolve(&self, family: &str, query: &Descriptor) -> Result<H, ResolutionError<H>> {
		let snap = self.registry.snapshot();
		let generation = snap.generation();
		let key: Key = (Family::from(family), query.clone());

		{
			let state = self.state.read();
			if state.generation == generation
				&& let Some(hit) = state.entries.get(&key)
			{
				self.hits.fetch_add(1, Ordering::Relaxed);
				return hit.clone();
			}
		}

		self.misses.fetch_add(1, Ordering::Relaxed);
		let result = snap.resolve(family, query);

		let mut state = self.state.write();
		if generation > state.generation {
			tracing::debug!(
				from = state.generation,
				to = generation,
				dropped = state.entries.len(),
				"memo cache invalidated"
			);
			state.entries.clear();
			state.generation = generation;
		}
		if state.generation == generation {
			if state.entries.len() >= self.capacity && !state.entries.contains_key(&key) {
				tracing::debug!(capacity = self.capacity, "memo cache full, dropping entries");
				state.entries.clear();
			}
			state.entries.insert(key, result.clone());
		}
		result
	}

	/// Drops every cached entry.
	pub fn clear(&self) {
		self.state.write().entries.clear();
	}

	pub fn stats(&self) -> MemoStats {
		let state = self.state.read();
		MemoStats {
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
			entries: state.entries.len(),
			generation: state.generation,
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::candidate::PriorityClass;
	use crate::index::RegistryBuilder;

	fn d(s: &str) -> Descriptor {
		s.parse().unwrap()
	}

	fn registry() -> Arc<RuleRegistry<&'static str>> {
		let mut builder = RegistryBuilder::new("memo");
		builder
			.register_candidate("container_ops", d("$T"), PriorityClass::Primary, "generic")
			.unwrap();
		builder
			.register_candidate("container_ops", d("$T*"), PriorityClass::Partial, "pointer")
			.unwrap();
		Arc::new(RuleRegistry::from_builder(builder))
	}

	#[test]
	fn test_memoized_equals_direct() {
		let registry = registry();
		let memo = MemoResolver::new(Arc::clone(&registry));
		for query in ["int", "int*", "void*", "$T"] {
			let query = d(query);
			let direct = registry.resolve("container_ops", &query);
			assert_eq!(memo.resolve("container_ops", &query), direct);
			assert_eq!(memo.resolve("container_ops", &query), direct);
		}
		let stats = memo.stats();
		assert_eq!((stats.hits, stats.misses, stats.entries), (4, 4, 4));
	}

	#[test]
	fn test_generation_change_drops_cache() {
		let registry = registry();
		let memo = MemoResolver::new(Arc::clone(&registry));
		assert_eq!(memo.resolve("container_ops", &d("void*")), Ok("pointer"));

		registry
			.reconfigure(|b| {
				b.register_candidate("container_ops", d("void*"), PriorityClass::Full, "void_ptr")
					.map(drop)
			})
			.unwrap();

		assert_eq!(memo.resolve("container_ops", &d("void*")), Ok("void_ptr"));
		assert_eq!(
			memo.stats(),
			MemoStats {
				hits: 0,
				misses: 2,
				entries: 1,
				generation: 1,
			}
		);
	}

	#[test]
	fn test_capacity_bounds_entries() {
		let registry = registry();
		let memo = MemoResolver::with_capacity(Arc::clone(&registry), 2);
		for query in ["int", "char", "int*"] {
			let query = d(query);
			assert_eq!(memo.resolve("container_ops", &query), registry.resolve("container_ops", &query));
		}
		assert_eq!(memo.stats().entries, 1);

		assert_eq!(memo.resolve("container_ops", &d("int*")), Ok("pointer"));
		let stats = memo.stats();
		assert_eq!((stats.hits, stats.misses, stats.entries), (1, 3, 1));
	}

	#[test]
	fn test_clear() {
		let memo = MemoResolver::new(registry());
		let _ = memo.resolve("container_ops", &d("int"));
		memo.clear();
		assert_eq!(memo.stats().entries, 0);
	}
}
