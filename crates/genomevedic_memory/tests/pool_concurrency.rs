//! Integration tests for pools shared across threads.

use crossbeam_channel::bounded;
use genomevedic_memory::{
    Arena, ArenaSpan, BufferPool, MonitoredPool, ObjectPool, ParticlePool, PooledArena, VoxelPool,
};
use genomevedic_shared::Particle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const CYCLES: usize = 500;

#[test]
fn test_particle_pool_many_threads() {
    let pool = Arc::new(ParticlePool::new(256));
    assert_eq!(pool.prewarm(THREADS), THREADS);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(t as u64);
                for _ in 0..CYCLES {
                    let mut slice = pool.get();
                    assert!(slice.is_empty());
                    assert_eq!(slice.capacity(), 256);

                    let fill = rng.gen_range(0..=256);
                    for _ in 0..fill {
                        assert!(slice.push(Particle::new([1.0; 3], [1.0; 4], 1.0, 0)));
                    }
                    assert_eq!(slice.len(), fill);
                    pool.put(slice);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    // Prewarmed slices cover every thread, so none is created or lost.
    assert_eq!(pool.idle_count(), THREADS);
}

#[test]
fn test_monitored_pool_counts_every_call() {
    let pool = Arc::new(MonitoredPool::new(VoxelPool::new(64)));
    assert_eq!(pool.inner().prewarm(THREADS), THREADS);

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                for i in 0..CYCLES {
                    let mut voxel = pool.get();
                    assert!(voxel.push(u32::try_from(i).unwrap_or(u32::MAX)));
                    pool.put(voxel);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let stats = pool.stats();
    let total = (THREADS * CYCLES) as u64;
    assert_eq!(stats.gets, total);
    assert_eq!(stats.puts, total);
    assert_eq!(stats.reuses, total);
    assert_eq!(pool.inner().idle_count(), THREADS);
}

#[test]
fn test_buffers_returned_from_another_thread() {
    let pool = Arc::new(BufferPool::new(4096));
    let (tx, rx) = bounded(4);

    let producer = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || {
            let mut rng = StdRng::seed_from_u64(7);
            for _ in 0..CYCLES {
                let mut buffer = pool.get();
                let len = rng.gen_range(1..=4096);
                buffer.storage_mut()[..len].fill(b'A');
                buffer.set_len(len);
                tx.send(buffer).expect("consumer alive");
            }
        })
    };

    let consumer = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || {
            let mut received = 0;
            for buffer in rx {
                assert!(buffer.as_slice().iter().all(|&b| b == b'A'));
                pool.put(buffer);
                received += 1;
            }
            received
        })
    };

    producer.join().expect("producer panicked");
    let received = consumer.join().expect("consumer panicked");

    assert_eq!(received, CYCLES);
    // Channel capacity 4, plus one in each thread's hands.
    assert!(pool.idle_count() <= 6);
    assert!(pool.get().is_empty());
}

#[test]
fn test_pooled_arena_many_threads() {
    let arenas = Arc::new(PooledArena::new(4096));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let arenas = Arc::clone(&arenas);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(100 + t as u64);
                for _ in 0..CYCLES {
                    let arena = arenas.get_arena();
                    assert_eq!(arena.used(), 0);
                    let size = rng.gen_range(1..=4096);
                    assert!(arena.alloc(size).is_some());
                    arenas.put_arena(arena);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let stats = arenas.stats();
    assert_eq!(stats.reuses, (THREADS * CYCLES) as u64);
    assert!(stats.allocations >= 1);
    assert!(stats.allocations <= THREADS as u64);
    assert_eq!(arenas.idle_count() as u64, stats.allocations);
}

#[test]
fn test_scoped_checkouts_across_threads() {
    let pool = Arc::new(ParticlePool::new(32));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                for _ in 0..CYCLES {
                    let mut slice = pool.checkout();
                    slice.set_len(32);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    assert!(pool.idle_count() <= THREADS);
    assert!(pool.get().is_empty());
}

#[test]
fn test_shared_arena_concurrent_alloc() {
    const ALLOCS: usize = 1000;
    let arena = Arc::new(Arena::new(THREADS * ALLOCS * 8));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let arena = Arc::clone(&arena);
            thread::spawn(move || {
                (0..ALLOCS)
                    .map(|_| arena.alloc(5).expect("arena sized for every thread"))
                    .collect::<Vec<ArenaSpan>>()
            })
        })
        .collect();

    let mut spans: Vec<ArenaSpan> = handles
        .into_iter()
        .flat_map(|h| h.join().expect("worker panicked"))
        .collect();
    spans.sort_by_key(|span| span.offset());

    assert_eq!(spans.len(), THREADS * ALLOCS);
    for pair in spans.windows(2) {
        assert!(pair[0].offset() + 8 <= pair[1].offset());
    }
    assert_eq!(arena.used(), arena.capacity());
    assert!(arena.alloc(1).is_none());
}
