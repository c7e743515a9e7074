//! Integration test for pool lifecycles driven by random operation streams.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use spawnpool_core::{
    Activation, Payload, Pool, PoolError, PoolHandle, Poolable, PoolResult, Prototype,
    TypedPoolable,
};

#[derive(Clone, Debug, Default)]
struct Enemy {
    wave: u32,
    visible: bool,
}

impl Activation for Enemy {
    fn set_active(&mut self, active: bool) {
        self.visible = active;
    }
}

impl TypedPoolable for Enemy {
    type Payload = u32;

    fn initialize(&mut self, wave: u32) {
        self.wave = wave;
    }
}

/// Entity that takes any payload and records its type.
#[derive(Default)]
struct Probe {
    last: &'static str,
    visible: bool,
}

impl Activation for Probe {
    fn set_active(&mut self, active: bool) {
        self.visible = active;
    }
}

impl Poolable for Probe {
    fn initialize_with(&mut self, payload: Payload) -> PoolResult<()> {
        self.last = payload.type_name();
        Ok(())
    }
}

/// Free, active and pending slots partition the pool.
fn check_invariants(pool: &Pool<Enemy>, live: &[PoolHandle]) {
    let stats = pool.stats();
    assert_eq!(stats.slots, stats.active + stats.free + stats.pending);
    assert_eq!(stats.active, live.len());

    for handle in live {
        assert!(pool.is_active(*handle));
        assert!(!pool.is_free(handle.slot()));
        assert!(pool.get(*handle).unwrap().visible);
    }
    for slot in pool.free_slots() {
        assert!(slot < pool.len());
        assert!(live.iter().all(|h| h.slot() != slot));
    }
    for handle in pool.release_buffer() {
        assert!(!pool.is_free(handle.slot()));
        assert!(!pool.is_active(*handle));
    }

    let active: Vec<_> = pool.iter().map(|(h, _)| h).collect();
    assert_eq!(active.len(), live.len());
    assert!(active.windows(2).all(|w| w[0].slot() < w[1].slot()));
}

#[test]
fn test_random_create_release_sequences() {
    for seed in 0..16_u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut pool = Pool::new(Prototype::new(Enemy::default()));
        let mut live: Vec<PoolHandle> = Vec::new();

        for step in 0..500_u32 {
            match rng.gen_range(0..10) {
                0..=4 => {
                    let before = pool.len();
                    let had_free = pool.free_count() > 0;
                    let handle = pool.create(Payload::new(step)).unwrap();
                    assert_eq!(pool.get(handle).unwrap().wave, step);
                    if had_free {
                        assert_eq!(pool.len(), before);
                    } else {
                        assert_eq!(pool.len(), before + 1);
                    }
                    live.push(handle);
                }
                5..=7 if !live.is_empty() => {
                    let handle = live.swap_remove(rng.gen_range(0..live.len()));
                    pool.release(handle).unwrap();
                    assert!(!pool.get(handle).unwrap().visible);
                }
                8 => pool.start_release_buffer(),
                9 => pool.release_from_buffer(),
                _ => {}
            }
            check_invariants(&pool, &live);
        }

        pool.release_from_buffer();
        assert_eq!(pool.pending_count(), 0);
        check_invariants(&pool, &live);
    }
}

#[test]
fn test_slot_count_only_grows() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut pool = Pool::new(Enemy::default);
    let mut live = Vec::new();
    let mut high_water = 0;
    let mut peak_live = 0;

    for _ in 0..1_000 {
        if rng.gen_bool(0.6) || live.is_empty() {
            live.push(pool.create_typed(0));
        } else {
            let handle = live.swap_remove(rng.gen_range(0..live.len()));
            pool.release(handle).unwrap();
        }
        assert!(pool.len() >= high_water);
        high_water = pool.len();

        // Immediate mode grows only when every slot is issued
        peak_live = peak_live.max(live.len());
        assert_eq!(pool.len(), peak_live);
    }
}

#[test]
fn test_n_creates_make_n_slots() {
    let mut pool = Pool::new(Enemy::default);
    for wave in 0..64 {
        pool.create_typed(wave);
    }
    assert_eq!(pool.len(), 64);
    assert_eq!(pool.free_count(), 0);
}

#[test]
fn test_foreign_release_always_fails() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut home = Pool::new(Enemy::default);
    let mut other = Pool::new(Enemy::default);

    let handles: Vec<_> = (0..32).map(|w| home.create_typed(w)).collect();
    for _ in 0..32 {
        match rng.gen_range(0..3) {
            0 => other.start_release_buffer(),
            1 => other.release_from_buffer(),
            _ => {
                other.create_typed(0);
            }
        }
        let handle = handles[rng.gen_range(0..handles.len())];
        assert!(matches!(
            other.release(handle),
            Err(PoolError::Ownership { .. })
        ));
    }
    assert_eq!(home.active_count(), 32);
}

#[test]
fn test_frame_loop_defers_reuse() {
    let mut pool = Pool::new(Enemy::default);
    let mut live: Vec<_> = (0..8).map(|w| pool.create_typed(w)).collect();

    for frame in 0..10_u32 {
        pool.start_release_buffer();

        // Despawn half of the wave
        let despawned: Vec<_> = live.drain(..4).collect();
        for handle in &despawned {
            pool.release(*handle).unwrap();
        }

        // Spawns within the frame must not land on a despawned slot
        let spawned: Vec<_> = (0..4).map(|_| pool.create_typed(frame)).collect();
        for new in &spawned {
            assert!(despawned.iter().all(|old| old.slot() != new.slot()));
        }
        live.extend(spawned);

        pool.release_from_buffer();
        check_invariants(&pool, &live);
    }

    // Two frames worth of slots is the steady state
    assert_eq!(pool.len(), 12);
}

#[test]
fn test_release_all_then_regrow() {
    let mut pool = Pool::new(Enemy::default);
    let old: Vec<_> = (0..3).map(|w| pool.create_typed(w)).collect();

    pool.release_all();
    assert_eq!(pool.iter().count(), 0);
    for handle in old {
        assert!(pool.release(handle).is_err());
    }

    let fresh = pool.create_typed(10);
    assert_eq!(fresh.slot(), 0);
    assert_eq!(pool.len(), 1);
    check_invariants(&pool, &[fresh]);
}

#[test]
fn test_untyped_entity_accepts_any_payload() {
    let mut pool = Pool::new(Probe::default);
    let a = pool.create(Payload::new(1.5_f64)).unwrap();
    let b = pool.create(Payload::empty()).unwrap();

    assert_eq!(pool.get(a).unwrap().last, "f64");
    assert_eq!(pool.get(b).unwrap().last, "()");
    assert!(pool.get(b).unwrap().visible);
}

#[test]
fn test_type_mismatch_message() {
    let mut pool = Pool::new(Enemy::default);
    let err = pool.create(Payload::new(String::from("boss"))).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("cannot initialize "));
    assert!(message.ends_with("with alloc::string::String"));
}
