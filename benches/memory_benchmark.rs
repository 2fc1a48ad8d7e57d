use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

use bevy::prelude::*;
use mpm3d::core::GridNode;
use mpm3d::scene::reference_scene;
use mpm3d::{Engine, MaterialType, MpmPlugin};
use rand::SeedableRng;
use rand::rngs::StdRng;

// Memory tracking allocator
struct TrackingAllocator;

static ALLOCATED: AtomicUsize = AtomicUsize::new(0);

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ret = unsafe { System.alloc(layout) };
        if !ret.is_null() {
            ALLOCATED.fetch_add(layout.size(), Ordering::SeqCst);
        }
        ret
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        ALLOCATED.fetch_sub(layout.size(), Ordering::SeqCst);
    }
}

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

fn get_memory_usage() -> usize {
    ALLOCATED.load(Ordering::SeqCst)
}

fn main() {
    let initial_baseline = get_memory_usage();
    println!("Baseline memory: {} KB", initial_baseline / 1024);

    let mut rng = StdRng::seed_from_u64(3);
    let engine = match reference_scene(MaterialType::Snow, &mut rng).into_engine() {
        Ok(engine) => engine,
        Err(err) => panic!("reference scene rejected: {err}"),
    };
    let total_nodes = engine.grid().node_count();
    println!(
        "Memory after scene setup: {} KB ({} particles)",
        get_memory_usage() / 1024,
        engine.particle_count()
    );

    let mut app = App::new();
    app.add_plugins(MpmPlugin).insert_resource(engine);
    for _ in 0..10 {
        app.update();
    }

    if let Some(engine) = app.world().get_resource::<Engine>() {
        println!("Memory after 10 steps: {} KB", get_memory_usage() / 1024);
        println!(
            "Dense grid: {} nodes, {} KB",
            total_nodes,
            total_nodes * size_of::<GridNode>() / 1024
        );
        println!(
            "Halted: {}, steps run: {}",
            engine.is_halted(),
            engine.step_count()
        );
    }
}
