mod common;

use approx::assert_relative_eq;
use common::{compact_config, indices, make_resident, resolve_all, stub, RecordingSurface, StubFrame};
use scrollreel_core::{Config, DrawOutcome, Engine, FrameIndex, LoadError, Settlement};

fn engine(cfg: Config) -> Engine<StubFrame> {
    Engine::new(cfg).expect("valid config")
}

#[test]
fn smoothing_converges_geometrically_without_overshoot() {
    let mut eng = engine(Config::default());
    let mut surface = RecordingSurface::new(1280.0, 800.0);
    eng.on_resize(800.0);
    eng.on_scroll(10_000.0);

    let mut previous = eng.scroll().current();
    for k in 1..=60 {
        eng.tick(&mut surface);
        let current = eng.scroll().current();
        let expected_gap = 10_000.0 * 0.85_f64.powi(k);
        assert_relative_eq!(10_000.0 - current, expected_gap, max_relative = 1e-6);
        assert!(current > previous, "tick {k} did not advance");
        assert!(current < 10_000.0, "tick {k} overshot");
        previous = current;
    }
}

#[test]
fn steady_section_draws_once() {
    let mut eng = engine(Config::default());
    let mut surface = RecordingSurface::new(1280.0, 800.0);
    eng.on_resize(800.0);
    make_resident(&mut eng, &[0]);

    let first = eng.tick(&mut surface);
    assert_eq!(
        first.draw,
        DrawOutcome::Drew {
            section: FrameIndex(0)
        }
    );
    let calls_after_first = surface.calls.len();
    assert_eq!(surface.draws(), vec![0]);

    for _ in 0..20 {
        let out = eng.tick(&mut surface);
        assert_eq!(out.draw, DrawOutcome::Unchanged);
    }
    assert_eq!(surface.calls.len(), calls_after_first);
}

#[test]
fn draws_use_the_surface_logical_size() {
    let mut eng = engine(Config::default());
    let mut surface = RecordingSurface::new(390.0, 844.0);
    eng.on_resize(844.0);
    make_resident(&mut eng, &[0]);

    eng.tick(&mut surface);
    assert_eq!(
        surface.calls,
        vec![
            common::SurfaceCall::Clear,
            common::SurfaceCall::Draw {
                id: 0,
                size: surface.size
            }
        ]
    );
}

#[test]
fn missing_frame_falls_back_to_last_drawn() {
    let mut eng = engine(Config::default());
    let mut surface = RecordingSurface::new(1280.0, 100.0);
    eng.on_resize(100.0);
    make_resident(&mut eng, &[0]);
    eng.tick(&mut surface);

    // 0.15 * 1000 = 150px → section 1, which is not resident.
    eng.on_scroll(1000.0);
    let out = eng.tick(&mut surface);
    assert_eq!(
        out.draw,
        DrawOutcome::Fallback {
            section: FrameIndex(1),
            shown: FrameIndex(0)
        }
    );
    assert_eq!(surface.draws(), vec![0, 0]);
    assert!(out.draw.painted());
}

#[test]
fn nothing_drawn_before_any_frame_arrives() {
    let mut eng = engine(Config::default());
    let mut surface = RecordingSurface::new(1280.0, 800.0);
    eng.on_resize(800.0);

    let out = eng.tick(&mut surface);
    assert_eq!(
        out.draw,
        DrawOutcome::Skipped {
            section: FrameIndex(0)
        }
    );
    assert!(surface.calls.is_empty());
}

#[test]
fn fallback_is_kept_until_the_section_changes() {
    let mut eng = engine(compact_config());
    let mut surface = RecordingSurface::new(320.0, 100.0);
    eng.on_resize(100.0);
    make_resident(&mut eng, &[0]);
    eng.tick(&mut surface);

    // damping 0.5: 0 → 200 → 300 → 350 …, so sections 2, 3, 3 …
    eng.on_scroll(400.0);
    let out = eng.tick(&mut surface);
    assert_eq!(out.section, Some(FrameIndex(2)));
    let awaited: Vec<_> = out.loads.iter().map(|l| l.index).collect();
    assert!(matches!(out.draw, DrawOutcome::Fallback { .. }));

    resolve_all(&mut eng, &out.loads);
    assert!(awaited.contains(&FrameIndex(3)));

    let out = eng.tick(&mut surface);
    assert_eq!(
        out.draw,
        DrawOutcome::Drew {
            section: FrameIndex(3)
        }
    );
    assert_eq!(surface.draws().last(), Some(&3));
}

#[test]
fn invalidate_forces_a_repaint_of_the_same_section() {
    let mut eng = engine(Config::default());
    let mut surface = RecordingSurface::new(1280.0, 800.0);
    eng.on_resize(800.0);
    make_resident(&mut eng, &[0]);
    eng.tick(&mut surface);
    assert_eq!(eng.tick(&mut surface).draw, DrawOutcome::Unchanged);

    eng.invalidate();
    assert_eq!(
        eng.tick(&mut surface).draw,
        DrawOutcome::Drew {
            section: FrameIndex(0)
        }
    );
    assert_eq!(surface.draws(), vec![0, 0]);
}

#[test]
fn surface_failures_are_reported_not_raised() {
    let mut eng = engine(Config::default());
    let mut surface = RecordingSurface::new(1280.0, 800.0);
    surface.fail_draws = true;
    eng.on_resize(800.0);
    make_resident(&mut eng, &[0]);

    let out = eng.tick(&mut surface);
    assert_eq!(
        out.draw,
        DrawOutcome::Failed {
            section: FrameIndex(0)
        }
    );
    assert_eq!(eng.stats().last_drawn, None);
}

#[test]
fn section_is_clamped_to_the_last_frame() {
    let mut eng = engine(compact_config());
    let mut surface = RecordingSurface::new(320.0, 100.0);
    eng.on_resize(100.0);
    eng.on_scroll(1.0e9);
    for _ in 0..80 {
        eng.tick(&mut surface);
    }
    assert_eq!(eng.section(), FrameIndex(11));
}

#[test]
fn prefetch_runs_on_the_throttle_cadence() {
    let mut eng = engine(Config::default());
    let mut surface = RecordingSurface::new(1280.0, 800.0);
    eng.on_resize(800.0);

    for tick in 1..=4 {
        assert!(eng.tick(&mut surface).loads.is_empty(), "tick {tick}");
    }
    let out = eng.tick(&mut surface);
    assert_eq!(indices(&out.loads), (0..90).collect::<Vec<u32>>());
    for load in &out.loads {
        let expected = match load.index.get() {
            0..=39 => 0,
            40..=79 => 2,
            _ => 4,
        };
        assert_eq!(load.delay_ms, expected);
    }

    // Everything in the window is now pending; the next round asks for nothing new.
    for _ in 0..4 {
        eng.tick(&mut surface);
    }
    assert!(eng.tick(&mut surface).loads.is_empty());
}

#[test]
fn visibility_is_published_only_on_edges() {
    let mut eng = engine(compact_config());
    let mut surface = RecordingSurface::new(320.0, 100.0);
    eng.on_resize(100.0);
    assert!(eng.overlay_visible());

    eng.on_scroll(50.0);
    assert_eq!(eng.tick(&mut surface).visibility, None);

    eng.on_scroll(500.0);
    assert_eq!(eng.tick(&mut surface).visibility, Some(false));
    assert_eq!(eng.tick(&mut surface).visibility, None);
    assert_eq!(eng.tick(&mut surface).visibility, None);
    assert!(!eng.overlay_visible());

    eng.on_scroll(0.0);
    assert_eq!(eng.tick(&mut surface).visibility, Some(true));
    assert_eq!(eng.tick(&mut surface).visibility, None);
}

#[test]
fn visibility_check_follows_its_own_interval() {
    let mut eng = engine(Config::default());
    let mut surface = RecordingSurface::new(1280.0, 800.0);
    eng.on_resize(800.0);
    eng.on_scroll(800.0 * 10.0);

    for tick in 1..=9 {
        assert_eq!(eng.tick(&mut surface).visibility, None, "tick {tick}");
    }
    assert_eq!(eng.tick(&mut surface).visibility, Some(false));
}

#[test]
fn full_range_request_then_nothing_left() {
    let mut eng = engine(Config::default());
    let loads = eng.request_all();
    assert_eq!(loads.len(), 281);
    assert_eq!(loads.last().map(|l| l.delay_ms), Some(14));
    assert!(eng.request_all().is_empty());

    resolve_all(&mut eng, &loads);
    let stats = eng.stats();
    assert_eq!(stats.store.resident, 120);
    assert_eq!(stats.scheduler.pending, 0);
    assert_eq!(stats.scheduler.loaded, 281);
    // Evicted frames can be requested again.
    assert_eq!(eng.request_all().len(), 161);
}

#[test]
fn teardown_stops_ticks_and_ignores_late_loads() {
    let mut eng = engine(Config::default());
    let mut surface = RecordingSurface::new(1280.0, 800.0);
    eng.on_resize(800.0);
    let loads = eng.request([0, 1, 2]);
    eng.complete_load(FrameIndex(0), Ok(stub(0)));
    eng.tick(&mut surface);

    eng.teardown();
    assert!(eng.is_torn_down());
    assert_eq!(eng.tick(&mut surface).draw, DrawOutcome::Idle);
    assert!(eng.store().is_empty());

    for load in &loads[1..] {
        assert_eq!(
            eng.complete_load(load.index, Ok(stub(load.index.get()))),
            Settlement::Ignored
        );
    }
    assert_eq!(
        eng.complete_load(
            FrameIndex(2),
            Err(LoadError::failed(FrameIndex(2), "aborted"))
        ),
        Settlement::Ignored
    );
    assert!(eng.store().is_empty());
    assert!(eng.request_all().is_empty());
}

#[test]
fn scroll_extent_is_one_viewport_per_frame() {
    let mut eng = engine(Config::default());
    eng.on_resize(900.0);
    assert_eq!(eng.scroll_extent(), 281.0 * 900.0);

    eng.on_resize(0.0);
    assert_eq!(eng.scroll().viewport_height(), 1.0);
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = Config {
        damping: 0.0,
        ..Config::default()
    };
    assert!(Engine::<StubFrame>::new(cfg).is_err());
}

#[test]
fn failed_draw_is_retried_on_the_next_tick() {
    let mut eng = engine(Config::default());
    let mut surface = RecordingSurface::new(1280.0, 800.0);
    surface.fail_draws = true;
    eng.on_resize(800.0);
    make_resident(&mut eng, &[0]);

    assert!(matches!(
        eng.tick(&mut surface).draw,
        DrawOutcome::Failed { .. }
    ));

    surface.fail_draws = false;
    assert_eq!(
        eng.tick(&mut surface).draw,
        DrawOutcome::Drew {
            section: FrameIndex(0)
        }
    );
    assert_eq!(surface.draws(), vec![0]);
    assert_eq!(eng.tick(&mut surface).draw, DrawOutcome::Unchanged);
}

#[test]
fn oversized_cache_capacity_does_not_reserve_up_front() {
    let cfg = Config {
        cache_capacity: usize::MAX,
        ..Config::default()
    };
    let mut eng = engine(cfg);
    let loads = eng.request_all();
    resolve_all(&mut eng, &loads);
    assert_eq!(eng.store().len(), 281);
    assert_eq!(eng.stats().store.evicted, 0);
}
