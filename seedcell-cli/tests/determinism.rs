//! End-to-end tests verifying deterministic Voronoi output.
//!
//! Given the same seed, a scene must produce identical pixels across
//! runs, and an animated run must end on the same image as an instant fill.

use seedcell_core::{
    fill_animated, fill_instant, AnimationSpeed, Generation, GenerationRun, Raster, RunStatus,
    SeedSet, Session, SessionConfig,
};

const BACKGROUND: [u8; 3] = [0xf8, 0xf9, 0xfa];

fn render_instant(width: u32, height: u32, points: usize, seed: u64) -> Raster {
    let seeds = SeedSet::random(points, width as f64, height as f64, seed);
    let mut raster = Raster::filled(width, height, BACKGROUND);
    fill_instant(&mut raster, seeds.as_slice());
    raster
}

fn render_animated(width: u32, height: u32, points: usize, seed: u64, speed: f64) -> Raster {
    let seeds = SeedSet::random(points, width as f64, height as f64, seed);
    let raster = Raster::filled(width, height, BACKGROUND);
    let mut run = GenerationRun::new(
        raster,
        seeds.as_slice(),
        AnimationSpeed::new(speed).expect("valid speed"),
    );
    assert_eq!(run.run_to_end(), RunStatus::Complete);
    run.into_raster()
}

fn assert_images_equal(expected: &[u8], actual: &[u8], name: &str) {
    assert_eq!(expected.len(), actual.len(), "{}: size mismatch", name);
    assert!(expected == actual, "{}: pixel data mismatch", name);
}

mod instant {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let a = render_instant(160, 120, 25, 12345);
        let b = render_instant(160, 120, 25, 12345);
        assert_images_equal(a.as_raw(), b.as_raw(), "reproducibility");
    }

    #[test]
    fn test_different_seeds_produce_different_output() {
        let a = render_instant(160, 120, 25, 0);
        let b = render_instant(160, 120, 25, 1);
        assert_ne!(a.as_raw(), b.as_raw(), "Different seeds should produce different output");
    }

    #[test]
    fn test_every_pixel_opaque() {
        let raster = render_instant(97, 61, 30, 7);
        assert!(raster.as_raw().chunks_exact(4).all(|px| px[3] == 255));
    }
}

mod animated {
    use super::*;

    #[test]
    fn test_matches_instant_fill() {
        for (seed, speed) in [(0, 1.0), (3, 15.0), (42, 37.5), (9, 100.0)] {
            let instant = render_instant(120, 90, 20, seed);
            let animated = render_animated(120, 90, 20, seed, speed);
            assert_images_equal(
                instant.as_raw(),
                animated.as_raw(),
                &format!("seed {} speed {}", seed, speed),
            );
        }
    }

    #[test]
    fn test_frame_callbacks_see_growing_coverage() {
        let seeds = SeedSet::random(10, 80.0, 60.0, 5);
        let mut fractions = Vec::new();
        let mut completions = 0;
        let mut animation = fill_animated(
            Raster::filled(80, 60, BACKGROUND),
            seeds.as_slice(),
            AnimationSpeed::new(10.0).unwrap(),
            |run: &GenerationRun| fractions.push(run.resolved().fraction()),
            |_: &GenerationRun| completions += 1,
        );
        assert_eq!(animation.run_to_end(), RunStatus::Complete);
        let raster = animation.into_run().into_raster();

        // diagonal 100 at 10px per frame
        assert_eq!(fractions.len(), 10);
        assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(fractions.last(), Some(&1.0));
        assert_eq!(completions, 1);
        assert_images_equal(
            render_instant(80, 60, 10, 5).as_raw(),
            raster.as_raw(),
            "callback run",
        );
    }

    #[test]
    fn test_cancelled_run_stops_early() {
        let seeds = SeedSet::random(4, 300.0, 300.0, 11);
        let mut run = GenerationRun::new(
            Raster::filled(300, 300, BACKGROUND),
            seeds.as_slice(),
            AnimationSpeed::new(2.0).unwrap(),
        );
        let handle = run.cancel_handle();
        run.step();
        run.step();
        handle.cancel();

        assert_eq!(run.step(), RunStatus::Cancelled);
        assert_eq!(run.frame_count(), 2);
        assert!(run.resolved().fraction() < 1.0);
    }
}

mod session {
    use super::*;

    fn session(animated: bool, seed: u64) -> Session {
        let config = SessionConfig {
            width: 200,
            height: 150,
            animated,
            ..SessionConfig::default()
        };
        let mut session = Session::new(config, seed).unwrap();
        session.generate_random_points(Some(12));
        session
    }

    #[test]
    fn test_animated_surface_matches_instant_surface() {
        let mut instant = session(false, 99);
        assert_eq!(instant.generate().unwrap(), Generation::Finished);

        let mut animated = session(true, 99);
        assert_eq!(animated.generate().unwrap(), Generation::Started);
        while animated.tick().is_some() {}

        assert_eq!(instant.seeds(), animated.seeds());
        assert_images_equal(
            instant.surface().as_raw(),
            animated.surface().as_raw(),
            "session surfaces",
        );
    }

    #[test]
    fn test_png_round_trip() {
        let mut session = session(false, 4);
        session.generate().unwrap();

        let path = std::env::temp_dir().join(format!("seedcell-{}.png", std::process::id()));
        session.surface().save(&path).expect("save png");
        let loaded = image::open(&path).expect("open png").to_rgba8();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.dimensions(), (200, 150));
        assert_images_equal(session.surface().as_raw(), loaded.as_raw(), "png");
    }
}
