mod tests {
    use silvanus_strip::color::BLACK;
    use silvanus_strip::{Animation, AnimationState, INFINITE, Rgb};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
    const LEDS: usize = 8;

    fn is_lit(frame: &[Rgb]) -> bool {
        frame.iter().any(|led| *led != BLACK)
    }

    /// Index of the brightest pixel
    fn peak(frame: &[Rgb]) -> usize {
        frame
            .iter()
            .enumerate()
            .max_by_key(|(_, led)| u16::from(led.r) + u16::from(led.g) + u16::from(led.b))
            .map(|(index, _)| index)
            .unwrap()
    }

    #[test]
    fn test_new_animation_is_stopped() {
        let animation = Animation::wave();
        assert_eq!(animation.state(), AnimationState::Stopped);
        assert_eq!(animation.remaining_loops(), 0);
    }

    #[test]
    fn test_play_zero_stops_after_first_update() {
        let animations = [
            Animation::blank(),
            Animation::solid(RED),
            Animation::flash(RED),
            Animation::wave(),
            Animation::pulse(RED),
            Animation::connecting(),
            Animation::progress(BLUE),
        ];
        for mut animation in animations {
            let mut leds = [BLACK; LEDS];
            animation.play(0);
            assert_eq!(animation.state(), AnimationState::Starting, "{animation:?}");
            animation.update(&mut leds, 0.01);
            assert_eq!(animation.state(), AnimationState::Stopped, "{animation:?}");
            assert_eq!(animation.remaining_loops(), 0, "{animation:?}");
        }
    }

    #[test]
    fn test_starting_becomes_playing() {
        let mut animation = Animation::pulse(RED);
        let mut leds = [BLACK; LEDS];

        animation.play(INFINITE);
        assert_eq!(animation.state(), AnimationState::Starting);
        assert!(animation.playback().started_at().is_some());
        animation.update(&mut leds, 0.0);
        assert_eq!(animation.state(), AnimationState::Playing);
        assert!(animation.playback().last_update().is_some());
    }

    #[test]
    fn test_infinite_play_never_stops() {
        let animations = [
            Animation::blank(),
            Animation::solid(RED),
            Animation::flash(RED),
            Animation::wave(),
            Animation::pulse(RED),
            Animation::connecting(),
        ];
        for mut animation in animations {
            let mut leds = [BLACK; LEDS];
            animation.play(INFINITE);
            for _ in 0..2_000 {
                animation.update(&mut leds, 0.1);
            }
            assert_eq!(animation.state(), AnimationState::Playing, "{animation:?}");
            assert_eq!(animation.remaining_loops(), INFINITE);
        }
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut animation = Animation::connecting();
        animation.play(INFINITE);
        animation.stop();
        assert_eq!(animation.state(), AnimationState::Stopped);
        animation.stop();
        assert_eq!(animation.state(), AnimationState::Stopped);
    }

    #[test]
    fn test_solid_and_blank() {
        let mut leds = [BLUE; LEDS];
        let mut blank = Animation::blank();
        blank.play(INFINITE);
        blank.update(&mut leds, 1.0);
        assert_eq!(leds, [BLACK; LEDS]);

        let mut solid = Animation::solid(RED);
        solid.play(INFINITE);
        for delta in [0.0, 0.5, 100.0] {
            solid.update(&mut leds, delta);
            assert_eq!(leds, [RED; LEDS]);
        }
    }

    #[test]
    fn test_parameter_is_ignored_by_time_based_patterns() {
        let mut animation = Animation::solid(RED);
        animation.parameter(0.7);
        assert!(animation.phase().abs() < f32::EPSILON);
    }

    #[test]
    fn test_single_flash_ends_dark() {
        let mut animation = Animation::flash(RED);
        let mut leds = [BLACK; LEDS];
        let mut saw_lit = false;

        animation.play(1);
        for _ in 0..100 {
            animation.update(&mut leds, 0.03);
            saw_lit |= is_lit(&leds);
            if animation.state() == AnimationState::Stopped {
                break;
            }
        }

        assert!(saw_lit);
        assert_eq!(animation.state(), AnimationState::Stopped);
        assert!(!is_lit(&leds), "last frame of a flash should be dark");
    }

    #[test]
    fn test_flash_counts_loops() {
        let mut animation = Animation::flash(RED);
        let mut leds = [BLACK; LEDS];
        let mut flashes = 0;
        let mut was_lit = false;

        animation.play(3);
        for _ in 0..200 {
            animation.update(&mut leds, 0.03);
            let lit = is_lit(&leds);
            if lit && !was_lit {
                flashes += 1;
            }
            was_lit = lit;
            if animation.state() == AnimationState::Stopped {
                break;
            }
        }

        assert_eq!(animation.state(), AnimationState::Stopped);
        assert_eq!(flashes, 3);
    }

    #[test]
    fn test_infinite_flash_keeps_strobing() {
        let mut animation = Animation::flash(RED);
        let mut leds = [BLACK; LEDS];
        let mut lit_frames = 0;
        let mut dark_frames = 0;

        animation.play(INFINITE);
        for _ in 0..300 {
            animation.update(&mut leds, 0.03);
            if is_lit(&leds) {
                lit_frames += 1;
            } else {
                dark_frames += 1;
            }
        }

        assert!(lit_frames > 150);
        assert!(dark_frames > 50);
    }

    #[test]
    fn test_loops_count_down() {
        let mut animation = Animation::wave();
        let mut leds = [BLACK; LEDS];

        animation.play(2);
        animation.update(&mut leds, 24.0);
        assert_eq!(animation.remaining_loops(), 1);
        assert_eq!(animation.state(), AnimationState::Playing);
        assert!((animation.phase() - 0.5).abs() < 1e-4);

        animation.update(&mut leds, 16.0);
        assert_eq!(animation.remaining_loops(), 0);
        assert_eq!(animation.state(), AnimationState::Stopped);
    }

    #[test]
    fn test_play_restarts_phase() {
        let mut animation = Animation::pulse(RED);
        let mut leds = [BLACK; LEDS];

        animation.play(INFINITE);
        animation.update(&mut leds, 0.0);
        animation.update(&mut leds, 4.0);
        assert!(animation.phase() > 0.2);

        animation.play(INFINITE);
        animation.update(&mut leds, 0.0);
        assert!(animation.phase().abs() < f32::EPSILON);
    }

    #[test]
    fn test_huge_delta_stays_bounded() {
        let mut animation = Animation::wave();
        let mut leds = [BLACK; LEDS];

        animation.play(INFINITE);
        animation.update(&mut leds, 1.0e9);
        assert!((0.0..=1.0).contains(&animation.phase()));
        assert_eq!(animation.state(), AnimationState::Playing);
    }

    #[test]
    fn test_pulse_envelope() {
        let mut animation = Animation::pulse(RED);
        let mut leds = [BLACK; LEDS];

        animation.play(INFINITE);
        animation.update(&mut leds, 0.0);
        assert_eq!(leds, [Rgb { r: 25, g: 0, b: 0 }; LEDS]);

        // Middle of the plateau
        animation.update(&mut leds, 8.0);
        assert_eq!(leds, [Rgb { r: 110, g: 0, b: 0 }; LEDS]);
    }

    #[test]
    fn test_wave_sweeps_along_strip() {
        let mut animation = Animation::wave();
        let mut leds = [BLACK; LEDS];

        animation.play(INFINITE);
        animation.update(&mut leds, 0.0);
        assert_eq!(peak(&leds), 0);

        animation.update(&mut leds, 8.0);
        assert_eq!(peak(&leds), 4);
        assert!(leds[4].g > leds[1].g);
    }

    #[test]
    fn test_connecting_spot_position() {
        let mut animation = Animation::connecting();
        let mut leds = [BLACK; LEDS];

        animation.play(INFINITE);
        animation.update(&mut leds, 0.0);
        animation.update(&mut leds, 0.5);

        assert_eq!(leds[3], leds[4]);
        assert_ne!(leds[3], BLACK);
        assert_eq!(leds[0], BLACK);
        assert_eq!(leds[6], BLACK);
    }

    #[test]
    fn test_progress_bar_follows_parameter() {
        let mut animation = Animation::progress(BLUE);
        let mut leds = [BLACK; LEDS];

        animation.play(INFINITE);
        animation.parameter(0.5);
        animation.update(&mut leds, 0.0);

        assert_eq!(leds[0], BLUE);
        assert_eq!(leds[3], BLUE);
        assert_eq!(leds[4], Rgb { r: 0, g: 0, b: 127 });
        assert_eq!(leds[5], Rgb { r: 0, g: 0, b: 63 });
        assert_eq!(leds[7], Rgb { r: 0, g: 0, b: 63 });
        assert_eq!(animation.state(), AnimationState::Playing);
    }

    #[test]
    fn test_progress_ignores_time_and_play() {
        let mut animation = Animation::progress(BLUE);
        let mut leds = [BLACK; LEDS];

        animation.parameter(0.3);
        animation.play(INFINITE);
        animation.update(&mut leds, 10.0);
        assert!((animation.phase() - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_progress_completion_stops() {
        let mut animation = Animation::progress(BLUE);
        let mut leds = [BLACK; LEDS];

        animation.play(INFINITE);
        animation.update(&mut leds, 0.0);
        animation.parameter(1.0);
        animation.update(&mut leds, 0.0);

        assert_eq!(leds, [BLUE; LEDS]);
        assert_eq!(animation.state(), AnimationState::Stopped);
    }
}
