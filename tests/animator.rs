mod tests {
    use silvanus_strip::color::BLACK;
    use silvanus_strip::waveform::loopback::LoopbackPeripheral;
    use silvanus_strip::{
        Animation, AnimationRegistry, Animator, Duration, Error, FRAME_DURATION, FrameScheduler,
        Instant, LATCH_WORD, Rendezvous, Rgb, StripConfig, WaveformBlock,
    };

    type Peripheral = LoopbackPeripheral<64>;

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
    const LEDS: usize = 8;

    fn frame_time(start: Instant, frame: u64) -> Instant {
        start + Duration::from_millis(33) * u32::try_from(frame).unwrap()
    }

    #[test]
    fn test_solid_red_every_frame() {
        let registry: AnimationRegistry<4> = AnimationRegistry::new();
        let block = WaveformBlock::new(0, Peripheral::new());
        let rendezvous = Rendezvous::new();
        registry.register("solid-red", Animation::solid(RED)).unwrap();
        assert!(registry.set_base_animation("solid-red"));

        let mut animator: Animator<'_, Peripheral, 4, LEDS> =
            Animator::new(&registry, &block, &rendezvous, &StripConfig::new(2, LEDS)).unwrap();
        let lane = animator.encoder().channel().lane();
        let start = Instant::from_millis(1_000);

        for frame in 0..20 {
            animator.tick(frame_time(start, frame)).unwrap();
            assert_eq!(animator.frame(), &[RED; LEDS]);
            assert_eq!(animator.encoder().staged(), &[RED; LEDS]);

            let words = block.peripheral().take_transmitted(lane);
            assert_eq!(words.len(), LEDS + 1);
            assert!(words[..LEDS].iter().all(|&word| word == 0x0000_FF00));
            assert_eq!(words[LEDS], LATCH_WORD);
        }
    }

    #[test]
    fn test_blank_without_selection() {
        let registry: AnimationRegistry<4> = AnimationRegistry::new();
        let block = WaveformBlock::new(0, Peripheral::new());
        let rendezvous = Rendezvous::new();
        let mut animator: Animator<'_, Peripheral, 4, LEDS> =
            Animator::new(&registry, &block, &rendezvous, &StripConfig::new(2, LEDS)).unwrap();

        animator.tick(Instant::from_millis(0)).unwrap();
        assert_eq!(animator.frame(), &[BLACK; LEDS]);
    }

    /// Colors shown while `flash-red` plays `loops` times over `solid-blue`
    fn flash_over_solid(loops: i32) -> Vec<Rgb> {
        let registry: AnimationRegistry<4> = AnimationRegistry::new();
        let block = WaveformBlock::new(0, Peripheral::new());
        let rendezvous = Rendezvous::new();
        registry.register("solid-blue", Animation::solid(BLUE)).unwrap();
        registry.register("flash-red", Animation::flash(RED)).unwrap();
        registry.set_base_animation("solid-blue");
        registry.play_overlay("flash-red", loops);

        let mut animator: Animator<'_, Peripheral, 4, LEDS> =
            Animator::new(&registry, &block, &rendezvous, &StripConfig::new(2, LEDS)).unwrap();
        let start = Instant::from_millis(5_000);

        let mut colors = Vec::new();
        for frame in 0..120 {
            animator.tick(frame_time(start, frame)).unwrap();
            let color = animator.frame()[0];
            assert!(animator.frame().iter().all(|&led| led == color));
            if colors.last() != Some(&color) {
                colors.push(color);
            }
        }

        assert!(!registry.has_overlay());
        assert_eq!(registry.current_animation().unwrap().as_str(), "solid-blue");
        assert!(registry.wait_for_overlay_complete(Some(Duration::from_ticks(0))));
        colors
    }

    #[test]
    fn test_flash_over_solid_alternates_then_reverts() {
        assert_eq!(flash_over_solid(2), [RED, BLACK, RED, BLACK, BLUE]);
        assert_eq!(
            flash_over_solid(3),
            [RED, BLACK, RED, BLACK, RED, BLACK, BLUE]
        );
    }

    #[test]
    fn test_first_tick_does_not_advance() {
        let registry: AnimationRegistry<4> = AnimationRegistry::new();
        let block = WaveformBlock::new(0, Peripheral::new());
        let rendezvous = Rendezvous::new();
        registry.register("wave", Animation::wave()).unwrap();
        registry.set_base_animation("wave");

        let mut animator: Animator<'_, Peripheral, 4, LEDS> =
            Animator::new(&registry, &block, &rendezvous, &StripConfig::new(2, LEDS)).unwrap();
        animator.tick(Instant::from_millis(60_000)).unwrap();
        let phase = registry.inspect("wave", Animation::phase).unwrap();
        assert!(phase.abs() < f32::EPSILON);

        animator.tick(Instant::from_millis(64_000)).unwrap();
        let phase = registry.inspect("wave", Animation::phase).unwrap();
        assert!((phase - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_timeout_resets_lane() {
        let registry: AnimationRegistry<4> = AnimationRegistry::new();
        let block = WaveformBlock::new(0, Peripheral::new());
        let rendezvous = Rendezvous::new();
        registry.register("solid-red", Animation::solid(RED)).unwrap();
        registry.set_base_animation("solid-red");

        let mut config = StripConfig::new(2, LEDS);
        config.word_timeout = Some(Duration::from_millis(2));
        let mut animator: Animator<'_, Peripheral, 4, LEDS> =
            Animator::new(&registry, &block, &rendezvous, &config).unwrap();
        let lane = animator.encoder().channel().lane();

        block.peripheral().set_stalled(lane, true);
        assert_eq!(animator.tick(Instant::from_millis(0)), Err(Error::Timeout));
        assert_eq!(block.peripheral().restart_count(lane), 1);

        block.peripheral().set_stalled(lane, false);
        assert_eq!(animator.tick(Instant::from_millis(33)), Ok(()));
        assert_eq!(block.peripheral().take_transmitted(lane).len(), LEDS + 1);
    }

    #[test]
    fn test_led_count_change() {
        let registry: AnimationRegistry<4> = AnimationRegistry::new();
        let block = WaveformBlock::new(0, Peripheral::new());
        let rendezvous = Rendezvous::new();
        registry.register("solid-red", Animation::solid(RED)).unwrap();
        registry.set_base_animation("solid-red");

        let mut animator: Animator<'_, Peripheral, 4, LEDS> =
            Animator::new(&registry, &block, &rendezvous, &StripConfig::new(2, 4)).unwrap();
        animator.tick(Instant::from_millis(0)).unwrap();
        assert_eq!(animator.encoder().staged().len(), 4);

        animator.set_led_count(6);
        animator.tick(Instant::from_millis(33)).unwrap();
        assert_eq!(animator.frame().len(), 6);
        assert_eq!(animator.encoder().staged().len(), 6);
    }

    #[test]
    fn test_scheduler_deadlines_do_not_drift() {
        let registry: AnimationRegistry<4> = AnimationRegistry::new();
        let block = WaveformBlock::new(0, Peripheral::new());
        let rendezvous = Rendezvous::new();
        let animator: Animator<'_, Peripheral, 4, LEDS> =
            Animator::new(&registry, &block, &rendezvous, &StripConfig::new(2, LEDS)).unwrap();
        let mut scheduler = FrameScheduler::new(animator);
        let start = Instant::from_millis(10_000);

        let first = scheduler.tick(start);
        assert_eq!(first.next_deadline, start + FRAME_DURATION);
        assert_eq!(first.sleep_duration, FRAME_DURATION);
        assert_eq!(first.outcome, Ok(()));

        // Late frame: the next deadline stays on the grid
        let late = start + Duration::from_millis(50);
        let second = scheduler.tick(late);
        assert_eq!(second.next_deadline, start + FRAME_DURATION * 2);
        assert_eq!(second.sleep_duration, start + FRAME_DURATION * 2 - late);

        // Far behind: no sleep, still on the grid
        let third = scheduler.tick(start + Duration::from_millis(500));
        assert_eq!(third.next_deadline, start + FRAME_DURATION * 3);
        assert_eq!(third.sleep_duration, Duration::from_ticks(0));
    }

    #[test]
    fn test_scheduler_step_paces_frames() {
        let registry: AnimationRegistry<4> = AnimationRegistry::new();
        let block = WaveformBlock::new(0, Peripheral::new());
        let rendezvous = Rendezvous::new();
        let animator: Animator<'_, Peripheral, 4, LEDS> =
            Animator::new(&registry, &block, &rendezvous, &StripConfig::new(2, LEDS)).unwrap();
        let period = Duration::from_millis(5);
        let mut scheduler = FrameScheduler::with_frame_duration(animator, period);

        let started = Instant::now();
        for _ in 0..4 {
            scheduler.step();
        }
        assert!(Instant::now() - started >= period * 4);
        assert!(rendezvous.is_render_attached());

        drop(scheduler);
        assert!(!rendezvous.is_render_attached());
    }
}
