//! Terminal preview for silvanus-strip animations
//!
//! Runs the frame scheduler on a render thread against the loopback
//! peripheral, decodes the captured wire words back into pixels and draws
//! them as colored blocks. The main thread plays a short script of control
//! commands, the way the controller firmware drives the strip.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration as StdDuration;

use silvanus_strip::presets::{self, ALERT, ERROR_IDLE, IDLE, OK, WATER_PROGRESS, WIFI};
use silvanus_strip::waveform::loopback::LoopbackPeripheral;
use silvanus_strip::{
    AnimationRegistry, Animator, Duration, Error, FrameScheduler, LATCH_WORD, Rendezvous, Rgb,
    StripConfig, WaveformBlock,
};

/// Number of LEDs in the simulated strip
const LED_COUNT: usize = 16;

/// Words the loopback keeps between two draws
const CAPTURE_WORDS: usize = 256;

static ANIMATIONS: AnimationRegistry<8> = AnimationRegistry::new();
static RENDEZVOUS: Rendezvous = Rendezvous::new();
static BLOCK: WaveformBlock<LoopbackPeripheral<CAPTURE_WORDS>> =
    WaveformBlock::new(0, LoopbackPeripheral::new());
static STOP: AtomicBool = AtomicBool::new(false);

fn main() -> Result<(), Error> {
    presets::register_defaults(&ANIMATIONS)?;

    let config = StripConfig::new(2, LED_COUNT);
    let animator: Animator<'static, _, 8, LED_COUNT> =
        Animator::new(&ANIMATIONS, &BLOCK, &RENDEZVOUS, &config)?;
    let lane = animator.encoder().channel().lane();

    let render = thread::spawn(move || {
        let mut scheduler = FrameScheduler::new(animator);
        while !STOP.load(Ordering::Relaxed) {
            let frame = scheduler.step();
            if let Err(err) = frame.outcome {
                eprintln!("\nframe dropped: {err}");
            }
            let words = BLOCK.peripheral().take_transmitted(lane);
            draw(&words);
        }
    });

    run_script();

    STOP.store(true, Ordering::Relaxed);
    let _ = render.join();
    println!();
    Ok(())
}

fn pause(millis: u64) {
    thread::sleep(StdDuration::from_millis(millis));
}

/// Control context: what the controller does over a watering session
fn run_script() {
    ANIMATIONS.set_base_animation(WIFI);
    pause(2_000);

    ANIMATIONS.set_base_animation(IDLE);
    ANIMATIONS.play_overlay(OK, 3);
    ANIMATIONS.wait_for_overlay_complete(Some(Duration::from_secs(5)));
    pause(500);

    ANIMATIONS.play_overlay(WATER_PROGRESS, -1);
    for step in 0..=20u8 {
        ANIMATIONS.set_parameter_for(WATER_PROGRESS, f32::from(step) / 20.0);
        pause(100);
    }
    ANIMATIONS.wait_for_overlay_complete(Some(Duration::from_secs(1)));

    // Settings write: the render thread must be parked while flash is busy
    let token = RENDEZVOUS.pause_render();
    pause(300);
    RENDEZVOUS.resume_render(token);

    ANIMATIONS.set_base_animation(ERROR_IDLE);
    pause(3_000);
    ANIMATIONS.play_overlay(ALERT, 2);
    ANIMATIONS.wait_for_overlay_complete(Some(Duration::from_secs(5)));
    pause(1_000);
}

/// Decode the last complete frame in `words` and draw it on one line
fn draw(words: &[u32]) {
    let Some(end) = words.iter().rposition(|&word| word == LATCH_WORD) else {
        return;
    };
    let start = words[..end]
        .iter()
        .rposition(|&word| word == LATCH_WORD)
        .map_or(0, |latch| latch + 1);

    let mut line = String::from("\r");
    for &word in &words[start..end] {
        let pixel = Rgb {
            r: (word >> 8) as u8,
            g: (word >> 16) as u8,
            b: word as u8,
        };
        line.push_str(&format!(
            "\x1b[48;2;{};{};{}m  \x1b[0m",
            pixel.r, pixel.g, pixel.b
        ));
    }
    let current = ANIMATIONS.current_animation();
    line.push_str(&format!(
        "  {:<16}",
        current.as_ref().map_or("blank", |name| name.as_str())
    ));

    let mut stdout = io::stdout().lock();
    let _ = stdout.write_all(line.as_bytes());
    let _ = stdout.flush();
}
