//! Feature-gated logging macros.
//!
//! With the `esp32-log` feature enabled, messages go to `esp_println` with a
//! level prefix. Without it the arguments are only borrowed, so call sites
//! compile the same way on every target.

#![macro_use]
#![allow(unused_macros)]

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "esp32-log")]
            ::esp_println::println!(::core::concat!("[debug] ", $s) $(, $x)*);
            #[cfg(not(feature = "esp32-log"))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "esp32-log")]
            ::esp_println::println!(::core::concat!("[info] ", $s) $(, $x)*);
            #[cfg(not(feature = "esp32-log"))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "esp32-log")]
            ::esp_println::println!(::core::concat!("[warn] ", $s) $(, $x)*);
            #[cfg(not(feature = "esp32-log"))]
            let _ = ($( & $x ),*);
        }
    };
}
