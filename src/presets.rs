//! Stock animations of the irrigation controller

use crate::animation::Animation;
use crate::color::{HsvColor, Rgb};
use crate::error::Error;
use crate::registry::AnimationRegistry;

/// Dim steady green-cyan, the normal resting state
pub const IDLE: &str = "idle";
/// Slow red breathing, resting state while something is wrong
pub const ERROR_IDLE: &str = "errorIdle";
pub const BLANK: &str = "blank";
/// Bouncing spot while joining the network
pub const WIFI: &str = "wifi";
/// Red strobe
pub const ALERT: &str = "alert";
/// Blue strobe acknowledging a command
pub const OK: &str = "ok";
/// Watering cycle progress, fed through the parameter
pub const WATER_PROGRESS: &str = "water-progress";

/// Register the stock set into `registry`
///
/// Needs seven free slots, fewer if some names are already registered.
pub fn register_defaults<const N: usize>(registry: &AnimationRegistry<N>) -> Result<(), Error> {
    registry.register(IDLE, Animation::solid(HsvColor::new(147.0, 0.8, 0.15).to_rgb()))?;
    registry.register(ERROR_IDLE, Animation::pulse(HsvColor::new(0.0, 0.8, 1.0).to_rgb()))?;
    registry.register(BLANK, Animation::blank())?;
    registry.register(WIFI, Animation::connecting())?;
    registry.register(ALERT, Animation::flash(Rgb::new(128, 0, 0)))?;
    registry.register(OK, Animation::flash(HsvColor::new(200.0, 0.7, 0.5).to_rgb()))?;
    registry.register(WATER_PROGRESS, Animation::progress(Rgb::new(0, 0, 255)))?;
    info!("registered {} stock animations", registry.len());
    Ok(())
}
