use embassy_time::{Duration, Instant};

use super::{Lane, LaneConfig, ProgramImage, WaveformPeripheral, WaveformProgram};
use crate::error::Error;

/// Builds the lane configuration for a program loaded at `offset`
pub type LaneConfigurator = fn(offset: u8, image: &ProgramImage, pin: u8, clock_divider: f32) -> LaneConfig;

/// Spin until `busy` clears, giving up after `timeout` if one is set
fn wait_while(mut busy: impl FnMut() -> bool, timeout: Option<Duration>) -> Result<(), Error> {
    let mut deadline = None;
    while busy() {
        if let Some(timeout) = timeout {
            let deadline = *deadline.get_or_insert_with(|| Instant::now() + timeout);
            if Instant::now() >= deadline {
                return Err(Error::Timeout);
            }
        }
        core::hint::spin_loop();
    }
    Ok(())
}

/// Exclusive use of one lane running a loaded program
///
/// The lane is configured and enabled on claim. Dropping the channel
/// disables the lane, returns it to the block and releases this channel's
/// share of the program.
pub struct WaveformChannel<'b, P: WaveformPeripheral> {
    lane: Lane,
    config: LaneConfig,
    program: WaveformProgram<'b, P>,
}

impl<'b, P: WaveformPeripheral> WaveformChannel<'b, P> {
    /// Claim a free lane of the program's block and start it
    ///
    /// Fails with [`Error::ResourceExhausted`] if every lane is taken. The
    /// program handle is dropped in that case, which unloads it if nothing
    /// else holds it.
    pub fn claim(
        program: WaveformProgram<'b, P>,
        configure: LaneConfigurator,
        pin: u8,
        clock_divider: f32,
    ) -> Result<Self, Error> {
        let block = program.block();
        let lane = block.claim_lane()?;
        let config = configure(program.offset(), program.image(), pin, clock_divider);

        block.peripheral().configure(lane, &config);
        block.peripheral().set_enabled(lane, true);
        debug!(
            "block {}: lane {} started on pin {}",
            block.id(),
            lane.index(),
            pin
        );

        Ok(Self {
            lane,
            config,
            program,
        })
    }

    pub const fn lane(&self) -> Lane {
        self.lane
    }

    pub const fn config(&self) -> &LaneConfig {
        &self.config
    }

    pub const fn program(&self) -> &WaveformProgram<'b, P> {
        &self.program
    }

    fn peripheral(&self) -> &'b P {
        self.program.block().peripheral()
    }

    /// Queue one word for the lane
    ///
    /// Waits while the transmit queue is full. With `timeout` set, gives up
    /// with [`Error::Timeout`] once it elapses; `None` waits indefinitely.
    pub fn write(&mut self, word: u32, timeout: Option<Duration>) -> Result<(), Error> {
        let peripheral = self.peripheral();
        let lane = self.lane;
        wait_while(|| peripheral.is_tx_full(lane), timeout)?;
        peripheral.push(lane, word);
        Ok(())
    }

    /// Queue one byte, placed in the top byte of the word
    pub fn write_byte(&mut self, byte: u8, timeout: Option<Duration>) -> Result<(), Error> {
        self.write(u32::from(byte) << 24, timeout)
    }

    /// Take one word the lane produced
    pub fn read(&mut self, timeout: Option<Duration>) -> Result<u32, Error> {
        let peripheral = self.peripheral();
        let lane = self.lane;
        wait_while(|| peripheral.is_rx_empty(lane), timeout)?;
        Ok(peripheral.pull(lane))
    }

    /// Bring a stuck lane back to its just-claimed state
    ///
    /// Stops the lane, drops anything queued, restarts it from the program
    /// origin with the same configuration and enables it again.
    pub fn reset(&mut self) {
        let peripheral = self.peripheral();
        peripheral.set_enabled(self.lane, false);
        peripheral.clear_fifos(self.lane);
        peripheral.restart(self.lane);
        peripheral.configure(self.lane, &self.config);
        peripheral.set_enabled(self.lane, true);
        info!("lane {} reset", self.lane.index());
    }
}

impl<P: WaveformPeripheral> Drop for WaveformChannel<'_, P> {
    fn drop(&mut self) {
        self.peripheral().set_enabled(self.lane, false);
        self.program.block().release_lane(self.lane);
    }
}
