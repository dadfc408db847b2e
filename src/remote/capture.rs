use defmt::Format;
use fugit::{TimerDurationU32 as TimerDuration, TimerInstantU32 as TimerInstant};

use super::latch::{FrameLatch, FRAME_PULSES};

/// Header pulse, signalling the start of a transmission.
const HEADER_MICROS: (u32, u32) = (8500, 9500);
/// Gap between the header and the 32 data bits of a full frame.
const FRAME_GAP_MICROS: (u32, u32) = (4000, 5000);
/// Gap of a repeat frame, sent instead of data while a button is held.
const REPEAT_GAP_MICROS: (u32, u32) = (2000, 3000);
/// Trailing pulse of a repeat frame while the button stays held.
const REPEAT_PULSE_MICROS: (u32, u32) = (500, 650);

#[derive(Clone, Copy, Debug, Format, PartialEq, Eq)]
enum CaptureState {
    /// Waiting for a header pulse.
    Idle,
    /// Header seen, waiting for a frame gap or a repeat gap.
    Gap,
    /// Collecting the 64 mark/space pulses of a data frame.
    Data,
    /// Repeat frame seen, counting trailing repeat pulses.
    Repeat,
}

/// Edge-timing side of the infrared receiver. Runs in the pin ISR.
///
/// Call [`edge`](Self::edge) on every rising or falling transition of the
/// receiver pin. Completed frames and repeat counts are published through
/// the shared [`FrameLatch`]; nothing here blocks or allocates.
///
/// Pulse durations that match none of the expected ranges are ignored
/// without a state change, which is what makes the receiver tolerant of
/// transmission noise.
pub struct PulseCapture<'a, const TIMER_HZ: u32> {
    latch: &'a FrameLatch,
    state: CaptureState,
    last_edge_ticks: u32,
    pulses: [u16; FRAME_PULSES],
    count: usize,
}

impl<'a, const TIMER_HZ: u32> PulseCapture<'a, TIMER_HZ> {
    pub fn new(latch: &'a FrameLatch) -> Self {
        Self {
            latch,
            state: CaptureState::Idle,
            last_edge_ticks: 0,
            pulses: [0; FRAME_PULSES],
            count: 0,
        }
    }

    pub fn edge(&mut self, now: TimerInstant<TIMER_HZ>) {
        let now_ticks = now.ticks();
        // wrapping subtraction so counter rollover mid-frame is harmless
        let delta_ticks = now_ticks.wrapping_sub(self.last_edge_ticks);
        self.last_edge_ticks = now_ticks;

        let micros = TimerDuration::<TIMER_HZ>::from_ticks(delta_ticks).to_micros();

        // A header resynchronizes from any state: if the signal was lost
        // mid-frame, the next transmission starts capture over.
        if in_range(micros, HEADER_MICROS) {
            self.state = CaptureState::Gap;
            return;
        }

        match self.state {
            CaptureState::Idle => {}
            CaptureState::Gap => {
                if in_range(micros, FRAME_GAP_MICROS) {
                    self.count = 0;
                    self.state = CaptureState::Data;
                } else if in_range(micros, REPEAT_GAP_MICROS) {
                    self.latch.bump_repeat();
                    self.state = CaptureState::Repeat;
                }
            }
            CaptureState::Data => {
                self.pulses[self.count] = micros.min(u16::MAX as u32) as u16;
                self.count += 1;

                if self.count >= FRAME_PULSES {
                    self.latch.publish(&self.pulses, now_ticks);
                    self.state = CaptureState::Idle;
                }
            }
            CaptureState::Repeat => {
                if in_range(micros, REPEAT_PULSE_MICROS) {
                    self.latch.bump_repeat();
                }
            }
        }
    }
}

fn in_range(micros: u32, range: (u32, u32)) -> bool {
    micros >= range.0 && micros <= range.1
}
