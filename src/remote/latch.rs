use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::frame::RawFrame;

/// Pulses per frame: 32 bits, one mark and one space each.
pub const FRAME_PULSES: usize = 64;

/// Single-slot handoff between the edge ISR and the polling task.
///
/// The capture side is the only writer of `pulses`, `completed_at` and
/// `repeat_total`; the polling side is the only clearer of `ready`. A frame
/// that completes while the previous one is still unconsumed is dropped by
/// the producer, so the slot is never written while a consumer may be
/// reading it.
///
/// # Memory ordering
///
/// The producer stores `ready` with `Release` after the slot is fully
/// written; the consumer loads it with `Acquire` before reading the slot.
pub struct FrameLatch {
    pulses: UnsafeCell<[u16; FRAME_PULSES]>,
    ready: AtomicBool,
    completed_at: AtomicU32,
    repeat_total: AtomicU32,
}

// SAFETY: single producer, single consumer, slot access fenced by `ready`
// as described above.
unsafe impl Sync for FrameLatch {}

impl FrameLatch {
    pub const fn new() -> Self {
        Self {
            pulses: UnsafeCell::new([0; FRAME_PULSES]),
            ready: AtomicBool::new(false),
            completed_at: AtomicU32::new(0),
            repeat_total: AtomicU32::new(0),
        }
    }

    /// Producer side: publish a completed frame.
    ///
    /// Returns `false` (dropping the frame) if the previous frame has not
    /// been consumed yet.
    pub(crate) fn publish(&self, pulses: &[u16; FRAME_PULSES], completed_at_ticks: u32) -> bool {
        if self.ready.load(Ordering::Acquire) {
            return false;
        }

        // SAFETY: `ready` is false, so the consumer will not read the slot
        // until our release-store below.
        unsafe {
            *self.pulses.get() = *pulses;
        }
        self.completed_at.store(completed_at_ticks, Ordering::Relaxed);
        self.ready.store(true, Ordering::Release);

        true
    }

    /// Producer side: count one repeat pulse from a held button.
    pub(crate) fn bump_repeat(&self) {
        self.repeat_total.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn repeat_total(&self) -> u32 {
        self.repeat_total.load(Ordering::Relaxed)
    }

    /// Consumer side: take the pending frame and its completion timestamp
    /// (in timer ticks), clearing the slot for the next frame.
    pub(crate) fn take(&self) -> Option<(RawFrame, u32)> {
        if !self.ready.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: `ready` is true and the producer never writes a ready
        // slot, so the copy cannot race.
        let pulses = unsafe { *self.pulses.get() };
        let completed_at = self.completed_at.load(Ordering::Relaxed);
        self.ready.store(false, Ordering::Release);

        Some((RawFrame::new(pulses), completed_at))
    }
}

impl Default for FrameLatch {
    fn default() -> Self {
        Self::new()
    }
}
