use core::convert::Infallible;
use defmt::Format;

use super::button::Button;
use super::latch::FrameLatch;
use crate::sensors::Sensor;

/// One debounced remote-control event.
#[derive(Clone, Copy, Debug, Format, PartialEq, Eq)]
pub struct RemoteUpdate {
    /// Last decoded command byte, if any frame has been received yet.
    pub code: Option<u8>,
    /// Button for that command byte; `None` for unmapped codes.
    pub button: Option<Button>,
    /// Repeat pulses seen since the button was pressed (or since the last
    /// quiet poll).
    pub repeat: u32,
}

/// Polling side of the infrared receiver.
///
/// `sense` returns `Ok(Some(update))` exactly when the observed
/// (command, repeat, frame timestamp) triple changed since the previous
/// call, so consumers can act on every `Some` without further debouncing.
/// Malformed or partial input never errors: it degrades to `Ok(None)`.
pub struct IrRemoteDevice<'a> {
    latch: &'a FrameLatch,
    check_complement: bool,
    code: Option<u8>,
    frame_stamp: Option<u32>,
    repeat_base: u32,
    last_seen: (Option<u8>, u32, Option<u32>),
}

impl<'a> IrRemoteDevice<'a> {
    pub fn new(latch: &'a FrameLatch) -> Self {
        Self {
            latch,
            check_complement: false,
            code: None,
            frame_stamp: None,
            repeat_base: 0,
            last_seen: (None, 0, None),
        }
    }

    /// Like [`new`](Self::new), but frames whose command byte fails the
    /// complement check are dropped instead of decoded. The transmitter
    /// always sends the complement; plenty of receivers never look at it.
    pub fn with_complement_check(latch: &'a FrameLatch) -> Self {
        Self {
            check_complement: true,
            ..Self::new(latch)
        }
    }
}

impl<'a> Sensor for IrRemoteDevice<'a> {
    type Message = RemoteUpdate;
    type Error = Infallible;

    fn sense(&mut self) -> Result<Option<RemoteUpdate>, Self::Error> {
        if let Some((frame, completed_at)) = self.latch.take() {
            let decoded = frame.decode();

            if !self.check_complement || decoded.command_checks_out() {
                self.code = Some(decoded.command());
                self.frame_stamp = Some(completed_at);
                // a fresh data frame starts a new press: zero the reported
                // repeat count
                self.repeat_base = self.latch.repeat_total();
            }
        }

        let repeat = self.latch.repeat_total().wrapping_sub(self.repeat_base);
        let observed = (self.code, repeat, self.frame_stamp);

        if observed != self.last_seen {
            self.last_seen = observed;

            Ok(Some(RemoteUpdate {
                code: self.code,
                button: self.code.and_then(Button::from_code),
                repeat,
            }))
        } else {
            // Nothing new: neutralize the repeat count and timestamp so a
            // held-but-unrepeating button does not re-fire later.
            self.repeat_base = self.latch.repeat_total();
            self.frame_stamp = None;
            self.last_seen = (self.code, 0, None);

            Ok(None)
        }
    }
}
