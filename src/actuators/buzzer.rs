use core::fmt::Debug;
use core::task::Poll;
use defmt::Format;
use fugit::TimerDurationU32 as TimerDuration;
use fugit_timer::Timer;
use nb;

use super::Actuator;
use crate::error::Error;

/// Note pitches the kit's songbook uses, in hertz.
pub mod pitch {
    pub const C4: u16 = 262;
    pub const D4: u16 = 294;
    pub const E4: u16 = 330;
    pub const F4: u16 = 350;
    pub const G4: u16 = 393;
    pub const A4: u16 = 441;
    pub const B4: u16 = 495;
    /// A rest: no tone for the length of the note.
    pub const REST: u16 = 0;
}

/// Driver for a tone source the buzzer device plays through.
///
/// `embedded-hal` 0.2 PWM only models duty, not frequency, so boards adapt
/// their tone hardware behind this trait.
pub trait ToneEmitter {
    type Error: Error;

    /// Start sounding at `freq_hz` until told otherwise.
    fn tone(&mut self, freq_hz: u16) -> Result<(), Self::Error>;
    fn mute(&mut self) -> Result<(), Self::Error>;
}

/// One note of a melody.
#[derive(Clone, Copy, Debug, Format)]
pub struct Note<const TIMER_HZ: u32> {
    /// Pitch in hertz; [`pitch::REST`] (zero) for silence.
    pub pitch: u16,
    pub length: TimerDuration<TIMER_HZ>,
}

#[derive(Clone, Copy, Debug, Format)]
pub enum BuzzerAction<const TIMER_HZ: u32> {
    Tone {
        freq_hz: u16,
        duration: TimerDuration<TIMER_HZ>,
    },
    Play {
        melody: &'static [Note<TIMER_HZ>],
    },
}

#[derive(Clone, Copy, Debug, Format)]
enum NotePhase {
    Sounding,
    /// Muted gap after a note so successive equal pitches stay distinct.
    Gap,
}

#[derive(Clone, Copy, Debug, Format)]
enum BuzzerState<const TIMER_HZ: u32> {
    Tone {
        freq_hz: u16,
        duration: TimerDuration<TIMER_HZ>,
        armed: bool,
    },
    Melody {
        melody: &'static [Note<TIMER_HZ>],
        index: usize,
        phase: NotePhase,
        armed: bool,
    },
}

/// Piezo buzzer playing tones and melodies through a [`ToneEmitter`].
pub struct BuzzerDevice<D, T, const TIMER_HZ: u32>
where
    D: ToneEmitter,
    T: Timer<TIMER_HZ>,
{
    emitter: D,
    timer: T,
    state: Option<BuzzerState<TIMER_HZ>>,
}

impl<D, T, const TIMER_HZ: u32> BuzzerDevice<D, T, TIMER_HZ>
where
    D: ToneEmitter,
    T: Timer<TIMER_HZ>,
{
    pub fn new(emitter: D, timer: T) -> Self {
        Self {
            emitter,
            timer,
            state: None,
        }
    }

    fn emit(&mut self, pitch: u16) -> Result<(), D::Error> {
        if pitch == pitch::REST {
            self.emitter.mute()
        } else {
            self.emitter.tone(pitch)
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum BuzzerError<DriverError: Debug, TimerError: Debug> {
    Driver(DriverError),
    TimerStart(TimerError),
    TimerWait(TimerError),
}

impl<DriverError: Debug, TimerError: Debug> Error for BuzzerError<DriverError, TimerError> {}

impl<D, T, const TIMER_HZ: u32> Actuator for BuzzerDevice<D, T, TIMER_HZ>
where
    D: ToneEmitter,
    D::Error: Debug,
    T: Timer<TIMER_HZ>,
    T::Error: Debug,
{
    type Action = BuzzerAction<TIMER_HZ>;
    type Error = BuzzerError<D::Error, T::Error>;

    fn run(&mut self, action: &Self::Action) {
        self.state = Some(match action {
            BuzzerAction::Tone { freq_hz, duration } => BuzzerState::Tone {
                freq_hz: *freq_hz,
                duration: *duration,
                armed: false,
            },
            BuzzerAction::Play { melody } => BuzzerState::Melody {
                melody,
                index: 0,
                phase: NotePhase::Sounding,
                armed: false,
            },
        });
    }

    fn poll(&mut self) -> Poll<Result<(), Self::Error>> {
        match self.state {
            None => Poll::Ready(Ok(())),
            Some(BuzzerState::Tone {
                freq_hz,
                duration,
                armed,
            }) => {
                if !armed {
                    self.emit(freq_hz).map_err(BuzzerError::Driver)?;
                    self.timer.start(duration).map_err(BuzzerError::TimerStart)?;
                    self.state = Some(BuzzerState::Tone {
                        freq_hz,
                        duration,
                        armed: true,
                    });

                    return Poll::Pending;
                }

                match self.timer.wait() {
                    Err(nb::Error::WouldBlock) => Poll::Pending,
                    Err(nb::Error::Other(err)) => Poll::Ready(Err(BuzzerError::TimerWait(err))),
                    Ok(()) => {
                        self.emitter.mute().map_err(BuzzerError::Driver)?;
                        self.state = None;

                        Poll::Ready(Ok(()))
                    }
                }
            }
            Some(BuzzerState::Melody {
                melody,
                index,
                phase,
                armed,
            }) => {
                let note = match melody.get(index) {
                    Some(note) => *note,
                    None => {
                        self.emitter.mute().map_err(BuzzerError::Driver)?;
                        self.state = None;

                        return Poll::Ready(Ok(()));
                    }
                };

                if !armed {
                    self.emit(note.pitch).map_err(BuzzerError::Driver)?;
                    self.timer
                        .start(note.length)
                        .map_err(BuzzerError::TimerStart)?;
                    self.state = Some(BuzzerState::Melody {
                        melody,
                        index,
                        phase,
                        armed: true,
                    });

                    return Poll::Pending;
                }

                match self.timer.wait() {
                    Err(nb::Error::WouldBlock) => Poll::Pending,
                    Err(nb::Error::Other(err)) => Poll::Ready(Err(BuzzerError::TimerWait(err))),
                    Ok(()) => match phase {
                        NotePhase::Sounding => {
                            self.emitter.mute().map_err(BuzzerError::Driver)?;
                            self.timer
                                .start(note.length / 10)
                                .map_err(BuzzerError::TimerStart)?;
                            self.state = Some(BuzzerState::Melody {
                                melody,
                                index,
                                phase: NotePhase::Gap,
                                armed: true,
                            });

                            Poll::Pending
                        }
                        NotePhase::Gap => {
                            self.state = Some(BuzzerState::Melody {
                                melody,
                                index: index + 1,
                                phase: NotePhase::Sounding,
                                armed: false,
                            });

                            Poll::Pending
                        }
                    },
                }
            }
        }
    }
}
