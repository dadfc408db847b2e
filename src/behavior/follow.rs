use crate::actuators::drive::{DriveAction, Motion};
use crate::sensors::tracker::LineUpdate;

const CRUISE_SPEED: u8 = 150;
const CORRECT_SPEED: u8 = 120;

/// Two-probe line following, probes straddling the line: drift is corrected
/// by spinning toward the probe that went dark; both probes dark means the
/// line was lost (a crossing or the end), so stop.
pub fn follow_two_probe(left_dark: bool, right_dark: bool) -> DriveAction {
    match (left_dark, right_dark) {
        (false, false) => DriveAction::Move {
            motion: Motion::Forward,
            speed: CRUISE_SPEED,
        },
        (true, false) => DriveAction::Move {
            motion: Motion::SpinLeft,
            speed: CRUISE_SPEED,
        },
        (false, true) => DriveAction::Move {
            motion: Motion::SpinRight,
            speed: CRUISE_SPEED,
        },
        (true, true) => DriveAction::Stop,
    }
}

/// Three-probe line following, middle probe riding the line.
///
/// Combinations the decision table does not cover (all probes light, or
/// only an outer probe dark with the middle light on one side) return
/// `None`: the car keeps doing whatever it was doing, which rides out
/// one-scan glitches.
pub fn follow_three_probe(line: &LineUpdate) -> Option<DriveAction> {
    let motion = match (line.left, line.middle, line.right) {
        (false, true, false) => (Motion::Forward, CRUISE_SPEED),
        (false, true, true) => (Motion::Forward, CORRECT_SPEED),
        (true, true, false) => (Motion::Forward, CORRECT_SPEED),
        (true, true, true) => (Motion::Forward, CORRECT_SPEED),
        (true, false, false) => (Motion::SpinLeft, CORRECT_SPEED),
        (false, false, true) => (Motion::SpinRight, CORRECT_SPEED),
        _ => return None,
    };

    Some(DriveAction::Move {
        motion: motion.0,
        speed: motion.1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(left: bool, middle: bool, right: bool) -> LineUpdate {
        LineUpdate {
            left,
            middle,
            right,
        }
    }

    #[test]
    fn centered_line_cruises() {
        assert_eq!(
            follow_three_probe(&line(false, true, false)),
            Some(DriveAction::Move {
                motion: Motion::Forward,
                speed: CRUISE_SPEED
            })
        );
    }

    #[test]
    fn drift_spins_back_toward_the_line() {
        assert_eq!(
            follow_three_probe(&line(true, false, false)),
            Some(DriveAction::Move {
                motion: Motion::SpinLeft,
                speed: CORRECT_SPEED
            })
        );
        assert_eq!(
            follow_three_probe(&line(false, false, true)),
            Some(DriveAction::Move {
                motion: Motion::SpinRight,
                speed: CORRECT_SPEED
            })
        );
    }

    #[test]
    fn uncovered_combinations_keep_the_last_action() {
        assert_eq!(follow_three_probe(&line(false, false, false)), None);
        assert_eq!(follow_three_probe(&line(true, false, true)), None);
    }

    #[test]
    fn two_probe_straddles_the_line() {
        assert_eq!(
            follow_two_probe(false, false),
            DriveAction::Move {
                motion: Motion::Forward,
                speed: CRUISE_SPEED
            }
        );
        assert_eq!(
            follow_two_probe(true, false),
            DriveAction::Move {
                motion: Motion::SpinLeft,
                speed: CRUISE_SPEED
            }
        );
        assert_eq!(follow_two_probe(true, true), DriveAction::Stop);
    }
}
