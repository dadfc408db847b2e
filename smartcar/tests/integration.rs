#![no_std]
#![no_main]

use smartcar as _; // memory layout + panic handler + others

// See https://crates.io/crates/defmt-test/0.3.0 for more documentation (e.g. about the 'state'
// feature)
#[defmt_test::tests]
mod tests {
    use defmt::assert_eq;

    use carkit::{behavior::remote, Button, DriveAction, Motion};
    use smartcar::init_heap;

    #[init]
    fn init() {
        init_heap();
    }

    #[test]
    fn forward_register_byte() {
        assert_eq!(Motion::Forward.register_bits(), 0xa3);
    }

    #[test]
    fn up_button_drives_forward() {
        assert_eq!(
            remote::drive_for_button(Some(Button::Up)),
            DriveAction::Move {
                motion: Motion::Forward,
                speed: remote::DRIVE_SPEED,
            }
        );
    }
}
