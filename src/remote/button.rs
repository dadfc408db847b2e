use defmt::Format;

/// The 17 buttons of the kit's remote control.
#[derive(Clone, Copy, Debug, Format, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Ok,
    Star,
    Hash,
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
}

impl Button {
    /// Map a command byte to its button. Unmapped bytes yield `None` rather
    /// than aliasing to a real button.
    pub fn from_code(code: u8) -> Option<Button> {
        match code {
            98 => Some(Button::Up),
            168 => Some(Button::Down),
            34 => Some(Button::Left),
            194 => Some(Button::Right),
            2 => Some(Button::Ok),
            66 => Some(Button::Star),
            82 => Some(Button::Hash),
            74 => Some(Button::Zero),
            104 => Some(Button::One),
            152 => Some(Button::Two),
            176 => Some(Button::Three),
            48 => Some(Button::Four),
            24 => Some(Button::Five),
            122 => Some(Button::Six),
            16 => Some(Button::Seven),
            56 => Some(Button::Eight),
            90 => Some(Button::Nine),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Button::Up => "Up",
            Button::Down => "Down",
            Button::Left => "Left",
            Button::Right => "Right",
            Button::Ok => "Ok",
            Button::Star => "*",
            Button::Hash => "#",
            Button::Zero => "0",
            Button::One => "1",
            Button::Two => "2",
            Button::Three => "3",
            Button::Four => "4",
            Button::Five => "5",
            Button::Six => "6",
            Button::Seven => "7",
            Button::Eight => "8",
            Button::Nine => "9",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_codes() {
        assert_eq!(Button::from_code(98), Some(Button::Up));
        assert_eq!(Button::from_code(168), Some(Button::Down));
        assert_eq!(Button::from_code(2), Some(Button::Ok));
        assert_eq!(Button::from_code(56), Some(Button::Eight));
        assert_eq!(Button::from_code(90), Some(Button::Nine));
    }

    #[test]
    fn rejects_unknown_codes() {
        assert_eq!(Button::from_code(0), None);
        assert_eq!(Button::from_code(255), None);
    }

    #[test]
    fn labels() {
        assert_eq!(Button::Up.label(), "Up");
        assert_eq!(Button::Star.label(), "*");
        assert_eq!(Button::Eight.label(), "8");
    }
}
