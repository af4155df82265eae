// Analog channels tracked for every controller. Triggers share the same
// normalization path as the sticks but conventionally rest at 0.0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisChannel {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

impl AxisChannel {
    pub const COUNT: usize = 6;

    pub const ALL: [AxisChannel; Self::COUNT] = [
        AxisChannel::LeftX,
        AxisChannel::LeftY,
        AxisChannel::RightX,
        AxisChannel::RightY,
        AxisChannel::LeftTrigger,
        AxisChannel::RightTrigger,
    ];

    // Ordinal used to index the fixed-size state tables
    pub fn index(self) -> usize {
        self as usize
    }

    // Short code used in log lines and panel captions
    pub fn label(self) -> &'static str {
        match self {
            AxisChannel::LeftX => "LX",
            AxisChannel::LeftY => "LY",
            AxisChannel::RightX => "RX",
            AxisChannel::RightY => "RY",
            AxisChannel::LeftTrigger => "LT",
            AxisChannel::RightTrigger => "RT",
        }
    }

    pub fn is_trigger(self) -> bool {
        matches!(self, AxisChannel::LeftTrigger | AxisChannel::RightTrigger)
    }
}

// Digital buttons tracked for every controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PadButton {
    A,
    B,
    X,
    Y,
    Select,
    Guide,
    Start,
    LeftStick,
    RightStick,
    LeftBumper,
    RightBumper,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

impl PadButton {
    pub const COUNT: usize = 15;

    pub const ALL: [PadButton; Self::COUNT] = [
        PadButton::A,
        PadButton::B,
        PadButton::X,
        PadButton::Y,
        PadButton::Select,
        PadButton::Guide,
        PadButton::Start,
        PadButton::LeftStick,
        PadButton::RightStick,
        PadButton::LeftBumper,
        PadButton::RightBumper,
        PadButton::DPadUp,
        PadButton::DPadDown,
        PadButton::DPadLeft,
        PadButton::DPadRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            PadButton::A => "A",
            PadButton::B => "B",
            PadButton::X => "X",
            PadButton::Y => "Y",
            PadButton::Select => "SELECT",
            PadButton::Guide => "GUIDE",
            PadButton::Start => "START",
            PadButton::LeftStick => "LS",
            PadButton::RightStick => "RS",
            PadButton::LeftBumper => "LB",
            PadButton::RightBumper => "RB",
            PadButton::DPadUp => "UP",
            PadButton::DPadDown => "DOWN",
            PadButton::DPadLeft => "LEFT",
            PadButton::DPadRight => "RIGHT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_ordinals_match_table_order() {
        for (i, axis) in AxisChannel::ALL.iter().enumerate() {
            assert_eq!(axis.index(), i);
        }
    }

    #[test]
    fn button_ordinals_match_table_order() {
        for (i, button) in PadButton::ALL.iter().enumerate() {
            assert_eq!(button.index(), i);
        }
    }
}
