//! Components that can be attached to a joint.

use std::fmt;

/// The component mounted on a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentType {
    #[default]
    None,
    Structure,
    MotorCW,
    MotorCCW,
    Foil,
}

impl ComponentType {
    /// Returns the component written as `digit` in a node token.
    ///
    /// The table is fixed: `0` Structure, `1` MotorCW, `2` MotorCCW, `3` Foil, `4` None.
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(ComponentType::Structure),
            '1' => Some(ComponentType::MotorCW),
            '2' => Some(ComponentType::MotorCCW),
            '3' => Some(ComponentType::Foil),
            '4' => Some(ComponentType::None),
            _ => None,
        }
    }

    /// Returns the node-token digit for this component.
    pub fn digit(self) -> char {
        match self {
            ComponentType::Structure => '0',
            ComponentType::MotorCW => '1',
            ComponentType::MotorCCW => '2',
            ComponentType::Foil => '3',
            ComponentType::None => '4',
        }
    }

    /// Returns the next component in the toggle cycle.
    ///
    /// `None → Structure → MotorCW → MotorCCW → Foil → None`.
    pub fn next(self) -> Self {
        match self {
            ComponentType::None => ComponentType::Structure,
            ComponentType::Structure => ComponentType::MotorCW,
            ComponentType::MotorCW => ComponentType::MotorCCW,
            ComponentType::MotorCCW => ComponentType::Foil,
            ComponentType::Foil => ComponentType::None,
        }
    }

    /// Returns `true` for every component except [`ComponentType::None`].
    pub fn is_mounted(self) -> bool {
        self != ComponentType::None
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentType::None => "None",
            ComponentType::Structure => "Structure",
            ComponentType::MotorCW => "MotorCW",
            ComponentType::MotorCCW => "MotorCCW",
            ComponentType::Foil => "Foil",
        };
        f.write_str(name)
    }
}
