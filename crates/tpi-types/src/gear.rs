use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a gear in the TPI box train, ordered from the spindle outwards.
///
/// ```text
///   S ── P ══ I ── M ══ N ── Q ── O
/// ```
/// `──` is an external mesh, `══` a keyed (same shaft) coupling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gear {
    /// Fixed drive gear on the lathe spindle.
    Spindle,
    /// Primary gear driven by the spindle.
    Input,
    /// The 127-tooth "inch" gear keyed to the input gear.
    Inch,
    /// Driven by the inch gear, mounted on the offset shaft.
    Third,
    /// Keyed to the third gear.
    Fourth,
    /// Runs free on the countershaft, closes the loop back to the spindle axis.
    Idler,
    /// Runs on the spindle axis and drives the lathe's change gears.
    Output,
}

impl Gear {
    /// All gears in chain order.
    pub const ALL: [Gear; 7] = [
        Gear::Spindle,
        Gear::Input,
        Gear::Inch,
        Gear::Third,
        Gear::Fourth,
        Gear::Idler,
        Gear::Output,
    ];

    /// Single-letter label used in drawings and solver reports.
    pub fn letter(&self) -> char {
        match self {
            Gear::Spindle => 'S',
            Gear::Input => 'P',
            Gear::Inch => 'I',
            Gear::Third => 'M',
            Gear::Fourth => 'N',
            Gear::Idler => 'Q',
            Gear::Output => 'O',
        }
    }

    /// The shaft (axis) this gear turns on.
    pub fn shaft(&self) -> Shaft {
        match self {
            Gear::Spindle | Gear::Output => Shaft::Spindle,
            Gear::Input | Gear::Inch | Gear::Idler => Shaft::Countershaft,
            Gear::Third | Gear::Fourth => Shaft::Offset,
        }
    }

    /// Index into `Gear::ALL`.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// The three parallel axes of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shaft {
    /// Lathe spindle axis (spindle and output gears).
    Spindle,
    /// Carries the keyed input/inch pair and the free-running idler.
    Countershaft,
    /// Mounted at the layout angle around the countershaft.
    Offset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gear_index_matches_chain_order() {
        for (i, gear) in Gear::ALL.iter().enumerate() {
            assert_eq!(gear.index(), i);
        }
    }

    #[test]
    fn test_letters_are_unique() {
        let letters: String = Gear::ALL.iter().map(Gear::letter).collect();
        assert_eq!(letters, "SPIMNQO");
    }

    #[test]
    fn test_idler_runs_on_countershaft() {
        assert_eq!(Gear::Idler.shaft(), Shaft::Countershaft);
        assert_eq!(Gear::Output.shaft(), Gear::Spindle.shaft());
        assert_eq!(Gear::Third.shaft(), Gear::Fourth.shaft());
    }
}
