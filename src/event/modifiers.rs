//! Keyboard modifier mask carried by every event and shortcut.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Keyboard modifier state.
    ///
    /// Stored as a bit mask so that shortcuts can compare modifier sets with a
    /// single equality check. Backends translate their native modifier flags
    /// into this mask when building raw samples.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifier pressed
        const NONE = 0;
        /// Shift key pressed
        const SHIFT = 1 << 0;
        /// Ctrl key pressed
        const CTRL = 1 << 1;
        /// Meta (Super/Command) key pressed
        const META = 1 << 2;
        /// Alt key pressed
        const ALT = 1 << 3;
        /// AltGr key pressed
        const ALT_GRAPH = 1 << 4;
    }
}

impl Modifiers {
    /// Builds a mask from individual key states.
    pub fn from_flags(shift: bool, ctrl: bool, meta: bool, alt: bool) -> Self {
        let mut mask = Self::NONE;
        mask.set(Self::SHIFT, shift);
        mask.set(Self::CTRL, ctrl);
        mask.set(Self::META, meta);
        mask.set(Self::ALT, alt);
        mask
    }

    pub fn is_shift_down(self) -> bool {
        self.contains(Self::SHIFT)
    }

    pub fn is_control_down(self) -> bool {
        self.contains(Self::CTRL)
    }

    pub fn is_meta_down(self) -> bool {
        self.contains(Self::META)
    }

    pub fn is_alt_down(self) -> bool {
        self.contains(Self::ALT)
    }

    pub fn is_alt_graph_down(self) -> bool {
        self.contains(Self::ALT_GRAPH)
    }

    /// Renders the mask as `ALT+SHIFT+CTRL+META+ALT_GRAPH` (present flags only).
    ///
    /// Returns an empty string when no modifier is set.
    pub fn text(self) -> String {
        let names = [
            (Self::ALT, "ALT"),
            (Self::SHIFT, "SHIFT"),
            (Self::CTRL, "CTRL"),
            (Self::META, "META"),
            (Self::ALT_GRAPH, "ALT_GRAPH"),
        ];
        names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Parses a single modifier name as used in binding strings.
    ///
    /// Accepts aliases (`control`, `super`, `altgr`) unlike the generated
    /// [`Modifiers::from_name`], which only knows the flag identifiers.
    pub(crate) fn from_binding_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "shift" => Some(Self::SHIFT),
            "ctrl" | "control" => Some(Self::CTRL),
            "meta" | "super" | "cmd" => Some(Self::META),
            "alt" => Some(Self::ALT),
            "altgr" | "alt_graph" => Some(Self::ALT_GRAPH),
            _ => None,
        }
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lists_flags_in_fixed_order() {
        let mask = Modifiers::CTRL | Modifiers::ALT | Modifiers::SHIFT;
        assert_eq!(mask.text(), "ALT+SHIFT+CTRL");
        assert_eq!(Modifiers::NONE.text(), "");
    }

    #[test]
    fn from_flags_sets_expected_bits() {
        let mask = Modifiers::from_flags(true, false, true, false);
        assert!(mask.is_shift_down());
        assert!(mask.is_meta_down());
        assert!(!mask.is_control_down());
        assert!(!mask.is_alt_down());
        assert_eq!(mask.bits(), 0b101);
    }

    #[test]
    fn binding_names_are_case_insensitive() {
        assert_eq!(Modifiers::from_binding_name("CTRL"), Some(Modifiers::CTRL));
        assert_eq!(Modifiers::from_binding_name("Control"), Some(Modifiers::CTRL));
        assert_eq!(Modifiers::from_binding_name("left"), None);
    }

    #[test]
    fn masks_combine_and_compare_as_sets() {
        let mut mask = Modifiers::CTRL;
        mask |= Modifiers::SHIFT;
        assert!(mask.contains(Modifiers::SHIFT | Modifiers::CTRL));
        assert!(!mask.contains(Modifiers::ALT));
        assert!(Modifiers::NONE.is_empty());
        assert_eq!(mask, Modifiers::from_flags(true, true, false, false));
    }
}
