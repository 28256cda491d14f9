//! Click-through state coordinator
//!
//! Holds two independent flags:
//! - `manual`: flipped by the user's ToggleClickThrough hotkey
//! - `auto`: driven by cursor detection (or a plugin)
//!
//! The window is click-through whenever either flag is set. Writing one
//! flag never touches the other, so automatic detection can come and go
//! without undoing what the user chose, and vice versa.

/// Two-channel click-through state
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ClickThroughState {
    manual: bool,
    auto: bool,
}

impl ClickThroughState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn manual(&self) -> bool {
        self.manual
    }

    pub fn auto(&self) -> bool {
        self.auto
    }

    /// `manual OR auto`, computed on every read.
    pub fn effective(&self) -> bool {
        self.manual || self.auto
    }

    /// Flips the manual flag and returns its new value.
    pub fn toggle_manual(&mut self) -> bool {
        self.manual = !self.manual;
        self.manual
    }

    pub fn set_manual(&mut self, value: bool) {
        self.manual = value;
    }

    pub fn set_auto(&mut self, value: bool) {
        self.auto = value;
    }

    /// Forces `auto` off, e.g. when the plugin driving it unloads.
    pub fn reset_auto(&mut self) {
        self.auto = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug)]
    enum Op {
        ToggleManual,
        SetManual(bool),
        SetAuto(bool),
        ResetAuto,
    }

    fn apply(state: &mut ClickThroughState, op: Op) {
        match op {
            Op::ToggleManual => {
                state.toggle_manual();
            }
            Op::SetManual(v) => state.set_manual(v),
            Op::SetAuto(v) => state.set_auto(v),
            Op::ResetAuto => state.reset_auto(),
        }
    }

    const OPS: [Op; 6] = [
        Op::ToggleManual,
        Op::SetManual(true),
        Op::SetManual(false),
        Op::SetAuto(true),
        Op::SetAuto(false),
        Op::ResetAuto,
    ];

    #[test]
    fn test_effective_is_or_for_all_combinations() {
        for manual in [false, true] {
            for auto in [false, true] {
                let mut state = ClickThroughState::new();
                state.set_manual(manual);
                state.set_auto(auto);
                assert_eq!(state.effective(), manual || auto);
            }
        }
    }

    #[test]
    fn test_each_op_leaves_other_channel_untouched() {
        // Every three-step sequence from every starting state
        for start_manual in [false, true] {
            for start_auto in [false, true] {
                for a in OPS {
                    for b in OPS {
                        for c in OPS {
                            let mut state = ClickThroughState::new();
                            state.set_manual(start_manual);
                            state.set_auto(start_auto);

                            for op in [a, b, c] {
                                let before = state;
                                apply(&mut state, op);
                                match op {
                                    Op::ToggleManual | Op::SetManual(_) => {
                                        assert_eq!(state.auto(), before.auto(), "{:?}", op)
                                    }
                                    Op::SetAuto(_) | Op::ResetAuto => {
                                        assert_eq!(state.manual(), before.manual(), "{:?}", op)
                                    }
                                }
                                assert_eq!(state.effective(), state.manual() || state.auto());
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_toggle_manual_returns_new_value() {
        let mut state = ClickThroughState::new();
        assert!(state.toggle_manual());
        assert!(!state.toggle_manual());
    }

    #[test]
    fn test_reset_auto_is_idempotent_and_keeps_manual() {
        for manual in [false, true] {
            for auto in [false, true] {
                let mut state = ClickThroughState::new();
                state.set_manual(manual);
                state.set_auto(auto);

                state.reset_auto();
                state.reset_auto();

                assert!(!state.auto());
                assert_eq!(state.manual(), manual);
                assert_eq!(state.effective(), manual);
            }
        }
    }

    #[test]
    fn test_documented_walkthrough() {
        let mut state = ClickThroughState::new();
        assert!(!state.effective());

        state.set_manual(true);
        assert!(state.effective());

        state.set_auto(true);
        assert!(state.effective());

        state.reset_auto();
        assert!(state.effective());
        assert!(state.manual());

        state.set_manual(false);
        assert!(!state.effective());
    }
}
