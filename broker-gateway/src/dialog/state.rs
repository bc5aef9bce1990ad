use std::fmt;

/// Lifecycle of one order dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogState {
    Init,
    Open,
    Edit,
    Info,
    Confirmed,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Open,
    Edit,
    Info,
    Confirm,
    Close,
}

impl DialogState {
    /// The state `transition` leads to, or `None` when it is not allowed
    /// from here.
    pub fn next(self, transition: Transition) -> Option<DialogState> {
        use DialogState::*;
        match (self, transition) {
            (Init, Transition::Open) => Some(Open),
            (Init, Transition::Edit) => Some(Edit),
            (Init, Transition::Info) => Some(Info),
            (Open | Edit | Info, Transition::Confirm) => Some(Confirmed),
            (Open | Edit | Info, Transition::Close) => Some(Closed),
            _ => None,
        }
    }

    /// Open, edit and info are the states in which the dialog accepts input.
    pub fn is_active(self) -> bool {
        matches!(self, DialogState::Open | DialogState::Edit | DialogState::Info)
    }
}

impl fmt::Display for DialogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DialogState::Init => "init",
            DialogState::Open => "open",
            DialogState::Edit => "edit",
            DialogState::Info => "info",
            DialogState::Confirmed => "confirmed",
            DialogState::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DialogState; 6] = [
        DialogState::Init,
        DialogState::Open,
        DialogState::Edit,
        DialogState::Info,
        DialogState::Confirmed,
        DialogState::Closed,
    ];

    #[test]
    fn test_entry_transitions_only_from_init() {
        for state in ALL {
            let allowed = state == DialogState::Init;
            assert_eq!(state.next(Transition::Open).is_some(), allowed, "{}", state);
            assert_eq!(state.next(Transition::Edit).is_some(), allowed, "{}", state);
            assert_eq!(state.next(Transition::Info).is_some(), allowed, "{}", state);
        }
    }

    #[test]
    fn test_confirm_and_close_need_an_active_state() {
        for state in ALL {
            assert_eq!(state.next(Transition::Confirm).is_some(), state.is_active());
            assert_eq!(state.next(Transition::Close).is_some(), state.is_active());
        }
        assert_eq!(
            DialogState::Info.next(Transition::Close),
            Some(DialogState::Closed)
        );
    }
}
