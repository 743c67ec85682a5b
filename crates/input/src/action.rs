use std::str::FromStr;

/// A movement command the camera understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Translate along the facing direction.
    MoveForward,
    /// Translate against the facing direction.
    MoveBackward,
    /// Decrease yaw.
    TurnLeft,
    /// Increase yaw.
    TurnRight,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::TurnLeft,
        Action::TurnRight,
    ];

    /// Single-letter code used by input scripts.
    pub fn code(self) -> char {
        match self {
            Action::MoveForward => 'f',
            Action::MoveBackward => 'b',
            Action::TurnLeft => 'l',
            Action::TurnRight => 'r',
        }
    }

    fn from_code(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.code() == c.to_ascii_lowercase())
    }
}

/// Key state sampled for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub move_forward: bool,
    pub move_backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl InputFrame {
    /// A frame with the given actions held.
    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        let mut frame = Self::default();
        for action in actions {
            frame.set(action, true);
        }
        frame
    }

    pub fn set(&mut self, action: Action, held: bool) {
        match action {
            Action::MoveForward => self.move_forward = held,
            Action::MoveBackward => self.move_backward = held,
            Action::TurnLeft => self.turn_left = held,
            Action::TurnRight => self.turn_right = held,
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        match action {
            Action::MoveForward => self.move_forward,
            Action::MoveBackward => self.move_backward,
            Action::TurnLeft => self.turn_left,
            Action::TurnRight => self.turn_right,
        }
    }

    pub fn is_idle(&self) -> bool {
        Action::ALL.iter().all(|a| !self.is_held(*a))
    }
}

/// Errors from parsing an input script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown action `{ch}` in frame {frame}")]
    UnknownAction { ch: char, frame: usize },
    #[error("repeat count `{0}` is not a positive integer")]
    BadRepeat(String),
}

/// A recorded sequence of input frames.
///
/// Text form: whitespace-separated frames, each a combination of the letters
/// `f`, `b`, `l`, `r` (or `.` for an idle frame), optionally suffixed with
/// `*N` to repeat it. `"f*10 fr . l"` is ten forward frames, one forward and
/// turn-right frame, one idle frame, one turn-left frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputScript {
    frames: Vec<InputFrame>,
}

impl InputScript {
    pub fn new(frames: Vec<InputFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[InputFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FromStr for InputScript {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut frames = Vec::new();
        for token in s.split_whitespace() {
            let (keys, repeat) = match token.split_once('*') {
                Some((keys, count)) => {
                    let n: usize = count
                        .parse()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| ScriptError::BadRepeat(count.to_string()))?;
                    (keys, n)
                }
                None => (token, 1),
            };

            let mut frame = InputFrame::default();
            for ch in keys.chars().filter(|c| *c != '.') {
                let action = Action::from_code(ch).ok_or(ScriptError::UnknownAction {
                    ch,
                    frame: frames.len(),
                })?;
                frame.set(action, true);
            }
            frames.extend(std::iter::repeat_n(frame, repeat));
        }
        Ok(Self { frames })
    }
}

impl IntoIterator for InputScript {
    type Item = InputFrame;
    type IntoIter = std::vec::IntoIter<InputFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}
