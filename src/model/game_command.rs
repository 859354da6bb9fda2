use super::Choice;

/// User intent forwarded from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    Play(Choice),
    ResetAll,
}
