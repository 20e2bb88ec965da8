/// The four directional commands that drive the scene window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
}

/// Two-state command input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandState {
    Press,
    Release,
}

impl Command {
    pub const ALL: [Command; 4] = [Command::Up, Command::Down, Command::Left, Command::Right];

    /// Velocity axis (0 = X, 2 = Z) and direction sign for this command.
    /// Up/Down move along Z, Right/Left along X.
    pub fn axis(self) -> (usize, f32) {
        match self {
            Command::Up => (2, 1.0),
            Command::Down => (2, -1.0),
            Command::Right => (0, 1.0),
            Command::Left => (0, -1.0),
        }
    }

    /// New velocity for this command's axis: `±speed` when pressed, zero
    /// when released.
    pub fn velocity(self, state: CommandState, speed: f32) -> (usize, f32) {
        let (axis, sign) = self.axis();
        match state {
            CommandState::Press => (axis, sign * speed),
            CommandState::Release => (axis, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release() {
        assert_eq!(Command::Up.velocity(CommandState::Press, 10.0), (2, 10.0));
        assert_eq!(Command::Down.velocity(CommandState::Press, 10.0), (2, -10.0));
        assert_eq!(Command::Right.velocity(CommandState::Press, 10.0), (0, 10.0));
        assert_eq!(Command::Left.velocity(CommandState::Press, 10.0), (0, -10.0));
        for command in Command::ALL {
            assert_eq!(command.velocity(CommandState::Release, 10.0).1, 0.0);
        }
    }
}
