//! Logical key directions and held-key state.

/// Pan/zoom directions driven by held keys.
///
/// Physical bindings (arrows vs. WASD, plus vs. equals) are the
/// embedding's business; the engine only sees these logical directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyDirection {
    /// Widen the field of view (minus key).
    ZoomOut,
    /// Narrow the field of view (plus key).
    ZoomIn,
    /// Pan up.
    Up,
    /// Pan down.
    Down,
    /// Pan left.
    Left,
    /// Pan right.
    Right,
}

const KEY_COUNT: usize = 6;

impl KeyDirection {
    fn index(self) -> usize {
        match self {
            Self::ZoomOut => 0,
            Self::ZoomIn => 1,
            Self::Up => 2,
            Self::Down => 3,
            Self::Left => 4,
            Self::Right => 5,
        }
    }
}

/// Currently held logical keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    down: [bool; KEY_COUNT],
}

impl KeyState {
    /// No keys held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition; returns whether the state actually
    /// changed (auto-repeat press events do not).
    pub fn set(&mut self, direction: KeyDirection, pressed: bool) -> bool {
        let slot = &mut self.down[direction.index()];
        let changed = *slot != pressed;
        *slot = pressed;
        changed
    }

    /// Release everything (keyboard focus lost).
    pub fn clear(&mut self) {
        self.down = [false; KEY_COUNT];
    }

    /// Whether one direction is held.
    #[must_use]
    pub fn is_down(self, direction: KeyDirection) -> bool {
        self.down[direction.index()]
    }

    /// Whether any key is held.
    #[must_use]
    pub fn any_down(self) -> bool {
        self.down.iter().any(|&d| d)
    }

    /// Whether a horizontal pan key is held (inertia pauses on the axis).
    #[must_use]
    pub fn horizontal_held(self) -> bool {
        self.is_down(KeyDirection::Left) || self.is_down(KeyDirection::Right)
    }

    /// Whether a vertical pan key is held.
    #[must_use]
    pub fn vertical_held(self) -> bool {
        self.is_down(KeyDirection::Up) || self.is_down(KeyDirection::Down)
    }

    /// Whether a zoom key is held.
    #[must_use]
    pub fn zoom_held(self) -> bool {
        self.is_down(KeyDirection::ZoomIn) || self.is_down(KeyDirection::ZoomOut)
    }
}
