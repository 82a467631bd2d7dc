/// An input that moves the active index.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    Forward,
    Reverse,
    /// Slider drag: the reported value is taken as-is.
    Set(usize),
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Forward => write!(f, "forward"),
            Step::Reverse => write!(f, "reverse"),
            Step::Set(v) => write!(f, "set {v}"),
        }
    }
}

/// The active index into an ordered attribute sequence of length `len`.
///
/// Stepping wraps at both ends. A direct set is stored without wrapping; callers
/// look the index up with `get` and treat a miss as "nothing to show".
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SequenceIndex {
    index: usize,
    len: usize,
}

impl SequenceIndex {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest value the slider offers.
    pub fn slider_max(&self) -> usize {
        self.len.saturating_sub(1)
    }

    pub fn in_range(&self) -> bool {
        self.index < self.len
    }

    pub fn forward(&mut self) -> usize {
        if self.len == 0 {
            return self.index;
        }
        self.index = self
            .index
            .checked_add(1)
            .filter(|next| *next <= self.slider_max())
            .unwrap_or(0);
        self.index
    }

    pub fn reverse(&mut self) -> usize {
        if self.len == 0 {
            return self.index;
        }
        self.index = match self.index.checked_sub(1) {
            Some(prev) => prev,
            None => self.slider_max(),
        };
        self.index
    }

    pub fn set(&mut self, value: usize) -> usize {
        self.index = value;
        self.index
    }

    pub fn apply(&mut self, step: Step) -> usize {
        match step {
            Step::Forward => self.forward(),
            Step::Reverse => self.reverse(),
            Step::Set(v) => self.set(v),
        }
    }
}
