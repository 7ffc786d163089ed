/// Colour tier of a portion cell relative to the category maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTone {
    Under,
    Near,
    AtLimit,
}

impl CellTone {
    pub fn css_class(self) -> &'static str {
        match self {
            CellTone::Under => "tone-under",
            CellTone::Near => "tone-near",
            CellTone::AtLimit => "tone-limit",
        }
    }
}

/// No tone at all when `max` is zero.
pub fn classify(count: u32, max: u32) -> Option<CellTone> {
    if max == 0 {
        return None;
    }
    let tone = if count >= max {
        CellTone::AtLimit
    } else if count == max - 1 {
        CellTone::Near
    } else {
        CellTone::Under
    };
    Some(tone)
}
