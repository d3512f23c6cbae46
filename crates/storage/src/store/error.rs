#![forbid(unsafe_code)]

/// Expected business conditions surfaced to the caller, plus the two
/// infrastructure failures. Nothing here is fatal to the process.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    InvalidInput(&'static str),
    /// Shift end must be strictly after its start.
    InvalidInterval,
    /// The owning week is locked against schedule mutation.
    WeekLocked,
    /// The schedule is published; unpublish before editing.
    SchedulePublished,
    /// The employee already holds a slot on this shift.
    DuplicateAssignment,
    /// The shift already has `headcount_required` assignments.
    ShiftFull,
    UnknownWeek,
    UnknownSchedule,
    UnknownShift,
    UnknownAssignment,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::InvalidInterval => write!(f, "end_at must be after start_at"),
            Self::WeekLocked => write!(f, "week is locked"),
            Self::SchedulePublished => write!(f, "schedule is published"),
            Self::DuplicateAssignment => write!(f, "employee already assigned to this shift"),
            Self::ShiftFull => write!(f, "shift is already full"),
            Self::UnknownWeek => write!(f, "unknown week"),
            Self::UnknownSchedule => write!(f, "unknown schedule"),
            Self::UnknownShift => write!(f, "unknown shift"),
            Self::UnknownAssignment => write!(f, "unknown assignment"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}
