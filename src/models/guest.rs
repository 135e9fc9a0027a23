/// Upper bound on companions per invitation; form inputs and read-time
/// coercion both clamp to this.
pub const MAX_COMPANIONS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attendance {
    Pending,
    Yes,
    No,
}

impl Attendance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    /// Permissive: the sheets this replaces were kept in Portuguese, so both
    /// spellings are accepted. Anything unrecognized falls back to Pending.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "yes" | "confirmed" | "sim" => Self::Yes,
            "no" | "declined" | "nao" | "não" => Self::No,
            _ => Self::Pending,
        }
    }

    pub fn all() -> &'static [Attendance] {
        &[Self::Pending, Self::Yes, Self::No]
    }
}

impl std::fmt::Display for Attendance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guest {
    pub name: String,
    pub category: String,
    pub companions: u32,
    pub attendance: Attendance,
}

impl Guest {
    pub fn new(name: String, category: String, companions: u32, attendance: Attendance) -> Self {
        Self {
            name,
            category,
            companions: companions.min(MAX_COMPANIONS),
            attendance,
        }
    }

    /// Seats this invitation takes, companions included.
    pub fn party_size(&self) -> u32 {
        1 + self.companions
    }

    pub fn is_confirmed(&self) -> bool {
        self.attendance == Attendance::Yes
    }
}
