//! Job code lookup and role mapping
//!
//! Maps the job byte delivered by the telemetry source to a short job tag
//! and a party role. Unknown codes resolve to [`Role::Unknown`] and an empty
//! tag; they still display, they just never satisfy a job-gated telop.

use serde::{Deserialize, Serialize};

/// Party role a job fills in group content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Tank,
    Healer,
    MeleeDps,
    RangeDps,
    MagicDps,
    Crafter,
    Gatherer,
    Unknown,
}

impl Role {
    /// True for the three damage roles
    pub fn is_dps(&self) -> bool {
        matches!(self, Role::MeleeDps | Role::RangeDps | Role::MagicDps)
    }
}

/// Static job metadata keyed by source job code
#[derive(Debug, Clone, Copy)]
pub struct JobInfo {
    /// Three-letter job tag used in telop job filters
    pub tag: &'static str,
    pub role: Role,
}

static JOBS: phf::Map<u8, JobInfo> = phf::phf_map! {
    1u8 => JobInfo { tag: "GLA", role: Role::Tank },
    2u8 => JobInfo { tag: "PGL", role: Role::MeleeDps },
    3u8 => JobInfo { tag: "MRD", role: Role::Tank },
    4u8 => JobInfo { tag: "LNC", role: Role::MeleeDps },
    5u8 => JobInfo { tag: "ARC", role: Role::RangeDps },
    6u8 => JobInfo { tag: "CNJ", role: Role::Healer },
    7u8 => JobInfo { tag: "THM", role: Role::MagicDps },
    8u8 => JobInfo { tag: "CRP", role: Role::Crafter },
    9u8 => JobInfo { tag: "BSM", role: Role::Crafter },
    10u8 => JobInfo { tag: "ARM", role: Role::Crafter },
    11u8 => JobInfo { tag: "GSM", role: Role::Crafter },
    12u8 => JobInfo { tag: "LTW", role: Role::Crafter },
    13u8 => JobInfo { tag: "WVR", role: Role::Crafter },
    14u8 => JobInfo { tag: "ALC", role: Role::Crafter },
    15u8 => JobInfo { tag: "CUL", role: Role::Crafter },
    16u8 => JobInfo { tag: "MIN", role: Role::Gatherer },
    17u8 => JobInfo { tag: "BTN", role: Role::Gatherer },
    18u8 => JobInfo { tag: "FSH", role: Role::Gatherer },
    19u8 => JobInfo { tag: "PLD", role: Role::Tank },
    20u8 => JobInfo { tag: "MNK", role: Role::MeleeDps },
    21u8 => JobInfo { tag: "WAR", role: Role::Tank },
    22u8 => JobInfo { tag: "DRG", role: Role::MeleeDps },
    23u8 => JobInfo { tag: "BRD", role: Role::RangeDps },
    24u8 => JobInfo { tag: "WHM", role: Role::Healer },
    25u8 => JobInfo { tag: "BLM", role: Role::MagicDps },
    26u8 => JobInfo { tag: "ACN", role: Role::MagicDps },
    27u8 => JobInfo { tag: "SMN", role: Role::MagicDps },
    28u8 => JobInfo { tag: "SCH", role: Role::Healer },
    29u8 => JobInfo { tag: "ROG", role: Role::MeleeDps },
    30u8 => JobInfo { tag: "NIN", role: Role::MeleeDps },
    31u8 => JobInfo { tag: "MCH", role: Role::RangeDps },
    32u8 => JobInfo { tag: "DRK", role: Role::Tank },
    33u8 => JobInfo { tag: "AST", role: Role::Healer },
};

/// Look up job metadata for a source job code.
pub fn job_info(code: u8) -> Option<&'static JobInfo> {
    JOBS.get(&code)
}

/// Job tag for a source job code, empty for unknown codes.
pub fn job_tag(code: u8) -> &'static str {
    job_info(code).map(|j| j.tag).unwrap_or("")
}

/// Party role for a source job code.
pub fn job_role(code: u8) -> Role {
    job_info(code).map(|j| j.role).unwrap_or(Role::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(job_tag(24), "WHM");
        assert_eq!(job_role(24), Role::Healer);
        assert_eq!(job_role(21), Role::Tank);
        assert!(job_role(25).is_dps());
    }

    #[test]
    fn unknown_code_is_unknown() {
        assert_eq!(job_tag(0), "");
        assert_eq!(job_role(250), Role::Unknown);
    }
}
