use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
///
/// `ALL` exposes the closed value set so the generator can sample it
/// without ever producing an out-of-enumeration value.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

/// Macro for numerically coded enums, the form national extracts use.
/// Same shape as `str_enum!` but keyed by a stable wire code, with a
/// human label for report rendering.
macro_rules! code_enum {
    ($name:ident { $($variant:ident => $code:literal, $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn code(&self) -> u8 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            pub fn from_code(code: u8) -> Result<Self, ModelError> {
                match code {
                    $($code => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: code.to_string(),
                    }),
                }
            }
        }
    };
}

// ─── LIMS integration domain ──────────────────────────────────────────────────

str_enum!(Gender {
    Male => "M",
    Female => "F",
});

str_enum!(OrderPriority {
    Stat => "STAT",
    Urgent => "URGENT",
    Routine => "ROUTINE",
});

str_enum!(OrderStatus {
    Pending => "PENDING",
    Collected => "COLLECTED",
    Processing => "PROCESSING",
    Resulted => "RESULTED",
    Cancelled => "CANCELLED",
});

str_enum!(Department {
    Ed => "ED",
    Icu => "ICU",
    Medicine => "Medicine",
    Surgery => "Surgery",
    Pediatrics => "Pediatrics",
    ObGyn => "OB/GYN",
});

str_enum!(TubeType {
    Edta => "EDTA",
    Sst => "SST",
    Heparin => "Heparin",
    Citrate => "Citrate",
    UrineCup => "Urine Cup",
});

str_enum!(SpecimenLocation {
    CollectionStation => "Collection Station",
    Transport => "Transport",
    LabReception => "Lab Reception",
    ProcessingArea => "Processing Area",
    Analyzer => "Analyzer",
    Storage => "Storage",
    Disposal => "Disposal",
});

str_enum!(ResultStatus {
    Normal => "Normal",
    Abnormal => "Abnormal",
    Critical => "Critical",
    PendingReview => "Pending Review",
});

str_enum!(SyncType {
    PatientDemographics => "PATIENT_DEMOGRAPHICS",
    LabOrders => "LAB_ORDERS",
    TestResults => "TEST_RESULTS",
    SpecimenStatus => "SPECIMEN_STATUS",
    InsuranceInfo => "INSURANCE_INFO",
});

str_enum!(SyncDirection {
    EpicToLims => "EPIC_TO_LIMS",
    LimsToEpic => "LIMS_TO_EPIC",
});

str_enum!(SyncStatus {
    Success => "SUCCESS",
    Failed => "FAILED",
    Partial => "PARTIAL",
    Retry => "RETRY",
    Timeout => "TIMEOUT",
});

str_enum!(SyncErrorCode {
    None => "NONE",
    AuthFailed => "AUTH_FAILED",
    NetworkError => "NETWORK_ERROR",
    DataValidation => "DATA_VALIDATION",
    EpicUnavailable => "EPIC_UNAVAILABLE",
    RateLimit => "RATE_LIMIT",
});

// ─── NHS records domain (coded values) ────────────────────────────────────────

code_enum!(NhsGender {
    Male => 1, "Male",
    Female => 2, "Female",
    NotSpecified => 9, "Not Specified",
});

code_enum!(DiagnosisState {
    Active => 1, "Active",
    Resolved => 2, "Resolved",
    Inactive => 3, "Inactive",
});

code_enum!(MedicationState {
    Active => 1, "Active",
    Discontinued => 2, "Discontinued",
    OnHold => 3, "On-hold",
});

code_enum!(AppointmentKind {
    New => 1, "New",
    FollowUp => 2, "Follow-up",
    Emergency => 3, "Emergency",
    Telephone => 4, "Telephone",
});

code_enum!(AppointmentState {
    Scheduled => 1, "Scheduled",
    Completed => 2, "Completed",
    Cancelled => 3, "Cancelled",
    NoShow => 4, "No-show",
    Rescheduled => 5, "Rescheduled",
});

code_enum!(AbnormalCode {
    Normal => 0, "Normal",
    High => 1, "High",
    Low => 2, "Low",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn order_status_round_trip() {
        for (variant, s) in [
            (OrderStatus::Pending, "PENDING"),
            (OrderStatus::Collected, "COLLECTED"),
            (OrderStatus::Processing, "PROCESSING"),
            (OrderStatus::Resulted, "RESULTED"),
            (OrderStatus::Cancelled, "CANCELLED"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(OrderStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn sync_status_round_trip() {
        for (variant, s) in [
            (SyncStatus::Success, "SUCCESS"),
            (SyncStatus::Failed, "FAILED"),
            (SyncStatus::Partial, "PARTIAL"),
            (SyncStatus::Retry, "RETRY"),
            (SyncStatus::Timeout, "TIMEOUT"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(SyncStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn nhs_gender_code_round_trip() {
        for (variant, code) in [
            (NhsGender::Male, 1),
            (NhsGender::Female, 2),
            (NhsGender::NotSpecified, 9),
        ] {
            assert_eq!(variant.code(), code);
            assert_eq!(NhsGender::from_code(code).unwrap(), variant);
        }
    }

    #[test]
    fn appointment_state_code_round_trip() {
        for state in AppointmentState::ALL {
            assert_eq!(AppointmentState::from_code(state.code()).unwrap(), *state);
        }
    }

    #[test]
    fn all_sets_cover_every_variant() {
        assert_eq!(OrderPriority::ALL.len(), 3);
        assert_eq!(OrderStatus::ALL.len(), 5);
        assert_eq!(SpecimenLocation::ALL.len(), 7);
        assert_eq!(AppointmentState::ALL.len(), 5);
        assert_eq!(AbnormalCode::ALL.len(), 3);
    }

    #[test]
    fn invalid_values_return_error() {
        assert!(OrderStatus::from_str("UNKNOWN").is_err());
        assert!(Gender::from_str("").is_err());
        assert!(NhsGender::from_code(3).is_err());
        assert!(AbnormalCode::from_code(7).is_err());
    }
}
