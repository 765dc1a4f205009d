//! Parameter objects and wire-code enumerations for the platform API.
//!
//! # Design
//! Each query operation gets one configuration struct enumerating its
//! recognized fields with the platform's documented defaults, instead of a
//! long positional parameter list. The structs serialize directly to the
//! wire shape: field renames produce the platform's camelCase keys (note the
//! capital `I` in `IdCardNumber` on query payloads) and pagination values
//! render as decimal strings, which the remote API requires even though
//! callers pass integers.
//!
//! Enum-coded wire fields (entry/exit type, attendance direction, contract
//! period type, certificate type, confirmation status) are closed sets with
//! explicit mapping methods rather than raw integers or strings at call
//! sites.

use serde::Serialize;

/// Whether a worker is entering or leaving a site.
///
/// Wire codes: entry/exit uploads use `type` 1/0, attendance uploads use
/// `direction` "01"/"02".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Entry,
    Exit,
}

impl Direction {
    /// `type` code for entry/exit uploads: 1 = entry, 0 = exit.
    pub fn entry_exit_code(self) -> u8 {
        match self {
            Direction::Entry => 1,
            Direction::Exit => 0,
        }
    }

    /// `direction` code for attendance uploads: "01" = entry, "02" = exit.
    pub fn attendance_code(self) -> &'static str {
        match self {
            Direction::Entry => "01",
            Direction::Exit => "02",
        }
    }
}

/// Labor contract period type: "0" = fixed term, "1" = runs until a defined
/// body of work completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractPeriodType {
    FixedTerm,
    TaskCompletion,
}

impl ContractPeriodType {
    pub fn code(self) -> u8 {
        match self {
            ContractPeriodType::FixedTerm => 0,
            ContractPeriodType::TaskCompletion => 1,
        }
    }
}

/// Personal certificate type per the platform's dictionary table.
///
/// "01" (resident ID card) is the only code this SDK needs a name for;
/// `Code` carries any other dictionary value verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CertificateType {
    #[default]
    IdCard,
    Code(String),
}

impl CertificateType {
    pub fn code(&self) -> &str {
        match self {
            CertificateType::IdCard => "01",
            CertificateType::Code(code) => code,
        }
    }
}

/// Usage feedback for authentication information: "0" = unused, "1" = used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmStatus {
    Unused,
    Used,
}

impl ConfirmStatus {
    pub fn code(self) -> &'static str {
        match self {
            ConfirmStatus::Unused => "0",
            ConfirmStatus::Used => "1",
        }
    }
}

/// Paged project search. Page numbering starts at 1.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectQuery {
    #[serde(rename = "pageIndex", serialize_with = "ser::decimal_string")]
    pub page: u32,
    #[serde(rename = "pageSize", serialize_with = "ser::decimal_string")]
    pub page_size: u32,
    #[serde(rename = "projectCode")]
    pub project_code: String,
    #[serde(rename = "contractorCorpCode")]
    pub contractor_corp_code: String,
    #[serde(rename = "contractorCorpName")]
    pub contractor_corp_name: String,
}

impl Default for ProjectQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
            project_code: String::new(),
            contractor_corp_code: String::new(),
            contractor_corp_name: String::new(),
        }
    }
}

/// Paged search of participating corporations on a project. Page numbering
/// starts at 1.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyQuery {
    #[serde(rename = "pageIndex", serialize_with = "ser::decimal_string")]
    pub page: u32,
    #[serde(rename = "pageSize", serialize_with = "ser::decimal_string")]
    pub page_size: u32,
    #[serde(rename = "projectCode")]
    pub project_code: String,
    #[serde(rename = "corpCode")]
    pub corp_code: String,
    #[serde(rename = "corpName")]
    pub corp_name: String,
}

impl Default for CompanyQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
            project_code: String::new(),
            corp_code: String::new(),
            corp_name: String::new(),
        }
    }
}

/// Paged worker-group search. Page numbering starts at 1.
#[derive(Debug, Clone, Serialize)]
pub struct GroupQuery {
    #[serde(rename = "pageIndex", serialize_with = "ser::decimal_string")]
    pub page: u32,
    #[serde(rename = "pageSize", serialize_with = "ser::decimal_string")]
    pub page_size: u32,
    #[serde(rename = "projectCode")]
    pub project_code: String,
    #[serde(rename = "groupCode")]
    pub group_code: String,
    #[serde(rename = "groupName")]
    pub group_name: String,
    #[serde(rename = "corpCode")]
    pub corp_code: String,
    #[serde(rename = "corpName")]
    pub corp_name: String,
}

impl Default for GroupQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
            project_code: String::new(),
            group_code: String::new(),
            group_name: String::new(),
            corp_code: String::new(),
            corp_name: String::new(),
        }
    }
}

/// Paged labor-contract search. Page numbering starts at 1.
///
/// `id_card_number` is expected AES-encrypted when supplied; encryption is
/// the caller's explicit step via [`crate::crypto::FieldCipher`].
#[derive(Debug, Clone, Serialize)]
pub struct ContractQuery {
    #[serde(rename = "pageIndex", serialize_with = "ser::decimal_string")]
    pub page: u32,
    #[serde(rename = "pageSize", serialize_with = "ser::decimal_string")]
    pub page_size: u32,
    #[serde(rename = "projectCode")]
    pub project_code: String,
    #[serde(rename = "corpCode")]
    pub corp_code: String,
    #[serde(rename = "corpName")]
    pub corp_name: String,
    #[serde(rename = "idCardType", serialize_with = "ser::certificate_code")]
    pub id_card_type: Option<CertificateType>,
    #[serde(rename = "IdCardNumber")]
    pub id_card_number: String,
    #[serde(rename = "contractPeriodType", serialize_with = "ser::period_code")]
    pub period_type: Option<ContractPeriodType>,
}

impl Default for ContractQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
            project_code: String::new(),
            corp_code: String::new(),
            corp_name: String::new(),
            id_card_type: None,
            id_card_number: String::new(),
            period_type: None,
        }
    }
}

/// Paged project-worker search. Page numbering starts at 0.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerQuery {
    #[serde(rename = "pageIndex", serialize_with = "ser::decimal_string")]
    pub page: u32,
    #[serde(rename = "pageSize", serialize_with = "ser::decimal_string")]
    pub page_size: u32,
    #[serde(rename = "projectCode")]
    pub project_code: String,
    #[serde(rename = "corpCode")]
    pub corp_code: String,
    #[serde(rename = "corpName")]
    pub corp_name: String,
    #[serde(rename = "teamSysNo")]
    pub team_sys_no: Option<i64>,
    #[serde(rename = "idCardType", serialize_with = "ser::certificate_code")]
    pub id_card_type: Option<CertificateType>,
    #[serde(rename = "IdCardNumber")]
    pub id_card_number: String,
}

impl Default for WorkerQuery {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: 50,
            project_code: String::new(),
            corp_code: String::new(),
            corp_name: String::new(),
            team_sys_no: None,
            id_card_type: None,
            id_card_number: String::new(),
        }
    }
}

/// Paged entry/exit history search. Page numbering starts at 0.
#[derive(Debug, Clone, Serialize)]
pub struct EntryExitQuery {
    #[serde(rename = "pageIndex", serialize_with = "ser::decimal_string")]
    pub page: u32,
    #[serde(rename = "pageSize", serialize_with = "ser::decimal_string")]
    pub page_size: u32,
    #[serde(rename = "projectCode")]
    pub project_code: String,
    #[serde(rename = "corpCode")]
    pub corp_code: String,
    #[serde(rename = "corpName")]
    pub corp_name: String,
    #[serde(rename = "teamSysNo")]
    pub team_sys_no: Option<i64>,
    #[serde(rename = "idCardType", serialize_with = "ser::certificate_code")]
    pub id_card_type: Option<CertificateType>,
    #[serde(rename = "IdCardNumber")]
    pub id_card_number: String,
}

impl Default for EntryExitQuery {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: 50,
            project_code: String::new(),
            corp_code: String::new(),
            corp_name: String::new(),
            team_sys_no: None,
            id_card_type: None,
            id_card_number: String::new(),
        }
    }
}

/// Paged attendance search for one swipe date (`yyyy-MM-dd`). Page numbering
/// starts at 0.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceQuery {
    #[serde(rename = "pageIndex", serialize_with = "ser::decimal_string")]
    pub page: u32,
    #[serde(rename = "pageSize", serialize_with = "ser::decimal_string")]
    pub page_size: u32,
    #[serde(rename = "projectCode")]
    pub project_code: String,
    #[serde(rename = "swipeTime")]
    pub swipe_date: String,
    #[serde(rename = "teamSysNo")]
    pub team_sys_no: Option<i64>,
    #[serde(rename = "idCardType", serialize_with = "ser::certificate_code")]
    pub id_card_type: Option<CertificateType>,
    #[serde(rename = "IdCardNumber")]
    pub id_card_number: String,
}

impl Default for AttendanceQuery {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: 50,
            project_code: String::new(),
            swipe_date: String::new(),
            team_sys_no: None,
            id_card_type: None,
            id_card_number: String::new(),
        }
    }
}

/// Contract attachment: file name plus Base64 content (at most 1 MB).
#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub name: String,
    pub data: String,
}

/// One labor contract upload. The wire shape wraps this into a one-element
/// `contractList`.
#[derive(Debug, Clone)]
pub struct NewContract {
    pub project_code: String,
    pub corp_code: String,
    pub corp_name: String,
    pub id_card_type: CertificateType,
    pub id_card_number: String,
    pub period_type: ContractPeriodType,
    /// Effective date, `yyyy-MM-dd`.
    pub start_date: String,
    /// Expiry date, `yyyy-MM-dd`.
    pub end_date: String,
    pub contract_code: String,
    pub unit: Option<i32>,
    pub unit_price: Option<f64>,
    pub attachment: Attachment,
}

/// One entry or exit event for a worker. The wire shape wraps this into a
/// one-element `workerList`.
#[derive(Debug, Clone)]
pub struct EntryExitRecord {
    pub project_code: String,
    pub corp_code: String,
    pub corp_name: String,
    pub team_sys_no: i64,
    pub direction: Direction,
    pub id_card_type: CertificateType,
    pub id_card_number: String,
    /// Event date, `yyyy-MM-dd`.
    pub date: String,
    /// Voucher scan, Base64 or a file URL, at most 50 KB. Serialized as
    /// `null` when absent.
    pub voucher: Option<String>,
}

/// A batch of workers registered under one group.
///
/// For management personnel (workRole 10) `team_sys_no` must come from the
/// manager-group query; their work type is forced to 900 by the platform.
#[derive(Debug, Clone)]
pub struct WorkerRoster {
    pub project_code: String,
    pub corp_code: String,
    pub corp_name: String,
    pub team_sys_no: String,
    pub team_name: String,
    /// Worker detail objects as the interface document defines them,
    /// forwarded verbatim under `workerList`.
    pub workers: Vec<serde_json::Value>,
}

/// One card-swipe attendance event. The wire shape wraps this into a
/// one-element `dataList`.
#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub project_code: String,
    pub team_sys_no: i64,
    pub id_card_type: CertificateType,
    pub id_card_number: String,
    /// Swipe time, `yyyy-MM-dd HH:mm:ss`.
    pub swipe_time: String,
    /// Attendance device number.
    pub equipment_num: String,
    pub direction: Direction,
    /// Swipe photo, Base64 or an image URL, at most 50 KB.
    pub image: String,
    /// Gate channel name.
    pub channel: Option<String>,
    /// Passage method per the platform's dictionary table.
    pub attend_type: Option<String>,
    /// WGS84 longitude.
    pub lng: Option<f64>,
    /// WGS84 latitude.
    pub lat: Option<f64>,
}

mod ser {
    use serde::Serializer;

    use super::{CertificateType, ContractPeriodType};

    /// Render an integer as a decimal string; the platform rejects JSON
    /// numbers in pagination fields.
    pub fn decimal_string<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    /// Absent certificate type serializes as the empty string, not null.
    pub fn certificate_code<S: Serializer>(
        value: &Option<CertificateType>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(certificate) => serializer.serialize_str(certificate.code()),
            None => serializer.serialize_str(""),
        }
    }

    /// Absent period type serializes as the empty string, not null.
    pub fn period_code<S: Serializer>(
        value: &Option<ContractPeriodType>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(period) => serializer.collect_str(&period.code()),
            None => serializer.serialize_str(""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_codes_match_wire_contract() {
        assert_eq!(Direction::Entry.entry_exit_code(), 1);
        assert_eq!(Direction::Exit.entry_exit_code(), 0);
        assert_eq!(Direction::Entry.attendance_code(), "01");
        assert_eq!(Direction::Exit.attendance_code(), "02");
    }

    #[test]
    fn certificate_type_defaults_to_id_card() {
        assert_eq!(CertificateType::default().code(), "01");
        assert_eq!(CertificateType::Code("99".to_string()).code(), "99");
    }

    #[test]
    fn project_query_serializes_pages_as_strings() {
        let json = serde_json::to_value(ProjectQuery::default()).unwrap();
        assert_eq!(json["pageIndex"], "1");
        assert_eq!(json["pageSize"], "50");
        assert_eq!(json["projectCode"], "");
    }

    #[test]
    fn worker_query_page_numbering_starts_at_zero() {
        let json = serde_json::to_value(WorkerQuery::default()).unwrap();
        assert_eq!(json["pageIndex"], "0");
        assert_eq!(json["teamSysNo"], serde_json::Value::Null);
    }

    #[test]
    fn contract_query_uses_capitalized_id_card_key() {
        let query = ContractQuery {
            id_card_number: "cipher".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(query).unwrap();
        assert_eq!(json["IdCardNumber"], "cipher");
        assert!(json.get("idCardNumber").is_none());
    }

    #[test]
    fn absent_enum_fields_serialize_as_empty_strings() {
        let json = serde_json::to_value(ContractQuery::default()).unwrap();
        assert_eq!(json["idCardType"], "");
        assert_eq!(json["contractPeriodType"], "");
    }

    #[test]
    fn present_enum_fields_serialize_as_codes() {
        let query = ContractQuery {
            id_card_type: Some(CertificateType::IdCard),
            period_type: Some(ContractPeriodType::TaskCompletion),
            ..Default::default()
        };
        let json = serde_json::to_value(query).unwrap();
        assert_eq!(json["idCardType"], "01");
        assert_eq!(json["contractPeriodType"], "1");
    }

    #[test]
    fn attendance_query_renames_swipe_date() {
        let query = AttendanceQuery {
            swipe_date: "2024-05-20".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(query).unwrap();
        assert_eq!(json["swipeTime"], "2024-05-20");
    }
}
