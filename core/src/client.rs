//! Request builder and dispatcher for the real-name platform API.
//!
//! # Design
//! `Client` holds only the normalized base URL and the `applyId` credential;
//! it carries no mutable state between calls, so one instance is safe to
//! share across threads. Each operation is a `build_*` method returning an
//! immutable [`HttpRequest`] value — the pending request — which the caller
//! dispatches through [`Client::send`] (or any [`Transport`]) and normalizes
//! with [`Client::parse_response`]. Splitting build from dispatch keeps
//! every payload shape testable without a live endpoint.
//!
//! All operations POST a JSON body and authenticate with the `applyId`
//! header alone; there is no signing or nonce. Certificate numbers travel
//! AES-encrypted where the interface document says so — encrypting them is
//! the caller's explicit step via [`crate::crypto::FieldCipher`], never an
//! implicit one here.

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::envelope;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{
    AttendanceQuery, AttendanceRecord, CompanyQuery, ConfirmStatus, ContractQuery, EntryExitQuery,
    EntryExitRecord, GroupQuery, NewContract, ProjectQuery, WorkerQuery, WorkerRoster,
};

/// Stateless client for the Hunan real-name construction worker platform.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    app_id: String,
}

impl Client {
    /// `domain` is the interface host (port included); a trailing slash is
    /// stripped. `app_id` must be non-empty.
    pub fn new(domain: &str, app_id: &str) -> Result<Self, ApiError> {
        if app_id.is_empty() {
            return Err(ApiError::Config("appId must not be empty".to_string()));
        }
        Ok(Self {
            base_url: domain.trim_end_matches('/').to_string(),
            app_id: app_id.to_string(),
        })
    }

    /// Look up project codes by construction license number.
    pub fn build_query_project_code(&self, license: &str) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/project/queryProjectCode",
            json!({ "builderLicenses": license }),
        )
    }

    /// Paged project search.
    pub fn build_query_projects(&self, query: &ProjectQuery) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/project/queryProjectPageList",
            to_payload(query)?,
        )
    }

    /// Upload project information, shaped per the interface document.
    pub fn build_add_project(&self, info: Map<String, Value>) -> Result<HttpRequest, ApiError> {
        self.post("/UploadSmz/UploadItemInfo", Value::Object(info))
    }

    /// Paged search of participating corporations.
    pub fn build_query_companies(&self, query: &CompanyQuery) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/corporation/queryCorporationPageList",
            to_payload(query)?,
        )
    }

    /// Upload one participating corporation.
    pub fn build_add_company(&self, info: Map<String, Value>) -> Result<HttpRequest, ApiError> {
        self.post("/api/receiver/open/corporation/addCorporation", Value::Object(info))
    }

    /// Update one participating corporation.
    pub fn build_update_company(&self, info: Map<String, Value>) -> Result<HttpRequest, ApiError> {
        self.post("/api/receiver/open/corporation/updateCorporation", Value::Object(info))
    }

    /// Paged worker-group search.
    pub fn build_query_groups(&self, query: &GroupQuery) -> Result<HttpRequest, ApiError> {
        self.post("/api/receiver/open/group/queryGroupPageList", to_payload(query)?)
    }

    /// List management-personnel groups for a project (not paged).
    pub fn build_query_manager_groups(
        &self,
        project_code: &str,
        corp_code: &str,
        corp_name: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/group/queryManagerGroupList",
            json!({
                "projectCode": project_code,
                "corpCode": corp_code,
                "corpName": corp_name,
            }),
        )
    }

    /// Upload one worker group.
    pub fn build_add_group(&self, info: Map<String, Value>) -> Result<HttpRequest, ApiError> {
        self.post("/api/receiver/open/group/addGroup", Value::Object(info))
    }

    /// Update one worker group. `group_code` is merged into the payload
    /// under `groupCode`; a caller-supplied `groupCode` is never overwritten.
    pub fn build_update_group(
        &self,
        group_code: &str,
        mut info: Map<String, Value>,
    ) -> Result<HttpRequest, ApiError> {
        info.entry("groupCode")
            .or_insert_with(|| Value::String(group_code.to_string()));
        self.post("/api/receiver/open/group/updateGroup", Value::Object(info))
    }

    /// Paged labor-contract search.
    pub fn build_query_contracts(&self, query: &ContractQuery) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/contract/queryContractList",
            to_payload(query)?,
        )
    }

    /// Upload one labor contract. The record rides in a one-element
    /// `contractList`.
    pub fn build_add_contract(&self, contract: &NewContract) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/contract/addContract",
            json!({
                "projectCode": contract.project_code,
                "contractList": [{
                    "corpCode": contract.corp_code,
                    "corpName": contract.corp_name,
                    "idCardType": contract.id_card_type.code(),
                    "idCardNumber": contract.id_card_number,
                    "contractPeriodType": contract.period_type.code(),
                    "startDate": contract.start_date,
                    "endDate": contract.end_date,
                    "contractCode": contract.contract_code,
                    "unit": contract.unit,
                    "unitPrice": contract.unit_price,
                    "attachments": [contract.attachment],
                }],
            }),
        )
    }

    /// Paged project-worker search.
    pub fn build_query_workers(&self, query: &WorkerQuery) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/projectWorker/queryProjectWorkerList",
            to_payload(query)?,
        )
    }

    /// Query key-position personnel and their certification records.
    pub fn build_query_manager_worker(
        &self,
        project_code: &str,
        id_card_number: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/project/queryKeyPositionPersonnelCertification",
            json!({
                "idCardNumber": id_card_number,
                "projectCode": project_code,
            }),
        )
    }

    /// Register a roster of workers under one group. The caller-supplied
    /// list is forwarded as-is under `workerList`.
    pub fn build_add_workers(&self, roster: &WorkerRoster) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/projectWorker/addProjectWorker",
            json!({
                "projectCode": roster.project_code,
                "corpCode": roster.corp_code,
                "corpName": roster.corp_name,
                "teamSysNo": roster.team_sys_no,
                "teamName": roster.team_name,
                "workerList": roster.workers,
            }),
        )
    }

    /// Update one worker's details, shaped per the interface document.
    pub fn build_update_worker(&self, info: Map<String, Value>) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/projectWorker/updateProjectWorker",
            Value::Object(info),
        )
    }

    /// Report whether fetched authentication information was used.
    pub fn build_confirm_authentication(
        &self,
        id_card_number: &str,
        project_code: &str,
        status: ConfirmStatus,
    ) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/project/confirmAuthenticationInformation",
            json!({
                "idCardNumber": id_card_number,
                "projectCode": project_code,
                "confirmStatus": status.code(),
            }),
        )
    }

    /// Paged entry/exit history search.
    pub fn build_query_entry_exits(&self, query: &EntryExitQuery) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/workerEntryExit/queryWorkerEntryExit",
            to_payload(query)?,
        )
    }

    /// Report one worker entering or leaving the site. The record rides in a
    /// one-element `workerList`; `type` is 1 for entry, 0 for exit.
    pub fn build_worker_entry_exit(&self, record: &EntryExitRecord) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/workerEntryExit/addWorkerEntryExit",
            json!({
                "projectCode": record.project_code,
                "corpCode": record.corp_code,
                "corpName": record.corp_name,
                "teamSysNo": record.team_sys_no,
                "workerList": [{
                    "idCardType": record.id_card_type.code(),
                    "idCardNumber": record.id_card_number,
                    "date": record.date,
                    "type": record.direction.entry_exit_code(),
                    "voucher": record.voucher,
                }],
            }),
        )
    }

    /// Paged attendance search for one swipe date.
    pub fn build_query_attendance(&self, query: &AttendanceQuery) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/attendance/queryWorkerAttendanceList",
            to_payload(query)?,
        )
    }

    /// Report one worker card swipe. The record rides in a one-element
    /// `dataList`; `direction` is "01" for entry, "02" for exit.
    pub fn build_add_attendance(&self, record: &AttendanceRecord) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/attendance/addWorkerAttendance",
            attendance_payload(record),
        )
    }

    /// Report one key-position personnel card swipe. Same payload shape as
    /// [`Client::build_add_attendance`], different endpoint.
    pub fn build_add_manager_attendance(
        &self,
        record: &AttendanceRecord,
    ) -> Result<HttpRequest, ApiError> {
        self.post(
            "/api/receiver/open/attendance/addkeyPositionsAttendance",
            attendance_payload(record),
        )
    }

    /// Execute one round-trip and normalize the response envelope.
    pub fn send(
        &self,
        transport: &impl Transport,
        request: HttpRequest,
    ) -> Result<Value, ApiError> {
        debug!(url = %request.path, "dispatching request");
        let response = transport.execute(&request)?;
        debug!(status = response.status, "response received");
        self.parse_response(response)
    }

    /// Reject non-2xx responses, then decode the double-JSON envelope.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if !(200..300).contains(&response.status) {
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }
        envelope::normalize(&response.body)
    }

    fn post(&self, suffix: &str, payload: Value) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(&payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{suffix}", self.base_url),
            headers: vec![
                ("applyId".to_string(), self.app_id.clone()),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        })
    }
}

fn to_payload<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn attendance_payload(record: &AttendanceRecord) -> Value {
    json!({
        "projectCode": record.project_code,
        "teamSysNo": record.team_sys_no,
        "dataList": [{
            "idCardType": record.id_card_type.code(),
            "idCardNumber": record.id_card_number,
            "swipeTime": record.swipe_time,
            "equipmentNum": record.equipment_num,
            "direction": record.direction.attendance_code(),
            "image": record.image,
            "channel": record.channel,
            "attendType": record.attend_type,
            "lng": record.lng,
            "lat": record.lat,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attachment, CertificateType, ContractPeriodType, Direction};

    fn client() -> Client {
        Client::new("http://gateway.example.com:9702", "test-app-id").unwrap()
    }

    fn payload(request: &HttpRequest) -> Value {
        serde_json::from_str(request.body.as_deref().unwrap()).unwrap()
    }

    fn entry_exit_record(direction: Direction) -> EntryExitRecord {
        EntryExitRecord {
            project_code: "6139685".to_string(),
            corp_code: "91430100MA4L1XXX9K".to_string(),
            corp_name: "某建筑公司".to_string(),
            team_sys_no: 17,
            direction,
            id_card_type: CertificateType::IdCard,
            id_card_number: "430102199001011234".to_string(),
            date: "2024-05-20".to_string(),
            voucher: None,
        }
    }

    fn attendance_record(direction: Direction) -> AttendanceRecord {
        AttendanceRecord {
            project_code: "6139685".to_string(),
            team_sys_no: 17,
            id_card_type: CertificateType::IdCard,
            id_card_number: "430102199001011234".to_string(),
            swipe_time: "2024-05-20 08:01:12".to_string(),
            equipment_num: "DEV-4".to_string(),
            direction,
            image: "aGVhZHNob3Q=".to_string(),
            channel: None,
            attend_type: None,
            lng: None,
            lat: None,
        }
    }

    #[test]
    fn new_rejects_empty_app_id() {
        let err = Client::new("http://example.com", "").unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn new_strips_trailing_slash() {
        let c = Client::new("http://example.com/", "id").unwrap();
        let request = c.build_query_project_code("431127202101280101").unwrap();
        assert_eq!(
            request.path,
            "http://example.com/api/receiver/open/project/queryProjectCode"
        );
    }

    #[test]
    fn every_request_carries_apply_id_and_content_type() {
        let request = client().build_query_projects(&ProjectQuery::default()).unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.headers,
            vec![
                ("applyId".to_string(), "test-app-id".to_string()),
                ("content-type".to_string(), "application/json".to_string()),
            ]
        );
    }

    #[test]
    fn project_query_renders_pages_as_decimal_strings() {
        let request = client().build_query_projects(&ProjectQuery::default()).unwrap();
        let body = payload(&request);
        assert_eq!(body["pageIndex"], "1");
        assert_eq!(body["pageSize"], "50");
        assert!(body["pageIndex"].is_string());
    }

    #[test]
    fn custom_page_renders_as_decimal_string() {
        let query = ProjectQuery {
            page: 7,
            page_size: 10,
            ..Default::default()
        };
        let body = payload(&client().build_query_projects(&query).unwrap());
        assert_eq!(body["pageIndex"], "7");
        assert_eq!(body["pageSize"], "10");
    }

    #[test]
    fn worker_query_pages_start_at_zero() {
        let body = payload(&client().build_query_workers(&WorkerQuery::default()).unwrap());
        assert_eq!(body["pageIndex"], "0");
    }

    #[test]
    fn add_project_forwards_payload_verbatim() {
        let mut info = Map::new();
        info.insert("name".to_string(), json!("示范项目"));
        info.insert("category".to_string(), json!(3));
        let request = client().build_add_project(info).unwrap();
        assert_eq!(request.path, "http://gateway.example.com:9702/UploadSmz/UploadItemInfo");
        let body = payload(&request);
        assert_eq!(body, json!({"name": "示范项目", "category": 3}));
    }

    #[test]
    fn update_group_injects_group_code() {
        let mut info = Map::new();
        info.insert("groupName".to_string(), json!("钢筋班"));
        let body = payload(&client().build_update_group("G-001", info).unwrap());
        assert_eq!(body["groupCode"], "G-001");
        assert_eq!(body["groupName"], "钢筋班");
    }

    #[test]
    fn update_group_keeps_caller_supplied_group_code() {
        let mut info = Map::new();
        info.insert("groupCode".to_string(), json!("G-KEEP"));
        let body = payload(&client().build_update_group("G-001", info).unwrap());
        assert_eq!(body["groupCode"], "G-KEEP");
    }

    #[test]
    fn contract_query_emits_capitalized_id_card_key() {
        let query = ContractQuery {
            project_code: "6139685".to_string(),
            id_card_number: "ciphertext".to_string(),
            ..Default::default()
        };
        let body = payload(&client().build_query_contracts(&query).unwrap());
        assert_eq!(body["IdCardNumber"], "ciphertext");
        assert!(body.get("idCardNumber").is_none());
    }

    #[test]
    fn add_contract_wraps_a_single_record() {
        let contract = NewContract {
            project_code: "6139685".to_string(),
            corp_code: "91430100MA4L1XXX9K".to_string(),
            corp_name: "某建筑公司".to_string(),
            id_card_type: CertificateType::IdCard,
            id_card_number: "430102199001011234".to_string(),
            period_type: ContractPeriodType::FixedTerm,
            start_date: "2024-01-01".to_string(),
            end_date: "2024-12-31".to_string(),
            contract_code: String::new(),
            unit: None,
            unit_price: None,
            attachment: Attachment {
                name: "contract.jpg".to_string(),
                data: "aW1hZ2U=".to_string(),
            },
        };
        let body = payload(&client().build_add_contract(&contract).unwrap());
        let list = body["contractList"].as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["contractPeriodType"], 0);
        assert_eq!(list[0]["unit"], Value::Null);
        let attachments = list[0]["attachments"].as_array().unwrap();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0]["name"], "contract.jpg");
    }

    #[test]
    fn entry_and_exit_payloads_differ_only_in_type() {
        let c = client();
        let entry = payload(&c.build_worker_entry_exit(&entry_exit_record(Direction::Entry)).unwrap());
        let exit = payload(&c.build_worker_entry_exit(&entry_exit_record(Direction::Exit)).unwrap());

        assert_eq!(entry["workerList"][0]["type"], 1);
        assert_eq!(exit["workerList"][0]["type"], 0);

        let mut exit_as_entry = exit.clone();
        exit_as_entry["workerList"][0]["type"] = json!(1);
        assert_eq!(entry, exit_as_entry);
    }

    #[test]
    fn entry_exit_wraps_a_single_record_with_null_voucher() {
        let body = payload(
            &client()
                .build_worker_entry_exit(&entry_exit_record(Direction::Entry))
                .unwrap(),
        );
        let list = body["workerList"].as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["voucher"], Value::Null);
    }

    #[test]
    fn attendance_direction_maps_entry_and_exit() {
        let c = client();
        let entry = payload(&c.build_add_attendance(&attendance_record(Direction::Entry)).unwrap());
        let exit = payload(&c.build_add_attendance(&attendance_record(Direction::Exit)).unwrap());
        assert_eq!(entry["dataList"][0]["direction"], "01");
        assert_eq!(exit["dataList"][0]["direction"], "02");
    }

    #[test]
    fn attendance_wraps_a_single_record() {
        let body = payload(
            &client()
                .build_add_attendance(&attendance_record(Direction::Entry))
                .unwrap(),
        );
        let list = body["dataList"].as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["equipmentNum"], "DEV-4");
        assert_eq!(list[0]["channel"], Value::Null);
        assert_eq!(list[0]["lng"], Value::Null);
    }

    #[test]
    fn manager_attendance_shares_the_payload_shape() {
        let c = client();
        let record = attendance_record(Direction::Entry);
        let worker = c.build_add_attendance(&record).unwrap();
        let manager = c.build_add_manager_attendance(&record).unwrap();
        assert_eq!(payload(&worker), payload(&manager));
        assert!(worker.path.ends_with("/addWorkerAttendance"));
        assert!(manager.path.ends_with("/addkeyPositionsAttendance"));
    }

    #[test]
    fn roster_forwards_the_caller_supplied_worker_list() {
        let roster = WorkerRoster {
            project_code: "6139685".to_string(),
            corp_code: "91430100MA4L1XXX9K".to_string(),
            corp_name: "某建筑公司".to_string(),
            team_sys_no: "17".to_string(),
            team_name: "钢筋班".to_string(),
            workers: vec![
                json!({"workerName": "张三", "workRole": 20}),
                json!({"workerName": "李四", "workRole": 20}),
            ],
        };
        let body = payload(&client().build_add_workers(&roster).unwrap());
        assert_eq!(body["workerList"].as_array().unwrap().len(), 2);
        assert_eq!(body["teamName"], "钢筋班");
    }

    #[test]
    fn confirm_authentication_codes_usage() {
        let c = client();
        let used = payload(
            &c.build_confirm_authentication("430102199001011234", "6139685", ConfirmStatus::Used)
                .unwrap(),
        );
        let unused = payload(
            &c.build_confirm_authentication("430102199001011234", "6139685", ConfirmStatus::Unused)
                .unwrap(),
        );
        assert_eq!(used["confirmStatus"], "1");
        assert_eq!(unused["confirmStatus"], "0");
    }

    #[test]
    fn builders_select_the_documented_endpoints() {
        let c = client();
        let cases = [
            (
                c.build_query_manager_groups("6139685", "", "").unwrap(),
                "/api/receiver/open/group/queryManagerGroupList",
            ),
            (
                c.build_query_manager_worker("6139685", "").unwrap(),
                "/api/receiver/open/project/queryKeyPositionPersonnelCertification",
            ),
            (
                c.build_query_entry_exits(&EntryExitQuery::default()).unwrap(),
                "/api/receiver/open/workerEntryExit/queryWorkerEntryExit",
            ),
            (
                c.build_query_attendance(&AttendanceQuery::default()).unwrap(),
                "/api/receiver/open/attendance/queryWorkerAttendanceList",
            ),
        ];
        for (request, suffix) in cases {
            assert_eq!(request.path, format!("http://gateway.example.com:9702{suffix}"));
        }
    }

    #[test]
    fn parse_response_rejects_non_2xx() {
        let response = HttpResponse {
            status: 502,
            headers: Vec::new(),
            body: "bad gateway".to_string(),
        };
        let err = client().parse_response(response).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 502, .. }));
    }

    #[test]
    fn parse_response_normalizes_the_nested_data_document() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"code":0,"data":"{\"records\":[{\"idCardNumber\":\"X\"}]}"}"#.to_string(),
        };
        let envelope = client().parse_response(response).unwrap();
        assert_eq!(envelope["data"]["records"][0]["idCardNumber"], "X");
    }
}
