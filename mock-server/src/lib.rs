//! In-memory emulation of the real-name platform API for integration tests.
//!
//! Speaks the platform's endpoint paths and wire quirks: every response is a
//! JSON envelope whose `data` member is a double-encoded JSON string (or
//! `false` when there is nothing to return), the `applyId` header is the
//! sole authentication, pagination fields must arrive as strings, and
//! single-record uploads must arrive as one-element lists. Query responses
//! AES-seal `idCardNumber` values with this crate's own cipher code — kept
//! independent from the core crate so codec drift between the two shows up
//! in integration tests.

use std::{collections::HashMap, sync::Arc};

use aes::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

/// The one registered application identifier.
pub const APP_ID: &str = "9c2f4a8e51d04b7fa6c3d8e2b5a19c07";
/// Shared secret for sealing `idCardNumber` values: the full 32 bytes are
/// the AES-256 key, the first 16 the CBC IV.
pub const AES_SECRET: &str = "3d7a94c1e8f24b6a8c51d9e07b42f6a8";
/// The one project the emulated platform knows about.
pub const PROJECT_CODE: &str = "6139685";

#[derive(Default)]
pub struct Platform {
    corporations: Vec<Value>,
    groups: HashMap<String, Value>,
    contracts: Vec<Value>,
    workers: Vec<Value>,
    entry_exits: Vec<Value>,
    attendances: Vec<Value>,
}

pub type Db = Arc<RwLock<Platform>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Platform::default()));
    Router::new()
        .route(
            "/api/receiver/open/project/queryProjectCode",
            post(query_project_code),
        )
        .route(
            "/api/receiver/open/project/queryProjectPageList",
            post(query_projects),
        )
        .route("/UploadSmz/UploadItemInfo", post(add_project))
        .route(
            "/api/receiver/open/corporation/queryCorporationPageList",
            post(query_companies),
        )
        .route(
            "/api/receiver/open/corporation/addCorporation",
            post(add_company),
        )
        .route(
            "/api/receiver/open/corporation/updateCorporation",
            post(update_company),
        )
        .route("/api/receiver/open/group/queryGroupPageList", post(query_groups))
        .route(
            "/api/receiver/open/group/queryManagerGroupList",
            post(query_manager_groups),
        )
        .route("/api/receiver/open/group/addGroup", post(add_group))
        .route("/api/receiver/open/group/updateGroup", post(update_group))
        .route(
            "/api/receiver/open/contract/queryContractList",
            post(query_contracts),
        )
        .route("/api/receiver/open/contract/addContract", post(add_contract))
        .route(
            "/api/receiver/open/projectWorker/queryProjectWorkerList",
            post(query_workers),
        )
        .route(
            "/api/receiver/open/project/queryKeyPositionPersonnelCertification",
            post(query_manager_worker),
        )
        .route(
            "/api/receiver/open/projectWorker/addProjectWorker",
            post(add_workers),
        )
        .route(
            "/api/receiver/open/projectWorker/updateProjectWorker",
            post(update_worker),
        )
        .route(
            "/api/receiver/open/project/confirmAuthenticationInformation",
            post(confirm_authentication),
        )
        .route(
            "/api/receiver/open/workerEntryExit/queryWorkerEntryExit",
            post(query_entry_exits),
        )
        .route(
            "/api/receiver/open/workerEntryExit/addWorkerEntryExit",
            post(add_entry_exit),
        )
        .route(
            "/api/receiver/open/attendance/queryWorkerAttendanceList",
            post(query_attendance),
        )
        .route(
            "/api/receiver/open/attendance/addWorkerAttendance",
            post(add_attendance),
        )
        .route(
            "/api/receiver/open/attendance/addkeyPositionsAttendance",
            post(add_manager_attendance),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Envelope helpers
// ---------------------------------------------------------------------------

/// Success with a payload: `data` is the payload serialized to a JSON
/// string, the platform's double-encoding.
fn ok_data(data: Value) -> Json<Value> {
    Json(json!({"code": 0, "message": "success", "data": data.to_string()}))
}

/// Success with nothing to return: `data` is `false`.
fn ok() -> Json<Value> {
    Json(json!({"code": 0, "message": "success", "data": false}))
}

fn fail(code: i64, message: &str) -> Json<Value> {
    Json(json!({"code": code, "message": message, "data": false}))
}

fn authed(headers: &HeaderMap) -> bool {
    headers.get("applyId").and_then(|v| v.to_str().ok()) == Some(APP_ID)
}

/// The platform rejects pagination fields that are not decimal strings.
fn page_params_ok(body: &Value) -> bool {
    body["pageIndex"].is_string() && body["pageSize"].is_string()
}

/// AES-256-CBC + Base64 seal, written against the raw cipher primitives on
/// purpose — independent of the core crate's codec.
fn seal_id_card(plaintext: &str) -> String {
    let secret = AES_SECRET.as_bytes();
    let key: [u8; 32] = secret.try_into().expect("secret is 32 bytes");
    let iv: [u8; 16] = secret[..16].try_into().expect("secret prefix is 16 bytes");
    let ciphertext = Aes256CbcEnc::new(&key.into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
    STANDARD.encode(ciphertext)
}

fn records(items: Vec<Value>) -> Value {
    json!({"total": items.len(), "records": items})
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

async fn query_project_code(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    match body["builderLicenses"].as_str() {
        Some(license) if !license.is_empty() => {
            ok_data(json!({"projectCode": PROJECT_CODE, "builderLicense": license}))
        }
        _ => fail(400, "builderLicenses is required"),
    }
}

async fn query_projects(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    if !page_params_ok(&body) {
        return fail(400, "pageIndex and pageSize must be strings");
    }
    ok_data(records(vec![json!({
        "projectCode": PROJECT_CODE,
        "name": "示范安置房项目",
        "contractorCorpCode": "91430100MA4L1XXX9K",
        "contractorCorpName": "某建筑集团有限公司",
    })]))
}

async fn add_project(headers: HeaderMap, Json(_body): Json<Value>) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    ok()
}

async fn query_manager_worker(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    ok_data(records(vec![json!({
        "projectCode": body["projectCode"],
        "idCardNumber": body["idCardNumber"],
        "certName": "一级建造师",
    })]))
}

async fn confirm_authentication(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    match body["confirmStatus"].as_str() {
        Some("0") | Some("1") => ok(),
        _ => fail(400, "confirmStatus must be \"0\" or \"1\""),
    }
}

// ---------------------------------------------------------------------------
// Corporation
// ---------------------------------------------------------------------------

async fn query_companies(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    if !page_params_ok(&body) {
        return fail(400, "pageIndex and pageSize must be strings");
    }
    let platform = db.read().await;
    ok_data(records(platform.corporations.clone()))
}

async fn add_company(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    db.write().await.corporations.push(body);
    ok()
}

async fn update_company(headers: HeaderMap, Json(_body): Json<Value>) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    ok()
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

async fn query_groups(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    if !page_params_ok(&body) {
        return fail(400, "pageIndex and pageSize must be strings");
    }
    let platform = db.read().await;
    ok_data(records(platform.groups.values().cloned().collect()))
}

async fn query_manager_groups(headers: HeaderMap, Json(_body): Json<Value>) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    ok_data(records(vec![json!({
        "teamSysNo": 901,
        "teamName": "项目管理部",
    })]))
}

async fn add_group(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    let Some(code) = body["groupCode"].as_str().map(str::to_string) else {
        return fail(400, "groupCode is required");
    };
    db.write().await.groups.insert(code, body);
    ok()
}

async fn update_group(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    let Some(code) = body["groupCode"].as_str().map(str::to_string) else {
        return fail(400, "groupCode is required");
    };
    let mut platform = db.write().await;
    match platform.groups.get_mut(&code) {
        Some(stored) => {
            *stored = body;
            ok()
        }
        None => fail(1, "group not found"),
    }
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

async fn query_contracts(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    if !page_params_ok(&body) {
        return fail(400, "pageIndex and pageSize must be strings");
    }
    let platform = db.read().await;
    let sealed: Vec<Value> = platform
        .contracts
        .iter()
        .map(|contract| {
            let mut contract = contract.clone();
            let sealed = contract["idCardNumber"].as_str().map(seal_id_card);
            if let Some(sealed) = sealed {
                contract["idCardNumber"] = json!(sealed);
            }
            contract
        })
        .collect();
    ok_data(records(sealed))
}

async fn add_contract(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    let Some(list) = body["contractList"].as_array() else {
        return fail(400, "contractList is required");
    };
    if list.len() != 1 {
        return fail(400, "contractList must hold exactly one record");
    }
    db.write().await.contracts.push(list[0].clone());
    ok()
}

// ---------------------------------------------------------------------------
// Project worker
// ---------------------------------------------------------------------------

async fn query_workers(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    if !page_params_ok(&body) {
        return fail(400, "pageIndex and pageSize must be strings");
    }
    let platform = db.read().await;
    ok_data(records(platform.workers.clone()))
}

async fn add_workers(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    let Some(list) = body["workerList"].as_array() else {
        return fail(400, "workerList is required");
    };
    if list.is_empty() {
        return fail(400, "workerList must not be empty");
    }
    db.write().await.workers.extend(list.iter().cloned());
    ok()
}

async fn update_worker(headers: HeaderMap, Json(_body): Json<Value>) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    ok()
}

// ---------------------------------------------------------------------------
// Entry/exit
// ---------------------------------------------------------------------------

async fn query_entry_exits(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    if !page_params_ok(&body) {
        return fail(400, "pageIndex and pageSize must be strings");
    }
    let platform = db.read().await;
    ok_data(records(platform.entry_exits.clone()))
}

async fn add_entry_exit(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    let Some(list) = body["workerList"].as_array() else {
        return fail(400, "workerList is required");
    };
    if list.len() != 1 {
        return fail(400, "workerList must hold exactly one record");
    }
    let record = &list[0];
    match record["type"].as_u64() {
        Some(0) | Some(1) => {}
        _ => return fail(400, "type must be 1 (entry) or 0 (exit)"),
    }
    db.write().await.entry_exits.push(record.clone());
    ok()
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

async fn query_attendance(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    if !page_params_ok(&body) {
        return fail(400, "pageIndex and pageSize must be strings");
    }
    let platform = db.read().await;
    ok_data(records(platform.attendances.clone()))
}

async fn add_attendance(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    store_attendance(db, headers, body).await
}

async fn add_manager_attendance(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    store_attendance(db, headers, body).await
}

async fn store_attendance(db: Db, headers: HeaderMap, body: Value) -> Json<Value> {
    if !authed(&headers) {
        return fail(401, "missing or unknown applyId");
    }
    let Some(list) = body["dataList"].as_array() else {
        return fail(400, "dataList is required");
    };
    if list.len() != 1 {
        return fail(400, "dataList must hold exactly one record");
    }
    let record = &list[0];
    match record["direction"].as_str() {
        Some("01") | Some("02") => {}
        _ => return fail(400, "direction must be \"01\" (entry) or \"02\" (exit)"),
    }
    db.write().await.attendances.push(record.clone());
    ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_data_double_encodes_the_payload() {
        let Json(envelope) = ok_data(json!({"total": 1}));
        assert_eq!(envelope["code"], 0);
        let data = envelope["data"].as_str().unwrap();
        let nested: Value = serde_json::from_str(data).unwrap();
        assert_eq!(nested["total"], 1);
    }

    #[test]
    fn ok_without_payload_sets_data_false() {
        let Json(envelope) = ok();
        assert_eq!(envelope["data"], false);
    }

    #[test]
    fn sealed_id_card_is_base64_of_whole_blocks() {
        let sealed = seal_id_card("430102199001011234");
        let raw = STANDARD.decode(sealed).unwrap();
        assert_eq!(raw.len() % 16, 0);
        assert_eq!(raw.len(), 32);
    }

    #[test]
    fn sealing_is_deterministic() {
        assert_eq!(seal_id_card("430102199001011234"), seal_id_card("430102199001011234"));
    }
}
