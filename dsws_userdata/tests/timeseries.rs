use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dsws_userdata::dates::resolve_dates;
use dsws_userdata::{
    Frequency, Settings, TimeseriesClient, TimeseriesRequest, UserObjectStatus,
};

const SERVICE: &str = "/DSWSClient/V1/DSUserDataService.svc/rest";

fn endpoint(name: &str) -> String {
    format!("{SERVICE}/{name}")
}

async fn connected_client(server: &MockServer) -> TimeseriesClient {
    Mock::given(method("POST"))
        .and(path(endpoint("GetToken")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "TokenValue": "tok-1",
            "TokenExpiry": format!("/Date({})/", (Utc::now() + Duration::hours(24)).timestamp_millis()),
        })))
        .mount(server)
        .await;
    let settings = Settings {
        url: server.uri(),
        ..Settings::with_credentials("ZABC001", "secret")
    };
    TimeseriesClient::connect(settings).await.unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 21 quarterly periods' worth of range would not match the resolved date
/// count; the contract is one value per resolved date, so the item is
/// built from the resolver's own count.
fn quarterly_item() -> (TimeseriesRequest, usize) {
    let start = date(2016, 1, 1);
    let end = date(2022, 4, 1);
    let count = resolve_dates(start, end, Frequency::Quarterly).len();
    let values = (0..count).map(|i| Some(10.25 + i as f64)).collect();
    let mut item = TimeseriesRequest::new("TSZZZ001", start, end, Frequency::Quarterly, values);
    item.decimal_places = 2;
    item.units = Some("Billions".to_string());
    item.date_alignment = dsws_userdata::DateAlignment::MidPeriod;
    (item, count)
}

#[tokio::test]
async fn create_quarterly_item_end_to_end() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;
    let (item, count) = quarterly_item();

    Mock::given(method("POST"))
        .and(path(endpoint("CreateItem")))
        .and(body_partial_json(json!({
            "TokenValue": "tok-1",
            "UserObjectType": 3,
            "UserObject": {
                "Id": "TSZZZ001",
                "Mnemonic": "TSZZZ001",
                "Units": "Billions",
                "DecimalPlaces": 2,
                "DateAlignment": 2,
                "DataInput": {"Frequency": 3},
            },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "UserObjectId": "TSZZZ001",
            "UserObjectType": 3,
            "UserObject": {
                "Id": "TSZZZ001",
                "Mnemonic": "TSZZZ001",
                "DisplayName": "TSZZZ001",
                "Description": "TSZZZ001",
                "Created": "/Date(1650412800000)/",
                "LastModified": "/Date(1650412800000)/",
                "Owner": "PARENT01",
                "ShareType": 2,
                "AccessRight": 0,
                "ManagementGroup": "GENERAL",
                "Units": "Billions",
                "DecimalPlaces": 2,
                "FrequencyConversion": 0,
                "DateAlignment": 2,
                "CarryIndicator": 0,
                "PrimeCurrencyCode": null,
                "DateInfo": {
                    "StartDate": "/Date(1451606400000)/",
                    "EndDate": "/Date(1648771200000)/",
                    "Frequency": 3,
                },
                "DateRange": {"Dates": null, "Values": null, "ValuesCount": count},
            },
            "ResponseStatus": 0,
            "ErrorMessage": null,
            "Properties": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.create_item(&item, false, false).await.unwrap();
    assert_eq!(resp.response_status, UserObjectStatus::Success);
    let created = resp.user_object.unwrap();
    assert_eq!(created.id, "TSZZZ001");
    assert_eq!(created.date_range.unwrap().values_count, count as i64);
}

#[tokio::test]
async fn create_with_bad_id_never_reaches_the_wire() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;
    let (mut item, _) = quarterly_item();
    item.id = "tszzz001".to_string();

    let resp = client.create_item(&item, false, false).await.unwrap();
    assert_eq!(resp.response_status, UserObjectStatus::FormatError);
    assert!(resp.error_message.unwrap().contains("uppercase"));
    // Only the logon request should have been sent.
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn mismatched_values_length_never_reaches_the_wire() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;
    let (mut item, count) = quarterly_item();
    item.values.truncate(count - 5);

    let resp = client.create_item(&item, false, false).await.unwrap();
    assert_eq!(resp.response_status, UserObjectStatus::FormatError);
    assert!(resp.error_message.unwrap().contains("one value per date"));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn overwrite_and_skip_flags_are_encoded_as_filters() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;
    let (item, _) = quarterly_item();

    Mock::given(method("POST"))
        .and(path(endpoint("CreateItem")))
        .and(body_partial_json(json!({
            "Filters": [
                {"Key": "ForceUpdate", "Value": true},
                {"Key": "SkipRetrieval", "Value": true},
            ],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "UserObjectId": "TSZZZ001",
            "UserObjectType": 3,
            "UserObject": null,
            "ResponseStatus": 0,
            "ErrorMessage": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.create_item(&item, true, true).await.unwrap();
    assert_eq!(resp.response_status, UserObjectStatus::Success);
    // Item body skipped on request; status still reports the outcome.
    assert!(resp.user_object.is_none());
}

#[tokio::test]
async fn update_sends_skip_retrieval_only_when_asked() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;
    let (item, _) = quarterly_item();

    Mock::given(method("POST"))
        .and(path(endpoint("UpdateItem")))
        .and(body_partial_json(json!({"Filters": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "UserObjectId": "TSZZZ001",
            "UserObjectType": 3,
            "UserObject": null,
            "ResponseStatus": 0,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.update_item(&item, false).await.unwrap();
    assert_eq!(resp.response_status, UserObjectStatus::Success);
}

#[tokio::test]
async fn get_all_items_empty_is_success() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("POST"))
        .and(path(endpoint("GetAllItems")))
        .and(body_partial_json(json!({"UserObjectType": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "UserObjectType": 3,
            "UserObjects": null,
            "UserObjectsCount": 0,
            "ResponseStatus": 0,
            "ErrorMessage": "",
        })))
        .mount(&server)
        .await;

    let resp = client.get_all_items().await.unwrap();
    assert_eq!(resp.response_status, UserObjectStatus::Success);
    assert_eq!(resp.user_objects_count, 0);
    assert!(resp.user_objects.is_none());
}

#[tokio::test]
async fn get_all_items_permissions_failure_is_data_not_error() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("POST"))
        .and(path(endpoint("GetAllItems")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "UserObjectType": 0,
            "UserObjects": null,
            "UserObjectsCount": 0,
            "ResponseStatus": 1,
            "ErrorMessage": "The account is not permissioned for user created items.",
        })))
        .mount(&server)
        .await;

    let resp = client.get_all_items().await.unwrap();
    assert_eq!(resp.response_status, UserObjectStatus::Permissions);
    assert!(resp.error_message.unwrap().contains("not permissioned"));
}

#[tokio::test]
async fn get_date_range_decodes_wire_dates() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("POST"))
        .and(path(endpoint("TimeSeriesGetDateRange")))
        .and(body_partial_json(json!({
            "DateInfo": {"Frequency": 3, "StartDate": "/Date(1451606400000)/"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Dates": ["/Date(1451606400000)/", "/Date(1459468800000)/"],
            "ResponseStatus": 0,
            "ErrorMessage": "",
            "Properties": null,
        })))
        .mount(&server)
        .await;

    let resp = client
        .get_date_range(date(2016, 1, 1), date(2016, 6, 30), Frequency::Quarterly)
        .await
        .unwrap();
    assert_eq!(resp.response_status, UserObjectStatus::Success);
    assert_eq!(
        resp.dates.unwrap(),
        vec![date(2016, 1, 1), date(2016, 4, 1)]
    );
}

#[tokio::test]
async fn delete_item_returns_status_only() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("POST"))
        .and(path(endpoint("DeleteItem")))
        .and(body_partial_json(json!({"UserObjectId": "TSZZZ001"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "UserObjectId": "TSZZZ001",
            "UserObjectType": 3,
            "UserObject": null,
            "ResponseStatus": 0,
        })))
        .mount(&server)
        .await;

    let resp = client.delete_item("TSZZZ001").await.unwrap();
    assert_eq!(resp.response_status, UserObjectStatus::Success);
    assert_eq!(resp.user_object_id.as_deref(), Some("TSZZZ001"));
    assert!(resp.user_object.is_none());
}

#[tokio::test]
async fn delete_with_bad_id_never_reaches_the_wire() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    let resp = client.delete_item("NOTATSID").await.unwrap();
    assert_eq!(resp.response_status, UserObjectStatus::FormatError);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
