//! Dashboard pass tests.
//!
//! This module drives `DashboardProcessor` against a mocked tenant:
//! - Dashboard resolution by id, by name search, or not at all
//! - Change detection against a stored snapshot
//! - Indicator, query and objective generation per tile
//! - Replaying the generated per-row queries through `SliResolver`
//!
//! # Invariants
//! - Resolution and fetch failures abort the pass
//! - A failing tile yields a failed indicator and the pass continues
//! - Results and objectives follow tile order

mod common;

use common::*;
use dynatrace_client::models::SloCriteria;
use dynatrace_client::{
    ClientError, DashboardOutcome, DashboardProcessor, ProcessedDashboard, SliResolver,
};
use dynatrace_config::DashboardReference;
use wiremock::matchers::{method, path, query_param};

const SLO_ID: &str = "7d07efde-b714-3e6e-ad95-08490e2540c4";

async fn mount_dashboard(server: &MockServer, body: &serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/config/v1/dashboards/{}", KQG_DASHBOARD_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_tile_backends(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2/metrics/builtin:service.response.time"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(load_fixture("metrics/service_response_time.json")),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/metrics/query"))
        .and(query_param(
            "metricSelector",
            "builtin:service.response.time:merge(0):avg:names",
        ))
        .and(query_param("entitySelector", "mzId(-4711)"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("metrics/query_single.json")),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v2/slo/{}", SLO_ID)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("slo/slo_result.json")),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/problems"))
        .and(query_param(
            "problemSelector",
            "status(open),managementZoneIds(-4711)",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("problems/problems.json")),
        )
        .mount(server)
        .await;
}

fn processed(outcome: DashboardOutcome) -> ProcessedDashboard {
    match outcome {
        DashboardOutcome::Processed(processed) => *processed,
        other => panic!("Expected a processed dashboard, got {:?}", other),
    }
}

#[tokio::test]
async fn test_full_dashboard_pass() {
    let mock_server = MockServer::start().await;
    let fixture = load_fixture("dashboards/kqg_dashboard.json");
    mount_dashboard(&mock_server, &fixture).await;
    mount_tile_backends(&mock_server).await;

    let client = test_client(&mock_server);
    let placeholders = sockshop_placeholders();
    let processor = DashboardProcessor::new(&client, &placeholders);
    let reference = DashboardReference::Id(KQG_DASHBOARD_ID.to_string());

    let result = processed(
        processor
            .process(&reference, None, &fixed_window())
            .await
            .unwrap(),
    );

    assert_eq!(result.dashboard_id, KQG_DASHBOARD_ID);
    assert_eq!(
        result.link,
        format!(
            "{}#dashboard;id={};gtf=c_1577836800000_1577837100000;gf=-4711",
            mock_server.uri(),
            KQG_DASHBOARD_ID
        )
    );
    assert_eq!(result.raw_dashboard, fixture);

    let names: Vec<&str> = result.sli.results.iter().map(|r| r.metric.as_str()).collect();
    assert_eq!(names, vec!["svc_rt", "Rate_Availability_of_carts", "problems"]);
    assert!(result.sli.results.iter().all(|r| r.success));
    assert_eq!(result.sli.results[0].value, 250.0);
    assert_eq!(result.sli.results[1].value, 95.23);
    assert_eq!(result.sli.results[2].value, 2.0);

    let indicators = &result.sli.indicators.indicators;
    assert_eq!(
        indicators["svc_rt"],
        "MV2;MicroSecond;metricSelector=builtin:service.response.time:merge(0):avg:names&entitySelector=mzId(-4711)"
    );
    assert_eq!(
        indicators["Rate_Availability_of_carts"],
        format!("SLO;{}", SLO_ID)
    );
    assert_eq!(
        indicators["problems"],
        "PV2;problemSelector=status(open),managementZoneIds(-4711)"
    );

    let slo = &result.sli.objectives;
    assert_eq!(slo.total_score.pass, "90%");
    assert_eq!(slo.total_score.warning, "70%");
    assert_eq!(slo.objectives.len(), 3);

    let rt = &slo.objectives[0];
    assert_eq!(rt.sli, "svc_rt");
    assert_eq!(
        rt.pass,
        Some(vec![SloCriteria {
            criteria: vec!["<=500".to_string()]
        }])
    );
    assert_eq!(
        rt.warning,
        Some(vec![SloCriteria {
            criteria: vec!["<=800".to_string()]
        }])
    );
    assert_eq!(rt.weight, 2);
    assert!(rt.key_sli);

    let availability = &slo.objectives[1];
    assert_eq!(
        availability.pass,
        Some(vec![SloCriteria {
            criteria: vec![">=95".to_string()]
        }])
    );
    assert_eq!(
        availability.warning,
        Some(vec![SloCriteria {
            criteria: vec![">=97.5".to_string()]
        }])
    );
    assert!(!availability.key_sli);

    let problems = &slo.objectives[2];
    assert_eq!(
        problems.pass,
        Some(vec![SloCriteria {
            criteria: vec!["<=0".to_string()]
        }])
    );
    assert_eq!(problems.warning, None);
    assert!(problems.key_sli);
}

#[tokio::test]
async fn test_no_dashboard_configured_is_skipped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/config/v1/dashboards"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let placeholders = sockshop_placeholders();
    let processor = DashboardProcessor::new(&client, &placeholders);

    let outcome = processor
        .process(&DashboardReference::NotSet, None, &fixed_window())
        .await
        .unwrap();
    assert_eq!(outcome, DashboardOutcome::Skipped);
}

#[tokio::test]
async fn test_query_finds_dashboard_by_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/config/v1/dashboards"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("dashboards/list.json")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_dashboard(&mock_server, &load_fixture("dashboards/kqg_dashboard.json")).await;
    mount_tile_backends(&mock_server).await;

    let client = test_client(&mock_server);
    let placeholders = sockshop_placeholders();
    let processor = DashboardProcessor::new(&client, &placeholders);

    let result = processed(
        processor
            .process(&DashboardReference::Query, None, &fixed_window())
            .await
            .unwrap(),
    );
    assert_eq!(result.dashboard_id, KQG_DASHBOARD_ID);
}

#[tokio::test]
async fn test_query_without_matching_dashboard_is_skipped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/config/v1/dashboards"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("dashboards/list.json")),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let placeholders =
        PlaceholderResolver::new(DeliveryContext::new("sockshop", "dev", "carts"), vec![]);
    let processor = DashboardProcessor::new(&client, &placeholders);

    let outcome = processor
        .process(&DashboardReference::Query, None, &fixed_window())
        .await
        .unwrap();
    assert_eq!(outcome, DashboardOutcome::Skipped);
}

#[tokio::test]
async fn test_stored_snapshot_without_setting_searches_by_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/config/v1/dashboards"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("dashboards/list.json")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_dashboard(&mock_server, &load_fixture("dashboards/kqg_dashboard.json")).await;
    mount_tile_backends(&mock_server).await;

    let client = test_client(&mock_server);
    let placeholders = sockshop_placeholders();
    let processor = DashboardProcessor::new(&client, &placeholders);

    let outcome = processor
        .process(&DashboardReference::NotSet, Some("{\"id\":\"old\"}"), &fixed_window())
        .await
        .unwrap();
    assert!(matches!(outcome, DashboardOutcome::Processed(_)));
}

#[tokio::test]
async fn test_unchanged_dashboard_is_not_parsed() {
    let mock_server = MockServer::start().await;
    let mut fixture = load_fixture("dashboards/kqg_dashboard.json");
    fixture["tiles"][0]["markdown"] =
        serde_json::json!("KQG.Total.Pass=90%;KQG.QueryBehavior=ParseOnChange");
    mount_dashboard(&mock_server, &fixture).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/metrics/query"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let placeholders = sockshop_placeholders();
    let processor = DashboardProcessor::new(&client, &placeholders);
    let reference = DashboardReference::Id(KQG_DASHBOARD_ID.to_string());
    let stored = serde_json::to_string_pretty(&fixture).unwrap();

    let outcome = processor
        .process(&reference, Some(&stored), &fixed_window())
        .await
        .unwrap();

    match outcome {
        DashboardOutcome::Unchanged { link } => {
            assert!(link.contains(&format!("#dashboard;id={}", KQG_DASHBOARD_ID)))
        }
        other => panic!("Expected Unchanged, got {:?}", other),
    }
}

#[tokio::test]
async fn test_changed_dashboard_with_marker_is_parsed() {
    let mock_server = MockServer::start().await;
    let mut fixture = load_fixture("dashboards/kqg_dashboard.json");
    fixture["tiles"][0]["markdown"] = serde_json::json!("KQG.QueryBehavior=ParseOnChange");
    mount_dashboard(&mock_server, &fixture).await;
    mount_tile_backends(&mock_server).await;

    let client = test_client(&mock_server);
    let placeholders = sockshop_placeholders();
    let processor = DashboardProcessor::new(&client, &placeholders);
    let reference = DashboardReference::Id(KQG_DASHBOARD_ID.to_string());

    let mut previous = fixture.clone();
    previous["tiles"][2]["name"] = serde_json::json!("sli=svc_rt;pass=<=400");
    let stored = previous.to_string();

    let outcome = processor
        .process(&reference, Some(&stored), &fixed_window())
        .await
        .unwrap();
    assert!(matches!(outcome, DashboardOutcome::Processed(_)));
}

#[tokio::test]
async fn test_invalid_dashboard_id_aborts_without_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let placeholders = sockshop_placeholders();
    let processor = DashboardProcessor::new(&client, &placeholders);

    let err = processor
        .process(
            &DashboardReference::Id("not-a-dashboard".to_string()),
            None,
            &fixed_window(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidDashboardId(ref id) if id == "not-a-dashboard"));
    assert_eq!(
        err.to_string(),
        "Dashboard ID not-a-dashboard not a valid UUID"
    );
}

#[tokio::test]
async fn test_listing_failure_aborts_pass() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/config/v1/dashboards"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let placeholders = sockshop_placeholders();
    let processor = DashboardProcessor::new(&client, &placeholders);

    let err = processor
        .process(&DashboardReference::Query, None, &fixed_window())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 500, .. }));
}

#[tokio::test]
async fn test_failing_tile_does_not_abort_pass() {
    let mock_server = MockServer::start().await;
    mount_dashboard(&mock_server, &load_fixture("dashboards/kqg_dashboard.json")).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/metrics/builtin:service.response.time"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"error": {"code": 404, "message": "Metric not found"}})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/slo/{}", SLO_ID)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("slo/slo_error.json")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/problems"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("problems/problems.json")),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let placeholders = sockshop_placeholders();
    let processor = DashboardProcessor::new(&client, &placeholders);
    let reference = DashboardReference::Id(KQG_DASHBOARD_ID.to_string());

    let result = processed(
        processor
            .process(&reference, None, &fixed_window())
            .await
            .unwrap(),
    );

    let rt = &result.sli.results[0];
    assert_eq!(rt.metric, "svc_rt");
    assert!(!rt.success);
    assert_eq!(rt.value, 0.0);
    assert!(rt.message.as_deref().unwrap().contains("builtin:service.response.time"));
    assert_eq!(
        result.sli.indicators.indicators["svc_rt"],
        "metricSelector=builtin:service.response.time"
    );

    let slo = &result.sli.results[1];
    assert_eq!(slo.metric, SLO_ID);
    assert!(!slo.success);
    assert_eq!(
        result.sli.indicators.indicators[SLO_ID],
        format!("SLO;{}", SLO_ID)
    );

    assert!(result.sli.results[2].success);
    // only the problems tile contributes an objective
    assert_eq!(result.sli.objectives.objectives.len(), 1);
    assert_eq!(result.sli.objectives.objectives[0].sli, "problems");
}

#[tokio::test]
async fn test_usql_tile_expands_rows() {
    let mock_server = MockServer::start().await;
    let dashboard = serde_json::json!({
        "id": KQG_DASHBOARD_ID,
        "dashboardMetadata": {"name": "KQG;project=sockshop;service=carts;stage=staging"},
        "tiles": [
            {
                "name": "User sessions query",
                "tileType": "DTAQL",
                "customName": "sli=usql duration;pass=<=3000",
                "query": "SELECT country, AVG(duration) FROM usersession GROUP BY country",
                "type": "COLUMN_CHART"
            },
            {
                "name": "Ignored query",
                "tileType": "DTAQL",
                "customName": "no directives here",
                "query": "SELECT COUNT(*) FROM usersession",
                "type": "SINGLE_VALUE"
            }
        ]
    });
    mount_dashboard(&mock_server, &dashboard).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/userSessionQueryLanguage/table"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("usql/column_chart.json")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let placeholders = sockshop_placeholders();
    let processor = DashboardProcessor::new(&client, &placeholders);
    let reference = DashboardReference::Id(KQG_DASHBOARD_ID.to_string());

    let result = processed(
        processor
            .process(&reference, None, &fixed_window())
            .await
            .unwrap(),
    );

    let names: Vec<&str> = result.sli.results.iter().map(|r| r.metric.as_str()).collect();
    assert_eq!(
        names,
        vec!["usql_duration_Austria", "usql_duration_United_States"]
    );
    assert_eq!(result.sli.results[1].value, 3120.5);
    assert_eq!(
        result.sli.indicators.indicators["usql_duration_Austria"],
        "USQL;COLUMN_CHART;Austria;SELECT country, AVG(duration) FROM usersession GROUP BY country"
    );
    assert_eq!(result.sli.objectives.objectives.len(), 2);
    assert_eq!(result.sli.objectives.objectives[0].sli, "usql_duration_Austria");
}

fn test_step_series(step: &str, values: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "dimensions": [step],
        "dimensionMap": {"Test Step": step},
        "timestamps": [1577837040000u64, 1577837100000u64],
        "values": values
    })
}

async fn mount_test_step_row(server: &MockServer, step: &str, values: serde_json::Value) {
    let metric_id = format!(
        "calc:service.teststep_rt:avg:names:filter(eq(Test Step,{}))",
        step
    );
    Mock::given(method("GET"))
        .and(path("/api/v2/metrics/query"))
        .and(query_param("metricSelector", metric_id.as_str()))
        .and(query_param("entitySelector", "mzId(-4711)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "totalCount": 1,
            "nextPageKey": null,
            "result": [{"metricId": metric_id, "data": [test_step_series(step, values)]}]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_split_rows_replay_through_resolver() {
    let mock_server = MockServer::start().await;
    let mut fixture = load_fixture("dashboards/kqg_dashboard.json");
    let markdown = fixture["tiles"][0].clone();
    fixture["tiles"] = serde_json::json!([
        markdown,
        {
            "name": "sli=teststep_rt;pass=<=500",
            "tileType": "DATA_EXPLORER",
            "configured": true,
            "tileFilter": {},
            "queries": [{
                "id": "A",
                "metric": "calc:service.teststep_rt",
                "spaceAggregation": "AVG",
                "splitBy": ["Test Step"],
                "filterBy": {"filterOperator": "AND", "nestedFilters": [], "criteria": []},
                "enabled": true
            }]
        }
    ]);
    mount_dashboard(&mock_server, &fixture).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/metrics/calc:service.teststep_rt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "metricId": "calc:service.teststep_rt",
            "unit": "MicroSecond",
            "defaultAggregation": {"type": "avg"},
            "dimensionDefinitions": [
                {"key": "Test Step", "name": "Test Step", "index": 0, "type": "STRING"}
            ],
            "entityType": []
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/metrics/query"))
        .and(query_param(
            "metricSelector",
            "calc:service.teststep_rt:avg:names",
        ))
        .and(query_param("entitySelector", "mzId(-4711)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "totalCount": 3,
            "nextPageKey": null,
            "result": [{
                "metricId": "calc:service.teststep_rt:avg:names",
                "data": [
                    test_step_series("Add & Remove", serde_json::json!([1000.0, null])),
                    test_step_series("C++ build", serde_json::json!([3000.0, 1000.0])),
                    test_step_series("50% load", serde_json::json!([null, null]))
                ]
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let placeholders = sockshop_placeholders();
    let processor = DashboardProcessor::new(&client, &placeholders);
    let reference = DashboardReference::Id(KQG_DASHBOARD_ID.to_string());

    let result = processed(
        processor
            .process(&reference, None, &fixed_window())
            .await
            .unwrap(),
    );

    let names: Vec<&str> = result.sli.results.iter().map(|r| r.metric.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "teststep_rt_Add_&_Remove",
            "teststep_rt_C++_build",
            "teststep_rt_50__load"
        ]
    );
    assert_eq!(result.sli.results[0].value, 1.0);
    assert_eq!(result.sli.results[1].value, 2.0);
    assert!(!result.sli.results[2].success);
    assert_eq!(result.sli.objectives.objectives.len(), 2);

    // Every stored row query, the failed one included, replays against its own row.
    mount_test_step_row(&mock_server, "Add & Remove", serde_json::json!([null, 1000.0])).await;
    mount_test_step_row(&mock_server, "C++ build", serde_json::json!([2000.0])).await;
    mount_test_step_row(&mock_server, "50% load", serde_json::json!([null])).await;

    let queries = result.sli.indicators.indicators.clone();
    assert_eq!(queries.len(), 3);
    let resolver = SliResolver::new(&client, &placeholders, &queries);

    let value = resolver
        .get_sli_value("teststep_rt_Add_&_Remove", &fixed_window())
        .await
        .unwrap();
    assert_eq!(value, 1.0);

    let value = resolver
        .get_sli_value("teststep_rt_C++_build", &fixed_window())
        .await
        .unwrap();
    assert_eq!(value, 2.0);

    let err = resolver
        .get_sli_value("teststep_rt_50__load", &fixed_window())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NoData(_)));
}

