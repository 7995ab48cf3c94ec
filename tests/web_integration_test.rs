use anyhow::Result;
use cost_estimator::domain::model::FEATURE_COUNT;
use cost_estimator::domain::ports::Regressor;
use cost_estimator::web::render::NO_DETAILS;
use cost_estimator::web::{run_server, AppState};
use cost_estimator::{EstimatorService, FeatureCatalog};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Deterministic stand-in for the trained forest.
struct StubModel {
    prediction: f64,
    importances: Vec<f64>,
    calls: Arc<AtomicUsize>,
}

impl Regressor for StubModel {
    fn predict(&self, _row: &[f64]) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prediction
    }

    fn feature_importances(&self) -> &[f64] {
        &self.importances
    }
}

struct TestServer {
    base_url: String,
    calls: Arc<AtomicUsize>,
    client: reqwest::Client,
}

async fn start_server(prediction: f64) -> Result<TestServer> {
    let calls = Arc::new(AtomicUsize::new(0));
    let model = StubModel {
        prediction,
        importances: vec![8.0, 2.0, 2.0, 1.0, 1.0, 1.0, 0.5, 0.25, 0.25],
        calls: calls.clone(),
    };
    let catalog = FeatureCatalog::from_json_str(
        r#"{"Team_Size": "Number of people on the <em>core</em> team.", "COCOMO II": "Constructive Cost Model."}"#,
    )?;
    let state = Arc::new(AppState::new(EstimatorService::new(model), catalog));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    tokio::spawn(run_server(listener, state));

    Ok(TestServer {
        base_url: format!("http://{}", address),
        calls,
        client: reqwest::Client::new(),
    })
}

fn example_form() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("Project_Size", "2000"),
        ("Project_Duration", "12"),
        ("Team_Size", "8"),
        ("Complexity", "5"),
        ("Reliability", "3"),
        ("Database_Size", "500"),
        ("Team_Cohesion", "3"),
        ("Developer_Experience", "3"),
        ("Software_Tools", "3"),
    ])
}

#[tokio::test]
async fn test_form_page() -> Result<()> {
    let server = start_server(1000.0).await?;

    let response = server.client.get(&server.base_url).send().await?;
    assert_eq!(response.status(), 200);

    let body = response.text().await?;
    assert!(body.contains("<title>Project Cost Estimation Tool</title>"));
    assert!(body.contains("AI Project Cost Estimation Tool Using COCOMO-II"));
    assert!(body.contains("name=\"Developer_Experience\""));
    assert!(body.contains("Enter a value between 100 and 1000 GB."));
    assert!(body.contains("value=\"Predict Cost\""));
    Ok(())
}

#[tokio::test]
async fn test_predict_renders_breakdown() -> Result<()> {
    let server = start_server(123_456.78).await?;

    let response = server
        .client
        .post(format!("{}/predict", server.base_url))
        .form(&example_form())
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let body = response.text().await?;
    assert!(body.contains("<h1>Estimated Project Cost: $123,456.78</h1>"));
    assert!(body.contains("<h2>Cost Breakdown</h2>"));
    assert_eq!(body.matches("<tr><td>").count(), FEATURE_COUNT + 1);
    assert!(body.contains("<tr><td>Project Size</td><td>2000.0</td><td>$61,728.39</td></tr>"));
    assert!(body.contains("<tr><td>Total</td><td></td><td>$123,456.78</td></tr>"));
    assert_eq!(server.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_negative_prediction_is_shown_as_zero() -> Result<()> {
    let server = start_server(-5000.0).await?;

    let body = server
        .client
        .post(format!("{}/predict", server.base_url))
        .form(&example_form())
        .send()
        .await?
        .text()
        .await?;

    assert!(body.contains("Estimated Project Cost: $0.00"));
    assert!(!body.contains("-$"));
    Ok(())
}

#[tokio::test]
async fn test_out_of_range_field_is_rejected_without_prediction() -> Result<()> {
    let server = start_server(1000.0).await?;

    let mut form = example_form();
    form.insert("Team_Size", "21");

    let response = server
        .client
        .post(format!("{}/predict", server.base_url))
        .form(&form)
        .send()
        .await?;
    assert_eq!(response.status(), 400);

    let body = response.text().await?;
    assert!(body.contains("Error: Team Size must be between 3 and 20."));
    assert!(body.contains("<a href='/'>Back</a>"));
    assert_eq!(server.calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_non_numeric_and_missing_fields_are_parse_errors() -> Result<()> {
    let server = start_server(1000.0).await?;

    let mut form = example_form();
    form.insert("Complexity", "very");
    let response = server
        .client
        .post(format!("{}/predict", server.base_url))
        .form(&form)
        .send()
        .await?;
    assert_eq!(response.status(), 400);
    assert!(response.text().await?.contains("could not read Complexity"));

    let mut form = example_form();
    form.remove("Software_Tools");
    let response = server
        .client
        .post(format!("{}/predict", server.base_url))
        .form(&form)
        .send()
        .await?;
    assert_eq!(response.status(), 400);
    assert!(response.text().await?.contains("could not read Software Tools"));

    assert_eq!(server.calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_non_form_body_renders_error_page() -> Result<()> {
    let server = start_server(1000.0).await?;

    let response = server
        .client
        .post(format!("{}/predict", server.base_url))
        .header("content-type", "application/json")
        .body("{}")
        .send()
        .await?;

    assert_eq!(response.status(), 400);
    assert!(response.text().await?.contains("<h1>Error:"));
    Ok(())
}

#[tokio::test]
async fn test_internal_error_is_generic() -> Result<()> {
    let server = start_server(f64::NAN).await?;

    let response = server
        .client
        .post(format!("{}/predict", server.base_url))
        .form(&example_form())
        .send()
        .await?;
    assert_eq!(response.status(), 500);

    let body = response.text().await?;
    assert!(body.contains("the estimate could not be computed"));
    assert!(!body.contains("NaN"));
    Ok(())
}

#[tokio::test]
async fn test_details_pages() -> Result<()> {
    let server = start_server(1000.0).await?;

    let response = server
        .client
        .get(format!("{}/details/Team_Size", server.base_url))
        .send()
        .await?;
    assert_eq!(response.status(), 200);
    let body = response.text().await?;
    assert!(body.contains("<h2>Team Size</h2>"));
    assert!(body.contains("Number of people on the <em>core</em> team."));

    let body = server
        .client
        .get(format!("{}/details/COCOMO%20II", server.base_url))
        .send()
        .await?
        .text()
        .await?;
    assert!(body.contains("Constructive Cost Model."));

    let response = server
        .client
        .get(format!("{}/details/Budget", server.base_url))
        .send()
        .await?;
    assert_eq!(response.status(), 200);
    assert!(response.text().await?.contains(NO_DETAILS));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_requests_share_one_model() -> Result<()> {
    let server = Arc::new(start_server(2500.0).await?);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let server = server.clone();
        handles.push(tokio::spawn(async move {
            server
                .client
                .post(format!("{}/predict", server.base_url))
                .form(&example_form())
                .send()
                .await?
                .text()
                .await
        }));
    }

    for handle in handles {
        let body = handle.await??;
        assert!(body.contains("Estimated Project Cost: $2,500.00"));
    }
    assert_eq!(server.calls.load(Ordering::SeqCst), 8);
    Ok(())
}
