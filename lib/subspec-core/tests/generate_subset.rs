#![allow(missing_docs)]

use std::sync::{Arc, Mutex};

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use subspec_core::{
    ConvertError, Converter, DEPLOYMENT_PATH, DEPLOYMENTS_PATH, Document, GeneratorError, Node,
    OutputFormat, SpecGenerator, SubsetBuilder, SwaggerConverter, emit, walker,
};

mod common;
use self::common::*;

fn table_keys(document: &Document, table: &str) -> Vec<String> {
    document
        .mapping(table)
        .map(|entries| entries.keys().cloned().collect())
        .unwrap_or_default()
}

/// Stands in for converter.swagger.io: moves `definitions` under `components.schemas`.
async fn convert_stub(
    State(received): State<Arc<Mutex<Option<Value>>>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let definitions = body.get("definitions").cloned().unwrap_or_default();
    let converted = json!({
        "openapi": "3.0.1",
        "info": body.get("info").cloned().unwrap_or_default(),
        "paths": body.get("paths").cloned().unwrap_or_default(),
        "components": {"schemas": definitions}
    });
    if let Ok(mut slot) = received.lock() {
        *slot = Some(body);
    }
    Json(converted)
}

#[test]
fn should_extract_deployments_subset() -> anyhow::Result<()> {
    init_tracing();
    let source = deployments_source();

    let subset = SubsetBuilder::default()
        .build(&source)
        .context("should build the deployments subset")?;
    let document = &subset.document;

    assert_eq!(
        document.keys().map(String::as_str).collect::<Vec<_>>(),
        [
            "swagger",
            "info",
            "security",
            "securityDefinitions",
            "paths",
            "definitions",
            "parameters"
        ]
    );
    assert_eq!(
        table_keys(document, "definitions"),
        [
            "io.k8s.api.apps.v1.DeploymentList",
            "io.k8s.api.apps.v1.Deployment",
            "io.k8s.apimachinery.pkg.apis.meta.v1.ObjectMeta",
            "io.k8s.apimachinery.pkg.apis.meta.v1.OwnerReference",
            "io.k8s.api.apps.v1.DeploymentSpec",
            "io.k8s.apimachinery.pkg.apis.meta.v1.LabelSelector",
            "io.k8s.apimachinery.pkg.apis.meta.v1.ListMeta",
            "io.k8s.apimachinery.pkg.apis.meta.v1.Patch",
        ]
    );
    assert_eq!(
        table_keys(document, "parameters"),
        [
            "namespace-vgWSWtn3",
            "pretty-nN7o5FEq",
            "limit-1NfNmdNH",
            "watch-XNNPZGbK",
            "body-78PwaGsr",
        ]
    );
    assert_eq!(subset.stats.operations, 2);
    Ok(())
}

#[test]
fn should_keep_root_operations_unchanged() -> anyhow::Result<()> {
    let source = deployments_source();

    let subset = SubsetBuilder::default().build(&source)?;

    let source_paths = source.mapping("paths").context("source paths")?;
    let paths = subset.document.mapping("paths").context("subset paths")?;
    assert_eq!(
        paths.keys().map(String::as_str).collect::<Vec<_>>(),
        [DEPLOYMENTS_PATH, DEPLOYMENT_PATH]
    );
    for (path, method) in [(DEPLOYMENTS_PATH, "get"), (DEPLOYMENT_PATH, "patch")] {
        let original = source_paths.get(path).context("source path item")?;
        let kept = paths.get(path).context("subset path item")?;
        let kept_keys = kept
            .as_mapping()
            .map(|item| item.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();

        assert_eq!(kept_keys, ["parameters", method]);
        assert_eq!(kept.get("parameters"), original.get("parameters"));
        assert_eq!(kept.get(method), original.get(method));
    }
    Ok(())
}

#[test]
fn should_be_closed_under_references() -> anyhow::Result<()> {
    let source = deployments_source();

    let subset = SubsetBuilder::default().build(&source)?;
    let references = walker::collect_references(&Node::from(subset.document.clone()))?;

    for reference in references {
        let resolved = subset
            .document
            .mapping(reference.category().table_key())
            .is_some_and(|table| table.contains_key(reference.name()));
        assert!(resolved, "{reference} should resolve inside the subset");
    }
    Ok(())
}

#[tokio::test]
async fn should_generate_openapi_through_converter() -> anyhow::Result<()> {
    init_tracing();
    let received: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let router = Router::new()
        .route("/api/convert", post(convert_stub))
        .with_state(Arc::clone(&received));
    let url = start_converter(router).await?;
    let generator = SpecGenerator::new(SwaggerConverter::new(url));

    let document = generator.generate(&deployments_source()).await?;

    assert_eq!(
        document.get("openapi").and_then(Node::as_str),
        Some("3.1.0")
    );
    assert_eq!(
        document.keys().map(String::as_str).collect::<Vec<_>>(),
        ["openapi", "info", "paths", "components"]
    );
    let sent = received
        .lock()
        .ok()
        .and_then(|mut slot| slot.take())
        .context("converter should have received the subset")?;
    assert_eq!(sent["swagger"], "2.0");
    assert!(sent["definitions"]["io.k8s.api.core.v1.NamespaceList"].is_null());
    assert!(sent["parameters"]["body-78PwaGsr"].is_object());

    let mut output = Vec::new();
    emit(&document, OutputFormat::Json, &mut output)?;
    let text = String::from_utf8(output)?;
    assert!(text.starts_with("{\n  \"openapi\": \"3.1.0\",\n"));
    Ok(())
}

#[tokio::test]
async fn should_fail_on_non_json_response() -> anyhow::Result<()> {
    init_tracing();
    let router = Router::new().route("/api/convert", post(|| async { "<html>oops</html>" }));
    let url = start_converter(router).await?;
    let converter = SwaggerConverter::new(url);

    let error = converter
        .convert(&deployments_source())
        .await
        .expect_err("HTML is not a document");

    match error {
        ConvertError::InvalidResponse { body, .. } => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected an invalid response, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn should_fail_on_error_status() -> anyhow::Result<()> {
    init_tracing();
    let router = Router::new().route(
        "/api/convert",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let url = start_converter(router).await?;
    let generator = SpecGenerator::new(SwaggerConverter::new(url));

    let error = generator
        .generate(&deployments_source())
        .await
        .expect_err("the converter failed");

    assert!(matches!(
        error,
        GeneratorError::Convert(ConvertError::UnexpectedStatus { .. })
    ));
    assert_eq!(
        error.to_string(),
        "Converter answered 500 Internal Server Error: boom"
    );
    Ok(())
}

#[tokio::test]
async fn should_fail_when_converter_is_unreachable() -> anyhow::Result<()> {
    let url = "http://127.0.0.1:9/api/convert".parse()?;
    let converter = SwaggerConverter::new(url);

    let error = converter
        .convert(&Document::new())
        .await
        .expect_err("nothing listens on the discard port");

    assert!(matches!(error, ConvertError::Request(_)));
    Ok(())
}
