//! Integration tests for RcsbClient against a mock RCSB server
//!
//! These tests cover:
//! - Search payload, headers and response splitting
//! - Custom report requests and CSV typing
//! - Molecule descriptions and the chain/sequence join
//! - Transport and empty-body failures

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pdbq_cli::{CliError, RcsbClient, RcsbConfig};
use pdbq_common::types::{ColumnType, FieldValue, SearchQuery, StructureId};
use wiremock::{
    matchers::{body_string_contains, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const DESCRIBE_5JUP: &str = r#"<?xml version='1.0' standalone='no' ?>
<molDescription>
<structureId id="5JUP">
  <polymer entityNr="1" length="3" type="protein">
    <chain id="A" />
    <Taxonomy name="Saccharomyces cerevisiae" id="4932" />
    <macroMolecule name="60S ribosomal protein L2-A" />
    <polymerDescription description="uL2" />
  </polymer>
  <polymer entityNr="2" length="4" type="protein">
    <chain id="B" />
    <macroMolecule name="60S ribosomal protein L3" />
    <polymerDescription description="uL3" />
  </polymer>
</structureId>
</molDescription>
"#;

const FASTA_5JUP: &str = ">5JUP:A|PDBID|CHAIN|SEQUENCE\nMKT\nAYI\n>broken header\nXXXX\n";

fn id(raw: &str) -> StructureId {
    raw.parse().unwrap()
}

async fn client_for(server: &MockServer) -> RcsbClient {
    let config = RcsbConfig::default().with_base_url(&server.uri()).unwrap();
    RcsbClient::new(config).unwrap()
}

#[tokio::test]
async fn test_submit_query_splits_identifiers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pdb/rest/search"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains(
            "<queryType>org.pdb.query.simple.StructTitleQuery</queryType>",
        ))
        .and(body_string_contains("<struct.title.value>ribosome</struct.title.value>"))
        .respond_with(ResponseTemplate::new(200).set_body_string("5JUP\n5JUU\n"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let hits = client
        .submit_query(&SearchQuery::title_contains("ribosome"))
        .await
        .unwrap();

    assert_eq!(hits.tokens, vec!["5JUP", "5JUU"]);
    assert!(!hits.suspect);
    assert_eq!(hits.identifiers(), vec![id("5JUP"), id("5JUU")]);
}

#[tokio::test]
async fn test_submit_query_flags_unexpected_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pdb/rest/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Problem creating Query from XML\n"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let hits = client
        .submit_query(&SearchQuery::title_contains("ribosome"))
        .await
        .unwrap();

    assert!(hits.suspect);
    assert!(hits.identifiers().is_empty());
}

#[tokio::test]
async fn test_submit_query_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pdb/rest/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\n  \n"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.submit_query(&SearchQuery::title_contains("nothing")).await;

    assert!(matches!(result, Err(CliError::EmptyResponse(_))));
}

#[tokio::test]
async fn test_submit_query_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pdb/rest/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .submit_query(&SearchQuery::title_contains("ribosome"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(matches!(err, CliError::Transport { .. }));
}

#[tokio::test]
async fn test_fetch_fields_types_columns() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pdb/rest/customReport.xml"))
        .and(query_param("pdbids", "5JUP,5JUU"))
        .and(query_param("customReportColumns", "structureId,resolution,chainLength"))
        .and(query_param("format", "csv"))
        .and(query_param("service", "wsfile"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "structureId,resolution,chainLength\n5JUP,3.5,120\n5JUU,,98\n",
        ))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let report = client
        .fetch_fields(&[id("5JUP"), id("5JUU")], &["structureId", "resolution", "chainLength"])
        .await
        .unwrap();

    assert_eq!(report.len(), 2);
    assert_eq!(
        report.column_types,
        vec![ColumnType::Text, ColumnType::Float, ColumnType::Integer]
    );

    let second = report.row(1).unwrap();
    assert_eq!(second.get("structureId"), Some(&FieldValue::Text("5JUU".into())));
    assert_eq!(second.get("resolution"), Some(&FieldValue::Empty));
    assert_eq!(second.get("chainLength"), Some(&FieldValue::Integer(98)));
}

#[tokio::test]
async fn test_fetch_fields_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pdb/rest/customReport.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.fetch_fields(&[id("5JUP")], &["structureId"]).await;

    assert!(matches!(result, Err(CliError::Transport { status: 404, .. })));
}

#[tokio::test]
async fn test_describe_chains() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pdb/rest/describeMol"))
        .and(query_param("structureId", "5JUP"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DESCRIBE_5JUP))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let chains = client.describe_chains(&id("5JUP")).await.unwrap();

    assert_eq!(chains.len(), 2);
    assert_eq!(chains[0].chain_id, "A");
    assert_eq!(chains[0].taxonomy, "Saccharomyces cerevisiae");
    assert_eq!(chains[1].chain_id, "B");
    assert_eq!(chains[1].taxonomy, "");
    assert_eq!(chains[1].macromolecule, "60S ribosomal protein L3");
}

#[tokio::test]
async fn test_describe_chains_for_unknown_structure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pdb/rest/describeMol"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<molDescription/>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let chains = client.describe_chains(&id("9ZZZ")).await.unwrap();

    assert!(chains.is_empty());
}

#[tokio::test]
async fn test_describe_malformed_xml() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pdb/rest/describeMol"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<molDescription><structureId"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.describe_structures(&[id("5JUP")]).await;

    assert!(matches!(result, Err(CliError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_describe_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pdb/rest/describeMol"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.describe_structures(&[id("5JUP")]).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(matches!(err, CliError::Transport { status: 500, .. }));
}

#[tokio::test]
async fn test_chains_with_sequences() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pdb/rest/describeMol"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DESCRIBE_5JUP))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pdb/download/downloadFastaFiles.do"))
        .and(query_param("structureIdList", "5JUP"))
        .and(query_param("compressionType", "uncompressed"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FASTA_5JUP))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let joined = client.chains_with_sequences(&id("5JUP")).await.unwrap();

    assert_eq!(joined.chains.len(), 2);
    assert_eq!(joined.chains[0].sequence.as_deref(), Some("MKTAYI"));
    assert_eq!(joined.chains[1].sequence, None);

    assert_eq!(joined.malformed.len(), 1);
    assert_eq!(joined.malformed[0].index, 1);
}

#[tokio::test]
async fn test_fetch_sequences_failures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pdb/download/downloadFastaFiles.do"))
        .and(query_param("structureIdList", "5JUP"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pdb/download/downloadFastaFiles.do"))
        .and(query_param("structureIdList", "4HHB"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let empty = client.fetch_sequences(&id("5JUP")).await;
    assert!(matches!(empty, Err(CliError::EmptyResponse(_))));

    let unavailable = client.fetch_sequences(&id("4HHB")).await;
    assert!(matches!(unavailable, Err(CliError::Transport { status: 503, .. })));
}
