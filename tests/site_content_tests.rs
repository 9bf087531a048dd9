use std::path::PathBuf;

use oai_pmh_listener::core::selector::resumption_tokens;
use oai_pmh_listener::{DelaySettings, DocumentStore, FileDocumentStore, ResponseId};

fn repo_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn all_identifiers() -> Vec<ResponseId> {
    let mut ids = vec![
        ResponseId::Identify,
        ResponseId::ListMetadataFormats,
        ResponseId::ListSets,
        ResponseId::ListRecordsWithoutSet,
        ResponseId::SetFirstPage("col_AF"),
        ResponseId::BadKey,
        ResponseId::BadMetadataPrefix,
        ResponseId::BadSet,
    ];
    ids.extend(resumption_tokens().iter().map(|token| ResponseId::ResumptionPage {
        set: "col_AF",
        token: *token,
    }));
    ids
}

#[tokio::test]
async fn test_shipped_content_covers_every_identifier() {
    let store = FileDocumentStore::new(repo_path("SiteContent"));

    for id in all_identifiers() {
        let document = store
            .load(&id)
            .await
            .unwrap_or_else(|e| panic!("missing document for {}: {}", id, e));
        let text = String::from_utf8(document.to_vec()).unwrap();

        assert_eq!(
            text.matches("ResponseDateValue").count(),
            1,
            "document for {} must carry one response date",
            id
        );
        assert_eq!(text.contains("<error "), id.is_error(), "document for {}", id);
    }
}

#[test]
fn test_shipped_settings_parse() {
    let text = std::fs::read_to_string(repo_path("ListenerSettings.xml")).unwrap();

    let settings = DelaySettings::from_xml(&text).unwrap();

    assert_eq!(settings.frequency_one_from, 3);
    assert_eq!(settings.duration_from_ms, 100);
    assert_eq!(settings.duration_to_ms, 1000);
}
