use crate::models::{QueryParameters, ResponseId};

/// The only metadata prefix the simulated repository serves
pub const SUPPORTED_METADATA_PREFIX: &str = "oai_dc";

/// The only set the simulated repository serves
pub const SUPPORTED_SET: &str = "col_AF";

/// Resumption tokens for the pages of `col_AF`, sorted for binary search.
static RESUMPTION_TOKENS: [&str; 25] = [
    "1001at392833266283162",
    "101at392833266283162",
    "1101at392833266283162",
    "1201at392833266283162",
    "1301at392833266283162",
    "1401at392833266283162",
    "1501at392833266283162",
    "1601at392833266283162",
    "1701at392833266283162",
    "1801at392833266283162",
    "1901at392833266283162",
    "2001at392833266283162",
    "201at392833266283162",
    "2101at392833266283162",
    "2201at392833266283162",
    "2301at392833266283162",
    "2401at392833266283162",
    "2501at392833266283162",
    "301at392833266283162",
    "401at392833266283162",
    "501at392833266283162",
    "601at392833266283162",
    "701at392833266283162",
    "801at392833266283162",
    "901at392833266283162",
];

/// All known resumption tokens
pub fn resumption_tokens() -> &'static [&'static str] {
    &RESUMPTION_TOKENS
}

/// Resolve the canned response for a set of query parameters.
///
/// Never fails: anything the simulated repository does not understand maps
/// to one of the `Bad*` identifiers.
pub fn select(params: &QueryParameters) -> ResponseId {
    let verb = match params.get("verb") {
        Some(verb) => verb.as_str(),
        None => return ResponseId::BadKey,
    };

    match verb {
        "Identify" => ResponseId::Identify,
        "ListMetadataFormats" => ResponseId::ListMetadataFormats,
        "ListSets" => ResponseId::ListSets,
        "ListRecords" => select_list_records(params),
        _ => ResponseId::BadKey,
    }
}

fn select_list_records(params: &QueryParameters) -> ResponseId {
    if let Some(token) = params.get("resumptionToken") {
        return match lookup_token(token) {
            Some(token) => ResponseId::ResumptionPage {
                set: SUPPORTED_SET,
                token,
            },
            None => ResponseId::BadKey,
        };
    }

    if params.get("metadataPrefix").map(String::as_str) != Some(SUPPORTED_METADATA_PREFIX) {
        return ResponseId::BadMetadataPrefix;
    }

    match params.get("set").map(String::as_str) {
        Some(SUPPORTED_SET) => ResponseId::SetFirstPage(SUPPORTED_SET),
        Some(_) => ResponseId::BadSet,
        None => ResponseId::ListRecordsWithoutSet,
    }
}

fn lookup_token(token: &str) -> Option<&'static str> {
    RESUMPTION_TOKENS
        .binary_search_by(|probe| (**probe).cmp(token))
        .ok()
        .map(|index| RESUMPTION_TOKENS[index])
}
