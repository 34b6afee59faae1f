//! Language and snippet fixtures.

use api_client::{ResolvedEntity, SearchFilter};
use futures::try_join;
use serde_json::{json, Value};
use tracing::instrument;

use super::baseline;
use crate::merge::merge;
use crate::{FixtureResult, FixtureService};

#[cfg(test)]
#[path = "localization_tests.rs"]
mod tests;

/// Creates a language on the `en-PH` locale inheriting from the `language`
/// dataset's parent.
#[instrument(skip(service, data))]
pub async fn create_language(service: &FixtureService, data: Value) -> FixtureResult<ResolvedEntity> {
    let locale = service
        .find("locale", &SearchFilter::equals("code", baseline::LOCALE_CODE))
        .await?;

    service
        .create("language", merge(json!({ "localeId": locale.id }), data))
        .await
}

/// Creates an English snippet in the `BASE en-GB` set.
#[instrument(skip(service, data))]
pub async fn create_snippet(service: &FixtureService, data: Value) -> FixtureResult<ResolvedEntity> {
    let (language, snippet_set) = try_join!(
        service.find_by_name("language", baseline::LANGUAGE),
        service.find_by_name("snippet-set", baseline::SNIPPET_SET)
    )?;

    let payload = merge(
        json!({
            "languageId": language.id,
            "setId": snippet_set.id,
        }),
        data,
    );

    service.create("snippet", payload).await
}
