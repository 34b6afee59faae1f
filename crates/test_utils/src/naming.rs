//! Unique names for entities created by tests.
//!
//! Tests share one shop, so anything a test creates carries the CI context, a
//! timestamp and a random suffix. Leftovers can then be traced back to the
//! run that created them.

use chrono::Utc;
use std::env;
use uuid::Uuid;

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;

/// Short label for the pipeline the tests run in.
///
/// Returns:
/// - `mr{iid}` inside a merge request pipeline (`CI_MERGE_REQUEST_IID`)
/// - `pr{number}` for GitHub pull requests (`GITHUB_REF=refs/pull/{number}/merge`)
/// - the branch name with `/` replaced by `-` (`CI_COMMIT_REF_NAME` or `GITHUB_REF=refs/heads/...`)
/// - `local` outside CI
pub fn ci_context() -> String {
    if let Ok(iid) = env::var("CI_MERGE_REQUEST_IID") {
        if !iid.is_empty() {
            return format!("mr{}", iid);
        }
    }

    if let Ok(github_ref) = env::var("GITHUB_REF") {
        if let Some(rest) = github_ref.strip_prefix("refs/pull/") {
            if let Some(number) = rest.split('/').next() {
                return format!("pr{}", number);
            }
        } else if let Some(branch) = github_ref.strip_prefix("refs/heads/") {
            return branch.replace('/', "-");
        }
    }

    if let Ok(branch) = env::var("CI_COMMIT_REF_NAME") {
        if !branch.is_empty() {
            return branch.replace('/', "-");
        }
    }

    "local".to_string()
}

fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_string()
}

/// A display name for a test entity.
///
/// Format: `{label} {context}-{timestamp}-{random}`, e.g.
/// `Product name local-20240108-120000-a1b2c3`.
pub fn unique_name(label: &str) -> String {
    format!(
        "{} {}-{}-{}",
        label,
        ci_context(),
        Utc::now().format("%Y%m%d-%H%M%S"),
        random_suffix()
    )
}

/// A product number that is unique per call, e.g. `E2E-LOCAL-A1B2C3`.
pub fn unique_product_number(prefix: &str) -> String {
    format!("{}-{}-{}", prefix, ci_context(), random_suffix()).to_uppercase()
}

/// An email address for storefront registrations.
///
/// Format: `{local}+{context}-{random}@example.com`.
pub fn unique_email(local: &str) -> String {
    format!("{}+{}-{}@example.com", local, ci_context(), random_suffix())
}
