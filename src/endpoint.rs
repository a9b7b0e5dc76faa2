//! Endpoint resolution for the Instasent REST API.
//!
//! Every resource lives under a project (`/project/{projectId}`); stream
//! resources additionally live under a data source
//! (`/project/{projectId}/datasource/{datasourceId}`).

/// Base URL of the public Instasent API.
pub const API_BASE_URL: &str = "https://api.instasent.com/v1";

/// Alias for the first automatically provisioned API data source.
///
/// The upstream API resolves this literal itself, so it must be sent as-is.
pub const DEFAULT_DATASOURCE: &str = "dsapi";

/// Returns the data source identifier to use in a path.
///
/// Empty or whitespace-only identifiers resolve to [`DEFAULT_DATASOURCE`].
pub fn resolve_datasource_id(datasource_id: &str) -> &str {
    if datasource_id.trim().is_empty() {
        DEFAULT_DATASOURCE
    } else {
        datasource_id
    }
}

/// Path of a project scope: `/project/{projectId}`.
pub fn project_path(project_id: &str) -> String {
    format!("/project/{}", project_id)
}

/// Path of a data source scope: `/project/{projectId}/datasource/{datasourceId}`.
pub fn datasource_path(project_id: &str, datasource_id: &str) -> String {
    format!(
        "{}/datasource/{}",
        project_path(project_id),
        resolve_datasource_id(datasource_id)
    )
}

/// Resolves the tenant-scoped base URL.
///
/// With `datasource_id = None` the URL points at the project; with
/// `Some(id)` it points at the data source, defaulting blank ids.
pub fn resolve(api_base: &str, project_id: &str, datasource_id: Option<&str>) -> String {
    let path = match datasource_id {
        Some(ds) => datasource_path(project_id, ds),
        None => project_path(project_id),
    };
    join_url(api_base, &path)
}

/// Joins an API base URL and a path without doubling the separator.
pub fn join_url(api_base: &str, path: &str) -> String {
    let base = api_base.trim_end_matches('/');
    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Percent-encodes a caller-supplied value for use as one path segment.
pub fn encode_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
