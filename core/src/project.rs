use crate::error::SyncError;

/// Resolved identity of a remote GitLab project.
///
/// The `api/v4` surface addresses a project by its namespace path with the
/// separator percent-encoded, so `group/sub/project` becomes the single path
/// component `group%2Fsub%2Fproject`. The identity is derived once from the
/// input URL and never changes for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReference {
    origin: String,
    encoded_id: String,
}

impl ProjectReference {
    /// Derive the project identity from a URL of the form
    /// `<scheme>://<host>/<namespace>/.../<project>`.
    pub fn parse(url: &str) -> Result<Self, SyncError> {
        let invalid = |reason: String| SyncError::InvalidProjectReference {
            url: url.to_string(),
            reason,
        };

        let parsed = reqwest::Url::parse(url).map_err(|e| invalid(e.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| invalid("missing host".to_string()))?;

        // Segments keep whatever percent-encoding the input already carries;
        // only the separators between them are escaped.
        let encoded_id = parsed
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("%2F");
        if encoded_id.is_empty() {
            return Err(invalid("URL path carries no namespace segments".to_string()));
        }

        let origin = match parsed.port() {
            Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
            None => format!("{}://{}", parsed.scheme(), host),
        };

        Ok(Self { origin, encoded_id })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Percent-encoded project identifier, e.g. `group%2Fproject`.
    pub fn encoded_id(&self) -> &str {
        &self.encoded_id
    }

    /// Collection endpoint for the project's CI variables.
    pub fn variables_url(&self) -> String {
        format!(
            "{}/api/v4/projects/{}/variables",
            self.origin, self.encoded_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_namespace_and_project() {
        let project =
            ProjectReference::parse("https://src.temando.io/khoa.tran/temando-field-manual-tome")
                .unwrap();
        assert_eq!(project.encoded_id(), "khoa.tran%2Ftemando-field-manual-tome");
        assert_eq!(
            project.variables_url(),
            "https://src.temando.io/api/v4/projects/khoa.tran%2Ftemando-field-manual-tome/variables"
        );
    }

    #[test]
    fn joins_deep_namespaces() {
        let project = ProjectReference::parse("https://gitlab.example.com/a/b/c").unwrap();
        assert_eq!(project.encoded_id(), "a%2Fb%2Fc");
    }

    #[test]
    fn drops_empty_segments() {
        let project = ProjectReference::parse("https://gitlab.example.com//group//project/").unwrap();
        assert_eq!(project.encoded_id(), "group%2Fproject");
    }

    #[test]
    fn keeps_explicit_port() {
        let project = ProjectReference::parse("http://127.0.0.1:8080/group/project").unwrap();
        assert_eq!(project.origin(), "http://127.0.0.1:8080");
        assert_eq!(
            project.variables_url(),
            "http://127.0.0.1:8080/api/v4/projects/group%2Fproject/variables"
        );
    }

    #[test]
    fn rejects_unparsable_url() {
        let err = ProjectReference::parse("not a url").unwrap_err();
        assert!(matches!(err, SyncError::InvalidProjectReference { .. }));
    }

    #[test]
    fn rejects_url_without_namespace() {
        let err = ProjectReference::parse("https://gitlab.example.com/").unwrap_err();
        assert!(matches!(err, SyncError::InvalidProjectReference { .. }));
    }
}
