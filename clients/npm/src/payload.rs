use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct PackageMetadata {
    pub repository: Option<Repository>,
}

#[derive(Deserialize, Debug)]
pub struct Repository {
    pub url: Option<String>,
}

/// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_field_is_optional() {
        let metadata: PackageMetadata =
            serde_json::from_str(r#"{"name": "left-pad"}"#).unwrap();
        assert!(metadata.repository.is_none());

        let metadata: PackageMetadata = serde_json::from_str(
            r#"{"repository": {"type": "git", "url": "git+https://github.com/a/b.git"}}"#,
        )
        .unwrap();
        assert_eq!(
            metadata.repository.unwrap().url.as_deref(),
            Some("git+https://github.com/a/b.git")
        );
    }
}
