use serde::{Deserialize, Serialize};

/// YouTube credential fields relayed by the backend.
///
/// Every field is optional: backend responses carry any subset of them, and
/// [`TokenSet::merge`] only overwrites the fields a response actually sets.
///
/// # Example
/// ```
/// use vogon_client::auth::TokenSet;
///
/// let mut stored = TokenSet {
///     access_token: Some("old-access".to_string()),
///     refresh_token: Some("refresh".to_string()),
///     token_type: Some("Bearer".to_string()),
/// };
/// stored.merge(&TokenSet {
///     access_token: Some("new-access".to_string()),
///     ..TokenSet::default()
/// });
/// assert_eq!(stored.refresh_token.as_deref(), Some("refresh"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl TokenSet {
    /// Overwrite the fields that `update` sets. Returns whether anything changed.
    pub fn merge(&mut self, update: &TokenSet) -> bool {
        let mut changed = false;
        for (slot, value) in [
            (&mut self.access_token, &update.access_token),
            (&mut self.refresh_token, &update.refresh_token),
            (&mut self.token_type, &update.token_type),
        ] {
            if let Some(value) = value {
                if slot.as_ref() != Some(value) {
                    *slot = Some(value.clone());
                    changed = true;
                }
            }
        }
        changed
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.token_type.is_none()
    }

    /// Access and refresh token pair, when both are present.
    pub fn linked_pair(&self) -> Option<(&str, &str)> {
        Some((self.access_token.as_deref()?, self.refresh_token.as_deref()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> TokenSet {
        TokenSet {
            access_token: Some("access".to_string()),
            refresh_token: Some("refresh".to_string()),
            token_type: Some("Bearer".to_string()),
        }
    }

    #[test]
    fn merge_keeps_fields_missing_from_update() {
        let mut stored = full();
        let changed = stored.merge(&TokenSet {
            access_token: Some("rotated".to_string()),
            ..TokenSet::default()
        });
        assert!(changed);
        assert_eq!(stored.access_token.as_deref(), Some("rotated"));
        assert_eq!(stored.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(stored.token_type.as_deref(), Some("Bearer"));
    }

    #[test]
    fn merge_with_identical_values_reports_no_change() {
        let mut stored = full();
        assert!(!stored.merge(&full()));
        assert!(!stored.merge(&TokenSet::default()));
    }

    #[test]
    fn linked_pair_requires_both_tokens() {
        assert_eq!(full().linked_pair(), Some(("access", "refresh")));
        let partial = TokenSet {
            access_token: Some("access".to_string()),
            ..TokenSet::default()
        };
        assert!(partial.linked_pair().is_none());
    }

    #[test]
    fn deserializes_partial_backend_payload() {
        let parsed: TokenSet =
            serde_json::from_str(r#"{"access_token":"a","expires_in":3600}"#).unwrap();
        assert_eq!(parsed.access_token.as_deref(), Some("a"));
        assert!(parsed.refresh_token.is_none());
    }
}
