/// Presentation rule that hides credentials in `config list` output.
///
/// A key is treated as a secret when it ends with `secret_suffix`. Secret
/// values longer than `threshold` characters are shown as their first
/// `visible_prefix` characters followed by the total character count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskPolicy {
    /// Key suffix marking a setting as a credential.
    pub secret_suffix: String,

    /// Values with at most this many characters are shown unmasked.
    pub threshold: usize,

    /// Number of leading characters left visible when masking.
    pub visible_prefix: usize,
}

impl Default for MaskPolicy {
    fn default() -> Self {
        Self {
            secret_suffix: "_api_key".to_string(),
            threshold: 8,
            visible_prefix: 4,
        }
    }
}

impl MaskPolicy {
    /// Whether the key names a credential.
    pub fn is_secret(&self, key: &str) -> bool {
        key.ends_with(&self.secret_suffix)
    }

    /// Renders `value` for display under `key`, masking secrets.
    ///
    /// The visible prefix is capped at the threshold so a masked value can
    /// never show every character.
    pub fn render(&self, key: &str, value: &str) -> String {
        let length = value.chars().count();

        if !self.is_secret(key) || length <= self.threshold {
            return value.to_string();
        }

        let prefix: String = value
            .chars()
            .take(self.visible_prefix.min(self.threshold))
            .collect();

        format!("{prefix}...({length} chars)")
    }
}
