/*
 * Responsibility
 * - 受理された API key の識別子 (validator と handler の間の契約型)
 * - validator が request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - key そのものは保持しない (label のみ)
 */

/// Identity of the accepted key, as attached by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyIdentity {
    label: String,
}

impl KeyIdentity {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
