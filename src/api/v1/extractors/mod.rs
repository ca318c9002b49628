mod key_identity;

pub use key_identity::{KeyIdentity, KeyIdentityExtractor};
