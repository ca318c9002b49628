/*!
 * API key identity extractor
 *
 * Public API:
 * - KeyIdentity
 * - KeyIdentityExtractor
 */

mod core;

pub use self::core::KeyIdentityExtractor;
pub use crate::services::validator::KeyIdentity;
