// Service exports
pub mod moderation;
pub mod protection;

pub use moderation::{AuditDetail, AuditOutcome, AuditRules, AuditStatus, ContentAuditor, ModerationError};
pub use protection::{mask_handle, mask_phone, FieldProtector, ProtectionError, ProtectionSettings};
