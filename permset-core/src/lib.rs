//! # Permission Set Core
//!
//! Extraction and resolution of permission set metadata: object, field and
//! user permissions declared by permission sets, and the combined view of a
//! permission set group after its muting permission sets are applied.
//!
//! ## Overview
//!
//! The permset-core crate handles:
//! - **Extraction**: Normalize raw entries into [`PermissionRecord`]s keyed by
//!   object, field or permission name
//! - **Merge**: Combine member permission sets, OR-ing grant flags
//! - **Muting**: Force individual attributes to the muting set's value
//! - **Aggregation**: Drive all of the above through a [`SourceReader`]
//!
//! File formats and project layout live in `permset-metadata`; tabular
//! output lives in `permset-cli`.
//!
//! ## Architecture
//!
//! ```text
//! SourceReader ──► extract ──► MergedPermissions ──┐
//!                                                  ├──► resolve ──► Vec<PermissionRecord>
//! SourceReader ──► extract ──► MutingRules ────────┘
//!   (muting sets)
//! ```
//!
//! ## Merge and Muting Semantics
//!
//! - Keys keep their first-seen order across the listed member sets
//! - Boolean attributes merge with OR; other scalars are last-writer-wins
//! - The last muting entry per key wins, and each attribute it names is
//!   set outright, never OR-ed
//! - Unreadable group members are skipped and reported as diagnostics
//!
//! ## Usage
//!
//! ```rust
//! use permset_core::{
//!     apply_muting, AttributeValue, MergedPermissions, PermissionRecord,
//! };
//!
//! let merged: MergedPermissions = vec![
//!     PermissionRecord::new("A", "Account")
//!         .with_attribute("allowRead", true)
//!         .with_attribute("allowEdit", false),
//!     PermissionRecord::new("B", "Account")
//!         .with_attribute("allowRead", false)
//!         .with_attribute("allowEdit", true),
//! ]
//! .into_iter()
//! .collect();
//!
//! let account = merged.get("Account").unwrap().clone();
//! let mute = PermissionRecord::new("Mute", "Account").with_attribute("allowEdit", false);
//! let resolved = apply_muting(account, &mute);
//!
//! assert_eq!(resolved.get("allowRead"), Some(&AttributeValue::Bool(true)));
//! assert_eq!(resolved.get("allowEdit"), Some(&AttributeValue::Bool(false)));
//! ```

pub mod aggregate;
pub mod diagnostic;
pub mod error;
pub mod extract;
pub mod kind;
pub mod merge;
pub mod muting;
pub mod record;
pub mod source;
pub mod value;

// Re-export main types for convenience
pub use aggregate::{Aggregator, GroupDescriptor, Resolution};
pub use diagnostic::Diagnostic;
pub use error::{PermissionError, PermissionResult};
pub use extract::{extract, extract_key, Extraction};
pub use kind::PermissionKind;
pub use merge::{merge_attribute, MergedPermissions};
pub use muting::{apply_muting, resolve, MutingRules};
pub use record::{Origin, PermissionRecord, KEY_COLUMN};
pub use source::{MemorySourceReader, RawCollection, RawEntry, RawSource, SourceReader, SourceRole};
pub use value::{AttributeValue, Attributes};
