//! # cspm-core
//!
//! Domain types shared by every cspm-utils crate.
//!
//! - Entity structs mirroring the CSPM API payloads (requirements, controls,
//!   cloud and inventory resources, risk acceptances)
//! - [`FlexibleCount`] for the `totalCount` field the API encodes either as a
//!   number or as a string
//! - [`Page`], the `{data, totalCount}` envelope every paginated endpoint returns
//! - [`AcceptanceStatus`] derivation for resource/control relations
//! - The ordered keyword tables used to classify policy names

pub mod classify;
pub mod count;
pub mod entities;
pub mod enums;
pub mod lenient;
pub mod page;

pub use count::{CountError, FlexibleCount};
pub use enums::AcceptanceStatus;
pub use page::Page;
