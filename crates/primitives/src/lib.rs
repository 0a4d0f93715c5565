//! This crate contains the plain-data records shared by every other crate in this workspace: the
//! mint and burn session records, the staged deposit and burn transaction records, and the
//! [`subscription::Subscription`] stream through which capabilities report chain activity.
//!
//! It lies at the bottom of the crate hierarchy in this workspace i.e., it does not depend on any
//! other crate in this workspace.

pub mod burn;
pub mod deposit;
pub mod session;
pub mod subscription;
pub mod types;

