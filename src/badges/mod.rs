//! Badges and the rules that assign them to tickets.

mod badge;
mod classify;

pub use badge::{descriptors, Badge, BadgeDescriptor, BadgeSet, SUMMARY_BADGES};
pub use classify::classify;
