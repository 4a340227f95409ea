// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod photo;
pub mod segment;
pub mod stats;

pub use activity::{Activity, ActivityDetail};
pub use photo::PhotoEntry;
pub use segment::{BoundingBox, Segment, SegmentDetail};
pub use stats::{CategoryStats, DateRange, LifetimeStats};
