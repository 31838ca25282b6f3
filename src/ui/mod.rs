//! Presentation layer: panels (menu bar + filter sidebar), reusable chart
//! wrappers, and the five dashboard tabs.

pub mod charts;
pub mod panels;
pub mod tabs;
