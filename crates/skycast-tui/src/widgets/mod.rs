//! Reusable rendering helpers for the dashboard.

pub mod city_card;
pub mod forecast_strip;
pub mod glyph;
