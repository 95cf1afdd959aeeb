//! Sheet ingestion settings.

use serde::{Deserialize, Serialize};
use sympo_core::entities::SessionOrder;
use sympo_core::ingest::{
    ColumnMap, DEFAULT_PLENARY_MINUTES, DEFAULT_PRESENTATION_MINUTES, SheetLoader,
};

use crate::error::ConfigError;

const fn default_presentation_minutes() -> u32 {
    DEFAULT_PRESENTATION_MINUTES
}

const fn default_plenary_minutes() -> u32 {
    DEFAULT_PLENARY_MINUTES
}

fn default_accept_value() -> String {
    "Accept".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SheetConfig {
    /// Hours east of GMT of the conference venue.
    #[serde(default)]
    pub tz_offset_h: i32,

    #[serde(default = "default_presentation_minutes")]
    pub presentation_minutes: u32,

    #[serde(default = "default_plenary_minutes")]
    pub plenary_minutes: u32,

    #[serde(default = "default_accept_value")]
    pub accept_value: String,

    #[serde(default)]
    pub order: SessionOrder,

    #[serde(default)]
    pub columns: ColumnMap,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            tz_offset_h: 0,
            presentation_minutes: default_presentation_minutes(),
            plenary_minutes: default_plenary_minutes(),
            accept_value: default_accept_value(),
            order: SessionOrder::default(),
            columns: ColumnMap::default(),
        }
    }
}

impl SheetConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an offset outside ±23 hours,
    /// a zero-minute slot, or an author/chair column template without the
    /// `{i}` slot placeholder.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-23..=23).contains(&self.tz_offset_h) {
            return Err(ConfigError::InvalidValue {
                field: "sheet.tz_offset_h".into(),
                reason: format!("{} is outside -23..=23", self.tz_offset_h),
            });
        }
        for (field, minutes) in [
            ("sheet.presentation_minutes", self.presentation_minutes),
            ("sheet.plenary_minutes", self.plenary_minutes),
        ] {
            if minutes == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    reason: "must be at least one minute".into(),
                });
            }
        }
        self.columns
            .check_templates()
            .map_err(|e| ConfigError::InvalidValue {
                field: "sheet.columns".into(),
                reason: e.to_string(),
            })
    }

    /// A loader carrying every setting of this section.
    #[must_use]
    pub fn loader(&self) -> SheetLoader<'_> {
        SheetLoader::new(&self.columns)
            .tz_offset_h(self.tz_offset_h)
            .presentation_minutes(self.presentation_minutes)
            .plenary_minutes(self.plenary_minutes)
            .accept_value(self.accept_value.clone())
            .order(self.order)
    }
}
