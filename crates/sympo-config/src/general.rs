//! Settings shared by every command.

use serde::{Deserialize, Serialize};

/// Page number carried by the first stamped page.
const fn default_first_page() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    #[serde(default = "default_first_page")]
    pub first_page: u32,

    /// Write merged data back over the input file instead of a new file.
    #[serde(default)]
    pub overwrite: bool,

    /// Event cities repeated on every metadata session row.
    #[serde(default)]
    pub cities: Vec<String>,

    /// Event venues repeated on every metadata session row.
    #[serde(default)]
    pub venues: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            first_page: default_first_page(),
            overwrite: false,
            cities: Vec::new(),
            venues: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.first_page, 1);
        assert!(!config.overwrite);
        assert!(config.cities.is_empty());
    }
}
