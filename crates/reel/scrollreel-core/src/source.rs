//! Frame resource addressing.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ids::FrameIndex;

/// Path template for frame images: `{base_path}/{number}.{extension}` where
/// `number` is `index + first_number`, zero-padded to `pad_width` digits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSource {
    pub base_path: String,
    pub extension: String,
    pub pad_width: usize,
    pub first_number: u32,
}

impl Default for FrameSource {
    fn default() -> Self {
        Self {
            base_path: "/images".to_string(),
            extension: "jpg".to_string(),
            pad_width: 3,
            first_number: 1,
        }
    }
}

impl FrameSource {
    pub fn url(&self, index: FrameIndex) -> String {
        let number = u64::from(index.get()) + u64::from(self.first_number);
        format!(
            "{}/{:0width$}.{}",
            self.base_path.trim_end_matches('/'),
            number,
            self.extension.trim_start_matches('.'),
            width = self.pad_width
        )
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        Ok(())
    }
}
