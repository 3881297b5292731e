use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

/// Defaults used to start a new game when the player does not pick a size.
///
/// Owned by whoever edits them (a settings dialog, a config file) and handed
/// to [`Minefield::from_settings`].
///
/// ```toml
/// default_size = 16
/// default_mines = -1   # negative picks a count automatically
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSettings")]
pub struct Settings {
    default_size: Coord,
    default_mines: MineCount,
}

impl Settings {
    pub const DEFAULT_SIZE: Coord = 16;

    /// Sizes outside `1..=255` are rejected, negative mine counts mean auto.
    pub fn new(size: i32, mines: i32) -> core::result::Result<Self, SettingsError> {
        Ok(Self {
            default_size: check_size(size)?,
            default_mines: MineCount::from_signed(mines),
        })
    }

    pub fn from_toml_str(source: &str) -> core::result::Result<Self, SettingsError> {
        Ok(toml::from_str(source)?)
    }

    pub fn to_toml_string(&self) -> core::result::Result<String, SettingsError> {
        Ok(toml::to_string(self)?)
    }

    pub fn default_size(&self) -> Coord {
        self.default_size
    }

    pub fn default_mines(&self) -> MineCount {
        self.default_mines
    }

    pub fn set_default_size(&mut self, size: i32) -> core::result::Result<(), SettingsError> {
        self.default_size = check_size(size)?;
        log::trace!("Default size set to {}", self.default_size);
        Ok(())
    }

    pub fn set_default_mines(&mut self, mines: MineCount) {
        self.default_mines = mines;
        log::trace!("Default mines set to {:?}", self.default_mines);
    }

    /// Square field of the default size.
    pub fn field_config(&self) -> FieldConfig {
        FieldConfig::square(self.default_size, self.default_mines)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_size: Self::DEFAULT_SIZE,
            default_mines: MineCount::Auto,
        }
    }
}

fn check_size(size: i32) -> core::result::Result<Coord, SettingsError> {
    match Coord::try_from(size) {
        Ok(size) if size >= 1 => Ok(size),
        _ => Err(SettingsError::InvalidSize(size)),
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawSettings {
    default_size: i32,
    default_mines: MineCount,
}

impl Default for RawSettings {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            default_size: settings.default_size.into(),
            default_mines: settings.default_mines,
        }
    }
}

impl TryFrom<RawSettings> for Settings {
    type Error = SettingsError;

    fn try_from(raw: RawSettings) -> core::result::Result<Self, Self::Error> {
        Ok(Self {
            default_size: check_size(raw.default_size)?,
            default_mines: raw.default_mines,
        })
    }
}
