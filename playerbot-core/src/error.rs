use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigField {
    WorldEatMult,
    WorldEatOverlapDiv,
    PlayerSplitSizeDiv,
    PlayerSplitBoost,
    PlayerMaxCells,
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WorldEatMult => write!(f, "worldEatMult"),
            Self::WorldEatOverlapDiv => write!(f, "worldEatOverlapDiv"),
            Self::PlayerSplitSizeDiv => write!(f, "playerSplitSizeDiv"),
            Self::PlayerSplitBoost => write!(f, "playerSplitBoost"),
            Self::PlayerMaxCells => write!(f, "playerMaxCells"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NonFinite { field: ConfigField },
    NotPositive { field: ConfigField, value: f64 },
    Negative { field: ConfigField, value: f64 },
    ZeroMaxCells,
}

impl ConfigError {
    pub fn field(&self) -> ConfigField {
        match self {
            Self::NonFinite { field }
            | Self::NotPositive { field, .. }
            | Self::Negative { field, .. } => *field,
            Self::ZeroMaxCells => ConfigField::PlayerMaxCells,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { field } => write!(f, "{field} must be a finite number"),
            Self::NotPositive { field, value } => {
                write!(f, "{field} must be greater than zero, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::ZeroMaxCells => write!(f, "playerMaxCells must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}
