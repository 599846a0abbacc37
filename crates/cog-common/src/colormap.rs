//! Named colormaps understood by the tile endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ViewerError;

/// The closed set of palettes offered for single-band rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Coolwarm,
    Jet,
}

impl Colormap {
    /// All palettes, in the order they are offered to the user.
    pub const ALL: [Colormap; 6] = [
        Colormap::Viridis,
        Colormap::Plasma,
        Colormap::Inferno,
        Colormap::Magma,
        Colormap::Coolwarm,
        Colormap::Jet,
    ];

    /// Name sent as `colormap_name`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Colormap::Viridis => "viridis",
            Colormap::Plasma => "plasma",
            Colormap::Inferno => "inferno",
            Colormap::Magma => "magma",
            Colormap::Coolwarm => "coolwarm",
            Colormap::Jet => "jet",
        }
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Colormap {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Colormap::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ViewerError::UnknownColormap(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colormap() {
        assert_eq!("viridis".parse::<Colormap>().unwrap(), Colormap::Viridis);
        assert_eq!("Coolwarm".parse::<Colormap>().unwrap(), Colormap::Coolwarm);
        assert_eq!(" jet ".parse::<Colormap>().unwrap(), Colormap::Jet);
        assert!("rainbow".parse::<Colormap>().is_err());
    }

    #[test]
    fn test_default_is_viridis() {
        assert_eq!(Colormap::default(), Colormap::Viridis);
        assert_eq!(Colormap::ALL.len(), 6);
    }
}
