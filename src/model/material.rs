//! Material kinds handled by the plant.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// One of the three raw materials a furnace consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    IronOre,
    Coke,
    Limestone,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 3] = [MaterialKind::IronOre, MaterialKind::Coke, MaterialKind::Limestone];

    /// Label used on the plant floor.
    pub fn plant_label(self) -> &'static str {
        match self {
            MaterialKind::IronOre => "Железная руда",
            MaterialKind::Coke => "Кокс",
            MaterialKind::Limestone => "Известняк",
        }
    }
}

impl Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MaterialKind::IronOre => "iron ore",
            MaterialKind::Coke => "coke",
            MaterialKind::Limestone => "limestone",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown material: {0}")]
pub struct UnknownMaterial(pub String);

impl FromStr for MaterialKind {
    type Err = UnknownMaterial;

    /// Accepts English names (`iron ore`, `iron_ore`, `coke`, `limestone`) and the
    /// plant labels, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        MaterialKind::ALL
            .into_iter()
            .find(|kind| normalized == kind.to_string() || normalized == kind.plant_label().to_lowercase())
            .ok_or_else(|| UnknownMaterial(s.to_string()))
    }
}

/// Material named in a load request.
///
/// Requests may name something the plant does not know; such a delivery is still
/// accepted and split evenly across the three stocks on arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Material {
    Known(MaterialKind),
    Unrecognized(String),
}

impl Material {
    pub fn kind(&self) -> Option<MaterialKind> {
        match self {
            Material::Known(kind) => Some(*kind),
            Material::Unrecognized(_) => None,
        }
    }
}

impl From<MaterialKind> for Material {
    fn from(kind: MaterialKind) -> Self {
        Material::Known(kind)
    }
}

impl From<&str> for Material {
    fn from(name: &str) -> Self {
        name.parse::<MaterialKind>()
            .map(Material::Known)
            .unwrap_or_else(|_| Material::Unrecognized(name.to_string()))
    }
}

impl From<String> for Material {
    fn from(name: String) -> Self {
        Material::from(name.as_str())
    }
}

impl Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Material::Known(kind) => kind.fmt(f),
            Material::Unrecognized(name) => f.write_str(name),
        }
    }
}

/// A pending or delivered loader request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    pub material: Material,
    pub quantity: u32,
}

impl Display for LoadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} units of {}", self.quantity, self.material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plant_labels() {
        assert_eq!("Кокс".parse::<MaterialKind>(), Ok(MaterialKind::Coke));
        assert_eq!("железная руда".parse::<MaterialKind>(), Ok(MaterialKind::IronOre));
        assert_eq!("Известняк".parse::<MaterialKind>(), Ok(MaterialKind::Limestone));
    }

    #[test]
    fn test_parse_english_names() {
        assert_eq!("Iron_Ore".parse::<MaterialKind>(), Ok(MaterialKind::IronOre));
        assert_eq!(" coke ".parse::<MaterialKind>(), Ok(MaterialKind::Coke));
        assert!("slag".parse::<MaterialKind>().is_err());
    }

    #[test]
    fn test_unknown_name_is_kept() {
        let material = Material::from("Шлак");
        assert_eq!(material, Material::Unrecognized("Шлак".into()));
        assert_eq!(material.kind(), None);
        assert_eq!(material.to_string(), "Шлак");
    }

    #[test]
    fn test_request_display() {
        let request = LoadRequest {
            material: MaterialKind::Coke.into(),
            quantity: 30,
        };
        assert_eq!(request.to_string(), "30 units of coke");
    }
}
