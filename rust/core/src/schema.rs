// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Schema Types
//!
//! Fast category checks using an enum instead of string comparison. Only the
//! entity classes that matter for deciding what gets rendered are listed;
//! everything else lands in [`IfcType::Unknown`]. Unlisted classes are
//! taken to be products, so the non-product classes that can show up in a
//! decomposition must be listed explicitly.

use std::fmt;
use std::str::FromStr;

macro_rules! ifc_types {
    ($($variant:ident => $step:literal),* $(,)?) => {
        /// IFC entity classes relevant to geometry generation
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum IfcType {
            $($variant,)*
            /// Fallback for unknown types, stores a hash of the STEP name
            Unknown(u16),
        }

        impl IfcType {
            /// STEP (upper case) name, e.g. `IFCWALL`
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $step,)*
                    Self::Unknown(_) => "UNKNOWN",
                }
            }

            /// Schema name, e.g. `IfcWall`
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                    Self::Unknown(_) => "Unknown",
                }
            }

            fn from_step_name(s: &str) -> Self {
                match s {
                    $($step => Self::$variant,)*
                    _ => Self::Unknown(simple_hash(s)),
                }
            }
        }
    };
}

ifc_types! {
    // Contexts
    IfcProject => "IFCPROJECT",
    IfcProjectLibrary => "IFCPROJECTLIBRARY",

    // Spatial structure
    IfcSite => "IFCSITE",
    IfcBuilding => "IFCBUILDING",
    IfcBuildingStorey => "IFCBUILDINGSTOREY",
    IfcSpace => "IFCSPACE",
    IfcSpatialZone => "IFCSPATIALZONE",
    IfcFacility => "IFCFACILITY",
    IfcFacilityPart => "IFCFACILITYPART",
    IfcBridge => "IFCBRIDGE",
    IfcRoad => "IFCROAD",

    // Building elements
    IfcWall => "IFCWALL",
    IfcWallStandardCase => "IFCWALLSTANDARDCASE",
    IfcWallElementedCase => "IFCWALLELEMENTEDCASE",
    IfcSlab => "IFCSLAB",
    IfcSlabStandardCase => "IFCSLABSTANDARDCASE",
    IfcSlabElementedCase => "IFCSLABELEMENTEDCASE",
    IfcBeam => "IFCBEAM",
    IfcBeamStandardCase => "IFCBEAMSTANDARDCASE",
    IfcColumn => "IFCCOLUMN",
    IfcColumnStandardCase => "IFCCOLUMNSTANDARDCASE",
    IfcRoof => "IFCROOF",
    IfcStair => "IFCSTAIR",
    IfcStairFlight => "IFCSTAIRFLIGHT",
    IfcRamp => "IFCRAMP",
    IfcRampFlight => "IFCRAMPFLIGHT",
    IfcRailing => "IFCRAILING",
    IfcCurtainWall => "IFCCURTAINWALL",
    IfcPlate => "IFCPLATE",
    IfcPlateStandardCase => "IFCPLATESTANDARDCASE",
    IfcMember => "IFCMEMBER",
    IfcMemberStandardCase => "IFCMEMBERSTANDARDCASE",
    IfcCovering => "IFCCOVERING",
    IfcFooting => "IFCFOOTING",
    IfcPile => "IFCPILE",
    IfcChimney => "IFCCHIMNEY",
    IfcShadingDevice => "IFCSHADINGDEVICE",
    IfcBuildingElementPart => "IFCBUILDINGELEMENTPART",
    IfcBuildingElementProxy => "IFCBUILDINGELEMENTPROXY",
    IfcElementAssembly => "IFCELEMENTASSEMBLY",
    IfcDoor => "IFCDOOR",
    IfcDoorStandardCase => "IFCDOORSTANDARDCASE",
    IfcWindow => "IFCWINDOW",
    IfcWindowStandardCase => "IFCWINDOWSTANDARDCASE",

    // Reinforcement and fasteners
    IfcReinforcingBar => "IFCREINFORCINGBAR",
    IfcReinforcingMesh => "IFCREINFORCINGMESH",
    IfcTendon => "IFCTENDON",
    IfcFastener => "IFCFASTENER",
    IfcMechanicalFastener => "IFCMECHANICALFASTENER",
    IfcDiscreteAccessory => "IFCDISCRETEACCESSORY",

    // MEP
    IfcPipeSegment => "IFCPIPESEGMENT",
    IfcDuctSegment => "IFCDUCTSEGMENT",
    IfcCableSegment => "IFCCABLESEGMENT",
    IfcFlowSegment => "IFCFLOWSEGMENT",
    IfcFlowFitting => "IFCFLOWFITTING",
    IfcFlowController => "IFCFLOWCONTROLLER",
    IfcEnergyConversionDevice => "IFCENERGYCONVERSIONDEVICE",
    IfcFlowTerminal => "IFCFLOWTERMINAL",
    IfcDistributionElement => "IFCDISTRIBUTIONELEMENT",

    // Features
    IfcOpeningElement => "IFCOPENINGELEMENT",
    IfcOpeningStandardCase => "IFCOPENINGSTANDARDCASE",
    IfcVoidingFeature => "IFCVOIDINGFEATURE",
    IfcProjectionElement => "IFCPROJECTIONELEMENT",
    IfcSurfaceFeature => "IFCSURFACEFEATURE",

    // Furniture
    IfcFurnishingElement => "IFCFURNISHINGELEMENT",
    IfcFurniture => "IFCFURNITURE",
    IfcSystemFurnitureElement => "IFCSYSTEMFURNITUREELEMENT",

    // Other products
    IfcAnnotation => "IFCANNOTATION",
    IfcGrid => "IFCGRID",
    IfcVirtualElement => "IFCVIRTUALELEMENT",
    IfcProxy => "IFCPROXY",

    // Non-product objects that may still show up in a decomposition
    IfcGroup => "IFCGROUP",
    IfcSystem => "IFCSYSTEM",
    IfcBuildingSystem => "IFCBUILDINGSYSTEM",
    IfcDistributionSystem => "IFCDISTRIBUTIONSYSTEM",
    IfcZone => "IFCZONE",
    IfcInventory => "IFCINVENTORY",
    IfcStructuralAnalysisModel => "IFCSTRUCTURALANALYSISMODEL",
    IfcTypeProduct => "IFCTYPEPRODUCT",
}

impl FromStr for IfcType {
    type Err = std::convert::Infallible;

    /// Parse from a STEP or schema name, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_step_name(&s.to_ascii_uppercase()))
    }
}

impl IfcType {
    /// Check if this is an IfcContext subtype
    pub fn is_context(&self) -> bool {
        matches!(self, Self::IfcProject | Self::IfcProjectLibrary)
    }

    /// Check if this is a spatial structure element
    pub fn is_spatial_structure(&self) -> bool {
        matches!(
            self,
            Self::IfcSite
                | Self::IfcBuilding
                | Self::IfcBuildingStorey
                | Self::IfcSpace
                | Self::IfcSpatialZone
                | Self::IfcFacility
                | Self::IfcFacilityPart
                | Self::IfcBridge
                | Self::IfcRoad
        )
    }

    /// Check if this is a building element
    pub fn is_building_element(&self) -> bool {
        matches!(
            self,
            Self::IfcWall
                | Self::IfcWallStandardCase
                | Self::IfcWallElementedCase
                | Self::IfcSlab
                | Self::IfcSlabStandardCase
                | Self::IfcSlabElementedCase
                | Self::IfcBeam
                | Self::IfcBeamStandardCase
                | Self::IfcColumn
                | Self::IfcColumnStandardCase
                | Self::IfcRoof
                | Self::IfcStair
                | Self::IfcStairFlight
                | Self::IfcRamp
                | Self::IfcRampFlight
                | Self::IfcRailing
                | Self::IfcCurtainWall
                | Self::IfcPlate
                | Self::IfcPlateStandardCase
                | Self::IfcMember
                | Self::IfcMemberStandardCase
                | Self::IfcCovering
                | Self::IfcFooting
                | Self::IfcPile
                | Self::IfcChimney
                | Self::IfcShadingDevice
                | Self::IfcBuildingElementPart
                | Self::IfcBuildingElementProxy
                | Self::IfcDoor
                | Self::IfcDoorStandardCase
                | Self::IfcWindow
                | Self::IfcWindowStandardCase
        )
    }

    /// Check if this is an IfcFeatureElement subtype (openings included)
    pub fn is_feature_element(&self) -> bool {
        self.is_opening()
            || matches!(
                self,
                Self::IfcVoidingFeature | Self::IfcProjectionElement | Self::IfcSurfaceFeature
            )
    }

    /// Check if this is an IfcOpeningElement (or its standard case)
    pub fn is_opening(&self) -> bool {
        matches!(self, Self::IfcOpeningElement | Self::IfcOpeningStandardCase)
    }

    pub fn is_space(&self) -> bool {
        matches!(self, Self::IfcSpace)
    }

    /// Check if this is an IfcFurnishingElement subtype
    pub fn is_furnishing(&self) -> bool {
        matches!(
            self,
            Self::IfcFurnishingElement | Self::IfcFurniture | Self::IfcSystemFurnitureElement
        )
    }

    pub fn is_annotation(&self) -> bool {
        matches!(self, Self::IfcAnnotation)
    }

    /// Check if this is an IfcProduct subtype
    ///
    /// Contexts, groups, systems and type objects are not products. Unlisted
    /// classes count as products.
    pub fn is_product(&self) -> bool {
        !matches!(
            self,
            Self::IfcProject
                | Self::IfcProjectLibrary
                | Self::IfcGroup
                | Self::IfcSystem
                | Self::IfcBuildingSystem
                | Self::IfcDistributionSystem
                | Self::IfcZone
                | Self::IfcInventory
                | Self::IfcStructuralAnalysisModel
                | Self::IfcTypeProduct
        )
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Simple hash function for unknown IFC types
fn simple_hash(s: &str) -> u16 {
    let mut hash: u32 = 5381;
    for byte in s.bytes() {
        hash = ((hash << 5).wrapping_add(hash)).wrapping_add(byte as u32);
    }
    (hash & 0xFFFF) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("IFCWALL".parse::<IfcType>().unwrap(), IfcType::IfcWall);
        assert_eq!("IfcDoor".parse::<IfcType>().unwrap(), IfcType::IfcDoor);
        assert_eq!("ifcproject".parse::<IfcType>().unwrap(), IfcType::IfcProject);
        assert!(matches!(
            "IFCNOTATHING".parse::<IfcType>().unwrap(),
            IfcType::Unknown(_)
        ));
    }

    #[test]
    fn test_names() {
        assert_eq!(IfcType::IfcWall.as_str(), "IFCWALL");
        assert_eq!(IfcType::IfcWall.name(), "IfcWall");
        assert_eq!(IfcType::IfcBuildingStorey.to_string(), "IfcBuildingStorey");
    }

    #[test]
    fn test_feature_elements_include_openings() {
        assert!(IfcType::IfcOpeningElement.is_feature_element());
        assert!(IfcType::IfcVoidingFeature.is_feature_element());
        assert!(!IfcType::IfcVoidingFeature.is_opening());
        assert!(!IfcType::IfcWall.is_feature_element());
    }

    #[test]
    fn test_products() {
        assert!(IfcType::IfcWall.is_product());
        assert!(IfcType::IfcSite.is_product());
        assert!(IfcType::IfcAnnotation.is_product());
        assert!(!IfcType::IfcProject.is_product());
        assert!(!IfcType::IfcGroup.is_product());
        assert!(!IfcType::IfcDistributionSystem.is_product());
        assert!(!IfcType::IfcTypeProduct.is_product());
    }

    #[test]
    fn test_product_subtypes_are_products() {
        for name in [
            "IFCSLABSTANDARDCASE",
            "IFCBEAMSTANDARDCASE",
            "IFCFLOWSEGMENT",
            "IFCREINFORCINGBAR",
            "IFCCABLECARRIERSEGMENT",
        ] {
            let ifc_type = name.parse::<IfcType>().unwrap();
            assert!(ifc_type.is_product(), "{name}");
        }
        assert!(matches!(
            "IFCCABLECARRIERSEGMENT".parse::<IfcType>().unwrap(),
            IfcType::Unknown(_)
        ));
        assert!(IfcType::IfcSlabStandardCase.is_building_element());
    }

    #[test]
    fn test_spatial_and_context() {
        assert!(IfcType::IfcBuildingStorey.is_spatial_structure());
        assert!(IfcType::IfcSpace.is_spatial_structure());
        assert!(!IfcType::IfcProject.is_spatial_structure());
        assert!(IfcType::IfcProject.is_context());
        assert!(IfcType::IfcFurniture.is_furnishing());
    }
}
