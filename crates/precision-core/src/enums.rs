//! Enumeration types used throughout the guidance engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of payload being guided.
///
/// Serialized as its lowercase name. Unrecognized names are preserved in
/// `Other` so catalog lookups can fall back to the default entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PayloadType {
    /// Unguided after launch.
    Ballistic,
    /// Air-breathing, maneuvering.
    Cruise,
    /// Mach 5+ maneuvering.
    #[default]
    Hypersonic,
    /// Orbital kill vehicle.
    OrbitalKv,
    /// Re-entry vehicle.
    Reentry,
    Spacecraft,
    Rocket,
    Drone,
    /// Ground robot.
    Robot,
    /// Underwater vehicle.
    Submarine,
    Other(String),
}

impl PayloadType {
    /// Every named payload type, in catalog order.
    pub const KNOWN: [PayloadType; 10] = [
        PayloadType::Ballistic,
        PayloadType::Cruise,
        PayloadType::Hypersonic,
        PayloadType::OrbitalKv,
        PayloadType::Reentry,
        PayloadType::Spacecraft,
        PayloadType::Rocket,
        PayloadType::Drone,
        PayloadType::Robot,
        PayloadType::Submarine,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            PayloadType::Ballistic => "ballistic",
            PayloadType::Cruise => "cruise",
            PayloadType::Hypersonic => "hypersonic",
            PayloadType::OrbitalKv => "orbital_kv",
            PayloadType::Reentry => "reentry",
            PayloadType::Spacecraft => "spacecraft",
            PayloadType::Rocket => "rocket",
            PayloadType::Drone => "drone",
            PayloadType::Robot => "robot",
            PayloadType::Submarine => "submarine",
            PayloadType::Other(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        let lower = name.trim().to_ascii_lowercase();
        PayloadType::KNOWN
            .iter()
            .find(|p| p.as_str() == lower)
            .cloned()
            .unwrap_or(PayloadType::Other(lower))
    }
}

impl From<String> for PayloadType {
    fn from(name: String) -> Self {
        PayloadType::from_name(&name)
    }
}

impl From<PayloadType> for String {
    fn from(p: PayloadType) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Motion class of the tracked target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// Fixed position.
    Stationary,
    /// Constant velocity.
    Linear,
    /// Accelerating or evasive.
    #[default]
    Maneuvering,
    Orbital,
    Ballistic,
    /// Aircraft.
    Airborne,
    /// Ship.
    Seaborne,
}

/// Operating environment at launch, classified by altitude band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentType {
    /// Surface level (altitude below zero).
    Ground,
    /// Below 20 km.
    LowAtmosphere,
    /// 20 km up to the Kármán line.
    HighAtmosphere,
    /// Kármán line to 2000 km.
    Leo,
    /// 2000 km up to the geostationary band.
    Meo,
    Geo,
    Cislunar,
    DeepSpace,
    Underwater,
}

impl EnvironmentType {
    /// Whether drag and gravity-drop matter for trajectories in this band.
    pub fn is_atmospheric(self) -> bool {
        matches!(
            self,
            EnvironmentType::Ground
                | EnvironmentType::LowAtmosphere
                | EnvironmentType::HighAtmosphere
                | EnvironmentType::Underwater
        )
    }
}

/// Guidance law selector.
///
/// Parsing never fails: unknown names, including the unimplemented
/// sliding-mode, adaptive and predictive laws, resolve to augmented ProNav.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GuidanceLaw {
    /// Proportional navigation.
    ProNav,
    /// Augmented proportional navigation (target acceleration feed-forward).
    #[default]
    AugmentedProNav,
    /// True proportional navigation (command perpendicular to LOS).
    TrueProNav,
    /// Zero-effort-miss.
    ZeroEffortMiss,
    /// Optimal control for a maneuvering target.
    Optimal,
}

impl GuidanceLaw {
    pub const ALL: [GuidanceLaw; 5] = [
        GuidanceLaw::ProNav,
        GuidanceLaw::AugmentedProNav,
        GuidanceLaw::TrueProNav,
        GuidanceLaw::ZeroEffortMiss,
        GuidanceLaw::Optimal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GuidanceLaw::ProNav => "pronav",
            GuidanceLaw::AugmentedProNav => "aug_pronav",
            GuidanceLaw::TrueProNav => "tpn",
            GuidanceLaw::ZeroEffortMiss => "zem",
            GuidanceLaw::Optimal => "optimal",
        }
    }

    /// Resolve a configured law name, falling back to augmented ProNav.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "pronav" | "pn" => GuidanceLaw::ProNav,
            "aug_pronav" | "apn" | "augmented_pronav" => GuidanceLaw::AugmentedProNav,
            "tpn" | "true_pronav" => GuidanceLaw::TrueProNav,
            "zem" | "zero_effort_miss" => GuidanceLaw::ZeroEffortMiss,
            "optimal" => GuidanceLaw::Optimal,
            other => {
                log::warn!("unrecognized guidance law {other:?}, using aug_pronav");
                GuidanceLaw::AugmentedProNav
            }
        }
    }
}

impl From<String> for GuidanceLaw {
    fn from(name: String) -> Self {
        GuidanceLaw::from_name(&name)
    }
}

impl From<GuidanceLaw> for String {
    fn from(law: GuidanceLaw) -> Self {
        law.as_str().to_string()
    }
}

impl fmt::Display for GuidanceLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Central body whose gravity field acts on the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CentralBody {
    #[default]
    Earth,
    Moon,
    Mars,
}

impl CentralBody {
    pub fn as_str(self) -> &'static str {
        match self {
            CentralBody::Earth => "earth",
            CentralBody::Moon => "moon",
            CentralBody::Mars => "mars",
        }
    }

    /// Resolve a body identifier, falling back to Earth.
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "earth" => CentralBody::Earth,
            "moon" => CentralBody::Moon,
            "mars" => CentralBody::Mars,
            other => {
                log::warn!("unknown central body {other:?}, using earth");
                CentralBody::Earth
            }
        }
    }
}

impl From<String> for CentralBody {
    fn from(id: String) -> Self {
        CentralBody::from_id(&id)
    }
}

impl From<CentralBody> for String {
    fn from(body: CentralBody) -> Self {
        body.as_str().to_string()
    }
}

/// Gravity field fidelity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GravityModel {
    /// Simple point mass.
    #[default]
    #[serde(rename = "point_mass")]
    PointMass,
    /// Point mass plus J2 oblateness.
    #[serde(rename = "j2")]
    J2,
    /// Point mass plus J2, J3 and J4 zonal harmonics.
    #[serde(rename = "j2j3j4")]
    J2J3J4,
}

/// Atmosphere model selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtmosphereModel {
    #[default]
    Exponential,
    /// US Standard Atmosphere 1976.
    Us76,
}

/// Lifecycle status of an intercept mission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    #[default]
    Planning,
    Ready,
    Aborted,
    Executing,
    Completed,
}

impl MissionStatus {
    /// Whether `next` is a legal forward transition from this status.
    pub fn can_transition_to(self, next: MissionStatus) -> bool {
        use MissionStatus::*;
        matches!(
            (self, next),
            (Planning, Ready)
                | (Planning, Aborted)
                | (Ready, Executing)
                | (Ready, Aborted)
                | (Executing, Completed)
                | (Executing, Aborted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, MissionStatus::Aborted | MissionStatus::Completed)
    }
}

/// Role of a mission waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointPurpose {
    Launch,
    Burn,
    Coast,
    Terminal,
}
