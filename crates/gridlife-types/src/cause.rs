//! The Cause Taxonomy.
//!
//! Every energy change and every spawn/death event carries exactly one
//! [`Cause`]. The set is closed: new causes are added here, never registered
//! at runtime, so statistics and logs can match on it exhaustively.
//!
//! The hierarchy is flattened into one enum. Each variant knows its display
//! name, its [`CauseCategory`], and its immediate parent:
//!
//! ```text
//! Movement      -> StepForward, Turn (TurnLeft, TurnRight), Bump (BumpWall, BumpAgent)
//! Eat           -> EatFood, EatFavoriteFood, EatAgent
//! Reproduction  -> SexualReproduction, AsexualReproduction
//! Population    -> Death, Birth (SexualBirth, AsexualBirth, CreationBirth)
//! ```

use serde::{Deserialize, Serialize};

/// Top-level grouping of a [`Cause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CauseCategory {
    /// Stepping, turning, and bumping.
    Movement,
    /// Consumption of food or other agents.
    Eat,
    /// Producing offspring.
    Reproduction,
    /// Births and deaths.
    Population,
}

impl CauseCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 4] = [Self::Movement, Self::Eat, Self::Reproduction, Self::Population];

    /// The root [`Cause`] of this category.
    pub const fn root(self) -> Cause {
        match self {
            Self::Movement => Cause::Movement,
            Self::Eat => Cause::Eat,
            Self::Reproduction => Cause::Reproduction,
            Self::Population => Cause::Population,
        }
    }
}

impl core::fmt::Display for CauseCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.root().name())
    }
}

/// Why an energy or lifecycle change happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Cause {
    // --- Movement ---
    /// Generic movement.
    Movement,
    /// Moving forward onto a free tile.
    StepForward,
    /// Generic turn.
    Turn,
    /// Turning left.
    TurnLeft,
    /// Turning right.
    TurnRight,
    /// Generic collision.
    Bump,
    /// Walking into the world edge.
    BumpWall,
    /// Walking into another agent.
    BumpAgent,

    // --- Eat ---
    /// Generic consumption.
    Eat,
    /// Eating ordinary food.
    EatFood,
    /// Eating the agent type's favorite food.
    EatFavoriteFood,
    /// Eating another agent.
    EatAgent,

    // --- Reproduction ---
    /// Generic reproduction cost.
    Reproduction,
    /// Two-parent reproduction cost.
    SexualReproduction,
    /// Single-parent reproduction cost.
    AsexualReproduction,

    // --- Population ---
    /// Generic population change.
    Population,
    /// The agent died.
    Death,
    /// Generic birth.
    Birth,
    /// Born from two parents.
    SexualBirth,
    /// Born from one parent.
    AsexualBirth,
    /// Created without parents.
    CreationBirth,
}

impl Cause {
    /// Every cause, in declaration order.
    pub const ALL: [Self; 21] = [
        Self::Movement,
        Self::StepForward,
        Self::Turn,
        Self::TurnLeft,
        Self::TurnRight,
        Self::Bump,
        Self::BumpWall,
        Self::BumpAgent,
        Self::Eat,
        Self::EatFood,
        Self::EatFavoriteFood,
        Self::EatAgent,
        Self::Reproduction,
        Self::SexualReproduction,
        Self::AsexualReproduction,
        Self::Population,
        Self::Death,
        Self::Birth,
        Self::SexualBirth,
        Self::AsexualBirth,
        Self::CreationBirth,
    ];

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Movement => "Movement",
            Self::StepForward => "Step Forward",
            Self::Turn => "Turn",
            Self::TurnLeft => "Turn Left",
            Self::TurnRight => "Turn Right",
            Self::Bump => "Bump",
            Self::BumpWall => "Bump Wall",
            Self::BumpAgent => "Bump Agent",
            Self::Eat => "Eat",
            Self::EatFood => "Eat Food",
            Self::EatFavoriteFood => "Eat Favorite Food",
            Self::EatAgent => "Eat Agent",
            Self::Reproduction => "Reproduction",
            Self::SexualReproduction => "Sexual Reproduction",
            Self::AsexualReproduction => "Asexual Reproduction",
            Self::Population => "Agent Population",
            Self::Death => "Death",
            Self::Birth => "Birth",
            Self::SexualBirth => "Sexual Birth",
            Self::AsexualBirth => "Asexual Birth",
            Self::CreationBirth => "Creation",
        }
    }

    /// The category this cause belongs to.
    pub const fn category(self) -> CauseCategory {
        match self {
            Self::Movement
            | Self::StepForward
            | Self::Turn
            | Self::TurnLeft
            | Self::TurnRight
            | Self::Bump
            | Self::BumpWall
            | Self::BumpAgent => CauseCategory::Movement,
            Self::Eat | Self::EatFood | Self::EatFavoriteFood | Self::EatAgent => {
                CauseCategory::Eat
            }
            Self::Reproduction | Self::SexualReproduction | Self::AsexualReproduction => {
                CauseCategory::Reproduction
            }
            Self::Population
            | Self::Death
            | Self::Birth
            | Self::SexualBirth
            | Self::AsexualBirth
            | Self::CreationBirth => CauseCategory::Population,
        }
    }

    /// Immediate ancestor in the hierarchy. `None` for category roots.
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Movement | Self::Eat | Self::Reproduction | Self::Population => None,
            Self::StepForward | Self::Turn | Self::Bump => Some(Self::Movement),
            Self::TurnLeft | Self::TurnRight => Some(Self::Turn),
            Self::BumpWall | Self::BumpAgent => Some(Self::Bump),
            Self::EatFood | Self::EatFavoriteFood | Self::EatAgent => Some(Self::Eat),
            Self::SexualReproduction | Self::AsexualReproduction => Some(Self::Reproduction),
            Self::Death | Self::Birth => Some(Self::Population),
            Self::SexualBirth | Self::AsexualBirth | Self::CreationBirth => Some(Self::Birth),
        }
    }

    /// Whether `self` is `ancestor` or descends from it.
    pub fn is_a(self, ancestor: Self) -> bool {
        let mut current = Some(self);
        while let Some(cause) = current {
            if cause == ancestor {
                return true;
            }
            current = cause.parent();
        }
        false
    }

    /// Whether this cause marks a birth or a death.
    pub fn is_lifecycle(self) -> bool {
        self.is_a(Self::Birth) || self == Self::Death
    }
}

impl core::fmt::Display for Cause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
