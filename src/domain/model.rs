use serde::{Deserialize, Serialize};
use std::fmt;

pub const FEATURE_COUNT: usize = 9;

/// Name of the target column in the training data.
pub const TARGET_COLUMN: &str = "Project_Cost";

/// The nine model inputs. `Feature::ALL` fixes the column order used for
/// training, validation, the form and the breakdown table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    ProjectSize,
    ProjectDuration,
    TeamSize,
    Complexity,
    Reliability,
    DatabaseSize,
    TeamCohesion,
    DeveloperExperience,
    SoftwareTools,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::ProjectSize,
        Feature::ProjectDuration,
        Feature::TeamSize,
        Feature::Complexity,
        Feature::Reliability,
        Feature::DatabaseSize,
        Feature::TeamCohesion,
        Feature::DeveloperExperience,
        Feature::SoftwareTools,
    ];

    /// Column / form field name.
    pub fn name(self) -> &'static str {
        match self {
            Feature::ProjectSize => "Project_Size",
            Feature::ProjectDuration => "Project_Duration",
            Feature::TeamSize => "Team_Size",
            Feature::Complexity => "Complexity",
            Feature::Reliability => "Reliability",
            Feature::DatabaseSize => "Database_Size",
            Feature::TeamCohesion => "Team_Cohesion",
            Feature::DeveloperExperience => "Developer_Experience",
            Feature::SoftwareTools => "Software_Tools",
        }
    }

    /// Name with underscores shown as spaces.
    pub fn label(self) -> String {
        self.name().replace('_', " ")
    }

    /// Closed range accepted by the predict endpoint.
    pub fn range(self) -> (f64, f64) {
        match self {
            Feature::ProjectSize => (500.0, 5000.0),
            Feature::ProjectDuration => (3.0, 24.0),
            Feature::TeamSize => (3.0, 20.0),
            Feature::Complexity => (1.0, 10.0),
            Feature::Reliability => (1.0, 5.0),
            Feature::DatabaseSize => (100.0, 1000.0),
            Feature::TeamCohesion => (1.0, 5.0),
            Feature::DeveloperExperience => (1.0, 5.0),
            Feature::SoftwareTools => (1.0, 5.0),
        }
    }

    /// Hint shown under the form input while it has focus.
    pub fn hint(self) -> &'static str {
        match self {
            Feature::ProjectSize => "Enter a value between 500 and 5000 function points.",
            Feature::ProjectDuration => "Enter a value between 3 and 24 months.",
            Feature::TeamSize => "Enter a value between 3 and 20 members.",
            Feature::Complexity => {
                "Enter a value between 1 (low complexity) and 10 (high complexity)."
            }
            Feature::Reliability => {
                "Enter a value between 1 (low reliability) and 5 (high reliability)."
            }
            Feature::DatabaseSize => "Enter a value between 100 and 1000 GB.",
            Feature::TeamCohesion => "Enter a value between 1 (low cohesion) and 5 (high cohesion).",
            Feature::DeveloperExperience => {
                "Enter a value between 1 (low experience) and 5 (high experience)."
            }
            Feature::SoftwareTools => "Enter a value between 1 (basic tools) and 5 (advanced tools).",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One historical project from the training data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(rename = "Project_Size")]
    pub project_size: f64,
    #[serde(rename = "Project_Duration")]
    pub project_duration: f64,
    #[serde(rename = "Team_Size")]
    pub team_size: f64,
    #[serde(rename = "Complexity")]
    pub complexity: f64,
    #[serde(rename = "Reliability")]
    pub reliability: f64,
    #[serde(rename = "Database_Size")]
    pub database_size: f64,
    #[serde(rename = "Team_Cohesion")]
    pub team_cohesion: f64,
    #[serde(rename = "Developer_Experience")]
    pub developer_experience: f64,
    #[serde(rename = "Software_Tools")]
    pub software_tools: f64,
    #[serde(rename = "Project_Cost")]
    pub project_cost: f64,
}

impl ProjectRecord {
    /// Feature vector in `Feature::ALL` order.
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.project_size,
            self.project_duration,
            self.team_size,
            self.complexity,
            self.reliability,
            self.database_size,
            self.team_cohesion,
            self.developer_experience,
            self.software_tools,
        ]
    }
}

/// Nine parsed request values, in `Feature::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectInputs {
    values: [f64; FEATURE_COUNT],
}

impl ProjectInputs {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.into_iter().zip(self.values.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub label: String,
    /// `None` on the total row.
    pub value: Option<f64>,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub predicted_cost: f64,
    /// Feature rows followed by the total row.
    pub breakdown: Vec<BreakdownRow>,
}

impl Estimate {
    pub fn total(&self) -> Option<&BreakdownRow> {
        self.breakdown.last()
    }

    pub fn feature_rows(&self) -> &[BreakdownRow] {
        match self.breakdown.split_last() {
            Some((_, rows)) => rows,
            None => &[],
        }
    }
}
