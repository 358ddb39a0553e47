//! Student simulation profile. The setup form passes these through to the
//! backend, which uses them to shape the simulated student's replies. The
//! wire values are the kebab-case option values of the original form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
#[error("unknown option: {0}")]
pub struct UnknownOption(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GradeLevel {
    Elementary,
    Middle,
    HighStandard,
    HighAp,
    #[default]
    CollegeIntro,
    CollegeAdvanced,
}

impl GradeLevel {
    pub fn value(self) -> &'static str {
        match self {
            Self::Elementary => "elementary",
            Self::Middle => "middle",
            Self::HighStandard => "high-standard",
            Self::HighAp => "high-ap",
            Self::CollegeIntro => "college-intro",
            Self::CollegeAdvanced => "college-advanced",
        }
    }
}

impl FromStr for GradeLevel {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elementary" => Ok(Self::Elementary),
            "middle" => Ok(Self::Middle),
            "high-standard" => Ok(Self::HighStandard),
            "high-ap" => Ok(Self::HighAp),
            "college-intro" => Ok(Self::CollegeIntro),
            "college-advanced" => Ok(Self::CollegeAdvanced),
            other => Err(UnknownOption(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Subject {
    #[default]
    General,
    Math,
    Science,
    History,
    English,
    Cs,
    Economics,
}

impl Subject {
    pub fn value(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Math => "math",
            Self::Science => "science",
            Self::History => "history",
            Self::English => "english",
            Self::Cs => "cs",
            Self::Economics => "economics",
        }
    }
}

impl FromStr for Subject {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(Self::General),
            "math" => Ok(Self::Math),
            "science" => Ok(Self::Science),
            "history" => Ok(Self::History),
            "english" => Ok(Self::English),
            "cs" => Ok(Self::Cs),
            "economics" => Ok(Self::Economics),
            other => Err(UnknownOption(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UnderstandingLevel {
    Struggling,
    Approaching,
    #[default]
    OnLevel,
    Advanced,
    Gifted,
}

impl UnderstandingLevel {
    pub fn value(self) -> &'static str {
        match self {
            Self::Struggling => "struggling",
            Self::Approaching => "approaching",
            Self::OnLevel => "on-level",
            Self::Advanced => "advanced",
            Self::Gifted => "gifted",
        }
    }
}

impl FromStr for UnderstandingLevel {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "struggling" => Ok(Self::Struggling),
            "approaching" => Ok(Self::Approaching),
            "on-level" => Ok(Self::OnLevel),
            "advanced" => Ok(Self::Advanced),
            "gifted" => Ok(Self::Gifted),
            other => Err(UnknownOption(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExplanationStyle {
    Concise,
    #[default]
    StepByStep,
    Examples,
    Analogy,
    Socratic,
}

impl ExplanationStyle {
    pub fn value(self) -> &'static str {
        match self {
            Self::Concise => "concise",
            Self::StepByStep => "step-by-step",
            Self::Examples => "examples",
            Self::Analogy => "analogy",
            Self::Socratic => "socratic",
        }
    }
}

impl FromStr for ExplanationStyle {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concise" => Ok(Self::Concise),
            "step-by-step" => Ok(Self::StepByStep),
            "examples" => Ok(Self::Examples),
            "analogy" => Ok(Self::Analogy),
            "socratic" => Ok(Self::Socratic),
            other => Err(UnknownOption(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StudentPersona {
    #[default]
    Curious,
    Quiet,
    Distracted,
    Confident,
    Skeptical,
}

impl StudentPersona {
    pub fn value(self) -> &'static str {
        match self {
            Self::Curious => "curious",
            Self::Quiet => "quiet",
            Self::Distracted => "distracted",
            Self::Confident => "confident",
            Self::Skeptical => "skeptical",
        }
    }
}

impl FromStr for StudentPersona {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "curious" => Ok(Self::Curious),
            "quiet" => Ok(Self::Quiet),
            "distracted" => Ok(Self::Distracted),
            "confident" => Ok(Self::Confident),
            "skeptical" => Ok(Self::Skeptical),
            other => Err(UnknownOption(other.to_string())),
        }
    }
}

/// Full profile of the simulated student, as stored by the settings
/// endpoint and read back when generating replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StudentProfile {
    pub grade_level: GradeLevel,
    pub subject: Subject,
    pub understanding_level: UnderstandingLevel,
    pub explanation_style: ExplanationStyle,
    pub student_persona: StudentPersona,
}

impl fmt::Display for StudentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.grade_level.value(),
            self.subject.value(),
            self.understanding_level.value(),
            self.explanation_style.value(),
            self.student_persona.value()
        )
    }
}
